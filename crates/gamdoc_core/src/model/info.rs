use crate::model::bytes::{ByteWriter, Cursor};
use crate::model::{Dialect, ModelError, Result};

/// Mesh totals as each dialect stores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshCounts {
	/// `.gam` split by draw type.
	Split {
		/// Double-buffered meshes (draw type 1).
		doubled: u32,
		/// Influence-skinned meshes (draw type 2).
		skinned: u32,
		/// Static meshes (draw type 4).
		statics: u32,
	},
	/// `.sam` single total.
	Total(u32),
}

impl MeshCounts {
	/// Total mesh count.
	pub fn total(&self) -> u32 {
		match *self {
			Self::Split { doubled, skinned, statics } => doubled + skinned + statics,
			Self::Total(total) => total,
		}
	}
}

impl Default for MeshCounts {
	fn default() -> Self {
		Self::Split {
			doubled: 0,
			skinned: 0,
			statics: 0,
		}
	}
}

/// Container summary counts that size every other section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Info {
	/// Mesh totals.
	pub meshes: MeshCounts,
	/// Animation count.
	pub animations: u32,
	/// Material slots per skin.
	pub materials: u32,
	/// Node count.
	pub nodes: u32,
	/// `.gam` configuration word; rewritten as the group count.
	pub config: i32,
}

impl Info {
	/// Encoded size, identical for both dialects.
	pub const SIZE: usize = 16;

	/// Total mesh count.
	pub fn mesh_count(&self) -> usize {
		self.meshes.total() as usize
	}

	/// Decode the INFO section payload.
	pub fn load(cursor: &mut Cursor<'_>, dialect: Dialect) -> Result<Self> {
		match dialect {
			Dialect::Gam => {
				let doubled = read_gam_count(cursor, "triangle mesh count")?;
				let skinned = read_gam_count(cursor, "skinned mesh count")?;
				let statics = read_gam_count(cursor, "static mesh count")?;
				Ok(Self {
					meshes: MeshCounts::Split { doubled, skinned, statics },
					animations: read_gam_count(cursor, "animation count")?,
					materials: read_gam_count(cursor, "material count")?,
					nodes: read_gam_count(cursor, "node count")?,
					config: cursor.read_i32()?,
				})
			}
			Dialect::Sam => Ok(Self {
				meshes: MeshCounts::Total(cursor.read_u32()?),
				materials: cursor.read_u32()?,
				nodes: cursor.read_u32()?,
				animations: cursor.read_u32()?,
				config: 0,
			}),
		}
	}

	/// Encode the INFO section payload.
	pub fn dump(&self, writer: &mut ByteWriter, dialect: Dialect) -> Result<()> {
		match (dialect, self.meshes) {
			(Dialect::Gam, MeshCounts::Split { doubled, skinned, statics }) => {
				write_gam_count(writer, "triangle mesh count", doubled)?;
				write_gam_count(writer, "skinned mesh count", skinned)?;
				write_gam_count(writer, "static mesh count", statics)?;
				write_gam_count(writer, "animation count", self.animations)?;
				write_gam_count(writer, "material count", self.materials)?;
				write_gam_count(writer, "node count", self.nodes)?;
				writer.write_i32(self.config);
			}
			(Dialect::Sam, meshes) => {
				writer.write_u32(meshes.total());
				writer.write_u32(self.materials);
				writer.write_u32(self.nodes);
				writer.write_u32(self.animations);
			}
			(Dialect::Gam, MeshCounts::Total(_)) => {
				return Err(ModelError::DialectMismatch {
					what: "unsplit mesh count",
					dialect,
				});
			}
		}
		Ok(())
	}
}

fn read_gam_count(cursor: &mut Cursor<'_>, field: &'static str) -> Result<u32> {
	let value = cursor.read_i16()?;
	u32::try_from(value).map_err(|_| ModelError::ValueOutOfRange {
		field,
		value: i64::from(value),
	})
}

fn write_gam_count(writer: &mut ByteWriter, field: &'static str, value: u32) -> Result<()> {
	let narrow = i16::try_from(value).map_err(|_| ModelError::ValueOutOfRange {
		field,
		value: i64::from(value),
	})?;
	writer.write_i16(narrow);
	Ok(())
}
