use crate::model::bytes::{ByteWriter, Cursor};
use crate::model::{Game, ModelError, Result};

/// Untagged triangle soup used as the single convex collision hull.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvexMesh {
	/// Hull vertices.
	pub vertices: Vec<[f32; 3]>,
	/// Hull triangles.
	pub indices: Vec<[u16; 3]>,
}

impl ConvexMesh {
	/// Decode the CONVEX section.
	pub fn load(cursor: &mut Cursor<'_>) -> Result<Self> {
		let vertex_count = cursor.read_u32()? as usize;
		let index_count = cursor.read_u32()? as usize;
		let need = vertex_count.saturating_mul(12).saturating_add(index_count.saturating_mul(6));
		if need > cursor.remaining() {
			return Err(ModelError::TruncatedInput {
				at: cursor.pos(),
				need,
				rem: cursor.remaining(),
			});
		}

		let mut vertices = Vec::with_capacity(vertex_count);
		for _ in 0..vertex_count {
			vertices.push(cursor.read_f32s()?);
		}
		let mut indices = Vec::with_capacity(index_count);
		for _ in 0..index_count {
			indices.push(cursor.read_triangle()?);
		}
		crate::model::mesh::check_triangles(&indices, vertices.len())?;
		Ok(Self { vertices, indices })
	}

	/// Encode the CONVEX section.
	pub fn dump(&self, writer: &mut ByteWriter) -> Result<()> {
		crate::model::mesh::check_triangles(&self.indices, self.vertices.len())?;
		writer.write_count("convex vertex count", self.vertices.len())?;
		writer.write_count("convex index count", self.indices.len())?;
		for vertex in &self.vertices {
			writer.write_f32s(vertex);
		}
		for tri in &self.indices {
			writer.write_triangle(*tri);
		}
		Ok(())
	}
}

/// Primitive volume of a collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColliderShape {
	/// Oriented box; `size` holds full extents.
	Box,
	/// Sphere; `size[0]` holds the radius.
	Sphere,
	/// Cylinder.
	Cylinder,
}

impl ColliderShape {
	/// Shape for a stored type word, if known.
	pub fn from_kind(kind: u32) -> Option<Self> {
		match kind {
			0 => Some(Self::Box),
			1 => Some(Self::Sphere),
			2 => Some(Self::Cylinder),
			_ => None,
		}
	}

	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Box => "box",
			Self::Sphere => "sphere",
			Self::Cylinder => "cylinder",
		}
	}
}

/// Simple collision primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
	/// Shape type word.
	pub kind: u32,
	/// Center.
	pub location: [f32; 3],
	/// Orientation quaternion (`x, y, z, w`).
	pub rotation: [f32; 4],
	/// Extents.
	pub size: [f32; 3],
	/// Gameplay class (`113` builds only).
	pub gametype: u32,
}

impl Default for Collider {
	fn default() -> Self {
		Self {
			kind: 0,
			location: [0.0; 3],
			rotation: [0.0, 0.0, 0.0, 1.0],
			size: [1.0; 3],
			gametype: 0,
		}
	}
}

impl Collider {
	/// Encoded size per game build.
	pub fn size_for(game: Game) -> usize {
		match game {
			Game::Hta => 44,
			Game::Clans => 48,
		}
	}

	/// Known shape of this collider.
	pub fn shape(&self) -> Option<ColliderShape> {
		ColliderShape::from_kind(self.kind)
	}

	/// Synthesized `Collider.NNN` label.
	pub fn display_name(index: usize) -> String {
		format!("Collider.{index:03}")
	}

	/// Decode one collider.
	pub fn load(cursor: &mut Cursor<'_>, game: Game) -> Result<Self> {
		Ok(Self {
			kind: cursor.read_u32()?,
			location: cursor.read_f32s()?,
			rotation: cursor.read_f32s()?,
			size: cursor.read_f32s()?,
			gametype: match game {
				Game::Hta => 0,
				Game::Clans => cursor.read_u32()?,
			},
		})
	}

	/// Encode one collider.
	pub fn dump(&self, writer: &mut ByteWriter, game: Game) {
		writer.write_u32(self.kind);
		writer.write_f32s(&self.location);
		writer.write_f32s(&self.rotation);
		writer.write_f32s(&self.size);
		if game == Game::Clans {
			writer.write_u32(self.gametype);
		}
	}
}

/// Collision primitive attached to a bone.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HierGeom {
	/// Primitive volume.
	pub collider: Collider,
	/// Attached bone (node) index.
	pub bone: u32,
}

impl HierGeom {
	/// Decode one bone-attached collider.
	pub fn load(cursor: &mut Cursor<'_>, game: Game) -> Result<Self> {
		Ok(Self {
			collider: Collider::load(cursor, game)?,
			bone: cursor.read_u32()?,
		})
	}

	/// Encode one bone-attached collider.
	pub fn dump(&self, writer: &mut ByteWriter, game: Game) {
		self.collider.dump(writer, game);
		writer.write_u32(self.bone);
	}
}

/// Decode the COLLISIONS section.
pub fn load_colliders(cursor: &mut Cursor<'_>, game: Game) -> Result<Vec<Collider>> {
	let count = cursor.read_count(Collider::size_for(game))?;
	let mut items = Vec::with_capacity(count);
	for _ in 0..count {
		items.push(Collider::load(cursor, game)?);
	}
	Ok(items)
}

/// Encode the COLLISIONS section.
pub fn dump_colliders(writer: &mut ByteWriter, game: Game, items: &[Collider]) -> Result<()> {
	writer.write_count("collider count", items.len())?;
	for item in items {
		item.dump(writer, game);
	}
	Ok(())
}

/// Decode the HIER_GEOM section.
pub fn load_hier_geoms(cursor: &mut Cursor<'_>, game: Game) -> Result<Vec<HierGeom>> {
	let count = cursor.read_count(Collider::size_for(game) + 4)?;
	let mut items = Vec::with_capacity(count);
	for _ in 0..count {
		items.push(HierGeom::load(cursor, game)?);
	}
	Ok(items)
}

/// Encode the HIER_GEOM section.
pub fn dump_hier_geoms(writer: &mut ByteWriter, game: Game, items: &[HierGeom]) -> Result<()> {
	writer.write_count("hier geom count", items.len())?;
	for item in items {
		item.dump(writer, game);
	}
	Ok(())
}

#[cfg(test)]
mod tests;
