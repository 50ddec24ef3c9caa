use crate::model::bytes::{ByteWriter, Cursor};
use crate::model::{Dialect, ModelError, Result};

/// Named mesh group with alternative member subsets.
///
/// `variants` always holds member ids. `.gam` stores each variant as positions into
/// `nodes`, so every variant member must be listed there; `.sam` stores ids directly
/// and has no `nodes` list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
	/// Group name, at most 20 encoded bytes.
	pub name: String,
	/// Lower selection bound.
	pub min: u32,
	/// Upper selection bound.
	pub max: u32,
	/// Explicit member list (`.gam` only).
	pub nodes: Vec<u32>,
	/// Alternative member subsets.
	pub variants: Vec<Vec<u32>>,
}

impl Group {
	/// Width of the name field.
	pub const NAME_WIDTH: usize = 20;

	/// Name, or a synthesized `Group.NNN` label when empty.
	pub fn display_name(&self, index: usize) -> String {
		if self.name.is_empty() { format!("Group.{index:03}") } else { self.name.clone() }
	}

	/// Decode one group.
	pub fn load(cursor: &mut Cursor<'_>, dialect: Dialect) -> Result<Self> {
		let name = cursor.read_fixed_str(Self::NAME_WIDTH)?;
		let min = cursor.read_u32()?;
		let max = cursor.read_u32()?;
		let nodes = match dialect {
			Dialect::Gam => read_u32_vector(cursor)?,
			Dialect::Sam => Vec::new(),
		};

		let variant_count = cursor.read_count(4)?;
		let mut variants = Vec::with_capacity(variant_count);
		for _ in 0..variant_count {
			let stored = read_u32_vector(cursor)?;
			let variant = match dialect {
				Dialect::Gam => stored
					.into_iter()
					.map(|pos| {
						usize::try_from(pos).ok().and_then(|idx| nodes.get(idx).copied()).ok_or(ModelError::IndexOutOfRange {
							kind: "group variant position",
							index: i64::from(pos),
							len: nodes.len(),
						})
					})
					.collect::<Result<Vec<_>>>()?,
				Dialect::Sam => stored,
			};
			variants.push(variant);
		}

		Ok(Self {
			name,
			min,
			max,
			nodes,
			variants,
		})
	}

	/// Encode one group; `index` labels resolution errors.
	pub fn dump(&self, writer: &mut ByteWriter, dialect: Dialect, index: usize) -> Result<()> {
		writer.write_fixed_str(&self.name, Self::NAME_WIDTH)?;
		writer.write_u32(self.min);
		writer.write_u32(self.max);
		match dialect {
			Dialect::Gam => write_u32_vector(writer, &self.nodes)?,
			Dialect::Sam if !self.nodes.is_empty() => {
				return Err(ModelError::DialectMismatch {
					what: "group node list",
					dialect,
				});
			}
			Dialect::Sam => {}
		}

		writer.write_count("variant count", self.variants.len())?;
		for variant in &self.variants {
			match dialect {
				Dialect::Gam => {
					let positions = variant
						.iter()
						.map(|member| {
							self.nodes
								.iter()
								.position(|node| node == member)
								.map(|pos| pos as u32)
								.ok_or(ModelError::GroupMemberUnresolved { group: index, member: *member })
						})
						.collect::<Result<Vec<_>>>()?;
					write_u32_vector(writer, &positions)?;
				}
				Dialect::Sam => write_u32_vector(writer, variant)?,
			}
		}
		Ok(())
	}
}

fn read_u32_vector(cursor: &mut Cursor<'_>) -> Result<Vec<u32>> {
	let count = cursor.read_count(4)?;
	let mut items = Vec::with_capacity(count);
	for _ in 0..count {
		items.push(cursor.read_u32()?);
	}
	Ok(items)
}

fn write_u32_vector(writer: &mut ByteWriter, items: &[u32]) -> Result<()> {
	writer.write_count("member count", items.len())?;
	for item in items {
		writer.write_u32(*item);
	}
	Ok(())
}

/// Decode the GROUPS section.
pub fn load_groups(cursor: &mut Cursor<'_>, dialect: Dialect) -> Result<Vec<Group>> {
	let count = cursor.read_count(Group::NAME_WIDTH + 12)?;
	let mut groups = Vec::with_capacity(count);
	for _ in 0..count {
		groups.push(Group::load(cursor, dialect)?);
	}
	Ok(groups)
}

/// Encode the GROUPS section.
pub fn dump_groups(writer: &mut ByteWriter, dialect: Dialect, groups: &[Group]) -> Result<()> {
	writer.write_count("group count", groups.len())?;
	for (index, group) in groups.iter().enumerate() {
		group.dump(writer, dialect, index)?;
	}
	Ok(())
}
