use crate::model::bytes::{ByteWriter, Cursor};
use crate::model::{Dialect, ModelError, Result};

/// Identity matrix used for nodes without a stored matrix.
pub const IDENTITY: [f32; 16] = [1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0];

/// Named transform node (bone or load point).
///
/// `.gam` stores `matrix` but no `scale`; `.sam` stores `scale` but no `matrix`.
/// The field a dialect does not store decodes to its default.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
	/// Node name, at most 40 encoded bytes.
	pub name: String,
	/// Parent node index or `-1` for roots.
	pub parent: i32,
	/// Local translation.
	pub location: [f32; 3],
	/// Local rotation quaternion (`x, y, z, w`).
	pub rotation: [f32; 4],
	/// Local scale.
	pub scale: [f32; 3],
	/// Stored node matrix.
	pub matrix: [f32; 16],
}

impl Default for Node {
	fn default() -> Self {
		Self {
			name: String::new(),
			parent: -1,
			location: [0.0; 3],
			rotation: [0.0, 0.0, 0.0, 1.0],
			scale: [1.0; 3],
			matrix: IDENTITY,
		}
	}
}

impl Node {
	/// Width of the name field.
	pub const NAME_WIDTH: usize = 40;

	/// Encoded size per dialect.
	pub fn size(dialect: Dialect) -> usize {
		match dialect {
			Dialect::Gam => 136,
			Dialect::Sam => 82,
		}
	}

	/// Name, or a synthesized `Node.NNN` label when empty.
	pub fn display_name(&self, index: usize) -> String {
		if self.name.is_empty() { format!("Node.{index:03}") } else { self.name.clone() }
	}

	/// Decode `count` nodes.
	pub fn load_all(cursor: &mut Cursor<'_>, dialect: Dialect, count: usize) -> Result<Vec<Self>> {
		let mut nodes = Vec::with_capacity(count.min(cursor.remaining() / Self::size(dialect)));
		for _ in 0..count {
			nodes.push(Self::load(cursor, dialect)?);
		}
		validate_forest(&nodes)?;
		Ok(nodes)
	}

	/// Decode one node.
	pub fn load(cursor: &mut Cursor<'_>, dialect: Dialect) -> Result<Self> {
		let name = cursor.read_fixed_str(Self::NAME_WIDTH)?;
		let parent = match dialect {
			Dialect::Gam => cursor.read_i32()?,
			Dialect::Sam => i32::from(cursor.read_i16()?),
		};
		let location = cursor.read_f32s()?;
		let rotation = cursor.read_f32s()?;
		let mut node = Self {
			name,
			parent,
			location,
			rotation,
			..Self::default()
		};
		match dialect {
			Dialect::Gam => node.matrix = cursor.read_f32s()?,
			Dialect::Sam => node.scale = cursor.read_f32s()?,
		}
		Ok(node)
	}

	/// Encode one node.
	pub fn dump(&self, writer: &mut ByteWriter, dialect: Dialect) -> Result<()> {
		writer.write_fixed_str(&self.name, Self::NAME_WIDTH)?;
		match dialect {
			Dialect::Gam => writer.write_i32(self.parent),
			Dialect::Sam => writer.write_i16(i16::try_from(self.parent).map_err(|_| ModelError::ValueOutOfRange {
				field: "node parent",
				value: i64::from(self.parent),
			})?),
		}
		writer.write_f32s(&self.location);
		writer.write_f32s(&self.rotation);
		match dialect {
			Dialect::Gam => writer.write_f32s(&self.matrix),
			Dialect::Sam => writer.write_f32s(&self.scale),
		}
		Ok(())
	}
}

/// Check that every parent is `-1` or a valid index and that parent links are acyclic.
pub fn validate_forest(nodes: &[Node]) -> Result<()> {
	for node in nodes {
		check_node_ref("node parent", node.parent, nodes.len())?;
	}

	// 0 = unvisited, 1 = on current chain, 2 = known to reach a root
	let mut state = vec![0_u8; nodes.len()];
	for start in 0..nodes.len() {
		let mut chain = Vec::new();
		let mut current = start;
		loop {
			match state[current] {
				2 => break,
				1 => return Err(ModelError::NodeCycle { node: current }),
				_ => {}
			}
			state[current] = 1;
			chain.push(current);
			match usize::try_from(nodes[current].parent) {
				Ok(parent) => current = parent,
				Err(_) => break,
			}
		}
		for idx in chain {
			state[idx] = 2;
		}
	}
	Ok(())
}

/// Check an optional node reference (`-1` means none).
pub fn check_node_ref(kind: &'static str, index: i32, len: usize) -> Result<()> {
	if index == -1 || usize::try_from(index).is_ok_and(|idx| idx < len) {
		Ok(())
	} else {
		Err(ModelError::IndexOutOfRange {
			kind,
			index: i64::from(index),
			len,
		})
	}
}

#[cfg(test)]
mod tests;
