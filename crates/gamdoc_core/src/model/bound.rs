use crate::model::bytes::{ByteWriter, Cursor};
use crate::model::Result;

/// Per-axis Euler rotation limits of one bone.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoneBound {
	/// Bone (node) index.
	pub bone: u32,
	/// Lower rotation limit per axis.
	pub min_rotation: [f32; 3],
	/// Upper rotation limit per axis.
	pub max_rotation: [f32; 3],
}

impl BoneBound {
	/// Encoded size.
	pub const SIZE: usize = 28;
}

/// Decode the BOUNDS section.
pub fn load_bounds(cursor: &mut Cursor<'_>) -> Result<Vec<BoneBound>> {
	let count = cursor.read_count(BoneBound::SIZE)?;
	let mut items = Vec::with_capacity(count);
	for _ in 0..count {
		items.push(BoneBound {
			bone: cursor.read_u32()?,
			min_rotation: cursor.read_f32s()?,
			max_rotation: cursor.read_f32s()?,
		});
	}
	Ok(items)
}

/// Encode the BOUNDS section.
pub fn dump_bounds(writer: &mut ByteWriter, items: &[BoneBound]) -> Result<()> {
	writer.write_count("bound count", items.len())?;
	for item in items {
		writer.write_u32(item.bone);
		writer.write_f32s(&item.min_rotation);
		writer.write_f32s(&item.max_rotation);
	}
	Ok(())
}
