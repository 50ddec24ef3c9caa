use crate::model::bytes::{ByteWriter, Cursor};
use crate::model::node::check_node_ref;
use crate::model::{Dialect, ModelError, Result};

/// Structural edit applied to the skeleton while an animation plays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Change {
	/// Edit type.
	pub kind: u32,
	/// Index being replaced.
	pub current: i16,
	/// Replacement index.
	pub new: i16,
}

/// One node transform sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Key {
	/// Target node index; implied by key position in `.sam`.
	pub node: i32,
	/// Translation.
	pub location: [f32; 3],
	/// Rotation quaternion (`x, y, z, w`).
	pub rotation: [f32; 4],
	/// Scale (`.sam` only).
	pub scale: [f32; 3],
}

impl Default for Key {
	fn default() -> Self {
		Self {
			node: 0,
			location: [0.0; 3],
			rotation: [0.0, 0.0, 0.0, 1.0],
			scale: [1.0; 3],
		}
	}
}

/// Keyframe track set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Animation {
	/// Animation name, at most 25 encoded bytes.
	pub name: String,
	/// Playback rate.
	pub fps: u32,
	/// Follow-up animation index or `-1`.
	pub next: i32,
	/// Action word (`.gam` only).
	pub action: i32,
	/// Skeleton edits.
	pub changes: Vec<Change>,
	/// `frames[frame][key]`; every frame carries the same key count.
	pub frames: Vec<Vec<Key>>,
}

impl Animation {
	/// Width of the name field.
	pub const NAME_WIDTH: usize = 25;

	/// Name, or a synthesized `Animation.NNN` label when empty.
	pub fn display_name(&self, index: usize) -> String {
		if self.name.is_empty() { format!("Animation.{index:03}") } else { self.name.clone() }
	}

	/// Keys per frame (zero without frames).
	pub fn key_count(&self) -> usize {
		self.frames.first().map_or(0, Vec::len)
	}

	/// Decode one animation; `node_count` sizes `.sam` frames.
	pub fn load(cursor: &mut Cursor<'_>, dialect: Dialect, node_count: usize) -> Result<Self> {
		let name = cursor.read_fixed_str(Self::NAME_WIDTH)?;
		match dialect {
			Dialect::Gam => {
				let frame_count = usize::from(cursor.read_u16()?);
				let fps = u32::from(cursor.read_u16()?);
				let next = i32::from(cursor.read_i16()?);
				let change_count = usize::from(cursor.read_u16()?);
				let key_count = usize::from(cursor.read_u16()?);
				let action = cursor.read_i32()?;

				let mut changes = Vec::with_capacity(change_count);
				for _ in 0..change_count {
					let current = cursor.read_i16()?;
					let kind = cursor.read_u32()?;
					let new = cursor.read_i16()?;
					changes.push(Change { kind, current, new });
				}

				let frames = read_frames(cursor, frame_count, key_count, 30, |cursor, _| {
					let node = i32::from(cursor.read_i16()?);
					check_node_ref("key node", node, node_count)?;
					Ok(Key {
						node,
						location: cursor.read_f32s()?,
						rotation: cursor.read_f32s()?,
						..Key::default()
					})
				})?;

				Ok(Self {
					name,
					fps,
					next,
					action,
					changes,
					frames,
				})
			}
			Dialect::Sam => {
				let frame_count = cursor.read_u32()? as usize;
				let fps = cursor.read_u32()?;
				let next = cursor.read_i32()?;
				let change_count = cursor.read_count(8)?;

				let mut changes = Vec::with_capacity(change_count);
				for _ in 0..change_count {
					changes.push(Change {
						kind: cursor.read_u32()?,
						current: cursor.read_i16()?,
						new: cursor.read_i16()?,
					});
				}

				let frames = read_frames(cursor, frame_count, node_count, 40, |cursor, node| {
					Ok(Key {
						node: node as i32,
						location: cursor.read_f32s()?,
						rotation: cursor.read_f32s()?,
						scale: cursor.read_f32s()?,
					})
				})?;

				Ok(Self {
					name,
					fps,
					next,
					action: 0,
					changes,
					frames,
				})
			}
		}
	}

	/// Encode one animation; frame and key counts are taken from `frames`.
	pub fn dump(&self, writer: &mut ByteWriter, dialect: Dialect, index: usize, node_count: usize) -> Result<()> {
		let key_count = match dialect {
			Dialect::Gam => self.key_count(),
			Dialect::Sam => node_count,
		};
		for (frame, keys) in self.frames.iter().enumerate() {
			if keys.len() != key_count {
				return Err(ModelError::RaggedFrames {
					animation: index,
					frame,
					expected: key_count,
					got: keys.len(),
				});
			}
		}

		writer.write_fixed_str(&self.name, Self::NAME_WIDTH)?;
		match dialect {
			Dialect::Gam => {
				writer.write_u16(narrow("frame count", self.frames.len() as i64)?);
				writer.write_u16(narrow("fps", i64::from(self.fps))?);
				writer.write_i16(narrow("next animation", i64::from(self.next))?);
				writer.write_u16(narrow("change count", self.changes.len() as i64)?);
				writer.write_u16(narrow("key count", key_count as i64)?);
				writer.write_i32(self.action);
				for change in &self.changes {
					writer.write_i16(change.current);
					writer.write_u32(change.kind);
					writer.write_i16(change.new);
				}
				for key in self.frames.iter().flatten() {
					check_node_ref("key node", key.node, node_count)?;
					writer.write_i16(narrow("key node", i64::from(key.node))?);
					writer.write_f32s(&key.location);
					writer.write_f32s(&key.rotation);
				}
			}
			Dialect::Sam => {
				writer.write_count("frame count", self.frames.len())?;
				writer.write_u32(self.fps);
				writer.write_i32(self.next);
				writer.write_count("change count", self.changes.len())?;
				for change in &self.changes {
					writer.write_u32(change.kind);
					writer.write_i16(change.current);
					writer.write_i16(change.new);
				}
				for key in self.frames.iter().flatten() {
					writer.write_f32s(&key.location);
					writer.write_f32s(&key.rotation);
					writer.write_f32s(&key.scale);
				}
			}
		}
		Ok(())
	}
}

fn read_frames(
	cursor: &mut Cursor<'_>,
	frame_count: usize,
	key_count: usize,
	key_size: usize,
	mut read_key: impl FnMut(&mut Cursor<'_>, usize) -> Result<Key>,
) -> Result<Vec<Vec<Key>>> {
	cursor.check_items(cursor.pos(), "frame count", frame_count, key_count.saturating_mul(key_size))?;

	let mut frames = Vec::with_capacity(frame_count);
	for _ in 0..frame_count {
		let mut keys = Vec::with_capacity(key_count);
		for node in 0..key_count {
			keys.push(read_key(cursor, node)?);
		}
		frames.push(keys);
	}
	Ok(frames)
}

fn narrow<T: TryFrom<i64>>(field: &'static str, value: i64) -> Result<T> {
	T::try_from(value).map_err(|_| ModelError::ValueOutOfRange { field, value })
}

/// Decode the ANIMATIONS section.
pub fn load_animations(cursor: &mut Cursor<'_>, dialect: Dialect, count: usize, node_count: usize) -> Result<Vec<Animation>> {
	let mut animations = Vec::with_capacity(count.min(cursor.remaining() / 39));
	for _ in 0..count {
		animations.push(Animation::load(cursor, dialect, node_count)?);
	}
	Ok(animations)
}

/// Encode the ANIMATIONS section.
pub fn dump_animations(writer: &mut ByteWriter, dialect: Dialect, animations: &[Animation], node_count: usize) -> Result<()> {
	for (index, animation) in animations.iter().enumerate() {
		animation.dump(writer, dialect, index, node_count)?;
	}
	Ok(())
}

#[cfg(test)]
mod tests;
