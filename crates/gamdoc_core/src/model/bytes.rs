use crate::model::{ModelError, Result, codepage};

/// Largest element count accepted for zero-width elements.
pub const MAX_EMPTY_ITEMS: usize = u16::MAX as usize;

/// Simple bounded little-endian cursor over an immutable byte slice.
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at position 0.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, pos: 0 }
	}

	/// Return current byte offset.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(ModelError::TruncatedInput {
				at: self.pos,
				need: n,
				rem: self.remaining(),
			});
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Read a fixed-size byte block.
	pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
		let raw = self.read_exact(N)?;
		let mut out = [0_u8; N];
		out.copy_from_slice(raw);
		Ok(out)
	}

	/// Read a `u8`.
	pub fn read_u8(&mut self) -> Result<u8> {
		Ok(self.read_array::<1>()?[0])
	}

	/// Read an `i8`.
	pub fn read_i8(&mut self) -> Result<i8> {
		Ok(i8::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `u16`.
	pub fn read_u16(&mut self) -> Result<u16> {
		Ok(u16::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `i16`.
	pub fn read_i16(&mut self) -> Result<i16> {
		Ok(i16::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `u32`.
	pub fn read_u32(&mut self) -> Result<u32> {
		Ok(u32::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `i32`.
	pub fn read_i32(&mut self) -> Result<i32> {
		Ok(i32::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `u64`.
	pub fn read_u64(&mut self) -> Result<u64> {
		Ok(u64::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `i64`.
	pub fn read_i64(&mut self) -> Result<i64> {
		Ok(i64::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `f32`.
	pub fn read_f32(&mut self) -> Result<f32> {
		Ok(f32::from_le_bytes(self.read_array()?))
	}

	/// Read `N` consecutive `f32` values.
	pub fn read_f32s<const N: usize>(&mut self) -> Result<[f32; N]> {
		let raw = self.read_exact(N * 4)?;
		let mut out = [0_f32; N];
		for (slot, chunk) in out.iter_mut().zip(raw.chunks_exact(4)) {
			*slot = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
		}
		Ok(out)
	}

	/// Read three `u16` triangle corner indices.
	pub fn read_triangle(&mut self) -> Result<[u16; 3]> {
		Ok([self.read_u16()?, self.read_u16()?, self.read_u16()?])
	}

	/// Read a `u32` element count and check it against the remaining payload.
	///
	/// `min_item` is the smallest encoded size of one element.
	pub fn read_count(&mut self, min_item: usize) -> Result<usize> {
		let at = self.pos;
		let count = self.read_u32()? as usize;
		self.check_items(at, "element count", count, min_item)?;
		Ok(count)
	}

	/// Check that `count` elements of `item_size` bytes fit the remaining payload.
	///
	/// Zero-width elements consume nothing, so their count is capped at [`MAX_EMPTY_ITEMS`].
	pub fn check_items(&self, at: usize, field: &'static str, count: usize, item_size: usize) -> Result<()> {
		if item_size == 0 {
			if count > MAX_EMPTY_ITEMS {
				return Err(ModelError::ValueOutOfRange {
					field,
					value: count as i64,
				});
			}
			return Ok(());
		}
		let need = count.saturating_mul(item_size);
		if need > self.remaining() {
			return Err(ModelError::TruncatedInput {
				at,
				need,
				rem: self.remaining(),
			});
		}
		Ok(())
	}

	/// Read a fixed-width Windows-1251 char array, truncated at the first NUL.
	pub fn read_fixed_str(&mut self, width: usize) -> Result<String> {
		Ok(codepage::decode(self.read_exact(width)?))
	}

	/// Read a `u32`-length-prefixed Windows-1251 string, truncated at the first NUL.
	pub fn read_prefixed_str(&mut self) -> Result<String> {
		let len = self.read_u32()? as usize;
		Ok(codepage::decode(self.read_exact(len)?))
	}
}

/// Growable little-endian byte sink used by every encoder.
#[derive(Debug, Default)]
pub struct ByteWriter {
	bytes: Vec<u8>,
}

impl ByteWriter {
	/// Create an empty writer.
	pub fn new() -> Self {
		Self::default()
	}

	/// Bytes written so far.
	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	/// Whether nothing was written yet.
	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}

	/// Borrow the written bytes.
	pub fn as_slice(&self) -> &[u8] {
		&self.bytes
	}

	/// Consume the writer and return its buffer.
	pub fn into_inner(self) -> Vec<u8> {
		self.bytes
	}

	/// Append raw bytes.
	pub fn write_bytes(&mut self, bytes: &[u8]) {
		self.bytes.extend_from_slice(bytes);
	}

	/// Append `n` zero bytes.
	pub fn write_zeros(&mut self, n: usize) {
		self.bytes.resize(self.bytes.len() + n, 0);
	}

	/// Append a `u8`.
	pub fn write_u8(&mut self, value: u8) {
		self.bytes.push(value);
	}

	/// Append an `i8`.
	pub fn write_i8(&mut self, value: i8) {
		self.write_bytes(&value.to_le_bytes());
	}

	/// Append a little-endian `u16`.
	pub fn write_u16(&mut self, value: u16) {
		self.write_bytes(&value.to_le_bytes());
	}

	/// Append a little-endian `i16`.
	pub fn write_i16(&mut self, value: i16) {
		self.write_bytes(&value.to_le_bytes());
	}

	/// Append a little-endian `u32`.
	pub fn write_u32(&mut self, value: u32) {
		self.write_bytes(&value.to_le_bytes());
	}

	/// Append a little-endian `i32`.
	pub fn write_i32(&mut self, value: i32) {
		self.write_bytes(&value.to_le_bytes());
	}

	/// Append a little-endian `u64`.
	pub fn write_u64(&mut self, value: u64) {
		self.write_bytes(&value.to_le_bytes());
	}

	/// Append a little-endian `i64`.
	pub fn write_i64(&mut self, value: i64) {
		self.write_bytes(&value.to_le_bytes());
	}

	/// Append a little-endian `f32`.
	pub fn write_f32(&mut self, value: f32) {
		self.write_bytes(&value.to_le_bytes());
	}

	/// Append a run of `f32` values.
	pub fn write_f32s(&mut self, values: &[f32]) {
		for value in values {
			self.write_f32(*value);
		}
	}

	/// Append three `u16` triangle corner indices.
	pub fn write_triangle(&mut self, tri: [u16; 3]) {
		for corner in tri {
			self.write_u16(corner);
		}
	}

	/// Append a collection length as `u32`.
	pub fn write_count(&mut self, field: &'static str, len: usize) -> Result<()> {
		let value = u32::try_from(len).map_err(|_| ModelError::ValueOutOfRange {
			field,
			value: i64::try_from(len).unwrap_or(i64::MAX),
		})?;
		self.write_u32(value);
		Ok(())
	}

	/// Append a Windows-1251 string NUL-padded to `width` bytes.
	pub fn write_fixed_str(&mut self, text: &str, width: usize) -> Result<()> {
		let encoded = codepage::encode(text)?;
		if encoded.len() > width {
			return Err(ModelError::StringTooLong { len: encoded.len(), width });
		}
		self.write_bytes(&encoded);
		self.write_zeros(width - encoded.len());
		Ok(())
	}

	/// Append a `u32`-length-prefixed Windows-1251 string including one trailing NUL.
	pub fn write_prefixed_str(&mut self, text: &str) -> Result<()> {
		let mut encoded = codepage::encode(text)?;
		encoded.push(0);
		self.write_count("string length", encoded.len())?;
		self.write_bytes(&encoded);
		Ok(())
	}
}

#[cfg(test)]
mod tests;
