use crate::model::bytes::{ByteWriter, Cursor};
use crate::model::codec::Value;
use crate::model::{ModelError, Result};

/// Fixed-width scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimKind {
	/// Unsigned 8-bit integer.
	U8,
	/// Signed 8-bit integer.
	I8,
	/// Unsigned 16-bit integer.
	U16,
	/// Signed 16-bit integer.
	I16,
	/// Unsigned 32-bit integer.
	U32,
	/// Signed 32-bit integer.
	I32,
	/// Unsigned 64-bit integer.
	U64,
	/// Signed 64-bit integer.
	I64,
	/// IEEE-754 single precision float.
	F32,
}

impl PrimKind {
	/// Encoded width in bytes.
	pub const fn size(self) -> usize {
		match self {
			Self::U8 | Self::I8 => 1,
			Self::U16 | Self::I16 => 2,
			Self::U32 | Self::I32 | Self::F32 => 4,
			Self::U64 | Self::I64 => 8,
		}
	}

	/// Whether the kind holds an integer.
	pub const fn is_integer(self) -> bool {
		!matches!(self, Self::F32)
	}

	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::U8 => "u8",
			Self::I8 => "i8",
			Self::U16 => "u16",
			Self::I16 => "i16",
			Self::U32 => "u32",
			Self::I32 => "i32",
			Self::U64 => "u64",
			Self::I64 => "i64",
			Self::F32 => "f32",
		}
	}

	fn read(self, cursor: &mut Cursor<'_>) -> Result<Value> {
		Ok(match self {
			Self::U8 => Value::U64(u64::from(cursor.read_u8()?)),
			Self::I8 => Value::I64(i64::from(cursor.read_i8()?)),
			Self::U16 => Value::U64(u64::from(cursor.read_u16()?)),
			Self::I16 => Value::I64(i64::from(cursor.read_i16()?)),
			Self::U32 => Value::U64(u64::from(cursor.read_u32()?)),
			Self::I32 => Value::I64(i64::from(cursor.read_i32()?)),
			Self::U64 => Value::U64(cursor.read_u64()?),
			Self::I64 => Value::I64(cursor.read_i64()?),
			Self::F32 => Value::F32(cursor.read_f32()?),
		})
	}

	fn write(self, writer: &mut ByteWriter, value: &Value) -> Result<()> {
		match self {
			Self::U8 => writer.write_u8(self.narrow(value)?),
			Self::I8 => writer.write_i8(self.narrow(value)?),
			Self::U16 => writer.write_u16(self.narrow(value)?),
			Self::I16 => writer.write_i16(self.narrow(value)?),
			Self::U32 => writer.write_u32(self.narrow(value)?),
			Self::I32 => writer.write_i32(self.narrow(value)?),
			Self::U64 => writer.write_u64(self.narrow(value)?),
			Self::I64 => writer.write_i64(self.narrow(value)?),
			Self::F32 => writer.write_f32(value.as_f32().ok_or(ModelError::TypeMismatch {
				expected: "f32",
				got: value.kind(),
			})?),
		}
		Ok(())
	}

	fn narrow<T: TryFrom<i128>>(self, value: &Value) -> Result<T> {
		let int = value.as_int().ok_or(ModelError::TypeMismatch {
			expected: self.as_str(),
			got: value.kind(),
		})?;
		T::try_from(int).map_err(|_| ModelError::ValueOutOfRange {
			field: self.as_str(),
			value: i64::try_from(int).unwrap_or(if int < 0 { i64::MIN } else { i64::MAX }),
		})
	}
}

/// A scalar kind repeated `count` times.
///
/// A count of one decodes to a bare scalar; any other count decodes to a list.
/// On dump, lists longer than `count` fail with [`ModelError::ArityMismatch`];
/// shorter lists are zero-filled when `align` is set and rejected otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Primitive {
	/// Scalar kind.
	pub kind: PrimKind,
	/// Repeat count.
	pub count: usize,
	/// Zero-fill under-length lists on dump.
	pub align: bool,
}

impl Primitive {
	/// Repeated scalar with zero-fill enabled.
	pub const fn new(kind: PrimKind, count: usize) -> Self {
		Self { kind, count, align: true }
	}

	/// Single scalar.
	pub const fn scalar(kind: PrimKind) -> Self {
		Self::new(kind, 1)
	}

	/// Disable zero-fill of under-length lists.
	pub const fn strict(self) -> Self {
		Self { align: false, ..self }
	}

	/// Total encoded width in bytes.
	pub const fn size(&self) -> usize {
		self.kind.size() * self.count
	}

	/// Decode a scalar (count one) or a fixed-length list.
	pub fn load(&self, cursor: &mut Cursor<'_>) -> Result<Value> {
		if self.size() > cursor.remaining() {
			return Err(ModelError::TruncatedInput {
				at: cursor.pos(),
				need: self.size(),
				rem: cursor.remaining(),
			});
		}

		if self.count == 1 {
			return self.kind.read(cursor);
		}

		let mut items = Vec::with_capacity(self.count);
		for _ in 0..self.count {
			items.push(self.kind.read(cursor)?);
		}
		Ok(Value::Array(items))
	}

	/// Encode a scalar or list against the declared count.
	pub fn dump(&self, writer: &mut ByteWriter, value: &Value) -> Result<()> {
		let items = match value {
			Value::Array(items) => items.as_slice(),
			scalar => std::slice::from_ref(scalar),
		};

		if items.len() > self.count || (items.len() < self.count && !self.align) {
			return Err(ModelError::ArityMismatch {
				expected: self.count,
				got: items.len(),
			});
		}

		for item in items {
			self.kind.write(writer, item)?;
		}
		writer.write_zeros((self.count - items.len()) * self.kind.size());
		Ok(())
	}
}
