/// Runtime value produced by schema-driven decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Signed integer scalar.
	I64(i64),
	/// Unsigned integer scalar.
	U64(u64),
	/// 32-bit float scalar.
	F32(f32),
	/// Opaque byte payload.
	Bytes(Vec<u8>),
	/// Code-page decoded string.
	String(Box<str>),
	/// Homogeneous sequence.
	Array(Vec<Value>),
	/// Record-shaped value.
	Struct(StructValue),
}

impl Value {
	/// Short kind label for diagnostics.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::I64(_) => "i64",
			Self::U64(_) => "u64",
			Self::F32(_) => "f32",
			Self::Bytes(_) => "bytes",
			Self::String(_) => "string",
			Self::Array(_) => "array",
			Self::Struct(_) => "struct",
		}
	}

	/// Integer payload widened to `i128`.
	pub fn as_int(&self) -> Option<i128> {
		match self {
			Self::I64(value) => Some(i128::from(*value)),
			Self::U64(value) => Some(i128::from(*value)),
			_ => None,
		}
	}

	/// Non-negative integer payload.
	pub fn as_u64(&self) -> Option<u64> {
		self.as_int().and_then(|value| u64::try_from(value).ok())
	}

	/// Signed integer payload.
	pub fn as_i64(&self) -> Option<i64> {
		self.as_int().and_then(|value| i64::try_from(value).ok())
	}

	/// Float payload.
	pub fn as_f32(&self) -> Option<f32> {
		match self {
			Self::F32(value) => Some(*value),
			_ => None,
		}
	}

	/// String payload.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(value) => Some(value),
			_ => None,
		}
	}

	/// Sequence payload.
	pub fn as_array(&self) -> Option<&[Value]> {
		match self {
			Self::Array(items) => Some(items),
			_ => None,
		}
	}

	/// Record payload.
	pub fn as_struct(&self) -> Option<&StructValue> {
		match self {
			Self::Struct(value) => Some(value),
			_ => None,
		}
	}
}

/// Decoded record with field names preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
	/// Schema record name.
	pub type_name: Box<str>,
	/// Decoded field values in declaration order.
	pub fields: Vec<FieldValue>,
}

impl StructValue {
	/// Create an empty record value.
	pub fn new(type_name: &str) -> Self {
		Self {
			type_name: type_name.into(),
			fields: Vec::new(),
		}
	}

	/// Append a field, builder style.
	pub fn with(mut self, name: &str, value: Value) -> Self {
		self.fields.push(FieldValue { name: name.into(), value });
		self
	}

	/// Look up a field by name.
	pub fn field(&self, name: &str) -> Option<&Value> {
		self.fields.iter().find(|field| &*field.name == name).map(|field| &field.value)
	}
}

/// Named decoded field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
	/// Field identifier.
	pub name: Box<str>,
	/// Decoded field payload.
	pub value: Value,
}
