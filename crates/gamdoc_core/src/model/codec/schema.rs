use std::sync::Arc;

use crate::model::bytes::{ByteWriter, Cursor, MAX_EMPTY_ITEMS};
use crate::model::codec::{FieldValue, PrimKind, Primitive, StructValue, Value};
use crate::model::{Dialect, Format, Game, ModelError, Result};

/// Repeat count of an [`Codec::Array`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Count {
	/// Literal element count.
	Fixed(usize),
	/// Count read from an integer field decoded earlier in the enclosing record.
	Field(Box<str>),
}

/// Alternate codecs selected by the load/dump mode.
#[derive(Debug, Clone)]
pub enum Dynamic {
	/// One alternate per container dialect.
	ByDialect {
		/// `.gam` alternate.
		gam: Codec,
		/// `.sam` alternate.
		sam: Codec,
	},
	/// One alternate per game build.
	ByGame {
		/// Original build alternate.
		hta: Codec,
		/// `113` build alternate.
		clans: Codec,
	},
}

impl Dynamic {
	/// Pick the alternate for `format`.
	pub fn select(&self, format: Format) -> &Codec {
		match (self, format.dialect, format.game) {
			(Self::ByDialect { gam, .. }, Dialect::Gam, _) => gam,
			(Self::ByDialect { sam, .. }, Dialect::Sam, _) => sam,
			(Self::ByGame { hta, .. }, _, Game::Hta) => hta,
			(Self::ByGame { clans, .. }, _, Game::Clans) => clans,
		}
	}
}

/// Byte layout of one schema node.
#[derive(Debug, Clone)]
pub enum Codec {
	/// Scalar or fixed homogeneous tuple.
	Prim(Primitive),
	/// Raw byte block of fixed width.
	Bytes(usize),
	/// Fixed-width NUL-padded string.
	CharArray(usize),
	/// `u32`-length-prefixed string.
	CharVector,
	/// Nested record.
	Struct(Arc<Structure>),
	/// Repeated element with literal or sibling-driven count.
	Array {
		/// Element codec.
		item: Box<Codec>,
		/// Element count source.
		count: Count,
	},
	/// `u32`-length-prefixed sequence.
	Vector(Box<Codec>),
	/// Mode-selected alternate.
	Dynamic(Box<Dynamic>),
}

impl Codec {
	/// Single scalar.
	pub fn prim(kind: PrimKind) -> Self {
		Self::Prim(Primitive::scalar(kind))
	}

	/// Fixed tuple of `count` scalars.
	pub fn prims(kind: PrimKind, count: usize) -> Self {
		Self::Prim(Primitive::new(kind, count))
	}

	/// Nested record.
	pub fn structure(structure: Structure) -> Self {
		Self::Struct(Arc::new(structure))
	}

	/// Literal-count array.
	pub fn array(item: Codec, count: usize) -> Self {
		Self::Array {
			item: Box::new(item),
			count: Count::Fixed(count),
		}
	}

	/// Array sized by an integer field of the enclosing record.
	pub fn array_by(item: Codec, field: &str) -> Self {
		Self::Array {
			item: Box::new(item),
			count: Count::Field(field.into()),
		}
	}

	/// Length-prefixed sequence.
	pub fn vector(item: Codec) -> Self {
		Self::Vector(Box::new(item))
	}

	/// Per-dialect alternates.
	pub fn by_dialect(gam: Codec, sam: Codec) -> Self {
		Self::Dynamic(Box::new(Dynamic::ByDialect { gam, sam }))
	}

	/// Per-game alternates.
	pub fn by_game(hta: Codec, clans: Codec) -> Self {
		Self::Dynamic(Box::new(Dynamic::ByGame { hta, clans }))
	}

	fn is_scalar_int(&self) -> bool {
		matches!(self, Self::Prim(prim) if prim.count == 1 && prim.kind.is_integer())
	}

	/// Sibling count fields referenced by this codec outside nested records.
	fn count_refs<'a>(&'a self, out: &mut Vec<&'a str>) {
		match self {
			Self::Array { item, count } => {
				if let Count::Field(field) = count {
					out.push(field);
				}
				item.count_refs(out);
			}
			Self::Vector(item) => item.count_refs(out),
			Self::Dynamic(dynamic) => match &**dynamic {
				Dynamic::ByDialect { gam, sam } => {
					gam.count_refs(out);
					sam.count_refs(out);
				}
				Dynamic::ByGame { hta, clans } => {
					hta.count_refs(out);
					clans.count_refs(out);
				}
			},
			Self::Prim(_) | Self::Bytes(_) | Self::CharArray(_) | Self::CharVector | Self::Struct(_) => {}
		}
	}

	/// Encoded width when it does not depend on data.
	pub fn fixed_size(&self, format: Format) -> Option<usize> {
		match self {
			Self::Prim(prim) => Some(prim.size()),
			Self::Bytes(width) | Self::CharArray(width) => Some(*width),
			Self::CharVector | Self::Vector(_) => None,
			Self::Struct(structure) => structure.fields.iter().map(|(_, codec)| codec.fixed_size(format)).sum(),
			Self::Array { count: Count::Fixed(0), .. } => Some(0),
			Self::Array { item, count: Count::Fixed(count) } => item.fixed_size(format).map(|size| size * count),
			Self::Array { .. } => None,
			Self::Dynamic(dynamic) => dynamic.select(format).fixed_size(format),
		}
	}

	/// Decode one value.
	pub fn load(&self, cursor: &mut Cursor<'_>, format: Format, scope: &Scope<'_>) -> Result<Value> {
		match self {
			Self::Prim(prim) => prim.load(cursor),
			Self::Bytes(width) => Ok(Value::Bytes(cursor.read_exact(*width)?.to_vec())),
			Self::CharArray(width) => Ok(Value::String(cursor.read_fixed_str(*width)?.into())),
			Self::CharVector => Ok(Value::String(cursor.read_prefixed_str()?.into())),
			Self::Struct(structure) => Ok(Value::Struct(structure.load(cursor, format, scope)?)),
			Self::Array { item, count } => {
				let count = scope.resolve(count)?;
				load_items(item, count, cursor, format, scope)
			}
			Self::Vector(item) => {
				let count = cursor.read_u32()? as usize;
				load_items(item, count, cursor, format, scope)
			}
			Self::Dynamic(dynamic) => dynamic.select(format).load(cursor, format, scope),
		}
	}

	/// Encode one value.
	pub fn dump(&self, writer: &mut ByteWriter, value: &Value, format: Format, scope: &Scope<'_>) -> Result<()> {
		match self {
			Self::Prim(prim) => prim.dump(writer, value),
			Self::Bytes(width) => {
				let Value::Bytes(bytes) = value else {
					return Err(mismatch("bytes", value));
				};
				if bytes.len() > *width {
					return Err(ModelError::ArityMismatch {
						expected: *width,
						got: bytes.len(),
					});
				}
				writer.write_bytes(bytes);
				writer.write_zeros(width - bytes.len());
				Ok(())
			}
			Self::CharArray(width) => writer.write_fixed_str(value.as_str().ok_or_else(|| mismatch("string", value))?, *width),
			Self::CharVector => writer.write_prefixed_str(value.as_str().ok_or_else(|| mismatch("string", value))?),
			Self::Struct(structure) => structure.dump(writer, value.as_struct().ok_or_else(|| mismatch("struct", value))?, format, scope),
			Self::Array { item, count } => {
				let items = value.as_array().ok_or_else(|| mismatch("array", value))?;
				let expected = scope.resolve(count)?;
				if items.len() != expected {
					return Err(ModelError::ArityMismatch { expected, got: items.len() });
				}
				items.iter().try_for_each(|entry| item.dump(writer, entry, format, scope))
			}
			Self::Vector(item) => {
				let items = value.as_array().ok_or_else(|| mismatch("array", value))?;
				writer.write_count("vector length", items.len())?;
				items.iter().try_for_each(|entry| item.dump(writer, entry, format, scope))
			}
			Self::Dynamic(dynamic) => dynamic.select(format).dump(writer, value, format, scope),
		}
	}

	/// Decode from the start of `bytes`, returning the value and the bytes consumed.
	pub fn decode(&self, bytes: &[u8], format: Format, scope: &Scope<'_>) -> Result<(Value, usize)> {
		let mut cursor = Cursor::new(bytes);
		let value = self.load(&mut cursor, format, scope)?;
		Ok((value, cursor.pos()))
	}

	/// Encode into a fresh buffer.
	pub fn encode(&self, value: &Value, format: Format, scope: &Scope<'_>) -> Result<Vec<u8>> {
		let mut writer = ByteWriter::new();
		self.dump(&mut writer, value, format, scope)?;
		Ok(writer.into_inner())
	}
}

fn load_items(item: &Codec, count: usize, cursor: &mut Cursor<'_>, format: Format, scope: &Scope<'_>) -> Result<Value> {
	let start = cursor.pos();
	if let Some(size) = item.fixed_size(format) {
		cursor.check_items(start, "array count", count, size)?;
	}

	let mut items = Vec::with_capacity(count.min(cursor.remaining()));
	for index in 0..count {
		// Variable-width items that keep decoding to nothing get the same cap as fixed zero-width ones.
		if index == MAX_EMPTY_ITEMS && cursor.pos() == start {
			return Err(ModelError::ValueOutOfRange {
				field: "array count",
				value: count as i64,
			});
		}
		items.push(item.load(cursor, format, scope)?);
	}
	Ok(Value::Array(items))
}

fn mismatch(expected: &'static str, value: &Value) -> ModelError {
	ModelError::TypeMismatch { expected, got: value.kind() }
}

/// Chain of already-decoded record fields visible to count lookups.
///
/// Inner records see their own fields first, then each enclosing record.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
	fields: &'a [FieldValue],
	parent: Option<&'a Scope<'a>>,
}

impl<'a> Scope<'a> {
	/// Scope with no visible fields.
	pub const EMPTY: Scope<'static> = Scope { fields: &[], parent: None };

	/// Root scope over externally supplied values (for example container-level counts).
	pub fn new(fields: &'a [FieldValue]) -> Self {
		Self { fields, parent: None }
	}

	/// Nested scope whose lookups fall back to `self`.
	pub fn child<'b>(&'b self, fields: &'b [FieldValue]) -> Scope<'b> {
		Scope { fields, parent: Some(self) }
	}

	/// Find the nearest field named `name`.
	pub fn lookup(&self, name: &str) -> Option<&'a Value> {
		self.fields
			.iter()
			.rev()
			.find(|field| &*field.name == name)
			.map(|field| &field.value)
			.or_else(|| self.parent.and_then(|parent| parent.lookup(name)))
	}

	fn resolve(&self, count: &Count) -> Result<usize> {
		let field = match count {
			Count::Fixed(count) => return Ok(*count),
			Count::Field(field) => field,
		};
		let value = self.lookup(field).ok_or_else(|| ModelError::MissingCountField { field: field.clone() })?;
		value
			.as_u64()
			.and_then(|count| usize::try_from(count).ok())
			.ok_or(ModelError::TypeMismatch {
				expected: "non-negative count",
				got: value.kind(),
			})
	}
}

/// Ordered list of named fields with their codecs.
#[derive(Debug, Clone)]
pub struct Structure {
	name: Box<str>,
	fields: Vec<(Box<str>, Codec)>,
}

impl Structure {
	/// Start declaring a record named `name`.
	pub fn builder(name: &str) -> StructureBuilder {
		StructureBuilder {
			name: name.into(),
			fields: Vec::new(),
			counters: Vec::new(),
		}
	}

	/// Record name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Declared fields in order.
	pub fn fields(&self) -> impl Iterator<Item = (&str, &Codec)> {
		self.fields.iter().map(|(name, codec)| (&**name, codec))
	}

	/// Decode fields in declaration order; later fields may size themselves from earlier ones.
	pub fn load(&self, cursor: &mut Cursor<'_>, format: Format, scope: &Scope<'_>) -> Result<StructValue> {
		let mut fields: Vec<FieldValue> = Vec::with_capacity(self.fields.len());
		for (name, codec) in &self.fields {
			let value = {
				let inner = scope.child(&fields);
				codec.load(cursor, format, &inner)?
			};
			fields.push(FieldValue { name: name.clone(), value });
		}

		Ok(StructValue {
			type_name: self.name.clone(),
			fields,
		})
	}

	/// Encode fields in declaration order, checking sibling counts against array lengths.
	pub fn dump(&self, writer: &mut ByteWriter, value: &StructValue, format: Format, scope: &Scope<'_>) -> Result<()> {
		let inner = scope.child(&value.fields);
		for (name, codec) in &self.fields {
			let field = value.field(name).ok_or_else(|| ModelError::MissingField {
				record: self.name.clone(),
				field: name.clone(),
			})?;
			codec.dump(writer, field, format, &inner)?;
		}
		Ok(())
	}
}

/// Incremental [`Structure`] declaration.
#[derive(Debug)]
pub struct StructureBuilder {
	name: Box<str>,
	fields: Vec<(Box<str>, Codec)>,
	counters: Vec<Box<str>>,
}

impl StructureBuilder {
	/// Declare a count supplied by an enclosing scope rather than a field of this record.
	pub fn external(mut self, name: &str) -> Self {
		self.counters.push(name.into());
		self
	}

	/// Append a field.
	///
	/// # Panics
	///
	/// Panics when the codec sizes an array by a name that is neither an earlier scalar
	/// integer field nor declared through [`StructureBuilder::external`]. Schemas are
	/// static, so this is a declaration bug rather than a data error.
	pub fn field(mut self, name: &str, codec: Codec) -> Self {
		let mut refs = Vec::new();
		codec.count_refs(&mut refs);
		for source in refs {
			assert!(
				self.counters.iter().any(|counter| &**counter == source),
				"field `{name}` of `{}` is sized by `{source}`, which is not an earlier integer field",
				self.name
			);
		}

		if codec.is_scalar_int() {
			self.counters.push(name.into());
		}
		self.fields.push((name.into(), codec));
		self
	}

	/// Finish the declaration.
	pub fn build(self) -> Structure {
		Structure {
			name: self.name,
			fields: self.fields,
		}
	}
}
