use thiserror::Error;

use crate::model::{Dialect, SectionName};

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors produced while decoding, validating, and encoding model containers.
#[derive(Debug, Error)]
pub enum ModelError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Not enough bytes remained for a requested read.
	#[error("truncated input at offset {at}, need {need} bytes, remaining {rem}")]
	TruncatedInput {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Array length field could not be resolved from the enclosing record.
	#[error("array count field `{field}` is not available")]
	MissingCountField {
		/// Referenced sibling field name.
		field: Box<str>,
	},
	/// Record value lacks a field its schema declares.
	#[error("record `{record}` is missing field `{field}`")]
	MissingField {
		/// Schema record name.
		record: Box<str>,
		/// Missing field name.
		field: Box<str>,
	},
	/// Generic value had the wrong shape for its codec.
	#[error("type mismatch: expected {expected}, got {got}")]
	TypeMismatch {
		/// Expected value kind.
		expected: &'static str,
		/// Actual value kind.
		got: &'static str,
	},
	/// Self-describing vertex header matched no known vertex shape.
	#[error("unknown vertex layout {components:?}")]
	UnknownVertexLayout {
		/// Offending `(component_type, component_size)` pairs, markers included.
		components: Vec<(i32, i32)>,
	},
	/// Explicit vertex format id is outside the known table.
	#[error("unknown vertex format id {id}")]
	UnknownVertexFormat {
		/// Parsed format id.
		id: u32,
	},
	/// Declared vertex stride disagrees with the vertex format.
	#[error("vertex format {format} has stride {expected}, header declares {declared}")]
	VertexStrideMismatch {
		/// Vertex format label.
		format: &'static str,
		/// Stride implied by the format.
		expected: usize,
		/// Stride stored in the mesh header.
		declared: u32,
	},
	/// Vertex data does not carry exactly the attributes its format requires.
	#[error("vertex {index} does not match format {format}: {reason}")]
	VertexMismatch {
		/// Vertex position inside its mesh.
		index: usize,
		/// Vertex format label.
		format: &'static str,
		/// Offending attribute.
		reason: &'static str,
	},
	/// Section needed to bootstrap counts is absent.
	#[error("required section {section} missing for {dialect}")]
	MissingSection {
		/// Logical section name.
		section: SectionName,
		/// Container dialect.
		dialect: Dialect,
	},
	/// Section header points outside the input buffer.
	#[error("section tag 0x{tag:04x} at offset {offset} size {size} exceeds input length {len}")]
	SectionOutOfBounds {
		/// Numeric section tag.
		tag: u32,
		/// Declared absolute offset.
		offset: u64,
		/// Declared payload size.
		size: u32,
		/// Input length.
		len: usize,
	},
	/// Section header table is not monotonic or has overlapping payloads.
	#[error("section tag 0x{tag:04x} at offset {offset} overlaps the previous section (ends at {prev_end})")]
	SectionOverlap {
		/// Numeric section tag.
		tag: u32,
		/// Declared absolute offset.
		offset: u64,
		/// End offset of the preceding section or preamble.
		prev_end: u64,
	},
	/// The same tag occurs twice in the header table.
	#[error("duplicate section tag 0x{tag:04x}")]
	DuplicateSection {
		/// Numeric section tag.
		tag: u32,
	},
	/// Section decode did not consume its full payload.
	#[error("{rem} unread bytes remain at the end of the section")]
	SectionLayoutMismatch {
		/// Trailing byte count.
		rem: usize,
	},
	/// Encoded list length disagrees with the declared fixed width.
	#[error("arity mismatch: expected {expected} values, got {got}")]
	ArityMismatch {
		/// Declared repeat count.
		expected: usize,
		/// Supplied value count.
		got: usize,
	},
	/// Index field points outside its target collection.
	#[error("{kind} index {index} out of range (len {len})")]
	IndexOutOfRange {
		/// Logical index kind being validated.
		kind: &'static str,
		/// Offending index value.
		index: i64,
		/// Target collection length.
		len: usize,
	},
	/// Node parent links form a cycle.
	#[error("node {node} is part of a parent cycle")]
	NodeCycle {
		/// First node found on the cycle.
		node: usize,
	},
	/// Encoded string does not fit its fixed width.
	#[error("string of {len} bytes does not fit width {width}")]
	StringTooLong {
		/// Encoded byte length.
		len: usize,
		/// Field width in bytes.
		width: usize,
	},
	/// Character outside the Windows-1251 repertoire.
	#[error("character {ch:?} has no windows-1251 encoding")]
	UnencodableChar {
		/// Offending character.
		ch: char,
	},
	/// Numeric value does not fit its on-disk width.
	#[error("{field} value {value} does not fit its encoded width")]
	ValueOutOfRange {
		/// Logical field name.
		field: &'static str,
		/// Offending value.
		value: i64,
	},
	/// Entity feature cannot be represented in the target dialect.
	#[error("{what} cannot be encoded as {dialect}")]
	DialectMismatch {
		/// Offending feature.
		what: &'static str,
		/// Target dialect.
		dialect: Dialect,
	},
	/// Animation frames disagree on key count.
	#[error("animation {animation} frame {frame} has {got} keys, expected {expected}")]
	RaggedFrames {
		/// Animation index.
		animation: usize,
		/// Frame index.
		frame: usize,
		/// Required key count.
		expected: usize,
		/// Actual key count.
		got: usize,
	},
	/// Skins disagree on material slot count.
	#[error("skin {skin} has {got} materials, expected {expected}")]
	SkinLayoutMismatch {
		/// Skin index.
		skin: usize,
		/// Material count of the first skin.
		expected: usize,
		/// Material count of this skin.
		got: usize,
	},
	/// Group variant member id is absent from the group's node list.
	#[error("group {group} variant member {member} is not listed in the group nodes")]
	GroupMemberUnresolved {
		/// Group index.
		group: usize,
		/// Unresolved member id.
		member: u32,
	},
	/// Label could not be parsed into a known option.
	#[error("unknown {kind} `{value}`")]
	UnknownLabel {
		/// Option kind (`dialect`, `game`, `section`).
		kind: &'static str,
		/// Offending label.
		value: String,
	},
	/// Error raised while decoding or encoding one section.
	#[error("{section} section ({dialect}) at offset {offset}: {source}")]
	Section {
		/// Logical section name.
		section: SectionName,
		/// Container dialect.
		dialect: Dialect,
		/// Absolute section offset in the file.
		offset: u64,
		/// Underlying failure.
		#[source]
		source: Box<ModelError>,
	},
}

impl ModelError {
	/// Wrap an error with section positional context.
	pub fn in_section(self, section: SectionName, dialect: Dialect, offset: u64) -> Self {
		Self::Section {
			section,
			dialect,
			offset,
			source: Box::new(self),
		}
	}

	/// Return the innermost error below any section context.
	pub fn root(&self) -> &ModelError {
		match self {
			Self::Section { source, .. } => source.root(),
			other => other,
		}
	}
}
