use std::fmt;
use std::str::FromStr;

use crate::model::bytes::{ByteWriter, Cursor};
use crate::model::{Dialect, ModelError, Result};

/// Signature written into newly created containers.
pub const DEFAULT_SIGNATURE: [u8; 8] = *b"ecbnt,t\0";

/// Logical section names shared by both dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionName {
	/// Summary counts.
	Info,
	/// Transform node hierarchy.
	Nodes,
	/// Polygon meshes.
	Meshes,
	/// Keyframe tracks.
	Animations,
	/// Material skins.
	Materials,
	/// Single convex collision hull.
	Convex,
	/// Simple collision primitives.
	Collisions,
	/// Bone-attached collision primitives.
	HierGeom,
	/// Per-bone rotation limits.
	Bounds,
	/// Named mesh groups.
	Groups,
	/// Trailer format tag string.
	Tag,
	/// Trailer format version.
	Version,
	/// Trailer generator string.
	Parser,
	/// Trailer signature string.
	Sign,
}

impl SectionName {
	/// Every section in canonical write order.
	pub const ALL: [Self; 14] = [
		Self::Info,
		Self::Nodes,
		Self::Meshes,
		Self::Animations,
		Self::Materials,
		Self::Convex,
		Self::Collisions,
		Self::HierGeom,
		Self::Bounds,
		Self::Groups,
		Self::Tag,
		Self::Version,
		Self::Parser,
		Self::Sign,
	];

	/// Upper-case section label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Info => "INFO",
			Self::Nodes => "NODES",
			Self::Meshes => "MESHES",
			Self::Animations => "ANIMATIONS",
			Self::Materials => "MATERIALS",
			Self::Convex => "CONVEX",
			Self::Collisions => "COLLISIONS",
			Self::HierGeom => "HIER_GEOM",
			Self::Bounds => "BOUNDS",
			Self::Groups => "GROUPS",
			Self::Tag => "TAG",
			Self::Version => "VERSION",
			Self::Parser => "PARSER",
			Self::Sign => "SIGN",
		}
	}

	/// Numeric tag for this section in `dialect`.
	pub fn tag(self, dialect: Dialect) -> u32 {
		let (gam, sam) = match self {
			Self::Info => (0x0001, 0x0006),
			Self::Nodes => (0x0002, 0x0003),
			Self::Meshes => (0x0004, 0x0001),
			Self::Animations => (0x0008, 0x0004),
			Self::Materials => (0x000F, 0x0008),
			Self::Convex => (0x0010, 0x0005),
			Self::Collisions => (0x0020, 0x0007),
			Self::HierGeom => (0x0040, 0x000A),
			Self::Bounds => (0x0080, 0x000B),
			Self::Groups => (0x00F0, 0x0009),
			Self::Tag => (0xF001, 0xF001),
			Self::Version => (0xF002, 0xF002),
			Self::Parser => (0xF003, 0xF003),
			Self::Sign => (0xF004, 0xF004),
		};
		match dialect {
			Dialect::Gam => gam,
			Dialect::Sam => sam,
		}
	}

	/// Reverse lookup of a numeric tag within `dialect`.
	pub fn from_tag(tag: u32, dialect: Dialect) -> Option<Self> {
		Self::ALL.into_iter().find(|name| name.tag(dialect) == tag)
	}
}

impl fmt::Display for SectionName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for SectionName {
	type Err = ModelError;

	fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
		let upper = value.to_ascii_uppercase();
		Self::ALL.into_iter().find(|name| name.as_str() == upper).ok_or_else(|| ModelError::UnknownLabel {
			kind: "section",
			value: value.to_owned(),
		})
	}
}

/// One `{tag, size, offset}` entry of the section header table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionHeader {
	/// Dialect-specific numeric tag.
	pub tag: u32,
	/// Payload size in bytes.
	pub size: u32,
	/// Absolute payload offset from file start.
	pub offset: u64,
}

impl SectionHeader {
	/// Encoded header entry size.
	pub const SIZE: usize = 16;

	/// Absolute end offset of the payload, saturating at `u64::MAX`.
	pub fn end(&self) -> u64 {
		self.offset.saturating_add(u64::from(self.size))
	}

	/// Borrow this section's payload from the whole-file buffer.
	pub fn payload<'a>(&self, bytes: &'a [u8]) -> Result<&'a [u8]> {
		let out_of_bounds = || ModelError::SectionOutOfBounds {
			tag: self.tag,
			offset: self.offset,
			size: self.size,
			len: bytes.len(),
		};
		let start = usize::try_from(self.offset).map_err(|_| out_of_bounds())?;
		let end = start.checked_add(self.size as usize).ok_or_else(out_of_bounds)?;
		bytes.get(start..end).ok_or_else(out_of_bounds)
	}
}

/// Container preamble: signature plus section header table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionTable {
	/// Opaque 8-byte signature, preserved verbatim.
	pub signature: [u8; 8],
	/// Header entries in table order.
	pub headers: Vec<SectionHeader>,
}

impl SectionTable {
	/// Size of the signature plus the section count word.
	pub const PREFIX_SIZE: usize = 12;

	/// Parse the preamble from the beginning of `bytes`.
	pub fn parse(bytes: &[u8]) -> Result<Self> {
		let mut cursor = Cursor::new(bytes);
		let signature = cursor.read_array::<8>()?;
		let count = cursor.read_count(SectionHeader::SIZE)?;

		let mut headers = Vec::with_capacity(count);
		for _ in 0..count {
			headers.push(SectionHeader {
				tag: cursor.read_u32()?,
				size: cursor.read_u32()?,
				offset: cursor.read_u64()?,
			});
		}

		Ok(Self { signature, headers })
	}

	/// Lay out sections contiguously after the preamble, in the given order.
	pub fn layout(signature: [u8; 8], sections: &[(u32, usize)]) -> Result<Self> {
		let mut offset = Self::preamble_size(sections.len()) as u64;
		let mut headers = Vec::with_capacity(sections.len());
		for (tag, size) in sections {
			let size = u32::try_from(*size).map_err(|_| ModelError::ValueOutOfRange {
				field: "section size",
				value: i64::try_from(*size).unwrap_or(i64::MAX),
			})?;
			headers.push(SectionHeader { tag: *tag, size, offset });
			offset += u64::from(size);
		}
		Ok(Self { signature, headers })
	}

	/// Preamble size for `count` sections.
	pub fn preamble_size(count: usize) -> usize {
		Self::PREFIX_SIZE + count * SectionHeader::SIZE
	}

	/// Emit the preamble.
	pub fn write(&self, writer: &mut ByteWriter) -> Result<()> {
		writer.write_bytes(&self.signature);
		writer.write_count("section count", self.headers.len())?;
		for header in &self.headers {
			writer.write_u32(header.tag);
			writer.write_u32(header.size);
			writer.write_u64(header.offset);
		}
		Ok(())
	}

	/// Resolve `name` through the dialect tag table and return its header, if present.
	pub fn find(&self, name: SectionName, dialect: Dialect) -> Option<&SectionHeader> {
		let tag = name.tag(dialect);
		self.headers.iter().find(|header| header.tag == tag)
	}

	/// Total bytes covered by the preamble plus every payload.
	pub fn total_size(&self) -> u64 {
		self.headers
			.iter()
			.map(SectionHeader::end)
			.max()
			.unwrap_or(0)
			.max(Self::preamble_size(self.headers.len()) as u64)
	}

	/// Whether payloads follow the preamble in table order without overlapping.
	///
	/// Empty sections may share their offset with the next section.
	pub fn is_monotonic(&self) -> bool {
		self.check_layout(u64::MAX).is_ok()
	}

	/// Check ordering, overlap, duplicates, and that every payload fits in `len` bytes.
	pub fn check_layout(&self, len: u64) -> Result<()> {
		let mut prev_end = Self::preamble_size(self.headers.len()) as u64;
		for (idx, header) in self.headers.iter().enumerate() {
			if self.headers[..idx].iter().any(|prev| prev.tag == header.tag) {
				return Err(ModelError::DuplicateSection { tag: header.tag });
			}
			if header.offset < prev_end {
				return Err(ModelError::SectionOverlap {
					tag: header.tag,
					offset: header.offset,
					prev_end,
				});
			}
			let end = header.offset.checked_add(u64::from(header.size)).filter(|end| *end <= len);
			let Some(end) = end else {
				return Err(ModelError::SectionOutOfBounds {
					tag: header.tag,
					offset: header.offset,
					size: header.size,
					len: usize::try_from(len).unwrap_or(usize::MAX),
				});
			};
			prev_end = end;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests;
