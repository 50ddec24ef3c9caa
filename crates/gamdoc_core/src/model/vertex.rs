use crate::model::bytes::{ByteWriter, Cursor};
use crate::model::{ModelError, Result};

/// Self-describing vertex component type ids used by `.sam` mesh headers.
pub mod component {
	/// Position, 12 bytes (`xyz`) or 16 bytes (`xyzw`).
	pub const POSITION: i32 = 0x00;
	/// Normal, 12 bytes.
	pub const NORMAL: i32 = 0x01;
	/// Packed RGBA color, 4 bytes.
	pub const COLOR: i32 = 0x02;
	/// First texture coordinate set, 8 bytes (`uv`) or 12 bytes (`uvw`).
	pub const UV0: i32 = 0x03;
	/// Second texture coordinate set.
	pub const UV1: i32 = 0x04;
	/// Third texture coordinate set.
	pub const UV2: i32 = 0x05;
	/// Tangent with handedness, 16 bytes.
	pub const TANGENT: i32 = 0x14;
	/// Binormal marker, 12 bytes per vertex.
	pub const BINORMAL: i32 = 0x15;
	/// Skin influence marker; per-vertex variable-length influence groups.
	pub const INFLUENCE: i32 = 0x16;
	/// Size recorded for the influence marker.
	pub const INFLUENCE_SIZE: i32 = -1;
}

/// Canonical vertex shapes, indexed by their `.gam` format id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
	/// Position only.
	Xyz,
	/// Position, one UV set.
	Xyzt1,
	/// Position, color.
	Xyzc,
	/// Homogeneous position, color.
	Xyzwc,
	/// Homogeneous position, color, one UV set.
	Xyzwct1,
	/// Position, normal, color.
	Xyznc,
	/// Position, color, one UV set.
	Xyzct1,
	/// Position, normal, one UV set.
	Xyznt1,
	/// Position, normal, color, one UV set.
	Xyznct1,
	/// Position, normal, color, two UV sets.
	Xyznct2,
	/// Position, normal, two UV sets.
	Xyznt2,
	/// Position, normal, three UV sets.
	Xyznt3,
	/// Position, color, one UVW set.
	Xyzct1Uvw,
	/// Position, color, one UVW set and one UV set.
	Xyzct2Uvw,
	/// Position, color, two UV sets.
	Xyzct2,
	/// Position, normal, one UV set, tangent.
	Xyznt1t,
	/// Position, normal, color, one UV set, tangent.
	Xyznct1t,
}

/// Attribute set carried by one vertex shape, in interleaved order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
	/// Position carries a fourth `w` component.
	pub xyzw: bool,
	/// Normal present.
	pub normal: bool,
	/// Color present.
	pub color: bool,
	/// Float count (2 or 3) of each present UV set, in channel order.
	pub uvs: &'static [usize],
	/// Tangent present.
	pub tangent: bool,
}

impl VertexLayout {
	const fn new(xyzw: bool, normal: bool, color: bool, uvs: &'static [usize], tangent: bool) -> Self {
		Self {
			xyzw,
			normal,
			color,
			uvs,
			tangent,
		}
	}

	/// Interleaved stride in bytes.
	pub fn stride(&self) -> usize {
		let position = if self.xyzw { 16 } else { 12 };
		let normal = if self.normal { 12 } else { 0 };
		let color = if self.color { 4 } else { 0 };
		let tangent = if self.tangent { 16 } else { 0 };
		position + normal + color + self.uvs.iter().map(|floats| floats * 4).sum::<usize>() + tangent
	}

	/// Check that `vertex` populates exactly the attributes of this layout, binormal aside.
	pub fn check(&self, vertex: &Vertex) -> std::result::Result<(), &'static str> {
		if matches!(vertex.position, Position::Xyzw(_)) != self.xyzw {
			return Err("position width");
		}
		if vertex.normal.is_some() != self.normal {
			return Err("normal");
		}
		if vertex.color.is_some() != self.color {
			return Err("color");
		}
		for (channel, uv) in vertex.uv.iter().enumerate() {
			if uv.as_ref().map(TexCoord::width) != self.uvs.get(channel).copied() {
				return Err("uv set");
			}
		}
		if vertex.tangent.is_some() != self.tangent {
			return Err("tangent");
		}
		Ok(())
	}
}

impl VertexFormat {
	/// Every shape in id order.
	pub const ALL: [Self; 17] = [
		Self::Xyz,
		Self::Xyzt1,
		Self::Xyzc,
		Self::Xyzwc,
		Self::Xyzwct1,
		Self::Xyznc,
		Self::Xyzct1,
		Self::Xyznt1,
		Self::Xyznct1,
		Self::Xyznct2,
		Self::Xyznt2,
		Self::Xyznt3,
		Self::Xyzct1Uvw,
		Self::Xyzct2Uvw,
		Self::Xyzct2,
		Self::Xyznt1t,
		Self::Xyznct1t,
	];

	/// Resolve an explicit `.gam` format id.
	pub fn from_id(id: u32) -> Result<Self> {
		usize::try_from(id)
			.ok()
			.and_then(|idx| Self::ALL.get(idx).copied())
			.ok_or(ModelError::UnknownVertexFormat { id })
	}

	/// Explicit `.gam` format id.
	pub fn id(self) -> u32 {
		self as u32
	}

	/// Upper-case shape label.
	pub fn name(self) -> &'static str {
		match self {
			Self::Xyz => "XYZ",
			Self::Xyzt1 => "XYZT1",
			Self::Xyzc => "XYZC",
			Self::Xyzwc => "XYZWC",
			Self::Xyzwct1 => "XYZWCT1",
			Self::Xyznc => "XYZNC",
			Self::Xyzct1 => "XYZCT1",
			Self::Xyznt1 => "XYZNT1",
			Self::Xyznct1 => "XYZNCT1",
			Self::Xyznct2 => "XYZNCT2",
			Self::Xyznt2 => "XYZNT2",
			Self::Xyznt3 => "XYZNT3",
			Self::Xyzct1Uvw => "XYZCT1_UVW",
			Self::Xyzct2Uvw => "XYZCT2_UVW",
			Self::Xyzct2 => "XYZCT2",
			Self::Xyznt1t => "XYZNT1T",
			Self::Xyznct1t => "XYZNCT1T",
		}
	}

	/// Attribute set of this shape.
	pub fn layout(self) -> VertexLayout {
		match self {
			Self::Xyz => VertexLayout::new(false, false, false, &[], false),
			Self::Xyzt1 => VertexLayout::new(false, false, false, &[2], false),
			Self::Xyzc => VertexLayout::new(false, false, true, &[], false),
			Self::Xyzwc => VertexLayout::new(true, false, true, &[], false),
			Self::Xyzwct1 => VertexLayout::new(true, false, true, &[2], false),
			Self::Xyznc => VertexLayout::new(false, true, true, &[], false),
			Self::Xyzct1 => VertexLayout::new(false, false, true, &[2], false),
			Self::Xyznt1 => VertexLayout::new(false, true, false, &[2], false),
			Self::Xyznct1 => VertexLayout::new(false, true, true, &[2], false),
			Self::Xyznct2 => VertexLayout::new(false, true, true, &[2, 2], false),
			Self::Xyznt2 => VertexLayout::new(false, true, false, &[2, 2], false),
			Self::Xyznt3 => VertexLayout::new(false, true, false, &[2, 2, 2], false),
			Self::Xyzct1Uvw => VertexLayout::new(false, false, true, &[3], false),
			Self::Xyzct2Uvw => VertexLayout::new(false, false, true, &[3, 2], false),
			Self::Xyzct2 => VertexLayout::new(false, false, true, &[2, 2], false),
			Self::Xyznt1t => VertexLayout::new(false, true, false, &[2], true),
			Self::Xyznct1t => VertexLayout::new(false, true, true, &[2], true),
		}
	}

	/// Interleaved `.gam` stride in bytes.
	pub fn stride(self) -> usize {
		self.layout().stride()
	}

	/// `.sam` header pairs describing this shape, without skin or binormal markers.
	pub fn components(self) -> Vec<(i32, i32)> {
		let layout = self.layout();
		let mut out = vec![(component::POSITION, if layout.xyzw { 16 } else { 12 })];
		if layout.normal {
			out.push((component::NORMAL, 12));
		}
		if layout.color {
			out.push((component::COLOR, 4));
		}
		for (channel, floats) in layout.uvs.iter().enumerate() {
			out.push((component::UV0 + channel as i32, (*floats * 4) as i32));
		}
		if layout.tangent {
			out.push((component::TANGENT, 16));
		}
		out
	}
}

/// Outcome of structural `.sam` vertex header inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLayout {
	/// Matched shape.
	pub format: VertexFormat,
	/// Influence marker was present.
	pub skinned: bool,
	/// Binormal marker was present.
	pub binormal: bool,
}

/// Classify a `.sam` `(component_type, component_size)` header list.
///
/// Influence and binormal markers are stripped first; the remaining type tuple picks the
/// shape, with position and first-UV widths separating the homogeneous and UVW variants.
/// Component sizes must then agree with the matched shape.
pub fn resolve_components(components: &[(i32, i32)]) -> Result<ResolvedLayout> {
	use component::*;

	let unknown = || ModelError::UnknownVertexLayout {
		components: components.to_vec(),
	};

	let skinned = components.iter().any(|(kind, _)| *kind == INFLUENCE);
	let binormal = components.iter().any(|(kind, _)| *kind == BINORMAL);
	let stripped: Vec<(i32, i32)> = components.iter().copied().filter(|(kind, _)| *kind != INFLUENCE && *kind != BINORMAL).collect();
	let kinds: Vec<i32> = stripped.iter().map(|(kind, _)| *kind).collect();
	let size_of = |wanted: i32| stripped.iter().find(|(kind, _)| *kind == wanted).map(|(_, size)| *size);
	let xyzw = size_of(POSITION) == Some(16);
	let uvw = size_of(UV0) == Some(12);

	let format = match kinds.as_slice() {
		[POSITION] => VertexFormat::Xyz,
		[POSITION, UV0] => VertexFormat::Xyzt1,
		[POSITION, COLOR] if xyzw => VertexFormat::Xyzwc,
		[POSITION, COLOR] => VertexFormat::Xyzc,
		[POSITION, COLOR, UV0] if xyzw => VertexFormat::Xyzwct1,
		[POSITION, COLOR, UV0] if uvw => VertexFormat::Xyzct1Uvw,
		[POSITION, COLOR, UV0] => VertexFormat::Xyzct1,
		[POSITION, COLOR, UV0, UV1] if uvw => VertexFormat::Xyzct2Uvw,
		[POSITION, COLOR, UV0, UV1] => VertexFormat::Xyzct2,
		[POSITION, NORMAL, COLOR] => VertexFormat::Xyznc,
		[POSITION, NORMAL, UV0] => VertexFormat::Xyznt1,
		[POSITION, NORMAL, COLOR, UV0] => VertexFormat::Xyznct1,
		[POSITION, NORMAL, COLOR, UV0, UV1] => VertexFormat::Xyznct2,
		[POSITION, NORMAL, UV0, UV1] => VertexFormat::Xyznt2,
		[POSITION, NORMAL, UV0, UV1, UV2] => VertexFormat::Xyznt3,
		[POSITION, NORMAL, UV0, TANGENT] => VertexFormat::Xyznt1t,
		[POSITION, NORMAL, COLOR, UV0, TANGENT] => VertexFormat::Xyznct1t,
		_ => return Err(unknown()),
	};

	if format.components() != stripped {
		return Err(unknown());
	}
	if components.iter().any(|(kind, size)| *kind == BINORMAL && *size != 12) {
		return Err(unknown());
	}

	Ok(ResolvedLayout { format, skinned, binormal })
}

/// Vertex position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
	/// Cartesian position.
	Xyz([f32; 3]),
	/// Homogeneous position.
	Xyzw([f32; 4]),
}

impl Position {
	/// Cartesian part.
	pub fn xyz(&self) -> [f32; 3] {
		match *self {
			Self::Xyz(xyz) => xyz,
			Self::Xyzw([x, y, z, _]) => [x, y, z],
		}
	}
}

impl Default for Position {
	fn default() -> Self {
		Self::Xyz([0.0; 3])
	}
}

/// Texture coordinate set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TexCoord {
	/// Two-component coordinates.
	Uv([f32; 2]),
	/// Three-component coordinates.
	Uvw([f32; 3]),
}

impl TexCoord {
	/// Float count.
	pub fn width(&self) -> usize {
		match self {
			Self::Uv(_) => 2,
			Self::Uvw(_) => 3,
		}
	}
}

/// Sparse vertex record; populated attributes follow the mesh vertex format.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vertex {
	/// Position.
	pub position: Position,
	/// Normal.
	pub normal: Option<[f32; 3]>,
	/// RGBA color bytes.
	pub color: Option<[u8; 4]>,
	/// Texture coordinate sets `uv0..uv2`.
	pub uv: [Option<TexCoord>; 3],
	/// Tangent with handedness.
	pub tangent: Option<[f32; 4]>,
	/// Binormal (`.sam` only).
	pub binormal: Option<[f32; 3]>,
}

impl Vertex {
	/// Read one interleaved vertex.
	pub fn read_interleaved(cursor: &mut Cursor<'_>, layout: &VertexLayout) -> Result<Self> {
		let mut vertex = Self {
			position: read_position(cursor, layout.xyzw)?,
			..Self::default()
		};
		if layout.normal {
			vertex.normal = Some(cursor.read_f32s()?);
		}
		if layout.color {
			vertex.color = Some(cursor.read_array()?);
		}
		for (channel, floats) in layout.uvs.iter().enumerate() {
			vertex.uv[channel] = Some(read_tex_coord(cursor, *floats)?);
		}
		if layout.tangent {
			vertex.tangent = Some(cursor.read_f32s()?);
		}
		Ok(vertex)
	}

	/// Write one interleaved vertex after checking it against `format`.
	pub fn write_interleaved(&self, writer: &mut ByteWriter, format: VertexFormat, index: usize) -> Result<()> {
		let layout = format.layout();
		layout.check(self).map_err(|reason| ModelError::VertexMismatch {
			index,
			format: format.name(),
			reason,
		})?;

		write_position(writer, &self.position);
		if let Some(normal) = &self.normal {
			writer.write_f32s(normal);
		}
		if let Some(color) = &self.color {
			writer.write_bytes(color);
		}
		for uv in self.uv.iter().flatten() {
			write_tex_coord(writer, uv);
		}
		if let Some(tangent) = &self.tangent {
			writer.write_f32s(tangent);
		}
		Ok(())
	}
}

/// Read a position of the given width.
pub fn read_position(cursor: &mut Cursor<'_>, xyzw: bool) -> Result<Position> {
	Ok(if xyzw {
		Position::Xyzw(cursor.read_f32s()?)
	} else {
		Position::Xyz(cursor.read_f32s()?)
	})
}

/// Write a position.
pub fn write_position(writer: &mut ByteWriter, position: &Position) {
	match position {
		Position::Xyz(xyz) => writer.write_f32s(xyz),
		Position::Xyzw(xyzw) => writer.write_f32s(xyzw),
	}
}

/// Read a texture coordinate set of `floats` components.
pub fn read_tex_coord(cursor: &mut Cursor<'_>, floats: usize) -> Result<TexCoord> {
	Ok(if floats == 3 {
		TexCoord::Uvw(cursor.read_f32s()?)
	} else {
		TexCoord::Uv(cursor.read_f32s()?)
	})
}

/// Write a texture coordinate set.
pub fn write_tex_coord(writer: &mut ByteWriter, uv: &TexCoord) {
	match uv {
		TexCoord::Uv(uv) => writer.write_f32s(uv),
		TexCoord::Uvw(uvw) => writer.write_f32s(uvw),
	}
}
