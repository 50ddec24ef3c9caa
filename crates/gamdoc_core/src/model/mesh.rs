use crate::model::bytes::{ByteWriter, Cursor};
use crate::model::vertex::{self, ResolvedLayout, Vertex, VertexFormat, component, resolve_components};
use crate::model::{Dialect, ModelError, Result};

/// Fixed influence slot count of a `.gam` influence group.
pub const GAM_INFLUENCE_SLOTS: usize = 4;

/// One bone weight acting on a skinned vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Influence {
	/// Bone (node) index.
	pub bone: i32,
	/// Blend weight.
	pub weight: f32,
	/// Bone-space position offset (`.gam` only).
	pub offset: Option<[f32; 3]>,
	/// Bone-space normal (`.gam` only).
	pub normal: Option<[f32; 3]>,
}

/// Influences of one vertex.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfluenceGroup {
	/// Populated influences; `.gam` allows at most four.
	pub items: Vec<Influence>,
}

/// Per-vertex skinning payload of a mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Skinning {
	/// Unskinned mesh.
	#[default]
	None,
	/// Second vertex buffer (`.gam` draw type 1).
	Doubles(Vec<Vertex>),
	/// Per-vertex bone influences (`.gam` draw type 2, or `.sam` influence marker).
	Influences(Vec<InfluenceGroup>),
}

/// Polygon mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
	/// Mesh name (`.gam` only, at most 40 encoded bytes).
	pub name: String,
	/// Draw type: 1 double-buffered, 2 influence-skinned, 4 static.
	pub draw_type: u32,
	/// Parent node index or `-1`.
	pub parent: i32,
	/// Group index (`.gam` only).
	pub group: i32,
	/// Material slot index or `-1`.
	pub material: i32,
	/// Vertex shape shared by `vertices` and any doubles.
	pub format: VertexFormat,
	/// Vertex buffer.
	pub vertices: Vec<Vertex>,
	/// Skinning payload.
	pub skinning: Skinning,
	/// Triangle list.
	pub indices: Vec<[u16; 3]>,
}

impl Default for Mesh {
	fn default() -> Self {
		Self {
			name: String::new(),
			draw_type: Self::STATIC,
			parent: -1,
			group: 0,
			material: -1,
			format: VertexFormat::Xyz,
			vertices: Vec::new(),
			skinning: Skinning::None,
			indices: Vec::new(),
		}
	}
}

/// Axis-aligned box trailing the MESHES section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshBounds {
	/// Minimum corner.
	pub min: [f32; 3],
	/// Maximum corner.
	pub max: [f32; 3],
}

impl MeshBounds {
	/// Encoded size.
	pub const SIZE: usize = 24;

	/// Box around every vertex position of `meshes`, or `None` without vertices.
	pub fn from_meshes(meshes: &[Mesh]) -> Option<Self> {
		let mut points = meshes.iter().flat_map(|mesh| mesh.vertices.iter()).map(|vertex| vertex.position.xyz());
		let first = points.next()?;
		let mut bounds = Self { min: first, max: first };
		for point in points {
			for axis in 0..3 {
				bounds.min[axis] = bounds.min[axis].min(point[axis]);
				bounds.max[axis] = bounds.max[axis].max(point[axis]);
			}
		}
		Some(bounds)
	}
}

impl Mesh {
	/// Double-buffered draw type.
	pub const DOUBLED: u32 = 1;
	/// Influence-skinned draw type.
	pub const SKINNED: u32 = 2;
	/// Static draw type.
	pub const STATIC: u32 = 4;
	/// Width of the `.gam` name field.
	pub const NAME_WIDTH: usize = 40;

	/// Name, or a synthesized `Mesh.NNN` label when empty.
	pub fn display_name(&self, index: usize) -> String {
		if self.name.is_empty() { format!("Mesh.{index:03}") } else { self.name.clone() }
	}

	/// Whether any vertex carries a binormal.
	pub fn has_binormals(&self) -> bool {
		self.vertices.iter().any(|vertex| vertex.binormal.is_some())
	}

	/// Decode one mesh record.
	pub fn load(cursor: &mut Cursor<'_>, dialect: Dialect) -> Result<Self> {
		match dialect {
			Dialect::Gam => load_gam(cursor),
			Dialect::Sam => load_sam(cursor),
		}
	}

	/// Encode one mesh record.
	pub fn dump(&self, writer: &mut ByteWriter, dialect: Dialect) -> Result<()> {
		self.check_indices()?;
		match dialect {
			Dialect::Gam => dump_gam(self, writer),
			Dialect::Sam => dump_sam(self, writer),
		}
	}

	fn check_indices(&self) -> Result<()> {
		check_triangles(&self.indices, self.vertices.len())
	}
}

/// Decode the MESHES section: `count` meshes followed by an optional bounding box.
pub fn load_meshes(cursor: &mut Cursor<'_>, dialect: Dialect, count: usize) -> Result<(Vec<Mesh>, Option<MeshBounds>)> {
	let mut meshes = Vec::with_capacity(count.min(cursor.remaining() / 16));
	for _ in 0..count {
		meshes.push(Mesh::load(cursor, dialect)?);
	}

	let bounds = if cursor.remaining() >= MeshBounds::SIZE {
		Some(MeshBounds {
			min: cursor.read_f32s()?,
			max: cursor.read_f32s()?,
		})
	} else {
		None
	};
	Ok((meshes, bounds))
}

/// Encode the MESHES section.
pub fn dump_meshes(writer: &mut ByteWriter, dialect: Dialect, meshes: &[Mesh], bounds: Option<&MeshBounds>) -> Result<()> {
	for mesh in meshes {
		mesh.dump(writer, dialect)?;
	}
	if let Some(bounds) = bounds {
		writer.write_f32s(&bounds.min);
		writer.write_f32s(&bounds.max);
	}
	Ok(())
}

/// Check that every triangle corner addresses one of `vertex_count` vertices.
pub fn check_triangles(indices: &[[u16; 3]], vertex_count: usize) -> Result<()> {
	for corner in indices.iter().flatten() {
		if usize::from(*corner) >= vertex_count {
			return Err(ModelError::IndexOutOfRange {
				kind: "triangle corner",
				index: i64::from(*corner),
				len: vertex_count,
			});
		}
	}
	Ok(())
}

fn read_triangles(cursor: &mut Cursor<'_>, count: usize, vertex_count: usize) -> Result<Vec<[u16; 3]>> {
	ensure_available(cursor, count, 6)?;
	let mut indices = Vec::with_capacity(count);
	for _ in 0..count {
		indices.push(cursor.read_triangle()?);
	}
	check_triangles(&indices, vertex_count)?;
	Ok(indices)
}

fn ensure_available(cursor: &Cursor<'_>, count: usize, item: usize) -> Result<()> {
	let need = count.saturating_mul(item);
	if need > cursor.remaining() {
		return Err(ModelError::TruncatedInput {
			at: cursor.pos(),
			need,
			rem: cursor.remaining(),
		});
	}
	Ok(())
}

fn narrow_i16(field: &'static str, value: i32) -> Result<i16> {
	i16::try_from(value).map_err(|_| ModelError::ValueOutOfRange {
		field,
		value: i64::from(value),
	})
}

fn load_gam(cursor: &mut Cursor<'_>) -> Result<Mesh> {
	let name = cursor.read_fixed_str(Mesh::NAME_WIDTH)?;
	let draw_type = cursor.read_i32()?;
	let draw_type = u32::try_from(draw_type).map_err(|_| ModelError::ValueOutOfRange {
		field: "mesh draw type",
		value: i64::from(draw_type),
	})?;
	let parent = cursor.read_i32()?;
	let group = cursor.read_i32()?;
	let material = cursor.read_i32()?;
	let vertex_size = cursor.read_u32()?;
	let format = VertexFormat::from_id(cursor.read_u32()?)?;
	let vertex_count = cursor.read_u32()? as usize;
	let index_count = cursor.read_u32()? as usize;

	let layout = format.layout();
	if vertex_size as usize != layout.stride() {
		return Err(ModelError::VertexStrideMismatch {
			format: format.name(),
			expected: layout.stride(),
			declared: vertex_size,
		});
	}

	let vertices = read_interleaved(cursor, vertex_count, format)?;
	let skinning = match draw_type {
		Mesh::DOUBLED => Skinning::Doubles(read_interleaved(cursor, vertex_count, format)?),
		Mesh::SKINNED => {
			ensure_available(cursor, vertex_count, GAM_GROUP_SIZE)?;
			let mut groups = Vec::with_capacity(vertex_count);
			for _ in 0..vertex_count {
				groups.push(read_gam_group(cursor)?);
			}
			Skinning::Influences(groups)
		}
		_ => Skinning::None,
	};
	let indices = read_triangles(cursor, index_count, vertex_count)?;

	Ok(Mesh {
		name,
		draw_type,
		parent,
		group,
		material,
		format,
		vertices,
		skinning,
		indices,
	})
}

fn read_interleaved(cursor: &mut Cursor<'_>, count: usize, format: VertexFormat) -> Result<Vec<Vertex>> {
	let layout = format.layout();
	ensure_available(cursor, count, layout.stride())?;
	let mut vertices = Vec::with_capacity(count);
	for _ in 0..count {
		vertices.push(Vertex::read_interleaved(cursor, &layout)?);
	}
	Ok(vertices)
}

const GAM_SLOT_SIZE: usize = 30;
const GAM_GROUP_SIZE: usize = 2 + GAM_INFLUENCE_SLOTS * GAM_SLOT_SIZE;

fn read_gam_group(cursor: &mut Cursor<'_>) -> Result<InfluenceGroup> {
	let count = usize::from(cursor.read_u16()?);
	if count > GAM_INFLUENCE_SLOTS {
		return Err(ModelError::ValueOutOfRange {
			field: "influence count",
			value: count as i64,
		});
	}

	let mut items = Vec::with_capacity(count);
	for slot in 0..GAM_INFLUENCE_SLOTS {
		let influence = Influence {
			bone: i32::from(cursor.read_u16()?),
			weight: cursor.read_f32()?,
			offset: Some(cursor.read_f32s()?),
			normal: Some(cursor.read_f32s()?),
		};
		if slot < count {
			items.push(influence);
		}
	}
	Ok(InfluenceGroup { items })
}

fn write_gam_group(writer: &mut ByteWriter, group: &InfluenceGroup) -> Result<()> {
	if group.items.len() > GAM_INFLUENCE_SLOTS {
		return Err(ModelError::ValueOutOfRange {
			field: "influence count",
			value: group.items.len() as i64,
		});
	}

	writer.write_u16(group.items.len() as u16);
	for influence in &group.items {
		let bone = u16::try_from(influence.bone).map_err(|_| ModelError::ValueOutOfRange {
			field: "influence bone",
			value: i64::from(influence.bone),
		})?;
		writer.write_u16(bone);
		writer.write_f32(influence.weight);
		writer.write_f32s(&influence.offset.unwrap_or_default());
		writer.write_f32s(&influence.normal.unwrap_or_default());
	}
	writer.write_zeros((GAM_INFLUENCE_SLOTS - group.items.len()) * GAM_SLOT_SIZE);
	Ok(())
}

fn dump_gam(mesh: &Mesh, writer: &mut ByteWriter) -> Result<()> {
	let consistent = match &mesh.skinning {
		Skinning::None => mesh.draw_type != Mesh::DOUBLED && mesh.draw_type != Mesh::SKINNED,
		Skinning::Doubles(doubles) => {
			check_len(mesh.vertices.len(), doubles.len())?;
			mesh.draw_type == Mesh::DOUBLED
		}
		Skinning::Influences(groups) => {
			check_len(mesh.vertices.len(), groups.len())?;
			mesh.draw_type == Mesh::SKINNED
		}
	};
	if !consistent {
		return Err(ModelError::ValueOutOfRange {
			field: "mesh draw type",
			value: i64::from(mesh.draw_type),
		});
	}
	if let Some(index) = mesh.vertices.iter().position(|vertex| vertex.binormal.is_some()) {
		return Err(ModelError::VertexMismatch {
			index,
			format: mesh.format.name(),
			reason: "binormal",
		});
	}

	writer.write_fixed_str(&mesh.name, Mesh::NAME_WIDTH)?;
	writer.write_i32(i32::try_from(mesh.draw_type).map_err(|_| ModelError::ValueOutOfRange {
		field: "mesh draw type",
		value: i64::from(mesh.draw_type),
	})?);
	writer.write_i32(mesh.parent);
	writer.write_i32(mesh.group);
	writer.write_i32(mesh.material);
	writer.write_count("vertex stride", mesh.format.stride())?;
	writer.write_u32(mesh.format.id());
	writer.write_count("vertex count", mesh.vertices.len())?;
	writer.write_count("index count", mesh.indices.len())?;

	for (index, vertex) in mesh.vertices.iter().enumerate() {
		vertex.write_interleaved(writer, mesh.format, index)?;
	}
	match &mesh.skinning {
		Skinning::None => {}
		Skinning::Doubles(doubles) => {
			for (index, vertex) in doubles.iter().enumerate() {
				vertex.write_interleaved(writer, mesh.format, index)?;
			}
		}
		Skinning::Influences(groups) => {
			for group in groups {
				write_gam_group(writer, group)?;
			}
		}
	}
	for tri in &mesh.indices {
		writer.write_triangle(*tri);
	}
	Ok(())
}

fn check_len(expected: usize, got: usize) -> Result<()> {
	if expected == got { Ok(()) } else { Err(ModelError::ArityMismatch { expected, got }) }
}

fn load_sam(cursor: &mut Cursor<'_>) -> Result<Mesh> {
	let draw_type = cursor.read_u32()?;
	let material = i32::from(cursor.read_i16()?);
	let vertex_count = cursor.read_u32()? as usize;
	let index_count = cursor.read_u32()? as usize;
	let parent = i32::from(cursor.read_i16()?);

	let header_count = cursor.read_count(8)?;
	let mut components = Vec::with_capacity(header_count);
	for _ in 0..header_count {
		components.push((cursor.read_i32()?, cursor.read_i32()?));
	}
	let ResolvedLayout { format, skinned, binormal } = resolve_components(&components)?;

	let min_stride = format.stride() + if binormal { 12 } else { 0 } + if skinned { 4 } else { 0 };
	ensure_available(cursor, vertex_count, min_stride)?;

	let mut vertices = vec![Vertex::default(); vertex_count];
	let mut groups = Vec::new();
	for (kind, size) in &components {
		match *kind {
			component::POSITION => {
				for vertex in &mut vertices {
					vertex.position = vertex::read_position(cursor, *size == 16)?;
				}
			}
			component::NORMAL => {
				for vertex in &mut vertices {
					vertex.normal = Some(cursor.read_f32s()?);
				}
			}
			component::COLOR => {
				for vertex in &mut vertices {
					vertex.color = Some(cursor.read_array()?);
				}
			}
			component::UV0 | component::UV1 | component::UV2 => {
				let channel = (*kind - component::UV0) as usize;
				for vertex in &mut vertices {
					vertex.uv[channel] = Some(vertex::read_tex_coord(cursor, (*size / 4) as usize)?);
				}
			}
			component::TANGENT => {
				for vertex in &mut vertices {
					vertex.tangent = Some(cursor.read_f32s()?);
				}
			}
			component::BINORMAL => {
				for vertex in &mut vertices {
					vertex.binormal = Some(cursor.read_f32s()?);
				}
			}
			component::INFLUENCE => {
				groups.reserve(vertex_count);
				for _ in 0..vertex_count {
					groups.push(read_sam_group(cursor)?);
				}
			}
			_ => {}
		}
	}
	let indices = read_triangles(cursor, index_count, vertex_count)?;

	Ok(Mesh {
		name: String::new(),
		draw_type,
		parent,
		group: 0,
		material,
		format,
		vertices,
		skinning: if skinned { Skinning::Influences(groups) } else { Skinning::None },
		indices,
	})
}

fn read_sam_group(cursor: &mut Cursor<'_>) -> Result<InfluenceGroup> {
	let count = cursor.read_count(6)?;
	let mut items = Vec::with_capacity(count);
	for _ in 0..count {
		items.push(Influence {
			bone: i32::from(cursor.read_i16()?),
			weight: cursor.read_f32()?,
			offset: None,
			normal: None,
		});
	}
	Ok(InfluenceGroup { items })
}

fn dump_sam(mesh: &Mesh, writer: &mut ByteWriter) -> Result<()> {
	let dialect = Dialect::Sam;
	let groups = match &mesh.skinning {
		Skinning::None => None,
		Skinning::Doubles(_) => {
			return Err(ModelError::DialectMismatch {
				what: "double-buffered vertices",
				dialect,
			});
		}
		Skinning::Influences(groups) => {
			check_len(mesh.vertices.len(), groups.len())?;
			Some(groups)
		}
	};

	let layout = mesh.format.layout();
	let binormal = mesh.has_binormals();
	for (index, vertex) in mesh.vertices.iter().enumerate() {
		let reason = layout.check(vertex).err().or((vertex.binormal.is_some() != binormal).then_some("binormal"));
		if let Some(reason) = reason {
			return Err(ModelError::VertexMismatch {
				index,
				format: mesh.format.name(),
				reason,
			});
		}
	}

	let mut components = mesh.format.components();
	if binormal {
		components.push((component::BINORMAL, 12));
	}
	if groups.is_some() {
		components.push((component::INFLUENCE, component::INFLUENCE_SIZE));
	}

	writer.write_u32(mesh.draw_type);
	writer.write_i16(narrow_i16("mesh material", mesh.material)?);
	writer.write_count("vertex count", mesh.vertices.len())?;
	writer.write_count("index count", mesh.indices.len())?;
	writer.write_i16(narrow_i16("mesh parent", mesh.parent)?);
	writer.write_count("vertex component count", components.len())?;
	for (kind, size) in &components {
		writer.write_i32(*kind);
		writer.write_i32(*size);
	}

	for (kind, _) in &components {
		match *kind {
			component::POSITION => mesh.vertices.iter().for_each(|vertex| vertex::write_position(writer, &vertex.position)),
			component::NORMAL => mesh.vertices.iter().filter_map(|vertex| vertex.normal.as_ref()).for_each(|normal| writer.write_f32s(normal)),
			component::COLOR => mesh.vertices.iter().filter_map(|vertex| vertex.color.as_ref()).for_each(|color| writer.write_bytes(color)),
			component::UV0 | component::UV1 | component::UV2 => {
				let channel = (*kind - component::UV0) as usize;
				mesh.vertices
					.iter()
					.filter_map(|vertex| vertex.uv[channel].as_ref())
					.for_each(|uv| vertex::write_tex_coord(writer, uv));
			}
			component::TANGENT => mesh.vertices.iter().filter_map(|vertex| vertex.tangent.as_ref()).for_each(|tangent| writer.write_f32s(tangent)),
			component::BINORMAL => mesh.vertices.iter().filter_map(|vertex| vertex.binormal.as_ref()).for_each(|binormal| writer.write_f32s(binormal)),
			component::INFLUENCE => {
				for group in groups.into_iter().flatten() {
					write_sam_group(writer, group)?;
				}
			}
			_ => {}
		}
	}
	for tri in &mesh.indices {
		writer.write_triangle(*tri);
	}
	Ok(())
}

fn write_sam_group(writer: &mut ByteWriter, group: &InfluenceGroup) -> Result<()> {
	writer.write_count("influence count", group.items.len())?;
	for influence in &group.items {
		if influence.offset.is_some() || influence.normal.is_some() {
			return Err(ModelError::DialectMismatch {
				what: "influence offset or normal",
				dialect: Dialect::Sam,
			});
		}
		writer.write_i16(narrow_i16("influence bone", influence.bone)?);
		writer.write_f32(influence.weight);
	}
	Ok(())
}
