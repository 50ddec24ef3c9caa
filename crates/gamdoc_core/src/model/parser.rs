use std::path::Path;

use log::{debug, info, warn};

use crate::model::animation::{self, Animation};
use crate::model::bound::{self, BoneBound};
use crate::model::bytes::{ByteWriter, Cursor};
use crate::model::collision::{self, Collider, ConvexMesh, HierGeom};
use crate::model::container::{DEFAULT_SIGNATURE, SectionName, SectionTable};
use crate::model::group::{self, Group};
use crate::model::info::{Info, MeshCounts};
use crate::model::material::{self, Skin};
use crate::model::mesh::{self, Mesh, MeshBounds, Skinning};
use crate::model::node::{self, Node, check_node_ref};
use crate::model::trailer::Trailer;
use crate::model::{Dialect, Format, ModelError, Result};

/// Behavior switches for container decoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
	/// Error on unread section bytes and on overlapping or out-of-order header tables.
	pub strict_layout: bool,
}

impl DecodeOptions {
	/// Preset that rejects any layout irregularity.
	pub fn strict() -> Self {
		Self { strict_layout: true }
	}
}

/// Decoded model record tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
	/// Opaque container signature.
	pub signature: [u8; 8],
	/// Summary counts as last loaded or recalculated.
	pub info: Info,
	/// Transform nodes.
	pub nodes: Vec<Node>,
	/// Meshes.
	pub meshes: Vec<Mesh>,
	/// Box trailing the MESHES section, when stored.
	pub mesh_bounds: Option<MeshBounds>,
	/// Animations.
	pub animations: Vec<Animation>,
	/// Material skins.
	pub skins: Vec<Skin>,
	/// Convex hull, when stored.
	pub convex: Option<ConvexMesh>,
	/// Simple colliders.
	pub collisions: Vec<Collider>,
	/// Bone-attached colliders.
	pub hier_geoms: Vec<HierGeom>,
	/// Bone rotation limits.
	pub bounds: Vec<BoneBound>,
	/// Mesh groups.
	pub groups: Vec<Group>,
	/// Trailer metadata.
	pub trailer: Trailer,
}

impl Model {
	/// Empty model with default signature and trailer for `dialect`.
	pub fn new(dialect: Dialect) -> Self {
		let mut model = Self {
			signature: DEFAULT_SIGNATURE,
			info: Info::default(),
			nodes: Vec::new(),
			meshes: Vec::new(),
			mesh_bounds: None,
			animations: Vec::new(),
			skins: Vec::new(),
			convex: None,
			collisions: Vec::new(),
			hier_geoms: Vec::new(),
			bounds: Vec::new(),
			groups: Vec::new(),
			trailer: Trailer::for_dialect(dialect),
		};
		model.info = model.summary(dialect).unwrap_or_default();
		model
	}

	/// Summary counts derived from the current collections.
	pub fn summary(&self, dialect: Dialect) -> Result<Info> {
		let meshes = match dialect {
			Dialect::Gam => {
				let count = |draw_type: Option<u32>| {
					self.meshes
						.iter()
						.filter(|mesh| match draw_type {
							Some(draw_type) => mesh.draw_type == draw_type,
							None => mesh.draw_type != Mesh::DOUBLED && mesh.draw_type != Mesh::SKINNED,
						})
						.count()
				};
				MeshCounts::Split {
					doubled: narrow_count("triangle mesh count", count(Some(Mesh::DOUBLED)))?,
					skinned: narrow_count("skinned mesh count", count(Some(Mesh::SKINNED)))?,
					statics: narrow_count("static mesh count", count(None))?,
				}
			}
			Dialect::Sam => MeshCounts::Total(narrow_count("mesh count", self.meshes.len())?),
		};

		Ok(Info {
			meshes,
			animations: narrow_count("animation count", self.animations.len())?,
			materials: narrow_count("material count", self.skins.first().map_or(0, |skin| skin.materials.len()))?,
			nodes: narrow_count("node count", self.nodes.len())?,
			config: match dialect {
				Dialect::Gam => i32::try_from(self.groups.len()).map_err(|_| ModelError::ValueOutOfRange {
					field: "group count",
					value: self.groups.len() as i64,
				})?,
				Dialect::Sam => 0,
			},
		})
	}

	/// Replace `info` with counts derived from the current collections.
	pub fn recalculate(&mut self, dialect: Dialect) -> Result<()> {
		self.info = self.summary(dialect)?;
		Ok(())
	}

	/// Box around every mesh vertex position.
	pub fn compute_bounds(&self) -> Option<MeshBounds> {
		MeshBounds::from_meshes(&self.meshes)
	}

	/// Check cross-collection references.
	pub fn validate(&self) -> Result<()> {
		node::validate_forest(&self.nodes)?;
		let material_count = self.skins.first().map_or(0, |skin| skin.materials.len());
		check_mesh_refs(&self.meshes, self.nodes.len(), material_count)?;
		check_bone_refs(&self.hier_geoms, &self.bounds, self.nodes.len())
	}

	/// Copy adapted to what `target` can represent.
	///
	/// Drops binormals, doubles, and influence extras the target lacks, rebuilds `.gam`
	/// group node lists from variant members, resets the trailer, and recounts `info`.
	pub fn converted(&self, target: Dialect) -> Result<Self> {
		let mut out = self.clone();
		out.trailer = Trailer::for_dialect(target);

		for mesh in &mut out.meshes {
			match target {
				Dialect::Gam => {
					for vertex in &mut mesh.vertices {
						vertex.binormal = None;
					}
					if let Skinning::Influences(groups) = &mut mesh.skinning {
						for group in groups {
							group.items.truncate(mesh::GAM_INFLUENCE_SLOTS);
							for influence in &mut group.items {
								influence.offset.get_or_insert([0.0; 3]);
								influence.normal.get_or_insert([0.0; 3]);
							}
						}
					}
					mesh.draw_type = match mesh.skinning {
						Skinning::None if mesh.draw_type == Mesh::DOUBLED || mesh.draw_type == Mesh::SKINNED => Mesh::STATIC,
						Skinning::None => mesh.draw_type,
						Skinning::Doubles(_) => Mesh::DOUBLED,
						Skinning::Influences(_) => Mesh::SKINNED,
					};
				}
				Dialect::Sam => {
					if matches!(mesh.skinning, Skinning::Doubles(_)) {
						mesh.skinning = Skinning::None;
					}
					if let Skinning::Influences(groups) = &mut mesh.skinning {
						for influence in groups.iter_mut().flat_map(|group| group.items.iter_mut()) {
							influence.offset = None;
							influence.normal = None;
						}
					}
					mesh.name.clear();
					mesh.group = 0;
				}
			}
		}

		for group in &mut out.groups {
			match target {
				Dialect::Gam => {
					for member in group.variants.iter().flatten() {
						if !group.nodes.contains(member) {
							group.nodes.push(*member);
						}
					}
				}
				Dialect::Sam => group.nodes.clear(),
			}
		}

		if target == Dialect::Gam {
			for animation in &mut out.animations {
				for (node, key) in animation.frames.iter_mut().flat_map(|frame| frame.iter_mut().enumerate()) {
					key.node = node as i32;
				}
			}
		}

		out.recalculate(target)?;
		Ok(out)
	}
}

fn narrow_count(field: &'static str, len: usize) -> Result<u32> {
	u32::try_from(len).map_err(|_| ModelError::ValueOutOfRange { field, value: len as i64 })
}

fn check_mesh_refs(meshes: &[Mesh], node_count: usize, material_count: usize) -> Result<()> {
	for mesh in meshes {
		check_node_ref("mesh parent", mesh.parent, node_count)?;
		if material_count > 0 {
			check_node_ref("mesh material", mesh.material, material_count)?;
		}
	}
	Ok(())
}

fn check_bone_refs(hier_geoms: &[HierGeom], bounds: &[BoneBound], node_count: usize) -> Result<()> {
	let bones = hier_geoms.iter().map(|item| item.bone).chain(bounds.iter().map(|item| item.bone));
	for bone in bones {
		if bone as usize >= node_count {
			return Err(ModelError::IndexOutOfRange {
				kind: "bone",
				index: i64::from(bone),
				len: node_count,
			});
		}
	}
	Ok(())
}

/// Load/dump facade bound to one format and option set.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
	format: Format,
	options: DecodeOptions,
}

impl Parser {
	/// Parser for `format` (a [`Dialect`] selects the default game build).
	pub fn new(format: impl Into<Format>) -> Self {
		Self {
			format: format.into(),
			options: DecodeOptions::default(),
		}
	}

	/// Replace decode options.
	pub fn with_options(mut self, options: DecodeOptions) -> Self {
		self.options = options;
		self
	}

	/// Bound format.
	pub fn format(&self) -> Format {
		self.format
	}

	/// Read and decode a file.
	pub fn open(&self, path: impl AsRef<Path>) -> Result<Model> {
		let bytes = std::fs::read(path)?;
		self.load(&bytes)
	}

	/// Encode and write a file.
	pub fn save(&self, model: &Model, path: impl AsRef<Path>) -> Result<()> {
		let bytes = self.dump(model)?;
		std::fs::write(path, bytes)?;
		Ok(())
	}

	/// Decode a whole container.
	pub fn load(&self, bytes: &[u8]) -> Result<Model> {
		let dialect = self.format.dialect;
		let game = self.format.game;
		let table = SectionTable::parse(bytes)?;

		if self.options.strict_layout {
			table.check_layout(bytes.len() as u64)?;
		} else if !table.is_monotonic() {
			warn!("section table of {} entries is not laid out in order", table.headers.len());
		}
		for header in &table.headers {
			if SectionName::from_tag(header.tag, dialect).is_none() {
				debug!("ignoring unknown {dialect} section tag 0x{:04x} ({} bytes)", header.tag, header.size);
			}
		}

		let sections = Sections {
			table: &table,
			bytes,
			dialect,
			options: self.options,
		};

		let info = sections
			.decode(SectionName::Info, |cursor| Info::load(cursor, dialect))?
			.ok_or(ModelError::MissingSection {
				section: SectionName::Info,
				dialect,
			})?;

		let node_count = info.nodes as usize;
		let nodes = match sections.decode(SectionName::Nodes, |cursor| Node::load_all(cursor, dialect, node_count))? {
			Some(nodes) => nodes,
			None if node_count == 0 => Vec::new(),
			None => {
				return Err(ModelError::MissingSection {
					section: SectionName::Nodes,
					dialect,
				});
			}
		};

		let (meshes, mesh_bounds) = sections
			.decode(SectionName::Meshes, |cursor| {
				let (meshes, bounds) = mesh::load_meshes(cursor, dialect, info.mesh_count())?;
				check_mesh_refs(&meshes, nodes.len(), info.materials as usize)?;
				Ok((meshes, bounds))
			})?
			.unwrap_or_else(|| expect_empty(SectionName::Meshes, info.mesh_count()));

		let animations = sections
			.decode(SectionName::Animations, |cursor| {
				animation::load_animations(cursor, dialect, info.animations as usize, nodes.len())
			})?
			.unwrap_or_else(|| expect_empty(SectionName::Animations, info.animations as usize));

		let skins = sections
			.decode(SectionName::Materials, |cursor| material::load_skins(cursor, dialect, info.materials as usize))?
			.unwrap_or_default();

		let convex = sections.decode(SectionName::Convex, ConvexMesh::load)?;
		let collisions = sections.decode(SectionName::Collisions, |cursor| collision::load_colliders(cursor, game))?.unwrap_or_default();
		let hier_geoms = sections
			.decode(SectionName::HierGeom, |cursor| {
				let items = collision::load_hier_geoms(cursor, game)?;
				check_bone_refs(&items, &[], nodes.len())?;
				Ok(items)
			})?
			.unwrap_or_default();
		let bounds = sections
			.decode(SectionName::Bounds, |cursor| {
				let items = bound::load_bounds(cursor)?;
				check_bone_refs(&[], &items, nodes.len())?;
				Ok(items)
			})?
			.unwrap_or_default();
		let groups = sections.decode(SectionName::Groups, |cursor| group::load_groups(cursor, dialect))?.unwrap_or_default();

		let defaults = Trailer::for_dialect(dialect);
		let trailer = Trailer {
			tag: sections
				.decode(SectionName::Tag, |cursor| cursor.read_fixed_str(Trailer::TAG_WIDTH))?
				.unwrap_or(defaults.tag),
			version: sections.decode(SectionName::Version, |cursor| cursor.read_u32())?.unwrap_or(defaults.version),
			generator: sections
				.decode(SectionName::Parser, |cursor| cursor.read_fixed_str(Trailer::TEXT_WIDTH))?
				.unwrap_or(defaults.generator),
			sign: sections
				.decode(SectionName::Sign, |cursor| cursor.read_fixed_str(Trailer::TEXT_WIDTH))?
				.unwrap_or(defaults.sign),
		};

		info!(
			"loaded {} model: {} nodes, {} meshes, {} animations, {} skins, {} groups",
			dialect,
			nodes.len(),
			meshes.len(),
			animations.len(),
			skins.len(),
			groups.len()
		);

		Ok(Model {
			signature: table.signature,
			info,
			nodes,
			meshes,
			mesh_bounds,
			animations,
			skins,
			convex,
			collisions,
			hier_geoms,
			bounds,
			groups,
			trailer,
		})
	}

	/// Encode a model, recomputing every derived count and the section layout.
	pub fn dump(&self, model: &Model) -> Result<Vec<u8>> {
		let dialect = self.format.dialect;
		model.validate()?;
		let info = model.summary(dialect)?;

		let names = section_plan(model, dialect);
		let mut offset = SectionTable::preamble_size(names.len()) as u64;
		let mut payloads = Vec::with_capacity(names.len());
		for name in &names {
			let payload = self.encode_section(*name, model, &info).map_err(|err| err.in_section(*name, dialect, offset))?;
			debug!("encoded {name} (tag 0x{:04x}) at {offset}: {} bytes", name.tag(dialect), payload.len());
			offset += payload.len() as u64;
			payloads.push(payload);
		}

		let sizes: Vec<(u32, usize)> = names.iter().zip(&payloads).map(|(name, payload)| (name.tag(dialect), payload.len())).collect();
		let table = SectionTable::layout(model.signature, &sizes)?;

		let mut writer = ByteWriter::new();
		table.write(&mut writer)?;
		for payload in &payloads {
			writer.write_bytes(payload);
		}

		info!("encoded {} model: {} sections, {} bytes", dialect, names.len(), writer.len());
		Ok(writer.into_inner())
	}

	fn encode_section(&self, name: SectionName, model: &Model, info: &Info) -> Result<Vec<u8>> {
		let Format { dialect, game } = self.format;
		let node_count = model.nodes.len();
		let mut writer = ByteWriter::new();
		match name {
			SectionName::Info => info.dump(&mut writer, dialect)?,
			SectionName::Nodes => {
				for node in &model.nodes {
					node.dump(&mut writer, dialect)?;
				}
			}
			SectionName::Meshes => mesh::dump_meshes(&mut writer, dialect, &model.meshes, model.mesh_bounds.as_ref())?,
			SectionName::Animations => animation::dump_animations(&mut writer, dialect, &model.animations, node_count)?,
			SectionName::Materials => material::dump_skins(&mut writer, dialect, &model.skins)?,
			SectionName::Convex => {
				if let Some(convex) = &model.convex {
					convex.dump(&mut writer)?;
				}
			}
			SectionName::Collisions => collision::dump_colliders(&mut writer, game, &model.collisions)?,
			SectionName::HierGeom => collision::dump_hier_geoms(&mut writer, game, &model.hier_geoms)?,
			SectionName::Bounds => bound::dump_bounds(&mut writer, &model.bounds)?,
			SectionName::Groups => group::dump_groups(&mut writer, dialect, &model.groups)?,
			SectionName::Tag => writer.write_fixed_str(&model.trailer.tag, Trailer::TAG_WIDTH)?,
			SectionName::Version => writer.write_u32(model.trailer.version),
			SectionName::Parser => writer.write_fixed_str(&model.trailer.generator, Trailer::TEXT_WIDTH)?,
			SectionName::Sign => writer.write_fixed_str(&model.trailer.sign, Trailer::TEXT_WIDTH)?,
		}
		Ok(writer.into_inner())
	}
}

/// Sections written for `model`, in file order.
pub fn section_plan(model: &Model, dialect: Dialect) -> Vec<SectionName> {
	let mut names = vec![SectionName::Info, SectionName::Nodes, SectionName::Meshes];
	if !model.animations.is_empty() || dialect == Dialect::Gam {
		names.push(SectionName::Animations);
	}
	names.push(SectionName::Materials);
	if model.convex.is_some() {
		names.push(SectionName::Convex);
	}
	if !model.collisions.is_empty() {
		names.push(SectionName::Collisions);
	}
	if !model.hier_geoms.is_empty() {
		names.push(SectionName::HierGeom);
	}
	if !model.bounds.is_empty() {
		names.push(SectionName::Bounds);
	}
	names.extend([SectionName::Groups, SectionName::Tag, SectionName::Version, SectionName::Parser, SectionName::Sign]);
	names
}

fn expect_empty<T: Default>(section: SectionName, expected: usize) -> T {
	if expected > 0 {
		warn!("{section} section absent although info declares {expected} entries");
	}
	T::default()
}

struct Sections<'a> {
	table: &'a SectionTable,
	bytes: &'a [u8],
	dialect: Dialect,
	options: DecodeOptions,
}

impl Sections<'_> {
	fn decode<T>(&self, name: SectionName, decode: impl FnOnce(&mut Cursor<'_>) -> Result<T>) -> Result<Option<T>> {
		let Some(header) = self.table.find(name, self.dialect) else {
			debug!("{name} section absent");
			return Ok(None);
		};
		let wrap = |err: ModelError| err.in_section(name, self.dialect, header.offset);

		let payload = header.payload(self.bytes).map_err(wrap)?;
		let mut cursor = Cursor::new(payload);
		let value = decode(&mut cursor).map_err(wrap)?;

		let rem = cursor.remaining();
		if rem > 0 {
			if self.options.strict_layout {
				return Err(wrap(ModelError::SectionLayoutMismatch { rem }));
			}
			warn!("{name} section left {rem} unread bytes");
		}
		debug!("decoded {name} (tag 0x{:04x}) at {}: {} bytes", header.tag, header.offset, header.size);
		Ok(Some(value))
	}
}

/// Decode a container of `dialect` for the default game build.
pub fn load(dialect: Dialect, bytes: &[u8]) -> Result<Model> {
	Parser::new(dialect).load(bytes)
}

/// Decode a container of an explicit format.
pub fn load_with(format: Format, bytes: &[u8]) -> Result<Model> {
	Parser::new(format).load(bytes)
}

/// Encode a model as `dialect` for the default game build.
pub fn dump(model: &Model, dialect: Dialect) -> Result<Vec<u8>> {
	Parser::new(dialect).dump(model)
}

/// Encode a model for an explicit format.
pub fn dump_with(model: &Model, format: Format) -> Result<Vec<u8>> {
	Parser::new(format).dump(model)
}

#[cfg(test)]
mod tests;
