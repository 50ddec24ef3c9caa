//! Declarative schemas for every fixed-layout record, decoded into generic [`Value`] trees.
//!
//! These mirror the typed entity codecs byte for byte and back the `records` inspection
//! command. `.gam` group variants decode as raw positions into the group node list.
//! Section codecs read container-level counts from [`info_scope`].

use std::sync::LazyLock;

use crate::model::{Codec, FieldValue, Format, Info, PrimKind, SectionName, Structure, Value};

fn record(structure: Structure) -> Codec {
	Codec::structure(structure)
}

fn fixed_str(width: usize) -> Codec {
	Codec::CharArray(width)
}

fn floats(count: usize) -> Codec {
	Codec::prims(PrimKind::F32, count)
}

/// Signature, section count, and `{tag, size, offset}` header entries.
pub static SECTION_TABLE: LazyLock<Codec> = LazyLock::new(|| {
	let header = Structure::builder("section_header")
		.field("tag", Codec::prim(PrimKind::U32))
		.field("size", Codec::prim(PrimKind::U32))
		.field("offset", Codec::prim(PrimKind::U64))
		.build();
	record(
		Structure::builder("section_table")
			.field("signature", Codec::Bytes(8))
			.field("section_count", Codec::prim(PrimKind::U32))
			.field("headers", Codec::array_by(record(header), "section_count"))
			.build(),
	)
});

/// INFO record.
pub static INFO: LazyLock<Codec> = LazyLock::new(|| {
	let gam = Structure::builder("info")
		.field("triangle_mesh_count", Codec::prim(PrimKind::I16))
		.field("skinned_mesh_count", Codec::prim(PrimKind::I16))
		.field("static_mesh_count", Codec::prim(PrimKind::I16))
		.field("animation_count", Codec::prim(PrimKind::I16))
		.field("material_count", Codec::prim(PrimKind::I16))
		.field("node_count", Codec::prim(PrimKind::I16))
		.field("config", Codec::prim(PrimKind::I32))
		.build();
	let sam = Structure::builder("info")
		.field("mesh_count", Codec::prim(PrimKind::U32))
		.field("material_count", Codec::prim(PrimKind::U32))
		.field("node_count", Codec::prim(PrimKind::U32))
		.field("animation_count", Codec::prim(PrimKind::U32))
		.build();
	Codec::by_dialect(record(gam), record(sam))
});

/// Transform node record.
pub static NODE: LazyLock<Codec> = LazyLock::new(|| {
	let gam = Structure::builder("node")
		.field("name", fixed_str(40))
		.field("parent", Codec::prim(PrimKind::I32))
		.field("location", floats(3))
		.field("rotation", floats(4))
		.field("matrix", floats(16))
		.build();
	let sam = Structure::builder("node")
		.field("name", fixed_str(40))
		.field("parent", Codec::prim(PrimKind::I16))
		.field("location", floats(3))
		.field("rotation", floats(4))
		.field("scale", floats(3))
		.build();
	Codec::by_dialect(record(gam), record(sam))
});

/// Texture reference record.
pub static TEXTURE: LazyLock<Codec> = LazyLock::new(|| {
	record(
		Structure::builder("texture")
			.field("filename", fixed_str(40))
			.field("uv", Codec::prim(PrimKind::U32))
			.field("type", Codec::prim(PrimKind::U32))
			.build(),
	)
});

/// Material record.
pub static MATERIAL: LazyLock<Codec> = LazyLock::new(|| {
	let build = |second: &str, third: &str, shader: Codec| {
		Structure::builder("material")
			.field("diffuse", floats(4))
			.field("ambient", floats(4))
			.field(second, floats(4))
			.field(third, floats(4))
			.field("power", Codec::prim(PrimKind::F32))
			.field("texture_count", Codec::prim(PrimKind::U32))
			.field("shader", shader)
			.field("textures", Codec::array_by(TEXTURE.clone(), "texture_count"))
			.build()
	};
	Codec::by_dialect(
		record(build("emissive", "specular", fixed_str(100))),
		record(build("specular", "emissive", Codec::CharVector)),
	)
});

/// Animation state change record.
pub static CHANGE: LazyLock<Codec> = LazyLock::new(|| {
	let gam = Structure::builder("change")
		.field("current", Codec::prim(PrimKind::I16))
		.field("type", Codec::prim(PrimKind::U32))
		.field("new", Codec::prim(PrimKind::I16))
		.build();
	let sam = Structure::builder("change")
		.field("type", Codec::prim(PrimKind::U32))
		.field("current", Codec::prim(PrimKind::I16))
		.field("new", Codec::prim(PrimKind::I16))
		.build();
	Codec::by_dialect(record(gam), record(sam))
});

/// Animation keyframe record.
pub static KEY: LazyLock<Codec> = LazyLock::new(|| {
	let gam = Structure::builder("key")
		.field("node", Codec::prim(PrimKind::I16))
		.field("location", floats(3))
		.field("rotation", floats(4))
		.build();
	let sam = Structure::builder("key")
		.field("location", floats(3))
		.field("rotation", floats(4))
		.field("scale", floats(3))
		.build();
	Codec::by_dialect(record(gam), record(sam))
});

/// Animation record; `.sam` frames are sized by the external `node_count`.
pub static ANIMATION: LazyLock<Codec> = LazyLock::new(|| {
	let gam = Structure::builder("animation")
		.field("name", fixed_str(25))
		.field("frame_count", Codec::prim(PrimKind::U16))
		.field("fps", Codec::prim(PrimKind::U16))
		.field("next", Codec::prim(PrimKind::I16))
		.field("change_count", Codec::prim(PrimKind::U16))
		.field("key_count", Codec::prim(PrimKind::U16))
		.field("action", Codec::prim(PrimKind::I32))
		.field("changes", Codec::array_by(CHANGE.clone(), "change_count"))
		.field("frames", Codec::array_by(Codec::array_by(KEY.clone(), "key_count"), "frame_count"))
		.build();
	let sam = Structure::builder("animation")
		.external("node_count")
		.field("name", fixed_str(25))
		.field("frame_count", Codec::prim(PrimKind::U32))
		.field("fps", Codec::prim(PrimKind::U32))
		.field("next", Codec::prim(PrimKind::I32))
		.field("change_count", Codec::prim(PrimKind::U32))
		.field("changes", Codec::array_by(CHANGE.clone(), "change_count"))
		.field("frames", Codec::array_by(Codec::array_by(KEY.clone(), "node_count"), "frame_count"))
		.build();
	Codec::by_dialect(record(gam), record(sam))
});

/// Simple collider record; the `113` build appends `gametype`.
pub static COLLIDER: LazyLock<Codec> = LazyLock::new(|| {
	let build = |gametype: bool| {
		let builder = Structure::builder("collider")
			.field("type", Codec::prim(PrimKind::U32))
			.field("location", floats(3))
			.field("rotation", floats(4))
			.field("size", floats(3));
		let builder = if gametype { builder.field("gametype", Codec::prim(PrimKind::U32)) } else { builder };
		builder.build()
	};
	Codec::by_game(record(build(false)), record(build(true)))
});

/// Bone-attached collider record.
pub static HIER_GEOM: LazyLock<Codec> = LazyLock::new(|| {
	record(
		Structure::builder("hier_geom")
			.field("collider", COLLIDER.clone())
			.field("bone", Codec::prim(PrimKind::U32))
			.build(),
	)
});

/// Bone rotation limit record.
pub static BONE_BOUND: LazyLock<Codec> = LazyLock::new(|| {
	record(
		Structure::builder("bone_bound")
			.field("bone", Codec::prim(PrimKind::U32))
			.field("min_rotation", floats(3))
			.field("max_rotation", floats(3))
			.build(),
	)
});

/// Mesh group record.
pub static GROUP: LazyLock<Codec> = LazyLock::new(|| {
	let members = || Codec::vector(Codec::prim(PrimKind::U32));
	let gam = Structure::builder("group")
		.field("name", fixed_str(20))
		.field("min", Codec::prim(PrimKind::U32))
		.field("max", Codec::prim(PrimKind::U32))
		.field("nodes", members())
		.field("variants", Codec::vector(members()))
		.build();
	let sam = Structure::builder("group")
		.field("name", fixed_str(20))
		.field("min", Codec::prim(PrimKind::U32))
		.field("max", Codec::prim(PrimKind::U32))
		.field("variants", Codec::vector(members()))
		.build();
	Codec::by_dialect(record(gam), record(sam))
});

/// Convex hull record.
pub static CONVEX: LazyLock<Codec> = LazyLock::new(|| {
	record(
		Structure::builder("convex")
			.field("vertex_count", Codec::prim(PrimKind::U32))
			.field("index_count", Codec::prim(PrimKind::U32))
			.field("vertices", Codec::array_by(floats(3), "vertex_count"))
			.field("indices", Codec::array_by(Codec::prims(PrimKind::U16, 3), "index_count"))
			.build(),
	)
});

/// Container-level counts visible to section codecs.
pub fn info_scope(info: &Info) -> Vec<FieldValue> {
	let count = |name: &str, value: u32| FieldValue {
		name: name.into(),
		value: Value::U64(u64::from(value)),
	};
	vec![
		count("mesh_count", info.meshes.total()),
		count("animation_count", info.animations),
		count("material_count", info.materials),
		count("node_count", info.nodes),
	]
}

/// Whole-section codec, or `None` for MESHES whose layout only the typed mesh codec resolves.
///
/// Top-level dialect and game alternates are resolved for `format`; `info` supplies the
/// fixed repeat counts.
pub fn section_schema(name: SectionName, format: Format, info: &Info) -> Option<Codec> {
	let pick = |codec: &Codec| match codec {
		Codec::Dynamic(dynamic) => dynamic.select(format).clone(),
		other => other.clone(),
	};
	let codec = match name {
		SectionName::Info => pick(&*INFO),
		SectionName::Nodes => Codec::array(pick(&*NODE), info.nodes as usize),
		SectionName::Meshes => return None,
		SectionName::Animations => Codec::array(pick(&*ANIMATION), info.animations as usize),
		SectionName::Materials => record(
			Structure::builder("materials")
				.field("skin_count", Codec::prim(PrimKind::U32))
				.field("skins", Codec::array_by(Codec::array(pick(&*MATERIAL), info.materials as usize), "skin_count"))
				.build(),
		),
		SectionName::Convex => CONVEX.clone(),
		SectionName::Collisions => Codec::vector(pick(&*COLLIDER)),
		SectionName::HierGeom => Codec::vector(HIER_GEOM.clone()),
		SectionName::Bounds => Codec::vector(BONE_BOUND.clone()),
		SectionName::Groups => Codec::vector(pick(&*GROUP)),
		SectionName::Tag => fixed_str(30),
		SectionName::Version => Codec::prim(PrimKind::U32),
		SectionName::Parser | SectionName::Sign => fixed_str(64),
	};
	Some(codec)
}
