//! Shared test helpers for workspace crates.

use std::path::{Path, PathBuf};

use gamdoc::model::{
	Animation, BoneBound, ByteWriter, Collider, DEFAULT_SIGNATURE, Dialect, Group, HierGeom, Influence, InfluenceGroup, Key, Material, Mesh, Model, Node, Position,
	SectionName, SectionTable, Skin, Skinning, TexCoord, Texture, Vertex, VertexFormat,
};

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Fresh per-process scratch file path under the target directory.
pub fn scratch_path(name: &str) -> PathBuf {
	let dir = target_dir().join("gamdoc-scratch").join(std::process::id().to_string());
	std::fs::create_dir_all(&dir).expect("scratch dir is creatable");
	dir.join(name)
}

fn vertex(x: f32, y: f32, z: f32) -> Vertex {
	Vertex {
		position: Position::Xyz([x, y, z]),
		normal: Some([0.0, 0.0, 1.0]),
		uv: [Some(TexCoord::Uv([x, y])), None, None],
		..Vertex::default()
	}
}

/// Two-node model with one static `XYZNT1` triangle mesh and one skin of one textureless material.
pub fn minimal_model(dialect: Dialect) -> Model {
	let mut model = Model::new(dialect);
	model.nodes = vec![
		Node {
			name: "root".to_owned(),
			..Node::default()
		},
		Node {
			name: "hull".to_owned(),
			parent: 0,
			location: [0.0, 0.0, 1.0],
			..Node::default()
		},
	];
	model.meshes = vec![Mesh {
		name: match dialect {
			Dialect::Gam => "hull".to_owned(),
			Dialect::Sam => String::new(),
		},
		parent: 1,
		material: 0,
		format: VertexFormat::Xyznt1,
		vertices: vec![vertex(0.0, 0.0, 0.0), vertex(1.0, 0.0, 0.0), vertex(0.0, 1.0, 0.0)],
		indices: vec![[0, 1, 2]],
		..Mesh::default()
	}];
	model.skins = vec![Skin {
		materials: vec![Material::default()],
	}];
	model.recalculate(dialect).expect("sample counts fit");
	model
}

/// Model exercising every section the dialect can store.
pub fn rich_model(dialect: Dialect) -> Model {
	let mut model = minimal_model(dialect);
	model.nodes.push(Node {
		name: "turret".to_owned(),
		parent: 1,
		rotation: [0.0, 0.0, 0.7071, 0.7071],
		..Node::default()
	});

	let skinned = Mesh {
		draw_type: Mesh::SKINNED,
		parent: 2,
		material: 1,
		skinning: Skinning::Influences(
			(0..3)
				.map(|idx| InfluenceGroup {
					items: vec![Influence {
						bone: idx % 3,
						weight: 1.0,
						offset: (dialect == Dialect::Gam).then_some([0.0; 3]),
						normal: (dialect == Dialect::Gam).then_some([0.0, 0.0, 1.0]),
					}],
				})
				.collect(),
		),
		..model.meshes[0].clone()
	};
	model.meshes.push(skinned);
	model.mesh_bounds = model.compute_bounds();

	model.animations = vec![Animation {
		name: "turn".to_owned(),
		fps: 10,
		next: -1,
		frames: (0..3)
			.map(|frame| {
				(0..3)
					.map(|node| Key {
						node,
						location: [0.0, 0.0, frame as f32],
						..Key::default()
					})
					.collect()
			})
			.collect(),
		..Animation::default()
	}];

	let textured = Material {
		shader: "diffuse".to_owned(),
		textures: vec![Texture {
			filename: "hull.dds".to_owned(),
			uv: 0,
			kind: 0,
		}],
		..Material::default()
	};
	model.skins = vec![
		Skin {
			materials: vec![Material::default(), textured.clone()],
		},
		Skin {
			materials: vec![textured, Material::default()],
		},
	];

	model.collisions = vec![Collider {
		kind: 1,
		size: [2.0; 3],
		..Collider::default()
	}];
	model.hier_geoms = vec![HierGeom {
		collider: Collider::default(),
		bone: 2,
	}];
	model.bounds = vec![BoneBound {
		bone: 2,
		min_rotation: [0.0, 0.0, -1.5],
		max_rotation: [0.0, 0.0, 1.5],
	}];
	model.groups = vec![Group {
		name: "turrets".to_owned(),
		min: 0,
		max: 1,
		nodes: match dialect {
			Dialect::Gam => vec![1, 2],
			Dialect::Sam => Vec::new(),
		},
		variants: vec![vec![2], vec![1, 2]],
	}];
	model.recalculate(dialect).expect("sample counts fit");
	model
}

/// Assemble a container from raw section payloads in the given order.
pub fn container(dialect: Dialect, sections: &[(SectionName, Vec<u8>)]) -> Vec<u8> {
	let sizes: Vec<(u32, usize)> = sections.iter().map(|(name, payload)| (name.tag(dialect), payload.len())).collect();
	let table = SectionTable::layout(DEFAULT_SIGNATURE, &sizes).expect("layout");
	let mut writer = ByteWriter::new();
	table.write(&mut writer).expect("preamble");
	for (_, payload) in sections {
		writer.write_bytes(payload);
	}
	writer.into_inner()
}

/// Encode `model` and write it to a scratch file named `name`.
pub fn write_model(name: &str, model: &Model, dialect: Dialect) -> PathBuf {
	let path = scratch_path(name);
	let bytes = gamdoc::model::dump(model, dialect).expect("sample model encodes");
	std::fs::write(&path, bytes).expect("scratch file is writable");
	path
}
