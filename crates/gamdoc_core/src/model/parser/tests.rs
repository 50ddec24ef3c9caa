use crate::model::bytes::ByteWriter;
use crate::model::container::{SectionName, SectionTable};
use crate::model::parser::{DecodeOptions, Model, Parser, dump, load, section_plan};
use crate::model::{
	Animation, BoneBound, Dialect, Format, Game, Group, HierGeom, Info, Influence, InfluenceGroup, Key, Material, Mesh, MeshCounts, ModelError, Node,
	Position, Skin, Skinning, TexCoord, Trailer, Vertex, VertexFormat,
};

fn vertex(x: f32, y: f32) -> Vertex {
	Vertex {
		position: Position::Xyz([x, y, 0.0]),
		normal: Some([0.0, 0.0, 1.0]),
		uv: [Some(TexCoord::Uv([x, y])), None, None],
		..Vertex::default()
	}
}

fn two_node_model(dialect: Dialect) -> Model {
	let mut model = Model::new(dialect);
	model.nodes = vec![
		Node {
			name: "root".to_owned(),
			..Node::default()
		},
		Node {
			name: "child".to_owned(),
			parent: 0,
			location: [0.0, 1.0, 0.0],
			..Node::default()
		},
	];
	model.meshes = vec![Mesh {
		name: match dialect {
			Dialect::Gam => "body".to_owned(),
			Dialect::Sam => String::new(),
		},
		parent: 1,
		material: 0,
		format: VertexFormat::Xyznt1,
		vertices: vec![vertex(0.0, 0.0), vertex(1.0, 0.0), vertex(0.0, 1.0)],
		indices: vec![[0, 1, 2]],
		..Mesh::default()
	}];
	model.skins = vec![Skin {
		materials: vec![Material::default()],
	}];
	model.recalculate(dialect).expect("counts fit");
	model
}

fn container(dialect: Dialect, sections: &[(SectionName, Vec<u8>)]) -> Vec<u8> {
	let sizes: Vec<(u32, usize)> = sections.iter().map(|(name, payload)| (name.tag(dialect), payload.len())).collect();
	let table = SectionTable::layout(*b"ecbnt,t\0", &sizes).expect("layout");
	let mut writer = ByteWriter::new();
	table.write(&mut writer).expect("preamble");
	for (_, payload) in sections {
		writer.write_bytes(payload);
	}
	writer.into_inner()
}

#[test]
fn gam_model_round_trips_byte_stable() {
	let model = two_node_model(Dialect::Gam);
	let first = dump(&model, Dialect::Gam).expect("encodes");
	let loaded = load(Dialect::Gam, &first).expect("decodes");
	assert_eq!(loaded, model);
	assert_eq!(loaded.trailer.tag, "IVR");
	assert_eq!(loaded.trailer.version, 1);

	let second = dump(&loaded, Dialect::Gam).expect("re-encodes");
	assert_eq!(first, second);
}

#[test]
fn gam_layout_keeps_empty_animations_section() {
	let model = two_node_model(Dialect::Gam);
	let bytes = dump(&model, Dialect::Gam).expect("encodes");
	let table = SectionTable::parse(&bytes).expect("preamble");
	assert_eq!(table.headers.len(), 10);
	assert_eq!(table.find(SectionName::Animations, Dialect::Gam).map(|header| header.size), Some(0));
	assert!(table.is_monotonic());
	table.check_layout(bytes.len() as u64).expect("strict layout");
	assert_eq!(table.total_size(), bytes.len() as u64);

	let names: Vec<SectionName> = table.headers.iter().filter_map(|header| SectionName::from_tag(header.tag, Dialect::Gam)).collect();
	assert_eq!(names, section_plan(&model, Dialect::Gam));
}

#[test]
fn empty_sections_share_the_next_offset() {
	let model = Model::new(Dialect::Gam);
	let bytes = dump(&model, Dialect::Gam).expect("encodes");
	let table = SectionTable::parse(&bytes).expect("preamble");
	let header = |name: SectionName| *table.find(name, Dialect::Gam).expect("written");

	let materials = header(SectionName::Materials);
	for name in [SectionName::Nodes, SectionName::Meshes, SectionName::Animations] {
		assert_eq!(header(name).size, 0, "{name}");
		assert_eq!(header(name).offset, materials.offset, "{name}");
	}
	assert!(table.is_monotonic());

	let loaded = Parser::new(Dialect::Gam).with_options(DecodeOptions::strict()).load(&bytes).expect("strict decodes");
	assert_eq!(loaded, model);
	assert_eq!(dump(&loaded, Dialect::Gam).expect("re-encodes"), bytes);
}

#[test]
fn sam_layout_skips_empty_animations_section() {
	let model = two_node_model(Dialect::Sam);
	let bytes = dump(&model, Dialect::Sam).expect("encodes");
	let table = SectionTable::parse(&bytes).expect("preamble");
	assert!(table.find(SectionName::Animations, Dialect::Sam).is_none());
	assert_eq!(table.headers.len(), 9);

	let loaded = load(Dialect::Sam, &bytes).expect("decodes");
	assert!(loaded.animations.is_empty());
	assert_eq!(loaded.trailer, Trailer::for_dialect(Dialect::Sam));
}

#[test]
fn sam_model_with_animation_and_skinning_round_trips() {
	let mut model = two_node_model(Dialect::Sam);
	let mesh = &mut model.meshes[0];
	for vertex in &mut mesh.vertices {
		vertex.binormal = Some([1.0, 0.0, 0.0]);
	}
	let influence = Influence {
		bone: 1,
		weight: 1.0,
		offset: None,
		normal: None,
	};
	mesh.skinning = Skinning::Influences(vec![InfluenceGroup { items: vec![influence] }; 3]);
	model.animations = vec![Animation {
		name: "wave".to_owned(),
		fps: 15,
		next: -1,
		frames: vec![vec![Key::default(), Key { node: 1, ..Key::default() }]; 4],
		..Animation::default()
	}];
	model.bounds = vec![BoneBound {
		bone: 1,
		min_rotation: [-1.0; 3],
		max_rotation: [1.0; 3],
	}];
	model.groups = vec![Group {
		name: "parts".to_owned(),
		variants: vec![vec![0], vec![0, 1]],
		..Group::default()
	}];
	model.recalculate(Dialect::Sam).expect("counts fit");

	let bytes = dump(&model, Dialect::Sam).expect("encodes");
	let loaded = load(Dialect::Sam, &bytes).expect("decodes");
	assert_eq!(loaded, model);
	assert_eq!(loaded.info.meshes, MeshCounts::Total(1));
	assert_eq!(dump(&loaded, Dialect::Sam).expect("re-encodes"), bytes);
}

#[test]
fn clans_build_round_trips_collider_gametype() {
	let format = Format::new(Dialect::Gam, Game::Clans);
	let mut model = two_node_model(Dialect::Gam);
	model.hier_geoms = vec![HierGeom { bone: 1, ..HierGeom::default() }];
	model.hier_geoms[0].collider.gametype = 3;

	let parser = Parser::new(format);
	let bytes = parser.dump(&model).expect("encodes");
	assert_eq!(parser.load(&bytes).expect("decodes"), model);

	// the original build reads the gametype word as the bone index
	assert!(Parser::new(Dialect::Gam).load(&bytes).is_err());
}

#[test]
fn missing_info_is_fatal() {
	let bytes = container(Dialect::Sam, &[(SectionName::Nodes, Vec::new())]);
	let err = load(Dialect::Sam, &bytes).expect_err("no info");
	assert!(matches!(
		err,
		ModelError::MissingSection {
			section: SectionName::Info,
			dialect: Dialect::Sam
		}
	));
}

#[test]
fn missing_nodes_is_fatal_when_counted() {
	let info = Info {
		meshes: MeshCounts::Total(0),
		nodes: 2,
		..Info::default()
	};
	let mut writer = ByteWriter::new();
	info.dump(&mut writer, Dialect::Sam).expect("info");
	let bytes = container(Dialect::Sam, &[(SectionName::Info, writer.into_inner())]);
	assert!(matches!(
		load(Dialect::Sam, &bytes),
		Err(ModelError::MissingSection {
			section: SectionName::Nodes,
			..
		})
	));
}

#[test]
fn info_only_container_loads_with_defaults() {
	let mut writer = ByteWriter::new();
	Info {
		meshes: MeshCounts::Total(0),
		..Info::default()
	}
	.dump(&mut writer, Dialect::Sam)
	.expect("info");
	let bytes = container(Dialect::Sam, &[(SectionName::Info, writer.into_inner()), (SectionName::Groups, vec![0; 4])]);

	let model = load(Dialect::Sam, &bytes).expect("decodes");
	assert!(model.nodes.is_empty());
	assert!(model.skins.is_empty());
	assert_eq!(model.trailer, Trailer::for_dialect(Dialect::Sam));
}

#[test]
fn unknown_tags_are_ignored() {
	let mut bytes = dump(&two_node_model(Dialect::Sam), Dialect::Sam).expect("encodes");
	let table = SectionTable::parse(&bytes).expect("preamble");
	// retag GROUPS as the unsupported mask section
	let groups = table.headers.iter().position(|header| header.tag == SectionName::Groups.tag(Dialect::Sam)).expect("groups");
	let at = SectionTable::PREFIX_SIZE + groups * 16;
	bytes[at..at + 4].copy_from_slice(&0x000C_u32.to_le_bytes());

	let loaded = load(Dialect::Sam, &bytes).expect("decodes");
	assert!(loaded.groups.is_empty());
}

#[test]
fn strict_layout_rejects_unread_section_bytes() {
	let mut payload = Vec::new();
	let mut writer = ByteWriter::new();
	Info {
		meshes: MeshCounts::Total(0),
		..Info::default()
	}
	.dump(&mut writer, Dialect::Sam)
	.expect("info");
	payload.extend_from_slice(writer.as_slice());
	payload.extend_from_slice(&[0xAA; 4]);
	let bytes = container(Dialect::Sam, &[(SectionName::Info, payload)]);

	Parser::new(Dialect::Sam).load(&bytes).expect("lenient decode");

	let err = Parser::new(Dialect::Sam).with_options(DecodeOptions::strict()).load(&bytes).expect_err("strict decode");
	assert!(matches!(
		err,
		ModelError::Section {
			section: SectionName::Info,
			offset: 28,
			..
		}
	));
	assert!(matches!(err.root(), ModelError::SectionLayoutMismatch { rem: 4 }));
}

#[test]
fn strict_layout_rejects_overlapping_table() {
	let mut bytes = dump(&two_node_model(Dialect::Gam), Dialect::Gam).expect("encodes");
	// point NODES back into the preamble
	let at = SectionTable::PREFIX_SIZE + 16 + 8;
	bytes[at..at + 8].copy_from_slice(&0_u64.to_le_bytes());
	let err = Parser::new(Dialect::Gam).with_options(DecodeOptions::strict()).load(&bytes).expect_err("overlap");
	assert!(matches!(err, ModelError::SectionOverlap { .. }));
}

#[test]
fn overflowing_section_offset_is_an_error() {
	let mut bytes = dump(&two_node_model(Dialect::Gam), Dialect::Gam).expect("encodes");
	let at = SectionTable::PREFIX_SIZE + 8;
	bytes[at..at + 8].copy_from_slice(&u64::MAX.to_le_bytes());

	let err = load(Dialect::Gam, &bytes).expect_err("lenient");
	assert!(matches!(err.root(), ModelError::SectionOutOfBounds { offset: u64::MAX, .. }));
	let err = Parser::new(Dialect::Gam).with_options(DecodeOptions::strict()).load(&bytes).expect_err("strict");
	assert!(matches!(err.root(), ModelError::SectionOutOfBounds { offset: u64::MAX, .. }));
}

#[test]
fn section_errors_carry_context() {
	let mut model = two_node_model(Dialect::Gam);
	let bytes = dump(&model, Dialect::Gam).expect("encodes");

	let table = SectionTable::parse(&bytes).expect("preamble");
	let meshes = *table.find(SectionName::Meshes, Dialect::Gam).expect("meshes");
	let mut broken = bytes.clone();
	// mesh parent field follows the name and draw type
	let parent_at = meshes.offset as usize + 44;
	broken[parent_at..parent_at + 4].copy_from_slice(&9_i32.to_le_bytes());
	let err = load(Dialect::Gam, &broken).expect_err("parent 9");
	assert!(matches!(err, ModelError::Section { section: SectionName::Meshes, offset, .. } if offset == meshes.offset));
	assert!(matches!(err.root(), ModelError::IndexOutOfRange { kind: "mesh parent", index: 9, len: 2 }));

	model.meshes[0].name = "x".repeat(41);
	let err = dump(&model, Dialect::Gam).expect_err("long name");
	assert!(matches!(err, ModelError::Section { section: SectionName::Meshes, .. }));
	assert!(matches!(err.root(), ModelError::StringTooLong { len: 41, width: 40 }));
}

#[test]
fn validate_checks_cross_references() {
	let mut model = two_node_model(Dialect::Gam);
	model.validate().expect("valid");

	model.meshes[0].material = 1;
	assert!(matches!(model.validate(), Err(ModelError::IndexOutOfRange { kind: "mesh material", .. })));
	model.meshes[0].material = 0;

	model.bounds.push(BoneBound {
		bone: 2,
		..BoneBound::default()
	});
	assert!(matches!(model.validate(), Err(ModelError::IndexOutOfRange { kind: "bone", index: 2, len: 2 })));
	assert!(dump(&model, Dialect::Gam).is_err());
}

#[test]
fn summary_splits_gam_meshes_by_draw_type() {
	let mut model = two_node_model(Dialect::Gam);
	let mut doubled = model.meshes[0].clone();
	doubled.draw_type = Mesh::DOUBLED;
	doubled.skinning = Skinning::Doubles(doubled.vertices.clone());
	model.meshes.push(doubled);
	model.groups.push(Group::default());

	let info = model.summary(Dialect::Gam).expect("fits");
	assert_eq!(
		info.meshes,
		MeshCounts::Split {
			doubled: 1,
			skinned: 0,
			statics: 1
		}
	);
	assert_eq!(info.config, 1);
	assert_eq!(info.nodes, 2);
	assert_eq!(info.materials, 1);
	assert_eq!(model.summary(Dialect::Sam).expect("fits").meshes, MeshCounts::Total(2));
}

#[test]
fn compute_bounds_spans_all_meshes() {
	let model = two_node_model(Dialect::Gam);
	let bounds = model.compute_bounds().expect("has vertices");
	assert_eq!(bounds.min, [0.0, 0.0, 0.0]);
	assert_eq!(bounds.max, [1.0, 1.0, 0.0]);
	assert!(Model::new(Dialect::Sam).compute_bounds().is_none());
}

#[test]
fn conversion_drops_what_target_cannot_store() {
	let mut model = two_node_model(Dialect::Gam);
	model.meshes[0].draw_type = Mesh::DOUBLED;
	model.meshes[0].skinning = Skinning::Doubles(model.meshes[0].vertices.clone());
	model.groups = vec![Group {
		name: "g".to_owned(),
		nodes: vec![4, 5],
		variants: vec![vec![5]],
		..Group::default()
	}];

	let sam = model.converted(Dialect::Sam).expect("converts");
	assert_eq!(sam.info, sam.summary(Dialect::Sam).expect("counts fit"));
	assert!(matches!(sam.info.meshes, MeshCounts::Total(_)));
	assert_eq!(sam.meshes[0].skinning, Skinning::None);
	assert!(sam.groups[0].nodes.is_empty());
	assert_eq!(sam.trailer, Trailer::for_dialect(Dialect::Sam));
	let bytes = dump(&sam, Dialect::Sam).expect("sam encodes");
	assert_eq!(load(Dialect::Sam, &bytes).expect("sam decodes"), sam);

	let mut back = sam.converted(Dialect::Gam).expect("converts");
	assert_eq!(back.info.config, 1);
	assert_eq!(back.groups[0].nodes, vec![5]);
	assert_eq!(back.meshes[0].draw_type, Mesh::STATIC);
	dump(&back, Dialect::Gam).expect("gam encodes");
}

#[test]
fn open_and_save_use_the_filesystem() {
	let dir = std::env::temp_dir().join(format!("gamdoc-parser-{}", std::process::id()));
	std::fs::create_dir_all(&dir).expect("scratch dir");
	let path = dir.join("model.gam");

	let parser = Parser::new(Dialect::Gam);
	let model = two_node_model(Dialect::Gam);
	parser.save(&model, &path).expect("saves");
	assert_eq!(parser.open(&path).expect("opens"), model);

	assert!(matches!(parser.open(dir.join("missing.gam")), Err(ModelError::Io(_))));
	let _ = std::fs::remove_dir_all(&dir);
}
