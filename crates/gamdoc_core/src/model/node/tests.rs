use crate::model::bytes::{ByteWriter, Cursor};
use crate::model::node::{IDENTITY, Node, check_node_ref, validate_forest};
use crate::model::{Dialect, ModelError};

fn node(name: &str, parent: i32) -> Node {
	Node {
		name: name.to_owned(),
		parent,
		location: [1.0, 2.0, 3.0],
		..Node::default()
	}
}

#[test]
fn encoded_sizes_per_dialect() {
	for dialect in [Dialect::Gam, Dialect::Sam] {
		let mut writer = ByteWriter::new();
		node("Bone", -1).dump(&mut writer, dialect).expect("encodes");
		assert_eq!(writer.len(), Node::size(dialect));
	}
}

#[test]
fn gam_keeps_matrix_and_defaults_scale() {
	let mut source = node("Root", -1);
	source.matrix[12] = 5.0;
	source.scale = [2.0; 3];

	let mut writer = ByteWriter::new();
	source.dump(&mut writer, Dialect::Gam).expect("encodes");
	let decoded = Node::load(&mut Cursor::new(writer.as_slice()), Dialect::Gam).expect("decodes");
	assert_eq!(decoded.matrix[12], 5.0);
	assert_eq!(decoded.scale, [1.0; 3]);
}

#[test]
fn sam_keeps_scale_and_defaults_matrix() {
	let mut source = node("Root", -1);
	source.matrix[12] = 5.0;
	source.scale = [2.0; 3];

	let mut writer = ByteWriter::new();
	source.dump(&mut writer, Dialect::Sam).expect("encodes");
	let decoded = Node::load(&mut Cursor::new(writer.as_slice()), Dialect::Sam).expect("decodes");
	assert_eq!(decoded.matrix, IDENTITY);
	assert_eq!(decoded.scale, [2.0; 3]);
	assert_eq!(decoded.parent, -1);
}

#[test]
fn sam_parent_must_fit_short() {
	let err = node("Deep", 70_000).dump(&mut ByteWriter::new(), Dialect::Sam).expect_err("parent overflow");
	assert!(matches!(err, ModelError::ValueOutOfRange { field: "node parent", .. }));
}

#[test]
fn forest_accepts_roots_and_children() {
	let nodes = [node("a", -1), node("b", 0), node("c", 1), node("d", -1)];
	validate_forest(&nodes).expect("valid forest");
}

#[test]
fn forest_rejects_dangling_parent() {
	let nodes = [node("a", -1), node("b", 2)];
	let err = validate_forest(&nodes).expect_err("dangling");
	assert!(matches!(err, ModelError::IndexOutOfRange { kind: "node parent", index: 2, len: 2 }));
}

#[test]
fn forest_rejects_cycles() {
	let nodes = [node("a", 1), node("b", 0)];
	assert!(matches!(validate_forest(&nodes), Err(ModelError::NodeCycle { .. })));

	let selfish = [node("a", 0)];
	assert!(matches!(validate_forest(&selfish), Err(ModelError::NodeCycle { node: 0 })));
}

#[test]
fn load_all_validates_hierarchy() {
	let mut writer = ByteWriter::new();
	node("a", 1).dump(&mut writer, Dialect::Gam).expect("encodes");
	node("b", 0).dump(&mut writer, Dialect::Gam).expect("encodes");
	let err = Node::load_all(&mut Cursor::new(writer.as_slice()), Dialect::Gam, 2).expect_err("cycle");
	assert!(matches!(err, ModelError::NodeCycle { .. }));
}

#[test]
fn node_refs_accept_minus_one() {
	check_node_ref("mesh parent", -1, 0).expect("none");
	check_node_ref("mesh parent", 2, 3).expect("in range");
	assert!(check_node_ref("mesh parent", 3, 3).is_err());
	assert!(check_node_ref("mesh parent", -2, 3).is_err());
}

#[test]
fn display_name_falls_back_to_index() {
	assert_eq!(node("", -1).display_name(7), "Node.007");
	assert_eq!(node("Hip", -1).display_name(7), "Hip");
}
