use gamdoc::model::{Dialect, StructValue, Value};
use gamdoc_testkit::rich_model;

use super::value_json;
use crate::cmd::test_support::{run_gamdoc, run_gamdoc_json, sample_file};

#[test]
fn value_json_keeps_record_shape() {
	let value = Value::Struct(
		StructValue::new("key")
			.with("node", Value::I64(-1))
			.with("location", Value::Array(vec![Value::F32(0.5), Value::F32(2.0)]))
			.with("raw", Value::Bytes(vec![0xab, 0x01])),
	);
	let json = value_json(&value);
	assert_eq!(json["type"], "key");
	assert_eq!(json["node"], -1);
	assert_eq!(json["location"][0], 0.5);
	assert_eq!(json["raw"], "ab01");
}

#[test]
fn records_decodes_nodes_generically() {
	let file = sample_file("records-nodes.sam", &rich_model(Dialect::Sam), Dialect::Sam);
	let json = run_gamdoc_json(&["records", &file, "--section", "nodes", "--json"]);

	assert_eq!(json["section"], "NODES");
	assert_eq!(json["consumed"], json["size"]);
	let nodes = json["value"].as_array().expect("node array");
	assert_eq!(nodes.len(), 3);
	assert_eq!(nodes[2]["name"], "turret");
	assert_eq!(nodes[2]["parent"], 1);
	assert_eq!(nodes[0]["scale"][0], 1.0);
}

#[test]
fn records_shows_gam_group_positions() {
	let file = sample_file("records-groups.gam", &rich_model(Dialect::Gam), Dialect::Gam);
	let json = run_gamdoc_json(&["records", &file, "--section", "GROUPS", "--json"]);

	let group = &json["value"][0];
	assert_eq!(group["name"], "turrets");
	assert_eq!(group["nodes"][1], 2);
	assert_eq!(group["variants"][0][0], 1);
}

#[test]
fn records_trailer_version() {
	let file = sample_file("records-version.sam", &rich_model(Dialect::Sam), Dialect::Sam);
	let json = run_gamdoc_json(&["records", &file, "--section", "version", "--json"]);
	assert_eq!(json["value"], 2);
}

#[test]
fn records_rejects_meshes() {
	let file = sample_file("records-meshes.gam", &rich_model(Dialect::Gam), Dialect::Gam);
	let output = run_gamdoc(&["records", &file, "--section", "meshes"]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("unknown generic section `MESHES`"));
}

#[test]
fn records_prints_tree() {
	let file = sample_file("records-text.gam", &rich_model(Dialect::Gam), Dialect::Gam);
	let output = run_gamdoc(&["records", &file, "--section", "info"]);

	assert!(output.status.success(), "records command should succeed");
	let stdout = String::from_utf8(output.stdout).expect("stdout is utf8");
	assert!(stdout.contains("section: INFO at "));
	assert!(stdout.contains("  node_count = 3"));
}
