use gamdoc::model::Dialect;
use gamdoc_testkit::rich_model;

use crate::cmd::test_support::{run_gamdoc, run_gamdoc_json, sample_file};

#[test]
fn show_json_summarizes_entities() {
	let file = sample_file("show-rich.sam", &rich_model(Dialect::Sam), Dialect::Sam);
	let json = run_gamdoc_json(&["show", &file, "--json"]);

	assert_eq!(json["nodes"].as_array().expect("nodes").len(), 3);
	assert_eq!(json["nodes"][2]["parent"], 1);
	assert_eq!(json["meshes"][0]["name"], "Mesh.000");
	assert_eq!(json["meshes"][0]["format"], "XYZNT1");
	assert_eq!(json["meshes"][1]["skinning"], "influences");
	assert_eq!(json["animations"][0]["name"], "turn");
	assert_eq!(json["animations"][0]["frames"], 3);
	assert_eq!(json["skins"].as_array().expect("skins").len(), 2);
	assert_eq!(json["skins"][0][1]["textures"][0], "hull.dds");
	assert_eq!(json["groups"][0]["variants"][1][1], 2);
	assert_eq!(json["collisions"], 1);
}

#[test]
fn show_prints_node_tree() {
	let file = sample_file("show-tree.gam", &rich_model(Dialect::Gam), Dialect::Gam);
	let output = run_gamdoc(&["show", &file]);

	assert!(output.status.success(), "show command should succeed");
	let stdout = String::from_utf8(output.stdout).expect("stdout is utf8");
	assert!(stdout.contains("  0: root at"));
	assert!(stdout.contains("    1: hull at"));
	assert!(stdout.contains("      2: turret at"));
	assert!(stdout.contains("hull\tXYZNT1\t4\t3\t1"));
}
