use gamdoc::model::{Dialect, SectionName, SectionTable};
use gamdoc_testkit::{rich_model, scratch_path};

use crate::cmd::test_support::{run_gamdoc, run_gamdoc_json, sample_file};

#[test]
fn verify_reports_stable_round_trip() {
	for (name, dialect) in [("verify-rich.gam", Dialect::Gam), ("verify-rich.sam", Dialect::Sam)] {
		let file = sample_file(name, &rich_model(dialect), dialect);
		let json = run_gamdoc_json(&["verify", &file, "--json"]);

		assert_eq!(json["model_equal"], true, "{name}");
		assert_eq!(json["byte_stable"], true, "{name}");
		assert_eq!(json["identical_to_input"], true, "{name}");
	}
}

#[test]
fn verify_notices_dropped_unknown_sections() {
	let bytes = gamdoc::model::dump(&rich_model(Dialect::Sam), Dialect::Sam).expect("encodes");
	let mut table = SectionTable::parse(&bytes).expect("preamble");
	let groups = SectionName::Groups.tag(Dialect::Sam);
	for header in &mut table.headers {
		if header.tag == groups {
			header.tag = 0x7777;
		}
	}
	let mut patched = Vec::new();
	let mut writer = gamdoc::model::ByteWriter::new();
	table.write(&mut writer).expect("preamble");
	patched.extend_from_slice(writer.as_slice());
	patched.extend_from_slice(&bytes[patched.len()..]);

	let path = scratch_path("verify-unknown.sam");
	std::fs::write(&path, patched).expect("scratch file is writable");
	let file = path.to_string_lossy().into_owned();
	let json = run_gamdoc_json(&["verify", &file, "--json"]);

	assert_eq!(json["model_equal"], true);
	assert_eq!(json["byte_stable"], true);
	assert_eq!(json["identical_to_input"], false);
}

#[test]
fn verify_rejects_strict_violations() {
	let mut bytes = gamdoc::model::dump(&rich_model(Dialect::Gam), Dialect::Gam).expect("encodes");
	bytes.extend_from_slice(&[0; 4]);
	let table = SectionTable::parse(&bytes).expect("preamble");
	let last = table.headers.len() - 1;
	let at = SectionTable::PREFIX_SIZE + last * 16 + 4;
	let size = table.headers[last].size + 4;
	bytes[at..at + 4].copy_from_slice(&size.to_le_bytes());

	let path = scratch_path("verify-strict.gam");
	std::fs::write(&path, bytes).expect("scratch file is writable");
	let file = path.to_string_lossy().into_owned();

	assert!(run_gamdoc(&["verify", &file]).status.success());
	let output = run_gamdoc(&["verify", &file, "--strict-layout"]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("SIGN section"));
}
