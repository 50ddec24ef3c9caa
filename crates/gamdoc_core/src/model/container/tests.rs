use crate::model::bytes::ByteWriter;
use crate::model::container::{DEFAULT_SIGNATURE, SectionHeader, SectionName, SectionTable};
use crate::model::{Dialect, ModelError};

#[test]
fn tags_differ_per_dialect() {
	assert_eq!(SectionName::Info.tag(Dialect::Gam), 0x0001);
	assert_eq!(SectionName::Info.tag(Dialect::Sam), 0x0006);
	assert_eq!(SectionName::Materials.tag(Dialect::Gam), 0x000F);
	assert_eq!(SectionName::Groups.tag(Dialect::Sam), 0x0009);
	assert_eq!(SectionName::Sign.tag(Dialect::Gam), SectionName::Sign.tag(Dialect::Sam));
}

#[test]
fn tag_lookup_round_trips_for_every_section() {
	for dialect in [Dialect::Gam, Dialect::Sam] {
		for name in SectionName::ALL {
			assert_eq!(SectionName::from_tag(name.tag(dialect), dialect), Some(name));
		}
	}
	assert_eq!(SectionName::from_tag(0x000C, Dialect::Sam), None);
}

#[test]
fn section_labels_parse_case_insensitively() {
	assert_eq!("hier_geom".parse::<SectionName>().expect("parses"), SectionName::HierGeom);
	assert_eq!(SectionName::Animations.to_string(), "ANIMATIONS");
	assert!(matches!("mask".parse::<SectionName>(), Err(ModelError::UnknownLabel { kind: "section", .. })));
}

#[test]
fn layout_places_payloads_after_preamble() {
	let table = SectionTable::layout(DEFAULT_SIGNATURE, &[(1, 16), (2, 0), (4, 8)]).expect("layout");
	assert_eq!(SectionTable::preamble_size(3), 60);
	assert_eq!(
		table.headers,
		vec![
			SectionHeader { tag: 1, size: 16, offset: 60 },
			SectionHeader { tag: 2, size: 0, offset: 76 },
			SectionHeader { tag: 4, size: 8, offset: 76 },
		]
	);
	assert_eq!(table.total_size(), 84);
	assert!(table.is_monotonic());
}

#[test]
fn preamble_write_then_parse_preserves_entries() {
	let table = SectionTable::layout(*b"custom!\0", &[(0xF001, 30), (0xF002, 4)]).expect("layout");
	let mut writer = ByteWriter::new();
	table.write(&mut writer).expect("writes");
	assert_eq!(writer.len(), SectionTable::preamble_size(2));
	assert_eq!(&writer.as_slice()[..8], b"custom!\0");

	let parsed = SectionTable::parse(writer.as_slice()).expect("parses");
	assert_eq!(parsed, table);
}

#[test]
fn find_resolves_through_dialect_tags() {
	let table = SectionTable::layout(DEFAULT_SIGNATURE, &[(0x0006, 16), (0x0001, 0)]).expect("layout");
	assert_eq!(table.find(SectionName::Info, Dialect::Sam).map(|header| header.size), Some(16));
	assert_eq!(table.find(SectionName::Meshes, Dialect::Sam).map(|header| header.size), Some(0));
	assert_eq!(table.find(SectionName::Info, Dialect::Gam).map(|header| header.offset), Some(60));
}

#[test]
fn payload_outside_buffer_is_rejected() {
	let header = SectionHeader { tag: 1, size: 8, offset: 4 };
	assert_eq!(header.payload(&[0; 12]).expect("fits"), &[0; 8]);
	let err = header.payload(&[0; 10]).expect_err("past end");
	assert!(matches!(err, ModelError::SectionOutOfBounds { tag: 1, len: 10, .. }));
}

#[test]
fn check_layout_flags_overlap_duplicates_and_bounds() {
	let overlap = SectionTable {
		signature: DEFAULT_SIGNATURE,
		headers: vec![SectionHeader { tag: 1, size: 8, offset: 44 }, SectionHeader { tag: 2, size: 4, offset: 50 }],
	};
	assert!(!overlap.is_monotonic());
	assert!(matches!(overlap.check_layout(64), Err(ModelError::SectionOverlap { tag: 2, prev_end: 52, .. })));

	let inside_preamble = SectionTable {
		signature: DEFAULT_SIGNATURE,
		headers: vec![SectionHeader { tag: 1, size: 4, offset: 8 }],
	};
	assert!(matches!(inside_preamble.check_layout(64), Err(ModelError::SectionOverlap { prev_end: 28, .. })));

	let duplicate = SectionTable::layout(DEFAULT_SIGNATURE, &[(1, 4), (1, 4)]).expect("layout");
	assert!(matches!(duplicate.check_layout(64), Err(ModelError::DuplicateSection { tag: 1 })));

	let table = SectionTable::layout(DEFAULT_SIGNATURE, &[(1, 8)]).expect("layout");
	table.check_layout(36).expect("exact fit");
	assert!(matches!(table.check_layout(35), Err(ModelError::SectionOutOfBounds { .. })));
}

#[test]
fn check_layout_rejects_offsets_that_overflow() {
	let table = SectionTable {
		signature: DEFAULT_SIGNATURE,
		headers: vec![SectionHeader { tag: 1, size: 16, offset: u64::MAX }],
	};
	assert_eq!(table.headers[0].end(), u64::MAX);
	assert!(!table.is_monotonic());
	assert!(matches!(table.check_layout(u64::MAX), Err(ModelError::SectionOutOfBounds { tag: 1, size: 16, .. })));
	assert_eq!(table.total_size(), u64::MAX);
	assert!(matches!(table.headers[0].payload(&[0; 64]), Err(ModelError::SectionOutOfBounds { .. })));
}

#[test]
fn parse_rejects_truncated_header_table() {
	let mut writer = ByteWriter::new();
	writer.write_bytes(&DEFAULT_SIGNATURE);
	writer.write_u32(3);
	writer.write_zeros(20);
	assert!(matches!(SectionTable::parse(writer.as_slice()), Err(ModelError::TruncatedInput { .. })));
}
