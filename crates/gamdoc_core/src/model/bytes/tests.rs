use crate::model::ModelError;
use crate::model::bytes::{ByteWriter, Cursor};

#[test]
fn reads_little_endian_scalars_in_order() {
	let bytes = [0x01, 0x02, 0xFF, 0xFF, 0x00, 0x00, 0x80, 0x3F, 0x2A];
	let mut cursor = Cursor::new(&bytes);
	assert_eq!(cursor.read_u16().expect("u16"), 0x0201);
	assert_eq!(cursor.read_i16().expect("i16"), -1);
	assert_eq!(cursor.read_f32().expect("f32"), 1.0);
	assert_eq!(cursor.read_u8().expect("u8"), 42);
	assert_eq!(cursor.remaining(), 0);
}

#[test]
fn truncated_read_reports_position() {
	let mut cursor = Cursor::new(&[1, 2, 3]);
	cursor.read_u16().expect("first read fits");
	let err = cursor.read_u32().expect_err("second read is short");
	assert!(matches!(err, ModelError::TruncatedInput { at: 2, need: 4, rem: 1 }));
}

#[test]
fn read_count_rejects_counts_larger_than_payload() {
	let mut writer = ByteWriter::new();
	writer.write_u32(1_000_000);
	writer.write_zeros(16);
	let bytes = writer.into_inner();
	let err = Cursor::new(&bytes).read_count(4).expect_err("count exceeds payload");
	assert!(matches!(err, ModelError::TruncatedInput { at: 0, .. }));
}

#[test]
fn fixed_strings_pad_and_truncate_at_nul() {
	let mut writer = ByteWriter::new();
	writer.write_fixed_str("Bone", 8).expect("fits");
	assert_eq!(writer.as_slice(), b"Bone\0\0\0\0");

	let bytes = writer.into_inner();
	let mut cursor = Cursor::new(&bytes);
	assert_eq!(cursor.read_fixed_str(8).expect("reads"), "Bone");
	assert_eq!(cursor.pos(), 8);
}

#[test]
fn fixed_string_may_fill_whole_width() {
	let mut writer = ByteWriter::new();
	writer.write_fixed_str("12345678", 8).expect("exact width fits");
	assert_eq!(writer.len(), 8);

	let err = ByteWriter::new().write_fixed_str("123456789", 8).expect_err("too long");
	assert!(matches!(err, ModelError::StringTooLong { len: 9, width: 8 }));
}

#[test]
fn prefixed_string_stores_trailing_nul() {
	let mut writer = ByteWriter::new();
	writer.write_prefixed_str("lit").expect("encodes");
	assert_eq!(writer.as_slice(), &[4, 0, 0, 0, b'l', b'i', b't', 0]);

	let bytes = writer.into_inner();
	assert_eq!(Cursor::new(&bytes).read_prefixed_str().expect("decodes"), "lit");
}
