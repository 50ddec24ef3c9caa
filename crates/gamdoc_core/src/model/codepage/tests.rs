use crate::model::ModelError;
use crate::model::codepage::{decode, decode_byte, encode, encode_char};

#[test]
fn ascii_passes_through() {
	assert_eq!(decode(b"Bone01"), "Bone01");
	assert_eq!(encode("Bone01").expect("ascii encodes"), b"Bone01");
}

#[test]
fn decode_stops_at_first_nul() {
	assert_eq!(decode(b"body\0junk"), "body");
	assert_eq!(decode(b"\0body"), "");
}

#[test]
fn cyrillic_round_trips() {
	let text = "Кузов_ёЁ№";
	let bytes = encode(text).expect("cyrillic encodes");
	assert_eq!(bytes, [0xCA, 0xF3, 0xE7, 0xEE, 0xE2, b'_', 0xB8, 0xA8, 0xB9]);
	assert_eq!(decode(&bytes), text);
}

#[test]
fn every_byte_maps_back_to_itself() {
	for byte in 1_u8..=255 {
		let ch = decode_byte(byte);
		assert_eq!(encode_char(ch), Some(byte), "byte 0x{byte:02x} -> {ch:?}");
	}
}

#[test]
fn unassigned_slot_is_c1_control() {
	assert_eq!(decode_byte(0x98), '\u{0098}');
}

#[test]
fn rejects_characters_outside_code_page() {
	let err = encode("mesh_日本").expect_err("cjk is not encodable");
	assert!(matches!(err, ModelError::UnencodableChar { ch: '日' }));
}
