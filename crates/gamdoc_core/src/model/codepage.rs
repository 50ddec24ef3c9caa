//! Windows-1251 text mapping for on-disk names and paths.

use crate::model::{ModelError, Result};

/// Upper-half mapping for bytes `0x80..=0xBF`; `0xC0..=0xFF` is the contiguous `А..я` run.
const HIGH: [char; 64] = [
	'\u{0402}', '\u{0403}', '\u{201A}', '\u{0453}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}', // 0x80
	'\u{20AC}', '\u{2030}', '\u{0409}', '\u{2039}', '\u{040A}', '\u{040C}', '\u{040B}', '\u{040F}', // 0x88
	'\u{0452}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}', // 0x90
	'\u{0098}', '\u{2122}', '\u{0459}', '\u{203A}', '\u{045A}', '\u{045C}', '\u{045B}', '\u{045F}', // 0x98
	'\u{00A0}', '\u{040E}', '\u{045E}', '\u{0408}', '\u{00A4}', '\u{0490}', '\u{00A6}', '\u{00A7}', // 0xA0
	'\u{0401}', '\u{00A9}', '\u{0404}', '\u{00AB}', '\u{00AC}', '\u{00AD}', '\u{00AE}', '\u{0407}', // 0xA8
	'\u{00B0}', '\u{00B1}', '\u{0406}', '\u{0456}', '\u{0491}', '\u{00B5}', '\u{00B6}', '\u{00B7}', // 0xB0
	'\u{0451}', '\u{2116}', '\u{0454}', '\u{00BB}', '\u{0458}', '\u{0405}', '\u{0455}', '\u{0457}', // 0xB8
];

const CYRILLIC_BASE: u32 = 0x0410;

/// Map one byte to its character.
pub fn decode_byte(byte: u8) -> char {
	match byte {
		0x00..=0x7F => char::from(byte),
		0x80..=0xBF => HIGH[usize::from(byte - 0x80)],
		_ => char::from_u32(CYRILLIC_BASE + u32::from(byte - 0xC0)).unwrap_or(char::REPLACEMENT_CHARACTER),
	}
}

/// Map one character to its byte.
pub fn encode_char(ch: char) -> Option<u8> {
	let code = u32::from(ch);
	if code < 0x80 {
		return u8::try_from(code).ok();
	}
	if (CYRILLIC_BASE..CYRILLIC_BASE + 64).contains(&code) {
		return u8::try_from(code - CYRILLIC_BASE + 0xC0).ok();
	}
	HIGH.iter().position(|item| *item == ch).and_then(|idx| u8::try_from(idx + 0x80).ok())
}

/// Decode bytes, stopping at the first NUL.
pub fn decode(bytes: &[u8]) -> String {
	bytes.iter().take_while(|byte| **byte != 0).map(|byte| decode_byte(*byte)).collect()
}

/// Encode a string without any terminator.
pub fn encode(text: &str) -> Result<Vec<u8>> {
	text.chars().map(|ch| encode_char(ch).ok_or(ModelError::UnencodableChar { ch })).collect()
}

#[cfg(test)]
mod tests;
