use crate::model::Dialect;

/// Generator string written by this crate.
pub const GENERATOR: &str = concat!("gamdoc: ", env!("CARGO_PKG_VERSION"));

/// Trailing TAG/VERSION/PARSER/SIGN metadata blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trailer {
	/// Format tag, at most 30 encoded bytes.
	pub tag: String,
	/// Format version.
	pub version: u32,
	/// Generator string, at most 64 encoded bytes.
	pub generator: String,
	/// Signature string, at most 64 encoded bytes.
	pub sign: String,
}

impl Trailer {
	/// Width of the TAG block.
	pub const TAG_WIDTH: usize = 30;
	/// Width of the PARSER and SIGN blocks.
	pub const TEXT_WIDTH: usize = 64;

	/// Default trailer for a dialect.
	pub fn for_dialect(dialect: Dialect) -> Self {
		let (tag, version) = match dialect {
			Dialect::Gam => ("IVR", 1),
			Dialect::Sam => ("DFT", 2),
		};
		Self {
			tag: tag.to_owned(),
			version,
			generator: GENERATOR.to_owned(),
			sign: "Unsigned".to_owned(),
		}
	}
}

impl Default for Trailer {
	fn default() -> Self {
		Self::for_dialect(Dialect::Gam)
	}
}
