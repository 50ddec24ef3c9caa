use std::path::Path;

use gamdoc::model::{DecodeOptions, Dialect, Format, Game, ModelError, Parser, Result, SectionName};

/// Shared `--dialect`/`--game`/`--strict-layout` options.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct FormatArgs {
	/// Container dialect (`gam` or `sam`); inferred from the file extension when omitted.
	#[arg(long)]
	pub dialect: Option<String>,
	/// Game build (`hta` or `clans`).
	#[arg(long, default_value = "hta")]
	pub game: String,
	/// Reject trailing section bytes and out-of-order section tables.
	#[arg(long = "strict-layout")]
	pub strict_layout: bool,
}

impl FormatArgs {
	/// Resolve the container format for `path`.
	pub(crate) fn format(&self, path: &Path) -> Result<Format> {
		let dialect = resolve_dialect(self.dialect.as_deref(), path)?;
		let game = self.game.parse::<Game>()?;
		Ok(Format::new(dialect, game))
	}

	/// Build a parser for `path` honoring every option.
	pub(crate) fn parser(&self, path: &Path) -> Result<Parser> {
		let options = if self.strict_layout { DecodeOptions::strict() } else { DecodeOptions::default() };
		Ok(Parser::new(self.format(path)?).with_options(options))
	}
}

/// Parse an explicit dialect label, falling back to the file extension.
pub(crate) fn resolve_dialect(label: Option<&str>, path: &Path) -> Result<Dialect> {
	match label {
		Some(label) => label.parse(),
		None => Dialect::from_path(path).ok_or_else(|| ModelError::UnknownLabel {
			kind: "dialect",
			value: path.display().to_string(),
		}),
	}
}

/// Render a section tag the way the header table is usually quoted.
pub(crate) fn tag_hex(tag: u32) -> String {
	format!("0x{tag:04x}")
}

/// Logical section label for a tag, or `?` when the dialect does not know it.
pub(crate) fn section_label(tag: u32, dialect: Dialect) -> String {
	SectionName::from_tag(tag, dialect).map_or_else(|| "?".to_owned(), |name| name.as_str().to_owned())
}

/// Render the opaque signature with non-printable bytes escaped.
pub(crate) fn render_signature(signature: &[u8; 8]) -> String {
	let mut out = String::new();
	for byte in signature {
		if byte.is_ascii_graphic() || *byte == b' ' {
			out.push(char::from(*byte));
		} else {
			out.push_str(&format!("\\x{byte:02x}"));
		}
	}
	out
}

/// Print a serializable payload as pretty JSON on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) -> Result<()> {
	let text = serde_json::to_string_pretty(payload).map_err(std::io::Error::from)?;
	println!("{text}");
	Ok(())
}
