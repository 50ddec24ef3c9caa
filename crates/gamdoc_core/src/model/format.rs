use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::model::ModelError;

/// Physical encoding of a model container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
	/// `.gam` files: explicit counts, per-node matrices, interleaved vertices.
	#[default]
	Gam,
	/// `.sam` files: compact counts, self-describing planar vertex streams.
	Sam,
}

impl Dialect {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Gam => "gam",
			Self::Sam => "sam",
		}
	}

	/// Infer the dialect from a `.gam`/`.sam` file extension.
	pub fn from_path(path: &Path) -> Option<Self> {
		let ext = path.extension()?.to_str()?;
		if ext.eq_ignore_ascii_case("gam") {
			Some(Self::Gam)
		} else if ext.eq_ignore_ascii_case("sam") {
			Some(Self::Sam)
		} else {
			None
		}
	}

	/// The other dialect.
	pub fn other(self) -> Self {
		match self {
			Self::Gam => Self::Sam,
			Self::Sam => Self::Gam,
		}
	}
}

impl fmt::Display for Dialect {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Gam => "GAM",
			Self::Sam => "SAM",
		})
	}
}

impl FromStr for Dialect {
	type Err = ModelError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value.to_ascii_lowercase().as_str() {
			"gam" => Ok(Self::Gam),
			"sam" => Ok(Self::Sam),
			_ => Err(ModelError::UnknownLabel {
				kind: "dialect",
				value: value.to_owned(),
			}),
		}
	}
}

/// Game build a container targets; selects collider record variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Game {
	/// Original "Hard Truck Apocalypse" records.
	#[default]
	Hta,
	/// "Rise of Clans" (`113`) records with an extra collider `gametype` word.
	Clans,
}

impl Game {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Hta => "hta",
			Self::Clans => "113",
		}
	}
}

impl fmt::Display for Game {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Game {
	type Err = ModelError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value.to_ascii_lowercase().as_str() {
			"hta" => Ok(Self::Hta),
			"113" | "clans" => Ok(Self::Clans),
			_ => Err(ModelError::UnknownLabel {
				kind: "game",
				value: value.to_owned(),
			}),
		}
	}
}

/// Complete load/dump mode: container dialect plus target game build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Format {
	/// Container dialect.
	pub dialect: Dialect,
	/// Target game build.
	pub game: Game,
}

impl Format {
	/// Combine a dialect and game build.
	pub fn new(dialect: Dialect, game: Game) -> Self {
		Self { dialect, game }
	}
}

impl From<Dialect> for Format {
	fn from(dialect: Dialect) -> Self {
		Self { dialect, game: Game::Hta }
	}
}

impl fmt::Display for Format {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.dialect, self.game)
	}
}
