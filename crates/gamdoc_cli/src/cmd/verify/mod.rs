use std::path::PathBuf;

use gamdoc::model::Result;
use log::debug;

use crate::cmd::util::{FormatArgs, emit_json};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[command(flatten)]
	pub format: FormatArgs,
	#[arg(long)]
	pub json: bool,
}

/// Load, dump, load, and dump again, then report model equality and byte stability.
pub fn run(args: Args) -> Result<()> {
	let Args { path, format, json } = args;

	let parser = format.parser(&path)?;
	let input = std::fs::read(&path)?;

	let first = parser.load(&input)?;
	let first_bytes = parser.dump(&first)?;
	let second = parser.load(&first_bytes)?;
	let second_bytes = parser.dump(&second)?;
	debug!("verify {}: input {} bytes, encoded {} then {}", path.display(), input.len(), first_bytes.len(), second_bytes.len());

	let report = VerifyJson {
		path: path.display().to_string(),
		input_size: input.len(),
		encoded_size: first_bytes.len(),
		model_equal: first == second,
		byte_stable: first_bytes == second_bytes,
		identical_to_input: first_bytes == input,
	};

	if json {
		return emit_json(&report);
	}

	println!("path: {}", report.path);
	println!("input_size: {}", report.input_size);
	println!("encoded_size: {}", report.encoded_size);
	println!("model_equal: {}", report.model_equal);
	println!("byte_stable: {}", report.byte_stable);
	println!("identical_to_input: {}", report.identical_to_input);
	Ok(())
}

#[derive(serde::Serialize)]
struct VerifyJson {
	path: String,
	input_size: usize,
	encoded_size: usize,
	model_equal: bool,
	byte_stable: bool,
	identical_to_input: bool,
}

#[cfg(test)]
mod tests;
