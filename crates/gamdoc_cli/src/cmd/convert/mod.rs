use std::path::PathBuf;

use gamdoc::model::{Format, Parser, Result};
use log::info;

use crate::cmd::util::{FormatArgs, emit_json, resolve_dialect};

#[derive(clap::Args)]
pub struct Args {
	pub input: PathBuf,
	pub output: PathBuf,
	/// Target dialect; inferred from the output extension when omitted.
	#[arg(long = "to")]
	pub to: Option<String>,
	#[command(flatten)]
	pub format: FormatArgs,
	#[arg(long)]
	pub json: bool,
}

/// Re-encode a model in the target dialect.
pub fn run(args: Args) -> Result<()> {
	let Args {
		input,
		output,
		to,
		format,
		json,
	} = args;

	let parser = format.parser(&input)?;
	let source = parser.format();
	let target = resolve_dialect(to.as_deref(), &output)?;

	let model = parser.open(&input)?;
	let converted = model.converted(target)?;
	Parser::new(Format::new(target, source.game)).save(&converted, &output)?;
	info!("converted {} ({}) to {} ({})", input.display(), source.dialect, output.display(), target);

	let report = ConvertJson {
		input: input.display().to_string(),
		output: output.display().to_string(),
		from: source.dialect.as_str().to_owned(),
		to: target.as_str().to_owned(),
		nodes: converted.nodes.len(),
		meshes: converted.meshes.len(),
		animations: converted.animations.len(),
	};
	if json {
		return emit_json(&report);
	}

	println!("{} -> {}", report.input, report.output);
	println!("dialect: {} -> {}", report.from, report.to);
	println!("nodes: {} meshes: {} animations: {}", report.nodes, report.meshes, report.animations);
	Ok(())
}

#[derive(serde::Serialize)]
struct ConvertJson {
	input: String,
	output: String,
	from: String,
	to: String,
	nodes: usize,
	meshes: usize,
	animations: usize,
}
