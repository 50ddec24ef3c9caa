#![allow(missing_docs)]

use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "gamdoc", about = "Targem .gam/.sam model inspection tools")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Container preamble, summary counts, and trailer strings.
	Info(cmd::info::Args),
	/// Decoded model overview.
	Show(cmd::show::Args),
	/// Generic record decode of one section.
	Records(cmd::records::Args),
	/// Decode/encode stability check.
	Verify(cmd::verify::Args),
	/// Re-encode a model in the other dialect.
	Convert(cmd::convert::Args),
}

fn main() {
	env_logger::init();
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> gamdoc::model::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Info(args) => cmd::info::run(args),
		Commands::Show(args) => cmd::show::run(args),
		Commands::Records(args) => cmd::records::run(args),
		Commands::Verify(args) => cmd::verify::run(args),
		Commands::Convert(args) => cmd::convert::run(args),
	}
}
