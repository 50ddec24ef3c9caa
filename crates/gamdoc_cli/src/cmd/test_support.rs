use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::OnceLock;

use gamdoc::model::{Dialect, Model};
use gamdoc_testkit::{target_dir as workspace_target_dir, write_model};

static GAMDOC_BIN: OnceLock<PathBuf> = OnceLock::new();

pub(crate) fn sample_file(name: &str, model: &Model, dialect: Dialect) -> String {
	write_model(name, model, dialect).to_string_lossy().into_owned()
}

pub(crate) fn run_gamdoc(args: &[&str]) -> Output {
	Command::new(gamdoc_bin()).args(args).output().expect("gamdoc command executes")
}

pub(crate) fn run_gamdoc_json(args: &[&str]) -> serde_json::Value {
	let output = run_gamdoc(args);
	assert!(
		output.status.success(),
		"gamdoc command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

pub(crate) fn gamdoc_bin() -> &'static PathBuf {
	GAMDOC_BIN.get_or_init(resolve_gamdoc_bin)
}

/// Cargo exports `CARGO_BIN_EXE_gamdoc` at compile time for integration tests only; unit
/// tests of this binary build it once instead.
fn resolve_gamdoc_bin() -> PathBuf {
	match option_env!("CARGO_BIN_EXE_gamdoc") {
		Some(path) => PathBuf::from(path),
		None => build_gamdoc_bin(),
	}
}

fn build_gamdoc_bin() -> PathBuf {
	let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
	let mut bin = workspace_target_dir().join("debug");
	bin.push(if cfg!(windows) { "gamdoc.exe" } else { "gamdoc" });

	let status = Command::new("cargo")
		.current_dir(&manifest_dir)
		.args(["build", "--quiet", "--bin", "gamdoc"])
		.status()
		.expect("cargo build executes");
	assert!(status.success(), "failed to build gamdoc binary at {}", bin.display());
	assert!(bin.is_file(), "cargo build did not produce {}", bin.display());

	bin
}
