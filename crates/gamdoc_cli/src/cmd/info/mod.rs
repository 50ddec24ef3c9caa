use std::path::PathBuf;

use gamdoc::model::{Info, MeshCounts, Result, SectionTable, Trailer};

use crate::cmd::util::{FormatArgs, emit_json, render_signature, section_label, tag_hex};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[command(flatten)]
	pub format: FormatArgs,
	#[arg(long)]
	pub json: bool,
}

/// Print the container preamble, summary counts, and trailer strings.
pub fn run(args: Args) -> Result<()> {
	let Args { path, format, json } = args;

	let parser = format.parser(&path)?;
	let bytes = std::fs::read(&path)?;
	let table = SectionTable::parse(&bytes)?;
	let model = parser.load(&bytes)?;
	let dialect = parser.format().dialect;

	if json {
		let payload = InfoJson {
			path: path.display().to_string(),
			format: FormatJson {
				dialect: dialect.as_str().to_owned(),
				game: parser.format().game.as_str().to_owned(),
			},
			signature: render_signature(&table.signature),
			file_size: bytes.len(),
			monotonic: table.is_monotonic(),
			sections: table
				.headers
				.iter()
				.map(|header| SectionJson {
					name: section_label(header.tag, dialect),
					tag: tag_hex(header.tag),
					offset: header.offset,
					size: header.size,
				})
				.collect(),
			counts: CountsJson::from_info(&model.info),
			trailer: TrailerJson::from_trailer(&model.trailer),
		};
		return emit_json(&payload);
	}

	println!("path: {}", path.display());
	println!("format: {}", parser.format());
	println!("signature: {}", render_signature(&table.signature));
	println!("file_size: {}", bytes.len());
	println!("monotonic: {}", table.is_monotonic());
	println!("sections: {}", table.headers.len());
	println!("name\ttag\toffset\tsize");
	for header in &table.headers {
		println!("{}\t{}\t{}\t{}", section_label(header.tag, dialect), tag_hex(header.tag), header.offset, header.size);
	}

	let info = &model.info;
	match info.meshes {
		MeshCounts::Split { doubled, skinned, statics } => {
			println!("meshes: {} (doubled {doubled}, skinned {skinned}, static {statics})", info.meshes.total());
		}
		MeshCounts::Total(total) => println!("meshes: {total}"),
	}
	println!("animations: {}", info.animations);
	println!("materials: {}", info.materials);
	println!("nodes: {}", info.nodes);
	println!("config: {}", info.config);

	let trailer = &model.trailer;
	println!("tag: {}", trailer.tag);
	println!("version: {}", trailer.version);
	println!("generator: {}", trailer.generator);
	println!("sign: {}", trailer.sign);

	Ok(())
}

#[derive(serde::Serialize)]
struct FormatJson {
	dialect: String,
	game: String,
}

#[derive(serde::Serialize)]
struct SectionJson {
	name: String,
	tag: String,
	offset: u64,
	size: u32,
}

#[derive(serde::Serialize)]
struct CountsJson {
	meshes: u32,
	doubled: Option<u32>,
	skinned: Option<u32>,
	statics: Option<u32>,
	animations: u32,
	materials: u32,
	nodes: u32,
	config: i32,
}

impl CountsJson {
	fn from_info(info: &Info) -> Self {
		let (doubled, skinned, statics) = match info.meshes {
			MeshCounts::Split { doubled, skinned, statics } => (Some(doubled), Some(skinned), Some(statics)),
			MeshCounts::Total(_) => (None, None, None),
		};
		Self {
			meshes: info.meshes.total(),
			doubled,
			skinned,
			statics,
			animations: info.animations,
			materials: info.materials,
			nodes: info.nodes,
			config: info.config,
		}
	}
}

#[derive(serde::Serialize)]
struct TrailerJson {
	tag: String,
	version: u32,
	generator: String,
	sign: String,
}

impl TrailerJson {
	fn from_trailer(trailer: &Trailer) -> Self {
		Self {
			tag: trailer.tag.clone(),
			version: trailer.version,
			generator: trailer.generator.clone(),
			sign: trailer.sign.clone(),
		}
	}
}

#[derive(serde::Serialize)]
struct InfoJson {
	path: String,
	format: FormatJson,
	signature: String,
	file_size: usize,
	monotonic: bool,
	sections: Vec<SectionJson>,
	counts: CountsJson,
	trailer: TrailerJson,
}
