use std::path::PathBuf;

use gamdoc::model::layouts::{info_scope, section_schema};
use gamdoc::model::{Cursor, Info, ModelError, Result, Scope, SectionName, SectionTable, Value};
use log::warn;

use crate::cmd::util::{FormatArgs, emit_json};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub section: String,
	#[command(flatten)]
	pub format: FormatArgs,
	#[arg(long = "max-array", default_value_t = 16)]
	pub max_array: usize,
	#[arg(long = "max-depth", default_value_t = 8)]
	pub max_depth: u32,
	#[arg(long)]
	pub json: bool,
}

/// Output truncation limits for decoded values.
#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
	/// Maximum number of elements printed for arrays.
	pub max_array_items: usize,
	/// Maximum recursive print depth for nested arrays/structs.
	pub max_print_depth: u32,
}

/// Decode one section through its generic record schema and print the value tree.
pub fn run(args: Args) -> Result<()> {
	let Args {
		path,
		section,
		format,
		max_array,
		max_depth,
		json,
	} = args;

	let name = section.parse::<SectionName>()?;
	let format = format.format(&path)?;
	let dialect = format.dialect;
	let bytes = std::fs::read(&path)?;
	let table = SectionTable::parse(&bytes)?;

	let info = match table.find(SectionName::Info, dialect) {
		Some(header) => Info::load(&mut Cursor::new(header.payload(&bytes)?), dialect).map_err(|err| err.in_section(SectionName::Info, dialect, header.offset))?,
		None => Info::default(),
	};
	let header = table.find(name, dialect).ok_or(ModelError::MissingSection { section: name, dialect })?;
	let codec = section_schema(name, format, &info).ok_or_else(|| ModelError::UnknownLabel {
		kind: "generic section",
		value: name.as_str().to_owned(),
	})?;

	let fields = info_scope(&info);
	let payload = header.payload(&bytes)?;
	let (value, used) = codec
		.decode(payload, format, &Scope::new(&fields))
		.map_err(|err| err.in_section(name, dialect, header.offset))?;
	if used != payload.len() {
		warn!("{name} generic decode left {} of {} bytes unread", payload.len() - used, payload.len());
	}

	if json {
		let out = RecordsJson {
			path: path.display().to_string(),
			section: name.as_str().to_owned(),
			offset: header.offset,
			size: header.size,
			consumed: used,
			value: value_json(&value),
		};
		return emit_json(&out);
	}

	println!("path: {}", path.display());
	println!("section: {name} at {} ({} bytes, {used} decoded)", header.offset, header.size);
	let options = PrintOptions {
		max_array_items: max_array,
		max_print_depth: max_depth,
	};
	print_value(&value, 0, 0, options);
	Ok(())
}

/// Print one decoded value tree.
pub fn print_value(value: &Value, indent: usize, depth: u32, options: PrintOptions) {
	let pad = " ".repeat(indent);
	match value {
		Value::I64(v) => println!("{pad}{v}"),
		Value::U64(v) => println!("{pad}{v}"),
		Value::F32(v) => println!("{pad}{v}"),
		Value::Bytes(v) => println!("{pad}bytes[{}]", v.len()),
		Value::String(v) => println!("{pad}{v:?}"),
		Value::Array(items) => {
			if depth >= options.max_print_depth {
				println!("{pad}[... {} items]", items.len());
				return;
			}
			println!("{pad}[");
			for item in items.iter().take(options.max_array_items) {
				print_value(item, indent + 2, depth + 1, options);
			}
			if items.len() > options.max_array_items {
				println!("{pad}  ... {} more", items.len() - options.max_array_items);
			}
			println!("{pad}]");
		}
		Value::Struct(item) => {
			if depth >= options.max_print_depth {
				println!("{pad}{} {{ ... }}", item.type_name);
				return;
			}
			println!("{pad}{} {{", item.type_name);
			for field in &item.fields {
				print!("{pad}  {} = ", field.name);
				if matches!(field.value, Value::Struct(_) | Value::Array(_)) {
					println!();
					print_value(&field.value, indent + 4, depth + 1, options);
				} else {
					print_value(&field.value, 0, depth + 1, options);
				}
			}
			println!("{pad}}}");
		}
	}
}

/// Convert a decoded value tree into JSON, keeping field order.
pub(crate) fn value_json(value: &Value) -> serde_json::Value {
	match value {
		Value::I64(v) => serde_json::Value::from(*v),
		Value::U64(v) => serde_json::Value::from(*v),
		Value::F32(v) => serde_json::Value::from(f64::from(*v)),
		Value::Bytes(v) => serde_json::Value::from(v.iter().map(|byte| format!("{byte:02x}")).collect::<String>()),
		Value::String(v) => serde_json::Value::from(v.as_ref()),
		Value::Array(items) => serde_json::Value::Array(items.iter().map(value_json).collect()),
		Value::Struct(item) => {
			let mut map = serde_json::Map::new();
			map.insert("type".to_owned(), serde_json::Value::from(item.type_name.as_ref()));
			for field in &item.fields {
				map.insert(field.name.to_string(), value_json(&field.value));
			}
			serde_json::Value::Object(map)
		}
	}
}

#[derive(serde::Serialize)]
struct RecordsJson {
	path: String,
	section: String,
	offset: u64,
	size: u32,
	consumed: usize,
	value: serde_json::Value,
}

#[cfg(test)]
mod tests;
