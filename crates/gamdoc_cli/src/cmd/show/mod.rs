use std::path::PathBuf;

use gamdoc::model::{Animation, Collider, Group, Mesh, Model, Node, Result, Skin, Skinning};

use crate::cmd::util::{FormatArgs, emit_json};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[command(flatten)]
	pub format: FormatArgs,
	#[arg(long)]
	pub json: bool,
}

/// Decode a model and print its node forest and entity summaries.
pub fn run(args: Args) -> Result<()> {
	let Args { path, format, json } = args;

	let parser = format.parser(&path)?;
	let model = parser.open(&path)?;

	if json {
		return emit_json(&ShowJson::from_model(path.display().to_string(), &model));
	}

	println!("path: {}", path.display());
	println!("format: {}", parser.format());

	println!("nodes: {}", model.nodes.len());
	let children = child_lists(&model.nodes);
	for (idx, node) in model.nodes.iter().enumerate() {
		if node.parent < 0 {
			print_node(&model.nodes, &children, idx, 1);
		}
	}

	println!("meshes: {}", model.meshes.len());
	println!("  idx\tname\tformat\tdraw\tvertices\ttriangles\tparent\tmaterial\tskinning");
	for (idx, mesh) in model.meshes.iter().enumerate() {
		println!(
			"  {idx}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
			mesh.display_name(idx),
			mesh.format.name(),
			mesh.draw_type,
			mesh.vertices.len(),
			mesh.indices.len(),
			mesh.parent,
			mesh.material,
			skinning_label(&mesh.skinning)
		);
	}
	if let Some(bounds) = &model.mesh_bounds {
		println!("  bounds: {:?} .. {:?}", bounds.min, bounds.max);
	}

	println!("animations: {}", model.animations.len());
	for (idx, animation) in model.animations.iter().enumerate() {
		println!(
			"  {}: fps {} frames {} keys {} next {} changes {}",
			animation.display_name(idx),
			animation.fps,
			animation.frames.len(),
			animation.key_count(),
			animation.next,
			animation.changes.len()
		);
	}

	println!("skins: {}", model.skins.len());
	for (skin_idx, skin) in model.skins.iter().enumerate() {
		println!("  {}:", Skin::display_name(skin_idx));
		for (slot, material) in skin.materials.iter().enumerate() {
			let textures: Vec<&str> = material.textures.iter().map(|texture| texture.filename.as_str()).collect();
			println!(
				"    {}: shader {:?} textures [{}]",
				Skin::material_name(skin_idx, slot),
				material.shader,
				textures.join(", ")
			);
		}
	}

	if let Some(convex) = &model.convex {
		println!("convex: {} vertices, {} triangles", convex.vertices.len(), convex.indices.len());
	}
	println!("collisions: {}", model.collisions.len());
	for (idx, collider) in model.collisions.iter().enumerate() {
		println!("  {}: kind {} size {:?}", Collider::display_name(idx), collider.kind, collider.size);
	}
	println!("hier_geoms: {}", model.hier_geoms.len());
	for item in &model.hier_geoms {
		println!("  bone {}: kind {}", node_label(&model.nodes, item.bone as usize), item.collider.kind);
	}
	println!("bounds: {}", model.bounds.len());
	for item in &model.bounds {
		println!("  bone {}: {:?} .. {:?}", node_label(&model.nodes, item.bone as usize), item.min_rotation, item.max_rotation);
	}

	println!("groups: {}", model.groups.len());
	for (idx, group) in model.groups.iter().enumerate() {
		println!("  {}: min {} max {} variants {}", group.display_name(idx), group.min, group.max, group.variants.len());
	}

	Ok(())
}

fn child_lists(nodes: &[Node]) -> Vec<Vec<usize>> {
	let mut children = vec![Vec::new(); nodes.len()];
	for (idx, node) in nodes.iter().enumerate() {
		if let Ok(parent) = usize::try_from(node.parent)
			&& let Some(list) = children.get_mut(parent)
		{
			list.push(idx);
		}
	}
	children
}

fn print_node(nodes: &[Node], children: &[Vec<usize>], idx: usize, depth: usize) {
	let node = &nodes[idx];
	println!("{}{idx}: {} at {:?}", "  ".repeat(depth), node.display_name(idx), node.location);
	for child in &children[idx] {
		print_node(nodes, children, *child, depth + 1);
	}
}

fn node_label(nodes: &[Node], idx: usize) -> String {
	nodes.get(idx).map_or_else(|| format!("#{idx}"), |node| node.display_name(idx))
}

fn skinning_label(skinning: &Skinning) -> &'static str {
	match skinning {
		Skinning::None => "none",
		Skinning::Doubles(_) => "doubles",
		Skinning::Influences(_) => "influences",
	}
}

#[derive(serde::Serialize)]
struct NodeJson {
	index: usize,
	name: String,
	parent: i32,
	location: [f32; 3],
}

#[derive(serde::Serialize)]
struct MeshJson {
	index: usize,
	name: String,
	format: String,
	draw_type: u32,
	vertices: usize,
	triangles: usize,
	parent: i32,
	material: i32,
	skinning: String,
}

impl MeshJson {
	fn from_mesh(index: usize, mesh: &Mesh) -> Self {
		Self {
			index,
			name: mesh.display_name(index),
			format: mesh.format.name().to_owned(),
			draw_type: mesh.draw_type,
			vertices: mesh.vertices.len(),
			triangles: mesh.indices.len(),
			parent: mesh.parent,
			material: mesh.material,
			skinning: skinning_label(&mesh.skinning).to_owned(),
		}
	}
}

#[derive(serde::Serialize)]
struct AnimationJson {
	name: String,
	fps: u32,
	frames: usize,
	keys: usize,
	next: i32,
}

impl AnimationJson {
	fn from_animation(index: usize, animation: &Animation) -> Self {
		Self {
			name: animation.display_name(index),
			fps: animation.fps,
			frames: animation.frames.len(),
			keys: animation.key_count(),
			next: animation.next,
		}
	}
}

#[derive(serde::Serialize)]
struct MaterialJson {
	name: String,
	shader: String,
	textures: Vec<String>,
}

#[derive(serde::Serialize)]
struct GroupJson {
	name: String,
	min: u32,
	max: u32,
	variants: Vec<Vec<u32>>,
}

impl GroupJson {
	fn from_group(index: usize, group: &Group) -> Self {
		Self {
			name: group.display_name(index),
			min: group.min,
			max: group.max,
			variants: group.variants.clone(),
		}
	}
}

#[derive(serde::Serialize)]
struct ShowJson {
	path: String,
	nodes: Vec<NodeJson>,
	meshes: Vec<MeshJson>,
	animations: Vec<AnimationJson>,
	skins: Vec<Vec<MaterialJson>>,
	convex: bool,
	collisions: usize,
	hier_geoms: usize,
	bounds: usize,
	groups: Vec<GroupJson>,
}

impl ShowJson {
	fn from_model(path: String, model: &Model) -> Self {
		Self {
			path,
			nodes: model
				.nodes
				.iter()
				.enumerate()
				.map(|(index, node)| NodeJson {
					index,
					name: node.display_name(index),
					parent: node.parent,
					location: node.location,
				})
				.collect(),
			meshes: model.meshes.iter().enumerate().map(|(idx, mesh)| MeshJson::from_mesh(idx, mesh)).collect(),
			animations: model
				.animations
				.iter()
				.enumerate()
				.map(|(idx, animation)| AnimationJson::from_animation(idx, animation))
				.collect(),
			skins: model
				.skins
				.iter()
				.enumerate()
				.map(|(skin_idx, skin)| {
					skin.materials
						.iter()
						.enumerate()
						.map(|(slot, material)| MaterialJson {
							name: Skin::material_name(skin_idx, slot),
							shader: material.shader.clone(),
							textures: material.textures.iter().map(|texture| texture.filename.clone()).collect(),
						})
						.collect()
				})
				.collect(),
			convex: model.convex.is_some(),
			collisions: model.collisions.len(),
			hier_geoms: model.hier_geoms.len(),
			bounds: model.bounds.len(),
			groups: model.groups.iter().enumerate().map(|(idx, group)| GroupJson::from_group(idx, group)).collect(),
		}
	}
}

#[cfg(test)]
mod tests;
