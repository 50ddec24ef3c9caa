use crate::model::bytes::{ByteWriter, Cursor};
use crate::model::{Dialect, ModelError, Result};

/// Texture reference of a material.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Texture {
	/// Texture file name, at most 40 encoded bytes.
	pub filename: String,
	/// UV channel.
	pub uv: u32,
	/// Texture role.
	pub kind: u32,
}

impl Texture {
	/// Width of the filename field.
	pub const NAME_WIDTH: usize = 40;
	/// Encoded size.
	pub const SIZE: usize = 48;

	fn load(cursor: &mut Cursor<'_>) -> Result<Self> {
		Ok(Self {
			filename: cursor.read_fixed_str(Self::NAME_WIDTH)?,
			uv: cursor.read_u32()?,
			kind: cursor.read_u32()?,
		})
	}

	fn dump(&self, writer: &mut ByteWriter) -> Result<()> {
		writer.write_fixed_str(&self.filename, Self::NAME_WIDTH)?;
		writer.write_u32(self.uv);
		writer.write_u32(self.kind);
		Ok(())
	}
}

/// Surface description of one material slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
	/// Diffuse RGBA.
	pub diffuse: [f32; 4],
	/// Ambient RGBA.
	pub ambient: [f32; 4],
	/// Specular RGBA.
	pub specular: [f32; 4],
	/// Emissive RGBA.
	pub emissive: [f32; 4],
	/// Specular power.
	pub power: f32,
	/// Shader name; `.gam` stores at most 100 bytes.
	pub shader: String,
	/// Texture references.
	pub textures: Vec<Texture>,
}

impl Default for Material {
	fn default() -> Self {
		Self {
			diffuse: [1.0; 4],
			ambient: [1.0; 4],
			specular: [0.0, 0.0, 0.0, 1.0],
			emissive: [0.0, 0.0, 0.0, 1.0],
			power: 0.0,
			shader: String::new(),
			textures: Vec::new(),
		}
	}
}

impl Material {
	/// Width of the `.gam` shader field.
	pub const SHADER_WIDTH: usize = 100;

	/// Decode one material.
	pub fn load(cursor: &mut Cursor<'_>, dialect: Dialect) -> Result<Self> {
		let diffuse = cursor.read_f32s()?;
		let ambient = cursor.read_f32s()?;
		let (specular, emissive) = match dialect {
			Dialect::Gam => {
				let emissive = cursor.read_f32s()?;
				(cursor.read_f32s()?, emissive)
			}
			Dialect::Sam => {
				let specular = cursor.read_f32s()?;
				(specular, cursor.read_f32s()?)
			}
		};
		let power = cursor.read_f32()?;
		let texture_count = cursor.read_u32()? as usize;
		let shader = match dialect {
			Dialect::Gam => cursor.read_fixed_str(Self::SHADER_WIDTH)?,
			Dialect::Sam => cursor.read_prefixed_str()?,
		};

		if texture_count.saturating_mul(Texture::SIZE) > cursor.remaining() {
			return Err(ModelError::TruncatedInput {
				at: cursor.pos(),
				need: texture_count.saturating_mul(Texture::SIZE),
				rem: cursor.remaining(),
			});
		}
		let mut textures = Vec::with_capacity(texture_count);
		for _ in 0..texture_count {
			textures.push(Texture::load(cursor)?);
		}

		Ok(Self {
			diffuse,
			ambient,
			specular,
			emissive,
			power,
			shader,
			textures,
		})
	}

	/// Encode one material.
	pub fn dump(&self, writer: &mut ByteWriter, dialect: Dialect) -> Result<()> {
		writer.write_f32s(&self.diffuse);
		writer.write_f32s(&self.ambient);
		match dialect {
			Dialect::Gam => {
				writer.write_f32s(&self.emissive);
				writer.write_f32s(&self.specular);
			}
			Dialect::Sam => {
				writer.write_f32s(&self.specular);
				writer.write_f32s(&self.emissive);
			}
		}
		writer.write_f32(self.power);
		writer.write_count("texture count", self.textures.len())?;
		match dialect {
			Dialect::Gam => writer.write_fixed_str(&self.shader, Self::SHADER_WIDTH)?,
			Dialect::Sam => writer.write_prefixed_str(&self.shader)?,
		}
		for texture in &self.textures {
			texture.dump(writer)?;
		}
		Ok(())
	}
}

/// Palette of materials, one per mesh material slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skin {
	/// Materials in slot order.
	pub materials: Vec<Material>,
}

impl Skin {
	/// Synthesized `Skin.NN` label.
	pub fn display_name(index: usize) -> String {
		format!("Skin.{index:02}")
	}

	/// Synthesized `Material.SS.MM` label.
	pub fn material_name(skin: usize, slot: usize) -> String {
		format!("Material.{skin:02}.{slot:02}")
	}
}

/// Decode the MATERIALS section; every skin holds `material_count` materials.
pub fn load_skins(cursor: &mut Cursor<'_>, dialect: Dialect, material_count: usize) -> Result<Vec<Skin>> {
	let skin_count = cursor.read_count(material_count.min(1) * 72)?;
	let mut skins = Vec::with_capacity(skin_count);
	for _ in 0..skin_count {
		let mut materials = Vec::with_capacity(material_count.min(cursor.remaining() / 72));
		for _ in 0..material_count {
			materials.push(Material::load(cursor, dialect)?);
		}
		skins.push(Skin { materials });
	}
	Ok(skins)
}

/// Encode the MATERIALS section.
pub fn dump_skins(writer: &mut ByteWriter, dialect: Dialect, skins: &[Skin]) -> Result<()> {
	let expected = skins.first().map_or(0, |skin| skin.materials.len());
	for (index, skin) in skins.iter().enumerate() {
		if skin.materials.len() != expected {
			return Err(ModelError::SkinLayoutMismatch {
				skin: index,
				expected,
				got: skin.materials.len(),
			});
		}
	}

	writer.write_count("skin count", skins.len())?;
	for material in skins.iter().flat_map(|skin| skin.materials.iter()) {
		material.dump(writer, dialect)?;
	}
	Ok(())
}
