mod animation;
mod bound;
mod bytes;
mod codec;
pub mod codepage;
mod collision;
mod container;
mod error;
mod format;
mod group;
mod info;
pub mod layouts;
mod material;
mod mesh;
mod node;
mod parser;
mod trailer;
mod vertex;

/// Animation records and section codecs.
pub use animation::{Animation, Change, Key, dump_animations, load_animations};
/// Bone rotation limit records.
pub use bound::{BoneBound, dump_bounds, load_bounds};
/// Little-endian cursor and buffer writer.
pub use bytes::{ByteWriter, Cursor};
/// Declarative record schema types and decoded generic values.
pub use codec::{Codec, Count, Dynamic, FieldValue, PrimKind, Primitive, Scope, StructValue, Structure, StructureBuilder, Value};
/// Collision geometry records.
pub use collision::{Collider, ColliderShape, ConvexMesh, HierGeom, dump_colliders, dump_hier_geoms, load_colliders, load_hier_geoms};
/// Container preamble and section table types.
pub use container::{DEFAULT_SIGNATURE, SectionHeader, SectionName, SectionTable};
/// Error and result aliases.
pub use error::{ModelError, Result};
/// Load/dump mode selectors.
pub use format::{Dialect, Format, Game};
/// Mesh group records.
pub use group::{Group, dump_groups, load_groups};
/// Container summary counts.
pub use info::{Info, MeshCounts};
/// Material, texture, and skin records.
pub use material::{Material, Skin, Texture, dump_skins, load_skins};
/// Mesh records, skinning payloads, and section codecs.
pub use mesh::{GAM_INFLUENCE_SLOTS, Influence, InfluenceGroup, Mesh, MeshBounds, Skinning, check_triangles, dump_meshes, load_meshes};
/// Transform node records and hierarchy checks.
pub use node::{IDENTITY, Node, check_node_ref, validate_forest};
/// Whole-model facade, decode options, and convenience entry points.
pub use parser::{DecodeOptions, Model, Parser, dump, dump_with, load, load_with, section_plan};
/// Trailer metadata.
pub use trailer::{GENERATOR, Trailer};
/// Vertex formats, layouts, and attribute types.
pub use vertex::{Position, ResolvedLayout, TexCoord, Vertex, VertexFormat, VertexLayout, component, resolve_components};
