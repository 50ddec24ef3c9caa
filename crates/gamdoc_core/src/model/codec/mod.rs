//! Declarative record schemas: primitives, structures, arrays, vectors, and dialect dispatch.

mod primitive;
mod schema;
mod value;

pub use primitive::{PrimKind, Primitive};
pub use schema::{Codec, Count, Dynamic, Scope, Structure, StructureBuilder};
pub use value::{FieldValue, StructValue, Value};
