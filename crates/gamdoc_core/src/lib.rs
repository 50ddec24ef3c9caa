//! Public library API for decoding and encoding Targem `.gam`/`.sam` model containers.

/// Container parsing, record codecs, entity models, and the load/dump facade.
pub mod model;
