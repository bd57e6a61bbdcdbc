//! Byte-level primitives for manual struct layout: alignment arithmetic,
//! byte-order conversion and an offset-addressed buffer codec.

pub mod align;
pub mod codec;
pub mod endian;
