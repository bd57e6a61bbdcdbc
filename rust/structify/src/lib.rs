//! Manual, C-compatible struct memory layout control: explicit field
//! alignment and padding, endian-aware byte encoding, fixed-capacity memory
//! pooling and scope-based lifetime management for off-heap allocations.
//!
//! This crate re-exports the public surface of the `structify-*` crates:
//!
//! - [`bytes`](structify_bytes): alignment/padding math, byte-order
//!   conversion and the offset-addressed buffer codec.
//! - [`alloc`](structify_alloc): raw aligned blocks, guard-sentinel
//!   corruption detection, struct layout descriptions and the dynamic
//!   aligned array.
//! - [`pool`](structify_pool): the fixed-capacity slot pool.
//! - [`arena`](structify_arena): scopes, the named-scope registry and
//!   explicit reference counting.

pub use structify_alloc as alloc;
pub use structify_arena as arena;
pub use structify_bytes as bytes;
pub use structify_common as common;
pub use structify_pool as pool;

pub use structify_alloc::{DynamicArray, GuardedBlock, RawBlock, StructLayout};
pub use structify_arena::{RefCounted, Scope, ScopeRegistry};
pub use structify_bytes::codec::StructBuffer;
pub use structify_bytes::endian::ByteOrder;
pub use structify_common::Result;
pub use structify_common::error::{Error, ErrorKind};
pub use structify_pool::SlotPool;
