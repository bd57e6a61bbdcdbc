//! Scope-based lifetime management for off-heap allocations.
//!
//! A [`Scope`] owns a set of heterogeneous raw blocks and guarantees bulk
//! release when it is disposed; the [`ScopeRegistry`] manages named scopes;
//! [`RefCounted`] adds explicit shared ownership for the blocks that need it.

pub mod refcount;
pub mod registry;
pub mod scope;

pub use refcount::RefCounted;
pub use registry::ScopeRegistry;
pub use scope::Scope;
