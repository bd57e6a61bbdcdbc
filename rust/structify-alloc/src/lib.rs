//! Raw aligned heap allocation and the building blocks layered directly on
//! top of it: guard-sentinel corruption detection, the struct layout trait
//! and a growable aligned element array.

pub mod dynamic;
pub mod guard;
pub mod layout;
pub mod raw;

pub use dynamic::DynamicArray;
pub use guard::GuardedBlock;
pub use layout::StructLayout;
pub use raw::RawBlock;
