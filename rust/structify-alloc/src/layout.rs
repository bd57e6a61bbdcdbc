//! Compile-time layout description of externally defined struct kinds.

use structify_bytes::align::aligned_size;

/// Size and alignment of a C-compatible struct kind.
///
/// The set of struct kinds is open: a new kind plugs into the pools and
/// scopes by implementing this trait, never by touching core logic.
pub trait StructLayout {
    /// Unpadded field span of the struct in bytes.
    const SIZE: usize;

    /// Required address alignment, a power of two.
    const ALIGNMENT: usize;

    /// The struct size rounded up to its own alignment, which is the stride
    /// used when structs of this kind are stored contiguously.
    fn stride() -> usize {
        aligned_size(Self::SIZE, Self::ALIGNMENT)
    }
}
