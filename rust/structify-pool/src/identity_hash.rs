//! An identity hasher for address keys.

use std::collections::HashMap;
use std::hash::Hasher;

/// A `HashMap` keyed by machine addresses, using the address value itself as
/// the hash. Addresses returned by the allocator are already well
/// distributed, so hashing them again buys nothing.
pub type AddressMap<V> = HashMap<usize, V, std::hash::BuildHasherDefault<IdentityHasher>>;

/// A hasher that returns the written integer as the hash value.
///
/// Only the integer `write_*` methods are supported; feeding it arbitrary
/// byte slices is a programming error.
#[derive(Default)]
pub struct IdentityHasher(u64);

impl Hasher for IdentityHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }

    #[inline]
    fn write(&mut self, _: &[u8]) {
        unimplemented!("IdentityHasher is only implemented for integer keys");
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }

    #[inline]
    fn write_usize(&mut self, i: usize) {
        self.0 = i as u64;
    }
}
