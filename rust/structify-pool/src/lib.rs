//! Fixed-capacity slot pool for same-shaped memory blocks.
//!
//! Every slot is materialized when the pool is constructed; allocation and
//! free only flip ownership state, so the hot path never touches the system
//! allocator. The pool hands out raw slot addresses and validates them on
//! the way back.

use log::debug;

use structify_alloc::{RawBlock, StructLayout};
use structify_common::error::Error;
use structify_common::{Result, verify_arg};

use crate::bit_set::BitSet;
use crate::identity_hash::AddressMap;

pub mod bit_set;
pub mod identity_hash;

/// A pool of `capacity` pre-allocated, reusable fixed-size memory slots.
///
/// Slots move between exactly two states, free and used. Allocation scans
/// for the first free slot in index order; exhaustion is an expected
/// condition and reported as `Ok(None)` rather than an error. Freed slot
/// content is zeroed before the slot is handed out again.
///
/// The pool is not thread-safe; concurrent use requires external
/// synchronization.
pub struct SlotPool {
    slots: Vec<RawBlock>,
    used: BitSet,
    /// Maps the address of every currently used slot to its index.
    address_to_index: AddressMap<usize>,
    allocated: usize,
    element_size: usize,
    disposed: bool,
}

impl SlotPool {
    /// Creates a pool of `capacity` slots of `element_size` bytes each,
    /// every slot allocated at `element_align`.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidArgument` for a zero capacity or element size, or
    /// a non-power-of-two alignment.
    pub fn new(capacity: usize, element_size: usize, element_align: usize) -> Result<SlotPool> {
        verify_arg!(capacity, capacity > 0);
        let mut slots = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            slots.push(RawBlock::allocate(element_size, element_align)?);
        }
        Ok(SlotPool {
            slots,
            used: BitSet::new(capacity),
            address_to_index: AddressMap::default(),
            allocated: 0,
            element_size,
            disposed: false,
        })
    }

    /// Creates a pool whose slots are sized and aligned for the struct kind
    /// `T`.
    pub fn for_struct<T: StructLayout>(capacity: usize) -> Result<SlotPool> {
        Self::new(capacity, T::stride(), T::ALIGNMENT)
    }

    /// Returns the total number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of slots currently in use.
    #[inline]
    pub fn allocated(&self) -> usize {
        debug_assert_eq!(self.allocated, self.used.count_ones());
        self.allocated
    }

    /// Returns the number of free slots.
    #[inline]
    pub fn available(&self) -> usize {
        self.capacity() - self.allocated
    }

    /// Returns the slot size in bytes.
    #[inline]
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// Returns `true` once the pool has been disposed.
    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Takes the first free slot, returning its address, or `None` when the
    /// pool is full.
    ///
    /// Exhaustion is an expected outcome callers must handle; it is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Fails with `PoolDisposed` on a disposed pool.
    pub fn allocate(&mut self) -> Result<Option<usize>> {
        self.check_live()?;
        let Some(index) = self.used.first_unset() else {
            return Ok(None);
        };
        self.used.set(index);
        self.allocated += 1;
        let address = self.slots[index].address();
        self.address_to_index.insert(address, index);
        Ok(Some(address))
    }

    /// Takes `count` free slots at once, returning their addresses.
    ///
    /// Availability is checked up front: either every requested slot is
    /// allocated or none is.
    ///
    /// # Errors
    ///
    /// Fails with `PoolDisposed` on a disposed pool and with
    /// `InsufficientCapacity` when `count` exceeds the available slots (the
    /// pool state is left unchanged).
    pub fn allocate_many(&mut self, count: usize) -> Result<Vec<usize>> {
        self.check_live()?;
        if count > self.available() {
            return Err(Error::insufficient_capacity(count, self.available()));
        }
        let mut addresses = Vec::with_capacity(count);
        for _ in 0..count {
            // Cannot be exhausted: availability was checked above.
            if let Some(address) = self.allocate()? {
                addresses.push(address);
            }
        }
        Ok(addresses)
    }

    /// Returns a slot to the pool.
    ///
    /// The slot content is zeroed before the slot is marked free, so a
    /// subsequent allocation observes a clean block.
    ///
    /// # Errors
    ///
    /// Fails with `PoolDisposed` on a disposed pool and with `NotOwned` when
    /// `address` is not a currently used slot of this pool (this covers
    /// double frees and foreign addresses alike).
    pub fn free(&mut self, address: usize) -> Result<()> {
        self.check_live()?;
        let Some(index) = self.address_to_index.remove(&address) else {
            return Err(Error::not_owned(address));
        };
        self.slots[index].zero();
        self.used.clear(index);
        self.allocated -= 1;
        Ok(())
    }

    /// Returns several slots to the pool, in order.
    ///
    /// Frees are sequential, not atomic: the first failure aborts the
    /// remaining frees and is returned.
    pub fn free_many(&mut self, addresses: &[usize]) -> Result<()> {
        for &address in addresses {
            self.free(address)?;
        }
        Ok(())
    }

    /// Returns the slot bytes for a currently used slot address.
    ///
    /// # Errors
    ///
    /// Fails with `PoolDisposed` on a disposed pool and with `NotOwned` for
    /// addresses the pool has not issued.
    pub fn slot_bytes(&self, address: usize) -> Result<&[u8]> {
        self.check_live()?;
        let Some(&index) = self.address_to_index.get(&address) else {
            return Err(Error::not_owned(address));
        };
        Ok(self.slots[index].as_slice())
    }

    /// Returns the mutable slot bytes for a currently used slot address.
    pub fn slot_bytes_mut(&mut self, address: usize) -> Result<&mut [u8]> {
        self.check_live()?;
        let Some(&index) = self.address_to_index.get(&address) else {
            return Err(Error::not_owned(address));
        };
        Ok(self.slots[index].as_mut_slice())
    }

    /// Releases every slot and marks the pool disposed.
    ///
    /// All underlying blocks are released exactly once; calling `dispose` on
    /// an already disposed pool is a no-op. Every other operation fails with
    /// `PoolDisposed` afterwards.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        debug!(
            "disposing slot pool: capacity {}, {} slot(s) still in use",
            self.capacity(),
            self.allocated
        );
        self.slots.clear();
        self.used.clear_all();
        self.address_to_index.clear();
        self.allocated = 0;
        self.disposed = true;
    }

    #[inline]
    fn check_live(&self) -> Result<()> {
        if self.disposed {
            Err(Error::pool_disposed())
        } else {
            Ok(())
        }
    }
}

impl Drop for SlotPool {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for SlotPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotPool")
            .field("capacity", &self.capacity())
            .field("allocated", &self.allocated)
            .field("element_size", &self.element_size)
            .field("disposed", &self.disposed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use structify_common::error::ErrorKind;

    struct Point;

    impl StructLayout for Point {
        const SIZE: usize = 8;
        const ALIGNMENT: usize = 4;
    }

    #[test]
    fn test_slots_are_aligned_and_distinct() {
        let mut pool = SlotPool::new(4, 16, 16).unwrap();
        let addresses = pool.allocate_many(4).unwrap();
        for &address in &addresses {
            assert_eq!(address % 16, 0);
        }
        let mut unique = addresses.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_allocated_plus_available_is_capacity() {
        let mut pool = SlotPool::new(6, 8, 8).unwrap();
        let mut held = Vec::new();
        for step in 0..6 {
            held.push(pool.allocate().unwrap().unwrap());
            assert_eq!(pool.allocated() + pool.available(), pool.capacity());
            assert_eq!(pool.allocated(), step + 1);
        }
        while let Some(address) = held.pop() {
            pool.free(address).unwrap();
            assert_eq!(pool.allocated() + pool.available(), pool.capacity());
        }
        assert_eq!(pool.available(), 6);
    }

    #[test]
    fn test_exhaustion_is_soft() {
        let mut pool = SlotPool::new(2, 8, 8).unwrap();
        assert!(pool.allocate().unwrap().is_some());
        assert!(pool.allocate().unwrap().is_some());
        assert_eq!(pool.allocate().unwrap(), None);
    }

    #[test]
    fn test_allocate_many_checks_up_front() {
        let mut pool = SlotPool::new(5, 8, 8).unwrap();
        pool.allocate().unwrap().unwrap();
        let err = pool.allocate_many(5).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::InsufficientCapacity {
                requested: 5,
                available: 4
            }
        ));
        // Nothing was allocated by the failed batch.
        assert_eq!(pool.allocated(), 1);
    }

    #[test]
    fn test_free_zeroes_slot_for_reuse() {
        let mut pool = SlotPool::new(1, 8, 8).unwrap();
        let address = pool.allocate().unwrap().unwrap();
        pool.slot_bytes_mut(address).unwrap().fill(0xab);
        pool.free(address).unwrap();
        let reused = pool.allocate().unwrap().unwrap();
        assert_eq!(reused, address);
        assert!(pool.slot_bytes(reused).unwrap().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_foreign_and_double_free_rejected() {
        let mut pool = SlotPool::new(2, 8, 8).unwrap();
        let address = pool.allocate().unwrap().unwrap();
        assert!(matches!(
            pool.free(0xdead_0000).unwrap_err().kind(),
            ErrorKind::NotOwned { .. }
        ));
        pool.free(address).unwrap();
        assert!(pool.free(address).is_err());
    }

    #[test]
    fn test_free_many_aborts_on_failure() {
        let mut pool = SlotPool::new(3, 8, 8).unwrap();
        let addresses = pool.allocate_many(3).unwrap();
        let batch = [addresses[0], 0xbad_add0, addresses[1]];
        assert!(pool.free_many(&batch).is_err());
        // The first free landed, the failing one aborted the rest.
        assert_eq!(pool.allocated(), 2);
    }

    #[test]
    fn test_lifecycle_scenario() {
        // Capacity 10: fill, observe soft exhaustion, free half, refill with
        // reused addresses, dispose, observe loud failure.
        let mut pool = SlotPool::for_struct::<Point>(10).unwrap();
        let addresses = pool.allocate_many(10).unwrap();
        assert_eq!(pool.allocate().unwrap(), None);

        for &address in &addresses[..5] {
            pool.free(address).unwrap();
        }
        let reused = pool.allocate_many(5).unwrap();
        for address in &reused {
            assert!(addresses.contains(address));
        }
        assert_eq!(pool.available(), 0);

        pool.dispose();
        assert!(pool.is_disposed());
        assert!(matches!(
            pool.allocate().unwrap_err().kind(),
            ErrorKind::PoolDisposed
        ));
        assert!(pool.free(addresses[9]).is_err());
        assert!(pool.allocate_many(1).is_err());

        // Second dispose is a no-op.
        pool.dispose();
        assert!(pool.is_disposed());
    }

    #[test]
    fn test_for_struct_layout() {
        let pool = SlotPool::for_struct::<Point>(2).unwrap();
        assert_eq!(pool.element_size(), 8);
    }
}
