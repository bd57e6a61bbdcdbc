//! Aligned raw heap blocks.
//!
//! `RawBlock` is the single allocation primitive everything else builds on.
//! The block records the exact `(size, alignment)` layout it was allocated
//! with and deallocates with that identical layout, so releasing a block is
//! always well-defined without any base-pointer bookkeeping.

use std::alloc::{Layout, alloc_zeroed, dealloc, handle_alloc_error};
use std::ptr::NonNull;

use structify_common::error::Error;
use structify_common::{Result, verify_arg};

/// An owned, aligned block of heap memory.
///
/// The returned address satisfies `address % alignment == 0` and `size`
/// usable, zero-initialized bytes follow it. The block is released exactly
/// once, on drop.
pub struct RawBlock {
    ptr: NonNull<u8>,
    size: usize,
    alignment: usize,
}

impl RawBlock {
    /// Allocates a zeroed block of `size` bytes at the given alignment.
    ///
    /// An alignment of `0` or `1` means no constraint and is normalized to 1.
    ///
    /// # Arguments
    ///
    /// * `size` - Usable size of the block in bytes; must be non-zero.
    /// * `alignment` - Required address alignment; must be a power of two
    ///   (or 0/1 for none).
    ///
    /// # Errors
    ///
    /// Fails with `InvalidArgument` when `size` is zero or the alignment is
    /// not a power of two.
    pub fn allocate(size: usize, alignment: usize) -> Result<RawBlock> {
        let alignment = alignment.max(1);
        verify_arg!(size, size > 0);
        verify_arg!(alignment, alignment.is_power_of_two());
        let layout = Layout::from_size_align(size, alignment)
            .map_err(|_| Error::invalid_arg("layout", "size overflows when padded to alignment"))?;
        let ptr = unsafe { alloc_zeroed(layout) };
        let Some(ptr) = NonNull::new(ptr) else {
            handle_alloc_error(layout);
        };
        Ok(RawBlock {
            ptr,
            size,
            alignment,
        })
    }

    /// Allocates a block sized and aligned for `count` elements of the given
    /// element size.
    pub fn allocate_array(count: usize, element_size: usize, alignment: usize) -> Result<RawBlock> {
        let size = count
            .checked_mul(element_size)
            .ok_or_else(|| Error::invalid_arg("count", "array size overflows"))?;
        Self::allocate(size, alignment)
    }

    /// Returns the block address as an integer.
    #[inline]
    pub fn address(&self) -> usize {
        self.ptr.as_ptr() as usize
    }

    /// Returns the usable size of the block in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the alignment the block was allocated with.
    #[inline]
    pub fn alignment(&self) -> usize {
        self.alignment
    }

    /// Returns the block contents as a byte slice.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.size) }
    }

    /// Returns the block contents as a mutable byte slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.size) }
    }

    /// Returns a raw pointer to the start of the block.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    /// Returns a mutable raw pointer to the start of the block.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Resets every byte of the block to zero.
    pub fn zero(&mut self) {
        unsafe {
            self.ptr.as_ptr().write_bytes(0, self.size);
        }
    }
}

impl Drop for RawBlock {
    fn drop(&mut self) {
        // The layout is reconstructed from the retained size and alignment,
        // matching the allocation exactly.
        let layout = Layout::from_size_align(self.size, self.alignment).expect("retained layout");
        unsafe {
            dealloc(self.ptr.as_ptr(), layout);
        }
    }
}

impl std::fmt::Debug for RawBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawBlock")
            .field("address", &format_args!("{:#x}", self.address()))
            .field("size", &self.size)
            .field("alignment", &self.alignment)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_respects_alignment() {
        for alignment in [1usize, 2, 4, 8, 16, 64, 128, 4096] {
            let block = RawBlock::allocate(24, alignment).unwrap();
            assert_eq!(block.address() % alignment, 0);
            assert_eq!(block.size(), 24);
            assert_eq!(block.alignment(), alignment);
        }
    }

    #[test]
    fn test_allocate_zeroed() {
        let block = RawBlock::allocate(256, 16).unwrap();
        assert!(block.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_zero_resets_contents() {
        let mut block = RawBlock::allocate(32, 8).unwrap();
        block.as_mut_slice().fill(0xee);
        block.zero();
        assert!(block.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(RawBlock::allocate(0, 8).is_err());
        assert!(RawBlock::allocate(16, 3).is_err());
        assert!(RawBlock::allocate_array(usize::MAX, 2, 8).is_err());
    }

    #[test]
    fn test_zero_alignment_normalized() {
        let block = RawBlock::allocate(8, 0).unwrap();
        assert_eq!(block.alignment(), 1);
    }

    #[test]
    fn test_allocate_array() {
        let block = RawBlock::allocate_array(10, 12, 4).unwrap();
        assert_eq!(block.size(), 120);
        assert_eq!(block.address() % 4, 0);
    }
}
