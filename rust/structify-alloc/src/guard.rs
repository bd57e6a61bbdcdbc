//! Guard-sentinel corruption detection.

use structify_bytes::align::align_up;
use structify_common::Result;
use structify_common::error::Error;

use crate::raw::RawBlock;

/// The sentinel bit pattern written on both sides of a guarded payload.
pub const GUARD_SENTINEL: u32 = 0xDEAD_BEEF;

/// Size of one guard word in bytes.
const GUARD_SIZE: usize = 4;

/// An aligned payload bracketed by guard sentinels.
///
/// One sentinel word sits immediately before the payload and one immediately
/// after `payload + size`; both are written at construction. The sentinels
/// are purely diagnostic: nothing checks them automatically, callers invoke
/// [`GuardedBlock::check`] on demand.
pub struct GuardedBlock {
    block: RawBlock,
    /// Offset of the payload within the owning block; the leading sentinel
    /// lives in the 4 bytes right before it.
    payload_offset: usize,
    payload_size: usize,
}

impl GuardedBlock {
    /// Allocates a guarded payload of `size` bytes at the given alignment.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidArgument` for a zero size or a non-power-of-two
    /// alignment.
    pub fn allocate(size: usize, alignment: usize) -> Result<GuardedBlock> {
        let alignment = alignment.max(1);
        // The payload must stay aligned, so the leading sentinel region is
        // padded up to the alignment (it occupies at least one guard word).
        let payload_offset = align_up(GUARD_SIZE, alignment);
        let total = payload_offset + size + GUARD_SIZE;
        let block = RawBlock::allocate(total, alignment)?;
        let mut guarded = GuardedBlock {
            block,
            payload_offset,
            payload_size: size,
        };
        guarded.write_sentinels();
        Ok(guarded)
    }

    /// Returns the address of the guarded payload.
    #[inline]
    pub fn address(&self) -> usize {
        self.block.address() + self.payload_offset
    }

    /// Returns the payload size in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.payload_size
    }

    /// Returns the payload as a byte slice.
    pub fn payload(&self) -> &[u8] {
        &self.block.as_slice()[self.payload_offset..self.payload_offset + self.payload_size]
    }

    /// Returns the payload as a mutable byte slice.
    pub fn payload_mut(&mut self) -> &mut [u8] {
        let range = self.payload_offset..self.payload_offset + self.payload_size;
        &mut self.block.as_mut_slice()[range]
    }

    /// Verifies both guard sentinels.
    ///
    /// # Errors
    ///
    /// Fails with `CorruptionDetected` if either sentinel was overwritten.
    pub fn check(&self) -> Result<()> {
        if self.read_guard(self.payload_offset - GUARD_SIZE) == GUARD_SENTINEL
            && self.read_guard(self.payload_offset + self.payload_size) == GUARD_SENTINEL
        {
            Ok(())
        } else {
            Err(Error::corruption_detected(self.address()))
        }
    }

    fn write_sentinels(&mut self) {
        let lead = self.payload_offset - GUARD_SIZE;
        let trail = self.payload_offset + self.payload_size;
        let bytes = GUARD_SENTINEL.to_ne_bytes();
        self.block.as_mut_slice()[lead..lead + GUARD_SIZE].copy_from_slice(&bytes);
        self.block.as_mut_slice()[trail..trail + GUARD_SIZE].copy_from_slice(&bytes);
    }

    fn read_guard(&self, offset: usize) -> u32 {
        u32::from_ne_bytes(
            self.block.as_slice()[offset..offset + GUARD_SIZE]
                .try_into()
                .expect("guard word"),
        )
    }
}

impl std::fmt::Debug for GuardedBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardedBlock")
            .field("address", &format_args!("{:#x}", self.address()))
            .field("size", &self.payload_size)
            .field("intact", &self.check().is_ok())
            .finish()
    }
}
