//! Explicit reference counting for shared block ownership.

use structify_alloc::RawBlock;

/// A shared-ownership handle over a raw block with an explicit count.
///
/// Blocks normally have exactly one owner; `RefCounted` is the one
/// exception, permitting N logical owners that each call
/// [`RefCounted::increment`] and [`RefCounted::decrement`] explicitly. The
/// block is released strictly on the count's 1 to 0 transition.
///
/// The count is a plain `i32`; like the rest of the crate this type is
/// single-threaded.
pub struct RefCounted {
    block: Option<RawBlock>,
    count: i32,
}

impl RefCounted {
    /// Wraps a block, starting with a count of one.
    pub fn new(block: RawBlock) -> RefCounted {
        RefCounted {
            block: Some(block),
            count: 1,
        }
    }

    /// Returns the current owner count, zero once released.
    #[inline]
    pub fn count(&self) -> i32 {
        self.count
    }

    /// Returns the block address, or `None` once the block was released.
    pub fn address(&self) -> Option<usize> {
        self.block.as_ref().map(|block| block.address())
    }

    /// Records one more logical owner.
    ///
    /// Incrementing a released handle is a no-op: the block is gone and a
    /// new owner cannot resurrect it.
    pub fn increment(&mut self) {
        if self.block.is_some() {
            self.count += 1;
        }
    }

    /// Records one owner letting go. Releases the block on the 1 to 0
    /// transition and returns `true` exactly then.
    pub fn decrement(&mut self) -> bool {
        if self.block.is_none() {
            return false;
        }
        self.count -= 1;
        if self.count == 0 {
            self.block = None;
            true
        } else {
            false
        }
    }

    /// Returns `true` once the underlying block has been released.
    #[inline]
    pub fn is_released(&self) -> bool {
        self.block.is_none()
    }
}

impl std::fmt::Debug for RefCounted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefCounted")
            .field("count", &self.count)
            .field("released", &self.is_released())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counted() -> RefCounted {
        RefCounted::new(RawBlock::allocate(16, 8).unwrap())
    }

    #[test]
    fn test_starts_at_one() {
        let shared = counted();
        assert_eq!(shared.count(), 1);
        assert!(shared.address().is_some());
        assert!(!shared.is_released());
    }

    #[test]
    fn test_release_on_one_to_zero() {
        let mut shared = counted();
        shared.increment();
        shared.increment();
        assert_eq!(shared.count(), 3);

        assert!(!shared.decrement());
        assert!(!shared.decrement());
        assert!(!shared.is_released());

        // The final owner letting go releases the block.
        assert!(shared.decrement());
        assert!(shared.is_released());
        assert_eq!(shared.count(), 0);
        assert!(shared.address().is_none());
    }

    #[test]
    fn test_dead_handle_is_inert() {
        let mut shared = counted();
        assert!(shared.decrement());
        assert!(!shared.decrement());
        shared.increment();
        assert_eq!(shared.count(), 0);
        assert!(shared.is_released());
    }
}
