/// Returns the padding needed to bring `offset` up to the next multiple of
/// the specified alignment.
///
/// An alignment of `0` or `1` imposes no constraint and yields zero padding.
/// For any other alignment, the result satisfies
/// `(offset + padding_for(offset, alignment)) % alignment == 0`.
///
/// # Examples
///
/// ```
/// use structify_bytes::align::padding_for;
///
/// assert_eq!(padding_for(0, 8), 0);
/// assert_eq!(padding_for(1, 8), 7);
/// assert_eq!(padding_for(8, 8), 0);
/// assert_eq!(padding_for(9, 4), 3);
/// assert_eq!(padding_for(5, 1), 0);
/// ```
///
/// # Panics
///
/// This function will panic in debug builds if `alignment > 1` and is not
/// a power of 2.
#[inline]
pub const fn padding_for(offset: usize, alignment: usize) -> usize {
    if alignment <= 1 {
        return 0;
    }
    debug_assert!(alignment.is_power_of_two());
    align_up(offset, alignment) - offset
}

/// Aligns a number up to the next multiple of the specified alignment.
///
/// If the input is already aligned, it is returned unchanged.
///
/// # Examples
///
/// ```
/// use structify_bytes::align::align_up;
///
/// assert_eq!(align_up(0, 8), 0);
/// assert_eq!(align_up(1, 8), 8);
/// assert_eq!(align_up(7, 8), 8);
/// assert_eq!(align_up(8, 8), 8);
/// assert_eq!(align_up(9, 8), 16);
/// ```
///
/// # Panics
///
/// This function will panic in debug builds if:
/// - `alignment` is 0
/// - `alignment` is not a power of 2
#[inline]
pub const fn align_up(n: usize, alignment: usize) -> usize {
    debug_assert!(alignment != 0);
    debug_assert!(alignment.is_power_of_two());
    (n + alignment - 1) & !(alignment - 1)
}

/// Aligns a number down to the previous multiple of the specified alignment.
///
/// # Examples
///
/// ```
/// use structify_bytes::align::align_down;
///
/// assert_eq!(align_down(0, 8), 0);
/// assert_eq!(align_down(7, 8), 0);
/// assert_eq!(align_down(8, 8), 8);
/// assert_eq!(align_down(15, 8), 8);
/// ```
///
/// # Panics
///
/// This function will panic in debug builds if:
/// - `alignment` is 0
/// - `alignment` is not a power of 2
#[inline]
pub const fn align_down(n: usize, alignment: usize) -> usize {
    debug_assert!(alignment != 0);
    debug_assert!(alignment.is_power_of_two());
    n & !(alignment - 1)
}

/// Rounds a size up to the next multiple of the specified alignment.
///
/// This is the same computation as [`align_up`] applied to a size rather
/// than an offset, so a block of the returned size always ends on an
/// alignment boundary. An alignment of `0` or `1` leaves the size unchanged.
#[inline]
pub const fn aligned_size(size: usize, alignment: usize) -> usize {
    if alignment <= 1 {
        return size;
    }
    align_up(size, alignment)
}

/// Checks if a number lies exactly on an alignment boundary.
///
/// An alignment of `0` or `1` imposes no constraint, so everything is aligned.
///
/// # Examples
///
/// ```
/// use structify_bytes::align::is_aligned;
///
/// assert!(is_aligned(0, 8));
/// assert!(!is_aligned(7, 8));
/// assert!(is_aligned(16, 8));
/// assert!(is_aligned(3, 1));
/// ```
///
/// # Panics
///
/// This function will panic in debug builds if `alignment > 1` and is not
/// a power of 2.
#[inline]
pub const fn is_aligned(n: usize, alignment: usize) -> bool {
    if alignment <= 1 {
        return true;
    }
    debug_assert!(alignment.is_power_of_two());
    (n & (alignment - 1)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_reaches_boundary() {
        for alignment in [1usize, 2, 4, 8, 16, 64, 128] {
            for offset in 0..200 {
                let padding = padding_for(offset, alignment);
                assert_eq!((offset + padding) % alignment.max(1), 0);
                assert!(padding < alignment.max(1));
            }
        }
    }

    #[test]
    fn test_align_up_is_aligned() {
        for alignment in [2usize, 4, 8, 16, 32] {
            for offset in 0..100 {
                assert!(is_aligned(align_up(offset, alignment), alignment));
                assert!(align_up(offset, alignment) >= offset);
            }
        }
    }

    #[test]
    fn test_aligned_size() {
        assert_eq!(aligned_size(0, 8), 0);
        assert_eq!(aligned_size(1, 8), 8);
        assert_eq!(aligned_size(8, 8), 8);
        assert_eq!(aligned_size(9, 8), 16);
        assert_eq!(aligned_size(13, 1), 13);
        assert_eq!(aligned_size(13, 0), 13);
    }

    #[test]
    fn test_no_alignment_constraint() {
        assert_eq!(padding_for(13, 0), 0);
        assert_eq!(padding_for(13, 1), 0);
        assert!(is_aligned(13, 0));
        assert!(is_aligned(13, 1));
    }

    #[test]
    fn test_align_down() {
        assert_eq!(align_down(9, 8), 8);
        assert_eq!(align_down(16, 8), 16);
        assert_eq!(align_down(7, 8), 0);
    }
}
