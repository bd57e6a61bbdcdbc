//! A fixed-capacity bit set backed by packed 64-bit words.

/// A fixed-capacity bit set.
///
/// Bit index `i` lives in word `i >> 6` at position `i & 63`. The capacity
/// is fixed at construction; all bits start unset.
pub struct BitSet {
    words: Vec<u64>,
    len: usize,
}

impl BitSet {
    /// Creates a bit set with the specified number of bits, all unset.
    pub fn new(len: usize) -> BitSet {
        BitSet {
            words: vec![0u64; len.div_ceil(64)],
            len,
        }
    }

    /// Returns the number of bits in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks whether the bit set has zero length.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reads the bit at the specified index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        assert!(index < self.len);
        self.words[index >> 6] & (1u64 << (index & 63)) != 0
    }

    /// Sets the bit at the specified index.
    #[inline]
    pub fn set(&mut self, index: usize) {
        assert!(index < self.len);
        self.words[index >> 6] |= 1u64 << (index & 63);
    }

    /// Clears the bit at the specified index.
    #[inline]
    pub fn clear(&mut self, index: usize) {
        assert!(index < self.len);
        self.words[index >> 6] &= !(1u64 << (index & 63));
    }

    /// Clears every bit.
    pub fn clear_all(&mut self) {
        self.words.fill(0);
    }

    /// Returns the number of set bits.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns the index of the first unset bit, scanning in index order,
    /// or `None` when every bit is set.
    pub fn first_unset(&self) -> Option<usize> {
        for (word_index, &word) in self.words.iter().enumerate() {
            if word != u64::MAX {
                let index = (word_index << 6) + word.trailing_ones() as usize;
                if index < self.len {
                    return Some(index);
                }
            }
        }
        None
    }
}
