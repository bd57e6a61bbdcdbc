//! Growable array of fixed-size elements with a caller-specified alignment.

use structify_common::error::Error;
use structify_common::{Result, verify_arg};

use crate::raw::RawBlock;

/// A resizable array of raw fixed-size elements whose backing storage keeps
/// a caller-specified alignment across every reallocation.
///
/// Growth follows the standard doubling policy, so appends are amortized
/// O(1). Element bounds are checked against the logical length, not the
/// capacity.
pub struct DynamicArray {
    data: Option<RawBlock>,
    length: usize,
    capacity: usize,
    element_size: usize,
    alignment: usize,
}

impl DynamicArray {
    /// Creates an array with room for `initial_capacity` elements of
    /// `element_size` bytes each, allocated at `alignment`.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidArgument` for a zero capacity or element size, or
    /// a non-power-of-two alignment.
    pub fn new(initial_capacity: usize, element_size: usize, alignment: usize) -> Result<DynamicArray> {
        verify_arg!(initial_capacity, initial_capacity > 0);
        verify_arg!(element_size, element_size > 0);
        let data = RawBlock::allocate_array(initial_capacity, element_size, alignment)?;
        let alignment = data.alignment();
        Ok(DynamicArray {
            data: Some(data),
            length: 0,
            capacity: initial_capacity,
            element_size,
            alignment,
        })
    }

    /// Returns the number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` when the array holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the element capacity of the current backing block.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the element size in bytes.
    #[inline]
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// Returns the alignment preserved by the backing block.
    #[inline]
    pub fn alignment(&self) -> usize {
        self.alignment
    }

    /// Grows the backing block to hold at least `new_capacity` elements.
    ///
    /// A `new_capacity` at or below the current capacity is a no-op. On
    /// growth, a new block is allocated at the same alignment, the
    /// `length * element_size` live bytes are copied over and the old block
    /// is released.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidArgument` on a disposed array or when the new size
    /// overflows.
    pub fn resize(&mut self, new_capacity: usize) -> Result<()> {
        let live = self.length * self.element_size;
        let old = self.data()?;
        if new_capacity <= self.capacity {
            return Ok(());
        }
        let mut grown = RawBlock::allocate_array(new_capacity, self.element_size, self.alignment)?;
        grown.as_mut_slice()[..live].copy_from_slice(&old.as_slice()[..live]);
        self.data = Some(grown);
        self.capacity = new_capacity;
        Ok(())
    }

    /// Appends one element, copying `element_size` bytes from `element`.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidArgument` when `element` is not exactly one
    /// element wide or the array is disposed.
    pub fn push(&mut self, element: &[u8]) -> Result<()> {
        verify_arg!(element, element.len() == self.element_size);
        if self.length == self.capacity {
            self.resize(self.capacity * 2)?;
        }
        let offset = self.length * self.element_size;
        let data = self.data_mut()?;
        data.as_mut_slice()[offset..offset + element.len()].copy_from_slice(element);
        self.length += 1;
        Ok(())
    }

    /// Appends a typed value by copying its bytes.
    pub fn push_typed<T>(&mut self, value: T) -> Result<()>
    where
        T: bytemuck::NoUninit,
    {
        self.push(bytemuck::bytes_of(&value))
    }

    /// Returns the address of the element at `index`.
    ///
    /// # Errors
    ///
    /// Fails with `IndexOutOfRange` when `index >= len()`.
    pub fn address_of(&self, index: usize) -> Result<usize> {
        self.check_index(index)?;
        Ok(self.data()?.address() + index * self.element_size)
    }

    /// Returns the bytes of the element at `index`.
    ///
    /// # Errors
    ///
    /// Fails with `IndexOutOfRange` when `index >= len()`.
    pub fn element(&self, index: usize) -> Result<&[u8]> {
        self.check_index(index)?;
        let offset = index * self.element_size;
        Ok(&self.data()?.as_slice()[offset..offset + self.element_size])
    }

    /// Returns the live contents reinterpreted as a slice of `T`.
    ///
    /// The element size must equal `size_of::<T>()`.
    pub fn typed_data<T>(&self) -> Result<&[T]>
    where
        T: bytemuck::AnyBitPattern,
    {
        verify_arg!(element_size, self.element_size == std::mem::size_of::<T>());
        let live = self.length * self.element_size;
        Ok(bytemuck::cast_slice(&self.data()?.as_slice()[..live]))
    }

    /// Releases the backing block and zeroes the bookkeeping fields.
    ///
    /// Disposing twice is a no-op; any element access after disposal fails.
    pub fn dispose(&mut self) {
        self.data = None;
        self.length = 0;
        self.capacity = 0;
    }

    /// Returns `true` once the array has been disposed.
    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.data.is_none()
    }

    #[inline]
    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.length {
            Ok(())
        } else {
            Err(Error::index_out_of_range(index, self.length))
        }
    }

    fn data(&self) -> Result<&RawBlock> {
        self.data
            .as_ref()
            .ok_or_else(|| Error::invalid_arg("array", "array is disposed"))
    }

    fn data_mut(&mut self) -> Result<&mut RawBlock> {
        self.data
            .as_mut()
            .ok_or_else(|| Error::invalid_arg("array", "array is disposed"))
    }
}

impl std::fmt::Debug for DynamicArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicArray")
            .field("len", &self.length)
            .field("capacity", &self.capacity)
            .field("element_size", &self.element_size)
            .field("alignment", &self.alignment)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
