//! Offset-addressed codec over a fixed-capacity byte buffer.
//!
//! Every operation takes an absolute byte offset supplied by the caller; the
//! buffer keeps no cursor state, so calls are freely reorderable and
//! re-entrant. Multi-byte values always take an explicit [`ByteOrder`].

use structify_common::error::Error;
use structify_common::{Result, verify_arg};

use crate::endian::{ByteOrder, verify_float_width, verify_int_width};

/// Continuation flag of a varint byte; the low 7 bits carry payload.
const VARINT_CONTINUATION: u8 = 0x80;

/// Maximum encoded size of a 64-bit varint.
const VARINT_MAX_BYTES: usize = 10;

/// A fixed-capacity byte buffer with typed, offset-addressed accessors.
///
/// The buffer is zero-filled at construction. Writes beyond the capacity
/// fail with `CapacityExceeded`; the capacity never changes.
pub struct StructBuffer {
    data: Box<[u8]>,
}

impl StructBuffer {
    /// Creates a zero-filled buffer with the given capacity in bytes.
    pub fn with_capacity(capacity: usize) -> StructBuffer {
        StructBuffer {
            data: vec![0u8; capacity].into_boxed_slice(),
        }
    }

    /// Creates a buffer containing a copy of the provided bytes.
    pub fn copy_from_slice(data: &[u8]) -> StructBuffer {
        StructBuffer {
            data: data.to_vec().into_boxed_slice(),
        }
    }

    /// Returns the buffer capacity in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Returns the buffer contents as a byte slice.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Returns the buffer contents as a mutable byte slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Writes an unsigned integer of the given width at the given offset.
    ///
    /// # Arguments
    ///
    /// * `offset` - Absolute byte offset of the value.
    /// * `width` - Value width in bytes: 1, 2, 4 or 8.
    /// * `order` - Byte order of the stored representation.
    /// * `value` - The value to store; must fit in `width` bytes.
    ///
    /// # Errors
    ///
    /// Fails with `UnsupportedWidth` for widths outside {1, 2, 4, 8}, with
    /// `CapacityExceeded` when the value would overrun the buffer, and with
    /// `InvalidArgument` when the value does not fit the width (values are
    /// never silently truncated).
    pub fn write_uint(
        &mut self,
        offset: usize,
        width: usize,
        order: ByteOrder,
        value: u64,
    ) -> Result<()> {
        verify_int_width(width)?;
        self.check_span(offset, width)?;
        verify_arg!(value, width == 8 || value < 1u64 << (width * 8));
        match width {
            1 => self.data[offset] = value as u8,
            2 => {
                let v = order.convert_u16(value as u16);
                self.data[offset..offset + 2].copy_from_slice(&v.to_ne_bytes());
            }
            4 => {
                let v = order.convert_u32(value as u32);
                self.data[offset..offset + 4].copy_from_slice(&v.to_ne_bytes());
            }
            _ => {
                let v = order.convert_u64(value);
                self.data[offset..offset + 8].copy_from_slice(&v.to_ne_bytes());
            }
        }
        Ok(())
    }

    /// Reads an unsigned integer of the given width from the given offset.
    ///
    /// # Errors
    ///
    /// Fails with `UnsupportedWidth` for widths outside {1, 2, 4, 8} and with
    /// `CapacityExceeded` when the span overruns the buffer.
    pub fn read_uint(&self, offset: usize, width: usize, order: ByteOrder) -> Result<u64> {
        verify_int_width(width)?;
        self.check_span(offset, width)?;
        let value = match width {
            1 => self.data[offset] as u64,
            2 => {
                let v = u16::from_ne_bytes(self.data[offset..offset + 2].try_into().expect("span"));
                order.convert_u16(v) as u64
            }
            4 => {
                let v = u32::from_ne_bytes(self.data[offset..offset + 4].try_into().expect("span"));
                order.convert_u32(v) as u64
            }
            _ => {
                let v = u64::from_ne_bytes(self.data[offset..offset + 8].try_into().expect("span"));
                order.convert_u64(v)
            }
        };
        Ok(value)
    }

    /// Writes a signed integer of the given width at the given offset, in
    /// two's complement representation.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`StructBuffer::write_uint`]; the value must be
    /// representable in `width` bytes.
    pub fn write_int(
        &mut self,
        offset: usize,
        width: usize,
        order: ByteOrder,
        value: i64,
    ) -> Result<()> {
        verify_int_width(width)?;
        if width < 8 {
            let bits = width as u32 * 8;
            let min = -(1i64 << (bits - 1));
            let max = (1i64 << (bits - 1)) - 1;
            verify_arg!(value, value >= min && value <= max);
        }
        let mask = if width == 8 {
            u64::MAX
        } else {
            (1u64 << (width * 8)) - 1
        };
        self.write_uint(offset, width, order, (value as u64) & mask)
    }

    /// Reads a signed integer of the given width from the given offset,
    /// sign-extending to 64 bits.
    pub fn read_int(&self, offset: usize, width: usize, order: ByteOrder) -> Result<i64> {
        let raw = self.read_uint(offset, width, order)?;
        let shift = 64 - width as u32 * 8;
        Ok(((raw << shift) as i64) >> shift)
    }

    /// Writes a floating-point value of the given width at the given offset.
    ///
    /// Width 4 stores the value as an `f32`; width 8 as an `f64`. The bit
    /// pattern is laid out in the requested byte order.
    ///
    /// # Errors
    ///
    /// Fails with `UnsupportedWidth` for widths outside {4, 8} and with
    /// `CapacityExceeded` when the span overruns the buffer.
    pub fn write_float(
        &mut self,
        offset: usize,
        width: usize,
        order: ByteOrder,
        value: f64,
    ) -> Result<()> {
        verify_float_width(width)?;
        self.check_span(offset, width)?;
        if width == 4 {
            let v = order.convert_u32((value as f32).to_bits());
            self.data[offset..offset + 4].copy_from_slice(&v.to_ne_bytes());
        } else {
            let v = order.convert_u64(value.to_bits());
            self.data[offset..offset + 8].copy_from_slice(&v.to_ne_bytes());
        }
        Ok(())
    }

    /// Reads a floating-point value of the given width from the given offset.
    pub fn read_float(&self, offset: usize, width: usize, order: ByteOrder) -> Result<f64> {
        verify_float_width(width)?;
        self.check_span(offset, width)?;
        let value = if width == 4 {
            let v = u32::from_ne_bytes(self.data[offset..offset + 4].try_into().expect("span"));
            f32::from_bits(order.convert_u32(v)) as f64
        } else {
            let v = u64::from_ne_bytes(self.data[offset..offset + 8].try_into().expect("span"));
            f64::from_bits(order.convert_u64(v))
        };
        Ok(value)
    }

    /// Copies raw bytes into the buffer at the given offset.
    ///
    /// # Errors
    ///
    /// Fails with `CapacityExceeded` when the bytes would overrun the buffer.
    pub fn write_bytes(&mut self, offset: usize, bytes: &[u8]) -> Result<()> {
        self.check_span(offset, bytes.len())?;
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// Returns a view of `len` raw bytes starting at the given offset.
    pub fn read_bytes(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.check_span(offset, len)?;
        Ok(&self.data[offset..offset + len])
    }

    /// Encodes a value as a varint at the given offset and returns the number
    /// of bytes written.
    ///
    /// Each encoded byte carries 7 payload bits with the high bit set on all
    /// but the last byte; groups are emitted least-significant first.
    ///
    /// # Errors
    ///
    /// Fails with `CapacityExceeded` when the encoding would overrun the
    /// buffer; nothing is written in that case.
    pub fn write_varint(&mut self, offset: usize, value: u64) -> Result<usize> {
        self.check_span(offset, varint_size(value))?;
        let mut value = value;
        let mut pos = offset;
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                self.data[pos] = byte;
                pos += 1;
                break;
            }
            self.data[pos] = byte | VARINT_CONTINUATION;
            pos += 1;
        }
        Ok(pos - offset)
    }

    /// Decodes a varint at the given offset, returning the value and the
    /// number of bytes consumed.
    ///
    /// # Errors
    ///
    /// Fails with `CapacityExceeded` when the encoding runs off the end of
    /// the buffer, and with `InvalidArgument` when the encoding exceeds the
    /// 10 bytes a 64-bit value can occupy.
    pub fn read_varint(&self, offset: usize) -> Result<(u64, usize)> {
        let mut value = 0u64;
        let mut pos = offset;
        for shift in (0..VARINT_MAX_BYTES as u32).map(|i| i * 7) {
            self.check_span(pos, 1)?;
            let byte = self.data[pos];
            pos += 1;
            value |= ((byte & 0x7f) as u64) << shift;
            if byte & VARINT_CONTINUATION == 0 {
                return Ok((value, pos - offset));
            }
        }
        Err(Error::invalid_arg("varint", "encoding exceeds 10 bytes"))
    }

    /// Writes a length-delimited field: a varint length prefix followed by
    /// the raw payload bytes. Returns the total number of bytes written.
    ///
    /// The prefix width is whatever the varint encoding actually occupies;
    /// the payload always starts right after it.
    pub fn write_length_delimited(&mut self, offset: usize, payload: &[u8]) -> Result<usize> {
        self.check_span(offset, varint_size(payload.len() as u64) + payload.len())?;
        let prefix = self.write_varint(offset, payload.len() as u64)?;
        self.write_bytes(offset + prefix, payload)?;
        Ok(prefix + payload.len())
    }

    /// Reads a length-delimited field, returning the payload bytes and the
    /// total number of bytes consumed (prefix included).
    pub fn read_length_delimited(&self, offset: usize) -> Result<(&[u8], usize)> {
        let (len, prefix) = self.read_varint(offset)?;
        let payload = self.read_bytes(offset + prefix, len as usize)?;
        Ok((payload, prefix + len as usize))
    }

    #[inline]
    fn check_span(&self, offset: usize, len: usize) -> Result<()> {
        let end = offset.checked_add(len);
        match end {
            Some(end) if end <= self.data.len() => Ok(()),
            _ => Err(Error::capacity_exceeded(
                offset.saturating_add(len),
                self.data.len(),
            )),
        }
    }
}

impl std::fmt::Debug for StructBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructBuffer")
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}

/// Returns the encoded size of a value as a varint, in bytes.
#[inline]
pub fn varint_size(value: u64) -> usize {
    if value == 0 {
        return 1;
    }
    (64 - value.leading_zeros() as usize).div_ceil(7)
}

/// Wire type of a protocol field, a fixed, closed enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    Fixed32 = 5,
}

impl WireType {
    /// Returns the numeric wire-type discriminant.
    #[inline]
    pub fn value(self) -> u64 {
        self as u64
    }

    /// Resolves a numeric discriminant to a wire type.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidTag` for any discriminant outside the closed set
    /// {0, 1, 2, 5}; unknown discriminants are rejected, never defaulted.
    pub fn from_value(value: u64) -> Result<WireType> {
        match value {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::Fixed64),
            2 => Ok(WireType::LengthDelimited),
            5 => Ok(WireType::Fixed32),
            other => Err(Error::invalid_tag(other)),
        }
    }
}

/// Encodes a protocol field tag: `(field_number << 3) | wire_type`.
#[inline]
pub fn encode_tag(field_number: u32, wire_type: WireType) -> u64 {
    ((field_number as u64) << 3) | wire_type.value()
}

/// Decodes a protocol field tag into its field number and wire type.
///
/// # Errors
///
/// Fails with `InvalidTag` when the wire-type bits do not name a member of
/// the closed enumeration.
pub fn decode_tag(tag: u64) -> Result<(u32, WireType)> {
    let wire_type = WireType::from_value(tag & 0x7)?;
    Ok(((tag >> 3) as u32, wire_type))
}
