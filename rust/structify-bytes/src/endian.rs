//! Byte-order selection and conversion.
//!
//! Every multi-byte read or write in the codec takes an explicit [`ByteOrder`];
//! no operation is order-ambiguous. Conversion is implemented as a byte swap
//! applied when the requested order differs from the host order, which makes
//! the same conversion function serve both encoding and decoding.

use structify_common::Result;
use structify_common::error::Error;

/// Byte order of a multi-byte value in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// The platform-native byte order.
    Host,
    /// Least-significant byte first.
    Little,
    /// Most-significant byte first.
    Big,
}

impl ByteOrder {
    /// Network byte order, an alias for big-endian by convention.
    pub const NETWORK: ByteOrder = ByteOrder::Big;

    /// Collapses `Host` to the concrete platform order.
    #[inline]
    pub fn resolve(self) -> ByteOrder {
        match self {
            ByteOrder::Host => host_order(),
            order => order,
        }
    }

    /// Returns `true` if this order resolves to the platform-native order.
    #[inline]
    pub fn is_host(self) -> bool {
        self.resolve() == host_order()
    }

    /// Converts a 16-bit value between the host order and this order.
    ///
    /// The conversion is self-inverse: applying it twice returns the
    /// original value.
    #[inline]
    pub fn convert_u16(self, value: u16) -> u16 {
        if self.is_host() { value } else { swap16(value) }
    }

    /// Converts a 32-bit value between the host order and this order.
    #[inline]
    pub fn convert_u32(self, value: u32) -> u32 {
        if self.is_host() { value } else { swap32(value) }
    }

    /// Converts a 64-bit value between the host order and this order.
    #[inline]
    pub fn convert_u64(self, value: u64) -> u64 {
        if self.is_host() { value } else { swap64(value) }
    }
}

/// Returns the concrete byte order of the platform.
#[inline]
pub const fn host_order() -> ByteOrder {
    #[cfg(target_endian = "little")]
    {
        ByteOrder::Little
    }
    #[cfg(target_endian = "big")]
    {
        ByteOrder::Big
    }
}

/// Reverses the bytes of a 16-bit value.
#[inline]
pub const fn swap16(v: u16) -> u16 {
    (v << 8) | (v >> 8)
}

/// Reverses the bytes of a 32-bit value.
#[inline]
pub const fn swap32(v: u32) -> u32 {
    ((v & 0x0000_00ff) << 24)
        | ((v & 0x0000_ff00) << 8)
        | ((v & 0x00ff_0000) >> 8)
        | ((v & 0xff00_0000) >> 24)
}

/// Reverses the bytes of a 64-bit value.
#[inline]
pub const fn swap64(v: u64) -> u64 {
    ((v & 0x0000_0000_0000_00ff) << 56)
        | ((v & 0x0000_0000_0000_ff00) << 40)
        | ((v & 0x0000_0000_00ff_0000) << 24)
        | ((v & 0x0000_0000_ff00_0000) << 8)
        | ((v & 0x0000_00ff_0000_0000) >> 8)
        | ((v & 0x0000_ff00_0000_0000) >> 24)
        | ((v & 0x00ff_0000_0000_0000) >> 40)
        | ((v & 0xff00_0000_0000_0000) >> 56)
}

/// Validates an integer width, accepting 1, 2, 4 or 8 bytes.
///
/// # Errors
///
/// Fails with `UnsupportedWidth` for any other width; values are never
/// silently truncated.
#[inline]
pub fn verify_int_width(width: usize) -> Result<()> {
    match width {
        1 | 2 | 4 | 8 => Ok(()),
        _ => Err(Error::unsupported_width(width)),
    }
}

/// Validates a floating-point width, accepting 4 or 8 bytes.
///
/// # Errors
///
/// Fails with `UnsupportedWidth` for any other width.
#[inline]
pub fn verify_float_width(width: usize) -> Result<()> {
    match width {
        4 | 8 => Ok(()),
        _ => Err(Error::unsupported_width(width)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_self_inverse() {
        for v in [0u16, 1, 0x1234, 0xfffe, u16::MAX] {
            assert_eq!(swap16(swap16(v)), v);
        }
        for v in [0u32, 1, 0x1234_5678, 0xdead_beef, u32::MAX] {
            assert_eq!(swap32(swap32(v)), v);
        }
        for v in [0u64, 1, 0x0123_4567_89ab_cdef, u64::MAX - 1, u64::MAX] {
            assert_eq!(swap64(swap64(v)), v);
        }
    }

    #[test]
    fn test_swap_reverses_bytes() {
        assert_eq!(swap16(0x1234), 0x3412);
        assert_eq!(swap32(0x1234_5678), 0x7856_3412);
        assert_eq!(swap64(0x0102_0304_0506_0708), 0x0807_0605_0403_0201);
    }

    #[test]
    fn test_network_is_big() {
        assert_eq!(ByteOrder::NETWORK, ByteOrder::Big);
    }

    #[test]
    fn test_host_resolution() {
        assert_ne!(ByteOrder::Host.resolve(), ByteOrder::Host);
        assert_eq!(ByteOrder::Host.resolve(), host_order());
        assert_eq!(ByteOrder::Little.resolve(), ByteOrder::Little);
        assert_eq!(ByteOrder::Big.resolve(), ByteOrder::Big);
    }

    #[test]
    fn test_convert_identity_for_host() {
        assert_eq!(ByteOrder::Host.convert_u32(0x1234_5678), 0x1234_5678);
        assert_eq!(host_order().convert_u64(42), 42);
    }

    #[test]
    fn test_convert_swaps_for_foreign_order() {
        let foreign = match host_order() {
            ByteOrder::Little => ByteOrder::Big,
            _ => ByteOrder::Little,
        };
        assert_eq!(foreign.convert_u16(0x1234), 0x3412);
        assert_eq!(foreign.convert_u32(foreign.convert_u32(0xdead_beef)), 0xdead_beef);
    }

    #[test]
    fn test_width_validation() {
        for width in [1, 2, 4, 8] {
            assert!(verify_int_width(width).is_ok());
        }
        for width in [0, 3, 5, 6, 7, 9, 16] {
            assert!(verify_int_width(width).is_err());
        }
        assert!(verify_float_width(4).is_ok());
        assert!(verify_float_width(8).is_ok());
        for width in [0, 1, 2, 3, 5, 16] {
            assert!(verify_float_width(width).is_err());
        }
    }
}
