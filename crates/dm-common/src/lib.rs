//! Common utilities for Delta Media.
//!
//! This crate provides foundational types and utilities used across the
//! Delta Media crates:
//!
//! - [`BinaryReader`] - Zero-copy little-endian reading from byte slices
//! - [`crc`] - CRC-32 (zlib/gzip variant) checksums
//! - [`align_up`] - Offset alignment arithmetic

mod error;
mod reader;

pub mod crc;

pub use error::{Error, Result};
pub use reader::BinaryReader;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// Round `value` up to the next multiple of `alignment`.
///
/// `alignment` must be non-zero.
#[inline]
pub const fn align_up(value: usize, alignment: usize) -> usize {
    value.div_ceil(alignment) * alignment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_up() {
        assert_eq!(align_up(0, 8), 0);
        assert_eq!(align_up(1, 8), 8);
        assert_eq!(align_up(52, 8), 56);
        assert_eq!(align_up(56, 8), 56);
        assert_eq!(align_up(57, 8), 64);
    }
}
