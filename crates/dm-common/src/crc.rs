//! CRC-32 checksum utilities.
//!
//! DM files carry the standard CRC-32 used by zlib and gzip (reflected
//! polynomial `0xEDB88320`, initial value and final XOR `0xFFFFFFFF`).

use std::ops::Range;

use flate2::Crc;

/// Compute the CRC-32 of a byte slice.
#[inline]
pub fn hash_bytes(data: &[u8]) -> u32 {
    let mut crc = Crc::new();
    crc.update(data);
    crc.sum()
}

/// Compute the CRC-32 of `data` as if the bytes in `field` were all zero.
///
/// This lets a checksum stored inside the buffer it covers be verified
/// without copying the buffer to clear the field first.
///
/// # Panics
///
/// Panics if `field` is not within `data`.
pub fn hash_bytes_zeroed(data: &[u8], field: Range<usize>) -> u32 {
    const ZEROS: [u8; 64] = [0u8; 64];

    let mut crc = Crc::new();
    crc.update(&data[..field.start]);

    let mut remaining = field.len();
    while remaining > 0 {
        let n = remaining.min(ZEROS.len());
        crc.update(&ZEROS[..n]);
        remaining -= n;
    }

    crc.update(&data[field.end..]);
    crc.sum()
}
