//! Per-pixel run-length encoding.
//!
//! The stream is a sequence of `[count: u8][pixel: bpp bytes]` units. A
//! unit expands to `count` copies of the pixel; `count` is in `1..=255`.
//!
//! The encoder is greedy: it takes the longest run of identical pixels at
//! the current position (capped at 255) and moves on. Reference files are
//! produced this way, so the exact unit boundaries are part of the format.

use log::trace;

use crate::{Error, Result};

/// Longest run a single unit can describe.
pub const MAX_RUN: usize = 255;

/// Run-length encode `data` as a sequence of `bpp`-byte pixels.
///
/// Fails if `bpp` is zero or does not divide `data.len()`.
pub fn encode(data: &[u8], bpp: usize) -> Result<Vec<u8>> {
    if bpp == 0 || data.len() % bpp != 0 {
        return Err(Error::InvalidBpp {
            bpp,
            len: data.len(),
        });
    }

    let total = data.len() / bpp;
    let pixel = |index: usize| &data[index * bpp..(index + 1) * bpp];

    let mut output = Vec::new();
    let mut i = 0;

    while i < total {
        let current = pixel(i);
        let mut run = 1;
        while i + run < total && run < MAX_RUN && pixel(i + run) == current {
            run += 1;
        }

        output.push(run as u8);
        output.extend_from_slice(current);
        i += run;
    }

    trace!("rle: {} pixels of {} bytes -> {} bytes", total, bpp, output.len());

    Ok(output)
}

/// Expand a run-length encoded stream of `bpp`-byte pixels.
pub fn decode(data: &[u8], bpp: usize) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    decode_into(data, bpp, None, &mut output)?;
    Ok(output)
}

/// Expand a run-length encoded stream whose decoded size is known.
///
/// Fails with [`Error::SizeMismatch`] if the stream expands to any other
/// length.
pub fn decode_sized(data: &[u8], bpp: usize, expected_size: usize) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(expected_size);
    decode_into(data, bpp, Some(expected_size), &mut output)?;

    if output.len() != expected_size {
        return Err(Error::SizeMismatch {
            expected: expected_size,
            actual: output.len(),
        });
    }

    Ok(output)
}

fn decode_into(
    data: &[u8],
    bpp: usize,
    limit: Option<usize>,
    output: &mut Vec<u8>,
) -> Result<()> {
    if bpp == 0 {
        return Err(Error::InvalidBpp {
            bpp,
            len: data.len(),
        });
    }

    let unit = bpp + 1;
    let mut offset = 0;

    while offset < data.len() {
        let remaining = data.len() - offset;
        if remaining < unit {
            return Err(Error::TruncatedRun {
                offset,
                remaining,
                unit,
            });
        }

        let count = data[offset] as usize;
        if count == 0 {
            return Err(Error::ZeroRun(offset));
        }

        // Stop before expanding past a known size
        if let Some(limit) = limit {
            let expanded = output.len() + count * bpp;
            if expanded > limit {
                return Err(Error::SizeMismatch {
                    expected: limit,
                    actual: expanded,
                });
            }
        }

        let pixel = &data[offset + 1..offset + unit];
        for _ in 0..count {
            output.extend_from_slice(pixel);
        }

        offset += unit;
    }

    Ok(())
}
