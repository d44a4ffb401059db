//! Error types for DM image handling.

use thiserror::Error;

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller-supplied input violates a precondition; nothing was produced.
    Validation,
    /// The request is well-formed but not implemented.
    Unsupported,
    /// Encoded input is damaged or not a DM file.
    Corrupt,
}

/// Errors that can occur when encoding or verifying DM images.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] dm_common::Error),

    /// Width or height outside `1..=16384`.
    #[error("invalid dimensions {width}x{height}: each side must be within 1..={max}")]
    InvalidDimensions { width: u32, height: u32, max: u32 },

    /// Pixel format id outside the known range.
    #[error("invalid pixel format {0}: expected 0..=4")]
    InvalidPixelFormat(u8),

    /// Compression id other than NONE or RLE.
    #[error("invalid compression {0}: expected 0 (none) or 1 (rle)")]
    InvalidCompression(u8),

    /// Pixel buffer length does not match the image geometry.
    #[error("pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Bytes-per-pixel argument is zero or does not divide the buffer.
    #[error("invalid bytes per pixel {bpp} for a buffer of {len} bytes")]
    InvalidBpp { bpp: usize, len: usize },

    /// Source image description is inconsistent.
    #[error("invalid source image: {0}")]
    InvalidSource(String),

    /// Pixel format name not known to the converter.
    #[error("unsupported pixel format: {0}")]
    UnsupportedFormat(String),

    /// Compression name not known to the encoder.
    #[error("unsupported compression: {0}")]
    UnsupportedCompression(String),

    /// Media type is valid for DM but not an image.
    #[error("unsupported media type {0}: only images are supported")]
    UnsupportedMediaType(u8),

    /// Media type is not defined by DM.
    #[error("unknown media type {0}")]
    UnknownMediaType(u8),

    /// Container version other than 1.
    #[error("unsupported DM version {0:#06x}")]
    UnsupportedVersion(u16),

    /// Transfer function other than sRGB.
    #[error("unsupported transfer function {0}")]
    UnsupportedTransfer(u8),

    /// Invalid DM magic.
    #[error("invalid DM magic: expected 0x444d0001, got {0:#010x}")]
    InvalidMagic(u32),

    /// CRC-32 checksum mismatch.
    #[error("CRC-32 mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    /// RLE stream ends inside a `count + pixel` unit.
    #[error("truncated RLE run at offset {offset}: {remaining} trailing bytes, unit is {unit}")]
    TruncatedRun {
        offset: usize,
        remaining: usize,
        unit: usize,
    },

    /// RLE run with a zero count.
    #[error("zero-length RLE run at offset {0}")]
    ZeroRun(usize),

    /// Header fields are inconsistent.
    #[error("invalid DM header: {0}")]
    InvalidHeader(String),

    /// File is shorter than its header claims.
    #[error("truncated DM file: expected at least {expected} bytes, got {actual}")]
    Truncated { expected: u64, actual: usize },
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidDimensions { .. }
            | Error::InvalidPixelFormat(_)
            | Error::InvalidCompression(_)
            | Error::SizeMismatch { .. }
            | Error::InvalidBpp { .. }
            | Error::InvalidSource(_) => ErrorKind::Validation,

            Error::UnsupportedFormat(_)
            | Error::UnsupportedCompression(_)
            | Error::UnsupportedMediaType(_)
            | Error::UnsupportedVersion(_)
            | Error::UnsupportedTransfer(_) => ErrorKind::Unsupported,

            Error::Common(_)
            | Error::UnknownMediaType(_)
            | Error::InvalidMagic(_)
            | Error::ChecksumMismatch { .. }
            | Error::TruncatedRun { .. }
            | Error::ZeroRun(_)
            | Error::InvalidHeader(_)
            | Error::Truncated { .. } => ErrorKind::Corrupt,
        }
    }
}

/// Result type for DM image operations.
pub type Result<T> = std::result::Result<T, Error>;
