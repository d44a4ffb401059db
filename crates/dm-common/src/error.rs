//! Error types for dm-common.

use thiserror::Error;

/// Common error type for Delta Media operations.
#[derive(Debug, Error)]
pub enum Error {
    /// End of buffer reached while reading.
    #[error("unexpected end of buffer: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// Seek target lies past the end of the buffer.
    #[error("seek out of bounds: offset {offset} exceeds buffer length {len}")]
    SeekOutOfBounds { offset: usize, len: usize },
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
