//! Delta Media - encoding library for the DM media container.
//!
//! This crate provides a unified interface to the Delta Media crates.
//!
//! # Crates
//!
//! - [`dm_common`] - Common utilities (binary reading, CRC-32)
//! - [`dm_image`] - DM v1 image encoding (pixel conversion, RLE, headers)
//!
//! # Example
//!
//! ```
//! use delta_media::prelude::*;
//!
//! let source = SourceImage::new(4, 1, SourceLayout::Luma, vec![10; 4])?;
//! let raw = convert(source, FormatSelection::Auto)?;
//! let encoded = encode_raw(&raw, Compression::Rle)?;
//!
//! assert_eq!(&encoded.bytes()[56..], &[0x04, 0x0A]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use dm_common as common;
pub use dm_image as image;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use dm_common::{crc, BinaryReader};
    pub use dm_image::{
        convert, encode, encode_raw, Compression, DmFile, EncodeMetadata, EncodedImage,
        FormatSelection, PixelFormat, RawImage, SourceImage, SourceLayout,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
