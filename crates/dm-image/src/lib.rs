//! Delta Media (DM v1) image encoding.
//!
//! A DM image file is a 40-byte common header, a 12-byte image header,
//! zero padding to an 8-byte boundary and the pixel payload:
//!
//! | Offset | Field | Size |
//! |---|---|---|
//! | 0 | magic (`0x444D0001`) | 4 |
//! | 4 | checksum (CRC-32) | 4 |
//! | 8 | version (`0x0001`) | 2 |
//! | 10 | media type (0 = image) | 1 |
//! | 11 | compression (0 = none, 1 = RLE) | 1 |
//! | 12 | header_size | 4 |
//! | 16 | data_offset | 8 |
//! | 24 | data_size | 8 |
//! | 32 | raw_size | 8 |
//! | 40 | width | 4 |
//! | 44 | height | 4 |
//! | 48 | pixel_format | 1 |
//! | 49 | transfer (0 = sRGB) | 1 |
//! | 50 | reserved | 2 |
//! | 52 | padding | 4 |
//! | 56 | payload | data_size |
//!
//! The checksum is the zlib CRC-32 of the whole file with the checksum
//! field zeroed.
//!
//! # Example
//!
//! ```
//! use dm_image::{convert, encode_raw, Compression, FormatSelection, SourceImage, SourceLayout};
//!
//! let source = SourceImage::new(2, 1, SourceLayout::Rgba, vec![255, 0, 0, 255, 255, 0, 0, 255])?;
//! let raw = convert(source, FormatSelection::Auto)?;
//! let encoded = encode_raw(&raw, Compression::None)?;
//!
//! assert_eq!(encoded.bytes().len(), 64);
//! assert_eq!(encoded.metadata().data_offset, 56);
//! # Ok::<(), dm_image::Error>(())
//! ```

mod encoder;
mod error;
mod file;
mod format;
mod image;

pub mod convert;
pub mod header;
pub mod rle;

pub use convert::{auto_format, convert, premultiply_alpha};
pub use encoder::{encode, encode_raw, validate_dimensions, EncodeMetadata, EncodedImage};
pub use error::{Error, ErrorKind, Result};
pub use file::DmFile;
pub use format::{Compression, FormatSelection, MediaType, PixelFormat};
pub use header::{DmHeader, DmImageHeader, HeaderLayout, DM_MAGIC, DM_VERSION, MAX_DIMENSION};
pub use image::{RawImage, SourceCapabilities, SourceImage, SourceLayout};
