//! DM header structures and header-region construction.
//!
//! A DM file starts with the 40-byte common [`DmHeader`], followed by the
//! 12-byte [`DmImageHeader`] and zero padding up to the next 8-byte
//! boundary. All multi-byte fields are little-endian regardless of host.

use std::ops::Range;

use byteorder::{ByteOrder, LittleEndian};
use dm_common::{align_up, crc};
use zerocopy::byteorder::little_endian::{U16, U32, U64};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::format::{Compression, MediaType, PixelFormat};

/// DM magic, stored little-endian (`01 00 4D 44` on disk).
pub const DM_MAGIC: u32 = 0x444D_0001;

/// Container version written by this crate.
pub const DM_VERSION: u16 = 0x0001;

/// Largest accepted width or height.
pub const MAX_DIMENSION: u32 = 16384;

/// Transfer function id for sRGB, the only one defined.
pub const TRANSFER_SRGB: u8 = 0;

/// Alignment of the payload offset.
pub const HEADER_ALIGNMENT: usize = 8;

/// Byte range of the checksum field within the file.
pub const CHECKSUM_RANGE: Range<usize> = 4..8;

/// Common DM header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct DmHeader {
    /// Magic (`0x444D0001`).
    pub magic: U32,
    /// CRC-32 of the whole file with this field zeroed.
    pub checksum: U32,
    /// Format version.
    pub version: U16,
    /// Media type id.
    pub media_type: u8,
    /// Compression id.
    pub compression: u8,
    /// Total header size including padding.
    pub header_size: U32,
    /// Offset of the payload from the start of the file.
    pub data_offset: U64,
    /// Stored payload size.
    pub data_size: U64,
    /// Uncompressed payload size.
    pub raw_size: U64,
}

impl DmHeader {
    /// Serialized size.
    pub const SIZE: usize = 40;
}

/// Image-specific header following [`DmHeader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct DmImageHeader {
    /// Width in pixels.
    pub width: U32,
    /// Height in pixels.
    pub height: U32,
    /// Pixel format id.
    pub pixel_format: u8,
    /// Transfer function id.
    pub transfer: u8,
    /// Must be zero.
    pub reserved: [u8; 2],
}

impl DmImageHeader {
    /// Serialized size.
    pub const SIZE: usize = 12;
}

const _: () = assert!(std::mem::size_of::<DmHeader>() == DmHeader::SIZE);
const _: () = assert!(std::mem::size_of::<DmImageHeader>() == DmImageHeader::SIZE);

/// Sizes of the header region that precedes the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLayout {
    /// Size of the header structs without padding.
    pub raw_size: usize,
    /// Size rounded up to [`HEADER_ALIGNMENT`].
    pub padded_size: usize,
}

impl HeaderLayout {
    /// Layout of a DM image file: 52 raw bytes padded to 56.
    pub const IMAGE: Self = Self::new(DmHeader::SIZE + DmImageHeader::SIZE);

    /// Compute the layout for `raw_size` bytes of header structs.
    pub const fn new(raw_size: usize) -> Self {
        Self {
            raw_size,
            padded_size: align_up(raw_size, HEADER_ALIGNMENT),
        }
    }

    /// Number of zero bytes between the header structs and the payload.
    #[inline]
    pub const fn padding(&self) -> usize {
        self.padded_size - self.raw_size
    }

    /// Payload offset from the start of the file.
    #[inline]
    pub const fn data_offset(&self) -> usize {
        self.padded_size
    }
}

/// Field values for the header region of one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeaderFields {
    pub width: u32,
    pub height: u32,
    pub pixel_format: PixelFormat,
    pub compression: Compression,
    /// Stored payload length.
    pub data_size: u64,
    /// Uncompressed payload length.
    pub raw_size: u64,
}

impl ImageHeaderFields {
    /// Build both header structs with a zero checksum.
    pub fn to_headers(&self) -> (DmHeader, DmImageHeader) {
        let layout = HeaderLayout::IMAGE;

        let header = DmHeader {
            magic: U32::new(DM_MAGIC),
            checksum: U32::new(0),
            version: U16::new(DM_VERSION),
            media_type: MediaType::Image as u8,
            compression: self.compression.id(),
            header_size: U32::new(layout.padded_size as u32),
            data_offset: U64::new(layout.data_offset() as u64),
            data_size: U64::new(self.data_size),
            raw_size: U64::new(self.raw_size),
        };

        let image = DmImageHeader {
            width: U32::new(self.width),
            height: U32::new(self.height),
            pixel_format: self.pixel_format.id(),
            transfer: TRANSFER_SRGB,
            reserved: [0; 2],
        };

        (header, image)
    }

    /// Append the padded header region to `out`.
    ///
    /// The checksum field is written as zero; see [`patch_checksum`].
    pub fn write_to(&self, out: &mut Vec<u8>) {
        let layout = HeaderLayout::IMAGE;
        let (header, image) = self.to_headers();

        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(image.as_bytes());
        out.resize(out.len() + layout.padding(), 0);
    }
}

/// Compute the file checksum and store it in the checksum field.
///
/// The CRC-32 covers every byte of `file` with the checksum field treated
/// as zero, so the result does not depend on what the field held before.
///
/// # Panics
///
/// Panics if `file` is shorter than the checksum field.
pub fn patch_checksum(file: &mut [u8]) -> u32 {
    let checksum = file_checksum(file);
    LittleEndian::write_u32(&mut file[CHECKSUM_RANGE], checksum);
    checksum
}

/// Compute the checksum of a complete file, ignoring the stored value.
#[inline]
pub fn file_checksum(file: &[u8]) -> u32 {
    crc::hash_bytes_zeroed(file, CHECKSUM_RANGE)
}
