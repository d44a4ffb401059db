//! DM file verification.
//!
//! [`DmFile::parse`] checks a complete DM image file the way a reader
//! would before trusting it: magic, version, type, header geometry,
//! checksum and sizes. It exists so encoded output can be round-tripped.

use std::borrow::Cow;

use dm_common::BinaryReader;
use log::debug;

use crate::encoder::validate_dimensions;
use crate::format::{Compression, MediaType, PixelFormat};
use crate::header::{
    file_checksum, DmHeader, DmImageHeader, HeaderLayout, DM_MAGIC, DM_VERSION, HEADER_ALIGNMENT,
    TRANSFER_SRGB,
};
use crate::image::{buffer_len, RawImage};
use crate::{rle, Error, Result};

/// A verified DM image file borrowing its payload from the input.
#[derive(Debug, Clone)]
pub struct DmFile<'a> {
    header: DmHeader,
    image: DmImageHeader,
    pixel_format: PixelFormat,
    compression: Compression,
    payload: &'a [u8],
}

impl<'a> DmFile<'a> {
    /// Parse and verify a DM image file.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);

        let magic = reader.peek_u32()?;
        if magic != DM_MAGIC {
            return Err(Error::InvalidMagic(magic));
        }

        let header: DmHeader = reader.read_struct()?;

        let version = header.version.get();
        if version != DM_VERSION {
            return Err(Error::UnsupportedVersion(version));
        }

        match MediaType::from_id(header.media_type)? {
            MediaType::Image => {}
            _ => return Err(Error::UnsupportedMediaType(header.media_type)),
        }

        let compression = Compression::from_id(header.compression)?;

        let image: DmImageHeader = reader.read_struct()?;
        let (width, height) = (image.width.get(), image.height.get());
        validate_dimensions(width, height)?;
        let pixel_format = PixelFormat::from_id(image.pixel_format)?;

        if image.transfer != TRANSFER_SRGB {
            return Err(Error::UnsupportedTransfer(image.transfer));
        }
        if image.reserved != [0; 2] {
            return Err(Error::InvalidHeader(format!(
                "reserved bytes must be zero, got {:?}",
                image.reserved
            )));
        }

        let header_size = header.header_size.get() as u64;
        let data_offset = header.data_offset.get();
        let raw_header_size = HeaderLayout::IMAGE.raw_size as u64;
        check_aligned("header_size", header_size, raw_header_size)?;
        check_aligned("data_offset", data_offset, raw_header_size)?;
        if data_offset < header_size {
            return Err(Error::InvalidHeader(format!(
                "data_offset {} lies inside the {}-byte header",
                data_offset, header_size
            )));
        }

        let data_size = header.data_size.get();
        let end = data_offset
            .checked_add(data_size)
            .ok_or_else(|| Error::InvalidHeader("data_offset + data_size overflows".into()))?;
        if end > data.len() as u64 {
            return Err(Error::Truncated {
                expected: end,
                actual: data.len(),
            });
        }

        let expected = header.checksum.get();
        let actual = file_checksum(data);
        if actual != expected {
            return Err(Error::ChecksumMismatch { expected, actual });
        }

        let raw_size = buffer_len(width, height, pixel_format.bpp())? as u64;
        if header.raw_size.get() != raw_size {
            return Err(Error::InvalidHeader(format!(
                "raw_size {} does not match {}x{} {} ({} bytes)",
                header.raw_size.get(),
                width,
                height,
                pixel_format,
                raw_size
            )));
        }
        if compression == Compression::None && data_size != raw_size {
            return Err(Error::SizeMismatch {
                expected: raw_size as usize,
                actual: data_size as usize,
            });
        }

        reader.seek(data_offset as usize)?;
        let payload = reader.read_bytes(data_size as usize)?;

        debug!(
            "verified DM image {}x{} {} ({} compression, {} stored bytes, crc {:#010x})",
            width, height, pixel_format, compression, data_size, expected
        );

        Ok(Self {
            header,
            image,
            pixel_format,
            compression,
            payload,
        })
    }

    /// The common header.
    pub fn header(&self) -> &DmHeader {
        &self.header
    }

    /// The image header.
    pub fn image_header(&self) -> &DmImageHeader {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width.get()
    }

    pub fn height(&self) -> u32 {
        self.image.height.get()
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    pub fn checksum(&self) -> u32 {
        self.header.checksum.get()
    }

    /// The stored (possibly compressed) payload.
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// The uncompressed pixel bytes.
    pub fn pixels(&self) -> Result<Cow<'a, [u8]>> {
        match self.compression {
            Compression::None => Ok(Cow::Borrowed(self.payload)),
            Compression::Rle => rle::decode_sized(
                self.payload,
                self.pixel_format.bpp(),
                self.header.raw_size.get() as usize,
            )
            .map(Cow::Owned),
        }
    }

    /// Decode into an owned [`RawImage`].
    pub fn to_raw_image(&self) -> Result<RawImage> {
        RawImage::new(
            self.width(),
            self.height(),
            self.pixel_format,
            self.pixels()?.into_owned(),
        )
    }
}

fn check_aligned(name: &str, value: u64, minimum: u64) -> Result<()> {
    if value < minimum || value % HEADER_ALIGNMENT as u64 != 0 {
        return Err(Error::InvalidHeader(format!(
            "{} {} must be a multiple of {} and at least {}",
            name, value, HEADER_ALIGNMENT, minimum
        )));
    }
    Ok(())
}
