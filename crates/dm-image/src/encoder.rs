//! DM image encoding.

use std::borrow::Cow;

use log::{debug, trace};

use crate::format::{Compression, PixelFormat};
use crate::header::{patch_checksum, HeaderLayout, ImageHeaderFields, MAX_DIMENSION};
use crate::image::{buffer_len, RawImage};
use crate::{rle, Error, Result};

/// Summary of an encoded file, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EncodeMetadata {
    /// CRC-32 stored in the header.
    pub checksum: u32,
    /// Header size including padding.
    pub header_size: u32,
    /// Offset of the payload.
    pub data_offset: u64,
    /// Stored payload size.
    pub data_size: u64,
    /// Uncompressed payload size.
    pub raw_size: u64,
    /// Bytes per pixel.
    pub bpp: usize,
    pub width: u32,
    pub height: u32,
    pub pixel_format: PixelFormat,
    pub compression: Compression,
}

/// A complete DM file and its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    bytes: Vec<u8>,
    metadata: EncodeMetadata,
}

impl EncodedImage {
    /// The file contents.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn metadata(&self) -> &EncodeMetadata {
        &self.metadata
    }

    /// Take ownership of the file contents.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Split into file contents and metadata.
    pub fn into_parts(self) -> (Vec<u8>, EncodeMetadata) {
        (self.bytes, self.metadata)
    }
}

/// Check that `width` and `height` are within `1..=16384`.
pub fn validate_dimensions(width: u32, height: u32) -> Result<()> {
    let valid = |side: u32| (1..=MAX_DIMENSION).contains(&side);
    if !valid(width) || !valid(height) {
        return Err(Error::InvalidDimensions {
            width,
            height,
            max: MAX_DIMENSION,
        });
    }
    Ok(())
}

/// Encode raw pixels given by wire ids into a DM file.
///
/// `pixel_format` and `compression` are the header ids (`0..=4` and
/// `0..=1`). All inputs are validated before any output is produced.
pub fn encode(
    width: u32,
    height: u32,
    pixel_format: u8,
    compression: u8,
    pixels: &[u8],
) -> Result<EncodedImage> {
    validate_dimensions(width, height)?;
    let pixel_format = PixelFormat::from_id(pixel_format)?;
    let compression = Compression::from_id(compression)?;

    let raw_size = buffer_len(width, height, pixel_format.bpp())?;
    if pixels.len() != raw_size {
        return Err(Error::SizeMismatch {
            expected: raw_size,
            actual: pixels.len(),
        });
    }

    encode_validated(width, height, pixel_format, compression, pixels)
}

/// Encode a converted image into a DM file.
pub fn encode_raw(image: &RawImage, compression: Compression) -> Result<EncodedImage> {
    validate_dimensions(image.width(), image.height())?;
    encode_validated(
        image.width(),
        image.height(),
        image.format(),
        compression,
        image.bytes(),
    )
}

fn encode_validated(
    width: u32,
    height: u32,
    pixel_format: PixelFormat,
    compression: Compression,
    pixels: &[u8],
) -> Result<EncodedImage> {
    let bpp = pixel_format.bpp();

    let payload: Cow<'_, [u8]> = match compression {
        Compression::None => Cow::Borrowed(pixels),
        Compression::Rle => Cow::Owned(rle::encode(pixels, bpp)?),
    };

    debug!(
        "encoding {}x{} {} with {} compression: {} raw bytes -> {} stored",
        width,
        height,
        pixel_format,
        compression,
        pixels.len(),
        payload.len()
    );

    let layout = HeaderLayout::IMAGE;
    let fields = ImageHeaderFields {
        width,
        height,
        pixel_format,
        compression,
        data_size: payload.len() as u64,
        raw_size: pixels.len() as u64,
    };

    let mut bytes = Vec::with_capacity(layout.data_offset() + payload.len());
    fields.write_to(&mut bytes);
    bytes.extend_from_slice(&payload);

    let checksum = patch_checksum(&mut bytes);
    trace!("checksum {:#010x} over {} bytes", checksum, bytes.len());

    let metadata = EncodeMetadata {
        checksum,
        header_size: layout.padded_size as u32,
        data_offset: layout.data_offset() as u64,
        data_size: fields.data_size,
        raw_size: fields.raw_size,
        bpp,
        width,
        height,
        pixel_format,
        compression,
    };

    Ok(EncodedImage { bytes, metadata })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_two_pixel_rgba() {
        let pixels = [255, 0, 0, 255, 255, 0, 0, 255];
        let encoded = encode(2, 1, PixelFormat::Rgba32.id(), 0, &pixels).unwrap();
        let meta = encoded.metadata();

        assert_eq!(meta.raw_size, 8);
        assert_eq!(meta.data_size, 8);
        assert_eq!(meta.header_size, 56);
        assert_eq!(meta.data_offset, 56);
        assert_eq!(meta.bpp, 4);
        assert_eq!(encoded.bytes().len(), 64);
        assert_eq!(&encoded.bytes()[56..], &pixels);
    }

    #[test]
    fn test_gray_rle_payload() {
        let encoded = encode(4, 1, PixelFormat::Gray8.id(), 1, &[10; 4]).unwrap();
        let meta = encoded.metadata();

        assert_eq!(meta.data_size, 2);
        assert_eq!(meta.raw_size, 4);
        assert_eq!(&encoded.bytes()[56..], &[0x04, 0x0A]);
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        for (w, h) in [(0, 1), (16385, 1), (1, 0), (1, 16385)] {
            let err = encode(w, h, 4, 0, &[]).unwrap_err();
            assert!(matches!(err, Error::InvalidDimensions { .. }));
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
    }

    #[test]
    fn test_accepts_max_dimension_edge() {
        let encoded = encode(16384, 1, 4, 1, &vec![0u8; 16384]).unwrap();
        // 16384 = 64 full runs of 255 plus a run of 64
        assert_eq!(encoded.metadata().data_size, 65 * 2);
    }

    #[test]
    fn test_rejects_bad_ids() {
        assert!(matches!(
            encode(1, 1, 5, 0, &[0]),
            Err(Error::InvalidPixelFormat(5))
        ));
        assert!(matches!(
            encode(1, 1, 4, 2, &[0]),
            Err(Error::InvalidCompression(2))
        ));
    }

    #[test]
    fn test_rejects_size_mismatch() {
        for len in [11, 13] {
            let err = encode(2, 2, PixelFormat::Rgb24.id(), 0, &vec![0; len]).unwrap_err();
            assert!(matches!(err, Error::SizeMismatch { expected: 12, .. }));
        }
    }

    #[test]
    fn test_encode_raw_matches_encode() {
        let raw = RawImage::new(2, 1, PixelFormat::Bgr24, vec![1, 2, 3, 1, 2, 3]).unwrap();
        let a = encode_raw(&raw, Compression::Rle).unwrap();
        let b = encode(2, 1, 2, 1, raw.bytes()).unwrap();
        assert_eq!(a, b);
    }
}
