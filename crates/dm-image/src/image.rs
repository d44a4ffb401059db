//! In-memory image buffers handed between the decoder, converter and encoder.

use crate::format::PixelFormat;
use crate::{Error, Result};

/// Channel layout of a decoded source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLayout {
    /// One luma sample per pixel.
    Luma,
    /// Luma and alpha.
    LumaAlpha,
    /// Red, green, blue.
    Rgb,
    /// Red, green, blue, alpha.
    Rgba,
    /// Any other decoder mode (high bit depth, float, palette, ...).
    ///
    /// The decoder normalises such images to 8-bit RGBA samples, but the
    /// mode itself reports neither alpha nor a plain colour/gray layout.
    Other,
}

/// Capability flags used to pick a target format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceCapabilities {
    pub has_alpha: bool,
    pub is_grayscale: bool,
    pub is_color: bool,
}

impl SourceLayout {
    /// Number of 8-bit samples per pixel in [`SourceImage::samples`].
    pub const fn channels(self) -> usize {
        match self {
            SourceLayout::Luma => 1,
            SourceLayout::LumaAlpha => 2,
            SourceLayout::Rgb => 3,
            SourceLayout::Rgba | SourceLayout::Other => 4,
        }
    }

    pub const fn capabilities(self) -> SourceCapabilities {
        match self {
            SourceLayout::Luma => SourceCapabilities {
                has_alpha: false,
                is_grayscale: true,
                is_color: false,
            },
            SourceLayout::LumaAlpha => SourceCapabilities {
                has_alpha: true,
                is_grayscale: true,
                is_color: false,
            },
            SourceLayout::Rgb => SourceCapabilities {
                has_alpha: false,
                is_grayscale: false,
                is_color: true,
            },
            SourceLayout::Rgba => SourceCapabilities {
                has_alpha: true,
                is_grayscale: false,
                is_color: true,
            },
            SourceLayout::Other => SourceCapabilities {
                has_alpha: false,
                is_grayscale: false,
                is_color: false,
            },
        }
    }
}

/// Decoded pixels as supplied by an image decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    width: u32,
    height: u32,
    layout: SourceLayout,
    samples: Vec<u8>,
}

impl SourceImage {
    /// Wrap decoded samples, checking the buffer against the geometry.
    pub fn new(width: u32, height: u32, layout: SourceLayout, samples: Vec<u8>) -> Result<Self> {
        let expected = buffer_len(width, height, layout.channels())?;
        if samples.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: samples.len(),
            });
        }

        Ok(Self {
            width,
            height,
            layout,
            samples,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn layout(&self) -> SourceLayout {
        self.layout
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub(crate) fn into_samples(self) -> Vec<u8> {
        self.samples
    }
}

/// Pixels in one of the DM pixel formats, ready to encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    width: u32,
    height: u32,
    format: PixelFormat,
    bytes: Vec<u8>,
}

impl RawImage {
    /// Wrap a pixel buffer, checking `bytes.len() == width * height * bpp`.
    pub fn new(width: u32, height: u32, format: PixelFormat, bytes: Vec<u8>) -> Result<Self> {
        let expected = buffer_len(width, height, format.bpp())?;
        if bytes.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: bytes.len(),
            });
        }

        Ok(Self {
            width,
            height,
            format,
            bytes,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Bytes per pixel of [`Self::format`].
    pub fn bpp(&self) -> usize {
        self.format.bpp()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Take ownership of the pixel buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// `width * height * channels`, failing on overflow.
pub(crate) fn buffer_len(width: u32, height: u32, channels: usize) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(channels))
        .ok_or_else(|| {
            Error::InvalidSource(format!(
                "{}x{} image with {} bytes per pixel overflows",
                width, height, channels
            ))
        })
}
