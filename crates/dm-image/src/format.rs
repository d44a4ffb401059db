//! Pixel formats, compression methods and media types.

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Byte layout of one pixel in a DM image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum PixelFormat {
    /// R, G, B.
    Rgb24 = 0,
    /// R, G, B, A with premultiplied alpha.
    Rgba32 = 1,
    /// B, G, R.
    Bgr24 = 2,
    /// B, G, R, A with premultiplied alpha.
    Bgra32 = 3,
    /// Single luma byte.
    Gray8 = 4,
}

impl PixelFormat {
    /// All formats in wire-id order.
    pub const ALL: [PixelFormat; 5] = [
        PixelFormat::Rgb24,
        PixelFormat::Rgba32,
        PixelFormat::Bgr24,
        PixelFormat::Bgra32,
        PixelFormat::Gray8,
    ];

    /// Look up a format by its wire id.
    pub fn from_id(id: u8) -> Result<Self> {
        match id {
            0 => Ok(PixelFormat::Rgb24),
            1 => Ok(PixelFormat::Rgba32),
            2 => Ok(PixelFormat::Bgr24),
            3 => Ok(PixelFormat::Bgra32),
            4 => Ok(PixelFormat::Gray8),
            other => Err(Error::InvalidPixelFormat(other)),
        }
    }

    /// Wire id stored in the image header.
    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Bytes per pixel.
    #[inline]
    pub const fn bpp(self) -> usize {
        match self {
            PixelFormat::Rgb24 | PixelFormat::Bgr24 => 3,
            PixelFormat::Rgba32 | PixelFormat::Bgra32 => 4,
            PixelFormat::Gray8 => 1,
        }
    }

    /// Whether the format carries a (premultiplied) alpha channel.
    #[inline]
    pub const fn has_alpha(self) -> bool {
        matches!(self, PixelFormat::Rgba32 | PixelFormat::Bgra32)
    }

    /// Lowercase name as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            PixelFormat::Rgb24 => "rgb24",
            PixelFormat::Rgba32 => "rgba32",
            PixelFormat::Bgr24 => "bgr24",
            PixelFormat::Bgra32 => "bgra32",
            PixelFormat::Gray8 => "gray8",
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PixelFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "rgb24" => Ok(PixelFormat::Rgb24),
            "rgba32" => Ok(PixelFormat::Rgba32),
            "bgr24" => Ok(PixelFormat::Bgr24),
            "bgra32" => Ok(PixelFormat::Bgra32),
            "gray8" => Ok(PixelFormat::Gray8),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Target format requested from the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatSelection {
    /// Pick a format from the source layout.
    #[default]
    Auto,
    /// Use this format.
    Explicit(PixelFormat),
}

impl fmt::Display for FormatSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatSelection::Auto => f.write_str("auto"),
            FormatSelection::Explicit(format) => fmt::Display::fmt(format, f),
        }
    }
}

impl FromStr for FormatSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("auto") {
            return Ok(FormatSelection::Auto);
        }
        s.parse().map(FormatSelection::Explicit)
    }
}

impl From<PixelFormat> for FormatSelection {
    fn from(format: PixelFormat) -> Self {
        FormatSelection::Explicit(format)
    }
}

/// Payload compression method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum Compression {
    /// Pixels stored as-is.
    #[default]
    None = 0,
    /// Per-pixel run-length encoding.
    Rle = 1,
}

impl Compression {
    /// Look up a compression method by its wire id.
    pub fn from_id(id: u8) -> Result<Self> {
        match id {
            0 => Ok(Compression::None),
            1 => Ok(Compression::Rle),
            other => Err(Error::InvalidCompression(other)),
        }
    }

    /// Wire id stored in the common header.
    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Compression::None => "none",
            Compression::Rle => "rle",
        })
    }
}

impl FromStr for Compression {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Compression::None),
            "rle" => Ok(Compression::Rle),
            _ => Err(Error::UnsupportedCompression(s.to_string())),
        }
    }
}

/// Kind of media held by a DM container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MediaType {
    Image = 0,
    Video = 1,
    Audio = 2,
}

impl MediaType {
    /// Look up a media type by its wire id.
    pub fn from_id(id: u8) -> Result<Self> {
        match id {
            0 => Ok(MediaType::Image),
            1 => Ok(MediaType::Video),
            2 => Ok(MediaType::Audio),
            other => Err(Error::UnknownMediaType(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bpp_table() {
        let bpp: Vec<usize> = PixelFormat::ALL.iter().map(|f| f.bpp()).collect();
        assert_eq!(bpp, [3, 4, 3, 4, 1]);
    }

    #[test]
    fn test_ids_round_trip() {
        for format in PixelFormat::ALL {
            assert_eq!(PixelFormat::from_id(format.id()).unwrap(), format);
        }
        assert!(matches!(
            PixelFormat::from_id(5),
            Err(Error::InvalidPixelFormat(5))
        ));
        assert!(matches!(
            Compression::from_id(2),
            Err(Error::InvalidCompression(2))
        ));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("bgra32".parse::<PixelFormat>().unwrap(), PixelFormat::Bgra32);
        assert_eq!("GRAY8".parse::<PixelFormat>().unwrap(), PixelFormat::Gray8);
        assert_eq!(
            "auto".parse::<FormatSelection>().unwrap(),
            FormatSelection::Auto
        );
        assert_eq!(
            "rgb24".parse::<FormatSelection>().unwrap(),
            FormatSelection::Explicit(PixelFormat::Rgb24)
        );
        assert!(matches!(
            "rgb565".parse::<FormatSelection>(),
            Err(Error::UnsupportedFormat(_))
        ));
        assert_eq!("rle".parse::<Compression>().unwrap(), Compression::Rle);
    }

    #[test]
    fn test_media_types() {
        assert_eq!(MediaType::from_id(0).unwrap(), MediaType::Image);
        assert!(matches!(
            MediaType::from_id(3),
            Err(Error::UnknownMediaType(3))
        ));
    }
}
