//! Conversion of decoded images into DM pixel formats.
//!
//! Formats with alpha are stored premultiplied. Premultiplication uses
//! `c' = (c * a + 127) / 255` in integer arithmetic and leaves opaque
//! pixels untouched; readers rely on this exact rounding.

use log::debug;

use crate::format::{FormatSelection, PixelFormat};
use crate::image::{RawImage, SourceImage, SourceLayout};
use crate::Result;

/// Pick the target format for [`FormatSelection::Auto`].
///
/// Alpha wins over everything, then colour, then gray. A source that is
/// none of these keeps all four channels.
pub fn auto_format(layout: SourceLayout) -> PixelFormat {
    let caps = layout.capabilities();
    match (caps.has_alpha, caps.is_color, caps.is_grayscale) {
        (true, _, _) => PixelFormat::Rgba32,
        (false, true, _) => PixelFormat::Rgb24,
        (false, false, true) => PixelFormat::Gray8,
        (false, false, false) => PixelFormat::Rgba32,
    }
}

/// Resolve a selection against a source layout.
pub fn resolve_format(selection: FormatSelection, layout: SourceLayout) -> PixelFormat {
    match selection {
        FormatSelection::Auto => auto_format(layout),
        FormatSelection::Explicit(format) => format,
    }
}

/// Convert a decoded image into the selected DM pixel format.
pub fn convert(source: SourceImage, selection: FormatSelection) -> Result<RawImage> {
    let format = resolve_format(selection, source.layout());
    let (width, height, layout) = (source.width(), source.height(), source.layout());

    debug!(
        "converting {}x{} {:?} source to {} (requested {})",
        width, height, layout, format, selection
    );

    let samples = source.into_samples();
    let bytes = match format {
        PixelFormat::Gray8 => to_luma(samples, layout),
        PixelFormat::Rgb24 => to_rgb(samples, layout),
        PixelFormat::Bgr24 => {
            let mut bytes = to_rgb(samples, layout);
            swap_red_blue(&mut bytes, 3);
            bytes
        }
        PixelFormat::Rgba32 => {
            let mut bytes = to_rgba(samples, layout);
            premultiply_alpha(&mut bytes);
            bytes
        }
        PixelFormat::Bgra32 => {
            let mut bytes = to_rgba(samples, layout);
            premultiply_alpha(&mut bytes);
            swap_red_blue(&mut bytes, 4);
            bytes
        }
    };

    RawImage::new(width, height, format, bytes)
}

/// Premultiply one colour channel by `alpha`.
#[inline]
pub const fn premultiply_channel(value: u8, alpha: u8) -> u8 {
    ((value as u32 * alpha as u32 + 127) / 255) as u8
}

/// Premultiply an RGBA (or BGRA) buffer in place.
///
/// Trailing bytes that do not form a whole pixel are left untouched.
pub fn premultiply_alpha(pixels: &mut [u8]) {
    for_each_pixel(pixels, 4, |px| {
        let a = px[3];
        if a == 255 {
            return;
        }
        px[0] = premultiply_channel(px[0], a);
        px[1] = premultiply_channel(px[1], a);
        px[2] = premultiply_channel(px[2], a);
    });
}

/// Swap the first and third byte of every `bpp`-byte pixel.
pub fn swap_red_blue(pixels: &mut [u8], bpp: usize) {
    for_each_pixel(pixels, bpp, |px| px.swap(0, 2));
}

/// ITU-R 601-2 luma in 16-bit fixed point.
#[inline]
pub const fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16) as u8
}

fn to_luma(samples: Vec<u8>, layout: SourceLayout) -> Vec<u8> {
    match layout {
        SourceLayout::Luma => samples,
        SourceLayout::LumaAlpha => map_pixels(&samples, 2, 1, |src, dst| dst[0] = src[0]),
        SourceLayout::Rgb | SourceLayout::Rgba | SourceLayout::Other => {
            let channels = layout.channels();
            map_pixels(&samples, channels, 1, |src, dst| {
                dst[0] = luma(src[0], src[1], src[2])
            })
        }
    }
}

fn to_rgb(samples: Vec<u8>, layout: SourceLayout) -> Vec<u8> {
    match layout {
        SourceLayout::Rgb => samples,
        SourceLayout::Luma | SourceLayout::LumaAlpha => {
            map_pixels(&samples, layout.channels(), 3, |src, dst| dst.fill(src[0]))
        }
        SourceLayout::Rgba | SourceLayout::Other => {
            map_pixels(&samples, 4, 3, |src, dst| dst.copy_from_slice(&src[..3]))
        }
    }
}

fn to_rgba(samples: Vec<u8>, layout: SourceLayout) -> Vec<u8> {
    match layout {
        SourceLayout::Rgba | SourceLayout::Other => samples,
        SourceLayout::Luma => map_pixels(&samples, 1, 4, |src, dst| {
            dst.copy_from_slice(&[src[0], src[0], src[0], 255])
        }),
        SourceLayout::LumaAlpha => map_pixels(&samples, 2, 4, |src, dst| {
            dst.copy_from_slice(&[src[0], src[0], src[0], src[1]])
        }),
        SourceLayout::Rgb => map_pixels(&samples, 3, 4, |src, dst| {
            dst.copy_from_slice(&[src[0], src[1], src[2], 255])
        }),
    }
}

/// Build a new buffer by mapping each source pixel to a destination pixel.
fn map_pixels<F>(src: &[u8], src_bpp: usize, dst_bpp: usize, f: F) -> Vec<u8>
where
    F: Fn(&[u8], &mut [u8]) + Send + Sync,
{
    let pixel_count = src.len() / src_bpp;
    let mut dst = vec![0u8; pixel_count * dst_bpp];

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        dst.par_chunks_exact_mut(dst_bpp)
            .zip(src.par_chunks_exact(src_bpp))
            .for_each(|(d, s)| f(s, d));
    }

    #[cfg(not(feature = "parallel"))]
    {
        dst.chunks_exact_mut(dst_bpp)
            .zip(src.chunks_exact(src_bpp))
            .for_each(|(d, s)| f(s, d));
    }

    dst
}

/// Apply `f` to every whole `bpp`-byte pixel of `pixels`.
fn for_each_pixel<F>(pixels: &mut [u8], bpp: usize, f: F)
where
    F: Fn(&mut [u8]) + Send + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        pixels.par_chunks_exact_mut(bpp).for_each(f);
    }

    #[cfg(not(feature = "parallel"))]
    {
        pixels.chunks_exact_mut(bpp).for_each(f);
    }
}
