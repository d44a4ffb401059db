//! img2dm - convert images into Delta Media (DM v1) image files.
//!
//! This is the command-line front end: it decodes the input with the
//! `image` crate, converts and encodes it with `delta-media`, and writes
//! the result to disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use image::DynamicImage;
use log::{debug, info, LevelFilter};

use delta_media::prelude::*;

/// Convert an image into a Delta Media (DM) image file
#[derive(Parser)]
#[command(name = "img2dm")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input image (PNG, JPEG or BMP)
    input: PathBuf,

    /// Output DM file (default: input path with a .dm extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pixel format: auto, rgb24, rgba32, bgr24, bgra32 or gray8
    #[arg(short, long, env = "DM_FORMAT", default_value = "auto")]
    format: FormatSelection,

    /// Compression: none or rle
    #[arg(short, long = "comp", env = "DM_COMPRESSION", default_value = "none")]
    compression: Compression,

    /// Re-parse the encoded file and compare pixels before writing
    #[arg(long)]
    verify: bool,

    /// Print the file metadata as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input));

    let start = Instant::now();
    let source = load_source(&cli.input)?;
    let raw = convert(source, cli.format).context("Failed to convert pixels")?;
    let encoded = encode_raw(&raw, cli.compression).context("Failed to encode DM image")?;
    info!("Encoded {} in {:?}", cli.input.display(), start.elapsed());

    if cli.verify {
        verify(&encoded, &raw)?;
    }

    fs::write(&output, encoded.bytes())
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let meta = encoded.metadata();
    if cli.json {
        let report = serde_json::json!({
            "output": output.display().to_string(),
            "metadata": meta,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&output, cli.format, meta);
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// `photo.png` -> `photo.dm`
fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("dm")
}

/// Decode an image file into a [`SourceImage`].
fn load_source(path: &Path) -> Result<SourceImage> {
    let decoded = image::open(path)
        .with_context(|| format!("Failed to decode {}", path.display()))?;
    let (width, height) = (decoded.width(), decoded.height());

    let (layout, samples) = match decoded {
        DynamicImage::ImageLuma8(buf) => (SourceLayout::Luma, buf.into_raw()),
        DynamicImage::ImageLumaA8(buf) => (SourceLayout::LumaAlpha, buf.into_raw()),
        DynamicImage::ImageRgb8(buf) => (SourceLayout::Rgb, buf.into_raw()),
        DynamicImage::ImageRgba8(buf) => (SourceLayout::Rgba, buf.into_raw()),
        other => {
            debug!("normalising {:?} source to 8-bit RGBA", other.color());
            (SourceLayout::Other, other.into_rgba8().into_raw())
        }
    };

    debug!("decoded {}x{} {:?}", width, height, layout);

    SourceImage::new(width, height, layout, samples).context("Decoded image is inconsistent")
}

fn verify(encoded: &EncodedImage, raw: &RawImage) -> Result<()> {
    let file = DmFile::parse(encoded.bytes()).context("Encoded file failed verification")?;
    let pixels = file.pixels().context("Failed to decode payload")?;

    if *pixels != *raw.bytes() {
        anyhow::bail!("Encoded payload does not decode to the converted pixels");
    }

    info!("Verified checksum {:#010x}", file.checksum());
    Ok(())
}

fn print_summary(output: &Path, requested: FormatSelection, meta: &EncodeMetadata) {
    println!("Wrote: {}", output.display());
    println!(" width x height: {} x {}", meta.width, meta.height);
    println!(
        " pixel_format: {} ({} BPP, requested {})",
        meta.pixel_format, meta.bpp, requested
    );
    println!(" compression: {}", meta.compression.to_string().to_uppercase());
    println!(" raw_size: {} bytes", meta.raw_size);
    println!(" data_size (stored): {} bytes", meta.data_size);
    println!(" header_size: {} bytes", meta.header_size);
    println!(" data_offset: {} bytes", meta.data_offset);
    println!(" crc32: 0x{:08x}", meta.checksum);
}
