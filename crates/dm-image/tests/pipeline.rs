use dm_image::{
    convert, encode_raw, Compression, DmFile, FormatSelection, PixelFormat, SourceImage,
    SourceLayout,
};

const RGBA: [u8; 8] = [200, 100, 50, 128, 10, 20, 30, 255];

fn rgba_source() -> SourceImage {
    SourceImage::new(2, 1, SourceLayout::Rgba, RGBA.to_vec()).unwrap()
}

#[test]
fn every_format_survives_the_container() {
    for format in PixelFormat::ALL {
        for compression in [Compression::None, Compression::Rle] {
            let raw = convert(rgba_source(), format.into()).unwrap();
            let encoded = encode_raw(&raw, compression).unwrap();

            let file = DmFile::parse(encoded.bytes()).unwrap();
            assert_eq!(file.to_raw_image().unwrap(), raw, "{} / {}", format, compression);
        }
    }
}

#[test]
fn converted_bytes_per_format() {
    let expect = [
        (PixelFormat::Rgb24, vec![200, 100, 50, 10, 20, 30]),
        (PixelFormat::Bgr24, vec![50, 100, 200, 30, 20, 10]),
        (PixelFormat::Rgba32, vec![100, 50, 25, 128, 10, 20, 30, 255]),
        (PixelFormat::Bgra32, vec![25, 50, 100, 128, 30, 20, 10, 255]),
        (PixelFormat::Gray8, vec![124, 18]),
    ];

    for (format, bytes) in expect {
        let raw = convert(rgba_source(), format.into()).unwrap();
        assert_eq!(raw.bytes(), &bytes[..], "{}", format);
    }
}

#[test]
fn auto_keeps_all_channels_for_other_sources() {
    let source = SourceImage::new(2, 1, SourceLayout::Other, RGBA.to_vec()).unwrap();
    let raw = convert(source, FormatSelection::Auto).unwrap();

    assert_eq!(raw.format(), PixelFormat::Rgba32);
    assert_eq!(raw.bytes(), &[100, 50, 25, 128, 10, 20, 30, 255]);
}
