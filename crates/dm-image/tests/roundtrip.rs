use dm_image::header::file_checksum;
use dm_image::{encode, rle, Compression, DmFile, Error, ErrorKind, PixelFormat};
use proptest::prelude::*;

fn image_strategy() -> impl Strategy<Value = (u32, u32, PixelFormat, Vec<u8>)> {
    (1u32..=24, 1u32..=24, 0u8..5).prop_flat_map(|(width, height, id)| {
        let format = PixelFormat::from_id(id).unwrap();
        let len = (width * height) as usize * format.bpp();
        // A small sample alphabet so runs actually occur
        (
            Just(width),
            Just(height),
            Just(format),
            prop::collection::vec(0u8..3, len),
        )
    })
}

proptest! {
    #[test]
    fn encode_then_parse_recovers_pixels(
        (width, height, format, pixels) in image_strategy(),
        use_rle in any::<bool>(),
    ) {
        let compression = if use_rle { Compression::Rle } else { Compression::None };
        let encoded = encode(width, height, format.id(), compression.id(), &pixels).unwrap();
        let meta = *encoded.metadata();

        prop_assert_eq!(meta.header_size, 56);
        prop_assert_eq!(meta.data_offset, 56);
        prop_assert_eq!(meta.raw_size, pixels.len() as u64);
        prop_assert_eq!(encoded.bytes().len() as u64, 56 + meta.data_size);

        let file = DmFile::parse(encoded.bytes()).unwrap();
        prop_assert_eq!(file.pixel_format(), format);
        prop_assert_eq!(file.checksum(), meta.checksum);
        let decoded = file.pixels().unwrap();
        prop_assert_eq!(&*decoded, &pixels[..]);
    }

    #[test]
    fn rle_round_trip(bpp in 1usize..=4, pixels in prop::collection::vec(0u8..2, 0..600)) {
        let len = pixels.len() / bpp * bpp;
        let data = &pixels[..len];

        let encoded = rle::encode(data, bpp).unwrap();
        prop_assert_eq!(encoded.len() % (bpp + 1), 0);
        prop_assert!(encoded.chunks(bpp + 1).all(|unit| unit[0] >= 1));
        prop_assert_eq!(rle::decode(&encoded, bpp).unwrap(), data);
    }
}

#[test]
fn two_pixel_rgba_file_layout() {
    let pixels = [255, 0, 0, 255, 255, 0, 0, 255];
    let encoded = encode(2, 1, PixelFormat::Rgba32.id(), Compression::None.id(), &pixels).unwrap();
    let meta = encoded.metadata();

    assert_eq!(
        (meta.raw_size, meta.data_size, meta.header_size, meta.data_offset),
        (8, 8, 56, 56)
    );

    let bytes = encoded.bytes();
    assert_eq!(bytes.len(), 64);
    assert_eq!(&bytes[0..4], &[0x01, 0x00, 0x4D, 0x44]);
    assert_eq!(&bytes[4..8], &meta.checksum.to_le_bytes());
    assert_eq!(&bytes[52..56], &[0, 0, 0, 0]);
    assert_eq!(&bytes[56..], &pixels);
}

#[test]
fn gray_rle_file_payload() {
    let encoded = encode(4, 1, PixelFormat::Gray8.id(), Compression::Rle.id(), &[10; 4]).unwrap();
    assert_eq!(&encoded.bytes()[56..], &[0x04, 0x0A]);
    assert_eq!(encoded.metadata().data_size, 2);
    assert_eq!(encoded.metadata().raw_size, 4);
}

#[test]
fn three_hundred_pixel_run() {
    let pixels = [9u8, 8, 7].repeat(300);
    let encoded = encode(300, 1, PixelFormat::Rgb24.id(), Compression::Rle.id(), &pixels).unwrap();
    assert_eq!(&encoded.bytes()[56..], &[255, 9, 8, 7, 45, 9, 8, 7]);
}

#[test]
fn validation_failures_produce_nothing() {
    for width in [0, 16385] {
        let err = encode(width, 1, PixelFormat::Gray8.id(), 0, &[0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    for len in [3, 5] {
        let err = encode(2, 2, PixelFormat::Gray8.id(), 0, &vec![0; len]).unwrap_err();
        assert!(matches!(err, Error::SizeMismatch { expected: 4, .. }));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}

#[test]
fn checksum_covers_every_byte_but_its_own() {
    let pixels: Vec<u8> = (0..48).collect();
    let encoded = encode(4, 4, PixelFormat::Rgb24.id(), 0, &pixels).unwrap();
    let original = encoded.metadata().checksum;

    let mut bytes = encoded.into_bytes();
    for i in (0..bytes.len()).filter(|i| !(4..8).contains(i)) {
        bytes[i] ^= 0x5A;
        assert_ne!(file_checksum(&bytes), original, "byte {} not covered", i);
        bytes[i] ^= 0x5A;
    }

    // The checksum field itself does not contribute
    bytes[4..8].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
    assert_eq!(file_checksum(&bytes), original);
}

#[test]
fn corrupted_payload_is_rejected() {
    let encoded = encode(2, 2, PixelFormat::Gray8.id(), 0, &[1, 2, 3, 4]).unwrap();
    let mut bytes = encoded.into_bytes();
    bytes[57] = 0xFF;

    let err = DmFile::parse(&bytes).unwrap_err();
    assert!(matches!(err, Error::ChecksumMismatch { .. }));
    assert_eq!(err.kind(), ErrorKind::Corrupt);
}
