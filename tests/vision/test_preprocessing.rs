// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Decoding and tensor layout across input formats

use grapecheck_node::vision::preprocessing::preprocess_bytes;
use grapecheck_node::vision::{ClassifyError, ImageError, LEAF_INPUT_SHAPE};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
    buf
}

fn leaf(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, 140, (y % 256) as u8])
    }))
}

#[test]
fn test_formats_produce_model_shape() {
    for format in [
        ImageFormat::Png,
        ImageFormat::Jpeg,
        ImageFormat::Bmp,
        ImageFormat::Tiff,
    ] {
        let bytes = encode(leaf(300, 200), format);
        let tensor = preprocess_bytes(&bytes).unwrap();
        assert_eq!(tensor.shape(), &LEAF_INPUT_SHAPE, "format {:?}", format);
        assert!(
            tensor.iter().all(|v| (0.0..=1.0).contains(v)),
            "format {:?} left values outside [0, 1]",
            format
        );
    }
}

#[test]
fn test_tiny_and_wide_images_are_stretched() {
    for (w, h) in [(1, 1), (1000, 10), (7, 640)] {
        let tensor = preprocess_bytes(&encode(leaf(w, h), ImageFormat::Png)).unwrap();
        assert_eq!(tensor.shape(), &LEAF_INPUT_SHAPE);
    }
}

#[test]
fn test_rgba_alpha_is_dropped() {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(50, 50, Rgba([255, 0, 0, 10])));
    let tensor = preprocess_bytes(&encode(img, ImageFormat::Png)).unwrap();
    assert_eq!(tensor.shape()[3], 3);
    assert!((tensor[[0, 10, 10, 0]] - 1.0).abs() < 1e-6);
    assert!(tensor[[0, 10, 10, 1]].abs() < 1e-6);
}

#[test]
fn test_identical_bytes_identical_tensor() {
    let bytes = encode(leaf(123, 77), ImageFormat::Jpeg);
    let a = preprocess_bytes(&bytes).unwrap();
    let b = preprocess_bytes(&bytes).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_garbage_is_decode_error() {
    for bytes in [
        Vec::new(),
        b"GIF89a but not really".to_vec(),
        vec![0xFF, 0xD8, 0xFF, 0x00, 0x01],
        b"{\"json\": true}".to_vec(),
    ] {
        match preprocess_bytes(&bytes) {
            Err(ClassifyError::Decode(_)) => {}
            other => panic!("expected Decode error, got {:?}", other.map(|t| t.shape().to_vec())),
        }
    }
}

#[test]
fn test_empty_bytes_report_empty_data() {
    assert!(matches!(
        preprocess_bytes(&[]),
        Err(ClassifyError::Decode(ImageError::EmptyData))
    ));
}
