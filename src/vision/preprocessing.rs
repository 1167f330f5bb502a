// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the grape-leaf classifier

use image::imageops::FilterType;
use image::DynamicImage;
use ndarray::Array4;

use super::errors::ClassifyError;
use super::image_utils::decode_image_bytes;

/// Square input edge expected by the leaf model
pub const LEAF_INPUT_SIZE: u32 = 224;

/// Color channels expected by the leaf model
pub const LEAF_INPUT_CHANNELS: usize = 3;

/// Declared input signature of the leaf model: [batch, height, width, channels]
pub const LEAF_INPUT_SHAPE: [usize; 4] = [
    1,
    LEAF_INPUT_SIZE as usize,
    LEAF_INPUT_SIZE as usize,
    LEAF_INPUT_CHANNELS,
];

/// Resampling used for the resize step (bicubic, the PIL `resize` default)
pub const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

/// Preprocess an image for leaf classification
///
/// Steps:
/// 1. Convert to 3-channel RGB
/// 2. Resize to 224x224 (aspect ratio is not preserved)
/// 3. Scale pixel values into [0, 1] by dividing by 255
/// 4. Lay out as NHWC with a leading batch dimension of 1
pub fn preprocess_for_classification(image: &DynamicImage) -> Array4<f32> {
    let rgb = image.to_rgb8();
    let resized = image::imageops::resize(&rgb, LEAF_INPUT_SIZE, LEAF_INPUT_SIZE, RESIZE_FILTER);

    let size = LEAF_INPUT_SIZE as usize;
    let mut tensor = Array4::zeros(LEAF_INPUT_SHAPE);

    for (x, y, pixel) in resized.enumerate_pixels() {
        for c in 0..LEAF_INPUT_CHANNELS {
            tensor[[0, y as usize, x as usize, c]] = pixel[c] as f32 / 255.0;
        }
    }

    debug_assert_eq!(tensor.shape(), &[1, size, size, LEAF_INPUT_CHANNELS]);
    tensor
}

/// Decode uploaded bytes and preprocess them in one step
pub fn preprocess_bytes(bytes: &[u8]) -> Result<Array4<f32>, ClassifyError> {
    let (image, info) = decode_image_bytes(bytes)?;
    tracing::debug!(
        "Decoded leaf image: {}x{} {:?}, {} bytes",
        info.width,
        info.height,
        info.format,
        info.size_bytes
    );
    Ok(preprocess_for_classification(&image))
}

/// Check a tensor against the model's declared input signature
pub fn check_input_shape(tensor: &Array4<f32>, expected: [usize; 4]) -> Result<(), ClassifyError> {
    if tensor.shape() != expected.as_slice() {
        return Err(ClassifyError::ShapeMismatch {
            expected: expected.to_vec(),
            actual: tensor.shape().to_vec(),
        });
    }
    Ok(())
}
