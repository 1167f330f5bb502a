// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Grape-leaf image classification
//!
//! This module provides:
//! - Image decoding and validation
//! - Preprocessing to the model's NHWC input tensor
//! - CPU inference through ONNX Runtime
//! - Score normalization and label resolution against a pinned label set
//!
//! Inference is blocking; callers on the async runtime hand it to
//! `spawn_blocking`.

pub mod classifier;
pub mod errors;
pub mod image_utils;
pub mod labels;
pub mod pipeline;
pub mod postprocessing;
pub mod preprocessing;

pub use classifier::{ClassificationEngine, OnnxLeafClassifier};
pub use errors::ClassifyError;
pub use image_utils::{decode_image_bytes, image_digest, sanitize_filename, ImageError, ImageInfo};
pub use labels::{LabelSet, LabelSetError, GRAPE_LEAF_V1, LEAF_CLASS_COUNT};
pub use pipeline::{ClassificationPipeline, ClassifierStatus};
pub use postprocessing::{Prediction, ScoreNormalization};
pub use preprocessing::{preprocess_for_classification, LEAF_INPUT_SHAPE, LEAF_INPUT_SIZE};
