// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use thiserror::Error;

use super::image_utils::ImageError;

/// Failures of the classification pipeline
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The leaf model failed to load at startup; persists until restart
    #[error("Leaf classifier model is not loaded")]
    ModelUnavailable,

    /// The upload is not a decodable image
    #[error("Invalid image: {0}")]
    Decode(#[from] ImageError),

    /// Tensor or score vector does not match the model contract
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// The model produced scores that cannot be interpreted (NaN, infinity, empty)
    #[error("Model produced invalid scores: {0}")]
    InvalidOutput(String),

    /// The inference runtime itself failed
    #[error("Inference failed: {0}")]
    Inference(String),
}

impl ClassifyError {
    /// Whether the failure was caused by the uploaded data
    pub fn is_client_error(&self) -> bool {
        matches!(self, ClassifyError::Decode(_))
    }
}
