// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use thiserror::Error;

use crate::generation::GenerationError;

#[derive(Debug, Error)]
pub enum ChatError {
    /// No generation client is configured
    #[error("Chat model is not available")]
    ModelUnavailable,

    #[error("Invalid chat request: {0}")]
    InvalidRequest(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(#[from] GenerationError),
}
