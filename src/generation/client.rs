// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text generation client abstraction

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("Generation request timed out")]
    Timeout,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Rate limited by generation API")]
    RateLimited,

    #[error("Generation API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed generation response: {0}")]
    MalformedResponse(String),
}

impl GenerationError {
    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            GenerationError::Timeout
            | GenerationError::Transport(_)
            | GenerationError::RateLimited => true,
            GenerationError::Api { status, .. } => *status >= 500,
            GenerationError::MalformedResponse(_) => false,
        }
    }
}

/// Instruction string in, generated text out
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, instruction: &str) -> Result<String, GenerationError>;
}
