// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat response types

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    /// Markdown reply from the assistant
    pub response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResetResponse {
    pub status: String,
    pub message: String,
}

impl ResetResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            message: "Conversation history has been reset.".to_string(),
        }
    }
}
