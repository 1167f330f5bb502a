// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat request types

use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub prompt: String,
}

impl ChatRequest {
    /// Extract the prompt from an arbitrary JSON body
    ///
    /// The body must be an object with a string `prompt`. Emptiness is
    /// checked by the chat service, not here.
    pub fn from_value(body: &serde_json::Value) -> Result<Self, ApiError> {
        match body.get("prompt") {
            Some(serde_json::Value::String(prompt)) => Ok(Self {
                prompt: prompt.clone(),
            }),
            Some(_) => Err(ApiError::InvalidRequest(
                "\"prompt\" must be a string".to_string(),
            )),
            None => Err(ApiError::InvalidRequest(
                "Invalid request: \"prompt\" not found".to_string(),
            )),
        }
    }
}
