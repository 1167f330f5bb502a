// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::error;

use crate::chat::ChatError;
use crate::vision::ClassifyError;

/// Who caused a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Client,
    Server,
}

/// JSON error envelope. `error` repeats `message` for the mobile client,
/// which reads `data.error`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    pub message: String,
    pub category: ErrorCategory,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    InvalidRequest(String),
    DecodeError(String),
    PayloadTooLarge(String),
    ModelUnavailable(String),
    ShapeMismatch(String),
    InvalidOutput(String),
    GenerationFailed(String),
    InternalError(String),
}

impl ApiError {
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => "invalid_request",
            ApiError::DecodeError(_) => "decode_error",
            ApiError::PayloadTooLarge(_) => "payload_too_large",
            ApiError::ModelUnavailable(_) => "model_unavailable",
            ApiError::ShapeMismatch(_) => "shape_mismatch",
            ApiError::InvalidOutput(_) => "invalid_output",
            ApiError::GenerationFailed(_) => "generation_failed",
            ApiError::InternalError(_) => "internal_error",
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::InvalidRequest(msg)
            | ApiError::DecodeError(msg)
            | ApiError::PayloadTooLarge(msg)
            | ApiError::ModelUnavailable(msg)
            | ApiError::ShapeMismatch(msg)
            | ApiError::InvalidOutput(msg)
            | ApiError::GenerationFailed(msg)
            | ApiError::InternalError(msg) => msg,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::InvalidRequest(_)
            | ApiError::DecodeError(_)
            | ApiError::PayloadTooLarge(_) => ErrorCategory::Client,
            _ => ErrorCategory::Server,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) | ApiError::DecodeError(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::GenerationFailed(_) => StatusCode::BAD_GATEWAY,
            ApiError::ShapeMismatch(_)
            | ApiError::InvalidOutput(_)
            | ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.message().to_string(),
            error_type: self.error_type().to_string(),
            message: self.message().to_string(),
            category: self.category(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type(), self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}

impl From<ClassifyError> for ApiError {
    fn from(err: ClassifyError) -> Self {
        match err {
            ClassifyError::ModelUnavailable => {
                ApiError::ModelUnavailable("Leaf classifier model is not loaded".to_string())
            }
            ClassifyError::Decode(e) => ApiError::DecodeError(format!("Invalid image: {}", e)),
            e @ ClassifyError::ShapeMismatch { .. } => {
                error!("Classifier contract violation: {}", e);
                ApiError::ShapeMismatch(
                    "Classifier model does not match the expected layout".to_string(),
                )
            }
            e @ ClassifyError::InvalidOutput(_) => {
                error!("Classifier produced unusable scores: {}", e);
                ApiError::InvalidOutput("Classifier produced an invalid result".to_string())
            }
            e @ ClassifyError::Inference(_) => {
                error!("Classifier inference failed: {}", e);
                ApiError::InternalError("Internal error while classifying the image".to_string())
            }
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::ModelUnavailable => {
                ApiError::ModelUnavailable("Chat model is not available".to_string())
            }
            ChatError::InvalidRequest(msg) => ApiError::InvalidRequest(msg),
            ChatError::GenerationFailed(e) => {
                error!("Chat generation failed: {}", e);
                ApiError::GenerationFailed(
                    "Internal error while processing your request".to_string(),
                )
            }
        }
    }
}
