// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Classification endpoint handler

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::multipart::{MultipartError, MultipartRejection};
use axum_extra::extract::Multipart;
use tracing::{debug, error, info, warn};

use super::response::ClassifyResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::vision::{image_digest, sanitize_filename};

/// Multipart field carrying the image
pub const FILE_FIELD: &str = "file";

struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("Uploaded file is too large".to_string())
    } else {
        ApiError::InvalidRequest(format!("Malformed multipart body: {}", e.body_text()))
    }
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        return match filename {
            Some(name) if !name.is_empty() => Ok(Upload {
                filename: name,
                bytes: bytes.to_vec(),
            }),
            _ => Err(ApiError::InvalidRequest("No file selected".to_string())),
        };
    }

    Err(ApiError::InvalidRequest(
        "Invalid request: no \"file\" part was sent".to_string(),
    ))
}

/// POST /classify - Classify a grape-leaf photo
///
/// # Request
/// - multipart/form-data with a `file` part (the filename is advisory)
///
/// # Response
/// - `label`: predicted class
/// - `confidence`: probability of that class (0.0-1.0)
///
/// # Errors
/// - 400 Bad Request: no `file` part, empty filename, or undecodable image
/// - 413 Payload Too Large: upload exceeds the body limit
/// - 503 Service Unavailable: classifier model not loaded
/// - 500 Internal Server Error: shape/output contract violated or inference failed
pub async fn classify_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ClassifyResponse>, ApiError> {
    if !state.classifier.is_available() {
        warn!("Classification requested but the leaf model is not loaded");
        return Err(ApiError::ModelUnavailable(
            "Leaf classifier model is not loaded".to_string(),
        ));
    }

    let multipart = multipart.map_err(|e| {
        ApiError::InvalidRequest(format!("Expected a multipart upload: {}", e.body_text()))
    })?;

    let upload = read_upload(multipart).await?;
    let filename = sanitize_filename(&upload.filename);
    let digest = image_digest(&upload.bytes);
    debug!(
        "Classify upload {} ({} bytes, sha256 {})",
        filename,
        upload.bytes.len(),
        &digest[..12]
    );

    let classifier = state.classifier.clone();
    let prediction = tokio::task::spawn_blocking(move || classifier.classify(&upload.bytes))
        .await
        .map_err(|e| {
            error!("Classification task failed: {}", e);
            ApiError::InternalError("Internal error while classifying the image".to_string())
        })?
        .map_err(|e| {
            warn!("Classification of {} failed: {}", filename, e);
            ApiError::from(e)
        })?;

    info!(
        "🍇 Prediction for {}: label='{}', confidence={:.2}",
        filename, prediction.label, prediction.confidence
    );

    Ok(Json(prediction.into()))
}
