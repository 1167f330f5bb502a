// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::http_server::AppState;
use crate::version::{get_version_info, VERSION_NUMBER};
use crate::vision::ClassifierStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// "ok" when both pipelines can serve, "degraded" otherwise
    pub status: String,
    pub classifier_loaded: bool,
    pub generation_configured: bool,
    pub label_set_version: String,
    pub version: String,
    /// Engine name and score normalization in use
    pub classifier: ClassifierStatus,
    /// Build tag, date and feature list
    pub build: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelsResponse {
    pub version: String,
    pub labels: Vec<String>,
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let classifier = state.classifier.status();
    let generation_configured = state.chat.is_available();

    Json(HealthResponse {
        status: if classifier.loaded && generation_configured {
            "ok"
        } else {
            "degraded"
        }
        .to_string(),
        classifier_loaded: classifier.loaded,
        generation_configured,
        label_set_version: classifier.label_set_version.clone(),
        version: VERSION_NUMBER.to_string(),
        classifier,
        build: get_version_info(),
    })
}

/// GET /labels - the active label order, index-aligned with the model output
pub async fn labels_handler(State(state): State<AppState>) -> Json<LabelsResponse> {
    let labels = state.classifier.labels();
    Json(LabelsResponse {
        version: labels.version().to_string(),
        labels: labels.labels().to_vec(),
    })
}
