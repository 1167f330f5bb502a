// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat endpoint handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};

use super::request::ChatRequest;
use super::response::{ChatResponse, ResetResponse};
use super::session::{ensure_session, session_id};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;

/// POST /chat - Ask the grape-care assistant
///
/// # Request
/// - JSON `{"prompt": string}`; the session comes from the session cookie
///
/// # Response
/// - `response`: Markdown reply
///
/// # Errors
/// - 400 Bad Request: body is not JSON, lacks `prompt`, or the prompt is blank
/// - 503 Service Unavailable: no generation API key configured
/// - 502 Bad Gateway: the generation API failed after retries
pub async fn chat_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<(CookieJar, Json<ChatResponse>), ApiError> {
    if !state.chat.is_available() {
        warn!("Chat requested but no generation client is configured");
        return Err(ApiError::ModelUnavailable(
            "Chat model is not available".to_string(),
        ));
    }

    let Json(body) = body.map_err(|e| {
        debug!("Rejected chat body: {}", e);
        ApiError::InvalidRequest("Invalid request: body must be JSON".to_string())
    })?;
    let request = ChatRequest::from_value(&body)?;

    let (jar, session) = ensure_session(jar, &state.session_cookie_name);
    let response = state.chat.chat(&session, &request.prompt).await?;

    Ok((jar, Json(ChatResponse { response })))
}

/// POST /chat/reset - Clear this session's conversation history
///
/// Always acknowledged, even when the session has no history.
pub async fn reset_handler(State(state): State<AppState>, jar: CookieJar) -> Json<ResetResponse> {
    if let Some(session) = session_id(&jar, &state.session_cookie_name) {
        state.chat.reset(&session).await;
    }
    Json(ResetResponse::ok())
}
