// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::chat::{chat_handler, reset_handler};
use super::classify::classify_handler;
use super::handlers::{health_handler, labels_handler};
use crate::chat::ChatService;
use crate::config::{DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_SESSION_COOKIE};
use crate::vision::ClassificationPipeline;

/// Shared handles for every request
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<ClassificationPipeline>,
    pub chat: Arc<ChatService>,
    pub session_cookie_name: String,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(classifier: ClassificationPipeline, chat: ChatService) -> Self {
        Self {
            classifier: Arc::new(classifier),
            chat: Arc::new(chat),
            session_cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_session_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.session_cookie_name = name.into();
        self
    }

    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }
}

pub fn create_app(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;
    Router::new()
        .route("/health", get(health_handler))
        .route("/labels", get(labels_handler))
        .route("/classify", post(classify_handler))
        .route("/chat", post(chat_handler))
        .route("/chat/reset", post(reset_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(state: AppState, addr: SocketAddr) -> Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("🌐 GrapeCheck API listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("⏹️  Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
