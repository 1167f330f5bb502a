// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod chat;
pub mod classify;
pub mod errors;
pub mod handlers;
pub mod http_server;

pub use chat::{chat_handler, reset_handler, ChatRequest, ChatResponse, ResetResponse};
pub use classify::{classify_handler, ClassifyResponse};
pub use errors::{ApiError, ErrorCategory, ErrorResponse};
pub use handlers::{health_handler, labels_handler, HealthResponse, LabelsResponse};
pub use http_server::{create_app, start_server, AppState};
