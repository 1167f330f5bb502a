// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod chat;
pub mod cli;
pub mod config;
pub mod generation;
pub mod version;
pub mod vision;

pub use api::{create_app, start_server, AppState};
pub use chat::{ChatService, InMemorySessionStore};
pub use config::AppConfig;
pub use vision::ClassificationPipeline;
