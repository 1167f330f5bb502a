// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use grapecheck_node::{
    api::{start_server, AppState},
    chat::{ChatService, InMemorySessionStore},
    cli::Cli,
    config::AppConfig,
    generation::{GeminiClient, GenerationClient, RetryPolicy, RetryingClient},
    version,
    vision::ClassificationPipeline,
};
use std::{env, sync::Arc};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    info!("🚀 Starting {}", version::get_version_string());
    info!("📦 BUILD VERSION: {}", version::VERSION);

    let mut config = AppConfig::from_env();
    cli.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    // Leaf classifier
    let classifier_config = config.classifier.clone();
    let classifier =
        tokio::task::spawn_blocking(move || ClassificationPipeline::from_config(&classifier_config))
            .await
            .context("Classifier loader task failed")??;
    if !classifier.is_available() {
        warn!("⚠️ /classify will answer 503 until the model is fixed and the node restarted");
    }

    // Generation client
    let generation: Option<Arc<dyn GenerationClient>> =
        match GeminiClient::from_config(&config.generation)? {
            Some(gemini) => {
                info!("✅ Gemini model {} configured", gemini.model_name());
                let policy = RetryPolicy::from_config(&config.generation);
                Some(Arc::new(RetryingClient::new(Arc::new(gemini), policy)))
            }
            None => {
                warn!("⚠️ GEMINI_API_KEY not set; /chat will answer 503");
                None
            }
        };

    let chat = ChatService::new(generation, Arc::new(InMemorySessionStore::new()));

    let state = AppState::new(classifier, chat)
        .with_session_cookie_name(config.server.session_cookie_name.clone())
        .with_max_upload_bytes(config.server.max_upload_bytes);

    let addr = config.server.socket_addr()?;
    start_server(state, addr).await?;

    info!("👋 Goodbye!");
    Ok(())
}
