// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Runtime configuration
//!
//! Values come from the environment (after `.env` is loaded); unparseable
//! numbers fall back to their defaults. CLI flags are applied on top in
//! `main`.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::vision::ScoreNormalization;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_SESSION_COOKIE: &str = "grapecheck_session";
pub const DEFAULT_MODEL_PATH: &str = "model/model.onnx";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub max_upload_bytes: usize,
    pub session_cookie_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            session_cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            listen_addr: non_empty(&lookup, "GRAPECHECK_LISTEN_ADDR")
                .unwrap_or(defaults.listen_addr),
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
            session_cookie_name: non_empty(&lookup, "SESSION_COOKIE_NAME")
                .unwrap_or(defaults.session_cookie_name),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.listen_addr
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid listen address '{}': {}", self.listen_addr, e))
    }

    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;
        if self.max_upload_bytes == 0 {
            bail!("MAX_UPLOAD_BYTES must be greater than zero");
        }
        if self.session_cookie_name.contains(|c: char| c.is_whitespace() || c == ';' || c == '=') {
            bail!("Invalid session cookie name '{}'", self.session_cookie_name);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub model_path: PathBuf,
    /// Alternative labels file; the built-in `grape-leaf-v1` order when unset
    pub labels_path: Option<PathBuf>,
    pub intra_threads: usize,
    pub normalization: ScoreNormalization,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            labels_path: None,
            intra_threads: 4,
            normalization: ScoreNormalization::Auto,
        }
    }
}

impl ClassifierConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            model_path: non_empty(&lookup, "CLASSIFIER_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            labels_path: non_empty(&lookup, "CLASSIFIER_LABELS_PATH").map(PathBuf::from),
            intra_threads: parse_or(&lookup, "CLASSIFIER_INTRA_THREADS", defaults.intra_threads),
            normalization: lookup("SCORE_NORMALIZATION")
                .and_then(|v| v.parse::<ScoreNormalization>().ok())
                .unwrap_or(defaults.normalization),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn validate(&self) -> Result<()> {
        if self.intra_threads == 0 {
            bail!("CLASSIFIER_INTRA_THREADS must be at least 1");
        }
        Ok(())
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub retry_base_delay_ms: u64,
    pub retry_max_delay_ms: u64,
}

impl std::fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .field("retry_base_delay_ms", &self.retry_base_delay_ms)
            .field("retry_max_delay_ms", &self.retry_max_delay_ms)
            .finish()
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout_secs: 30,
            max_attempts: 3,
            retry_base_delay_ms: 500,
            retry_max_delay_ms: 4000,
        }
    }
}

impl GenerationConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            api_key: non_empty(&lookup, "GEMINI_API_KEY"),
            model: non_empty(&lookup, "GEMINI_MODEL").unwrap_or(defaults.model),
            base_url: non_empty(&lookup, "GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            timeout_secs: parse_or(&lookup, "GEMINI_TIMEOUT_SECS", defaults.timeout_secs),
            max_attempts: parse_or(&lookup, "GEMINI_MAX_ATTEMPTS", defaults.max_attempts),
            retry_base_delay_ms: parse_or(
                &lookup,
                "GEMINI_RETRY_BASE_DELAY_MS",
                defaults.retry_base_delay_ms,
            ),
            retry_max_delay_ms: parse_or(
                &lookup,
                "GEMINI_RETRY_MAX_DELAY_MS",
                defaults.retry_max_delay_ms,
            ),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            bail!("GEMINI_TIMEOUT_SECS must be greater than zero");
        }
        if self.max_attempts == 0 {
            bail!("GEMINI_MAX_ATTEMPTS must be at least 1");
        }
        if self.retry_max_delay_ms < self.retry_base_delay_ms {
            bail!(
                "GEMINI_RETRY_MAX_DELAY_MS ({}) is below GEMINI_RETRY_BASE_DELAY_MS ({})",
                self.retry_max_delay_ms,
                self.retry_base_delay_ms
            );
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            bail!("GEMINI_BASE_URL must be an http(s) URL");
        }
        Ok(())
    }
}

/// Complete node configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub classifier: ClassifierConfig,
    pub generation: GenerationConfig,
}

impl AppConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            server: ServerConfig::from_lookup(&lookup),
            classifier: ClassifierConfig::from_lookup(&lookup),
            generation: GenerationConfig::from_lookup(&lookup),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.classifier.validate()?;
        self.generation.validate()?;
        Ok(())
    }
}
