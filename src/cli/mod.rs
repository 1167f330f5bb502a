// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use clap::Parser;
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::vision::ScoreNormalization;

#[derive(Parser, Debug, Default)]
#[command(name = "grapecheck-node")]
#[command(version)]
#[command(about = "Grape-leaf disease classifier and grape-care chat assistant", long_about = None)]
pub struct Cli {
    /// Address to listen on (overrides GRAPECHECK_LISTEN_ADDR)
    #[arg(long)]
    pub listen_addr: Option<String>,

    /// Path to the ONNX leaf model (overrides CLASSIFIER_MODEL_PATH)
    #[arg(long)]
    pub model_path: Option<PathBuf>,

    /// Labels file with a `# version:` header (overrides CLASSIFIER_LABELS_PATH)
    #[arg(long)]
    pub labels_path: Option<PathBuf>,

    /// Score normalization: auto or softmax (overrides SCORE_NORMALIZATION)
    #[arg(long, value_parser = parse_normalization)]
    pub normalization: Option<ScoreNormalization>,
}

impl Cli {
    /// Apply command-line overrides on top of the environment configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(addr) = &self.listen_addr {
            config.server.listen_addr = addr.clone();
        }
        if let Some(path) = &self.model_path {
            config.classifier.model_path = path.clone();
        }
        if let Some(path) = &self.labels_path {
            config.classifier.labels_path = Some(path.clone());
        }
        if let Some(mode) = self.normalization {
            config.classifier.normalization = mode;
        }
    }
}

fn parse_normalization(value: &str) -> Result<ScoreNormalization, String> {
    value.parse()
}
