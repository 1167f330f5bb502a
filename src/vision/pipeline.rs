// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Classification pipeline: bytes in, labeled prediction out
//!
//! The engine handle is injected and has an explicit lifecycle: either a
//! loaded engine or `None`, in which case every call fails with
//! `ModelUnavailable` until the process restarts.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use super::classifier::{ClassificationEngine, OnnxLeafClassifier};
use super::errors::ClassifyError;
use super::labels::LabelSet;
use super::postprocessing::{resolve_prediction, Prediction, ScoreNormalization};
use super::preprocessing::preprocess_bytes;
use crate::config::ClassifierConfig;

/// Availability summary for health checks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierStatus {
    pub loaded: bool,
    pub engine: Option<String>,
    pub label_set_version: String,
    pub normalization: ScoreNormalization,
}

#[derive(Clone)]
pub struct ClassificationPipeline {
    engine: Option<Arc<dyn ClassificationEngine>>,
    labels: LabelSet,
    normalization: ScoreNormalization,
}

impl std::fmt::Debug for ClassificationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassificationPipeline")
            .field("engine", &self.engine.as_ref().map(|e| e.name().to_string()))
            .field("labels", &self.labels)
            .field("normalization", &self.normalization)
            .finish()
    }
}

impl ClassificationPipeline {
    pub fn new(
        engine: Option<Arc<dyn ClassificationEngine>>,
        labels: LabelSet,
        normalization: ScoreNormalization,
    ) -> Self {
        Self {
            engine,
            labels,
            normalization,
        }
    }

    /// A pipeline whose model never loaded
    pub fn unavailable(labels: LabelSet) -> Self {
        Self::new(None, labels, ScoreNormalization::default())
    }

    /// Build the pipeline from configuration
    ///
    /// A bad labels file is fatal (the label contract cannot be honored).
    /// A missing or broken model is not: the pipeline starts in the
    /// unavailable state and the rest of the service keeps running.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        let labels = match &config.labels_path {
            Some(path) => LabelSet::from_file(path)
                .with_context(|| format!("Failed to load labels from {}", path.display()))?,
            None => LabelSet::grape_leaf_v1(),
        };
        info!(
            "Leaf label set {} ({} classes): {:?}",
            labels.version(),
            labels.len(),
            labels.labels()
        );

        let engine = match OnnxLeafClassifier::load(&config.model_path, config.intra_threads) {
            Ok(model) => Some(Arc::new(model) as Arc<dyn ClassificationEngine>),
            Err(e) => {
                warn!(
                    "⚠️ Leaf classifier unavailable ({}): {:#}",
                    config.model_path.display(),
                    e
                );
                None
            }
        };

        Ok(Self::new(engine, labels, config.normalization))
    }

    pub fn is_available(&self) -> bool {
        self.engine.is_some()
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn status(&self) -> ClassifierStatus {
        ClassifierStatus {
            loaded: self.is_available(),
            engine: self.engine.as_ref().map(|e| e.name().to_string()),
            label_set_version: self.labels.version().to_string(),
            normalization: self.normalization,
        }
    }

    /// Classify raw image bytes
    ///
    /// Blocking (runs the model); call from a blocking-capable context.
    pub fn classify(&self, image: &[u8]) -> Result<Prediction, ClassifyError> {
        let engine = self.engine.as_ref().ok_or(ClassifyError::ModelUnavailable)?;

        let tensor = preprocess_bytes(image)?;
        let scores = engine.infer(&tensor)?;

        resolve_prediction(&scores, &self.labels, self.normalization)
    }
}
