// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Score normalization and label resolution

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::errors::ClassifyError;
use super::labels::LabelSet;

/// Tolerance when deciding whether scores already sum to one
pub const DISTRIBUTION_TOLERANCE: f32 = 1e-3;

/// How raw model scores are turned into probabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreNormalization {
    /// Softmax only when the scores are not already a distribution
    #[default]
    Auto,
    /// Always apply softmax (model is known to emit logits)
    Softmax,
}

impl FromStr for ScoreNormalization {
    type Err = String;

    /// Case-insensitive; surrounding whitespace is ignored
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "softmax" => Ok(Self::Softmax),
            other => Err(format!(
                "unknown score normalization '{}' (expected auto or softmax)",
                other
            )),
        }
    }
}

impl ScoreNormalization {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Softmax => "softmax",
        }
    }
}

/// A resolved prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Human-readable class label
    pub label: String,
    /// Probability of the chosen class (0.0-1.0)
    pub confidence: f32,
    /// Output index the label was resolved from
    #[serde(skip)]
    pub class_index: usize,
}

/// Whether scores already form a probability distribution
pub fn is_probability_distribution(scores: &[f32]) -> bool {
    if scores.is_empty() || !scores.iter().all(|s| (0.0..=1.0).contains(s)) {
        return false;
    }
    let sum: f32 = scores.iter().sum();
    (sum - 1.0).abs() <= DISTRIBUTION_TOLERANCE
}

/// Numerically stable softmax
pub fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Index of the largest score; ties go to the first index
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &s) in scores.iter().enumerate() {
        match best {
            Some((_, b)) if s <= b => {}
            _ => best = Some((i, s)),
        }
    }
    best.map(|(i, _)| i)
}

/// Map a raw score vector to a labeled, confidence-scored prediction
pub fn resolve_prediction(
    scores: &[f32],
    labels: &LabelSet,
    normalization: ScoreNormalization,
) -> Result<Prediction, ClassifyError> {
    if scores.len() != labels.len() {
        return Err(ClassifyError::ShapeMismatch {
            expected: vec![labels.len()],
            actual: vec![scores.len()],
        });
    }
    if let Some(bad) = scores.iter().find(|s| !s.is_finite()) {
        return Err(ClassifyError::InvalidOutput(format!(
            "non-finite score {}",
            bad
        )));
    }

    let probabilities = match normalization {
        ScoreNormalization::Auto if is_probability_distribution(scores) => scores.to_vec(),
        _ => softmax(scores),
    };

    let class_index = argmax(&probabilities)
        .ok_or_else(|| ClassifyError::InvalidOutput("empty score vector".to_string()))?;

    let label = labels
        .get(class_index)
        .ok_or_else(|| ClassifyError::InvalidOutput(format!("no label for index {}", class_index)))?
        .to_string();

    Ok(Prediction {
        label,
        confidence: probabilities[class_index].clamp(0.0, 1.0),
        class_index,
    })
}
