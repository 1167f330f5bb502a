// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Class label set for the grape-leaf model
//!
//! The label order is a contract with the model artifact: index `i` of the
//! model's output vector means `labels[i]`. A wrong order still produces a
//! valid-looking answer, so the order is pinned and versioned here instead of
//! being guessed at runtime.

use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

/// Number of classes the leaf model emits
pub const LEAF_CLASS_COUNT: usize = 5;

/// Version tag of the built-in label order
pub const GRAPE_LEAF_V1: &str = "grape-leaf-v1";

/// Built-in label order (alphabetical, as exported with the model)
pub const GRAPE_LEAF_V1_LABELS: [&str; LEAF_CLASS_COUNT] =
    ["Busuk", "Esca", "Hawar", "Negative", "Sehat"];

const VERSION_PREFIX: &str = "# version:";

#[derive(Debug, Error)]
pub enum LabelSetError {
    #[error("Failed to read labels file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Labels file must start with a '# version: <tag>' line")]
    MissingVersion,

    #[error("Expected {expected} labels, found {actual}")]
    WrongCount { expected: usize, actual: usize },

    #[error("Duplicate label '{0}'")]
    Duplicate(String),
}

/// Ordered, versioned list of class labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelSet {
    version: String,
    labels: Vec<String>,
}

impl LabelSet {
    /// Build a label set, enforcing the class count and uniqueness
    pub fn new(version: impl Into<String>, labels: Vec<String>) -> Result<Self, LabelSetError> {
        if labels.len() != LEAF_CLASS_COUNT {
            return Err(LabelSetError::WrongCount {
                expected: LEAF_CLASS_COUNT,
                actual: labels.len(),
            });
        }

        let mut seen = HashSet::new();
        for label in &labels {
            if !seen.insert(label.as_str()) {
                return Err(LabelSetError::Duplicate(label.clone()));
            }
        }

        Ok(Self {
            version: version.into(),
            labels,
        })
    }

    /// The built-in `grape-leaf-v1` order
    pub fn grape_leaf_v1() -> Self {
        Self {
            version: GRAPE_LEAF_V1.to_string(),
            labels: GRAPE_LEAF_V1_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Parse a labels file
    ///
    /// Format: a `# version: <tag>` header, then one label per line in model
    /// output order. Blank lines and other `#` comments are ignored.
    pub fn parse(contents: &str) -> Result<Self, LabelSetError> {
        let mut lines = contents.lines().map(str::trim).filter(|l| !l.is_empty());

        let version = lines
            .next()
            .and_then(|l| l.strip_prefix(VERSION_PREFIX))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(LabelSetError::MissingVersion)?
            .to_string();

        let labels = lines
            .filter(|l| !l.starts_with('#'))
            .map(str::to_string)
            .collect();

        Self::new(version, labels)
    }

    /// Load a labels file from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LabelSetError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label at a model output index
    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }
}

impl Default for LabelSet {
    fn default() -> Self {
        Self::grape_leaf_v1()
    }
}
