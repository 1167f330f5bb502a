// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ONNX grape-leaf classification model
//!
//! Wraps an ONNX Runtime session for the leaf model (an ONNX export of the
//! TFLite release). Input is NHWC `[1, 224, 224, 3]` float32 in
//! [0, 1]; output is a 5-wide score vector.

use anyhow::{Context, Result};
use ndarray::Array4;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::errors::ClassifyError;
use super::labels::LEAF_CLASS_COUNT;
use super::preprocessing::{check_input_shape, LEAF_INPUT_SHAPE};

/// Anything that can turn a preprocessed leaf tensor into raw class scores
///
/// Implementations must be deterministic and safe to call from several
/// threads at once.
pub trait ClassificationEngine: Send + Sync {
    /// Input signature the engine accepts
    fn input_shape(&self) -> [usize; 4] {
        LEAF_INPUT_SHAPE
    }

    /// Run one forward pass and return the flattened output scores
    fn infer(&self, input: &Array4<f32>) -> Result<Vec<f32>, ClassifyError>;

    /// Short name for logs and health output
    fn name(&self) -> &str;
}

/// ONNX Runtime backed leaf classifier (CPU only)
#[derive(Clone)]
pub struct OnnxLeafClassifier {
    /// ONNX Runtime session; one exclusive lock around set-input/run/read-output
    session: Arc<Mutex<Session>>,
    /// Model input name
    input_name: String,
    /// Model file name, for logs
    model_name: String,
}

impl std::fmt::Debug for OnnxLeafClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxLeafClassifier")
            .field("input_name", &self.input_name)
            .field("model_name", &self.model_name)
            .finish_non_exhaustive()
    }
}

impl OnnxLeafClassifier {
    /// Load the leaf model from an ONNX file
    ///
    /// The session is exercised once with a blank `[1, 224, 224, 3]` f32
    /// tensor; ONNX Runtime rejects inputs that disagree with the declared
    /// signature, so a model exported with another layout, size or dtype
    /// fails here instead of on the first upload.
    ///
    /// # Errors
    /// Returns error if:
    /// - Model file not found
    /// - ONNX Runtime initialization fails
    /// - The declared input is not `[1, 224, 224, 3]` f32
    /// - The output is not a 5-wide score vector
    pub fn load<P: AsRef<Path>>(model_path: P, intra_threads: usize) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("Leaf model not found: {}", model_path.display());
        }

        info!("Loading leaf classifier from {}", model_path.display());

        let mut session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(intra_threads)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load leaf model from {}",
                model_path.display()
            ))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .context("Leaf model declares no inputs")?;

        if let Some(input) = session.inputs.first() {
            debug!("Leaf model input {}: {:?}", input_name, input.input_type);
        }
        if let Some(output) = session.outputs.first() {
            debug!("Leaf model output {}: {:?}", output.name, output.output_type);
        }

        let model_name = model_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "leaf-model".to_string());

        let blank = Array4::<f32>::zeros(LEAF_INPUT_SHAPE);
        let scores = run_session(&mut session, &input_name, &blank).with_context(|| {
            format!(
                "Leaf model {} does not accept a {:?} f32 input",
                model_name, LEAF_INPUT_SHAPE
            )
        })?;
        check_output_width(scores.len())
            .context("Leaf model output does not match the label set")?;

        info!("✅ Leaf classifier loaded ({})", model_name);

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            model_name,
        })
    }
}

impl ClassificationEngine for OnnxLeafClassifier {
    fn infer(&self, input: &Array4<f32>) -> Result<Vec<f32>, ClassifyError> {
        check_input_shape(input, self.input_shape())?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| ClassifyError::Inference("session lock poisoned".to_string()))?;

        run_session(&mut session, &self.input_name, input)
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}

/// One set-input/run/read-output sequence on an exclusively held session
fn run_session(
    session: &mut Session,
    input_name: &str,
    input: &Array4<f32>,
) -> Result<Vec<f32>, ClassifyError> {
    let input_value = Value::from_array(input.to_owned())
        .map_err(|e| ClassifyError::Inference(format!("failed to create input tensor: {}", e)))?;

    let outputs = session
        .run(ort::inputs![input_name => input_value])
        .map_err(|e| ClassifyError::Inference(e.to_string()))?;

    let output_tensor = outputs[0]
        .try_extract_array::<f32>()
        .map_err(|e| ClassifyError::Inference(format!("failed to extract output: {}", e)))?;

    debug!("Leaf model output shape: {:?}", output_tensor.shape());

    Ok(output_tensor.iter().copied().collect())
}

/// The model must emit one score per leaf class
fn check_output_width(width: usize) -> Result<(), ClassifyError> {
    if width != LEAF_CLASS_COUNT {
        return Err(ClassifyError::ShapeMismatch {
            expected: vec![LEAF_CLASS_COUNT],
            actual: vec![width],
        });
    }
    Ok(())
}
