// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Classification pipeline built from configuration and label files

use grapecheck_node::config::ClassifierConfig;
use grapecheck_node::vision::{
    ClassificationEngine, ClassificationPipeline, ClassifyError, LabelSet, ScoreNormalization,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use ndarray::Array4;
use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::sync::Arc;

struct LogitEngine;

impl ClassificationEngine for LogitEngine {
    fn infer(&self, _input: &Array4<f32>) -> Result<Vec<f32>, ClassifyError> {
        Ok(vec![0.5, 3.0, -1.0, 2.9, 0.0])
    }

    fn name(&self) -> &str {
        "logits"
    }
}

fn png() -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, Rgb([90, 180, 60])));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
    buf
}

#[test]
fn test_custom_label_file_drives_output() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# version: grape-leaf-en").unwrap();
    for label in ["Black Rot", "Esca", "Leaf Blight", "Not a leaf", "Healthy"] {
        writeln!(file, "{}", label).unwrap();
    }

    let labels = LabelSet::from_file(file.path()).unwrap();
    let pipeline =
        ClassificationPipeline::new(Some(Arc::new(LogitEngine)), labels, ScoreNormalization::Auto);

    let prediction = pipeline.classify(&png()).unwrap();
    assert_eq!(prediction.label, "Esca");
    assert!(prediction.confidence > 0.0 && prediction.confidence < 1.0);
    assert_eq!(pipeline.status().label_set_version, "grape-leaf-en");
}

#[test]
fn test_config_with_labels_file_and_missing_model() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# version: grape-leaf-v1").unwrap();
    for label in ["Busuk", "Esca", "Hawar", "Negative", "Sehat"] {
        writeln!(file, "{}", label).unwrap();
    }

    let config = ClassifierConfig {
        model_path: PathBuf::from("/nonexistent/model.onnx"),
        labels_path: Some(file.path().to_path_buf()),
        ..ClassifierConfig::default()
    };

    let pipeline = ClassificationPipeline::from_config(&config).unwrap();
    assert!(!pipeline.is_available());
    assert!(matches!(
        pipeline.classify(&png()),
        Err(ClassifyError::ModelUnavailable)
    ));
}

#[test]
fn test_label_file_with_four_labels_is_fatal() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# version: short").unwrap();
    for label in ["Busuk", "Esca", "Hawar", "Sehat"] {
        writeln!(file, "{}", label).unwrap();
    }

    let config = ClassifierConfig {
        labels_path: Some(file.path().to_path_buf()),
        ..ClassifierConfig::default()
    };
    assert!(ClassificationPipeline::from_config(&config).is_err());
}

#[test]
#[ignore] // Requires the exported leaf model at model/model.onnx
fn test_real_model_end_to_end() {
    let config = ClassifierConfig::default();
    let pipeline = ClassificationPipeline::from_config(&config).unwrap();
    assert!(pipeline.is_available());

    let prediction = pipeline.classify(&png()).unwrap();
    assert!(LabelSet::grape_leaf_v1()
        .labels()
        .contains(&prediction.label));
    assert!((0.0..=1.0).contains(&prediction.confidence));
}
