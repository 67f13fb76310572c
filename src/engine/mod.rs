//! OCR Engine Layer
//!
//! Wraps the pre-trained text detection/recognition models behind a narrow
//! interface so the benchmark driver never touches inference internals.
//! The production backend is PaddleOCR (PP-OCR detection + recognition
//! models); test code substitutes deterministic fakes.

pub mod paddle;

pub use paddle::PaddleEngine;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Detected text region from OCR
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRegion {
    /// Recognized text content
    pub text: String,
    /// Bounding box (x, y, width, height)
    pub bounds: (u32, u32, u32, u32),
    /// Recognition confidence (0.0 - 1.0)
    pub confidence: f32,
}

/// Structured result of one inference call on one image: the ordered
/// sequence of recognized text regions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrOutput {
    pub regions: Vec<TextRegion>,
}

/// Errors produced by a prediction call
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to read image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("inference failed: {0}")]
    Inference(String),
}

/// A text detection/recognition engine.
///
/// Initialization is backend-specific, one-time, and expensive; `predict` is
/// called once per timed run. Implementations are not required to support
/// concurrent invocation.
pub trait OcrEngine {
    /// Run detection + recognition on the image at `path`.
    fn predict(&mut self, path: &Path) -> Result<OcrOutput, EngineError>;
}
