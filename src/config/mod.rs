//! Benchmark Configuration
//!
//! Engine, benchmark, and scoring settings stored in TOML format.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// OCR engine settings
    pub engine: EngineSettings,
    /// Benchmark loop settings
    pub benchmark: BenchmarkSettings,
    /// Accuracy scoring settings
    pub scoring: ScoringSettings,
}

/// OCR engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Inference device selector, passed through to the engine backend
    pub device: String,
    /// Text detection model file
    pub detection_model: PathBuf,
    /// Text recognition model file
    pub recognition_model: PathBuf,
    /// Character dictionary for the recognition model
    pub recognition_keys: PathBuf,
    /// Minimum recognition confidence; lower-scoring regions are dropped
    pub recognition_min_score: f32,
    /// Document orientation classifier model (stage skipped if unset)
    pub doc_orientation_model: Option<PathBuf>,
    /// Document rectification model (stage skipped if unset)
    pub doc_rectification_model: Option<PathBuf>,
    /// Text line orientation classifier model (stage skipped if unset)
    pub textline_orientation_model: Option<PathBuf>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            device: "cpu".to_string(),
            detection_model: PathBuf::from("models/PP-OCRv5_server_det_infer.mnn"),
            recognition_model: PathBuf::from("models/PP-OCRv5_server_rec_infer.mnn"),
            recognition_keys: PathBuf::from("models/ppocr_keys_v5.txt"),
            recognition_min_score: 0.6,
            doc_orientation_model: None,
            doc_rectification_model: None,
            textline_orientation_model: None,
        }
    }
}

/// Benchmark loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkSettings {
    /// Inference repetitions per image; per-image latency is their average
    pub repetitions: u32,
    /// Directory for per-image result artifacts (JSON + annotated image)
    pub output_dir: PathBuf,
}

impl Default for BenchmarkSettings {
    fn default() -> Self {
        Self {
            repetitions: 3,
            output_dir: PathBuf::from("./output"),
        }
    }
}

/// Accuracy scoring settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    /// Whether to run the external accuracy scorer at all
    pub enabled: bool,
    /// Interpreter used to run the scoring script
    pub command: String,
    /// Scoring script path
    pub script: PathBuf,
    /// Ground-truth annotation file, keyed by image name
    pub ground_truth: PathBuf,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            command: "python".to_string(),
            script: PathBuf::from("scripts/calculate_acc.py"),
            ground_truth: PathBuf::from("images/labels.json"),
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
