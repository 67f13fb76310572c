//! Accuracy Scoring
//!
//! Delegates character-level accuracy computation to an external scoring
//! script through a line-oriented subprocess contract: the script receives
//! the ground-truth path, the output directory holding the serialized result,
//! and the image name, and answers with a single `SINGLE_ACC:` marker line
//! carrying a JSON payload.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::config::ScoringSettings;

/// Marker prefixing the scorer's structured response line.
pub const ACC_MARKER: &str = "SINGLE_ACC:";

/// Scores one image's recognized text against ground truth.
///
/// The production implementation crosses a process boundary; tests use a
/// deterministic in-memory fake.
pub trait AccuracyScorer {
    /// Character-level accuracy in [0, 1] for the named image.
    fn score(&self, image_name: &str) -> Result<f64>;
}

#[derive(Debug, Deserialize)]
struct AccPayload {
    character_accuracy: f64,
}

/// Production scorer: runs the external scoring script per image.
pub struct ScriptScorer {
    command: String,
    script: PathBuf,
    ground_truth: PathBuf,
    output_dir: PathBuf,
}

impl ScriptScorer {
    pub fn new(settings: &ScoringSettings, output_dir: &Path) -> Self {
        Self {
            command: settings.command.clone(),
            script: settings.script.clone(),
            ground_truth: settings.ground_truth.clone(),
            output_dir: output_dir.to_path_buf(),
        }
    }
}

impl AccuracyScorer for ScriptScorer {
    fn score(&self, image_name: &str) -> Result<f64> {
        debug!("Scoring {} via {}", image_name, self.script.display());

        let output = Command::new(&self.command)
            .arg(&self.script)
            .arg("--ground_truth")
            .arg(&self.ground_truth)
            .arg("--output_dir")
            .arg(&self.output_dir)
            .arg("--image_name")
            .arg(image_name)
            .output()
            .with_context(|| format!("failed to run scorer command '{}'", self.command))?;

        // The marker line may land on either stream.
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            bail!("scorer exited with {}: {}", output.status, text.trim());
        }

        parse_accuracy(&text)
    }
}

/// Extract the accuracy value from the scorer's combined output.
pub fn parse_accuracy(output: &str) -> Result<f64> {
    for line in output.lines() {
        if let Some(payload) = line.strip_prefix(ACC_MARKER) {
            let payload: AccPayload = serde_json::from_str(payload.trim())
                .context("malformed accuracy payload")?;
            return Ok(payload.character_accuracy.clamp(0.0, 1.0));
        }
    }
    bail!("no '{ACC_MARKER}' marker in scorer output");
}
