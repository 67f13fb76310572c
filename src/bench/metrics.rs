//! Per-image metric extraction
//!
//! Character counting from the structured result and the derived throughput
//! figures.

use crate::engine::OcrOutput;

/// Outcome of accuracy scoring for one image.
///
/// The emitted record renders `Failed` and `Skipped` as 0.0, so downstream
/// consumers cannot tell a true zero score from a scoring failure; the
/// distinction only exists in-process.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Accuracy {
    /// The external scorer returned a value in [0, 1].
    Scored(f64),
    /// The external scorer failed to run or produced unusable output.
    Failed,
    /// Scoring was disabled for this run.
    Skipped,
}

impl Accuracy {
    pub fn value(self) -> f64 {
        match self {
            Accuracy::Scored(v) => v,
            Accuracy::Failed | Accuracy::Skipped => 0.0,
        }
    }
}

/// Finalized metrics for one successfully processed image.
#[derive(Debug, Clone)]
pub struct PerImageRecord {
    /// Image file name (basename, not full path)
    pub filename: String,
    /// Average inference latency over all repetitions, in milliseconds
    pub inference_ms: f64,
    /// Frames per second derived from the average latency
    pub fps: f64,
    /// Recognized characters per second
    pub chars_per_second: f64,
    /// Total recognized characters in the canonical run
    pub total_chars: usize,
    /// Accuracy scoring outcome
    pub accuracy: Accuracy,
}

/// Total characters across all recognized regions.
///
/// Counts directly from the in-memory structured result; transcripts are
/// counted by Unicode scalar value, not by byte.
pub fn char_count(output: &OcrOutput) -> usize {
    output.regions.iter().map(|r| r.text.chars().count()).sum()
}

/// Frames per second for the given average latency; 0 when the latency is
/// not positive, so a degenerate timing never yields inf/NaN.
pub fn fps(avg_ms: f64) -> f64 {
    if avg_ms > 0.0 {
        1000.0 / avg_ms
    } else {
        0.0
    }
}

/// Recognized characters per second, with the same zero-latency guard.
pub fn chars_per_second(total_chars: usize, avg_ms: f64) -> f64 {
    if avg_ms > 0.0 {
        total_chars as f64 * 1000.0 / avg_ms
    } else {
        0.0
    }
}

impl PerImageRecord {
    pub fn new(filename: String, avg_ms: f64, total_chars: usize, accuracy: Accuracy) -> Self {
        Self {
            filename,
            inference_ms: avg_ms,
            fps: fps(avg_ms),
            chars_per_second: chars_per_second(total_chars, avg_ms),
            total_chars,
            accuracy,
        }
    }

    /// Machine-parseable result line, emitted once per processed image.
    pub fn to_result_line(&self) -> String {
        let accuracy = match self.accuracy {
            Accuracy::Scored(v) => format!("{v:.4}"),
            Accuracy::Failed | Accuracy::Skipped => "0.0".to_string(),
        };
        format!(
            "PER_IMAGE_RESULT:{{\"filename\":\"{}\",\"inference_ms\":{:.2},\"fps\":{:.2},\"chars_per_second\":{:.2},\"total_chars\":{},\"accuracy\":{}}}",
            self.filename, self.inference_ms, self.fps, self.chars_per_second, self.total_chars, accuracy
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TextRegion;

    fn region(text: &str) -> TextRegion {
        TextRegion {
            text: text.to_string(),
            bounds: (0, 0, 1, 1),
            confidence: 1.0,
        }
    }

    #[test]
    fn test_char_count_sums_regions() {
        let output = OcrOutput {
            regions: vec![region("hello"), region("world!")],
        };
        assert_eq!(char_count(&output), 11);
    }

    #[test]
    fn test_char_count_counts_scalars_not_bytes() {
        let output = OcrOutput {
            regions: vec![region("中文识别")],
        };
        assert_eq!(char_count(&output), 4);
    }

    #[test]
    fn test_char_count_empty_output() {
        assert_eq!(char_count(&OcrOutput::default()), 0);
    }

    #[test]
    fn test_metric_derivation() {
        // avg 500 ms with 100 chars: 2 fps, 200 chars/s
        assert_eq!(fps(500.0), 2.0);
        assert_eq!(chars_per_second(100, 500.0), 200.0);
    }

    #[test]
    fn test_zero_latency_guard() {
        assert_eq!(fps(0.0), 0.0);
        assert_eq!(fps(-1.0), 0.0);
        assert_eq!(chars_per_second(100, 0.0), 0.0);
    }

    #[test]
    fn test_result_line_format() {
        let record = PerImageRecord::new("img_01.png".to_string(), 500.0, 100, Accuracy::Scored(0.9876));
        assert_eq!(
            record.to_result_line(),
            "PER_IMAGE_RESULT:{\"filename\":\"img_01.png\",\"inference_ms\":500.00,\"fps\":2.00,\"chars_per_second\":200.00,\"total_chars\":100,\"accuracy\":0.9876}"
        );
    }

    #[test]
    fn test_result_line_renders_failed_scoring_as_zero() {
        let record = PerImageRecord::new("img.png".to_string(), 100.0, 5, Accuracy::Failed);
        assert!(record.to_result_line().ends_with("\"accuracy\":0.0}"));
        assert_eq!(record.accuracy.value(), 0.0);
    }

    #[test]
    fn test_result_line_is_valid_json_after_prefix() {
        let record = PerImageRecord::new("a.jpg".to_string(), 123.456, 7, Accuracy::Scored(1.0));
        let line = record.to_result_line();
        let json = line.strip_prefix("PER_IMAGE_RESULT:").unwrap();
        let parsed: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(parsed["filename"], "a.jpg");
        assert_eq!(parsed["inference_ms"], 123.46);
        assert_eq!(parsed["total_chars"], 7);
    }
}
