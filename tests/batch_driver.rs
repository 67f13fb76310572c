//! Integration tests for the batch benchmark driver, using deterministic
//! in-memory fakes for the engine and the accuracy scorer.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use tempfile::tempdir;

use ocr_bench::bench::{run_batch, BenchmarkOptions};
use ocr_bench::engine::{EngineError, OcrEngine, OcrOutput, TextRegion};
use ocr_bench::scoring::AccuracyScorer;

/// Engine fake: returns configured text per image stem, fails on chosen
/// stems, and counts predict calls per image.
struct FakeEngine {
    texts: HashMap<String, String>,
    fail_stems: HashSet<String>,
    calls: HashMap<String, u32>,
}

impl FakeEngine {
    fn new() -> Self {
        Self {
            texts: HashMap::new(),
            fail_stems: HashSet::new(),
            calls: HashMap::new(),
        }
    }

    fn with_text(mut self, stem: &str, text: &str) -> Self {
        self.texts.insert(stem.to_string(), text.to_string());
        self
    }

    fn failing_on(mut self, stem: &str) -> Self {
        self.fail_stems.insert(stem.to_string());
        self
    }
}

impl OcrEngine for FakeEngine {
    fn predict(&mut self, path: &Path) -> Result<OcrOutput, EngineError> {
        let stem = path.file_stem().unwrap().to_string_lossy().into_owned();
        *self.calls.entry(stem.clone()).or_insert(0) += 1;

        if self.fail_stems.contains(&stem) {
            return Err(EngineError::Inference(format!("injected failure for {stem}")));
        }

        let text = self
            .texts
            .get(&stem)
            .cloned()
            .unwrap_or_else(|| "sample text".to_string());
        Ok(OcrOutput {
            regions: vec![TextRegion {
                text,
                bounds: (0, 0, 8, 8),
                confidence: 0.99,
            }],
        })
    }
}

/// Scorer fake: returns a fixed score per file name, errors when the name
/// has no ground truth entry.
struct FakeScorer {
    scores: HashMap<String, f64>,
}

impl FakeScorer {
    fn new(entries: &[(&str, f64)]) -> Self {
        Self {
            scores: entries
                .iter()
                .map(|(name, score)| (name.to_string(), *score))
                .collect(),
        }
    }
}

impl AccuracyScorer for FakeScorer {
    fn score(&self, image_name: &str) -> Result<f64> {
        self.scores
            .get(image_name)
            .copied()
            .ok_or_else(|| anyhow!("no ground truth entry for {image_name}"))
    }
}

/// Create real (tiny) image files so the annotated-output path can read them.
fn make_images(dir: &Path, stems: &[&str]) -> Vec<PathBuf> {
    stems
        .iter()
        .map(|stem| {
            let path = dir.join(format!("{stem}.png"));
            image::RgbImage::new(16, 16).save(&path).unwrap();
            path
        })
        .collect()
}

fn options(output_dir: PathBuf) -> BenchmarkOptions {
    BenchmarkOptions {
        repetitions: 3,
        output_dir,
        init_ms: 7,
    }
}

fn result_lines(out: &[u8]) -> Vec<String> {
    String::from_utf8(out.to_vec())
        .unwrap()
        .lines()
        .filter(|l| l.starts_with("PER_IMAGE_RESULT:"))
        .map(|l| l.to_string())
        .collect()
}

#[test]
fn every_image_runs_exactly_repetitions_times() {
    let dir = tempdir().unwrap();
    let images = make_images(dir.path(), &["a", "b"]);
    let mut engine = FakeEngine::new();
    let scorer = FakeScorer::new(&[("a.png", 1.0), ("b.png", 1.0)]);

    let mut out = Vec::new();
    run_batch(
        &mut engine,
        Some(&scorer),
        &images,
        &options(dir.path().join("output")),
        &mut out,
    )
    .unwrap();

    assert_eq!(engine.calls["a"], 3);
    assert_eq!(engine.calls["b"], 3);
}

#[test]
fn failed_image_is_isolated_and_order_is_preserved() {
    let dir = tempdir().unwrap();
    let images = make_images(dir.path(), &["img1", "img2", "img3", "img4", "img5"]);
    let mut engine = FakeEngine::new().failing_on("img3");
    let scorer = FakeScorer::new(&[
        ("img1.png", 0.9),
        ("img2.png", 0.9),
        ("img3.png", 0.9),
        ("img4.png", 0.9),
        ("img5.png", 0.9),
    ]);

    let mut out = Vec::new();
    let summary = run_batch(
        &mut engine,
        Some(&scorer),
        &images,
        &options(dir.path().join("output")),
        &mut out,
    )
    .unwrap();

    assert_eq!(summary.attempted, 5);
    assert_eq!(summary.succeeded, 4);
    assert_eq!(summary.failed, 1);

    let lines = result_lines(&out);
    assert_eq!(lines.len(), 4);
    for (line, expected) in lines.iter().zip(["img1.png", "img2.png", "img4.png", "img5.png"]) {
        assert!(
            line.contains(&format!("\"filename\":\"{expected}\"")),
            "unexpected line order: {line}"
        );
    }

    // The failing image stopped at its first repetition.
    assert_eq!(engine.calls["img3"], 1);
}

#[test]
fn scoring_failure_degrades_to_zero_accuracy() {
    let dir = tempdir().unwrap();
    let images = make_images(dir.path(), &["scored", "unscored", "after"]);
    let mut engine = FakeEngine::new();
    // "unscored.png" has no ground truth entry, so the scorer errors.
    let scorer = FakeScorer::new(&[("scored.png", 0.75), ("after.png", 0.5)]);

    let mut out = Vec::new();
    let summary = run_batch(
        &mut engine,
        Some(&scorer),
        &images,
        &options(dir.path().join("output")),
        &mut out,
    )
    .unwrap();

    // A scoring failure does not fail the image.
    assert_eq!(summary.succeeded, 3);
    assert_eq!(summary.failed, 0);

    let lines = result_lines(&out);
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("\"accuracy\":0.7500"));
    assert!(lines[1].contains("\"accuracy\":0.0"));
    assert!(lines[2].contains("\"accuracy\":0.5000"));

    // Performance fields are still present on the degraded record.
    assert!(lines[1].contains("\"inference_ms\":"));
    assert!(lines[1].contains("\"total_chars\":11"));
}

#[test]
fn two_image_end_to_end_report() {
    let dir = tempdir().unwrap();
    let images = make_images(dir.path(), &["exact", "miss"]);
    let mut engine = FakeEngine::new()
        .with_text("exact", "hello world")
        .with_text("miss", "zzzzz");
    let scorer = FakeScorer::new(&[("exact.png", 1.0), ("miss.png", 0.0)]);

    let mut out = Vec::new();
    let summary = run_batch(
        &mut engine,
        Some(&scorer),
        &images,
        &options(dir.path().join("output")),
        &mut out,
    )
    .unwrap();

    assert_eq!(summary.attempted, 2);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.success_rate, 100.0);

    let text = String::from_utf8(out).unwrap();
    let lines = result_lines(text.as_bytes());
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("\"filename\":\"exact.png\""));
    assert!(lines[0].contains("\"accuracy\":1.0000"));
    assert!(lines[1].contains("\"filename\":\"miss.png\""));
    assert!(lines[1].contains("\"accuracy\":0.0000"));

    assert!(text.contains("TIMING_INFO:INIT:7ms"));
    assert!(text.contains("TIMING_INFO:SUCCESS_RATE:100.0%"));
}

#[test]
fn disabled_scoring_renders_zero_accuracy() {
    let dir = tempdir().unwrap();
    let images = make_images(dir.path(), &["solo"]);
    let mut engine = FakeEngine::new();

    let mut out = Vec::new();
    run_batch(
        &mut engine,
        None,
        &images,
        &options(dir.path().join("output")),
        &mut out,
    )
    .unwrap();

    let lines = result_lines(&out);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("\"accuracy\":0.0"));
}

#[test]
fn result_artifacts_are_written_for_the_scorer() {
    let dir = tempdir().unwrap();
    let images = make_images(dir.path(), &["artifact"]);
    let mut engine = FakeEngine::new().with_text("artifact", "printed page");
    let output_dir = dir.path().join("output");

    let mut out = Vec::new();
    run_batch(&mut engine, None, &images, &options(output_dir.clone()), &mut out).unwrap();

    let json = std::fs::read_to_string(output_dir.join("artifact.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["rec_texts"][0], "printed page");
    assert!(output_dir.join("artifact.png").exists());
}

#[test]
fn all_images_failing_yields_empty_report_body() {
    let dir = tempdir().unwrap();
    let images = make_images(dir.path(), &["x", "y"]);
    let mut engine = FakeEngine::new().failing_on("x").failing_on("y");

    let mut out = Vec::new();
    let summary = run_batch(
        &mut engine,
        None,
        &images,
        &options(dir.path().join("output")),
        &mut out,
    )
    .unwrap();

    assert_eq!(summary.succeeded, 0);
    assert_eq!(summary.failed, 2);
    // No records and no summary block; stdout stays empty.
    assert!(out.is_empty());
}
