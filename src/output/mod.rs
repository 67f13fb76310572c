//! Result Artifacts
//!
//! Writes the per-image artifacts consumed by the accuracy scorer and by
//! human review: a PaddleOCR-shaped JSON result file and an annotated copy
//! of the source image, both named by the image stem.

use anyhow::{Context, Result};
use image::Rgb;
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::engine::OcrOutput;

/// Serialized result layout, mirroring the PaddleOCR JSON field names the
/// scoring script expects.
#[derive(Serialize)]
struct ResultFile<'a> {
    rec_texts: Vec<&'a str>,
    rec_scores: Vec<f32>,
    rec_boxes: Vec<[u32; 4]>,
}

/// Write the structured result as `<stem>.json` under `output_dir`.
pub fn save_json(output_dir: &Path, stem: &str, output: &OcrOutput) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir {}", output_dir.display()))?;

    let result = ResultFile {
        rec_texts: output.regions.iter().map(|r| r.text.as_str()).collect(),
        rec_scores: output.regions.iter().map(|r| r.confidence).collect(),
        rec_boxes: output
            .regions
            .iter()
            .map(|r| [r.bounds.0, r.bounds.1, r.bounds.2, r.bounds.3])
            .collect(),
    };

    let path = output_dir.join(format!("{stem}.json"));
    let content = serde_json::to_string_pretty(&result)?;
    fs::write(&path, content)
        .with_context(|| format!("failed to write {}", path.display()))?;
    debug!("Saved result JSON to {}", path.display());
    Ok(path)
}

/// Write a copy of the source image with each recognized region outlined,
/// as `<stem>.png` under `output_dir`.
pub fn save_annotated(
    output_dir: &Path,
    stem: &str,
    image_path: &Path,
    output: &OcrOutput,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir {}", output_dir.display()))?;

    let mut img = image::open(image_path)
        .with_context(|| format!("failed to open {}", image_path.display()))?
        .to_rgb8();

    for region in &output.regions {
        let (x, y, w, h) = region.bounds;
        if w == 0 || h == 0 {
            continue;
        }
        draw_hollow_rect_mut(
            &mut img,
            Rect::at(x as i32, y as i32).of_size(w, h),
            Rgb([255, 0, 0]),
        );
    }

    let path = output_dir.join(format!("{stem}.png"));
    img.save(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    debug!("Saved annotated image to {}", path.display());
    Ok(path)
}
