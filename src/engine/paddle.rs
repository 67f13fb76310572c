//! PaddleOCR backend
//!
//! Production engine implementation backed by the `rust_paddle_ocr` binding
//! (PP-OCR detection + recognition models on the MNN runtime).

use anyhow::{Context, Result};
use rust_paddle_ocr::{Det, Rec};
use std::path::Path;
use tracing::{info, warn};

use super::{EngineError, OcrEngine, OcrOutput, TextRegion};
use crate::config::EngineSettings;

/// OCR engine using PaddleOCR models
pub struct PaddleEngine {
    det: Det,
    rec: Rec,
}

impl PaddleEngine {
    /// Load the detection and recognition models. One-time, expensive; done
    /// once per process and reused across the whole batch.
    pub fn new(settings: &EngineSettings) -> Result<Self> {
        info!("Initializing PaddleOCR engine");
        info!("  - Device: {}", settings.device);
        info!("  - Detection model: {}", settings.detection_model.display());
        info!("  - Recognition model: {}", settings.recognition_model.display());

        if !settings.device.eq_ignore_ascii_case("cpu") {
            warn!(
                "Device '{}' requested; the MNN backend runs on CPU",
                settings.device
            );
        }
        for (stage, model) in [
            ("doc orientation", &settings.doc_orientation_model),
            ("doc rectification", &settings.doc_rectification_model),
            ("textline orientation", &settings.textline_orientation_model),
        ] {
            if let Some(path) = model {
                warn!(
                    "{} model configured at {} but this backend does not run that stage",
                    stage,
                    path.display()
                );
            }
        }

        let det = Det::from_file(&settings.detection_model)
            .with_context(|| {
                format!(
                    "failed to load detection model from {}",
                    settings.detection_model.display()
                )
            })?
            // PP-OCRv5 recommended parameters
            .with_rect_border_size(12)
            .with_merge_boxes(false)
            .with_merge_threshold(1);

        let rec = Rec::from_file(&settings.recognition_model, &settings.recognition_keys)
            .with_context(|| {
                format!(
                    "failed to load recognition model from {}",
                    settings.recognition_model.display()
                )
            })?
            .with_min_score(settings.recognition_min_score)
            .with_punct_min_score(0.1);

        info!("PaddleOCR engine initialized");
        Ok(Self { det, rec })
    }
}

impl OcrEngine for PaddleEngine {
    fn predict(&mut self, path: &Path) -> Result<OcrOutput, EngineError> {
        let img = image::open(path).map_err(|source| EngineError::Image {
            path: path.to_path_buf(),
            source,
        })?;

        let rects = self
            .det
            .find_text_rect(&img)
            .map_err(|e| EngineError::Inference(e.to_string()))?;

        let mut regions = Vec::with_capacity(rects.len());
        for rect in rects {
            if rect.width == 0 || rect.height == 0 {
                continue;
            }
            let crop = img.crop_imm(rect.x, rect.y, rect.width, rect.height);
            let (text, confidence) = self
                .rec
                .predict_with_confidence(&crop)
                .map_err(|e| EngineError::Inference(e.to_string()))?;
            if text.is_empty() {
                continue;
            }
            regions.push(TextRegion {
                text,
                bounds: (rect.x, rect.y, rect.width, rect.height),
                confidence,
            });
        }

        Ok(OcrOutput { regions })
    }
}
