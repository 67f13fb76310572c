//! Benchmark Driver
//!
//! Sequential batch pipeline over the discovered images: timed repeated
//! inference, metric extraction, artifact output, accuracy scoring, and
//! incremental reporting. Processing is strictly single-threaded; records
//! are emitted in discovery order.

pub mod metrics;
pub mod report;
pub mod timing;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use tracing::{error, info};

use crate::engine::OcrEngine;
use crate::output;
use crate::scoring::AccuracyScorer;
use metrics::{char_count, Accuracy, PerImageRecord};
use report::{BatchSummary, Reporter};

/// Driver options for one batch run.
#[derive(Debug, Clone)]
pub struct BenchmarkOptions {
    /// Inference repetitions per image
    pub repetitions: u32,
    /// Directory receiving per-image artifacts
    pub output_dir: PathBuf,
    /// Engine initialization time, reported in the summary
    pub init_ms: u128,
}

/// Run the batch over every discovered image.
///
/// Inference failures are contained per image: the image is counted as
/// failed and the loop continues. Scoring failures degrade to an
/// accuracy of 0.0 without failing the image. Only the caller decides
/// process-level exit status from the returned summary.
pub fn run_batch<W: Write>(
    engine: &mut dyn OcrEngine,
    scorer: Option<&dyn AccuracyScorer>,
    images: &[PathBuf],
    options: &BenchmarkOptions,
    out: W,
) -> Result<BatchSummary> {
    let mut reporter = Reporter::new(out);
    let mut failed = 0usize;
    let total = images.len();
    let batch_start = Instant::now();

    info!("Starting batch processing of {} image(s)", total);

    for (index, image) in images.iter().enumerate() {
        info!("[{}/{}] Processing {}", index + 1, total, image.display());

        let run = match timing::timed_process(engine, image, options.repetitions) {
            Ok(run) => run,
            Err(e) => {
                failed += 1;
                error!("Failed to process {}: {}", image.display(), e);
                error!("Continuing with next image");
                continue;
            }
        };

        let total_chars = char_count(&run.output);
        info!(
            "  avg inference {:.2} ms, {} chars, {} region(s)",
            run.avg_ms,
            total_chars,
            run.output.regions.len()
        );

        let filename = file_name(image);
        let stem = file_stem(image);

        // Artifacts must exist before the scorer runs; failures here degrade
        // rather than fail the image.
        if let Err(e) = output::save_json(&options.output_dir, &stem, &run.output) {
            error!("Failed to write result JSON for {}: {:#}", filename, e);
        }
        if let Err(e) = output::save_annotated(&options.output_dir, &stem, image, &run.output) {
            error!("Failed to write annotated image for {}: {:#}", filename, e);
        }

        let accuracy = match scorer {
            Some(scorer) => match scorer.score(&filename) {
                Ok(value) => Accuracy::Scored(value),
                Err(e) => {
                    error!("Accuracy scoring failed for {}: {:#}", filename, e);
                    Accuracy::Failed
                }
            },
            None => Accuracy::Skipped,
        };

        reporter.record(PerImageRecord::new(filename, run.avg_ms, total_chars, accuracy))?;

        if (index + 1) % 10 == 0 || index + 1 == total {
            let done = index + 1;
            info!(
                "[PROGRESS] {}/{} images processed ({:.1}%) - success: {}, failed: {}",
                done,
                total,
                100.0 * done as f64 / total as f64,
                done - failed,
                failed
            );
        }
    }

    let wall_ms = batch_start.elapsed().as_millis();
    info!("Batch processing completed in {} ms", wall_ms);

    let summary = reporter.finalize(failed);
    if summary.succeeded > 0 {
        reporter.emit_summary(&summary, options.init_ms, wall_ms)?;
    } else {
        error!("No successful inferences completed - cannot calculate statistics");
    }

    Ok(summary)
}

/// Basename of a path, falling back to the full path display.
fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Basename without the extension, used to key output artifacts.
fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name(path))
}
