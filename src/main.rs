//! ocr-bench - Batch benchmarking harness for a PaddleOCR pipeline
//!
//! Discovers images, runs timed repeated inference on each, scores the
//! recognized text against ground truth, and reports per-image and batch
//! metrics. Machine-parseable results go to stdout; diagnostics to stderr.

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use ocr_bench::bench::{self, BenchmarkOptions};
use ocr_bench::config::{self, AppConfig};
use ocr_bench::discovery;
use ocr_bench::engine::PaddleEngine;
use ocr_bench::scoring::{AccuracyScorer, ScriptScorer};

use crate::cli::Args;

fn main() -> ExitCode {
    // Diagnostics go to stderr so stdout stays machine-parseable.
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let args = Args::parse();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    if args.paths.is_empty() {
        bail!(
            "no input paths given; usage: ocr-bench <image_path_or_directory> [more paths ...]"
        );
    }

    let config = load_config(&args)?;

    info!(
        "Collecting image paths from {} input argument(s)...",
        args.paths.len()
    );
    let images = discovery::collect_images(&args.paths);
    if images.is_empty() {
        bail!(
            "no valid image files found; check that the specified paths contain \
             .jpg, .jpeg, .png, .bmp or .tiff files"
        );
    }

    info!("Found {} image(s) to process", images.len());
    list_samples(&images);

    info!("Starting engine initialization...");
    let init_start = Instant::now();
    let mut engine = PaddleEngine::new(&config.engine).context("engine initialization failed")?;
    let init_ms = init_start.elapsed().as_millis();
    info!("Engine initialized in {} ms", init_ms);

    let scoring_enabled = config.scoring.enabled && !args.no_scoring;
    let scorer = scoring_enabled
        .then(|| ScriptScorer::new(&config.scoring, &config.benchmark.output_dir));
    if !scoring_enabled {
        info!("Accuracy scoring disabled for this run");
    }

    let options = BenchmarkOptions {
        repetitions: config.benchmark.repetitions,
        output_dir: config.benchmark.output_dir.clone(),
        init_ms,
    };

    let summary = bench::run_batch(
        &mut engine,
        scorer.as_ref().map(|s| s as &dyn AccuracyScorer),
        &images,
        &options,
        io::stdout().lock(),
    )?;

    Ok(if summary.failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Load configuration from the given file, or fall back to defaults, then
/// apply command-line overrides.
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => config::load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AppConfig::default(),
    };

    if let Some(repetitions) = args.repetitions {
        config.benchmark.repetitions = repetitions;
    }
    if let Some(output_dir) = &args.output_dir {
        config.benchmark.output_dir = output_dir.clone();
    }
    if let Some(ground_truth) = &args.ground_truth {
        config.scoring.ground_truth = ground_truth.clone();
    }
    if let Some(device) = &args.device {
        config.engine.device = device.clone();
    }

    Ok(config)
}

/// Log a short preview of the discovered images.
fn list_samples(images: &[PathBuf]) {
    for (i, image) in images.iter().take(5).enumerate() {
        info!("  [{}] {}", i + 1, image.display());
    }
    if images.len() > 5 {
        info!("  ... and {} more image(s)", images.len() - 5);
    }
}
