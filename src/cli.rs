//! Command line arguments backing the `ocr-bench` binary.

use clap::Parser;
use std::path::PathBuf;

/// Batch OCR inference benchmark
#[derive(Parser, Debug)]
#[command(name = "ocr-bench")]
#[command(about = "Benchmark a PaddleOCR pipeline over a set of images")]
#[command(version)]
pub struct Args {
    /// Image files or directories to benchmark (directories are searched
    /// recursively for .jpg/.jpeg/.png/.bmp/.tiff files)
    pub paths: Vec<PathBuf>,

    /// Path to a TOML configuration file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Inference repetitions per image (overrides config)
    #[arg(long, short = 'r')]
    pub repetitions: Option<u32>,

    /// Directory for per-image result artifacts (overrides config)
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,

    /// Ground-truth annotation file for accuracy scoring (overrides config)
    #[arg(long)]
    pub ground_truth: Option<PathBuf>,

    /// Inference device passed through to the engine (overrides config)
    #[arg(long)]
    pub device: Option<String>,

    /// Skip accuracy scoring entirely
    #[arg(long)]
    pub no_scoring: bool,
}
