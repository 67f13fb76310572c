//! OCR inference benchmark harness
//!
//! Drives a pre-built text detection/recognition engine over a set of images,
//! times repeated inference runs per image, scores the recognized text against
//! ground truth via an external scorer, and reports per-image and batch-level
//! metrics in a machine-parseable format.

pub mod bench;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod output;
pub mod scoring;
