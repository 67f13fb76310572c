//! Aggregation and Reporting
//!
//! Accumulates per-image records, emits each machine-parseable result line
//! as soon as its image finishes, and computes the end-of-run summary.

use std::io::{self, Write};

use super::metrics::PerImageRecord;

/// End-of-run aggregate statistics over all attempted images.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    /// Images attempted (successful + failed)
    pub attempted: usize,
    /// Images that produced a record
    pub succeeded: usize,
    /// Images whose inference failed
    pub failed: usize,
    /// Percentage of attempted images that succeeded
    pub success_rate: f64,
    /// Minimum per-image average latency (ms) across successful images
    pub min_ms: f64,
    /// Maximum per-image average latency (ms) across successful images
    pub max_ms: f64,
    /// Mean per-image average latency (ms) across successful images
    pub avg_ms: f64,
    /// Sum of per-image average latencies (ms)
    pub total_ms: f64,
    /// FPS computed from the mean latency (1000 / avg_ms)
    pub avg_fps: f64,
    /// Batch throughput (succeeded * 1000 / total_ms)
    pub batch_fps: f64,
}

/// Accumulates records and writes the report stream.
///
/// Result lines are flushed immediately after each image so external tooling
/// can tail the output and recover partial results from a killed run.
pub struct Reporter<W: Write> {
    records: Vec<PerImageRecord>,
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            records: Vec::new(),
            out,
        }
    }

    /// Record one finished image and emit its result line.
    pub fn record(&mut self, record: PerImageRecord) -> io::Result<()> {
        writeln!(self.out, "{}", record.to_result_line())?;
        self.out.flush()?;
        self.records.push(record);
        Ok(())
    }

    pub fn records(&self) -> &[PerImageRecord] {
        &self.records
    }

    /// Compute the batch summary from the accumulated records.
    ///
    /// `avg_fps` and `batch_fps` are kept as two formulas to match the
    /// report contract even though they are algebraically equal over the
    /// successful set (batch_fps = n * 1000 / total = 1000 / (total / n)).
    pub fn finalize(&self, failed: usize) -> BatchSummary {
        let succeeded = self.records.len();
        let attempted = succeeded + failed;

        let total_ms: f64 = self.records.iter().map(|r| r.inference_ms).sum();
        let min_ms = self
            .records
            .iter()
            .map(|r| r.inference_ms)
            .fold(f64::INFINITY, f64::min);
        let max_ms = self
            .records
            .iter()
            .map(|r| r.inference_ms)
            .fold(f64::NEG_INFINITY, f64::max);

        let avg_ms = if succeeded > 0 {
            total_ms / succeeded as f64
        } else {
            0.0
        };
        let success_rate = if attempted > 0 {
            100.0 * succeeded as f64 / attempted as f64
        } else {
            0.0
        };
        let avg_fps = if avg_ms > 0.0 { 1000.0 / avg_ms } else { 0.0 };
        let batch_fps = if total_ms > 0.0 {
            succeeded as f64 * 1000.0 / total_ms
        } else {
            0.0
        };

        BatchSummary {
            attempted,
            succeeded,
            failed,
            success_rate,
            min_ms: if succeeded > 0 { min_ms } else { 0.0 },
            max_ms: if succeeded > 0 { max_ms } else { 0.0 },
            avg_ms,
            total_ms,
            avg_fps,
            batch_fps,
        }
    }

    /// Emit the human-readable summary block followed by the machine lines.
    pub fn emit_summary(
        &mut self,
        summary: &BatchSummary,
        init_ms: u128,
        wall_ms: u128,
    ) -> io::Result<()> {
        let rule = "=".repeat(60);
        let thin = "-".repeat(60);

        writeln!(self.out, "{rule}")?;
        writeln!(self.out, "BENCHMARK RESULTS SUMMARY")?;
        writeln!(self.out, "{rule}")?;
        writeln!(self.out, "Total images processed: {}", summary.attempted)?;
        writeln!(self.out, "Successful: {}", summary.succeeded)?;
        writeln!(self.out, "Failed: {}", summary.failed)?;
        writeln!(self.out, "Success rate: {:.1}%", summary.success_rate)?;
        writeln!(self.out, "{thin}")?;
        writeln!(self.out, "Initialization time: {init_ms} ms")?;
        writeln!(self.out, "Total processing time: {wall_ms} ms")?;
        writeln!(self.out, "Pure inference time: {:.2} ms", summary.total_ms)?;
        writeln!(self.out, "{thin}")?;
        writeln!(self.out, "Average inference time: {:.2} ms", summary.avg_ms)?;
        writeln!(self.out, "Min inference time: {:.2} ms", summary.min_ms)?;
        writeln!(self.out, "Max inference time: {:.2} ms", summary.max_ms)?;
        writeln!(self.out, "{thin}")?;
        writeln!(self.out, "Average FPS (per image): {:.2}", summary.avg_fps)?;
        writeln!(self.out, "Batch throughput FPS: {:.2}", summary.batch_fps)?;
        writeln!(self.out, "{rule}")?;

        writeln!(self.out, "TIMING_INFO:INIT:{init_ms}ms")?;
        writeln!(self.out, "TIMING_INFO:TOTAL_INFERENCE:{:.2}ms", summary.total_ms)?;
        writeln!(self.out, "TIMING_INFO:AVG_INFERENCE:{:.2}ms", summary.avg_ms)?;
        writeln!(self.out, "TIMING_INFO:AVG_FPS:{:.2}", summary.avg_fps)?;
        writeln!(self.out, "TIMING_INFO:BATCH_FPS:{:.2}", summary.batch_fps)?;
        writeln!(self.out, "TIMING_INFO:SUCCESS_RATE:{:.1}%", summary.success_rate)?;
        self.out.flush()
    }
}
