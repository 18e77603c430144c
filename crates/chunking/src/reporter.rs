//! Run-scoped reporting for chunking runs.
//!
//! A `RunReporter` is created per run and passed into the assembler. It
//! counts records read, records skipped and chunks produced, forwards
//! progress events to an optional callback, and yields a `RunSummary` when
//! the run finishes. Nothing here is process-global.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Progress event emitted while a run is in flight.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    /// Phase of the operation: "chunk", "skip", "embed", "index"
    pub phase: String,

    /// Units processed so far
    pub current: u64,

    /// Total expected work (if known)
    pub total: Option<u64>,

    /// Percentage complete (0.0 - 100.0)
    pub percentage: Option<f64>,

    /// Human-readable message
    pub message: String,

    /// Elapsed time since the run started
    pub elapsed_secs: Option<f64>,
}

impl ProgressEvent {
    /// Create a new progress event.
    pub fn new(
        phase: impl Into<String>,
        current: u64,
        total: Option<u64>,
        message: impl Into<String>,
    ) -> Self {
        let percentage =
            total.map(|t| if t > 0 { (current as f64 / t as f64) * 100.0 } else { 0.0 });

        Self {
            phase: phase.into(),
            current,
            total,
            percentage,
            message: message.into(),
            elapsed_secs: None,
        }
    }

    /// Set elapsed time.
    pub fn with_elapsed(mut self, elapsed_secs: f64) -> Self {
        self.elapsed_secs = Some(elapsed_secs);
        self
    }

    /// Format as a simple user-facing line.
    pub fn format_simple(&self) -> String {
        let progress = match self.total {
            Some(total) => format!("{}/{}", self.current, total),
            None => format!("{}", self.current),
        };

        let pct = self
            .percentage
            .map(|p| format!(" ({:.0}%)", p))
            .unwrap_or_default();

        format!("[{}] {}{} - {}", self.phase, progress, pct, self.message)
    }
}

/// Callback for progress events.
pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Aggregate counts for one assembly run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Records seen, including skipped ones
    pub records_read: u64,

    /// Records omitted for a missing or blank narrative
    pub records_skipped: u64,

    /// Chunks emitted
    pub chunks_produced: u64,

    /// Wall-clock duration in seconds
    pub elapsed_secs: f64,
}

/// Per-run counter and event sink.
pub struct RunReporter {
    callback: Option<ProgressCallback>,
    started: Instant,
    started_at: DateTime<Utc>,
    total: Option<u64>,
    records_read: u64,
    records_skipped: u64,
    chunks_produced: u64,
}

impl RunReporter {
    /// Create a reporter that forwards events to `callback`.
    pub fn new(callback: ProgressCallback) -> Self {
        Self::build(Some(callback))
    }

    /// Create a reporter that only counts.
    pub fn noop() -> Self {
        Self::build(None)
    }

    fn build(callback: Option<ProgressCallback>) -> Self {
        Self {
            callback,
            started: Instant::now(),
            started_at: Utc::now(),
            total: None,
            records_read: 0,
            records_skipped: 0,
            chunks_produced: 0,
        }
    }

    /// Declare how many records the run will see.
    pub fn set_total(&mut self, total: u64) {
        self.total = Some(total);
    }

    /// Count a record that produced `chunks` chunks.
    pub fn record_chunked(&mut self, source_id: &str, chunks: usize) {
        self.records_read += 1;
        self.chunks_produced += chunks as u64;

        tracing::trace!(source_id, chunks, "Record chunked");

        self.emit(ProgressEvent::new(
            "chunk",
            self.records_read,
            self.total,
            format!("{} chunks created", self.chunks_produced),
        ));
    }

    /// Count a record omitted for a missing or blank narrative.
    pub fn record_skipped(&mut self, source_id: &str) {
        self.records_read += 1;
        self.records_skipped += 1;

        tracing::debug!(source_id, "Skipping record with empty narrative");

        self.emit(ProgressEvent::new(
            "skip",
            self.records_read,
            self.total,
            format!("record {} has no narrative", source_id),
        ));
    }

    /// Emit a progress event to the callback, if any.
    pub fn emit(&self, event: ProgressEvent) {
        if let Some(callback) = &self.callback {
            let elapsed = self.started.elapsed().as_secs_f64();
            callback(event.with_elapsed(elapsed));
        }
    }

    /// Records seen so far.
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Records skipped so far.
    pub fn records_skipped(&self) -> u64 {
        self.records_skipped
    }

    /// Chunks produced so far.
    pub fn chunks_produced(&self) -> u64 {
        self.chunks_produced
    }

    /// Close the run and return its summary.
    pub fn finish(self) -> RunSummary {
        let summary = RunSummary {
            started_at: self.started_at,
            records_read: self.records_read,
            records_skipped: self.records_skipped,
            chunks_produced: self.chunks_produced,
            elapsed_secs: self.started.elapsed().as_secs_f64(),
        };

        tracing::info!(
            records_read = summary.records_read,
            records_skipped = summary.records_skipped,
            chunks_produced = summary.chunks_produced,
            elapsed_secs = summary.elapsed_secs,
            "Chunking run finished"
        );

        summary
    }
}

impl Default for RunReporter {
    fn default() -> Self {
        Self::noop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_progress_event_format() {
        let event = ProgressEvent::new("chunk", 5, Some(10), "12 chunks created");
        let formatted = event.format_simple();
        assert!(formatted.contains("[chunk]"));
        assert!(formatted.contains("5/10"));
        assert!(formatted.contains("50%"));
    }

    #[test]
    fn test_reporter_counts() {
        let mut reporter = RunReporter::noop();
        reporter.record_chunked("1", 3);
        reporter.record_skipped("2");
        reporter.record_chunked("3", 1);

        let summary = reporter.finish();
        assert_eq!(summary.records_read, 3);
        assert_eq!(summary.records_skipped, 1);
        assert_eq!(summary.chunks_produced, 4);
    }

    #[test]
    fn test_reporter_emits_events() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();

        let mut reporter = RunReporter::new(Arc::new(move |event: ProgressEvent| {
            sink.lock().unwrap().push(event);
        }));
        reporter.set_total(2);
        reporter.record_chunked("a", 2);
        reporter.record_skipped("b");

        let captured = events.lock().unwrap();
        assert_eq!(captured.len(), 2);
        assert_eq!(captured[0].phase, "chunk");
        assert_eq!(captured[0].total, Some(2));
        assert_eq!(captured[1].phase, "skip");
        assert_eq!(captured[1].current, 2);
        assert!(captured[1].elapsed_secs.is_some());
    }
}
