//! Diagnostic surface: one record per partitioning level
//!
//! Semantically optional. `partition` never consults diagnostic output to
//! decide anything, but it is wired through by default as structured
//! `tracing` events.

use serde::{Deserialize, Serialize};

/// One level's worth of partitioning statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelReport {
    /// Level index, starting at 0 for the initial single batch
    pub level: usize,
    /// Number of batches after this level's splits
    pub batch_count: usize,
    /// Sum of the cut introduced by every bisection performed at this level
    pub cut_total: usize,
    /// Smallest non-empty batch size at this level
    pub min_batch_size: usize,
    /// Largest batch size at this level
    pub max_batch_size: usize,
}

/// Receiver for per-level diagnostic records
///
/// Implement this to collect records programmatically (e.g. in tests); the
/// default sink only logs them.
pub trait DiagnosticSink: Send + Sync {
    /// Called once per level, after that level's splits have all completed
    fn on_level(&self, record: LevelReport);
}

/// Default sink: emits one `tracing::debug!` event per level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnosticSink;

impl DiagnosticSink for TracingDiagnosticSink {
    fn on_level(&self, record: LevelReport) {
        tracing::debug!(
            level = record.level,
            batch_count = record.batch_count,
            cut_total = record.cut_total,
            min_batch_size = record.min_batch_size,
            max_batch_size = record.max_batch_size,
            "partition level complete"
        );
    }
}

/// A sink that accumulates records into memory, for tests and offline analysis
#[derive(Debug, Default)]
pub struct RecordingDiagnosticSink {
    records: std::sync::Mutex<Vec<LevelReport>>,
}

impl RecordingDiagnosticSink {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every record observed so far, in level order
    pub fn records(&self) -> Vec<LevelReport> {
        self.records.lock().expect("recorder mutex poisoned").clone()
    }
}

impl DiagnosticSink for RecordingDiagnosticSink {
    fn on_level(&self, record: LevelReport) {
        self.records
            .lock()
            .expect("recorder mutex poisoned")
            .push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_preserves_order() {
        let sink = RecordingDiagnosticSink::new();
        sink.on_level(LevelReport {
            level: 0,
            batch_count: 1,
            cut_total: 0,
            min_batch_size: 4,
            max_batch_size: 4,
        });
        sink.on_level(LevelReport {
            level: 1,
            batch_count: 2,
            cut_total: 2,
            min_batch_size: 2,
            max_batch_size: 2,
        });
        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].level, 0);
        assert_eq!(records[1].level, 1);
    }
}
