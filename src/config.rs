//! In-process configuration for a partitioning run
//!
//! No file or environment configuration is involved here. This is purely a
//! constructor-time bundle.

use std::sync::Arc;

use crate::diagnostics::{DiagnosticSink, TracingDiagnosticSink};

/// Configuration for one [`crate::partition::partition`] call
pub struct PartitionConfig {
    /// Cache capacity `B`, in node units. Must be at least 2.
    pub capacity: usize,
    /// Receiver for the per-level diagnostic surface
    pub diagnostic_sink: Arc<dyn DiagnosticSink>,
}

impl PartitionConfig {
    /// Build a config for the given cache capacity, logging diagnostics via `tracing`
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            diagnostic_sink: Arc::new(TracingDiagnosticSink),
        }
    }

    /// Build a config for the given cache capacity with a specific diagnostic sink
    pub fn with_sink(capacity: usize, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            capacity,
            diagnostic_sink: sink,
        }
    }
}
