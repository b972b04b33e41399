//! Recursive min-cut batch partitioner for bounded-cache time-series similarity search
//!
//! Given a symmetric boolean pruning matrix `P` over `n` time-series and a
//! cache capacity `B`, [`partition::partition`] splits the non-isolated
//! series into disjoint batches so that (a) the aggregate cross-batch cut of
//! `P` is small and (b) the batch count is at least `ceil(2n / B)`, letting a
//! downstream all-pairs similarity search stream batch pairs through a
//! bounded cache without thrashing.
//!
//! The batches come from recursively bisecting each level with the
//! Fiduccia-Mattheyses 2-way balanced min-cut heuristic ([`fm`]). Everything
//! upstream of the pruning matrix (ingestion, gap-filling, on-disk storage,
//! and computing `P` itself) is out of scope. This crate only ever borrows
//! `P` immutably for the lifetime of one partitioning run.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fm;
pub mod matrix;
pub mod partition;

pub use config::PartitionConfig;
pub use diagnostics::{DiagnosticSink, LevelReport, RecordingDiagnosticSink, TracingDiagnosticSink};
pub use error::{PartitionError, PartitionResult};
pub use fm::{bisect, cut_size, try_bisect, Side};
pub use matrix::{AdjacencyListMatrix, DenseBitMatrix, PruningMatrix, SubsetMembership};
pub use partition::{partition, verify_preconditions, Batch, PartitionReport};
