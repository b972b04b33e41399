//! The partitioner driver: recursive (iteratively expressed) batch splitting
//! until the target batch count is reached

use serde::{Deserialize, Serialize};

use crate::config::PartitionConfig;
use crate::diagnostics::LevelReport;
use crate::error::{PartitionError, PartitionResult};
use crate::fm;
use crate::matrix::PruningMatrix;

/// A batch: a set of node indices meant to reside together in cache
///
/// Materialized sorted ascending, matching the bisector's own output order.
pub type Batch = Vec<usize>;

/// The result of one `partition` call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionReport {
    /// Disjoint batches, in construction order (left-then-right splitting)
    pub batches: Vec<Batch>,
    /// Nodes with no incident edge in the pruning matrix
    pub isolated: Vec<usize>,
}

/// Partition `matrix`'s nodes into batches sized for `config.capacity` series
///
/// Isolates edgeless nodes, then repeatedly bisects every batch of the
/// current level until the batch count reaches
/// `ceil(2n / config.capacity)`. The only precondition checked here is
/// `config.capacity >= 2`; see [`verify_preconditions`] for the more
/// expensive symmetry check, which callers should run once when a
/// pruning matrix first enters the system rather than on every partition
/// call.
pub fn partition(
    matrix: &dyn PruningMatrix,
    config: &PartitionConfig,
) -> PartitionResult<PartitionReport> {
    let capacity = config.capacity;
    if capacity < 2 {
        return Err(PartitionError::CapacityTooSmall(capacity));
    }

    let n = matrix.n();
    if n == 0 {
        return Ok(PartitionReport {
            batches: Vec::new(),
            isolated: Vec::new(),
        });
    }

    let isolated: Vec<usize> = (0..n)
        .filter(|&v| (0..n).all(|u| u == v || !matrix.has_edge(v, u)))
        .collect();
    let initial: Vec<usize> = (0..n).filter(|v| !isolated.contains(v)).collect();

    let target = div_ceil_usize(2 * n, capacity);

    let mut current_level: Vec<Batch> = if initial.is_empty() {
        Vec::new()
    } else {
        vec![initial]
    };

    let mut level = 0usize;
    report_level(config, level, &current_level, matrix);

    while current_level.len() < target && !current_level.is_empty() {
        // Every batch, including singletons, is replaced by exactly two
        // entries (the second possibly empty), so the batch count
        // at least doubles each level, guaranteeing `target` is reached.
        let mut next_level: Vec<Batch> = Vec::with_capacity(current_level.len() * 2);
        for batch in &current_level {
            let (a, b) = fm::bisect(matrix, batch);
            next_level.push(a);
            next_level.push(b);
        }
        current_level = next_level;
        level += 1;
        report_level(config, level, &current_level, matrix);
    }

    Ok(PartitionReport {
        batches: current_level,
        isolated,
    })
}

fn report_level(
    config: &PartitionConfig,
    level: usize,
    batches: &[Batch],
    matrix: &dyn PruningMatrix,
) {
    let non_empty: Vec<usize> = batches.iter().map(|b| b.len()).filter(|&s| s > 0).collect();
    let min_batch_size = non_empty.iter().copied().min().unwrap_or(0);
    let max_batch_size = non_empty.iter().copied().max().unwrap_or(0);
    let mut cut_total = 0usize;
    for i in 0..batches.len() {
        for j in (i + 1)..batches.len() {
            cut_total += fm::cut_size(matrix, &batches[i], &batches[j]);
        }
    }
    config.diagnostic_sink.on_level(LevelReport {
        level,
        batch_count: batches.len(),
        cut_total,
        min_batch_size,
        max_batch_size,
    });
}

/// Verify that `matrix` is symmetric, i.e. `has_edge(u, v) == has_edge(v, u)`
/// for every pair
///
/// This is `O(n^2)` and is therefore not run automatically inside
/// [`partition`]; call it once when a pruning matrix is first accepted from
/// an external collaborator.
pub fn verify_preconditions(matrix: &dyn PruningMatrix) -> PartitionResult<()> {
    let n = matrix.n();
    for i in 0..n {
        for j in (i + 1)..n {
            if matrix.has_edge(i, j) != matrix.has_edge(j, i) {
                return Err(PartitionError::NotSymmetric { i, j });
            }
        }
    }
    Ok(())
}

fn div_ceil_usize(a: usize, b: usize) -> usize {
    a.div_ceil(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::DenseBitMatrix;

    #[test]
    fn rejects_capacity_below_two() {
        let m = DenseBitMatrix::new(4);
        let config = PartitionConfig::new(1);
        let err = partition(&m, &config).unwrap_err();
        assert!(matches!(err, PartitionError::CapacityTooSmall(1)));
    }

    #[test]
    fn empty_graph_returns_empty_report() {
        let m = DenseBitMatrix::new(0);
        let config = PartitionConfig::new(4);
        let report = partition(&m, &config).unwrap();
        assert!(report.batches.is_empty());
        assert!(report.isolated.is_empty());
    }

    #[test]
    fn all_isolated_nodes_reported_separately() {
        let m = DenseBitMatrix::new(5);
        let config = PartitionConfig::new(10);
        let report = partition(&m, &config).unwrap();
        assert!(report.batches.is_empty());
        assert_eq!(report.isolated, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn large_capacity_keeps_single_batch() {
        let mut m = DenseBitMatrix::new(2);
        m.set_edge(0, 1);
        let config = PartitionConfig::new(10);
        let report = partition(&m, &config).unwrap();
        assert_eq!(report.batches, vec![vec![0, 1]]);
        assert!(report.isolated.is_empty());
    }

    #[test]
    fn every_non_isolated_node_appears_exactly_once() {
        let mut m = DenseBitMatrix::new(9);
        for (u, v) in [(0, 1), (1, 2), (2, 0), (3, 4), (5, 6), (6, 7), (7, 5)] {
            m.set_edge(u, v);
        }
        let config = PartitionConfig::new(3);
        let report = partition(&m, &config).unwrap();
        let mut seen = Vec::new();
        for batch in &report.batches {
            seen.extend(batch.iter().copied());
        }
        seen.sort_unstable();
        let mut expected: Vec<usize> = (0..9).filter(|&v| v != 8).collect();
        expected.sort_unstable();
        assert_eq!(seen, expected);
        assert_eq!(report.isolated, vec![8]);
    }
}
