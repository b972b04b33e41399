//! Errors that can occur while partitioning a pruning matrix

/// Errors reported at the partitioner's public boundary
///
/// Every variant corresponds to a precondition violation; the algorithm
/// itself cannot fail once its inputs are valid.
#[derive(Debug, thiserror::Error)]
pub enum PartitionError {
    /// The pruning matrix was not square
    #[error("pruning matrix is not square: {rows} rows, {cols} cols")]
    NotSquare {
        /// Observed row count
        rows: usize,
        /// Observed column count
        cols: usize,
    },

    /// `P[i][j] != P[j][i]` for some pair
    #[error("pruning matrix is not symmetric at ({i}, {j})")]
    NotSymmetric {
        /// Row index of the asymmetric entry
        i: usize,
        /// Column index of the asymmetric entry
        j: usize,
    },

    /// Cache capacity `B` must be at least 2
    #[error("cache capacity must be at least 2, got {0}")]
    CapacityTooSmall(usize),

    /// A subset passed to the bisector contained an out-of-range index
    #[error("subset index {index} is out of range for n={n}")]
    IndexOutOfRange {
        /// The offending index
        index: usize,
        /// The matrix's node count
        n: usize,
    },
}

/// Convenience alias used throughout the crate's public API
pub type PartitionResult<T> = Result<T, PartitionError>;
