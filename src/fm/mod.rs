//! The Fiduccia-Mattheyses 2-way balanced min-cut bisector

mod arena;
mod bucket;
mod cell;
mod pass;

pub use cell::Side;

use crate::error::PartitionResult;
use crate::matrix::{PruningMatrix, SubsetMembership};

/// Bisect `subset` into two balanced, cut-minimizing parts
///
/// `subset` need not be sorted or deduplicated; the result is always a pure
/// function of `(matrix, subset)` as a *set* (Determinism).
///
/// Returns `(a, b)` with `a.len() + b.len() == subset.len()` (deduplicated)
/// and `|a.len() - b.len()| <= 1`. Both parts are sorted ascending.
///
/// # Panics
///
/// Panics if `subset` contains an index `>= matrix.n()`. The partitioner
/// never triggers this (every subset it passes is derived from `0..n`); a
/// caller bisecting an externally-supplied subset should use
/// [`try_bisect`] instead.
pub fn bisect(matrix: &dyn PruningMatrix, subset: &[usize]) -> (Vec<usize>, Vec<usize>) {
    let membership = SubsetMembership::new(matrix.n(), subset);
    bisect_membership(matrix, &membership)
}

/// Fallible counterpart to [`bisect`], reporting an out-of-range subset
/// index as [`crate::error::PartitionError::IndexOutOfRange`] instead of panicking
pub fn try_bisect(
    matrix: &dyn PruningMatrix,
    subset: &[usize],
) -> PartitionResult<(Vec<usize>, Vec<usize>)> {
    let membership = SubsetMembership::try_new(matrix.n(), subset)?;
    Ok(bisect_membership(matrix, &membership))
}

fn bisect_membership(
    matrix: &dyn PruningMatrix,
    membership: &SubsetMembership,
) -> (Vec<usize>, Vec<usize>) {
    let nodes = membership.members();
    let len = nodes.len();

    if len == 0 {
        return (Vec::new(), Vec::new());
    }

    let span = tracing::debug_span!("bisect", subset_size = len);
    let _entered = span.enter();

    let split_at = len.div_ceil(2);
    let mut sides: Vec<Side> = (0..len)
        .map(|i| if i < split_at { Side::A } else { Side::B })
        .collect();

    let mut passes = 0u32;
    while pass::run_pass(matrix, membership, &mut sides) {
        passes += 1;
    }
    tracing::debug!("bisection settled after {} improving pass(es)", passes);

    let mut a = Vec::new();
    let mut b = Vec::new();
    for (i, &node) in nodes.iter().enumerate() {
        match sides[i] {
            Side::A => a.push(node),
            Side::B => b.push(node),
        }
    }
    (a, b)
}

/// Count the cut of an induced subgraph given an explicit partition into `a` and `b`
///
/// Exposed for tests and diagnostics; not used on the bisector's hot path.
pub fn cut_size(matrix: &dyn PruningMatrix, a: &[usize], b: &[usize]) -> usize {
    let mut count = 0;
    for &u in a {
        for &v in b {
            if matrix.has_edge(u, v) {
                count += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::DenseBitMatrix;
    use proptest::prelude::*;

    #[test]
    fn try_bisect_rejects_out_of_range_index() {
        let m = DenseBitMatrix::new(3);
        let err = try_bisect(&m, &[0, 1, 9]).unwrap_err();
        assert!(matches!(
            err,
            crate::error::PartitionError::IndexOutOfRange { index: 9, n: 3 }
        ));
    }

    #[test]
    fn bisect_empty_subset() {
        let m = DenseBitMatrix::new(0);
        let (a, b) = bisect(&m, &[]);
        assert!(a.is_empty() && b.is_empty());
    }

    #[test]
    fn bisect_singleton_leaves_b_empty() {
        let m = DenseBitMatrix::new(1);
        let (a, b) = bisect(&m, &[0]);
        assert_eq!(a, vec![0]);
        assert!(b.is_empty());
    }

    #[test]
    fn bisect_is_deterministic() {
        let mut m = DenseBitMatrix::new(6);
        for (u, v) in [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0), (0, 3)] {
            m.set_edge(u, v);
        }
        let subset: Vec<usize> = (0..6).collect();
        let first = bisect(&m, &subset);
        let second = bisect(&m, &subset);
        assert_eq!(first, second);
    }

    #[test]
    fn bisect_balances_within_one() {
        let mut m = DenseBitMatrix::new(7);
        for i in 0..7 {
            for j in (i + 1)..7 {
                m.set_edge(i, j);
            }
        }
        let subset: Vec<usize> = (0..7).collect();
        let (a, b) = bisect(&m, &subset);
        assert!((a.len() as i64 - b.len() as i64).abs() <= 1);
        assert_eq!(a.len() + b.len(), 7);
    }

    #[test]
    fn bisect_never_worsens_initial_cut() {
        let mut m = DenseBitMatrix::new(8);
        for (u, v) in [
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 0),
            (4, 5),
            (5, 6),
            (6, 7),
            (7, 4),
            (3, 4),
        ] {
            m.set_edge(u, v);
        }
        let subset: Vec<usize> = (0..8).collect();
        let split_at = subset.len().div_ceil(2);
        let initial_a: Vec<usize> = subset[..split_at].to_vec();
        let initial_b: Vec<usize> = subset[split_at..].to_vec();
        let initial_cut = cut_size(&m, &initial_a, &initial_b);

        let (a, b) = bisect(&m, &subset);
        let final_cut = cut_size(&m, &a, &b);
        assert!(final_cut <= initial_cut);
    }

    proptest! {
        // pass monotonicity: repeatedly running a pass over the same
        // `sides` buffer never increases the cut, and the loop in `bisect`
        // terminates (a pass that doesn't improve returns `false`).
        #[test]
        fn repeated_passes_never_increase_cut(
            n in 1usize..20,
            edges in prop::collection::vec((0usize..20, 0usize..20), 0..60),
        ) {
            let mut m = DenseBitMatrix::new(n);
            for &(u, v) in &edges {
                if u < n && v < n && u != v {
                    m.set_edge(u, v);
                }
            }
            let subset: Vec<usize> = (0..n).collect();
            let membership = SubsetMembership::new(n, &subset);
            let split_at = n.div_ceil(2);
            let mut sides: Vec<Side> = (0..n)
                .map(|i| if i < split_at { Side::A } else { Side::B })
                .collect();

            let cut_of = |sides: &[Side]| -> usize {
                let mut a = Vec::new();
                let mut b = Vec::new();
                for (i, &node) in subset.iter().enumerate() {
                    match sides[i] {
                        Side::A => a.push(node),
                        Side::B => b.push(node),
                    }
                }
                cut_size(&m, &a, &b)
            };

            let mut previous = cut_of(&sides);
            let mut iterations = 0;
            while pass::run_pass(&m, &membership, &mut sides) {
                let current = cut_of(&sides);
                prop_assert!(current <= previous);
                previous = current;
                iterations += 1;
                prop_assert!(iterations <= n + 1, "pass loop should terminate quickly");
            }
        }
    }
}
