//! One Fiduccia-Mattheyses pass: gain initialization, the move loop, and
//! rollback to the best prefix.

use super::arena::Arena;
use super::bucket::GainBuckets;
use super::cell::{Cell, Side};
use crate::matrix::{PruningMatrix, SubsetMembership};

/// Run one FM pass over `sides`, mutating it in place to the best prefix found.
///
/// Returns `true` if the pass improved the cut (`k* > 0`), `false` if the
/// pass made no improvement, in which case `sides` is left unchanged and the
/// bisection terminates.
pub(crate) fn run_pass(
    matrix: &dyn PruningMatrix,
    membership: &SubsetMembership,
    sides: &mut [Side],
) -> bool {
    let trace = match compute_pass_trace(matrix, membership, sides) {
        Some(t) => t,
        None => return false,
    };

    let is_balanced = |k: usize| -> bool {
        let size_a = trace.sizes_a[k];
        let size_b = trace.local_nodes_len() as i64 - size_a;
        (size_a - size_b).abs() <= 1
    };

    let mut best_k = 0usize;
    let mut best_cut = trace.cuts[0];
    for (k, &c) in trace.cuts.iter().enumerate().skip(1) {
        if is_balanced(k) && c < best_cut {
            best_cut = c;
            best_k = k;
        }
    }

    if best_k == 0 {
        tracing::debug!("FM pass made no improvement, cut stays at {}", trace.cuts[0]);
        return false;
    }

    tracing::debug!(
        "FM pass improved cut from {} to {} after {} of {} moves",
        trace.cuts[0],
        best_cut,
        best_k,
        trace.history.len()
    );

    for &(idx, new_side) in &trace.history[..best_k] {
        sides[idx] = new_side;
    }
    true
}

/// The full record of one pass's moves, kept separate from [`run_pass`] so
/// property tests can replay prefixes of `history` against `cuts` without
/// duplicating the gain-bucket machinery.
pub(crate) struct PassTrace {
    /// `(local index, side it moved to)` in move order
    pub(crate) history: Vec<(usize, Side)>,
    /// `cuts[k]` is the cut size after applying `history[..k]`
    pub(crate) cuts: Vec<i64>,
    /// `sizes_a[k]` is `|A|` after applying `history[..k]`
    pub(crate) sizes_a: Vec<i64>,
    /// Adjacency restricted to `S`, in local indices, for replay
    pub(crate) adjacency: Vec<Vec<usize>>,
}

impl PassTrace {
    fn local_nodes_len(&self) -> usize {
        self.adjacency.len()
    }
}

/// Run the move loop once, recording every move and the cut/balance after
/// each prefix, without committing anything back to `sides`.
///
/// Returns `None` for an empty subset, matching `run_pass`'s early return.
pub(crate) fn compute_pass_trace(
    matrix: &dyn PruningMatrix,
    membership: &SubsetMembership,
    sides: &[Side],
) -> Option<PassTrace> {
    let local_nodes = membership.members();
    let len = local_nodes.len();
    if len == 0 {
        return None;
    }

    // Adjacency restricted to S, expressed in local indices (position within
    // `local_nodes`), built once per pass.
    let adjacency: Vec<Vec<usize>> = local_nodes
        .iter()
        .map(|&v| {
            let mut local: Vec<usize> = matrix
                .neighbors_in(v, membership)
                .into_iter()
                .filter_map(|u| membership.local_index(u))
                .collect();
            local.sort_unstable();
            local.dedup();
            local
        })
        .collect();
    let max_deg = adjacency.iter().map(|n| n.len()).max().unwrap_or(0);

    let mut cut0: i64 = 0;
    for (i, neighbors) in adjacency.iter().enumerate() {
        for &j in neighbors {
            if j > i && sides[i] != sides[j] {
                cut0 += 1;
            }
        }
    }

    let cells: Vec<Cell> = local_nodes
        .iter()
        .zip(sides.iter())
        .map(|(&node, &side)| Cell::new(node, side))
        .collect();
    let mut arena = Arena::new(cells);

    for i in 0..len {
        let external = adjacency[i]
            .iter()
            .filter(|&&j| arena.get(j).side != arena.get(i).side)
            .count() as i64;
        let internal = adjacency[i].len() as i64 - external;
        arena.get_mut(i).gain = external - internal;
    }

    let mut buckets = GainBuckets::new(max_deg);
    for i in 0..len {
        buckets.insert(&mut arena, i);
    }

    // History of (local index, side it moved to), in move order. `sizes_a`
    // tracks |A| after k moves so the best-prefix search can reject prefixes
    // that would return an unbalanced bisection: a single move always shifts
    // the size difference by 2, so an odd-length prefix of an
    // otherwise-balanced split is transiently unbalanced and must never be
    // chosen as the final result (`||A|-|B|| <= 1` output contract).
    let mut history: Vec<(usize, Side)> = Vec::with_capacity(len);
    let mut cuts: Vec<i64> = Vec::with_capacity(len + 1);
    let mut sizes_a: Vec<i64> = Vec::with_capacity(len + 1);
    cuts.push(cut0);
    sizes_a.push(sides.iter().filter(|&&s| s == Side::A).count() as i64);
    let mut cumulative = cut0;

    for _ in 0..len {
        let candidate_side = if buckets.count(Side::A) >= buckets.count(Side::B) {
            Side::A
        } else {
            Side::B
        };
        let idx = buckets
            .pop_max(&mut arena, candidate_side)
            .expect("candidate side chosen by population must be non-empty");

        let old_side = arena.get(idx).side;
        let new_side = old_side.opposite();
        let move_gain = arena.get(idx).gain;

        arena.get_mut(idx).side = new_side;
        arena.get_mut(idx).locked = true;
        cumulative -= move_gain;
        cuts.push(cumulative);
        sizes_a.push(sizes_a.last().unwrap() + if old_side == Side::A { -1 } else { 1 });
        history.push((idx, new_side));

        for &nbr in &adjacency[idx] {
            if arena.get(nbr).locked {
                continue;
            }
            let nbr_side = arena.get(nbr).side;
            let delta = if nbr_side == old_side { 2 } else { -2 };
            let new_gain = arena.get(nbr).gain + delta;
            buckets.relocate(&mut arena, nbr, new_gain);
        }
    }

    Some(PassTrace {
        history,
        cuts,
        sizes_a,
        adjacency,
    })
}
