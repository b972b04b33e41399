//! The bit-matrix accessor: a read-only view over the symmetric boolean
//! pruning matrix `P`.
//!
//! Two representations are provided. Both satisfy the same `PruningMatrix`
//! trait so the bisector and partitioner never depend on a specific layout.

use std::collections::HashSet;

/// A read-only accessor over a symmetric boolean adjacency matrix
///
/// Implementors must guarantee `P[i][i] == false` and `has_edge(u, v) ==
/// has_edge(v, u)` for all valid `u`, `v`. The partitioner checks symmetry
/// only on request (see [`crate::partition::verify_preconditions`]); it is a
/// precondition, not something the core enforces on every call.
pub trait PruningMatrix: Send + Sync {
    /// Total number of nodes `n`
    fn n(&self) -> usize;

    /// Whether an edge exists between `u` and `v`
    fn has_edge(&self, u: usize, v: usize) -> bool;

    /// Nodes of `subset` adjacent to `v`, excluding `v` itself
    ///
    /// The default implementation intersects `v`'s full adjacency with a
    /// membership bitset of `subset`: `O(deg(v))` once the bitset exists,
    /// though the default still probes every node of `subset`.
    /// Implementations with a faster native adjacency list
    /// (see [`AdjacencyListMatrix`]) override this for true `O(deg_S(v))`
    /// behavior.
    fn neighbors_in<'a>(&'a self, v: usize, subset: &'a SubsetMembership) -> Vec<usize> {
        subset
            .members()
            .iter()
            .copied()
            .filter(|&u| u != v && self.has_edge(v, u))
            .collect()
    }
}

/// A precomputed membership bitset for one subset `S`, built once per
/// bisection call so that `neighbors_in` need not rescan `S` from scratch
/// for every node.
pub struct SubsetMembership {
    n: usize,
    present: Vec<bool>,
    members: Vec<usize>,
}

impl SubsetMembership {
    /// Build a membership bitset for `subset`, sized against a matrix of `n` nodes
    ///
    /// # Panics
    ///
    /// Panics if `subset` contains an index `>= n`. Callers that cannot
    /// guarantee this ahead of time (i.e. anything but the partitioner's own
    /// internally-derived subsets) should use [`Self::try_new`] instead.
    pub fn new(n: usize, subset: &[usize]) -> Self {
        Self::try_new(n, subset).expect("subset index out of range")
    }

    /// Fallible counterpart to [`Self::new`], returning
    /// [`crate::error::PartitionError::IndexOutOfRange`] instead of panicking
    pub fn try_new(n: usize, subset: &[usize]) -> crate::error::PartitionResult<Self> {
        let mut present = vec![false; n];
        for &v in subset {
            if v >= n {
                return Err(crate::error::PartitionError::IndexOutOfRange { index: v, n });
            }
            present[v] = true;
        }
        let mut members = subset.to_vec();
        members.sort_unstable();
        members.dedup();
        Ok(Self {
            n,
            present,
            members,
        })
    }

    /// Whether `v` belongs to this subset
    pub fn contains(&self, v: usize) -> bool {
        v < self.n && self.present[v]
    }

    /// The subset's members, sorted ascending, without duplicates
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// The position of node `v` within [`Self::members`], if present
    ///
    /// Used by the bisector to translate a node id into the local index it
    /// uses inside one bisection's cell arena.
    pub fn local_index(&self, v: usize) -> Option<usize> {
        self.members.binary_search(&v).ok()
    }
}

/// Dense bitset representation of `P`, one `u64` word per 64 columns of a row
///
/// This is the dense-bitset-of-n²-bits layout.
#[derive(Debug, Clone)]
pub struct DenseBitMatrix {
    n: usize,
    words_per_row: usize,
    bits: Vec<u64>,
}

impl DenseBitMatrix {
    /// Build an empty (edgeless) dense matrix of size `n`
    pub fn new(n: usize) -> Self {
        let words_per_row = n.div_ceil(64).max(1);
        Self {
            n,
            words_per_row,
            bits: vec![0u64; words_per_row * n],
        }
    }

    /// Build a dense matrix from a row-major `bool` grid
    ///
    /// Rejects non-square input. The diagonal is ignored rather than
    /// rejected, matching the convention that self-edges don't exist; an
    /// asymmetric grid is not validated here. See
    /// [`crate::partition::verify_preconditions`] for the explicit `O(n^2)`
    /// symmetry check.
    ///
    /// Used by tests and the demo binary to load an externally computed
    /// pruning matrix.
    pub fn try_from_dense(rows: &[Vec<bool>]) -> crate::error::PartitionResult<Self> {
        let n = rows.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(crate::error::PartitionError::NotSquare {
                    rows: n,
                    cols: row.len(),
                });
            }
        }
        let mut m = Self::new(n);
        for (i, row) in rows.iter().enumerate() {
            for (j, &edge) in row.iter().enumerate() {
                if edge && i != j {
                    m.set_edge(i, j);
                }
            }
        }
        Ok(m)
    }

    fn word_index(&self, i: usize, j: usize) -> (usize, u32) {
        let offset = i * self.words_per_row * 64 + j;
        (offset / 64, (offset % 64) as u32)
    }

    /// Mark an edge between `u` and `v` (both directions, since `P` is symmetric)
    pub fn set_edge(&mut self, u: usize, v: usize) {
        if u == v {
            return;
        }
        let (w, b) = self.word_index(u, v);
        self.bits[w] |= 1u64 << b;
        let (w, b) = self.word_index(v, u);
        self.bits[w] |= 1u64 << b;
    }
}

impl PruningMatrix for DenseBitMatrix {
    fn n(&self) -> usize {
        self.n
    }

    fn has_edge(&self, u: usize, v: usize) -> bool {
        if u == v || u >= self.n || v >= self.n {
            return false;
        }
        let (w, b) = self.word_index(u, v);
        (self.bits[w] >> b) & 1 == 1
    }
}

/// Adjacency-list representation of `P`
///
/// This is the row-indexed-adjacency-iterator layout. Its
/// `neighbors_in` override walks `v`'s (typically short) adjacency list
/// instead of the subset's membership list, giving the `O(deg_S(v))`
/// enumeration the dense representation only approximates.
#[derive(Debug, Clone)]
pub struct AdjacencyListMatrix {
    n: usize,
    adjacency: Vec<HashSet<usize>>,
}

impl AdjacencyListMatrix {
    /// Build an empty (edgeless) adjacency-list matrix of size `n`
    pub fn new(n: usize) -> Self {
        Self {
            n,
            adjacency: vec![HashSet::new(); n],
        }
    }

    /// Mark an edge between `u` and `v` (both directions)
    pub fn set_edge(&mut self, u: usize, v: usize) {
        if u == v {
            return;
        }
        self.adjacency[u].insert(v);
        self.adjacency[v].insert(u);
    }
}

impl PruningMatrix for AdjacencyListMatrix {
    fn n(&self) -> usize {
        self.n
    }

    fn has_edge(&self, u: usize, v: usize) -> bool {
        if u >= self.n {
            return false;
        }
        self.adjacency[u].contains(&v)
    }

    fn neighbors_in<'a>(&'a self, v: usize, subset: &'a SubsetMembership) -> Vec<usize> {
        if v >= self.n {
            return Vec::new();
        }
        let mut out: Vec<usize> = self.adjacency[v]
            .iter()
            .copied()
            .filter(|&u| subset.contains(u))
            .collect();
        out.sort_unstable();
        out
    }
}
