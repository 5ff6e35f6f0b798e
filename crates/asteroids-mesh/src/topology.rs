//! Edge bookkeeping for triangle lists: canonical edges and watertightness checks.

use rustc_hash::FxHashMap;

use crate::mesh::IndexType;

/// An undirected edge stored with the lower vertex index first.
///
/// Both `Edge::new(a, b)` and `Edge::new(b, a)` compare equal, which is what
/// lets adjacent triangles find each other's midpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    /// Lower vertex index.
    pub v0: IndexType,
    /// Higher vertex index.
    pub v1: IndexType,
}

impl Edge {
    /// Create a canonical edge from two endpoints in any order.
    #[inline]
    pub fn new(a: IndexType, b: IndexType) -> Self {
        if a <= b {
            Self { v0: a, v1: b }
        } else {
            Self { v0: b, v1: a }
        }
    }
}

/// Count how many triangles use each distinct edge.
pub fn edge_use_counts(indices: &[IndexType]) -> FxHashMap<Edge, u32> {
    let mut counts = FxHashMap::default();
    for tri in indices.chunks_exact(3) {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            *counts.entry(Edge::new(a, b)).or_insert(0) += 1;
        }
    }
    counts
}

/// Number of distinct undirected edges in a triangle list.
pub fn distinct_edge_count(indices: &[IndexType]) -> usize {
    edge_use_counts(indices).len()
}

/// Returns `true` if every edge is shared by exactly two triangles.
pub fn is_closed(indices: &[IndexType]) -> bool {
    !indices.is_empty() && edge_use_counts(indices).values().all(|&n| n == 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_is_canonical() {
        assert_eq!(Edge::new(7, 3), Edge::new(3, 7));
        assert_eq!(Edge::new(7, 3).v0, 3);
    }

    #[test]
    fn test_single_triangle_is_open() {
        assert!(!is_closed(&[0, 1, 2]));
        assert_eq!(distinct_edge_count(&[0, 1, 2]), 3);
    }

    #[test]
    fn test_tetrahedron_is_closed() {
        let tetra = [0, 1, 2, 0, 3, 1, 1, 3, 2, 2, 3, 0];
        assert!(is_closed(&tetra));
        assert_eq!(distinct_edge_count(&tetra), 6);
    }

    #[test]
    fn test_empty_list_is_not_closed() {
        assert!(!is_closed(&[]));
    }
}
