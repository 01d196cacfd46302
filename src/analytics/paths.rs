//! Dense all-pairs shortest paths (Floyd–Warshall).
//!
//! Cost is cubic in the node count and memory quadratic. The matrix is
//! rebuilt per query, which bounds how large a store can usefully report on.

use crate::storage::AdjacencyGraph;

/// Distance used for unreachable pairs.
pub const INFINITY: u64 = u64::MAX;

/// Square matrix of shortest path lengths between node indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceMatrix {
    n: usize,
    cells: Vec<u64>,
}

impl DistanceMatrix {
    /// Computes shortest paths over every logical node of `graph`.
    pub fn compute(graph: &AdjacencyGraph) -> Self {
        let n = graph.node_count();
        let mut d = Self {
            n,
            cells: vec![INFINITY; n * n],
        };
        for i in 0..n {
            for edge in graph.edges_from(i) {
                d.set(i, edge.neighbor.0, u64::from(edge.weight));
            }
            d.set(i, i, 0);
        }
        for k in 0..n {
            for i in 0..n {
                let ik = d.get(i, k);
                if ik == INFINITY {
                    continue;
                }
                for j in 0..n {
                    let kj = d.get(k, j);
                    if kj == INFINITY {
                        continue;
                    }
                    let through = ik + kj;
                    if through < d.get(i, j) {
                        d.set(i, j, through);
                    }
                }
            }
        }
        d
    }

    /// Side length of the matrix.
    pub fn size(&self) -> usize {
        self.n
    }

    /// Distance from `i` to `j`, [`INFINITY`] when unreachable.
    pub fn get(&self, i: usize, j: usize) -> u64 {
        self.cells[i * self.n + j]
    }

    fn set(&mut self, i: usize, j: usize, value: u64) {
        self.cells[i * self.n + j] = value;
    }

    /// Greatest finite off-diagonal distance in the whole matrix.
    pub fn diameter(&self) -> u64 {
        let all: Vec<usize> = (0..self.n).collect();
        self.diameter_among(&all)
    }

    /// Greatest finite distance between two distinct members of `nodes`.
    pub fn diameter_among(&self, nodes: &[usize]) -> u64 {
        let mut best = 0;
        for &i in nodes {
            for &j in nodes {
                if i == j {
                    continue;
                }
                let dist = self.get(i, j);
                if dist != INFINITY && dist > best {
                    best = dist;
                }
            }
        }
        best
    }
}
