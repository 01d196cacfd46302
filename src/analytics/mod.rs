//! Structural queries over the adjacency graph.
//!
//! Every structure built here is derived from a graph snapshot and dropped
//! when the query returns.

/// Shortest path matrix and diameter.
pub mod paths;
/// Disjoint-set forest for component grouping.
pub mod union_find;

use std::fmt;
use std::time::Instant;

use serde::Serialize;
use tracing::debug;

use crate::storage::AdjacencyGraph;
use crate::types::NodeId;

pub use paths::{DistanceMatrix, INFINITY};
pub use union_find::UnionFind;

/// Component count, largest component size, and its diameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GraphReport {
    /// Number of connected components among present nodes.
    pub components: usize,
    /// Node count of the largest component.
    pub largest_component: usize,
    /// Longest shortest path inside the largest component.
    pub diameter: u64,
}

impl fmt::Display for GraphReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "There are {} connected components", self.components)?;
        writeln!(
            f,
            "The largest connected component has {} elements",
            self.largest_component
        )?;
        write!(
            f,
            "The diameter of the largest component is {}",
            self.diameter
        )
    }
}

/// Groups present nodes into components, joining the endpoints of every edge.
pub fn components(graph: &AdjacencyGraph) -> UnionFind {
    let n = graph.node_count();
    let mut forest = UnionFind::new(n);
    for v in 0..n {
        for edge in graph.edges_from(v) {
            forest.union(v, edge.neighbor.0);
        }
    }
    forest
}

/// Present nodes grouped by component root.
///
/// Groups are ordered by their lowest member and list members ascending.
pub fn present_groups(graph: &AdjacencyGraph, forest: &UnionFind) -> Vec<Vec<usize>> {
    let n = graph.node_count();
    let mut slot_of_root: Vec<Option<usize>> = vec![None; n];
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for v in (0..n).filter(|&v| graph.is_present(NodeId(v))) {
        let root = forest.find(v);
        let slot = *slot_of_root[root].get_or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(v);
    }
    groups
}

/// Present members of the largest component, in ascending index order.
///
/// Ties go to the component holding the lowest present index.
pub fn largest_component(graph: &AdjacencyGraph, forest: &UnionFind) -> Vec<usize> {
    pick_largest(&present_groups(graph, forest)).to_vec()
}

fn pick_largest(groups: &[Vec<usize>]) -> &[usize] {
    let mut best: &[usize] = &[];
    for group in groups {
        if group.len() > best.len() {
            best = group.as_slice();
        }
    }
    best
}

/// Builds the three-figure report for `graph`.
pub fn report(graph: &AdjacencyGraph) -> GraphReport {
    let started = Instant::now();
    let forest = components(graph);
    let groups = present_groups(graph, &forest);
    if groups.is_empty() {
        return GraphReport::default();
    }
    let largest = pick_largest(&groups);
    let diameter = DistanceMatrix::compute(graph).diameter_among(largest);
    let report = GraphReport {
        components: groups.len(),
        largest_component: largest.len(),
        diameter,
    };
    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        components = report.components,
        largest = report.largest_component,
        diameter = report.diameter,
        elapsed_us = started.elapsed().as_micros() as u64,
        "analytics.report"
    );
    report
}
