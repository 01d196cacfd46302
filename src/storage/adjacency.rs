use crate::types::{CadenzaError, NodeId, Result};
use tracing::{debug, trace};

/// One outgoing edge in a node's adjacency list.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Neighbor {
    /// Target node.
    pub neighbor: NodeId,
    /// Edge weight, always non-zero.
    pub weight: u32,
}

/// Materialized, ascending sequence of a node's neighbors.
pub struct NeighborCursor {
    neighbors: Vec<Neighbor>,
    index: usize,
}

impl NeighborCursor {
    pub(crate) fn new(neighbors: Vec<Neighbor>) -> Self {
        Self {
            neighbors,
            index: 0,
        }
    }

    /// Neighbors not yet yielded.
    pub fn len(&self) -> usize {
        self.neighbors.len() - self.index
    }

    /// `true` once the cursor is exhausted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Collects the remaining target ids.
    pub fn ids(self) -> Vec<NodeId> {
        self.map(|n| n.neighbor).collect()
    }
}

impl Iterator for NeighborCursor {
    type Item = Neighbor;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.neighbors.len() {
            return None;
        }
        let item = self.neighbors[self.index];
        self.index += 1;
        Some(item)
    }
}

/// Directed, weighted adjacency-list graph over integer node indices.
///
/// Each node owns a list of edges kept strictly ascending by target. Node
/// storage doubles whenever the logical size passes half the physical
/// capacity.
#[derive(Clone, Debug)]
pub struct AdjacencyGraph {
    lists: Vec<Vec<Neighbor>>,
    labels: Vec<Option<String>>,
    logical: usize,
    edges: usize,
}

impl AdjacencyGraph {
    /// Creates a graph with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CadenzaError::Invalid("graph capacity must be positive"));
        }
        Ok(Self {
            lists: vec![Vec::new(); capacity],
            labels: vec![None; capacity],
            logical: 0,
            edges: 0,
        })
    }

    /// Logical node count: one past the highest index ever referenced.
    pub fn node_count(&self) -> usize {
        self.logical
    }

    /// Physical capacity of the node arrays.
    pub fn capacity(&self) -> usize {
        self.lists.len()
    }

    /// Number of edges, self-loops included.
    pub fn edge_count(&self) -> usize {
        self.edges
    }

    /// Makes `index` addressable, growing the node arrays if needed.
    pub fn ensure_capacity(&mut self, index: NodeId) {
        if index.0 < self.logical {
            return;
        }
        self.logical = index.0 + 1;
        if self.logical <= self.capacity() / 2 {
            return;
        }
        let mut capacity = self.capacity();
        while self.logical > capacity / 2 {
            capacity *= 2;
        }
        debug!(from = self.capacity(), to = capacity, nodes = self.logical, "graph.grow");
        let mut lists = std::mem::take(&mut self.lists);
        let mut labels = std::mem::take(&mut self.labels);
        lists.resize_with(capacity, Vec::new);
        labels.resize(capacity, None);
        self.lists = lists;
        self.labels = labels;
    }

    /// Adds `v -> w` or overwrites its weight. A zero weight is ignored.
    pub fn add_edge(&mut self, v: NodeId, w: NodeId, weight: u32) {
        self.ensure_capacity(v);
        self.ensure_capacity(w);
        if weight == 0 {
            return;
        }
        let list = &mut self.lists[v.0];
        match list.binary_search_by_key(&w, |n| n.neighbor) {
            Ok(pos) => list[pos].weight = weight,
            Err(pos) => {
                list.insert(pos, Neighbor { neighbor: w, weight });
                self.edges += 1;
            }
        }
        trace!(src = v.0, dst = w.0, weight, "graph.add_edge");
    }

    /// Removes `v -> w`, returning whether it existed.
    pub fn remove_edge(&mut self, v: NodeId, w: NodeId) -> bool {
        let Some(list) = self.lists.get_mut(v.0) else {
            return false;
        };
        match list.binary_search_by_key(&w, |n| n.neighbor) {
            Ok(pos) => {
                list.remove(pos);
                self.edges -= 1;
                trace!(src = v.0, dst = w.0, "graph.remove_edge");
                true
            }
            Err(_) => false,
        }
    }

    /// Weight of `v -> w`, or 0 when there is no such edge.
    pub fn weight(&self, v: NodeId, w: NodeId) -> u32 {
        self.lists
            .get(v.0)
            .and_then(|list| {
                list.binary_search_by_key(&w, |n| n.neighbor)
                    .ok()
                    .map(|pos| list[pos].weight)
            })
            .unwrap_or(0)
    }

    /// `true` if `v -> w` exists.
    pub fn has_edge(&self, v: NodeId, w: NodeId) -> bool {
        self.weight(v, w) != 0
    }

    /// Outgoing neighbors of `v` in ascending order.
    pub fn neighbors(&self, v: NodeId) -> NeighborCursor {
        let list = self.lists.get(v.0).cloned().unwrap_or_default();
        NeighborCursor::new(list)
    }

    pub(crate) fn edges_from(&self, v: usize) -> &[Neighbor] {
        self.lists.get(v).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `true` if `v` has at least one outgoing edge, its self-loop included.
    pub fn is_present(&self, v: NodeId) -> bool {
        !self.edges_from(v.0).is_empty()
    }

    /// Name registered at `v`, if any.
    pub fn label(&self, v: NodeId) -> Option<&str> {
        self.labels.get(v.0).and_then(|label| label.as_deref())
    }

    /// Sets or clears the name shown for `v`.
    pub fn set_label(&mut self, v: NodeId, label: Option<String>) {
        self.ensure_capacity(v);
        self.labels[v.0] = label;
    }
}
