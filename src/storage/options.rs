use serde::{Deserialize, Serialize};

/// Default slot count for each identity table.
pub const DEFAULT_TABLE_CAPACITY: usize = 10;
/// Default node capacity for the adjacency graph.
pub const DEFAULT_GRAPH_CAPACITY: usize = 10;

/// Configuration options supplied when opening a [`crate::db::RelationalStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Initial slot count of the artist and song tables.
    pub table_capacity: usize,
    /// Initial node capacity of the graph.
    pub graph_capacity: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            table_capacity: DEFAULT_TABLE_CAPACITY,
            graph_capacity: DEFAULT_GRAPH_CAPACITY,
        }
    }
}

impl StoreOptions {
    /// Creates options with default capacities.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial identity table capacity.
    pub fn table_capacity(mut self, slots: usize) -> Self {
        self.table_capacity = slots;
        self
    }

    /// Sets the initial graph node capacity.
    pub fn graph_capacity(mut self, nodes: usize) -> Self {
        self.graph_capacity = nodes;
        self
    }
}
