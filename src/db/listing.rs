use std::fmt;

use serde::Serialize;

use crate::storage::catalog::{IdentityTable, Slot, TOMBSTONE_LABEL};
use crate::storage::AdjacencyGraph;
use crate::types::{Namespace, NodeId};

/// One non-empty table slot as shown in a listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ListedSlot {
    /// A live name at `slot`.
    Live {
        /// Physical slot index.
        slot: usize,
        /// Stored name.
        name: String,
    },
    /// A deleted slot awaiting the next rehash.
    Tombstone {
        /// Physical slot index.
        slot: usize,
    },
}

/// Snapshot of a namespace table in physical slot order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Listing {
    /// Namespace the slots belong to.
    pub namespace: Namespace,
    /// Listed slots, ascending by index.
    pub slots: Vec<ListedSlot>,
    /// Number of live names.
    pub total: usize,
}

impl Listing {
    /// Lists live entries only.
    pub fn live(table: &IdentityTable) -> Self {
        let slots = table
            .entries()
            .map(|(slot, entry)| ListedSlot::Live {
                slot,
                name: entry.key.clone(),
            })
            .collect();
        Self {
            namespace: table.namespace(),
            slots,
            total: table.len(),
        }
    }

    /// Lists live entries and tombstones.
    pub fn with_tombstones(table: &IdentityTable) -> Self {
        let slots = table
            .slots()
            .filter_map(|(slot, state)| match state {
                Slot::Occupied(entry) => Some(ListedSlot::Live {
                    slot,
                    name: entry.key.clone(),
                }),
                Slot::Tombstone => Some(ListedSlot::Tombstone { slot }),
                Slot::Empty => None,
            })
            .collect();
        Self {
            namespace: table.namespace(),
            slots,
            total: table.len(),
        }
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for slot in &self.slots {
            match slot {
                ListedSlot::Live { slot, name } => writeln!(f, "{slot}: |{name}|")?,
                ListedSlot::Tombstone { slot } => writeln!(f, "{slot}: {TOMBSTONE_LABEL}")?,
            }
        }
        write!(f, "total {}s: {}", self.namespace.keyword(), self.total)
    }
}

/// Outgoing edges of one present node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NodeEdges {
    /// Node index.
    pub node: NodeId,
    /// Name registered at the node, if still live.
    pub label: Option<String>,
    /// `(target, weight)` pairs in ascending target order.
    pub edges: Vec<(NodeId, u32)>,
}

/// Adjacency lists of every present node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AdjacencyDump {
    /// Present nodes in index order.
    pub nodes: Vec<NodeEdges>,
    /// Total edge count, self-loops included.
    pub edge_count: usize,
}

impl AdjacencyDump {
    /// Snapshots the lists of every present node.
    pub fn capture(graph: &AdjacencyGraph) -> Self {
        let nodes = (0..graph.node_count())
            .map(NodeId)
            .filter(|&v| graph.is_present(v))
            .map(|v| NodeEdges {
                node: v,
                label: graph.label(v).map(str::to_owned),
                edges: graph.neighbors(v).map(|n| (n.neighbor, n.weight)).collect(),
            })
            .collect();
        Self {
            nodes,
            edge_count: graph.edge_count(),
        }
    }
}

impl fmt::Display for AdjacencyDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            write!(f, "{} [{}]:", node.node, node.label.as_deref().unwrap_or("-"))?;
            for (target, weight) in &node.edges {
                write!(f, " {target}:{weight}")?;
            }
            writeln!(f)?;
        }
        write!(f, "total edges: {}", self.edge_count)
    }
}
