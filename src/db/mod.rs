//! Relational coordinator over the identity tables and the graph.

mod listing;
mod notice;
mod store;


pub use listing::{AdjacencyDump, ListedSlot, Listing, NodeEdges};
pub use notice::{Notice, SEPARATOR};
pub use store::RelationalStore;
