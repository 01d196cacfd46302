//! In-memory storage structures backing a store.
//!
//! Holds the per-namespace identity dictionaries and the adjacency graph
//! keyed by the identities they hand out.

/// Name to identity dictionaries.
///
/// Open-addressing tables with quadratic probing and tombstone deletion.
pub mod catalog;

mod adjacency;
mod options;

/// Adjacency graph and neighbor enumeration.
pub use adjacency::{AdjacencyGraph, Neighbor, NeighborCursor};

/// Identity table types.
pub use catalog::{Entry, IdentityTable, Inserted, Slot};

/// Store configuration options.
pub use options::{StoreOptions, DEFAULT_GRAPH_CAPACITY, DEFAULT_TABLE_CAPACITY};
