//! Cadenza: an in-memory artist/song relation store.
//!
//! Names live in two open-addressing identity tables, one per namespace.
//! Every registered name owns a node in a shared directed graph, and each
//! artist/song pairing is stored as a pair of opposite edges. On top of that
//! the [`analytics`] module reports connected components and the diameter of
//! the largest one.

#![warn(missing_docs)]

pub mod analytics;
pub mod cli;
pub mod db;
pub mod storage;
pub mod types;

pub use analytics::GraphReport;
pub use db::{Notice, RelationalStore};
pub use storage::StoreOptions;
pub use types::{CadenzaError, Namespace, NodeId, Result};
