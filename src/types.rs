#![forbid(unsafe_code)]

//! Identifier newtypes, entity namespaces, and the crate-wide error type.

use std::fmt;

use serde::Serialize;

/// Integer identity assigned to a name the first time it is seen.
///
/// Identities double as node indices in the adjacency graph.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Returns the identity as a graph index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for NodeId {
    fn from(value: usize) -> Self {
        NodeId(value)
    }
}

impl From<NodeId> for usize {
    fn from(value: NodeId) -> Self {
        value.0
    }
}

/// The two entity namespaces kept by a store.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    /// Artist names.
    Artist,
    /// Song titles.
    Song,
}

impl Namespace {
    /// Capitalised label used in notices ("Artist", "Song").
    pub const fn label(self) -> &'static str {
        match self {
            Namespace::Artist => "Artist",
            Namespace::Song => "Song",
        }
    }

    /// Lower-case keyword used by scripts and listings ("artist", "song").
    pub const fn keyword(self) -> &'static str {
        match self {
            Namespace::Artist => "artist",
            Namespace::Song => "song",
        }
    }

    /// Parses a script keyword.
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "artist" => Some(Namespace::Artist),
            "song" => Some(Namespace::Song),
            _ => None,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors surfaced by the store.
///
/// Missing names and duplicate relations are reported as
/// [`crate::db::Notice`] values, not errors.
#[derive(thiserror::Error, Debug)]
pub enum CadenzaError {
    /// I/O failure while reading a script or writing output.
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    /// A probe sequence was exhausted even after the table grew.
    #[error("{namespace} identity table exhausted at capacity {capacity}")]
    CapacityExhausted {
        /// Namespace of the failing table.
        namespace: Namespace,
        /// Capacity after the retry growth.
        capacity: usize,
    },
    /// Caller supplied an unusable argument.
    #[error("invalid argument: {0}")]
    Invalid(&'static str),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CadenzaError>;
