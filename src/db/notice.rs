use std::fmt;

use serde::Serialize;

use crate::types::Namespace;

/// Separator between artist and song in scripts and duplicate notices.
pub const SEPARATOR: &str = "<SEP>";

/// User-visible outcome of a mutating store call.
///
/// Missing names and duplicate relations are expected and frequent, so they
/// travel as notices rather than errors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// A new name entered a namespace.
    Added {
        /// Namespace that received the name.
        namespace: Namespace,
        /// The inserted name.
        name: String,
    },
    /// A name was removed together with its relations.
    Removed {
        /// Namespace the name was removed from.
        namespace: Namespace,
        /// The removed name.
        name: String,
    },
    /// A removal named something the namespace does not hold.
    NotFound {
        /// Namespace that was searched.
        namespace: Namespace,
        /// The missing name.
        name: String,
    },
    /// The pair is already related; nothing changed.
    Duplicate {
        /// Artist half of the pair.
        artist: String,
        /// Song half of the pair.
        song: String,
    },
    /// A namespace table doubled its capacity.
    TableDoubled {
        /// Namespace whose table grew.
        namespace: Namespace,
    },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Added { namespace, name } => {
                write!(f, "|{name}| is added to the {namespace} database.")
            }
            Notice::Removed { namespace, name } => {
                write!(f, "|{name}| is removed from the {namespace} database.")
            }
            Notice::NotFound { namespace, name } => {
                write!(f, "|{name}| does not exist in the {namespace} database.")
            }
            Notice::Duplicate { artist, song } => write!(
                f,
                "|{artist}{SEPARATOR}{song}| duplicates a record already in the database."
            ),
            Notice::TableDoubled { namespace } => {
                write!(f, "{namespace} hash table size doubled.")
            }
        }
    }
}
