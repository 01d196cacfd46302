use tracing::{debug, info};

use super::listing::{AdjacencyDump, Listing};
use super::notice::Notice;
use crate::analytics::{self, GraphReport};
use crate::storage::{AdjacencyGraph, IdentityTable, StoreOptions};
use crate::types::{Namespace, NodeId, Result};

/// Weight of both relation edges and self-registration loops.
const RELATION_WEIGHT: u32 = 1;

/// Artist/song relation store.
///
/// Owns one identity table per namespace and a single graph whose node
/// indices are the identities those tables hand out. Identities come from
/// one counter shared by both namespaces and are never reused.
pub struct RelationalStore {
    artists: IdentityTable,
    songs: IdentityTable,
    graph: AdjacencyGraph,
    next_identity: usize,
}

impl RelationalStore {
    /// Opens an empty store.
    pub fn open(options: StoreOptions) -> Result<Self> {
        let store = Self {
            artists: IdentityTable::with_capacity(Namespace::Artist, options.table_capacity)?,
            songs: IdentityTable::with_capacity(Namespace::Song, options.table_capacity)?,
            graph: AdjacencyGraph::with_capacity(options.graph_capacity)?,
            next_identity: 0,
        };
        info!(
            table_capacity = options.table_capacity,
            graph_capacity = options.graph_capacity,
            "store.open"
        );
        Ok(store)
    }

    /// Records that `artist` performs `song`.
    ///
    /// Unknown names are registered first, one `Added` notice each. Every
    /// doubling of their table adds a `TableDoubled` notice ahead of it. A
    /// pair that already exists and is already related yields a single
    /// `Duplicate` notice and no change.
    pub fn insert(&mut self, artist: &str, song: &str) -> Result<Vec<Notice>> {
        let mut notices = Vec::new();
        let known_artist = self.artists.lookup(artist);
        let known_song = self.songs.lookup(song);
        if let (Some(a), Some(s)) = (known_artist, known_song) {
            if self.graph.has_edge(a, s) || self.graph.has_edge(s, a) {
                debug!(artist, song, "store.insert.duplicate");
                notices.push(Notice::Duplicate {
                    artist: artist.to_owned(),
                    song: song.to_owned(),
                });
                return Ok(notices);
            }
        }
        let a = match known_artist {
            Some(id) => id,
            None => self.register(Namespace::Artist, artist, &mut notices)?,
        };
        let s = match known_song {
            Some(id) => id,
            None => self.register(Namespace::Song, song, &mut notices)?,
        };
        self.graph.add_edge(a, s, RELATION_WEIGHT);
        self.graph.add_edge(s, a, RELATION_WEIGHT);
        debug!(artist, song, artist_id = a.0, song_id = s.0, "store.insert.relate");
        Ok(notices)
    }

    /// Removes `name` from `namespace` and every edge touching its identity.
    pub fn remove(&mut self, namespace: Namespace, name: &str) -> Vec<Notice> {
        let Some(id) = self.table_mut(namespace).delete(name) else {
            debug!(%namespace, name, "store.remove.missing");
            return vec![Notice::NotFound {
                namespace,
                name: name.to_owned(),
            }];
        };
        let mut detached = 0usize;
        for i in 0..self.graph.node_count() {
            let other = NodeId(i);
            if self.graph.remove_edge(id, other) {
                detached += 1;
            }
            if other != id && self.graph.remove_edge(other, id) {
                detached += 1;
            }
        }
        self.graph.set_label(id, None);
        debug!(%namespace, name, id = id.0, detached, "store.remove");
        vec![Notice::Removed {
            namespace,
            name: name.to_owned(),
        }]
    }

    /// Removes an artist; see [`Self::remove`].
    pub fn remove_artist(&mut self, name: &str) -> Vec<Notice> {
        self.remove(Namespace::Artist, name)
    }

    /// Removes a song; see [`Self::remove`].
    pub fn remove_song(&mut self, name: &str) -> Vec<Notice> {
        self.remove(Namespace::Song, name)
    }

    /// Live names of `namespace` in slot order.
    pub fn list(&self, namespace: Namespace) -> Listing {
        Listing::live(self.table(namespace))
    }

    /// Live artist names in slot order.
    pub fn list_artists(&self) -> Listing {
        self.list(Namespace::Artist)
    }

    /// Live song titles in slot order.
    pub fn list_songs(&self) -> Listing {
        self.list(Namespace::Song)
    }

    /// Component count, largest component size, and its diameter.
    pub fn report(&self) -> GraphReport {
        analytics::report(&self.graph)
    }

    /// Adjacency lists of every present node, for debugging.
    pub fn dump_adjacency(&self) -> AdjacencyDump {
        AdjacencyDump::capture(&self.graph)
    }

    /// Identity currently bound to `name`, if any.
    pub fn identity(&self, namespace: Namespace, name: &str) -> Option<NodeId> {
        self.table(namespace).lookup(name)
    }

    /// Identity table of `namespace`.
    pub fn table(&self, namespace: Namespace) -> &IdentityTable {
        match namespace {
            Namespace::Artist => &self.artists,
            Namespace::Song => &self.songs,
        }
    }

    /// The relation graph.
    pub fn graph(&self) -> &AdjacencyGraph {
        &self.graph
    }

    fn table_mut(&mut self, namespace: Namespace) -> &mut IdentityTable {
        match namespace {
            Namespace::Artist => &mut self.artists,
            Namespace::Song => &mut self.songs,
        }
    }

    /// Gives `name` the next identity and marks it present with a self-loop.
    fn register(
        &mut self,
        namespace: Namespace,
        name: &str,
        notices: &mut Vec<Notice>,
    ) -> Result<NodeId> {
        let candidate = NodeId(self.next_identity);
        let inserted = self.table_mut(namespace).insert(name, candidate)?;
        for _ in 0..inserted.doublings {
            notices.push(Notice::TableDoubled { namespace });
        }
        if inserted.added {
            self.next_identity += 1;
            notices.push(Notice::Added {
                namespace,
                name: name.to_owned(),
            });
        }
        let id = inserted.identity;
        self.graph.add_edge(id, id, RELATION_WEIGHT);
        self.graph.set_label(id, Some(name.to_owned()));
        Ok(id)
    }
}
