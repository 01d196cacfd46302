#![forbid(unsafe_code)]

use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::{CadenzaError, Namespace, NodeId, Result};
use tracing::{debug, error, trace, warn};

/// Text shown in place of a deleted slot in debug dumps.
pub const TOMBSTONE_LABEL: &str = "TOMBSTONE";

/// A live dictionary record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// The name as inserted.
    pub key: String,
    /// Identity assigned on first insert.
    pub identity: NodeId,
}

/// State of a single table slot.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Slot {
    /// Never written since the last rehash.
    #[default]
    Empty,
    /// Deleted; probing continues past it.
    Tombstone,
    /// Holds a live entry.
    Occupied(Entry),
}

impl Slot {
    /// Returns the live entry, if any.
    pub fn entry(&self) -> Option<&Entry> {
        match self {
            Slot::Occupied(entry) => Some(entry),
            _ => None,
        }
    }
}

/// Outcome of [`IdentityTable::insert`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Inserted {
    /// Identity now stored under the key (the existing one for duplicates).
    pub identity: NodeId,
    /// `false` when the key was already present.
    pub added: bool,
    /// Number of times the table doubled during this call.
    pub doublings: usize,
}

impl Inserted {
    /// `true` if the table grew at all during this call.
    pub fn grew(&self) -> bool {
        self.doublings > 0
    }
}

/// Relaxed counters updated on every table operation.
#[derive(Default)]
pub struct TableMetrics {
    lookups: AtomicU64,
    lookup_misses: AtomicU64,
    inserts: AtomicU64,
    growths: AtomicU64,
    tombstones: AtomicU64,
}

/// Point-in-time copy of [`TableMetrics`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TableMetricsSnapshot {
    /// Calls to `lookup`.
    pub lookups: u64,
    /// Lookups that found nothing.
    pub lookup_misses: u64,
    /// Keys newly placed.
    pub inserts: u64,
    /// Capacity doublings.
    pub growths: u64,
    /// Tombstones written by deletes.
    pub tombstones: u64,
}

impl TableMetricsSnapshot {
    /// Fraction of lookups that hit; 0 before the first lookup.
    pub fn lookup_hit_rate(&self) -> f64 {
        if self.lookups == 0 {
            return 0.0;
        }
        (self.lookups - self.lookup_misses) as f64 / self.lookups as f64
    }
}

impl TableMetrics {
    /// Reads every counter.
    pub fn snapshot(&self) -> TableMetricsSnapshot {
        TableMetricsSnapshot {
            lookups: self.lookups.load(Ordering::Relaxed),
            lookup_misses: self.lookup_misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            growths: self.growths.load(Ordering::Relaxed),
            tombstones: self.tombstones.load(Ordering::Relaxed),
        }
    }

    fn inc(&self, counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Home slot of `key` in a table of `capacity` slots.
///
/// Folds the UTF-16 code units in groups of four, weighting each unit by
/// `256^position` within its group. All groups feed one running sum, which
/// is never reset between groups.
pub fn home_slot(key: &str, capacity: usize) -> usize {
    debug_assert!(capacity > 0, "home_slot on empty table");
    let units: Vec<u16> = key.encode_utf16().collect();
    let mut sum: i64 = 0;
    for chunk in units.chunks(4) {
        let mut mult: i64 = 1;
        for &unit in chunk {
            sum = sum.wrapping_add(i64::from(unit).wrapping_mul(mult));
            mult = mult.wrapping_mul(256);
        }
    }
    (sum.unsigned_abs() % capacity as u64) as usize
}

fn probe(home: usize, step: usize, capacity: usize) -> usize {
    let step = step as u128;
    ((home as u128 + step * step) % capacity as u128) as usize
}

enum Placement {
    Existing(NodeId),
    Free(usize),
    Exhausted,
}

/// Open-addressing name → identity dictionary for one namespace.
///
/// Uses quadratic probing over a tri-state slot array and doubles before an
/// insert would push the live count past half the capacity.
pub struct IdentityTable {
    slots: Vec<Slot>,
    occupied: usize,
    namespace: Namespace,
    metrics: TableMetrics,
}

impl IdentityTable {
    /// Creates an empty table with `capacity` slots.
    pub fn with_capacity(namespace: Namespace, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CadenzaError::Invalid("identity table capacity must be positive"));
        }
        Ok(Self {
            slots: vec![Slot::Empty; capacity],
            occupied: 0,
            namespace,
            metrics: TableMetrics::default(),
        })
    }

    /// Namespace this table serves.
    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// Physical slot count.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.occupied
    }

    /// `true` when no live entries remain.
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Current operation counters.
    pub fn metrics_snapshot(&self) -> TableMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Looks up the identity stored under `key`.
    ///
    /// Stops at the first empty slot; tombstones are stepped over.
    pub fn lookup(&self, key: &str) -> Option<NodeId> {
        self.metrics.inc(&self.metrics.lookups);
        let found = self.find_slot(key).and_then(|pos| self.slots[pos].entry());
        match found {
            Some(entry) => {
                trace!(namespace = %self.namespace, key, id = entry.identity.0, "catalog.lookup.hit");
                Some(entry.identity)
            }
            None => {
                self.metrics.inc(&self.metrics.lookup_misses);
                trace!(namespace = %self.namespace, key, "catalog.lookup.miss");
                None
            }
        }
    }

    /// Returns `true` if `key` is live in the table.
    pub fn contains(&self, key: &str) -> bool {
        self.find_slot(key).is_some()
    }

    /// Inserts `key` with `identity` unless it is already present.
    ///
    /// A duplicate key keeps its existing identity and reports `added =
    /// false`. If the probe sequence cannot place the key the table grows and
    /// the placement is retried once.
    pub fn insert(&mut self, key: &str, identity: NodeId) -> Result<Inserted> {
        let mut doublings = 0;
        if self.occupied >= self.capacity() / 2 {
            doublings += self.grow();
        }
        let mut placement = self.place(key);
        if matches!(placement, Placement::Exhausted) {
            warn!(
                namespace = %self.namespace,
                key,
                capacity = self.capacity(),
                "catalog.insert.probe_exhausted"
            );
            doublings += self.grow();
            placement = self.place(key);
        }
        match placement {
            Placement::Existing(existing) => {
                trace!(namespace = %self.namespace, key, id = existing.0, "catalog.insert.duplicate");
                Ok(Inserted {
                    identity: existing,
                    added: false,
                    doublings,
                })
            }
            Placement::Free(pos) => {
                self.slots[pos] = Slot::Occupied(Entry {
                    key: key.to_owned(),
                    identity,
                });
                self.occupied += 1;
                self.metrics.inc(&self.metrics.inserts);
                trace!(namespace = %self.namespace, key, id = identity.0, slot = pos, "catalog.insert");
                Ok(Inserted {
                    identity,
                    added: true,
                    doublings,
                })
            }
            Placement::Exhausted => {
                error!(
                    namespace = %self.namespace,
                    key,
                    capacity = self.capacity(),
                    "catalog.insert.exhausted_after_growth"
                );
                Err(CadenzaError::CapacityExhausted {
                    namespace: self.namespace,
                    capacity: self.capacity(),
                })
            }
        }
    }

    /// Tombstones `key`, returning the identity it held.
    pub fn delete(&mut self, key: &str) -> Option<NodeId> {
        let pos = self.find_slot(key)?;
        let removed = std::mem::replace(&mut self.slots[pos], Slot::Tombstone);
        self.occupied -= 1;
        self.metrics.inc(&self.metrics.tombstones);
        let identity = removed.entry().map(|entry| entry.identity);
        trace!(namespace = %self.namespace, key, slot = pos, "catalog.delete");
        identity
    }

    /// Iterates live entries in physical slot order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &Entry)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(pos, slot)| slot.entry().map(|entry| (pos, entry)))
    }

    /// Iterates every non-empty slot, tombstones included.
    pub fn slots(&self) -> impl Iterator<Item = (usize, &Slot)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| !matches!(slot, Slot::Empty))
    }

    fn find_slot(&self, key: &str) -> Option<usize> {
        let capacity = self.capacity();
        let home = home_slot(key, capacity);
        for step in 0..capacity {
            let pos = probe(home, step, capacity);
            match &self.slots[pos] {
                Slot::Empty => return None,
                Slot::Tombstone => continue,
                Slot::Occupied(entry) if entry.key == key => return Some(pos),
                Slot::Occupied(_) => continue,
            }
        }
        None
    }

    fn place(&self, key: &str) -> Placement {
        let capacity = self.capacity();
        let home = home_slot(key, capacity);
        let mut reusable = None;
        for step in 0..capacity {
            let pos = probe(home, step, capacity);
            match &self.slots[pos] {
                Slot::Empty => return Placement::Free(reusable.unwrap_or(pos)),
                Slot::Tombstone => {
                    reusable.get_or_insert(pos);
                }
                Slot::Occupied(entry) if entry.key == key => {
                    return Placement::Existing(entry.identity)
                }
                Slot::Occupied(_) => {}
            }
        }
        match reusable {
            Some(pos) => Placement::Free(pos),
            None => Placement::Exhausted,
        }
    }

    /// Doubles the capacity, rehashing live entries and dropping tombstones.
    ///
    /// Keeps doubling while some live entry cannot be placed; returns how
    /// many doublings it took.
    fn grow(&mut self) -> usize {
        let mut capacity = self.capacity() * 2;
        let mut doublings = 1;
        let rebuilt = loop {
            match rehash(&self.slots, capacity) {
                Some(slots) => break slots,
                None => {
                    capacity *= 2;
                    doublings += 1;
                }
            }
        };
        debug!(
            namespace = %self.namespace,
            from = self.capacity(),
            to = capacity,
            live = self.occupied,
            "catalog.grow"
        );
        self.slots = rebuilt;
        self.metrics
            .growths
            .fetch_add(doublings as u64, Ordering::Relaxed);
        doublings
    }
}

/// Places every live entry of `old` into a fresh array of `capacity` slots.
fn rehash(old: &[Slot], capacity: usize) -> Option<Vec<Slot>> {
    let mut slots = vec![Slot::Empty; capacity];
    for entry in old.iter().filter_map(Slot::entry) {
        let home = home_slot(&entry.key, capacity);
        let pos = (0..capacity)
            .map(|step| probe(home, step, capacity))
            .find(|&pos| matches!(slots[pos], Slot::Empty))?;
        slots[pos] = Slot::Occupied(entry.clone());
    }
    Some(slots)
}
