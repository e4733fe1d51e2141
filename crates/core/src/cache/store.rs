//! In-memory partitioned list cache.
//!
//! One partition per (entity kind, filter key). A write replaces the whole
//! partition; there is no element-level merge. Every eviction bumps the kind's
//! generation so write-throughs from fetches that began earlier can be dropped.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use super::key::FilterKey;
use crate::lock::{rw_read, rw_write};
use crate::model::{Category, Entity, EntityKind, Post};

const SOURCE: &str = "cache::store";

/// Capacity of the change-event channel; slow subscribers observe `Lagged`.
const EVENT_CAPACITY: usize = 256;

/// Per-kind eviction counter.
pub type Generation = u64;

/// Type-erased partition contents.
#[derive(Debug, Clone)]
pub enum Rows {
    Categories(Arc<[Category]>),
    Posts(Arc<[Post]>),
}

impl Rows {
    pub fn len(&self) -> usize {
        match self {
            Rows::Categories(rows) => rows.len(),
            Rows::Posts(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Entities that can be stored in a [`ListCache`].
pub trait Cached: Entity {
    fn into_rows(items: Arc<[Self]>) -> Rows;
    fn from_rows(rows: &Rows) -> Option<Arc<[Self]>>;
}

impl Cached for Category {
    fn into_rows(items: Arc<[Self]>) -> Rows {
        Rows::Categories(items)
    }

    fn from_rows(rows: &Rows) -> Option<Arc<[Self]>> {
        match rows {
            Rows::Categories(items) => Some(Arc::clone(items)),
            Rows::Posts(_) => None,
        }
    }
}

impl Cached for Post {
    fn into_rows(items: Arc<[Self]>) -> Rows {
        Rows::Posts(items)
    }

    fn from_rows(rows: &Rows) -> Option<Arc<[Self]>> {
        match rows {
            Rows::Posts(items) => Some(Arc::clone(items)),
            Rows::Categories(_) => None,
        }
    }
}

/// A materialized list result with its freshness marker.
#[derive(Debug, Clone)]
pub struct Partition<T> {
    pub items: Arc<[T]>,
    pub fetched_at: DateTime<Utc>,
    /// Monotonic across the whole cache; a higher version was written later.
    pub version: u64,
}

/// Change notification for subscribers of a [`ListCache`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    Written { kind: EntityKind, key: FilterKey, version: u64 },
    Evicted { kind: EntityKind, count: usize },
}

/// Partition counts per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub categories: usize,
    pub posts: usize,
}

#[derive(Debug)]
struct Stored {
    rows: Rows,
    fetched_at: DateTime<Utc>,
    version: u64,
}

#[derive(Debug, Default)]
struct Shelves {
    partitions: HashMap<(EntityKind, FilterKey), Stored>,
    generations: HashMap<EntityKind, Generation>,
    next_version: u64,
}

impl Shelves {
    fn generation(&self, kind: EntityKind) -> Generation {
        self.generations.get(&kind).copied().unwrap_or(0)
    }

    fn insert(&mut self, kind: EntityKind, key: FilterKey, rows: Rows) -> u64 {
        self.next_version += 1;
        let version = self.next_version;
        self.partitions.insert((kind, key), Stored { rows, fetched_at: Utc::now(), version });
        version
    }

    fn remove_where(&mut self, kind: EntityKind, predicate: impl Fn(&FilterKey) -> bool) -> usize {
        let before = self.partitions.len();
        self.partitions.retain(|(k, key), _| *k != kind || !predicate(key));
        *self.generations.entry(kind).or_insert(0) += 1;
        before - self.partitions.len()
    }
}

/// Process-wide list cache shared by every view.
///
/// Each operation holds the lock for its whole duration, so a reader never
/// observes a partially written partition.
#[derive(Debug)]
pub struct ListCache {
    shelves: RwLock<Shelves>,
    events: broadcast::Sender<CacheEvent>,
}

impl Default for ListCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ListCache {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { shelves: RwLock::new(Shelves::default()), events }
    }

    /// Stored partition for `key`, if any.
    pub fn read<T: Cached>(&self, key: &FilterKey) -> Option<Partition<T>> {
        let shelves = rw_read(&self.shelves, SOURCE, "read");
        let stored = shelves.partitions.get(&(T::KIND, key.clone()))?;
        let items = T::from_rows(&stored.rows)?;
        Some(Partition { items, fetched_at: stored.fetched_at, version: stored.version })
    }

    /// Replace the partition for `key` and return its new version.
    pub fn write<T: Cached>(&self, key: FilterKey, items: Vec<T>) -> u64 {
        let len = items.len();
        let version = rw_write(&self.shelves, SOURCE, "write").insert(T::KIND, key.clone(), T::into_rows(items.into()));

        debug!(kind = %T::KIND, key_digest = %key.digest(), rows = len, version, "partition written");
        self.publish(CacheEvent::Written { kind: T::KIND, key, version });
        version
    }

    /// Like [`ListCache::write`], but only if no eviction of the kind happened since
    /// `generation` was observed. Returns `None` when the write was dropped.
    pub fn write_if_current<T: Cached>(&self, key: FilterKey, items: Vec<T>, generation: Generation) -> Option<u64> {
        let len = items.len();
        let version = {
            let mut shelves = rw_write(&self.shelves, SOURCE, "write_if_current");
            let current = shelves.generation(T::KIND);
            if current != generation {
                debug!(
                    kind = %T::KIND,
                    key_digest = %key.digest(),
                    observed = generation,
                    current,
                    "stale write dropped"
                );
                return None;
            }
            shelves.insert(T::KIND, key.clone(), T::into_rows(items.into()))
        };

        debug!(kind = %T::KIND, key_digest = %key.digest(), rows = len, version, "partition written");
        self.publish(CacheEvent::Written { kind: T::KIND, key, version });
        Some(version)
    }

    /// Current eviction generation of `kind`.
    pub fn generation(&self, kind: EntityKind) -> Generation {
        rw_read(&self.shelves, SOURCE, "generation").generation(kind)
    }

    /// Remove every partition of `T` whose key matches `predicate`.
    pub fn evict<T: Cached>(&self, predicate: impl Fn(&FilterKey) -> bool) -> usize {
        self.evict_where(T::KIND, predicate)
    }

    /// Remove every partition of `T`.
    pub fn evict_all<T: Cached>(&self) -> usize {
        self.evict_kind(T::KIND)
    }

    /// Remove every partition of `kind`.
    pub fn evict_kind(&self, kind: EntityKind) -> usize {
        self.evict_where(kind, |_| true)
    }

    /// Remove every partition of every kind.
    pub fn clear(&self) -> usize {
        EntityKind::ALL.into_iter().map(|kind| self.evict_kind(kind)).sum()
    }

    /// Keys currently cached for `kind`, sorted.
    pub fn keys(&self, kind: EntityKind) -> Vec<FilterKey> {
        let shelves = rw_read(&self.shelves, SOURCE, "keys");
        let mut keys: Vec<FilterKey> =
            shelves.partitions.keys().filter(|(k, _)| *k == kind).map(|(_, key)| key.clone()).collect();
        keys.sort();
        keys
    }

    pub fn stats(&self) -> CacheStats {
        let shelves = rw_read(&self.shelves, SOURCE, "stats");
        shelves.partitions.keys().fold(CacheStats::default(), |mut stats, (kind, _)| {
            match kind {
                EntityKind::Category => stats.categories += 1,
                EntityKind::Post => stats.posts += 1,
            }
            stats
        })
    }

    /// Receive [`CacheEvent`]s for writes and evictions made after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    fn evict_where(&self, kind: EntityKind, predicate: impl Fn(&FilterKey) -> bool) -> usize {
        let count = rw_write(&self.shelves, SOURCE, "evict").remove_where(kind, predicate);

        debug!(kind = %kind, count, "partitions evicted");
        self.publish(CacheEvent::Evicted { kind, count });
        count
    }

    fn publish(&self, event: CacheEvent) {
        // No receivers is fine.
        let _ = self.events.send(event);
    }
}
