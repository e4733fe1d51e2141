//! Coarse invalidation after mutations.
//!
//! Any successful create, update or delete evicts every partition of the mutated
//! kind. Categories and posts invalidate independently: a post moving to another
//! category leaves category partitions alone.

use std::fmt;
use std::sync::Arc;

use tracing::info;

use super::store::ListCache;
use crate::model::EntityKind;

/// A write operation that succeeded on the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mutation::Create => "create",
            Mutation::Update => "update",
            Mutation::Delete => "delete",
        })
    }
}

/// Evicts stale partitions after mutations.
#[derive(Debug, Clone)]
pub struct Invalidator {
    cache: Arc<ListCache>,
}

impl Invalidator {
    pub fn new(cache: Arc<ListCache>) -> Self {
        Self { cache }
    }

    /// Evict every partition of `kind`. Returns the number evicted.
    pub fn after_mutation(&self, kind: EntityKind, mutation: Mutation) -> usize {
        let evicted = self.cache.evict_kind(kind);
        info!(kind = %kind, mutation = %mutation, evicted, "Invalidated list partitions");
        evicted
    }
}
