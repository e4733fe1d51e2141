//! In-memory list cache partitioned by entity kind and filter.
//!
//! This module provides:
//!
//! - Canonical filter keys (`key`)
//! - Whole-partition storage with change events (`store`)
//! - Coarse invalidation after mutations (`invalidate`)

pub mod invalidate;
pub mod key;
pub mod store;

pub use invalidate::{Invalidator, Mutation};
pub use key::FilterKey;
pub use store::{CacheEvent, CacheStats, Cached, Generation, ListCache, Partition, Rows};
