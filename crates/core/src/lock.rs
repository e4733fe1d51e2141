//! Poison-tolerant lock helpers.
//!
//! Cache and notification state stays usable after a panic in another task; the
//! recovery is logged with the owning module and operation.

use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

pub(crate) fn rw_read<'a, T>(lock: &'a RwLock<T>, target: &'static str, op: &'static str) -> RwLockReadGuard<'a, T> {
    lock.read().unwrap_or_else(|poisoned| {
        warn!(op, target_module = target, lock_kind = "rwlock.read", "Recovered from poisoned lock");
        poisoned.into_inner()
    })
}

pub(crate) fn rw_write<'a, T>(lock: &'a RwLock<T>, target: &'static str, op: &'static str) -> RwLockWriteGuard<'a, T> {
    lock.write().unwrap_or_else(|poisoned| {
        warn!(op, target_module = target, lock_kind = "rwlock.write", "Recovered from poisoned lock");
        poisoned.into_inner()
    })
}

pub(crate) fn mutex_lock<'a, T>(lock: &'a Mutex<T>, target: &'static str, op: &'static str) -> MutexGuard<'a, T> {
    lock.lock().unwrap_or_else(|poisoned| {
        warn!(op, target_module = target, lock_kind = "mutex.lock", "Recovered from poisoned lock");
        poisoned.into_inner()
    })
}
