//! # Per-Transaction Locks
//!
//! sled makes single reads and writes atomic, but signing and redaction
//! both load a record, change it, and put it back under the same hash.
//! [`TxLocks`] serializes those read-modify-write spans per hash so one
//! writer never overwrites the other's change with a stale copy.
//!
//! Entries exist only while a span is running or waiting. The last holder
//! out removes the entry, so the table stays as large as the number of
//! hashes currently being rewritten.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

use crate::transaction::TxHash;

/// Shared table of per-hash mutexes. Clones share the table.
#[derive(Debug, Clone, Default)]
pub struct TxLocks {
    inner: Arc<DashMap<TxHash, Arc<Mutex<()>>>>,
}

impl TxLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `hash`.
    ///
    /// Not reentrant: `f` must not take the lock for the same hash again.
    pub fn with<T>(&self, hash: &TxHash, f: impl FnOnce() -> T) -> T {
        // Clone the Arc out so the map shard is released before we block.
        let lock = self
            .inner
            .entry(*hash)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let out = {
            let _guard = lock.lock();
            f()
        };

        drop(lock);
        // Only the map's own reference left means nobody holds or waits.
        // `remove_if` runs under the shard lock, the same lock `entry`
        // takes, so no one can clone the Arc between the check and the
        // removal.
        self.inner
            .remove_if(hash, |_, lock| Arc::strong_count(lock) == 1);
        out
    }

    /// Hashes with a span running or waiting.
    pub fn active(&self) -> usize {
        self.inner.len()
    }
}
