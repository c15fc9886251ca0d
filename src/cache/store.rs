//! Entry storage for the response cache
//!
//! Plain data, no locking. The facade wraps an [`EntryStore`] in a mutex and the
//! reaper sweeps it through the same mutex.

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use tokio::time::Instant;

/// A cached value and the moment it was inserted
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    /// The raw response body
    pub value: Bytes,
    /// When the entry was inserted
    pub created_at: Instant,
}

impl Entry {
    /// Age of the entry at `now`. Reads never refresh it.
    fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }
}

/// Mapping from cache key to entry
#[derive(Debug, Default)]
pub(crate) struct EntryStore {
    entries: HashMap<String, Entry>,
    /// Set once the owning cache is closed; inserts are refused from then on
    closed: bool,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the entry for `key`, stamping it with `now`
    ///
    /// # Returns
    /// `false` if the store is closed and nothing was stored
    pub fn insert(&mut self, key: impl Into<String>, value: Bytes, now: Instant) -> bool {
        if self.closed {
            return false;
        }
        self.entries.insert(
            key.into(),
            Entry {
                value,
                created_at: now,
            },
        );
        true
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        self.entries.remove(key)
    }

    /// Removes every entry whose age at `now` exceeds `ttl`
    ///
    /// # Returns
    /// The number of entries removed
    pub fn remove_expired(&mut self, now: Instant, ttl: Duration) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.age(now) <= ttl);
        before - self.entries.len()
    }

    /// Drops every entry and refuses further inserts
    pub fn close(&mut self) {
        self.closed = true;
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
