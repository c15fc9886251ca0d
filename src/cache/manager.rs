//! Response cache facade
//!
//! Provides `ResponseCache`, the only way the rest of the application touches
//! cached response bodies. The cache owns its reaper task and releases it on
//! [`ResponseCache::close`] or drop.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::time::Instant;
use tracing::debug;

use super::reaper::ReaperHandle;
use super::store::EntryStore;

/// Errors that can occur when constructing a cache
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CacheError {
    /// The TTL was zero
    #[error("cache TTL must be greater than zero")]
    InvalidTtl,

    /// No tokio runtime was available to run the reaper on
    #[error("a tokio runtime is required to start the cache reaper")]
    NoRuntime,
}

/// Thread-safe, time-bounded cache of raw response bodies keyed by URL
///
/// Every entry shares the same TTL. Expiry is handled only by the background
/// reaper, which sweeps once per TTL, so `get` can return an entry for up to one
/// extra TTL after it logically expired. Reads never refresh an entry's age.
///
/// A cache holds a background task: call [`close`](Self::close) when done with it
/// to stop the task and wait for it to exit. A closed cache stores nothing.
#[derive(Debug)]
pub struct ResponseCache {
    /// Entries, shared with the reaper
    store: Arc<Mutex<EntryStore>>,
    /// Maximum entry age and sweep period
    ttl: Duration,
    /// Running reaper, `None` once closed. Held across the shutdown await so
    /// concurrent `close` calls all wait for the task to exit.
    reaper: tokio::sync::Mutex<Option<ReaperHandle>>,
}

impl ResponseCache {
    /// Creates an empty cache and starts its reaper on the current tokio runtime
    ///
    /// Returns immediately; the reaper runs in the background.
    ///
    /// # Arguments
    /// * `ttl` - How long entries live, and how often the reaper sweeps
    ///
    /// # Returns
    /// * `Ok(ResponseCache)` on success
    /// * `Err(CacheError::InvalidTtl)` if `ttl` is zero
    /// * `Err(CacheError::NoRuntime)` if called outside a tokio runtime
    pub fn new(ttl: Duration) -> Result<Self, CacheError> {
        if ttl.is_zero() {
            return Err(CacheError::InvalidTtl);
        }
        tokio::runtime::Handle::try_current().map_err(|_| CacheError::NoRuntime)?;

        let store = Arc::new(Mutex::new(EntryStore::new()));
        let reaper = ReaperHandle::spawn(store.clone(), ttl);

        Ok(Self {
            store,
            ttl,
            reaper: tokio::sync::Mutex::new(Some(reaper)),
        })
    }

    /// Inserts or overwrites the entry for `key`, resetting its age
    ///
    /// Does nothing once the cache is closed, since no reaper is left to expire
    /// the entry.
    pub fn add(&self, key: &str, value: impl Into<Bytes>) {
        if !self.store.lock().insert(key, value.into(), Instant::now()) {
            debug!(key, "cache closed, response not stored");
        }
    }

    /// Returns the value stored for `key`, if any
    ///
    /// Does not check the entry's age; an entry stays visible until a sweep
    /// removes it.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        let value = self.store.lock().get(key).map(|entry| entry.value.clone());
        debug!(key, hit = value.is_some(), "cache lookup");
        value
    }

    /// Removes the entry for `key`; does nothing if it is absent
    pub fn delete(&self, key: &str) {
        self.store.lock().remove(key);
    }

    /// The TTL this cache was created with
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of entries currently stored, expired or not
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops all entries, stops the reaper and waits for it to exit
    ///
    /// Every caller, including concurrent ones, returns only after the reaper
    /// has exited. After closing, `add` stores nothing and `get` always misses.
    pub async fn close(&self) {
        let mut reaper = self.reaper.lock().await;
        self.store.lock().close();
        if let Some(reaper) = reaper.take() {
            reaper.shutdown().await;
        }
    }
}
