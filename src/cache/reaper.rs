//! Background expiry for the response cache
//!
//! The reaper is a tokio task that wakes once per TTL and evicts expired entries
//! under a single acquisition of the cache lock. It stops when told to through
//! its handle, or when the handle is dropped.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use super::store::EntryStore;

/// Handle for stopping a running reaper task
#[derive(Debug)]
pub(crate) struct ReaperHandle {
    /// Signals the task to stop; dropping it has the same effect
    shutdown_tx: mpsc::Sender<()>,
    /// The running task
    task: JoinHandle<()>,
}

impl ReaperHandle {
    /// Spawns a reaper on the current tokio runtime
    ///
    /// # Arguments
    /// * `store` - The storage to sweep, shared with the cache facade
    /// * `ttl` - Both the sweep period and the maximum entry age
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime. The facade checks for one first.
    pub fn spawn(store: Arc<Mutex<EntryStore>>, ttl: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let task = tokio::spawn(async move {
            info!(?ttl, "cache reaper started");
            let mut interval = tokio::time::interval(ttl);
            // Skip the first tick (immediate)
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        sweep(&store, ttl);
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }

            info!("cache reaper stopped");
        });

        Self { shutdown_tx, task }
    }

    /// Stops the reaper and waits for the task to exit
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        // The task never panics; a JoinError here only means it was already cancelled.
        let _ = self.task.await;
    }
}

/// Evicts every entry older than `ttl`, holding the lock for the whole pass
pub(crate) fn sweep(store: &Mutex<EntryStore>, ttl: Duration) -> usize {
    let mut entries = store.lock();
    let removed = entries.remove_expired(Instant::now(), ttl);
    if removed > 0 {
        debug!(removed, remaining = entries.len(), "cache sweep evicted entries");
    }
    removed
}
