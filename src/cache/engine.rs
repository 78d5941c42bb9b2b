//! Cache Engine Module
//!
//! Shares a `CacheStore` between request handlers and the expiry sweep
//! behind a single process-wide lock.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::trace;

use crate::cache::{CacheEntry, CacheStats, CacheStore};

// == Cache Engine ==
/// Thread-safe handle to the local cache tier.
///
/// Cloning is cheap and every clone refers to the same store. All access
/// (puts, gets, the sweep) is serialized by one mutex, so a get may wait
/// behind a full-map eviction scan or sweep.
#[derive(Debug, Clone)]
pub struct CacheEngine {
    store: Arc<Mutex<CacheStore>>,
    key_timeout: Duration,
}

impl CacheEngine {
    // == Constructor ==
    /// Creates an engine holding at most `max_keys` entries (0 = unbounded)
    /// that live for `key_timeout` after each write (zero = forever).
    pub fn new(max_keys: usize, key_timeout: Duration) -> Self {
        Self {
            store: Arc::new(Mutex::new(CacheStore::new(max_keys, key_timeout))),
            key_timeout,
        }
    }

    // == Put ==
    /// Stores a value, evicting the least recently read entry when full.
    pub async fn put(&self, key: impl Into<String>, value: impl Into<String>) {
        self.store.lock().await.put(key.into(), value.into());
    }

    // == Get ==
    /// Returns the cached value and marks it as read. Counts a hit or a miss.
    pub async fn get(&self, key: &str) -> Option<String> {
        self.store.lock().await.get(key)
    }

    // == Fill Detached ==
    /// Writes `key` on a detached task and returns immediately.
    ///
    /// There is no completion signal. A get issued right after this call,
    /// from this or any other task, may still miss the value.
    pub fn fill_detached(&self, key: String, value: String) {
        let engine = self.clone();
        tokio::spawn(async move {
            trace!(key = %key, "filling local cache");
            engine.put(key, value).await;
        });
    }

    // == Inspection ==
    /// Snapshot of an entry that does not count as a read.
    pub async fn peek(&self, key: &str) -> Option<CacheEntry> {
        self.store.lock().await.peek(key).cloned()
    }

    /// Whether `key` is cached, without counting a read.
    pub async fn contains(&self, key: &str) -> bool {
        self.store.lock().await.peek(key).is_some()
    }

    // == Sweep ==
    /// Removes every entry whose lifetime has passed. Returns how many were removed.
    pub async fn sweep_expired(&self) -> usize {
        self.store.lock().await.sweep_expired(Instant::now())
    }

    // == Stats ==
    /// Returns a snapshot of the activity counters.
    pub async fn stats(&self) -> CacheStats {
        self.store.lock().await.stats()
    }

    /// Number of cached entries.
    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.lock().await.is_empty()
    }

    /// Lifetime given to each entry on write, zero when entries never expire.
    pub fn key_timeout(&self) -> Duration {
        self.key_timeout
    }
}
