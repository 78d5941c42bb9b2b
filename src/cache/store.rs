//! Cache Store Module
//!
//! Unsynchronized cache storage: a HashMap with least-recently-read eviction
//! and fixed-lifetime expiry. `CacheEngine` puts it behind a lock.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
/// Bounded key-value storage with recency tracking and TTL metadata.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Activity counters
    stats: CacheStats,
    /// Maximum number of entries allowed, 0 = unbounded
    max_keys: usize,
    /// Lifetime of every entry from its last write, zero = never expires
    key_timeout: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore.
    ///
    /// # Arguments
    /// * `max_keys` - Maximum number of entries, 0 for no limit
    /// * `key_timeout` - Entry lifetime from write, zero for no expiry
    pub fn new(max_keys: usize, key_timeout: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            max_keys,
            key_timeout,
        }
    }

    // == Put ==
    /// Stores a key-value pair, overwriting any previous value and resetting its expiry.
    ///
    /// When the store is bounded and full, the entry with the oldest
    /// `last_read_at` is evicted first. Ties are broken by map iteration
    /// order, which is unspecified.
    ///
    /// Overwriting a key that is already present never evicts, even at
    /// capacity: the map does not grow, so no other entry has to go. This
    /// departs from evicting on every put made while full.
    pub fn put(&mut self, key: String, value: String) {
        let now = Instant::now();

        if self.max_keys > 0
            && self.entries.len() >= self.max_keys
            && !self.entries.contains_key(&key)
        {
            if let Some(victim) = self.least_recently_read() {
                self.entries.remove(&victim);
                self.stats.record_eviction();
                debug!(key = %victim, "evicted least recently read entry");
            }
        }

        self.entries
            .insert(key, CacheEntry::new(value, self.key_timeout, now));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Retrieves a value by key and marks it as read.
    ///
    /// Expiry is not checked here: an entry past its lifetime stays visible
    /// until the next sweep removes it.
    pub fn get(&mut self, key: &str) -> Option<String> {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.touch(Instant::now());
                self.stats.record_hit();
                Some(entry.value.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Peek ==
    /// Inspects an entry without marking it as read.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    // == Sweep Expired ==
    /// Removes all entries whose lifetime has passed as of `now`.
    ///
    /// Returns the number of entries removed.
    pub fn sweep_expired(&mut self, now: Instant) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.entries.remove(&key);
        }

        self.stats.record_expirations(count);
        self.stats.set_total_entries(self.entries.len());
        count
    }

    fn least_recently_read(&self) -> Option<String> {
        self.entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_read_at)
            .map(|(key, _)| key.clone())
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const NO_TTL: Duration = Duration::ZERO;

    // Keeps read timestamps strictly ordered so eviction is deterministic
    fn put_spaced(store: &mut CacheStore, key: &str, value: &str) {
        store.put(key.to_string(), value.to_string());
        std::thread::sleep(Duration::from_millis(2));
    }

    #[test]
    fn test_store_new() {
        let store = CacheStore::new(100, NO_TTL);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_put_and_get() {
        let mut store = CacheStore::new(100, NO_TTL);

        store.put("key1".to_string(), "value1".to_string());

        assert_eq!(store.get("key1").as_deref(), Some("value1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = CacheStore::new(100, NO_TTL);
        assert!(store.get("nonexistent").is_none());
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = CacheStore::new(100, NO_TTL);

        store.put("key1".to_string(), "value1".to_string());
        store.put("key1".to_string(), "value2".to_string());

        assert_eq!(store.get("key1").as_deref(), Some("value2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_updates_last_read() {
        let mut store = CacheStore::new(100, NO_TTL);
        store.put("key1".to_string(), "value1".to_string());
        let written = store.peek("key1").unwrap().last_read_at;

        store.get("key1");

        assert!(store.peek("key1").unwrap().last_read_at >= written);
    }

    #[test]
    fn test_store_unbounded_when_max_zero() {
        let mut store = CacheStore::new(0, NO_TTL);
        for i in 0..500 {
            store.put(format!("key{}", i), "v".to_string());
        }
        assert_eq!(store.len(), 500);
        assert_eq!(store.stats().evictions, 0);
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = CacheStore::new(3, NO_TTL);

        put_spaced(&mut store, "key1", "value1");
        put_spaced(&mut store, "key2", "value2");
        put_spaced(&mut store, "key3", "value3");

        // Make key1 the most recently read so key2 becomes the victim
        store.get("key1");
        store.put("key4".to_string(), "value4".to_string());

        assert_eq!(store.len(), 3);
        assert!(store.peek("key2").is_none());
        assert!(store.peek("key1").is_some());
        assert!(store.peek("key3").is_some());
        assert!(store.peek("key4").is_some());
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_overwrite_at_capacity_keeps_others() {
        let mut store = CacheStore::new(2, NO_TTL);

        store.put("a".to_string(), "1".to_string());
        store.put("b".to_string(), "2".to_string());
        store.put("a".to_string(), "3".to_string());

        assert_eq!(store.len(), 2);
        assert!(store.peek("b").is_some());
        assert_eq!(store.peek("a").unwrap().value, "3");
    }

    #[test]
    fn test_store_get_does_not_check_expiry() {
        let mut store = CacheStore::new(100, Duration::from_millis(1));
        store.put("stale".to_string(), "still here".to_string());

        std::thread::sleep(Duration::from_millis(5));

        assert_eq!(store.get("stale").as_deref(), Some("still here"));
    }

    #[test]
    fn test_store_sweep_expired() {
        let mut store = CacheStore::new(100, Duration::from_secs(10));
        store.put("key1".to_string(), "value1".to_string());
        store.put("key2".to_string(), "value2".to_string());

        assert_eq!(store.sweep_expired(Instant::now()), 0);

        let removed = store.sweep_expired(Instant::now() + Duration::from_secs(11));
        assert_eq!(removed, 2);
        assert!(store.is_empty());
        assert_eq!(store.stats().expirations, 2);
    }

    #[test]
    fn test_store_sweep_ignores_entries_without_ttl() {
        let mut store = CacheStore::new(100, NO_TTL);
        store.put("key1".to_string(), "value1".to_string());

        let removed = store.sweep_expired(Instant::now() + Duration::from_secs(86_400));
        assert_eq!(removed, 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_stats() {
        let mut store = CacheStore::new(100, NO_TTL);

        store.put("key1".to_string(), "value1".to_string());
        store.get("key1");
        store.get("nonexistent");

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }
}
