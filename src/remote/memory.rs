//! In-process remote store.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::RemoteStore;
use crate::error::RemoteError;

#[derive(Debug, Clone)]
struct StoredValue {
    value: String,
    expires_at: Option<Instant>,
}

/// Key-value store living in this process, with an optional write TTL.
///
/// Expired values are dropped lazily on read.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, StoredValue>>,
    ttl: Option<Duration>,
}

impl MemoryStore {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Seeds the store with `entries`, bypassing the TTL.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let data = entries
            .into_iter()
            .map(|(k, v)| {
                (
                    k.into(),
                    StoredValue {
                        value: v.into(),
                        expires_at: None,
                    },
                )
            })
            .collect();

        Self {
            data: RwLock::new(data),
            ttl: None,
        }
    }

    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, RemoteError> {
        let now = Instant::now();
        {
            let data = self.data.read().await;
            match data.get(key) {
                None => return Ok(None),
                Some(stored) if stored.expires_at.map_or(true, |at| now < at) => {
                    return Ok(Some(stored.value.clone()))
                }
                Some(_) => {}
            }
        }

        // Re-check under the write lock: a put may have refreshed the key meanwhile
        let mut data = self.data.write().await;
        let expired = data
            .get(key)
            .and_then(|stored| stored.expires_at)
            .is_some_and(|at| now >= at);
        if expired {
            data.remove(key);
        }
        Ok(None)
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), RemoteError> {
        let stored = StoredValue {
            value: value.to_string(),
            expires_at: self.ttl.map(|ttl| Instant::now() + ttl),
        };
        self.data.write().await.insert(key.to_string(), stored);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStore::new(None);

        assert_eq!(store.get("k").await.unwrap(), None);
        store.put("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_memory_store_seeded() {
        let store = MemoryStore::with_entries([("a", "1"), ("b", "2")]);
        assert_eq!(store.len().await, 2);
        assert_eq!(store.get("b").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_memory_store_ttl_expires_on_read() {
        let store = MemoryStore::new(Some(Duration::from_millis(20)));
        store.put("k", "v").await.unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(store.get("k").await.unwrap(), None);
        assert!(store.is_empty().await);
    }
}
