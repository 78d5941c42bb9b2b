//! TTL Expiry Task
//!
//! Background task that periodically sweeps expired entries out of the local cache.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::CacheEngine;

/// Spawns the expiry sweep for `cache`.
///
/// The sweep runs once immediately and then every `key_timeout`, so an
/// entry can outlive its lifetime by up to one more `key_timeout`. It stops
/// when `true` is sent on `shutdown_rx` or the sender is dropped.
///
/// Returns None without spawning anything when the cache has no key timeout.
///
/// # Example
/// ```ignore
/// let (shutdown_tx, shutdown_rx) = watch::channel(false);
/// let handle = spawn_expiry_task(cache.clone(), shutdown_rx);
/// // Later, during shutdown:
/// let _ = shutdown_tx.send(true);
/// if let Some(handle) = handle {
///     handle.await?;
/// }
/// ```
pub fn spawn_expiry_task(
    cache: CacheEngine,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Option<JoinHandle<()>> {
    let period = cache.key_timeout();
    if period.is_zero() {
        return None;
    }

    Some(tokio::spawn(async move {
        info!(period_ms = period.as_millis() as u64, "starting TTL expiry task");

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!("TTL expiry task shutting down");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let removed = cache.sweep_expired().await;
                    if removed > 0 {
                        info!(removed, "TTL sweep removed expired entries");
                    } else {
                        debug!("TTL sweep found no expired entries");
                    }
                }
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_no_task_without_key_timeout() {
        let cache = CacheEngine::new(10, Duration::ZERO);
        let (_tx, rx) = watch::channel(false);

        assert!(spawn_expiry_task(cache, rx).is_none());
    }

    #[tokio::test]
    async fn test_expiry_task_removes_expired_entries() {
        let ttl = Duration::from_millis(100);
        let cache = CacheEngine::new(10, ttl);
        let (tx, rx) = watch::channel(false);

        cache.put("expire_soon", "value").await;
        let handle = spawn_expiry_task(cache.clone(), rx).unwrap();

        // Removal is guaranteed within two periods of the write
        tokio::time::sleep(ttl * 2 + Duration::from_millis(100)).await;
        assert!(!cache.contains("expire_soon").await);
        assert_eq!(cache.stats().await.expirations, 1);

        tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_reads_do_not_extend_lifetime() {
        let ttl = Duration::from_millis(100);
        let cache = CacheEngine::new(10, ttl);
        let (tx, rx) = watch::channel(false);

        cache.put("busy", "value").await;
        let handle = spawn_expiry_task(cache.clone(), rx).unwrap();

        for _ in 0..6 {
            cache.get("busy").await;
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        assert!(!cache.contains("busy").await);

        tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_expiry_task_preserves_fresh_entries() {
        let cache = CacheEngine::new(10, Duration::from_secs(3600));
        let (tx, rx) = watch::channel(false);

        cache.put("long_lived", "value").await;
        let handle = spawn_expiry_task(cache.clone(), rx).unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(cache.get("long_lived").await.as_deref(), Some("value"));

        tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_expiry_task_stops_when_sender_dropped() {
        let cache = CacheEngine::new(10, Duration::from_secs(3600));
        let (tx, rx) = watch::channel(false);

        let handle = spawn_expiry_task(cache, rx).unwrap();
        drop(tx);

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("task should stop once the sender is gone")
            .unwrap();
    }
}
