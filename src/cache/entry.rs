//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with read tracking and TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: String,
    /// Last time the entry was written or read
    pub last_read_at: Instant,
    /// Expiration instant, None = never swept
    pub expires_at: Option<Instant>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry written at `now`.
    ///
    /// A zero `ttl` means the entry never expires. Otherwise the expiry is
    /// fixed at write time and is not pushed back by later reads.
    pub fn new(value: String, ttl: Duration, now: Instant) -> Self {
        let expires_at = if ttl.is_zero() { None } else { Some(now + ttl) };

        Self {
            value,
            last_read_at: now,
            expires_at,
        }
    }

    // == Touch ==
    /// Records a read at `now`.
    pub fn touch(&mut self, now: Instant) {
        self.last_read_at = now;
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// An entry is expired once `now` has reached its expiration instant.
    pub fn is_expired(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }
}
