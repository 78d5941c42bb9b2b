//! Proxy Module
//!
//! Combines the local cache, the remote store and access control into the
//! GET/PUT contract served to clients.

mod keys;

use std::sync::Arc;

use tracing::debug;

use crate::auth::AccessControl;
use crate::cache::CacheEngine;
use crate::config::Config;
use crate::error::{ProxyError, RemoteError, Result};
use crate::remote::{self, SharedRemoteStore};

pub use keys::{namespaced_key, validate_key, KEY_SEPARATOR};

// == Proxy Cache ==
/// Write-through caching proxy.
///
/// The remote store is authoritative. The local cache is filled on detached
/// tasks after remote hits and before remote writes, so a caller must not
/// assume the cache reflects a value right after `handle_get` or
/// `handle_put` returns: a concurrent get for the same key can still miss
/// locally while a fill is in flight.
#[derive(Clone)]
pub struct ProxyCache {
    cache: CacheEngine,
    remote: SharedRemoteStore,
    auth: AccessControl,
    user_namespace: Arc<str>,
}

impl ProxyCache {
    pub fn new(
        cache: CacheEngine,
        remote: SharedRemoteStore,
        auth: AccessControl,
        user_namespace: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            cache,
            remote,
            auth,
            user_namespace: user_namespace.into(),
        }
    }

    /// Builds the proxy, its remote store and access control from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let remote = remote::from_config(config)?;
        let auth = AccessControl::new(remote.clone(), config.auth_code.clone(), !config.disable_auth);
        let cache = CacheEngine::new(config.max_keys(), config.key_timeout());

        Ok(Self::new(cache, remote, auth, config.user_namespace.as_str()))
    }

    pub fn cache(&self) -> &CacheEngine {
        &self.cache
    }

    pub fn auth(&self) -> &AccessControl {
        &self.auth
    }

    // == Resolve Key ==
    /// Turns a client-supplied key into the key used against both tiers.
    ///
    /// The raw key is validated first. With access control enabled the
    /// credential header must authenticate, and the key is moved into the
    /// caller's namespace. With it disabled the raw key is used as-is.
    pub async fn resolve_key(&self, raw_key: &str, credentials: Option<&str>) -> Result<String> {
        validate_key(raw_key)?;

        if !self.auth.is_enabled() {
            return Ok(raw_key.to_string());
        }

        let header = credentials.ok_or(ProxyError::Unauthorized)?;
        let invite_code = self
            .auth
            .authenticate(header)
            .await
            .ok_or(ProxyError::Unauthorized)?;

        Ok(namespaced_key(&self.user_namespace, &invite_code, raw_key))
    }

    // == Handle Get ==
    /// Looks `key` up locally, then remotely.
    ///
    /// A remote hit is copied into the local cache in the background.
    /// Remote failures are returned unchanged; a miss in both tiers is `Ok(None)`.
    pub async fn handle_get(&self, key: &str) -> std::result::Result<Option<String>, RemoteError> {
        if let Some(value) = self.cache.get(key).await {
            debug!(key, "local hit");
            return Ok(Some(value));
        }

        let Some(value) = self.remote.get(key).await? else {
            debug!(key, "miss in both tiers");
            return Ok(None);
        };

        debug!(key, "remote hit, filling local cache");
        self.cache.fill_detached(key.to_string(), value.clone());
        Ok(Some(value))
    }

    // == Handle Put ==
    /// Mirrors `value` into the local cache in the background and writes it
    /// through to the remote store.
    ///
    /// Only the remote write can fail the call. The local copy is written
    /// regardless of the remote outcome.
    pub async fn handle_put(&self, key: &str, value: &str) -> std::result::Result<(), RemoteError> {
        self.cache.fill_detached(key.to_string(), value.to_string());
        self.remote.put(key, value).await
    }
}

impl std::fmt::Debug for ProxyCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyCache")
            .field("cache", &self.cache)
            .field("auth", &self.auth)
            .field("user_namespace", &self.user_namespace)
            .finish_non_exhaustive()
    }
}
