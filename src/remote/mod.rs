//! Remote Store Module
//!
//! The authoritative key-value tier sitting behind the local cache.
//!
//! # Implementations
//! - `MemoryStore`: in-process map, used when no remote URL is configured
//! - `HttpStore`: JSON-over-HTTP key-value service

mod http;
mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::RemoteError;

pub use http::HttpStore;
pub use memory::MemoryStore;

/// Contract every remote key-value store satisfies.
///
/// A missing key is `Ok(None)`, never an error.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, RemoteError>;

    async fn put(&self, key: &str, value: &str) -> Result<(), RemoteError>;
}

/// Shared handle used by the proxy and the access-control layer.
pub type SharedRemoteStore = Arc<dyn RemoteStore>;

/// Builds the remote store selected by the configuration.
pub fn from_config(config: &Config) -> Result<SharedRemoteStore, RemoteError> {
    match &config.remote_url {
        Some(url) => Ok(Arc::new(HttpStore::new(url, config.remote_ttl)?)),
        None => Ok(Arc::new(MemoryStore::new(config.remote_ttl))),
    }
}
