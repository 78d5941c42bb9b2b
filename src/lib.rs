//! Proxy Cache - A caching proxy in front of a remote key-value store
//!
//! Answers reads from a bounded in-process cache with TTL expiry and LRU
//! eviction, falls through to the remote store on a miss, and writes through
//! to the remote store. Keys can be namespaced per authenticated client.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod console;
pub mod error;
pub mod models;
pub mod proxy;
pub mod remote;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use proxy::ProxyCache;
pub use tasks::spawn_expiry_task;
