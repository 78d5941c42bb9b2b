//! Cache Module
//!
//! Local cache tier: bounded in-memory storage with least-recently-read
//! eviction and TTL expiry, shared behind one lock.

mod engine;
mod entry;
mod stats;
mod store;


// Re-export public types
pub use engine::CacheEngine;
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::CacheStore;
