//! Background Tasks Module
//!
//! Contains background tasks that run periodically during proxy operation.
//!
//! # Tasks
//! - TTL Expiry: Removes expired local cache entries every key timeout

mod expiry;

pub use expiry::spawn_expiry_task;
