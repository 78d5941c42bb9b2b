//! API Module
//!
//! HTTP handlers and routing for the proxy.
//!
//! # Endpoints
//! - `GET /{key}` - Read a key (local cache first, then remote store)
//! - `PUT /{key}` - Write a key through to the remote store
//! - `POST /authUser` - Provision a user
//! - `GET /_stats` - Local cache statistics
//! - `GET /_health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
