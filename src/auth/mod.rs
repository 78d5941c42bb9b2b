//! Access Control Module
//!
//! Authenticates clients by invite code and access key, and provisions new
//! identities for holders of the administrative code.

mod access;
mod credentials;

pub use access::{AccessControl, AUTH_NAMESPACE};
pub use credentials::Credentials;
