//! Request DTOs for the proxy API
//!
//! Defines the structure of incoming HTTP request bodies. Key reads and
//! writes take the key from the path and the value as a raw body, so only
//! provisioning has a structured request.

use serde::Deserialize;

/// Form body for provisioning a user (POST /authUser)
///
/// # Fields
/// - `code`: The administrative code
/// - `inviteCode`: The identity to create
#[derive(Debug, Clone, Deserialize)]
pub struct ProvisionRequest {
    #[serde(default)]
    pub code: String,
    #[serde(rename = "inviteCode", default)]
    pub invite_code: String,
}
