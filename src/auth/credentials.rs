//! Credential header parsing.

use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE},
    Engine as _,
};

/// Invite code and access key presented by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub invite_code: String,
    pub access_key: String,
}

impl Credentials {
    /// Parses a Basic-style header value: the last whitespace-delimited
    /// token is base64 for `invite_code:access_key`.
    ///
    /// The standard alphabet is tried first, then the URL-safe one. Returns
    /// None for anything that does not have that shape.
    pub fn parse(header: &str) -> Option<Self> {
        let token = header.split_whitespace().last()?;
        let decoded = STANDARD
            .decode(token)
            .or_else(|_| URL_SAFE.decode(token))
            .ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (invite_code, access_key) = decoded.split_once(':')?;

        if invite_code.is_empty() {
            return None;
        }

        Some(Self {
            invite_code: invite_code.to_string(),
            access_key: access_key.to_string(),
        })
    }

    /// Encodes these credentials as a `Basic` header value.
    pub fn to_header(&self) -> String {
        format!(
            "Basic {}",
            STANDARD.encode(format!("{}:{}", self.invite_code, self.access_key))
        )
    }
}
