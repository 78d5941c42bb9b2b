//! Key validation and namespacing.

use crate::error::{ProxyError, Result};

/// Separates namespace segments; never allowed inside a client key.
pub const KEY_SEPARATOR: char = '.';

/// Rejects keys that are empty or contain the namespace separator.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(ProxyError::InvalidKey("key cannot be empty".to_string()));
    }
    if key.contains(KEY_SEPARATOR) {
        return Err(ProxyError::InvalidKey(format!(
            "key {:?} may not contain '{}'",
            key, KEY_SEPARATOR
        )));
    }
    Ok(())
}

/// `<namespace>.<invite_code>.<key>`
pub fn namespaced_key(namespace: &str, invite_code: &str, key: &str) -> String {
    format!(
        "{}{sep}{}{sep}{}",
        namespace,
        invite_code,
        key,
        sep = KEY_SEPARATOR
    )
}
