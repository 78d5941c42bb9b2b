//! Access control backed by the remote store.
//!
//! Identities live in the remote store as `auth.<invite_code> -> access_key`.
//! They are written once at provisioning time and never cached locally.

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::Credentials;
use crate::error::{ProxyError, Result};
use crate::remote::SharedRemoteStore;

/// Remote-store namespace holding identity records.
pub const AUTH_NAMESPACE: &str = "auth";

/// Validates credentials and provisions new identities.
#[derive(Clone)]
pub struct AccessControl {
    store: SharedRemoteStore,
    admin_code: String,
    enabled: bool,
}

impl AccessControl {
    pub fn new(store: SharedRemoteStore, admin_code: impl Into<String>, enabled: bool) -> Self {
        Self {
            store,
            admin_code: admin_code.into(),
            enabled,
        }
    }

    /// Whether requests must be authenticated and namespaced.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Remote-store key of the identity record for `invite_code`.
    pub fn record_key(invite_code: &str) -> String {
        format!("{}.{}", AUTH_NAMESPACE, invite_code)
    }

    // == Authenticate ==
    /// Checks a credential header against the stored identity record.
    ///
    /// Returns the invite code when the presented access key matches the
    /// stored one. Undecodable headers, lookup failures and unknown invite
    /// codes all yield None.
    pub async fn authenticate(&self, header: &str) -> Option<String> {
        let Some(creds) = Credentials::parse(header) else {
            debug!("rejecting malformed credential header");
            return None;
        };

        let stored = match self.store.get(&Self::record_key(&creds.invite_code)).await {
            Ok(Some(stored)) => stored,
            Ok(None) => {
                debug!(invite_code = %creds.invite_code, "unknown invite code");
                return None;
            }
            Err(e) => {
                warn!(invite_code = %creds.invite_code, error = %e, "credential lookup failed");
                return None;
            }
        };

        if stored == creds.access_key {
            Some(creds.invite_code)
        } else {
            debug!(invite_code = %creds.invite_code, "access key mismatch");
            None
        }
    }

    // == Provision User ==
    /// Creates an identity for `invite_code` and returns its fresh access key.
    ///
    /// Requires the administrative code. Fails if the invite code already
    /// has a record, or cannot be used as a namespace segment.
    pub async fn provision_user(&self, presented_code: &str, invite_code: &str) -> Result<String> {
        if presented_code != self.admin_code {
            warn!(invite_code, "provisioning attempted with wrong code");
            return Err(ProxyError::Forbidden(
                "invalid code from your client".to_string(),
            ));
        }

        validate_invite_code(invite_code)?;

        let record_key = Self::record_key(invite_code);
        if self.store.get(&record_key).await?.is_some() {
            return Err(ProxyError::AlreadyProvisioned(invite_code.to_string()));
        }

        let access_key = Uuid::new_v4().to_string();
        self.store.put(&record_key, &access_key).await?;

        info!(invite_code, "provisioned new user");
        Ok(access_key)
    }
}

impl std::fmt::Debug for AccessControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessControl")
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

fn validate_invite_code(invite_code: &str) -> Result<()> {
    if invite_code.is_empty() {
        return Err(ProxyError::InvalidRequest(
            "inviteCode cannot be empty".to_string(),
        ));
    }
    if invite_code.contains(['.', ':']) || invite_code.chars().any(char::is_whitespace) {
        return Err(ProxyError::InvalidRequest(format!(
            "inviteCode {:?} may not contain '.', ':' or whitespace",
            invite_code
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::error::RemoteError;
    use crate::remote::{MemoryStore, RemoteStore};

    struct DownStore;

    #[async_trait]
    impl RemoteStore for DownStore {
        async fn get(&self, _key: &str) -> std::result::Result<Option<String>, RemoteError> {
            Err(RemoteError::Unavailable("connection refused".into()))
        }

        async fn put(&self, _key: &str, _value: &str) -> std::result::Result<(), RemoteError> {
            Err(RemoteError::Unavailable("connection refused".into()))
        }
    }

    fn header(invite: &str, key: &str) -> String {
        Credentials {
            invite_code: invite.to_string(),
            access_key: key.to_string(),
        }
        .to_header()
    }

    fn access_with(records: &[(&str, &str)]) -> AccessControl {
        let store = MemoryStore::with_entries(
            records
                .iter()
                .map(|(invite, key)| (AccessControl::record_key(invite), key.to_string())),
        );
        AccessControl::new(Arc::new(store), "admin", true)
    }

    #[tokio::test]
    async fn test_authenticate_matching_key() {
        let access = access_with(&[("alice", "secret123")]);

        let result = access.authenticate(&header("alice", "secret123")).await;

        assert_eq!(result.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_authenticate_wrong_key() {
        let access = access_with(&[("alice", "secret123")]);
        assert!(access.authenticate(&header("alice", "guess")).await.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_unknown_user() {
        let access = access_with(&[]);
        assert!(access.authenticate(&header("alice", "secret123")).await.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_malformed_header() {
        let access = access_with(&[("alice", "secret123")]);
        assert!(access.authenticate("").await.is_none());
        assert!(access.authenticate("Basic %%%").await.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_store_failure_fails_closed() {
        let access = AccessControl::new(Arc::new(DownStore), "admin", true);
        assert!(access.authenticate(&header("alice", "secret123")).await.is_none());
    }

    #[tokio::test]
    async fn test_provision_then_authenticate() {
        let access = access_with(&[]);

        let key = access.provision_user("admin", "bob").await.unwrap();

        assert!(Uuid::parse_str(&key).is_ok());
        assert_eq!(
            access.authenticate(&header("bob", &key)).await.as_deref(),
            Some("bob")
        );
    }

    #[tokio::test]
    async fn test_provision_wrong_admin_code() {
        let access = access_with(&[]);
        let result = access.provision_user("nope", "bob").await;
        assert!(matches!(result, Err(ProxyError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_provision_twice_conflicts() {
        let access = access_with(&[]);
        access.provision_user("admin", "bob").await.unwrap();

        let result = access.provision_user("admin", "bob").await;
        assert!(matches!(result, Err(ProxyError::AlreadyProvisioned(ref code)) if code == "bob"));
    }

    #[tokio::test]
    async fn test_provision_checks_invite_code_not_admin_code() {
        // A record named after the admin code must not block other invites
        let access = access_with(&[("admin", "whatever")]);
        assert!(access.provision_user("admin", "carol").await.is_ok());
    }

    #[tokio::test]
    async fn test_provision_rejects_bad_invite_code() {
        let access = access_with(&[]);
        for bad in ["", "a.b", "a:b", "a b"] {
            let result = access.provision_user("admin", bad).await;
            assert!(matches!(result, Err(ProxyError::InvalidRequest(_))), "{:?}", bad);
        }
    }

    #[tokio::test]
    async fn test_provision_store_failure_propagates() {
        let access = AccessControl::new(Arc::new(DownStore), "admin", true);
        let result = access.provision_user("admin", "dave").await;
        assert!(matches!(result, Err(ProxyError::Remote(_))));
    }
}
