//! HTTP remote store client.
//!
//! Talks to a key-value service exposing `GET /get/{key}` and a JSON
//! `PUT /set` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::RemoteStore;
use crate::error::RemoteError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
struct SetBody<'a> {
    key: &'a str,
    value: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    ttl: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct GetBody {
    value: String,
}

/// Remote store reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    base: Url,
    ttl: Option<Duration>,
}

impl HttpStore {
    /// Creates a client for the service at `base_url`.
    ///
    /// `ttl` is forwarded on every write, rounded down to whole seconds.
    pub fn new(base_url: &str, ttl: Option<Duration>) -> Result<Self, RemoteError> {
        let base = Url::parse(base_url)
            .map_err(|e| RemoteError::Protocol(format!("invalid remote URL {}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(RemoteError::Protocol(format!(
                "remote URL {} cannot be used as a base",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(unavailable)?;

        Ok(Self { client, base, ttl })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

fn unavailable(err: reqwest::Error) -> RemoteError {
    RemoteError::Unavailable(err.to_string())
}

#[async_trait]
impl RemoteStore for HttpStore {
    async fn get(&self, key: &str) -> Result<Option<String>, RemoteError> {
        let response = self
            .client
            .get(self.endpoint(&["get", key]))
            .send()
            .await
            .map_err(unavailable)?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!(key, "remote miss");
                Ok(None)
            }
            status if status.is_success() => {
                let body: GetBody = response
                    .json()
                    .await
                    .map_err(|e| RemoteError::Protocol(e.to_string()))?;
                Ok(Some(body.value))
            }
            status => Err(RemoteError::Unavailable(format!(
                "GET {} returned {}",
                key, status
            ))),
        }
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), RemoteError> {
        let body = SetBody {
            key,
            value,
            ttl: self.ttl.map(|ttl| ttl.as_secs()),
        };

        let response = self
            .client
            .put(self.endpoint(&["set"]))
            .json(&body)
            .send()
            .await
            .map_err(unavailable)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(RemoteError::Unavailable(format!(
                "PUT {} returned {}",
                key,
                response.status()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_segments() {
        let store = HttpStore::new("http://kv.internal:3000/", None).unwrap();
        assert_eq!(
            store.endpoint(&["get", "userData.alice.k1"]).as_str(),
            "http://kv.internal:3000/get/userData.alice.k1"
        );

        let store = HttpStore::new("http://kv.internal/prefix", None).unwrap();
        assert_eq!(
            store.endpoint(&["set"]).as_str(),
            "http://kv.internal/prefix/set"
        );
    }

    #[test]
    fn test_endpoint_encodes_key() {
        let store = HttpStore::new("http://kv.internal", None).unwrap();
        assert_eq!(
            store.endpoint(&["get", "a b"]).as_str(),
            "http://kv.internal/get/a%20b"
        );
    }

    #[test]
    fn test_rejects_bad_url() {
        assert!(matches!(
            HttpStore::new("not a url", None),
            Err(RemoteError::Protocol(_))
        ));
        assert!(matches!(
            HttpStore::new("mailto:kv@example.com", None),
            Err(RemoteError::Protocol(_))
        ));
    }

    #[test]
    fn test_set_body_omits_missing_ttl() {
        let body = SetBody {
            key: "k",
            value: "v",
            ttl: None,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"key":"k","value":"v"}"#
        );
    }
}
