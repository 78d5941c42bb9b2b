//! Configuration Module
//!
//! Handles loading and managing proxy configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ProxyError, Result};

/// Interaction mode selected by `APP_MODE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Serve the HTTP API (default)
    Http,
    /// Line-based console reading commands from stdin
    Console,
}

/// Proxy configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote key-value service, None = in-process store
    pub remote_url: Option<String>,
    /// TTL applied by the remote store to every write, None = keep forever
    pub remote_ttl: Option<Duration>,
    /// HTTP server port
    pub port: u16,
    /// Maximum number of keys held by the local cache, None = unbounded
    pub cache_key_capacity: Option<usize>,
    /// Lifetime of a locally cached key, None = no background expiry
    pub cache_ttl: Option<Duration>,
    /// Maximum number of requests served concurrently, None = no limit
    pub proxy_client_limit: Option<usize>,
    /// HTTP or console mode
    pub mode: AppMode,
    /// Administrative code required to provision new users
    pub auth_code: String,
    /// Skip authentication and namespacing entirely
    pub disable_auth: bool,
    /// Prefix under which authenticated users' keys are stored
    pub user_namespace: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REMOTE_URL` - Remote key-value service (default: in-process store)
    /// - `REMOTE_TTL` - Remote write TTL in seconds (default: none)
    /// - `PORT` - HTTP server port (default: 8080)
    /// - `CACHE_KEY_CAPACITY` - Maximum local keys (default: unbounded)
    /// - `CACHE_TTL` - Local key lifetime in seconds (default: none)
    /// - `PROXY_CLIENT_LIMIT` - Concurrent request limit (default: none)
    /// - `APP_MODE` - `2` for console mode, anything else for HTTP
    /// - `AUTH_CODE` - Provisioning code (default: "secret")
    /// - `DISABLE_AUTH` - Disable authentication (default: true)
    /// - `USER_NAMESPACE` - User data namespace (default: "userData")
    ///
    /// Unlike unset variables, malformed values are rejected.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            remote_url: non_empty_var("REMOTE_URL"),
            remote_ttl: parse_var::<u64>("REMOTE_TTL")?.map(Duration::from_secs),
            port: parse_var("PORT")?.unwrap_or(defaults.port),
            cache_key_capacity: parse_var("CACHE_KEY_CAPACITY")?,
            cache_ttl: parse_var::<u64>("CACHE_TTL")?.map(Duration::from_secs),
            proxy_client_limit: parse_var("PROXY_CLIENT_LIMIT")?,
            mode: match non_empty_var("APP_MODE").as_deref() {
                Some("2") => AppMode::Console,
                _ => AppMode::Http,
            },
            auth_code: non_empty_var("AUTH_CODE").unwrap_or(defaults.auth_code),
            disable_auth: parse_bool_var("DISABLE_AUTH")?.unwrap_or(defaults.disable_auth),
            user_namespace: non_empty_var("USER_NAMESPACE").unwrap_or(defaults.user_namespace),
        })
    }

    /// Maximum key count as understood by the cache engine (0 = unbounded).
    pub fn max_keys(&self) -> usize {
        self.cache_key_capacity.unwrap_or(0)
    }

    /// Key lifetime as understood by the cache engine (zero = no expiry).
    pub fn key_timeout(&self) -> Duration {
        self.cache_ttl.unwrap_or(Duration::ZERO)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote_url: None,
            remote_ttl: None,
            port: 8080,
            cache_key_capacity: None,
            cache_ttl: None,
            proxy_client_limit: None,
            mode: AppMode::Http,
            auth_code: "secret".to_string(),
            disable_auth: true,
            user_namespace: "userData".to_string(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    non_empty_var(name)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| ProxyError::Config(format!("{}={:?}: {}", name, raw, e)))
        })
        .transpose()
}

/// Accepts the spellings deployments already use: `1`/`0`, `t`/`f` and
/// `true`/`false` in lower, upper or title case.
fn parse_bool_var(name: &str) -> Result<Option<bool>> {
    non_empty_var(name)
        .map(|raw| match raw.trim() {
            "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
            "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
            other => Err(ProxyError::Config(format!(
                "{}={:?}: expected a boolean",
                name, other
            ))),
        })
        .transpose()
}
