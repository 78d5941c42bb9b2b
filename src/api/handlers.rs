//! API Handlers
//!
//! HTTP request handlers for each proxy endpoint.

use axum::{
    body::Bytes,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
    Form, Json,
};
use tracing::warn;

use crate::config::Config;
use crate::error::{ProxyError, Result};
use crate::models::{
    GetResponse, HealthResponse, ProvisionRequest, ProvisionResponse, PutResponse, StatsResponse,
};
use crate::proxy::ProxyCache;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub proxy: ProxyCache,
}

impl AppState {
    pub fn new(proxy: ProxyCache) -> Self {
        Self { proxy }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(ProxyCache::from_config(config)?))
    }
}

/// The key addressed by a request: the final segment of its path.
pub fn key_from_path(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or_default()
}

fn credential_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
}

/// Handler for GET and PUT on any other path.
///
/// The key is the last path segment. GET returns the value, PUT stores the
/// raw request body. Every other method is rejected.
pub async fn payload_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let raw_key = key_from_path(uri.path());
    let credentials = credential_header(&headers);

    match method {
        Method::GET => Ok(get_key(&state, raw_key, credentials).await?.into_response()),
        Method::PUT => Ok(put_key(&state, raw_key, credentials, body)
            .await?
            .into_response()),
        other => Err(ProxyError::MethodNotAllowed(other.to_string())),
    }
}

async fn get_key(
    state: &AppState,
    raw_key: &str,
    credentials: Option<&str>,
) -> Result<Json<GetResponse>> {
    let key = state.proxy.resolve_key(raw_key, credentials).await?;

    match state.proxy.handle_get(&key).await {
        Ok(Some(value)) => Ok(Json(GetResponse::new(raw_key, value))),
        Ok(None) => Err(ProxyError::NotFound(raw_key.to_string())),
        Err(e) => {
            warn!(key = %key, error = %e, "failed get");
            Err(e.into())
        }
    }
}

async fn put_key(
    state: &AppState,
    raw_key: &str,
    credentials: Option<&str>,
    body: Bytes,
) -> Result<Json<PutResponse>> {
    let value = String::from_utf8(body.to_vec())
        .map_err(|_| ProxyError::InvalidRequest("value must be valid UTF-8".to_string()))?;
    let key = state.proxy.resolve_key(raw_key, credentials).await?;

    if let Err(e) = state.proxy.handle_put(&key, &value).await {
        warn!(key = %key, error = %e, "failed put");
        return Err(e.into());
    }

    Ok(Json(PutResponse::new(raw_key)))
}

/// Handler for POST /authUser
///
/// Provisions a user from the `code` and `inviteCode` form fields.
pub async fn provision_handler(
    State(state): State<AppState>,
    Form(req): Form<ProvisionRequest>,
) -> Result<Json<ProvisionResponse>> {
    let key = state
        .proxy
        .auth()
        .provision_user(&req.code, &req.invite_code)
        .await?;

    Ok(Json(ProvisionResponse::new(key, req.invite_code)))
}

/// Handler for GET /_stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.proxy.cache().stats().await))
}

/// Handler for GET /_health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
