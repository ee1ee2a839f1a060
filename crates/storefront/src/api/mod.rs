//! REST backend client.
//!
//! # Architecture
//!
//! - One [`ApiClient`] per process: a `reqwest` client with a fixed base URL,
//!   JSON bodies and a fixed timeout, plus a `moka` cache for brand and
//!   category lists (5 minute TTL)
//! - [`ApiClient::with_tokens`] binds the client to one shopper's
//!   [`TokenStore`], producing a [`Backend`] that every endpoint method hangs off
//! - No retries, no backoff, no request deduplication
//!
//! # Interceptors
//!
//! Every call passes through the same two steps:
//!
//! - **Request**: attach `Authorization: Bearer <token>` when the token store
//!   holds a token; otherwise send the request without the header.
//! - **Response**: connection failures become [`ApiError::ServerUnavailable`],
//!   timeouts become [`ApiError::Timeout`]. A 401 from a non-auth endpoint
//!   clears the token and becomes [`ApiError::SessionExpired`]. 403 and 5xx
//!   are logged and passed on with the backend's message.
//!
//! # Example
//!
//! ```rust,ignore
//! use perfume_shop_storefront::api::{ApiClient, MemoryTokenStore};
//!
//! let client = ApiClient::new(&config.backend)?;
//! let tokens = MemoryTokenStore::new();
//! let brands = client.with_tokens(&tokens).brands().await?;
//! ```

mod auth;
mod cache;
mod cart;
mod catalog;
pub mod error;
mod favorites;
mod orders;
mod ratings;
pub mod token;
mod users;

pub use error::ApiError;
pub use token::{MemoryTokenStore, SessionToken, SessionTokenStore, TokenStore, TokenStoreError};

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::config::BackendConfig;

use cache::{CacheKey, CacheValue};

/// Number of body characters included in error logs.
const LOG_BODY_CHARS: usize = 500;

/// Whether a backend path belongs to the authentication endpoints.
///
/// A 401 from these means "wrong credentials", not "session expired".
#[must_use]
pub fn is_auth_route(path: &str) -> bool {
    path.contains("/auth/")
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the PerfumeShop REST backend.
///
/// Cheap to clone; all clones share the connection pool and cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.base_url.clone(),
                cache,
            }),
        })
    }

    /// The backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Bind this client to a shopper's token store.
    #[must_use]
    pub const fn with_tokens<'a, S: TokenStore>(&'a self, tokens: &'a S) -> Backend<'a, S> {
        Backend {
            client: self,
            tokens,
        }
    }

    /// Drop cached brand and category lists.
    pub async fn invalidate_catalog_cache(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }

    /// Build the absolute URL for an API path and query.
    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Url {
        let mut url = self.inner.base_url.clone();
        let joined = format!("{}{path}", url.path().trim_end_matches('/'));
        url.set_path(&joined);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        url
    }
}

// =============================================================================
// Backend
// =============================================================================

/// The backend client acting for one shopper.
pub struct Backend<'a, S> {
    client: &'a ApiClient,
    tokens: &'a S,
}

impl<S: TokenStore> Backend<'_, S> {
    /// Send a request and return the raw body of a successful response.
    #[instrument(skip(self, method, query, body), fields(method = %method))]
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<String, ApiError> {
        let url = self.client.endpoint(path, query);
        let mut request = self.client.inner.http.request(method, url);

        if let Some(token) = self.tokens.load().await? {
            debug!("Attaching bearer token");
            request = request.bearer_auth(token.expose());
        }

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(ApiError::from_transport)?;
        let status = response.status();
        let text = response.text().await.map_err(ApiError::from_transport)?;

        if status.is_success() {
            return Ok(text);
        }

        Err(self.reject(path, status, &text).await)
    }

    /// Classify a non-success response.
    async fn reject(&self, path: &str, status: StatusCode, body: &str) -> ApiError {
        let message = error_message(body);

        if status == StatusCode::UNAUTHORIZED && !is_auth_route(path) {
            tracing::info!(path, "Backend rejected session token, clearing it");
            if let Err(e) = self.tokens.clear().await {
                tracing::error!(error = %e, "Failed to clear expired session token");
            }
            return ApiError::SessionExpired;
        }

        if status == StatusCode::FORBIDDEN {
            tracing::warn!(path, message = ?message, "Backend denied access");
            return ApiError::Forbidden { message };
        }

        if status.is_server_error() {
            tracing::error!(
                path,
                status = %status,
                body = %truncate(body),
                "Backend returned server error"
            );
            return ApiError::ServerFault { status, message };
        }

        ApiError::Rejected { status, message }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        let text = self.send(method, path, query, body).await?;
        decode(path, &text)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.call(Method::GET, path, query, None).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.call(Method::POST, path, &[], Some(serde_json::to_value(body)?))
            .await
    }

    async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> Result<T, ApiError> {
        self.call(Method::PUT, path, query, Some(serde_json::to_value(body)?))
            .await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.call(Method::DELETE, path, &[], None).await
    }

    /// Send a request whose response body is ignored.
    async fn exec(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<(), ApiError> {
        self.send(method, path, query, body).await.map(|_| ())
    }
}

/// Parse a response body, treating an empty body as JSON `null`.
fn decode<T: DeserializeOwned>(path: &str, text: &str) -> Result<T, ApiError> {
    let text = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(|e| {
        tracing::error!(
            path,
            error = %e,
            body = %truncate(text),
            "Failed to parse backend response"
        );
        ApiError::Decode(e)
    })
}

/// Extract the shopper-facing message from an error body.
///
/// Prefers `message`, then `error`. Non-JSON bodies yield nothing.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"].into_iter().find_map(|key| {
        value
            .get(key)
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map(String::from)
    })
}

fn truncate(body: &str) -> String {
    body.chars().take(LOG_BODY_CHARS).collect()
}
