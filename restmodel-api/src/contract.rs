//! The transport seam.

use crate::error::ApiResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Per-call transport options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Send the payload and return the response without key casing
    /// transforms.
    #[serde(default)]
    pub raw_keys: bool,
}

impl RequestConfig {
    /// Options that bypass key casing for one call.
    pub fn raw() -> Self {
        Self { raw_keys: true }
    }
}

/// The HTTP verbs the entity layer issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        };
        f.write_str(verb)
    }
}

/// A REST transport.
///
/// Implementations resolve with the decoded response body in local casing
/// and fail with a classified [`ApiError`](crate::ApiError). The auth token
/// is state of the transport instance, shared by every holder of it.
#[async_trait]
pub trait ApiContract: Send + Sync {
    /// Issues a request with an explicit method.
    async fn request(
        &self,
        method: HttpMethod,
        url: &str,
        payload: Option<&Value>,
        config: Option<&RequestConfig>,
    ) -> ApiResult<Value>;

    /// GET; the payload is sent as query parameters.
    async fn get(
        &self,
        url: &str,
        payload: Option<&Value>,
        config: Option<&RequestConfig>,
    ) -> ApiResult<Value> {
        self.request(HttpMethod::Get, url, payload, config).await
    }

    /// POST with a JSON body.
    async fn post(
        &self,
        url: &str,
        payload: Option<&Value>,
        config: Option<&RequestConfig>,
    ) -> ApiResult<Value> {
        self.request(HttpMethod::Post, url, payload, config).await
    }

    /// PUT with a JSON body.
    async fn put(
        &self,
        url: &str,
        payload: Option<&Value>,
        config: Option<&RequestConfig>,
    ) -> ApiResult<Value> {
        self.request(HttpMethod::Put, url, payload, config).await
    }

    /// DELETE with an optional JSON body.
    async fn delete(
        &self,
        url: &str,
        payload: Option<&Value>,
        config: Option<&RequestConfig>,
    ) -> ApiResult<Value> {
        self.request(HttpMethod::Delete, url, payload, config).await
    }

    /// Attaches a bearer token to every subsequent request.
    fn set_token(&self, token: &str);

    /// Drops the bearer token.
    fn clear_token(&self);
}
