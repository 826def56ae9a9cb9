//! reqwest transport.
//!
//! Payloads leave in wire casing (snake_case) and responses come back in
//! local casing (camelCase) unless disabled globally or per call.

use crate::contract::{ApiContract, HttpMethod, RequestConfig};
use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{Client, Method};
use restmodel_types::{to_local_case, to_wire_case};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Transport configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Prefix joined with every request path (e.g. `https://api.example.com/v1`).
    pub base_url: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Bearer token attached from the start.
    pub token: Option<String>,
    /// Convert payload keys to snake_case and response keys to camelCase.
    pub transform_case: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost".to_string(),
            timeout_secs: 30,
            token: None,
            transform_case: true,
        }
    }
}

/// HTTP implementation of [`ApiContract`].
pub struct HttpApi {
    config: ApiConfig,
    client: Client,
    token: RwLock<Option<String>>,
}

impl HttpApi {
    /// Creates a transport from its configuration.
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Other(format!("failed to create HTTP client: {e}")))?;

        let token = RwLock::new(config.token.clone());
        Ok(Self {
            config,
            client,
            token,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// The token currently attached to requests.
    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.config.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

#[async_trait]
impl ApiContract for HttpApi {
    async fn request(
        &self,
        method: HttpMethod,
        url: &str,
        payload: Option<&Value>,
        config: Option<&RequestConfig>,
    ) -> ApiResult<Value> {
        let transform = self.config.transform_case && !config.is_some_and(|c| c.raw_keys);
        let full_url = self.url_for(url);

        let mut request = self.client.request(to_reqwest_method(method), &full_url);
        let token = self.token.read().clone();
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(payload) = payload {
            let payload = if transform {
                to_wire_case(payload.clone())
            } else {
                payload.clone()
            };
            request = match method {
                HttpMethod::Get => request.query(&query_pairs(&payload)),
                _ => request.json(&payload),
            };
        }

        debug!(%method, url = %full_url, "sending request");
        let response = request.send().await.map_err(ApiError::from_transport)?;
        let status = response.status();
        let text = response.text().await.map_err(ApiError::from_transport)?;
        let parsed = parse_body(&text);

        if !status.is_success() {
            let body = parsed.unwrap_or(Value::String(text));
            let err = ApiError::from_response(status.as_u16(), &body);
            if err.is_validation() {
                debug!(%method, url = %full_url, "request rejected by validation");
            } else {
                warn!(%method, url = %full_url, status = status.as_u16(), "request failed: {err}");
            }
            return Err(err);
        }

        let body = parsed.map_err(|e| ApiError::Other(format!("invalid response body: {e}")))?;
        Ok(if transform { to_local_case(body) } else { body })
    }

    fn set_token(&self, token: &str) {
        *self.token.write() = Some(token.to_string());
        info!("API token updated");
    }

    fn clear_token(&self) {
        *self.token.write() = None;
        info!("API token cleared");
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn parse_body(text: &str) -> Result<Value, serde_json::Error> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text)
}

/// Flattens a JSON object into query pairs. Arrays repeat as `key[]`,
/// nested objects are sent as JSON text, nulls are omitted.
fn query_pairs(payload: &Value) -> Vec<(String, String)> {
    let Some(map) = payload.as_object() else {
        return Vec::new();
    };
    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                let key = format!("{key}[]");
                pairs.extend(items.iter().map(|item| (key.clone(), scalar_text(item))));
            }
            other => pairs.push((key.clone(), scalar_text(other))),
        }
    }
    pairs
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
