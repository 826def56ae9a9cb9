//! A scripted in-memory transport for testing.

use crate::contract::{ApiContract, HttpMethod, RequestConfig};
use crate::error::ApiResult;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::time::Duration;

/// One request seen by [`MockApi`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: HttpMethod,
    pub url: String,
    pub payload: Option<Value>,
    pub token: Option<String>,
    pub config: Option<RequestConfig>,
}

struct ScriptedReply {
    method: HttpMethod,
    url: Option<String>,
    result: ApiResult<Value>,
    delay: Option<Duration>,
}

/// Records every call and answers from a queue of scripted replies.
///
/// A request consumes the first queued reply whose method matches (and
/// whose URL matches, if one was given). Unmatched requests resolve to the
/// default response, `"response"` unless changed.
pub struct MockApi {
    calls: Mutex<Vec<RecordedCall>>,
    replies: Mutex<VecDeque<ScriptedReply>>,
    default_response: Mutex<Value>,
    token: Mutex<Option<String>>,
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            replies: Mutex::new(VecDeque::new()),
            default_response: Mutex::new(Value::String("response".to_string())),
            token: Mutex::new(None),
        }
    }

    /// Sets the body returned when no scripted reply matches.
    pub fn set_default_response(&self, value: Value) {
        *self.default_response.lock() = value;
    }

    /// Queues a reply for the next `method` request to any URL.
    pub fn reply(&self, method: HttpMethod, result: ApiResult<Value>) {
        self.push(method, None, result, None);
    }

    /// Queues a reply for the next `method` request to `url`.
    pub fn reply_to(&self, method: HttpMethod, url: &str, result: ApiResult<Value>) {
        self.push(method, Some(url.to_string()), result, None);
    }

    /// Queues a reply that resolves only after `delay`.
    pub fn reply_after(&self, method: HttpMethod, delay: Duration, result: ApiResult<Value>) {
        self.push(method, None, result, Some(delay));
    }

    fn push(
        &self,
        method: HttpMethod,
        url: Option<String>,
        result: ApiResult<Value>,
        delay: Option<Duration>,
    ) {
        self.replies.lock().push_back(ScriptedReply {
            method,
            url,
            result,
            delay,
        });
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Number of calls received with `method`.
    pub fn call_count(&self, method: HttpMethod) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.method == method)
            .count()
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls.lock().last().cloned()
    }

    pub fn token(&self) -> Option<String> {
        self.token.lock().clone()
    }

    fn take_reply(&self, method: HttpMethod, url: &str) -> Option<ScriptedReply> {
        let mut replies = self.replies.lock();
        let index = replies.iter().position(|reply| {
            reply.method == method && reply.url.as_deref().is_none_or(|u| u == url)
        })?;
        replies.remove(index)
    }
}

#[async_trait]
impl ApiContract for MockApi {
    async fn request(
        &self,
        method: HttpMethod,
        url: &str,
        payload: Option<&Value>,
        config: Option<&RequestConfig>,
    ) -> ApiResult<Value> {
        self.calls.lock().push(RecordedCall {
            method,
            url: url.to_string(),
            payload: payload.cloned(),
            token: self.token(),
            config: config.cloned(),
        });

        let Some(reply) = self.take_reply(method, url) else {
            return Ok(self.default_response.lock().clone());
        };
        if let Some(delay) = reply.delay {
            tokio::time::sleep(delay).await;
        }
        reply.result
    }

    fn set_token(&self, token: &str) {
        *self.token.lock() = Some(token.to_string());
    }

    fn clear_token(&self) {
        *self.token.lock() = None;
    }
}
