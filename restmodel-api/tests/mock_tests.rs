use restmodel_api::mock::MockApi;
use restmodel_api::{ApiContract, ApiError, HttpMethod};
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn default_response_and_recording() {
    let api = MockApi::new();
    let result = api.post("/posts", Some(&json!({"title": "x"})), None).await.unwrap();
    assert_eq!(result, json!("response"));

    let call = api.last_call().unwrap();
    assert_eq!(call.method, HttpMethod::Post);
    assert_eq!(call.url, "/posts");
    assert_eq!(call.payload, Some(json!({"title": "x"})));
    assert_eq!(api.call_count(HttpMethod::Post), 1);
    assert_eq!(api.call_count(HttpMethod::Get), 0);
}

#[tokio::test]
async fn scripted_replies_match_method_and_url() {
    let api = MockApi::new();
    api.reply_to(HttpMethod::Get, "/posts/2", Ok(json!({"id": 2})));
    api.reply(HttpMethod::Get, Ok(json!({"id": "any"})));

    assert_eq!(api.get("/posts/1", None, None).await.unwrap(), json!({"id": "any"}));
    assert_eq!(api.get("/posts/2", None, None).await.unwrap(), json!({"id": 2}));
    assert_eq!(api.get("/posts/3", None, None).await.unwrap(), json!("response"));
}

#[tokio::test]
async fn scripted_errors_are_returned() {
    let api = MockApi::new();
    api.reply(HttpMethod::Delete, Err(ApiError::NotFound { data: None }));
    let err = api.delete("/posts/1", None, None).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test(start_paused = true)]
async fn delayed_reply_waits() {
    let api = MockApi::new();
    api.reply_after(HttpMethod::Put, Duration::from_millis(50), Ok(json!({"ok": true})));

    let started = tokio::time::Instant::now();
    api.put("/x", None, None).await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(50));
}

#[tokio::test]
async fn token_is_recorded_with_calls() {
    let api = MockApi::new();
    api.set_token("t1");
    api.get("/me", None, None).await.unwrap();
    assert_eq!(api.last_call().unwrap().token.as_deref(), Some("t1"));

    api.clear_token();
    assert!(api.token().is_none());
}
