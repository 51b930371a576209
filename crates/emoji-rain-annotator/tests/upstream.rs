//! Integration tests for the annotation client against a local fake API.
//!
//! Each test binds an Axum server on `127.0.0.1:0` that imitates the
//! completion endpoint, then points the [`Annotator`] at it.

#![allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use emoji_rain_annotator::{Annotator, AnnotatorConfig, AnnotatorError, BackendType, SYSTEM_PROMPT};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// What the fake API saw on its last request.
#[derive(Default)]
struct Captured {
    authorization: Option<String>,
    api_key: Option<String>,
    body: Option<Value>,
}

async fn spawn_upstream(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn annotator(backend_type: BackendType, url: &str, timeout: Duration) -> Annotator {
    let mut config = AnnotatorConfig::new(backend_type, url, "sk-test", "glm-test");
    config.timeout = timeout;
    Annotator::new(&config).unwrap()
}

#[tokio::test]
async fn openai_success_returns_annotated_text() {
    let captured = Arc::new(Mutex::new(Captured::default()));
    let seen = Arc::clone(&captured);

    let router = Router::new().route(
        "/chat/completions",
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let seen = Arc::clone(&seen);
            async move {
                let user = body["messages"][1]["content"].as_str().unwrap_or("").to_owned();
                let mut slot = seen.lock().unwrap();
                slot.authorization = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(ToOwned::to_owned);
                slot.body = Some(body);
                drop(slot);
                Json(json!({
                    "choices": [{"message": {"role": "assistant", "content": format!("{user} 👋🌍")}}]
                }))
            }
        }),
    );
    let url = spawn_upstream(router).await;

    let result = annotator(BackendType::OpenAi, &url, Duration::from_secs(5))
        .annotate("hello world")
        .await
        .unwrap();
    assert_eq!(result, "hello world 👋🌍");

    let captured = captured.lock().unwrap();
    assert_eq!(captured.authorization.as_deref(), Some("Bearer sk-test"));
    let body = captured.body.as_ref().unwrap();
    assert_eq!(body["model"], "glm-test");
    assert_eq!(body["messages"][0]["content"], SYSTEM_PROMPT);
    assert_eq!(body["temperature"], 0.7);
    assert_eq!(body["max_tokens"], 1000);
}

#[tokio::test]
async fn anthropic_success_uses_api_key_header() {
    let captured = Arc::new(Mutex::new(Captured::default()));
    let seen = Arc::clone(&captured);

    let router = Router::new().route(
        "/messages",
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let seen = Arc::clone(&seen);
            async move {
                let mut slot = seen.lock().unwrap();
                slot.api_key = headers
                    .get("x-api-key")
                    .and_then(|v| v.to_str().ok())
                    .map(ToOwned::to_owned);
                slot.body = Some(body);
                drop(slot);
                Json(json!({"content": [{"type": "text", "text": "hi 👋"}]}))
            }
        }),
    );
    let url = spawn_upstream(router).await;

    let result = annotator(BackendType::Anthropic, &url, Duration::from_secs(5))
        .annotate("hi")
        .await
        .unwrap();
    assert_eq!(result, "hi 👋");

    let captured = captured.lock().unwrap();
    assert_eq!(captured.api_key.as_deref(), Some("sk-test"));
    assert_eq!(captured.body.as_ref().unwrap()["system"], SYSTEM_PROMPT);
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let router = Router::new().route(
        "/chat/completions",
        post(|| async { (StatusCode::UNAUTHORIZED, "invalid api key") }),
    );
    let url = spawn_upstream(router).await;

    let err = annotator(BackendType::OpenAi, &url, Duration::from_secs(5))
        .annotate("hello")
        .await
        .unwrap_err();

    match err {
        AnnotatorError::Status { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid api key");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_reported() {
    let router = Router::new().route(
        "/chat/completions",
        post(|| async { Json(json!({"choices": []})) }),
    );
    let url = spawn_upstream(router).await;

    let err = annotator(BackendType::OpenAi, &url, Duration::from_secs(5))
        .annotate("hello")
        .await
        .unwrap_err();
    assert!(matches!(err, AnnotatorError::MalformedResponse(_)));
}

#[tokio::test]
async fn non_json_body_is_reported() {
    let router = Router::new().route(
        "/chat/completions",
        post(|| async { "<html>gateway</html>" }),
    );
    let url = spawn_upstream(router).await;

    let err = annotator(BackendType::OpenAi, &url, Duration::from_secs(5))
        .annotate("hello")
        .await
        .unwrap_err();
    assert!(matches!(err, AnnotatorError::MalformedResponse(_)));
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let router = Router::new().route(
        "/chat/completions",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"choices": [{"message": {"content": "too late"}}]}))
        }),
    );
    let url = spawn_upstream(router).await;

    let err = annotator(BackendType::OpenAi, &url, Duration::from_millis(100))
        .annotate("hello")
        .await
        .unwrap_err();
    assert!(matches!(err, AnnotatorError::Timeout(d) if d == Duration::from_millis(100)));
}

#[tokio::test]
async fn unreachable_upstream_is_a_request_error() {
    // Bind then drop to obtain a port with nothing listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = annotator(BackendType::OpenAi, &format!("http://{addr}"), Duration::from_secs(5))
        .annotate("hello")
        .await
        .unwrap_err();
    assert!(matches!(err, AnnotatorError::Request(_)));
}
