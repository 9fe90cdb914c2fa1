#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use wicket_api::config::AppConfig;
use wicket_api::gateway::{app, AppState};
use wicket_api::host::MemoryHost;
use wicket_api::token::TokenService;

pub const TEST_SECRET: &str = "integration-test-secret";

/// In-process gateway with a seeded memory host. The host handle stays
/// available so tests can inspect what actually reached the data layer.
pub struct TestGateway {
    pub router: Router,
    pub host: Arc<MemoryHost>,
    pub tokens: TokenService,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.token_secret = TEST_SECRET.to_string();
    config
}

pub fn gateway() -> TestGateway {
    gateway_with(test_config())
}

pub fn gateway_with(config: AppConfig) -> TestGateway {
    let host = Arc::new(
        MemoryHost::new()
            .with_user("alice", "secret", &["author"])
            .with_user("bob", "hunter2", &["subscriber"])
            .with_user("carol", "letmein", &["contributor"]),
    );
    let tokens = TokenService::new(&config.security);
    let state = AppState::new(&config, host.clone());

    TestGateway {
        router: app(state),
        host,
        tokens,
    }
}

/// POST a JSON payload; returns the status and the decoded JSON body
/// (Value::Null when the body is empty or not JSON).
pub async fn post_json(
    router: &Router,
    path: &str,
    body: Value,
    bearer: Option<&str>,
) -> (StatusCode, Value) {
    post_raw(router, path, body.to_string(), bearer).await
}

pub async fn post_raw(
    router: &Router,
    path: &str,
    body: String,
    bearer: Option<&str>,
) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json");
    if let Some(token) = bearer {
        request = request.header("authorization", format!("Bearer {}", token));
    }

    send(router, request.body(Body::from(body)).unwrap()).await
}

pub async fn get(router: &Router, path: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap();
    send(router, request).await
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.expect("router call");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body read");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub fn error_message(body: &Value) -> Option<&str> {
    body.get("error").and_then(Value::as_str)
}
