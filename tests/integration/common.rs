// Shared helpers for integration tests

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use sentinel_hookgate::api::{create_router, AppState};
use sentinel_hookgate::config::Config;
use sentinel_hookgate::engine::evaluator::SandboxPolicy;
use sentinel_hookgate::engine::registry::PatternRegistry;
use sentinel_hookgate::engine::router::HookRouter;
use std::sync::Arc;
use tower::ServiceExt;

pub fn test_app() -> Router {
    let config = Arc::new(Config::test_config());
    let registry = Arc::new(PatternRegistry::builtin().unwrap());
    let sandbox = SandboxPolicy {
        unsafe_prefix: config.unsafe_staging_prefix.clone(),
        safe_prefix: config.safe_staging_prefix.clone(),
    };
    let router = Arc::new(HookRouter::new(registry, sandbox));

    create_router(AppState { router, config })
}

/// POST a raw body to /hook and return status plus parsed reply.
pub async fn post_hook_raw(body: &[u8]) -> (StatusCode, serde_json::Value) {
    let app = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/hook")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_vec()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let reply: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, reply)
}

/// POST a JSON envelope to /hook.
pub async fn post_hook(envelope: &serde_json::Value) -> (StatusCode, serde_json::Value) {
    post_hook_raw(envelope.to_string().as_bytes()).await
}

/// Wrap an event payload in the legacy nested envelope shape.
pub fn legacy_envelope(event_type: &str, data: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "event": {"type": event_type, "session_id": "test-session"},
        "data": data
    })
}

/// Wrap an event payload in the CloudEvents-style envelope shape.
pub fn cloudevents_envelope(event_type: &str, data: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "specversion": "1.0",
        "type": format!("com.claudecode.hook.{}", event_type),
        "source": "/claude-code/hooks",
        "sessionid": "test-session",
        "data": data
    })
}
