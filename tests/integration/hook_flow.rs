// End-to-end policy behavior over the HTTP surface

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

use super::common::{legacy_envelope, post_hook, post_hook_raw, test_app};

#[tokio::test]
async fn test_dangerous_command_is_blocked() {
    let envelope = legacy_envelope(
        "PreToolUse",
        json!({"tool_name": "Bash", "tool_input": {"command": "rm -rf /"}}),
    );
    let (status, reply) = post_hook(&envelope).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["version"], "1.0");
    assert_eq!(reply["decision"], "block");
    assert!(reply["reason"]
        .as_str()
        .unwrap()
        .contains("recursive root deletion"));
}

#[tokio::test]
async fn test_dangerous_command_blocked_despite_case_and_whitespace() {
    let envelope = legacy_envelope(
        "PreToolUse",
        json!({"tool_name": "Bash", "tool_input": {"command": "   RM   -RF   /home   "}}),
    );
    let (_, reply) = post_hook(&envelope).await;
    assert_eq!(reply["decision"], "block");
}

#[tokio::test]
async fn test_safe_command_is_allowed() {
    let envelope = legacy_envelope(
        "PreToolUse",
        json!({"tool_name": "Bash", "tool_input": {"command": "cargo build"}}),
    );
    let (status, reply) = post_hook(&envelope).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["decision"], "allow");
    assert!(reply.get("reason").is_none());
    assert!(reply.get("modified_data").is_none());
}

#[tokio::test]
async fn test_sensitive_path_is_blocked_before_rewrite() {
    // Sensitive and under the unsafe staging prefix: block wins.
    let envelope = legacy_envelope(
        "PreToolUse",
        json!({"tool_name": "Read", "tool_input": {"file_path": "/tmp/stash/.ssh/id_rsa"}}),
    );
    let (_, reply) = post_hook(&envelope).await;

    assert_eq!(reply["decision"], "block");
    assert!(reply["reason"]
        .as_str()
        .unwrap()
        .contains("/tmp/stash/.ssh/id_rsa"));
    assert!(reply.get("modified_data").is_none());
}

#[tokio::test]
async fn test_staging_path_is_rewritten() {
    let envelope = legacy_envelope(
        "PreToolUse",
        json!({
            "tool_name": "Write",
            "tool_input": {"file_path": "/tmp/output.txt", "content": "report"}
        }),
    );
    let (status, reply) = post_hook(&envelope).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["decision"], "modify");
    let tool_input = &reply["modified_data"]["tool_input"];
    assert_eq!(tool_input["file_path"], "/safe/tmp/output.txt");
    assert_eq!(tool_input["content"], "report");
}

#[tokio::test]
async fn test_rewrite_is_idempotent_across_requests() {
    // Submit the already-rewritten path again: plain allow, no second rewrite.
    let envelope = legacy_envelope(
        "PreToolUse",
        json!({"tool_name": "Write", "tool_input": {"file_path": "/safe/tmp/output.txt"}}),
    );
    let (_, reply) = post_hook(&envelope).await;

    assert_eq!(reply["decision"], "allow");
    assert!(reply.get("modified_data").is_none());
}

#[tokio::test]
async fn test_prompt_with_secret_is_blocked() {
    let envelope = legacy_envelope(
        "UserPromptSubmit",
        json!({"prompt": "use api_key: abcd1234 to call the service"}),
    );
    let (_, reply) = post_hook(&envelope).await;

    assert_eq!(reply["decision"], "block");
    assert!(reply["reason"].as_str().unwrap().contains("potential secrets"));
}

#[tokio::test]
async fn test_clean_prompt_is_allowed() {
    let envelope = legacy_envelope(
        "UserPromptSubmit",
        json!({"prompt": "summarize the changelog"}),
    );
    let (_, reply) = post_hook(&envelope).await;
    assert_eq!(reply["decision"], "allow");
}

#[tokio::test]
async fn test_post_tool_use_never_blocks() {
    let envelope = legacy_envelope(
        "PostToolUse",
        json!({
            "tool_name": "Bash",
            "tool_input": {"command": "rm -rf /"},
            "tool_response": {"error": "permission denied"}
        }),
    );
    let (status, reply) = post_hook(&envelope).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["decision"], "allow");
}

#[tokio::test]
async fn test_unknown_event_type_is_allowed() {
    let envelope = legacy_envelope("SomethingNew", json!({"anything": true}));
    let (status, reply) = post_hook(&envelope).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["decision"], "allow");
    assert!(reply.get("reason").is_none());
    assert!(reply.get("modified_data").is_none());
}

#[tokio::test]
async fn test_lifecycle_events_are_allowed() {
    for event_type in ["Notification", "Stop", "SubagentStop", "PreCompact"] {
        let envelope = legacy_envelope(event_type, json!({"message": "done"}));
        let (status, reply) = post_hook(&envelope).await;
        assert_eq!(status, StatusCode::OK, "{}", event_type);
        assert_eq!(reply["decision"], "allow", "{}", event_type);
    }
}

#[tokio::test]
async fn test_malformed_body_still_answers_allow() {
    let (status, reply) = post_hook_raw(b"{this is not json").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["version"], "1.0");
    assert_eq!(reply["decision"], "allow");
}

#[tokio::test]
async fn test_empty_body_still_answers_allow() {
    let (status, reply) = post_hook_raw(b"").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["decision"], "allow");
}

#[tokio::test]
async fn test_malformed_payload_fails_open_with_diagnostic() {
    let envelope = legacy_envelope(
        "PreToolUse",
        json!({"tool_name": "Bash", "tool_input": "rm -rf /"}),
    );
    let (status, reply) = post_hook(&envelope).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["decision"], "allow");
    assert!(reply["metadata"]["error"]
        .as_str()
        .unwrap()
        .contains("tool_input"));
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app();
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let health: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(health["status"], "healthy");
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let app = test_app();
    let request = Request::builder()
        .uri("/nope")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Not found");
    assert_eq!(body["message"], "Webhook endpoint is at /hook");
}
