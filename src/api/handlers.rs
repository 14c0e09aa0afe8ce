// Request handlers for the hook endpoint

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
};
use tracing::{debug, info, warn};

use crate::api::responses::{HealthResponse, HookReply, NotFoundResponse};
use crate::api::AppState;
use crate::core::models::Decision;
use crate::protocol::envelope;

/// Main handler for hook events
///
/// POST /hook
///
/// Request flow:
/// 1. Extract request ID from headers or generate UUID
/// 2. Normalize the envelope (either shape) to a canonical event
/// 3. Route the event to its evaluator
/// 4. Encode the decision as the wire reply
///
/// The body is taken raw rather than through the Json extractor: a
/// malformed envelope must normalize to an Unknown event and answer
/// 200 Allow, never a 4xx rejection.
pub async fn hook_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<HookReply> {
    let request_id = headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let event = envelope::normalize(&body);

    info!(
        event = event.event_type.as_str(),
        session_id = %event.session_id,
        request_id = %request_id,
        "Received hook event"
    );

    let evaluation = app_state.router.route(&event);

    match &evaluation.decision {
        Decision::Block { reason } => {
            warn!(
                event = event.event_type.as_str(),
                session_id = %event.session_id,
                request_id = %request_id,
                reason = %reason,
                "Policy violation: event blocked"
            );
        }
        Decision::Modify { .. } => {
            info!(
                event = event.event_type.as_str(),
                session_id = %event.session_id,
                request_id = %request_id,
                "Tool input modified by policy"
            );
        }
        Decision::Allow => {
            debug!(request_id = %request_id, "Event allowed");
        }
    }

    Json(HookReply::from_evaluation(evaluation))
}

/// Health check handler
///
/// GET /health
///
/// The gate holds no backends, so liveness is the whole story.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

/// Fallback for requests outside the hook endpoint
pub async fn not_found_handler() -> (StatusCode, Json<NotFoundResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            error: "Not found",
            message: "Webhook endpoint is at /hook",
        }),
    )
}
