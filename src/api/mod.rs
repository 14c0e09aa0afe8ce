// Axum web server layer

use axum::{error_handling::HandleErrorLayer, http::StatusCode, BoxError, Router};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub mod handlers;
pub mod responses;

use crate::config::Config;
use crate::core::errors::GateError;
use crate::engine::router::HookRouter;
use responses::ApiError;

/// Application state containing all shared dependencies
///
/// The router (and the pattern registry behind it) is read-only after
/// startup, so clones are cheap Arc bumps and requests share no mutable
/// state.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<HookRouter>,
    pub config: Arc<Config>,
}

/// Create the Axum router with all routes and middleware
///
/// Middleware stack (outermost to innermost):
/// - Tracing middleware (tower-http::trace) - structured request logging
/// - Error handling + request timeout (tower::timeout) - the last-resort
///   transport-failure path; its body is still Allow-flavored
/// - Body size limit (tower-http::limit)
pub fn create_router(app_state: AppState) -> Router {
    let body_limit = app_state.config.body_size_limit_bytes;
    let timeout_secs = app_state.config.request_timeout_secs;

    let router = Router::new()
        .route("/hook", axum::routing::post(handlers::hook_handler))
        .route("/health", axum::routing::get(handlers::health_handler))
        .fallback(handlers::not_found_handler)
        .with_state(app_state)
        .layer(RequestBodyLimitLayer::new(body_limit));

    // HandleErrorLayer must come BEFORE timeout to catch the timeout error
    let middleware_stack = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(|e: BoxError| async move {
            if e.is::<tower::timeout::error::Elapsed>() {
                ApiError::new(StatusCode::REQUEST_TIMEOUT, "request timed out".to_string())
            } else {
                ApiError::from_gate_error(GateError::EncodingError(e.to_string()))
            }
        }))
        .timeout(Duration::from_secs(timeout_secs))
        .into_inner();

    router
        .layer(middleware_stack)
        .layer(TraceLayer::new_for_http())
}
