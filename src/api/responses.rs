// Wire replies - Decision to host-contract mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::core::models::{Decision, Evaluation, PROTOCOL_VERSION};

/// Reply body for the hook endpoint.
///
/// Every reply carries the protocol version and a decision tag; `reason`
/// appears only on block, `modified_data` only on modify, and `metadata`
/// carries the fail-open diagnostic when one exists.
#[derive(Debug, Serialize)]
pub struct HookReply {
    pub version: &'static str,
    pub decision: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_data: Option<ModifiedData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ReplyMetadata>,
}

/// Replacement payload substructure on modify decisions.
#[derive(Debug, Serialize)]
pub struct ModifiedData {
    pub tool_input: Value,
}

/// Diagnostic side-channel; advisory only, never part of the decision.
#[derive(Debug, Serialize)]
pub struct ReplyMetadata {
    pub error: String,
}

impl HookReply {
    pub fn from_evaluation(evaluation: Evaluation) -> Self {
        let Evaluation { decision, note } = evaluation;
        let metadata = note.map(|error| ReplyMetadata { error });
        let decision_tag = decision.kind();
        match decision {
            Decision::Allow => Self {
                version: PROTOCOL_VERSION,
                decision: decision_tag,
                reason: None,
                modified_data: None,
                metadata,
            },
            Decision::Block { reason } => Self {
                version: PROTOCOL_VERSION,
                decision: decision_tag,
                reason: Some(reason),
                modified_data: None,
                metadata,
            },
            Decision::Modify { tool_input } => Self {
                version: PROTOCOL_VERSION,
                decision: decision_tag,
                reason: None,
                modified_data: Some(ModifiedData { tool_input }),
                metadata,
            },
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Body for requests outside the hook endpoint.
#[derive(Debug, Serialize)]
pub struct NotFoundResponse {
    pub error: &'static str,
    pub message: &'static str,
}

/// Last-resort transport failure.
///
/// Even here the body stays Allow-flavored: the host must never interpret
/// a gate fault as a block.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: String) -> Self {
        Self { status, message }
    }

    /// Create from GateError, using its status mapping
    pub fn from_gate_error(err: crate::core::errors::GateError) -> Self {
        let status = StatusCode::from_u16(err.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(HookReply::from_evaluation(Evaluation::fail_open(
            self.message,
        )));
        (self.status, body).into_response()
    }
}
