// Canonical event and decision models

use serde_json::Value;

/// Protocol version included in every reply to the agent host.
pub const PROTOCOL_VERSION: &str = "1.0";

/// Hook event types emitted by the agent host.
///
/// Anything the host sends that this build does not recognize maps to
/// `Unknown`, which the router always allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    PreToolUse,
    PostToolUse,
    UserPromptSubmit,
    Notification,
    Stop,
    SubagentStop,
    PreCompact,
    Unknown,
}

impl EventType {
    /// Parse a wire-level event name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "PreToolUse" => EventType::PreToolUse,
            "PostToolUse" => EventType::PostToolUse,
            "UserPromptSubmit" => EventType::UserPromptSubmit,
            "Notification" => EventType::Notification,
            "Stop" => EventType::Stop,
            "SubagentStop" => EventType::SubagentStop,
            "PreCompact" => EventType::PreCompact,
            _ => EventType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::PreToolUse => "PreToolUse",
            EventType::PostToolUse => "PostToolUse",
            EventType::UserPromptSubmit => "UserPromptSubmit",
            EventType::Notification => "Notification",
            EventType::Stop => "Stop",
            EventType::SubagentStop => "SubagentStop",
            EventType::PreCompact => "PreCompact",
            EventType::Unknown => "Unknown",
        }
    }
}

/// A single inbound hook event, normalized from either envelope shape.
///
/// Immutable once constructed; lives for exactly one request.
#[derive(Debug, Clone)]
pub struct HookEvent {
    pub event_type: EventType,
    pub session_id: String,
    pub payload: Value,
}

impl HookEvent {
    /// Event produced for unparseable or unrecognized envelopes.
    pub fn unknown() -> Self {
        Self {
            event_type: EventType::Unknown,
            session_id: String::new(),
            payload: Value::Object(serde_json::Map::new()),
        }
    }
}

/// Policy verdict for one event.
///
/// The enum shape is the invariant: a reason exists only on `Block`, a
/// replacement tool input only on `Modify`.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Allow,
    Block { reason: String },
    Modify { tool_input: Value },
}

impl Decision {
    pub fn kind(&self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::Block { .. } => "block",
            Decision::Modify { .. } => "modify",
        }
    }
}

/// Router output: the decision plus an optional fail-open diagnostic.
///
/// The note never changes the decision kind; it records why an evaluator
/// could not run so the caller's observability still sees the failure.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub decision: Decision,
    pub note: Option<String>,
}

impl Evaluation {
    pub fn of(decision: Decision) -> Self {
        Self { decision, note: None }
    }

    pub fn allow() -> Self {
        Self::of(Decision::Allow)
    }

    /// Allow with a diagnostic attached (evaluator-internal failure path).
    pub fn fail_open(note: impl Into<String>) -> Self {
        Self {
            decision: Decision::Allow,
            note: Some(note.into()),
        }
    }
}
