// Event routing - dispatch by event type with a fail-open error boundary

use crate::core::models::{Decision, Evaluation, EventType, HookEvent};
use crate::engine::evaluator::{self, SandboxPolicy};
use crate::engine::registry::PatternRegistry;
use std::sync::Arc;
use tracing::{debug, warn};

/// Maps each event to its evaluator and absorbs evaluator failures.
///
/// The router is the single fail-open boundary: an unrecognized event type
/// or an evaluator-internal error always resolves to Allow, so the gate
/// never blocks legitimate host operation on its own faults. Real threats
/// are only ever blocked by an explicit pattern match inside an evaluator.
pub struct HookRouter {
    registry: Arc<PatternRegistry>,
    sandbox: SandboxPolicy,
}

impl HookRouter {
    pub fn new(registry: Arc<PatternRegistry>, sandbox: SandboxPolicy) -> Self {
        Self { registry, sandbox }
    }

    /// Evaluate one event to a decision.
    pub fn route(&self, event: &HookEvent) -> Evaluation {
        let result = match event.event_type {
            EventType::PreToolUse => {
                evaluator::pre_tool_use(&event.payload, &self.registry, &self.sandbox)
            }
            EventType::PostToolUse => evaluator::post_tool_use(&event.payload),
            EventType::UserPromptSubmit => evaluator::user_prompt(&event.payload, &self.registry),
            EventType::Notification
            | EventType::Stop
            | EventType::SubagentStop
            | EventType::PreCompact => evaluator::lifecycle(event.event_type, &event.payload),
            EventType::Unknown => {
                debug!(session_id = %event.session_id, "unknown event type, allowing");
                Ok(Decision::Allow)
            }
        };

        match result {
            Ok(decision) => Evaluation::of(decision),
            Err(e) => {
                warn!(
                    error = %e,
                    event = event.event_type.as_str(),
                    session_id = %event.session_id,
                    "evaluator failed, failing open"
                );
                Evaluation::fail_open(e.to_string())
            }
        }
    }
}
