// Per-event policy evaluators - pure functions from payload to decision

use crate::core::errors::GateError;
use crate::core::models::{Decision, EventType};
use crate::engine::registry::{PatternCategory, PatternRegistry};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Tool names subject to shell-command policy.
const SHELL_TOOLS: &[&str] = &["Bash"];

/// Tool names subject to file-path policy.
const FILE_TOOLS: &[&str] = &["Read", "Write", "Edit"];

/// Accepted key aliases for the target path, in resolution order.
/// First alias carrying a non-empty string wins.
const FILE_PATH_ALIASES: &[&str] = &["file_path", "filePath"];

/// Fixed block reason for prompts that look like they carry secrets.
pub const SECRET_PROMPT_REASON: &str =
    "Prompt contains potential secrets. Please remove sensitive information.";

/// Staging-directory rewrite policy for file tools.
///
/// Paths under `unsafe_prefix` are redirected under `safe_prefix` instead
/// of being blocked. Both prefixes must be directory-like (trailing slash),
/// which config validation enforces.
#[derive(Debug, Clone)]
pub struct SandboxPolicy {
    pub unsafe_prefix: String,
    pub safe_prefix: String,
}

impl Default for SandboxPolicy {
    fn default() -> Self {
        Self {
            unsafe_prefix: "/tmp/".to_string(),
            safe_prefix: "/safe/tmp/".to_string(),
        }
    }
}

/// Resolve a string field through an ordered list of accepted key aliases.
///
/// Returns the winning alias together with the value, so a rewrite can be
/// written back under the key the caller actually used.
fn resolve_aliased_str<'a>(
    object: &'a Map<String, Value>,
    aliases: &[&'static str],
) -> Option<(&'static str, &'a str)> {
    aliases.iter().find_map(|key| {
        object
            .get(*key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(|s| (*key, s))
    })
}

/// Extract `tool_input` as an object map.
///
/// Absent or null input evaluates like an empty object (nothing to match,
/// so the event allows); any other non-object shape is a malformed payload
/// the router converts to fail-open Allow.
fn tool_input_object(payload: &Value) -> Result<Map<String, Value>, GateError> {
    match payload.get("tool_input") {
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(Value::Null) | None => Ok(Map::new()),
        Some(other) => Err(GateError::MalformedPayload(format!(
            "tool_input must be an object, got {}",
            json_type_name(other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Pre-execution policy for tool invocations.
///
/// Shell tools are screened for dangerous command signatures, file tools
/// for sensitive paths and staging-directory sandboxing. Tools outside
/// both sets pass through unexamined.
pub fn pre_tool_use(
    payload: &Value,
    registry: &PatternRegistry,
    sandbox: &SandboxPolicy,
) -> Result<Decision, GateError> {
    let tool_name = payload
        .get("tool_name")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let tool_input = tool_input_object(payload)?;

    if SHELL_TOOLS.contains(&tool_name) {
        let command = tool_input
            .get("command")
            .and_then(Value::as_str)
            .unwrap_or_default();

        if let Some(pattern) = registry.first_match(PatternCategory::DangerousCommand, command) {
            return Ok(Decision::Block {
                reason: format!("Dangerous command pattern detected: {}", pattern.name()),
            });
        }

        debug!(tool = tool_name, "shell command allowed");
        return Ok(Decision::Allow);
    }

    if FILE_TOOLS.contains(&tool_name) {
        let (alias, path) = match resolve_aliased_str(&tool_input, FILE_PATH_ALIASES) {
            Some(found) => found,
            None => return Ok(Decision::Allow),
        };

        if registry
            .first_match(PatternCategory::SensitivePath, path)
            .is_some()
        {
            return Ok(Decision::Block {
                reason: format!("Access to sensitive file blocked: {}", path),
            });
        }

        // Already sandboxed paths pass untouched, so a rewritten event
        // re-submitted by the host evaluates to plain Allow.
        if path.starts_with(&sandbox.safe_prefix) {
            return Ok(Decision::Allow);
        }

        if let Some(rest) = path.strip_prefix(&sandbox.unsafe_prefix) {
            let rewritten = format!("{}{}", sandbox.safe_prefix, rest);
            debug!(tool = tool_name, original = path, rewritten = %rewritten, "path sandboxed");
            let mut modified = tool_input;
            modified.insert(alias.to_string(), Value::String(rewritten));
            return Ok(Decision::Modify {
                tool_input: Value::Object(modified),
            });
        }

        return Ok(Decision::Allow);
    }

    Ok(Decision::Allow)
}

/// Post-execution check. Advisory-only: logs reported tool failures for
/// observability and never blocks or modifies.
pub fn post_tool_use(payload: &Value) -> Result<Decision, GateError> {
    let tool_name = payload
        .get("tool_name")
        .and_then(Value::as_str)
        .unwrap_or_default();

    let error = payload.get("tool_response").and_then(|r| r.get("error"));
    if let Some(error) = error {
        let reported = match error {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            _ => true,
        };
        if reported {
            warn!(tool = tool_name, error = %error, "tool reported failure");
        }
    }

    Ok(Decision::Allow)
}

/// Screen a submitted prompt for key-value-looking secrets.
pub fn user_prompt(payload: &Value, registry: &PatternRegistry) -> Result<Decision, GateError> {
    let prompt = payload
        .get("prompt")
        .and_then(Value::as_str)
        .unwrap_or_default();

    if let Some(pattern) = registry.first_match(PatternCategory::SecretLeak, prompt) {
        warn!(pattern = pattern.name(), "prompt blocked for secret leak");
        return Ok(Decision::Block {
            reason: SECRET_PROMPT_REASON.to_string(),
        });
    }

    Ok(Decision::Allow)
}

/// No-op policy point for lifecycle events. New lifecycle policies attach
/// here without changing the router contract.
pub fn lifecycle(event_type: EventType, _payload: &Value) -> Result<Decision, GateError> {
    debug!(event = event_type.as_str(), "lifecycle event observed");
    Ok(Decision::Allow)
}
