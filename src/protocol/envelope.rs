// Envelope normalization - two observed wire shapes, one canonical event

use crate::core::models::{EventType, HookEvent};
use serde_json::Value;
use tracing::debug;

/// Reverse-DNS prefix the CloudEvents envelope puts on event types.
const CLOUDEVENTS_TYPE_PREFIX: &str = "com.claudecode.hook.";

/// Accepted key aliases for the hook payload object, in resolution order.
const PAYLOAD_ALIASES: &[&str] = &["data", "payload"];

/// Normalize a raw request body into a canonical [`HookEvent`].
///
/// Two envelope shapes are accepted:
/// - legacy nested: `{"event": {"type", "session_id"}, "data": {...}}`
/// - CloudEvents-style: `{"type": "com.claudecode.hook.<Subtype>",
///   "sessionid": "...", "data": {...}}`
///
/// Anything unparseable or unrecognized normalizes to an `Unknown` event
/// with an empty payload, which the router allows. The router and the
/// evaluators never see envelope variance.
pub fn normalize(body: &[u8]) -> HookEvent {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, "unparseable envelope, treating as unknown event");
            return HookEvent::unknown();
        }
    };
    normalize_value(&value)
}

/// Normalize an already-parsed envelope.
pub fn normalize_value(value: &Value) -> HookEvent {
    // Legacy nested shape.
    if let Some(event) = value.get("event") {
        let type_name = event.get("type").and_then(Value::as_str).unwrap_or_default();
        let session_id = event
            .get("session_id")
            .and_then(Value::as_str)
            .unwrap_or_default();
        return HookEvent {
            event_type: EventType::from_name(type_name),
            session_id: session_id.to_string(),
            payload: payload_of(value),
        };
    }

    // CloudEvents-style shape. The reverse-DNS prefix is stripped when
    // present; a bare subtype name is accepted as-is.
    if let Some(full_type) = value.get("type").and_then(Value::as_str) {
        let subtype = full_type
            .strip_prefix(CLOUDEVENTS_TYPE_PREFIX)
            .unwrap_or(full_type);
        let session_id = value
            .get("sessionid")
            .and_then(Value::as_str)
            .unwrap_or_default();
        return HookEvent {
            event_type: EventType::from_name(subtype),
            session_id: session_id.to_string(),
            payload: payload_of(value),
        };
    }

    HookEvent::unknown()
}

/// The hook payload object, resolved through the accepted aliases.
/// Non-object payloads are replaced with an empty object.
fn payload_of(value: &Value) -> Value {
    PAYLOAD_ALIASES
        .iter()
        .find_map(|key| value.get(*key))
        .filter(|payload| payload.is_object())
        .cloned()
        .unwrap_or_else(|| Value::Object(serde_json::Map::new()))
}
