// src/sanitize.rs
//! Write-boundary guard for JSON request bodies.
//!
//! Mis-wired change handlers on the client sometimes send the whole UI event
//! object instead of the field value. Those objects are collapsed to the
//! string in `target.value` before anything is deserialized or persisted.

use serde_json::{Map, Value};

const EVENT_MARKERS: [&str; 2] = ["nativeEvent", "isDefaultPrevented"];

pub fn is_event_like(map: &Map<String, Value>) -> bool {
    EVENT_MARKERS.iter().any(|key| map.contains_key(*key))
}

/// Recursively rebuild `value` for persistence.
///
/// JSON has no `undefined`, so object keys are never dropped here; an absent
/// value is handled by [`sanitize_opt`].
pub fn sanitize(value: &Value) -> Value {
    match value {
        Value::Object(map) if is_event_like(map) => {
            let target_value = map
                .get("target")
                .and_then(|t| t.get("value"))
                .and_then(Value::as_str)
                .unwrap_or("");
            Value::String(target_value.to_string())
        }
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), sanitize(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(sanitize).collect()),
        other => other.clone(),
    }
}

/// `undefined` becomes `null`.
pub fn sanitize_opt(value: Option<&Value>) -> Value {
    value.map_or(Value::Null, sanitize)
}
