//! Payload sanitisation.
//!
//! Both functions take their input by value and build a new value; nothing is edited in place.

use crate::constants::OWNER_KEY;
use serde_json::{Map, Value};

/// Removes every empty-string value, at any depth.
///
/// Object fields whose value is `""` are dropped, as are `""` elements of arrays. A submitted
/// form with an untouched text box therefore leaves the stored value alone instead of blanking
/// it. Other values, including `null`, are kept.
///
/// ```
/// use pvault_core::sanitize::strip_blank_fields;
/// use serde_json::json;
///
/// let cleaned = strip_blank_fields(json!({ "patient": { "name": "", "ward": "B" } }));
/// assert_eq!(cleaned, json!({ "patient": { "ward": "B" } }));
/// ```
pub fn strip_blank_fields(value: Value) -> Value {
    match value {
        Value::Object(fields) => Value::Object(strip_blank_object(fields)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .filter(|item| !is_blank(item))
                .map(strip_blank_fields)
                .collect(),
        ),
        other => other,
    }
}

fn strip_blank_object(fields: Map<String, Value>) -> Map<String, Value> {
    fields
        .into_iter()
        .filter(|(_, v)| !is_blank(v))
        .map(|(k, v)| (k, strip_blank_fields(v)))
        .collect()
}

fn is_blank(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.is_empty())
}

/// Returns `attributes` without any client-supplied `owner` key.
pub fn without_owner(attributes: Map<String, Value>) -> Map<String, Value> {
    attributes
        .into_iter()
        .filter(|(key, _)| key != OWNER_KEY)
        .collect()
}
