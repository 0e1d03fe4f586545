//! Response envelope handling.
//!
//! The API answers either flat (`{"status": ..., "check_id": ...}`) or wrapped
//! (`{"status": ..., "data": {...}}`). Every response goes through
//! [`normalize`] so the response types only ever see the flat shape.

use crate::errors::KycError;
use serde_json::{Map, Value};

/// Flattens a wrapped envelope into a single map.
///
/// When `data` is an object, the result holds every top-level field except
/// `data`, overlaid with the contents of `data` (inner keys win). Any other
/// body, including one whose `data` is an array, is returned unchanged.
pub fn normalize(mut body: Map<String, Value>) -> Map<String, Value> {
    if !matches!(body.get("data"), Some(Value::Object(_))) {
        return body;
    }

    let Some(Value::Object(inner)) = body.remove("data") else {
        return body;
    };
    tracing::debug!(
        "Flattening wrapped response envelope ({} inner fields)",
        inner.len()
    );
    body.extend(inner);
    body
}

/// Decodes a response body and requires a top-level JSON object.
pub fn parse_object(bytes: &[u8]) -> Result<Map<String, Value>, KycError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| KycError::InvalidResponse(format!("body is not valid JSON: {}", e)))?;

    match value {
        Value::Object(map) => Ok(map),
        other => {
            tracing::warn!("Unexpected response shape: {}", json_kind(&other));
            Err(KycError::InvalidResponse(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            )))
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
