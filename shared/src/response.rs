//! API Response types
//!
//! The backend is not consistent about envelopes: some endpoints wrap
//! payloads in `{ "data": ... }`, some return them bare, some reply with
//! plain text. These types cover the shapes the client reads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Acknowledgement body returned by mutating endpoints
///
/// ```json
/// { "message": "Customer updated successfully", "success": true }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    /// Payload echoed back by some revisions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            success: Some(true),
            data: None,
        }
    }

    /// Interpret any success body: JSON objects are read as-is, plain text
    /// becomes the message (or `fallback` when empty).
    pub fn from_body(body: &str, fallback: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => {
                serde_json::from_value(Value::Object(map)).unwrap_or_else(|_| Self::ok(fallback))
            }
            _ if body.trim().is_empty() => Self::ok(fallback),
            _ => Self::ok(body.trim()),
        }
    }
}

/// Unwrap a `{ "data": ... }` envelope when present
pub fn unwrap_data(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}
