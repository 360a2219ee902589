//! API response types
//!
//! The backend answers either with a bare payload or with an envelope that
//! nests the payload under `data`:
//!
//! ```json
//! { "data": { "list": [...], "total": 42 } }
//! ```
//!
//! Clients accept both shapes through [`unwrap_envelope`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of a list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    /// Items on the requested page
    pub list: Vec<T>,
    /// Size of the whole filtered set
    pub total: u64,
}

impl<T> Default for ListResponse<T> {
    fn default() -> Self {
        Self {
            list: Vec::new(),
            total: 0,
        }
    }
}

/// Error body returned by the backend on failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Strips the `data` envelope if present
///
/// An object that contains a `data` key yields the nested value; anything
/// else is returned unchanged.
pub fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_envelope_nested() {
        let body = json!({"data": {"list": [], "total": 0}});
        assert_eq!(unwrap_envelope(body), json!({"list": [], "total": 0}));
    }

    #[test]
    fn test_unwrap_envelope_bare() {
        let body = json!({"list": [1, 2], "total": 2});
        assert_eq!(unwrap_envelope(body.clone()), body);
    }

    #[test]
    fn test_unwrap_envelope_non_object() {
        assert_eq!(unwrap_envelope(json!(["a", "b"])), json!(["a", "b"]));
        assert_eq!(unwrap_envelope(Value::Null), Value::Null);
    }

    #[test]
    fn test_unwrap_envelope_null_data() {
        assert_eq!(unwrap_envelope(json!({"data": null})), Value::Null);
    }
}
