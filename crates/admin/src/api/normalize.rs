//! Collection response normalization.
//!
//! The backend wraps collections inconsistently. Three shapes are accepted:
//!
//! ```text
//! [ {...}, {...} ]
//! { "data": [ ... ] }
//! { "success": true, "data": [ ... ] }
//! ```
//!
//! Everything else, including `{ "success": false }`, is an
//! [`ApiError::UnexpectedShape`].

use serde_json::Value;

use super::error::ApiError;

/// Extract the record array from a collection response.
///
/// # Errors
///
/// Returns `ApiError::UnexpectedShape` carrying the backend's `message`, when
/// present, if the body is not one of the accepted shapes.
pub fn collection(body: Value) -> Result<Vec<Value>, ApiError> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => {
            let rejected = map.get("success").and_then(Value::as_bool) == Some(false);
            let message = map
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.trim().is_empty())
                .map(str::to_owned);

            match map.remove("data") {
                Some(Value::Array(items)) if !rejected => Ok(items),
                _ => Err(ApiError::UnexpectedShape(message)),
            }
        }
        _ => Err(ApiError::UnexpectedShape(None)),
    }
}
