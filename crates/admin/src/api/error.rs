//! Backend API errors.

use std::collections::BTreeMap;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Errors returned by the REST backend client.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// 422 with per-field messages.
    #[error("Validation failed: {0:?}")]
    Validation(FieldErrors),

    /// 401; the session is no longer valid.
    #[error("Unauthorized")]
    Unauthorized,

    /// 403.
    #[error("Forbidden")]
    Forbidden,

    /// 404.
    #[error("Not found")]
    NotFound,

    /// 409, e.g. a duplicate email.
    #[error("Conflict: {}", .0.as_deref().unwrap_or("-"))]
    Conflict(Option<String>),

    /// No response: connection refused, DNS failure, timeout.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a body the dashboard cannot interpret.
    #[error("Unexpected response format{}", .0.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    UnexpectedShape(Option<String>),

    /// Any other non-success status.
    #[error("Backend returned {status}: {}", .message.as_deref().unwrap_or("-"))]
    Status {
        status: u16,
        message: Option<String>,
    },
}

/// Field name to messages, ordered by field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Error body shapes the backend uses.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<serde_json::Value>,
}

impl ApiError {
    /// Classify a non-success response from its status and raw body.
    #[must_use]
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = parsed.message.filter(|m| !m.trim().is_empty());

        match status {
            StatusCode::UNPROCESSABLE_ENTITY => {
                let mut fields = parsed.errors.map(field_errors).unwrap_or_default();
                if fields.is_empty() {
                    if let Some(message) = message {
                        fields.insert(String::new(), vec![message]);
                    }
                }
                Self::Validation(fields)
            }
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            StatusCode::FORBIDDEN => Self::Forbidden,
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::CONFLICT => Self::Conflict(message),
            _ => Self::Status {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Classify a transport failure.
    #[must_use]
    pub fn from_transport(error: &reqwest::Error) -> Self {
        if error.is_decode() {
            return Self::UnexpectedShape(Some(error.to_string()));
        }
        if let Some(status) = error.status() {
            return Self::from_response(status, "");
        }
        Self::Network(error.to_string())
    }

    /// Whether the session must be dropped.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Message shown to the dashboard user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(fields) => {
                let joined = fields
                    .iter()
                    .filter(|(_, messages)| !messages.is_empty())
                    .map(|(field, messages)| {
                        if field.is_empty() {
                            messages.join(", ")
                        } else {
                            format!("{field}: {}", messages.join(", "))
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("; ");
                if joined.is_empty() {
                    "Some fields are invalid.".to_string()
                } else {
                    joined
                }
            }
            Self::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
            Self::Forbidden => "You do not have permission to perform this action.".to_string(),
            Self::NotFound => "The requested record was not found.".to_string(),
            Self::Conflict(message) => message.clone().unwrap_or_else(|| {
                "This record conflicts with an existing one, for example a duplicate email."
                    .to_string()
            }),
            Self::Network(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            Self::UnexpectedShape(message) => match message {
                Some(m) => format!("Unexpected response format from the server: {m}"),
                None => "Unexpected response format from the server.".to_string(),
            },
            Self::Status { .. } => "Something went wrong. Please try again.".to_string(),
        }
    }
}

/// Accepts `{field: ["msg", ...]}` or `{field: "msg"}`.
fn field_errors(value: serde_json::Value) -> FieldErrors {
    let serde_json::Value::Object(map) = value else {
        return FieldErrors::new();
    };

    map.into_iter()
        .map(|(field, messages)| {
            let messages = match messages {
                serde_json::Value::String(m) => vec![m],
                serde_json::Value::Array(items) => items
                    .into_iter()
                    .filter_map(|m| m.as_str().map(str::to_owned))
                    .collect(),
                _ => Vec::new(),
            };
            (field, messages)
        })
        .filter(|(_, messages)| !messages.is_empty())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_join_per_field() {
        let body = r#"{"message":"invalid","errors":{"email":["taken","too long"],"name":"required"}}"#;
        let err = ApiError::from_response(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert_eq!(
            err.user_message(),
            "email: taken, too long; name: required"
        );
    }

    #[test]
    fn test_validation_without_field_map_uses_message() {
        let err = ApiError::from_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"message":"Email sudah terdaftar"}"#,
        );
        assert_eq!(err.user_message(), "Email sudah terdaftar");
    }

    #[test]
    fn test_status_mapping() {
        assert!(ApiError::from_response(StatusCode::UNAUTHORIZED, "").is_unauthorized());
        assert!(matches!(
            ApiError::from_response(StatusCode::FORBIDDEN, "nope"),
            ApiError::Forbidden
        ));
        assert!(matches!(
            ApiError::from_response(StatusCode::NOT_FOUND, "{}"),
            ApiError::NotFound
        ));
        assert!(matches!(
            ApiError::from_response(StatusCode::BAD_GATEWAY, "<html>"),
            ApiError::Status { status: 502, message: None }
        ));
    }

    #[test]
    fn test_conflict_prefers_backend_message() {
        let err = ApiError::from_response(StatusCode::CONFLICT, r#"{"message":"Duplicate email"}"#);
        assert_eq!(err.user_message(), "Duplicate email");
        let err = ApiError::from_response(StatusCode::CONFLICT, "");
        assert!(err.user_message().contains("duplicate email"));
    }

    #[test]
    fn test_user_messages_are_never_empty() {
        let errors = [
            ApiError::Validation(FieldErrors::new()),
            ApiError::Unauthorized,
            ApiError::Forbidden,
            ApiError::NotFound,
            ApiError::Conflict(None),
            ApiError::Network("refused".to_string()),
            ApiError::UnexpectedShape(None),
            ApiError::Status { status: 500, message: None },
        ];
        for err in errors {
            assert!(!err.user_message().is_empty(), "{err:?}");
        }
    }
}
