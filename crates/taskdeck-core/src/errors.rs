//! Normalized remote failure type.
//!
//! Every failure from the remote service is converted into an [`ApiError`]
//! at the HTTP boundary, before it reaches any state. The server's error
//! bodies are loose (`{"detail": ...}`, `{"non_field_errors": [...]}`, or
//! per-field lists); [`ApiError::from_response`] reduces them to a single
//! human-readable message plus a fixed [`ErrorKind`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

const AUTH_FALLBACK: &str = "authentication required";
const VALIDATION_FALLBACK: &str = "request was rejected as invalid";

fn server_fallback(status: u16) -> String {
    format!("server error ({status})")
}

/// Fixed classification of remote failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Missing, invalid or expired credentials.
    Auth,
    /// Transport failure or timeout.
    Network,
    /// The server rejected the request payload.
    Validation,
    /// Any other server-side failure.
    Server,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auth => "auth",
            Self::Network => "network",
            Self::Validation => "validation",
            Self::Server => "server",
        })
    }
}

/// A failed remote call.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ApiError {
    /// HTTP 401/403.
    #[error("{message}")]
    Auth {
        /// HTTP status code.
        status: u16,
        /// Human-readable message.
        message: String,
    },

    /// Transport failure (connection, timeout, undecodable body).
    #[error("{message}")]
    Network {
        /// Human-readable message.
        message: String,
    },

    /// HTTP 400/409/422.
    #[error("{message}")]
    Validation {
        /// HTTP status code.
        status: u16,
        /// Human-readable message.
        message: String,
        /// Per-field messages reported by the server.
        fields: BTreeMap<String, Vec<String>>,
    },

    /// Any other non-success status.
    #[error("{message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Human-readable message.
        message: String,
    },
}

impl ApiError {
    /// Transport-level failure.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Classify a non-success HTTP response.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<Value>(body).ok();
        let detail = parsed.as_ref().and_then(extract_detail);
        let fields = parsed.as_ref().map(extract_fields).unwrap_or_default();

        match status {
            401 | 403 => Self::Auth {
                status,
                message: detail.unwrap_or_else(|| AUTH_FALLBACK.to_string()),
            },
            400 | 409 | 422 => {
                let message = detail
                    .or_else(|| first_field_message(&fields))
                    .unwrap_or_else(|| VALIDATION_FALLBACK.to_string());
                Self::Validation {
                    status,
                    message,
                    fields,
                }
            }
            _ => Self::Server {
                status,
                message: detail.unwrap_or_else(|| server_fallback(status)),
            },
        }
    }

    /// The fixed error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Auth { .. } => ErrorKind::Auth,
            Self::Network { .. } => ErrorKind::Network,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Server { .. } => ErrorKind::Server,
        }
    }

    /// HTTP status, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. }
            | Self::Validation { status, .. }
            | Self::Server { status, .. } => Some(*status),
            Self::Network { .. } => None,
        }
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        match self {
            Self::Auth { message, .. }
            | Self::Network { message }
            | Self::Validation { message, .. }
            | Self::Server { message, .. } => message,
        }
    }

    /// The explanation sent by the server, if the response carried one.
    ///
    /// `None` for transport failures and for responses whose message had to
    /// be synthesized locally.
    pub fn server_message(&self) -> Option<&str> {
        let generated = match self {
            Self::Network { .. } => return None,
            Self::Auth { message, .. } => message == AUTH_FALLBACK,
            Self::Validation { message, .. } => message == VALIDATION_FALLBACK,
            Self::Server { status, message } => *message == server_fallback(*status),
        };
        (!generated).then(|| self.message())
    }

    /// Whether the server answered 401 (session no longer valid).
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

fn extract_detail(body: &Value) -> Option<String> {
    let obj = body.as_object()?;
    if let Some(detail) = obj.get("detail").and_then(Value::as_str) {
        return Some(detail.to_string());
    }
    obj.get("non_field_errors")
        .and_then(Value::as_array)
        .and_then(|errs| errs.first())
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn extract_fields(body: &Value) -> BTreeMap<String, Vec<String>> {
    let Some(obj) = body.as_object() else {
        return BTreeMap::new();
    };
    obj.iter()
        .filter(|(key, _)| key.as_str() != "detail" && key.as_str() != "non_field_errors")
        .filter_map(|(key, value)| {
            let messages: Vec<String> = match value {
                Value::String(s) => vec![s.clone()],
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
                _ => return None,
            };
            (!messages.is_empty()).then(|| (key.clone(), messages))
        })
        .collect()
}

fn first_field_message(fields: &BTreeMap<String, Vec<String>>) -> Option<String> {
    fields
        .iter()
        .find_map(|(field, msgs)| msgs.first().map(|m| format!("{field}: {m}")))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn unauthorized_uses_server_detail() {
        let err = ApiError::from_response(
            401,
            r#"{"detail": "No active account found with the given credentials"}"#,
        );
        assert_eq!(err.kind(), ErrorKind::Auth);
        assert!(err.is_unauthorized());
        assert_eq!(
            err.to_string(),
            "No active account found with the given credentials"
        );
    }

    #[test]
    fn forbidden_without_body_gets_generic_message() {
        let err = ApiError::from_response(403, "");
        assert_matches!(err, ApiError::Auth { status: 403, .. });
        assert!(!err.is_unauthorized());
        assert_eq!(err.message(), "authentication required");
    }

    #[test]
    fn field_errors_become_validation() {
        let err = ApiError::from_response(400, r#"{"title": ["This field may not be blank."]}"#);
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.message(), "title: This field may not be blank.");
        assert_matches!(err, ApiError::Validation { ref fields, .. } if fields.contains_key("title"));
    }

    #[test]
    fn non_field_errors_preferred_over_fields() {
        let err = ApiError::from_response(
            400,
            r#"{"non_field_errors": ["Dates are inverted."], "date_to": ["bad"]}"#,
        );
        assert_eq!(err.message(), "Dates are inverted.");
    }

    #[test]
    fn server_error_with_html_body() {
        let err = ApiError::from_response(502, "<html>Bad Gateway</html>");
        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.message(), "server error (502)");
    }

    #[test]
    fn not_found_is_server_kind() {
        let err = ApiError::from_response(404, r#"{"detail": "Not found."}"#);
        assert_matches!(err, ApiError::Server { status: 404, .. });
        assert_eq!(err.message(), "Not found.");
    }

    #[test]
    fn server_message_only_for_server_text() {
        let with_detail =
            ApiError::from_response(503, r#"{"detail": "Service under maintenance"}"#);
        assert_eq!(with_detail.server_message(), Some("Service under maintenance"));

        assert_eq!(ApiError::from_response(502, "<html>").server_message(), None);
        assert_eq!(ApiError::from_response(401, "").server_message(), None);
        assert_eq!(ApiError::network("request timed out").server_message(), None);
        assert_eq!(
            ApiError::from_response(400, r#"{"title": ["required"]}"#).server_message(),
            Some("title: required")
        );
    }

    #[test]
    fn network_error_has_no_status() {
        let err = ApiError::network("request timed out");
        assert_eq!(err.kind(), ErrorKind::Network);
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "request timed out");
    }
}
