//! Error types for the treasury client.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Result type for treasury client operations.
pub type Result<T> = std::result::Result<T, TreasuryError>;

/// Treasury client errors.
///
/// Only two classes matter to a screen: [`TreasuryError::Unauthorized`]
/// (the session is gone, go to the login view) and everything else (show
/// [`TreasuryError::user_message`] in a dismissible notification).
#[derive(Debug, Error)]
pub enum TreasuryError {
    /// The backend answered 401. The session gate has already been cleared.
    #[error("Your session has expired. Please sign in again.")]
    Unauthorized,

    /// An authenticated call was attempted with nobody signed in.
    #[error("Not signed in")]
    NotAuthenticated,

    /// Non-2xx response; `message` is the flattened backend `detail`.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Input rejected before anything was sent.
    #[error("{0}")]
    Invalid(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Live-update channel failure (connect, stream, or retries exhausted).
    #[error("Live update error: {0}")]
    Live(String),
}

impl TreasuryError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, TreasuryError::Unauthorized)
    }

    /// Text for a notification. Backend validation messages are shown
    /// verbatim; everything else gets the error's display form.
    pub fn user_message(&self) -> String {
        match self {
            TreasuryError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Durable session storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// JWT payload decoding errors. Signatures are never checked client-side.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token is not a three-part JWT")]
    Malformed,

    #[error("Token payload is not base64url: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("Token claims are not valid JSON: {0}")]
    Claims(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Detail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Detail {
    Message(String),
    Fields(Vec<FieldError>),
}

#[derive(Debug, Deserialize)]
struct FieldError {
    #[serde(default)]
    loc: Vec<serde_json::Value>,
    msg: String,
}

impl FieldError {
    fn field(&self) -> Option<String> {
        let last = self.loc.iter().rev().find(|segment| segment.as_str() != Some("body"))?;
        match last {
            serde_json::Value::String(name) => Some(name.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Flatten a backend error body into one human-readable line.
///
/// `{"detail": "..."}` yields the string; `{"detail": [{"loc": [...], "msg": ...}]}`
/// yields `"field: msg; field: msg"`. Returns `None` for anything else.
pub fn flatten_error_body(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail {
        Detail::Message(message) => Some(message),
        Detail::Fields(fields) if fields.is_empty() => None,
        Detail::Fields(fields) => Some(
            fields
                .iter()
                .map(|f| match f.field() {
                    Some(field) => format!("{}: {}", field, f.msg),
                    None => f.msg.clone(),
                })
                .collect::<Vec<_>>()
                .join("; "),
        ),
    }
}

pub(crate) fn api_error(status: StatusCode, body: &str) -> TreasuryError {
    let message = flatten_error_body(body).unwrap_or_else(|| {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        } else {
            trimmed.to_string()
        }
    });

    TreasuryError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail_is_used_verbatim() {
        let body = r#"{"detail": "Insufficient funds in treasury"}"#;
        assert_eq!(
            flatten_error_body(body).as_deref(),
            Some("Insufficient funds in treasury")
        );
    }

    #[test]
    fn field_errors_are_joined() {
        let body = r#"{"detail": [
            {"loc": ["body", "amount"], "msg": "ensure this value is greater than 0", "type": "value_error"},
            {"loc": ["body", "purpose"], "msg": "field required", "type": "value_error.missing"}
        ]}"#;
        assert_eq!(
            flatten_error_body(body).as_deref(),
            Some("amount: ensure this value is greater than 0; purpose: field required")
        );
    }

    #[test]
    fn numeric_and_missing_locations() {
        let body = r#"{"detail": [
            {"loc": ["body", "items", 2], "msg": "bad item"},
            {"loc": ["body"], "msg": "invalid payload"}
        ]}"#;
        assert_eq!(
            flatten_error_body(body).as_deref(),
            Some("2: bad item; invalid payload")
        );
    }

    #[test]
    fn unknown_bodies_fall_back() {
        assert!(flatten_error_body("Internal Server Error").is_none());
        assert!(flatten_error_body(r#"{"detail": []}"#).is_none());

        match api_error(StatusCode::BAD_GATEWAY, "") {
            TreasuryError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        match api_error(StatusCode::INTERNAL_SERVER_ERROR, "boom\n") {
            TreasuryError::Api { message, .. } => assert_eq!(message, "boom"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn user_message_prefers_backend_text() {
        let err = TreasuryError::Api {
            status: 400,
            message: "Ministry already exists".into(),
        };
        assert_eq!(err.user_message(), "Ministry already exists");
        assert!(TreasuryError::Unauthorized.is_unauthorized());
    }
}
