//! Error types for the terminology client
//!
//! Error bodies come back either as a plain JSON string, as an object with a
//! `detail` field, or as something else entirely. They are classified once,
//! here, into [`ErrorMessage`].

use serde_json::Value;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Human-readable message extracted from an error body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorMessage {
    /// Body was a bare string.
    PlainMessage(String),
    /// Body was an object carrying a string `detail` field.
    DetailMessage(String),
    /// Nothing readable.
    Unknown,
}

impl ErrorMessage {
    /// Classify a response body. Plain strings win over `detail` fields.
    pub fn from_body(body: Option<&Value>) -> Self {
        match body {
            Some(Value::String(s)) if !s.trim().is_empty() => Self::PlainMessage(s.clone()),
            Some(Value::Object(obj)) => match obj.get("detail") {
                Some(Value::String(detail)) if !detail.trim().is_empty() => {
                    Self::DetailMessage(detail.clone())
                }
                _ => Self::Unknown,
            },
            _ => Self::Unknown,
        }
    }

    /// Classify a raw response text, which may or may not be JSON.
    pub fn from_text(text: &str) -> (Self, Option<Value>) {
        if text.trim().is_empty() {
            return (Self::Unknown, None);
        }
        match serde_json::from_str::<Value>(text) {
            Ok(value) => (Self::from_body(Some(&value)), Some(value)),
            Err(_) => (
                Self::PlainMessage(text.to_string()),
                Some(Value::String(text.to_string())),
            ),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::PlainMessage(s) | Self::DetailMessage(s) => Some(s),
            Self::Unknown => None,
        }
    }

    /// The message, or `fallback` when nothing readable was found.
    pub fn resolve(&self, fallback: &str) -> String {
        self.as_str().unwrap_or(fallback).to_string()
    }
}

static UNKNOWN_MESSAGE: ErrorMessage = ErrorMessage::Unknown;

/// Terminology client errors
#[derive(Error, Debug)]
pub enum Error {
    /// The service answered with a non-2xx status.
    #[error("Request failed with status {status}")]
    Status {
        status: u16,
        message: ErrorMessage,
        data: Option<Value>,
    },

    /// No response was received (connection, timeout, body read).
    #[error("Request could not be completed: {reason}")]
    Transport {
        message: ErrorMessage,
        reason: String,
        data: Option<Value>,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Client configuration error: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status, when the service responded.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn message(&self) -> &ErrorMessage {
        match self {
            Error::Status { message, .. } | Error::Transport { message, .. } => message,
            _ => &UNKNOWN_MESSAGE,
        }
    }

    /// Raw error body as returned by the service.
    pub fn data(&self) -> Option<&Value> {
        match self {
            Error::Status { data, .. } | Error::Transport { data, .. } => data.as_ref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Error::Status {
                status: status.as_u16(),
                message: ErrorMessage::Unknown,
                data: None,
            },
            None => Error::Transport {
                message: ErrorMessage::Unknown,
                reason: err.to_string(),
                data: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_string_body() {
        let msg = ErrorMessage::from_body(Some(&json!("Request failed")));
        assert_eq!(msg, ErrorMessage::PlainMessage("Request failed".into()));
    }

    #[test]
    fn detail_body() {
        let msg = ErrorMessage::from_body(Some(&json!({"detail": "Not found."})));
        assert_eq!(msg, ErrorMessage::DetailMessage("Not found.".into()));
    }

    #[test]
    fn unreadable_bodies_fall_back() {
        assert_eq!(ErrorMessage::from_body(None), ErrorMessage::Unknown);
        assert_eq!(
            ErrorMessage::from_body(Some(&json!({"errors": ["x"]}))),
            ErrorMessage::Unknown
        );
        assert_eq!(
            ErrorMessage::from_body(Some(&json!({"detail": {"nested": true}}))),
            ErrorMessage::Unknown
        );
        assert_eq!(
            ErrorMessage::Unknown.resolve("Failed to fetch source concepts"),
            "Failed to fetch source concepts"
        );
    }

    #[test]
    fn non_json_text_is_plain() {
        let (msg, data) = ErrorMessage::from_text("could not complete this request");
        assert_eq!(
            msg,
            ErrorMessage::PlainMessage("could not complete this request".into())
        );
        assert_eq!(data, Some(json!("could not complete this request")));

        let (msg, data) = ErrorMessage::from_text("");
        assert_eq!(msg, ErrorMessage::Unknown);
        assert!(data.is_none());
    }

    #[test]
    fn accessors() {
        let err = Error::Status {
            status: 400,
            message: ErrorMessage::DetailMessage("bad".into()),
            data: Some(json!({"detail": "bad"})),
        };
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.message().as_str(), Some("bad"));
        assert_eq!(err.data(), Some(&json!({"detail": "bad"})));

        let err = Error::Config("missing base url".into());
        assert_eq!(err.status(), None);
        assert_eq!(err.message(), &ErrorMessage::Unknown);
    }
}
