//! Client error types with user-facing message extraction.
//!
//! [`ClientError`] is the central error type for every network boundary in
//! the crate. List fetches and mutations never propagate it past their call
//! site: controllers catch it and hand it to the
//! [`ErrorReporter`](crate::notify::ErrorReporter), which turns it into
//! notices via [`ClientError::user_messages`].

use std::collections::BTreeMap;

use serde::Deserialize;

/// Per-field validation messages, keyed by field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Structured error body returned by the backend on non-2xx responses.
///
/// ```json
/// {
///   "statusCode": 400,
///   "message": "One or more validation errors occurred.",
///   "errors": { "Title": ["Title is required"] }
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    /// Single human-readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// Field-keyed validation messages.
    #[serde(default)]
    pub errors: FieldErrors,
}

/// Error enum for every request the crate issues.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response (connect, timeout, TLS).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("request failed with status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Top-level message from the error body, or the status reason.
        message: String,
        /// Structured per-field messages from the error body.
        errors: FieldErrors,
    },

    /// The response was 2xx but did not have the expected list shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The client was configured with an unusable value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Local form validation failed; no request was sent.
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(FieldErrors),
}

impl ClientError {
    /// Builds a [`ClientError::Status`] from a status code and raw body.
    ///
    /// The body is parsed as an [`ErrorPayload`]; anything unparseable
    /// falls back to the canonical reason phrase.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        let payload: ErrorPayload = serde_json::from_str(body).unwrap_or_default();
        let message = payload
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| default_reason(status));
        Self::Status {
            status,
            message,
            errors: payload.errors,
        }
    }

    /// Returns the HTTP status attached to this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Extracts the messages a user should see for this error.
    ///
    /// A structured `errors` map wins over the single message; within the
    /// map, messages are flattened in field order.
    #[must_use]
    pub fn user_messages(&self) -> Vec<String> {
        match self {
            Self::Status {
                message, errors, ..
            } => {
                let flattened: Vec<String> = errors
                    .values()
                    .flatten()
                    .filter(|m| !m.trim().is_empty())
                    .cloned()
                    .collect();
                if flattened.is_empty() {
                    vec![message.clone()]
                } else {
                    flattened
                }
            }
            Self::Validation(errors) => errors.values().flatten().cloned().collect(),
            Self::Transport(_) => vec!["Unable to reach the server. Please try again.".to_string()],
            other => vec![other.to_string()],
        }
    }
}

fn default_reason(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map_or_else(|| format!("HTTP {status}"), str::to_string)
}
