//! Errors surfaced by the auth and profile clients.
//!
//! Clients forward these untouched; turning a status code into user-facing
//! text is the job of [`crate::messages`].

use crate::session::store::StorageError;
use crate::validate::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No response: connection refused, DNS, timeout, broken body stream.
    #[error("cannot connect to server: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("request failed with status {status}")]
    Status { status: u16, body: String },

    /// A success response whose body did not match the expected shape.
    #[error("response parse failed: {0}")]
    Decode(String),

    /// Rejected locally before any request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The session could not be persisted after a successful login.
    #[error("session storage failed: {0}")]
    Storage(#[from] StorageError),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

impl ApiError {
    /// HTTP status, with `0` standing for "no response at all".
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(_) => Some(0),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable message carried in an error body, if any.
    ///
    /// JSON bodies contribute their `message` field; plain-text bodies are
    /// returned as-is. HTML and empty bodies yield `None`.
    #[must_use]
    pub fn server_message(&self) -> Option<String> {
        let Self::Status { body, .. } = self else {
            return None;
        };
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return None;
        }
        match serde_json::from_str::<serde_json::Value>(trimmed) {
            Ok(serde_json::Value::Object(map)) => map
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_owned),
            Ok(serde_json::Value::String(text)) => Some(text).filter(|t| !t.trim().is_empty()),
            Ok(_) => None,
            Err(_) if trimmed.starts_with('<') => None,
            Err(_) => Some(trimmed.to_owned()),
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
