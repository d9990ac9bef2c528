//! Error types for the payroll API clients.
//!
//! # Design
//! `NotFound` and `Unauthorized` get dedicated variants because screens react
//! to them differently (a missing record vs. an expired session). Every other
//! non-2xx response lands in `Http` with the raw status and body, from which
//! `server_message` can pull the backend's structured `message` field.

use thiserror::Error;

use crate::http::TransportError;

/// Errors returned by the `parse_*` methods and the `Api` executor.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned 401; the session token is missing or stale.
    #[error("authentication required")]
    Unauthorized,

    /// The server returned a non-2xx status other than 401 and 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// No response was received.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// HTTP status carried by this error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound => Some(404),
            ApiError::Unauthorized => Some(401),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The `message` field of a JSON error body, when the backend sent one.
    pub fn server_message(&self) -> Option<String> {
        let ApiError::Http { body, .. } = self else {
            return None;
        };
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        value
            .get("message")
            .and_then(|m| m.as_str())
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    }
}

/// Failure of the smart-login flow.
#[derive(Debug, Error)]
pub enum LoginError {
    /// Both login providers rejected the credentials (or were unreachable).
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("username and password are required")]
    MissingFields,

    #[error("no login in progress")]
    NotInProgress,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failure of the persistent key/value slot store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored value is corrupt: {0}")]
    Corrupt(String),
}

/// Invalid environment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a whole number of milliseconds, got {value:?}")]
    InvalidTimeout { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_reads_structured_body() {
        let err = ApiError::Http {
            status: 400,
            body: r#"{"message":"Allowances cannot exceed basic salary"}"#.to_string(),
        };
        assert_eq!(
            err.server_message().as_deref(),
            Some("Allowances cannot exceed basic salary")
        );
    }

    #[test]
    fn server_message_ignores_plain_text() {
        let err = ApiError::Http {
            status: 500,
            body: "boom".to_string(),
        };
        assert!(err.server_message().is_none());
        assert!(ApiError::NotFound.server_message().is_none());
    }

    #[test]
    fn invalid_credentials_message_names_no_backend() {
        assert_eq!(LoginError::InvalidCredentials.to_string(), "Invalid credentials");
    }
}
