//! Error types for the Saplo client.
//!
//! Every failure surfaces as a [`SaploError`] so callers can branch on the
//! kind: authentication, transport, protocol or a service-reported error.

use serde_json::Value;
use thiserror::Error;

/// Message used when the service reports an error without a `msg` field.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Error reported by the Saplo service in a response envelope.
///
/// `code` is whatever the service put in `error.code` and is `None` when the
/// field was absent.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Remote error{}: {message}", display_code(.code))]
pub struct RemoteError {
    /// Service-provided message, or [`UNKNOWN_ERROR_MESSAGE`].
    pub message: String,
    /// Service-provided error code.
    pub code: Option<Value>,
}

fn display_code(code: &Option<Value>) -> String {
    match code {
        None => String::new(),
        Some(Value::String(s)) => format!(" ({})", s),
        Some(other) => format!(" ({})", other),
    }
}

/// Client error types.
#[derive(Debug, Error)]
pub enum SaploError {
    /// Token acquisition via `auth.accessToken` failed.
    #[error("Authentication failed{}: {message}", display_code(.code))]
    Authentication {
        /// Service message, or a description of the underlying failure
        message: String,
        /// Service error code, when the service returned one
        code: Option<Value>,
    },

    /// Connection, DNS, timeout or HTTP-level failure.
    #[error("Network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Response body was not valid JSON or lacked an expected field.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The service returned an error envelope.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// `invoke` was given a name missing from the facade's table.
    #[error("Unknown operation '{operation}' on {resource}")]
    UnknownOperation {
        resource: &'static str,
        operation: String,
    },

    /// Invalid or missing configuration.
    #[error("Config error: {0}")]
    Config(String),
}

impl SaploError {
    /// Wrap a failure from the `auth.accessToken` round trip.
    ///
    /// Service errors keep their message and code; anything else is
    /// described by its display text.
    pub(crate) fn into_authentication(self) -> Self {
        match self {
            SaploError::Remote(RemoteError { message, code }) => {
                SaploError::Authentication { message, code }
            }
            err @ SaploError::Authentication { .. } => err,
            other => SaploError::Authentication {
                message: other.to_string(),
                code: None,
            },
        }
    }

    /// Returns the remote error if the service rejected the call.
    pub fn as_remote(&self) -> Option<&RemoteError> {
        match self {
            SaploError::Remote(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SaploError {
    fn from(err: reqwest::Error) -> Self {
        SaploError::Network(Box::new(err))
    }
}

impl From<std::io::Error> for SaploError {
    fn from(err: std::io::Error) -> Self {
        SaploError::Network(Box::new(err))
    }
}

/// Result type for Saplo operations.
pub type Result<T> = std::result::Result<T, SaploError>;
