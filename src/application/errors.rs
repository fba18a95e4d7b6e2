//! Advisory error taxonomy.
//!
//! Every failure leaving the advisory client is exactly one of these kinds,
//! paired with a human-readable message.

use std::fmt;
use thiserror::Error;

/// Shown when the backend does not know the session.
pub const MSG_NOT_FOUND: &str = "Session not found. Please start a new session.";
/// Shown when the backend rejected a request without saying why.
pub const MSG_INVALID_INPUT: &str = "Invalid request. Please check your input.";
/// Shown for any 5xx response.
pub const MSG_SERVER_ERROR: &str = "Server error. Please try again later.";
/// Shown when no response was received.
pub const MSG_NETWORK_ERROR: &str = "Network error. Please check your connection.";
/// Shown when polling ran out of attempts.
pub const MSG_TIMEOUT: &str = "Advice generation timed out. Please try again.";

/// Closed set of failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdvisoryErrorKind {
    /// Request rejected; message comes from the server when available.
    InvalidInput,
    /// Session unknown to the backend; the user must start over.
    NotFound,
    /// Server-side failure. Not retried inside a single call.
    ServerError,
    /// No response received.
    NetworkError,
    /// Poll attempts exhausted while advice was still processing.
    Timeout,
    Unknown,
}

impl AdvisoryErrorKind {
    /// True for failures worth offering a plain "try again".
    pub fn is_retry_worthy(&self) -> bool {
        matches!(self, AdvisoryErrorKind::NetworkError | AdvisoryErrorKind::Timeout)
    }

    /// True when the only recovery is a brand new session.
    pub fn requires_new_session(&self) -> bool {
        matches!(self, AdvisoryErrorKind::NotFound)
    }
}

impl fmt::Display for AdvisoryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AdvisoryErrorKind::InvalidInput => "INVALID_INPUT",
            AdvisoryErrorKind::NotFound => "NOT_FOUND",
            AdvisoryErrorKind::ServerError => "SERVER_ERROR",
            AdvisoryErrorKind::NetworkError => "NETWORK_ERROR",
            AdvisoryErrorKind::Timeout => "TIMEOUT",
            AdvisoryErrorKind::Unknown => "UNKNOWN",
        };
        write!(f, "{}", s)
    }
}

/// Classified failure of an advisory operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AdvisoryError {
    pub kind: AdvisoryErrorKind,
    pub message: String,
}

impl AdvisoryError {
    pub fn new(kind: AdvisoryErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(AdvisoryErrorKind::InvalidInput, message)
    }

    pub fn not_found() -> Self {
        Self::new(AdvisoryErrorKind::NotFound, MSG_NOT_FOUND)
    }

    pub fn server_error() -> Self {
        Self::new(AdvisoryErrorKind::ServerError, MSG_SERVER_ERROR)
    }

    pub fn network() -> Self {
        Self::new(AdvisoryErrorKind::NetworkError, MSG_NETWORK_ERROR)
    }

    pub fn timeout() -> Self {
        Self::new(AdvisoryErrorKind::Timeout, MSG_TIMEOUT)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(AdvisoryErrorKind::Unknown, message)
    }
}
