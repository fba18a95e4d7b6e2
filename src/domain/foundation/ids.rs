//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Backend-assigned identifier of an advisory session.
///
/// Opaque to the client: it is only ever compared and echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wraps a backend-assigned identifier.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the identifier is blank
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("session_id"));
        }
        Ok(Self(id))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_rejects_blank() {
        assert!(SessionId::new("").is_err());
        assert!(SessionId::new("   ").is_err());
    }

    #[test]
    fn session_id_round_trips_as_plain_json_string() {
        let id = SessionId::new("abc-123").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc-123\"");
        let back: SessionId = serde_json::from_str("\"abc-123\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn session_id_displays_raw_value() {
        let id = SessionId::new("s-1").unwrap();
        assert_eq!(id.to_string(), "s-1");
        assert_eq!(id.as_str(), "s-1");
    }
}
