//! Advisory backend configuration

use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Where and how to reach the advisory backend
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Server origin, e.g. `http://localhost:8001` (the `/api` prefix is added)
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl BackendConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate backend configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let url = Url::parse(self.base_url.trim()).map_err(|_| ValidationError::InvalidBackendUrl)?;
        let has_host = url.host_str().is_some_and(|host| !host.is_empty());
        if !matches!(url.scheme(), "http" | "https") || !has_host {
            return Err(ValidationError::InvalidBackendUrl);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn default_timeout() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> BackendConfig {
        BackendConfig {
            base_url: url.to_string(),
            timeout_secs: default_timeout(),
        }
    }

    #[test]
    fn test_timeout_duration() {
        assert_eq!(config("http://x").timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_accepts_http_and_https() {
        assert!(config("http://localhost:8001").validate().is_ok());
        assert!(config("https://advice.example.com/").validate().is_ok());
    }

    #[test]
    fn test_rejects_missing_scheme_or_host() {
        assert_eq!(
            config("localhost:8001").validate(),
            Err(ValidationError::InvalidBackendUrl)
        );
        assert_eq!(config("https://").validate(), Err(ValidationError::InvalidBackendUrl));
        assert_eq!(config("ftp://files.example.com").validate(), Err(ValidationError::InvalidBackendUrl));
    }

    #[test]
    fn test_rejects_unparseable_host() {
        assert_eq!(
            config("http://exa mple.com").validate(),
            Err(ValidationError::InvalidBackendUrl)
        );
    }

    #[test]
    fn test_rejects_out_of_range_timeout() {
        let mut c = config("http://localhost");
        c.timeout_secs = 0;
        assert_eq!(c.validate(), Err(ValidationError::InvalidTimeout));
        c.timeout_secs = 301;
        assert_eq!(c.validate(), Err(ValidationError::InvalidTimeout));
    }
}
