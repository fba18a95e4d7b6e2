//! Advice polling configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Bounds for the advice poll loop
#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    /// Maximum status requests per advice retrieval
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Wait between attempts, in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl PollingConfig {
    /// Get interval as Duration
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Validate polling configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_attempts == 0 {
            return Err(ValidationError::InvalidMaxAttempts);
        }
        if self.interval_ms == 0 {
            return Err(ValidationError::InvalidPollInterval);
        }
        Ok(())
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval_ms: default_interval_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    30
}

fn default_interval_ms() -> u64 {
    2000
}
