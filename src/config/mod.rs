//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `INNOVATION_BOARD`
//! prefix and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use innovation_board::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Advisory backend at {}", config.backend.base_url);
//! ```

mod backend;
mod error;
mod logging;
mod polling;

pub use backend::BackendConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use polling::PollingConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Advisory backend location (required)
    pub backend: BackendConfig,

    /// Advice poll loop bounds
    #[serde(default)]
    pub polling: PollingConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `INNOVATION_BOARD` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `INNOVATION_BOARD__BACKEND__BASE_URL=http://localhost:8001`
    /// - `INNOVATION_BOARD__POLLING__INTERVAL_MS=1000`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the backend URL is missing or a value
    /// cannot be parsed into its expected type.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("INNOVATION_BOARD")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.backend.validate()?;
        self.polling.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
