//! Store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ORCHARD_DATABASE_URL` - `PostgreSQL` connection string
//!
//! ## Optional
//! - `ORCHARD_BASE_CURRENCY` - Display currency code to fall back to when a
//!   session has none (default: MDL)

use secrecy::SecretString;
use thiserror::Error;

use orchard_core::Currency;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// Currency used when a session carries no selection
    pub base_currency: Currency,
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("ORCHARD_DATABASE_URL")
            .map_err(|_| ConfigError::MissingEnvVar("ORCHARD_DATABASE_URL".to_owned()))?
            .into();

        let base_currency = match std::env::var("ORCHARD_BASE_CURRENCY") {
            Ok(code) => code.parse().map_err(|_| {
                ConfigError::InvalidEnvVar("ORCHARD_BASE_CURRENCY".to_owned(), code)
            })?,
            Err(_) => Currency::default(),
        };

        Ok(Self {
            database_url,
            base_currency,
        })
    }
}
