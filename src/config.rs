//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;

use crate::domain::Currency;

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Plain,
    Json,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Currency for accounts opened without an explicit one
    pub default_currency: Currency,

    /// Undrained events an account may hold
    pub event_capacity: usize,

    /// Environment (development, production)
    pub environment: String,

    /// Log output format
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_currency = lookup("LEDGER_DEFAULT_CURRENCY")
            .unwrap_or_else(|| "USD".to_string())
            .parse::<Currency>()
            .map_err(|_| ConfigError::InvalidValue("LEDGER_DEFAULT_CURRENCY"))?;

        let event_capacity = lookup("LEDGER_EVENT_CAPACITY")
            .unwrap_or_else(|| "1024".to_string())
            .parse::<usize>()
            .ok()
            .filter(|capacity| *capacity > 0)
            .ok_or(ConfigError::InvalidValue("LEDGER_EVENT_CAPACITY"))?;

        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("plain") => LogFormat::Plain,
            Some("json") => LogFormat::Json,
            Some(_) => return Err(ConfigError::InvalidValue("LOG_FORMAT")),
        };

        Ok(Self {
            default_currency,
            event_capacity,
            environment,
            log_format,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
