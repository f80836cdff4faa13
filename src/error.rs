//! Error handling module
//!
//! Application-level error type wrapping the domain, outbox and configuration
//! errors, plus the stable error codes front-ends report.

use serde::Serialize;
use uuid::Uuid;

use crate::config::ConfigError;
use crate::domain::DomainError;
use crate::outbox::OutboxError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    #[error("Account already exists: {0}")]
    AccountExists(Uuid),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Outbox error: {0}")]
    Outbox(#[from] OutboxError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Error body for whatever front-end wraps the ledger
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AppError {
    /// Stable machine-readable code
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::AccountNotFound(_) => "account_not_found",
            AppError::AccountExists(_) => "account_exists",
            AppError::Domain(domain_err) => match domain_err {
                DomainError::InvalidAmount(_) => "invalid_amount",
                DomainError::InvalidCurrency(_) => "invalid_currency",
                DomainError::CurrencyMismatch { .. } => "currency_mismatch",
                DomainError::InsufficientFunds { .. } => "insufficient_funds",
                DomainError::InvalidTransaction(_) => "invalid_transaction",
                DomainError::EventQueueFull { .. } => "event_queue_full",
            },
            AppError::Outbox(_) => "outbox_error",
            AppError::Config(_) => "config_error",
        }
    }

    /// Check if the caller caused the error
    pub fn is_client_error(&self) -> bool {
        match self {
            AppError::InvalidRequest(_)
            | AppError::AccountNotFound(_)
            | AppError::AccountExists(_) => true,
            AppError::Domain(domain_err) => domain_err.is_client_error(),
            AppError::Outbox(_) | AppError::Config(_) => false,
        }
    }
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        let details = match err {
            AppError::AccountNotFound(id) | AppError::AccountExists(id) => Some(id.to_string()),
            AppError::Domain(domain_err) => Some(domain_err.to_string()),
            _ => None,
        };

        Self {
            error: err.to_string(),
            error_code: err.error_code().to_string(),
            details,
        }
    }
}
