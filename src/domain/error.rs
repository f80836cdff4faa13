//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use super::money::Currency;

/// Domain-specific errors
///
/// These errors represent business rule violations and are raised at the point
/// of violation. Nothing in the domain retries or logs them.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Amount is not representable, or not allowed for the operation
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Currency code is not a 3-letter code
    #[error("Invalid currency code: {0:?}")]
    InvalidCurrency(String),

    /// Two monetary values with different currencies were combined
    #[error("Currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch { expected: Currency, found: Currency },

    /// Balance does not cover the requested debit
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        required: Decimal,
        available: Decimal,
    },

    /// Transaction references are inconsistent
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    /// The account's pending event queue has no room left
    #[error("Event queue full for account {account_id} (capacity {capacity})")]
    EventQueueFull { account_id: Uuid, capacity: usize },
}

impl DomainError {
    /// Create an insufficient funds error
    pub fn insufficient_funds(required: Decimal, available: Decimal) -> Self {
        Self::InsufficientFunds {
            required,
            available,
        }
    }

    /// Create a currency mismatch error
    pub fn currency_mismatch(expected: &Currency, found: &Currency) -> Self {
        Self::CurrencyMismatch {
            expected: expected.clone(),
            found: found.clone(),
        }
    }

    /// Check if this is a client error (the request itself was wrong)
    ///
    /// `EventQueueFull` is the only condition the caller can clear without
    /// changing the request: drain the account and try again.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::EventQueueFull { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_funds_error() {
        let err = DomainError::insufficient_funds(Decimal::new(10000, 2), Decimal::new(5000, 2));

        assert!(err.is_client_error());
        assert!(err.to_string().contains("100.00"));
        assert!(err.to_string().contains("50.00"));
    }

    #[test]
    fn test_currency_mismatch_message() {
        let usd: Currency = "USD".parse().unwrap();
        let eur: Currency = "EUR".parse().unwrap();
        let err = DomainError::currency_mismatch(&usd, &eur);

        assert_eq!(err.to_string(), "Currency mismatch: expected USD, found EUR");
    }

    #[test]
    fn test_event_queue_full_is_not_client_error() {
        let err = DomainError::EventQueueFull {
            account_id: Uuid::new_v4(),
            capacity: 4,
        };

        assert!(!err.is_client_error());
    }
}
