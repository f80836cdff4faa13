//! bank_ledger Library
//!
//! Banking ledger core: currency-safe money, accounts, transactions and the
//! domain events they emit.

pub mod aggregate;
pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod outbox;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use aggregate::{Account, Aggregate};
pub use domain::{AccountEvent, Currency, DomainError, Money, OperationContext};
pub use domain::{Transaction, TransactionStatus};
