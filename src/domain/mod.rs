//! Domain module
//!
//! Core domain types and business rules.

pub mod context;
pub mod error;
pub mod events;
pub mod money;
pub mod transaction;

pub use context::OperationContext;
pub use error::DomainError;
pub use events::{AccountEvent, DomainEvent};
pub use money::{Currency, Money, MAX_AMOUNT_UNITS, MONEY_SCALE};
pub use transaction::{Transaction, TransactionKind, TransactionStatus};
