//! Transaction entity
//!
//! Record of a single ledger mutation between two optional account references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::DomainError;
use super::money::Money;

/// Lifecycle status of a transaction
///
/// Transitions are unrestricted: any status can follow any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "pending"),
            TransactionStatus::Completed => write!(f, "completed"),
            TransactionStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Shape of a transaction, derived from which account references are set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Transfer,
}

/// A transfer attempt between accounts.
///
/// `from_account` is `None` for deposits, `to_account` is `None` for
/// withdrawals. Everything but the status is fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    id: Uuid,
    from_account: Option<Uuid>,
    to_account: Option<Uuid>,
    amount: Money,
    status: TransactionStatus,
    timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Create a transaction with an explicit status.
    ///
    /// # Errors
    /// - `DomainError::InvalidTransaction` if neither account is set, or both
    ///   refer to the same account
    pub fn new(
        from_account: Option<Uuid>,
        to_account: Option<Uuid>,
        amount: Money,
        status: TransactionStatus,
    ) -> Result<Self, DomainError> {
        match (from_account, to_account) {
            (None, None) => {
                return Err(DomainError::InvalidTransaction(
                    "at least one of from_account or to_account is required".to_string(),
                ));
            }
            (Some(from), Some(to)) if from == to => {
                return Err(DomainError::InvalidTransaction(format!(
                    "source and destination are the same account ({from})"
                )));
            }
            _ => {}
        }

        Ok(Self {
            id: Uuid::new_v4(),
            from_account,
            to_account,
            amount,
            status,
            timestamp: Utc::now(),
        })
    }

    /// Create a pending transaction
    pub fn pending(
        from_account: Option<Uuid>,
        to_account: Option<Uuid>,
        amount: Money,
    ) -> Result<Self, DomainError> {
        Self::new(from_account, to_account, amount, TransactionStatus::Pending)
    }

    pub fn mark_completed(&mut self) {
        self.set_status(TransactionStatus::Completed);
    }

    pub fn mark_failed(&mut self) {
        self.set_status(TransactionStatus::Failed);
    }

    pub fn mark_pending(&mut self) {
        self.set_status(TransactionStatus::Pending);
    }

    fn set_status(&mut self, status: TransactionStatus) {
        tracing::debug!(
            transaction_id = %self.id,
            from = %self.status,
            to = %status,
            "Transaction status changed"
        );
        self.status = status;
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn from_account(&self) -> Option<Uuid> {
        self.from_account
    }

    pub fn to_account(&self) -> Option<Uuid> {
        self.to_account
    }

    pub fn amount(&self) -> &Money {
        &self.amount
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn kind(&self) -> TransactionKind {
        match (self.from_account, self.to_account) {
            (None, _) => TransactionKind::Deposit,
            (Some(_), None) => TransactionKind::Withdrawal,
            (Some(_), Some(_)) => TransactionKind::Transfer,
        }
    }

    /// Check whether the transaction has reached a terminal status
    pub fn is_final(&self) -> bool {
        self.status != TransactionStatus::Pending
    }

    /// Check whether the account takes part in this transaction
    pub fn involves(&self, account_id: Uuid) -> bool {
        self.from_account == Some(account_id) || self.to_account == Some(account_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ten_usd() -> Money {
        Money::new(dec!(10), "USD").unwrap()
    }

    #[test]
    fn test_transaction_requires_an_account() {
        let result = Transaction::pending(None, None, ten_usd());
        assert!(matches!(result, Err(DomainError::InvalidTransaction(_))));
    }

    #[test]
    fn test_transaction_rejects_same_account() {
        let id = Uuid::new_v4();
        let result = Transaction::pending(Some(id), Some(id), ten_usd());
        assert!(matches!(result, Err(DomainError::InvalidTransaction(_))));
    }

    #[test]
    fn test_transaction_kind() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let deposit = Transaction::pending(None, Some(a), ten_usd()).unwrap();
        let withdrawal = Transaction::pending(Some(a), None, ten_usd()).unwrap();
        let transfer = Transaction::pending(Some(a), Some(b), ten_usd()).unwrap();

        assert_eq!(deposit.kind(), TransactionKind::Deposit);
        assert_eq!(withdrawal.kind(), TransactionKind::Withdrawal);
        assert_eq!(transfer.kind(), TransactionKind::Transfer);
        assert!(transfer.involves(a));
        assert!(transfer.involves(b));
        assert!(!deposit.involves(b));
    }

    #[test]
    fn test_default_status_is_pending() {
        let tx = Transaction::pending(None, Some(Uuid::new_v4()), ten_usd()).unwrap();
        assert_eq!(tx.status(), TransactionStatus::Pending);
        assert!(!tx.is_final());
    }

    #[test]
    fn test_transitions_are_unrestricted() {
        let mut tx = Transaction::new(
            Some(Uuid::new_v4()),
            None,
            ten_usd(),
            TransactionStatus::Failed,
        )
        .unwrap();

        tx.mark_completed();
        assert_eq!(tx.status(), TransactionStatus::Completed);
        tx.mark_pending();
        assert_eq!(tx.status(), TransactionStatus::Pending);
        tx.mark_failed();
        assert_eq!(tx.status(), TransactionStatus::Failed);
        assert!(tx.is_final());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&TransactionStatus::Completed).unwrap();
        assert_eq!(json, r#""completed""#);

        let status: TransactionStatus = serde_json::from_str(r#""failed""#).unwrap();
        assert_eq!(status, TransactionStatus::Failed);
    }

    #[test]
    fn test_transaction_serialization_round_trip() {
        let tx = Transaction::pending(Some(Uuid::new_v4()), Some(Uuid::new_v4()), ten_usd())
            .unwrap();
        let json = serde_json::to_string(&tx).unwrap();
        assert!(json.contains(r#""amount":"10.00""#));

        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tx);
    }
}
