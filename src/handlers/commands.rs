//! Command definitions
//!
//! Commands represent intentions to change the ledger. Amounts travel as
//! decimal strings so no float ever touches a monetary value.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Money, Transaction, TransactionStatus};

// =========================================================================
// OpenAccountCommand
// =========================================================================

/// Command to open a new account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAccountCommand {
    pub owner: String,
    /// Falls back to the configured default currency
    pub currency: Option<String>,
    /// Initial balance (decimal string); zero when absent
    pub initial_balance: Option<String>,
}

impl OpenAccountCommand {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            currency: None,
            initial_balance: None,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn with_initial_balance(mut self, amount: impl Into<String>) -> Self {
        self.initial_balance = Some(amount.into());
        self
    }
}

// =========================================================================
// DepositCommand / WithdrawCommand
// =========================================================================

/// Command to deposit into an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositCommand {
    pub account_id: Uuid,
    pub amount: String,
    /// Falls back to the account's currency
    pub currency: Option<String>,
}

impl DepositCommand {
    pub fn new(account_id: Uuid, amount: impl Into<String>) -> Self {
        Self {
            account_id,
            amount: amount.into(),
            currency: None,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }
}

/// Command to withdraw from an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawCommand {
    pub account_id: Uuid,
    pub amount: String,
    pub currency: Option<String>,
}

impl WithdrawCommand {
    pub fn new(account_id: Uuid, amount: impl Into<String>) -> Self {
        Self {
            account_id,
            amount: amount.into(),
            currency: None,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }
}

// =========================================================================
// TransferCommand
// =========================================================================

/// Command to move money between two accounts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferCommand {
    pub from_account_id: Uuid,
    pub to_account_id: Uuid,
    pub amount: String,
    /// Falls back to the sender's currency
    pub currency: Option<String>,
}

impl TransferCommand {
    pub fn new(from_account_id: Uuid, to_account_id: Uuid, amount: impl Into<String>) -> Self {
        Self {
            from_account_id,
            to_account_id,
            amount: amount.into(),
            currency: None,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }
}

// =========================================================================
// Results
// =========================================================================

/// Result of opening an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResult {
    pub account_id: Uuid,
    pub owner: String,
    pub balance: Money,
}

/// Result of a successful ledger mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionResult {
    pub transaction_id: Uuid,
    pub from_account: Option<Uuid>,
    pub to_account: Option<Uuid>,
    pub amount: Money,
    pub status: TransactionStatus,
    /// Balance of the account the command addressed (the sender for transfers)
    pub balance: Money,
}

impl TransactionResult {
    pub(crate) fn new(transaction: &Transaction, balance: &Money) -> Self {
        Self {
            transaction_id: transaction.id(),
            from_account: transaction.from_account(),
            to_account: transaction.to_account(),
            amount: transaction.amount().clone(),
            status: transaction.status(),
            balance: balance.clone(),
        }
    }
}
