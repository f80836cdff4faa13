//! Account Aggregate
//!
//! Account is the aggregate root for a single-currency balance.
//! Every mutation validates first and only then touches state, so a failed
//! operation leaves the account exactly as it was.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    AccountEvent, Currency, DomainError, Money, Transaction, TransactionStatus,
};

use super::Aggregate;

/// Pending events an account holds before it refuses further mutations
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Account Aggregate
///
/// Owns a balance in one currency, the append-only history of transactions
/// it initiated or received, and the events emitted since the last drain.
#[derive(Debug, Clone)]
pub struct Account {
    /// Unique account ID
    id: Uuid,

    /// Owner name or external ID
    owner: String,

    /// Currency every balance and amount must use
    currency: Currency,

    /// Current balance, never negative
    balance: Money,

    /// Append-only history
    transactions: Vec<Transaction>,

    /// Events not yet drained
    events: Vec<AccountEvent>,

    event_capacity: usize,

    /// Number of successful mutations
    version: u64,

    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Persistable state of an [`Account`].
///
/// Pending events are not part of the snapshot: they belong to whoever
/// drains them before the account is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub id: Uuid,
    pub owner: String,
    pub currency: Currency,
    pub balance: Money,
    pub transactions: Vec<Transaction>,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Open an account with a zero balance
    pub fn open(owner: impl Into<String>, currency: Currency) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            owner: owner.into(),
            balance: Money::zero(currency.clone()),
            currency,
            transactions: Vec::new(),
            events: Vec::new(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Open an account with an initial balance; the account takes its currency.
    ///
    /// # Errors
    /// - `DomainError::InvalidAmount` if the initial balance is negative
    pub fn with_balance(owner: impl Into<String>, initial: Money) -> Result<Self, DomainError> {
        if initial.is_negative() {
            return Err(DomainError::InvalidAmount(format!(
                "initial balance cannot be negative (got {initial})"
            )));
        }

        let mut account = Self::open(owner, initial.currency().clone());
        account.balance = initial;
        Ok(account)
    }

    /// Set how many undrained events the account may hold (at least one)
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    /// Rebuild an account from persisted state, re-checking its invariants.
    pub fn restore(snapshot: AccountSnapshot) -> Result<Self, DomainError> {
        if snapshot.balance.currency() != &snapshot.currency {
            return Err(DomainError::currency_mismatch(
                &snapshot.currency,
                snapshot.balance.currency(),
            ));
        }
        if snapshot.balance.is_negative() {
            return Err(DomainError::InvalidAmount(format!(
                "stored balance is negative ({})",
                snapshot.balance
            )));
        }
        for transaction in &snapshot.transactions {
            if !transaction.involves(snapshot.id) {
                return Err(DomainError::InvalidTransaction(format!(
                    "transaction {} does not involve account {}",
                    transaction.id(),
                    snapshot.id
                )));
            }
            if transaction.amount().currency() != &snapshot.currency {
                return Err(DomainError::currency_mismatch(
                    &snapshot.currency,
                    transaction.amount().currency(),
                ));
            }
        }

        Ok(Self {
            id: snapshot.id,
            owner: snapshot.owner,
            currency: snapshot.currency,
            balance: snapshot.balance,
            transactions: snapshot.transactions,
            events: Vec::new(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
            version: snapshot.version,
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
        })
    }

    /// Capture the persistable state
    pub fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            id: self.id,
            owner: self.owner.clone(),
            currency: self.currency.clone(),
            balance: self.balance.clone(),
            transactions: self.transactions.clone(),
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Deposit money into the account
    ///
    /// Returns the completed transaction that was recorded.
    pub fn deposit(&mut self, amount: &Money) -> Result<Transaction, DomainError> {
        ensure_positive(amount)?;
        let new_balance = self.balance.try_add(amount)?;
        self.ensure_event_room()?;

        let transaction = Transaction::new(
            None,
            Some(self.id),
            amount.clone(),
            TransactionStatus::Completed,
        )?;

        self.transactions.push(transaction.clone());
        self.commit_balance(new_balance, transaction.id());

        Ok(transaction)
    }

    /// Withdraw money from the account
    pub fn withdraw(&mut self, amount: &Money) -> Result<Transaction, DomainError> {
        ensure_positive(amount)?;
        self.ensure_sufficient(amount)?;
        let new_balance = self.balance.try_subtract(amount)?;
        self.ensure_event_room()?;

        let transaction = Transaction::new(
            Some(self.id),
            None,
            amount.clone(),
            TransactionStatus::Completed,
        )?;

        self.transactions.push(transaction.clone());
        self.commit_balance(new_balance, transaction.id());

        Ok(transaction)
    }

    /// Move money from this account to `target`.
    ///
    /// The transaction is recorded on this account only; both accounts get a
    /// `BalanceUpdated` event.
    pub fn transfer_to(
        &mut self,
        target: &mut Account,
        amount: &Money,
    ) -> Result<Transaction, DomainError> {
        ensure_positive(amount)?;
        if target.id == self.id {
            return Err(DomainError::InvalidTransaction(
                "cannot transfer to the same account".to_string(),
            ));
        }
        self.ensure_sufficient(amount)?;

        let new_source_balance = self.balance.try_subtract(amount)?;
        let new_target_balance = target.balance.try_add(amount)?;
        self.ensure_event_room()?;
        target.ensure_event_room()?;

        let transaction = Transaction::new(
            Some(self.id),
            Some(target.id),
            amount.clone(),
            TransactionStatus::Completed,
        )?;

        self.transactions.push(transaction.clone());
        self.commit_balance(new_source_balance, transaction.id());
        target.commit_balance(new_target_balance, transaction.id());

        Ok(transaction)
    }

    fn ensure_sufficient(&self, amount: &Money) -> Result<(), DomainError> {
        if self.balance.less_than(amount)? {
            return Err(DomainError::insufficient_funds(
                amount.amount(),
                self.balance.amount(),
            ));
        }
        Ok(())
    }

    fn ensure_event_room(&self) -> Result<(), DomainError> {
        if self.events.len() >= self.event_capacity {
            return Err(DomainError::EventQueueFull {
                account_id: self.id,
                capacity: self.event_capacity,
            });
        }
        Ok(())
    }

    // Infallible: callers have already validated everything.
    fn commit_balance(&mut self, new_balance: Money, transaction_id: Uuid) {
        self.balance = new_balance;
        self.events.push(AccountEvent::balance_updated(
            self.id,
            self.balance.clone(),
            transaction_id,
        ));
        self.version += 1;
        self.updated_at = Utc::now();

        tracing::debug!(
            account_id = %self.id,
            %transaction_id,
            balance = %self.balance,
            version = self.version,
            "Balance updated"
        );
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn balance(&self) -> &Money {
        &self.balance
    }

    /// Copy of the transaction history, oldest first
    pub fn transactions(&self) -> Vec<Transaction> {
        self.transactions.clone()
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn event_capacity(&self) -> usize {
        self.event_capacity
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

fn ensure_positive(amount: &Money) -> Result<(), DomainError> {
    if !amount.is_positive() {
        return Err(DomainError::InvalidAmount(format!(
            "amount must be positive (got {amount})"
        )));
    }
    Ok(())
}

impl Aggregate for Account {
    type Event = AccountEvent;

    fn aggregate_type() -> &'static str {
        "Account"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn pending_events(&self) -> &[AccountEvent] {
        &self.events
    }

    fn drain_events(&mut self) -> Vec<AccountEvent> {
        std::mem::take(&mut self.events)
    }
}
