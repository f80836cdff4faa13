//! Domain Events
//!
//! Notifications emitted by aggregates after a successful state change.
//! Events are immutable facts that have happened in the system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::money::Money;

/// Common view over every event type an aggregate can emit
pub trait DomainEvent: Serialize {
    /// Get the event type as a string
    fn event_type(&self) -> &'static str;

    /// Get the ID of the aggregate that emitted the event
    fn aggregate_id(&self) -> Uuid;

    /// When the change happened
    fn occurred_at(&self) -> DateTime<Utc>;
}

/// Account-related events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AccountEvent {
    /// The account balance changed
    BalanceUpdated {
        account_id: Uuid,
        new_balance: Money,
        transaction_id: Uuid,
        occurred_at: DateTime<Utc>,
    },
}

impl AccountEvent {
    pub fn balance_updated(account_id: Uuid, new_balance: Money, transaction_id: Uuid) -> Self {
        AccountEvent::BalanceUpdated {
            account_id,
            new_balance,
            transaction_id,
            occurred_at: Utc::now(),
        }
    }

    /// Get the account ID this event relates to
    pub fn account_id(&self) -> Uuid {
        match self {
            AccountEvent::BalanceUpdated { account_id, .. } => *account_id,
        }
    }
}

impl DomainEvent for AccountEvent {
    fn event_type(&self) -> &'static str {
        match self {
            AccountEvent::BalanceUpdated { .. } => "BalanceUpdated",
        }
    }

    fn aggregate_id(&self) -> Uuid {
        self.account_id()
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            AccountEvent::BalanceUpdated { occurred_at, .. } => *occurred_at,
        }
    }
}
