//! Aggregate module
//!
//! Aggregate Root pattern: each aggregate guards its own invariants and
//! collects the events it emits until a collaborator drains them.

pub mod account;

pub use account::{Account, AccountSnapshot, DEFAULT_EVENT_CAPACITY};

use uuid::Uuid;

use crate::domain::DomainEvent;

/// Aggregate trait that all aggregates must implement
pub trait Aggregate {
    /// The type of events this aggregate emits
    type Event: DomainEvent;

    /// Get the aggregate type name (for event envelopes)
    fn aggregate_type() -> &'static str;

    /// Get the aggregate ID
    fn id(&self) -> Uuid;

    /// Get the current version (number of successful mutations)
    fn version(&self) -> u64;

    /// Events emitted since the last drain, oldest first
    fn pending_events(&self) -> &[Self::Event];

    /// Return and clear the pending events
    fn drain_events(&mut self) -> Vec<Self::Event>;
}
