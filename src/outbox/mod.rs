//! Event Outbox module
//!
//! In-process outbox between aggregates and an external event dispatcher.
//! Aggregates are drained into serialisable envelopes that stay queued until
//! the dispatcher acknowledges them.

mod error;
mod store;

pub use error::OutboxError;
pub use store::{EventEnvelope, Outbox};
