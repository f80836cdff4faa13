//! Outbox Store
//!
//! Ordered, in-memory queue of event envelopes awaiting dispatch.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::Aggregate;
use crate::domain::{DomainEvent, OperationContext};

use super::OutboxError;

/// Event wrapped with routing and ordering metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: Uuid,
    /// Global, gap-free position in the outbox (starts at 1)
    pub sequence: u64,
    pub aggregate_type: String,
    pub aggregate_id: Uuid,
    /// Aggregate version at the time the event was collected
    pub aggregate_version: u64,
    pub event_type: String,
    pub payload: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initiated_by: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub recorded_at: DateTime<Utc>,
}

impl EventEnvelope {
    /// Decode the payload back into a concrete event type
    pub fn decode<E: DeserializeOwned>(&self) -> Result<E, OutboxError> {
        Ok(serde_json::from_value(self.payload.clone())?)
    }
}

/// Outbox for events drained from aggregates
#[derive(Debug, Default)]
pub struct Outbox {
    entries: VecDeque<EventEnvelope>,
    last_sequence: u64,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // collect
    // =========================================================================

    /// Move every pending event of `aggregate` into the outbox.
    ///
    /// Events are encoded before the aggregate is drained, so an encoding
    /// failure leaves both the aggregate and the outbox untouched.
    /// Returns the number of events collected.
    pub fn collect<A: Aggregate>(
        &mut self,
        aggregate: &mut A,
        context: &OperationContext,
    ) -> Result<usize, OutboxError> {
        let recorded_at = Utc::now();

        let envelopes = aggregate
            .pending_events()
            .iter()
            .zip(self.last_sequence + 1..)
            .map(|(event, sequence)| -> Result<EventEnvelope, OutboxError> {
                Ok(EventEnvelope {
                    id: Uuid::new_v4(),
                    sequence,
                    aggregate_type: A::aggregate_type().to_string(),
                    aggregate_id: event.aggregate_id(),
                    aggregate_version: aggregate.version(),
                    event_type: event.event_type().to_string(),
                    payload: serde_json::to_value(event)?,
                    correlation_id: context.correlation_id,
                    initiated_by: context.initiated_by.clone(),
                    occurred_at: event.occurred_at(),
                    recorded_at,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        aggregate.drain_events();

        let count = envelopes.len();
        if let Some(last) = envelopes.last() {
            self.last_sequence = last.sequence;
        }
        self.entries.extend(envelopes);

        if count > 0 {
            tracing::debug!(
                aggregate_type = A::aggregate_type(),
                aggregate_id = %aggregate.id(),
                count,
                last_sequence = self.last_sequence,
                "Events collected into outbox"
            );
        }

        Ok(count)
    }

    // =========================================================================
    // dispatch side
    // =========================================================================

    /// Envelopes awaiting acknowledgement, oldest first
    pub fn pending(&self) -> impl Iterator<Item = &EventEnvelope> {
        self.entries.iter()
    }

    /// Copy of the oldest `limit` envelopes
    pub fn next_batch(&self, limit: usize) -> Vec<EventEnvelope> {
        self.entries.iter().take(limit).cloned().collect()
    }

    /// Drop every envelope with `sequence <= up_to`.
    ///
    /// Returns how many envelopes were removed. Acknowledging an already
    /// acknowledged sequence is a no-op.
    pub fn acknowledge(&mut self, up_to: u64) -> Result<usize, OutboxError> {
        if up_to > self.last_sequence {
            return Err(OutboxError::UnknownSequence {
                requested: up_to,
                last_issued: (self.last_sequence > 0).then_some(self.last_sequence),
            });
        }

        let before = self.entries.len();
        while self
            .entries
            .front()
            .is_some_and(|envelope| envelope.sequence <= up_to)
        {
            self.entries.pop_front();
        }
        let removed = before - self.entries.len();

        tracing::debug!(up_to, removed, "Outbox acknowledged");
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest sequence number issued so far
    pub fn last_sequence(&self) -> Option<u64> {
        (self.last_sequence > 0).then_some(self.last_sequence)
    }
}
