//! Outbox Errors
//!
//! Error types for outbox operations.

/// Errors that can occur in the outbox
#[derive(Debug, thiserror::Error)]
pub enum OutboxError {
    /// Event could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Acknowledgement for a sequence number that was never issued
    #[error("Unknown sequence {requested} (last issued: {last_issued:?})")]
    UnknownSequence {
        requested: u64,
        last_issued: Option<u64>,
    },
}

impl OutboxError {
    /// Check if this error points at a caller bug rather than bad data
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, OutboxError::UnknownSequence { .. })
    }
}
