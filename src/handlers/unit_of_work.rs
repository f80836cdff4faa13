//! Unit of Work
//!
//! Transactional boundary around operations that touch several accounts.
//! Each participant is checkpointed before the operation runs; if the
//! operation fails, every participant is put back to its checkpoint.

use crate::aggregate::{Account, Aggregate};
use crate::domain::DomainError;

/// Checkpoints of the accounts taking part in one operation
#[derive(Debug)]
pub struct UnitOfWork {
    checkpoints: Vec<Account>,
}

impl UnitOfWork {
    /// Checkpoint every participant
    pub fn begin(participants: &[&mut Account]) -> Self {
        Self {
            checkpoints: participants.iter().map(|account| (**account).clone()).collect(),
        }
    }

    /// Put every participant back to its checkpoint.
    ///
    /// Checkpoints are matched by account id, so the order of `participants`
    /// does not matter. Accounts that were not checkpointed are left as they are.
    pub fn rollback(mut self, participants: &mut [&mut Account]) {
        for participant in participants.iter_mut() {
            let id = participant.id();
            let Some(index) = self.checkpoints.iter().position(|c| c.id() == id) else {
                continue;
            };
            **participant = self.checkpoints.swap_remove(index);
        }
    }

    /// Discard the checkpoints
    pub fn commit(self) {}

    /// Run `operation` over `participants`, rolling all of them back if it fails.
    pub fn run<T, F>(participants: &mut [&mut Account], operation: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut [&mut Account]) -> Result<T, DomainError>,
    {
        let unit = Self::begin(participants);

        match operation(&mut *participants) {
            Ok(value) => {
                unit.commit();
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(
                    participants = participants.len(),
                    error = %err,
                    "Unit of work rolled back"
                );
                unit.rollback(participants);
                Err(err)
            }
        }
    }
}
