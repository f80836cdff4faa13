//! Command Handlers module
//!
//! Command handlers that orchestrate ledger operations.
//! Each handler coordinates aggregates, the unit of work and the outbox.

mod commands;
mod ledger_handler;
pub mod unit_of_work;


pub use commands::*;
pub use ledger_handler::LedgerHandler;
pub use unit_of_work::UnitOfWork;
