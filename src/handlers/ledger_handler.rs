//! Ledger Handler
//!
//! Resolves account IDs, runs commands against the accounts and forwards
//! the emitted events to the outbox.

use std::collections::HashMap;

use uuid::Uuid;

use crate::aggregate::{Account, AccountSnapshot, Aggregate};
use crate::config::Config;
use crate::domain::{Currency, DomainError, Money, OperationContext};
use crate::error::{AppError, AppResult};
use crate::outbox::Outbox;

use super::unit_of_work::UnitOfWork;
use super::{
    AccountResult, DepositCommand, OpenAccountCommand, TransactionResult, TransferCommand,
    WithdrawCommand,
};

/// In-memory ledger: an account book plus its event outbox
#[derive(Debug)]
pub struct LedgerHandler {
    accounts: HashMap<Uuid, Account>,
    outbox: Outbox,
    default_currency: Currency,
    event_capacity: usize,
}

impl LedgerHandler {
    pub fn new(default_currency: Currency, event_capacity: usize) -> Self {
        Self {
            accounts: HashMap::new(),
            outbox: Outbox::new(),
            default_currency,
            event_capacity,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.default_currency.clone(), config.event_capacity)
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Open a new account
    pub fn open_account(&mut self, command: OpenAccountCommand) -> AppResult<AccountResult> {
        self.try_open_account(&command).inspect_err(|err| {
            tracing::warn!(
                operation = "open_account",
                owner = %command.owner,
                error = %err,
                error_code = err.error_code(),
                "Command rejected"
            );
        })
    }

    fn try_open_account(&mut self, command: &OpenAccountCommand) -> AppResult<AccountResult> {
        let currency = match &command.currency {
            Some(code) => Currency::new(code)?,
            None => self.default_currency.clone(),
        };

        let account = match &command.initial_balance {
            Some(amount) => Account::with_balance(
                command.owner.as_str(),
                Money::parse(amount, currency.as_str())?,
            )?,
            None => Account::open(command.owner.as_str(), currency),
        }
        .with_event_capacity(self.event_capacity);

        let result = AccountResult {
            account_id: account.id(),
            owner: account.owner().to_string(),
            balance: account.balance().clone(),
        };

        tracing::info!(
            account_id = %result.account_id,
            owner = %result.owner,
            balance = %result.balance,
            "Account opened"
        );
        self.accounts.insert(result.account_id, account);

        Ok(result)
    }

    /// Load a persisted account into the book
    pub fn restore_account(&mut self, snapshot: AccountSnapshot) -> AppResult<Uuid> {
        if self.accounts.contains_key(&snapshot.id) {
            return Err(AppError::AccountExists(snapshot.id));
        }

        let account = Account::restore(snapshot)?.with_event_capacity(self.event_capacity);
        let account_id = account.id();
        self.accounts.insert(account_id, account);

        tracing::info!(%account_id, "Account restored");
        Ok(account_id)
    }

    /// Deposit into an account
    pub fn deposit(
        &mut self,
        command: DepositCommand,
        context: &OperationContext,
    ) -> AppResult<TransactionResult> {
        self.try_deposit(&command, context)
            .inspect_err(|err| log_rejection("deposit", command.account_id, err))
    }

    fn try_deposit(
        &mut self,
        command: &DepositCommand,
        context: &OperationContext,
    ) -> AppResult<TransactionResult> {
        let account = self
            .accounts
            .get_mut(&command.account_id)
            .ok_or(AppError::AccountNotFound(command.account_id))?;

        let amount = parse_amount(&command.amount, command.currency.as_deref(), account)?;
        let transaction = account.deposit(&amount)?;
        let result = TransactionResult::new(&transaction, account.balance());

        self.outbox.collect(account, context)?;

        tracing::info!(
            account_id = %command.account_id,
            transaction_id = %result.transaction_id,
            amount = %result.amount,
            correlation_id = ?context.correlation_id,
            "Deposit completed"
        );
        Ok(result)
    }

    /// Withdraw from an account
    pub fn withdraw(
        &mut self,
        command: WithdrawCommand,
        context: &OperationContext,
    ) -> AppResult<TransactionResult> {
        self.try_withdraw(&command, context)
            .inspect_err(|err| log_rejection("withdraw", command.account_id, err))
    }

    fn try_withdraw(
        &mut self,
        command: &WithdrawCommand,
        context: &OperationContext,
    ) -> AppResult<TransactionResult> {
        let account = self
            .accounts
            .get_mut(&command.account_id)
            .ok_or(AppError::AccountNotFound(command.account_id))?;

        let amount = parse_amount(&command.amount, command.currency.as_deref(), account)?;
        let transaction = account.withdraw(&amount)?;
        let result = TransactionResult::new(&transaction, account.balance());

        self.outbox.collect(account, context)?;

        tracing::info!(
            account_id = %command.account_id,
            transaction_id = %result.transaction_id,
            amount = %result.amount,
            correlation_id = ?context.correlation_id,
            "Withdrawal completed"
        );
        Ok(result)
    }

    /// Transfer between two accounts inside a unit of work
    pub fn transfer(
        &mut self,
        command: TransferCommand,
        context: &OperationContext,
    ) -> AppResult<TransactionResult> {
        self.try_transfer(&command, context)
            .inspect_err(|err| log_rejection("transfer", command.from_account_id, err))
    }

    fn try_transfer(
        &mut self,
        command: &TransferCommand,
        context: &OperationContext,
    ) -> AppResult<TransactionResult> {
        if command.from_account_id == command.to_account_id {
            return Err(DomainError::InvalidTransaction(
                "cannot transfer to the same account".to_string(),
            )
            .into());
        }

        // Both accounts leave the book for the duration of the transfer so
        // they can be borrowed mutably together; they always go back.
        let mut source = self
            .accounts
            .remove(&command.from_account_id)
            .ok_or(AppError::AccountNotFound(command.from_account_id))?;
        let Some(mut target) = self.accounts.remove(&command.to_account_id) else {
            self.accounts.insert(command.from_account_id, source);
            return Err(AppError::AccountNotFound(command.to_account_id));
        };

        let outcome = self.execute_transfer(&mut source, &mut target, command, context);

        self.accounts.insert(command.from_account_id, source);
        self.accounts.insert(command.to_account_id, target);

        outcome
    }

    fn execute_transfer(
        &mut self,
        source: &mut Account,
        target: &mut Account,
        command: &TransferCommand,
        context: &OperationContext,
    ) -> AppResult<TransactionResult> {
        let amount = parse_amount(&command.amount, command.currency.as_deref(), source)?;

        let transaction = UnitOfWork::run(&mut [&mut *source, &mut *target], |accounts| {
            match accounts {
                [source, target] => source.transfer_to(target, &amount),
                _ => Err(DomainError::InvalidTransaction(
                    "a transfer needs exactly two accounts".to_string(),
                )),
            }
        })?;
        let result = TransactionResult::new(&transaction, source.balance());

        self.outbox.collect(source, context)?;
        self.outbox.collect(target, context)?;

        tracing::info!(
            from_account_id = %command.from_account_id,
            to_account_id = %command.to_account_id,
            transaction_id = %result.transaction_id,
            amount = %result.amount,
            correlation_id = ?context.correlation_id,
            "Transfer completed"
        );
        Ok(result)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn account(&self, account_id: Uuid) -> AppResult<&Account> {
        self.accounts
            .get(&account_id)
            .ok_or(AppError::AccountNotFound(account_id))
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    pub fn outbox_mut(&mut self) -> &mut Outbox {
        &mut self.outbox
    }
}

fn parse_amount(amount: &str, currency: Option<&str>, account: &Account) -> AppResult<Money> {
    let currency = currency.unwrap_or(account.currency().as_str());
    Ok(Money::parse(amount, currency)?)
}

fn log_rejection(operation: &'static str, account_id: Uuid, err: &AppError) {
    tracing::warn!(
        operation,
        %account_id,
        error = %err,
        error_code = err.error_code(),
        "Command rejected"
    );
}
