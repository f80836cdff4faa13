//! bank_ledger demo runner
//!
//! Opens two accounts, runs a handful of commands against them and prints
//! the resulting outbox envelopes as JSON lines on stdout. Logs go to stderr.

use bank_ledger::config::LogFormat;
use bank_ledger::error::ErrorResponse;
use bank_ledger::handlers::{
    DepositCommand, LedgerHandler, OpenAccountCommand, TransferCommand, WithdrawCommand,
};
use bank_ledger::{Config, OperationContext};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging
fn init_tracing(format: LogFormat) {
    let registry = tracing_subscriber::registry().with(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "bank_ledger=debug".into()),
    );

    match format {
        LogFormat::Plain => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.log_format);

    tracing::info!(
        environment = %config.environment,
        default_currency = %config.default_currency,
        event_capacity = config.event_capacity,
        "Starting bank_ledger demo"
    );

    let mut ledger = LedgerHandler::from_config(&config);
    let mut context = OperationContext::new().with_initiator("demo");
    context.ensure_correlation_id();

    let alice = ledger
        .open_account(OpenAccountCommand::new("alice").with_initial_balance("100.00"))?
        .account_id;
    let bob = ledger.open_account(OpenAccountCommand::new("bob"))?.account_id;

    ledger.deposit(DepositCommand::new(alice, "10.005"), &context)?;
    ledger.transfer(TransferCommand::new(alice, bob, "30.00"), &context)?;
    ledger.withdraw(WithdrawCommand::new(bob, "5.25"), &context)?;

    // Rejected: bob cannot cover it. Report it the way a front-end would.
    if let Err(err) = ledger.withdraw(WithdrawCommand::new(bob, "1000"), &context) {
        println!("{}", serde_json::to_string(&ErrorResponse::from(&err))?);
    }

    let batch = ledger.outbox().next_batch(usize::MAX);
    for envelope in &batch {
        println!("{}", serde_json::to_string(envelope)?);
    }
    if let Some(last) = batch.last() {
        ledger.outbox_mut().acknowledge(last.sequence)?;
    }

    for account_id in [alice, bob] {
        let account = ledger.account(account_id)?;
        tracing::info!(
            %account_id,
            owner = account.owner(),
            balance = %account.balance(),
            transactions = account.transaction_count(),
            "Final state"
        );
    }

    Ok(())
}
