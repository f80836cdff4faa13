//! Integration tests for the ledger core
//!
//! Exercise the public API the way an external collaborator would: mutate
//! accounts, drain their events and persist them as opaque snapshots.

mod common;

use bank_ledger::aggregate::AccountSnapshot;
use bank_ledger::handlers::{
    DepositCommand, LedgerHandler, OpenAccountCommand, TransferCommand, UnitOfWork,
};
use bank_ledger::outbox::Outbox;
use bank_ledger::{
    Account, AccountEvent, Aggregate, Currency, DomainError, OperationContext, TransactionStatus,
};
use common::{eur, usd, usd_account};
use rust_decimal_macros::dec;

#[test]
fn test_deposit_into_funded_account() {
    let mut account = usd_account("alice", dec!(5.00));

    account.deposit(&usd(dec!(10.00))).unwrap();

    assert_eq!(account.balance(), &usd(dec!(15.00)));
    let history = account.transactions();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status(), TransactionStatus::Completed);
    assert_eq!(history[0].to_account(), Some(account.id()));
}

#[test]
fn test_transfer_between_accounts() {
    let mut a = usd_account("a", dec!(100.00));
    let mut b = usd_account("b", dec!(0.00));

    a.transfer_to(&mut b, &usd(dec!(30.00))).unwrap();

    assert_eq!(a.balance(), &usd(dec!(70.00)));
    assert_eq!(b.balance(), &usd(dec!(30.00)));
    let history = a.transactions();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].amount(), &usd(dec!(30.00)));
    assert_eq!(history[0].from_account(), Some(a.id()));
    assert_eq!(history[0].to_account(), Some(b.id()));
}

#[test]
fn test_failed_operations_change_nothing() {
    let mut a = usd_account("a", dec!(10));
    let mut b = Account::open("b", "EUR".parse::<Currency>().unwrap());
    let before = a.snapshot();

    assert!(matches!(
        a.withdraw(&usd(dec!(10.01))),
        Err(DomainError::InsufficientFunds { .. })
    ));
    assert!(matches!(
        a.deposit(&eur(dec!(1))),
        Err(DomainError::CurrencyMismatch { .. })
    ));
    assert!(matches!(
        a.transfer_to(&mut b, &usd(dec!(1))),
        Err(DomainError::CurrencyMismatch { .. })
    ));
    assert!(matches!(
        a.deposit(&usd(dec!(0))),
        Err(DomainError::InvalidAmount(_))
    ));

    assert_eq!(a.snapshot(), before);
    assert!(a.pending_events().is_empty());
    assert!(b.pending_events().is_empty());
}

#[test]
fn test_events_flow_to_outbox_and_back() {
    let mut a = usd_account("a", dec!(50));
    let mut b = usd_account("b", dec!(0));
    let mut outbox = Outbox::new();
    let context = OperationContext::new().with_initiator("integration");

    a.transfer_to(&mut b, &usd(dec!(20))).unwrap();
    outbox.collect(&mut a, &context).unwrap();
    outbox.collect(&mut b, &context).unwrap();

    let batch = outbox.next_batch(10);
    assert_eq!(batch.len(), 2);

    let balances: Vec<_> = batch
        .iter()
        .map(|envelope| {
            let AccountEvent::BalanceUpdated { new_balance, .. } =
                envelope.decode::<AccountEvent>().unwrap();
            new_balance
        })
        .collect();
    assert_eq!(balances, vec![usd(dec!(30)), usd(dec!(20))]);

    assert_eq!(outbox.acknowledge(batch[1].sequence).unwrap(), 2);
    assert!(outbox.is_empty());
}

#[test]
fn test_snapshot_survives_json_persistence() {
    let mut account = usd_account("a", dec!(0.10));
    account.deposit(&usd(dec!(0.20))).unwrap();

    let stored = serde_json::to_string(&account.snapshot()).unwrap();
    assert!(stored.contains(r#""amount":"0.30""#));

    let snapshot: AccountSnapshot = serde_json::from_str(&stored).unwrap();
    let restored = Account::restore(snapshot).unwrap();

    assert_eq!(restored.balance(), &usd(dec!(0.30)));
    assert_eq!(restored.transactions(), account.transactions());
}

#[test]
fn test_unit_of_work_compensates_multi_leg_payment() {
    let mut payer = usd_account("payer", dec!(100));
    let mut first = usd_account("first", dec!(0));
    let mut second = Account::open("second", "EUR".parse::<Currency>().unwrap());

    let result = UnitOfWork::run(&mut [&mut payer, &mut first, &mut second], |accounts| {
        let (payer, payees) = accounts.split_at_mut(1);
        for payee in payees.iter_mut() {
            payer[0].transfer_to(payee, &usd(dec!(25)))?;
        }
        Ok(())
    });

    assert!(matches!(result, Err(DomainError::CurrencyMismatch { .. })));
    assert_eq!(payer.balance(), &usd(dec!(100)));
    assert!(first.balance().is_zero());
    assert_eq!(payer.transaction_count(), 0);
}

#[test]
fn test_ledger_handler_end_to_end() {
    let mut ledger = LedgerHandler::new("USD".parse().unwrap(), 8);
    let context = OperationContext::new();

    let a = ledger
        .open_account(OpenAccountCommand::new("a").with_initial_balance("1.005"))
        .unwrap()
        .account_id;
    let b = ledger.open_account(OpenAccountCommand::new("b")).unwrap().account_id;

    ledger
        .deposit(DepositCommand::new(a, "98.99"), &context)
        .unwrap();
    ledger
        .transfer(TransferCommand::new(a, b, "100"), &context)
        .unwrap();

    assert!(ledger.account(a).unwrap().balance().is_zero());
    assert_eq!(ledger.account(b).unwrap().balance(), &usd(dec!(100.00)));
    assert_eq!(ledger.outbox().len(), 3);
}
