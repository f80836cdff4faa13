//! Common test utilities

#![allow(dead_code)]

use bank_ledger::{Account, Money};
use rust_decimal::Decimal;

/// Money in US dollars
pub fn usd(amount: Decimal) -> Money {
    Money::new(amount, "USD").expect("USD is a valid currency")
}

/// Money in euros
pub fn eur(amount: Decimal) -> Money {
    Money::new(amount, "EUR").expect("EUR is a valid currency")
}

/// Account holding `balance` dollars
pub fn usd_account(owner: &str, balance: Decimal) -> Account {
    Account::with_balance(owner, usd(balance)).expect("non-negative balance")
}
