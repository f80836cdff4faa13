//! Property tests for Money arithmetic and account invariants

mod common;

use bank_ledger::domain::MAX_AMOUNT_UNITS;
use bank_ledger::{Aggregate, DomainError, Money};
use common::usd_account;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Cent amounts between -10^12 and 10^12 as 2-place decimals
fn cents() -> impl Strategy<Value = Decimal> {
    (-1_000_000_000_000_00i64..1_000_000_000_000_00i64).prop_map(|c| Decimal::new(c, 2))
}

fn non_negative_cents() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000_00i64).prop_map(|c| Decimal::new(c, 2))
}

fn currency_code() -> impl Strategy<Value = String> {
    "[A-Z]{3}"
}

proptest! {
    #[test]
    fn add_then_subtract_round_trips(a in cents(), b in cents(), code in currency_code()) {
        let a = Money::new(a, &code).unwrap();
        let b = Money::new(b, &code).unwrap();

        let back = a.try_add(&b).unwrap().try_subtract(&b).unwrap();
        prop_assert_eq!(back, a);
    }

    #[test]
    fn mismatched_currencies_always_fail(
        a in cents(),
        b in cents(),
        left in currency_code(),
        right in currency_code(),
    ) {
        prop_assume!(left != right);
        let a = Money::new(a, &left).unwrap();
        let b = Money::new(b, &right).unwrap();

        let is_mismatch = |r: Result<Money, DomainError>| {
            matches!(r, Err(DomainError::CurrencyMismatch { .. }))
        };
        prop_assert!(is_mismatch(a.try_add(&b)));
        prop_assert!(is_mismatch(a.try_subtract(&b)));
        let cmp_mismatch = matches!(a.try_cmp(&b), Err(DomainError::CurrencyMismatch { .. }));
        prop_assert!(cmp_mismatch);
    }

    #[test]
    fn construction_always_quantizes(mantissa in any::<i64>(), scale in 0u32..10) {
        let amount = Decimal::new(mantissa, scale);
        match Money::new(amount, "USD") {
            Ok(money) => {
                prop_assert_eq!(money.amount().scale(), 2);
                prop_assert_eq!(money.amount(), money.amount().round_dp(2));
            }
            Err(err) => {
                prop_assert!(amount.abs() > Decimal::new(MAX_AMOUNT_UNITS, 0));
                prop_assert!(matches!(err, DomainError::InvalidAmount(_)));
            }
        }
    }

    #[test]
    fn over_withdrawal_changes_nothing(
        balance in non_negative_cents(),
        excess in 1i64..1_000_000_00i64,
    ) {
        let mut account = usd_account("prop", balance);
        let before = account.snapshot();
        let amount = Money::new(balance + Decimal::new(excess, 2), "USD").unwrap();

        let result = account.withdraw(&amount);

        let is_insufficient = matches!(result, Err(DomainError::InsufficientFunds { .. }));
        prop_assert!(is_insufficient);
        prop_assert_eq!(account.snapshot(), before);
        prop_assert!(account.pending_events().is_empty());
    }

    #[test]
    fn transfers_conserve_total(
        a in non_negative_cents(),
        b in non_negative_cents(),
        amount in 1i64..1_000_000_00i64,
    ) {
        let mut source = usd_account("source", a);
        let mut target = usd_account("target", b);
        let amount = Money::new(Decimal::new(amount, 2), "USD").unwrap();
        let total = source.balance().try_add(target.balance()).unwrap();

        let _ = source.transfer_to(&mut target, &amount);

        let after = source.balance().try_add(target.balance()).unwrap();
        prop_assert_eq!(after, total);
        prop_assert!(!source.balance().is_negative());
    }
}
