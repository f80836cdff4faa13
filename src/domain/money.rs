//! Money type
//!
//! Domain primitive for monetary values with currency-safe arithmetic.
//! All amounts are quantized at construction time and after every operation,
//! so an unrounded value cannot exist in the system.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::error::DomainError;

/// Decimal places every amount is quantized to
pub const MONEY_SCALE: u32 = 2;

/// Largest magnitude, in whole units, a Money value may hold (10^15)
pub const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000_000;

/// ISO-style currency code (three ASCII letters, upper case)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Create a currency code, normalising it to upper case.
    ///
    /// # Errors
    /// - `DomainError::InvalidCurrency` unless the code is exactly 3 ASCII letters
    pub fn new(code: &str) -> Result<Self, DomainError> {
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::InvalidCurrency(code.to_string()));
        }

        Ok(Self(code.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Currency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::new(s)
    }
}

impl TryFrom<String> for Currency {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Currency::new(&value)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.0
    }
}

/// Money represents an exact monetary value in one currency.
///
/// # Invariants
/// - Amount is quantized to 2 decimal places, rounding half away from zero
/// - Amount always carries scale 2 (`10` is held as `10.00`)
/// - Values in different currencies are never combined or compared
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use bank_ledger::domain::Money;
///
/// let money = Money::new(Decimal::new(1005, 3), "USD").unwrap();
/// assert_eq!(money.amount(), Decimal::new(101, 2));
/// assert_eq!(money.to_string(), "1.01 USD");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "MoneyRepr", into = "MoneyRepr")]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

/// Wire shape of [`Money`]; the amount travels as a decimal string.
#[derive(Serialize, Deserialize)]
struct MoneyRepr {
    amount: Decimal,
    currency: String,
}

fn quantize(amount: Decimal) -> Decimal {
    let mut quantized =
        amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    quantized.rescale(MONEY_SCALE);
    if quantized.is_zero() {
        quantized.set_sign_positive(true);
    }
    quantized
}

// Inside the bound every sum, difference and quantization is exact.
fn bounded(amount: Decimal) -> Result<Decimal, DomainError> {
    let max = Decimal::new(MAX_AMOUNT_UNITS, 0);
    if amount.abs() > max {
        return Err(DomainError::InvalidAmount(format!(
            "{amount} exceeds the maximum magnitude ({max})"
        )));
    }

    let quantized = quantize(amount);
    if quantized.scale() != MONEY_SCALE {
        return Err(DomainError::InvalidAmount(format!(
            "{amount} cannot be held to {MONEY_SCALE} decimal places"
        )));
    }
    Ok(quantized)
}

impl Money {
    /// Create a new Money value from a decimal amount and a currency code.
    ///
    /// # Errors
    /// - `DomainError::InvalidCurrency` if the code is not exactly 3 letters
    /// - `DomainError::InvalidAmount` if the magnitude exceeds 10^15
    pub fn new(amount: Decimal, currency: &str) -> Result<Self, DomainError> {
        Self::of(amount, Currency::new(currency)?)
    }

    /// Create a Money value in an already validated currency.
    ///
    /// # Errors
    /// - `DomainError::InvalidAmount` if the magnitude exceeds 10^15
    pub fn of(amount: Decimal, currency: Currency) -> Result<Self, DomainError> {
        Ok(Self {
            amount: bounded(amount)?,
            currency,
        })
    }

    /// Parse a decimal string such as `"12.345"`.
    ///
    /// # Errors
    /// - `DomainError::InvalidAmount` if the string is not a decimal number
    /// - `DomainError::InvalidCurrency` if the code is not exactly 3 letters
    pub fn parse(amount: &str, currency: &str) -> Result<Self, DomainError> {
        let currency = Currency::new(currency)?;
        let amount = Decimal::from_str(amount.trim())
            .map_err(|e| DomainError::InvalidAmount(format!("{amount:?}: {e}")))?;
        Self::of(amount, currency)
    }

    /// Convert a binary float at the system boundary.
    ///
    /// # Errors
    /// - `DomainError::InvalidAmount` for NaN, infinities and out-of-range values
    pub fn from_f64(amount: f64, currency: &str) -> Result<Self, DomainError> {
        let currency = Currency::new(currency)?;
        let amount = Decimal::from_f64(amount)
            .ok_or_else(|| DomainError::InvalidAmount(format!("{amount} is not representable")))?;
        Self::of(amount, currency)
    }

    /// Zero in the given currency
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: quantize(Decimal::ZERO),
            currency,
        }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    /// Add two values of the same currency.
    pub fn try_add(&self, other: &Money) -> Result<Money, DomainError> {
        self.ensure_same_currency(other)?;
        let sum = self
            .amount
            .checked_add(other.amount)
            .ok_or_else(|| DomainError::InvalidAmount("addition overflow".to_string()))?;
        Self::of(sum, self.currency.clone())
    }

    /// Subtract a value of the same currency.
    pub fn try_subtract(&self, other: &Money) -> Result<Money, DomainError> {
        self.ensure_same_currency(other)?;
        let difference = self
            .amount
            .checked_sub(other.amount)
            .ok_or_else(|| DomainError::InvalidAmount("subtraction overflow".to_string()))?;
        Self::of(difference, self.currency.clone())
    }

    /// Scale by a factor, keeping the currency.
    pub fn multiply(&self, factor: impl Into<Decimal>) -> Result<Money, DomainError> {
        let product = self
            .amount
            .checked_mul(factor.into())
            .ok_or_else(|| DomainError::InvalidAmount("multiplication overflow".to_string()))?;
        Self::of(product, self.currency.clone())
    }

    /// Compare two values of the same currency.
    pub fn try_cmp(&self, other: &Money) -> Result<Ordering, DomainError> {
        self.ensure_same_currency(other)?;
        Ok(self.amount.cmp(&other.amount))
    }

    pub fn less_than(&self, other: &Money) -> Result<bool, DomainError> {
        Ok(self.try_cmp(other)? == Ordering::Less)
    }

    pub fn less_or_equal(&self, other: &Money) -> Result<bool, DomainError> {
        Ok(self.try_cmp(other)? != Ordering::Greater)
    }

    pub fn greater_than(&self, other: &Money) -> Result<bool, DomainError> {
        Ok(self.try_cmp(other)? == Ordering::Greater)
    }

    pub fn greater_or_equal(&self, other: &Money) -> Result<bool, DomainError> {
        Ok(self.try_cmp(other)? != Ordering::Less)
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), DomainError> {
        if self.currency != other.currency {
            return Err(DomainError::currency_mismatch(&self.currency, &other.currency));
        }
        Ok(())
    }
}

// Values in different currencies are unordered.
impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_cmp(other).ok()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

impl TryFrom<MoneyRepr> for Money {
    type Error = DomainError;

    fn try_from(repr: MoneyRepr) -> Result<Self, Self::Error> {
        Money::new(repr.amount, &repr.currency)
    }
}

impl From<Money> for MoneyRepr {
    fn from(money: Money) -> Self {
        Self {
            amount: money.amount,
            currency: money.currency.into(),
        }
    }
}
