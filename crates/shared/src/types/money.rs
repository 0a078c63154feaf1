//! Money type with decimal precision and currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Currencies recognized by the ledger core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar.
    Usd,
    /// Euro.
    Eur,
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usd => write!(f, "USD"),
            Self::Eur => write!(f, "EUR"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            _ => Err(MoneyError::UnsupportedCurrency),
        }
    }
}

/// Errors raised by Money arithmetic and construction.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoneyError {
    /// The two operands do not share a currency.
    #[error("currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch {
        /// The currency the operation required.
        expected: Currency,
        /// The currency that was actually supplied.
        found: Currency,
    },
    /// The currency is not in the recognized set.
    #[error("unsupported currency")]
    UnsupportedCurrency,
}

/// An immutable monetary amount tagged with its currency.
///
/// Arithmetic is only defined between values sharing a currency; mixing currencies
/// always returns [`MoneyError::CurrencyMismatch`] rather than silently converting.
/// There is no implicit rounding here — rounding is explicit and lives on
/// `ExchangeRate::convert`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The exact decimal amount.
    pub amount: Decimal,
    /// The currency this amount is denominated in.
    pub currency: Currency,
}

impl Money {
    /// Creates a new Money value.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates a zero amount in the given currency.
    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns true if the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Adds `other` to `self`, failing if the currencies differ.
    pub fn add(&self, other: Money) -> Result<Money, MoneyError> {
        self.require_same_currency(other)?;
        Ok(Money::new(self.amount + other.amount, self.currency))
    }

    /// Subtracts `other` from `self`, failing if the currencies differ.
    pub fn sub(&self, other: Money) -> Result<Money, MoneyError> {
        self.require_same_currency(other)?;
        Ok(Money::new(self.amount - other.amount, self.currency))
    }

    /// Returns the negation of this amount, currency preserved.
    #[must_use]
    pub fn negate(&self) -> Money {
        Money::new(-self.amount, self.currency)
    }

    /// Returns true if `self` is strictly less than `other`, failing if currencies differ.
    pub fn less_than(&self, other: Money) -> Result<bool, MoneyError> {
        self.require_same_currency(other)?;
        Ok(self.amount < other.amount)
    }

    fn require_same_currency(&self, other: Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch {
                expected: self.currency,
                found: other.currency,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usd(amount: Decimal) -> Money {
        Money::new(amount, Currency::Usd)
    }

    fn eur(amount: Decimal) -> Money {
        Money::new(amount, Currency::Eur)
    }

    #[test]
    fn add_same_currency_sums_amounts() {
        let result = usd(dec!(10.00)).add(usd(dec!(5.50))).unwrap();
        assert_eq!(result, usd(dec!(15.50)));
    }

    #[test]
    fn add_mixed_currency_fails() {
        let err = usd(dec!(10.00)).add(eur(dec!(5.00))).unwrap_err();
        assert_eq!(
            err,
            MoneyError::CurrencyMismatch {
                expected: Currency::Usd,
                found: Currency::Eur,
            }
        );
    }

    #[test]
    fn sub_same_currency_subtracts_amounts() {
        let result = usd(dec!(10.00)).sub(usd(dec!(3.00))).unwrap();
        assert_eq!(result, usd(dec!(7.00)));
    }

    #[test]
    fn negate_preserves_currency() {
        let result = usd(dec!(10.00)).negate();
        assert_eq!(result, usd(dec!(-10.00)));
    }

    #[test]
    fn less_than_compares_amounts() {
        assert!(usd(dec!(5.00)).less_than(usd(dec!(10.00))).unwrap());
        assert!(!usd(dec!(10.00)).less_than(usd(dec!(5.00))).unwrap());
    }

    #[test]
    fn less_than_mixed_currency_fails() {
        assert!(usd(dec!(5.00)).less_than(eur(dec!(10.00))).is_err());
    }

    #[test]
    fn is_zero_and_is_negative() {
        assert!(usd(dec!(0.00)).is_zero());
        assert!(!usd(dec!(0.00)).is_negative());
        assert!(usd(dec!(-1.00)).is_negative());
    }

    #[test]
    fn currency_round_trips_through_string() {
        assert_eq!("USD".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!("eur".parse::<Currency>().unwrap(), Currency::Eur);
        assert!("GBP".parse::<Currency>().is_err());
    }
}

#[cfg(test)]
mod props {
    use super::*;
    use proptest::prelude::*;

    /// Cents bounded to a realistic account balance: up to ten million, signed.
    fn cents() -> impl Strategy<Value = i64> {
        -1_000_000_000_i64..=1_000_000_000_i64
    }

    fn money(cents: i64) -> Money {
        Money::new(Decimal::new(cents, 2), Currency::Usd)
    }

    proptest! {
        #[test]
        fn add_then_sub_is_identity(a in cents(), b in cents()) {
            let result = money(a).add(money(b)).unwrap().sub(money(b)).unwrap();
            prop_assert_eq!(result, money(a));
        }

        #[test]
        fn add_is_commutative(a in cents(), b in cents()) {
            prop_assert_eq!(money(a).add(money(b)), money(b).add(money(a)));
        }

        #[test]
        fn negate_twice_is_identity(a in cents()) {
            prop_assert_eq!(money(a).negate().negate(), money(a));
        }

        #[test]
        fn less_than_matches_raw_comparison(a in cents(), b in cents()) {
            prop_assert_eq!(money(a).less_than(money(b)).unwrap(), a < b);
        }
    }
}
