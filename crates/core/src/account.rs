//! The Account aggregate: holds a balance and guards its own mutation.

use ledger_shared::{AccountId, Money, UserId};

use crate::error::CoreError;
use crate::model::is_cashbook_user;

/// A user's (or the system's) account. Balance currency is immutable for the account's
/// lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// The user this account belongs to.
    pub user_id: UserId,
    /// The current balance.
    pub balance: Money,
}

impl Account {
    /// Constructs an account with the given balance.
    #[must_use]
    pub const fn new(id: AccountId, user_id: UserId, balance: Money) -> Self {
        Self {
            id,
            user_id,
            balance,
        }
    }

    /// True if this account is owned by the reserved cashbook user.
    ///
    /// Cashbook accounts are exempt from the non-negative balance rule (I6): they are
    /// allowed to go negative so they can act as the system-side ledger counterparty.
    #[must_use]
    pub fn is_cashbook(&self) -> bool {
        is_cashbook_user(self.user_id)
    }

    /// Credits `amount` to the balance. Currency must match.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CurrencyMismatch`] if `amount`'s currency differs from the
    /// account's.
    pub fn credit(&mut self, amount: Money) -> Result<(), CoreError> {
        self.balance = self.balance.add(amount)?;
        Ok(())
    }

    /// Debits `amount` from the balance.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CurrencyMismatch`] if `amount`'s currency differs from the
    /// account's. Returns [`CoreError::InsufficientFunds`] if this is not a cashbook account
    /// and the balance is less than `amount`.
    pub fn debit(&mut self, amount: Money) -> Result<(), CoreError> {
        if !self.is_cashbook() && self.balance.less_than(amount)? {
            return Err(CoreError::InsufficientFunds {
                account_id: self.id,
                requested: amount.amount,
                available: self.balance.amount,
            });
        }
        self.balance = self.balance.sub(amount)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_shared::Currency;
    use ledger_shared::types::id::{cashbook_user_id, usd_cashbook_account_id};
    use rust_decimal_macros::dec;

    fn user_account(balance: rust_decimal::Decimal) -> Account {
        Account::new(
            AccountId::new(),
            UserId::new(),
            Money::new(balance, Currency::Usd),
        )
    }

    #[test]
    fn credit_increases_balance() {
        let mut account = user_account(dec!(100.00));
        account.credit(Money::new(dec!(50.00), Currency::Usd)).unwrap();
        assert_eq!(account.balance.amount, dec!(150.00));
    }

    #[test]
    fn debit_decreases_balance_when_sufficient() {
        let mut account = user_account(dec!(100.00));
        account.debit(Money::new(dec!(40.00), Currency::Usd)).unwrap();
        assert_eq!(account.balance.amount, dec!(60.00));
    }

    #[test]
    fn debit_rejects_insufficient_funds_for_non_cashbook_account() {
        let mut account = user_account(dec!(10.00));
        let err = account
            .debit(Money::new(dec!(100.00), Currency::Usd))
            .unwrap_err();
        match err {
            CoreError::InsufficientFunds {
                requested,
                available,
                ..
            } => {
                assert_eq!(requested, dec!(100.00));
                assert_eq!(available, dec!(10.00));
            }
            other => panic!("expected InsufficientFunds, got {other:?}"),
        }
    }

    #[test]
    fn debit_allows_cashbook_account_to_go_negative() {
        let mut cashbook = Account::new(
            usd_cashbook_account_id(),
            cashbook_user_id(),
            Money::new(dec!(0.00), Currency::Usd),
        );
        cashbook
            .debit(Money::new(dec!(92.00), Currency::Usd))
            .unwrap();
        assert_eq!(cashbook.balance.amount, dec!(-92.00));
    }

    #[test]
    fn credit_and_debit_reject_currency_mismatch() {
        let mut account = user_account(dec!(100.00));
        assert!(account.credit(Money::new(dec!(1.00), Currency::Eur)).is_err());
        assert!(account.debit(Money::new(dec!(1.00), Currency::Eur)).is_err());
    }
}

#[cfg(test)]
mod props {
    use super::*;
    use ledger_shared::Currency;
    use ledger_shared::types::id::{cashbook_user_id, usd_cashbook_account_id};
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    /// Cents bounded to a realistic account balance.
    fn cents() -> impl Strategy<Value = i64> {
        0_i64..=1_000_000_00_i64
    }

    fn user_account(balance_cents: i64) -> Account {
        Account::new(
            AccountId::new(),
            UserId::new(),
            Money::new(Decimal::new(balance_cents, 2), Currency::Usd),
        )
    }

    proptest! {
        /// A non-cashbook account's debit guard (I6) never lets the balance go negative:
        /// it either succeeds and leaves a non-negative balance, or fails outright.
        #[test]
        fn debit_never_drives_a_non_cashbook_account_negative(
            balance_cents in cents(),
            debit_cents in cents(),
        ) {
            let mut account = user_account(balance_cents);
            let amount = Money::new(Decimal::new(debit_cents, 2), Currency::Usd);
            match account.debit(amount) {
                Ok(()) => prop_assert!(account.balance.amount >= Decimal::ZERO),
                Err(CoreError::InsufficientFunds { .. }) => {
                    prop_assert!(debit_cents > balance_cents);
                }
                Err(other) => prop_assert!(false, "unexpected error: {other:?}"),
            }
        }

        /// Crediting then debiting the same amount is a no-op on the balance.
        #[test]
        fn credit_then_debit_same_amount_restores_balance(
            balance_cents in cents(),
            amount_cents in cents(),
        ) {
            let mut account = user_account(balance_cents);
            let amount = Money::new(Decimal::new(amount_cents, 2), Currency::Usd);
            account.credit(amount).unwrap();
            account.debit(amount).unwrap();
            prop_assert_eq!(account.balance.amount, Decimal::new(balance_cents, 2));
        }

        /// A cashbook account's debit guard is exempt from I6 and always succeeds.
        #[test]
        fn cashbook_debit_always_succeeds_even_past_zero(debit_cents in cents()) {
            let mut cashbook = Account::new(
                usd_cashbook_account_id(),
                cashbook_user_id(),
                Money::new(Decimal::ZERO, Currency::Usd),
            );
            let amount = Money::new(Decimal::new(debit_cents, 2), Currency::Usd);
            prop_assert!(cashbook.debit(amount).is_ok());
        }
    }
}
