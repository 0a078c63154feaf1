//! The Exchange domain service: cross-currency conversion intermediated by cashbook accounts.

use chrono::{DateTime, Utc};

use ledger_shared::{ExchangeDetailsId, LedgerRecordId, Money, TransactionId};

use crate::account::Account;
use crate::error::CoreError;
use crate::model::{ExchangeDetails, LedgerRecord, Transaction, TransactionType};
use crate::rate::ExchangeRate;

/// The fully formed output of an exchange: the anchor transaction, its details, and the two
/// independent balanced ledger entries (one per currency) that must accompany it.
#[derive(Debug, Clone)]
pub struct ExchangeDescriptor {
    /// The anchor transaction, of type [`TransactionType::Exchange`].
    pub transaction: Transaction,
    /// The exchange details row.
    pub details: ExchangeDetails,
    /// Four ledger records forming two independent balanced entries, one per currency.
    pub ledger_records: Vec<LedgerRecord>,
}

/// Stateless domain service executing exchanges against in-memory account aggregates.
pub struct ExchangeService;

impl ExchangeService {
    /// Executes an exchange of `source_amount` from `source` into `target`, intermediated by
    /// `source_cashbook` (same currency as `source_amount`) and `target_cashbook` (same
    /// currency as `target`'s balance). All four accounts must already be locked in storage
    /// by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NegativeExchange`] if `source_amount` is negative,
    /// [`CoreError::ZeroAmountExchange`] if it is zero,
    /// [`CoreError::SameCurrencyExchange`] if `source` and `target` share a currency,
    /// [`CoreError::CurrencyMismatch`] if `rate` does not match `source_amount`'s currency or
    /// `target`'s currency, or [`CoreError::InsufficientFunds`] if `source` cannot cover the
    /// debit.
    #[allow(clippy::too_many_arguments)]
    pub fn exchange(
        source: &mut Account,
        target: &mut Account,
        source_cashbook: &mut Account,
        target_cashbook: &mut Account,
        source_amount: Money,
        rate: &ExchangeRate,
        now: DateTime<Utc>,
    ) -> Result<ExchangeDescriptor, CoreError> {
        if source_amount.is_negative() {
            return Err(CoreError::NegativeExchange);
        }
        if source_amount.is_zero() {
            return Err(CoreError::ZeroAmountExchange);
        }
        if source.balance.currency == target.balance.currency {
            return Err(CoreError::SameCurrencyExchange);
        }
        if rate.from() != source_amount.currency {
            return Err(CoreError::CurrencyMismatch {
                expected: rate.from(),
                found: source_amount.currency,
            });
        }
        if rate.to() != target.balance.currency {
            return Err(CoreError::CurrencyMismatch {
                expected: rate.to(),
                found: target.balance.currency,
            });
        }

        let target_amount = rate.convert(source_amount)?;

        source.debit(source_amount)?;
        target.credit(target_amount)?;
        source_cashbook.credit(source_amount)?;
        target_cashbook.debit(target_amount)?;

        let transaction_id = TransactionId::new();
        let transaction = Transaction {
            id: transaction_id,
            transaction_type: TransactionType::Exchange,
            account_id: source.id,
            timestamp: now,
        };

        let details = ExchangeDetails {
            id: ExchangeDetailsId::new(),
            transaction_id,
            source_account_id: source.id,
            target_account_id: target.id,
            source_amount,
            target_amount,
        };

        let ledger_records = vec![
            LedgerRecord {
                id: LedgerRecordId::new(),
                transaction_id,
                account_id: source.id,
                money: source_amount.negate(),
                timestamp: now,
            },
            LedgerRecord {
                id: LedgerRecordId::new(),
                transaction_id,
                account_id: source_cashbook.id,
                money: source_amount,
                timestamp: now,
            },
            LedgerRecord {
                id: LedgerRecordId::new(),
                transaction_id,
                account_id: target_cashbook.id,
                money: target_amount.negate(),
                timestamp: now,
            },
            LedgerRecord {
                id: LedgerRecordId::new(),
                transaction_id,
                account_id: target.id,
                money: target_amount,
                timestamp: now,
            },
        ];

        crate::reconciliation::assert_balanced_entry_set(&ledger_records)?;

        Ok(ExchangeDescriptor {
            transaction,
            details,
            ledger_records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_shared::{AccountId, Currency, UserId};
    use ledger_shared::types::id::{cashbook_user_id, eur_cashbook_account_id, usd_cashbook_account_id};
    use rust_decimal_macros::dec;

    fn user_account(balance: rust_decimal::Decimal, currency: Currency) -> Account {
        Account::new(AccountId::new(), UserId::new(), Money::new(balance, currency))
    }

    fn cashbooks() -> (Account, Account) {
        (
            Account::new(
                usd_cashbook_account_id(),
                cashbook_user_id(),
                Money::new(dec!(0.00), Currency::Usd),
            ),
            Account::new(
                eur_cashbook_account_id(),
                cashbook_user_id(),
                Money::new(dec!(0.00), Currency::Eur),
            ),
        )
    }

    #[test]
    fn exchange_converts_and_builds_two_balanced_entries() {
        let mut source = user_account(dec!(1000.00), Currency::Usd);
        let mut target = user_account(dec!(500.00), Currency::Eur);
        let (mut usd_cashbook, mut eur_cashbook) = cashbooks();
        let rate = ExchangeRate::new(Currency::Usd, Currency::Eur, dec!(0.92)).unwrap();

        let descriptor = ExchangeService::exchange(
            &mut source,
            &mut target,
            &mut usd_cashbook,
            &mut eur_cashbook,
            Money::new(dec!(100.00), Currency::Usd),
            &rate,
            Utc::now(),
        )
        .unwrap();

        assert_eq!(source.balance.amount, dec!(900.00));
        assert_eq!(target.balance.amount, dec!(592.00));
        assert_eq!(usd_cashbook.balance.amount, dec!(100.00));
        assert_eq!(eur_cashbook.balance.amount, dec!(-92.00));
        assert_eq!(descriptor.ledger_records.len(), 4);
        assert_eq!(descriptor.details.target_amount.amount, dec!(92.00));
    }

    #[test]
    fn exchange_rejects_same_currency_accounts() {
        let mut source = user_account(dec!(1000.00), Currency::Usd);
        let mut target = user_account(dec!(500.00), Currency::Usd);
        let (mut usd_cashbook, mut eur_cashbook) = cashbooks();
        let rate = ExchangeRate::new(Currency::Usd, Currency::Eur, dec!(0.92)).unwrap();

        let err = ExchangeService::exchange(
            &mut source,
            &mut target,
            &mut usd_cashbook,
            &mut eur_cashbook,
            Money::new(dec!(100.00), Currency::Usd),
            &rate,
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::SameCurrencyExchange));
    }

    #[test]
    fn exchange_rejects_zero_amount() {
        let mut source = user_account(dec!(1000.00), Currency::Usd);
        let mut target = user_account(dec!(500.00), Currency::Eur);
        let (mut usd_cashbook, mut eur_cashbook) = cashbooks();
        let rate = ExchangeRate::new(Currency::Usd, Currency::Eur, dec!(0.92)).unwrap();

        let err = ExchangeService::exchange(
            &mut source,
            &mut target,
            &mut usd_cashbook,
            &mut eur_cashbook,
            Money::new(dec!(0.00), Currency::Usd),
            &rate,
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::ZeroAmountExchange));
    }

    #[test]
    fn exchange_rejects_negative_amount() {
        let mut source = user_account(dec!(1000.00), Currency::Usd);
        let mut target = user_account(dec!(500.00), Currency::Eur);
        let (mut usd_cashbook, mut eur_cashbook) = cashbooks();
        let rate = ExchangeRate::new(Currency::Usd, Currency::Eur, dec!(0.92)).unwrap();

        let err = ExchangeService::exchange(
            &mut source,
            &mut target,
            &mut usd_cashbook,
            &mut eur_cashbook,
            Money::new(dec!(-1.00), Currency::Usd),
            &rate,
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::NegativeExchange));
    }

    #[test]
    fn exchange_rejects_insufficient_funds() {
        let mut source = user_account(dec!(10.00), Currency::Usd);
        let mut target = user_account(dec!(500.00), Currency::Eur);
        let (mut usd_cashbook, mut eur_cashbook) = cashbooks();
        let rate = ExchangeRate::new(Currency::Usd, Currency::Eur, dec!(0.92)).unwrap();

        let err = ExchangeService::exchange(
            &mut source,
            &mut target,
            &mut usd_cashbook,
            &mut eur_cashbook,
            Money::new(dec!(100.00), Currency::Usd),
            &rate,
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InsufficientFunds { .. }));
    }

    #[test]
    fn reverse_exchange_round_trips_via_inverse_rate_scenario() {
        // Scenario 3 from the seeded end-to-end walkthrough: exchanging 92 EUR back to USD
        // at the fixed rate's rounded inverse recovers exactly 100.00 USD.
        let mut source = user_account(dec!(500.00), Currency::Eur);
        let mut target = user_account(dec!(900.00), Currency::Usd);
        let (mut usd_cashbook, mut eur_cashbook) = cashbooks();
        eur_cashbook.balance = Money::new(dec!(-92.00), Currency::Eur);
        usd_cashbook.balance = Money::new(dec!(100.00), Currency::Usd);

        let rate = ExchangeRate::new(Currency::Eur, Currency::Usd, dec!(1.086957)).unwrap();

        let descriptor = ExchangeService::exchange(
            &mut source,
            &mut target,
            &mut eur_cashbook,
            &mut usd_cashbook,
            Money::new(dec!(92.00), Currency::Eur),
            &rate,
            Utc::now(),
        )
        .unwrap();

        assert_eq!(descriptor.details.target_amount.amount, dec!(100.00));
        assert_eq!(target.balance.amount, dec!(1000.00));
        assert_eq!(source.balance.amount, dec!(408.00));
    }
}
