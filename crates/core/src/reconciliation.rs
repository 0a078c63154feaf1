//! Reconciliation: the invariant checks (I1, I2, I5) and the standalone report (§4.9).
//!
//! Two shapes live here. The inline *check* functions short-circuit on the first violation
//! and are meant to run inside every write unit of work. The [`ReconciliationReport`] is a
//! full scan assembled from pre-aggregated sums supplied by the repository layer; this module
//! never touches storage itself.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use ledger_shared::{AccountId, Currency};

use crate::error::CoreError;
use crate::model::LedgerRecord;

/// Verifies I5: a single operation's ledger entry set sums to zero within every currency it
/// touches.
///
/// # Errors
///
/// Returns [`CoreError::LedgerImbalance`] on the first currency whose subset does not sum to
/// zero.
pub fn assert_balanced_entry_set(records: &[LedgerRecord]) -> Result<(), CoreError> {
    for currency in [Currency::Usd, Currency::Eur] {
        let sum: Decimal = records
            .iter()
            .filter(|r| r.money.currency == currency)
            .map(|r| r.money.amount)
            .sum();
        if !sum.is_zero() {
            return Err(CoreError::LedgerImbalance { currency, sum });
        }
    }
    Ok(())
}

/// Verifies I1 for a single currency: fails with [`CoreError::LedgerImbalance`] if the
/// ledger-wide sum for `currency` is not zero.
///
/// # Errors
///
/// Returns [`CoreError::LedgerImbalance`] if `ledger_sum` is non-zero.
pub fn check_ledger_balance_by_currency(currency: Currency, ledger_sum: Decimal) -> Result<(), CoreError> {
    if !ledger_sum.is_zero() {
        return Err(CoreError::LedgerImbalance {
            currency,
            sum: ledger_sum,
        });
    }
    Ok(())
}

/// Verifies I2 for a single account: fails with [`CoreError::AccountBalanceMismatch`] if the
/// account's in-memory balance differs from the sum of its ledger records.
///
/// # Errors
///
/// Returns [`CoreError::AccountBalanceMismatch`] if `account_balance != ledger_balance`.
pub fn check_account_ledger_consistency(
    account_id: AccountId,
    account_balance: Decimal,
    ledger_balance: Decimal,
) -> Result<(), CoreError> {
    if account_balance != ledger_balance {
        return Err(CoreError::AccountBalanceMismatch {
            account_id,
            account_balance,
            ledger_balance,
        });
    }
    Ok(())
}

/// Per-currency ledger status within a [`ReconciliationReport`].
#[derive(Debug, Clone, Copy)]
pub struct CurrencyStatus {
    /// The currency this status describes.
    pub currency: Currency,
    /// The sum of every ledger record in this currency.
    pub sum: Decimal,
    /// True if `sum` is zero (I1 holds for this currency).
    pub is_balanced: bool,
}

/// A single account whose balance disagrees with its ledger records.
#[derive(Debug, Clone, Copy)]
pub struct AccountMismatch {
    /// The account with the mismatch.
    pub account_id: AccountId,
    /// The currency of the account's balance.
    pub currency: Currency,
    /// The balance recorded on the account itself.
    pub account_balance: Decimal,
    /// The balance derived from summing its ledger records.
    pub ledger_balance: Decimal,
    /// `account_balance - ledger_balance`.
    pub difference: Decimal,
}

/// A full scan of every invariant, suitable for a monitoring dashboard.
#[derive(Debug, Clone)]
pub struct ReconciliationReport {
    /// When the scan was run.
    pub generated_at: DateTime<Utc>,
    /// Per-currency ledger balance status.
    pub currency_status: Vec<CurrencyStatus>,
    /// Accounts whose balance disagrees with their ledger records.
    pub account_mismatches: Vec<AccountMismatch>,
    /// Total number of accounts checked.
    pub total_accounts_checked: u64,
}

impl ReconciliationReport {
    /// Assembles a report from pre-aggregated sums. The conjunction of every per-currency
    /// `is_balanced` and the emptiness of `account_mismatches` determines [`Self::is_consistent`].
    #[must_use]
    pub fn new(
        generated_at: DateTime<Utc>,
        currency_status: Vec<CurrencyStatus>,
        account_mismatches: Vec<AccountMismatch>,
        total_accounts_checked: u64,
    ) -> Self {
        Self {
            generated_at,
            currency_status,
            account_mismatches,
            total_accounts_checked,
        }
    }

    /// True iff every currency balances and no account mismatch was found.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.currency_status.iter().all(|s| s.is_balanced) && self.account_mismatches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_shared::{LedgerRecordId, Money, TransactionId};
    use rust_decimal_macros::dec;

    fn record(account_id: AccountId, amount: Decimal, currency: Currency) -> LedgerRecord {
        LedgerRecord {
            id: LedgerRecordId::new(),
            transaction_id: TransactionId::new(),
            account_id,
            money: Money::new(amount, currency),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn balanced_entry_set_passes() {
        let a = AccountId::new();
        let b = AccountId::new();
        let records = vec![
            record(a, dec!(-100.00), Currency::Usd),
            record(b, dec!(100.00), Currency::Usd),
        ];
        assert!(assert_balanced_entry_set(&records).is_ok());
    }

    #[test]
    fn unbalanced_entry_set_fails() {
        let a = AccountId::new();
        let b = AccountId::new();
        let records = vec![
            record(a, dec!(-100.00), Currency::Usd),
            record(b, dec!(99.00), Currency::Usd),
        ];
        let err = assert_balanced_entry_set(&records).unwrap_err();
        assert!(matches!(err, CoreError::LedgerImbalance { .. }));
    }

    #[test]
    fn balanced_entry_set_checks_each_currency_independently() {
        let a = AccountId::new();
        let b = AccountId::new();
        let c = AccountId::new();
        let records = vec![
            record(a, dec!(-100.00), Currency::Usd),
            record(b, dec!(100.00), Currency::Usd),
            record(b, dec!(-92.00), Currency::Eur),
            record(c, dec!(92.00), Currency::Eur),
        ];
        assert!(assert_balanced_entry_set(&records).is_ok());
    }

    #[test]
    fn report_is_consistent_when_all_currencies_balance_and_no_mismatches() {
        let report = ReconciliationReport::new(
            Utc::now(),
            vec![
                CurrencyStatus {
                    currency: Currency::Usd,
                    sum: Decimal::ZERO,
                    is_balanced: true,
                },
                CurrencyStatus {
                    currency: Currency::Eur,
                    sum: Decimal::ZERO,
                    is_balanced: true,
                },
            ],
            vec![],
            2,
        );
        assert!(report.is_consistent());
    }

    #[test]
    fn report_is_inconsistent_with_any_mismatch() {
        let report = ReconciliationReport::new(
            Utc::now(),
            vec![CurrencyStatus {
                currency: Currency::Usd,
                sum: Decimal::ZERO,
                is_balanced: true,
            }],
            vec![AccountMismatch {
                account_id: AccountId::new(),
                currency: Currency::Usd,
                account_balance: dec!(10.00),
                ledger_balance: dec!(5.00),
                difference: dec!(5.00),
            }],
            1,
        );
        assert!(!report.is_consistent());
    }

    #[test]
    fn check_account_ledger_consistency_detects_mismatch() {
        let id = AccountId::new();
        assert!(check_account_ledger_consistency(id, dec!(10.00), dec!(10.00)).is_ok());
        let err = check_account_ledger_consistency(id, dec!(10.00), dec!(5.00)).unwrap_err();
        assert!(matches!(err, CoreError::AccountBalanceMismatch { .. }));
    }
}
