//! Ledger repository: reconciliation queries (§4.7, §4.9).

use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, FromQueryResult, QueryFilter, QuerySelect};

use ledger_core::CoreError;
use ledger_shared::{AccountId, Currency};

use crate::entities::{accounts, ledger, sea_orm_active_enums};
use crate::unit_of_work::{Handle, HandleConnection};

/// Storage adapter for reconciliation reads. Every method here is read-only and safe to
/// call outside any unit of work.
#[derive(Debug, Clone, Default)]
pub struct LedgerRepository;

#[derive(Debug, FromQueryResult)]
struct CurrencySum {
    currency: sea_orm_active_enums::Currency,
    total: Option<Decimal>,
}

#[derive(Debug, FromQueryResult)]
struct AccountCurrencySum {
    account_id: uuid::Uuid,
    currency: sea_orm_active_enums::Currency,
    total: Option<Decimal>,
}

impl LedgerRepository {
    /// Sums every ledger record, grouped by currency (I1).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Database`] on a storage failure.
    pub async fn get_total_balance_by_currency(
        &self,
        handle: &Handle,
    ) -> Result<Vec<(Currency, Decimal)>, CoreError> {
        let query = ledger::Entity::find()
            .select_only()
            .column(ledger::Column::Currency)
            .column_as(Expr::col(ledger::Column::Amount).sum(), "total")
            .group_by(ledger::Column::Currency);

        let rows: Vec<CurrencySum> = match handle.connection() {
            HandleConnection::Pool(c) => query.into_model().all(c).await,
            HandleConnection::Transaction(slot) => {
                let guard = slot.lock().await;
                let txn = guard.as_ref().expect("active transaction missing");
                query.into_model().all(txn).await
            }
        }
        .map_err(|e| CoreError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| (row.currency.into(), row.total.unwrap_or(Decimal::ZERO)))
            .collect())
    }

    /// Sums the ledger records for one account in one currency.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Database`] on a storage failure.
    pub async fn get_account_balance(
        &self,
        handle: &Handle,
        account_id: AccountId,
        currency: Currency,
    ) -> Result<Decimal, CoreError> {
        let query = ledger::Entity::find()
            .select_only()
            .column_as(Expr::col(ledger::Column::Amount).sum(), "total")
            .filter(ledger::Column::AccountId.eq(account_id.into_inner()))
            .filter(ledger::Column::Currency.eq(sea_orm_active_enums::Currency::from(currency)));

        #[derive(Debug, FromQueryResult)]
        struct Total {
            total: Option<Decimal>,
        }

        let row: Option<Total> = match handle.connection() {
            HandleConnection::Pool(c) => query.into_model().one(c).await,
            HandleConnection::Transaction(slot) => {
                let guard = slot.lock().await;
                let txn = guard.as_ref().expect("active transaction missing");
                query.into_model().one(txn).await
            }
        }
        .map_err(|e| CoreError::Database(e.to_string()))?;

        Ok(row.and_then(|r| r.total).unwrap_or(Decimal::ZERO))
    }

    /// Finds every account whose stored balance disagrees with the sum of its ledger
    /// records (I2).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Database`] on a storage failure.
    pub async fn get_account_balance_mismatches(
        &self,
        handle: &Handle,
    ) -> Result<Vec<ledger_core::reconciliation::AccountMismatch>, CoreError> {
        let ledger_query = ledger::Entity::find()
            .select_only()
            .column(ledger::Column::AccountId)
            .column(ledger::Column::Currency)
            .column_as(Expr::col(ledger::Column::Amount).sum(), "total")
            .group_by(ledger::Column::AccountId)
            .group_by(ledger::Column::Currency);

        let (ledger_sums, account_rows): (Vec<AccountCurrencySum>, Vec<accounts::Model>) =
            match handle.connection() {
                HandleConnection::Pool(c) => {
                    let sums = ledger_query
                        .into_model()
                        .all(c)
                        .await
                        .map_err(|e| CoreError::Database(e.to_string()))?;
                    let accounts = accounts::Entity::find()
                        .all(c)
                        .await
                        .map_err(|e| CoreError::Database(e.to_string()))?;
                    (sums, accounts)
                }
                HandleConnection::Transaction(slot) => {
                    let guard = slot.lock().await;
                    let txn = guard.as_ref().expect("active transaction missing");
                    let sums = ledger_query
                        .into_model()
                        .all(txn)
                        .await
                        .map_err(|e| CoreError::Database(e.to_string()))?;
                    let accounts = accounts::Entity::find()
                        .all(txn)
                        .await
                        .map_err(|e| CoreError::Database(e.to_string()))?;
                    (sums, accounts)
                }
            };

        let mut mismatches = Vec::new();
        for account in account_rows {
            let ledger_balance = ledger_sums
                .iter()
                .find(|s| s.account_id == account.id && s.currency == account.currency)
                .and_then(|s| s.total)
                .unwrap_or(Decimal::ZERO);

            if account.balance != ledger_balance {
                mismatches.push(ledger_core::reconciliation::AccountMismatch {
                    account_id: account.id.into(),
                    currency: account.currency.into(),
                    account_balance: account.balance,
                    ledger_balance,
                    difference: account.balance - ledger_balance,
                });
            }
        }

        Ok(mismatches)
    }

    /// Total number of accounts in the system, for the reconciliation report's
    /// `total_accounts_checked` field.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Database`] on a storage failure.
    pub async fn count_accounts(&self, handle: &Handle) -> Result<u64, CoreError> {
        match handle.connection() {
            HandleConnection::Pool(c) => accounts::Entity::find().count(c).await,
            HandleConnection::Transaction(slot) => {
                let guard = slot.lock().await;
                let txn = guard.as_ref().expect("active transaction missing");
                accounts::Entity::find().count(txn).await
            }
        }
        .map_err(|e| CoreError::Database(e.to_string()))
    }
}
