//! Application service: one unit of work per use case (§4.8).
//!
//! This crate is the orchestration seam between the pure domain services in `ledger-core`
//! and the storage adapters in `ledger-db`. Each public method locks what it needs, invokes
//! exactly one domain service, persists the result, runs the post-commit invariant checks,
//! and commits — all inside a single [`UnitOfWork::execute`] call, except the two read-only
//! operations which never open one.

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use ledger_core::reconciliation::{
    self, AccountMismatch, CurrencyStatus, ReconciliationReport,
};
use ledger_core::{CoreError, ExchangeRate, ExchangeService, RateProvider, TransferService};
use ledger_db::{
    AccountRepository, ExchangeRepository, LedgerRepository, TransactionFilter, TransactionRecord,
    TransactionRepository, TransferRepository, UnitOfWork,
};
use ledger_shared::{AccountId, Currency, Money, UserId};

/// A same-currency transfer between two accounts.
#[derive(Debug, Clone)]
pub struct TransferCommand {
    /// The sending account.
    pub from: AccountId,
    /// The receiving account.
    pub to: AccountId,
    /// The amount to move, in the accounts' shared currency.
    pub money: Money,
    /// When the transfer is recorded as occurring.
    pub time: DateTime<Utc>,
}

/// A cross-currency exchange between two accounts belonging to one user.
#[derive(Debug, Clone)]
pub struct ExchangeCommand {
    /// The account the source funds leave.
    pub source_account: AccountId,
    /// The account the converted funds arrive at.
    pub target_account: AccountId,
    /// The amount to convert, in the source account's currency.
    pub source_amount: Money,
    /// When the exchange is recorded as occurring.
    pub time: DateTime<Utc>,
}

/// A request for a user's paginated transaction history.
#[derive(Debug, Clone)]
pub struct GetTransactionsCommand {
    /// The user whose history is being read.
    pub user_id: UserId,
    /// Optional restriction to one transaction kind.
    pub transaction_type: Option<ledger_core::TransactionType>,
    /// Page size.
    pub limit: u64,
    /// Page offset.
    pub offset: u64,
}

/// The result of [`ApplicationService::get_transactions`].
#[derive(Debug, Clone)]
pub struct TransactionsResult {
    /// The page of matching transactions, `timestamp DESC`.
    pub transactions: Vec<TransactionRecord>,
    /// Total number of matching transactions across every page.
    pub total: u64,
    /// The page size that was requested.
    pub limit: u64,
    /// The page offset that was requested.
    pub offset: u64,
}

/// A side-effect-free exchange preview.
#[derive(Debug, Clone, Copy)]
pub struct ExchangeCalculation {
    /// The amount that would be debited from the source account.
    pub source_amount: Money,
    /// The amount that would be credited to the target account.
    pub target_amount: Money,
    /// The rate applied, `target_amount / source_amount`.
    pub exchange_rate: rust_decimal::Decimal,
}

/// Coordinates one unit of work per use case, using whichever rate provider it is built
/// with.
pub struct ApplicationService<R: RateProvider> {
    unit_of_work: UnitOfWork,
    accounts: AccountRepository,
    transfers: TransferRepository,
    exchanges: ExchangeRepository,
    transactions: TransactionRepository,
    ledger: LedgerRepository,
    rate_provider: R,
}

impl<R: RateProvider> ApplicationService<R> {
    /// Builds the service over a connection pool and a rate provider.
    #[must_use]
    pub fn new(unit_of_work: UnitOfWork, rate_provider: R) -> Self {
        Self {
            unit_of_work,
            accounts: AccountRepository,
            transfers: TransferRepository,
            exchanges: ExchangeRepository,
            transactions: TransactionRepository,
            ledger: LedgerRepository,
            rate_provider,
        }
    }

    /// Executes a transfer: locks both accounts in ID-sorted order, runs
    /// [`TransferService::transfer`], persists the result, and verifies I1/I2 for both
    /// accounts before committing.
    ///
    /// A self-transfer (`cmd.from == cmd.to`) satisfies I1 but is rejected with
    /// [`CoreError::AccountBalanceMismatch`] at the I2 check: the two in-memory copies of the
    /// same account diverge, and only the second `save` wins, so the post-commit ledger sum
    /// for that account no longer matches its persisted balance. This is the intended
    /// rejection path for self-transfer (§4.8).
    ///
    /// # Errors
    ///
    /// Returns any [`CoreError`] raised by locking, the domain service, persistence, or the
    /// invariant checks.
    #[instrument(skip(self, cmd), fields(from = %cmd.from, to = %cmd.to))]
    pub async fn transfer(&self, cmd: TransferCommand) -> Result<(), CoreError> {
        info!("executing transfer");
        let (first, second) = sorted_pair(cmd.from, cmd.to);

        self.unit_of_work
            .execute("transfer", |handle| async move {
                // Locked in ID order regardless of sender/recipient role, deterministically,
                // even when `first == second` (self-transfer): re-locking the same row within
                // one transaction is a no-op in Postgres.
                let first_locked = self.accounts.get_for_update(&handle, first).await?;
                let second_locked = self.accounts.get_for_update(&handle, second).await?;

                let mut sender = if cmd.from == first { first_locked } else { second_locked };
                let mut recipient = if cmd.to == first { first_locked } else { second_locked };

                let descriptor =
                    TransferService::transfer(&mut sender, &mut recipient, cmd.money, cmd.time)?;

                self.transfers.insert(&handle, &descriptor).await?;
                self.accounts.save(&handle, &sender).await?;
                self.accounts.save(&handle, &recipient).await?;

                self.check_account_invariants(&handle, &[sender.id, recipient.id]).await?;

                Ok(())
            })
            .await
    }

    /// Executes an exchange: locks source, target, USD cashbook, EUR cashbook in that order,
    /// fetches the rate, runs [`ExchangeService::exchange`], persists the result, and
    /// verifies I1/I2 for all four accounts before committing.
    ///
    /// # Errors
    ///
    /// Returns any [`CoreError`] raised by locking, the rate provider, the domain service,
    /// persistence, or the invariant checks.
    #[instrument(skip(self, cmd), fields(source = %cmd.source_account, target = %cmd.target_account))]
    pub async fn exchange(&self, cmd: ExchangeCommand) -> Result<(), CoreError> {
        info!("executing exchange");
        let usd_cashbook_id = ledger_shared::types::id::usd_cashbook_account_id();
        let eur_cashbook_id = ledger_shared::types::id::eur_cashbook_account_id();

        self.unit_of_work
            .execute("exchange", |handle| async move {
                let mut source = self.accounts.get_for_update(&handle, cmd.source_account).await?;
                let mut target = self.accounts.get_for_update(&handle, cmd.target_account).await?;
                let mut usd_cashbook = self.accounts.get_for_update(&handle, usd_cashbook_id).await?;
                let mut eur_cashbook = self.accounts.get_for_update(&handle, eur_cashbook_id).await?;

                let rate = self
                    .rate_provider
                    .rate_for(cmd.source_amount.currency, target.balance.currency)?;

                let (source_cashbook, target_cashbook) = match cmd.source_amount.currency {
                    Currency::Usd => (&mut usd_cashbook, &mut eur_cashbook),
                    Currency::Eur => (&mut eur_cashbook, &mut usd_cashbook),
                };

                let descriptor = ExchangeService::exchange(
                    &mut source,
                    &mut target,
                    source_cashbook,
                    target_cashbook,
                    cmd.source_amount,
                    &rate,
                    cmd.time,
                )?;

                self.exchanges.insert(&handle, &descriptor).await?;
                self.accounts.save(&handle, &source).await?;
                self.accounts.save(&handle, &target).await?;
                self.accounts.save(&handle, &usd_cashbook).await?;
                self.accounts.save(&handle, &eur_cashbook).await?;

                self.check_account_invariants(
                    &handle,
                    &[source.id, target.id, usd_cashbook.id, eur_cashbook.id],
                )
                .await?;

                Ok(())
            })
            .await
    }

    /// Previews an exchange without opening a unit of work or mutating anything.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ExchangeRateNotFound`] if no rate exists for the pair, or any
    /// error [`ExchangeRate::convert`] raises.
    pub fn calculate_exchange_amount(
        &self,
        source_amount: Money,
        target_currency: Currency,
    ) -> Result<ExchangeCalculation, CoreError> {
        let rate = self.rate_provider.rate_for(source_amount.currency, target_currency)?;
        let target_amount = rate.convert(source_amount)?;
        Ok(ExchangeCalculation {
            source_amount,
            target_amount,
            exchange_rate: rate.rate(),
        })
    }

    /// Returns a user's paginated transaction history. Read-only; opens no unit of work.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Database`] on a storage failure.
    pub async fn get_transactions(
        &self,
        cmd: GetTransactionsCommand,
    ) -> Result<TransactionsResult, CoreError> {
        let handle = self.unit_of_work.handle();
        let filter = TransactionFilter {
            user_id: cmd.user_id,
            transaction_type: cmd.transaction_type,
            limit: cmd.limit,
            offset: cmd.offset,
        };

        let transactions = self.transactions.get_list(&handle, &filter).await?;
        let total = self.transactions.count(&handle, &filter).await?;

        Ok(TransactionsResult {
            transactions,
            total,
            limit: cmd.limit,
            offset: cmd.offset,
        })
    }

    /// Produces a full reconciliation report (§4.9). Read-only; opens no write transaction.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Database`] on a storage failure.
    #[instrument(skip(self))]
    pub async fn reconcile(&self, generated_at: DateTime<Utc>) -> Result<ReconciliationReport, CoreError> {
        let handle = self.unit_of_work.handle();

        let totals = self.ledger.get_total_balance_by_currency(&handle).await?;
        let currency_status: Vec<CurrencyStatus> = [Currency::Usd, Currency::Eur]
            .into_iter()
            .map(|currency| {
                let sum = totals
                    .iter()
                    .find(|(c, _)| *c == currency)
                    .map_or(rust_decimal::Decimal::ZERO, |(_, s)| *s);
                CurrencyStatus {
                    currency,
                    sum,
                    is_balanced: sum.is_zero(),
                }
            })
            .collect();

        let account_mismatches: Vec<AccountMismatch> =
            self.ledger.get_account_balance_mismatches(&handle).await?;
        let total_accounts_checked = self.accounts_checked(&handle).await?;

        let report = ReconciliationReport::new(
            generated_at,
            currency_status,
            account_mismatches,
            total_accounts_checked,
        );

        if report.is_consistent() {
            info!(is_consistent = true, "reconciliation scan complete");
        } else {
            warn!(is_consistent = false, "reconciliation scan found mismatches");
        }

        Ok(report)
    }

    async fn accounts_checked(&self, handle: &ledger_db::Handle) -> Result<u64, CoreError> {
        self.ledger.count_accounts(handle).await
    }

    /// Runs I1 (ledger balance) and I2 (account/ledger coherence) for each of `account_ids`.
    async fn check_account_invariants(
        &self,
        handle: &ledger_db::Handle,
        account_ids: &[AccountId],
    ) -> Result<(), CoreError> {
        for currency in [Currency::Usd, Currency::Eur] {
            let sum = self.ledger.get_total_balance_by_currency(handle).await?;
            let currency_sum = sum
                .iter()
                .find(|(c, _)| *c == currency)
                .map_or(rust_decimal::Decimal::ZERO, |(_, s)| *s);
            reconciliation::check_ledger_balance_by_currency(currency, currency_sum)?;
        }

        for &account_id in account_ids {
            let account = self.accounts.get(handle, account_id).await?;
            let ledger_balance = self
                .ledger
                .get_account_balance(handle, account_id, account.balance.currency)
                .await?;
            reconciliation::check_account_ledger_consistency(
                account_id,
                account.balance.amount,
                ledger_balance,
            )?;
        }

        Ok(())
    }
}

fn sorted_pair(a: AccountId, b: AccountId) -> (AccountId, AccountId) {
    if a.into_inner() <= b.into_inner() { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorted_pair_is_order_independent() {
        let a = AccountId::new();
        let b = AccountId::new();
        assert_eq!(sorted_pair(a, b), sorted_pair(b, a));
    }
}
