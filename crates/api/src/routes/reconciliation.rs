//! Reconciliation route (§4.9's standalone report).

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use ledger_core::reconciliation::ReconciliationReport;
use ledger_shared::Currency;

use crate::AppState;
use crate::error::ApiError;

/// Creates the reconciliation route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/reconciliation", get(run_reconciliation))
}

/// JSON view of one currency's ledger status.
#[derive(Debug, Serialize)]
pub struct CurrencyStatusResponse {
    /// The currency this status describes.
    pub currency: Currency,
    /// The sum of every ledger record in this currency.
    pub sum: rust_decimal::Decimal,
    /// Whether the sum is exactly zero (I1).
    pub is_balanced: bool,
}

/// JSON view of one account's balance/ledger mismatch.
#[derive(Debug, Serialize)]
pub struct AccountMismatchResponse {
    /// The account in question.
    pub account_id: Uuid,
    /// The account's currency.
    pub currency: Currency,
    /// The account's stored balance.
    pub account_balance: rust_decimal::Decimal,
    /// The sum of the account's ledger records.
    pub ledger_balance: rust_decimal::Decimal,
    /// `account_balance - ledger_balance`.
    pub difference: rust_decimal::Decimal,
}

/// Response for `GET /api/v1/reconciliation`.
#[derive(Debug, Serialize)]
pub struct ReconciliationResponse {
    /// When this scan ran.
    pub generated_at: DateTime<Utc>,
    /// Per-currency ledger status.
    pub currency_status: Vec<CurrencyStatusResponse>,
    /// Every account whose stored balance disagrees with its ledger sum.
    pub account_mismatches: Vec<AccountMismatchResponse>,
    /// Total number of accounts scanned.
    pub total_accounts_checked: u64,
    /// `true` if every currency balances and no account mismatches were found.
    pub is_consistent: bool,
}

impl From<ReconciliationReport> for ReconciliationResponse {
    fn from(report: ReconciliationReport) -> Self {
        Self {
            is_consistent: report.is_consistent(),
            generated_at: report.generated_at,
            currency_status: report
                .currency_status
                .into_iter()
                .map(|s| CurrencyStatusResponse {
                    currency: s.currency,
                    sum: s.sum,
                    is_balanced: s.is_balanced,
                })
                .collect(),
            account_mismatches: report
                .account_mismatches
                .into_iter()
                .map(|m| AccountMismatchResponse {
                    account_id: m.account_id.into_inner(),
                    currency: m.currency,
                    account_balance: m.account_balance,
                    ledger_balance: m.ledger_balance,
                    difference: m.difference,
                })
                .collect(),
            total_accounts_checked: report.total_accounts_checked,
        }
    }
}

/// `GET /api/v1/reconciliation` - runs a full reconciliation scan.
async fn run_reconciliation(State(state): State<AppState>) -> Result<Json<ReconciliationResponse>, ApiError> {
    let report = state.app.reconcile(Utc::now()).await?;
    Ok(Json(ReconciliationResponse::from(report)))
}
