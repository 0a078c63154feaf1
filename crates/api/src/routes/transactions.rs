//! Transaction history routes (§4.7's paginated read model).

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ledger_app::GetTransactionsCommand;
use ledger_core::TransactionType;
use ledger_db::TransactionRecord;
use ledger_shared::{Money, UserId};

use crate::AppState;
use crate::error::ApiError;

/// Creates the transaction history route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/users/{user_id}/transactions", get(list_transactions))
}

/// Query parameters for `GET /api/v1/users/{user_id}/transactions`.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Restrict to one transaction kind.
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    /// Page size; defaults to 50.
    pub limit: Option<u64>,
    /// Page offset; defaults to 0.
    pub offset: Option<u64>,
}

fn parse_transaction_type(raw: &str) -> Option<TransactionType> {
    match raw.to_lowercase().as_str() {
        "transfer" => Some(TransactionType::Transfer),
        "exchange" => Some(TransactionType::Exchange),
        "deposit" => Some(TransactionType::Deposit),
        "withdrawal" => Some(TransactionType::Withdrawal),
        _ => None,
    }
}

fn transaction_type_name(kind: TransactionType) -> &'static str {
    match kind {
        TransactionType::Transfer => "transfer",
        TransactionType::Exchange => "exchange",
        TransactionType::Deposit => "deposit",
        TransactionType::Withdrawal => "withdrawal",
    }
}

/// JSON view of one [`TransactionRecord`].
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// The transaction's identifier.
    pub id: Uuid,
    /// The transaction's kind.
    #[serde(rename = "type")]
    pub transaction_type: &'static str,
    /// The account that initiated the operation.
    pub account_id: Uuid,
    /// When the operation occurred.
    pub timestamp: DateTime<Utc>,
    /// Transfer-specific details, present only for `type: "transfer"`.
    pub transfer: Option<TransferDetailsResponse>,
    /// Exchange-specific details, present only for `type: "exchange"`.
    pub exchange: Option<ExchangeDetailsResponse>,
}

/// JSON view of a transfer's details.
#[derive(Debug, Serialize)]
pub struct TransferDetailsResponse {
    /// The account the funds left.
    pub sender_account_id: Uuid,
    /// The account the funds arrived at.
    pub recipient_account_id: Uuid,
    /// The amount moved.
    pub money: Money,
}

/// JSON view of an exchange's details.
#[derive(Debug, Serialize)]
pub struct ExchangeDetailsResponse {
    /// The account the source funds left.
    pub source_account_id: Uuid,
    /// The account the converted funds arrived at.
    pub target_account_id: Uuid,
    /// The amount debited from the source account.
    pub source_amount: Money,
    /// The amount credited to the target account.
    pub target_amount: Money,
    /// The effective rate applied (`target_amount / source_amount`).
    pub exchange_rate: rust_decimal::Decimal,
}

impl From<TransactionRecord> for TransactionResponse {
    fn from(record: TransactionRecord) -> Self {
        Self {
            id: record.transaction.id.into_inner(),
            transaction_type: transaction_type_name(record.transaction.transaction_type),
            account_id: record.transaction.account_id.into_inner(),
            timestamp: record.transaction.timestamp,
            transfer: record.transfer.map(|t| TransferDetailsResponse {
                sender_account_id: t.sender_account_id.into_inner(),
                recipient_account_id: t.recipient_account_id.into_inner(),
                money: t.money,
            }),
            exchange: record.exchange.map(|e| ExchangeDetailsResponse {
                source_account_id: e.source_account_id.into_inner(),
                target_account_id: e.target_account_id.into_inner(),
                source_amount: e.source_amount,
                target_amount: e.target_amount,
                exchange_rate: e.effective_rate(),
            }),
        }
    }
}

/// Response for `GET /api/v1/users/{user_id}/transactions`.
#[derive(Debug, Serialize)]
pub struct TransactionsPageResponse {
    /// The page of matching transactions, `timestamp DESC`.
    pub transactions: Vec<TransactionResponse>,
    /// Total number of matching transactions across every page.
    pub total: u64,
    /// The page size that was requested.
    pub limit: u64,
    /// The page offset that was requested.
    pub offset: u64,
}

/// `GET /api/v1/users/{user_id}/transactions` - a user's paginated transaction history.
async fn list_transactions(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<TransactionsPageResponse>, ApiError> {
    let cmd = GetTransactionsCommand {
        user_id: UserId::from_uuid(user_id),
        transaction_type: query.transaction_type.as_deref().and_then(parse_transaction_type),
        limit: query.limit.unwrap_or(50).min(100),
        offset: query.offset.unwrap_or(0),
    };

    let result = state.app.get_transactions(cmd).await?;

    Ok(Json(TransactionsPageResponse {
        transactions: result.transactions.into_iter().map(TransactionResponse::from).collect(),
        total: result.total,
        limit: result.limit,
        offset: result.offset,
    }))
}
