//! Transfer routes (§4.8's `transfer` use case).

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ledger_app::TransferCommand;
use ledger_shared::{AccountId, Currency, Money};

use crate::AppState;
use crate::error::ApiError;

/// Creates the transfer routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/transfers", post(create_transfer))
}

/// Request body for `POST /api/v1/transfers`.
#[derive(Debug, Deserialize)]
pub struct CreateTransferRequest {
    /// The sending account.
    pub from: Uuid,
    /// The receiving account.
    pub to: Uuid,
    /// The amount to move.
    pub amount: rust_decimal::Decimal,
    /// The shared currency of both accounts.
    pub currency: Currency,
    /// When the transfer is recorded as occurring; defaults to now.
    pub time: Option<DateTime<Utc>>,
}

/// Response for a successfully recorded transfer.
#[derive(Debug, Serialize)]
pub struct TransferResponse {
    /// Always `true` on success; present so clients can pattern-match on a stable shape.
    pub recorded: bool,
}

/// `POST /api/v1/transfers` - records a same-currency transfer between two accounts.
async fn create_transfer(
    State(state): State<AppState>,
    Json(payload): Json<CreateTransferRequest>,
) -> Result<Json<TransferResponse>, ApiError> {
    let cmd = TransferCommand {
        from: AccountId::from_uuid(payload.from),
        to: AccountId::from_uuid(payload.to),
        money: Money::new(payload.amount, payload.currency),
        time: payload.time.unwrap_or_else(Utc::now),
    };

    state.app.transfer(cmd).await?;

    Ok(Json(TransferResponse { recorded: true }))
}
