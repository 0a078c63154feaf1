//! Exchange routes (§4.8's `exchange` use case and preview calculation).

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ledger_app::ExchangeCommand;
use ledger_shared::{AccountId, Currency, Money};

use crate::AppState;
use crate::error::ApiError;

/// Creates the exchange routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/exchanges", post(create_exchange))
        .route("/exchanges/preview", get(preview_exchange))
}

/// Request body for `POST /api/v1/exchanges`.
#[derive(Debug, Deserialize)]
pub struct CreateExchangeRequest {
    /// The account the source funds leave.
    pub source_account: Uuid,
    /// The account the converted funds arrive at.
    pub target_account: Uuid,
    /// The amount to convert.
    pub source_amount: rust_decimal::Decimal,
    /// The source account's currency.
    pub source_currency: Currency,
    /// When the exchange is recorded as occurring; defaults to now.
    pub time: Option<DateTime<Utc>>,
}

/// Response for a successfully recorded exchange.
#[derive(Debug, Serialize)]
pub struct ExchangeResponse {
    /// Always `true` on success.
    pub recorded: bool,
}

/// `POST /api/v1/exchanges` - records a cross-currency exchange.
async fn create_exchange(
    State(state): State<AppState>,
    Json(payload): Json<CreateExchangeRequest>,
) -> Result<Json<ExchangeResponse>, ApiError> {
    let cmd = ExchangeCommand {
        source_account: AccountId::from_uuid(payload.source_account),
        target_account: AccountId::from_uuid(payload.target_account),
        source_amount: Money::new(payload.source_amount, payload.source_currency),
        time: payload.time.unwrap_or_else(Utc::now),
    };

    state.app.exchange(cmd).await?;

    Ok(Json(ExchangeResponse { recorded: true }))
}

/// Query parameters for `GET /api/v1/exchanges/preview`.
#[derive(Debug, Deserialize)]
pub struct PreviewExchangeQuery {
    /// The amount to convert.
    pub amount: rust_decimal::Decimal,
    /// The amount's currency.
    pub from: Currency,
    /// The currency to convert into.
    pub to: Currency,
}

/// Response for an exchange preview.
#[derive(Debug, Serialize)]
pub struct ExchangePreviewResponse {
    /// The amount that would be debited from the source account.
    pub source_amount: Money,
    /// The amount that would be credited to the target account.
    pub target_amount: Money,
    /// The rate applied.
    pub exchange_rate: rust_decimal::Decimal,
}

/// `GET /api/v1/exchanges/preview` - computes an exchange without recording anything.
async fn preview_exchange(
    State(state): State<AppState>,
    Query(query): Query<PreviewExchangeQuery>,
) -> Result<Json<ExchangePreviewResponse>, ApiError> {
    let calculation = state
        .app
        .calculate_exchange_amount(Money::new(query.amount, query.from), query.to)?;

    Ok(Json(ExchangePreviewResponse {
        source_amount: calculation.source_amount,
        target_amount: calculation.target_amount,
        exchange_rate: calculation.exchange_rate,
    }))
}
