//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod exchanges;
pub mod health;
pub mod reconciliation;
pub mod transactions;
pub mod transfers;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(transfers::routes())
        .merge(exchanges::routes())
        .merge(transactions::routes())
        .merge(reconciliation::routes())
}
