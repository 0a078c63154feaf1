//! Thin HTTP facade over [`ledger_app::ApplicationService`].
//!
//! This crate owns no business logic: every handler decodes a request into a command,
//! calls one `ApplicationService` method, and encodes the result. Validation, locking, and
//! invariant enforcement all live in `ledger-core`/`ledger-app`.

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use ledger_app::ApplicationService;
use ledger_core::FixedRateProvider;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The orchestration seam every handler delegates to.
    pub app: Arc<ApplicationService<FixedRateProvider>>,
}

impl AppState {
    /// Wraps an [`ApplicationService`] for sharing across handlers.
    #[must_use]
    pub fn new(app: ApplicationService<FixedRateProvider>) -> Self {
        Self { app: Arc::new(app) }
    }
}

/// Creates the main application router.
#[must_use]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
