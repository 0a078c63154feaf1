//! Ledger server entry point.

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ledger_api::{AppState, create_router};
use ledger_app::ApplicationService;
use ledger_core::FixedRateProvider;
use ledger_db::{UnitOfWork, connect};
use ledger_shared::CoreConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CoreConfig::load().expect("failed to load configuration");

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_filter.clone().into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pool = connect(&config.database_url).await?;
    info!("connected to database");

    let rate_provider = FixedRateProvider::new(config.usd_to_eur_rate)?;
    let unit_of_work = UnitOfWork::new(pool);
    let app = ApplicationService::new(unit_of_work, rate_provider);

    let state = AppState::new(app);
    let router = create_router(state);

    let listener = TcpListener::bind("0.0.0.0:8080").await?;
    info!(addr = "0.0.0.0:8080", "server listening");

    axum::serve(listener, router).await?;

    Ok(())
}
