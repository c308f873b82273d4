use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use trackfolio_core::holdings::HoldingRepositoryTrait;
use trackfolio_core::portfolio::{PortfolioService, PortfolioServiceTrait};
use trackfolio_core::quotes::{MarketDataClient, QuoteFetcher};
use trackfolio_core::refresh::{
    start_periodic_updates, PriceRefreshService, RefreshSchedulerHandle, RefreshSummary,
};
use trackfolio_storage_sqlite::{db, HoldingRepository};

pub struct AppState {
    pub portfolio_service: Arc<dyn PortfolioServiceTrait>,
    /// Summary of the most recent refresh pass
    pub last_refresh: watch::Receiver<Option<RefreshSummary>>,
}

pub fn init_tracing() {
    let log_format = std::env::var("TF_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Open the database, wire the services and arm the refresh scheduler.
///
/// The scheduler is started exactly here; the returned handle owns it.
pub async fn build_state(
    config: &Config,
) -> anyhow::Result<(Arc<AppState>, RefreshSchedulerHandle)> {
    let (pool, writer) = db::open(&config.db_path)?;
    tracing::info!("Database path in use: {}", config.db_path);

    let holding_repository: Arc<dyn HoldingRepositoryTrait> =
        Arc::new(HoldingRepository::new(pool, writer));
    let quote_fetcher: Arc<dyn QuoteFetcher> =
        Arc::new(MarketDataClient::from_config(&config.providers));

    let portfolio_service: Arc<dyn PortfolioServiceTrait> =
        Arc::new(PortfolioService::new(holding_repository.clone()));

    let refresh_service = Arc::new(PriceRefreshService::new(
        holding_repository.clone(),
        quote_fetcher,
        config.refresh.pacing_delay,
    ));
    let scheduler = start_periodic_updates(refresh_service, &config.refresh);

    let state = Arc::new(AppState {
        portfolio_service,
        last_refresh: scheduler.subscribe(),
    });

    Ok((state, scheduler))
}
