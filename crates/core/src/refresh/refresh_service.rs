use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, error, info, warn};
use rust_decimal::Decimal;

use crate::holdings::{Holding, HoldingPriceUpdate, HoldingRepositoryTrait};
use crate::quotes::QuoteFetcher;
use crate::refresh::refresh_model::{FailureStage, RefreshSummary, SkipReason};

/// Trait for the refresh unit of work driven by the scheduler.
#[async_trait]
pub trait PriceRefreshServiceTrait: Send + Sync {
    /// Run one full pass. Never fails: every problem ends up in the summary.
    async fn refresh_pass(&self) -> RefreshSummary;
}

/// Refreshes stored prices from the quote providers.
pub struct PriceRefreshService {
    holding_repository: Arc<dyn HoldingRepositoryTrait>,
    quote_fetcher: Arc<dyn QuoteFetcher>,
    pacing_delay: Duration,
}

enum HoldingOutcome {
    Updated,
    Skipped(SkipReason),
    Failed(FailureStage, String),
}

impl PriceRefreshService {
    pub fn new(
        holding_repository: Arc<dyn HoldingRepositoryTrait>,
        quote_fetcher: Arc<dyn QuoteFetcher>,
        pacing_delay: Duration,
    ) -> Self {
        Self {
            holding_repository,
            quote_fetcher,
            pacing_delay,
        }
    }

    async fn refresh_holding(&self, holding: &Holding) -> HoldingOutcome {
        let quote = match self.quote_fetcher.get_latest_price(&holding.ticker).await {
            Ok(Some(quote)) => quote,
            Ok(None) => return HoldingOutcome::Skipped(SkipReason::NoQuote),
            Err(e) => return HoldingOutcome::Failed(FailureStage::Fetch, e.to_string()),
        };

        if quote.price <= Decimal::ZERO {
            return HoldingOutcome::Skipped(SkipReason::NonPositivePrice);
        }

        let update = HoldingPriceUpdate {
            current_price: quote.price,
            last_updated: Utc::now(),
        };

        match self
            .holding_repository
            .update_price(&holding.id, update)
            .await
        {
            Ok(0) => HoldingOutcome::Skipped(SkipReason::HoldingRemoved),
            Ok(_) => HoldingOutcome::Updated,
            Err(e) => HoldingOutcome::Failed(FailureStage::Write, e.to_string()),
        }
    }
}

#[async_trait]
impl PriceRefreshServiceTrait for PriceRefreshService {
    async fn refresh_pass(&self) -> RefreshSummary {
        let mut summary = RefreshSummary::started(Utc::now());

        let holdings = match self.holding_repository.list_refresh_eligible() {
            Ok(holdings) => holdings,
            Err(e) => {
                error!("Price refresh aborted, failed to list holdings: {}", e);
                summary.aborted = true;
                summary.finished_at = Utc::now();
                return summary;
            }
        };

        summary.eligible = holdings.len();
        if holdings.is_empty() {
            debug!("Price refresh: no eligible holdings");
            summary.finished_at = Utc::now();
            return summary;
        }

        for holding in &holdings {
            match self.refresh_holding(holding).await {
                HoldingOutcome::Updated => {
                    debug!("Updated price for {} ({})", holding.ticker, holding.id);
                    summary.updated += 1;
                }
                HoldingOutcome::Skipped(reason) => {
                    debug!("Skipped {} ({}): {:?}", holding.ticker, holding.id, reason);
                    summary.record_skip(&holding.id, &holding.ticker, reason);
                }
                HoldingOutcome::Failed(FailureStage::Fetch, message) => {
                    warn!("Failed to fetch quote for {}: {}", holding.ticker, message);
                    summary.record_failure(&holding.id, &holding.ticker, FailureStage::Fetch, message);
                }
                HoldingOutcome::Failed(FailureStage::Write, message) => {
                    error!(
                        "Failed to store price for {} ({}): {}",
                        holding.ticker, holding.id, message
                    );
                    summary.record_failure(&holding.id, &holding.ticker, FailureStage::Write, message);
                }
            }

            tokio::time::sleep(self.pacing_delay).await;
        }

        summary.finished_at = Utc::now();
        info!(
            "Price refresh finished: {} updated, {} skipped, {} failed of {} eligible",
            summary.updated, summary.skipped, summary.failed, summary.eligible
        );
        summary
    }
}
