use async_trait::async_trait;

use crate::errors::Result;
use crate::quotes::model::LatestPrice;

/// Source of current prices, as consumed by the refresh job.
///
/// `Ok(None)` means the provider has no quote for the ticker (unknown
/// symbol). Every other failure is an `Err`. Implementations never retry.
#[async_trait]
pub trait QuoteFetcher: Send + Sync {
    async fn get_latest_price(&self, ticker: &str) -> Result<Option<LatestPrice>>;
}
