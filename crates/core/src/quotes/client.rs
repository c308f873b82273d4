//! Market Data Client - Facade for the market-data crate.
//!
//! ```text
//! ticker ─▶ Instrument::from_ticker ─▶ first provider that supports it
//!                                           │
//!                   LatestPrice ◀─ convert ◀┘
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};

use crate::errors::Result;
use crate::quotes::fetcher::QuoteFetcher;
use crate::quotes::model::LatestPrice;

use trackfolio_market_data::errors::MarketDataError;
use trackfolio_market_data::{
    FinnhubProvider, Instrument, MarketDataProvider, MetalPriceApiProvider, Quote as MarketQuote,
};

/// Provider credentials and endpoints used to build the client.
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    pub finnhub_api_key: String,
    /// Overrides the Finnhub API root
    pub finnhub_base_url: Option<String>,
    /// Metals are not quoted when this is `None`
    pub metal_price_api_key: Option<String>,
    pub metal_price_api_base_url: Option<String>,
}

/// Market data client - routes tickers to the configured providers.
pub struct MarketDataClient {
    providers: Vec<Arc<dyn MarketDataProvider>>,
}

impl MarketDataClient {
    /// Create a client over `providers`, ordered by ascending priority.
    pub fn new(mut providers: Vec<Arc<dyn MarketDataProvider>>) -> Self {
        providers.sort_by_key(|p| p.priority());
        Self { providers }
    }

    /// Build the Finnhub and (when keyed) Metal Price API providers.
    pub fn from_config(config: &ProviderConfig) -> Self {
        let mut providers: Vec<Arc<dyn MarketDataProvider>> = Vec::new();

        let finnhub = match &config.finnhub_base_url {
            Some(url) => FinnhubProvider::with_base_url(config.finnhub_api_key.clone(), url.clone()),
            None => FinnhubProvider::new(config.finnhub_api_key.clone()),
        };
        providers.push(Arc::new(finnhub));

        match config.metal_price_api_key.as_deref().filter(|k| !k.is_empty()) {
            Some(key) => {
                let metals = match &config.metal_price_api_base_url {
                    Some(url) => MetalPriceApiProvider::with_base_url(key.to_string(), url.clone()),
                    None => MetalPriceApiProvider::new(key.to_string()),
                };
                providers.push(Arc::new(metals));
            }
            None => {
                warn!("No Metal Price API key configured, precious metals will not be quoted");
            }
        }

        let client = Self::new(providers);
        info!(
            "Market data client initialized with {} providers: {:?}",
            client.providers.len(),
            client.provider_ids()
        );
        client
    }

    pub fn provider_ids(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    /// Fetch the latest quote from the first provider supporting `instrument`.
    pub async fn fetch_latest_quote(
        &self,
        instrument: &Instrument,
    ) -> std::result::Result<MarketQuote, MarketDataError> {
        let provider = self
            .providers
            .iter()
            .find(|p| p.supports(instrument))
            .ok_or(MarketDataError::NoProvidersAvailable)?;

        debug!(
            "Fetching latest quote for {} via {}",
            instrument.symbol(),
            provider.id()
        );

        provider.get_latest_quote(instrument).await
    }
}

#[async_trait]
impl QuoteFetcher for MarketDataClient {
    async fn get_latest_price(&self, ticker: &str) -> Result<Option<LatestPrice>> {
        let instrument = Instrument::from_ticker(ticker);

        match self.fetch_latest_quote(&instrument).await {
            Ok(quote) => Ok(Some(LatestPrice::from(quote))),
            Err(e) if e.is_not_found() => {
                debug!("No quote available for {}: {}", ticker, e);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
