//! Metal Price API provider for precious metals market data.
//!
//! This provider fetches real-time precious metal prices from the Metal Price API
//! for the codes listed in [`PRECIOUS_METALS`](crate::PRECIOUS_METALS).
//!
//! Note: The free tier of this API does not support historical data.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::errors::MarketDataError;
use crate::models::{Instrument, Quote, PRECIOUS_METALS};
use crate::provider::MarketDataProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.metalpriceapi.com/v1";

/// Provider ID constant
const PROVIDER_ID: &str = "METAL_PRICE_API";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// API response from Metal Price API
#[derive(Debug, Deserialize)]
struct MetalPriceResponse {
    /// Whether the request was successful
    success: bool,
    /// Unix timestamp of the quote
    timestamp: Option<i64>,
    /// Rates for requested metals.
    ///
    /// `XAU` is expressed as troy ounces per one unit of base currency;
    /// `USDXAU` (when present) is the base-currency price of one troy ounce.
    #[serde(default)]
    rates: HashMap<String, f64>,
    /// Error details when `success` is false
    error: Option<MetalPriceError>,
}

#[derive(Debug, Deserialize)]
struct MetalPriceError {
    message: Option<String>,
}

/// Metal Price API provider for precious metals market data.
///
/// # Example
///
/// ```ignore
/// use trackfolio_market_data::MetalPriceApiProvider;
///
/// let provider = MetalPriceApiProvider::new("your_api_key".to_string());
/// ```
pub struct MetalPriceApiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl MetalPriceApiProvider {
    /// Create a new Metal Price API provider with the given API key.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Create a provider against a non-default API root (proxies, tests).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Check if the given symbol is a supported metal.
    fn is_supported_metal(symbol: &str) -> bool {
        PRECIOUS_METALS.contains(&symbol)
    }
}

/// Extract the per-ounce price of `symbol` in `quote_currency`.
fn price_from_response(
    symbol: &str,
    quote_currency: &str,
    response: &MetalPriceResponse,
) -> Result<Decimal, MarketDataError> {
    if !response.success {
        let message = response
            .error
            .as_ref()
            .and_then(|e| e.message.clone())
            .unwrap_or_else(|| "API request failed".to_string());
        return Err(MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message,
        });
    }

    // Prefer the direct price when the API includes it
    let direct_key = format!("{}{}", quote_currency, symbol);
    let price = match response.rates.get(&direct_key) {
        Some(direct) => *direct,
        None => {
            let rate = response
                .rates
                .get(symbol)
                .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))?;

            // 1 base_currency = rate troy ounces, so price per ounce = 1 / rate
            if *rate == 0.0 {
                return Err(MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: "Invalid rate (zero)".to_string(),
                });
            }
            1.0 / rate
        }
    };

    Decimal::try_from(price).map_err(|_| MarketDataError::ValidationFailed {
        message: format!("Failed to convert rate {} to decimal", price),
    })
}

#[async_trait]
impl MarketDataProvider for MetalPriceApiProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        4
    }

    fn supports(&self, instrument: &Instrument) -> bool {
        matches!(instrument, Instrument::Metal { .. })
    }

    async fn get_latest_quote(&self, instrument: &Instrument) -> Result<Quote, MarketDataError> {
        let (symbol, quote_currency) = match instrument {
            Instrument::Metal { symbol, quote } => (symbol.to_string(), quote.to_string()),
            _ => {
                return Err(MarketDataError::UnsupportedAssetType(format!(
                    "{:?}",
                    instrument
                )))
            }
        };

        if !Self::is_supported_metal(&symbol) {
            return Err(MarketDataError::SymbolNotFound(symbol));
        }

        debug!("Fetching latest quote for {} from Metal Price API", symbol);

        let url = format!("{}/latest", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("base", quote_currency.as_str()),
                ("currencies", symbol.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MarketDataError::Timeout {
                        provider: PROVIDER_ID.to_string(),
                    }
                } else {
                    MarketDataError::ProviderError {
                        provider: PROVIDER_ID.to_string(),
                        message: e.to_string(),
                    }
                }
            })?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        let metal_resp: MetalPriceResponse =
            response
                .json()
                .await
                .map_err(|e| MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: e.to_string(),
                })?;

        let price = price_from_response(&symbol, &quote_currency, &metal_resp)?;

        let timestamp = metal_resp
            .timestamp
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
            .unwrap_or_else(Utc::now);

        Ok(Quote::new(
            timestamp,
            price,
            quote_currency,
            PROVIDER_ID.to_string(),
        ))
    }
}
