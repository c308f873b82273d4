//! Finnhub market data provider implementation.
//!
//! Equities via the /quote endpoint.
//!
//! Finnhub free tier is limited to 60 API calls per minute.
//! API documentation: https://finnhub.io/docs/api

use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::errors::MarketDataError;
use crate::models::{Instrument, Quote};
use crate::provider::MarketDataProvider;

pub const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";
const PROVIDER_ID: &str = "FINNHUB";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// API Response Structures
// ============================================================================

/// Response from /quote endpoint
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    /// Current price
    c: Option<f64>,
    /// High price of the day
    h: Option<f64>,
    /// Low price of the day
    l: Option<f64>,
    /// Open price of the day
    o: Option<f64>,
    /// Timestamp (Unix)
    t: Option<i64>,
}

/// Error response from Finnhub
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

// ============================================================================
// FinnhubProvider
// ============================================================================

/// Finnhub market data provider.
pub struct FinnhubProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FinnhubProvider {
    /// Create a new Finnhub provider with the given API key.
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

    /// Make a GET request to the Finnhub API.
    async fn fetch(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String, MarketDataError> {
        let url = format!("{}{}", self.base_url, endpoint);

        debug!("Finnhub request: {} with {} params", endpoint, params.len());

        let response = self
            .client
            .get(&url)
            .header("X-Finnhub-Token", &self.api_key)
            .query(params)
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
                        message: format!("Request failed: {}", e),
                    }
                }
            })?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: "Invalid or missing API key".to_string(),
            });
        }

        // Finnhub answers 403 once the plan quota is exhausted
        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            if let Ok(ErrorResponse {
                error: Some(error_msg),
            }) = serde_json::from_str::<ErrorResponse>(&body)
            {
                return Err(MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: error_msg,
                });
            }

            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {} - {}", status, body),
            });
        }

        response
            .text()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to read response: {}", e),
            })
    }

    /// Fetch latest quote from /quote endpoint.
    async fn fetch_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let text = self.fetch("/quote", &[("symbol", symbol)]).await?;

        let response: QuoteResponse =
            serde_json::from_str(&text).map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse quote response: {}", e),
            })?;

        quote_from_response(symbol, response)
    }
}

/// Convert a /quote payload into a [`Quote`].
fn quote_from_response(symbol: &str, response: QuoteResponse) -> Result<Quote, MarketDataError> {
    let close = response.c.ok_or_else(|| {
        MarketDataError::SymbolNotFound(format!("No quote data for symbol: {}", symbol))
    })?;

    // Finnhub returns 0 for unknown symbols instead of an error
    if close == 0.0 && response.o.unwrap_or(0.0) == 0.0 {
        return Err(MarketDataError::SymbolNotFound(format!(
            "Symbol not found or no trading data: {}",
            symbol
        )));
    }

    let timestamp = response
        .t
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
        .unwrap_or_else(Utc::now);

    let close_decimal = Decimal::try_from(close).map_err(|_| MarketDataError::ValidationFailed {
        message: format!("Invalid close price: {}", close),
    })?;

    Ok(Quote {
        timestamp,
        open: response.o.and_then(|v| Decimal::try_from(v).ok()),
        high: response.h.and_then(|v| Decimal::try_from(v).ok()),
        low: response.l.and_then(|v| Decimal::try_from(v).ok()),
        close: close_decimal,
        currency: "USD".to_string(),
        source: PROVIDER_ID.to_string(),
    })
}

// ============================================================================
// MarketDataProvider Implementation
// ============================================================================

#[async_trait]
impl MarketDataProvider for FinnhubProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        2
    }

    fn supports(&self, instrument: &Instrument) -> bool {
        matches!(instrument, Instrument::Equity { .. })
    }

    async fn get_latest_quote(&self, instrument: &Instrument) -> Result<Quote, MarketDataError> {
        let symbol = match instrument {
            Instrument::Equity { symbol } => symbol,
            Instrument::Metal { .. } => {
                return Err(MarketDataError::UnsupportedAssetType(
                    "Finnhub does not support metals directly".to_string(),
                ))
            }
        };

        debug!("Fetching latest quote for {} from Finnhub", symbol);

        self.fetch_latest_quote(symbol).await
    }
}

// ============================================================================
// Tests
// ============================================================================
