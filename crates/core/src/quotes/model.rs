use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use trackfolio_market_data::Quote as MarketQuote;

/// Latest price observation for a ticker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LatestPrice {
    pub price: Decimal,
    pub currency: String,
    pub source: String,
    pub timestamp: DateTime<Utc>,
}

impl LatestPrice {
    pub fn new(price: Decimal) -> Self {
        Self {
            price,
            currency: "USD".to_string(),
            source: "MANUAL".to_string(),
            timestamp: Utc::now(),
        }
    }
}

impl From<MarketQuote> for LatestPrice {
    fn from(quote: MarketQuote) -> Self {
        Self {
            price: quote.close,
            currency: quote.currency,
            source: quote.source,
            timestamp: quote.timestamp,
        }
    }
}
