//! Holdings domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};

/// Domain model representing one tracked position.
///
/// A holding with zero shares is not an active position; it can still be
/// kept on the watchlist, in which case its price keeps being refreshed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub ticker: String,
    pub shares: Decimal,
    pub buy_price: Option<Decimal>,
    pub target_price: Option<Decimal>,
    pub is_in_watchlist: bool,
    pub current_price: Option<Decimal>,
    pub last_updated: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Holding {
    /// Whether the refresh job should quote this holding.
    pub fn is_refresh_eligible(&self) -> bool {
        self.shares > Decimal::ZERO || self.is_in_watchlist
    }

    /// Whether this holding counts towards portfolio value.
    pub fn is_active_position(&self) -> bool {
        self.shares > Decimal::ZERO && !self.is_in_watchlist
    }

    /// Market value at the last known price; zero until the first refresh.
    pub fn market_value(&self) -> Result<Decimal> {
        self.times_shares("market value", self.current_price)
    }

    pub fn cost_basis(&self) -> Result<Decimal> {
        self.times_shares("cost basis", self.buy_price)
    }

    fn times_shares(&self, what: &str, price: Option<Decimal>) -> Result<Decimal> {
        let price = price.unwrap_or(Decimal::ZERO);
        self.shares.checked_mul(price).ok_or_else(|| {
            ValidationError::DecimalConversion(format!(
                "{} of {} overflows: {} x {}",
                what, self.ticker, self.shares, price
            ))
            .into()
        })
    }
}

/// Input model for creating a new holding
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewHolding {
    pub id: Option<String>,
    pub user_id: String,
    pub name: String,
    pub ticker: String,
    #[serde(default)]
    pub shares: Decimal,
    pub buy_price: Option<Decimal>,
    pub target_price: Option<Decimal>,
    #[serde(default)]
    pub is_in_watchlist: bool,
    pub current_price: Option<Decimal>,
}

impl NewHolding {
    /// Normalizes the input and rejects values the store must never hold.
    ///
    /// The ticker is trimmed and uppercased, the name trimmed, and the target
    /// price falls back to the buy price.
    pub fn validate(mut self) -> Result<Self> {
        self.ticker = self.ticker.trim().to_uppercase();
        if self.ticker.is_empty() {
            return Err(ValidationError::MissingField("ticker".to_string()).into());
        }

        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }

        if self.user_id.trim().is_empty() {
            return Err(ValidationError::MissingField("userId".to_string()).into());
        }

        if self.shares < Decimal::ZERO {
            return Err(ValidationError::InvalidInput(format!(
                "shares must not be negative, got {}",
                self.shares
            ))
            .into());
        }

        for (field, value) in [
            ("buyPrice", self.buy_price),
            ("targetPrice", self.target_price),
            ("currentPrice", self.current_price),
        ] {
            if let Some(price) = value {
                if price < Decimal::ZERO {
                    return Err(ValidationError::InvalidInput(format!(
                        "{} must not be negative, got {}",
                        field, price
                    ))
                    .into());
                }
            }
        }

        if self.target_price.is_none() {
            self.target_price = self.buy_price;
        }

        Ok(self)
    }
}

/// The only fields the refresh job is allowed to write.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldingPriceUpdate {
    pub current_price: Decimal,
    pub last_updated: DateTime<Utc>,
}
