//! Database models for holdings.

use chrono::{NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use trackfolio_core::holdings::{Holding, NewHolding};

/// Prices are stored as text to keep their exact decimal value.
fn parse_price(value: Option<String>, field_name: &str) -> Option<Decimal> {
    let value = value?;
    match Decimal::from_str(&value) {
        Ok(d) => Some(d),
        Err(e) => {
            log::error!("Failed to parse {} '{}': {}. Ignoring it.", field_name, value, e);
            None
        }
    }
}

/// Shares are stored as text like prices. `has_shares` carries the exact sign
/// so the eligibility filter never compares a lossy float.
fn shares_from_db(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap_or_else(|e| {
        log::error!("Failed to parse shares '{}': {}. Falling back to ZERO.", value, e);
        Decimal::ZERO
    })
}

/// Database model for holdings
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::holdings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HoldingDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub ticker: String,
    pub shares: String,
    pub buy_price: Option<String>,
    pub target_price: Option<String>,
    pub is_in_watchlist: bool,
    pub current_price: Option<String>,
    pub last_updated: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

/// Database model for creating a new holding
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::holdings)]
pub struct NewHoldingDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub ticker: String,
    pub shares: String,
    pub has_shares: bool,
    pub buy_price: Option<String>,
    pub target_price: Option<String>,
    pub is_in_watchlist: bool,
    pub current_price: Option<String>,
    pub last_updated: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl From<HoldingDB> for Holding {
    fn from(db: HoldingDB) -> Self {
        Self {
            shares: shares_from_db(&db.shares),
            buy_price: parse_price(db.buy_price, "buy_price"),
            target_price: parse_price(db.target_price, "target_price"),
            current_price: parse_price(db.current_price, "current_price"),
            last_updated: db.last_updated.map(|dt| Utc.from_utc_datetime(&dt)),
            created_at: Utc.from_utc_datetime(&db.created_at),
            id: db.id,
            user_id: db.user_id,
            name: db.name,
            ticker: db.ticker,
            is_in_watchlist: db.is_in_watchlist,
        }
    }
}

impl NewHoldingDB {
    /// `id` is used when the input carries none.
    pub fn from_domain(domain: NewHolding, id: String) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: domain.id.unwrap_or(id),
            user_id: domain.user_id,
            name: domain.name,
            ticker: domain.ticker,
            has_shares: domain.shares > Decimal::ZERO,
            shares: domain.shares.to_string(),
            buy_price: domain.buy_price.map(|p| p.to_string()),
            target_price: domain.target_price.map(|p| p.to_string()),
            is_in_watchlist: domain.is_in_watchlist,
            last_updated: domain.current_price.map(|_| now),
            current_price: domain.current_price.map(|p| p.to_string()),
            created_at: now,
        }
    }
}
