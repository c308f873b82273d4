//! Quotes module - latest-price lookups for holdings.
//!
//! The refresh job only sees the [`QuoteFetcher`] contract; the
//! [`MarketDataClient`] implements it on top of the providers in
//! `trackfolio-market-data`.

pub mod client;
pub mod fetcher;
pub mod model;

pub use client::{MarketDataClient, ProviderConfig};
pub use fetcher::QuoteFetcher;
pub use model::LatestPrice;
