//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `MarketDataProvider` trait that all providers implement
//! - Concrete provider implementations (Finnhub, Metal Price API)
//!
//! Providers receive an already classified [`Instrument`](crate::Instrument)
//! and decide for themselves whether they can serve it.

mod traits;

pub mod finnhub;
pub mod metal_price_api;

pub use traits::MarketDataProvider;
