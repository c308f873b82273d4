//! Trackfolio Market Data Crate
//!
//! Provider-agnostic latest-quote fetching for the Trackfolio backend.
//!
//! # Overview
//!
//! - Two asset families: equities and precious metals
//! - Two providers: Finnhub (equities) and Metal Price API (metals)
//! - A single [`MarketDataProvider`] trait the domain layer programs against
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |   Domain Layer   | --> |   Instrument     |  (ticker classification)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |    Provider      |  (Finnhub, Metal Price API)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |     Quote        |  (market data)
//!                          +------------------+
//! ```

pub mod errors;
pub mod models;
pub mod provider;

pub use models::{Currency, Instrument, InstrumentKind, Quote, PRECIOUS_METALS};

pub use provider::finnhub::FinnhubProvider;
pub use provider::metal_price_api::MetalPriceApiProvider;
pub use provider::MarketDataProvider;
