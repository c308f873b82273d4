//! Market data provider trait definitions.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{Instrument, Quote};

/// Trait for market data providers.
///
/// Implement this trait to add support for a new quote source. Callers pick
/// the first provider (by ascending [`priority`](Self::priority)) whose
/// [`supports`](Self::supports) returns true for the instrument.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use trackfolio_market_data::{Instrument, MarketDataProvider, Quote};
/// use trackfolio_market_data::errors::MarketDataError;
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl MarketDataProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     fn supports(&self, instrument: &Instrument) -> bool {
///         matches!(instrument, Instrument::Equity { .. })
///     }
///
///     async fn get_latest_quote(&self, instrument: &Instrument) -> Result<Quote, MarketDataError> {
///         todo!()
///     }
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "FINNHUB". Used for logging and as
    /// the quote source.
    fn id(&self) -> &'static str;

    /// Provider priority for ordering.
    ///
    /// Lower values = higher priority. Default is 10.
    fn priority(&self) -> u8 {
        10
    }

    /// Whether this provider can quote the given instrument.
    fn supports(&self, instrument: &Instrument) -> bool;

    /// Fetch the latest quote for an instrument.
    ///
    /// Implementations make exactly one upstream request and never retry;
    /// pacing and retry policy belong to the caller.
    async fn get_latest_quote(&self, instrument: &Instrument) -> Result<Quote, MarketDataError>;
}
