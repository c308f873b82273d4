//! Market data models
//!
//! - `types` - Type aliases for common identifiers
//! - `instrument` - Ticker classification (Instrument, InstrumentKind)
//! - `quote` - Quote data structure

mod instrument;
mod quote;
mod types;

pub use instrument::{Instrument, InstrumentKind, PRECIOUS_METALS};
pub use quote::Quote;
pub use types::Currency;
