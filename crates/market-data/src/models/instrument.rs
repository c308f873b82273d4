use std::borrow::Cow;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::types::Currency;

/// Precious metal codes quoted by the metal providers.
pub const PRECIOUS_METALS: &[&str] = &["XAU", "XAG", "XPT", "XPD"];

/// Broad instrument classification used for provider routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstrumentKind {
    Equity,
    Metal,
}

/// What a holding's ticker refers to, as seen by the providers.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Instrument {
    /// Exchange-traded security (stocks, ETFs)
    Equity { symbol: Arc<str> },

    /// Precious metal priced per troy ounce in `quote`
    Metal { symbol: Arc<str>, quote: Currency },
}

impl Instrument {
    /// Classify a stored ticker.
    ///
    /// Metal codes (`XAU`, `XAG`, ...) become USD-quoted metals; everything
    /// else is treated as an equity symbol. The ticker is trimmed and
    /// uppercased first.
    pub fn from_ticker(ticker: &str) -> Self {
        let symbol = ticker.trim().to_uppercase();
        if PRECIOUS_METALS.contains(&symbol.as_str()) {
            Self::Metal {
                symbol: Arc::from(symbol),
                quote: Cow::Borrowed("USD"),
            }
        } else {
            Self::Equity {
                symbol: Arc::from(symbol),
            }
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            Self::Equity { symbol } | Self::Metal { symbol, .. } => symbol,
        }
    }

    pub fn kind(&self) -> InstrumentKind {
        match self {
            Self::Equity { .. } => InstrumentKind::Equity,
            Self::Metal { .. } => InstrumentKind::Metal,
        }
    }
}
