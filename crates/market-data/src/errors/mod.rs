//! Error types for the market data crate.

use thiserror::Error;

/// Errors that can occur during market data operations.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol was not found by the provider.
    /// This is a terminal error - retrying won't help.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The instrument kind is not supported by this provider.
    #[error("Unsupported asset type: {0}")]
    UnsupportedAssetType(String),

    /// The provider rate limited the request (HTTP 429, or 403 on quota exhaustion).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A provider-specific error occurred.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider returned data that failed validation checks.
    #[error("Validation failed: {message}")]
    ValidationFailed {
        /// Description of the validation failure
        message: String,
    },

    /// No configured provider can handle the request.
    #[error("No providers available")]
    NoProvidersAvailable,

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Returns true when the provider asked us to slow down.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Returns true when the symbol is unknown to the provider.
    ///
    /// Callers treat this as "no quote" rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SymbolNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_classification() {
        let error = MarketDataError::RateLimited {
            provider: "FINNHUB".to_string(),
        };
        assert!(error.is_rate_limited());
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_symbol_not_found_classification() {
        let error = MarketDataError::SymbolNotFound("XYZ".to_string());
        assert!(error.is_not_found());
        assert!(!error.is_rate_limited());
    }

    #[test]
    fn test_error_display() {
        let error = MarketDataError::SymbolNotFound("INVALID".to_string());
        assert_eq!(format!("{}", error), "Symbol not found: INVALID");

        let error = MarketDataError::RateLimited {
            provider: "FINNHUB".to_string(),
        };
        assert_eq!(format!("{}", error), "Rate limited: FINNHUB");

        let error = MarketDataError::ProviderError {
            provider: "METAL_PRICE_API".to_string(),
            message: "API request failed".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Provider error: METAL_PRICE_API - API request failed"
        );
    }
}
