use crate::errors::Result;
use crate::portfolio::summary::summary_model::PortfolioSummary;

/// Trait for portfolio summary operations
pub trait PortfolioServiceTrait: Send + Sync {
    fn get_summary(&self, user_id: &str) -> Result<PortfolioSummary>;
}
