use std::sync::Arc;

use log::debug;

use crate::errors::Result;
use crate::holdings::HoldingRepositoryTrait;
use crate::portfolio::summary::summary_model::PortfolioSummary;
use crate::portfolio::summary::summary_traits::PortfolioServiceTrait;

pub struct PortfolioService {
    holding_repository: Arc<dyn HoldingRepositoryTrait>,
}

impl PortfolioService {
    pub fn new(holding_repository: Arc<dyn HoldingRepositoryTrait>) -> Self {
        Self { holding_repository }
    }
}

impl PortfolioServiceTrait for PortfolioService {
    fn get_summary(&self, user_id: &str) -> Result<PortfolioSummary> {
        let positions = self.holding_repository.list_active_positions(user_id)?;
        debug!(
            "Computing portfolio summary over {} positions for user {}",
            positions.len(),
            user_id
        );
        PortfolioSummary::from_holdings(&positions)
    }
}
