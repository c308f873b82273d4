use crate::errors::Result;
use crate::holdings::holdings_model::{Holding, HoldingPriceUpdate, NewHolding};
use async_trait::async_trait;

/// Trait for holding repository operations (the Holdings Store).
#[async_trait]
pub trait HoldingRepositoryTrait: Send + Sync {
    fn get_holding(&self, holding_id: &str) -> Result<Holding>;

    /// Holdings with `shares > 0` or on the watchlist, ordered by creation
    /// time then id.
    fn list_refresh_eligible(&self) -> Result<Vec<Holding>>;

    /// Holdings of `user_id` with `shares > 0` that are not watchlisted.
    fn list_active_positions(&self, user_id: &str) -> Result<Vec<Holding>>;

    async fn insert_holding(&self, new_holding: NewHolding) -> Result<Holding>;

    /// Writes `current_price` and `last_updated` only. Returns rows affected.
    async fn update_price(&self, holding_id: &str, update: HoldingPriceUpdate) -> Result<usize>;

    async fn delete_holding(&self, holding_id: &str) -> Result<usize>;
}
