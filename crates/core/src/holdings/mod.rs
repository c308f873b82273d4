//! Holdings module - tracked positions and watchlist entries.

pub mod holdings_model;
pub mod holdings_traits;

pub use holdings_model::{Holding, HoldingPriceUpdate, NewHolding};
pub use holdings_traits::HoldingRepositoryTrait;
