//! Portfolio module - read-side aggregates over stored holdings.

pub mod summary;

pub use summary::{PortfolioService, PortfolioServiceTrait, PortfolioSummary};
