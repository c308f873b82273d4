//! Price refresh - the background job keeping `current_price` fresh.
//!
//! A pass lists the eligible holdings, quotes them one at a time with a
//! fixed pacing delay in between, and writes back only successful quotes.
//! The scheduler runs passes on a fixed interval, one at a time.

pub mod refresh_model;
pub mod refresh_service;
pub mod scheduler;

#[cfg(test)]
mod refresh_service_tests;


pub use refresh_model::{FailureStage, RefreshConfig, RefreshFailure, RefreshSummary, SkipReason};
pub use refresh_service::{PriceRefreshService, PriceRefreshServiceTrait};
pub use scheduler::{start_periodic_updates, RefreshSchedulerHandle};
