//! Portfolio summary module.
//!
//! Aggregates value and gain over a user's active positions.

mod summary_model;
mod summary_service;
mod summary_traits;

pub use summary_model::*;
pub use summary_service::*;
pub use summary_traits::*;
