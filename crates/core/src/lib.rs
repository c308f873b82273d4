//! Trackfolio Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic of the portfolio tracker: the
//! holdings model, the price refresh job and the portfolio summary.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod holdings;
pub mod portfolio;
pub mod quotes;
pub mod refresh;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
