//! SQLite storage implementation for Trackfolio.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `trackfolio-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations
//! - Database-specific model types (with Diesel derives)
//!
//! ```text
//!   core (domain traits)
//!          │
//!          ▼
//!   storage-sqlite (this crate)
//!          │
//!          ▼
//!      SQLite DB
//! ```
//!
//! Reads go through the r2d2 pool; every write is funneled through the
//! single writer actor ([`db::WriteHandle`]).

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod holdings;

pub use db::{DbConnection, DbPool, WriteHandle};
pub use errors::{IntoCore, StorageError};
pub use holdings::HoldingRepository;
