//! SQLite storage for the investment ledger.
//!
//! Implements the repository traits defined in `investledger-core` with
//! Diesel on SQLite and contains:
//! - Connection pooling, pragmas and embedded migrations
//! - The single-writer actor every write goes through
//! - Repository implementations for service groups, rate entries and investments
//! - Database model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place where Diesel dependencies exist. The core
//! crate is database-agnostic and works with traits.
//!
//! ```text
//!   investledger-core (domain, valuation engine)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```
//!
//! Investment writes run the valuation engine inside the writer's
//! transaction, so the rate that was read is the rate that was stored.

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod investments;
pub mod rates;
pub mod service_groups;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export database utilities
pub use db::{
    create_pool, create_pool_with_size, get_connection, get_db_path, init, open, run_migrations,
    spawn_writer, DbConfig, DbConnection, DbPool, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use investments::InvestmentRepository;
pub use rates::RateRepository;
pub use service_groups::ServiceGroupRepository;

// Re-export from investledger-core for convenience
pub use investledger_core::errors::{DatabaseError, Error, Result};
