//! Investment ledger core - domain entities, services, and traits.
//!
//! This crate holds the business logic of the ledger: service groups, the
//! interest-rate catalog, investments and the valuation engine that derives
//! their amounts. It is database-agnostic and defines traits that are
//! implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod investments;
pub mod rates;
pub mod service_groups;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
