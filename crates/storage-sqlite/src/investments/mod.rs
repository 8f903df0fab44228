//! SQLite storage implementation for investments.

mod model;
mod repository;

pub use model::InvestmentDB;
pub use repository::InvestmentRepository;
pub(crate) use repository::revalue_in_transaction;
