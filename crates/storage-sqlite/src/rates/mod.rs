//! SQLite storage implementation for the rate catalog.

mod model;
mod repository;

pub use model::RateEntryDB;
pub use repository::RateRepository;
pub(crate) use repository::find_active_rate;
