//! SQLite storage implementation for service groups.

mod model;
mod repository;

pub use model::ServiceGroupDB;
pub use repository::ServiceGroupRepository;
pub(crate) use repository::find_group;
