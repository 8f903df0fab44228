//! Interest-rate catalog - rate entries per service group and holding period.

mod holding_period;
mod rates_model;
mod rates_service;
mod rates_traits;


pub use holding_period::HoldingPeriod;
pub use rates_model::{NewRateEntry, RateEntry, RateEntryUpdate};
pub use rates_service::RateService;
pub use rates_traits::{RateCatalogTrait, RateRepositoryTrait, RateServiceTrait};
