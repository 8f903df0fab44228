//! Rate catalog repository and service traits.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::rates_model::{NewRateEntry, RateEntry, RateEntryUpdate};
use super::HoldingPeriod;
use crate::errors::Result;

/// Read-only lookup of the rate that applies to a (group, period) pair.
pub trait RateCatalogTrait: Send + Sync {
    /// Returns the interest percentage of the single active entry for
    /// `(service_group_id, period)`.
    ///
    /// `Ok(None)` means no active entry exists. More than one active entry
    /// is an `Error::Integrity`; implementations must not pick one.
    fn find_rate(&self, service_group_id: &str, period: HoldingPeriod)
        -> Result<Option<Decimal>>;
}

/// Persistence contract for rate entries.
#[async_trait]
pub trait RateRepositoryTrait: RateCatalogTrait {
    async fn create(&self, new_entry: NewRateEntry) -> Result<RateEntry>;

    async fn update(&self, entry_update: RateEntryUpdate) -> Result<RateEntry>;

    async fn delete(&self, entry_id: &str) -> Result<usize>;

    fn get_by_id(&self, entry_id: &str) -> Result<RateEntry>;

    /// Lists entries ordered by group name, then period.
    fn list(&self) -> Result<Vec<RateEntry>>;

    fn list_for_group(&self, service_group_id: &str) -> Result<Vec<RateEntry>>;
}

#[async_trait]
pub trait RateServiceTrait: Send + Sync {
    async fn create_rate_entry(&self, new_entry: NewRateEntry) -> Result<RateEntry>;
    async fn update_rate_entry(&self, entry_update: RateEntryUpdate) -> Result<RateEntry>;
    async fn delete_rate_entry(&self, entry_id: &str) -> Result<()>;
    fn get_rate_entry(&self, entry_id: &str) -> Result<RateEntry>;
    fn get_rate_entries(&self) -> Result<Vec<RateEntry>>;
    fn get_rate_entries_for_group(&self, service_group_id: &str) -> Result<Vec<RateEntry>>;
    fn find_rate(&self, service_group_id: &str, period: HoldingPeriod)
        -> Result<Option<Decimal>>;
}
