//! Service group repository and service traits.

use async_trait::async_trait;

use super::service_groups_model::{NewServiceGroup, ServiceGroup, ServiceGroupUpdate};
use crate::errors::Result;

/// Persistence contract for service groups.
#[async_trait]
pub trait ServiceGroupRepositoryTrait: Send + Sync {
    async fn create(&self, new_group: NewServiceGroup) -> Result<ServiceGroup>;

    async fn update(&self, group_update: ServiceGroupUpdate) -> Result<ServiceGroup>;

    /// Deletes a group by its ID.
    ///
    /// Rate entries of the group are removed with it. Investments that
    /// referenced it lose the reference and are revalued as of `as_of`.
    /// Returns the number of deleted groups.
    async fn delete(&self, group_id: &str, as_of: chrono::NaiveDate) -> Result<usize>;

    fn get_by_id(&self, group_id: &str) -> Result<ServiceGroup>;

    /// Lists groups ordered by name, optionally filtered by active flag.
    fn list(&self, is_active_filter: Option<bool>) -> Result<Vec<ServiceGroup>>;
}

/// Business operations on service groups.
#[async_trait]
pub trait ServiceGroupServiceTrait: Send + Sync {
    async fn create_service_group(&self, new_group: NewServiceGroup) -> Result<ServiceGroup>;
    async fn update_service_group(&self, group_update: ServiceGroupUpdate)
        -> Result<ServiceGroup>;
    async fn delete_service_group(&self, group_id: &str) -> Result<()>;
    fn get_service_group(&self, group_id: &str) -> Result<ServiceGroup>;
    fn get_service_groups(&self) -> Result<Vec<ServiceGroup>>;
    fn get_active_service_groups(&self) -> Result<Vec<ServiceGroup>>;
}
