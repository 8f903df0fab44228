use log::debug;
use std::sync::Arc;

use super::service_groups_model::{NewServiceGroup, ServiceGroup, ServiceGroupUpdate};
use super::service_groups_traits::{ServiceGroupRepositoryTrait, ServiceGroupServiceTrait};
use crate::errors::{Error, Result};
use crate::utils::Clock;

/// Service for administering service groups
pub struct ServiceGroupService {
    repository: Arc<dyn ServiceGroupRepositoryTrait>,
    clock: Arc<dyn Clock>,
}

impl ServiceGroupService {
    pub fn new(repository: Arc<dyn ServiceGroupRepositoryTrait>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    fn ensure_name_available(&self, name: &str, exclude_id: Option<&str>) -> Result<()> {
        let taken = self.repository.list(None)?.into_iter().any(|g| {
            g.name.trim().eq_ignore_ascii_case(name.trim()) && Some(g.id.as_str()) != exclude_id
        });
        if taken {
            return Err(Error::ConstraintViolation(format!(
                "Service group with name '{}' already exists.",
                name.trim()
            )));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ServiceGroupServiceTrait for ServiceGroupService {
    async fn create_service_group(&self, new_group: NewServiceGroup) -> Result<ServiceGroup> {
        debug!("Creating service group '{}'", new_group.name);
        new_group.validate()?;
        self.ensure_name_available(&new_group.name, None)?;
        self.repository.create(new_group).await
    }

    async fn update_service_group(
        &self,
        group_update: ServiceGroupUpdate,
    ) -> Result<ServiceGroup> {
        debug!("Updating service group {}", group_update.id);
        group_update.validate()?;
        self.ensure_name_available(&group_update.name, Some(&group_update.id))?;
        self.repository.update(group_update).await
    }

    async fn delete_service_group(&self, group_id: &str) -> Result<()> {
        debug!("Deleting service group {}", group_id);
        let deleted = self.repository.delete(group_id, self.clock.today()).await?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Service group {}", group_id)));
        }
        Ok(())
    }

    fn get_service_group(&self, group_id: &str) -> Result<ServiceGroup> {
        self.repository.get_by_id(group_id)
    }

    fn get_service_groups(&self) -> Result<Vec<ServiceGroup>> {
        self.repository.list(None)
    }

    fn get_active_service_groups(&self) -> Result<Vec<ServiceGroup>> {
        self.repository.list(Some(true))
    }
}
