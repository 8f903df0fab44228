use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::rates_model::{NewRateEntry, RateEntry, RateEntryUpdate};
use super::rates_traits::{RateRepositoryTrait, RateServiceTrait};
use super::HoldingPeriod;
use crate::errors::{Error, Result};
use crate::investments::valuation::quantize_rate;
use crate::service_groups::ServiceGroupRepositoryTrait;

/// Service for administering the interest-rate catalog
pub struct RateService {
    repository: Arc<dyn RateRepositoryTrait>,
    group_repository: Arc<dyn ServiceGroupRepositoryTrait>,
}

impl RateService {
    pub fn new(
        repository: Arc<dyn RateRepositoryTrait>,
        group_repository: Arc<dyn ServiceGroupRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            group_repository,
        }
    }
}

#[async_trait::async_trait]
impl RateServiceTrait for RateService {
    async fn create_rate_entry(&self, mut new_entry: NewRateEntry) -> Result<RateEntry> {
        debug!(
            "Creating rate entry for group {} ({})",
            new_entry.service_group_id, new_entry.holding_period
        );
        new_entry.validate()?;
        // fails with NotFound for an unknown group
        self.group_repository.get_by_id(&new_entry.service_group_id)?;

        let exists = self
            .repository
            .list_for_group(&new_entry.service_group_id)?
            .iter()
            .any(|e| e.holding_period == new_entry.holding_period);
        if exists {
            return Err(Error::ConstraintViolation(format!(
                "A rate entry for this service group and a {} period already exists.",
                new_entry.holding_period
            )));
        }

        new_entry.interest_percentage = quantize_rate(new_entry.interest_percentage);
        self.repository.create(new_entry).await
    }

    async fn update_rate_entry(&self, mut entry_update: RateEntryUpdate) -> Result<RateEntry> {
        debug!("Updating rate entry {}", entry_update.id);
        entry_update.validate()?;
        entry_update.interest_percentage = quantize_rate(entry_update.interest_percentage);
        self.repository.update(entry_update).await
    }

    async fn delete_rate_entry(&self, entry_id: &str) -> Result<()> {
        debug!("Deleting rate entry {}", entry_id);
        let deleted = self.repository.delete(entry_id).await?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Rate entry {}", entry_id)));
        }
        Ok(())
    }

    fn get_rate_entry(&self, entry_id: &str) -> Result<RateEntry> {
        self.repository.get_by_id(entry_id)
    }

    fn get_rate_entries(&self) -> Result<Vec<RateEntry>> {
        self.repository.list()
    }

    fn get_rate_entries_for_group(&self, service_group_id: &str) -> Result<Vec<RateEntry>> {
        self.repository.list_for_group(service_group_id)
    }

    fn find_rate(&self, service_group_id: &str, period: HoldingPeriod) -> Result<Option<Decimal>> {
        self.repository.find_rate(service_group_id, period)
    }
}
