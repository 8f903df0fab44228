use log::{debug, info};
use std::sync::Arc;

use super::investments_model::{Investment, InvestmentUpdate, NewInvestment, PortfolioSummary};
use super::investments_traits::{InvestmentRepositoryTrait, InvestmentServiceTrait};
use super::valuation::{derive_with_lookup, Valuation};
use crate::constants::DUPLICATE_INVESTMENT_MESSAGE;
use crate::errors::{Error, Result};
use crate::rates::{HoldingPeriod, RateCatalogTrait};
use crate::service_groups::ServiceGroupRepositoryTrait;
use crate::utils::Clock;

/// Service for managing investments
pub struct InvestmentService {
    repository: Arc<dyn InvestmentRepositoryTrait>,
    group_repository: Arc<dyn ServiceGroupRepositoryTrait>,
    rate_catalog: Arc<dyn RateCatalogTrait>,
    clock: Arc<dyn Clock>,
}

impl InvestmentService {
    pub fn new(
        repository: Arc<dyn InvestmentRepositoryTrait>,
        group_repository: Arc<dyn ServiceGroupRepositoryTrait>,
        rate_catalog: Arc<dyn RateCatalogTrait>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            group_repository,
            rate_catalog,
            clock,
        }
    }

    /// Rejects a second position for the same user, group and period.
    /// The storage unique constraint still guards concurrent writers.
    fn ensure_unique_position(
        &self,
        user_id: &str,
        service_group_id: &str,
        period: HoldingPeriod,
        exclude_id: Option<&str>,
    ) -> Result<()> {
        let duplicate = self.repository.list_for_user(user_id)?.iter().any(|inv| {
            inv.service_group_id.as_deref() == Some(service_group_id)
                && inv.holding_period == period
                && Some(inv.id.as_str()) != exclude_id
        });
        if duplicate {
            return Err(Error::ConstraintViolation(
                DUPLICATE_INVESTMENT_MESSAGE.to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl InvestmentServiceTrait for InvestmentService {
    async fn create_investment(&self, new_investment: NewInvestment) -> Result<Investment> {
        debug!(
            "Creating investment for user {} in group {} ({})",
            new_investment.user_id, new_investment.service_group_id, new_investment.holding_period
        );
        new_investment.validate()?;
        self.group_repository
            .get_by_id(&new_investment.service_group_id)?;
        self.ensure_unique_position(
            &new_investment.user_id,
            &new_investment.service_group_id,
            new_investment.holding_period,
            None,
        )?;

        self.repository
            .create(new_investment, self.clock.today())
            .await
    }

    async fn update_investment(&self, investment_update: InvestmentUpdate) -> Result<Investment> {
        debug!("Updating investment {}", investment_update.id);
        investment_update.validate()?;
        let existing = self.repository.get_by_id(&investment_update.id)?;
        self.group_repository
            .get_by_id(&investment_update.service_group_id)?;
        self.ensure_unique_position(
            &existing.user_id,
            &investment_update.service_group_id,
            investment_update.holding_period,
            Some(&existing.id),
        )?;

        self.repository
            .update(investment_update, self.clock.today())
            .await
    }

    async fn delete_investment(&self, investment_id: &str) -> Result<()> {
        debug!("Deleting investment {}", investment_id);
        let deleted = self.repository.delete(investment_id).await?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Investment {}", investment_id)));
        }
        Ok(())
    }

    async fn revalue_all(&self) -> Result<usize> {
        let as_of = self.clock.today();
        let count = self.repository.revalue_all(as_of).await?;
        info!("Revalued {} investments as of {}", count, as_of);
        Ok(count)
    }

    fn get_investment(&self, investment_id: &str) -> Result<Investment> {
        self.repository.get_by_id(investment_id)
    }

    fn get_investments(&self) -> Result<Vec<Investment>> {
        self.repository.list()
    }

    fn get_investments_for_user(&self, user_id: &str) -> Result<Vec<Investment>> {
        self.repository.list_for_user(user_id)
    }

    fn preview_valuation(&self, new_investment: &NewInvestment) -> Result<Valuation> {
        new_investment.validate()?;
        let group = self
            .group_repository
            .get_by_id(&new_investment.service_group_id)?;
        let inputs = new_investment.valuation_inputs(Some(group.share_value));
        derive_with_lookup(&inputs, self.clock.today(), || {
            self.rate_catalog
                .find_rate(&group.id, new_investment.holding_period)
        })
    }

    fn get_portfolio_summary(&self, user_id: &str) -> Result<PortfolioSummary> {
        let investments = self.repository.list_for_user(user_id)?;
        Ok(PortfolioSummary::from_investments(user_id, &investments))
    }
}
