//! In-memory repositories shared by the service tests.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::errors::{DatabaseError, Error, Result};
use crate::investments::{
    derive_with_lookup, Investment, InvestmentRepositoryTrait, InvestmentUpdate, NewInvestment,
    Valuation,
};
use crate::rates::{
    HoldingPeriod, NewRateEntry, RateCatalogTrait, RateEntry, RateEntryUpdate, RateRepositoryTrait,
};
use crate::service_groups::{
    NewServiceGroup, ServiceGroup, ServiceGroupRepositoryTrait, ServiceGroupUpdate,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn timestamp() -> NaiveDateTime {
    date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap()
}

fn not_found(what: &str) -> Error {
    Error::Database(DatabaseError::NotFound(what.to_string()))
}

#[derive(Default)]
pub struct InMemoryServiceGroupRepository {
    pub groups: RwLock<Vec<ServiceGroup>>,
    pub deleted: RwLock<Vec<(String, NaiveDate)>>,
}

impl InMemoryServiceGroupRepository {
    pub fn with_group(self, id: &str, name: &str, share_value: Decimal) -> Self {
        self.groups.write().unwrap().push(ServiceGroup {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            share_value,
            is_active: true,
            created_at: timestamp(),
            updated_at: timestamp(),
        });
        self
    }
}

#[async_trait]
impl ServiceGroupRepositoryTrait for InMemoryServiceGroupRepository {
    async fn create(&self, new_group: NewServiceGroup) -> Result<ServiceGroup> {
        let mut groups = self.groups.write().unwrap();
        let group = ServiceGroup {
            id: new_group
                .id
                .unwrap_or_else(|| format!("group-{}", groups.len() + 1)),
            name: new_group.name,
            description: new_group.description,
            share_value: new_group.share_value,
            is_active: new_group.is_active,
            created_at: timestamp(),
            updated_at: timestamp(),
        };
        groups.push(group.clone());
        Ok(group)
    }

    async fn update(&self, group_update: ServiceGroupUpdate) -> Result<ServiceGroup> {
        let mut groups = self.groups.write().unwrap();
        let group = groups
            .iter_mut()
            .find(|g| g.id == group_update.id)
            .ok_or_else(|| not_found(&group_update.id))?;
        group.name = group_update.name;
        group.description = group_update.description;
        group.share_value = group_update.share_value;
        group.is_active = group_update.is_active;
        Ok(group.clone())
    }

    async fn delete(&self, group_id: &str, as_of: NaiveDate) -> Result<usize> {
        let mut groups = self.groups.write().unwrap();
        let before = groups.len();
        groups.retain(|g| g.id != group_id);
        self.deleted
            .write()
            .unwrap()
            .push((group_id.to_string(), as_of));
        Ok(before - groups.len())
    }

    fn get_by_id(&self, group_id: &str) -> Result<ServiceGroup> {
        self.groups
            .read()
            .unwrap()
            .iter()
            .find(|g| g.id == group_id)
            .cloned()
            .ok_or_else(|| not_found(group_id))
    }

    fn list(&self, is_active_filter: Option<bool>) -> Result<Vec<ServiceGroup>> {
        let mut groups: Vec<ServiceGroup> = self
            .groups
            .read()
            .unwrap()
            .iter()
            .filter(|g| is_active_filter.map_or(true, |active| g.is_active == active))
            .cloned()
            .collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(groups)
    }
}

/// Rate repository without the storage uniqueness constraint, so tests can
/// plant duplicate active entries.
#[derive(Default)]
pub struct InMemoryRateRepository {
    pub entries: RwLock<Vec<RateEntry>>,
    pub fail_lookups: RwLock<bool>,
}

impl InMemoryRateRepository {
    pub fn with_rate(self, group_id: &str, period: HoldingPeriod, percentage: Decimal) -> Self {
        self.push(group_id, period, percentage, true);
        self
    }

    pub fn push(&self, group_id: &str, period: HoldingPeriod, percentage: Decimal, active: bool) {
        let mut entries = self.entries.write().unwrap();
        let id = format!("rate-{}", entries.len() + 1);
        entries.push(RateEntry {
            id,
            service_group_id: group_id.to_string(),
            holding_period: period,
            interest_percentage: percentage,
            is_active: active,
            created_at: timestamp(),
            updated_at: timestamp(),
        });
    }
}

impl RateCatalogTrait for InMemoryRateRepository {
    fn find_rate(&self, service_group_id: &str, period: HoldingPeriod) -> Result<Option<Decimal>> {
        if *self.fail_lookups.read().unwrap() {
            return Err(Error::Database(DatabaseError::QueryFailed(
                "database is locked".to_string(),
            )));
        }
        let entries = self.entries.read().unwrap();
        let matches: Vec<&RateEntry> = entries
            .iter()
            .filter(|e| {
                e.service_group_id == service_group_id && e.holding_period == period && e.is_active
            })
            .collect();
        match matches.as_slice() {
            [] => Ok(None),
            [entry] => Ok(Some(entry.interest_percentage)),
            _ => Err(Error::Integrity(format!(
                "{} active rate entries for group {} and {}",
                matches.len(),
                service_group_id,
                period
            ))),
        }
    }
}

#[async_trait]
impl RateRepositoryTrait for InMemoryRateRepository {
    async fn create(&self, new_entry: NewRateEntry) -> Result<RateEntry> {
        self.push(
            &new_entry.service_group_id,
            new_entry.holding_period,
            new_entry.interest_percentage,
            new_entry.is_active,
        );
        Ok(self.entries.read().unwrap().last().cloned().unwrap())
    }

    async fn update(&self, entry_update: RateEntryUpdate) -> Result<RateEntry> {
        let mut entries = self.entries.write().unwrap();
        let entry = entries
            .iter_mut()
            .find(|e| e.id == entry_update.id)
            .ok_or_else(|| not_found(&entry_update.id))?;
        entry.interest_percentage = entry_update.interest_percentage;
        entry.is_active = entry_update.is_active;
        Ok(entry.clone())
    }

    async fn delete(&self, entry_id: &str) -> Result<usize> {
        let mut entries = self.entries.write().unwrap();
        let before = entries.len();
        entries.retain(|e| e.id != entry_id);
        Ok(before - entries.len())
    }

    fn get_by_id(&self, entry_id: &str) -> Result<RateEntry> {
        self.entries
            .read()
            .unwrap()
            .iter()
            .find(|e| e.id == entry_id)
            .cloned()
            .ok_or_else(|| not_found(entry_id))
    }

    fn list(&self) -> Result<Vec<RateEntry>> {
        Ok(self.entries.read().unwrap().clone())
    }

    fn list_for_group(&self, service_group_id: &str) -> Result<Vec<RateEntry>> {
        Ok(self
            .entries
            .read()
            .unwrap()
            .iter()
            .filter(|e| e.service_group_id == service_group_id)
            .cloned()
            .collect())
    }
}

/// Investment repository that values records on every write, the way the
/// SQLite repository does inside its write transaction.
pub struct InMemoryInvestmentRepository {
    pub investments: RwLock<Vec<Investment>>,
    groups: Arc<InMemoryServiceGroupRepository>,
    rates: Arc<InMemoryRateRepository>,
}

impl InMemoryInvestmentRepository {
    pub fn new(
        groups: Arc<InMemoryServiceGroupRepository>,
        rates: Arc<InMemoryRateRepository>,
    ) -> Self {
        Self {
            investments: RwLock::new(Vec::new()),
            groups,
            rates,
        }
    }

    fn value(
        &self,
        investment: &Investment,
        as_of: NaiveDate,
    ) -> Result<Valuation> {
        let group = investment
            .service_group_id
            .as_deref()
            .and_then(|id| self.groups.get_by_id(id).ok());
        let inputs = investment.valuation_inputs(group.as_ref().map(|g| g.share_value));
        derive_with_lookup(&inputs, as_of, || match &group {
            Some(g) => self.rates.find_rate(&g.id, investment.holding_period),
            None => Ok(None),
        })
    }

    fn apply(investment: &mut Investment, valuation: Valuation) {
        investment.start_date = valuation.start_date;
        investment.invested_amount = valuation.invested_amount;
        investment.interest_rate_applied = valuation.interest_rate_applied;
        investment.final_return_amount = valuation.final_return_amount;
        investment.profit = valuation.profit;
        investment.accrued_profit = valuation.accrued_profit;
        investment.total_portfolio_value = valuation.total_portfolio_value;
        investment.end_date = valuation.end_date;
    }

    fn check_unique(&self, candidate: &Investment) -> Result<()> {
        let clash = self.investments.read().unwrap().iter().any(|inv| {
            inv.id != candidate.id
                && inv.user_id == candidate.user_id
                && inv.service_group_id.is_some()
                && inv.service_group_id == candidate.service_group_id
                && inv.holding_period == candidate.holding_period
        });
        if clash {
            return Err(Error::Database(DatabaseError::UniqueViolation(
                "UNIQUE constraint failed: investments.user_id, investments.service_group_id, investments.period_years".to_string(),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl InvestmentRepositoryTrait for InMemoryInvestmentRepository {
    async fn create(&self, new_investment: NewInvestment, as_of: NaiveDate) -> Result<Investment> {
        let id = new_investment.id.clone().unwrap_or_else(|| {
            format!("inv-{}", self.investments.read().unwrap().len() + 1)
        });
        let mut investment = Investment {
            id,
            user_id: new_investment.user_id,
            service_group_id: Some(new_investment.service_group_id),
            number_of_shares: new_investment.number_of_shares,
            holding_period: new_investment.holding_period,
            start_date: new_investment.start_date.unwrap_or(as_of),
            is_active: new_investment.is_active,
            invested_amount: Decimal::ZERO,
            interest_rate_applied: Decimal::ZERO,
            final_return_amount: Decimal::ZERO,
            profit: Decimal::ZERO,
            accrued_profit: Decimal::ZERO,
            total_portfolio_value: Decimal::ZERO,
            end_date: None,
            created_at: timestamp(),
            updated_at: timestamp(),
        };
        self.check_unique(&investment)?;
        let valuation = self.value(&investment, as_of)?;
        Self::apply(&mut investment, valuation);
        self.investments.write().unwrap().push(investment.clone());
        Ok(investment)
    }

    async fn update(
        &self,
        investment_update: InvestmentUpdate,
        as_of: NaiveDate,
    ) -> Result<Investment> {
        let mut investment = self.get_by_id(&investment_update.id)?;
        investment.service_group_id = Some(investment_update.service_group_id);
        investment.number_of_shares = investment_update.number_of_shares;
        investment.holding_period = investment_update.holding_period;
        investment.is_active = investment_update.is_active;
        self.check_unique(&investment)?;
        let valuation = self.value(&investment, as_of)?;
        Self::apply(&mut investment, valuation);

        let mut investments = self.investments.write().unwrap();
        if let Some(slot) = investments.iter_mut().find(|i| i.id == investment.id) {
            *slot = investment.clone();
        }
        Ok(investment)
    }

    async fn delete(&self, investment_id: &str) -> Result<usize> {
        let mut investments = self.investments.write().unwrap();
        let before = investments.len();
        investments.retain(|i| i.id != investment_id);
        Ok(before - investments.len())
    }

    async fn revalue_all(&self, as_of: NaiveDate) -> Result<usize> {
        let current = self.list()?;
        let mut revalued = Vec::with_capacity(current.len());
        for mut investment in current {
            let valuation = self.value(&investment, as_of)?;
            Self::apply(&mut investment, valuation);
            revalued.push(investment);
        }
        let count = revalued.len();
        *self.investments.write().unwrap() = revalued;
        Ok(count)
    }

    fn get_by_id(&self, investment_id: &str) -> Result<Investment> {
        self.investments
            .read()
            .unwrap()
            .iter()
            .find(|i| i.id == investment_id)
            .cloned()
            .ok_or_else(|| not_found(investment_id))
    }

    fn list(&self) -> Result<Vec<Investment>> {
        Ok(self.investments.read().unwrap().clone())
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<Investment>> {
        Ok(self
            .investments
            .read()
            .unwrap()
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect())
    }
}
