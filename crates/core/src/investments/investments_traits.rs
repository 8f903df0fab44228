//! Investment repository and service traits.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::investments_model::{Investment, InvestmentUpdate, NewInvestment, PortfolioSummary};
use super::valuation::Valuation;
use crate::errors::Result;

/// Persistence contract for investments.
///
/// Every write (create, update, bulk revaluation) must run the valuation
/// engine inside the same transaction as the write and store its result;
/// implementations never persist derived fields from any other source.
#[async_trait]
pub trait InvestmentRepositoryTrait: Send + Sync {
    /// Inserts a new investment valued as of `as_of`.
    async fn create(&self, new_investment: NewInvestment, as_of: NaiveDate)
        -> Result<Investment>;

    /// Updates an investment and revalues it as of `as_of`.
    async fn update(&self, investment_update: InvestmentUpdate, as_of: NaiveDate)
        -> Result<Investment>;

    async fn delete(&self, investment_id: &str) -> Result<usize>;

    /// Revalues every stored investment as of `as_of`.
    ///
    /// Returns the number of records rewritten.
    async fn revalue_all(&self, as_of: NaiveDate) -> Result<usize>;

    fn get_by_id(&self, investment_id: &str) -> Result<Investment>;

    fn list(&self) -> Result<Vec<Investment>>;

    fn list_for_user(&self, user_id: &str) -> Result<Vec<Investment>>;
}

/// Business operations on investments.
#[async_trait]
pub trait InvestmentServiceTrait: Send + Sync {
    async fn create_investment(&self, new_investment: NewInvestment) -> Result<Investment>;
    async fn update_investment(&self, investment_update: InvestmentUpdate) -> Result<Investment>;
    async fn delete_investment(&self, investment_id: &str) -> Result<()>;
    async fn revalue_all(&self) -> Result<usize>;
    fn get_investment(&self, investment_id: &str) -> Result<Investment>;
    fn get_investments(&self) -> Result<Vec<Investment>>;
    fn get_investments_for_user(&self, user_id: &str) -> Result<Vec<Investment>>;
    /// Values a prospective investment without storing it.
    fn preview_valuation(&self, new_investment: &NewInvestment) -> Result<Valuation>;
    fn get_portfolio_summary(&self, user_id: &str) -> Result<PortfolioSummary>;
}
