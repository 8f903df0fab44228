//! Investment domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::valuation::{Valuation, ValuationInputs};
use crate::rates::HoldingPeriod;
use crate::{errors::ValidationError, Error, Result};

/// One purchase of shares in a service group by a user, with the values the
/// valuation engine derived for it on its last write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: String,
    pub user_id: String,
    /// `None` once the service group has been deleted
    pub service_group_id: Option<String>,
    pub number_of_shares: Decimal,
    pub holding_period: HoldingPeriod,
    pub start_date: NaiveDate,
    pub is_active: bool,
    pub invested_amount: Decimal,
    pub interest_rate_applied: Decimal,
    pub final_return_amount: Decimal,
    pub profit: Decimal,
    pub accrued_profit: Decimal,
    pub total_portfolio_value: Decimal,
    pub end_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Investment {
    /// Inputs for revaluing this record against a group share value.
    pub fn valuation_inputs(&self, share_value: Option<Decimal>) -> ValuationInputs {
        ValuationInputs {
            number_of_shares: self.number_of_shares,
            share_value,
            holding_period: self.holding_period,
            start_date: Some(self.start_date),
            is_active: self.is_active,
        }
    }

    /// The derived part of the record.
    pub fn valuation(&self) -> Valuation {
        Valuation {
            invested_amount: self.invested_amount,
            interest_rate_applied: self.interest_rate_applied,
            final_return_amount: self.final_return_amount,
            profit: self.profit,
            accrued_profit: self.accrued_profit,
            total_portfolio_value: self.total_portfolio_value,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// Input model for creating an investment.
///
/// Carries only user-supplied fields; every derived amount is computed
/// by the valuation engine on write.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvestment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub service_group_id: String,
    pub number_of_shares: Decimal,
    pub holding_period: HoldingPeriod,
    /// Defaults to the valuation date when absent
    pub start_date: Option<NaiveDate>,
    pub is_active: bool,
}

impl NewInvestment {
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "userId".to_string(),
            )));
        }
        if self.service_group_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "serviceGroupId".to_string(),
            )));
        }
        validate_shares(self.number_of_shares)
    }

    pub fn valuation_inputs(&self, share_value: Option<Decimal>) -> ValuationInputs {
        ValuationInputs {
            number_of_shares: self.number_of_shares,
            share_value,
            holding_period: self.holding_period,
            start_date: self.start_date,
            is_active: self.is_active,
        }
    }
}

/// Input model for updating an investment. The start date is fixed at
/// creation and cannot be changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentUpdate {
    pub id: String,
    pub service_group_id: String,
    pub number_of_shares: Decimal,
    pub holding_period: HoldingPeriod,
    pub is_active: bool,
}

impl InvestmentUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Investment ID is required for updates".to_string(),
            )));
        }
        if self.service_group_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "serviceGroupId".to_string(),
            )));
        }
        validate_shares(self.number_of_shares)
    }
}

fn validate_shares(shares: Decimal) -> Result<()> {
    if shares < Decimal::ZERO {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "Number of shares cannot be negative.".to_string(),
        )));
    }
    Ok(())
}

/// Totals over a user's stored investments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub user_id: String,
    pub investment_count: usize,
    pub active_investment_count: usize,
    pub total_invested: Decimal,
    pub total_final_return: Decimal,
    pub total_projected_profit: Decimal,
    pub total_accrued_profit: Decimal,
    pub total_portfolio_value: Decimal,
}

impl PortfolioSummary {
    pub fn from_investments(user_id: &str, investments: &[Investment]) -> Self {
        investments.iter().fold(
            PortfolioSummary {
                user_id: user_id.to_string(),
                ..Default::default()
            },
            |mut summary, inv| {
                summary.investment_count += 1;
                if inv.is_active {
                    summary.active_investment_count += 1;
                }
                summary.total_invested += inv.invested_amount;
                summary.total_final_return += inv.final_return_amount;
                summary.total_projected_profit += inv.profit;
                summary.total_accrued_profit += inv.accrued_profit;
                summary.total_portfolio_value += inv.total_portfolio_value;
                summary
            },
        )
    }
}
