//! Database models for investments.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use investledger_core::investments::{Investment, Valuation};
use investledger_core::rates::HoldingPeriod;
use investledger_core::{Error, Result};

use crate::utils::{decimal_to_db, parse_decimal};

/// Database model for investments.
///
/// The derived columns are only ever written from a `Valuation`; see
/// [`InvestmentDB::with_valuation`].
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::investments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentDB {
    pub id: String,
    pub user_id: String,
    pub service_group_id: Option<String>,
    pub number_of_shares: String,
    pub period_years: i32,
    pub start_date: NaiveDate,
    pub is_active: bool,
    pub invested_amount: String,
    pub interest_rate_applied: String,
    pub final_return_amount: String,
    pub profit: String,
    pub accrued_profit: String,
    pub total_portfolio_value: String,
    pub end_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl InvestmentDB {
    /// Overwrites every derived column (and the resolved start date) with
    /// the engine's output.
    pub fn with_valuation(self, valuation: &Valuation) -> Self {
        InvestmentDB {
            start_date: valuation.start_date,
            invested_amount: decimal_to_db(valuation.invested_amount),
            interest_rate_applied: decimal_to_db(valuation.interest_rate_applied),
            final_return_amount: decimal_to_db(valuation.final_return_amount),
            profit: decimal_to_db(valuation.profit),
            accrued_profit: decimal_to_db(valuation.accrued_profit),
            total_portfolio_value: decimal_to_db(valuation.total_portfolio_value),
            end_date: valuation.end_date,
            ..self
        }
    }
}

impl TryFrom<InvestmentDB> for Investment {
    type Error = Error;

    fn try_from(db: InvestmentDB) -> Result<Self> {
        Ok(Self {
            number_of_shares: parse_decimal(&db.number_of_shares, "number_of_shares")?,
            holding_period: HoldingPeriod::try_from(db.period_years)?,
            invested_amount: parse_decimal(&db.invested_amount, "invested_amount")?,
            interest_rate_applied: parse_decimal(
                &db.interest_rate_applied,
                "interest_rate_applied",
            )?,
            final_return_amount: parse_decimal(&db.final_return_amount, "final_return_amount")?,
            profit: parse_decimal(&db.profit, "profit")?,
            accrued_profit: parse_decimal(&db.accrued_profit, "accrued_profit")?,
            total_portfolio_value: parse_decimal(
                &db.total_portfolio_value,
                "total_portfolio_value",
            )?,
            id: db.id,
            user_id: db.user_id,
            service_group_id: db.service_group_id,
            start_date: db.start_date,
            is_active: db.is_active,
            end_date: db.end_date,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}
