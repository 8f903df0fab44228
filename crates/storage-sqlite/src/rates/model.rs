//! Database models for rate entries.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use investledger_core::rates::{HoldingPeriod, RateEntry};
use investledger_core::{Error, Result};

use crate::utils::parse_decimal;

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
#[diesel(table_name = crate::schema::rate_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct RateEntryDB {
    pub id: String,
    pub service_group_id: String,
    pub period_years: i32,
    pub interest_percentage: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<RateEntryDB> for RateEntry {
    type Error = Error;

    fn try_from(db: RateEntryDB) -> Result<Self> {
        Ok(Self {
            holding_period: HoldingPeriod::try_from(db.period_years)?,
            interest_percentage: parse_decimal(&db.interest_percentage, "interest_percentage")?,
            id: db.id,
            service_group_id: db.service_group_id,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}
