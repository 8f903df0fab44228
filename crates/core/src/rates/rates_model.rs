//! Rate entry domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::HoldingPeriod;
use crate::constants::RATE_DECIMAL_PLACES;
use crate::{errors::ValidationError, Error, Result};

/// The interest rate a service group offers for one holding period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RateEntry {
    pub id: String,
    pub service_group_id: String,
    pub holding_period: HoldingPeriod,
    /// Annual simple-interest percentage, e.g. `5.0` for 5 %
    pub interest_percentage: Decimal,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRateEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub service_group_id: String,
    pub holding_period: HoldingPeriod,
    pub interest_percentage: Decimal,
    pub is_active: bool,
}

impl NewRateEntry {
    pub fn validate(&self) -> Result<()> {
        if self.service_group_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "serviceGroupId".to_string(),
            )));
        }
        validate_percentage(self.interest_percentage)
    }
}

/// Updates the rate or active flag of an entry. The group and period of an
/// entry identify it in the catalog and stay fixed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateEntryUpdate {
    pub id: String,
    pub interest_percentage: Decimal,
    pub is_active: bool,
}

impl RateEntryUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Rate entry ID is required for updates".to_string(),
            )));
        }
        validate_percentage(self.interest_percentage)
    }
}

fn validate_percentage(percentage: Decimal) -> Result<()> {
    if percentage < Decimal::ZERO {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "Interest percentage cannot be negative".to_string(),
        )));
    }
    if percentage.round_dp(RATE_DECIMAL_PLACES) != percentage {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Interest percentage supports at most {} decimal places",
            RATE_DECIMAL_PLACES
        ))));
    }
    Ok(())
}
