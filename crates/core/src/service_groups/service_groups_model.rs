//! Service group domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Error, Result};

/// An investment product line with its own per-share price and rate table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceGroup {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Price of one share, in currency units
    pub share_value: Decimal,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a new service group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewServiceGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub share_value: Decimal,
    pub is_active: bool,
}

impl NewServiceGroup {
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_share_value(self.share_value)
    }
}

/// Input model for updating an existing service group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceGroupUpdate {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub share_value: Decimal,
    pub is_active: bool,
}

impl ServiceGroupUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Service group ID is required for updates".to_string(),
            )));
        }
        validate_name(&self.name)?;
        validate_share_value(self.share_value)
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "Service group name cannot be empty".to_string(),
        )));
    }
    Ok(())
}

fn validate_share_value(share_value: Decimal) -> Result<()> {
    if share_value <= Decimal::ZERO {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "Share value must be greater than zero".to_string(),
        )));
    }
    Ok(())
}
