//! Database models for service groups.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use investledger_core::service_groups::ServiceGroup;
use investledger_core::{Error, Result};

use crate::utils::parse_decimal;

/// Database model for service groups
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
#[diesel(table_name = crate::schema::service_groups)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
#[serde(rename_all = "camelCase")]
pub struct ServiceGroupDB {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub share_value: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<ServiceGroupDB> for ServiceGroup {
    type Error = Error;

    fn try_from(db: ServiceGroupDB) -> Result<Self> {
        Ok(Self {
            share_value: parse_decimal(&db.share_value, "share_value")?,
            id: db.id,
            name: db.name,
            description: db.description,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}
