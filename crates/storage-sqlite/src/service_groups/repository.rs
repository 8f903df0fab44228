use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;
use uuid::Uuid;

use investledger_core::errors::{DatabaseError, Error};
use investledger_core::service_groups::{
    NewServiceGroup, ServiceGroup, ServiceGroupRepositoryTrait, ServiceGroupUpdate,
};
use investledger_core::Result;

use super::model::ServiceGroupDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::investments::revalue_in_transaction;
use crate::schema::{investments, rate_entries, service_groups};
use crate::utils::{decimal_to_db, now};

pub struct ServiceGroupRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ServiceGroupRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        ServiceGroupRepository { pool, writer }
    }
}

/// Loads a group inside an open connection or transaction.
pub(crate) fn find_group(conn: &mut SqliteConnection, group_id: &str) -> Result<Option<ServiceGroup>> {
    service_groups::table
        .find(group_id)
        .select(ServiceGroupDB::as_select())
        .first::<ServiceGroupDB>(conn)
        .optional()
        .into_core()?
        .map(ServiceGroup::try_from)
        .transpose()
}

fn not_found(group_id: &str) -> Error {
    Error::Database(DatabaseError::NotFound(format!(
        "Service group {}",
        group_id
    )))
}

#[async_trait]
impl ServiceGroupRepositoryTrait for ServiceGroupRepository {
    async fn create(&self, new_group: NewServiceGroup) -> Result<ServiceGroup> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<ServiceGroup> {
                let timestamp = now();
                let row = ServiceGroupDB {
                    id: new_group.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
                    name: new_group.name.trim().to_string(),
                    description: new_group.description,
                    share_value: decimal_to_db(new_group.share_value),
                    is_active: new_group.is_active,
                    created_at: timestamp,
                    updated_at: timestamp,
                };
                let inserted = diesel::insert_into(service_groups::table)
                    .values(&row)
                    .returning(ServiceGroupDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                ServiceGroup::try_from(inserted)
            })
            .await
    }

    async fn update(&self, group_update: ServiceGroupUpdate) -> Result<ServiceGroup> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<ServiceGroup> {
                let existing = service_groups::table
                    .find(&group_update.id)
                    .select(ServiceGroupDB::as_select())
                    .first::<ServiceGroupDB>(conn)
                    .optional()
                    .into_core()?
                    .ok_or_else(|| not_found(&group_update.id))?;
                let row = ServiceGroupDB {
                    name: group_update.name.trim().to_string(),
                    description: group_update.description,
                    share_value: decimal_to_db(group_update.share_value),
                    is_active: group_update.is_active,
                    updated_at: now(),
                    ..existing
                };
                diesel::update(service_groups::table.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                ServiceGroup::try_from(row)
            })
            .await
    }

    async fn delete(&self, group_id: &str, as_of: NaiveDate) -> Result<usize> {
        let group_id = group_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let affected: Vec<String> = investments::table
                    .filter(investments::service_group_id.eq(&group_id))
                    .select(investments::id)
                    .load::<String>(conn)
                    .into_core()?;

                diesel::delete(
                    rate_entries::table.filter(rate_entries::service_group_id.eq(&group_id)),
                )
                .execute(conn)
                .into_core()?;
                diesel::update(
                    investments::table.filter(investments::service_group_id.eq(&group_id)),
                )
                .set(investments::service_group_id.eq(None::<String>))
                .execute(conn)
                .into_core()?;
                let deleted = diesel::delete(service_groups::table.find(&group_id))
                    .execute(conn)
                    .into_core()?;

                let revalued = revalue_in_transaction(conn, Some(affected.as_slice()), as_of)?;
                debug!(
                    "Deleted service group {}; revalued {} detached investments",
                    group_id, revalued
                );
                Ok(deleted)
            })
            .await
    }

    fn get_by_id(&self, group_id: &str) -> Result<ServiceGroup> {
        let mut conn = get_connection(&self.pool)?;
        find_group(&mut conn, group_id)?.ok_or_else(|| not_found(group_id))
    }

    fn list(&self, is_active_filter: Option<bool>) -> Result<Vec<ServiceGroup>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = service_groups::table
            .select(ServiceGroupDB::as_select())
            .order(service_groups::name.asc())
            .into_boxed();
        if let Some(active) = is_active_filter {
            query = query.filter(service_groups::is_active.eq(active));
        }
        query
            .load::<ServiceGroupDB>(&mut conn)
            .into_core()?
            .into_iter()
            .map(ServiceGroup::try_from)
            .collect()
    }
}
