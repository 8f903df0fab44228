use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::error;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use investledger_core::errors::{DatabaseError, Error};
use investledger_core::rates::{
    HoldingPeriod, NewRateEntry, RateCatalogTrait, RateEntry, RateEntryUpdate,
    RateRepositoryTrait,
};
use investledger_core::Result;

use super::model::RateEntryDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{rate_entries, service_groups};
use crate::utils::{decimal_to_db, now, parse_decimal};

pub struct RateRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl RateRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        RateRepository { pool, writer }
    }
}

/// Looks up the active rate for `(group_id, period)` on an open connection.
///
/// Two active rows for the same pair are reported as an integrity error;
/// the unique index normally makes that impossible, but a catalog restored
/// from elsewhere may not carry it.
pub(crate) fn find_active_rate(
    conn: &mut SqliteConnection,
    group_id: &str,
    period: HoldingPeriod,
) -> Result<Option<Decimal>> {
    let matches = rate_entries::table
        .filter(rate_entries::service_group_id.eq(group_id))
        .filter(rate_entries::period_years.eq(period.years()))
        .filter(rate_entries::is_active.eq(true))
        .select(rate_entries::interest_percentage)
        .limit(2)
        .load::<String>(conn)
        .into_core()?;

    match matches.as_slice() {
        [] => Ok(None),
        [rate] => parse_decimal(rate, "interest_percentage").map(Some),
        _ => {
            error!(
                "Multiple active rates for service group {} and period {}",
                group_id, period
            );
            Err(Error::Integrity(format!(
                "More than one active rate for service group {} and {}",
                group_id, period
            )))
        }
    }
}

fn load_entries(rows: Vec<RateEntryDB>) -> Result<Vec<RateEntry>> {
    rows.into_iter().map(RateEntry::try_from).collect()
}

impl RateCatalogTrait for RateRepository {
    fn find_rate(&self, service_group_id: &str, period: HoldingPeriod) -> Result<Option<Decimal>> {
        let mut conn = get_connection(&self.pool)?;
        find_active_rate(&mut conn, service_group_id, period)
    }
}

#[async_trait]
impl RateRepositoryTrait for RateRepository {
    async fn create(&self, new_entry: NewRateEntry) -> Result<RateEntry> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<RateEntry> {
                let timestamp = now();
                let row = RateEntryDB {
                    id: new_entry.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
                    service_group_id: new_entry.service_group_id,
                    period_years: new_entry.holding_period.years(),
                    interest_percentage: decimal_to_db(new_entry.interest_percentage),
                    is_active: new_entry.is_active,
                    created_at: timestamp,
                    updated_at: timestamp,
                };
                let inserted = diesel::insert_into(rate_entries::table)
                    .values(&row)
                    .returning(RateEntryDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                RateEntry::try_from(inserted)
            })
            .await
    }

    async fn update(&self, entry_update: RateEntryUpdate) -> Result<RateEntry> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<RateEntry> {
                let updated = diesel::update(rate_entries::table.find(&entry_update.id))
                    .set((
                        rate_entries::interest_percentage
                            .eq(decimal_to_db(entry_update.interest_percentage)),
                        rate_entries::is_active.eq(entry_update.is_active),
                        rate_entries::updated_at.eq(now()),
                    ))
                    .returning(RateEntryDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                RateEntry::try_from(updated)
            })
            .await
    }

    async fn delete(&self, entry_id: &str) -> Result<usize> {
        let entry_id = entry_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(rate_entries::table.find(entry_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    fn get_by_id(&self, entry_id: &str) -> Result<RateEntry> {
        let mut conn = get_connection(&self.pool)?;
        rate_entries::table
            .find(entry_id)
            .select(RateEntryDB::as_select())
            .first::<RateEntryDB>(&mut conn)
            .optional()
            .into_core()?
            .ok_or_else(|| {
                Error::Database(DatabaseError::NotFound(format!("Rate entry {}", entry_id)))
            })
            .and_then(RateEntry::try_from)
    }

    fn list(&self) -> Result<Vec<RateEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = rate_entries::table
            .inner_join(service_groups::table)
            .order((service_groups::name.asc(), rate_entries::period_years.asc()))
            .select(RateEntryDB::as_select())
            .load::<RateEntryDB>(&mut conn)
            .into_core()?;
        load_entries(rows)
    }

    fn list_for_group(&self, service_group_id: &str) -> Result<Vec<RateEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = rate_entries::table
            .filter(rate_entries::service_group_id.eq(service_group_id))
            .order(rate_entries::period_years.asc())
            .select(RateEntryDB::as_select())
            .load::<RateEntryDB>(&mut conn)
            .into_core()?;
        load_entries(rows)
    }
}
