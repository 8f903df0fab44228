use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use investledger_core::errors::{DatabaseError, Error};
use investledger_core::investments::{
    derive_with_lookup, Investment, InvestmentRepositoryTrait, InvestmentUpdate, NewInvestment,
    Valuation, ValuationInputs,
};
use investledger_core::Result;

use super::model::InvestmentDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::rates::find_active_rate;
use crate::schema::investments;
use crate::service_groups::find_group;
use crate::utils::{decimal_to_db, now};

pub struct InvestmentRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl InvestmentRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        InvestmentRepository { pool, writer }
    }
}

/// Share value of the group, `None` when there is no group or it is gone.
fn group_share_value(conn: &mut SqliteConnection, group_id: Option<&str>) -> Result<Option<Decimal>> {
    match group_id {
        Some(id) => Ok(find_group(conn, id)?.map(|group| group.share_value)),
        None => Ok(None),
    }
}

/// Runs the valuation engine against the catalog as seen by `conn`.
///
/// Always called from inside a writer job, so the rate read and the row
/// write share one transaction.
fn derive_for_write(
    conn: &mut SqliteConnection,
    group_id: Option<&str>,
    inputs: &ValuationInputs,
    as_of: NaiveDate,
) -> Result<Valuation> {
    derive_with_lookup(inputs, as_of, || match group_id {
        Some(id) => find_active_rate(conn, id, inputs.holding_period),
        None => Ok(None),
    })
}

/// Re-derives stored investments as of `as_of` on the writer's connection.
///
/// `ids` restricts the pass to the given rows; `None` revalues every row.
/// Group share values are read once per group.
pub(crate) fn revalue_in_transaction(
    conn: &mut SqliteConnection,
    ids: Option<&[String]>,
    as_of: NaiveDate,
) -> Result<usize> {
    let mut query = investments::table
        .select(InvestmentDB::as_select())
        .into_boxed();
    if let Some(ids) = ids {
        if ids.is_empty() {
            return Ok(0);
        }
        query = query.filter(investments::id.eq_any(ids));
    }
    let rows = query.load::<InvestmentDB>(conn).into_core()?;

    let mut share_values: HashMap<String, Option<Decimal>> = HashMap::new();
    let timestamp = now();
    let mut revalued = 0;
    for row in rows {
        let investment = Investment::try_from(row.clone())?;
        let share_value = match investment.service_group_id.as_deref() {
            Some(group_id) => match share_values.get(group_id).copied() {
                Some(value) => value,
                None => {
                    let value = group_share_value(conn, Some(group_id))?;
                    share_values.insert(group_id.to_string(), value);
                    value
                }
            },
            None => None,
        };
        let inputs = investment.valuation_inputs(share_value);
        let valuation = derive_for_write(
            conn,
            investment.service_group_id.as_deref(),
            &inputs,
            as_of,
        )?;

        let updated = InvestmentDB {
            updated_at: timestamp,
            ..row
        }
        .with_valuation(&valuation);
        diesel::update(investments::table.find(&updated.id))
            .set(&updated)
            .execute(conn)
            .into_core()?;
        revalued += 1;
    }
    Ok(revalued)
}

fn not_found(investment_id: &str) -> Error {
    Error::Database(DatabaseError::NotFound(format!(
        "Investment {}",
        investment_id
    )))
}

#[async_trait]
impl InvestmentRepositoryTrait for InvestmentRepository {
    async fn create(&self, new_investment: NewInvestment, as_of: NaiveDate) -> Result<Investment> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Investment> {
                let group_id = new_investment.service_group_id.clone();
                let share_value = group_share_value(conn, Some(&group_id))?;
                let inputs = new_investment.valuation_inputs(share_value);
                let valuation = derive_for_write(conn, Some(&group_id), &inputs, as_of)?;

                let timestamp = now();
                let row = InvestmentDB {
                    id: new_investment
                        .id
                        .unwrap_or_else(|| Uuid::new_v4().to_string()),
                    user_id: new_investment.user_id,
                    service_group_id: Some(group_id),
                    number_of_shares: decimal_to_db(new_investment.number_of_shares),
                    period_years: new_investment.holding_period.years(),
                    start_date: valuation.start_date,
                    is_active: new_investment.is_active,
                    invested_amount: String::new(),
                    interest_rate_applied: String::new(),
                    final_return_amount: String::new(),
                    profit: String::new(),
                    accrued_profit: String::new(),
                    total_portfolio_value: String::new(),
                    end_date: None,
                    created_at: timestamp,
                    updated_at: timestamp,
                }
                .with_valuation(&valuation);

                let inserted = diesel::insert_into(investments::table)
                    .values(&row)
                    .returning(InvestmentDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                debug!(
                    "Created investment {} valued at {}",
                    inserted.id, inserted.total_portfolio_value
                );
                Investment::try_from(inserted)
            })
            .await
    }

    async fn update(
        &self,
        investment_update: InvestmentUpdate,
        as_of: NaiveDate,
    ) -> Result<Investment> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Investment> {
                let existing = investments::table
                    .find(&investment_update.id)
                    .select(InvestmentDB::as_select())
                    .first::<InvestmentDB>(conn)
                    .optional()
                    .into_core()?
                    .ok_or_else(|| not_found(&investment_update.id))?;

                let group_id = investment_update.service_group_id;
                let share_value = group_share_value(conn, Some(&group_id))?;
                let inputs = ValuationInputs {
                    number_of_shares: investment_update.number_of_shares,
                    share_value,
                    holding_period: investment_update.holding_period,
                    start_date: Some(existing.start_date),
                    is_active: investment_update.is_active,
                };
                let valuation = derive_for_write(conn, Some(&group_id), &inputs, as_of)?;

                let row = InvestmentDB {
                    service_group_id: Some(group_id),
                    number_of_shares: decimal_to_db(investment_update.number_of_shares),
                    period_years: investment_update.holding_period.years(),
                    is_active: investment_update.is_active,
                    updated_at: now(),
                    ..existing
                }
                .with_valuation(&valuation);

                let updated = diesel::update(investments::table.find(&row.id))
                    .set(&row)
                    .returning(InvestmentDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                Investment::try_from(updated)
            })
            .await
    }

    async fn delete(&self, investment_id: &str) -> Result<usize> {
        let investment_id = investment_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(investments::table.find(investment_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    async fn revalue_all(&self, as_of: NaiveDate) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                revalue_in_transaction(conn, None, as_of)
            })
            .await
    }

    fn get_by_id(&self, investment_id: &str) -> Result<Investment> {
        let mut conn = get_connection(&self.pool)?;
        investments::table
            .find(investment_id)
            .select(InvestmentDB::as_select())
            .first::<InvestmentDB>(&mut conn)
            .optional()
            .into_core()?
            .ok_or_else(|| not_found(investment_id))
            .and_then(Investment::try_from)
    }

    fn list(&self) -> Result<Vec<Investment>> {
        let mut conn = get_connection(&self.pool)?;
        investments::table
            .select(InvestmentDB::as_select())
            .order((investments::start_date.desc(), investments::created_at.desc()))
            .load::<InvestmentDB>(&mut conn)
            .into_core()?
            .into_iter()
            .map(Investment::try_from)
            .collect()
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<Investment>> {
        let mut conn = get_connection(&self.pool)?;
        investments::table
            .filter(investments::user_id.eq(user_id))
            .select(InvestmentDB::as_select())
            .order((investments::start_date.desc(), investments::created_at.desc()))
            .load::<InvestmentDB>(&mut conn)
            .into_core()?
            .into_iter()
            .map(Investment::try_from)
            .collect()
    }
}
