//! Simple-interest valuation of an investment.
//!
//! `derive` is a pure function of the investment's inputs, the rate the
//! catalog returned for its (group, period) and the evaluation date. Every
//! write of an investment runs it and stores the result; nothing here reads
//! the clock or the database.
//!
//! Amounts follow currency rounding (half away from zero) at 2 decimal
//! places, the applied rate is kept at 4.

use chrono::{Days, NaiveDate};
use log::warn;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::constants::{DAYS_PER_YEAR, MONEY_DECIMAL_PLACES, RATE_DECIMAL_PLACES};
use crate::errors::Result;
use crate::rates::HoldingPeriod;

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// The fields of an investment the valuation depends on.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuationInputs {
    pub number_of_shares: Decimal,
    /// Share value of the selected service group; `None` when the investment
    /// has no group.
    pub share_value: Option<Decimal>,
    pub holding_period: HoldingPeriod,
    pub start_date: Option<NaiveDate>,
    pub is_active: bool,
}

/// Every value the engine derives for an investment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Valuation {
    pub invested_amount: Decimal,
    pub interest_rate_applied: Decimal,
    /// Principal plus interest at maturity
    pub final_return_amount: Decimal,
    /// Projected profit at maturity
    pub profit: Decimal,
    /// Profit earned up to the evaluation date
    pub accrued_profit: Decimal,
    /// Principal plus accrued profit
    pub total_portfolio_value: Decimal,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl Valuation {
    /// Valuation of an investment that earns nothing: no group, no shares,
    /// or no active rate for its period.
    fn without_interest(invested_amount: Decimal, start_date: NaiveDate) -> Self {
        Valuation {
            invested_amount,
            interest_rate_applied: Decimal::ZERO,
            final_return_amount: invested_amount,
            profit: Decimal::ZERO,
            accrued_profit: Decimal::ZERO,
            total_portfolio_value: invested_amount,
            start_date,
            end_date: None,
        }
        .quantized()
    }

    /// Rescales every stored field to its declared precision.
    fn quantized(self) -> Self {
        Valuation {
            invested_amount: quantize_money(self.invested_amount),
            interest_rate_applied: quantize_rate(self.interest_rate_applied),
            final_return_amount: quantize_money(self.final_return_amount),
            profit: quantize_money(self.profit),
            accrued_profit: quantize_money(self.accrued_profit),
            total_portfolio_value: quantize_money(self.total_portfolio_value),
            ..self
        }
    }
}

/// Rounds half away from zero to 2 places and pads to exactly 2 places.
pub fn quantize_money(value: Decimal) -> Decimal {
    quantize(value, MONEY_DECIMAL_PLACES)
}

/// Rounds half away from zero to 4 places and pads to exactly 4 places.
pub fn quantize_rate(value: Decimal) -> Decimal {
    quantize(value, RATE_DECIMAL_PLACES)
}

fn quantize(value: Decimal, places: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(places);
    rounded
}

/// `shares * share_value`, rounded to cents. Zero when there is no group or
/// no positive share count; `None` on overflow.
pub fn invested_amount(inputs: &ValuationInputs) -> Option<Decimal> {
    match inputs.share_value {
        Some(share_value) if inputs.number_of_shares > Decimal::ZERO => inputs
            .number_of_shares
            .checked_mul(share_value)
            .map(quantize_money),
        _ => Some(quantize_money(Decimal::ZERO)),
    }
}

/// `start_date + years * 365.25` days, with the day count truncated.
pub fn maturity_date(start_date: NaiveDate, period: HoldingPeriod) -> Option<NaiveDate> {
    let days = (DAYS_PER_YEAR * Decimal::from(period.years()))
        .trunc()
        .to_u64()?;
    start_date.checked_add_days(Days::new(days))
}

/// Derives the full valuation of an investment as of `as_of`.
///
/// `rate` is the catalog percentage for the investment's group and period,
/// `None` if the catalog has no active entry. The result never fails: any
/// arithmetic overflow degrades to the no-interest valuation.
pub fn derive(inputs: &ValuationInputs, rate: Option<Decimal>, as_of: NaiveDate) -> Valuation {
    let start_date = inputs.start_date.unwrap_or(as_of);

    let principal = match invested_amount(inputs) {
        Some(principal) => principal,
        None => {
            warn!(
                "Invested amount overflowed for {} shares; valuing at zero",
                inputs.number_of_shares
            );
            return Valuation::without_interest(Decimal::ZERO, start_date);
        }
    };
    if principal <= Decimal::ZERO {
        return Valuation::without_interest(Decimal::ZERO, start_date);
    }

    let Some(rate) = rate else {
        return Valuation::without_interest(principal, start_date);
    };

    match derive_with_interest(inputs, principal, rate, start_date, as_of) {
        Some(valuation) => valuation,
        None => {
            warn!(
                "Valuation arithmetic failed (principal {}, rate {}%); valuing without interest",
                principal, rate
            );
            Valuation::without_interest(principal, start_date)
        }
    }
}

fn derive_with_interest(
    inputs: &ValuationInputs,
    principal: Decimal,
    rate: Decimal,
    start_date: NaiveDate,
    as_of: NaiveDate,
) -> Option<Valuation> {
    // the applied rate is the stored one
    let rate = quantize_rate(rate);
    let fraction = rate.checked_div(ONE_HUNDRED)?;
    let years = Decimal::from(inputs.holding_period.years());

    let growth = Decimal::ONE.checked_add(fraction.checked_mul(years)?)?;
    let final_return_amount = quantize_money(principal.checked_mul(growth)?);
    let profit = quantize_money(final_return_amount.checked_sub(principal)?);
    let end_date = maturity_date(start_date, inputs.holding_period)?;

    let accrued_profit = if inputs.is_active {
        accrued_profit(principal, fraction, start_date, end_date, as_of)?
    } else {
        Decimal::ZERO
    };
    let total_portfolio_value = quantize_money(principal.checked_add(accrued_profit)?);

    Some(
        Valuation {
            invested_amount: principal,
            interest_rate_applied: rate,
            final_return_amount,
            profit,
            accrued_profit,
            total_portfolio_value,
            start_date,
            end_date: Some(end_date),
        }
        .quantized(),
    )
}

/// Profit earned linearly from `start_date` up to `as_of`, capped at maturity.
fn accrued_profit(
    principal: Decimal,
    fraction: Decimal,
    start_date: NaiveDate,
    end_date: NaiveDate,
    as_of: NaiveDate,
) -> Option<Decimal> {
    let effective_date = as_of.min(end_date);
    let days_elapsed = (effective_date - start_date).num_days().max(0);
    if days_elapsed == 0 {
        return Some(quantize_money(Decimal::ZERO));
    }

    let earned = principal
        .checked_mul(fraction)?
        .checked_mul(Decimal::from(days_elapsed))?
        .checked_div(DAYS_PER_YEAR)?;
    Some(quantize_money(earned))
}

/// Runs `derive`, resolving the rate through `lookup` only when the
/// investment has a principal to earn on.
///
/// A lookup that finds nothing, or fails for any reason other than an
/// integrity violation, yields the no-interest valuation so the record can
/// still be written. Integrity violations (two active rates for one group
/// and period) are returned to the caller.
pub fn derive_with_lookup<F>(inputs: &ValuationInputs, as_of: NaiveDate, lookup: F) -> Result<Valuation>
where
    F: FnOnce() -> Result<Option<Decimal>>,
{
    let has_principal = invested_amount(inputs).is_some_and(|amount| amount > Decimal::ZERO);
    if !has_principal {
        return Ok(derive(inputs, None, as_of));
    }

    let rate = match lookup() {
        Ok(rate) => rate,
        Err(e) if e.is_integrity() => return Err(e),
        Err(e) => {
            warn!("Rate lookup failed, valuing without interest: {}", e);
            None
        }
    };
    Ok(derive(inputs, rate, as_of))
}
