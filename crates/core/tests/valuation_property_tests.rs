//! Property-based tests for the valuation engine.
//!
//! These tests verify that universal properties hold across all valid inputs,
//! using the `proptest` crate for random test case generation.

use chrono::{Days, NaiveDate};
use investledger_core::investments::{derive, ValuationInputs};
use investledger_core::rates::HoldingPeriod;
use proptest::prelude::*;
use rust_decimal::Decimal;

// =============================================================================
// Generators
// =============================================================================

fn arb_period() -> impl Strategy<Value = HoldingPeriod> {
    prop_oneof![
        Just(HoldingPeriod::ThreeYears),
        Just(HoldingPeriod::FiveYears),
        Just(HoldingPeriod::TenYears),
    ]
}

/// Decimal with the given number of places from an integer mantissa.
fn arb_decimal(max_mantissa: i64, scale: u32) -> impl Strategy<Value = Decimal> {
    (0..=max_mantissa).prop_map(move |m| Decimal::new(m, scale))
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0u64..20_000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(1990, 1, 1)
            .unwrap()
            .checked_add_days(Days::new(offset))
            .unwrap()
    })
}

fn arb_inputs() -> impl Strategy<Value = ValuationInputs> {
    (
        arb_decimal(10_000_000, 2), // shares
        arb_decimal(1_000_000, 3),  // share value
        arb_period(),
        arb_date(),
        any::<bool>(),
    )
        .prop_map(|(shares, share_value, period, start, active)| ValuationInputs {
            number_of_shares: shares,
            share_value: Some(share_value + Decimal::new(1, 3)),
            holding_period: period,
            start_date: Some(start),
            is_active: active,
        })
}

fn arb_rate() -> impl Strategy<Value = Option<Decimal>> {
    proptest::option::of(arb_decimal(300_000, 4))
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Same inputs and same evaluation date give the same valuation.
    #[test]
    fn prop_derive_is_idempotent(inputs in arb_inputs(), rate in arb_rate(), as_of in arb_date()) {
        let first = derive(&inputs, rate, as_of);
        let second = derive(&inputs, rate, as_of);
        prop_assert_eq!(first.to_owned(), second.clone());
        prop_assert_eq!(first.invested_amount.to_string(), second.invested_amount.to_string());
        prop_assert_eq!(first.total_portfolio_value.to_string(), second.total_portfolio_value.to_string());
    }

    /// Accrual never exceeds the projected profit at maturity.
    #[test]
    fn prop_accrual_bounded_by_profit(inputs in arb_inputs(), rate in arb_rate(), as_of in arb_date()) {
        let v = derive(&inputs, rate, as_of);
        prop_assert!(v.accrued_profit >= Decimal::ZERO);
        prop_assert!(v.accrued_profit <= v.profit);
        prop_assert_eq!(v.total_portfolio_value, v.invested_amount + v.accrued_profit);
    }

    /// Moving the evaluation date only touches the accrual fields.
    #[test]
    fn prop_maturity_fields_ignore_evaluation_date(
        inputs in arb_inputs(),
        rate in arb_rate(),
        a in arb_date(),
        b in arb_date(),
    ) {
        let x = derive(&inputs, rate, a);
        let y = derive(&inputs, rate, b);
        prop_assert_eq!(x.invested_amount, y.invested_amount);
        prop_assert_eq!(x.interest_rate_applied, y.interest_rate_applied);
        prop_assert_eq!(x.final_return_amount, y.final_return_amount);
        prop_assert_eq!(x.profit, y.profit);
        prop_assert_eq!(x.end_date, y.end_date);
    }

    /// Zero shares value to zero whatever the rate.
    #[test]
    fn prop_zero_shares_floor(inputs in arb_inputs(), rate in arb_rate(), as_of in arb_date()) {
        let inputs = ValuationInputs { number_of_shares: Decimal::ZERO, ..inputs };
        let v = derive(&inputs, rate, as_of);
        prop_assert_eq!(v.invested_amount, Decimal::ZERO);
        prop_assert_eq!(v.final_return_amount, Decimal::ZERO);
        prop_assert_eq!(v.profit, Decimal::ZERO);
        prop_assert_eq!(v.accrued_profit, Decimal::ZERO);
        prop_assert_eq!(v.total_portfolio_value, Decimal::ZERO);
        prop_assert_eq!(v.end_date, None);
    }

    /// Without an active rate the investment returns exactly its principal.
    #[test]
    fn prop_missing_rate_returns_principal(inputs in arb_inputs(), as_of in arb_date()) {
        let v = derive(&inputs, None, as_of);
        prop_assert_eq!(v.final_return_amount, v.invested_amount);
        prop_assert_eq!(v.profit, Decimal::ZERO);
        prop_assert_eq!(v.end_date, None);
    }

    /// Stored amounts always carry exactly two places, the rate four.
    #[test]
    fn prop_fields_are_quantized(inputs in arb_inputs(), rate in arb_rate(), as_of in arb_date()) {
        let v = derive(&inputs, rate, as_of);
        for amount in [v.invested_amount, v.final_return_amount, v.profit, v.accrued_profit, v.total_portfolio_value] {
            prop_assert_eq!(amount.scale(), 2);
        }
        prop_assert_eq!(v.interest_rate_applied.scale(), 4);
    }
}
