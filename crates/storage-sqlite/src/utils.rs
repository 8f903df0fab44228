//! Helpers for mapping between SQLite TEXT columns and domain values.

use std::str::FromStr;

use chrono::{NaiveDateTime, Utc};
use investledger_core::errors::Error;
use investledger_core::Result;
use rust_decimal::Decimal;

/// Parses a decimal stored as TEXT.
///
/// Money and rate columns are always written by this crate in plain decimal
/// notation, so anything else is reported instead of guessed at.
pub fn parse_decimal(value: &str, field_name: &str) -> Result<Decimal> {
    Decimal::from_str(value.trim()).map_err(|e| {
        log::error!("Failed to parse {} '{}' as decimal: {}", field_name, value, e);
        Error::from(e)
    })
}

/// Renders a decimal for storage, keeping its scale ("1150.00", not "1150").
pub fn decimal_to_db(value: Decimal) -> String {
    value.to_string()
}

pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
