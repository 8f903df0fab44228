use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Default timezone for valuation dates.
/// Accrual is counted in calendar days of the ledger's home market (AED).
pub const DEFAULT_VALUATION_TZ: Tz = chrono_tz::Asia::Dubai;

/// Converts a UTC instant to a valuation date in the given timezone.
///
/// Use this whenever you need to derive a "business date" from a timestamp.
pub fn valuation_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Convenience function that uses the default valuation timezone.
pub fn valuation_date_today() -> NaiveDate {
    valuation_date_from_utc(Utc::now(), DEFAULT_VALUATION_TZ)
}

/// Source of "today" for services that value investments.
///
/// Services never read the wall clock directly; they ask their clock, so
/// tests can pin the evaluation date.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;

    fn name(&self) -> &str {
        "Clock"
    }
}

/// Wall clock in the default valuation timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        valuation_date_today()
    }

    fn name(&self) -> &str {
        "SystemClock"
    }
}

/// A clock frozen on one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }

    fn name(&self) -> &str {
        "FixedClock"
    }
}
