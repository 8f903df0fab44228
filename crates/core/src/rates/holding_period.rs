use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, ValidationError};

/// The fixed term an investment is locked for.
///
/// Serialized as its year count (`3`, `5` or `10`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum HoldingPeriod {
    ThreeYears,
    FiveYears,
    TenYears,
}

impl HoldingPeriod {
    pub const ALL: [HoldingPeriod; 3] = [
        HoldingPeriod::ThreeYears,
        HoldingPeriod::FiveYears,
        HoldingPeriod::TenYears,
    ];

    pub fn years(self) -> i32 {
        match self {
            HoldingPeriod::ThreeYears => 3,
            HoldingPeriod::FiveYears => 5,
            HoldingPeriod::TenYears => 10,
        }
    }
}

impl TryFrom<i32> for HoldingPeriod {
    type Error = Error;

    fn try_from(years: i32) -> Result<Self, Self::Error> {
        match years {
            3 => Ok(HoldingPeriod::ThreeYears),
            5 => Ok(HoldingPeriod::FiveYears),
            10 => Ok(HoldingPeriod::TenYears),
            _ => Err(Error::Validation(ValidationError::InvalidInput(
                "Investment period must be 3, 5, or 10 years.".to_string(),
            ))),
        }
    }
}

impl From<HoldingPeriod> for i32 {
    fn from(period: HoldingPeriod) -> Self {
        period.years()
    }
}

impl fmt::Display for HoldingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Years", self.years())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ALLOWED_HOLDING_PERIODS;

    #[test]
    fn test_allowed_periods_round_trip() {
        for years in ALLOWED_HOLDING_PERIODS {
            let period = HoldingPeriod::try_from(years).unwrap();
            assert_eq!(period.years(), years);
        }
        assert_eq!(HoldingPeriod::ALL.len(), ALLOWED_HOLDING_PERIODS.len());
    }

    #[test]
    fn test_other_periods_rejected() {
        for years in [0, 1, 4, 7, 15, -3] {
            assert!(HoldingPeriod::try_from(years).is_err(), "{years} accepted");
        }
    }

    #[test]
    fn test_serializes_as_year_count() {
        assert_eq!(serde_json::to_string(&HoldingPeriod::FiveYears).unwrap(), "5");
        assert_eq!(
            serde_json::from_str::<HoldingPeriod>("10").unwrap(),
            HoldingPeriod::TenYears
        );
        assert!(serde_json::from_str::<HoldingPeriod>("4").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(HoldingPeriod::ThreeYears.to_string(), "3 Years");
    }
}
