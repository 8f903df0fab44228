use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Decimal places kept on every stored money field
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Decimal places kept on the applied interest rate
pub const RATE_DECIMAL_PLACES: u32 = 4;

/// Average year length used for maturity dates and accrual
pub const DAYS_PER_YEAR: Decimal = dec!(365.25);

/// Holding periods (in years) a rate entry or investment may use
pub const ALLOWED_HOLDING_PERIODS: [i32; 3] = [3, 5, 10];

/// Message returned when an investment would duplicate an existing position
pub const DUPLICATE_INVESTMENT_MESSAGE: &str =
    "An investment with this user, service group, and investment period already exists.";
