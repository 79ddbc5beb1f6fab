//! Day count conventions for fixed income calculations.
//!
//! Day count conventions determine how a (start, end) date pair becomes a
//! year fraction. All fractions are computed in `rust_decimal::Decimal` so
//! boundary cases (same day, full year, leap-year February) come out exact.
//!
//! # Supported Conventions
//!
//! - [`Act360`]: Actual/360, money market convention
//! - [`Act365Fixed`]: Actual/365 Fixed
//! - [`ActActIsda`]: Actual/Actual ISDA, year-based split
//! - [`ActActIcma`]: Actual/Actual ICMA, period-based
//! - [`Thirty360US`]: 30/360 US (Bond Basis) with February end-of-month rules
//! - [`Thirty360E`]: 30E/360 (Eurobond Basis)
//!
//! # Usage
//!
//! ```rust
//! use fi_core::daycounts::{DayCount, Thirty360US};
//! use fi_core::types::Date;
//!
//! let dc = Thirty360US;
//! let start = Date::from_ymd(2025, 1, 15).unwrap();
//! let end = Date::from_ymd(2025, 7, 15).unwrap();
//!
//! assert_eq!(dc.day_count(start, end), 180);
//! assert_eq!(dc.year_fraction(start, end).unwrap().to_string(), "0.5");
//! assert!(dc.year_fraction(end, start).is_err());
//! ```

mod actact;
mod actual;
mod thirty360;

pub use actact::{ActActIcma, ActActIsda};
pub use actual::{Act360, Act365Fixed};
pub use thirty360::{Thirty360E, Thirty360US};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{FixedIncomeError, FixedIncomeResult};
use crate::types::Date;

/// Trait for day count conventions.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait DayCount: Send + Sync {
    /// Returns the name of the day count convention (e.g. "ACT/360").
    fn name(&self) -> &'static str;

    /// Year fraction without the ordering check. Negative when `end < start`.
    fn year_fraction_unchecked(&self, start: Date, end: Date) -> Decimal;

    /// Calculates the day count between two dates.
    ///
    /// For ACT conventions this is actual calendar days; for 30/360
    /// conventions it uses the 30-day month assumption.
    fn day_count(&self, start: Date, end: Date) -> i64;

    /// Calculates the year fraction between two dates.
    ///
    /// The value is normalized, so equal fractions print alike whatever the
    /// convention.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` when `end < start`.
    fn year_fraction(&self, start: Date, end: Date) -> FixedIncomeResult<Decimal> {
        if end < start {
            return Err(FixedIncomeError::invalid_date_range(start, end));
        }
        Ok(self.year_fraction_unchecked(start, end).normalize())
    }
}

/// Enumeration of all supported day count conventions.
///
/// # Example
///
/// ```rust
/// use fi_core::daycounts::DayCountConvention;
/// use fi_core::types::Date;
///
/// let start = Date::from_ymd(2024, 1, 1).unwrap();
/// let end = Date::from_ymd(2025, 1, 1).unwrap();
/// let yf = DayCountConvention::ActActIsda.year_fraction_f64(start, end).unwrap();
/// assert_eq!(yf, 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DayCountConvention {
    /// Actual/360 - Money market instruments
    Act360,

    /// Actual/365 Fixed
    Act365Fixed,

    /// Actual/Actual ISDA - Year-based calculation for swaps
    #[default]
    ActActIsda,

    /// Actual/Actual ICMA - Period-based calculation for bonds
    /// (semi-annual reference periods when used without a schedule)
    ActActIcma,

    /// 30/360 US (Bond Basis) - US corporate, agency, municipal bonds
    Thirty360US,

    /// 30E/360 (Eurobond Basis)
    Thirty360E,
}

impl DayCountConvention {
    /// Creates a boxed day count implementation.
    #[must_use]
    pub fn to_day_count(&self) -> Box<dyn DayCount> {
        match self {
            DayCountConvention::Act360 => Box::new(Act360),
            DayCountConvention::Act365Fixed => Box::new(Act365Fixed),
            DayCountConvention::ActActIsda => Box::new(ActActIsda),
            DayCountConvention::ActActIcma => Box::new(ActActIcma::default()),
            DayCountConvention::Thirty360US => Box::new(Thirty360US),
            DayCountConvention::Thirty360E => Box::new(Thirty360E),
        }
    }

    /// Returns the name of the convention.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Act360 => "ACT/360",
            DayCountConvention::Act365Fixed => "ACT/365F",
            DayCountConvention::ActActIsda => "ACT/ACT ISDA",
            DayCountConvention::ActActIcma => "ACT/ACT ICMA",
            DayCountConvention::Thirty360US => "30/360 US",
            DayCountConvention::Thirty360E => "30E/360",
        }
    }

    /// Returns all available day count conventions.
    #[must_use]
    pub fn all() -> &'static [DayCountConvention] {
        &[
            DayCountConvention::Act360,
            DayCountConvention::Act365Fixed,
            DayCountConvention::ActActIsda,
            DayCountConvention::ActActIcma,
            DayCountConvention::Thirty360US,
            DayCountConvention::Thirty360E,
        ]
    }

    /// Returns the year basis (denominator) for simple interest calculations.
    #[must_use]
    pub const fn basis(&self) -> u32 {
        match self {
            DayCountConvention::Act360
            | DayCountConvention::Thirty360US
            | DayCountConvention::Thirty360E => 360,

            DayCountConvention::Act365Fixed
            | DayCountConvention::ActActIsda
            | DayCountConvention::ActActIcma => 365,
        }
    }

    /// Day count between two dates under this convention.
    #[must_use]
    pub fn day_count(&self, start: Date, end: Date) -> i64 {
        self.to_day_count().day_count(start, end)
    }

    /// Exact year fraction between two dates.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` when `end < start`.
    pub fn year_fraction(&self, start: Date, end: Date) -> FixedIncomeResult<Decimal> {
        self.to_day_count().year_fraction(start, end)
    }

    /// Year fraction converted to `f64` for numerical work.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` when `end < start`.
    pub fn year_fraction_f64(&self, start: Date, end: Date) -> FixedIncomeResult<f64> {
        let yf = self.year_fraction(start, end)?;
        yf.to_f64().ok_or_else(|| {
            FixedIncomeError::invalid_input(format!("year fraction {yf} is not representable"))
        })
    }
}

impl std::fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for DayCountConvention {
    type Err = DayCountParseError;

    /// Case-insensitive; separators are ignored, so "ACT/365F", "act 365 f"
    /// and "Act365Fixed" all parse. Market aliases such as "BOND" and
    /// "EUROBOND" are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_uppercase())
            .collect();

        let convention = match key.as_str() {
            "ACT360" | "ACTUAL360" | "MONEYMARKET" => DayCountConvention::Act360,
            "ACT365" | "ACT365F" | "ACT365FIXED" | "ACTUAL365" | "ACTUAL365FIXED" => {
                DayCountConvention::Act365Fixed
            }
            "ACTACT" | "ACTACTISDA" | "ACTUALACTUAL" | "ACTUALACTUALISDA" => {
                DayCountConvention::ActActIsda
            }
            "ACTACTICMA" | "ACTUALACTUALICMA" | "ICMA" | "ISMA" => DayCountConvention::ActActIcma,
            "30360" | "30360US" | "30U360" | "BOND" | "BONDBASIS" | "THIRTY360US" => {
                DayCountConvention::Thirty360US
            }
            "30E360" | "30360ICMA" | "EUROBOND" | "THIRTY360E" => DayCountConvention::Thirty360E,
            _ => return Err(DayCountParseError(s.to_string())),
        };
        Ok(convention)
    }
}

/// Error type for parsing day count conventions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown day count convention: '{0}'")]
pub struct DayCountParseError(pub String);
