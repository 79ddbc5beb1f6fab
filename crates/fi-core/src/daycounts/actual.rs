//! Actual-day conventions over a fixed denominator: ACT/360 and ACT/365F.

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::Date;

fn actual_over(start: Date, end: Date, basis: i64) -> Decimal {
    Decimal::from(start.days_between(&end)) / Decimal::from(basis)
}

/// Actual/360, the money-market basis.
///
/// $$\text{Year Fraction} = \frac{\text{Actual Days}}{360}$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act360;

impl DayCount for Act360 {
    fn name(&self) -> &'static str {
        "ACT/360"
    }

    fn year_fraction_unchecked(&self, start: Date, end: Date) -> Decimal {
        actual_over(start, end, 360)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

/// Actual/365 Fixed. Leap days still count against a 365-day year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act365Fixed;

impl DayCount for Act365Fixed {
    fn name(&self) -> &'static str {
        "ACT/365F"
    }

    fn year_fraction_unchecked(&self, start: Date, end: Date) -> Decimal {
        actual_over(start, end, 365)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}
