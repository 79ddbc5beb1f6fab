//! Calendar dates.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{FixedIncomeError, FixedIncomeResult};

/// A calendar date, serialized as `YYYY-MM-DD`.
///
/// Wraps `chrono::NaiveDate` and adds the month arithmetic coupon schedules
/// need: clamped month steps and the end-of-month roll.
///
/// ```rust
/// use fi_core::types::Date;
///
/// let maturity = Date::from_ymd(2035, 2, 28).unwrap();
/// let coupon = maturity.add_months_eom(-6, true).unwrap();
/// assert_eq!(coupon.to_string(), "2034-08-31");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Builds a date from its components.
    ///
    /// # Errors
    ///
    /// `InvalidDate` for impossible dates such as February 30.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> FixedIncomeResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| FixedIncomeError::invalid_date(format!("{year}-{month:02}-{day:02}")))
    }

    /// Parses `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// `InvalidDate` when the text is not an ISO calendar date.
    pub fn parse(text: &str) -> FixedIncomeResult<Self> {
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| FixedIncomeError::invalid_date(format!("Cannot parse: {text}")))
    }

    /// Year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month, 1 to 12.
    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Day of month.
    #[must_use]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Ordinal day, 1 for January 1st.
    #[must_use]
    pub fn day_of_year(&self) -> u32 {
        self.0.ordinal()
    }

    /// Gregorian leap year test.
    #[must_use]
    pub fn is_leap_year(&self) -> bool {
        self.0.leap_year()
    }

    /// 365 or 366.
    #[must_use]
    pub fn days_in_year(&self) -> u32 {
        365 + u32::from(self.is_leap_year())
    }

    /// Length of this month.
    #[must_use]
    pub fn days_in_month(&self) -> u32 {
        month_length(self.year(), self.month())
    }

    /// Shifts by whole days.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Steps `months` calendar months, clamping the day to the target month
    /// (January 31st plus one month is February 28th or 29th).
    ///
    /// # Errors
    ///
    /// `InvalidDate` when the result leaves chrono's range.
    pub fn add_months(&self, months: i32) -> FixedIncomeResult<Self> {
        let index = self.year() * 12 + self.month() as i32 - 1 + months;
        let year = index.div_euclid(12);
        let month = index.rem_euclid(12) as u32 + 1;
        Self::from_ymd(year, month, self.day().min(month_length(year, month)))
    }

    /// [`add_months`](Self::add_months), except that a month-end date stays
    /// on month ends when `end_of_month` is set.
    ///
    /// # Errors
    ///
    /// `InvalidDate` when the result leaves chrono's range.
    pub fn add_months_eom(&self, months: i32, end_of_month: bool) -> FixedIncomeResult<Self> {
        let stepped = self.add_months(months)?;
        Ok(if end_of_month && self.is_end_of_month() {
            stepped.end_of_month()
        } else {
            stepped
        })
    }

    /// Steps whole years.
    ///
    /// # Errors
    ///
    /// `InvalidDate` when the result leaves chrono's range.
    pub fn add_years(&self, years: i32) -> FixedIncomeResult<Self> {
        self.add_months(12 * years)
    }

    /// Signed calendar days from `self` to `other`.
    #[must_use]
    pub fn days_between(&self, other: &Date) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Last calendar day of this month.
    #[must_use]
    pub fn end_of_month(&self) -> Self {
        Self(self.0.with_day(self.days_in_month()).unwrap_or(self.0))
    }

    /// Whether this is the last day of its month.
    #[must_use]
    pub fn is_end_of_month(&self) -> bool {
        self.day() == self.days_in_month()
    }

    /// February 28th in a common year, February 29th in a leap year.
    #[must_use]
    pub fn is_last_day_of_february(&self) -> bool {
        self.month() == 2 && self.is_end_of_month()
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for Date {
    type Err = FixedIncomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl From<Date> for NaiveDate {
    fn from(date: Date) -> Self {
        date.0
    }
}

fn month_length(year: i32, month: u32) -> u32 {
    match month {
        2 if NaiveDate::from_ymd_opt(year, 2, 29).is_some() => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_rejects_impossible_dates() {
        assert!(Date::from_ymd(2025, 2, 29).is_err());
        assert!(Date::from_ymd(2025, 13, 1).is_err());
        assert!(Date::from_ymd(2024, 2, 29).is_ok());
    }

    #[test]
    fn test_month_steps_clamp() {
        assert_eq!(date(2025, 1, 31).add_months(1).unwrap(), date(2025, 2, 28));
        assert_eq!(date(2024, 1, 31).add_months(1).unwrap(), date(2024, 2, 29));
        assert_eq!(date(2025, 2, 15).add_months(-14).unwrap(), date(2023, 12, 15));
        assert_eq!(date(2024, 2, 29).add_years(1).unwrap(), date(2025, 2, 28));
    }

    #[test]
    fn test_end_of_month_roll() {
        let maturity = date(2035, 2, 28);
        assert_eq!(maturity.add_months_eom(-6, true).unwrap(), date(2034, 8, 31));
        assert_eq!(maturity.add_months_eom(-6, false).unwrap(), date(2034, 8, 28));
        // Mid-month dates ignore the flag
        assert_eq!(date(2025, 3, 15).add_months_eom(3, true).unwrap(), date(2025, 6, 15));
    }

    #[test]
    fn test_calendar_queries() {
        assert_eq!(date(2024, 7, 1).days_in_year(), 366);
        assert_eq!(date(2100, 7, 1).days_in_year(), 365);
        assert_eq!(date(2000, 2, 1).end_of_month(), date(2000, 2, 29));
        assert!(date(2024, 2, 29).is_last_day_of_february());
        assert!(!date(2024, 2, 28).is_last_day_of_february());
        assert_eq!(date(2025, 12, 31).day_of_year(), 365);
    }

    #[test]
    fn test_signed_day_distance() {
        let (a, b) = (date(2025, 1, 1), date(2025, 3, 1));
        assert_eq!(a.days_between(&b), 59);
        assert_eq!(b.days_between(&a), -59);
        assert_eq!(a.add_days(59), b);
    }

    #[test]
    fn test_text_round_trip() {
        let d: Date = "2025-06-15".parse().unwrap();
        assert_eq!(d.to_string(), "2025-06-15");
        assert!(Date::parse("2025-06-31").is_err());
        assert!(Date::parse("15/06/2025").is_err());

        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, "\"2025-06-15\"");
        assert_eq!(serde_json::from_str::<Date>(&json).unwrap(), d);
    }
}
