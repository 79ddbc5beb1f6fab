//! Actual/Actual day count conventions.

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::{Date, Frequency};

/// Actual/Actual ISDA day count convention.
///
/// The year fraction is calculated by splitting the period into
/// portions that fall in leap years vs non-leap years.
///
/// # Formula
///
/// $$\text{Year Fraction} = \frac{\text{Days in non-leap year}}{365} + \frac{\text{Days in leap year}}{366}$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActActIsda;

impl DayCount for ActActIsda {
    fn name(&self) -> &'static str {
        "ACT/ACT ISDA"
    }

    fn year_fraction_unchecked(&self, start: Date, end: Date) -> Decimal {
        if start == end {
            return Decimal::ZERO;
        }
        if end < start {
            return -self.year_fraction_unchecked(end, start);
        }

        let start_basis = Decimal::from(start.days_in_year());
        let end_basis = Decimal::from(end.days_in_year());

        if start.year() == end.year() {
            return Decimal::from(start.days_between(&end)) / start_basis;
        }

        // Days from start up to Jan 1 of the following year, whole years in
        // between, then days from Jan 1 of the final year.
        let head = Decimal::from(start.days_in_year() - start.day_of_year() + 1) / start_basis;
        let whole = Decimal::from(end.year() - start.year() - 1);
        let tail = Decimal::from(end.day_of_year() - 1) / end_basis;

        head + whole + tail
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

/// Actual/Actual ICMA day count convention.
///
/// The year fraction is counted in coupon periods: whole reference periods
/// plus the actual-day share of the partial one, divided by the frequency.
/// Without an explicit schedule, reference periods are rolled back from the
/// end date.
///
/// # Formula
///
/// $$\text{Year Fraction} = \frac{\text{Days}}{\text{Frequency} \times \text{Days in Period}}$$
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActActIcma {
    frequency: Frequency,
}

impl ActActIcma {
    /// Creates a new ACT/ACT ICMA convention with given frequency.
    ///
    /// Zero frequency falls back to annual reference periods.
    #[must_use]
    pub fn new(frequency: Frequency) -> Self {
        let frequency = if frequency.is_zero() {
            Frequency::Annual
        } else {
            frequency
        };
        Self { frequency }
    }

    /// Creates with semi-annual frequency (default for bonds).
    #[must_use]
    pub fn semi_annual() -> Self {
        Self::new(Frequency::SemiAnnual)
    }

    /// Calculates year fraction given the period dates.
    ///
    /// # Arguments
    ///
    /// * `start` - Accrual start date
    /// * `end` - Accrual end date
    /// * `period_start` - Start of the coupon period
    /// * `period_end` - End of the coupon period
    #[must_use]
    pub fn year_fraction_with_period(
        &self,
        start: Date,
        end: Date,
        period_start: Date,
        period_end: Date,
    ) -> Decimal {
        let days_in_period = period_start.days_between(&period_end);
        if days_in_period == 0 {
            return Decimal::ZERO;
        }

        let accrued_days = start.days_between(&end);
        Decimal::from(accrued_days)
            / (Decimal::from(self.frequency.periods_per_year()) * Decimal::from(days_in_period))
    }
}

impl Default for ActActIcma {
    fn default() -> Self {
        Self::semi_annual()
    }
}

impl DayCount for ActActIcma {
    fn name(&self) -> &'static str {
        "ACT/ACT ICMA"
    }

    fn year_fraction_unchecked(&self, start: Date, end: Date) -> Decimal {
        if start == end {
            return Decimal::ZERO;
        }
        if end < start {
            return -self.year_fraction_unchecked(end, start);
        }

        let months = self.frequency.months_per_period() as i32;
        let per_year = Decimal::from(self.frequency.periods_per_year());
        let mut whole: i32 = 0;
        let mut period_end = end;

        loop {
            let Ok(period_start) = end.add_months_eom(-months * (whole + 1), true) else {
                // Out of calendar range: fall back to an actual/365 count.
                return Decimal::from(start.days_between(&end)) / Decimal::from(365);
            };
            if period_start <= start {
                let partial = Decimal::from(start.days_between(&period_end))
                    / Decimal::from(period_start.days_between(&period_end));
                return (Decimal::from(whole) + partial) / per_year;
            }
            whole += 1;
            period_end = period_start;
        }
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_actact_isda_non_leap() {
        let dc = ActActIsda;
        assert_eq!(
            dc.year_fraction(date(2025, 1, 1), date(2026, 1, 1)).unwrap(),
            dec!(1)
        );
    }

    #[test]
    fn test_actact_isda_leap() {
        let dc = ActActIsda;
        assert_eq!(
            dc.year_fraction(date(2024, 1, 1), date(2025, 1, 1)).unwrap(),
            dec!(1)
        );
    }

    #[test]
    fn test_actact_isda_cross_year() {
        let dc = ActActIsda;
        // 184 days of 2024 (leap) and 181 days of 2025
        let yf = dc.year_fraction(date(2024, 7, 1), date(2025, 7, 1)).unwrap();
        assert_eq!(yf, dec!(184) / dec!(366) + dec!(181) / dec!(365));
    }

    #[test]
    fn test_actact_isda_multi_year() {
        let dc = ActActIsda;
        let yf = dc.year_fraction(date(2023, 1, 1), date(2027, 1, 1)).unwrap();
        assert_eq!(yf, dec!(4));
    }

    #[test]
    fn test_actact_icma_with_period() {
        let dc = ActActIcma::semi_annual();

        let period_start = date(2024, 11, 15);
        let period_end = date(2025, 5, 15);
        let settlement = date(2025, 1, 15);

        let yf = dc.year_fraction_with_period(period_start, settlement, period_start, period_end);

        // 61 days accrued / (2 * 181 days in period)
        assert_eq!(yf, dec!(61) / dec!(362));
    }

    #[test]
    fn test_actact_icma_whole_periods() {
        let dc = ActActIcma::new(Frequency::Quarterly);
        let yf = dc.year_fraction(date(2025, 3, 31), date(2026, 3, 31)).unwrap();
        assert_eq!(yf, dec!(1));
    }

    #[test]
    fn test_actact_icma_partial_period() {
        let dc = ActActIcma::new(Frequency::Annual);
        // 2025-07-01 to 2026-01-01 inside the reference year 2025-01-01..2026-01-01
        let yf = dc.year_fraction(date(2025, 7, 1), date(2026, 1, 1)).unwrap();
        assert_eq!(yf, dec!(184) / dec!(365));
    }
}
