//! Accrued interest calculations.
//!
//! Two entry points:
//! - [`AccruedInterestCalculator::for_instrument`]: accrued on an instrument's
//!   own coupon grid at a settlement date
//! - [`AccruedInterestCalculator::accrint`]: the spreadsheet-style calculation
//!   from issue, first interest date and settlement

use serde::{Deserialize, Serialize};

use fi_core::daycounts::DayCountConvention;
use fi_core::error::{FixedIncomeError, FixedIncomeResult};
use fi_core::types::{Date, Frequency};

use super::CashflowSchedule;
use crate::instruments::{Instrument, InstrumentKind};

/// How accrual is counted once settlement is past the first interest date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccrualMethod {
    /// Total interest accrued since issue.
    #[default]
    FromIssue,
    /// Interest accrued since the first interest date only.
    FromFirstInterest,
}

/// Calculator for accrued interest.
pub struct AccruedInterestCalculator;

impl AccruedInterestCalculator {
    /// Standard accrued interest within one coupon period.
    ///
    /// `coupon * accrued_fraction`, where the fraction is the day-count year
    /// fraction from `last_coupon` to `settlement` over that of the whole
    /// period.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fi_bonds::cashflows::AccruedInterestCalculator;
    /// use fi_core::prelude::*;
    ///
    /// let accrued = AccruedInterestCalculator::standard(
    ///     Date::from_ymd(2025, 4, 15).unwrap(),
    ///     Date::from_ymd(2025, 1, 15).unwrap(),
    ///     Date::from_ymd(2025, 7, 15).unwrap(),
    ///     2.5,
    ///     DayCountConvention::Thirty360US,
    /// )
    /// .unwrap();
    /// assert!((accrued - 1.25).abs() < 1e-12);
    /// ```
    pub fn standard(
        settlement: Date,
        last_coupon: Date,
        next_coupon: Date,
        coupon: f64,
        day_count: DayCountConvention,
    ) -> FixedIncomeResult<f64> {
        if settlement < last_coupon || settlement > next_coupon {
            return Err(FixedIncomeError::invalid_date_range(last_coupon, settlement));
        }
        let dc = day_count.to_day_count();
        let period_days = dc.day_count(last_coupon, next_coupon);
        if period_days <= 0 {
            return Ok(0.0);
        }
        let accrued_days = dc.day_count(last_coupon, settlement);
        Ok(coupon * accrued_days as f64 / period_days as f64)
    }

    /// Accrued interest of `instrument` at `settlement`.
    ///
    /// Coupon kinds accrue on their generated grid; deposits accrue simple
    /// interest from the start date; zero-coupon bonds accrue nothing.
    /// Settlement on a coupon date gives zero.
    pub fn for_instrument(
        schedule: &CashflowSchedule,
        instrument: &Instrument,
        settlement: Date,
    ) -> FixedIncomeResult<f64> {
        if settlement < instrument.issue_date() || settlement > instrument.maturity() {
            return Err(FixedIncomeError::invalid_date_range(
                instrument.issue_date(),
                settlement,
            ));
        }

        match instrument.kind() {
            InstrumentKind::ZeroCoupon => Ok(0.0),
            InstrumentKind::Deposit => {
                let yf = instrument
                    .day_count()
                    .year_fraction_f64(instrument.issue_date(), settlement)?;
                Ok(instrument.face_value() * instrument.coupon_rate() * yf)
            }
            InstrumentKind::FixedRateBond | InstrumentKind::ParSwap => {
                let dates = schedule.accrual_dates(instrument)?;
                let Some(i) = dates.windows(2).position(|w| settlement < w[1]) else {
                    // Settlement on maturity: the final coupon is paid, nothing accrues
                    return Ok(0.0);
                };
                Self::standard(
                    settlement,
                    dates[i],
                    dates[i + 1],
                    instrument.coupon_per_period(),
                    instrument.day_count(),
                )
            }
        }
    }

    /// Accrued interest from issue and first interest date.
    ///
    /// With `c = rate * par / frequency` and `w` the year fraction from
    /// settlement to the first interest date times the frequency, the accrued
    /// amount is `(1 - w) * c` when settlement falls on or before the first
    /// interest date. Past it, [`AccrualMethod::FromIssue`] keeps the same
    /// formula (so `w` turns negative and accrual runs on from issue) while
    /// [`AccrualMethod::FromFirstInterest`] counts from the first interest
    /// date only.
    ///
    /// # Errors
    ///
    /// `InvalidDateRange` if settlement precedes issue or the first interest
    /// date does not follow issue; `InvalidInstrument` for a zero frequency
    /// or non-positive par.
    #[allow(clippy::too_many_arguments)]
    pub fn accrint(
        issue: Date,
        first_interest: Date,
        settlement: Date,
        rate: f64,
        par: f64,
        frequency: Frequency,
        basis: DayCountConvention,
        method: AccrualMethod,
    ) -> FixedIncomeResult<f64> {
        if first_interest <= issue {
            return Err(FixedIncomeError::invalid_date_range(issue, first_interest));
        }
        if settlement < issue {
            return Err(FixedIncomeError::invalid_date_range(issue, settlement));
        }
        if frequency.is_zero() {
            return Err(FixedIncomeError::invalid_instrument(
                "accrued interest needs a coupon frequency",
            ));
        }
        if !par.is_finite() || par <= 0.0 {
            return Err(FixedIncomeError::invalid_instrument(format!(
                "par must be positive, got {par}"
            )));
        }

        let f = f64::from(frequency.periods_per_year());
        let coupon = rate * par / f;

        if settlement <= first_interest {
            let w = basis.year_fraction_f64(settlement, first_interest)? * f;
            return Ok((1.0 - w) * coupon);
        }

        let since_first = basis.year_fraction_f64(first_interest, settlement)? * f;
        Ok(match method {
            AccrualMethod::FromIssue => (1.0 + since_first) * coupon,
            AccrualMethod::FromFirstInterest => since_first * coupon,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_accrint_act360() {
        // 90 days before first interest on a semi-annual 6% bond:
        // w = 90 / 180 = 0.5, accrued = 0.5 * 3.0
        let accrued = AccruedInterestCalculator::accrint(
            date(2024, 10, 1),
            date(2025, 4, 1),
            date(2025, 1, 1),
            0.06,
            100.0,
            Frequency::SemiAnnual,
            DayCountConvention::Act360,
            AccrualMethod::FromIssue,
        )
        .unwrap();
        assert_relative_eq!(accrued, 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_accrint_act365() {
        let accrued = AccruedInterestCalculator::accrint(
            date(2024, 10, 1),
            date(2025, 4, 1),
            date(2025, 1, 1),
            0.06,
            100.0,
            Frequency::SemiAnnual,
            DayCountConvention::Act365Fixed,
            AccrualMethod::FromIssue,
        )
        .unwrap();
        assert_relative_eq!(accrued, (1.0 - 90.0 / 182.5) * 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_accrint_after_first_interest() {
        let args = (date(2024, 10, 1), date(2025, 4, 1), date(2025, 5, 1));
        let from_issue = AccruedInterestCalculator::accrint(
            args.0,
            args.1,
            args.2,
            0.06,
            100.0,
            Frequency::SemiAnnual,
            DayCountConvention::Act360,
            AccrualMethod::FromIssue,
        )
        .unwrap();
        let from_first = AccruedInterestCalculator::accrint(
            args.0,
            args.1,
            args.2,
            0.06,
            100.0,
            Frequency::SemiAnnual,
            DayCountConvention::Act360,
            AccrualMethod::FromFirstInterest,
        )
        .unwrap();

        // 30 days past first interest = 1/6 of a 180-day period
        assert_relative_eq!(from_first, 0.5, epsilon = 1e-12);
        assert_relative_eq!(from_issue, 3.5, epsilon = 1e-12);
    }

    #[test]
    fn test_accrint_validation() {
        let dc = DayCountConvention::Act360;
        let m = AccrualMethod::FromIssue;
        let (i, f, s) = (date(2025, 1, 1), date(2025, 7, 1), date(2025, 3, 1));

        assert!(AccruedInterestCalculator::accrint(f, i, s, 0.05, 100.0, Frequency::Annual, dc, m).is_err());
        assert!(AccruedInterestCalculator::accrint(s, f, i, 0.05, 100.0, Frequency::Annual, dc, m).is_err());
        assert!(AccruedInterestCalculator::accrint(i, f, s, 0.05, 100.0, Frequency::Zero, dc, m).is_err());
        assert!(AccruedInterestCalculator::accrint(i, f, s, 0.05, 0.0, Frequency::Annual, dc, m).is_err());
    }

    #[test]
    fn test_for_instrument_mid_period() {
        let bond = Instrument::fixed_rate_bond(
            100.0,
            0.05,
            Frequency::SemiAnnual,
            date(2025, 1, 15),
            date(2030, 1, 15),
            DayCountConvention::Thirty360US,
        )
        .unwrap();
        let schedule = CashflowSchedule::default();

        let accrued =
            AccruedInterestCalculator::for_instrument(&schedule, &bond, date(2025, 4, 15)).unwrap();
        assert_relative_eq!(accrued, 1.25, epsilon = 1e-12);

        let on_coupon =
            AccruedInterestCalculator::for_instrument(&schedule, &bond, date(2025, 7, 15)).unwrap();
        assert_eq!(on_coupon, 0.0);

        assert!(
            AccruedInterestCalculator::for_instrument(&schedule, &bond, date(2024, 12, 1)).is_err()
        );
    }

    #[test]
    fn test_for_instrument_single_payment() {
        let schedule = CashflowSchedule::default();
        let dep = Instrument::deposit(
            100.0,
            0.04,
            date(2025, 1, 1),
            date(2026, 1, 1),
            DayCountConvention::Act360,
        )
        .unwrap();
        let accrued =
            AccruedInterestCalculator::for_instrument(&schedule, &dep, date(2025, 3, 2)).unwrap();
        assert_relative_eq!(accrued, 100.0 * 0.04 * 60.0 / 360.0, epsilon = 1e-12);

        let zero = Instrument::zero_coupon(
            100.0,
            date(2025, 1, 1),
            date(2026, 1, 1),
            DayCountConvention::Act360,
        )
        .unwrap();
        assert_eq!(
            AccruedInterestCalculator::for_instrument(&schedule, &zero, date(2025, 6, 1)).unwrap(),
            0.0
        );
    }
}
