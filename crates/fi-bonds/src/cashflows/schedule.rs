//! Schedule generation.
//!
//! Coupon dates are rolled back from maturity in steps of `12 / frequency`
//! months. Each date is computed directly from maturity, never from the
//! previous date, so month-end clipping (Aug 31 to Feb 28) does not drift.
//!
//! A front stub shorter than `period_tolerance` of a period is dropped and
//! its days merged into the next period; a stub longer than
//! `1 - period_tolerance` is treated as a full period. Anything else is a
//! non-integral number of periods and is rejected.

use log::trace;
use serde::{Deserialize, Serialize};

use fi_core::daycounts::DayCountConvention;
use fi_core::error::{FixedIncomeError, FixedIncomeResult};
use fi_core::types::{CashFlow, CashflowSet, Date};

use crate::instruments::{Instrument, InstrumentKind};

/// Default stub tolerance: one thirtieth of a period (about a day on a
/// monthly schedule, six days on an annual one).
pub const DEFAULT_PERIOD_TOLERANCE: f64 = 1.0 / 30.0;

/// How cash flow times are measured from the reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeMeasure {
    /// Whole and fractional coupon periods divided by the frequency, the
    /// street convention for yield and duration. Single-payment instruments
    /// use their own day count.
    #[default]
    CouponPeriods,
    /// Year fraction under the given day count, as curves expect.
    DayCount(DayCountConvention),
}

/// Cash flow schedule generator.
///
/// Generation is a pure function of the instrument and the settings: the
/// same inputs give bit-identical output.
///
/// # Example
///
/// ```rust
/// use fi_bonds::cashflows::CashflowSchedule;
/// use fi_bonds::instruments::Instrument;
/// use fi_core::prelude::*;
///
/// let bond = Instrument::fixed_rate_bond(
///     100.0,
///     0.06,
///     Frequency::SemiAnnual,
///     Date::from_ymd(2025, 3, 1).unwrap(),
///     Date::from_ymd(2027, 3, 1).unwrap(),
///     DayCountConvention::Thirty360US,
/// )
/// .unwrap();
///
/// let flows = CashflowSchedule::default().generate(&bond).unwrap();
/// assert_eq!(flows.len(), 4);
/// assert_eq!(flows.last().unwrap().amount(), 103.0);
/// assert_eq!(flows.final_time(), 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CashflowSchedule {
    period_tolerance: f64,
}

impl Default for CashflowSchedule {
    fn default() -> Self {
        Self {
            period_tolerance: DEFAULT_PERIOD_TOLERANCE,
        }
    }
}

impl CashflowSchedule {
    /// Creates a generator with the default stub tolerance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the stub tolerance as a fraction of one period.
    ///
    /// Checked at generation time: must lie in `[0, 0.5)`.
    #[must_use]
    pub fn with_period_tolerance(mut self, tolerance: f64) -> Self {
        self.period_tolerance = tolerance;
        self
    }

    /// Stub tolerance as a fraction of one period.
    #[must_use]
    pub fn period_tolerance(&self) -> f64 {
        self.period_tolerance
    }

    /// Generates all cash flows, with times in coupon periods from issue.
    pub fn generate(&self, instrument: &Instrument) -> FixedIncomeResult<CashflowSet> {
        self.generate_as_of(instrument, instrument.issue_date(), TimeMeasure::CouponPeriods)
    }

    /// Generates the cash flows paid strictly after `as_of`, with times
    /// measured from `as_of`.
    ///
    /// # Errors
    ///
    /// `InvalidInstrument` if the schedule has an unabsorbable stub or no
    /// flow falls after `as_of`.
    pub fn generate_as_of(
        &self,
        instrument: &Instrument,
        as_of: Date,
        measure: TimeMeasure,
    ) -> FixedIncomeResult<CashflowSet> {
        if as_of >= instrument.maturity() {
            return Err(FixedIncomeError::invalid_instrument(format!(
                "no cash flows after {as_of}: instrument matures {}",
                instrument.maturity()
            )));
        }

        let flows = if instrument.kind().is_periodic() {
            self.periodic_flows(instrument, as_of, measure)?
        } else {
            vec![single_payment(instrument, as_of, measure)?]
        };

        CashflowSet::new(as_of, instrument.frequency(), flows)
    }

    /// Accrual period boundaries: the issue date followed by every payment
    /// date. Single-payment instruments give `[issue, maturity]`.
    pub fn accrual_dates(&self, instrument: &Instrument) -> FixedIncomeResult<Vec<Date>> {
        if !instrument.kind().is_periodic() {
            return Ok(vec![instrument.issue_date(), instrument.maturity()]);
        }
        if !(0.0..0.5).contains(&self.period_tolerance) {
            return Err(FixedIncomeError::invalid_input(format!(
                "period tolerance must lie in [0, 0.5), got {}",
                self.period_tolerance
            )));
        }

        let issue = instrument.issue_date();
        let maturity = instrument.maturity();
        let months = instrument.frequency().months_per_period() as i32;

        let span_months = (maturity.year() - issue.year()) * 12
            + maturity.month() as i32
            - issue.month() as i32;
        let max_steps = span_months / months + 2;

        let mut payments = vec![maturity];
        let mut prior = None;
        for k in 1..=max_steps {
            let d = maturity.add_months_eom(-months * k, instrument.end_of_month())?;
            if d <= issue {
                prior = Some(d);
                break;
            }
            payments.push(d);
        }
        let prior = prior.ok_or_else(|| {
            FixedIncomeError::invalid_instrument(format!(
                "could not roll the schedule back from {maturity} to {issue}"
            ))
        })?;
        payments.reverse();

        let first = payments[0];
        let stub = issue.days_between(&first) as f64 / prior.days_between(&first) as f64;

        if prior != issue && 1.0 - stub > self.period_tolerance {
            if stub > self.period_tolerance {
                return Err(FixedIncomeError::invalid_instrument(format!(
                    "{issue}..{maturity} is not a whole number of {} periods \
                     (front stub of {stub:.4} periods)",
                    instrument.frequency()
                )));
            }
            if payments.len() == 1 {
                return Err(FixedIncomeError::invalid_instrument(format!(
                    "issue {issue} is within a stub tolerance of maturity {maturity}"
                )));
            }
            // Short stub: merge into the next period
            payments.remove(0);
        }

        trace!(
            "schedule {issue}..{maturity}: {} periods, front stub {stub:.6}",
            payments.len()
        );

        let mut dates = Vec::with_capacity(payments.len() + 1);
        dates.push(issue);
        dates.extend(payments);
        Ok(dates)
    }

    fn periodic_flows(
        &self,
        instrument: &Instrument,
        as_of: Date,
        measure: TimeMeasure,
    ) -> FixedIncomeResult<Vec<CashFlow>> {
        let dates = self.accrual_dates(instrument)?;
        let periods_per_year = f64::from(instrument.frequency().periods_per_year());
        let position = grid_position(&dates, as_of);
        let coupon = instrument.coupon_per_period();
        let last = dates.len() - 1;

        let mut flows = Vec::with_capacity(last);
        for (j, pair) in dates.windows(2).enumerate() {
            let (start, end) = (pair[0], pair[1]);
            if end <= as_of {
                continue;
            }
            let time = match measure {
                TimeMeasure::CouponPeriods => ((j + 1) as f64 - position) / periods_per_year,
                TimeMeasure::DayCount(dc) => dc.year_fraction_f64(as_of, end)?,
            };
            let flow = if j + 1 == last {
                CashFlow::final_payment(end, time, coupon, instrument.face_value())
            } else if coupon == 0.0 {
                continue;
            } else {
                CashFlow::coupon(end, time, coupon)
            };
            flows.push(flow.with_accrual(start, end));
        }
        Ok(flows)
    }
}

/// Fractional position of `date` on the accrual grid, in periods from the
/// first date. Dates before the grid extrapolate with the first period's
/// length.
fn grid_position(dates: &[Date], date: Date) -> f64 {
    let segment = dates
        .windows(2)
        .position(|w| date < w[1])
        .unwrap_or(dates.len() - 2);
    let (start, end) = (dates[segment], dates[segment + 1]);
    segment as f64 + start.days_between(&date) as f64 / start.days_between(&end) as f64
}

fn single_payment(
    instrument: &Instrument,
    as_of: Date,
    measure: TimeMeasure,
) -> FixedIncomeResult<CashFlow> {
    let maturity = instrument.maturity();
    let basis = match measure {
        TimeMeasure::CouponPeriods => instrument.day_count(),
        TimeMeasure::DayCount(dc) => dc,
    };
    let time = basis.year_fraction_f64(as_of, maturity)?;
    let face = instrument.face_value();

    let flow = match instrument.kind() {
        InstrumentKind::Deposit => {
            let accrual = instrument
                .day_count()
                .year_fraction_f64(instrument.issue_date(), maturity)?;
            let interest = face * instrument.coupon_rate() * accrual;
            CashFlow::final_payment(maturity, time, interest, face)
        }
        _ => CashFlow::principal(maturity, time, face),
    };
    Ok(flow.with_accrual(instrument.issue_date(), maturity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fi_core::types::{CashFlowType, Frequency};

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn bond(rate: f64, freq: Frequency, issue: Date, maturity: Date) -> Instrument {
        Instrument::fixed_rate_bond(100.0, rate, freq, issue, maturity, DayCountConvention::ActActIcma)
            .unwrap()
    }

    #[test]
    fn test_ten_year_annual() {
        let b = bond(0.05, Frequency::Annual, date(2025, 1, 15), date(2035, 1, 15));
        let flows = CashflowSchedule::default().generate(&b).unwrap();

        assert_eq!(flows.len(), 10);
        for (i, cf) in flows.iter().enumerate() {
            assert_eq!(cf.time(), (i + 1) as f64);
            assert_eq!(cf.date(), date(2026 + i as i32, 1, 15));
        }
        let last = flows.last().unwrap();
        assert_eq!(last.cf_type(), CashFlowType::CouponAndPrincipal);
        assert_eq!(last.amount(), 105.0);
        assert_relative_eq!(flows.coupon_total(), 50.0, epsilon = 1e-12);
    }

    #[test]
    fn test_end_of_month_maturity() {
        let b = bond(0.04, Frequency::SemiAnnual, date(2025, 2, 28), date(2027, 2, 28));
        let dates = CashflowSchedule::default().accrual_dates(&b).unwrap();
        assert_eq!(
            dates,
            vec![
                date(2025, 2, 28),
                date(2025, 8, 31),
                date(2026, 2, 28),
                date(2026, 8, 31),
                date(2027, 2, 28),
            ]
        );

        let no_eom = b.with_end_of_month(false);
        let dates = CashflowSchedule::default().accrual_dates(&no_eom).unwrap();
        assert_eq!(dates[1], date(2025, 8, 28));
    }

    #[test]
    fn test_short_stub_absorbed() {
        // Issue one day before a grid date: merged into the next period
        let b = bond(0.06, Frequency::SemiAnnual, date(2025, 1, 14), date(2027, 1, 15));
        let flows = CashflowSchedule::default().generate(&b).unwrap();
        assert_eq!(flows.len(), 4);
        assert_eq!(flows.flows()[0].date(), date(2025, 7, 15));
        assert_eq!(flows.flows()[0].accrual_start(), Some(date(2025, 1, 14)));
    }

    #[test]
    fn test_near_full_stub_absorbed() {
        // Issue one day after a grid date: treated as a full period
        let b = bond(0.06, Frequency::SemiAnnual, date(2025, 1, 16), date(2027, 1, 15));
        let flows = CashflowSchedule::default().generate(&b).unwrap();
        assert_eq!(flows.len(), 4);
        assert_eq!(flows.final_time(), 2.0);
    }

    #[test]
    fn test_odd_stub_rejected() {
        let b = bond(0.06, Frequency::SemiAnnual, date(2025, 4, 1), date(2027, 1, 15));
        let result = CashflowSchedule::default().generate(&b);
        assert!(matches!(
            result,
            Err(FixedIncomeError::InvalidInstrument { .. })
        ));

        // Zero tolerance rejects even a one-day stub
        let b = bond(0.06, Frequency::SemiAnnual, date(2025, 1, 16), date(2027, 1, 15));
        let strict = CashflowSchedule::new().with_period_tolerance(0.0);
        assert!(strict.generate(&b).is_err());
    }

    #[test]
    fn test_invalid_tolerance() {
        let b = bond(0.06, Frequency::SemiAnnual, date(2025, 1, 15), date(2027, 1, 15));
        let schedule = CashflowSchedule::new().with_period_tolerance(0.6);
        assert!(matches!(
            schedule.generate(&b),
            Err(FixedIncomeError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_generate_as_of_mid_period() {
        let b = bond(0.05, Frequency::Annual, date(2025, 1, 15), date(2028, 1, 15));
        // 2025-07-15 is 181 of 365 days into the first period
        let flows = CashflowSchedule::default()
            .generate_as_of(&b, date(2025, 7, 15), TimeMeasure::CouponPeriods)
            .unwrap();
        assert_eq!(flows.len(), 3);
        assert_relative_eq!(flows.flows()[0].time(), 1.0 - 181.0 / 365.0, epsilon = 1e-12);
        assert_relative_eq!(flows.final_time(), 3.0 - 181.0 / 365.0, epsilon = 1e-12);
    }

    #[test]
    fn test_generate_as_of_coupon_date_excludes_paid_flow() {
        let b = bond(0.05, Frequency::Annual, date(2025, 1, 15), date(2028, 1, 15));
        let flows = CashflowSchedule::default()
            .generate_as_of(&b, date(2026, 1, 15), TimeMeasure::CouponPeriods)
            .unwrap();
        assert_eq!(flows.len(), 2);
        assert_eq!(flows.flows()[0].time(), 1.0);
    }

    #[test]
    fn test_day_count_measure() {
        let b = bond(0.05, Frequency::Annual, date(2025, 1, 1), date(2027, 1, 1));
        let flows = CashflowSchedule::default()
            .generate_as_of(&b, date(2025, 1, 1), TimeMeasure::DayCount(DayCountConvention::Act360))
            .unwrap();
        assert_relative_eq!(flows.flows()[0].time(), 365.0 / 360.0, epsilon = 1e-12);
        assert_relative_eq!(flows.final_time(), 730.0 / 360.0, epsilon = 1e-12);
    }

    #[test]
    fn test_matured_instrument() {
        let b = bond(0.05, Frequency::Annual, date(2025, 1, 15), date(2028, 1, 15));
        let result = CashflowSchedule::default().generate_as_of(
            &b,
            date(2028, 1, 15),
            TimeMeasure::CouponPeriods,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_coupon_and_deposit() {
        let zero = Instrument::zero_coupon(
            100.0,
            date(2025, 1, 1),
            date(2035, 1, 1),
            DayCountConvention::ActActIsda,
        )
        .unwrap();
        let flows = CashflowSchedule::default().generate(&zero).unwrap();
        assert_eq!(flows.len(), 1);
        assert_eq!(flows.final_time(), 10.0);
        assert_eq!(flows.undiscounted_total(), 100.0);

        let dep = Instrument::deposit(
            100.0,
            0.036,
            date(2025, 1, 1),
            date(2025, 4, 1),
            DayCountConvention::Act360,
        )
        .unwrap();
        let flows = CashflowSchedule::default().generate(&dep).unwrap();
        assert_relative_eq!(flows.undiscounted_total(), 100.9, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_rate_bond_pays_only_principal() {
        let b = bond(0.0, Frequency::Quarterly, date(2025, 1, 15), date(2026, 1, 15));
        let flows = CashflowSchedule::default().generate(&b).unwrap();
        assert_eq!(flows.len(), 1);
        assert_eq!(flows.final_time(), 1.0);
    }

    #[test]
    fn test_deterministic() {
        let b = bond(0.0375, Frequency::Monthly, date(2025, 1, 31), date(2030, 1, 31));
        let schedule = CashflowSchedule::default();
        assert_eq!(schedule.generate(&b).unwrap(), schedule.generate(&b).unwrap());
    }
}
