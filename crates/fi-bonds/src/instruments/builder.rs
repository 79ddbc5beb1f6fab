//! Builder for [`Instrument`].

use fi_core::daycounts::DayCountConvention;
use fi_core::error::{FixedIncomeError, FixedIncomeResult};
use fi_core::types::{Date, Frequency};

use super::{Instrument, InstrumentKind};

/// Builder for [`Instrument`] values.
///
/// Missing dates are reported by [`build`](Self::build); everything else has
/// a default (face 100, rate 0, semi-annual, ACT/ACT ISDA, end-of-month on).
///
/// # Example
///
/// ```rust
/// use fi_bonds::instruments::{Instrument, InstrumentKind};
/// use fi_core::prelude::*;
///
/// let swap = Instrument::builder()
///     .kind(InstrumentKind::ParSwap)
///     .face_value(1_000_000.0)
///     .coupon_rate(0.035)
///     .periods_per_year(4)
///     .issue_date(Date::from_ymd(2025, 3, 20).unwrap())
///     .maturity(Date::from_ymd(2030, 3, 20).unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(swap.frequency(), Frequency::Quarterly);
/// ```
#[derive(Debug, Clone)]
pub struct InstrumentBuilder {
    kind: InstrumentKind,
    face_value: f64,
    coupon_rate: f64,
    frequency: Option<Frequency>,
    periods_per_year: Option<u32>,
    issue_date: Option<Date>,
    maturity: Option<Date>,
    day_count: DayCountConvention,
    end_of_month: bool,
}

impl Default for InstrumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InstrumentBuilder {
    /// Creates a builder for a fixed-rate bond with default fields.
    #[must_use]
    pub fn new() -> Self {
        Self {
            kind: InstrumentKind::FixedRateBond,
            face_value: 100.0,
            coupon_rate: 0.0,
            frequency: None,
            periods_per_year: None,
            issue_date: None,
            maturity: None,
            day_count: DayCountConvention::default(),
            end_of_month: true,
        }
    }

    /// Sets the instrument kind.
    #[must_use]
    pub fn kind(mut self, kind: InstrumentKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the face value.
    #[must_use]
    pub fn face_value(mut self, face_value: f64) -> Self {
        self.face_value = face_value;
        self
    }

    /// Sets the annual coupon rate as a decimal.
    #[must_use]
    pub fn coupon_rate(mut self, rate: f64) -> Self {
        self.coupon_rate = rate;
        self
    }

    /// Sets the payment frequency.
    #[must_use]
    pub fn frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = Some(frequency);
        self.periods_per_year = None;
        self
    }

    /// Sets the frequency as a count of payments per year.
    ///
    /// Validated in [`build`](Self::build): the count must divide 12.
    #[must_use]
    pub fn periods_per_year(mut self, periods: u32) -> Self {
        self.periods_per_year = Some(periods);
        self.frequency = None;
        self
    }

    /// Sets the issue date.
    #[must_use]
    pub fn issue_date(mut self, date: Date) -> Self {
        self.issue_date = Some(date);
        self
    }

    /// Sets the maturity date.
    #[must_use]
    pub fn maturity(mut self, date: Date) -> Self {
        self.maturity = Some(date);
        self
    }

    /// Sets the day count convention.
    #[must_use]
    pub fn day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Sets the end-of-month rule.
    #[must_use]
    pub fn end_of_month(mut self, end_of_month: bool) -> Self {
        self.end_of_month = end_of_month;
        self
    }

    /// Builds and validates the instrument.
    pub fn build(self) -> FixedIncomeResult<Instrument> {
        let issue_date = self
            .issue_date
            .ok_or_else(|| FixedIncomeError::invalid_instrument("issue date is required"))?;
        let maturity = self
            .maturity
            .ok_or_else(|| FixedIncomeError::invalid_instrument("maturity is required"))?;

        let frequency = match (self.frequency, self.periods_per_year) {
            (Some(f), _) => f,
            (None, Some(n)) => Frequency::from_periods_per_year(n)?,
            (None, None) if self.kind.is_periodic() => Frequency::SemiAnnual,
            (None, None) => Frequency::Zero,
        };

        Instrument::validated(
            self.kind,
            self.face_value,
            self.coupon_rate,
            frequency,
            issue_date,
            maturity,
            self.day_count,
            self.end_of_month,
        )
    }
}
