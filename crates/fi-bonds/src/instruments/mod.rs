//! Cashflow-bearing instruments.
//!
//! Every instrument is an [`Instrument`]: one immutable value whose
//! [`InstrumentKind`] tag decides how the schedule generator lays out its
//! payments. Pricing, yield and risk code never branches on the kind.

mod builder;

pub use builder::InstrumentBuilder;

use serde::{Deserialize, Serialize};
use std::fmt;

use fi_core::daycounts::DayCountConvention;
use fi_core::error::{FixedIncomeError, FixedIncomeResult};
use fi_core::types::{Date, Frequency};

/// Kind of instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstrumentKind {
    /// Periodic fixed coupons plus face value at maturity.
    FixedRateBond,
    /// Face value at maturity only.
    ZeroCoupon,
    /// Money-market deposit: `face * (1 + rate * yf)` at maturity.
    Deposit,
    /// Fixed leg of a par swap, with the notional exchanged at maturity.
    ParSwap,
}

impl InstrumentKind {
    /// Whether the kind pays periodic coupons.
    #[must_use]
    pub fn is_periodic(&self) -> bool {
        matches!(self, InstrumentKind::FixedRateBond | InstrumentKind::ParSwap)
    }
}

impl fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InstrumentKind::FixedRateBond => "Fixed Rate Bond",
            InstrumentKind::ZeroCoupon => "Zero Coupon",
            InstrumentKind::Deposit => "Deposit",
            InstrumentKind::ParSwap => "Par Swap",
        };
        write!(f, "{name}")
    }
}

/// An immutable instrument description.
///
/// Construction validates every field, so any `Instrument` value in hand
/// satisfies: maturity strictly after issue, positive face value, a finite
/// rate, and a frequency that divides twelve months (zero for single-payment
/// kinds). Deserialization runs the same checks.
///
/// # Example
///
/// ```rust
/// use fi_bonds::instruments::{Instrument, InstrumentKind};
/// use fi_core::prelude::*;
///
/// let zero = Instrument::zero_coupon(
///     100.0,
///     Date::from_ymd(2025, 1, 1).unwrap(),
///     Date::from_ymd(2035, 1, 1).unwrap(),
///     DayCountConvention::ActActIsda,
/// )
/// .unwrap();
///
/// assert_eq!(zero.kind(), InstrumentKind::ZeroCoupon);
/// assert_eq!(zero.coupon_rate(), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "InstrumentFields", into = "InstrumentFields")]
pub struct Instrument {
    kind: InstrumentKind,
    face_value: f64,
    coupon_rate: f64,
    frequency: Frequency,
    issue_date: Date,
    maturity: Date,
    day_count: DayCountConvention,
    end_of_month: bool,
}

impl Instrument {
    /// Starts a builder.
    #[must_use]
    pub fn builder() -> InstrumentBuilder {
        InstrumentBuilder::new()
    }

    /// Creates a fixed-rate coupon bond.
    pub fn fixed_rate_bond(
        face_value: f64,
        coupon_rate: f64,
        frequency: Frequency,
        issue_date: Date,
        maturity: Date,
        day_count: DayCountConvention,
    ) -> FixedIncomeResult<Self> {
        Self::validated(
            InstrumentKind::FixedRateBond,
            face_value,
            coupon_rate,
            frequency,
            issue_date,
            maturity,
            day_count,
            true,
        )
    }

    /// Creates a zero-coupon bond.
    pub fn zero_coupon(
        face_value: f64,
        issue_date: Date,
        maturity: Date,
        day_count: DayCountConvention,
    ) -> FixedIncomeResult<Self> {
        Self::validated(
            InstrumentKind::ZeroCoupon,
            face_value,
            0.0,
            Frequency::Zero,
            issue_date,
            maturity,
            day_count,
            true,
        )
    }

    /// Creates a money-market deposit paying simple interest at maturity.
    pub fn deposit(
        face_value: f64,
        rate: f64,
        start: Date,
        maturity: Date,
        day_count: DayCountConvention,
    ) -> FixedIncomeResult<Self> {
        Self::validated(
            InstrumentKind::Deposit,
            face_value,
            rate,
            Frequency::Zero,
            start,
            maturity,
            day_count,
            true,
        )
    }

    /// Creates the fixed leg of a par swap, notional exchanged at maturity.
    pub fn par_swap(
        notional: f64,
        fixed_rate: f64,
        frequency: Frequency,
        start: Date,
        maturity: Date,
        day_count: DayCountConvention,
    ) -> FixedIncomeResult<Self> {
        Self::validated(
            InstrumentKind::ParSwap,
            notional,
            fixed_rate,
            frequency,
            start,
            maturity,
            day_count,
            true,
        )
    }

    /// Returns a copy with the end-of-month rule switched on or off.
    ///
    /// With the rule on (the default), a month-end maturity rolls back to
    /// month-end coupon dates.
    #[must_use]
    pub fn with_end_of_month(mut self, end_of_month: bool) -> Self {
        self.end_of_month = end_of_month;
        self
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn validated(
        kind: InstrumentKind,
        face_value: f64,
        coupon_rate: f64,
        frequency: Frequency,
        issue_date: Date,
        maturity: Date,
        day_count: DayCountConvention,
        end_of_month: bool,
    ) -> FixedIncomeResult<Self> {
        if maturity <= issue_date {
            return Err(FixedIncomeError::invalid_instrument(format!(
                "maturity {maturity} must be after issue {issue_date}"
            )));
        }
        if !face_value.is_finite() || face_value <= 0.0 {
            return Err(FixedIncomeError::invalid_instrument(format!(
                "face value must be positive, got {face_value}"
            )));
        }
        if !coupon_rate.is_finite() {
            return Err(FixedIncomeError::invalid_instrument(format!(
                "rate must be finite, got {coupon_rate}"
            )));
        }

        match kind {
            InstrumentKind::FixedRateBond | InstrumentKind::ParSwap => {
                if frequency.is_zero() {
                    return Err(FixedIncomeError::invalid_instrument(format!(
                        "{kind} needs a coupon frequency"
                    )));
                }
                if coupon_rate < 0.0 {
                    return Err(FixedIncomeError::invalid_instrument(format!(
                        "coupon rate must be non-negative, got {coupon_rate}"
                    )));
                }
            }
            InstrumentKind::ZeroCoupon => {
                if !frequency.is_zero() || coupon_rate != 0.0 {
                    return Err(FixedIncomeError::invalid_instrument(
                        "zero-coupon bond must have zero rate and zero frequency",
                    ));
                }
            }
            InstrumentKind::Deposit => {
                if !frequency.is_zero() {
                    return Err(FixedIncomeError::invalid_instrument(
                        "deposit pays once; frequency must be zero",
                    ));
                }
                let yf = day_count.year_fraction_f64(issue_date, maturity)?;
                if 1.0 + coupon_rate * yf <= 0.0 {
                    return Err(FixedIncomeError::invalid_instrument(format!(
                        "deposit rate {coupon_rate} gives a non-positive redemption"
                    )));
                }
            }
        }

        Ok(Self {
            kind,
            face_value,
            coupon_rate,
            frequency,
            issue_date,
            maturity,
            day_count,
            end_of_month,
        })
    }

    /// Instrument kind.
    #[must_use]
    pub fn kind(&self) -> InstrumentKind {
        self.kind
    }

    /// Face value (notional for swaps).
    #[must_use]
    pub fn face_value(&self) -> f64 {
        self.face_value
    }

    /// Annual coupon (or deposit) rate as a decimal.
    #[must_use]
    pub fn coupon_rate(&self) -> f64 {
        self.coupon_rate
    }

    /// Payment frequency.
    #[must_use]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Issue (or start) date.
    #[must_use]
    pub fn issue_date(&self) -> Date {
        self.issue_date
    }

    /// Maturity date.
    #[must_use]
    pub fn maturity(&self) -> Date {
        self.maturity
    }

    /// Day count convention.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Whether the end-of-month rule applies when rolling coupon dates.
    #[must_use]
    pub fn end_of_month(&self) -> bool {
        self.end_of_month
    }

    /// Coupon paid each regular period; zero for single-payment kinds.
    #[must_use]
    pub fn coupon_per_period(&self) -> f64 {
        match self.frequency.periods_per_year() {
            0 => 0.0,
            n => self.face_value * self.coupon_rate / f64::from(n),
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.4}% {} {}..{}",
            self.kind,
            self.coupon_rate * 100.0,
            self.frequency,
            self.issue_date,
            self.maturity
        )
    }
}

/// Serialized form of [`Instrument`]; validated on the way in.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct InstrumentFields {
    kind: InstrumentKind,
    face_value: f64,
    #[serde(default)]
    coupon_rate: f64,
    #[serde(default = "zero_frequency")]
    frequency: Frequency,
    issue_date: Date,
    maturity: Date,
    #[serde(default)]
    day_count: DayCountConvention,
    #[serde(default = "default_true")]
    end_of_month: bool,
}

fn zero_frequency() -> Frequency {
    Frequency::Zero
}

fn default_true() -> bool {
    true
}

impl TryFrom<InstrumentFields> for Instrument {
    type Error = FixedIncomeError;

    fn try_from(f: InstrumentFields) -> Result<Self, Self::Error> {
        Self::validated(
            f.kind,
            f.face_value,
            f.coupon_rate,
            f.frequency,
            f.issue_date,
            f.maturity,
            f.day_count,
            f.end_of_month,
        )
    }
}

impl From<Instrument> for InstrumentFields {
    fn from(i: Instrument) -> Self {
        Self {
            kind: i.kind,
            face_value: i.face_value,
            coupon_rate: i.coupon_rate,
            frequency: i.frequency,
            issue_date: i.issue_date,
            maturity: i.maturity,
            day_count: i.day_count,
            end_of_month: i.end_of_month,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_fixed_rate_bond() {
        let bond = Instrument::fixed_rate_bond(
            100.0,
            0.05,
            Frequency::SemiAnnual,
            date(2025, 1, 15),
            date(2030, 1, 15),
            DayCountConvention::Thirty360US,
        )
        .unwrap();

        assert_eq!(bond.kind(), InstrumentKind::FixedRateBond);
        assert_eq!(bond.coupon_per_period(), 2.5);
        assert!(bond.end_of_month());
    }

    #[test]
    fn test_maturity_must_follow_issue() {
        let result = Instrument::zero_coupon(
            100.0,
            date(2025, 1, 15),
            date(2025, 1, 15),
            DayCountConvention::Act365Fixed,
        );
        assert!(matches!(
            result,
            Err(FixedIncomeError::InvalidInstrument { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_fields() {
        let issue = date(2025, 1, 15);
        let mat = date(2030, 1, 15);
        let dc = DayCountConvention::ActActIcma;

        assert!(Instrument::fixed_rate_bond(0.0, 0.05, Frequency::Annual, issue, mat, dc).is_err());
        assert!(Instrument::fixed_rate_bond(100.0, f64::NAN, Frequency::Annual, issue, mat, dc).is_err());
        assert!(Instrument::fixed_rate_bond(100.0, -0.01, Frequency::Annual, issue, mat, dc).is_err());
        assert!(Instrument::fixed_rate_bond(100.0, 0.05, Frequency::Zero, issue, mat, dc).is_err());
        assert!(Instrument::par_swap(1e6, 0.03, Frequency::Zero, issue, mat, dc).is_err());
        assert!(Instrument::deposit(100.0, -2.0, issue, mat, dc).is_err());
    }

    #[test]
    fn test_coupon_per_period_zero_for_single_payment() {
        let dep = Instrument::deposit(
            100.0,
            0.04,
            date(2025, 1, 15),
            date(2025, 7, 15),
            DayCountConvention::Act360,
        )
        .unwrap();
        assert_eq!(dep.coupon_per_period(), 0.0);
    }

    #[test]
    fn test_serde_validates() {
        let bond = Instrument::fixed_rate_bond(
            100.0,
            0.05,
            Frequency::Annual,
            date(2025, 1, 15),
            date(2035, 1, 15),
            DayCountConvention::ActActIcma,
        )
        .unwrap();
        let json = serde_json::to_string(&bond).unwrap();
        let back: Instrument = serde_json::from_str(&json).unwrap();
        assert_eq!(bond, back);

        let bad = json.replace("2035-01-15", "2024-01-15");
        assert!(serde_json::from_str::<Instrument>(&bad).is_err());
    }
}
