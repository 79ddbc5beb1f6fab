//! Frequency and compounding types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FixedIncomeError, FixedIncomeResult};

/// Payment frequency for coupon-bearing instruments.
///
/// Regular frequencies divide the year into whole months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Frequency {
    /// Annual payments (1 per year)
    Annual,
    /// Semi-annual payments (2 per year)
    #[default]
    SemiAnnual,
    /// Every four months (3 per year)
    TriAnnual,
    /// Quarterly payments (4 per year)
    Quarterly,
    /// Every two months (6 per year)
    BiMonthly,
    /// Monthly payments (12 per year)
    Monthly,
    /// Zero coupon (no periodic payments)
    Zero,
}

impl Frequency {
    /// Builds a frequency from a number of payments per year.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInstrument` unless `periods` is 0 or divides 12.
    pub fn from_periods_per_year(periods: u32) -> FixedIncomeResult<Self> {
        match periods {
            0 => Ok(Frequency::Zero),
            1 => Ok(Frequency::Annual),
            2 => Ok(Frequency::SemiAnnual),
            3 => Ok(Frequency::TriAnnual),
            4 => Ok(Frequency::Quarterly),
            6 => Ok(Frequency::BiMonthly),
            12 => Ok(Frequency::Monthly),
            other => Err(FixedIncomeError::invalid_instrument(format!(
                "frequency {other} does not divide 12"
            ))),
        }
    }

    /// Returns the number of periods per year.
    #[must_use]
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Frequency::Annual => 1,
            Frequency::SemiAnnual => 2,
            Frequency::TriAnnual => 3,
            Frequency::Quarterly => 4,
            Frequency::BiMonthly => 6,
            Frequency::Monthly => 12,
            Frequency::Zero => 0,
        }
    }

    /// Returns the number of months per period.
    #[must_use]
    pub fn months_per_period(&self) -> u32 {
        match self.periods_per_year() {
            0 => 0,
            n => 12 / n,
        }
    }

    /// Returns true if this is a zero coupon (no periodic payments).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        matches!(self, Frequency::Zero)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Annual => "Annual",
            Frequency::SemiAnnual => "Semi-Annual",
            Frequency::TriAnnual => "Tri-Annual",
            Frequency::Quarterly => "Quarterly",
            Frequency::BiMonthly => "Bi-Monthly",
            Frequency::Monthly => "Monthly",
            Frequency::Zero => "Zero Coupon",
        };
        write!(f, "{name}")
    }
}

/// Interest compounding convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Compounding {
    /// Simple interest (no compounding)
    Simple,
    /// Annual compounding (1x per year)
    Annual,
    /// Semi-annual compounding (2x per year)
    #[default]
    SemiAnnual,
    /// Compounding every four months (3x per year)
    TriAnnual,
    /// Quarterly compounding (4x per year)
    Quarterly,
    /// Compounding every two months (6x per year)
    BiMonthly,
    /// Monthly compounding (12x per year)
    Monthly,
    /// Continuous compounding
    Continuous,
}

impl Compounding {
    /// Returns the number of compounding periods per year, or `None` for
    /// simple and continuous compounding.
    #[must_use]
    pub fn periods_per_year(&self) -> Option<u32> {
        match self {
            Compounding::Simple | Compounding::Continuous => None,
            Compounding::Annual => Some(1),
            Compounding::SemiAnnual => Some(2),
            Compounding::TriAnnual => Some(3),
            Compounding::Quarterly => Some(4),
            Compounding::BiMonthly => Some(6),
            Compounding::Monthly => Some(12),
        }
    }

    /// Discount factor for `rate` over `t` years.
    ///
    /// Periodic compounding: `(1 + r/n)^(-n t)`.
    #[must_use]
    pub fn discount_factor(&self, rate: f64, t: f64) -> f64 {
        match self {
            Compounding::Simple => 1.0 / (1.0 + rate * t),
            Compounding::Continuous => (-rate * t).exp(),
            periodic => {
                let n = f64::from(periodic.periods_per_year().unwrap_or(1));
                (1.0 + rate / n).powf(-n * t)
            }
        }
    }

    /// Derivative of [`Self::discount_factor`] with respect to the rate.
    #[must_use]
    pub fn discount_factor_derivative(&self, rate: f64, t: f64) -> f64 {
        match self {
            Compounding::Simple => -t / (1.0 + rate * t).powi(2),
            Compounding::Continuous => -t * (-rate * t).exp(),
            periodic => {
                let n = f64::from(periodic.periods_per_year().unwrap_or(1));
                -t * (1.0 + rate / n).powf(-n * t - 1.0)
            }
        }
    }

    /// Rate implied by discount factor `df` at `t` years.
    ///
    /// Returns 0 for `t <= 0`, where the rate is undefined.
    #[must_use]
    pub fn zero_rate(&self, df: f64, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        match self {
            Compounding::Simple => (1.0 / df - 1.0) / t,
            Compounding::Continuous => -df.ln() / t,
            periodic => {
                let n = f64::from(periodic.periods_per_year().unwrap_or(1));
                n * (df.powf(-1.0 / (n * t)) - 1.0)
            }
        }
    }

    /// Smallest admissible rate: below it periodic discount factors stop
    /// being positive and finite.
    #[must_use]
    pub fn rate_floor(&self) -> f64 {
        match self {
            Compounding::Continuous | Compounding::Simple => f64::NEG_INFINITY,
            periodic => -f64::from(periodic.periods_per_year().unwrap_or(1)),
        }
    }

    /// Returns true if this is continuous compounding.
    #[must_use]
    pub fn is_continuous(&self) -> bool {
        matches!(self, Compounding::Continuous)
    }
}

impl fmt::Display for Compounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Compounding::Simple => "Simple",
            Compounding::Annual => "Annual",
            Compounding::SemiAnnual => "Semi-Annual",
            Compounding::TriAnnual => "Tri-Annual",
            Compounding::Quarterly => "Quarterly",
            Compounding::BiMonthly => "Bi-Monthly",
            Compounding::Monthly => "Monthly",
            Compounding::Continuous => "Continuous",
        };
        write!(f, "{name}")
    }
}

impl From<Frequency> for Compounding {
    /// Zero coupons compound annually, so a zero's yield is
    /// `(face / price)^(1/t) - 1`.
    fn from(freq: Frequency) -> Self {
        match freq {
            Frequency::Annual | Frequency::Zero => Compounding::Annual,
            Frequency::SemiAnnual => Compounding::SemiAnnual,
            Frequency::TriAnnual => Compounding::TriAnnual,
            Frequency::Quarterly => Compounding::Quarterly,
            Frequency::BiMonthly => Compounding::BiMonthly,
            Frequency::Monthly => Compounding::Monthly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_frequency_periods() {
        assert_eq!(Frequency::Annual.periods_per_year(), 1);
        assert_eq!(Frequency::SemiAnnual.periods_per_year(), 2);
        assert_eq!(Frequency::TriAnnual.months_per_period(), 4);
        assert_eq!(Frequency::BiMonthly.months_per_period(), 2);
        assert_eq!(Frequency::Monthly.periods_per_year(), 12);
        assert_eq!(Frequency::Zero.periods_per_year(), 0);
        assert_eq!(Frequency::Zero.months_per_period(), 0);
    }

    #[test]
    fn test_frequency_from_periods() {
        for n in [0, 1, 2, 3, 4, 6, 12] {
            assert_eq!(
                Frequency::from_periods_per_year(n).unwrap().periods_per_year(),
                n
            );
        }
        assert!(matches!(
            Frequency::from_periods_per_year(5),
            Err(FixedIncomeError::InvalidInstrument { .. })
        ));
    }

    #[test]
    fn test_frequency_to_compounding() {
        let comp: Compounding = Frequency::SemiAnnual.into();
        assert_eq!(comp, Compounding::SemiAnnual);
        assert_eq!(Compounding::from(Frequency::Zero), Compounding::Annual);
    }

    #[test]
    fn test_discount_factor_roundtrip() {
        for comp in [
            Compounding::Simple,
            Compounding::Annual,
            Compounding::SemiAnnual,
            Compounding::Monthly,
            Compounding::Continuous,
        ] {
            let df = comp.discount_factor(0.045, 7.25);
            assert_relative_eq!(comp.zero_rate(df, 7.25), 0.045, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_discount_factor_derivative_matches_difference() {
        let comp = Compounding::SemiAnnual;
        let h = 1e-6;
        let numeric = (comp.discount_factor(0.05 + h, 3.0) - comp.discount_factor(0.05 - h, 3.0))
            / (2.0 * h);
        assert_relative_eq!(
            comp.discount_factor_derivative(0.05, 3.0),
            numeric,
            epsilon = 1e-8
        );
    }

    #[test]
    fn test_rate_floor() {
        assert_eq!(Compounding::SemiAnnual.rate_floor(), -2.0);
        assert_eq!(Compounding::Continuous.rate_floor(), f64::NEG_INFINITY);
    }
}
