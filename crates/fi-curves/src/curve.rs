//! Discount curve.
//!
//! A [`DiscountCurve`] holds discount factors at pillar times (year
//! fractions from the valuation date under the curve's time basis). The
//! valuation date itself is always a pillar with discount factor one.
//! Pillar values are exact; everything else comes from the interpolation
//! mode inside the pillar range and the extrapolation mode beyond it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use fi_core::daycounts::DayCountConvention;
use fi_core::error::{FixedIncomeError, FixedIncomeResult};
use fi_core::traits::Discounter;
use fi_core::types::{Compounding, Date};

use crate::interpolation::{CurveInterpolator, ExtrapolationMethod, InterpolationMethod, Kernel};

/// Construction options shared by curves and the bootstrapper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveOptions {
    /// Interpolation between pillars.
    pub interpolation: InterpolationMethod,
    /// Extrapolation beyond the last pillar.
    pub extrapolation: ExtrapolationMethod,
    /// Day count turning dates into pillar times.
    pub time_basis: DayCountConvention,
    /// Admit increasing discount factors (negative forward rates).
    pub allow_negative_forwards: bool,
}

impl Default for CurveOptions {
    fn default() -> Self {
        Self {
            interpolation: InterpolationMethod::LogLinear,
            extrapolation: ExtrapolationMethod::FlatForward,
            time_basis: DayCountConvention::Act365Fixed,
            allow_negative_forwards: false,
        }
    }
}

impl CurveOptions {
    /// Sets the interpolation method.
    #[must_use]
    pub fn with_interpolation(mut self, interpolation: InterpolationMethod) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Sets the extrapolation method.
    #[must_use]
    pub fn with_extrapolation(mut self, extrapolation: ExtrapolationMethod) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    /// Sets the time basis.
    #[must_use]
    pub fn with_time_basis(mut self, time_basis: DayCountConvention) -> Self {
        self.time_basis = time_basis;
        self
    }

    /// Admits or rejects negative forward rates.
    #[must_use]
    pub fn with_negative_forwards(mut self, allow: bool) -> Self {
        self.allow_negative_forwards = allow;
        self
    }
}

/// A zero-coupon discount curve.
///
/// Immutable once built; share it freely across threads for concurrent
/// pricing.
///
/// # Example
///
/// ```rust
/// use fi_core::prelude::*;
/// use fi_curves::prelude::*;
///
/// let curve = DiscountCurve::new(
///     Date::from_ymd(2025, 1, 2).unwrap(),
///     &[(1.0, 0.97), (2.0, 0.935), (5.0, 0.84)],
///     CurveOptions::default(),
/// )
/// .unwrap();
///
/// assert_eq!(curve.discount_factor(2.0).unwrap(), 0.935);
/// let df = curve.discount_factor(3.0).unwrap();
/// assert!(df < 0.935 && df > 0.84);
///
/// // Flat forward beyond the last pillar
/// let zero_10y = curve.zero_rate(10.0, Compounding::Continuous).unwrap();
/// assert!(zero_10y > 0.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "CurveData", into = "CurveData")]
pub struct DiscountCurve {
    valuation_date: Date,
    options: CurveOptions,
    times: Vec<f64>,
    dfs: Vec<f64>,
    kernel: Kernel,
}

impl DiscountCurve {
    /// Builds a curve from `(time, discount factor)` pillars.
    ///
    /// The valuation date pillar `(0, 1)` is added when absent.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for negative, non-finite or non-increasing times,
    ///   or a discount factor other than one at time zero
    /// - `InvalidDiscounter` for a non-positive or non-finite discount factor
    /// - `NonMonotoneCurve` for an increasing discount factor when negative
    ///   forwards are not admitted
    /// - `InsufficientQuotes` when no pillar lies after the valuation date
    pub fn new(
        valuation_date: Date,
        pillars: &[(f64, f64)],
        options: CurveOptions,
    ) -> FixedIncomeResult<Self> {
        Self::assemble(valuation_date, pillars, options, None)
    }

    /// Builds a curve from continuously compounded zero rates.
    pub fn from_zero_rates(
        valuation_date: Date,
        zero_rates: &[(f64, f64)],
        options: CurveOptions,
    ) -> FixedIncomeResult<Self> {
        let pillars: Vec<(f64, f64)> = zero_rates
            .iter()
            .map(|(t, z)| (*t, (-z * t).exp()))
            .collect();
        Self::new(valuation_date, &pillars, options)
    }

    /// Replaces the interpolation mode with a custom scheme.
    ///
    /// The scheme is probed at every segment midpoint before the curve is
    /// returned.
    ///
    /// # Errors
    ///
    /// `NonMonotoneCurve` or `InvalidDiscounter` if a probe fails.
    pub fn with_custom_interpolator(
        self,
        interpolator: Arc<dyn CurveInterpolator>,
    ) -> FixedIncomeResult<Self> {
        let pillars = self.pillars();
        Self::assemble(self.valuation_date, &pillars, self.options, Some(&interpolator))
    }

    pub(crate) fn assemble(
        valuation_date: Date,
        pillars: &[(f64, f64)],
        options: CurveOptions,
        custom: Option<&Arc<dyn CurveInterpolator>>,
    ) -> FixedIncomeResult<Self> {
        let mut times = Vec::with_capacity(pillars.len() + 1);
        let mut dfs = Vec::with_capacity(pillars.len() + 1);
        times.push(0.0);
        dfs.push(1.0);

        for (i, &(t, df)) in pillars.iter().enumerate() {
            if !t.is_finite() || t < 0.0 {
                return Err(FixedIncomeError::invalid_input(format!(
                    "pillar time must be finite and non-negative, got {t}"
                )));
            }
            if t == 0.0 && i == 0 {
                if (df - 1.0).abs() > 1e-12 {
                    return Err(FixedIncomeError::invalid_input(format!(
                        "discount factor at the valuation date must be 1, got {df}"
                    )));
                }
                continue;
            }

            let prev_t = times[times.len() - 1];
            let prev_df = dfs[dfs.len() - 1];
            if t <= prev_t {
                return Err(FixedIncomeError::invalid_input(format!(
                    "pillar times must be strictly increasing: {t} after {prev_t}"
                )));
            }
            if !df.is_finite() || df <= 0.0 {
                return Err(FixedIncomeError::invalid_discounter(t, df));
            }
            if !options.allow_negative_forwards && df > prev_df {
                return Err(FixedIncomeError::non_monotone(t, prev_df, df));
            }
            times.push(t);
            dfs.push(df);
        }

        if times.len() < 2 {
            return Err(FixedIncomeError::insufficient_quotes(
                "a curve needs at least one pillar after the valuation date",
            ));
        }

        let kernel = Kernel::build(options.interpolation, custom, &times, &dfs)?;
        let curve = Self {
            valuation_date,
            options,
            times,
            dfs,
            kernel,
        };

        if curve.is_custom() {
            for pair in curve.times.windows(2) {
                curve.discount_factor(0.5 * (pair[0] + pair[1]))?;
            }
        }
        Ok(curve)
    }

    /// Valuation date (time zero).
    #[must_use]
    pub fn valuation_date(&self) -> Date {
        self.valuation_date
    }

    /// Construction options.
    #[must_use]
    pub fn options(&self) -> CurveOptions {
        self.options
    }

    /// Returns true if a custom interpolator replaces the built-in mode.
    #[must_use]
    pub fn is_custom(&self) -> bool {
        self.kernel.custom().is_some()
    }

    /// Pillar times, starting with 0.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Pillar discount factors, starting with 1.
    #[must_use]
    pub fn discount_factors(&self) -> &[f64] {
        &self.dfs
    }

    /// `(time, discount factor)` pairs, starting with `(0, 1)`.
    #[must_use]
    pub fn pillars(&self) -> Vec<(f64, f64)> {
        self.times.iter().copied().zip(self.dfs.iter().copied()).collect()
    }

    /// Number of pillars, the valuation date included.
    #[must_use]
    pub fn pillar_count(&self) -> usize {
        self.times.len()
    }

    /// Time of the last pillar.
    #[must_use]
    pub fn max_time(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    /// Year fraction from the valuation date to `date` under the time basis.
    ///
    /// # Errors
    ///
    /// `InvalidDateRange` if `date` is before the valuation date.
    pub fn time_to(&self, date: Date) -> FixedIncomeResult<f64> {
        self.options
            .time_basis
            .year_fraction_f64(self.valuation_date, date)
    }

    /// Discount factor at `t` years.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a negative or non-finite `t`
    /// - `NonMonotoneCurve` / `InvalidDiscounter` when a custom interpolator
    ///   returns a value inconsistent with its neighbouring pillars
    pub fn discount_factor(&self, t: f64) -> FixedIncomeResult<f64> {
        if !t.is_finite() || t < 0.0 {
            return Err(FixedIncomeError::invalid_input(format!(
                "curve time must be finite and non-negative, got {t}"
            )));
        }
        if t > self.max_time() {
            return Ok(self.extrapolate(t));
        }
        if let Ok(i) = self.times.binary_search_by(|probe| probe.total_cmp(&t)) {
            return Ok(self.dfs[i]);
        }

        let df = self.kernel.value(&self.times, &self.dfs, t)?;
        if self.is_custom() {
            self.check_custom(t, df)?;
        }
        Ok(df)
    }

    /// Discount factor at a calendar date.
    pub fn discount_factor_at(&self, date: Date) -> FixedIncomeResult<f64> {
        self.discount_factor(self.time_to(date)?)
    }

    /// Zero rate to `t` under `compounding`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` unless `t > 0`.
    pub fn zero_rate(&self, t: f64, compounding: Compounding) -> FixedIncomeResult<f64> {
        if t.partial_cmp(&0.0) != Some(std::cmp::Ordering::Greater) {
            return Err(FixedIncomeError::invalid_input(format!(
                "zero rate needs a positive time, got {t}"
            )));
        }
        let df = self.discount_factor(t)?;
        Ok(compounding.zero_rate(df, t))
    }

    /// Forward rate between `t1` and `t2` under `compounding`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` unless `0 <= t1 < t2`.
    pub fn forward_rate(
        &self,
        t1: f64,
        t2: f64,
        compounding: Compounding,
    ) -> FixedIncomeResult<f64> {
        if !(t1 >= 0.0 && t2 > t1) {
            return Err(FixedIncomeError::invalid_input(format!(
                "forward period must satisfy 0 <= t1 < t2, got [{t1}, {t2}]"
            )));
        }
        let df1 = self.discount_factor(t1)?;
        let df2 = self.discount_factor(t2)?;
        Ok(compounding.zero_rate(df2 / df1, t2 - t1))
    }

    /// Parallel shift of continuously compounded zero rates at every pillar.
    ///
    /// Exact everywhere for the log-linear and monotone cubic modes. A
    /// downward shift can push a near-zero forward below zero, so the copy
    /// admits negative forwards.
    pub fn shifted(&self, shift: f64) -> FixedIncomeResult<Self> {
        let pillars: Vec<(f64, f64)> = self
            .pillars()
            .into_iter()
            .map(|(t, df)| (t, df * (-shift * t).exp()))
            .collect();
        Self::assemble(
            self.valuation_date,
            &pillars,
            self.options.with_negative_forwards(true),
            self.kernel.custom(),
        )
    }

    /// Shifts the zero rate of one pillar (index 1 is the first pillar after
    /// the valuation date).
    ///
    /// The bumped copy admits negative forwards, since a bump can invert a
    /// flat segment.
    pub fn bumped_at(&self, index: usize, shift: f64) -> FixedIncomeResult<Self> {
        if index == 0 || index >= self.times.len() {
            return Err(FixedIncomeError::invalid_input(format!(
                "pillar index must lie in 1..{}, got {index}",
                self.times.len()
            )));
        }
        let mut pillars = self.pillars();
        let (t, df) = pillars[index];
        pillars[index] = (t, df * (-shift * t).exp());
        Self::assemble(
            self.valuation_date,
            &pillars,
            self.options.with_negative_forwards(true),
            self.kernel.custom(),
        )
    }

    fn extrapolate(&self, t: f64) -> f64 {
        let n = self.times.len() - 1;
        let (t_n, df_n) = (self.times[n], self.dfs[n]);
        match self.options.extrapolation {
            ExtrapolationMethod::FlatForward => {
                let (t_p, df_p) = (self.times[n - 1], self.dfs[n - 1]);
                let forward = (df_p / df_n).ln() / (t_n - t_p);
                df_n * (-forward * (t - t_n)).exp()
            }
            ExtrapolationMethod::FlatZero => {
                let zero = -df_n.ln() / t_n;
                (-zero * t).exp()
            }
        }
    }

    fn check_custom(&self, t: f64, df: f64) -> FixedIncomeResult<()> {
        if !df.is_finite() || df <= 0.0 {
            return Err(FixedIncomeError::invalid_discounter(t, df));
        }
        if self.options.allow_negative_forwards {
            return Ok(());
        }
        let i = self.times.partition_point(|x| *x < t).saturating_sub(1);
        let (left, right) = (self.dfs[i], self.dfs[i + 1]);
        if df > left {
            return Err(FixedIncomeError::non_monotone(t, left, df));
        }
        if df < right {
            return Err(FixedIncomeError::non_monotone(self.times[i + 1], df, right));
        }
        Ok(())
    }
}

impl Discounter for DiscountCurve {
    fn discount_factor(&self, t: f64) -> FixedIncomeResult<f64> {
        DiscountCurve::discount_factor(self, t)
    }
}

/// Serialized form: the pillars and options. A custom interpolator is not
/// serialized; a deserialized curve uses `options.interpolation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CurveData {
    valuation_date: Date,
    #[serde(default)]
    options: CurveOptions,
    pillars: Vec<(f64, f64)>,
}

impl TryFrom<CurveData> for DiscountCurve {
    type Error = FixedIncomeError;

    fn try_from(data: CurveData) -> Result<Self, Self::Error> {
        Self::new(data.valuation_date, &data.pillars, data.options)
    }
}

impl From<DiscountCurve> for CurveData {
    fn from(curve: DiscountCurve) -> Self {
        Self {
            valuation_date: curve.valuation_date,
            options: curve.options,
            pillars: curve.pillars(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn today() -> Date {
        Date::from_ymd(2025, 1, 2).unwrap()
    }

    fn sample(options: CurveOptions) -> DiscountCurve {
        DiscountCurve::from_zero_rates(
            today(),
            &[(0.5, 0.030), (1.0, 0.032), (2.0, 0.035), (5.0, 0.040), (10.0, 0.042)],
            options,
        )
        .unwrap()
    }

    #[derive(Debug)]
    struct Midpoint;

    impl CurveInterpolator for Midpoint {
        fn name(&self) -> &str {
            "midpoint"
        }

        fn discount_factor(&self, times: &[f64], dfs: &[f64], t: f64) -> f64 {
            let i = times.partition_point(|x| *x < t) - 1;
            0.5 * (dfs[i] + dfs[i + 1])
        }
    }

    #[derive(Debug)]
    struct Overshoot;

    impl CurveInterpolator for Overshoot {
        fn name(&self) -> &str {
            "overshoot"
        }

        fn discount_factor(&self, _times: &[f64], _dfs: &[f64], _t: f64) -> f64 {
            1.01
        }
    }

    #[test]
    fn test_pillars_are_exact() {
        let curve = sample(CurveOptions::default());
        assert_eq!(curve.pillar_count(), 6);
        assert_eq!(curve.discount_factor(0.0).unwrap(), 1.0);
        assert_relative_eq!(
            curve.discount_factor(2.0).unwrap(),
            (-0.07f64).exp(),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_monotone_for_local_modes() {
        for method in [InterpolationMethod::Linear, InterpolationMethod::LogLinear] {
            let curve = sample(CurveOptions::default().with_interpolation(method));
            let mut prev = 1.0;
            for i in 1..=300 {
                let df = curve.discount_factor(f64::from(i) * 0.05).unwrap();
                assert!(df <= prev, "{method}: DF increased at step {i}");
                prev = df;
            }
        }
    }

    #[test]
    fn test_zero_and_forward_rates() {
        let curve = sample(CurveOptions::default());
        assert_relative_eq!(
            curve.zero_rate(5.0, Compounding::Continuous).unwrap(),
            0.04,
            epsilon = 1e-12
        );
        // Log-linear forward on [2, 5]
        assert_relative_eq!(
            curve.forward_rate(2.5, 4.0, Compounding::Continuous).unwrap(),
            (0.20 - 0.07) / 3.0,
            epsilon = 1e-12
        );
        assert!(curve.zero_rate(0.0, Compounding::Annual).is_err());
        assert!(curve.forward_rate(3.0, 2.0, Compounding::Annual).is_err());
    }

    #[test]
    fn test_extrapolation_modes() {
        let forward = sample(CurveOptions::default());
        let last_forward = (0.42 - 0.20) / 5.0;
        assert_relative_eq!(
            forward.forward_rate(12.0, 20.0, Compounding::Continuous).unwrap(),
            last_forward,
            epsilon = 1e-12
        );

        let zero = sample(CurveOptions::default().with_extrapolation(ExtrapolationMethod::FlatZero));
        assert_relative_eq!(
            zero.zero_rate(30.0, Compounding::Continuous).unwrap(),
            0.042,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_monotone_cubic_smooth_between_pillars() {
        let curve = sample(CurveOptions::default().with_interpolation(InterpolationMethod::MonotoneCubicZero));
        let z = curve.zero_rate(3.0, Compounding::Continuous).unwrap();
        assert!(z > 0.035 && z < 0.040);
        // Flat short end
        assert_relative_eq!(
            curve.zero_rate(0.25, Compounding::Continuous).unwrap(),
            0.030,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_validation() {
        let opts = CurveOptions::default();
        assert!(matches!(
            DiscountCurve::new(today(), &[(1.0, 0.97), (2.0, 0.98)], opts),
            Err(FixedIncomeError::NonMonotoneCurve { .. })
        ));
        assert!(DiscountCurve::new(today(), &[(1.0, 0.97), (2.0, 0.98)], opts.with_negative_forwards(true)).is_ok());
        assert!(matches!(
            DiscountCurve::new(today(), &[(1.0, -0.5)], opts),
            Err(FixedIncomeError::InvalidDiscounter { .. })
        ));
        assert!(matches!(
            DiscountCurve::new(today(), &[], opts),
            Err(FixedIncomeError::InsufficientQuotes { .. })
        ));
        assert!(DiscountCurve::new(today(), &[(2.0, 0.9), (1.0, 0.95)], opts).is_err());
        assert!(DiscountCurve::new(today(), &[(0.0, 0.99), (1.0, 0.95)], opts).is_err());
        assert!(DiscountCurve::new(today(), &[(0.0, 1.0), (1.0, 0.95)], opts).is_ok());
        assert!(sample(opts).discount_factor(-1.0).is_err());
    }

    #[test]
    fn test_custom_interpolator() {
        let curve = sample(CurveOptions::default())
            .with_custom_interpolator(Arc::new(Midpoint))
            .unwrap();
        assert!(curve.is_custom());
        let expected = 0.5 * ((-0.07f64).exp() + (-0.2f64).exp());
        assert_relative_eq!(curve.discount_factor(3.0).unwrap(), expected, epsilon = 1e-15);

        let err = sample(CurveOptions::default())
            .with_custom_interpolator(Arc::new(Overshoot))
            .unwrap_err();
        assert!(matches!(err, FixedIncomeError::NonMonotoneCurve { .. }));
    }

    #[test]
    fn test_shift_and_bump() {
        let curve = sample(CurveOptions::default());
        let up = curve.shifted(0.0001).unwrap();
        for t in [0.3, 1.7, 4.0, 12.0] {
            assert_relative_eq!(
                up.zero_rate(t, Compounding::Continuous).unwrap()
                    - curve.zero_rate(t, Compounding::Continuous).unwrap(),
                0.0001,
                epsilon = 1e-12
            );
        }

        let bumped = curve.bumped_at(3, 0.0001).unwrap();
        assert_relative_eq!(
            bumped.zero_rate(2.0, Compounding::Continuous).unwrap(),
            0.0351,
            epsilon = 1e-12
        );
        assert_eq!(
            bumped.discount_factor(10.0).unwrap(),
            curve.discount_factor(10.0).unwrap()
        );
        assert!(curve.bumped_at(0, 0.0001).is_err());
        assert!(curve.bumped_at(6, 0.0001).is_err());
    }

    #[test]
    fn test_dates_and_serde() {
        let curve = sample(CurveOptions::default());
        let one_year = Date::from_ymd(2026, 1, 2).unwrap();
        assert_relative_eq!(curve.time_to(one_year).unwrap(), 1.0, epsilon = 1e-15);
        assert_relative_eq!(
            curve.discount_factor_at(one_year).unwrap(),
            (-0.032f64).exp(),
            epsilon = 1e-15
        );
        assert!(curve.discount_factor_at(Date::from_ymd(2024, 1, 1).unwrap()).is_err());

        let json = serde_json::to_string(&curve).unwrap();
        let back: DiscountCurve = serde_json::from_str(&json).unwrap();
        assert_eq!(back.pillars(), curve.pillars());
        assert_eq!(back.options(), curve.options());
    }
}
