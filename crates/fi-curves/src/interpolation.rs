//! Interpolation and extrapolation modes for discount curves.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use fi_core::error::{FixedIncomeError, FixedIncomeResult};
use fi_math::interpolation::{
    Interpolator, LinearInterpolator, LogLinearInterpolator, MonotoneCubic,
};

/// How discount factors between pillars are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InterpolationMethod {
    /// Linear on discount factors.
    Linear,

    /// Linear on log discount factors: piecewise flat forward rates.
    #[default]
    LogLinear,

    /// Fritsch-Carlson monotone cubic on continuously compounded zero rates.
    MonotoneCubicZero,
}

impl InterpolationMethod {
    /// Returns true if moving one pillar only changes its adjacent segments.
    #[must_use]
    pub fn is_local(&self) -> bool {
        !matches!(self, Self::MonotoneCubicZero)
    }

    /// Returns true if non-increasing pillars give non-increasing discount
    /// factors everywhere.
    #[must_use]
    pub fn preserves_monotonicity(&self) -> bool {
        matches!(self, Self::Linear | Self::LogLinear)
    }
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Linear => "Linear",
            Self::LogLinear => "Log-Linear",
            Self::MonotoneCubicZero => "Monotone Cubic (Zero)",
        };
        write!(f, "{name}")
    }
}

impl FromStr for InterpolationMethod {
    type Err = FixedIncomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(|c: char| c == '_' || c == ' ', "-").as_str() {
            "linear" => Ok(Self::Linear),
            "log-linear" | "loglinear" | "flat-forward" => Ok(Self::LogLinear),
            "monotone-cubic" | "monotone-cubic-zero" | "spline" => Ok(Self::MonotoneCubicZero),
            other => Err(FixedIncomeError::invalid_input(format!(
                "unknown interpolation method: {other}"
            ))),
        }
    }
}

/// How discount factors beyond the last pillar are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ExtrapolationMethod {
    /// Continue the last segment's forward rate.
    #[default]
    FlatForward,

    /// Hold the last pillar's zero rate.
    FlatZero,
}

impl fmt::Display for ExtrapolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FlatForward => write!(f, "Flat Forward"),
            Self::FlatZero => write!(f, "Flat Zero"),
        }
    }
}

/// A user supplied interpolation scheme.
///
/// The curve calls it only for times strictly between two pillars, and
/// checks every value it returns against the neighbouring pillars: a value
/// outside `[DF(right), DF(left)]` is a `NonMonotoneCurve` error unless the
/// curve admits negative forwards.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use fi_core::types::Date;
/// use fi_curves::prelude::*;
///
/// /// Takes the left pillar's discount factor.
/// #[derive(Debug)]
/// struct StepLeft;
///
/// impl CurveInterpolator for StepLeft {
///     fn name(&self) -> &str {
///         "step-left"
///     }
///
///     fn discount_factor(&self, times: &[f64], dfs: &[f64], t: f64) -> f64 {
///         let i = times.partition_point(|x| *x < t) - 1;
///         dfs[i]
///     }
/// }
///
/// let curve = DiscountCurve::new(
///     Date::from_ymd(2025, 1, 2).unwrap(),
///     &[(1.0, 0.96), (2.0, 0.92)],
///     CurveOptions::default(),
/// )
/// .unwrap()
/// .with_custom_interpolator(Arc::new(StepLeft))
/// .unwrap();
///
/// assert_eq!(curve.discount_factor(1.5).unwrap(), 0.96);
/// ```
pub trait CurveInterpolator: fmt::Debug + Send + Sync {
    /// Short name for diagnostics.
    fn name(&self) -> &str;

    /// Discount factor at `t`, strictly inside `[times[0], times[last]]`.
    ///
    /// `times[0]` is 0 and `dfs[0]` is 1.
    fn discount_factor(&self, times: &[f64], dfs: &[f64], t: f64) -> f64;
}

/// Interpolation state built once per curve.
#[derive(Debug, Clone)]
pub(crate) enum Kernel {
    Linear(LinearInterpolator),
    LogLinear(LogLinearInterpolator),
    ZeroCubic(MonotoneCubic),
    Custom(Arc<dyn CurveInterpolator>),
}

impl Kernel {
    pub(crate) fn build(
        method: InterpolationMethod,
        custom: Option<&Arc<dyn CurveInterpolator>>,
        times: &[f64],
        dfs: &[f64],
    ) -> FixedIncomeResult<Self> {
        if let Some(custom) = custom {
            return Ok(Self::Custom(Arc::clone(custom)));
        }
        let kernel = match method {
            InterpolationMethod::Linear => {
                Self::Linear(LinearInterpolator::new(times.to_vec(), dfs.to_vec())?)
            }
            InterpolationMethod::LogLinear => {
                Self::LogLinear(LogLinearInterpolator::new(times.to_vec(), dfs.to_vec())?)
            }
            InterpolationMethod::MonotoneCubicZero => {
                Self::ZeroCubic(MonotoneCubic::new(times.to_vec(), zero_knots(times, dfs))?)
            }
        };
        Ok(kernel)
    }

    /// Discount factor at `t` within the pillar range.
    pub(crate) fn value(&self, times: &[f64], dfs: &[f64], t: f64) -> FixedIncomeResult<f64> {
        let df = match self {
            Self::Linear(interp) => interp.interpolate(t)?,
            Self::LogLinear(interp) => interp.interpolate(t)?,
            Self::ZeroCubic(interp) => (-interp.interpolate(t)? * t).exp(),
            Self::Custom(custom) => custom.discount_factor(times, dfs, t),
        };
        Ok(df)
    }

    pub(crate) fn custom(&self) -> Option<&Arc<dyn CurveInterpolator>> {
        match self {
            Self::Custom(custom) => Some(custom),
            _ => None,
        }
    }
}

/// Continuously compounded zero rates at the pillars. The valuation date
/// knot takes the first pillar's rate, giving a flat short end.
fn zero_knots(times: &[f64], dfs: &[f64]) -> Vec<f64> {
    let mut zeros: Vec<f64> = times
        .iter()
        .zip(dfs)
        .map(|(t, df)| if *t > 0.0 { -df.ln() / t } else { 0.0 })
        .collect();
    if zeros.len() > 1 && times[0] == 0.0 {
        zeros[0] = zeros[1];
    }
    zeros
}
