//! Interpolation methods for discount curve construction.
//!
//! # Available Methods
//!
//! - [`LinearInterpolator`]: straight lines between knots
//! - [`LogLinearInterpolator`]: linear in `ln(y)`, used on discount factors
//! - [`MonotoneCubic`]: Fritsch-Carlson monotone cubic Hermite, used on zero rates
//!
//! | Method | Smoothness | Preserves knot monotonicity | Typical input |
//! |--------|------------|-----------------------------|---------------|
//! | Linear | C0 | Yes | Discount factors |
//! | Log-Linear | C0 | Yes | Discount factors |
//! | Monotone Cubic | C1 | Yes | Zero rates |
//!
//! Log-linear on discount factors gives piecewise constant forward rates.

mod linear;
mod log_linear;
mod monotone_cubic;

pub use linear::LinearInterpolator;
pub use log_linear::LogLinearInterpolator;
pub use monotone_cubic::MonotoneCubic;

use crate::error::{MathError, MathResult};

/// Trait for interpolation methods.
pub trait Interpolator: Send + Sync {
    /// Returns the interpolated value at x.
    fn interpolate(&self, x: f64) -> MathResult<f64>;

    /// Returns the first derivative at x.
    fn derivative(&self, x: f64) -> MathResult<f64>;

    /// Returns true if extrapolation is allowed.
    fn allows_extrapolation(&self) -> bool {
        false
    }

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64;

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64;

    /// Checks if x is within the interpolation range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }
}

/// Checks knot vectors shared by every interpolator.
pub(crate) fn validate_knots(xs: &[f64], ys: &[f64]) -> MathResult<()> {
    if xs.len() < 2 {
        return Err(MathError::insufficient_data(2, xs.len()));
    }
    if xs.len() != ys.len() {
        return Err(MathError::invalid_input(format!(
            "xs and ys must have same length: {} vs {}",
            xs.len(),
            ys.len()
        )));
    }
    if xs.iter().chain(ys).any(|v| !v.is_finite()) {
        return Err(MathError::invalid_input("knots must be finite"));
    }
    if xs.windows(2).any(|w| w[1] <= w[0]) {
        return Err(MathError::invalid_input(
            "x values must be strictly increasing",
        ));
    }
    Ok(())
}

/// Finds the index i such that `xs[i] <= x < xs[i+1]`, clamped to the
/// first and last segments.
pub(crate) fn find_segment(xs: &[f64], x: f64) -> usize {
    let last = xs.len() - 2;
    match xs.binary_search_by(|probe| probe.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal)) {
        Ok(i) => i.min(last),
        Err(i) => i.saturating_sub(1).min(last),
    }
}

pub(crate) fn check_range(xs: &[f64], x: f64, allow_extrapolation: bool) -> MathResult<()> {
    let (min, max) = (xs[0], xs[xs.len() - 1]);
    if !allow_extrapolation && (x < min || x > max) {
        return Err(MathError::ExtrapolationNotAllowed { x, min, max });
    }
    Ok(())
}
