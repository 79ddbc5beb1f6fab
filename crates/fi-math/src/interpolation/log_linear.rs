//! Log-linear interpolation.

use crate::error::{MathError, MathResult};
use crate::interpolation::{check_range, find_segment, validate_knots, Interpolator};

/// Log-linear interpolation between data points.
///
/// Interpolates `ln(y)` linearly and exponentiates the result. On discount
/// factors this keeps values positive and makes instantaneous forwards
/// piecewise constant.
///
/// ```text
/// y(x) = exp(linear_interpolate(x, ln(y)))
/// ```
///
/// # Example
///
/// ```rust
/// use fi_math::interpolation::{LogLinearInterpolator, Interpolator};
///
/// let times = vec![0.0, 1.0, 2.0, 3.0];
/// let discount_factors = vec![1.0, 0.97, 0.94, 0.91];
///
/// let interp = LogLinearInterpolator::new(times, discount_factors).unwrap();
/// let df = interp.interpolate(1.5).unwrap();
/// assert!(df > 0.94 && df < 0.97);
/// ```
#[derive(Debug, Clone)]
pub struct LogLinearInterpolator {
    xs: Vec<f64>,
    log_ys: Vec<f64>,
    allow_extrapolation: bool,
}

impl LogLinearInterpolator {
    /// Creates a new log-linear interpolator.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 2 points, if lengths differ,
    /// if `xs` is not strictly increasing, or if any y value is non-positive.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_knots(&xs, &ys)?;
        if let Some((i, y)) = ys.iter().enumerate().find(|(_, y)| **y <= 0.0) {
            return Err(MathError::invalid_input(format!(
                "log-linear interpolation requires positive values, got {y} at index {i}"
            )));
        }
        let log_ys = ys.iter().map(|y| y.ln()).collect();
        Ok(Self {
            xs,
            log_ys,
            allow_extrapolation: false,
        })
    }

    /// Enables extrapolation beyond the data range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }

    fn log_slope(&self, i: usize) -> f64 {
        (self.log_ys[i + 1] - self.log_ys[i]) / (self.xs[i + 1] - self.xs[i])
    }
}

impl Interpolator for LogLinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x, self.allow_extrapolation)?;
        let i = find_segment(&self.xs, x);
        Ok((self.log_ys[i] + (x - self.xs[i]) * self.log_slope(i)).exp())
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        // d/dx exp(g(x)) = g'(x) * exp(g(x))
        let y = self.interpolate(x)?;
        Ok(self.log_slope(find_segment(&self.xs, x)) * y)
    }

    fn allows_extrapolation(&self) -> bool {
        self.allow_extrapolation
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_constant_forward_within_segment() {
        let interp = LogLinearInterpolator::new(
            vec![0.0, 1.0, 2.0],
            vec![1.0, (-0.03_f64).exp(), (-0.07_f64).exp()],
        )
        .unwrap();

        // Instantaneous forward -d ln(DF)/dt is 4% throughout (1, 2)
        for t in [1.1, 1.5, 1.9] {
            let fwd = -interp.derivative(t).unwrap() / interp.interpolate(t).unwrap();
            assert_relative_eq!(fwd, 0.04, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_geometric_midpoint() {
        let interp = LogLinearInterpolator::new(vec![0.0, 2.0], vec![1.0, 0.81]).unwrap();
        assert_relative_eq!(interp.interpolate(1.0).unwrap(), 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(LogLinearInterpolator::new(vec![0.0, 1.0], vec![1.0, 0.0]).is_err());
        assert!(LogLinearInterpolator::new(vec![0.0, 1.0], vec![-1.0, 0.5]).is_err());
    }
}
