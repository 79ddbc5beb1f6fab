//! Monotone cubic Hermite interpolation (Fritsch-Carlson).

use crate::error::MathResult;
use crate::interpolation::{check_range, find_segment, validate_knots, Interpolator};

/// Monotone piecewise cubic Hermite interpolation.
///
/// Knot tangents are weighted harmonic means of neighbouring secants, set to
/// zero at local extrema, then limited so the curve never overshoots the
/// knots. The result is C1 and monotone wherever the data is.
///
/// Beyond the knots the end tangents are extended linearly when
/// extrapolation is enabled.
///
/// # Example
///
/// ```rust
/// use fi_math::interpolation::{MonotoneCubic, Interpolator};
///
/// let times = vec![1.0, 2.0, 5.0, 10.0];
/// let zeros = vec![0.030, 0.035, 0.040, 0.042];
///
/// let spline = MonotoneCubic::new(times, zeros).unwrap();
/// let z = spline.interpolate(3.0).unwrap();
/// assert!(z > 0.035 && z < 0.040);
/// ```
#[derive(Debug, Clone)]
pub struct MonotoneCubic {
    xs: Vec<f64>,
    ys: Vec<f64>,
    tangents: Vec<f64>,
    allow_extrapolation: bool,
}

impl MonotoneCubic {
    /// Creates a new monotone cubic interpolator.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 2 points, if lengths differ,
    /// or if `xs` is not strictly increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_knots(&xs, &ys)?;
        let tangents = fritsch_carlson_tangents(&xs, &ys);
        Ok(Self {
            xs,
            ys,
            tangents,
            allow_extrapolation: false,
        })
    }

    /// Enables linear extrapolation along the end tangents.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }

    fn last(&self) -> usize {
        self.xs.len() - 1
    }
}

impl Interpolator for MonotoneCubic {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x, self.allow_extrapolation)?;

        let n = self.last();
        if x < self.xs[0] {
            return Ok(self.ys[0] + (x - self.xs[0]) * self.tangents[0]);
        }
        if x > self.xs[n] {
            return Ok(self.ys[n] + (x - self.xs[n]) * self.tangents[n]);
        }

        let i = find_segment(&self.xs, x);
        let h = self.xs[i + 1] - self.xs[i];
        let t = (x - self.xs[i]) / h;
        let t2 = t * t;
        let t3 = t2 * t;

        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;

        Ok(h00 * self.ys[i]
            + h10 * h * self.tangents[i]
            + h01 * self.ys[i + 1]
            + h11 * h * self.tangents[i + 1])
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x, self.allow_extrapolation)?;

        let n = self.last();
        if x < self.xs[0] {
            return Ok(self.tangents[0]);
        }
        if x > self.xs[n] {
            return Ok(self.tangents[n]);
        }

        let i = find_segment(&self.xs, x);
        let h = self.xs[i + 1] - self.xs[i];
        let t = (x - self.xs[i]) / h;
        let t2 = t * t;

        let d00 = 6.0 * t2 - 6.0 * t;
        let d10 = 3.0 * t2 - 4.0 * t + 1.0;
        let d01 = -6.0 * t2 + 6.0 * t;
        let d11 = 3.0 * t2 - 2.0 * t;

        Ok((d00 * self.ys[i] + d01 * self.ys[i + 1]) / h
            + d10 * self.tangents[i]
            + d11 * self.tangents[i + 1])
    }

    fn allows_extrapolation(&self) -> bool {
        self.allow_extrapolation
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.last()]
    }
}

fn fritsch_carlson_tangents(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
    let secants: Vec<f64> = (0..n - 1).map(|i| (ys[i + 1] - ys[i]) / h[i]).collect();

    let mut m = vec![0.0; n];
    m[0] = secants[0];
    m[n - 1] = secants[n - 2];

    for i in 1..n - 1 {
        let (d0, d1) = (secants[i - 1], secants[i]);
        if d0 * d1 > 0.0 {
            let w0 = 2.0 * h[i] + h[i - 1];
            let w1 = h[i] + 2.0 * h[i - 1];
            m[i] = (w0 + w1) / (w0 / d0 + w1 / d1);
        }
    }

    // Limit tangents so each segment stays inside its knots
    for i in 0..n - 1 {
        let d = secants[i];
        if d == 0.0 {
            m[i] = 0.0;
            m[i + 1] = 0.0;
            continue;
        }
        let alpha = m[i] / d;
        let beta = m[i + 1] / d;
        let norm = alpha * alpha + beta * beta;
        if norm > 9.0 {
            let tau = 3.0 / norm.sqrt();
            m[i] = tau * alpha * d;
            m[i + 1] = tau * beta * d;
        }
    }

    m
}
