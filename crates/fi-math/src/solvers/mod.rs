//! Root-finding algorithms.
//!
//! - [`newton_raphson`]: quadratic convergence when a derivative is available
//! - [`bisection`]: simple and reliable bracketing method
//! - [`brent`]: bracketing method combining bisection, secant, and inverse quadratic
//! - [`hybrid`]: Newton-Raphson guarded by bounds, falling back to bracketing
//!
//! | Solver | Speed | Reliability | Requires |
//! |--------|-------|-------------|----------|
//! | Newton-Raphson | Fastest (quadratic) | May diverge | Derivative |
//! | Brent | Fast (superlinear) | Guaranteed | Bracket |
//! | Bisection | Slow (linear) | Guaranteed | Bracket |
//! | Hybrid | Fast | Guaranteed* | Initial guess |
//!
//! *When bounds are provided or can be found automatically.
//!
//! Every loop is bounded by [`SolverConfig::max_iterations`]; none of them
//! can spin forever.
//!
//! # Example: YTM Calculation
//!
//! ```rust
//! use fi_math::solvers::{hybrid, SolverConfig};
//!
//! // Bond: 5% coupon, 5 years, price 95
//! let price_fn = |y: f64| {
//!     let mut pv = 0.0;
//!     for t in 1..=5 {
//!         pv += 5.0 / (1.0 + y).powi(t);
//!     }
//!     pv += 100.0 / (1.0 + y).powi(5);
//!     pv - 95.0
//! };
//!
//! let d_price_fn = |y: f64| {
//!     let mut dpv = 0.0;
//!     for t in 1..=5 {
//!         dpv -= (t as f64) * 5.0 / (1.0 + y).powi(t + 1);
//!     }
//!     dpv -= 5.0 * 100.0 / (1.0 + y).powi(6);
//!     dpv
//! };
//!
//! let result = hybrid(price_fn, d_price_fn, 0.05, Some((0.0, 0.20)), &SolverConfig::default()).unwrap();
//! assert!(result.root > 0.05);
//! ```

mod bisection;
mod brent;
mod hybrid;
mod newton;

pub use bisection::bisection;
pub use brent::brent;
pub use hybrid::{find_bracket, hybrid};
pub use newton::newton_raphson;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default tolerance for root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Tolerance for convergence (on the residual and on the step).
    pub tolerance: f64,
    /// Maximum number of iterations per method.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Which algorithm produced a root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolverMethod {
    /// Newton-Raphson iteration.
    Newton,
    /// Brent's bracketing method.
    Brent,
    /// Interval bisection.
    Bisection,
}

impl fmt::Display for SolverMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolverMethod::Newton => "Newton-Raphson",
            SolverMethod::Brent => "Brent",
            SolverMethod::Bisection => "Bisection",
        };
        write!(f, "{name}")
    }
}

/// Result of a root-finding operation.
#[derive(Debug, Clone, Copy)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of iterations used (across all methods tried).
    pub iterations: u32,
    /// Final residual (function value at root).
    pub residual: f64,
    /// Method that produced the root.
    pub method: SolverMethod,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn annual_bond_price(y: f64, coupon: f64, years: i32) -> f64 {
        let mut pv = 0.0;
        for t in 1..=years {
            pv += coupon / (1.0 + y).powi(t);
        }
        pv + 100.0 / (1.0 + y).powi(years)
    }

    #[test]
    fn test_all_solvers_agree_on_ytm() {
        let target = 95.0;
        let f = |y: f64| annual_bond_price(y, 5.0, 10) - target;
        let h = 1e-7;
        let df = |y: f64| (f(y + h) - f(y - h)) / (2.0 * h);
        let config = SolverConfig::default();

        let newton = newton_raphson(f, df, 0.05, &config).unwrap();
        let brent_r = brent(f, 0.0, 0.2, &config).unwrap();
        let bisect = bisection(f, 0.0, 0.2, &config).unwrap();

        assert_relative_eq!(newton.root, brent_r.root, epsilon = 1e-9);
        assert_relative_eq!(newton.root, bisect.root, epsilon = 1e-9);
        assert_eq!(newton.method, SolverMethod::Newton);
        assert_eq!(brent_r.method, SolverMethod::Brent);
        assert_eq!(bisect.method, SolverMethod::Bisection);
    }

    #[test]
    fn test_config_builders() {
        let config = SolverConfig::default()
            .with_tolerance(1e-8)
            .with_max_iterations(25);
        assert_eq!(config, SolverConfig::new(1e-8, 25));
    }
}
