//! Bisection root-finding algorithm.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverMethod, SolverResult};

/// Bisection root-finding algorithm.
///
/// Repeatedly halves the interval and keeps the half containing the sign
/// change. Slow but cannot fail once a bracket is established.
///
/// Requires: `f(a) * f(b) <= 0` (opposite signs at endpoints)
///
/// # Example
///
/// ```rust
/// use fi_math::solvers::{bisection, SolverConfig};
///
/// let f = |x: f64| x * x - 2.0;
///
/// let result = bisection(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn bisection<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let mut lo = a.min(b);
    let mut hi = a.max(b);

    let mut f_lo = f(lo);
    let f_hi = f(hi);

    if f_lo * f_hi > 0.0 {
        return Err(MathError::InvalidBracket {
            a: lo,
            b: hi,
            fa: f_lo,
            fb: f_hi,
        });
    }

    if f_lo.abs() < config.tolerance {
        return Ok(done(lo, 0, f_lo));
    }
    if f_hi.abs() < config.tolerance {
        return Ok(done(hi, 0, f_hi));
    }

    for iteration in 0..config.max_iterations {
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid);

        if f_mid.abs() < config.tolerance || 0.5 * (hi - lo) < config.tolerance {
            return Ok(done(mid, iteration + 1, f_mid));
        }

        if f_lo * f_mid < 0.0 {
            hi = mid;
        } else {
            lo = mid;
            f_lo = f_mid;
        }
    }

    let mid = 0.5 * (lo + hi);
    Err(MathError::convergence_failed(
        config.max_iterations,
        f(mid).abs(),
    ))
}

fn done(root: f64, iterations: u32, residual: f64) -> SolverResult {
    SolverResult {
        root,
        iterations,
        residual,
        method: SolverMethod::Bisection,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_2() {
        let f = |x: f64| x * x - 2.0;
        let result = bisection(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn test_reversed_bounds() {
        let f = |x: f64| x * x - 2.0;
        let result = bisection(f, 2.0, 1.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn test_root_at_endpoint() {
        let f = |x: f64| x - 1.0;
        let result = bisection(f, 1.0, 3.0, &SolverConfig::default()).unwrap();
        assert_eq!(result.iterations, 0);
        assert_eq!(result.root, 1.0);
    }

    #[test]
    fn test_invalid_bracket() {
        let f = |x: f64| x * x + 1.0;
        let result = bisection(f, 0.0, 1.0, &SolverConfig::default());
        assert!(matches!(result, Err(MathError::InvalidBracket { .. })));
    }

    #[test]
    fn test_iteration_cap() {
        let f = |x: f64| x - 0.123_456_789;
        let config = SolverConfig::new(1e-14, 5);
        let result = bisection(f, 0.0, 1.0, &config);
        assert!(matches!(
            result,
            Err(MathError::ConvergenceFailed { iterations: 5, .. })
        ));
    }
}
