//! Hybrid root-finding algorithm.
//!
//! Newton-Raphson guarded by an admissible interval, with Brent and then
//! bisection as fallbacks.

use log::{debug, warn};

use crate::error::{MathError, MathResult};
use crate::solvers::newton::newton_within;
use crate::solvers::{bisection, brent, SolverConfig, SolverResult};

/// Newton iterations allowed before the hybrid hands over to bracketing.
const NEWTON_BUDGET: u32 = 20;

/// Hybrid root-finding algorithm.
///
/// # Strategy
///
/// 1. Run Newton-Raphson from `initial_guess` for a limited budget
/// 2. If an iterate leaves `bounds`, the derivative vanishes, or the
///    residual keeps growing, abandon Newton
/// 3. Run Brent on `bounds` (or on a bracket found by expansion)
/// 4. If Brent exhausts its iterations, finish with bisection
///
/// The reported iteration count is the total across every method tried.
///
/// # Example
///
/// ```rust
/// use fi_math::solvers::{hybrid, SolverConfig};
///
/// let f = |x: f64| x * x * x - x - 2.0;
/// let df = |x: f64| 3.0 * x * x - 1.0;
///
/// let result = hybrid(f, df, 1.5, Some((1.0, 2.0)), &SolverConfig::default()).unwrap();
/// assert!((f(result.root)).abs() < 1e-10);
/// ```
///
/// # Errors
///
/// Returns the last method's error when every method fails, or
/// `MathError::InvalidBracket` when no sign change can be established.
pub fn hybrid<F, DF>(
    f: F,
    df: DF,
    initial_guess: f64,
    bounds: Option<(f64, f64)>,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    let newton_err = match newton_within(
        &f,
        &df,
        initial_guess,
        bounds,
        config.max_iterations.min(NEWTON_BUDGET),
        config,
    ) {
        Ok(result) => {
            debug!(
                "Newton-Raphson converged to {:.12} in {} iterations",
                result.root, result.iterations
            );
            return Ok(result);
        }
        Err(err) => err,
    };

    let newton_iterations = match newton_err {
        MathError::Diverged { iterations, .. } | MathError::ConvergenceFailed { iterations, .. } => {
            iterations
        }
        _ => 0,
    };
    warn!("Newton-Raphson abandoned ({newton_err}); falling back to Brent");

    let (a, b) = match bounds {
        Some(bracket) => bracket,
        None => find_bracket(&f, initial_guess).ok_or_else(|| {
            MathError::invalid_input(
                "Newton-Raphson failed and no bracketing interval could be found",
            )
        })?,
    };

    match brent(&f, a, b, config) {
        Ok(mut result) => {
            result.iterations += newton_iterations;
            Ok(result)
        }
        Err(MathError::ConvergenceFailed {
            iterations: brent_iterations,
            ..
        }) => {
            warn!("Brent exhausted {brent_iterations} iterations; falling back to bisection");
            let mut result = bisection(&f, a, b, config)?;
            result.iterations += newton_iterations + brent_iterations;
            Ok(result)
        }
        Err(err) => Err(err),
    }
}

/// Attempts to find a bracketing interval for the root.
///
/// Expands geometrically outwards from `initial_guess`. Returns `None` if no
/// sign change turns up within fifty expansions.
pub fn find_bracket<F>(f: &F, initial_guess: f64) -> Option<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    let mut left = initial_guess;
    let mut right = initial_guess;
    let mut delta = 0.1;

    if initial_guess.abs() < 1e-10 {
        left = -1.0;
        right = 1.0;
    }

    let f_init = f(initial_guess);
    if f_init == 0.0 {
        return Some((initial_guess, initial_guess));
    }

    for _ in 0..50 {
        left -= delta;
        right += delta;

        let f_left = f(left);
        let f_right = f(right);

        if f_left * f_init < 0.0 {
            return Some((left, initial_guess));
        }
        if f_right * f_init < 0.0 {
            return Some((initial_guess, right));
        }
        if f_left * f_right < 0.0 {
            return Some((left, right));
        }

        delta *= 2.0;
        if delta > 1e6 {
            break;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::SolverMethod;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_2() {
        let f = |x: f64| x * x - 2.0;
        let df = |x: f64| 2.0 * x;

        let result = hybrid(f, df, 1.5, Some((1.0, 2.0)), &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
        assert_eq!(result.method, SolverMethod::Newton);
    }

    #[test]
    fn test_newton_leaving_bounds_falls_back() {
        // From 1.0 the first Newton step jumps to 7.0, outside [1, 3]
        let f = |x: f64| x * x * x - 2.0 * x - 5.0;
        let df = |x: f64| 3.0 * x * x - 2.0;

        let result = hybrid(f, df, 1.0, Some((1.0, 3.0)), &SolverConfig::default()).unwrap();

        assert!(f(result.root).abs() < 1e-10);
        assert_ne!(result.method, SolverMethod::Newton);
        assert!(result.iterations >= 1);
    }

    #[test]
    fn test_zero_derivative_falls_back() {
        // df vanishes at the starting point
        let f = |x: f64| x * x - 4.0;
        let df = |x: f64| 2.0 * x;

        let result = hybrid(f, df, 0.0, Some((-1.0, 5.0)), &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, 2.0, epsilon = 1e-9);
        assert_eq!(result.method, SolverMethod::Brent);
    }

    #[test]
    fn test_exhausted_budget_is_error() {
        let f = |x: f64| x * x * x - 2.0 * x - 5.0;
        let df = |_: f64| -1e-16;
        let config = SolverConfig::new(1e-12, 2);

        let result = hybrid(f, df, 2.5, Some((2.0, 3.0)), &config);
        assert!(result.is_err());
    }

    #[test]
    fn test_auto_bracket_finding() {
        let f = |x: f64| x * x - 2.0;
        let df = |_: f64| 0.0;

        let result = hybrid(f, df, 1.5, None, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn test_find_bracket_none() {
        let f = |x: f64| x * x + 1.0;
        assert!(find_bracket(&f, 0.5).is_none());
    }

    #[test]
    fn test_ytm_like_calculation() {
        let target_price = 95.0;
        let price_from_yield = |y: f64| {
            let mut pv = 0.0;
            for t in 1..=5 {
                pv += 5.0 / (1.0 + y).powi(t);
            }
            pv + 100.0 / (1.0 + y).powi(5) - target_price
        };
        let d_price_from_yield = |y: f64| {
            let mut dpv = 0.0;
            for t in 1..=5 {
                dpv -= f64::from(t) * 5.0 / (1.0 + y).powi(t + 1);
            }
            dpv - 5.0 * 100.0 / (1.0 + y).powi(6)
        };

        let result = hybrid(
            price_from_yield,
            d_price_from_yield,
            0.05,
            Some((0.0, 0.20)),
            &SolverConfig::default(),
        )
        .unwrap();

        assert!(price_from_yield(result.root).abs() < 1e-10);
        assert!(result.root > 0.05);
    }
}
