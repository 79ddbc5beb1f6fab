//! Newton-Raphson iteration, optionally confined to an admissible interval.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverMethod, SolverResult};

/// Consecutive residual doublings tolerated before the iteration is declared divergent.
const MAX_GROWTH: u32 = 3;

/// Newton-Raphson, `x_{n+1} = x_n - f(x_n) / f'(x_n)`, over the whole real line.
///
/// Quadratic near the root, unreliable far from it; [`crate::solvers::hybrid`]
/// wraps the same iteration with bracketing fallbacks.
///
/// # Example
///
/// ```rust
/// use fi_math::solvers::{newton_raphson, SolverConfig};
///
/// let f = |x: f64| x * x - 2.0;
/// let df = |x: f64| 2.0 * x;
///
/// let result = newton_raphson(f, df, 1.5, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
///
/// # Errors
///
/// `DivisionByZero` on a vanishing slope, `Diverged` when the residual keeps
/// growing, `ConvergenceFailed` when the iteration cap is hit.
pub fn newton_raphson<F, DF>(
    f: F,
    df: DF,
    initial_guess: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    newton_within(&f, &df, initial_guess, None, config.max_iterations, config)
}

/// Newton-Raphson that rejects any iterate outside `bounds`.
///
/// The starting point is clamped into `bounds`. At most `budget` steps are taken.
pub(crate) fn newton_within<F, DF>(
    f: &F,
    df: &DF,
    initial_guess: f64,
    bounds: Option<(f64, f64)>,
    budget: u32,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    let (lo, hi) = bounds.map_or((f64::NEG_INFINITY, f64::INFINITY), |(a, b)| {
        (a.min(b), a.max(b))
    });
    let mut x = initial_guess.clamp(lo, hi);
    let mut prev_residual = f64::MAX;
    let mut growth = 0;

    for iteration in 0..budget {
        let fx = f(x);
        let residual = fx.abs();

        if residual < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration,
                residual: fx,
                method: SolverMethod::Newton,
            });
        }

        if residual > 2.0 * prev_residual {
            growth += 1;
            if growth >= MAX_GROWTH {
                return Err(MathError::Diverged {
                    x,
                    iterations: iteration,
                    residual,
                });
            }
        } else {
            growth = 0;
        }
        prev_residual = residual;

        let dfx = df(x);
        if !dfx.is_finite() || dfx.abs() < 1e-15 {
            return Err(MathError::DivisionByZero { value: dfx });
        }

        let step = fx / dfx;
        let next = x - step;
        if !next.is_finite() || next < lo || next > hi {
            return Err(MathError::Diverged {
                x: next,
                iterations: iteration + 1,
                residual,
            });
        }
        x = next;

        if step.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration + 1,
                residual: f(x),
                method: SolverMethod::Newton,
            });
        }
    }

    Err(MathError::convergence_failed(budget, f(x).abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cube_root() {
        let f = |x: f64| x * x * x - 27.0;
        let df = |x: f64| 3.0 * x * x;

        let result = newton_raphson(f, df, 4.0, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, 3.0, epsilon = 1e-10);
        assert!(result.iterations < 10);
        assert_eq!(result.method, SolverMethod::Newton);
    }

    #[test]
    fn test_flat_slope() {
        let f = |x: f64| x * x + 1.0;
        let df = |x: f64| 2.0 * x;

        let result = newton_raphson(f, df, 0.0, &SolverConfig::default());
        assert!(matches!(result, Err(MathError::DivisionByZero { .. })));
    }

    #[test]
    fn test_no_real_root_is_bounded() {
        let f = |x: f64| x * x + 1.0;
        let df = |x: f64| 2.0 * x;
        let config = SolverConfig::default().with_max_iterations(10);

        let err = newton_raphson(f, df, 0.5, &config).unwrap_err();
        assert!(err.is_convergence_failure() || matches!(err, MathError::DivisionByZero { .. }));
    }

    #[test]
    fn test_step_outside_bounds_is_rejected() {
        // From 1.0 the first step lands on 7.0
        let f = |x: f64| x * x * x - 2.0 * x - 5.0;
        let df = |x: f64| 3.0 * x * x - 2.0;

        let result = newton_within(&f, &df, 1.0, Some((1.0, 3.0)), 20, &SolverConfig::default());
        assert!(matches!(
            result,
            Err(MathError::Diverged { iterations: 1, .. })
        ));
    }

    #[test]
    fn test_budget_caps_iterations() {
        let f = |x: f64| x.exp() - 10.0;
        let df = |x: f64| x.exp();

        let result = newton_within(&f, &df, 0.0, None, 2, &SolverConfig::default());
        assert!(matches!(
            result,
            Err(MathError::ConvergenceFailed { iterations: 2, .. })
        ));
    }
}
