//! Brent's method.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverMethod, SolverResult};

/// Brent's method on a bracket `[a, b]` with `f(a) * f(b) <= 0`.
///
/// Inverse quadratic interpolation (or secant when only two distinct points
/// exist) with a bisection step whenever the interpolated step is too timid
/// or leaves the bracket. Needs no derivative.
///
/// # Example
///
/// ```rust
/// use fi_math::solvers::{brent, SolverConfig};
///
/// let f = |x: f64| x * x * x - x - 2.0;
///
/// let result = brent(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!((f(result.root)).abs() < 1e-10);
/// ```
///
/// # Errors
///
/// `InvalidBracket` when the endpoints share a sign, `ConvergenceFailed`
/// when the iteration cap is reached.
#[allow(clippy::many_single_char_names)]
pub fn brent<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let (mut a, mut b) = (a, b);
    let (mut fa, mut fb) = (f(a), f(b));
    if fa * fb > 0.0 {
        return Err(MathError::InvalidBracket { a, b, fa, fb });
    }

    // c is the contrapoint: [b, c] always brackets the root.
    let (mut c, mut fc) = (b, fb);
    let mut step: f64 = 0.0;
    let mut prev_step: f64 = 0.0;

    for iteration in 0..config.max_iterations {
        if fb * fc > 0.0 {
            c = a;
            fc = fa;
            step = b - a;
            prev_step = step;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * config.tolerance;
        let half = 0.5 * (c - b);
        if fb == 0.0 || fb.abs() < config.tolerance || half.abs() <= tol {
            return Ok(SolverResult {
                root: b,
                iterations: iteration,
                residual: fb,
                method: SolverMethod::Brent,
            });
        }

        if prev_step.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * half * s, 1.0 - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * half * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();

            let limit = (3.0 * half * q - (tol * q).abs()).min((prev_step * q).abs());
            if 2.0 * p < limit {
                prev_step = step;
                step = p / q;
            } else {
                step = half;
                prev_step = step;
            }
        } else {
            step = half;
            prev_step = step;
        }

        a = b;
        fa = fb;
        b += if step.abs() > tol {
            step
        } else {
            tol.copysign(half)
        };
        fb = f(b);
    }

    Err(MathError::convergence_failed(config.max_iterations, fb.abs()))
}
