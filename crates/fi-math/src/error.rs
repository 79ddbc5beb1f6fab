//! Error types for mathematical operations.

use fi_core::FixedIncomeError;
use thiserror::Error;

/// Result alias for the numerical kernels.
pub type MathResult<T> = Result<T, MathError>;

/// Failures raised by root finders, interpolators and the dense solver.
#[derive(Error, Debug, Clone)]
pub enum MathError {
    /// Iteration budget exhausted without meeting the tolerance.
    #[error("no convergence in {iterations} iterations, |f| = {residual:.2e}")]
    ConvergenceFailed {
        /// Iterations spent.
        iterations: u32,
        /// Residual at the last iterate.
        residual: f64,
    },

    /// The endpoints do not straddle a root.
    #[error("f({a}) = {fa:.2e} and f({b}) = {fb:.2e} share a sign")]
    InvalidBracket {
        /// Left endpoint.
        a: f64,
        /// Right endpoint.
        b: f64,
        /// f(a).
        fa: f64,
        /// f(b).
        fb: f64,
    },

    /// Newton hit a vanishing slope.
    #[error("derivative {value:.2e} too small for a Newton step")]
    DivisionByZero {
        /// The offending derivative.
        value: f64,
    },

    /// Newton left the admissible interval or stalled.
    #[error("Newton iterate {x} rejected after {iterations} iterations, |f| = {residual:.2e}")]
    Diverged {
        /// Rejected iterate.
        x: f64,
        /// Iterations spent.
        iterations: u32,
        /// Residual at the last accepted iterate.
        residual: f64,
    },

    /// LU factorisation found no inverse.
    #[error("matrix is singular")]
    SingularMatrix,

    /// Operand shapes disagree.
    #[error("shape ({rows1}x{cols1}) does not fit ({rows2}x{cols2})")]
    DimensionMismatch {
        /// Left operand rows.
        rows1: usize,
        /// Left operand columns.
        cols1: usize,
        /// Right operand rows.
        rows2: usize,
        /// Right operand columns.
        cols2: usize,
    },

    /// Query outside the knot range of an interpolator built without extrapolation.
    #[error("{x} lies outside the knot range [{min}, {max}]")]
    ExtrapolationNotAllowed {
        /// Query abscissa.
        x: f64,
        /// First knot.
        min: f64,
        /// Last knot.
        max: f64,
    },

    /// Too few points for the requested operation.
    #[error("need {required} points, got {actual}")]
    InsufficientData {
        /// Points required.
        required: usize,
        /// Points supplied.
        actual: usize,
    },

    /// Argument rejected before any numerical work.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was wrong.
        reason: String,
    },
}

impl MathError {
    /// Creates a convergence failed error.
    #[must_use]
    pub fn convergence_failed(iterations: u32, residual: f64) -> Self {
        Self::ConvergenceFailed {
            iterations,
            residual,
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates an insufficient data error.
    #[must_use]
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }
}

impl MathError {
    /// True for failures that mean "the iteration ran out", as opposed to bad input.
    #[must_use]
    pub fn is_convergence_failure(&self) -> bool {
        matches!(
            self,
            Self::ConvergenceFailed { .. } | Self::Diverged { .. } | Self::InvalidBracket { .. }
        )
    }
}

impl From<MathError> for FixedIncomeError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::ConvergenceFailed { iterations, residual } => {
                FixedIncomeError::non_convergence("root finder", iterations, residual)
            }
            MathError::Diverged { iterations, residual, .. } => {
                FixedIncomeError::non_convergence("Newton-Raphson", iterations, residual)
            }
            MathError::InvalidBracket { fa, fb, .. } => {
                FixedIncomeError::non_convergence("bracketing", 0, fa.abs().min(fb.abs()))
            }
            other => FixedIncomeError::invalid_input(other.to_string()),
        }
    }
}
