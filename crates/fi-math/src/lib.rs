//! # FI Math
//!
//! Numerical building blocks for the fixed income workspace:
//!
//! - **Solvers**: Newton-Raphson, bisection, Brent, and a safeguarded hybrid
//!   that falls back from Newton to bracketing
//! - **Interpolation**: linear, log-linear and monotone cubic (Fritsch-Carlson)
//! - **Linear Algebra**: dense square solves on `nalgebra` matrices

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]

pub mod error;
pub mod interpolation;
pub mod linear_algebra;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{
        Interpolator, LinearInterpolator, LogLinearInterpolator, MonotoneCubic,
    };
    pub use crate::linear_algebra::solve_linear_system;
    pub use crate::solvers::{
        bisection, brent, find_bracket, hybrid, newton_raphson, SolverConfig, SolverMethod,
        SolverResult,
    };
}

pub use error::{MathError, MathResult};
