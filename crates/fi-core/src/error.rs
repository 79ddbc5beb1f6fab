//! Error types for the fixed income workspace.
//!
//! Every public operation fails with one of the kinds below. Each variant
//! carries the offending value (and, for iterative methods, the attempted
//! iteration count) so callers can diagnose a failure without re-deriving it.

use thiserror::Error;

use crate::types::Date;

/// A specialized Result type for fixed income operations.
pub type FixedIncomeResult<T> = Result<T, FixedIncomeError>;

/// The main error type for fixed income operations.
#[derive(Error, Debug, Clone)]
pub enum FixedIncomeError {
    /// A calendar date could not be constructed or parsed.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// End date precedes start date.
    #[error("Invalid date range: end {end} precedes start {start}")]
    InvalidDateRange {
        /// Start of the range.
        start: Date,
        /// End of the range.
        end: Date,
    },

    /// Instrument fields are inconsistent or out of range.
    #[error("Invalid instrument: {reason}")]
    InvalidInstrument {
        /// Description of what's invalid.
        reason: String,
    },

    /// A discounter returned a discount factor outside the admissible range.
    #[error("Invalid discount factor {discount_factor} at t = {time}")]
    InvalidDiscounter {
        /// Year fraction at which the discounter was queried.
        time: f64,
        /// The value it returned.
        discount_factor: f64,
    },

    /// Target price cannot be reproduced by any admissible yield.
    #[error("Invalid target price {price}: must lie in (0, {max_price}]")]
    InvalidTargetPrice {
        /// The requested price.
        price: f64,
        /// Largest attainable price (sum of undiscounted cashflows).
        max_price: f64,
    },

    /// An iterative method exhausted its budget.
    #[error("{method} failed to converge after {iterations} iterations (residual: {residual})")]
    NonConvergence {
        /// Name of the method (or method chain) that gave up.
        method: String,
        /// Number of iterations attempted.
        iterations: u32,
        /// Final residual value.
        residual: f64,
    },

    /// Bootstrapping input does not determine the curve.
    #[error("Insufficient quotes: {reason}")]
    InsufficientQuotes {
        /// Description of the missing information.
        reason: String,
    },

    /// Discount factors increase with maturity where that is not permitted.
    #[error("Non-monotone curve at t = {time}: discount factor {current} exceeds {previous}")]
    NonMonotoneCurve {
        /// Maturity at which the violation was detected.
        time: f64,
        /// Discount factor at the earlier maturity.
        previous: f64,
        /// Offending discount factor.
        current: f64,
    },

    /// Generic argument validation failure.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl FixedIncomeError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid date range error.
    #[must_use]
    pub fn invalid_date_range(start: Date, end: Date) -> Self {
        Self::InvalidDateRange { start, end }
    }

    /// Creates an invalid instrument error.
    #[must_use]
    pub fn invalid_instrument(reason: impl Into<String>) -> Self {
        Self::InvalidInstrument {
            reason: reason.into(),
        }
    }

    /// Creates an invalid discounter error.
    #[must_use]
    pub fn invalid_discounter(time: f64, discount_factor: f64) -> Self {
        Self::InvalidDiscounter {
            time,
            discount_factor,
        }
    }

    /// Creates an invalid target price error.
    #[must_use]
    pub fn invalid_target_price(price: f64, max_price: f64) -> Self {
        Self::InvalidTargetPrice { price, max_price }
    }

    /// Creates a non-convergence error.
    #[must_use]
    pub fn non_convergence(method: impl Into<String>, iterations: u32, residual: f64) -> Self {
        Self::NonConvergence {
            method: method.into(),
            iterations,
            residual,
        }
    }

    /// Creates an insufficient quotes error.
    #[must_use]
    pub fn insufficient_quotes(reason: impl Into<String>) -> Self {
        Self::InsufficientQuotes {
            reason: reason.into(),
        }
    }

    /// Creates a non-monotone curve error.
    #[must_use]
    pub fn non_monotone(time: f64, previous: f64, current: f64) -> Self {
        Self::NonMonotoneCurve {
            time,
            previous,
            current,
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}
