//! Flat yield discounting.

use serde::{Deserialize, Serialize};

use fi_core::error::FixedIncomeResult;
use fi_core::traits::Discounter;
use fi_core::types::{CashflowSet, Compounding};

/// A single yield applied to every maturity.
///
/// `DF(t) = (1 + y/n)^(-n t)` for periodic compounding, `exp(-y t)` for
/// continuous and `1 / (1 + y t)` for simple.
///
/// # Example
///
/// ```rust
/// use fi_bonds::pricing::FlatYield;
/// use fi_core::prelude::*;
///
/// let y = FlatYield::new(0.05, Compounding::Annual);
/// assert!((y.discount_factor(2.0).unwrap() - 1.0 / 1.1025).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlatYield {
    rate: f64,
    compounding: Compounding,
}

impl FlatYield {
    /// Creates a flat yield.
    #[must_use]
    pub fn new(rate: f64, compounding: Compounding) -> Self {
        Self { rate, compounding }
    }

    /// A flat yield compounded at the quoting frequency of `cashflows`.
    ///
    /// Single-payment sets compound annually.
    #[must_use]
    pub fn for_cashflows(rate: f64, cashflows: &CashflowSet) -> Self {
        Self::new(rate, Compounding::from(cashflows.frequency()))
    }

    /// The yield.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// The compounding convention.
    #[must_use]
    pub fn compounding(&self) -> Compounding {
        self.compounding
    }

    /// Derivative of the discount factor with respect to the yield.
    #[must_use]
    pub fn discount_factor_derivative(&self, t: f64) -> f64 {
        self.compounding.discount_factor_derivative(self.rate, t)
    }
}

impl Discounter for FlatYield {
    fn discount_factor(&self, t: f64) -> FixedIncomeResult<f64> {
        Ok(self.compounding.discount_factor(self.rate, t))
    }
}
