//! Yield-to-maturity solver.
//!
//! Inverts the present value engine: finds the flat yield `y` with
//! `price(cashflows, FlatYield(y)) == target`. Newton-Raphson on the analytic
//! price derivative runs first, confined to a bracket established up front;
//! Brent and then bisection take over if Newton leaves the bracket, stalls,
//! or runs out of iterations.

use log::debug;
use serde::{Deserialize, Serialize};

use fi_core::error::{FixedIncomeError, FixedIncomeResult};
use fi_core::types::{CashFlow, CashflowSet, Compounding};
use fi_math::solvers::{hybrid, SolverConfig, SolverMethod};

use super::{FlatYield, PresentValueEngine};

/// Doublings (or halvings towards the rate floor) allowed while bracketing.
const MAX_BRACKET_STEPS: i32 = 64;

/// Result of a yield calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldResult {
    /// The calculated yield (as a decimal, e.g., 0.05 for 5%).
    pub yield_value: f64,
    /// Iterations used across every method tried.
    pub iterations: u32,
    /// Method that produced the root.
    pub method: SolverMethod,
    /// Final price residual.
    pub residual: f64,
}

/// Yield-to-maturity solver.
///
/// Yields are compounded at the cash flows' own frequency unless
/// [`with_compounding`](Self::with_compounding) overrides it; single-payment
/// sets compound annually.
///
/// By default the admissible prices are `(0, sum of undiscounted flows]`,
/// i.e. non-negative yields. [`with_negative_yields`](Self::with_negative_yields)
/// lifts the ceiling and prices through the permissive engine.
///
/// # Example
///
/// ```rust
/// use fi_bonds::pricing::YieldSolver;
/// use fi_core::prelude::*;
///
/// let flows = CashflowSet::new(
///     Date::from_ymd(2025, 1, 1).unwrap(),
///     Frequency::Zero,
///     vec![CashFlow::principal(Date::from_ymd(2035, 1, 1).unwrap(), 10.0, 100.0)],
/// )
/// .unwrap();
///
/// let result = YieldSolver::new().solve(&flows, 61.391325354, None).unwrap();
/// assert!((result.yield_value - 0.05).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YieldSolver {
    config: SolverConfig,
    allow_negative_yields: bool,
    compounding: Option<Compounding>,
}

impl Default for YieldSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl YieldSolver {
    /// Creates a solver with tolerance 1e-10 and 100 iterations per method.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: SolverConfig::default(),
            allow_negative_yields: false,
            compounding: None,
        }
    }

    /// Sets the absolute price tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.config = self.config.with_tolerance(tolerance);
        self
    }

    /// Sets the iteration cap applied to each method.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.config = self.config.with_max_iterations(max_iterations);
        self
    }

    /// Admits negative yields (prices above the undiscounted total).
    #[must_use]
    pub fn with_negative_yields(mut self, allow: bool) -> Self {
        self.allow_negative_yields = allow;
        self
    }

    /// Overrides the compounding convention of the yield.
    #[must_use]
    pub fn with_compounding(mut self, compounding: Compounding) -> Self {
        self.compounding = Some(compounding);
        self
    }

    /// Solver configuration.
    #[must_use]
    pub fn config(&self) -> SolverConfig {
        self.config
    }

    /// Whether negative yields are admitted.
    #[must_use]
    pub fn allows_negative_yields(&self) -> bool {
        self.allow_negative_yields
    }

    /// Compounding used for `cashflows`.
    #[must_use]
    pub fn compounding_for(&self, cashflows: &CashflowSet) -> Compounding {
        self.compounding
            .unwrap_or_else(|| Compounding::from(cashflows.frequency()))
    }

    /// Flat-yield discounter this solver prices with.
    #[must_use]
    pub fn flat_yield(&self, cashflows: &CashflowSet, y: f64) -> FlatYield {
        FlatYield::new(y, self.compounding_for(cashflows))
    }

    /// Price of `cashflows` at yield `y`.
    pub fn price_at_yield(&self, cashflows: &CashflowSet, y: f64) -> FixedIncomeResult<f64> {
        PresentValueEngine::new()
            .with_negative_rates(self.allow_negative_yields)
            .price(cashflows, &self.flat_yield(cashflows, y))
    }

    /// Solves for the yield reproducing `target_price`.
    ///
    /// # Errors
    ///
    /// - `InvalidTargetPrice` if the target is not positive and finite, or
    ///   exceeds the undiscounted total while negative yields are disallowed
    /// - `NonConvergence` if the bracket cannot be established or every
    ///   method exhausts its iterations
    pub fn solve(
        &self,
        cashflows: &CashflowSet,
        target_price: f64,
        initial_guess: Option<f64>,
    ) -> FixedIncomeResult<YieldResult> {
        let ceiling = if self.allow_negative_yields {
            f64::INFINITY
        } else {
            cashflows.undiscounted_total()
        };
        if !(target_price.is_finite() && target_price > 0.0 && target_price <= ceiling) {
            return Err(FixedIncomeError::invalid_target_price(target_price, ceiling));
        }
        if let Some(g) = initial_guess.filter(|g| !g.is_finite()) {
            return Err(FixedIncomeError::invalid_input(format!(
                "initial guess must be finite, got {g}"
            )));
        }

        let compounding = self.compounding_for(cashflows);
        let flows: Vec<(f64, f64)> = cashflows.iter().map(|cf| (cf.time(), cf.amount())).collect();

        let objective = |y: f64| {
            flows
                .iter()
                .map(|(t, a)| a * compounding.discount_factor(y, *t))
                .sum::<f64>()
                - target_price
        };
        let derivative = |y: f64| {
            flows
                .iter()
                .map(|(t, a)| a * compounding.discount_factor_derivative(y, *t))
                .sum::<f64>()
        };

        let lower = if self.allow_negative_yields {
            lower_bound(&objective, compounding)?
        } else {
            0.0
        };
        let upper = upper_bound(&objective)?;
        let guess = initial_guess
            .unwrap_or_else(|| approximate_yield(cashflows, target_price))
            .clamp(lower, upper);

        let root = hybrid(objective, derivative, guess, Some((lower, upper)), &self.config)
            .map_err(FixedIncomeError::from)?;

        debug!(
            "yield {:.10} for price {target_price} via {} in {} iterations",
            root.root, root.method, root.iterations
        );

        Ok(YieldResult {
            yield_value: root.root,
            iterations: root.iterations,
            method: root.method,
            residual: root.residual,
        })
    }
}

/// Yield below which the objective is known to be non-negative.
fn lower_bound<F: Fn(f64) -> f64>(objective: &F, compounding: Compounding) -> FixedIncomeResult<f64> {
    if objective(0.0) >= 0.0 {
        return Ok(0.0);
    }
    let floor = compounding.rate_floor();
    let mut lo = 0.0;
    for k in 1..=MAX_BRACKET_STEPS {
        lo = if floor.is_finite() {
            floor * (1.0 - 0.5_f64.powi(k))
        } else {
            -0.05 * 2.0_f64.powi(k - 1)
        };
        if objective(lo) >= 0.0 {
            return Ok(lo);
        }
    }
    Err(FixedIncomeError::non_convergence(
        "yield bracket expansion",
        MAX_BRACKET_STEPS as u32,
        objective(lo).abs(),
    ))
}

/// Yield above which the objective is known to be negative.
fn upper_bound<F: Fn(f64) -> f64>(objective: &F) -> FixedIncomeResult<f64> {
    let mut hi = 1.0;
    for _ in 0..MAX_BRACKET_STEPS {
        if objective(hi) < 0.0 {
            return Ok(hi);
        }
        hi *= 2.0;
    }
    Err(FixedIncomeError::non_convergence(
        "yield bracket expansion",
        MAX_BRACKET_STEPS as u32,
        objective(hi).abs(),
    ))
}

/// Textbook approximation `(C + (F - P) / T) / ((F + P) / 2)`.
fn approximate_yield(cashflows: &CashflowSet, price: f64) -> f64 {
    let t = cashflows.final_time();
    let face: f64 = cashflows.iter().map(CashFlow::principal_amount).sum();
    if t <= 0.0 || face <= 0.0 {
        return 0.05;
    }
    let annual_coupon = cashflows.coupon_total() / t;
    (annual_coupon + (face - price) / t) / (0.5 * (face + price))
}
