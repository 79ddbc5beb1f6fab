//! Pricing.
//!
//! - [`PresentValueEngine`]: discounts a [`CashflowSet`] under any
//!   [`Discounter`]
//! - [`FlatYield`]: a single yield under a compounding convention
//! - [`YieldSolver`]: finds the flat yield reproducing a target price

mod engine;
mod flat_yield;
mod yield_solver;

pub use engine::{PresentValueEngine, PriceResult};
pub use flat_yield::FlatYield;
pub use yield_solver::{YieldResult, YieldSolver};

use fi_core::error::FixedIncomeResult;
use fi_core::traits::Discounter;
use fi_core::types::CashflowSet;

/// Prices `cashflows` under `discounter` with the strict engine.
///
/// # Example
///
/// ```rust
/// use fi_bonds::pricing::price;
/// use fi_core::prelude::*;
///
/// let flows = CashflowSet::new(
///     Date::from_ymd(2025, 1, 1).unwrap(),
///     Frequency::Annual,
///     vec![CashFlow::final_payment(Date::from_ymd(2026, 1, 1).unwrap(), 1.0, 5.0, 100.0)],
/// )
/// .unwrap();
///
/// let pv = price(&flows, &|t: f64| 1.05_f64.powf(-t)).unwrap();
/// assert!((pv - 100.0).abs() < 1e-12);
/// ```
pub fn price<D: Discounter + ?Sized>(
    cashflows: &CashflowSet,
    discounter: &D,
) -> FixedIncomeResult<f64> {
    PresentValueEngine::new().price(cashflows, discounter)
}

/// Solves the flat yield reproducing `target_price` with default settings.
pub fn solve_yield(
    cashflows: &CashflowSet,
    target_price: f64,
    initial_guess: Option<f64>,
) -> FixedIncomeResult<f64> {
    YieldSolver::new()
        .solve(cashflows, target_price, initial_guess)
        .map(|r| r.yield_value)
}
