//! Pricing and yield solving settings.

use serde::{Deserialize, Serialize};

use fi_bonds::cashflows::{CashflowSchedule, DEFAULT_PERIOD_TOLERANCE};
use fi_bonds::pricing::{PresentValueEngine, YieldSolver};
use fi_math::solvers::{SolverConfig, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};

use crate::error::{Validate, ValidationError};

/// Pricing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Absolute price tolerance of the yield solver.
    pub solver_tolerance: f64,
    /// Iteration cap of each solver method.
    pub max_iterations: u32,
    /// Admit negative yields and discount factors above one.
    pub allow_negative_yields: bool,
    /// Front stub tolerance, as a fraction of a coupon period.
    pub period_tolerance: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            solver_tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            allow_negative_yields: false,
            period_tolerance: DEFAULT_PERIOD_TOLERANCE,
        }
    }
}

impl PricingConfig {
    /// Sets the solver tolerance.
    #[must_use]
    pub fn with_solver_tolerance(mut self, tolerance: f64) -> Self {
        self.solver_tolerance = tolerance;
        self
    }

    /// Admits or rejects negative yields.
    #[must_use]
    pub fn with_negative_yields(mut self, allow: bool) -> Self {
        self.allow_negative_yields = allow;
        self
    }

    /// Root finder settings.
    #[must_use]
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig::new(self.solver_tolerance, self.max_iterations)
    }

    /// Schedule generator.
    #[must_use]
    pub fn schedule(&self) -> CashflowSchedule {
        CashflowSchedule::default().with_period_tolerance(self.period_tolerance)
    }

    /// Yield solver with these settings.
    #[must_use]
    pub fn yield_solver(&self) -> YieldSolver {
        YieldSolver::new()
            .with_tolerance(self.solver_tolerance)
            .with_max_iterations(self.max_iterations)
            .with_negative_yields(self.allow_negative_yields)
    }

    /// Present value engine with these settings.
    #[must_use]
    pub fn engine(&self) -> PresentValueEngine {
        PresentValueEngine::new()
            .with_negative_rates(self.allow_negative_yields)
            .with_schedule(self.schedule())
    }
}

impl Validate for PricingConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !(self.solver_tolerance > 0.0 && self.solver_tolerance <= 1e-4) {
            errors.push(ValidationError::new(
                "solver_tolerance",
                format!("must lie in (0, 1e-4], got {}", self.solver_tolerance),
                "valid_tolerance",
            ));
        }

        if self.max_iterations == 0 || self.max_iterations > 10_000 {
            errors.push(ValidationError::new(
                "max_iterations",
                format!("must lie in 1..=10000, got {}", self.max_iterations),
                "valid_iterations",
            ));
        }

        if !(0.0..0.5).contains(&self.period_tolerance) {
            errors.push(ValidationError::new(
                "period_tolerance",
                format!("must lie in [0, 0.5), got {}", self.period_tolerance),
                "valid_fraction",
            ));
        }

        errors
    }
}
