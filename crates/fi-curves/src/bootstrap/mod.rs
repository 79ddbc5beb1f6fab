//! Curve bootstrapping.
//!
//! - [`CurveBootstrapper`]: sequential pillar-by-pillar solve from market
//!   quotes, with multi-pass refinement for non-local interpolation
//! - [`matrix_bootstrap`]: discount factors from a square payoff matrix

mod matrix;
mod sequential;

pub use matrix::{matrix_bootstrap, spot_yields, MatrixBootstrap};
pub use sequential::CurveBootstrapper;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use fi_bonds::cashflows::CashflowSchedule;
use fi_math::solvers::SolverConfig;

use crate::curve::{CurveOptions, DiscountCurve};
use crate::interpolation::{CurveInterpolator, InterpolationMethod};
use crate::repricing::{RepricingReport, DEFAULT_REPRICING_TOLERANCE};

/// Default cap on refinement passes for non-local interpolation.
pub const DEFAULT_MAX_PASSES: u32 = 50;

/// What to do with cash flows that fall between the last solved pillar and
/// the pillar being solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GapPolicy {
    /// Value them off the trial curve, interpolating through the unknown
    /// pillar.
    #[default]
    Interpolate,
    /// Refuse them with `InsufficientQuotes`.
    Strict,
}

/// Bootstrap configuration.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Options of the produced curve.
    pub curve: CurveOptions,
    /// Root finder settings for each pillar.
    pub solver: SolverConfig,
    /// Treatment of cash flows between pillars.
    pub gap_policy: GapPolicy,
    /// Absolute price tolerance of the repricing report.
    pub repricing_tolerance: f64,
    /// Maximum passes when interpolation is non-local.
    pub max_passes: u32,
    /// Schedule generator for quote cash flows.
    pub schedule: CashflowSchedule,
    /// Custom interpolation replacing `curve.interpolation`.
    pub custom_interpolator: Option<Arc<dyn CurveInterpolator>>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            curve: CurveOptions::default(),
            solver: SolverConfig::default(),
            gap_policy: GapPolicy::Interpolate,
            repricing_tolerance: DEFAULT_REPRICING_TOLERANCE,
            max_passes: DEFAULT_MAX_PASSES,
            schedule: CashflowSchedule::default(),
            custom_interpolator: None,
        }
    }
}

impl BootstrapConfig {
    /// Sets the curve options.
    #[must_use]
    pub fn with_curve_options(mut self, curve: CurveOptions) -> Self {
        self.curve = curve;
        self
    }

    /// Sets the interpolation method.
    #[must_use]
    pub fn with_interpolation(mut self, method: InterpolationMethod) -> Self {
        self.curve.interpolation = method;
        self
    }

    /// Sets the gap policy.
    #[must_use]
    pub fn with_gap_policy(mut self, policy: GapPolicy) -> Self {
        self.gap_policy = policy;
        self
    }

    /// Sets the root finder settings.
    #[must_use]
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Sets the repricing tolerance.
    #[must_use]
    pub fn with_repricing_tolerance(mut self, tolerance: f64) -> Self {
        self.repricing_tolerance = tolerance;
        self
    }

    /// Sets the refinement pass cap.
    #[must_use]
    pub fn with_max_passes(mut self, max_passes: u32) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Sets the schedule generator.
    #[must_use]
    pub fn with_schedule(mut self, schedule: CashflowSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Uses a custom interpolator.
    #[must_use]
    pub fn with_custom_interpolator(mut self, interpolator: Arc<dyn CurveInterpolator>) -> Self {
        self.custom_interpolator = Some(interpolator);
        self
    }

    /// Returns true if a pillar can move values on segments it does not
    /// bound, so later pillars feed back into earlier ones.
    #[must_use]
    pub fn needs_refinement(&self) -> bool {
        self.custom_interpolator.is_some() || !self.curve.interpolation.is_local()
    }
}

/// A bootstrapped curve with its repricing report.
#[derive(Debug, Clone)]
pub struct BootstrapResult {
    /// The curve.
    pub curve: DiscountCurve,
    /// Repricing of every input quote off `curve`.
    pub report: RepricingReport,
    /// Passes over the quote set (1 for local interpolation).
    pub passes: u32,
}

impl BootstrapResult {
    /// Returns true if every quote reprices within tolerance.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.report.is_valid()
    }
}
