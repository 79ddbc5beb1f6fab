//! Curve construction settings.

use serde::{Deserialize, Serialize};

use fi_core::daycounts::DayCountConvention;
use fi_curves::bootstrap::DEFAULT_MAX_PASSES;
use fi_curves::repricing::DEFAULT_REPRICING_TOLERANCE;
use fi_curves::{
    BootstrapConfig, CurveOptions, ExtrapolationMethod, GapPolicy, InterpolationMethod,
};

use crate::error::{Validate, ValidationError};
use crate::pricing::PricingConfig;

/// Curve configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    /// Interpolation between pillars.
    pub interpolation: InterpolationMethod,
    /// Extrapolation beyond the last pillar.
    pub extrapolation: ExtrapolationMethod,
    /// Admit increasing discount factors.
    pub allow_negative_forwards: bool,
    /// Treatment of cash flows between pillars.
    pub gap_policy: GapPolicy,
    /// Day count measuring pillar times from the valuation date.
    pub time_basis: DayCountConvention,
    /// Absolute price tolerance of the repricing report.
    pub repricing_tolerance: f64,
    /// Refinement pass cap for non-local interpolation.
    pub max_passes: u32,
}

impl Default for CurveConfig {
    fn default() -> Self {
        let options = CurveOptions::default();
        Self {
            interpolation: options.interpolation,
            extrapolation: options.extrapolation,
            allow_negative_forwards: options.allow_negative_forwards,
            gap_policy: GapPolicy::default(),
            time_basis: options.time_basis,
            repricing_tolerance: DEFAULT_REPRICING_TOLERANCE,
            max_passes: DEFAULT_MAX_PASSES,
        }
    }
}

impl CurveConfig {
    /// Sets the interpolation method.
    #[must_use]
    pub fn with_interpolation(mut self, interpolation: InterpolationMethod) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Curve options.
    #[must_use]
    pub fn curve_options(&self) -> CurveOptions {
        CurveOptions::default()
            .with_interpolation(self.interpolation)
            .with_extrapolation(self.extrapolation)
            .with_time_basis(self.time_basis)
            .with_negative_forwards(self.allow_negative_forwards)
    }

    /// Bootstrap configuration, with root finder and schedule settings from
    /// `pricing`.
    #[must_use]
    pub fn bootstrap_config(&self, pricing: &PricingConfig) -> BootstrapConfig {
        BootstrapConfig::default()
            .with_curve_options(self.curve_options())
            .with_gap_policy(self.gap_policy)
            .with_repricing_tolerance(self.repricing_tolerance)
            .with_max_passes(self.max_passes)
            .with_solver(pricing.solver_config())
            .with_schedule(pricing.schedule())
    }
}

impl Validate for CurveConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !(self.repricing_tolerance > 0.0 && self.repricing_tolerance.is_finite()) {
            errors.push(ValidationError::new(
                "repricing_tolerance",
                format!("must be positive, got {}", self.repricing_tolerance),
                "positive",
            ));
        }

        if self.max_passes == 0 {
            errors.push(ValidationError::new(
                "max_passes",
                "at least one pass is required",
                "positive",
            ));
        }

        errors
    }
}
