//! Top-level configuration.

use serde::{Deserialize, Serialize};

use fi_analytics::RiskCalculator;
use fi_bonds::pricing::YieldSolver;
use fi_core::types::Date;
use fi_curves::{BootstrapConfig, CurveBootstrapper};

use crate::curve::CurveConfig;
use crate::error::{Validate, ValidationError};
use crate::pricing::PricingConfig;
use crate::risk::RiskConfig;

/// Settings for every analytics component.
///
/// Every field has a default, so a partial document only lists what it
/// changes:
///
/// ```rust
/// use fi_config::AnalyticsConfig;
/// use fi_curves::InterpolationMethod;
///
/// let config = AnalyticsConfig::from_toml_str(
///     r#"
///     [curve]
///     interpolation = "MonotoneCubicZero"
///
///     [risk]
///     bump_bp = 0.5
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.curve.interpolation, InterpolationMethod::MonotoneCubicZero);
/// assert_eq!(config.pricing.max_iterations, 100);
/// assert!((config.risk_calculator().bump() - 0.00005).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Pricing and yield solving.
    pub pricing: PricingConfig,
    /// Curve construction.
    pub curve: CurveConfig,
    /// Risk measures.
    pub risk: RiskConfig,
}

impl AnalyticsConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pricing section.
    #[must_use]
    pub fn with_pricing(mut self, pricing: PricingConfig) -> Self {
        self.pricing = pricing;
        self
    }

    /// Sets the curve section.
    #[must_use]
    pub fn with_curve(mut self, curve: CurveConfig) -> Self {
        self.curve = curve;
        self
    }

    /// Sets the risk section.
    #[must_use]
    pub fn with_risk(mut self, risk: RiskConfig) -> Self {
        self.risk = risk;
        self
    }

    /// Yield solver.
    #[must_use]
    pub fn yield_solver(&self) -> YieldSolver {
        self.pricing.yield_solver()
    }

    /// Bootstrap configuration.
    #[must_use]
    pub fn bootstrap_config(&self) -> BootstrapConfig {
        self.curve.bootstrap_config(&self.pricing)
    }

    /// Bootstrapper for curves valued at `valuation_date`.
    #[must_use]
    pub fn bootstrapper(&self, valuation_date: Date) -> CurveBootstrapper {
        CurveBootstrapper::new(valuation_date).with_config(self.bootstrap_config())
    }

    /// Risk calculator.
    #[must_use]
    pub fn risk_calculator(&self) -> RiskCalculator {
        self.risk.calculator(&self.pricing)
    }
}

impl Validate for AnalyticsConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let pricing = self.pricing.validate().into_iter().map(|e| e.in_section("pricing"));
        let curve = self.curve.validate().into_iter().map(|e| e.in_section("curve"));
        let risk = self.risk.validate().into_iter().map(|e| e.in_section("risk"));
        pricing.chain(curve).chain(risk).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fi_curves::{GapPolicy, InterpolationMethod};

    #[test]
    fn test_defaults_are_valid() {
        let config = AnalyticsConfig::default();
        assert!(config.is_valid());
        assert_eq!(config.curve.interpolation, InterpolationMethod::LogLinear);
        assert_eq!(config.curve.gap_policy, GapPolicy::Interpolate);
        assert!(!config.pricing.allow_negative_yields);
        assert_eq!(config.risk.bump_bp, 1.0);
    }

    #[test]
    fn test_components_follow_sections() {
        let mut config = AnalyticsConfig::new();
        config.pricing = config.pricing.with_negative_yields(true).with_solver_tolerance(1e-12);
        config.curve = config.curve.with_interpolation(InterpolationMethod::Linear);
        config.curve.max_passes = 7;

        let solver = config.yield_solver();
        assert!(solver.allows_negative_yields());
        assert_eq!(solver.config().tolerance, 1e-12);

        let bootstrap = config.bootstrap_config();
        assert_eq!(bootstrap.curve.interpolation, InterpolationMethod::Linear);
        assert_eq!(bootstrap.max_passes, 7);
        assert_eq!(bootstrap.solver.tolerance, 1e-12);

        let risk = config.risk_calculator();
        assert_eq!(risk.bump(), 1e-4);
    }

    #[test]
    fn test_validation_names_sections() {
        let mut config = AnalyticsConfig::default();
        config.pricing.max_iterations = 0;
        config.risk.bump_bp = -1.0;

        let errors = config.validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["pricing.max_iterations", "risk.bump_bp"]);
    }
}
