//! Risk settings.

use serde::{Deserialize, Serialize};

use fi_analytics::risk::DEFAULT_CONVEXITY_TOLERANCE;
use fi_analytics::RiskCalculator;

use crate::error::{Validate, ValidationError};
use crate::pricing::PricingConfig;

/// Risk configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Finite-difference bump in basis points.
    pub bump_bp: f64,
    /// Relative tolerance between analytic and finite-difference convexity.
    pub convexity_tolerance: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            bump_bp: 1.0,
            convexity_tolerance: DEFAULT_CONVEXITY_TOLERANCE,
        }
    }
}

impl RiskConfig {
    /// Risk calculator, admitting negative yields when `pricing` does.
    #[must_use]
    pub fn calculator(&self, pricing: &PricingConfig) -> RiskCalculator {
        RiskCalculator::new()
            .with_bump(self.bump_bp * 1e-4)
            .with_convexity_tolerance(self.convexity_tolerance)
            .with_negative_yields(pricing.allow_negative_yields)
    }
}

impl Validate for RiskConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !(self.bump_bp > 0.0 && self.bump_bp <= 100.0) {
            errors.push(ValidationError::new(
                "bump_bp",
                format!("must lie in (0, 100], got {}", self.bump_bp),
                "valid_bump",
            ));
        }

        if !(self.convexity_tolerance > 0.0 && self.convexity_tolerance < 1.0) {
            errors.push(ValidationError::new(
                "convexity_tolerance",
                format!("must lie in (0, 1), got {}", self.convexity_tolerance),
                "valid_tolerance",
            ));
        }

        errors
    }
}
