//! Repricing validation for bootstrapped curves.
//!
//! Every input quote is priced back off the finished curve. A curve that
//! cannot reprice its inputs within tolerance is wrong.

use std::fmt;

use serde::{Deserialize, Serialize};

use fi_core::types::Date;

/// Default absolute repricing tolerance, in price units.
pub const DEFAULT_REPRICING_TOLERANCE: f64 = 1e-8;

/// Repricing result for one quote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepricingCheck {
    /// Maturity of the quoted instrument.
    pub maturity: Date,
    /// Pillar time solved for this quote.
    pub pillar_time: f64,
    /// Observed price.
    pub market_price: f64,
    /// Price off the bootstrapped curve.
    pub model_price: f64,
}

impl RepricingCheck {
    /// Model minus market price.
    #[must_use]
    pub fn error(&self) -> f64 {
        self.model_price - self.market_price
    }
}

/// Repricing results for a whole quote set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepricingReport {
    checks: Vec<RepricingCheck>,
    tolerance: f64,
}

impl RepricingReport {
    /// Creates a report from individual checks.
    #[must_use]
    pub fn new(checks: Vec<RepricingCheck>, tolerance: f64) -> Self {
        Self { checks, tolerance }
    }

    /// Individual checks in quote order.
    #[must_use]
    pub fn checks(&self) -> &[RepricingCheck] {
        &self.checks
    }

    /// Absolute tolerance applied to each check.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Largest absolute repricing error.
    #[must_use]
    pub fn max_error(&self) -> f64 {
        self.checks
            .iter()
            .map(|c| c.error().abs())
            .fold(0.0, f64::max)
    }

    /// Returns true if every quote reprices within tolerance.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.checks
            .iter()
            .all(|c| c.error().abs() <= self.tolerance)
    }

    /// Checks outside tolerance.
    pub fn failures(&self) -> impl Iterator<Item = &RepricingCheck> {
        self.checks
            .iter()
            .filter(move |c| c.error().abs() > self.tolerance)
    }
}

impl fmt::Display for RepricingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} quotes, max error {:.3e} (tolerance {:.1e})",
            self.checks.len(),
            self.max_error(),
            self.tolerance
        )?;
        for check in &self.checks {
            let mark = if check.error().abs() <= self.tolerance {
                "ok"
            } else {
                "FAIL"
            };
            writeln!(
                f,
                "  {} t={:.4} market={:.8} model={:.8} error={:+.3e} {mark}",
                check.maturity,
                check.pillar_time,
                check.market_price,
                check.model_price,
                check.error()
            )?;
        }
        Ok(())
    }
}
