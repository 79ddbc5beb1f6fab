//! Interest rate risk.
//!
//! ## Formulas
//!
//! ```text
//! D_mac = Σ(t_i × PV_i) / P
//! D_mod = -(1/P) dP/dy          = D_mac / (1 + y/f) for periodic compounding
//! C     = (1/P) d²P/dy²         = Σ(t_i × (t_i + 1/f) × PV_i) / (P × (1 + y/f)²)
//! DV01  = P × D_mod × 0.0001
//! ```
//!
//! Finite-difference (effective) measures bump the yield, or every zero
//! rate of a curve, by `±Δy`:
//!
//! ```text
//! D_eff = (P₋ - P₊) / (2 × P₀ × Δy)
//! C_eff = (P₋ + P₊ - 2 × P₀) / (P₀ × Δy²)
//! ```

mod calculator;
mod curve;

pub use calculator::{RiskCalculator, DEFAULT_BUMP, DEFAULT_CONVEXITY_TOLERANCE};

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a [`RiskResult`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskMethod {
    /// Closed-form derivatives of the flat-yield price.
    Analytic,
    /// Symmetric finite differences of the price.
    FiniteDifference,
}

impl fmt::Display for RiskMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskMethod::Analytic => write!(f, "analytic"),
            RiskMethod::FiniteDifference => write!(f, "finite difference"),
        }
    }
}

/// Risk measures of one cash flow set at one yield or curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    /// Price the measures are taken at.
    pub price: f64,
    /// Present-value weighted average time to the cash flows, in years.
    pub macaulay_duration: f64,
    /// Relative price sensitivity to the yield.
    pub modified_duration: f64,
    /// Relative second-order price sensitivity to the yield.
    pub convexity: f64,
    /// Price change for a one basis point move, positive for a long position.
    pub dv01: f64,
    /// How the measures were obtained.
    pub method: RiskMethod,
}

impl RiskResult {
    pub(crate) fn new(
        price: f64,
        macaulay_duration: f64,
        modified_duration: f64,
        convexity: f64,
        method: RiskMethod,
    ) -> Self {
        Self {
            price,
            macaulay_duration,
            modified_duration,
            convexity,
            dv01: price * modified_duration * 1e-4,
            method,
        }
    }

    /// Second-order estimate of the price change for a yield move `dy`.
    ///
    /// `ΔP ≈ P × (-D_mod × Δy + ½ × C × Δy²)`
    #[must_use]
    pub fn estimate_price_change(&self, dy: f64) -> f64 {
        self.price * (-self.modified_duration * dy + 0.5 * self.convexity * dy * dy)
    }
}

impl fmt::Display for RiskResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "price {:.6}, Macaulay {:.6}, modified {:.6}, convexity {:.4}, DV01 {:.6} ({})",
            self.price,
            self.macaulay_duration,
            self.modified_duration,
            self.convexity,
            self.dv01,
            self.method
        )
    }
}

/// Analytic against finite-difference convexity at one yield.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvexityCheck {
    /// Closed-form convexity.
    pub analytic: f64,
    /// Finite-difference convexity.
    pub effective: f64,
    /// Relative tolerance the two are held to.
    pub tolerance: f64,
}

impl ConvexityCheck {
    /// `|analytic - effective| / |analytic|`.
    #[must_use]
    pub fn relative_difference(&self) -> f64 {
        (self.analytic - self.effective).abs() / self.analytic.abs().max(f64::MIN_POSITIVE)
    }

    /// Returns true if the two convexities agree within the tolerance.
    #[must_use]
    pub fn agrees(&self) -> bool {
        self.relative_difference() <= self.tolerance
    }
}

/// DV01 against one curve pillar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyRateDv01 {
    /// Pillar time in years.
    pub pillar_time: f64,
    /// Price change for a one basis point fall in the pillar zero rate.
    pub dv01: f64,
}
