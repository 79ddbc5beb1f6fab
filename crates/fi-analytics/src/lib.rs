//! # FI Analytics
//!
//! Risk and time-value-of-money analytics for the fixed income workspace.
//!
//! - **Yield risk**: Macaulay and modified duration, convexity and DV01 of a
//!   cash flow set at a flat yield, analytically or by finite differences
//! - **Curve risk**: the same measures under a parallel zero-rate shift of a
//!   [`fi_curves::DiscountCurve`], plus key-rate DV01 per pillar
//! - **Time value of money**: `npv`, `irr`, `rate`, `pv` and `fv` with the
//!   usual spreadsheet sign conventions
//!
//! ## Example
//!
//! ```rust
//! use fi_analytics::prelude::*;
//! use fi_bonds::prelude::*;
//! use fi_core::prelude::*;
//!
//! let bond = Instrument::fixed_rate_bond(
//!     100.0,
//!     0.05,
//!     Frequency::Annual,
//!     Date::from_ymd(2025, 1, 15).unwrap(),
//!     Date::from_ymd(2035, 1, 15).unwrap(),
//!     DayCountConvention::ActActIcma,
//! )
//! .unwrap();
//! let cashflows = CashflowSchedule::default().generate(&bond).unwrap();
//!
//! let risk = RiskCalculator::new().compute(&cashflows, 0.05).unwrap();
//! assert!((risk.macaulay_duration - 8.107822).abs() < 1e-6);
//! assert!((risk.dv01 - 0.0772173).abs() < 1e-7);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::float_cmp)]

pub mod risk;
pub mod tvm;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::risk::{
        ConvexityCheck, KeyRateDv01, RiskCalculator, RiskMethod, RiskResult, DEFAULT_BUMP,
        DEFAULT_CONVEXITY_TOLERANCE,
    };
    pub use crate::tvm::{fv, irr, npv, pv, rate, PaymentTiming};
}

pub use risk::{RiskCalculator, RiskResult};
