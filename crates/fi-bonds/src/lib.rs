//! # FI Bonds
//!
//! Single-instrument analytics for the fixed income workspace.
//!
//! - **Instruments**: fixed-rate bonds, zero-coupon bonds, deposits and par
//!   swap fixed legs behind one [`Instrument`] type
//! - **Cash Flows**: schedule generation rolled back from maturity, with
//!   front-stub absorption and accrued interest
//! - **Pricing**: present value under any [`fi_core::Discounter`], flat
//!   yields, and a yield-to-maturity solver with bracketing fallback
//!
//! ## Example
//!
//! ```rust
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
//!
//! let cashflows = CashflowSchedule::default().generate(&bond).unwrap();
//! let ytm = YieldSolver::new().solve(&cashflows, 100.0, None).unwrap();
//! assert!((ytm.yield_value - 0.05).abs() < 1e-10);
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
#![allow(clippy::cast_lossless)]
#![allow(clippy::similar_names)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::float_cmp)]

pub mod cashflows;
pub mod instruments;
pub mod pricing;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::cashflows::{
        AccrualMethod, AccruedInterestCalculator, CashflowSchedule, TimeMeasure,
    };
    pub use crate::instruments::{Instrument, InstrumentBuilder, InstrumentKind};
    pub use crate::pricing::{
        FlatYield, PresentValueEngine, PriceResult, YieldResult, YieldSolver,
    };
}

pub use cashflows::CashflowSchedule;
pub use instruments::{Instrument, InstrumentKind};
pub use pricing::{FlatYield, PresentValueEngine, YieldResult, YieldSolver};
