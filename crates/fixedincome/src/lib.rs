//! # fixedincome
//!
//! Fixed income analytics in one import.
//!
//! | Crate | Contents |
//! |-------|----------|
//! | [`core`] | dates, frequencies, compounding, day counts, cash flows, errors |
//! | [`math`] | root finders, interpolation kernels, linear solves |
//! | [`bonds`] | instruments, schedules, present value, yield solving |
//! | [`curves`] | discount curves, interpolation, bootstrapping |
//! | [`analytics`] | duration, convexity, DV01, time value of money |
//! | [`config`] | TOML/JSON configuration of all of the above |
//!
//! ## Example
//!
//! ```rust
//! use fixedincome::prelude::*;
//!
//! let bond = Instrument::fixed_rate_bond(
//!     100.0,
//!     0.06,
//!     Frequency::SemiAnnual,
//!     Date::from_ymd(2025, 1, 15).unwrap(),
//!     Date::from_ymd(2030, 1, 15).unwrap(),
//!     DayCountConvention::Thirty360US,
//! )
//! .unwrap();
//!
//! let flows = CashflowSchedule::default().generate(&bond).unwrap();
//! let price = PresentValueEngine::new()
//!     .price(&flows, &FlatYield::for_cashflows(0.07, &flows))
//!     .unwrap();
//! assert!((price - 95.8416973387111).abs() < 1e-9);
//!
//! let ytm = YieldSolver::new().solve(&flows, price, None).unwrap();
//! let risk = RiskCalculator::new().compute(&flows, ytm.yield_value).unwrap();
//! assert!((ytm.yield_value - 0.07).abs() < 1e-10);
//! assert!(risk.modified_duration < risk.macaulay_duration);
//! ```

#![warn(missing_docs)]

pub use fi_analytics as analytics;
pub use fi_bonds as bonds;
pub use fi_config as config;
pub use fi_core as core;
pub use fi_curves as curves;
pub use fi_math as math;

pub use fi_core::{FixedIncomeError, FixedIncomeResult};

/// Everything needed for typical use.
pub mod prelude {
    pub use fi_analytics::prelude::*;
    pub use fi_bonds::prelude::*;
    pub use fi_config::{AnalyticsConfig, Validate};
    pub use fi_core::prelude::*;
    pub use fi_curves::prelude::*;
}
