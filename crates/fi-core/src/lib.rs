//! # FI Core
//!
//! Core types and conventions shared by every crate in the fixed income workspace.
//!
//! - **Types**: [`Date`], [`Frequency`], [`Compounding`], [`CashFlow`], [`CashflowSet`]
//! - **Day Count Conventions**: exact year fractions under market conventions
//! - **Errors**: the [`FixedIncomeError`] taxonomy returned by every public operation
//! - **Traits**: [`Discounter`], the seam between cashflows and discounting
//!
//! ## Example
//!
//! ```rust
//! use fi_core::prelude::*;
//!
//! let start = Date::from_ymd(2025, 1, 1).unwrap();
//! let end = Date::from_ymd(2025, 4, 1).unwrap();
//! let yf = DayCountConvention::Act360.year_fraction(start, end).unwrap();
//! assert_eq!(yf.to_string(), "0.25");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::return_self_not_must_use)]

pub mod daycounts;
pub mod error;
pub mod traits;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::daycounts::{DayCount, DayCountConvention};
    pub use crate::error::{FixedIncomeError, FixedIncomeResult};
    pub use crate::traits::Discounter;
    pub use crate::types::{CashFlow, CashflowSet, Compounding, Date, Frequency};
}

// Re-export commonly used types at crate root
pub use daycounts::DayCountConvention;
pub use error::{FixedIncomeError, FixedIncomeResult};
pub use traits::Discounter;
pub use types::{CashFlow, CashflowSet, Compounding, Date, Frequency};
