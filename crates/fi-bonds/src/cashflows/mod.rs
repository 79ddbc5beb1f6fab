//! Cash flow generation and accrued interest.
//!
//! - [`CashflowSchedule`]: turns an [`Instrument`] into a [`CashflowSet`]
//! - [`AccruedInterestCalculator`]: interest accrued since the last coupon

mod accrued;
mod schedule;

pub use accrued::{AccrualMethod, AccruedInterestCalculator};
pub use schedule::{CashflowSchedule, TimeMeasure, DEFAULT_PERIOD_TOLERANCE};

use fi_core::error::FixedIncomeResult;
use fi_core::types::CashflowSet;

use crate::instruments::Instrument;

/// Generates an instrument's cash flows from its issue date with the
/// default schedule settings.
///
/// Equivalent to `CashflowSchedule::default().generate(instrument)`.
pub fn generate(instrument: &Instrument) -> FixedIncomeResult<CashflowSet> {
    CashflowSchedule::default().generate(instrument)
}
