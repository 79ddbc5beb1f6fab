//! Domain value types.

mod cashflow;
mod date;
mod frequency;

pub use cashflow::{CashFlow, CashFlowType, CashflowSet};
pub use date::Date;
pub use frequency::{Compounding, Frequency};
