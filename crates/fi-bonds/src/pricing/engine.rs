//! Present value engine.

use serde::{Deserialize, Serialize};

use fi_core::error::{FixedIncomeError, FixedIncomeResult};
use fi_core::traits::Discounter;
use fi_core::types::{CashflowSet, Date};

use crate::cashflows::{AccruedInterestCalculator, CashflowSchedule, TimeMeasure};
use crate::instruments::Instrument;

/// Result of pricing an instrument at a settlement date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceResult {
    /// Present value of future cash flows (full price).
    pub dirty_price: f64,
    /// Dirty price less accrued interest.
    pub clean_price: f64,
    /// Accrued interest at settlement.
    pub accrued_interest: f64,
}

/// Discounts cash flows: `price = sum(amount_i * DF(t_i))`.
///
/// Every discount factor is checked before use. The strict engine (the
/// default) accepts `(0, 1]`; the permissive engine accepts any finite
/// positive value, which negative rates require.
///
/// # Example
///
/// ```rust
/// use fi_bonds::pricing::{FlatYield, PresentValueEngine};
/// use fi_core::prelude::*;
///
/// let flows = CashflowSet::new(
///     Date::from_ymd(2025, 1, 1).unwrap(),
///     Frequency::Annual,
///     vec![
///         CashFlow::coupon(Date::from_ymd(2026, 1, 1).unwrap(), 1.0, 5.0),
///         CashFlow::final_payment(Date::from_ymd(2027, 1, 1).unwrap(), 2.0, 5.0, 100.0),
///     ],
/// )
/// .unwrap();
///
/// let engine = PresentValueEngine::new();
/// let pv = engine.price(&flows, &FlatYield::new(0.05, Compounding::Annual)).unwrap();
/// assert!((pv - 100.0).abs() < 1e-12);
///
/// // A discount factor above one is rejected unless negative rates are allowed
/// let negative = FlatYield::new(-0.01, Compounding::Annual);
/// assert!(engine.price(&flows, &negative).is_err());
/// assert!(PresentValueEngine::permissive().price(&flows, &negative).is_ok());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PresentValueEngine {
    allow_negative_rates: bool,
    schedule: CashflowSchedule,
}

impl PresentValueEngine {
    /// Strict engine: discount factors must lie in `(0, 1]`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Permissive engine: any finite positive discount factor.
    #[must_use]
    pub fn permissive() -> Self {
        Self::new().with_negative_rates(true)
    }

    /// Sets whether discount factors above one are admitted.
    #[must_use]
    pub fn with_negative_rates(mut self, allow: bool) -> Self {
        self.allow_negative_rates = allow;
        self
    }

    /// Sets the schedule generator used by instrument-level pricing.
    #[must_use]
    pub fn with_schedule(mut self, schedule: CashflowSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Whether discount factors above one are admitted.
    #[must_use]
    pub fn allows_negative_rates(&self) -> bool {
        self.allow_negative_rates
    }

    /// Checks one discount factor.
    ///
    /// # Errors
    ///
    /// `InvalidDiscounter` if `df` is outside the admissible range.
    pub fn check_discount_factor(&self, t: f64, df: f64) -> FixedIncomeResult<f64> {
        let upper_ok = if self.allow_negative_rates {
            df.is_finite()
        } else {
            df <= 1.0
        };
        if df > 0.0 && upper_ok {
            Ok(df)
        } else {
            Err(FixedIncomeError::invalid_discounter(t, df))
        }
    }

    /// Present value of each flow, in payment order.
    pub fn present_values<D: Discounter + ?Sized>(
        &self,
        cashflows: &CashflowSet,
        discounter: &D,
    ) -> FixedIncomeResult<Vec<f64>> {
        cashflows
            .iter()
            .map(|cf| {
                let df = discounter.discount_factor(cf.time())?;
                Ok(cf.amount() * self.check_discount_factor(cf.time(), df)?)
            })
            .collect()
    }

    /// Price of the cash flows under `discounter`.
    ///
    /// # Errors
    ///
    /// `InvalidDiscounter` if any discount factor is out of range, or the
    /// discounter's own error.
    pub fn price<D: Discounter + ?Sized>(
        &self,
        cashflows: &CashflowSet,
        discounter: &D,
    ) -> FixedIncomeResult<f64> {
        let mut pv = 0.0;
        for cf in cashflows {
            let df = discounter.discount_factor(cf.time())?;
            pv += cf.amount() * self.check_discount_factor(cf.time(), df)?;
        }
        Ok(pv)
    }

    /// Prices an instrument at `settlement`, returning dirty and clean
    /// prices.
    ///
    /// Flows paid on or before settlement are excluded; times follow
    /// `measure`.
    pub fn price_instrument<D: Discounter + ?Sized>(
        &self,
        instrument: &Instrument,
        settlement: Date,
        discounter: &D,
        measure: TimeMeasure,
    ) -> FixedIncomeResult<PriceResult> {
        let cashflows = self.schedule.generate_as_of(instrument, settlement, measure)?;
        let dirty_price = self.price(&cashflows, discounter)?;
        let accrued_interest =
            AccruedInterestCalculator::for_instrument(&self.schedule, instrument, settlement)?;

        Ok(PriceResult {
            dirty_price,
            clean_price: dirty_price - accrued_interest,
            accrued_interest,
        })
    }

    /// Full price of an instrument at `settlement`.
    pub fn dirty_price<D: Discounter + ?Sized>(
        &self,
        instrument: &Instrument,
        settlement: Date,
        discounter: &D,
        measure: TimeMeasure,
    ) -> FixedIncomeResult<f64> {
        self.price_instrument(instrument, settlement, discounter, measure)
            .map(|r| r.dirty_price)
    }

    /// Dirty price less accrued interest.
    pub fn clean_price<D: Discounter + ?Sized>(
        &self,
        instrument: &Instrument,
        settlement: Date,
        discounter: &D,
        measure: TimeMeasure,
    ) -> FixedIncomeResult<f64> {
        self.price_instrument(instrument, settlement, discounter, measure)
            .map(|r| r.clean_price)
    }
}
