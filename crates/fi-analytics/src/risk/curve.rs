//! Risk against a discount curve.

use log::debug;

use fi_bonds::cashflows::{CashflowSchedule, TimeMeasure};
use fi_bonds::instruments::Instrument;
use fi_bonds::pricing::PresentValueEngine;
use fi_core::error::FixedIncomeResult;
use fi_core::types::CashflowSet;
use fi_curves::DiscountCurve;

use super::calculator::macaulay;
use super::{KeyRateDv01, RiskCalculator, RiskMethod, RiskResult};

impl RiskCalculator {
    /// Risk measures of `cashflows` under a parallel shift of every
    /// continuously compounded zero rate of `curve`.
    ///
    /// Cash flow times must be measured on the curve's time basis. Bumped
    /// curves are priced with the permissive engine.
    pub fn curve_risk(
        &self,
        cashflows: &CashflowSet,
        curve: &DiscountCurve,
    ) -> FixedIncomeResult<RiskResult> {
        let bump = self.checked_bump()?;
        let engine = PresentValueEngine::permissive();

        let (price, macaulay) = macaulay(&engine, cashflows, curve)?;
        let down = engine.price(cashflows, &curve.shifted(-bump)?)?;
        let up = engine.price(cashflows, &curve.shifted(bump)?)?;

        let result = RiskResult::new(
            price,
            macaulay,
            (down - up) / (2.0 * price * bump),
            (down + up - 2.0 * price) / (price * bump * bump),
            RiskMethod::FiniteDifference,
        );
        debug!("curve risk: {result}");
        Ok(result)
    }

    /// [`curve_risk`](Self::curve_risk) of an instrument's flows after the
    /// curve's valuation date.
    pub fn instrument_curve_risk(
        &self,
        instrument: &Instrument,
        curve: &DiscountCurve,
    ) -> FixedIncomeResult<RiskResult> {
        let cashflows = curve_cashflows(instrument, curve)?;
        self.curve_risk(&cashflows, curve)
    }

    /// DV01 against each pillar of `curve`, bumping one pillar zero rate at a
    /// time.
    ///
    /// Under log-linear interpolation the pillar DV01s add up to the
    /// parallel DV01 for flows inside the curve.
    pub fn key_rate_dv01(
        &self,
        cashflows: &CashflowSet,
        curve: &DiscountCurve,
    ) -> FixedIncomeResult<Vec<KeyRateDv01>> {
        let bump = self.checked_bump()?;
        let pillar_dv01 = |index: usize| -> FixedIncomeResult<KeyRateDv01> {
            let engine = PresentValueEngine::permissive();
            let down = engine.price(cashflows, &curve.bumped_at(index, -bump)?)?;
            let up = engine.price(cashflows, &curve.bumped_at(index, bump)?)?;
            Ok(KeyRateDv01 {
                pillar_time: curve.times()[index],
                dv01: (down - up) / (2.0 * bump) * 1e-4,
            })
        };

        map_pillars(curve.pillar_count(), pillar_dv01)
    }
}

#[cfg(feature = "parallel")]
fn map_pillars<F>(count: usize, f: F) -> FixedIncomeResult<Vec<KeyRateDv01>>
where
    F: Fn(usize) -> FixedIncomeResult<KeyRateDv01> + Sync + Send,
{
    use rayon::prelude::*;

    (1..count).into_par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
fn map_pillars<F>(count: usize, f: F) -> FixedIncomeResult<Vec<KeyRateDv01>>
where
    F: Fn(usize) -> FixedIncomeResult<KeyRateDv01>,
{
    (1..count).map(f).collect()
}

fn curve_cashflows(
    instrument: &Instrument,
    curve: &DiscountCurve,
) -> FixedIncomeResult<CashflowSet> {
    CashflowSchedule::default().generate_as_of(
        instrument,
        curve.valuation_date(),
        TimeMeasure::DayCount(curve.options().time_basis),
    )
}
