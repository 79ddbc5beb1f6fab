//! Flat-yield risk calculator.

use log::debug;

use fi_bonds::pricing::{FlatYield, PresentValueEngine};
use fi_core::error::{FixedIncomeError, FixedIncomeResult};
use fi_core::traits::Discounter;
use fi_core::types::{CashflowSet, Compounding};

use super::{ConvexityCheck, RiskMethod, RiskResult};

/// Default finite-difference bump: one basis point.
pub const DEFAULT_BUMP: f64 = 1e-4;

/// Default relative tolerance between analytic and finite-difference
/// convexity.
pub const DEFAULT_CONVEXITY_TOLERANCE: f64 = 1e-4;

/// Duration, convexity and DV01 calculator.
///
/// Yields compound at the frequency of the cash flow set (annually for
/// single-payment sets) unless overridden, matching
/// [`YieldSolver`](fi_bonds::pricing::YieldSolver), so a solved yield can be
/// fed straight back in.
///
/// # Example
///
/// ```rust
/// use fi_analytics::RiskCalculator;
/// use fi_bonds::prelude::*;
/// use fi_core::prelude::*;
///
/// let bond = Instrument::fixed_rate_bond(
///     100.0,
///     0.05,
///     Frequency::Annual,
///     Date::from_ymd(2025, 1, 15).unwrap(),
///     Date::from_ymd(2035, 1, 15).unwrap(),
///     DayCountConvention::ActActIcma,
/// )
/// .unwrap();
/// let flows = CashflowSchedule::default().generate(&bond).unwrap();
/// let ytm = YieldSolver::new().solve(&flows, 95.28, None).unwrap().yield_value;
///
/// let calc = RiskCalculator::new();
/// let risk = calc.compute(&flows, ytm).unwrap();
/// assert!((risk.modified_duration - 7.6250369).abs() < 1e-6);
/// assert!(calc.convexity_check(&flows, ytm).unwrap().agrees());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskCalculator {
    bump: f64,
    convexity_tolerance: f64,
    compounding: Option<Compounding>,
    allow_negative_yields: bool,
}

impl Default for RiskCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskCalculator {
    /// Creates a calculator with a one basis point bump.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bump: DEFAULT_BUMP,
            convexity_tolerance: DEFAULT_CONVEXITY_TOLERANCE,
            compounding: None,
            allow_negative_yields: false,
        }
    }

    /// Sets the finite-difference bump, in decimal (0.0001 = 1bp).
    #[must_use]
    pub fn with_bump(mut self, bump: f64) -> Self {
        self.bump = bump;
        self
    }

    /// Sets the relative tolerance of [`convexity_check`](Self::convexity_check).
    #[must_use]
    pub fn with_convexity_tolerance(mut self, tolerance: f64) -> Self {
        self.convexity_tolerance = tolerance;
        self
    }

    /// Overrides the compounding of the yield.
    #[must_use]
    pub fn with_compounding(mut self, compounding: Compounding) -> Self {
        self.compounding = Some(compounding);
        self
    }

    /// Admits negative yields and rates.
    #[must_use]
    pub fn with_negative_yields(mut self, allow: bool) -> Self {
        self.allow_negative_yields = allow;
        self
    }

    /// Finite-difference bump.
    #[must_use]
    pub fn bump(&self) -> f64 {
        self.bump
    }

    /// Convexity agreement tolerance.
    #[must_use]
    pub fn convexity_tolerance(&self) -> f64 {
        self.convexity_tolerance
    }

    /// Compounding used for `cashflows`.
    #[must_use]
    pub fn compounding_for(&self, cashflows: &CashflowSet) -> Compounding {
        self.compounding
            .unwrap_or_else(|| Compounding::from(cashflows.frequency()))
    }

    pub(crate) fn engine(&self) -> PresentValueEngine {
        PresentValueEngine::new().with_negative_rates(self.allow_negative_yields)
    }

    pub(crate) fn checked_bump(&self) -> FixedIncomeResult<f64> {
        if self.bump.is_finite() && self.bump > 0.0 {
            Ok(self.bump)
        } else {
            Err(FixedIncomeError::invalid_input(format!(
                "bump must be positive and finite, got {}",
                self.bump
            )))
        }
    }

    /// Analytic risk measures of `cashflows` at flat yield `y`.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a non-finite yield or a non-positive price
    /// - `InvalidDiscounter` when a discount factor leaves the engine's
    ///   admissible range (a negative yield without
    ///   [`with_negative_yields`](Self::with_negative_yields))
    pub fn compute(&self, cashflows: &CashflowSet, y: f64) -> FixedIncomeResult<RiskResult> {
        let compounding = self.compounding_for(cashflows);
        check_yield(y, compounding)?;
        let engine = self.engine();

        let mut price = 0.0;
        let mut time_weighted = 0.0;
        let mut first = 0.0;
        let mut second = 0.0;
        for cf in cashflows {
            let t = cf.time();
            let (df, d1, d2) = sensitivities(compounding, y, t);
            let pv = cf.amount() * engine.check_discount_factor(t, df)?;
            price += pv;
            time_weighted += t * pv;
            first += cf.amount() * d1;
            second += cf.amount() * d2;
        }
        let price = check_price(price)?;

        let result = RiskResult::new(
            price,
            time_weighted / price,
            -first / price,
            second / price,
            RiskMethod::Analytic,
        );
        debug!("yield risk at {y:.8} ({compounding}): {result}");
        Ok(result)
    }

    /// Finite-difference risk measures of `cashflows` at flat yield `y`.
    ///
    /// Macaulay duration is the present-value weighted time and needs no
    /// bump.
    pub fn effective(&self, cashflows: &CashflowSet, y: f64) -> FixedIncomeResult<RiskResult> {
        let compounding = self.compounding_for(cashflows);
        let bump = self.checked_bump()?;
        check_yield(y - bump, compounding)?;
        check_yield(y + bump, compounding)?;

        let at = |rate: f64| FlatYield::new(rate, compounding);
        let (price, macaulay) = macaulay(&self.engine(), cashflows, &at(y))?;
        let down = self.engine().price(cashflows, &at(y - bump))?;
        let up = self.engine().price(cashflows, &at(y + bump))?;

        Ok(RiskResult::new(
            price,
            macaulay,
            (down - up) / (2.0 * price * bump),
            (down + up - 2.0 * price) / (price * bump * bump),
            RiskMethod::FiniteDifference,
        ))
    }

    /// Compares analytic and finite-difference convexity at `y`.
    pub fn convexity_check(&self, cashflows: &CashflowSet, y: f64) -> FixedIncomeResult<ConvexityCheck> {
        let analytic = self.compute(cashflows, y)?.convexity;
        let effective = self.effective(cashflows, y)?.convexity;
        Ok(ConvexityCheck {
            analytic,
            effective,
            tolerance: self.convexity_tolerance,
        })
    }
}

/// Discount factor and its first two yield derivatives at `t`.
fn sensitivities(compounding: Compounding, y: f64, t: f64) -> (f64, f64, f64) {
    match compounding {
        Compounding::Simple => {
            let base = 1.0 + y * t;
            (1.0 / base, -t / base.powi(2), 2.0 * t * t / base.powi(3))
        }
        Compounding::Continuous => {
            let df = (-y * t).exp();
            (df, -t * df, t * t * df)
        }
        periodic => {
            let n = f64::from(periodic.periods_per_year().unwrap_or(1));
            let base = 1.0 + y / n;
            let df = base.powf(-n * t);
            (df, -t * df / base, t * (t + 1.0 / n) * df / (base * base))
        }
    }
}

fn check_yield(y: f64, compounding: Compounding) -> FixedIncomeResult<()> {
    if y.is_finite() && y > compounding.rate_floor() {
        Ok(())
    } else {
        Err(FixedIncomeError::invalid_input(format!(
            "yield {y} is outside the domain of {compounding} compounding"
        )))
    }
}

pub(crate) fn check_price(price: f64) -> FixedIncomeResult<f64> {
    if price.is_finite() && price > 0.0 {
        Ok(price)
    } else {
        Err(FixedIncomeError::invalid_input(format!(
            "risk measures need a positive price, got {price}"
        )))
    }
}

/// Price and Macaulay duration of `cashflows` under `discounter`.
pub(crate) fn macaulay<D: Discounter + ?Sized>(
    engine: &PresentValueEngine,
    cashflows: &CashflowSet,
    discounter: &D,
) -> FixedIncomeResult<(f64, f64)> {
    let pvs = engine.present_values(cashflows, discounter)?;
    let price = check_price(pvs.iter().sum())?;
    let weighted: f64 = cashflows.iter().zip(&pvs).map(|(cf, pv)| cf.time() * pv).sum();
    Ok((price, weighted / price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fi_core::types::{CashFlow, Date, Frequency};

    fn annual_bond(coupon: f64, years: u32) -> CashflowSet {
        let start = Date::from_ymd(2025, 1, 15).unwrap();
        let flows = (1..=years)
            .map(|i| {
                let date = start.add_years(i as i32).unwrap();
                if i == years {
                    CashFlow::final_payment(date, f64::from(i), coupon, 100.0)
                } else {
                    CashFlow::coupon(date, f64::from(i), coupon)
                }
            })
            .collect();
        CashflowSet::new(start, Frequency::Annual, flows).unwrap()
    }

    #[test]
    fn test_par_bond_measures() {
        let flows = annual_bond(5.0, 10);
        let risk = RiskCalculator::new().compute(&flows, 0.05).unwrap();

        assert_relative_eq!(risk.price, 100.0, epsilon = 1e-10);
        assert_relative_eq!(risk.macaulay_duration, 8.107822, epsilon = 1e-6);
        assert_relative_eq!(risk.modified_duration, 7.721735, epsilon = 1e-6);
        assert_relative_eq!(risk.convexity, 74.9977, epsilon = 1e-4);
        assert_relative_eq!(risk.dv01, 0.0772173, epsilon = 1e-7);
        assert_eq!(risk.method, RiskMethod::Analytic);
    }

    #[test]
    fn test_modified_is_macaulay_over_periodic_factor() {
        let flows = annual_bond(6.0, 7);
        for compounding in [Compounding::Annual, Compounding::SemiAnnual, Compounding::Monthly] {
            let risk = RiskCalculator::new()
                .with_compounding(compounding)
                .compute(&flows, 0.07)
                .unwrap();
            let n = f64::from(compounding.periods_per_year().unwrap());
            assert_relative_eq!(
                risk.modified_duration,
                risk.macaulay_duration / (1.0 + 0.07 / n),
                epsilon = 1e-12
            );
        }

        let continuous = RiskCalculator::new()
            .with_compounding(Compounding::Continuous)
            .compute(&flows, 0.07)
            .unwrap();
        assert_relative_eq!(
            continuous.modified_duration,
            continuous.macaulay_duration,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_zero_coupon_duration_is_maturity() {
        let start = Date::from_ymd(2025, 1, 1).unwrap();
        let flows = CashflowSet::new(
            start,
            Frequency::Zero,
            vec![CashFlow::principal(start.add_years(10).unwrap(), 10.0, 100.0)],
        )
        .unwrap();
        let risk = RiskCalculator::new().compute(&flows, 0.05).unwrap();
        assert_relative_eq!(risk.price, 61.39132535407591, epsilon = 1e-10);
        assert_relative_eq!(risk.macaulay_duration, 10.0, epsilon = 1e-12);
        assert_relative_eq!(risk.modified_duration, 10.0 / 1.05, epsilon = 1e-12);
        assert_relative_eq!(risk.convexity, 110.0 / 1.05_f64.powi(2), epsilon = 1e-10);
    }

    #[test]
    fn test_effective_matches_analytic() {
        let flows = annual_bond(5.0, 10);
        let calc = RiskCalculator::new();
        let analytic = calc.compute(&flows, 0.0563).unwrap();
        let effective = calc.effective(&flows, 0.0563).unwrap();

        assert_eq!(effective.method, RiskMethod::FiniteDifference);
        assert_relative_eq!(effective.price, analytic.price, epsilon = 1e-12);
        assert_relative_eq!(
            effective.macaulay_duration,
            analytic.macaulay_duration,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            effective.modified_duration,
            analytic.modified_duration,
            max_relative = 1e-6
        );
        assert_relative_eq!(effective.convexity, analytic.convexity, max_relative = 1e-4);
    }

    #[test]
    fn test_convexity_check() {
        let flows = annual_bond(5.0, 30);
        let check = RiskCalculator::new().convexity_check(&flows, 0.05).unwrap();
        assert!(check.agrees(), "{check:?}");
        assert!(check.relative_difference() < DEFAULT_CONVEXITY_TOLERANCE);

        // A 100bp bump is too coarse for the default tolerance
        let coarse = RiskCalculator::new()
            .with_bump(0.01)
            .convexity_check(&flows, 0.05)
            .unwrap();
        assert!(!coarse.agrees());
    }

    #[test]
    fn test_estimate_price_change() {
        let flows = annual_bond(5.0, 10);
        let calc = RiskCalculator::new();
        let risk = calc.compute(&flows, 0.05).unwrap();
        let actual = calc.compute(&flows, 0.051).unwrap().price - risk.price;
        assert_relative_eq!(risk.estimate_price_change(0.001), actual, epsilon = 1e-4);
    }

    #[test]
    fn test_invalid_inputs() {
        let flows = annual_bond(5.0, 5);
        let calc = RiskCalculator::new();
        assert!(matches!(
            calc.compute(&flows, f64::NAN),
            Err(FixedIncomeError::InvalidInput { .. })
        ));
        assert!(matches!(
            calc.compute(&flows, -1.5),
            Err(FixedIncomeError::InvalidInput { .. })
        ));
        assert!(matches!(
            calc.compute(&flows, -0.01),
            Err(FixedIncomeError::InvalidDiscounter { .. })
        ));
        assert!(calc.with_negative_yields(true).compute(&flows, -0.01).is_ok());
        assert!(calc.with_bump(0.0).effective(&flows, 0.05).is_err());
    }

    #[test]
    fn test_simple_compounding_matches_finite_difference() {
        let flows = annual_bond(4.0, 3);
        let calc = RiskCalculator::new().with_compounding(Compounding::Simple);
        let analytic = calc.compute(&flows, 0.04).unwrap();
        let effective = calc.effective(&flows, 0.04).unwrap();
        assert_relative_eq!(
            analytic.modified_duration,
            effective.modified_duration,
            max_relative = 1e-6
        );
        assert_relative_eq!(analytic.convexity, effective.convexity, max_relative = 1e-4);
    }
}
