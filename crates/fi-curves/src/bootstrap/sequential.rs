//! Sequential bootstrap.
//!
//! Quotes are processed in increasing maturity. Each quote adds one pillar
//! at its final payment time; every earlier cash flow is valued off the
//! pillars already solved (or, for flows past the last solved pillar,
//! interpolated through the trial value), and the new discount factor is
//! solved so the quote reprices exactly.
//!
//! Under non-local interpolation a later pillar changes the curve between
//! earlier pillars, so the whole set is re-solved pillar by pillar, with
//! every other pillar held at its latest value, until the repricing report
//! is clean or the pass cap is hit.

use log::debug;

use fi_bonds::pricing::PresentValueEngine;
use fi_core::error::{FixedIncomeError, FixedIncomeResult};
use fi_core::types::{CashflowSet, Date};
use fi_math::solvers::hybrid;

use super::{BootstrapConfig, BootstrapResult, GapPolicy};
use crate::curve::DiscountCurve;
use crate::interpolation::InterpolationMethod;
use crate::quotes::MarketQuote;
use crate::repricing::{RepricingCheck, RepricingReport};

/// Doublings allowed while bracketing a pillar discount factor.
const MAX_BRACKET_STEPS: u32 = 64;

/// One quote ready for solving.
#[derive(Debug, Clone)]
struct Leg {
    maturity: Date,
    pillar: f64,
    price: f64,
    cashflows: CashflowSet,
}

/// Sequential bootstrapper for discount curves.
///
/// # Example
///
/// ```rust
/// use fi_bonds::Instrument;
/// use fi_core::prelude::*;
/// use fi_curves::prelude::*;
///
/// let today = Date::from_ymd(2025, 1, 2).unwrap();
/// let swap = |years: i32, rate: f64| {
///     MarketQuote::at_par(
///         Instrument::par_swap(
///             100.0,
///             rate,
///             Frequency::Annual,
///             today,
///             today.add_years(years).unwrap(),
///             DayCountConvention::Act365Fixed,
///         )
///         .unwrap(),
///     )
/// };
///
/// let result = CurveBootstrapper::new(today)
///     .with_interpolation(InterpolationMethod::LogLinear)
///     .bootstrap_validated(&[swap(1, 0.040), swap(2, 0.042), swap(3, 0.043)])
///     .unwrap();
///
/// assert!(result.is_valid());
/// assert_eq!(result.curve.pillar_count(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct CurveBootstrapper {
    valuation_date: Date,
    config: BootstrapConfig,
}

impl CurveBootstrapper {
    /// Creates a bootstrapper with default settings.
    #[must_use]
    pub fn new(valuation_date: Date) -> Self {
        Self {
            valuation_date,
            config: BootstrapConfig::default(),
        }
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: BootstrapConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the interpolation method.
    #[must_use]
    pub fn with_interpolation(mut self, method: InterpolationMethod) -> Self {
        self.config.curve.interpolation = method;
        self
    }

    /// Sets the gap policy.
    #[must_use]
    pub fn with_gap_policy(mut self, policy: GapPolicy) -> Self {
        self.config.gap_policy = policy;
        self
    }

    /// Admits or rejects negative forward rates.
    #[must_use]
    pub fn with_negative_forwards(mut self, allow: bool) -> Self {
        self.config.curve.allow_negative_forwards = allow;
        self
    }

    /// Valuation date of the produced curves.
    #[must_use]
    pub fn valuation_date(&self) -> Date {
        self.valuation_date
    }

    /// Configuration.
    #[must_use]
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Bootstraps a curve that reprices every quote.
    ///
    /// # Errors
    ///
    /// Everything [`bootstrap_validated`](Self::bootstrap_validated)
    /// returns, plus `NonConvergence` when the repricing report is not clean.
    pub fn bootstrap(&self, quotes: &[MarketQuote]) -> FixedIncomeResult<DiscountCurve> {
        let result = self.bootstrap_validated(quotes)?;
        if !result.is_valid() {
            return Err(FixedIncomeError::non_convergence(
                "bootstrap repricing",
                result.passes,
                result.report.max_error(),
            ));
        }
        Ok(result.curve)
    }

    /// Bootstraps a curve and reports how well it reprices each quote.
    ///
    /// # Errors
    ///
    /// - `InsufficientQuotes` for an empty quote set, or a cash flow between
    ///   pillars under [`GapPolicy::Strict`]
    /// - `InvalidInstrument` for quotes not strictly increasing in maturity,
    ///   or maturing on or before the valuation date
    /// - `NonMonotoneCurve` when a solved discount factor exceeds the
    ///   previous one and negative forwards are not admitted
    /// - `NonConvergence` when a pillar cannot be bracketed or solved
    pub fn bootstrap_validated(&self, quotes: &[MarketQuote]) -> FixedIncomeResult<BootstrapResult> {
        let legs = self.prepare(quotes)?;
        let allow_negative = self.config.curve.allow_negative_forwards;

        let mut pillars: Vec<(f64, f64)> = Vec::with_capacity(legs.len());
        for (i, leg) in legs.iter().enumerate() {
            let df = self.solve_pillar(leg, &pillars, &[])?;
            let previous = pillars.last().map_or(1.0, |p| p.1);
            if !allow_negative && df > previous {
                return Err(FixedIncomeError::non_monotone(leg.pillar, previous, df));
            }
            debug!(
                "pillar {} ({}): t = {:.6}, DF = {:.12}",
                i + 1,
                leg.maturity,
                leg.pillar,
                df
            );
            pillars.push((leg.pillar, df));
        }

        let mut passes = 1;
        let mut curve = self.curve(&pillars)?;
        let mut report = self.report(&legs, &curve)?;

        if self.config.needs_refinement() {
            while !report.is_valid() && passes < self.config.max_passes {
                passes += 1;
                for i in 0..legs.len() {
                    let after = pillars[i + 1..].to_vec();
                    let df = self.solve_pillar(&legs[i], &pillars[..i], &after)?;
                    pillars[i].1 = df;
                }
                curve = self.curve(&pillars)?;
                report = self.report(&legs, &curve)?;
                debug!(
                    "refinement pass {passes}: max repricing error {:.3e}",
                    report.max_error()
                );
            }
        }

        Ok(BootstrapResult {
            curve,
            report,
            passes,
        })
    }

    /// Bootstraps independent quote sets, in parallel with the `parallel`
    /// feature.
    #[cfg(feature = "parallel")]
    pub fn bootstrap_many(
        &self,
        quote_sets: &[Vec<MarketQuote>],
    ) -> Vec<FixedIncomeResult<DiscountCurve>> {
        use rayon::prelude::*;

        quote_sets
            .par_iter()
            .map(|quotes| self.bootstrap(quotes))
            .collect()
    }

    /// Bootstraps independent quote sets, in parallel with the `parallel`
    /// feature.
    #[cfg(not(feature = "parallel"))]
    pub fn bootstrap_many(
        &self,
        quote_sets: &[Vec<MarketQuote>],
    ) -> Vec<FixedIncomeResult<DiscountCurve>> {
        quote_sets
            .iter()
            .map(|quotes| self.bootstrap(quotes))
            .collect()
    }

    fn prepare(&self, quotes: &[MarketQuote]) -> FixedIncomeResult<Vec<Leg>> {
        if quotes.is_empty() {
            return Err(FixedIncomeError::insufficient_quotes(
                "at least one market quote is required",
            ));
        }
        for (i, pair) in quotes.windows(2).enumerate() {
            if pair[1].maturity() <= pair[0].maturity() {
                return Err(FixedIncomeError::invalid_instrument(format!(
                    "quotes must be strictly increasing in maturity: quote {} matures {} \
                     on or before quote {} ({})",
                    i + 2,
                    pair[1].maturity(),
                    i + 1,
                    pair[0].maturity()
                )));
            }
        }

        let basis = self.config.curve.time_basis;
        let mut legs: Vec<Leg> = Vec::with_capacity(quotes.len());
        for (i, quote) in quotes.iter().enumerate() {
            let cashflows = quote.cashflows(self.valuation_date, basis, &self.config.schedule)?;
            let pillar = cashflows.final_time();
            let previous = legs.last().map_or(0.0, |leg| leg.pillar);

            if pillar <= previous {
                return Err(FixedIncomeError::invalid_instrument(format!(
                    "quote {} maturing {} maps to pillar time {pillar} under {basis}, \
                     not after {previous}",
                    i + 1,
                    quote.maturity()
                )));
            }
            if self.config.gap_policy == GapPolicy::Strict {
                if let Some(gap) = cashflows
                    .iter()
                    .map(|cf| cf.time())
                    .find(|t| *t > previous && *t < pillar)
                {
                    return Err(FixedIncomeError::insufficient_quotes(format!(
                        "quote {} maturing {} pays at t = {gap:.6}, after the last solved \
                         pillar {previous:.6} and before its own pillar {pillar:.6}",
                        i + 1,
                        quote.maturity()
                    )));
                }
            }

            legs.push(Leg {
                maturity: quote.maturity(),
                pillar,
                price: quote.price(),
                cashflows,
            });
        }
        Ok(legs)
    }

    /// Solves the discount factor at `leg.pillar` with `before` and `after`
    /// held fixed.
    fn solve_pillar(
        &self,
        leg: &Leg,
        before: &[(f64, f64)],
        after: &[(f64, f64)],
    ) -> FixedIncomeResult<f64> {
        let objective = |x: f64| {
            self.trial_price(leg, before, x, after)
                .map_or(f64::NAN, |pv| pv - leg.price)
        };
        let derivative = |x: f64| {
            let h = 1e-6 * x;
            (objective(x + h) - objective(x - h)) / (2.0 * h)
        };

        let lo = f64::EPSILON;
        let f_lo = objective(lo);
        if f_lo.is_nan() || f_lo >= 0.0 {
            return Err(FixedIncomeError::non_convergence(
                "bootstrap bracket",
                0,
                f_lo.abs(),
            ));
        }

        let previous = before.last().map_or(1.0, |p| p.1);
        let mut hi = previous.max(1.0);
        let mut steps = 0;
        while objective(hi) <= 0.0 {
            if steps == MAX_BRACKET_STEPS {
                return Err(FixedIncomeError::non_convergence(
                    "bootstrap bracket",
                    steps,
                    objective(hi).abs(),
                ));
            }
            hi *= 2.0;
            steps += 1;
        }

        let root = hybrid(
            &objective,
            &derivative,
            previous,
            Some((lo, hi)),
            &self.config.solver,
        )?;
        Ok(root.root)
    }

    /// Price of `leg` off the curve through `before`, `(leg.pillar, x)` and
    /// `after`.
    fn trial_price(
        &self,
        leg: &Leg,
        before: &[(f64, f64)],
        x: f64,
        after: &[(f64, f64)],
    ) -> FixedIncomeResult<f64> {
        let mut pillars = Vec::with_capacity(before.len() + after.len() + 1);
        pillars.extend_from_slice(before);
        pillars.push((leg.pillar, x));
        pillars.extend_from_slice(after);

        let curve = DiscountCurve::assemble(
            self.valuation_date,
            &pillars,
            self.config.curve.with_negative_forwards(true),
            self.config.custom_interpolator.as_ref(),
        )?;
        leg.cashflows
            .iter()
            .map(|cf| curve.discount_factor(cf.time()).map(|df| cf.amount() * df))
            .sum()
    }

    fn curve(&self, pillars: &[(f64, f64)]) -> FixedIncomeResult<DiscountCurve> {
        DiscountCurve::assemble(
            self.valuation_date,
            pillars,
            self.config.curve,
            self.config.custom_interpolator.as_ref(),
        )
    }

    fn report(&self, legs: &[Leg], curve: &DiscountCurve) -> FixedIncomeResult<RepricingReport> {
        let engine =
            PresentValueEngine::new().with_negative_rates(self.config.curve.allow_negative_forwards);
        let checks = legs
            .iter()
            .map(|leg| {
                Ok(RepricingCheck {
                    maturity: leg.maturity,
                    pillar_time: leg.pillar,
                    market_price: leg.price,
                    model_price: engine.price(&leg.cashflows, curve)?,
                })
            })
            .collect::<FixedIncomeResult<Vec<_>>>()?;
        Ok(RepricingReport::new(checks, self.config.repricing_tolerance))
    }
}
