//! Time value of money.
//!
//! Spreadsheet-style helpers. Cash paid out is negative and cash received
//! positive, so `pv` and `fv` return the amount that balances the other
//! flows.

use log::debug;
use serde::{Deserialize, Serialize};

use fi_core::error::{FixedIncomeError, FixedIncomeResult};
use fi_math::solvers::{hybrid, SolverConfig};

/// Tolerance on the net present value when solving for a rate.
const RATE_TOLERANCE: f64 = 1e-7;

/// Steps allowed in each direction while bracketing a rate.
const MAX_BRACKET_STEPS: i32 = 64;

/// When annuity payments fall within each period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaymentTiming {
    /// End of each period.
    #[default]
    End,
    /// Start of each period.
    Begin,
}

impl PaymentTiming {
    fn factor(self) -> f64 {
        match self {
            PaymentTiming::End => 0.0,
            PaymentTiming::Begin => 1.0,
        }
    }
}

/// Net present value of `values`, the first discounted one full period.
///
/// ```rust
/// use fi_analytics::tvm::npv;
///
/// let value = npv(0.1, &[-10_000.0, 3_000.0, 4_200.0, 6_800.0]).unwrap();
/// assert!((value - 1_188.44).abs() < 0.01);
/// ```
///
/// # Errors
///
/// `InvalidInput` unless `rate > -1` and finite.
pub fn npv(rate: f64, values: &[f64]) -> FixedIncomeResult<f64> {
    check_rate(rate)?;
    Ok(values
        .iter()
        .enumerate()
        .map(|(i, v)| v * (1.0 + rate).powi(-(i as i32 + 1)))
        .sum())
}

/// Internal rate of return of a periodic series, the first value at time 0.
///
/// Newton from `guess`, falling back to Brent and bisection on a bracket
/// searched outwards from the guess.
///
/// # Errors
///
/// - `InvalidInput` for fewer than two values, non-finite values, or a
///   series without both a positive and a negative value
/// - `NonConvergence` if no root can be bracketed or solved
pub fn irr(values: &[f64], guess: f64) -> FixedIncomeResult<f64> {
    if values.len() < 2 || values.iter().any(|v| !v.is_finite()) {
        return Err(FixedIncomeError::invalid_input(
            "IRR needs at least two finite cash flows",
        ));
    }
    if !(values.iter().any(|v| *v > 0.0) && values.iter().any(|v| *v < 0.0)) {
        return Err(FixedIncomeError::invalid_input(
            "IRR needs at least one positive and one negative cash flow",
        ));
    }
    check_rate(guess)?;

    let f = |r: f64| {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| v * (1.0 + r).powi(-(i as i32)))
            .sum::<f64>()
    };
    let df = |r: f64| {
        values
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, v)| -(i as f64) * v * (1.0 + r).powi(-(i as i32) - 1))
            .sum::<f64>()
    };

    let bounds = bracket(&f, guess).ok_or_else(|| {
        FixedIncomeError::non_convergence(
            "IRR bracket",
            MAX_BRACKET_STEPS.unsigned_abs(),
            f(guess).abs(),
        )
    })?;
    let config = SolverConfig::new(RATE_TOLERANCE, 100);
    let result = hybrid(&f, &df, guess, Some(bounds), &config)?;
    debug!(
        "IRR {:.10} by {} in {} iterations",
        result.root, result.method, result.iterations
    );
    Ok(result.root)
}

/// Rate per period of an annuity: `pv` now, `pmt` at the end of each of
/// `nper` periods and `fv` with the last payment.
///
/// ```rust
/// use fi_analytics::tvm::rate;
///
/// // 4-year loan of 8,000 repaid at 200 a month
/// let monthly = rate(48, -200.0, 8_000.0, 0.0, 0.1).unwrap();
/// assert!((monthly - 0.007_701_472).abs() < 1e-8);
/// ```
pub fn rate(nper: u32, pmt: f64, pv: f64, fv: f64, guess: f64) -> FixedIncomeResult<f64> {
    if nper == 0 {
        return Err(FixedIncomeError::invalid_input(
            "an annuity needs at least one period",
        ));
    }
    let mut values = Vec::with_capacity(nper as usize + 1);
    values.push(pv);
    values.extend(std::iter::repeat(pmt).take(nper as usize));
    if let Some(last) = values.last_mut() {
        *last += fv;
    }
    irr(&values, guess)
}

/// Present value of an annuity of `pmt` over `nper` periods with final
/// balance `fv`.
///
/// ```rust
/// use fi_analytics::tvm::{pv, PaymentTiming};
///
/// // 500 a month for 20 years at 8% a year
/// let value = pv(0.08 / 12.0, 240.0, 500.0, 0.0, PaymentTiming::End).unwrap();
/// assert!((value + 59_777.15).abs() < 0.01);
/// ```
pub fn pv(rate: f64, nper: f64, pmt: f64, fv: f64, timing: PaymentTiming) -> FixedIncomeResult<f64> {
    check_rate(rate)?;
    if rate == 0.0 {
        return Ok(-(pmt * nper + fv));
    }
    let growth = (1.0 + rate).powf(nper);
    let annuity = pmt * (1.0 + rate * timing.factor()) * (growth - 1.0) / rate;
    Ok(-(annuity + fv) / growth)
}

/// Future value of `pv` plus an annuity of `pmt` over `nper` periods.
///
/// ```rust
/// use fi_analytics::tvm::{fv, PaymentTiming};
///
/// let value = fv(0.12 / 12.0, 12.0, -1_000.0, 0.0, PaymentTiming::End).unwrap();
/// assert!((value - 12_682.50).abs() < 0.01);
/// ```
pub fn fv(rate: f64, nper: f64, pmt: f64, pv: f64, timing: PaymentTiming) -> FixedIncomeResult<f64> {
    check_rate(rate)?;
    if rate == 0.0 {
        return Ok(-(pmt * nper + pv));
    }
    let growth = (1.0 + rate).powf(nper);
    let annuity = pmt * (1.0 + rate * timing.factor()) * (growth - 1.0) / rate;
    Ok(-(pv * growth + annuity))
}

fn check_rate(rate: f64) -> FixedIncomeResult<()> {
    if rate.is_finite() && rate > -1.0 {
        Ok(())
    } else {
        Err(FixedIncomeError::invalid_input(format!(
            "rate per period must be finite and above -100%, got {rate}"
        )))
    }
}

/// Searches alternately above and below `guess` for a sign change of `f`,
/// staying inside `(-1, ∞)`.
fn bracket<F: Fn(f64) -> f64>(f: &F, guess: f64) -> Option<(f64, f64)> {
    let f_guess = f(guess);
    if f_guess == 0.0 {
        return Some((guess, guess));
    }

    let (mut up, mut down) = (guess, guess);
    let mut step = 0.1;
    for k in 1..=MAX_BRACKET_STEPS {
        let next_up = up + step;
        let f_up = f(next_up);
        if f_up.is_finite() && f_up * f_guess <= 0.0 {
            return Some((up, next_up));
        }
        up = next_up;
        step *= 2.0;

        let next_down = -1.0 + (1.0 + guess) * 0.5_f64.powi(k);
        let f_down = f(next_down);
        if f_down.is_finite() && f_down * f_guess <= 0.0 {
            return Some((next_down, down));
        }
        down = next_down;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_npv_discounts_first_value() {
        assert_relative_eq!(npv(0.05, &[105.0]).unwrap(), 100.0, epsilon = 1e-12);
        assert_relative_eq!(npv(0.0, &[1.0, 2.0, 3.0]).unwrap(), 6.0);
        assert!(npv(-1.0, &[1.0]).is_err());
        assert_eq!(npv(0.1, &[]).unwrap(), 0.0);
    }

    #[test]
    fn test_irr() {
        let flows = [-70_000.0, 12_000.0, 15_000.0, 18_000.0, 21_000.0, 26_000.0];
        assert_relative_eq!(irr(&flows, 0.1).unwrap(), 0.086_630_948, epsilon = 1e-8);
        assert_relative_eq!(irr(&flows[..5], 0.1).unwrap(), -0.021_244_848, epsilon = 1e-8);
        // NPV at the IRR is zero, one period either way
        let r = irr(&flows, 0.1).unwrap();
        assert!(npv(r, &flows).unwrap().abs() < 1e-6);
    }

    #[test]
    fn test_irr_far_guess() {
        let flows = [-100.0, 10.0, 10.0, 110.0];
        assert_relative_eq!(irr(&flows, 3.0).unwrap(), 0.1, epsilon = 1e-9);
        assert_relative_eq!(irr(&flows, -0.9).unwrap(), 0.1, epsilon = 1e-9);
    }

    #[test]
    fn test_irr_invalid() {
        assert!(irr(&[100.0], 0.1).is_err());
        assert!(irr(&[100.0, 10.0], 0.1).is_err());
        assert!(irr(&[-100.0, f64::NAN], 0.1).is_err());
        assert!(irr(&[-100.0, 110.0], -2.0).is_err());
    }

    #[test]
    fn test_rate_matches_loan_schedule() {
        let r = rate(360, -1_000.0, 150_000.0, 0.0, 0.01).unwrap();
        assert_relative_eq!(
            pv(r, 360.0, -1_000.0, 0.0, PaymentTiming::End).unwrap(),
            150_000.0,
            epsilon = 1e-4
        );
        assert!(rate(0, -1.0, 1.0, 0.0, 0.1).is_err());
    }

    #[test]
    fn test_fv_payments_in_advance() {
        let value = fv(0.06 / 12.0, 10.0, -200.0, -500.0, PaymentTiming::Begin).unwrap();
        assert_relative_eq!(value, 2_581.40, epsilon = 0.01);
    }

    #[test]
    fn test_zero_rate_annuities() {
        assert_eq!(pv(0.0, 10.0, 100.0, 50.0, PaymentTiming::End).unwrap(), -1_050.0);
        assert_eq!(fv(0.0, 10.0, -100.0, -50.0, PaymentTiming::Begin).unwrap(), 1_050.0);
    }

    #[test]
    fn test_pv_fv_are_consistent() {
        let (r, n, pmt) = (0.004, 120.0, -250.0);
        let present = pv(r, n, pmt, 0.0, PaymentTiming::Begin).unwrap();
        let future = fv(r, n, pmt, 0.0, PaymentTiming::Begin).unwrap();
        assert_relative_eq!(future, present * (1.0_f64 + r).powf(n), max_relative = 1e-12);
    }
}
