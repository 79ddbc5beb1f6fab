//! Core traits.
//!
//! - [`Discounter`]: maps a year fraction to a discount factor. Flat-yield
//!   closures, the `FlatYield` type in `fi-bonds`, and discount curves all
//!   implement it, so the PV engine never branches on where discounting comes
//!   from.

use crate::error::FixedIncomeResult;

/// Anything that turns a year fraction into a discount factor.
///
/// Implementations may fail (a curve with a custom interpolator can detect a
/// monotonicity violation on lookup); the caller validates the range.
pub trait Discounter {
    /// Discount factor at `t` years from the reference date.
    fn discount_factor(&self, t: f64) -> FixedIncomeResult<f64>;
}

impl<F> Discounter for F
where
    F: Fn(f64) -> f64,
{
    fn discount_factor(&self, t: f64) -> FixedIncomeResult<f64> {
        Ok(self(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn df_at<D: Discounter + ?Sized>(d: &D, t: f64) -> f64 {
        d.discount_factor(t).unwrap()
    }

    #[test]
    fn test_closure_is_discounter() {
        let flat = |t: f64| (-0.05 * t).exp();
        assert!((df_at(&flat, 2.0) - (-0.1f64).exp()).abs() < 1e-15);
    }
}
