//! Matrix bootstrap.
//!
//! With one instrument per period and a square payoff matrix `C` (row `i`
//! holds instrument `i`'s cash flow in each period), the discount factors
//! solve `C · d = p` directly. Spot yields follow from `d_i = (1 + y_i)^-i`.

use log::debug;
use serde::{Deserialize, Serialize};

use fi_core::error::{FixedIncomeError, FixedIncomeResult};
use fi_math::linear_algebra::solve_linear_system;

/// Discount factors and spot yields per period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixBootstrap {
    /// Discount factor at the end of each period.
    pub discount_factors: Vec<f64>,
    /// Spot yield per period, compounded once per period.
    pub spot_yields: Vec<f64>,
}

/// Solves `payoffs · d = prices` for the discount factors.
///
/// # Example
///
/// ```rust
/// use fi_curves::bootstrap::matrix_bootstrap;
///
/// // 1y 3% at 99 and 2y 4% at 98, annual coupons
/// let payoffs = vec![vec![103.0, 0.0], vec![4.0, 104.0]];
/// let result = matrix_bootstrap(&payoffs, &[99.0, 98.0]).unwrap();
///
/// assert!((result.discount_factors[0] - 99.0 / 103.0).abs() < 1e-12);
/// assert!((result.spot_yields[0] - (103.0 / 99.0 - 1.0)).abs() < 1e-12);
/// ```
///
/// # Errors
///
/// - `InsufficientQuotes` for an empty matrix
/// - `InvalidInput` for a non-square or singular matrix, or a price vector
///   of the wrong length
/// - `InvalidDiscounter` if a solved discount factor is not positive
pub fn matrix_bootstrap(payoffs: &[Vec<f64>], prices: &[f64]) -> FixedIncomeResult<MatrixBootstrap> {
    if payoffs.is_empty() {
        return Err(FixedIncomeError::insufficient_quotes(
            "the payoff matrix has no instruments",
        ));
    }
    let discount_factors = solve_linear_system(payoffs, prices)?;
    let spot_yields = spot_yields(&discount_factors)?;

    debug!(
        "matrix bootstrap over {} periods: final DF {:.10}",
        discount_factors.len(),
        discount_factors[discount_factors.len() - 1]
    );

    Ok(MatrixBootstrap {
        discount_factors,
        spot_yields,
    })
}

/// Spot yields `d_i^(-1/i) - 1` for discount factors at periods 1, 2, ...
pub fn spot_yields(discount_factors: &[f64]) -> FixedIncomeResult<Vec<f64>> {
    discount_factors
        .iter()
        .enumerate()
        .map(|(i, &d)| {
            let period = (i + 1) as f64;
            if !d.is_finite() || d <= 0.0 {
                return Err(FixedIncomeError::invalid_discounter(period, d));
            }
            Ok(d.powf(-1.0 / period) - 1.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_three_bond_ladder() {
        // Annual coupons of 2%, 3%, 4%
        let payoffs = vec![
            vec![102.0, 0.0, 0.0],
            vec![3.0, 103.0, 0.0],
            vec![4.0, 4.0, 104.0],
        ];
        let prices = [99.0, 99.5, 100.2];
        let result = matrix_bootstrap(&payoffs, &prices).unwrap();

        let d1 = 99.0 / 102.0;
        let d2 = (99.5 - 3.0 * d1) / 103.0;
        let d3 = (100.2 - 4.0 * d1 - 4.0 * d2) / 104.0;
        assert_relative_eq!(result.discount_factors[0], d1, epsilon = 1e-12);
        assert_relative_eq!(result.discount_factors[1], d2, epsilon = 1e-12);
        assert_relative_eq!(result.discount_factors[2], d3, epsilon = 1e-12);
        assert_relative_eq!(result.spot_yields[2], d3.powf(-1.0 / 3.0) - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert!(matches!(
            matrix_bootstrap(&[], &[]),
            Err(FixedIncomeError::InsufficientQuotes { .. })
        ));
        assert!(matrix_bootstrap(&[vec![1.0, 0.0]], &[1.0]).is_err());
        assert!(matrix_bootstrap(&[vec![1.0, 1.0], vec![2.0, 2.0]], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_spot_yields_reject_non_positive() {
        assert!(matches!(
            spot_yields(&[0.97, -0.1]),
            Err(FixedIncomeError::InvalidDiscounter { .. })
        ));
        let yields = spot_yields(&[1.0 / 1.05, 1.0 / 1.05_f64.powi(2)]).unwrap();
        assert_relative_eq!(yields[0], 0.05, epsilon = 1e-12);
        assert_relative_eq!(yields[1], 0.05, epsilon = 1e-12);
    }
}
