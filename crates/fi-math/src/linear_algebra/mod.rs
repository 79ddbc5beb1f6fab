//! Dense linear systems.
//!
//! Thin wrappers over `nalgebra`'s LU decomposition, used by the matrix
//! bootstrap where the cashflow matrix is square and lower triangular.

use nalgebra::{DMatrix, DVector};

use crate::error::{MathError, MathResult};

/// Solves `A x = b` for a square matrix given in row-major order.
///
/// # Errors
///
/// Returns `MathError::DimensionMismatch` if `A` is not square or does not
/// match `b`, and `MathError::SingularMatrix` if `A` is not invertible.
pub fn solve_linear_system(rows: &[Vec<f64>], b: &[f64]) -> MathResult<Vec<f64>> {
    let n = rows.len();
    if n == 0 {
        return Err(MathError::insufficient_data(1, 0));
    }
    if let Some(row) = rows.iter().find(|r| r.len() != n) {
        return Err(MathError::DimensionMismatch {
            rows1: n,
            cols1: row.len(),
            rows2: n,
            cols2: n,
        });
    }
    if b.len() != n {
        return Err(MathError::DimensionMismatch {
            rows1: n,
            cols1: n,
            rows2: b.len(),
            cols2: 1,
        });
    }

    let a = DMatrix::from_fn(n, n, |i, j| rows[i][j]);
    let rhs = DVector::from_column_slice(b);

    let x = a.lu().solve(&rhs).ok_or(MathError::SingularMatrix)?;
    if x.iter().any(|v| !v.is_finite()) {
        return Err(MathError::SingularMatrix);
    }
    Ok(x.iter().copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lower_triangular_system() {
        // Two annual bonds: 1y 3% at 99, 2y 4% at 98
        let a = vec![vec![103.0, 0.0], vec![4.0, 104.0]];
        let b = vec![99.0, 98.0];
        let x = solve_linear_system(&a, &b).unwrap();

        assert_relative_eq!(x[0], 99.0 / 103.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], (98.0 - 4.0 * 99.0 / 103.0) / 104.0, epsilon = 1e-12);
    }

    #[test]
    fn test_singular() {
        let a = vec![vec![1.0, 2.0], vec![2.0, 4.0]];
        assert!(matches!(
            solve_linear_system(&a, &[1.0, 2.0]),
            Err(MathError::SingularMatrix)
        ));
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = vec![vec![1.0, 0.0], vec![0.0]];
        assert!(matches!(
            solve_linear_system(&a, &[1.0, 2.0]),
            Err(MathError::DimensionMismatch { .. })
        ));
        let a = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        assert!(solve_linear_system(&a, &[1.0]).is_err());
        assert!(solve_linear_system(&[], &[]).is_err());
    }
}
