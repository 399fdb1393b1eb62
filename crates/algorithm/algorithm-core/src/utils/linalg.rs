//! Small dense linear algebra for penalized least squares.

use algorithm_spi::{Result, TsError};

/// Solve `(XᵀX + diag(penalties)) β = Xᵀy` for β.
///
/// `design` is row-major: one row per observation, all rows of equal width.
/// `penalties` must have one entry per column.
pub fn ridge_solve(design: &[Vec<f64>], y: &[f64], penalties: &[f64]) -> Result<Vec<f64>> {
    let m = penalties.len();
    if design.len() != y.len() {
        return Err(TsError::LengthMismatch {
            expected: design.len(),
            actual: y.len(),
        });
    }
    if let Some(row) = design.iter().find(|row| row.len() != m) {
        return Err(TsError::LengthMismatch {
            expected: m,
            actual: row.len(),
        });
    }

    let mut gram = vec![0.0; m * m];
    let mut rhs = vec![0.0; m];
    for (row, &target) in design.iter().zip(y.iter()) {
        for i in 0..m {
            if row[i] == 0.0 {
                continue;
            }
            rhs[i] += row[i] * target;
            for j in i..m {
                gram[i * m + j] += row[i] * row[j];
            }
        }
    }
    for i in 0..m {
        for j in 0..i {
            gram[i * m + j] = gram[j * m + i];
        }
        gram[i * m + i] += penalties[i];
    }

    solve_linear_system(gram, rhs, m)
}

/// Gaussian elimination with partial pivoting on an `n x n` row-major matrix.
pub fn solve_linear_system(mut a: Vec<f64>, mut b: Vec<f64>, n: usize) -> Result<Vec<f64>> {
    for col in 0..n {
        let mut pivot_row = col;
        for row in (col + 1)..n {
            if a[row * n + col].abs() > a[pivot_row * n + col].abs() {
                pivot_row = row;
            }
        }

        let pivot = a[pivot_row * n + col];
        if pivot.abs() < 1e-12 || !pivot.is_finite() {
            return Err(TsError::NumericalError(format!(
                "singular system at column {}",
                col
            )));
        }

        if pivot_row != col {
            for j in 0..n {
                a.swap(col * n + j, pivot_row * n + j);
            }
            b.swap(col, pivot_row);
        }

        for row in (col + 1)..n {
            let factor = a[row * n + col] / pivot;
            if factor == 0.0 {
                continue;
            }
            for j in col..n {
                a[row * n + j] -= factor * a[col * n + j];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum -= a[i * n + j] * x[j];
        }
        x[i] = sum / a[i * n + i];
    }

    if x.iter().any(|v| !v.is_finite()) {
        return Err(TsError::NumericalError(
            "solution contains non-finite values".to_string(),
        ));
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_solve_identity() {
        let a = vec![1.0, 0.0, 0.0, 1.0];
        let x = solve_linear_system(a, vec![3.0, -2.0], 2).unwrap();
        assert_eq!(x, vec![3.0, -2.0]);
    }

    #[test]
    fn test_solve_requires_pivoting() {
        // First pivot is zero without row exchange
        let a = vec![0.0, 2.0, 1.0, 1.0];
        let x = solve_linear_system(a, vec![4.0, 3.0], 2).unwrap();
        assert_abs_diff_eq!(x[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_singular_system() {
        let a = vec![1.0, 2.0, 2.0, 4.0];
        assert!(matches!(
            solve_linear_system(a, vec![1.0, 2.0], 2),
            Err(TsError::NumericalError(_))
        ));
    }

    #[test]
    fn test_ridge_recovers_line() {
        let design: Vec<Vec<f64>> = (0..20).map(|i| vec![1.0, i as f64]).collect();
        let y: Vec<f64> = (0..20).map(|i| 3.0 + 0.5 * i as f64).collect();
        let beta = ridge_solve(&design, &y, &[1e-9, 1e-9]).unwrap();
        assert_abs_diff_eq!(beta[0], 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(beta[1], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_ridge_penalty_shrinks() {
        let design: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
        let y: Vec<f64> = (0..10).map(|i| 2.0 * i as f64).collect();
        let loose = ridge_solve(&design, &y, &[0.0]).unwrap();
        let tight = ridge_solve(&design, &y, &[1e6]).unwrap();
        assert!(tight[0].abs() < loose[0].abs());
    }

    #[test]
    fn test_ridge_underdetermined_with_penalty() {
        // More columns than rows is solvable once every column is penalized
        let design = vec![vec![1.0, 1.0, 1.0]];
        let beta = ridge_solve(&design, &[3.0], &[1.0, 1.0, 1.0]).unwrap();
        assert_eq!(beta.len(), 3);
    }

    #[test]
    fn test_ridge_shape_mismatch() {
        let design = vec![vec![1.0, 2.0]];
        assert!(ridge_solve(&design, &[1.0, 2.0], &[0.0, 0.0]).is_err());
        assert!(ridge_solve(&design, &[1.0], &[0.0]).is_err());
    }
}
