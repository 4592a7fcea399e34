//! Dense linear solver used to fit spline coefficients.
//!
//! The systems solved here are tiny (one row per waypoint), so a plain
//! Gaussian elimination with partial pivoting is all that is needed.

use crate::SplineError;

/// Pivots smaller than this are treated as zero.
const PIVOT_EPSILON: f64 = 1e-12;

/// Solves `matrix * x = rhs` for `x`.
///
/// # Arguments
///
/// * `matrix` - Square coefficient matrix, row-major
/// * `rhs` - Right-hand side, one entry per row
///
/// # Errors
///
/// Returns [`SplineError::DimensionMismatch`] if the matrix is not square or
/// does not match `rhs`, and [`SplineError::SingularMatrix`] if no usable
/// pivot exists in some column.
///
/// # Example
///
/// ```
/// use waypath::linalg::solve;
///
/// let x = solve(vec![vec![2.0, 1.0], vec![1.0, 3.0]], vec![3.0, 5.0])?;
/// assert!((x[0] - 0.8).abs() < 1e-12);
/// assert!((x[1] - 1.4).abs() < 1e-12);
/// # Ok::<(), waypath::SplineError>(())
/// ```
pub fn solve(mut matrix: Vec<Vec<f64>>, mut rhs: Vec<f64>) -> Result<Vec<f64>, SplineError> {
    let n = rhs.len();
    if matrix.len() != n {
        return Err(SplineError::DimensionMismatch {
            rows: matrix.len(),
            cols: matrix.first().map_or(0, Vec::len),
            rhs: n,
        });
    }
    if let Some(row) = matrix.iter().find(|row| row.len() != n) {
        return Err(SplineError::DimensionMismatch {
            rows: n,
            cols: row.len(),
            rhs: n,
        });
    }

    // Forward elimination
    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&a, &b| matrix[a][col].abs().total_cmp(&matrix[b][col].abs()))
            .unwrap_or(col);
        if matrix[pivot_row][col].abs() < PIVOT_EPSILON {
            return Err(SplineError::SingularMatrix { column: col });
        }
        matrix.swap(col, pivot_row);
        rhs.swap(col, pivot_row);

        for row in (col + 1)..n {
            let factor = matrix[row][col] / matrix[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                matrix[row][k] -= factor * matrix[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    // Back substitution
    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| matrix[row][k] * x[k]).sum();
        x[row] = (rhs[row] - tail) / matrix[row][row];
    }
    Ok(x)
}
