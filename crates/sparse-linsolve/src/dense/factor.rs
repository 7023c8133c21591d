//! Dense LU and Cholesky factorisations.
//!
//! Same contracts as the sparse [`lu`](crate::lu) and
//! [`cholesky`](crate::cholesky) modules, with fixed-stride loops over
//! row-major buffers instead of sparse patterns.

use tracing::{debug, instrument, warn};

use super::matrix::DenseMatrix;
use crate::error::SolverError;
use crate::traits::Factorization;
use crate::types::Scalar;
use crate::validation::{validate_permutation, validate_solve_lengths, validate_square};

// ---------------------------------------------------------------------------
// LU
// ---------------------------------------------------------------------------

/// Dense `A = L U` without pivoting.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseLu<T> {
    /// Unit lower-triangular factor.
    pub l: DenseMatrix<T>,
    /// Upper-triangular factor.
    pub u: DenseMatrix<T>,
}

/// KIJ Gaussian elimination without row interchanges.
///
/// # Errors
///
/// - [`SolverError::InvalidInput`] if the matrix is not square.
/// - [`SolverError::SingularPivot`] if `|U[k, k]| <= eps * max|a_ij|`.
#[instrument(skip(matrix), fields(n = matrix.rows))]
pub fn lu_decompose<T: Scalar>(matrix: &DenseMatrix<T>) -> Result<DenseLu<T>, SolverError> {
    validate_square(matrix.rows, matrix.cols)?;

    let n = matrix.rows;
    let max_abs = matrix
        .values
        .iter()
        .fold(T::zero(), |acc, &v| acc.max(v.abs()));
    let pivot_floor = T::epsilon() * max_abs;

    let mut u = matrix.clone();
    let mut l = DenseMatrix::identity(n);

    for k in 0..n {
        let pivot = u.values[k * n + k];
        if pivot.abs() <= pivot_floor {
            warn!(row = k, pivot = pivot.to_f64_lossy(), "singular pivot");
            return Err(SolverError::SingularPivot {
                row: k,
                pivot: pivot.to_f64_lossy(),
            });
        }
        for i in (k + 1)..n {
            let s = u.values[i * n + k] / pivot;
            if s == T::zero() {
                continue;
            }
            for j in k..n {
                let u_kj = u.values[k * n + j];
                u.values[i * n + j] -= s * u_kj;
            }
            l.values[i * n + k] = s;
        }
    }

    debug!("dense LU complete");
    Ok(DenseLu { l, u })
}

impl<T: Scalar> DenseLu<T> {
    /// Solve `L U x = P b` with `(P b)[i] = b[perm[i]]`.
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidInput`] on a non-identity permutation or wrong
    /// vector lengths.
    pub fn solve_permuted(&self, perm: &[usize], b: &[T], x: &mut [T]) -> Result<(), SolverError> {
        let n = self.u.rows;
        validate_permutation(perm, n)?;
        validate_solve_lengths(n, b, x)?;
        for (xi, &p) in x.iter_mut().zip(perm.iter()) {
            *xi = b[p];
        }
        self.substitute(x);
        Ok(())
    }

    fn substitute(&self, x: &mut [T]) {
        let n = self.u.rows;
        for i in 0..n {
            let row = self.l.row(i);
            let mut sum = x[i];
            for j in 0..i {
                sum -= row[j] * x[j];
            }
            x[i] = sum;
        }
        for i in (0..n).rev() {
            let row = self.u.row(i);
            let mut sum = x[i];
            for j in (i + 1)..n {
                sum -= row[j] * x[j];
            }
            x[i] = sum / row[i];
        }
    }
}

impl<T: Scalar> Factorization<T> for DenseLu<T> {
    fn dim(&self) -> usize {
        self.u.rows
    }

    fn solve(&self, b: &[T], x: &mut [T]) -> Result<(), SolverError> {
        validate_solve_lengths(self.u.rows, b, x)?;
        x.copy_from_slice(b);
        self.substitute(x);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Cholesky
// ---------------------------------------------------------------------------

/// Dense upper-triangular `R` with `R^T R = A`.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseCholesky<T> {
    /// The factor; the strictly lower triangle is zero.
    pub r: DenseMatrix<T>,
}

/// Row-by-row Cholesky reading only the lower triangle of `matrix`.
///
/// # Errors
///
/// - [`SolverError::InvalidInput`] if the matrix is not square.
/// - [`SolverError::NotPositiveDefinite`] at the first non-positive radicand.
#[instrument(skip(matrix), fields(n = matrix.rows))]
pub fn cholesky_decompose<T: Scalar>(
    matrix: &DenseMatrix<T>,
) -> Result<DenseCholesky<T>, SolverError> {
    validate_square(matrix.rows, matrix.cols)?;

    let n = matrix.rows;
    let mut r = DenseMatrix::zeros(n, n);

    for k in 0..n {
        // Column k of R above the diagonal: R[j,k] = (A[k,j] - sum_{m<j} R[m,j] R[m,k]) / R[j,j]
        for j in 0..k {
            let mut s = matrix.values[k * n + j];
            for m in 0..j {
                s -= r.values[m * n + j] * r.values[m * n + k];
            }
            r.values[j * n + k] = s / r.values[j * n + j];
        }

        let mut radicand = matrix.values[k * n + k];
        for m in 0..k {
            let r_mk = r.values[m * n + k];
            radicand -= r_mk * r_mk;
        }
        if radicand <= T::zero() || !radicand.is_finite() {
            warn!(row = k, radicand = radicand.to_f64_lossy(), "matrix is not positive definite");
            return Err(SolverError::NotPositiveDefinite {
                row: k,
                value: radicand.to_f64_lossy(),
            });
        }
        r.values[k * n + k] = radicand.sqrt();
    }

    debug!("dense Cholesky complete");
    Ok(DenseCholesky { r })
}

impl<T: Scalar> Factorization<T> for DenseCholesky<T> {
    fn dim(&self) -> usize {
        self.r.rows
    }

    fn solve(&self, b: &[T], x: &mut [T]) -> Result<(), SolverError> {
        let n = self.r.rows;
        validate_solve_lengths(n, b, x)?;
        let r = &self.r.values;

        // R^T y = b
        for i in 0..n {
            let mut sum = b[i];
            for m in 0..i {
                sum -= r[m * n + i] * x[m];
            }
            x[i] = sum / r[i * n + i];
        }
        // R x = y
        for i in (0..n).rev() {
            let mut sum = x[i];
            for j in (i + 1)..n {
                sum -= r[i * n + j] * x[j];
            }
            x[i] = sum / r[i * n + i];
        }
        Ok(())
    }
}
