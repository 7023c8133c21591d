//! Sparse Cholesky decomposition.
//!
//! Factors a symmetric positive-definite CSR matrix as `A = R^T R` with `R`
//! upper triangular. Only the lower triangle of `A` (diagonal included) is
//! read; the upper triangle is assumed to mirror it.
//!
//! # Algorithm
//!
//! Up-looking: row `k` of `R^T` (= column `k` of `R`) comes from a sparse
//! triangular solve against the rows of `R` finished so far.
//!
//! ```text
//! for k in 0..n:
//!     w = A[k, 0..=k]                   (dense accumulator + marker)
//!     for j in pattern(w), j < k, ascending:
//!         r_jk = w[j] / R[j, j]
//!         for m in pattern(R[j, :]), j < m < k:
//!             w[m] -= R[j, m] * r_jk    (may add fill to the pattern)
//!         append r_jk to row j of R
//!     R[k, k] = sqrt(A[k, k] - sum_j r_jk^2)
//! ```
//!
//! A non-positive radicand means `A` is not positive definite and aborts the
//! factorisation at that row.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::{debug, instrument, warn};

use crate::csr::CsrMatrix;
use crate::error::SolverError;
use crate::traits::Factorization;
use crate::types::Scalar;
use crate::validation::{validate_csr_matrix, validate_solve_lengths, validate_square};

/// Upper-triangular Cholesky factor `R` with `R^T R = A`.
///
/// The diagonal is the first entry of every row.
#[derive(Debug, Clone, PartialEq)]
pub struct CholeskyFactor<T> {
    /// The factor.
    pub r: CsrMatrix<T>,
}

/// Compute the Cholesky factor of a symmetric positive-definite matrix.
///
/// # Errors
///
/// - [`SolverError::InvalidInput`] if the matrix is not square or fails
///   [`validate_csr_matrix`].
/// - [`SolverError::NotPositiveDefinite`] at the first row whose radicand
///   `A[k, k] - sum r_jk^2` is not strictly positive (or not finite).
#[instrument(skip(matrix), fields(n = matrix.rows, nnz = matrix.nnz()))]
pub fn decompose<T: Scalar>(matrix: &CsrMatrix<T>) -> Result<CholeskyFactor<T>, SolverError> {
    validate_square(matrix.rows, matrix.cols)?;
    validate_csr_matrix(matrix)?;

    let n = matrix.rows;
    let mut rows: Vec<Vec<(usize, T)>> = vec![Vec::new(); n];
    let mut w = vec![T::zero(); n];
    let mut marker = vec![usize::MAX; n];
    let mut pending: BinaryHeap<Reverse<usize>> = BinaryHeap::new();

    for k in 0..n {
        let mut a_kk = T::zero();
        for (j, &a_kj) in matrix.row_entries(k) {
            if j < k {
                marker[j] = k;
                w[j] = a_kj;
                pending.push(Reverse(j));
            } else if j == k {
                a_kk = a_kj;
            }
        }

        let mut sum_sq = T::zero();
        while let Some(Reverse(j)) = pending.pop() {
            let r_jk = w[j] / rows[j][0].1;
            for &(m, r_jm) in rows[j].iter().skip(1) {
                if m >= k {
                    break;
                }
                if marker[m] != k {
                    marker[m] = k;
                    w[m] = T::zero();
                    pending.push(Reverse(m));
                }
                w[m] -= r_jm * r_jk;
            }
            rows[j].push((k, r_jk));
            sum_sq += r_jk * r_jk;
        }

        let radicand = a_kk - sum_sq;
        if radicand <= T::zero() || !radicand.is_finite() {
            warn!(row = k, radicand = radicand.to_f64_lossy(), "matrix is not positive definite");
            return Err(SolverError::NotPositiveDefinite {
                row: k,
                value: radicand.to_f64_lossy(),
            });
        }
        rows[k].push((k, radicand.sqrt()));
    }

    let nnz: usize = rows.iter().map(Vec::len).sum();
    let mut row_ptr = Vec::with_capacity(n + 1);
    let mut col_indices = Vec::with_capacity(nnz);
    let mut values = Vec::with_capacity(nnz);
    row_ptr.push(0);
    for row in rows {
        for (c, v) in row {
            col_indices.push(c);
            values.push(v);
        }
        row_ptr.push(col_indices.len());
    }

    debug!(nnz_r = nnz, "sparse Cholesky complete");

    Ok(CholeskyFactor {
        r: CsrMatrix {
            row_ptr,
            col_indices,
            values,
            rows: n,
            cols: n,
        },
    })
}

impl<T: Scalar> CholeskyFactor<T> {
    /// Dimension of the factored system.
    #[inline]
    pub fn dim(&self) -> usize {
        self.r.rows
    }
}

impl<T: Scalar> Factorization<T> for CholeskyFactor<T> {
    fn dim(&self) -> usize {
        CholeskyFactor::dim(self)
    }

    /// Solve `R^T y = b`, then `R x = y`.
    fn solve(&self, b: &[T], x: &mut [T]) -> Result<(), SolverError> {
        let n = self.dim();
        validate_solve_lengths(n, b, x)?;
        let r = &self.r;
        x.copy_from_slice(b);

        // Forward: R^T y = b, column-oriented over the rows of R.
        for j in 0..n {
            let start = r.row_ptr[j];
            let end = r.row_ptr[j + 1];
            x[j] /= r.values[start];
            let y_j = x[j];
            for idx in (start + 1)..end {
                x[r.col_indices[idx]] -= r.values[idx] * y_j;
            }
        }

        // Back: R x = y.
        for i in (0..n).rev() {
            let start = r.row_ptr[i];
            let end = r.row_ptr[i + 1];
            let mut sum = x[i];
            for idx in (start + 1)..end {
                sum -= r.values[idx] * x[r.col_indices[idx]];
            }
            x[i] = sum / r.values[start];
        }

        Ok(())
    }
}
