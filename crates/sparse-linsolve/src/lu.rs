//! Sparse LU decomposition without pivoting.
//!
//! Factors a square CSR matrix as `A = L U` where `L` is unit lower
//! triangular (the unit diagonal is stored explicitly) and `U` is upper
//! triangular. Rows are never interchanged, so the factorisation fails on
//! the first zero or negligible pivot even when `A` itself is non-singular.
//!
//! # Algorithm
//!
//! Row-oriented (IKJ) Gaussian elimination:
//!
//! ```text
//! for i in 0..n:
//!     w = A[i, :]                       (dense accumulator + marker)
//!     for k in pattern(w), k < i, ascending:
//!         w[k] = w[k] / U[k, k]         (multiplier, becomes L[i, k])
//!         for j in pattern(U[k, :]), j > k:
//!             w[j] -= w[k] * U[k, j]    (may add fill to the pattern)
//!     L[i, :] = w[0..i] + unit diagonal
//!     U[i, :] = w[i..n]
//! ```
//!
//! Fill columns below the diagonal are pushed onto a min-heap, so they are
//! eliminated in ascending order as they appear. Every structurally reachable
//! position is kept, even if its value cancels to zero.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::{debug, instrument, warn};

use crate::csr::CsrMatrix;
use crate::error::SolverError;
use crate::traits::Factorization;
use crate::types::Scalar;
use crate::validation::{
    validate_csr_matrix, validate_permutation, validate_solve_lengths, validate_square,
};

/// Result of a sparse LU decomposition.
#[derive(Debug, Clone, PartialEq)]
pub struct LuFactors<T> {
    /// Unit lower-triangular factor, diagonal stored explicitly.
    pub l: CsrMatrix<T>,
    /// Upper-triangular factor; the diagonal is the first entry of each row.
    pub u: CsrMatrix<T>,
}

/// Factor `matrix` as `L U` without row interchanges.
///
/// The whole matrix is structurally validated first, since unsorted rows
/// would silently corrupt the elimination.
///
/// # Errors
///
/// - [`SolverError::InvalidInput`] if the matrix is not square or fails
///   [`validate_csr_matrix`].
/// - [`SolverError::SingularPivot`] if `|U[i, i]| <= eps * max|a_ij|` for
///   some row `i`. No partial factor is returned.
#[instrument(skip(matrix), fields(n = matrix.rows, nnz = matrix.nnz()))]
pub fn decompose<T: Scalar>(matrix: &CsrMatrix<T>) -> Result<LuFactors<T>, SolverError> {
    validate_square(matrix.rows, matrix.cols)?;
    validate_csr_matrix(matrix)?;

    let n = matrix.rows;
    let max_abs = matrix
        .values
        .iter()
        .fold(T::zero(), |acc, &v| acc.max(v.abs()));
    let pivot_floor = T::epsilon() * max_abs;

    let mut l_row_ptr = Vec::with_capacity(n + 1);
    let mut l_cols = Vec::with_capacity(matrix.nnz());
    let mut l_vals = Vec::with_capacity(matrix.nnz());
    let mut u_row_ptr = Vec::with_capacity(n + 1);
    let mut u_cols = Vec::with_capacity(matrix.nnz());
    let mut u_vals = Vec::with_capacity(matrix.nnz());
    l_row_ptr.push(0);
    u_row_ptr.push(0);

    let mut u_diag = vec![T::zero(); n];
    let mut w = vec![T::zero(); n];
    let mut marker = vec![usize::MAX; n];
    let mut pattern: Vec<usize> = Vec::new();
    let mut pending: BinaryHeap<Reverse<usize>> = BinaryHeap::new();

    for i in 0..n {
        // -- Scatter row i of A.
        pattern.clear();
        for (j, &a_ij) in matrix.row_entries(i) {
            marker[j] = i;
            w[j] = a_ij;
            pattern.push(j);
            if j < i {
                pending.push(Reverse(j));
            }
        }

        // -- Eliminate columns k < i in ascending order.
        while let Some(Reverse(k)) = pending.pop() {
            let s = w[k] / u_diag[k];
            w[k] = s;
            for idx in (u_row_ptr[k] + 1)..u_row_ptr[k + 1] {
                let j = u_cols[idx];
                if marker[j] != i {
                    marker[j] = i;
                    w[j] = T::zero();
                    pattern.push(j);
                    if j < i {
                        pending.push(Reverse(j));
                    }
                }
                w[j] -= s * u_vals[idx];
            }
        }

        // -- Pivot check.
        let pivot = if marker[i] == i { w[i] } else { T::zero() };
        if pivot.abs() <= pivot_floor {
            warn!(row = i, pivot = pivot.to_f64_lossy(), "singular pivot");
            return Err(SolverError::SingularPivot {
                row: i,
                pivot: pivot.to_f64_lossy(),
            });
        }
        u_diag[i] = pivot;

        // -- Gather into L (strict lower + unit diagonal) and U (upper).
        pattern.sort_unstable();
        for &j in &pattern {
            if j < i {
                l_cols.push(j);
                l_vals.push(w[j]);
            } else {
                u_cols.push(j);
                u_vals.push(w[j]);
            }
        }
        l_cols.push(i);
        l_vals.push(T::one());
        l_row_ptr.push(l_cols.len());
        u_row_ptr.push(u_cols.len());
    }

    let fill_in = (l_vals.len() - n + u_vals.len()).saturating_sub(matrix.nnz());
    debug!(
        nnz_l = l_vals.len(),
        nnz_u = u_vals.len(),
        fill_in,
        "sparse LU complete",
    );

    Ok(LuFactors {
        l: CsrMatrix {
            row_ptr: l_row_ptr,
            col_indices: l_cols,
            values: l_vals,
            rows: n,
            cols: n,
        },
        u: CsrMatrix {
            row_ptr: u_row_ptr,
            col_indices: u_cols,
            values: u_vals,
            rows: n,
            cols: n,
        },
    })
}

impl<T: Scalar> LuFactors<T> {
    /// Dimension of the factored system.
    #[inline]
    pub fn dim(&self) -> usize {
        self.u.rows
    }

    /// Solve `L U x = P b` for a caller-supplied row permutation `perm`.
    ///
    /// `(P b)[i] = b[perm[i]]`. Only the identity permutation is consistent
    /// with factors computed without pivoting; anything else is rejected.
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidInput`] on a bad permutation or wrong vector
    /// lengths.
    pub fn solve_permuted(&self, perm: &[usize], b: &[T], x: &mut [T]) -> Result<(), SolverError> {
        let n = self.dim();
        validate_permutation(perm, n)?;
        validate_solve_lengths(n, b, x)?;

        for (xi, &p) in x.iter_mut().zip(perm.iter()) {
            *xi = b[p];
        }
        self.substitute(x);
        Ok(())
    }

    /// Forward then back substitution on `x`, which holds `P b` on entry.
    fn substitute(&self, x: &mut [T]) {
        let n = self.dim();

        // Forward: L y = P b. L has a unit diagonal stored last in each row.
        for i in 0..n {
            let mut sum = x[i];
            for (j, &l_ij) in self.l.row_entries(i) {
                if j < i {
                    sum -= l_ij * x[j];
                }
            }
            x[i] = sum;
        }

        // Back: U x = y. The diagonal is the first entry of each U row.
        for i in (0..n).rev() {
            let start = self.u.row_ptr[i];
            let end = self.u.row_ptr[i + 1];
            let mut sum = x[i];
            for idx in (start + 1)..end {
                sum -= self.u.values[idx] * x[self.u.col_indices[idx]];
            }
            x[i] = sum / self.u.values[start];
        }
    }
}

impl<T: Scalar> Factorization<T> for LuFactors<T> {
    fn dim(&self) -> usize {
        LuFactors::dim(self)
    }

    fn solve(&self, b: &[T], x: &mut [T]) -> Result<(), SolverError> {
        validate_solve_lengths(self.dim(), b, x)?;
        x.copy_from_slice(b);
        self.substitute(x);
        Ok(())
    }
}
