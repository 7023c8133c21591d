//! Stationary iterative solvers: Jacobi and Gauss-Seidel.
//!
//! Both methods apply the same per-row update over the CSR structure:
//!
//! ```text
//! x_i <- (b_i - sum_{j != i} a_ij * x_j) / a_ii
//! ```
//!
//! They differ only in which iterate the off-diagonal sum reads:
//!
//! - **Jacobi** reads a snapshot of the previous iterate, so every row of a
//!   sweep sees the same input vector.
//! - **Gauss-Seidel** updates `x` in place in increasing row order, so row
//!   `i` already sees the new values of rows `0..i`.
//!
//! After every sweep the residual `||Ax - b||_2` is evaluated; the solver
//! stops once it drops below the tolerance or the iteration cap is reached.
//! Convergence is guaranteed for strictly diagonally dominant matrices (and,
//! for Gauss-Seidel, symmetric positive-definite ones).

use std::time::Instant;

use tracing::{debug, instrument, trace, warn};

use crate::csr::CsrMatrix;
use crate::error::SolverError;
use crate::residual::residual_into;
use crate::types::{ConvergenceInfo, Scalar, SolveOptions, SolveReport, StationaryMethod};
use crate::validation::{validate_params, validate_rhs, validate_solution_len, validate_square};

/// Jacobi / Gauss-Seidel solver over a CSR matrix.
///
/// The solver holds configuration only; the matrix, right-hand side and
/// iterate are supplied per call.
///
/// # Example
///
/// ```rust
/// use sparse_linsolve::csr::CsrMatrix;
/// use sparse_linsolve::stationary::StationarySolver;
/// use sparse_linsolve::types::{SolveOptions, StationaryMethod};
///
/// // Diagonally dominant 2x2: A = [[4, 1], [1, 3]]
/// let a = CsrMatrix::<f64>::from_coo(2, 2, vec![
///     (0, 0, 4.0), (0, 1, 1.0),
///     (1, 0, 1.0), (1, 1, 3.0),
/// ]);
/// let b = vec![1.0, 2.0];
/// let mut x = vec![0.0; 2];
///
/// let solver = StationarySolver::new(StationaryMethod::GaussSeidel, SolveOptions::default());
/// let report = solver.solve(&a, &b, &mut x).unwrap();
/// assert!(report.converged);
/// ```
#[derive(Debug, Clone)]
pub struct StationarySolver {
    /// Update rule.
    pub method: StationaryMethod,
    /// Tolerance and iteration cap.
    pub options: SolveOptions,
}

impl StationarySolver {
    /// Create a new solver.
    pub fn new(method: StationaryMethod, options: SolveOptions) -> Self {
        Self { method, options }
    }

    /// Shorthand for a Jacobi solver.
    pub fn jacobi(options: SolveOptions) -> Self {
        Self::new(StationaryMethod::Jacobi, options)
    }

    /// Shorthand for a Gauss-Seidel solver.
    pub fn gauss_seidel(options: SolveOptions) -> Self {
        Self::new(StationaryMethod::GaussSeidel, options)
    }

    /// Iterate on `x` until `||Ax - b||_2 < tolerance`.
    ///
    /// `x` is the initial guess on entry and the final iterate on exit.
    /// Running out of iterations is not an error: the report then has
    /// `converged == false`.
    ///
    /// # Errors
    ///
    /// - [`SolverError::InvalidInput`] if the matrix is not square, `rhs` or
    ///   `x` have the wrong length, or the options are out of range.
    /// - [`SolverError::ZeroDiagonal`] if any diagonal entry is zero or not
    ///   stored. Detected before the first sweep; `x` is left untouched.
    /// - [`SolverError::NumericalInstability`] if the residual becomes NaN or
    ///   infinite.
    #[instrument(
        skip(self, matrix, rhs, x),
        fields(n = matrix.rows, nnz = matrix.nnz(), method = ?self.method)
    )]
    pub fn solve<T: Scalar>(
        &self,
        matrix: &CsrMatrix<T>,
        rhs: &[T],
        x: &mut [T],
    ) -> Result<SolveReport, SolverError> {
        let start = Instant::now();

        // ------------------------------------------------------------------
        // Input validation
        // ------------------------------------------------------------------
        validate_square(matrix.rows, matrix.cols)?;
        validate_rhs(rhs, matrix.rows)?;
        validate_solution_len(x, matrix.rows)?;
        validate_params(&self.options)?;

        let n = matrix.rows;
        let diag = extract_diagonal(matrix)?;

        // Jacobi needs the previous iterate; Gauss-Seidel works in place.
        let mut previous = match self.method {
            StationaryMethod::Jacobi => vec![T::zero(); n],
            StationaryMethod::GaussSeidel => Vec::new(),
        };
        let mut ax = vec![T::zero(); n];

        let mut convergence_history =
            Vec::with_capacity(self.options.max_iterations.min(256));
        let mut residual_norm = f64::INFINITY;
        let mut converged = false;

        debug!(
            tolerance = self.options.tolerance,
            max_iterations = self.options.max_iterations,
            "stationary solve start",
        );

        for k in 0..self.options.max_iterations {
            match self.method {
                StationaryMethod::Jacobi => {
                    previous.copy_from_slice(x);
                    sweep(matrix, &diag, rhs, &previous, x);
                }
                StationaryMethod::GaussSeidel => sweep_in_place(matrix, &diag, rhs, x),
            }

            residual_norm = residual_into(matrix, x, rhs, &mut ax);
            convergence_history.push(ConvergenceInfo {
                iteration: k,
                residual_norm,
            });
            trace!(iteration = k, residual_norm, "stationary sweep");

            if !residual_norm.is_finite() {
                warn!(iteration = k, "residual became non-finite");
                return Err(SolverError::NumericalInstability {
                    iteration: k,
                    detail: format!("residual became {residual_norm}"),
                });
            }

            if residual_norm < self.options.tolerance {
                converged = true;
                break;
            }
        }

        let iterations = convergence_history.len();
        if converged {
            debug!(iterations, residual_norm, "converged");
        } else {
            warn!(
                iterations,
                residual_norm,
                tolerance = self.options.tolerance,
                "iteration cap reached without convergence",
            );
        }

        Ok(SolveReport {
            algorithm: self.method.algorithm(),
            iterations,
            residual_norm,
            converged,
            wall_time: start.elapsed(),
            convergence_history,
        })
    }
}

// ---------------------------------------------------------------------------
// Kernels
// ---------------------------------------------------------------------------

/// Collect the diagonal, rejecting zero or structurally missing entries.
fn extract_diagonal<T: Scalar>(matrix: &CsrMatrix<T>) -> Result<Vec<T>, SolverError> {
    let mut diag = Vec::with_capacity(matrix.rows);
    for row in 0..matrix.rows {
        let d = matrix.get(row, row);
        if d == T::zero() {
            warn!(row, "zero diagonal entry");
            return Err(SolverError::ZeroDiagonal { row });
        }
        diag.push(d);
    }
    Ok(diag)
}

/// One Jacobi sweep: `x` is written from `previous` only.
fn sweep<T: Scalar>(matrix: &CsrMatrix<T>, diag: &[T], rhs: &[T], previous: &[T], x: &mut [T]) {
    for i in 0..matrix.rows {
        let mut sum = rhs[i];
        for (j, &a_ij) in matrix.row_entries(i) {
            if j != i {
                sum -= a_ij * previous[j];
            }
        }
        x[i] = sum / diag[i];
    }
}

/// One Gauss-Seidel sweep, reading already-updated entries of `x`.
fn sweep_in_place<T: Scalar>(matrix: &CsrMatrix<T>, diag: &[T], rhs: &[T], x: &mut [T]) {
    for i in 0..matrix.rows {
        let mut sum = rhs[i];
        for (j, &a_ij) in matrix.row_entries(i) {
            if j != i {
                sum -= a_ij * x[j];
            }
        }
        x[i] = sum / diag[i];
    }
}
