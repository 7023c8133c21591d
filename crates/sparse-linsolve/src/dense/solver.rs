//! [`DenseSolver`]: every algorithm family over a [`DenseMatrix`].

use std::time::Instant;

use tracing::{debug, instrument, trace, warn};

use super::factor::{cholesky_decompose, lu_decompose, DenseCholesky, DenseLu};
use super::matrix::DenseMatrix;
use crate::cg::ConjugateGradientSolver;
use crate::error::SolverError;
use crate::residual::{residual_into, residual_norm};
use crate::traits::Factorization;
use crate::types::{ConvergenceInfo, Scalar, SolveOptions, SolveReport, StationaryMethod};
use crate::validation::{
    validate_params, validate_rhs, validate_solution_len, validate_square,
};

/// Binds one dense matrix and one right-hand side.
///
/// Solutions are written into caller-supplied buffers; the solver keeps no
/// state between calls.
///
/// # Example
///
/// ```rust
/// use sparse_linsolve::dense::{DenseMatrix, DenseSolver};
///
/// let a = DenseMatrix::new(2, 2, vec![4.0, 1.0, 1.0, 3.0]).unwrap();
/// let b = vec![1.0, 2.0];
/// let solver = DenseSolver::new(&a, &b).unwrap();
///
/// let lu = solver.lu_decompose().unwrap();
/// let mut x = vec![0.0; 2];
/// solver.lu_solve(&lu, &[0, 1], &mut x).unwrap();
/// assert!(solver.residual(&x).unwrap() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DenseSolver<'a, T> {
    matrix: &'a DenseMatrix<T>,
    rhs: &'a [T],
}

impl<'a, T: Scalar> DenseSolver<'a, T> {
    /// Bind `matrix` and `rhs`.
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidInput`] if the matrix is not square or the rhs
    /// length or values are invalid.
    pub fn new(matrix: &'a DenseMatrix<T>, rhs: &'a [T]) -> Result<Self, SolverError> {
        validate_square(matrix.rows, matrix.cols)?;
        validate_rhs(rhs, matrix.rows)?;
        Ok(Self { matrix, rhs })
    }

    /// The bound matrix.
    pub fn matrix(&self) -> &'a DenseMatrix<T> {
        self.matrix
    }

    /// The bound right-hand side.
    pub fn rhs(&self) -> &'a [T] {
        self.rhs
    }

    /// `||A x - b||_2`.
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidInput`] if `x.len()` differs from the system
    /// dimension.
    pub fn residual(&self, x: &[T]) -> Result<f64, SolverError> {
        validate_solution_len(x, self.matrix.rows)?;
        Ok(residual_norm(self.matrix, x, self.rhs))
    }

    /// Jacobi or Gauss-Seidel iteration on `x`.
    ///
    /// # Errors
    ///
    /// - [`SolverError::InvalidInput`] on a wrong `x` length or bad options.
    /// - [`SolverError::ZeroDiagonal`] if any `a_ii == 0`, before any sweep.
    /// - [`SolverError::NumericalInstability`] if the residual blows up.
    #[instrument(skip(self, x, options), fields(n = self.matrix.rows, method = ?method))]
    pub fn stationary_iterative(
        &self,
        x: &mut [T],
        options: &SolveOptions,
        method: StationaryMethod,
    ) -> Result<SolveReport, SolverError> {
        let start = Instant::now();
        let n = self.matrix.rows;
        validate_solution_len(x, n)?;
        validate_params(options)?;

        let a = &self.matrix.values;
        if let Some(row) = (0..n).find(|&i| a[i * n + i] == T::zero()) {
            warn!(row, "zero diagonal entry");
            return Err(SolverError::ZeroDiagonal { row });
        }

        let mut previous = vec![T::zero(); n];
        let mut ax = vec![T::zero(); n];
        let mut history = Vec::with_capacity(options.max_iterations.min(256));
        let mut residual = f64::INFINITY;
        let mut converged = false;

        for k in 0..options.max_iterations {
            if method == StationaryMethod::Jacobi {
                previous.copy_from_slice(x);
            }
            for i in 0..n {
                let row = &a[i * n..(i + 1) * n];
                let mut sum = self.rhs[i];
                for j in 0..n {
                    if j == i {
                        continue;
                    }
                    let xj = match method {
                        StationaryMethod::Jacobi => previous[j],
                        StationaryMethod::GaussSeidel => x[j],
                    };
                    sum -= row[j] * xj;
                }
                x[i] = sum / row[i];
            }

            residual = residual_into(self.matrix, x, self.rhs, &mut ax);
            history.push(ConvergenceInfo {
                iteration: k,
                residual_norm: residual,
            });
            trace!(iteration = k, residual, "dense sweep");

            if !residual.is_finite() {
                return Err(SolverError::NumericalInstability {
                    iteration: k,
                    detail: format!("residual became {residual}"),
                });
            }
            if residual < options.tolerance {
                converged = true;
                break;
            }
        }

        if converged {
            debug!(iterations = history.len(), residual, "converged");
        } else {
            warn!(iterations = history.len(), residual, "iteration cap reached without convergence");
        }

        Ok(SolveReport {
            algorithm: method.algorithm(),
            iterations: history.len(),
            residual_norm: residual,
            converged,
            wall_time: start.elapsed(),
            convergence_history: history,
        })
    }

    /// Jacobi iteration.
    ///
    /// # Errors
    ///
    /// See [`stationary_iterative`](Self::stationary_iterative).
    pub fn jacobi(&self, x: &mut [T], options: &SolveOptions) -> Result<SolveReport, SolverError> {
        self.stationary_iterative(x, options, StationaryMethod::Jacobi)
    }

    /// Gauss-Seidel iteration.
    ///
    /// # Errors
    ///
    /// See [`stationary_iterative`](Self::stationary_iterative).
    pub fn gauss_seidel(
        &self,
        x: &mut [T],
        options: &SolveOptions,
    ) -> Result<SolveReport, SolverError> {
        self.stationary_iterative(x, options, StationaryMethod::GaussSeidel)
    }

    /// Conjugate Gradient starting from `x`.
    ///
    /// # Errors
    ///
    /// See [`ConjugateGradientSolver::solve`].
    pub fn conjugate_gradient(
        &self,
        x: &mut [T],
        options: &SolveOptions,
    ) -> Result<SolveReport, SolverError> {
        ConjugateGradientSolver::new(*options).solve(self.matrix, self.rhs, x)
    }

    /// Factor the bound matrix as `L U`.
    ///
    /// # Errors
    ///
    /// See [`lu_decompose`].
    pub fn lu_decompose(&self) -> Result<DenseLu<T>, SolverError> {
        lu_decompose(self.matrix)
    }

    /// Solve against the bound rhs with previously computed factors.
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidInput`] on a non-identity `perm` or wrong `x`
    /// length.
    pub fn lu_solve(&self, lu: &DenseLu<T>, perm: &[usize], x: &mut [T]) -> Result<(), SolverError> {
        lu.solve_permuted(perm, self.rhs, x)
    }

    /// Factor the bound matrix as `R^T R`.
    ///
    /// # Errors
    ///
    /// See [`cholesky_decompose`].
    pub fn cholesky_decompose(&self) -> Result<DenseCholesky<T>, SolverError> {
        cholesky_decompose(self.matrix)
    }

    /// Solve against the bound rhs with a previously computed factor.
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidInput`] if `x` has the wrong length.
    pub fn cholesky_solve(&self, r: &DenseCholesky<T>, x: &mut [T]) -> Result<(), SolverError> {
        r.solve(self.rhs, x)
    }
}
