//! [`SparseSolver`]: one CSR matrix, one right-hand side, every algorithm.
//!
//! The facade borrows its inputs for `'a` and validates the pairing once at
//! construction. Each method writes into a caller-supplied solution buffer
//! and returns a [`SolveReport`] (iterative methods) or a reusable factor
//! (direct methods).

use crate::cg::ConjugateGradientSolver;
use crate::cholesky::{self, CholeskyFactor};
use crate::csr::CsrMatrix;
use crate::error::{SolverError, ValidationError};
use crate::lu::{self, LuFactors};
use crate::residual;
use crate::stationary::StationarySolver;
use crate::traits::Factorization;
use crate::types::{Scalar, SolveOptions, SolveReport, StationaryMethod};
use crate::validation::{validate_rhs, validate_solution_len, validate_square};

/// Binds one sparse matrix and one right-hand side.
///
/// # Example
///
/// ```rust
/// use sparse_linsolve::csr::CsrMatrix;
/// use sparse_linsolve::solver::SparseSolver;
/// use sparse_linsolve::types::SolveOptions;
///
/// let a = CsrMatrix::<f64>::random_seeded(50, 0.1, 42).unwrap();
/// let b = vec![1.0; 50];
/// let solver = SparseSolver::new(&a, &b).unwrap();
///
/// let mut x = vec![0.0; 50];
/// let report = solver.conjugate_gradient(&mut x, &SolveOptions::default()).unwrap();
/// assert!(report.converged);
///
/// let r = solver.cholesky_decompose().unwrap();
/// let mut y = vec![0.0; 50];
/// solver.cholesky_solve(&r, &mut y).unwrap();
/// assert!(solver.residual(&y).unwrap() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SparseSolver<'a, T> {
    matrix: &'a CsrMatrix<T>,
    rhs: &'a [T],
}

impl<'a, T: Scalar> SparseSolver<'a, T> {
    /// Bind `matrix` and `rhs`.
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidInput`] if the matrix is not square or `rhs`
    /// has the wrong length or non-finite entries.
    pub fn new(matrix: &'a CsrMatrix<T>, rhs: &'a [T]) -> Result<Self, SolverError> {
        validate_square(matrix.rows, matrix.cols)?;
        validate_rhs(rhs, matrix.rows)?;
        Ok(Self { matrix, rhs })
    }

    /// The bound matrix.
    pub fn matrix(&self) -> &'a CsrMatrix<T> {
        self.matrix
    }

    /// The bound right-hand side.
    pub fn rhs(&self) -> &'a [T] {
        self.rhs
    }

    /// System dimension `n`.
    pub fn dim(&self) -> usize {
        self.matrix.rows
    }

    /// `||A x - b||_2`.
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidInput`] if `x.len() != n`.
    pub fn residual(&self, x: &[T]) -> Result<f64, SolverError> {
        validate_solution_len(x, self.dim())?;
        Ok(residual::residual_norm(self.matrix, x, self.rhs))
    }

    /// `||A x - b||_2`, leaving `A x` in `ax`.
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidInput`] if `x` or `ax` do not have length `n`.
    pub fn residual_into(&self, x: &[T], ax: &mut [T]) -> Result<f64, SolverError> {
        validate_solution_len(x, self.dim())?;
        if ax.len() != self.dim() {
            return Err(ValidationError::DimensionMismatch(format!(
                "product buffer length {} does not match system dimension {}",
                ax.len(),
                self.dim(),
            ))
            .into());
        }
        Ok(residual::residual_into(self.matrix, x, self.rhs, ax))
    }

    /// Jacobi or Gauss-Seidel iteration on `x`.
    ///
    /// # Errors
    ///
    /// See [`StationarySolver::solve`].
    pub fn stationary_iterative(
        &self,
        x: &mut [T],
        options: &SolveOptions,
        method: StationaryMethod,
    ) -> Result<SolveReport, SolverError> {
        StationarySolver::new(method, *options).solve(self.matrix, self.rhs, x)
    }

    /// Jacobi iteration.
    ///
    /// # Errors
    ///
    /// See [`StationarySolver::solve`].
    pub fn jacobi(&self, x: &mut [T], options: &SolveOptions) -> Result<SolveReport, SolverError> {
        self.stationary_iterative(x, options, StationaryMethod::Jacobi)
    }

    /// Gauss-Seidel iteration.
    ///
    /// # Errors
    ///
    /// See [`StationarySolver::solve`].
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

    /// Sparse LU factorisation of the bound matrix.
    ///
    /// # Errors
    ///
    /// See [`lu::decompose`].
    pub fn lu_decompose(&self) -> Result<LuFactors<T>, SolverError> {
        lu::decompose(self.matrix)
    }

    /// Solve `L U x = P b` against the bound rhs.
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidInput`] if `perm` is not the identity or `x`
    /// has the wrong length.
    pub fn lu_solve(
        &self,
        factors: &LuFactors<T>,
        perm: &[usize],
        x: &mut [T],
    ) -> Result<(), SolverError> {
        factors.solve_permuted(perm, self.rhs, x)
    }

    /// Solve against a different right-hand side, reusing `factors`.
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidInput`] on length mismatches.
    pub fn lu_solve_with_rhs(
        &self,
        factors: &LuFactors<T>,
        rhs: &[T],
        x: &mut [T],
    ) -> Result<(), SolverError> {
        factors.solve(rhs, x)
    }

    /// Sparse Cholesky factorisation of the bound matrix.
    ///
    /// # Errors
    ///
    /// See [`cholesky::decompose`].
    pub fn cholesky_decompose(&self) -> Result<CholeskyFactor<T>, SolverError> {
        cholesky::decompose(self.matrix)
    }

    /// Solve `R^T R x = b` against the bound rhs.
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidInput`] if `x` has the wrong length.
    pub fn cholesky_solve(&self, r: &CholeskyFactor<T>, x: &mut [T]) -> Result<(), SolverError> {
        r.solve(self.rhs, x)
    }
}
