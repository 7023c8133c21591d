//! Trait seams shared by the sparse and dense paths.
//!
//! [`LinearOperator`] is the only thing the residual evaluator and the
//! iterative solvers need from a matrix. [`Factorization`] lets one
//! decomposition be reused against any number of right-hand sides.

use crate::error::SolverError;
use crate::types::Scalar;

/// A square or rectangular operator that can compute `y = A x`.
pub trait LinearOperator<T: Scalar> {
    /// Number of rows of `A` (length of `y`).
    fn nrows(&self) -> usize;

    /// Number of columns of `A` (length of `x`).
    fn ncols(&self) -> usize;

    /// Overwrite `y` with `A x`.
    ///
    /// Callers guarantee `x.len() >= ncols()` and `y.len() >= nrows()`.
    fn apply(&self, x: &[T], y: &mut [T]);
}

/// A completed matrix decomposition that can solve `A x = b`.
///
/// Implementations never refactorise: the cost of a solve is proportional to
/// the size of the stored factors.
pub trait Factorization<T: Scalar> {
    /// Dimension `n` of the factored `n x n` matrix.
    fn dim(&self) -> usize;

    /// Solve `A x = b`, writing the solution into `x`.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidInput`] if `b` or `x` do not have
    /// length [`dim`](Self::dim).
    fn solve(&self, b: &[T], x: &mut [T]) -> Result<(), SolverError>;
}
