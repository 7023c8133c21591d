//! Dense counterparts of the sparse solvers.
//!
//! A secondary path used to cross-check the CSR algorithms: the same error
//! and report contracts, expressed as fixed-stride loops over a row-major
//! buffer. Conjugate Gradient is shared with the sparse path through
//! [`LinearOperator`](crate::traits::LinearOperator).

mod factor;
mod matrix;
mod solver;

pub use factor::{cholesky_decompose, lu_decompose, DenseCholesky, DenseLu};
pub use matrix::DenseMatrix;
pub use solver::DenseSolver;
