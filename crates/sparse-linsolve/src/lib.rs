//! Sparse and dense linear system solvers.
//!
//! This crate solves `Ax = b` for real square matrices, with the matrix
//! stored either in Compressed Sparse Row form ([`csr::CsrMatrix`]) or as a
//! row-major dense buffer ([`dense::DenseMatrix`], feature `dense`).
//!
//! # Available Solvers
//!
//! | Solver | Kind | Requirement on `A` |
//! |--------|------|--------------------|
//! | [`StationarySolver`](stationary::StationarySolver) (Jacobi) | iterative | diagonally dominant |
//! | [`StationarySolver`](stationary::StationarySolver) (Gauss-Seidel) | iterative | diagonally dominant or SPD |
//! | [`ConjugateGradientSolver`](cg::ConjugateGradientSolver) | iterative | symmetric positive definite |
//! | [`lu::decompose`] | direct | non-zero pivots (no pivoting) |
//! | [`cholesky::decompose`] | direct | symmetric positive definite |
//!
//! [`solver::SparseSolver`] and [`dense::DenseSolver`] bind one matrix and
//! one right-hand side and expose every algorithm behind a single value.
//! Iterative solves refine a caller-owned `&mut [T]` and return a
//! [`types::SolveReport`]; running out of iterations is reported through
//! `converged == false` rather than as an error.
//!
//! # Example
//!
//! ```rust
//! use sparse_linsolve::csr::CsrMatrix;
//! use sparse_linsolve::solver::SparseSolver;
//! use sparse_linsolve::types::SolveOptions;
//!
//! // Diagonally dominant 3x3 matrix (f32)
//! let matrix = CsrMatrix::<f32>::from_coo(3, 3, vec![
//!     (0, 0, 2.0_f32), (0, 1, -0.5_f32),
//!     (1, 0, -0.5_f32), (1, 1, 2.0_f32), (1, 2, -0.5_f32),
//!     (2, 1, -0.5_f32), (2, 2, 2.0_f32),
//! ]);
//! let rhs = vec![1.0_f32, 0.0, 1.0];
//!
//! let solver = SparseSolver::new(&matrix, &rhs).unwrap();
//! let mut x = vec![0.0_f32; 3];
//! let report = solver.gauss_seidel(&mut x, &SolveOptions::new(1e-5, 500)).unwrap();
//! assert!(report.converged);
//! assert!(report.residual_norm < 1e-5);
//! ```

pub mod cg;
pub mod cholesky;
pub mod csr;
pub mod error;
pub mod lu;
pub mod residual;
pub mod solver;
pub mod stationary;
pub mod traits;
pub mod types;
pub mod validation;

#[cfg(feature = "dense")]
pub mod dense;

pub use csr::CsrMatrix;
pub use error::{SolverError, ValidationError};
pub use solver::SparseSolver;
pub use traits::{Factorization, LinearOperator};
pub use types::{Algorithm, Scalar, SolveOptions, SolveReport, StationaryMethod};
