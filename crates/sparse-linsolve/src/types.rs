//! Core types shared by every solver.
//!
//! Provides the [`Scalar`] element-type bound, solver configuration
//! ([`SolveOptions`]) and the structured [`SolveReport`] returned by every
//! iterative solve.

use std::fmt::{Debug, Display};
use std::iter::Sum;
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};
use std::time::Duration;

use num_traits::Float;
use rand::distributions::uniform::SampleUniform;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Scalar
// ---------------------------------------------------------------------------

/// Real floating-point element type accepted by all matrices and solvers.
///
/// Implemented for `f32` and `f64`. Residual norms and tolerances are always
/// reported in `f64` so that the two precisions share one report type.
pub trait Scalar:
    Float
    + SampleUniform
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Sum
    + Default
    + Debug
    + Display
    + Send
    + Sync
    + 'static
{
    /// Widen to `f64` for reporting.
    fn to_f64_lossy(self) -> f64;

    /// Narrow an `f64` constant into this type.
    fn from_f64_lossy(value: f64) -> Self;
}

impl Scalar for f32 {
    #[inline]
    fn to_f64_lossy(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64_lossy(value: f64) -> Self {
        value as f32
    }
}

impl Scalar for f64 {
    #[inline]
    fn to_f64_lossy(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64_lossy(value: f64) -> Self {
        value
    }
}

// ---------------------------------------------------------------------------
// Algorithm identifiers
// ---------------------------------------------------------------------------

/// Algorithm identifier attached to every [`SolveReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// Jacobi iteration: every update reads the previous iterate.
    Jacobi,
    /// Gauss-Seidel iteration: updates in place, row by row.
    GaussSeidel,
    /// Conjugate Gradient for symmetric positive-definite systems.
    CG,
    /// LU decomposition without pivoting plus triangular solves.
    LU,
    /// Cholesky decomposition plus two triangular solves.
    Cholesky,
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::Jacobi => write!(f, "jacobi"),
            Algorithm::GaussSeidel => write!(f, "gauss-seidel"),
            Algorithm::CG => write!(f, "cg"),
            Algorithm::LU => write!(f, "lu"),
            Algorithm::Cholesky => write!(f, "cholesky"),
        }
    }
}

/// Update rule used by the stationary iterative solvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StationaryMethod {
    /// Sums use the previous full iterate (needs a snapshot buffer).
    Jacobi,
    /// Sums use values already updated in the current sweep.
    GaussSeidel,
}

impl StationaryMethod {
    /// The [`Algorithm`] tag reported for this method.
    pub fn algorithm(self) -> Algorithm {
        match self {
            StationaryMethod::Jacobi => Algorithm::Jacobi,
            StationaryMethod::GaussSeidel => Algorithm::GaussSeidel,
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Convergence controls for iterative solvers.
///
/// The solver stops as soon as `||Ax - b||_2 < tolerance` or after
/// `max_iterations` iterations, whichever comes first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolveOptions {
    /// Absolute residual threshold.
    pub tolerance: f64,
    /// Maximum number of sweeps / CG steps.
    pub max_iterations: usize,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 1000,
        }
    }
}

impl SolveOptions {
    /// Create options with an explicit tolerance and iteration cap.
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Replace the tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Replace the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Per-iteration convergence snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceInfo {
    /// Iteration index (0-based).
    pub iteration: usize,
    /// Residual L2 norm after this iteration.
    pub residual_norm: f64,
}

/// Diagnostics returned by an iterative solve.
///
/// The solution itself lives in the caller's buffer, which the solver
/// overwrites in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveReport {
    /// Algorithm used.
    pub algorithm: Algorithm,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Final residual L2 norm `||Ax - b||_2`.
    pub residual_norm: f64,
    /// Whether `residual_norm < tolerance` was reached.
    pub converged: bool,
    /// Wall-clock time taken.
    pub wall_time: Duration,
    /// Per-iteration convergence history.
    pub convergence_history: Vec<ConvergenceInfo>,
}
