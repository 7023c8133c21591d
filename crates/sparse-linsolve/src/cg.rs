//! Conjugate Gradient solver for symmetric positive-definite systems.
//!
//! Solves `Ax = b` where `A` is symmetric positive-definite (SPD). In exact
//! arithmetic the method converges in at most `n` iterations for an `n x n`
//! system; in practice it converges in `O(sqrt(kappa) * log(1/eps))`
//! iterations where `kappa = cond(A)`.
//!
//! # Algorithm
//!
//! Textbook Hestenes-Stiefel recurrence, starting from the caller's `x`:
//!
//! ```text
//! r = b - A*x
//! p = r
//! rr = r . r
//!
//! for k in 0..max_iterations:
//!     if ||r||_2 < tolerance: converged; break
//!     Ap = A * p
//!     alpha = rr / (p . Ap)
//!     x  = x + alpha * p
//!     r  = r - alpha * Ap
//!     rr_new = r . r
//!     beta = rr_new / rr
//!     p  = r + beta * p
//!     rr = rr_new
//! ```
//!
//! One operator application per iteration. There is no preconditioner and no
//! reorthogonalisation. The solver is generic over [`LinearOperator`], so the
//! same code serves CSR and dense matrices.

use std::time::Instant;

use tracing::{debug, instrument, trace, warn};

use crate::error::SolverError;
use crate::residual::{axpy, dot};
use crate::traits::LinearOperator;
use crate::types::{Algorithm, ConvergenceInfo, Scalar, SolveOptions, SolveReport};
use crate::validation::{validate_params, validate_rhs, validate_solution_len, validate_square};

// ═══════════════════════════════════════════════════════════════════════════
// ConjugateGradientSolver
// ═══════════════════════════════════════════════════════════════════════════

/// Unpreconditioned Conjugate Gradient solver.
///
/// # Example
///
/// ```rust
/// use sparse_linsolve::cg::ConjugateGradientSolver;
/// use sparse_linsolve::csr::CsrMatrix;
/// use sparse_linsolve::types::SolveOptions;
///
/// let a = CsrMatrix::<f64>::from_coo(4, 4, vec![
///     (0, 0, 2.0), (1, 1, 1.0), (2, 2, 3.0), (3, 3, 7.0),
/// ]);
/// let b = vec![6.4, 7.8, 56.7, 51.1];
/// let mut x = vec![0.0; 4];
///
/// let report = ConjugateGradientSolver::new(SolveOptions::default())
///     .solve(&a, &b, &mut x)
///     .unwrap();
/// assert!(report.converged);
/// assert!((x[2] - 18.9).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct ConjugateGradientSolver {
    /// Tolerance and iteration cap.
    pub options: SolveOptions,
}

impl ConjugateGradientSolver {
    /// Create a new CG solver.
    pub fn new(options: SolveOptions) -> Self {
        Self { options }
    }

    /// Absolute residual threshold.
    #[inline]
    pub fn tolerance(&self) -> f64 {
        self.options.tolerance
    }

    /// Iteration cap.
    #[inline]
    pub fn max_iterations(&self) -> usize {
        self.options.max_iterations
    }

    /// Run CG on `op x = rhs`, refining `x` in place.
    ///
    /// The residual is checked before the first iteration, so an `x` that
    /// already satisfies the tolerance returns after zero iterations.
    ///
    /// # Errors
    ///
    /// - [`SolverError::InvalidInput`] on non-square operators, wrong vector
    ///   lengths, or out-of-range options.
    /// - [`SolverError::NumericalInstability`] if `p . Ap <= 0` (the operator
    ///   is not SPD) or a step produces NaN / Inf.
    #[instrument(skip(self, op, rhs, x), fields(n = op.nrows()))]
    pub fn solve<T, A>(&self, op: &A, rhs: &[T], x: &mut [T]) -> Result<SolveReport, SolverError>
    where
        T: Scalar,
        A: LinearOperator<T> + ?Sized,
    {
        let start_time = Instant::now();

        validate_square(op.nrows(), op.ncols())?;
        validate_rhs(rhs, op.nrows())?;
        validate_solution_len(x, op.nrows())?;
        validate_params(&self.options)?;

        let n = op.nrows();
        let tolerance = self.options.tolerance;
        let max_iterations = self.options.max_iterations;

        // --- Working vectors ---
        let mut r = vec![T::zero(); n];
        let mut p = vec![T::zero(); n];
        let mut ap = vec![T::zero(); n];

        // --- r = b - A*x, p = r ---
        op.apply(x, &mut ap);
        for i in 0..n {
            r[i] = rhs[i] - ap[i];
        }
        p.copy_from_slice(&r);

        let mut rr = dot(&r, &r);
        let mut r_norm = rr.sqrt().to_f64_lossy();
        let mut convergence_history = Vec::with_capacity(max_iterations.min(256));
        let mut converged = r_norm < tolerance;

        debug!(
            "CG: n={}, tol={:.2e}, max_iter={}, ||r0||={:.6e}",
            n, tolerance, max_iterations, r_norm,
        );

        // ===============================================================
        // Main CG loop
        // ===============================================================
        let mut k = 0;
        while !converged && k < max_iterations {
            // --- Ap = A * p ---
            op.apply(&p, &mut ap);

            // --- alpha = rr / (p . Ap) ---
            let p_dot_ap = dot(&p, &ap);
            if p_dot_ap <= T::zero() || !p_dot_ap.is_finite() {
                let curvature = p_dot_ap.to_f64_lossy();
                warn!("CG: non-positive p.Ap = {curvature:.4e} at iteration {k}");
                return Err(SolverError::NumericalInstability {
                    iteration: k,
                    detail: format!("p.Ap = {curvature:.6e}; matrix is not SPD"),
                });
            }
            let alpha = rr / p_dot_ap;

            // --- x = x + alpha * p;  r = r - alpha * Ap ---
            axpy(alpha, &p, x);
            axpy(-alpha, &ap, &mut r);

            let rr_new = dot(&r, &r);
            r_norm = rr_new.sqrt().to_f64_lossy();
            convergence_history.push(ConvergenceInfo {
                iteration: k,
                residual_norm: r_norm,
            });
            trace!("CG iter {k}: ||r|| = {r_norm:.6e}");

            if !r_norm.is_finite() {
                warn!("CG: residual became {r_norm} at iteration {k}");
                return Err(SolverError::NumericalInstability {
                    iteration: k,
                    detail: format!("residual became {r_norm}"),
                });
            }

            k += 1;
            if r_norm < tolerance {
                converged = true;
                break;
            }

            // --- beta = rr_new / rr;  p = r + beta * p ---
            let beta = rr_new / rr;
            for (pi, &ri) in p.iter_mut().zip(r.iter()) {
                *pi = ri + beta * *pi;
            }
            rr = rr_new;
        }

        if converged {
            debug!("CG converged after {k} iterations: ||r|| = {r_norm:.6e}");
        } else {
            warn!(
                "CG: no convergence after {k} iterations, ||r|| = {r_norm:.6e} (tol {tolerance:.2e})",
            );
        }

        Ok(SolveReport {
            algorithm: Algorithm::CG,
            iterations: k,
            residual_norm: r_norm,
            converged,
            wall_time: start_time.elapsed(),
            convergence_history,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
