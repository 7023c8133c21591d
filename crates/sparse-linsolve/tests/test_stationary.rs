//! Integration tests for the Jacobi and Gauss-Seidel solvers.

mod helpers;

use approx::assert_relative_eq;
use sparse_linsolve::csr::CsrMatrix;
use sparse_linsolve::error::SolverError;
use sparse_linsolve::stationary::StationarySolver;
use sparse_linsolve::types::{Algorithm, SolveOptions, StationaryMethod};

use helpers::{
    compute_residual, dense_solve, init_tracing, l2_norm, random_diag_dominant_csr,
    random_spd_csr, random_vector, relative_error,
};

/// 6x6 symmetric, diagonally dominant system whose solution is `[1, 2, 3, 4, 5, 6]`.
fn known_6x6() -> (CsrMatrix<f64>, Vec<f64>) {
    let a = CsrMatrix::new(
        6,
        6,
        vec![0, 4, 5, 7, 9, 11, 12],
        vec![0, 2, 3, 4, 1, 0, 2, 0, 3, 0, 4, 5],
        vec![5.0, 1.0, 1.0, 1.0, 5.0, 1.0, 5.0, 1.0, 5.0, 1.0, 5.0, 5.0],
    )
    .unwrap();
    (a, vec![17.0, 10.0, 16.0, 21.0, 26.0, 30.0])
}

// ---------------------------------------------------------------------------
// Known solution
// ---------------------------------------------------------------------------

#[test]
fn test_jacobi_known_solution() {
    init_tracing();
    let (a, b) = known_6x6();
    let mut x = vec![0.0; 6];

    let report = StationarySolver::jacobi(SolveOptions::new(1e-10, 1000))
        .solve(&a, &b, &mut x)
        .unwrap();

    assert_eq!(report.algorithm, Algorithm::Jacobi);
    assert!(report.converged);
    for (i, &xi) in x.iter().enumerate() {
        assert_relative_eq!(xi, i as f64 + 1.0, epsilon = 1e-9);
    }
}

#[test]
fn test_gauss_seidel_known_solution() {
    let (a, b) = known_6x6();
    let mut x = vec![0.0; 6];

    let report = StationarySolver::gauss_seidel(SolveOptions::new(1e-10, 1000))
        .solve(&a, &b, &mut x)
        .unwrap();

    assert_eq!(report.algorithm, Algorithm::GaussSeidel);
    assert!(report.converged);
    for (i, &xi) in x.iter().enumerate() {
        assert_relative_eq!(xi, i as f64 + 1.0, epsilon = 1e-9);
    }
}

// ---------------------------------------------------------------------------
// Random systems
// ---------------------------------------------------------------------------

#[test]
fn test_stationary_random_non_symmetric() {
    let n = 50;
    let a = random_diag_dominant_csr(n, 0.1, 17);
    let b = random_vector(n, 18);
    let exact = dense_solve(&a, &b);

    for method in [StationaryMethod::Jacobi, StationaryMethod::GaussSeidel] {
        let mut x = vec![0.0; n];
        let report = StationarySolver::new(method, SolveOptions::new(1e-10, 5000))
            .solve(&a, &b, &mut x)
            .unwrap();

        assert!(report.converged, "{method:?} did not converge");
        let resid = l2_norm(&compute_residual(&a, &x, &b));
        assert!(resid < 1e-10, "{method:?}: residual {resid}");
        assert!(relative_error(&x, &exact) < 1e-8);
    }
}

#[test]
fn test_stationary_random_symmetric_generator() {
    let a = random_spd_csr(80, 0.05, 33);
    let b = random_vector(80, 34);
    let opts = SolveOptions::new(1e-9, 1000);

    let mut xj = vec![0.0; 80];
    let jac = StationarySolver::jacobi(opts).solve(&a, &b, &mut xj).unwrap();
    let mut xg = vec![0.0; 80];
    let gs = StationarySolver::gauss_seidel(opts).solve(&a, &b, &mut xg).unwrap();

    assert!(jac.converged && gs.converged);
    assert!(gs.iterations <= jac.iterations);
    assert!(relative_error(&xj, &xg) < 1e-7);
}

// ---------------------------------------------------------------------------
// Residual history
// ---------------------------------------------------------------------------

#[test]
fn test_stationary_residual_decreases() {
    let (fixture, fixture_rhs) = known_6x6();
    let random = random_spd_csr(60, 0.05, 33);
    let random_rhs = random_vector(60, 34);
    let opts = SolveOptions::new(1e-10, 1000);

    for (a, b) in [(&fixture, &fixture_rhs), (&random, &random_rhs)] {
        for solver in [
            StationarySolver::jacobi(opts),
            StationarySolver::gauss_seidel(opts),
        ] {
            let mut x = vec![0.0; a.rows];
            let report = solver.solve(a, b, &mut x).unwrap();
            assert!(report.converged, "{:?} n={}", solver.method, a.rows);

            let history = &report.convergence_history;
            assert_eq!(history.len(), report.iterations);
            assert!(
                history
                    .windows(2)
                    .all(|w| w[1].residual_norm <= w[0].residual_norm),
                "{:?} n={}: residual went up in {:?}",
                solver.method,
                a.rows,
                history.iter().map(|h| h.residual_norm).collect::<Vec<_>>()
            );

            let first = history[0].residual_norm;
            let last = report.residual_norm;
            assert_eq!(history[history.len() - 1].residual_norm, last);
            assert!(last < first * 1e-6, "first {first}, last {last}");
        }
    }
}

#[test]
fn test_stationary_warm_start() {
    let (a, b) = known_6x6();
    let mut x: Vec<f64> = (1..=6).map(|v| v as f64).collect();
    let report = StationarySolver::jacobi(SolveOptions::default())
        .solve(&a, &b, &mut x)
        .unwrap();
    // Already exact: one sweep, zero residual.
    assert_eq!(report.iterations, 1);
    assert!(report.residual_norm < 1e-12);
}

// ---------------------------------------------------------------------------
// Failure modes
// ---------------------------------------------------------------------------

#[test]
fn test_stationary_missing_diagonal() {
    let a = CsrMatrix::<f64>::from_coo(3, 3, vec![(0, 0, 2.0), (1, 2, 1.0), (2, 2, 3.0)]);
    let b = vec![1.0; 3];
    let mut x = vec![0.0; 3];
    let err = StationarySolver::jacobi(SolveOptions::default())
        .solve(&a, &b, &mut x)
        .unwrap_err();
    assert!(matches!(err, SolverError::ZeroDiagonal { row: 1 }));
}

#[test]
fn test_stationary_explicit_zero_diagonal() {
    let a = CsrMatrix::<f64>::from_coo(2, 2, vec![(0, 0, 0.0), (0, 1, 1.0), (1, 1, 1.0)]);
    let b = vec![1.0; 2];
    let mut x = vec![0.0; 2];
    let err = StationarySolver::gauss_seidel(SolveOptions::default())
        .solve(&a, &b, &mut x)
        .unwrap_err();
    assert!(matches!(err, SolverError::ZeroDiagonal { row: 0 }));
}

#[test]
fn test_stationary_divergence_is_reported() {
    // Not diagonally dominant: Jacobi iteration matrix has spectral radius 3.
    let a = CsrMatrix::<f64>::from_coo(
        2,
        2,
        vec![(0, 0, 1.0), (0, 1, 3.0), (1, 0, 3.0), (1, 1, 1.0)],
    );
    let b = vec![1.0, 1.0];
    let mut x = vec![0.0; 2];
    let result = StationarySolver::jacobi(SolveOptions::new(1e-8, 2000)).solve(&a, &b, &mut x);

    match result {
        Ok(report) => assert!(!report.converged),
        Err(err) => assert!(matches!(err, SolverError::NumericalInstability { .. })),
    }
}
