//! Integration tests for the sparse LU decomposition and triangular solves.

mod helpers;

use approx::assert_relative_eq;
use sparse_linsolve::csr::CsrMatrix;
use sparse_linsolve::error::{SolverError, ValidationError};
use sparse_linsolve::lu::{self, LuFactors};
use sparse_linsolve::residual::residual_norm;
use sparse_linsolve::solver::SparseSolver;
use sparse_linsolve::traits::Factorization;
use sparse_linsolve::validation::validate_csr_matrix;

use helpers::{
    dense_solve, init_tracing, random_diag_dominant_csr, random_vector, relative_error,
    to_dense_rows,
};

fn identity_perm(n: usize) -> Vec<usize> {
    (0..n).collect()
}

fn assert_factors_reproduce(a: &CsrMatrix<f64>, lu: &LuFactors<f64>) {
    let product = lu.l.matmul(&lu.u).unwrap();
    let got = to_dense_rows(&product);
    let want = to_dense_rows(a);
    for i in 0..a.rows {
        for j in 0..a.cols {
            assert_relative_eq!(got[i][j], want[i][j], epsilon = 1e-10);
        }
    }
}

// ---------------------------------------------------------------------------
// Known system
// ---------------------------------------------------------------------------

#[test]
fn test_lu_known_6x6() {
    init_tracing();
    let a = CsrMatrix::new(
        6,
        6,
        vec![0, 4, 5, 7, 9, 11, 12],
        vec![0, 2, 3, 4, 1, 0, 2, 0, 3, 0, 4, 5],
        vec![5.0, 1.0, 1.0, 1.0, 5.0, 1.0, 5.0, 1.0, 5.0, 1.0, 5.0, 5.0],
    )
    .unwrap();
    let b = vec![17.0, 10.0, 16.0, 21.0, 26.0, 30.0];

    let solver = SparseSolver::new(&a, &b).unwrap();
    let lu = solver.lu_decompose().unwrap();
    assert_factors_reproduce(&a, &lu);

    let mut x = vec![0.0; 6];
    solver.lu_solve(&lu, &identity_perm(6), &mut x).unwrap();
    for (i, &xi) in x.iter().enumerate() {
        assert_relative_eq!(xi, i as f64 + 1.0, epsilon = 1e-10);
    }
}

// ---------------------------------------------------------------------------
// Random non-symmetric systems
// ---------------------------------------------------------------------------

#[test]
fn test_lu_random_non_symmetric() {
    for (n, density, seed) in [(10, 0.3, 1), (40, 0.1, 2), (120, 0.03, 3)] {
        let a = random_diag_dominant_csr(n, density, seed);
        let b = random_vector(n, seed + 100);

        let lu = lu::decompose(&a).unwrap();
        assert!(validate_csr_matrix(&lu.l).is_ok());
        assert!(validate_csr_matrix(&lu.u).is_ok());
        assert_factors_reproduce(&a, &lu);

        let mut x = vec![0.0; n];
        lu.solve(&b, &mut x).unwrap();
        assert!(residual_norm(&a, &x, &b) < 1e-10, "n = {n}");
        assert!(relative_error(&x, &dense_solve(&a, &b)) < 1e-10);
    }
}

#[test]
fn test_lu_factor_structure() {
    let a = random_diag_dominant_csr(30, 0.15, 8);
    let lu = lu::decompose(&a).unwrap();

    for i in 0..30 {
        // L: strictly lower entries, then the unit diagonal last.
        let l_row: Vec<(usize, f64)> = lu.l.row_entries(i).map(|(j, &v)| (j, v)).collect();
        assert_eq!(l_row.last(), Some(&(i, 1.0)));
        assert!(l_row.iter().all(|&(j, _)| j <= i));

        // U: diagonal first, then strictly upper entries.
        let u_row: Vec<usize> = lu.u.row_entries(i).map(|(j, _)| j).collect();
        assert_eq!(u_row.first(), Some(&i));
        assert!(u_row.iter().all(|&j| j >= i));
    }

    // Fill-in never removes entries of A.
    assert!(lu.l.nnz() - 30 + lu.u.nnz() >= a.nnz());
}

#[test]
fn test_lu_factors_reused_across_rhs() {
    let a = random_diag_dominant_csr(25, 0.2, 12);
    let lu = lu::decompose(&a).unwrap();

    for seed in 0..5 {
        let b = random_vector(25, seed);
        let mut x = vec![0.0; 25];
        lu.solve(&b, &mut x).unwrap();
        assert!(residual_norm(&a, &x, &b) < 1e-10);
    }
}

// ---------------------------------------------------------------------------
// Failure modes
// ---------------------------------------------------------------------------

#[test]
fn test_lu_needs_pivoting_fails() {
    //  [ 0  2  1 ]
    //  [ 1  1  0 ]
    //  [ 2  0  3 ]   non-singular, but a_00 = 0.
    let a = CsrMatrix::<f64>::from_coo(
        3,
        3,
        vec![
            (0, 1, 2.0),
            (0, 2, 1.0),
            (1, 0, 1.0),
            (1, 1, 1.0),
            (2, 0, 2.0),
            (2, 2, 3.0),
        ],
    );
    let err = lu::decompose(&a).unwrap_err();
    match err {
        SolverError::SingularPivot { row, pivot } => {
            assert_eq!(row, 0);
            assert_eq!(pivot, 0.0);
        }
        other => panic!("expected SingularPivot, got {other:?}"),
    }
}

#[test]
fn test_lu_rejects_non_identity_permutation() {
    let a = random_diag_dominant_csr(4, 0.5, 1);
    let b = vec![1.0; 4];
    let solver = SparseSolver::new(&a, &b).unwrap();
    let lu = solver.lu_decompose().unwrap();
    let mut x = vec![0.0; 4];

    for perm in [vec![3, 2, 1, 0], vec![0, 1, 2], vec![0, 0, 1, 2], vec![0, 1, 2, 4]] {
        let err = solver.lu_solve(&lu, &perm, &mut x).unwrap_err();
        assert!(
            matches!(
                err,
                SolverError::InvalidInput(ValidationError::UnsupportedPermutation(_))
            ),
            "perm {perm:?} gave {err:?}"
        );
    }
}

#[test]
fn test_lu_wrong_solution_length() {
    let a = CsrMatrix::<f64>::identity(3);
    let lu = lu::decompose(&a).unwrap();
    let mut x = vec![0.0; 2];
    assert!(matches!(
        lu.solve(&[1.0, 1.0, 1.0], &mut x),
        Err(SolverError::InvalidInput(ValidationError::DimensionMismatch(_)))
    ));
}
