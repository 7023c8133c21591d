//! Dense solvers must agree with their sparse counterparts.

#![cfg(feature = "dense")]

mod helpers;

use approx::assert_relative_eq;
use sparse_linsolve::dense::{DenseMatrix, DenseSolver};
use sparse_linsolve::error::{SolverError, ValidationError};
use sparse_linsolve::solver::SparseSolver;
use sparse_linsolve::types::SolveOptions;

use helpers::{init_tracing, random_diag_dominant_csr, random_spd_csr, random_vector, relative_error};

fn fixture_4x4() -> DenseMatrix<f64> {
    DenseMatrix::new(
        4,
        4,
        vec![
            10.0, 2.0, 3.0, 5.0, //
            1.0, 14.0, 6.0, 2.0, //
            -1.0, 4.0, 16.0, -4.0, //
            5.0, 4.0, 3.0, 11.0,
        ],
    )
    .unwrap()
}

#[test]
fn test_dense_residual_fixture() {
    let a = fixture_4x4();
    // b = A * [1, 2, -3, 2]
    let b = vec![15.0, 15.0, -49.0, 26.0];
    let solver = DenseSolver::new(&a, &b).unwrap();

    assert_eq!(solver.residual(&[1.0, 2.0, -3.0, 2.0]).unwrap(), 0.0);
    // A * [0, -1, 1, 0] = [1, -8, 12, -1]
    assert_relative_eq!(
        solver.residual(&[1.0, 1.0, -2.0, 2.0]).unwrap(),
        210f64.sqrt(),
        epsilon = 1e-12
    );
}

#[test]
fn test_dense_lu_matches_sparse_lu() {
    init_tracing();
    let n = 30;
    let sparse = random_diag_dominant_csr(n, 0.2, 4);
    let dense = DenseMatrix::from_csr(&sparse);
    let b = random_vector(n, 5);

    let ss = SparseSolver::new(&sparse, &b).unwrap();
    let mut xs = vec![0.0; n];
    let lu = ss.lu_decompose().unwrap();
    ss.lu_solve_with_rhs(&lu, &b, &mut xs).unwrap();

    let ds = DenseSolver::new(&dense, &b).unwrap();
    let dlu = ds.lu_decompose().unwrap();
    let perm: Vec<usize> = (0..n).collect();
    let mut xd = vec![0.0; n];
    ds.lu_solve(&dlu, &perm, &mut xd).unwrap();

    assert!(relative_error(&xs, &xd) < 1e-10);
    for i in 0..n {
        for j in 0..n {
            assert_relative_eq!(dlu.l.get(i, j), lu.l.get(i, j), epsilon = 1e-10);
            assert_relative_eq!(dlu.u.get(i, j), lu.u.get(i, j), epsilon = 1e-10);
        }
    }
}

#[test]
fn test_dense_cholesky_matches_sparse_cholesky() {
    let n = 25;
    let sparse = random_spd_csr(n, 0.2, 9);
    let dense = DenseMatrix::from_csr(&sparse);
    let b = random_vector(n, 10);

    let ss = SparseSolver::new(&sparse, &b).unwrap();
    let r = ss.cholesky_decompose().unwrap();
    let mut xs = vec![0.0; n];
    ss.cholesky_solve(&r, &mut xs).unwrap();

    let ds = DenseSolver::new(&dense, &b).unwrap();
    let dr = ds.cholesky_decompose().unwrap();
    let mut xd = vec![0.0; n];
    ds.cholesky_solve(&dr, &mut xd).unwrap();

    assert!(relative_error(&xs, &xd) < 1e-10);
    for i in 0..n {
        for j in 0..n {
            assert_relative_eq!(dr.r.get(i, j), r.r.get(i, j), epsilon = 1e-10);
        }
    }
}

#[test]
fn test_dense_iterative_matches_sparse_iterative() {
    let n = 20;
    let sparse = random_spd_csr(n, 0.3, 21);
    let dense = DenseMatrix::from_csr(&sparse);
    let b = random_vector(n, 22);
    let opts = SolveOptions::new(1e-10, 2000);

    let ss = SparseSolver::new(&sparse, &b).unwrap();
    let ds = DenseSolver::new(&dense, &b).unwrap();

    let mut xs = vec![0.0; n];
    let rs = ss.gauss_seidel(&mut xs, &opts).unwrap();
    let mut xd = vec![0.0; n];
    let rd = ds.gauss_seidel(&mut xd, &opts).unwrap();
    assert!(rs.converged && rd.converged);
    assert!(rs.iterations.abs_diff(rd.iterations) <= 1);
    assert!(relative_error(&xs, &xd) < 1e-9);

    let mut xs = vec![0.0; n];
    ss.jacobi(&mut xs, &opts).unwrap();
    let mut xd = vec![0.0; n];
    ds.jacobi(&mut xd, &opts).unwrap();
    assert!(relative_error(&xs, &xd) < 1e-9);

    let mut xs = vec![0.0; n];
    ss.conjugate_gradient(&mut xs, &opts).unwrap();
    let mut xd = vec![0.0; n];
    ds.conjugate_gradient(&mut xd, &opts).unwrap();
    assert!(relative_error(&xs, &xd) < 1e-9);
}

#[test]
fn test_dense_random_generator_is_symmetric_and_dominant() {
    for seed in 0..4 {
        let m = DenseMatrix::<f64>::random_seeded(12, seed).unwrap();
        assert_eq!(m.transpose(), m);
        for i in 0..12 {
            let off: f64 = (0..12).filter(|&j| j != i).map(|j| m.get(i, j).abs()).sum();
            assert!(m.get(i, i) > 2.0 * off);
        }
    }
    assert!(DenseMatrix::<f64>::random_seeded(0, 1).is_err());
}

#[test]
fn test_dense_zero_diagonal() {
    let a = DenseMatrix::new(2, 2, vec![1.0, 2.0, 3.0, 0.0]).unwrap();
    let b = vec![1.0, 1.0];
    let solver = DenseSolver::new(&a, &b).unwrap();
    let mut x = vec![0.0; 2];
    assert!(matches!(
        solver.jacobi(&mut x, &SolveOptions::default()),
        Err(SolverError::ZeroDiagonal { row: 1 })
    ));
}

#[test]
fn test_dense_rejects_rectangular() {
    let a = DenseMatrix::new(2, 3, vec![1.0; 6]).unwrap();
    let b = vec![1.0, 1.0];
    assert!(matches!(
        DenseSolver::new(&a, &b),
        Err(SolverError::InvalidInput(_))
    ));
}

#[test]
fn test_dense_residual_wrong_length() {
    let a = fixture_4x4();
    let b = vec![1.0; 4];
    let solver = DenseSolver::new(&a, &b).unwrap();
    assert!(matches!(
        solver.residual(&[1.0, 2.0]),
        Err(SolverError::InvalidInput(ValidationError::DimensionMismatch(_)))
    ));
}
