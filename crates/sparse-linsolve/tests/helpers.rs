//! Shared test helpers for the sparse-linsolve integration test suite.
//!
//! Provides deterministic random matrix generators, a dense reference solver,
//! and floating-point comparison utilities used across all test modules.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sparse_linsolve::csr::CsrMatrix;

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Route `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ---------------------------------------------------------------------------
// Matrix generators
// ---------------------------------------------------------------------------

/// Random symmetric positive-definite CSR matrix from the crate's generator.
pub fn random_spd_csr(n: usize, density: f64, seed: u64) -> CsrMatrix<f64> {
    CsrMatrix::<f64>::random_seeded(n, density, seed).expect("valid generator parameters")
}

/// Random **non-symmetric** strictly diagonally dominant CSR matrix.
///
/// Off-diagonal entries are drawn independently per position from
/// `[-1, 1)`, so the pattern and values differ between `(i, j)` and `(j, i)`.
/// The diagonal is `1 + sum_of_abs_off_diag + u`.
pub fn random_diag_dominant_csr(n: usize, density: f64, seed: u64) -> CsrMatrix<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut entries: Vec<(usize, usize, f64)> = Vec::new();

    for i in 0..n {
        let mut off_diag_sum = 0.0f64;
        for j in 0..n {
            if i != j && rng.gen_bool(density) {
                let val = rng.gen_range(-1.0..1.0);
                entries.push((i, j, val));
                off_diag_sum += f64::abs(val);
            }
        }
        entries.push((i, i, off_diag_sum + 1.0 + rng.gen::<f64>()));
    }

    CsrMatrix::<f64>::from_coo(n, n, entries)
}

/// Symmetric tridiagonal matrix with `diag` on the diagonal and `off` beside it.
pub fn tridiagonal_csr(n: usize, diag: f64, off: f64) -> CsrMatrix<f64> {
    let mut entries = Vec::with_capacity(3 * n);
    for i in 0..n {
        if i > 0 {
            entries.push((i, i - 1, off));
        }
        entries.push((i, i, diag));
        if i + 1 < n {
            entries.push((i, i + 1, off));
        }
    }
    CsrMatrix::<f64>::from_coo(n, n, entries)
}

/// Deterministic random vector with entries in `[-1, 1)`.
pub fn random_vector(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

// ---------------------------------------------------------------------------
// Dense reference solver
// ---------------------------------------------------------------------------

/// Expand a CSR matrix into `Vec<Vec<f64>>` rows.
pub fn to_dense_rows(matrix: &CsrMatrix<f64>) -> Vec<Vec<f64>> {
    let mut dense = vec![vec![0.0f64; matrix.cols]; matrix.rows];
    for (i, row) in dense.iter_mut().enumerate() {
        for (j, &v) in matrix.row_entries(i) {
            row[j] = v;
        }
    }
    dense
}

/// Solve `Ax = b` using dense Gaussian elimination with partial pivoting.
///
/// O(n^3) reference used only on small test problems.
///
/// # Panics
///
/// Panics if the matrix is singular or dimensions are inconsistent.
pub fn dense_solve(matrix: &CsrMatrix<f64>, rhs: &[f64]) -> Vec<f64> {
    let n = matrix.rows;
    assert_eq!(n, matrix.cols, "dense_solve requires a square matrix");
    assert_eq!(rhs.len(), n, "rhs length must match matrix dimension");

    // Augmented matrix [A | b].
    let mut aug = to_dense_rows(matrix);
    for (row, &b) in aug.iter_mut().zip(rhs) {
        row.push(b);
    }

    for col in 0..n {
        let mut max_row = col;
        let mut max_val = aug[col][col].abs();
        for row in (col + 1)..n {
            if aug[row][col].abs() > max_val {
                max_val = aug[row][col].abs();
                max_row = row;
            }
        }
        assert!(max_val > 1e-15, "matrix is singular or near-singular");
        aug.swap(col, max_row);

        let pivot = aug[col][col];
        for row in (col + 1)..n {
            let factor = aug[row][col] / pivot;
            for j in col..=n {
                aug[row][j] -= factor * aug[col][j];
            }
        }
    }

    let mut x = vec![0.0f64; n];
    for i in (0..n).rev() {
        let mut sum = aug[i][n];
        for j in (i + 1)..n {
            sum -= aug[i][j] * x[j];
        }
        x[i] = sum / aug[i][i];
    }
    x
}

// ---------------------------------------------------------------------------
// Floating-point comparison utilities
// ---------------------------------------------------------------------------

/// L2 norm of a vector.
pub fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|&x| x * x).sum::<f64>().sqrt()
}

/// L2 distance between two vectors.
pub fn l2_distance(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "vectors must have same length");
    a.iter()
        .zip(b.iter())
        .map(|(&ai, &bi)| (ai - bi) * (ai - bi))
        .sum::<f64>()
        .sqrt()
}

/// Relative error `||approx - exact|| / ||exact||` (absolute if `exact == 0`).
pub fn relative_error(approx: &[f64], exact: &[f64]) -> f64 {
    let exact_norm = l2_norm(exact);
    let error = l2_distance(approx, exact);
    if exact_norm > 1e-15 {
        error / exact_norm
    } else {
        error
    }
}

/// Residual vector `b - A x`, computed independently of the crate's kernels.
pub fn compute_residual(matrix: &CsrMatrix<f64>, x: &[f64], rhs: &[f64]) -> Vec<f64> {
    to_dense_rows(matrix)
        .iter()
        .zip(rhs)
        .map(|(row, &b)| b - row.iter().zip(x).map(|(a, xi)| a * xi).sum::<f64>())
        .collect()
}
