//! Input validation for solver operations.
//!
//! All validation functions run eagerly before any computation begins, so
//! callers receive clear diagnostics instead of corrupted results. Every
//! function returns [`ValidationError`] on failure, which converts into
//! [`SolverError::InvalidInput`](crate::error::SolverError::InvalidInput)
//! via `From`.

use crate::error::ValidationError;
use crate::csr::CsrMatrix;
use crate::types::{Scalar, SolveOptions};

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Maximum solver iterations to prevent runaway computation.
pub const MAX_ITERATIONS: usize = 1_000_000;

// ---------------------------------------------------------------------------
// CSR matrix validation
// ---------------------------------------------------------------------------

/// Validate the full structural integrity of a CSR matrix.
///
/// Performs the following checks in order:
///
/// 1. `rows` and `cols` are positive.
/// 2. `row_ptr` length equals `rows + 1`.
/// 3. `row_ptr` is monotonically non-decreasing.
/// 4. `row_ptr[0] == 0` and `row_ptr[rows] == nnz`.
/// 5. `col_indices` length equals `values` length.
/// 6. All column indices are less than `cols`.
/// 7. Column indices are strictly increasing within each row.
/// 8. No `NaN` or `Inf` values.
///
/// # Errors
///
/// Returns [`ValidationError`] describing the first violation found.
///
/// # Examples
///
/// ```
/// use sparse_linsolve::csr::CsrMatrix;
/// use sparse_linsolve::validation::validate_csr_matrix;
///
/// let m = CsrMatrix::<f64>::from_coo(2, 2, vec![(0, 0, 1.0), (1, 1, 2.0)]);
/// assert!(validate_csr_matrix(&m).is_ok());
/// ```
pub fn validate_csr_matrix<T: Scalar>(matrix: &CsrMatrix<T>) -> Result<(), ValidationError> {
    // 1. Dimensions
    if matrix.rows == 0 || matrix.cols == 0 {
        return Err(ValidationError::EmptyMatrix {
            rows: matrix.rows,
            cols: matrix.cols,
        });
    }

    // 2. row_ptr length
    let expected_row_ptr_len = matrix.rows + 1;
    if matrix.row_ptr.len() != expected_row_ptr_len {
        return Err(ValidationError::DimensionMismatch(format!(
            "row_ptr length {} does not equal rows + 1 = {}",
            matrix.row_ptr.len(),
            expected_row_ptr_len,
        )));
    }

    // 3. row_ptr monotonicity
    for i in 1..matrix.row_ptr.len() {
        if matrix.row_ptr[i] < matrix.row_ptr[i - 1] {
            return Err(ValidationError::NonMonotonicRowPtrs { position: i });
        }
    }

    // 4. row_ptr boundary values
    if matrix.row_ptr[0] != 0 {
        return Err(ValidationError::DimensionMismatch(format!(
            "row_ptr[0] = {} (expected 0)",
            matrix.row_ptr[0],
        )));
    }
    let nnz = matrix.values.len();
    if matrix.row_ptr[matrix.rows] != nnz {
        return Err(ValidationError::DimensionMismatch(format!(
            "values length {} does not match row_ptr[rows] = {}",
            nnz, matrix.row_ptr[matrix.rows],
        )));
    }

    // 5. col_indices length
    if matrix.col_indices.len() != nnz {
        return Err(ValidationError::DimensionMismatch(format!(
            "col_indices length {} does not match values length {}",
            matrix.col_indices.len(),
            nnz,
        )));
    }

    // 6-8. Per-entry checks
    for row in 0..matrix.rows {
        let start = matrix.row_ptr[row];
        let end = matrix.row_ptr[row + 1];

        let mut prev_col: Option<usize> = None;
        for idx in start..end {
            let col = matrix.col_indices[idx];
            if col >= matrix.cols {
                return Err(ValidationError::IndexOutOfBounds {
                    index: col,
                    row,
                    cols: matrix.cols,
                });
            }
            if let Some(pc) = prev_col {
                if col <= pc {
                    return Err(ValidationError::UnsortedColumns {
                        row,
                        position: idx,
                    });
                }
            }
            prev_col = Some(col);

            let val = matrix.values[idx];
            if !val.is_finite() {
                return Err(ValidationError::NonFiniteValue(format!(
                    "matrix[{}, {}] = {}",
                    row, col, val,
                )));
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Dimension checks
// ---------------------------------------------------------------------------

/// Require a square matrix.
///
/// # Errors
///
/// Returns [`ValidationError::NotSquare`] if `rows != cols`.
pub fn validate_square(rows: usize, cols: usize) -> Result<(), ValidationError> {
    if rows != cols {
        return Err(ValidationError::NotSquare { rows, cols });
    }
    Ok(())
}

/// Check that a `rows x cols` matrix can multiply a vector of length `len`.
///
/// # Errors
///
/// Returns [`ValidationError::DimensionMismatch`] if `cols != len`.
pub fn check_dimensions(rows: usize, cols: usize, len: usize) -> Result<(), ValidationError> {
    if cols != len {
        return Err(ValidationError::DimensionMismatch(format!(
            "{rows}x{cols} matrix cannot multiply a vector of length {len}",
        )));
    }
    Ok(())
}

/// Validate a right-hand-side vector for a linear solve.
///
/// Checks that `rhs.len() == expected_len` and that every entry is finite.
/// An all-zero RHS is valid but logged at `warn`, since it usually signals a
/// bug upstream.
///
/// # Errors
///
/// Returns [`ValidationError`] on dimension mismatch or non-finite values.
pub fn validate_rhs<T: Scalar>(rhs: &[T], expected_len: usize) -> Result<(), ValidationError> {
    if rhs.len() != expected_len {
        return Err(ValidationError::DimensionMismatch(format!(
            "rhs length {} does not match expected {}",
            rhs.len(),
            expected_len,
        )));
    }

    let mut all_zero = true;
    for (i, &v) in rhs.iter().enumerate() {
        if !v.is_finite() {
            return Err(ValidationError::NonFiniteValue(format!("rhs[{}] = {}", i, v)));
        }
        if v != T::zero() {
            all_zero = false;
        }
    }

    if all_zero && !rhs.is_empty() {
        tracing::warn!("rhs vector is all zeros; solution will be trivially zero");
    }

    Ok(())
}

/// Validate the length of a caller-supplied solution buffer.
///
/// # Errors
///
/// Returns [`ValidationError::DimensionMismatch`] if `x.len() != n`.
pub fn validate_solution_len<T>(x: &[T], n: usize) -> Result<(), ValidationError> {
    if x.len() != n {
        return Err(ValidationError::DimensionMismatch(format!(
            "solution vector length {} does not match system dimension {}",
            x.len(),
            n,
        )));
    }
    Ok(())
}

/// Validate the rhs and solution buffers handed to a triangular solve.
///
/// # Errors
///
/// Returns [`ValidationError::DimensionMismatch`] unless both `b` and `x`
/// have length `n`.
pub fn validate_solve_lengths<T>(n: usize, b: &[T], x: &[T]) -> Result<(), ValidationError> {
    if b.len() != n || x.len() != n {
        return Err(ValidationError::DimensionMismatch(format!(
            "rhs length {} and solution length {} must both equal {}",
            b.len(),
            x.len(),
            n,
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Solver parameter validation
// ---------------------------------------------------------------------------

/// Validate iterative solver options.
///
/// # Rules
///
/// - `tolerance` must be finite and strictly positive.
/// - `max_iterations` must be in `[1, MAX_ITERATIONS]`.
///
/// # Errors
///
/// Returns [`ValidationError::ParameterOutOfRange`] naming the offending
/// field.
pub fn validate_params(options: &SolveOptions) -> Result<(), ValidationError> {
    if !options.tolerance.is_finite() || options.tolerance <= 0.0 {
        return Err(ValidationError::ParameterOutOfRange {
            name: "tolerance".into(),
            value: format!("{:.2e}", options.tolerance),
            expected: "finite positive value".into(),
        });
    }

    if options.max_iterations == 0 || options.max_iterations > MAX_ITERATIONS {
        return Err(ValidationError::ParameterOutOfRange {
            name: "max_iterations".into(),
            value: options.max_iterations.to_string(),
            expected: format!("[1, {}]", MAX_ITERATIONS),
        });
    }

    Ok(())
}

/// Validate the row permutation handed to an LU triangular solve.
///
/// The permutation must have length `n` and contain every index in `0..n`
/// exactly once. Because the factorisation never pivots, only the identity
/// permutation is consistent with the stored factors; anything else is
/// rejected rather than silently producing a wrong answer.
///
/// # Errors
///
/// Returns [`ValidationError::UnsupportedPermutation`] on any violation.
pub fn validate_permutation(perm: &[usize], n: usize) -> Result<(), ValidationError> {
    if perm.len() != n {
        return Err(ValidationError::UnsupportedPermutation(format!(
            "length {} does not match system dimension {}",
            perm.len(),
            n,
        )));
    }

    let mut seen = vec![false; n];
    for (i, &p) in perm.iter().enumerate() {
        if p >= n || seen[p] {
            return Err(ValidationError::UnsupportedPermutation(format!(
                "entry {} = {} is out of range or repeated",
                i, p,
            )));
        }
        seen[p] = true;
    }

    if let Some(i) = perm.iter().enumerate().position(|(i, &p)| i != p) {
        return Err(ValidationError::UnsupportedPermutation(format!(
            "entry {} = {}; only the identity permutation is supported without pivoting",
            i, perm[i],
        )));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
