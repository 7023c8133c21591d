//! Error types for the solver crate.
//!
//! Provides structured error variants for invalid inputs and for the fatal
//! numerical conditions each algorithm can hit (zero diagonal, singular
//! pivot, loss of positive-definiteness). All errors implement
//! `std::error::Error` via `thiserror`.
//!
//! Running out of iterations is deliberately *not* an error: iterative
//! solvers return a [`SolveReport`](crate::types::SolveReport) with
//! `converged == false` and leave the best iterate in the caller's buffer.

/// Primary error type for solver operations.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// The caller supplied invalid input (dimensions, parameters, etc.).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// A stationary method found a zero (or structurally missing) diagonal
    /// entry and cannot divide by it.
    #[error("zero diagonal entry in row {row}")]
    ZeroDiagonal {
        /// Row whose diagonal entry is zero.
        row: usize,
    },

    /// LU elimination reached a zero or near-zero pivot. Without pivoting
    /// there is no way to continue.
    #[error("singular pivot {pivot:.3e} in row {row}; LU without pivoting cannot proceed")]
    SingularPivot {
        /// Pivot row.
        row: usize,
        /// Offending pivot value.
        pivot: f64,
    },

    /// Cholesky found a non-positive value under the square root.
    #[error("matrix is not positive definite: pivot radicand {value:.3e} in row {row}")]
    NotPositiveDefinite {
        /// Row at which the factorisation broke down.
        row: usize,
        /// The radicand `a_kk - sum(r_jk^2)`.
        value: f64,
    },

    /// A numerical instability was detected (NaN, Inf, or a CG breakdown).
    #[error("numerical instability at iteration {iteration}: {detail}")]
    NumericalInstability {
        /// Iteration at which the instability was detected.
        iteration: usize,
        /// Human-readable explanation.
        detail: String,
    },
}

/// Validation errors for solver inputs.
///
/// These are raised eagerly before any computation begins so that callers get
/// clear diagnostics rather than mysterious numerical failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Matrix or vector dimensions are inconsistent.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// An operation that needs a square matrix got a rectangular one.
    #[error("matrix must be square but is {rows}x{cols}")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// A matrix was declared with a zero dimension.
    #[error("matrix dimensions must be positive, got {rows}x{cols}")]
    EmptyMatrix {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// A value is NaN or infinite where a finite number is required.
    #[error("non-finite value detected: {0}")]
    NonFiniteValue(String),

    /// A column index is out of bounds for the declared number of columns.
    #[error("column index {index} out of bounds for {cols} columns (row {row})")]
    IndexOutOfBounds {
        /// Offending column index.
        index: usize,
        /// Row containing the offending entry.
        row: usize,
        /// Declared column count.
        cols: usize,
    },

    /// The `row_ptr` array is not monotonically non-decreasing.
    #[error("row_ptr is not monotonically non-decreasing at position {position}")]
    NonMonotonicRowPtrs {
        /// Position in `row_ptr` where the violation was detected.
        position: usize,
    },

    /// Column indices inside a row are not strictly increasing.
    #[error("column indices in row {row} are not strictly increasing at entry {position}")]
    UnsortedColumns {
        /// Row containing the violation.
        row: usize,
        /// Absolute index into `col_indices`.
        position: usize,
    },

    /// A parameter is outside its valid range.
    #[error("parameter out of range: {name} = {value} (expected {expected})")]
    ParameterOutOfRange {
        /// Name of the parameter.
        name: String,
        /// The invalid value (as a string for flexibility).
        value: String,
        /// Human-readable description of the valid range.
        expected: String,
    },

    /// The row permutation passed to a triangular solve is not usable.
    #[error("unsupported permutation: {0}")]
    UnsupportedPermutation(String),
}
