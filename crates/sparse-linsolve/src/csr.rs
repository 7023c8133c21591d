//! Compressed Sparse Row (CSR) matrix.
//!
//! [`CsrMatrix`] owns the three CSR arrays and provides every structural
//! operation the solvers build on: construction, symmetric random
//! generation, sparse matrix-vector products, sparse matrix-matrix products
//! and transposition. Products and transposes always return new matrices;
//! operands are never mutated.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::ValidationError;
use crate::traits::LinearOperator;
use crate::types::Scalar;

/// Compressed Sparse Row (CSR) matrix.
///
/// Stores only non-zero entries for efficient sparse matrix-vector
/// multiplication in O(nnz) time with good cache locality.
///
/// # Layout
///
/// For a matrix with `m` rows and `nnz` non-zeros:
/// - `row_ptr` has length `m + 1`, starts at `0` and ends at `nnz`
/// - `col_indices` and `values` each have length `nnz`
/// - Row `i` spans indices `row_ptr[i]..row_ptr[i+1]`, with column indices
///   strictly increasing inside the span
///
/// The sorted-columns invariant is a precondition of [`CsrMatrix::new`], not
/// something it enforces: unsorted rows silently corrupt products and
/// factorisations. Run
/// [`validate_csr_matrix`](crate::validation::validate_csr_matrix) on
/// untrusted input.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix<T> {
    /// Row pointers: `row_ptr[i]` is the start index in `col_indices`/`values`
    /// for row `i`.
    pub row_ptr: Vec<usize>,
    /// Column indices for each non-zero entry.
    pub col_indices: Vec<usize>,
    /// Values for each non-zero entry.
    pub values: Vec<T>,
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
}

impl<T> CsrMatrix<T> {
    /// Number of stored entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Number of stored entries in a specific row.
    #[inline]
    pub fn row_degree(&self, row: usize) -> usize {
        self.row_ptr[row + 1] - self.row_ptr[row]
    }

    /// `true` if `rows == cols`.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Iterate over `(col_index, &value)` pairs for the given row.
    #[inline]
    pub fn row_entries(&self, row: usize) -> impl Iterator<Item = (usize, &T)> {
        let start = self.row_ptr[row];
        let end = self.row_ptr[row + 1];
        self.col_indices[start..end]
            .iter()
            .copied()
            .zip(self.values[start..end].iter())
    }

    /// Fraction of stored entries: `nnz / (rows * cols)`.
    pub fn density(&self) -> f64 {
        let total = self.rows * self.cols;
        if total == 0 {
            0.0
        } else {
            self.nnz() as f64 / total as f64
        }
    }
}

impl<T: Scalar> CsrMatrix<T> {
    /// Build a CSR matrix from pre-assembled arrays.
    ///
    /// Checks only what can be checked in O(1): positive dimensions,
    /// `row_ptr.len() == rows + 1`, `row_ptr[rows] == values.len()` and
    /// `col_indices.len() == values.len()`. Column indices are **not**
    /// sorted or range-checked here.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] describing the first violated check.
    pub fn new(
        rows: usize,
        cols: usize,
        row_ptr: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self, ValidationError> {
        if rows == 0 || cols == 0 {
            return Err(ValidationError::EmptyMatrix { rows, cols });
        }
        if row_ptr.len() != rows + 1 {
            return Err(ValidationError::DimensionMismatch(format!(
                "row_ptr length {} does not equal rows + 1 = {}",
                row_ptr.len(),
                rows + 1,
            )));
        }
        if row_ptr[rows] != values.len() {
            return Err(ValidationError::DimensionMismatch(format!(
                "row_ptr[rows] = {} does not match nnz = {}",
                row_ptr[rows],
                values.len(),
            )));
        }
        if col_indices.len() != values.len() {
            return Err(ValidationError::DimensionMismatch(format!(
                "col_indices length {} does not match values length {}",
                col_indices.len(),
                values.len(),
            )));
        }

        Ok(Self {
            row_ptr,
            col_indices,
            values,
            rows,
            cols,
        })
    }

    /// Build a CSR matrix from COO (coordinate) triplets.
    ///
    /// Entries are sorted by (row, col) internally and duplicate positions
    /// are summed, so the result always satisfies the sorted-columns
    /// invariant.
    ///
    /// # Panics
    ///
    /// Panics if a row or column index is out of bounds.
    pub fn from_coo(
        rows: usize,
        cols: usize,
        entries: impl IntoIterator<Item = (usize, usize, T)>,
    ) -> Self {
        let mut sorted: Vec<_> = entries.into_iter().collect();
        sorted.sort_unstable_by_key(|(r, c, _)| (*r, *c));

        let mut row_ptr = vec![0usize; rows + 1];
        let mut col_indices: Vec<usize> = Vec::with_capacity(sorted.len());
        let mut values: Vec<T> = Vec::with_capacity(sorted.len());
        let mut last: Option<(usize, usize)> = None;

        for (r, c, v) in sorted {
            assert!(r < rows, "row index {} out of bounds (rows={})", r, rows);
            assert!(c < cols, "col index {} out of bounds (cols={})", c, cols);

            if last == Some((r, c)) {
                if let Some(slot) = values.last_mut() {
                    *slot += v;
                }
                continue;
            }
            row_ptr[r + 1] += 1;
            col_indices.push(c);
            values.push(v);
            last = Some((r, c));
        }
        for i in 1..=rows {
            row_ptr[i] += row_ptr[i - 1];
        }

        Self {
            row_ptr,
            col_indices,
            values,
            rows,
            cols,
        }
    }

    /// Fallible [`from_coo`](Self::from_coo) for untrusted triplets.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::IndexOutOfBounds`] for a column index `>= cols`.
    /// - [`ValidationError::DimensionMismatch`] for a row index `>= rows`.
    pub fn try_from_coo(
        rows: usize,
        cols: usize,
        entries: impl IntoIterator<Item = (usize, usize, T)>,
    ) -> Result<Self, ValidationError> {
        let entries: Vec<_> = entries.into_iter().collect();
        for &(r, c, _) in &entries {
            if r >= rows {
                return Err(ValidationError::DimensionMismatch(format!(
                    "row index {r} out of bounds for {rows} rows",
                )));
            }
            if c >= cols {
                return Err(ValidationError::IndexOutOfBounds {
                    index: c,
                    row: r,
                    cols,
                });
            }
        }
        Ok(Self::from_coo(rows, cols, entries))
    }

    /// Build a square identity matrix of dimension `n`.
    pub fn identity(n: usize) -> Self {
        Self {
            row_ptr: (0..=n).collect(),
            col_indices: (0..n).collect(),
            values: vec![T::one(); n],
            rows: n,
            cols: n,
        }
    }

    /// Generate a random symmetric, strictly diagonally dominant matrix.
    ///
    /// Every unordered off-diagonal pair `(i, j)` is kept with probability
    /// `density`; kept pairs receive one value in `(0, 1]` stored at both
    /// `(i, j)` and `(j, i)`. Each diagonal entry is then set to
    /// `2 * sum(|off-diagonal row entries|) + 1 + u` with `u` in `[0, 1)`,
    /// so the matrix is symmetric positive definite and safe for every
    /// solver in this crate.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `size == 0` or `density` is not in
    /// `[0, 1]`.
    pub fn random<R: Rng + ?Sized>(
        size: usize,
        density: f64,
        rng: &mut R,
    ) -> Result<Self, ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyMatrix { rows: 0, cols: 0 });
        }
        if !(0.0..=1.0).contains(&density) {
            return Err(ValidationError::ParameterOutOfRange {
                name: "density".into(),
                value: density.to_string(),
                expected: "[0.0, 1.0]".into(),
            });
        }

        // Per-row lists. Entries for row i arrive in ascending column order:
        // lower-triangle entries while the outer loop is below i, then the
        // upper-triangle entries when it reaches i.
        let mut off_diag: Vec<Vec<(usize, T)>> = vec![Vec::new(); size];
        for i in 0..size {
            for j in (i + 1)..size {
                if rng.gen_bool(density) {
                    let v = T::one() - rng.gen_range(T::zero()..T::one());
                    off_diag[i].push((j, v));
                    off_diag[j].push((i, v));
                }
            }
        }

        let two = T::one() + T::one();
        let nnz: usize = off_diag.iter().map(Vec::len).sum::<usize>() + size;
        let mut row_ptr = Vec::with_capacity(size + 1);
        let mut col_indices = Vec::with_capacity(nnz);
        let mut values = Vec::with_capacity(nnz);
        row_ptr.push(0);

        for (i, entries) in off_diag.iter().enumerate() {
            let row_sum = entries.iter().fold(T::zero(), |acc, &(_, v)| acc + v.abs());
            let diag = two * row_sum + T::one() + rng.gen_range(T::zero()..T::one());
            let split = entries.partition_point(|&(c, _)| c < i);

            for &(c, v) in &entries[..split] {
                col_indices.push(c);
                values.push(v);
            }
            col_indices.push(i);
            values.push(diag);
            for &(c, v) in &entries[split..] {
                col_indices.push(c);
                values.push(v);
            }
            row_ptr.push(col_indices.len());
        }

        debug!(size, density, nnz = values.len(), "generated random symmetric CSR matrix");

        Ok(Self {
            row_ptr,
            col_indices,
            values,
            rows: size,
            cols: size,
        })
    }

    /// [`random`](Self::random) with a deterministic `StdRng` seed.
    ///
    /// # Errors
    ///
    /// Same as [`random`](Self::random).
    pub fn random_seeded(size: usize, density: f64, seed: u64) -> Result<Self, ValidationError> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::random(size, density, &mut rng)
    }

    /// Sparse matrix-vector multiply: `y = A * x`.
    ///
    /// # Panics
    ///
    /// Debug-asserts that `x.len() >= self.cols` and `y.len() >= self.rows`.
    #[inline]
    pub fn spmv(&self, x: &[T], y: &mut [T]) {
        debug_assert!(
            x.len() >= self.cols,
            "spmv: x.len()={} < cols={}",
            x.len(),
            self.cols,
        );
        debug_assert!(
            y.len() >= self.rows,
            "spmv: y.len()={} < rows={}",
            y.len(),
            self.rows,
        );

        for (i, out) in y.iter_mut().enumerate().take(self.rows) {
            let mut sum = T::zero();
            for idx in self.row_ptr[i]..self.row_ptr[i + 1] {
                sum += self.values[idx] * x[self.col_indices[idx]];
            }
            *out = sum;
        }
    }

    /// Allocating matrix-vector multiply with a length check.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DimensionMismatch`] if `x.len() != cols`.
    pub fn mul_vec(&self, x: &[T]) -> Result<Vec<T>, ValidationError> {
        if x.len() != self.cols {
            return Err(ValidationError::DimensionMismatch(format!(
                "vector length {} does not match matrix columns {}",
                x.len(),
                self.cols,
            )));
        }
        let mut y = vec![T::zero(); self.rows];
        self.spmv(x, &mut y);
        Ok(y)
    }

    /// Sparse matrix-matrix multiply: `C = A * B`.
    ///
    /// Row `i` of `C` is the union of the rows `B[k, :]` selected by the
    /// non-zeros `A[i, k]`. Products are scattered into a dense accumulator
    /// indexed by column, guarded by a marker array so the accumulator is
    /// never cleared in full; the touched columns are then sorted and
    /// emitted. The result's nnz is exact: every structurally reachable
    /// position is kept, even if its value cancels to zero.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DimensionMismatch`] if `A.cols != B.rows`.
    pub fn matmul(&self, other: &CsrMatrix<T>) -> Result<CsrMatrix<T>, ValidationError> {
        if self.cols != other.rows {
            return Err(ValidationError::DimensionMismatch(format!(
                "cannot multiply {}x{} by {}x{}",
                self.rows, self.cols, other.rows, other.cols,
            )));
        }

        let out_cols = other.cols;
        let mut row_ptr = Vec::with_capacity(self.rows + 1);
        let mut col_indices = Vec::new();
        let mut values = Vec::new();
        row_ptr.push(0);

        let mut accumulator = vec![T::zero(); out_cols];
        let mut marker = vec![usize::MAX; out_cols];
        let mut pattern: Vec<usize> = Vec::new();

        for i in 0..self.rows {
            pattern.clear();
            for (k, &a_ik) in self.row_entries(i) {
                for (j, &b_kj) in other.row_entries(k) {
                    if marker[j] != i {
                        marker[j] = i;
                        accumulator[j] = T::zero();
                        pattern.push(j);
                    }
                    accumulator[j] += a_ik * b_kj;
                }
            }

            pattern.sort_unstable();
            for &j in &pattern {
                col_indices.push(j);
                values.push(accumulator[j]);
            }
            row_ptr.push(col_indices.len());
        }

        debug!(
            rows = self.rows,
            cols = out_cols,
            nnz_a = self.nnz(),
            nnz_b = other.nnz(),
            nnz_c = values.len(),
            "sparse matmul",
        );

        Ok(CsrMatrix {
            row_ptr,
            col_indices,
            values,
            rows: self.rows,
            cols: out_cols,
        })
    }

    /// Transpose: produces `A^T` in CSR form.
    ///
    /// Uses a two-pass counting sort in O(nnz + rows + cols) time. The
    /// scatter pass visits source rows in increasing order, so every row of
    /// the result has sorted column indices.
    pub fn transpose(&self) -> CsrMatrix<T> {
        let nnz = self.nnz();
        let t_rows = self.cols;
        let t_cols = self.rows;

        // Pass 1: count entries per new row (= old column).
        let mut row_ptr = vec![0usize; t_rows + 1];
        for &c in &self.col_indices {
            row_ptr[c + 1] += 1;
        }
        for i in 1..=t_rows {
            row_ptr[i] += row_ptr[i - 1];
        }

        // Pass 2: scatter entries into the transposed arrays.
        let mut col_indices = vec![0usize; nnz];
        let mut values = vec![T::zero(); nnz];
        let mut cursor = row_ptr.clone();

        for row in 0..self.rows {
            for idx in self.row_ptr[row]..self.row_ptr[row + 1] {
                let c = self.col_indices[idx];
                let dest = cursor[c];
                col_indices[dest] = row;
                values[dest] = self.values[idx];
                cursor[c] += 1;
            }
        }

        CsrMatrix {
            row_ptr,
            col_indices,
            values,
            rows: t_rows,
            cols: t_cols,
        }
    }

    /// Value at `(row, col)`, or zero if the position is not stored.
    ///
    /// Binary search over the row, so relies on sorted columns.
    pub fn get(&self, row: usize, col: usize) -> T {
        let start = self.row_ptr[row];
        let end = self.row_ptr[row + 1];
        match self.col_indices[start..end].binary_search(&col) {
            Ok(offset) => self.values[start + offset],
            Err(_) => T::zero(),
        }
    }

    /// Main diagonal (`min(rows, cols)` entries, zero where not stored).
    pub fn diagonal(&self) -> Vec<T> {
        (0..self.rows.min(self.cols)).map(|i| self.get(i, i)).collect()
    }

    /// `true` if the matrix equals its transpose, pattern and values.
    pub fn is_symmetric(&self) -> bool {
        self.is_square() && *self == self.transpose()
    }

    /// Expand into a row-major dense matrix.
    #[cfg(feature = "dense")]
    pub fn to_dense(&self) -> crate::dense::DenseMatrix<T> {
        let mut dense = crate::dense::DenseMatrix::zeros(self.rows, self.cols);
        for row in 0..self.rows {
            for (col, &v) in self.row_entries(row) {
                dense.set(row, col, v);
            }
        }
        dense
    }
}

impl<T: Scalar> LinearOperator<T> for CsrMatrix<T> {
    #[inline]
    fn nrows(&self) -> usize {
        self.rows
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn apply(&self, x: &[T], y: &mut [T]) {
        self.spmv(x, y);
    }
}
