//! Row-major dense matrix.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::csr::CsrMatrix;
use crate::error::ValidationError;
use crate::traits::LinearOperator;
use crate::types::Scalar;
use crate::validation::check_dimensions;

/// Dense `rows x cols` matrix stored row-major in `values`.
///
/// Element `(i, j)` lives at `values[i * cols + j]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix<T> {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// Row-major storage, length `rows * cols`.
    pub values: Vec<T>,
}

impl<T: Scalar> DenseMatrix<T> {
    /// Wrap an existing row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if a dimension is zero or
    /// `values.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, values: Vec<T>) -> Result<Self, ValidationError> {
        if rows == 0 || cols == 0 {
            return Err(ValidationError::EmptyMatrix { rows, cols });
        }
        if values.len() != rows * cols {
            return Err(ValidationError::DimensionMismatch(format!(
                "buffer of length {} cannot hold a {}x{} matrix",
                values.len(),
                rows,
                cols,
            )));
        }
        Ok(Self { rows, cols, values })
    }

    /// All-zero matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: vec![T::zero(); rows * cols],
        }
    }

    /// `n x n` identity.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.values[i * n + i] = T::one();
        }
        m
    }

    /// Expand a CSR matrix.
    pub fn from_csr(csr: &CsrMatrix<T>) -> Self {
        csr.to_dense()
    }

    /// Random symmetric, strictly diagonally dominant `size x size` matrix.
    ///
    /// Off-diagonal entries are drawn from `(0, 1]` and mirrored; each
    /// diagonal entry is `2 * sum(|off-diagonal row entries|) + 1 + u` with
    /// `u` in `[0, 1)`. The same construction as
    /// [`CsrMatrix::random`] at density `1.0`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyMatrix`] if `size == 0`.
    pub fn random_diagonally_dominant<R: Rng + ?Sized>(
        size: usize,
        rng: &mut R,
    ) -> Result<Self, ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyMatrix { rows: 0, cols: 0 });
        }

        let mut m = Self::zeros(size, size);
        for i in 0..size {
            for j in (i + 1)..size {
                let v = T::one() - rng.gen_range(T::zero()..T::one());
                m.values[i * size + j] = v;
                m.values[j * size + i] = v;
            }
        }

        let two = T::one() + T::one();
        for i in 0..size {
            let row = &m.values[i * size..(i + 1) * size];
            let off: T = row
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, v)| v.abs())
                .sum();
            m.values[i * size + i] = two * off + T::one() + rng.gen_range(T::zero()..T::one());
        }
        Ok(m)
    }

    /// [`random_diagonally_dominant`](Self::random_diagonally_dominant) with a
    /// deterministic seed.
    ///
    /// # Errors
    ///
    /// Same as [`random_diagonally_dominant`](Self::random_diagonally_dominant).
    pub fn random_seeded(size: usize, seed: u64) -> Result<Self, ValidationError> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::random_diagonally_dominant(size, &mut rng)
    }

    /// Element `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the position is out of range.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        assert!(row < self.rows && col < self.cols, "({row}, {col}) out of range");
        self.values[row * self.cols + col]
    }

    /// Overwrite element `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the position is out of range.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        assert!(row < self.rows && col < self.cols, "({row}, {col}) out of range");
        self.values[row * self.cols + col] = value;
    }

    /// Row `i` as a slice.
    #[inline]
    pub fn row(&self, i: usize) -> &[T] {
        &self.values[i * self.cols..(i + 1) * self.cols]
    }

    /// `true` if `rows == cols`.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Matrix-vector product `A x`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DimensionMismatch`] if `x.len() != cols`.
    pub fn mat_vec(&self, x: &[T]) -> Result<Vec<T>, ValidationError> {
        check_dimensions(self.rows, self.cols, x.len())?;
        let mut y = vec![T::zero(); self.rows];
        self.apply(x, &mut y);
        Ok(y)
    }

    /// Matrix-matrix product `A B` (IKJ loop order).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DimensionMismatch`] if `A.cols != B.rows`.
    pub fn mat_mul(&self, other: &DenseMatrix<T>) -> Result<DenseMatrix<T>, ValidationError> {
        if self.cols != other.rows {
            return Err(ValidationError::DimensionMismatch(format!(
                "cannot multiply {}x{} by {}x{}",
                self.rows, self.cols, other.rows, other.cols,
            )));
        }

        let mut out = Self::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a_ik = self.values[i * self.cols + k];
                if a_ik == T::zero() {
                    continue;
                }
                let b_row = other.row(k);
                let out_row = &mut out.values[i * other.cols..(i + 1) * other.cols];
                for (o, &b_kj) in out_row.iter_mut().zip(b_row) {
                    *o += a_ik * b_kj;
                }
            }
        }
        Ok(out)
    }

    /// Transposed copy.
    pub fn transpose(&self) -> DenseMatrix<T> {
        let mut t = Self::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                t.values[j * self.rows + i] = self.values[i * self.cols + j];
            }
        }
        t
    }
}

impl<T: Scalar> LinearOperator<T> for DenseMatrix<T> {
    #[inline]
    fn nrows(&self) -> usize {
        self.rows
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.cols
    }

    fn apply(&self, x: &[T], y: &mut [T]) {
        for (i, out) in y.iter_mut().enumerate().take(self.rows) {
            let row = &self.values[i * self.cols..(i + 1) * self.cols];
            *out = row.iter().zip(x).map(|(&a, &xj)| a * xj).sum();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> DenseMatrix<f64> {
        DenseMatrix::new(
            4,
            4,
            vec![
                1.0, 2.0, 3.0, 4.0, -4.0, -3.0, -2.0, -1.0, 0.0, 1.0, 2.0, 0.0, 1.0, 2.0, 3.0, 4.0,
            ],
        )
        .unwrap()
    }

    #[test]
    fn mat_vec_known_product() {
        let y = fixture().mat_vec(&[1.0, 2.0, -3.0, 2.0]).unwrap();
        assert_eq!(y, vec![4.0, -6.0, -4.0, 4.0]);
    }

    #[test]
    fn mat_vec_rejects_wrong_length() {
        assert!(fixture().mat_vec(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn identity_is_neutral_for_mat_mul() {
        let a = fixture();
        let i = DenseMatrix::identity(4);
        assert_eq!(a.mat_mul(&i).unwrap(), a);
        assert_eq!(i.mat_mul(&a).unwrap(), a);
    }

    #[test]
    fn mat_mul_rectangular() {
        // [1 2 3] * [1; 0; -1] = [-2]
        let a = DenseMatrix::new(1, 3, vec![1.0f64, 2.0, 3.0]).unwrap();
        let b = DenseMatrix::new(3, 1, vec![1.0f64, 0.0, -1.0]).unwrap();
        let c = a.mat_mul(&b).unwrap();
        assert_eq!((c.rows, c.cols), (1, 1));
        assert_eq!(c.values, vec![-2.0]);
        assert!(b.mat_mul(&b).is_err());
    }

    #[test]
    fn new_checks_buffer_length() {
        assert!(DenseMatrix::new(2, 2, vec![1.0f64; 3]).is_err());
        assert!(DenseMatrix::<f64>::new(0, 2, vec![]).is_err());
    }

    #[test]
    fn random_is_symmetric_and_dominant() {
        let m = DenseMatrix::<f64>::random_seeded(8, 3).unwrap();
        assert_eq!(m.transpose(), m);
        for i in 0..8 {
            let off: f64 = (0..8).filter(|&j| j != i).map(|j| m.get(i, j).abs()).sum();
            assert!(m.get(i, i) > off);
        }
    }

    #[test]
    fn from_csr_expands_pattern() {
        let csr = CsrMatrix::<f64>::from_coo(2, 3, vec![(0, 2, 5.0), (1, 0, -1.0)]);
        let d = DenseMatrix::from_csr(&csr);
        assert_eq!(d.values, vec![0.0, 0.0, 5.0, -1.0, 0.0, 0.0]);
    }
}
