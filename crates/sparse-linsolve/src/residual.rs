//! Vector kernels and the residual evaluator.
//!
//! Every iterative solver uses [`residual_into`] as its stopping test, and the
//! direct-solver tests use [`residual_norm`] to check their answers. None of
//! these functions mutate the operator, `x`, or `b`.

use crate::traits::LinearOperator;
use crate::types::Scalar;

// ---------------------------------------------------------------------------
// Vector kernels
// ---------------------------------------------------------------------------

/// Dot product with a 4-wide accumulator.
///
/// Splitting the sum over four independent accumulators shortens the
/// dependency chain and keeps the rounding error of long sums in check.
///
/// # Panics
///
/// Panics if `a.len() != b.len()`.
#[inline]
pub fn dot<T: Scalar>(a: &[T], b: &[T]) -> T {
    assert_eq!(a.len(), b.len(), "dot: length mismatch");

    let n = a.len();
    let chunks = n / 4;

    let mut acc0 = T::zero();
    let mut acc1 = T::zero();
    let mut acc2 = T::zero();
    let mut acc3 = T::zero();

    for i in 0..chunks {
        let j = i * 4;
        acc0 += a[j] * b[j];
        acc1 += a[j + 1] * b[j + 1];
        acc2 += a[j + 2] * b[j + 2];
        acc3 += a[j + 3] * b[j + 3];
    }
    for j in (chunks * 4)..n {
        acc0 += a[j] * b[j];
    }

    (acc0 + acc1) + (acc2 + acc3)
}

/// `y[i] += alpha * x[i]` for all `i`.
///
/// # Panics
///
/// Panics if `x.len() != y.len()`.
#[inline]
pub fn axpy<T: Scalar>(alpha: T, x: &[T], y: &mut [T]) {
    assert_eq!(x.len(), y.len(), "axpy: length mismatch");
    for (yi, &xi) in y.iter_mut().zip(x.iter()) {
        *yi += alpha * xi;
    }
}

/// Euclidean norm `||x||_2`.
#[inline]
pub fn norm2<T: Scalar>(x: &[T]) -> T {
    dot(x, x).sqrt()
}

// ---------------------------------------------------------------------------
// Residual
// ---------------------------------------------------------------------------

/// Compute `||A x - b||_2`.
///
/// Allocates one scratch vector for `A x`. Use [`residual_into`] inside loops.
///
/// # Panics
///
/// Panics if `x.len() != op.ncols()` or `b.len() != op.nrows()`.
///
/// # Examples
///
/// ```
/// use sparse_linsolve::csr::CsrMatrix;
/// use sparse_linsolve::residual::residual_norm;
///
/// let a = CsrMatrix::<f64>::identity(2);
/// assert_eq!(residual_norm(&a, &[3.0, 4.0], &[0.0, 0.0]), 5.0);
/// ```
pub fn residual_norm<T, A>(op: &A, x: &[T], b: &[T]) -> f64
where
    T: Scalar,
    A: LinearOperator<T> + ?Sized,
{
    let mut ax = vec![T::zero(); op.nrows()];
    residual_into(op, x, b, &mut ax)
}

/// Compute `||A x - b||_2`, leaving `A x` in `ax`.
///
/// `ax` is the caller's scratch buffer; after the call it holds the estimate
/// of `b` produced by the current `x`, which is handy for diagnostics.
///
/// # Panics
///
/// Panics if `x.len() != op.ncols()`, or if `b` or `ax` do not have length
/// `op.nrows()`.
pub fn residual_into<T, A>(op: &A, x: &[T], b: &[T], ax: &mut [T]) -> f64
where
    T: Scalar,
    A: LinearOperator<T> + ?Sized,
{
    assert_eq!(x.len(), op.ncols(), "residual: x length mismatch");
    assert_eq!(b.len(), op.nrows(), "residual: b length mismatch");
    assert_eq!(ax.len(), op.nrows(), "residual: ax length mismatch");

    op.apply(x, ax);

    let mut sum = 0.0f64;
    for (&axi, &bi) in ax.iter().zip(b.iter()) {
        let d = (axi - bi).to_f64_lossy();
        sum += d * d;
    }
    sum.sqrt()
}
