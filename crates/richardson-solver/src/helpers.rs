//! Vector kernels used by the row sweeps.

use crate::scalar::Real;

/// Dot product of a matrix row with a vector.
///
/// Accumulates left to right, so the value for a given row does not depend on
/// how rows are distributed over workers.
#[inline]
pub fn dot<T: Real>(row: &[T], x: &[T]) -> T {
    debug_assert_eq!(row.len(), x.len());
    row.iter()
        .zip(x.iter())
        .fold(T::zero(), |acc, (&a, &xj)| acc + a * xj)
}

/// Euclidean norm of a vector.
pub fn vec_norm<T: Real>(v: &[T]) -> T {
    v.iter().map(|&vi| vi * vi).sum::<T>().sqrt()
}
