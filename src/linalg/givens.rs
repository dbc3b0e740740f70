//! Givens rotations, used to patch a QR factorization after a rank-1
//! update without refactorizing from scratch.

use crate::traits::{FloatScalar, MatrixMut};

/// Compute a rotation `(c, s)` that zeroes `b` when applied to `(a, b)`.
///
/// Branches on the larger magnitude so the intermediate ratio never
/// overflows.
pub fn create_givens<T: FloatScalar>(a: T, b: T) -> (T, T) {
    if b == T::zero() {
        (T::one(), T::zero())
    } else if b.abs() > a.abs() {
        let t = -a / b;
        let s1 = T::one() / (T::one() + t * t).sqrt();
        (s1 * t, s1)
    } else {
        let t = -b / a;
        let c1 = T::one() / (T::one() + t * t).sqrt();
        (c1, c1 * t)
    }
}

/// Rotate entries `i` and `j` of the vector `v`.
pub fn apply_givens_vec<T: FloatScalar>(v: &mut [T], i: usize, j: usize, c: T, s: T) {
    let vi = v[i];
    let vj = v[j];
    v[i] = c * vi - s * vj;
    v[j] = s * vi + c * vj;
}

/// Apply a rotation in rows `i`, `j` to a QR pair: columns `i`, `j` of `Q`
/// and rows `i`, `j` of `R` are rotated together, preserving `Q R`.
pub fn apply_givens_qr<T: FloatScalar>(
    q: &mut impl MatrixMut<T>,
    r: &mut impl MatrixMut<T>,
    i: usize,
    j: usize,
    c: T,
    s: T,
) {
    for k in 0..q.nrows() {
        let qki = *q.get(k, i);
        let qkj = *q.get(k, j);
        *q.get_mut(k, i) = qki * c - qkj * s;
        *q.get_mut(k, j) = qki * s + qkj * c;
    }
    for k in i.min(j)..r.ncols() {
        let rik = *r.get(i, k);
        let rjk = *r.get(j, k);
        *r.get_mut(i, k) = c * rik - s * rjk;
        *r.get_mut(j, k) = s * rik + c * rjk;
    }
}
