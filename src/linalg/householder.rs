//! Householder reflector primitives.
//!
//! A reflector is stored packed: `v[0]` holds the value the reflected
//! vector takes in its first slot, the remaining entries hold the
//! essential part of the Householder vector (the implicit leading 1 is
//! never stored). The scalar coefficient `tau` returned by
//! [`householder_transform`] completes the representation
//! `H = I - tau * v * v^T`.

use crate::traits::{FloatScalar, MatrixMut};

/// Compute a Householder reflector in place.
///
/// On return `v[0]` holds `beta = -sign(v[0]) * ||v||` and `v[1..]` holds
/// the essential part of the Householder vector. Returns the coefficient
/// `tau`; a zero tail yields `tau = 0` and leaves `v` untouched, so the
/// reflector degenerates to the identity.
pub fn householder_transform<T: FloatScalar>(v: &mut [T]) -> T {
    let n = v.len();
    if n == 1 {
        return T::zero();
    }

    let alpha = v[0];
    let mut xnorm = T::zero();
    for vi in v[1..].iter() {
        xnorm = xnorm.hypot(*vi);
    }
    if xnorm == T::zero() {
        return T::zero();
    }

    let beta = -sign(alpha) * alpha.hypot(xnorm);
    let tau = (beta - alpha) / beta;

    let scale = T::one() / (alpha - beta);
    for vi in v[1..].iter_mut() {
        *vi = *vi * scale;
    }
    v[0] = beta;

    tau
}

/// Apply the reflector `(tau, v)` to the trailing block of `a` starting at
/// `(row0, col0)`: `A' = (I - tau v v^T) A` restricted to that block.
///
/// `v[0]` is ignored (the implicit 1); `v.len()` must equal
/// `a.nrows() - row0`.
pub fn householder_hm<T: FloatScalar>(
    tau: T,
    v: &[T],
    a: &mut impl MatrixMut<T>,
    row0: usize,
    col0: usize,
) {
    if tau == T::zero() {
        return;
    }
    let m = a.nrows() - row0;
    debug_assert_eq!(v.len(), m);

    for j in col0..a.ncols() {
        // w_j = v^T a[.., j]
        let mut wj = *a.get(row0, j);
        for i in 1..m {
            wj = wj + v[i] * *a.get(row0 + i, j);
        }
        let twj = tau * wj;
        *a.get_mut(row0, j) = *a.get(row0, j) - twj;
        for i in 1..m {
            *a.get_mut(row0 + i, j) = *a.get(row0 + i, j) - v[i] * twj;
        }
    }
}

/// Apply the reflector `(tau, v)` to the vector slice `w` in place.
///
/// Same contract as [`householder_hm`] with `w` as a single column;
/// `v[0]` is ignored and `v.len() == w.len()`.
pub fn householder_hv<T: FloatScalar>(tau: T, v: &[T], w: &mut [T]) {
    if tau == T::zero() {
        return;
    }
    let n = w.len();
    debug_assert_eq!(v.len(), n);

    let mut d = w[0];
    for i in 1..n {
        d = d + v[i] * w[i];
    }
    let td = tau * d;
    w[0] = w[0] - td;
    for i in 1..n {
        w[i] = w[i] - v[i] * td;
    }
}

#[inline]
fn sign<T: FloatScalar>(x: T) -> T {
    if x >= T::zero() {
        T::one()
    } else {
        -T::one()
    }
}
