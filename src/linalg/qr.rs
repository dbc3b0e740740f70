//! QR factorization by Householder reflections.
//!
//! `A = Q R` for an `M x N` matrix with `M >= N`, packed in place: the
//! upper triangle holds `R`, each subdiagonal column the essential part
//! of a reflector, and a separate `tau` vector the reflector
//! coefficients. Rank-1 updates are handled by Givens sweeps instead of
//! refactorizing.

use alloc::vec;
use alloc::vec::Vec;

use crate::linalg::givens::{apply_givens_qr, apply_givens_vec, create_givens};
use crate::linalg::householder::{householder_hm, householder_hv, householder_transform};
use crate::linalg::{LinalgError, Solver};
use crate::matrix::{Matrix, Vector};
use crate::traits::{FloatScalar, MatrixMut, MatrixRef};

/// Factor an `M x N` matrix (`M >= N`) in place as `A = Q R`.
///
/// `tau` must have length `min(M, N)` and receives the reflector
/// coefficients. Never fails numerically: a zero subcolumn just yields an
/// identity reflector.
pub fn qr_in_place<T: FloatScalar>(
    a: &mut impl MatrixMut<T>,
    tau: &mut [T],
) -> Result<(), LinalgError> {
    let m = a.nrows();
    let n = a.ncols();
    let k = m.min(n);
    if tau.len() != k {
        return Err(LinalgError::BadLength);
    }

    let mut v = vec![T::zero(); m];
    for i in 0..k {
        let v = &mut v[..m - i];
        for (r, vi) in v.iter_mut().enumerate() {
            *vi = *a.get(i + r, i);
        }
        tau[i] = householder_transform(v);
        for (r, vi) in v.iter().enumerate() {
            *a.get_mut(i + r, i) = *vi;
        }
        if i + 1 < n {
            householder_hm(tau[i], v, a, i, i + 1);
        }
    }

    Ok(())
}

/// Apply `Q^T` to a vector in place using the packed reflectors.
pub fn qr_qtvec<T: FloatScalar>(
    qr: &impl MatrixRef<T>,
    tau: &[T],
    v: &mut Vector<T>,
) -> Result<(), LinalgError> {
    let m = qr.nrows();
    let k = m.min(qr.ncols());
    if tau.len() != k || v.len() != m {
        return Err(LinalgError::BadLength);
    }

    let mut h = vec![T::zero(); m];
    for i in 0..k {
        let h = &mut h[..m - i];
        for (r, hi) in h.iter_mut().enumerate() {
            *hi = *qr.get(i + r, i);
        }
        householder_hv(tau[i], h, &mut v.as_mut_slice()[i..]);
    }

    Ok(())
}

/// Unpack the packed factorization into an explicit `M x M` orthogonal `Q`
/// and `M x N` upper-trapezoidal `R`.
pub fn qr_unpack<T: FloatScalar>(
    qr: &impl MatrixRef<T>,
    tau: &[T],
) -> Result<(Matrix<T>, Matrix<T>), LinalgError> {
    let m = qr.nrows();
    let n = qr.ncols();
    let k = m.min(n);
    if tau.len() != k {
        return Err(LinalgError::BadLength);
    }

    // Q = H_0 H_1 ... H_{k-1}, accumulated onto the identity in reverse.
    let mut q = Matrix::eye(m, T::zero());
    let mut v = vec![T::zero(); m];
    for i in (0..k).rev() {
        let v = &mut v[..m - i];
        for (r, vi) in v.iter_mut().enumerate() {
            *vi = *qr.get(i + r, i);
        }
        householder_hm(tau[i], v, &mut q, i, 0);
    }

    let mut r = Matrix::zeros(m, n, T::zero());
    for j in 0..n {
        for i in 0..=j.min(m - 1) {
            r[(i, j)] = *qr.get(i, j);
        }
    }

    Ok((q, r))
}

/// Solve the upper-triangular system `R x = b`, returning a fresh vector.
pub fn r_solve<T: FloatScalar>(
    r: &impl MatrixRef<T>,
    b: &Vector<T>,
) -> Result<Vector<T>, LinalgError> {
    let mut x = b.clone();
    r_svx(r, &mut x)?;
    Ok(x)
}

/// Solve `R x = b` in place against the upper triangle of `r`.
pub fn r_svx<T: FloatScalar>(
    r: &impl MatrixRef<T>,
    x: &mut Vector<T>,
) -> Result<(), LinalgError> {
    let n = r.ncols();
    if r.nrows() < n {
        return Err(LinalgError::BadLength);
    }
    if x.len() != n {
        return Err(LinalgError::BadLength);
    }

    for i in (0..n).rev() {
        let rii = *r.get(i, i);
        if rii == T::zero() {
            return Err(LinalgError::Singular);
        }
        let mut sum = x[i];
        for j in (i + 1)..n {
            sum = sum - *r.get(i, j) * x[j];
        }
        x[i] = sum / rii;
    }

    Ok(())
}

/// Solve `A x = b` for square `A` from a packed factorization.
pub fn qr_solve<T: FloatScalar>(
    qr: &impl MatrixRef<T>,
    tau: &[T],
    b: &Vector<T>,
) -> Result<Vector<T>, LinalgError> {
    let mut x = b.clone();
    qr_svx(qr, tau, &mut x)?;
    Ok(x)
}

/// In-place form of [`qr_solve`], for square systems only.
pub fn qr_svx<T: FloatScalar>(
    qr: &impl MatrixRef<T>,
    tau: &[T],
    x: &mut Vector<T>,
) -> Result<(), LinalgError> {
    if qr.nrows() != qr.ncols() {
        return Err(LinalgError::NotSquare);
    }
    qr_qtvec(qr, tau, x)?;
    r_svx(qr, x)
}

/// Solve `A x = b` from an unpacked pair `(Q, R)`.
pub fn qr_qrsolve<T: FloatScalar>(
    q: &Matrix<T>,
    r: &Matrix<T>,
    b: &Vector<T>,
) -> Result<Vector<T>, LinalgError> {
    let m = q.nrows();
    if q.ncols() != m {
        return Err(LinalgError::NotSquare);
    }
    if b.len() != m || r.nrows() != m || r.ncols() > m {
        return Err(LinalgError::BadLength);
    }

    // x = Q^T b
    let mut x = Vector::zeros(r.ncols(), T::zero());
    let mut qtb = Vector::zeros(m, T::zero());
    for i in 0..m {
        let mut sum = T::zero();
        for k in 0..m {
            sum = sum + q[(k, i)] * b[k];
        }
        qtb[i] = sum;
    }
    for i in 0..r.ncols() {
        x[i] = qtb[i];
    }
    r_svx(r, &mut x)?;
    Ok(x)
}

/// Rank-1 update of an unpacked factorization: given `A = Q R` and
/// `w = Q^T u`, rewrite `Q` and `R` in place so that `Q R = A + u v^T`.
///
/// Two Givens sweeps: the first reduces `w` to a multiple of `e_1`
/// (turning `R` into a Hessenberg matrix), the rank-1 term then touches
/// only the first row, and the second sweep restores triangularity.
pub fn qr_update<T: FloatScalar>(
    q: &mut Matrix<T>,
    r: &mut Matrix<T>,
    w: &mut Vector<T>,
    v: &Vector<T>,
) -> Result<(), LinalgError> {
    let m = q.nrows();
    let n = r.ncols();
    if q.ncols() != m {
        return Err(LinalgError::NotSquare);
    }
    if r.nrows() != m || w.len() != m || v.len() != n {
        return Err(LinalgError::BadLength);
    }

    for k in (1..m).rev() {
        let (c, s) = create_givens(w[k - 1], w[k]);
        apply_givens_vec(w.as_mut_slice(), k - 1, k, c, s);
        apply_givens_qr(q, r, k - 1, k, c, s);
    }

    let w0 = w[0];
    for j in 0..n {
        r[(0, j)] = r[(0, j)] + w0 * v[j];
    }

    for k in 1..m.min(n + 1) {
        let (c, s) = create_givens(r[(k - 1, k - 1)], r[(k, k - 1)]);
        apply_givens_qr(q, r, k - 1, k, c, s);
    }

    Ok(())
}

/// Owned QR factorization.
///
/// For square systems [`Solver::solve`] gives the exact solution; for
/// tall systems (`M > N`) it gives the least-squares solution of length
/// `N`. The in-place [`Solver::svx`] requires a square system.
///
/// ```
/// use factoris::{Matrix, Vector, Qr, Solver};
///
/// // Overdetermined: best fit of a line through three points.
/// let a = Matrix::from_rows(3, 2, &[1.0_f64, 0.0, 1.0, 1.0, 1.0, 2.0]);
/// let b = Vector::from_slice(&[1.0, 3.0, 5.0]);
/// let x = Qr::new(&a).unwrap().solve(&b).unwrap();
/// assert!((x[0] - 1.0).abs() < 1e-12); // intercept
/// assert!((x[1] - 2.0).abs() < 1e-12); // slope
/// ```
#[derive(Debug, Clone)]
pub struct Qr<T> {
    qr: Matrix<T>,
    tau: Vec<T>,
}

impl<T: FloatScalar> Qr<T> {
    /// Factor a copy of `a`.
    pub fn new(a: &Matrix<T>) -> Result<Self, LinalgError> {
        Self::decompose(a.clone())
    }

    /// Factor `a`, consuming it.
    pub fn decompose(mut a: Matrix<T>) -> Result<Self, LinalgError> {
        if a.nrows() < a.ncols() {
            return Err(LinalgError::BadLength);
        }
        let mut tau = vec![T::zero(); a.nrows().min(a.ncols())];
        qr_in_place(&mut a, &mut tau)?;
        Ok(Self { qr: a, tau })
    }

    /// The packed factors.
    pub fn qr(&self) -> &Matrix<T> {
        &self.qr
    }

    /// The reflector coefficients.
    pub fn tau(&self) -> &[T] {
        &self.tau
    }

    /// Unpack into explicit `Q` and `R`.
    pub fn unpack(&self) -> Result<(Matrix<T>, Matrix<T>), LinalgError> {
        qr_unpack(&self.qr, &self.tau)
    }
}

impl<T: FloatScalar> Solver<T> for Qr<T> {
    fn solve(&self, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        let m = self.qr.nrows();
        let n = self.qr.ncols();
        if b.len() != m {
            return Err(LinalgError::BadLength);
        }
        // Q^T b, then back-substitute the leading N x N triangle.
        let mut qtb = b.clone();
        qr_qtvec(&self.qr, &self.tau, &mut qtb)?;
        let mut x = Vector::zeros(n, T::zero());
        for i in 0..n {
            x[i] = qtb[i];
        }
        r_svx(&self.qr, &mut x)?;
        Ok(x)
    }

    fn svx(&self, x: &mut Vector<T>) -> Result<(), LinalgError> {
        qr_svx(&self.qr, &self.tau, x)
    }
}
