//! QR factorization with column pivoting, `A P = Q R`.
//!
//! Same packed layout as the unpivoted factorization plus a column
//! [`Permutation`]: at each step the remaining column of largest norm is
//! moved to the front, so the diagonal of `R` is non-increasing in
//! magnitude and rank deficiency shows up as trailing zeros.

use alloc::vec;
use alloc::vec::Vec;

use crate::linalg::givens::{apply_givens_qr, apply_givens_vec, create_givens};
use crate::linalg::householder::{householder_hm, householder_transform};
use crate::linalg::qr::{qr_qtvec, r_svx};
use crate::linalg::{LinalgError, Solver};
use crate::matrix::{Matrix, Vector};
use crate::permutation::Permutation;
use crate::traits::{FloatScalar, MatrixMut, MatrixRef};

/// Factor an `M x N` matrix in place as `A P = Q R`, choosing at each
/// step the remaining column of largest norm.
///
/// `tau` must have length `min(M, N)` and `perm` length `N`. Returns the
/// signum of the column permutation.
///
/// Column norms are downdated incrementally after each reflector; when
/// cancellation makes a downdated norm unreliable it is recomputed from
/// scratch.
pub fn qrpt_in_place<T: FloatScalar>(
    a: &mut impl MatrixMut<T>,
    tau: &mut [T],
    perm: &mut Permutation,
) -> Result<i32, LinalgError> {
    let m = a.nrows();
    let n = a.ncols();
    let k = m.min(n);
    if tau.len() != k || perm.len() != n {
        return Err(LinalgError::BadLength);
    }

    perm.reset();
    let mut signum = 1_i32;

    let mut norm = vec![T::zero(); n];
    for (j, nj) in norm.iter_mut().enumerate() {
        *nj = column_norm(a, 0, j);
    }

    let recompute_cutoff = sqrt_20::<T>() * T::epsilon().sqrt();
    let mut v = vec![T::zero(); m];
    for i in 0..k {
        let mut jmax = i;
        let mut max = norm[i];
        for j in (i + 1)..n {
            if norm[j] > max {
                max = norm[j];
                jmax = j;
            }
        }

        if jmax != i {
            for r in 0..m {
                let tmp = *a.get(r, i);
                *a.get_mut(r, i) = *a.get(r, jmax);
                *a.get_mut(r, jmax) = tmp;
            }
            perm.swap(i, jmax);
            norm.swap(i, jmax);
            signum = -signum;
        }

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

        // Downdate the remaining column norms; fall back to a full
        // recompute when cancellation has eaten the accuracy.
        for j in (i + 1)..n {
            let x = norm[j];
            if x > T::zero() {
                let temp = *a.get(i, j) / x;
                let mut y = if temp.abs() >= T::one() {
                    T::zero()
                } else {
                    x * (T::one() - temp * temp).sqrt()
                };
                if (y / x).abs() < recompute_cutoff {
                    y = column_norm(a, i + 1, j);
                }
                norm[j] = y;
            }
        }
    }

    Ok(signum)
}

fn sqrt_20<T: FloatScalar>() -> T {
    let four = T::one() + T::one() + T::one() + T::one();
    (four + four + four + four + four).sqrt()
}

fn column_norm<T: FloatScalar>(a: &impl MatrixRef<T>, row0: usize, col: usize) -> T {
    let mut norm = T::zero();
    for i in row0..a.nrows() {
        norm = norm.hypot(*a.get(i, col));
    }
    norm
}

/// Solve `A x = b` for square `A` from a packed pivoted factorization.
pub fn qrpt_solve<T: FloatScalar>(
    qr: &impl MatrixRef<T>,
    tau: &[T],
    perm: &Permutation,
    b: &Vector<T>,
) -> Result<Vector<T>, LinalgError> {
    let mut x = b.clone();
    qrpt_svx(qr, tau, perm, &mut x)?;
    Ok(x)
}

/// In-place form of [`qrpt_solve`].
pub fn qrpt_svx<T: FloatScalar>(
    qr: &impl MatrixRef<T>,
    tau: &[T],
    perm: &Permutation,
    x: &mut Vector<T>,
) -> Result<(), LinalgError> {
    if qr.nrows() != qr.ncols() {
        return Err(LinalgError::NotSquare);
    }
    if perm.len() != qr.ncols() {
        return Err(LinalgError::BadLength);
    }
    qr_qtvec(qr, tau, x)?;
    r_svx(qr, x)?;
    perm.apply_inverse(x.as_mut_slice());
    Ok(())
}

/// Solve the triangular system `R P^T x = b` using the upper triangle of
/// the packed factorization.
pub fn qrpt_rsolve<T: FloatScalar>(
    qr: &impl MatrixRef<T>,
    perm: &Permutation,
    b: &Vector<T>,
) -> Result<Vector<T>, LinalgError> {
    if qr.nrows() != qr.ncols() {
        return Err(LinalgError::NotSquare);
    }
    if perm.len() != qr.ncols() || b.len() != qr.ncols() {
        return Err(LinalgError::BadLength);
    }
    let mut x = b.clone();
    r_svx(qr, &mut x)?;
    perm.apply_inverse(x.as_mut_slice());
    Ok(x)
}

/// Solve `A x = b` from an unpacked pivoted pair `(Q, R)`.
pub fn qrpt_qrsolve<T: FloatScalar>(
    q: &Matrix<T>,
    r: &Matrix<T>,
    perm: &Permutation,
    b: &Vector<T>,
) -> Result<Vector<T>, LinalgError> {
    let m = q.nrows();
    if q.ncols() != m || r.nrows() != m {
        return Err(LinalgError::NotSquare);
    }
    if b.len() != m || perm.len() != r.ncols() {
        return Err(LinalgError::BadLength);
    }

    let mut x = Vector::zeros(r.ncols(), T::zero());
    for i in 0..r.ncols() {
        let mut sum = T::zero();
        for k in 0..m {
            sum = sum + q[(k, i)] * b[k];
        }
        x[i] = sum;
    }
    r_svx(r, &mut x)?;
    perm.apply_inverse(x.as_mut_slice());
    Ok(x)
}

/// Rank-1 update of an unpacked pivoted factorization: given `A P = Q R`
/// and `w = Q^T u`, rewrite `Q` and `R` so that `Q R = (A + u v^T) P`.
pub fn qrpt_update<T: FloatScalar>(
    q: &mut Matrix<T>,
    r: &mut Matrix<T>,
    perm: &Permutation,
    w: &mut Vector<T>,
    v: &Vector<T>,
) -> Result<(), LinalgError> {
    let m = q.nrows();
    let n = r.ncols();
    if q.ncols() != m {
        return Err(LinalgError::NotSquare);
    }
    if r.nrows() != m || w.len() != m || v.len() != n || perm.len() != n {
        return Err(LinalgError::BadLength);
    }

    for k in (1..m).rev() {
        let (c, s) = create_givens(w[k - 1], w[k]);
        apply_givens_vec(w.as_mut_slice(), k - 1, k, c, s);
        apply_givens_qr(q, r, k - 1, k, c, s);
    }

    // The update column order follows the pivoting of R.
    let w0 = w[0];
    for j in 0..n {
        r[(0, j)] = r[(0, j)] + w0 * v[perm.get(j)];
    }

    for k in 1..m.min(n + 1) {
        let (c, s) = create_givens(r[(k - 1, k - 1)], r[(k, k - 1)]);
        apply_givens_qr(q, r, k - 1, k, c, s);
    }

    Ok(())
}

/// Owned column-pivoted QR factorization.
///
/// Carries the packed factors, tau vector, column permutation and its
/// signum. The preferred factorization for systems suspected of being
/// ill-conditioned or rank-deficient.
#[derive(Debug, Clone)]
pub struct Qrpt<T> {
    qr: Matrix<T>,
    tau: Vec<T>,
    perm: Permutation,
    signum: i32,
}

impl<T: FloatScalar> Qrpt<T> {
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
        let mut perm = Permutation::identity(a.ncols());
        let signum = qrpt_in_place(&mut a, &mut tau, &mut perm)?;
        Ok(Self {
            qr: a,
            tau,
            perm,
            signum,
        })
    }

    /// The packed factors.
    pub fn qr(&self) -> &Matrix<T> {
        &self.qr
    }

    /// The reflector coefficients.
    pub fn tau(&self) -> &[T] {
        &self.tau
    }

    /// The column permutation.
    pub fn permutation(&self) -> &Permutation {
        &self.perm
    }

    /// Parity of the column permutation.
    pub fn signum(&self) -> i32 {
        self.signum
    }

    /// Unpack into explicit `Q` and `R` (of `A P`).
    pub fn unpack(&self) -> Result<(Matrix<T>, Matrix<T>), LinalgError> {
        crate::linalg::qr::qr_unpack(&self.qr, &self.tau)
    }
}

impl<T: FloatScalar> Solver<T> for Qrpt<T> {
    fn solve(&self, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        qrpt_solve(&self.qr, &self.tau, &self.perm, b)
    }

    fn svx(&self, x: &mut Vector<T>) -> Result<(), LinalgError> {
        qrpt_svx(&self.qr, &self.tau, &self.perm, x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() < tol, "{a} != {b} (tol {tol})");
    }

    #[test]
    fn unpack_reconstructs_permuted() {
        let a = Matrix::from_rows(3, 3, &[2.0_f64, 1.0, 1.0, 4.0, -6.0, 0.0, -2.0, 7.0, 2.0]);
        let f = Qrpt::new(&a).unwrap();
        let (q, r) = f.unpack().unwrap();
        let back = &q * &r;
        // Column j of Q R is column perm[j] of A.
        for i in 0..3 {
            for j in 0..3 {
                assert_close(back[(i, j)], a[(i, f.permutation().get(j))], 1e-12);
            }
        }
        assert!(f.permutation().is_valid());
        assert!(f.signum() == 1 || f.signum() == -1);
    }

    #[test]
    fn diagonal_nonincreasing() {
        let a = Matrix::from_rows(3, 3, &[0.1_f64, 1.0, 10.0, 0.2, 2.0, 20.0, 0.3, 3.0, 29.0]);
        let f = Qrpt::new(&a).unwrap();
        let (_, r) = f.unpack().unwrap();
        assert!(r[(0, 0)].abs() >= r[(1, 1)].abs());
        assert!(r[(1, 1)].abs() >= r[(2, 2)].abs());
    }

    #[test]
    fn solve_square() {
        let a = Matrix::from_rows(3, 3, &[2.0_f64, 1.0, 1.0, 4.0, -6.0, 0.0, -2.0, 7.0, 2.0]);
        let b = Vector::from_slice(&[7.0, -8.0, 18.0]);
        let x = Qrpt::new(&a).unwrap().solve(&b).unwrap();
        assert_close(x[0], 1.0, 1e-12);
        assert_close(x[1], 2.0, 1e-12);
        assert_close(x[2], 3.0, 1e-12);
    }

    #[test]
    fn svx_matches_solve() {
        let a = Matrix::from_rows(2, 2, &[3.0_f64, 1.0, 1.0, 2.0]);
        let b = Vector::from_slice(&[9.0, 8.0]);
        let f = Qrpt::new(&a).unwrap();
        let x = f.solve(&b).unwrap();
        let mut y = b.clone();
        f.svx(&mut y).unwrap();
        for i in 0..2 {
            assert_close(x[i], y[i], 1e-14);
        }
    }

    #[test]
    fn rank_deficiency_shows_on_trailing_diagonal() {
        // Rows 0 and 1 are parallel, so the rank is 2 and the pivoting
        // pushes the deficiency to the last diagonal entry of R.
        let a = Matrix::from_rows(3, 3, &[1.0_f64, 2.0, 3.0, 2.0, 4.0, 6.0, 1.0, 1.0, 1.0]);
        let f = Qrpt::new(&a).unwrap();
        let (_, r) = f.unpack().unwrap();
        assert!(r[(0, 0)].abs() > 1.0);
        assert!(r[(1, 1)].abs() > 1e-3);
        assert!(r[(2, 2)].abs() < 1e-14);
    }

    #[test]
    fn rsolve_matches_triangular_system() {
        let a = Matrix::from_rows(3, 3, &[2.0_f64, 1.0, 1.0, 4.0, -6.0, 0.0, -2.0, 7.0, 2.0]);
        let f = Qrpt::new(&a).unwrap();

        // Pick y, form b = R y, check rsolve returns P y.
        let y = Vector::from_slice(&[1.0, -2.0, 0.5]);
        let mut b = Vector::zeros(3, 0.0);
        for i in 0..3 {
            let mut sum = 0.0;
            for j in i..3 {
                sum += f.qr()[(i, j)] * y[j];
            }
            b[i] = sum;
        }
        let x = qrpt_rsolve(f.qr(), f.permutation(), &b).unwrap();
        let mut expected = y.clone();
        f.permutation().apply_inverse(expected.as_mut_slice());
        for i in 0..3 {
            assert_close(x[i], expected[i], 1e-13);
        }
    }

    #[test]
    fn qrsolve_matches_packed_solve() {
        let a = Matrix::from_rows(3, 3, &[2.0_f64, 1.0, 1.0, 4.0, -6.0, 0.0, -2.0, 7.0, 2.0]);
        let b = Vector::from_slice(&[7.0, -8.0, 18.0]);
        let f = Qrpt::new(&a).unwrap();
        let (q, r) = f.unpack().unwrap();
        let x1 = f.solve(&b).unwrap();
        let x2 = qrpt_qrsolve(&q, &r, f.permutation(), &b).unwrap();
        for i in 0..3 {
            assert_close(x1[i], x2[i], 1e-12);
        }
    }

    #[test]
    fn update_matches_refactorization() {
        let a = Matrix::from_rows(3, 3, &[2.0_f64, 1.0, 1.0, 4.0, -6.0, 0.0, -2.0, 7.0, 2.0]);
        let f = Qrpt::new(&a).unwrap();
        let (mut q, mut r) = f.unpack().unwrap();

        let u = Vector::from_slice(&[0.5, -1.0, 2.0]);
        let v = Vector::from_slice(&[1.0, 0.25, -0.5]);

        let mut w = Vector::zeros(3, 0.0);
        for i in 0..3 {
            let mut sum = 0.0;
            for k in 0..3 {
                sum += q[(k, i)] * u[k];
            }
            w[i] = sum;
        }

        qrpt_update(&mut q, &mut r, f.permutation(), &mut w, &v).unwrap();

        // Q R must equal (A + u v^T) P.
        let back = &q * &r;
        for i in 0..3 {
            for j in 0..3 {
                let pj = f.permutation().get(j);
                assert_close(back[(i, j)], a[(i, pj)] + u[i] * v[pj], 1e-12);
            }
        }
    }
}
