//! LU factorization with partial pivoting.
//!
//! `P A = L U` packed into a single square matrix: unit lower triangle
//! below the diagonal, upper triangle on and above it. The row
//! interchanges live in a [`Permutation`] and their parity in a signum.
//!
//! Factorization is best-effort: an exactly zero pivot does not abort,
//! it marks the factorization singular and skips elimination for that
//! column, so the determinant routines still work. The solve routines
//! re-check the diagonal and return [`LinalgError::Singular`].

use crate::linalg::{LinalgError, Solver};
use crate::matrix::{Matrix, Vector};
use crate::permutation::Permutation;
use crate::traits::{FloatScalar, MatrixMut, MatrixRef};

/// Factor a square matrix in place as `P A = L U`.
///
/// On return `a` holds both factors packed and `perm` the row
/// interchanges. Returns `(signum, singular)`: the parity of the
/// permutation (for determinants) and whether a zero pivot was hit.
pub fn lu_in_place<T: FloatScalar>(
    a: &mut impl MatrixMut<T>,
    perm: &mut Permutation,
) -> Result<(i32, bool), LinalgError> {
    let n = a.nrows();
    if a.ncols() != n {
        return Err(LinalgError::NotSquare);
    }
    if perm.len() != n {
        return Err(LinalgError::BadLength);
    }

    perm.reset();
    let mut signum = 1_i32;
    let mut singular = false;

    for j in 0..n {
        // Pivot: largest magnitude in column j at or below the diagonal.
        let mut ipiv = j;
        let mut max = a.get(j, j).abs();
        for i in (j + 1)..n {
            let v = a.get(i, j).abs();
            if v > max {
                max = v;
                ipiv = i;
            }
        }

        if ipiv != j {
            for k in 0..n {
                let tmp = *a.get(j, k);
                *a.get_mut(j, k) = *a.get(ipiv, k);
                *a.get_mut(ipiv, k) = tmp;
            }
            perm.swap(j, ipiv);
            signum = -signum;
        }

        let ajj = *a.get(j, j);
        if ajj == T::zero() {
            singular = true;
            continue;
        }

        for i in (j + 1)..n {
            let factor = *a.get(i, j) / ajj;
            *a.get_mut(i, j) = factor;
            for k in (j + 1)..n {
                *a.get_mut(i, k) = *a.get(i, k) - factor * *a.get(j, k);
            }
        }
    }

    Ok((signum, singular))
}

/// Solve `A x = b` from a packed factorization, returning a fresh vector.
pub fn lu_solve<T: FloatScalar>(
    lu: &impl MatrixRef<T>,
    perm: &Permutation,
    b: &Vector<T>,
) -> Result<Vector<T>, LinalgError> {
    let mut x = b.clone();
    lu_svx(lu, perm, &mut x)?;
    Ok(x)
}

/// Solve `A x = b` in place: `x` holds `b` on entry and the solution on
/// return.
pub fn lu_svx<T: FloatScalar>(
    lu: &impl MatrixRef<T>,
    perm: &Permutation,
    x: &mut Vector<T>,
) -> Result<(), LinalgError> {
    let n = lu.nrows();
    if lu.ncols() != n {
        return Err(LinalgError::NotSquare);
    }
    if perm.len() != n || x.len() != n {
        return Err(LinalgError::BadLength);
    }
    for i in 0..n {
        if *lu.get(i, i) == T::zero() {
            return Err(LinalgError::Singular);
        }
    }

    // x <- P b
    perm.apply(x.as_mut_slice());

    // Forward-substitute the unit lower triangle.
    for i in 1..n {
        let mut sum = x[i];
        for j in 0..i {
            sum = sum - *lu.get(i, j) * x[j];
        }
        x[i] = sum;
    }

    // Back-substitute the upper triangle.
    for i in (0..n).rev() {
        let mut sum = x[i];
        for j in (i + 1)..n {
            sum = sum - *lu.get(i, j) * x[j];
        }
        x[i] = sum / *lu.get(i, i);
    }

    Ok(())
}

/// One step of iterative refinement for a computed solution.
///
/// `a` is the original (unfactored) matrix, `lu`/`perm` its
/// factorization, `b` the right-hand side. Updates `x` with the
/// correction solved from the residual `b - A x` and returns that
/// residual.
pub fn lu_refine<T: FloatScalar>(
    a: &impl MatrixRef<T>,
    lu: &impl MatrixRef<T>,
    perm: &Permutation,
    b: &Vector<T>,
    x: &mut Vector<T>,
) -> Result<Vector<T>, LinalgError> {
    let n = a.nrows();
    if a.ncols() != n || lu.nrows() != n || lu.ncols() != n {
        return Err(LinalgError::NotSquare);
    }
    if b.len() != n || x.len() != n {
        return Err(LinalgError::BadLength);
    }

    let mut residual = Vector::zeros(n, T::zero());
    for i in 0..n {
        let mut sum = T::zero();
        for j in 0..n {
            sum = sum + *a.get(i, j) * x[j];
        }
        residual[i] = b[i] - sum;
    }

    let delta = lu_solve(lu, perm, &residual)?;
    for i in 0..n {
        x[i] = x[i] + delta[i];
    }

    Ok(residual)
}

/// Invert a matrix from its packed factorization.
///
/// Solves against each column of the identity. Prefer the solve
/// routines when only `A^{-1} b` is needed.
pub fn lu_invert<T: FloatScalar>(
    lu: &impl MatrixRef<T>,
    perm: &Permutation,
) -> Result<Matrix<T>, LinalgError> {
    let n = lu.nrows();
    if lu.ncols() != n {
        return Err(LinalgError::NotSquare);
    }
    if perm.len() != n {
        return Err(LinalgError::BadLength);
    }

    let mut inv = Matrix::zeros(n, n, T::zero());
    let mut col = Vector::zeros(n, T::zero());
    for j in 0..n {
        for i in 0..n {
            col[i] = if i == j { T::one() } else { T::zero() };
        }
        lu_svx(lu, perm, &mut col)?;
        for i in 0..n {
            inv[(i, j)] = col[i];
        }
    }

    Ok(inv)
}

/// Determinant from a packed factorization and its signum.
pub fn lu_det<T: FloatScalar>(lu: &impl MatrixRef<T>, signum: i32) -> T {
    let n = lu.nrows();
    let mut det = if signum >= 0 { T::one() } else { -T::one() };
    for i in 0..n {
        det = det * *lu.get(i, i);
    }
    det
}

/// Log of the absolute determinant, `ln |det A|`.
///
/// Usable when the determinant itself would over- or underflow.
pub fn lu_lndet<T: FloatScalar>(lu: &impl MatrixRef<T>) -> T {
    let n = lu.nrows();
    let mut lndet = T::zero();
    for i in 0..n {
        lndet = lndet + lu.get(i, i).abs().ln();
    }
    lndet
}

/// Sign of the determinant: `-1`, `0` or `1`.
pub fn lu_sgndet<T: FloatScalar>(lu: &impl MatrixRef<T>, signum: i32) -> i32 {
    let n = lu.nrows();
    let mut s = signum;
    for i in 0..n {
        let u = *lu.get(i, i);
        if u < T::zero() {
            s = -s;
        } else if u == T::zero() {
            return 0;
        }
    }
    s
}

/// Owned LU factorization.
///
/// Bundles the packed factors, row permutation and signum; implements
/// [`Solver`]. Construction succeeds even for singular input (the
/// factorization itself is still useful for determinants); the solve
/// methods fail instead.
///
/// ```
/// use factoris::{Matrix, Vector, Lu, Solver};
///
/// let a = Matrix::from_rows(2, 2, &[4.0_f64, 3.0, 6.0, 3.0]);
/// let lu = Lu::new(&a).unwrap();
/// assert!((lu.det() - (-6.0)).abs() < 1e-12);
///
/// let x = lu.solve(&Vector::from_slice(&[10.0, 12.0])).unwrap();
/// assert!((x[0] - 1.0).abs() < 1e-12);
/// assert!((x[1] - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Lu<T> {
    lu: Matrix<T>,
    perm: Permutation,
    signum: i32,
    singular: bool,
}

impl<T: FloatScalar> Lu<T> {
    /// Factor a copy of `a`.
    pub fn new(a: &Matrix<T>) -> Result<Self, LinalgError> {
        Self::decompose(a.clone())
    }

    /// Factor `a`, consuming it.
    pub fn decompose(mut a: Matrix<T>) -> Result<Self, LinalgError> {
        let mut perm = Permutation::identity(a.nrows());
        let (signum, singular) = lu_in_place(&mut a, &mut perm)?;
        Ok(Self {
            lu: a,
            perm,
            signum,
            singular,
        })
    }

    /// The packed factors.
    pub fn lu(&self) -> &Matrix<T> {
        &self.lu
    }

    /// The row permutation.
    pub fn permutation(&self) -> &Permutation {
        &self.perm
    }

    /// Parity of the row permutation.
    pub fn signum(&self) -> i32 {
        self.signum
    }

    /// Whether a zero pivot was encountered during factorization.
    pub fn is_singular(&self) -> bool {
        self.singular
    }

    /// Determinant of the original matrix.
    pub fn det(&self) -> T {
        lu_det(&self.lu, self.signum)
    }

    /// Log of the absolute determinant.
    pub fn lndet(&self) -> T {
        lu_lndet(&self.lu)
    }

    /// Sign of the determinant.
    pub fn sgndet(&self) -> i32 {
        lu_sgndet(&self.lu, self.signum)
    }

    /// Inverse of the original matrix.
    pub fn invert(&self) -> Result<Matrix<T>, LinalgError> {
        lu_invert(&self.lu, &self.perm)
    }

    /// One refinement step; see [`lu_refine`].
    pub fn refine(
        &self,
        a: &Matrix<T>,
        b: &Vector<T>,
        x: &mut Vector<T>,
    ) -> Result<Vector<T>, LinalgError> {
        lu_refine(a, &self.lu, &self.perm, b, x)
    }
}

impl<T: FloatScalar> Solver<T> for Lu<T> {
    fn solve(&self, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        lu_solve(&self.lu, &self.perm, b)
    }

    fn svx(&self, x: &mut Vector<T>) -> Result<(), LinalgError> {
        lu_svx(&self.lu, &self.perm, x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::matmult;

    fn reconstruct(lu: &Lu<f64>) -> Matrix<f64> {
        let n = lu.lu().nrows();
        let mut l = Matrix::eye(n, 0.0);
        let mut u = Matrix::zeros(n, n, 0.0);
        for i in 0..n {
            for j in 0..n {
                if i > j {
                    l[(i, j)] = lu.lu()[(i, j)];
                } else {
                    u[(i, j)] = lu.lu()[(i, j)];
                }
            }
        }
        let pa = &l * &u;
        // Undo the row permutation: row i of P A is row perm[i] of A.
        let mut a = Matrix::zeros(n, n, 0.0);
        for i in 0..n {
            for j in 0..n {
                a[(lu.permutation().get(i), j)] = pa[(i, j)];
            }
        }
        a
    }

    #[test]
    fn factor_reconstructs() {
        let a = Matrix::from_rows(3, 3, &[2.0_f64, 1.0, 1.0, 4.0, -6.0, 0.0, -2.0, 7.0, 2.0]);
        let lu = Lu::new(&a).unwrap();
        assert!(!lu.is_singular());
        let back = reconstruct(&lu);
        for i in 0..3 {
            for j in 0..3 {
                assert!((back[(i, j)] - a[(i, j)]).abs() < 1e-13);
            }
        }
    }

    #[test]
    fn solve_3x3() {
        let a = Matrix::from_rows(3, 3, &[2.0_f64, 1.0, 1.0, 4.0, -6.0, 0.0, -2.0, 7.0, 2.0]);
        // x = (1, 2, 3): b = A x
        let b = Vector::from_slice(&[7.0, -8.0, 18.0]);
        let lu = Lu::new(&a).unwrap();
        let x = lu.solve(&b).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-12);
        assert!((x[1] - 2.0).abs() < 1e-12);
        assert!((x[2] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn svx_matches_solve() {
        let a = Matrix::from_rows(2, 2, &[3.0_f64, 1.0, 1.0, 2.0]);
        let b = Vector::from_slice(&[9.0, 8.0]);
        let lu = Lu::new(&a).unwrap();
        let x = lu.solve(&b).unwrap();
        let mut y = b.clone();
        lu.svx(&mut y).unwrap();
        assert_eq!(x, y);
    }

    #[test]
    fn determinant() {
        let a = Matrix::from_rows(2, 2, &[4.0_f64, 3.0, 6.0, 3.0]);
        let lu = Lu::new(&a).unwrap();
        assert!((lu.det() - (-6.0)).abs() < 1e-12);
        assert_eq!(lu.sgndet(), -1);
        assert!((lu.lndet() - 6.0_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn determinant_identity() {
        let a = Matrix::eye(4, 0.0_f64);
        let lu = Lu::new(&a).unwrap();
        assert_eq!(lu.det(), 1.0);
        assert_eq!(lu.sgndet(), 1);
        assert_eq!(lu.lndet(), 0.0);
    }

    #[test]
    fn singular_flags_but_factors() {
        let a = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 2.0, 4.0]);
        let lu = Lu::new(&a).unwrap();
        assert!(lu.is_singular());
        assert_eq!(lu.sgndet(), 0);
        assert_eq!(lu.det(), 0.0);

        let b = Vector::from_slice(&[1.0, 2.0]);
        assert_eq!(lu.solve(&b), Err(LinalgError::Singular));
    }

    #[test]
    fn zero_column_is_singular_without_nan() {
        let a = Matrix::from_rows(3, 3, &[1.0_f64, 0.0, 2.0, 3.0, 0.0, 4.0, 5.0, 0.0, 6.0]);
        let lu = Lu::new(&a).unwrap();
        assert!(lu.is_singular());
        assert_eq!(lu.sgndet(), 0);
        for v in lu.lu().as_slice() {
            assert!(v.is_finite());
        }
        let b = Vector::from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(lu.solve(&b), Err(LinalgError::Singular));
    }

    #[test]
    fn invert_twice_returns_original() {
        let a = Matrix::from_rows(3, 3, &[2.0_f64, 1.0, 1.0, 4.0, -6.0, 0.0, -2.0, 7.0, 2.0]);
        let inv = Lu::new(&a).unwrap().invert().unwrap();
        let back = Lu::new(&inv).unwrap().invert().unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert!((back[(i, j)] - a[(i, j)]).abs() < 1e-11);
            }
        }
    }

    #[test]
    fn not_square_rejected() {
        let mut a = Matrix::zeros(2, 3, 0.0_f64);
        let mut p = Permutation::identity(2);
        assert_eq!(lu_in_place(&mut a, &mut p), Err(LinalgError::NotSquare));
    }

    #[test]
    fn wrong_rhs_length() {
        let a = Matrix::eye(3, 0.0_f64);
        let lu = Lu::new(&a).unwrap();
        let b = Vector::from_slice(&[1.0, 2.0]);
        assert_eq!(lu.solve(&b), Err(LinalgError::BadLength));
    }

    #[test]
    fn invert_multiplies_to_identity() {
        let a = Matrix::from_rows(3, 3, &[2.0_f64, 1.0, 1.0, 4.0, -6.0, 0.0, -2.0, 7.0, 2.0]);
        let lu = Lu::new(&a).unwrap();
        let inv = lu.invert().unwrap();
        let mut prod = Matrix::zeros(3, 3, 0.0);
        matmult(&a, &inv, &mut prod).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((prod[(i, j)] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn refine_improves_hilbert_solution() {
        let n = 6;
        let a = Matrix::from_fn(n, n, |i, j| 1.0 / (i + j + 1) as f64);
        let b = Vector::from_fn(n, |i| (i + 1) as f64);
        let lu = Lu::new(&a).unwrap();
        let mut x = lu.solve(&b).unwrap();
        lu.refine(&a, &b, &mut x).unwrap();

        // Residual of the refined solution stays small relative to b.
        let mut rmax: f64 = 0.0;
        for i in 0..n {
            let mut sum = 0.0;
            for j in 0..n {
                sum += a[(i, j)] * x[j];
            }
            rmax = rmax.max((b[i] - sum).abs());
        }
        assert!(rmax < 1e-9, "residual {rmax}");
    }
}
