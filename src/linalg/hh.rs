//! Direct Householder solve.
//!
//! Triangularizes the system and the right-hand side together in a
//! single pass, without keeping a reusable factorization. The cheapest
//! option for a one-shot solve; use a [`crate::Lu`] or [`crate::Qr`]
//! factorization when several right-hand sides share a matrix.

use alloc::vec;

use crate::linalg::LinalgError;
use crate::matrix::{Matrix, Vector};
use crate::traits::{FloatScalar, MatrixMut};

/// Solve `A x = b`, destroying `a` and overwriting `x` in place.
///
/// `a` is `M x N` with `M >= N`; `x` holds `b` (length `M`) on entry and
/// the solution in its first `N` entries on return. Fails with
/// [`LinalgError::Singular`] on an exactly zero column or when a pivot
/// falls below the noise floor of the trailing block.
pub fn hh_svx<T: FloatScalar>(
    a: &mut impl MatrixMut<T>,
    x: &mut Vector<T>,
) -> Result<(), LinalgError> {
    let m = a.nrows();
    let n = a.ncols();
    if m < n {
        return Err(LinalgError::BadLength);
    }
    if x.len() != m {
        return Err(LinalgError::BadLength);
    }

    let two_eps = T::epsilon() + T::epsilon();
    let mut d = vec![T::zero(); n];

    for i in 0..n {
        let mut r = T::zero();
        for k in i..m {
            let aki = *a.get(k, i);
            r = r + aki * aki;
        }
        if r == T::zero() {
            return Err(LinalgError::Singular);
        }

        let aii = *a.get(i, i);
        let alpha = if aii >= T::zero() { r.sqrt() } else { -r.sqrt() };
        let ak = T::one() / (r + alpha * aii);
        *a.get_mut(i, i) = aii + alpha;
        d[i] = -alpha;

        // Reflect the trailing columns and watch their norms; a pivot
        // drowned out by the trailing block means numerical singularity.
        let mut max_norm = T::zero();
        for k in (i + 1)..n {
            let mut f = T::zero();
            for j in i..m {
                f = f + *a.get(j, k) * *a.get(j, i);
            }
            f = f * ak;
            for j in i..m {
                *a.get_mut(j, k) = *a.get(j, k) - f * *a.get(j, i);
            }

            let mut norm = T::zero();
            for j in (i + 1)..m {
                let ajk = *a.get(j, k);
                norm = norm + ajk * ajk;
            }
            if norm > max_norm {
                max_norm = norm;
            }
        }
        if alpha.abs() < two_eps * max_norm.sqrt() {
            return Err(LinalgError::Singular);
        }

        // Same reflection applied to the right-hand side.
        let mut f = T::zero();
        for j in i..m {
            f = f + x[j] * *a.get(j, i);
        }
        f = f * ak;
        for j in i..m {
            x[j] = x[j] - f * *a.get(j, i);
        }
    }

    // Back-substitution against the implicit diagonal d.
    for i in (0..n).rev() {
        let mut sum = x[i];
        for k in (i + 1)..n {
            sum = sum - *a.get(i, k) * x[k];
        }
        x[i] = sum / d[i];
    }

    Ok(())
}

/// Non-destructive form of [`hh_svx`]: factors a scratch copy and
/// returns the length-`N` solution.
pub fn hh_solve<T: FloatScalar>(a: &Matrix<T>, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
    let mut scratch = a.clone();
    let mut x = b.clone();
    hh_svx(&mut scratch, &mut x)?;
    Ok(Vector::from_slice(&x.as_slice()[..a.ncols()]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solve_3x3() {
        let a = Matrix::from_rows(3, 3, &[2.0_f64, 1.0, 1.0, 4.0, -6.0, 0.0, -2.0, 7.0, 2.0]);
        let b = Vector::from_slice(&[7.0, -8.0, 18.0]);
        let x = hh_solve(&a, &b).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-12);
        assert!((x[1] - 2.0).abs() < 1e-12);
        assert!((x[2] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn original_matrix_untouched() {
        let a = Matrix::from_rows(2, 2, &[3.0_f64, 1.0, 1.0, 2.0]);
        let before = a.clone();
        let b = Vector::from_slice(&[9.0, 8.0]);
        hh_solve(&a, &b).unwrap();
        assert_eq!(a, before);
    }

    #[test]
    fn svx_writes_solution_prefix() {
        let a0 = Matrix::from_rows(2, 2, &[3.0_f64, 1.0, 1.0, 2.0]);
        let mut a = a0.clone();
        let mut x = Vector::from_slice(&[9.0, 8.0]);
        hh_svx(&mut a, &mut x).unwrap();
        assert!((x[0] - 2.0).abs() < 1e-12);
        assert!((x[1] - 3.0).abs() < 1e-12);
        // a was consumed as scratch
        assert_ne!(a, a0);
    }

    #[test]
    fn tiny_pivot_column_is_singular() {
        // The second column is nonzero but far below the scale of the
        // trailing columns, so the reduced pivot falls under the
        // apparent-singularity cutoff.
        let a = Matrix::from_rows(
            3,
            3,
            &[1.0_f64, 1e-20, 2.0, 0.0, 1e-20, 3.0, 0.0, 1e-20, 4.0],
        );
        let b = Vector::from_slice(&[1.0, 1.0, 1.0]);
        assert_eq!(hh_solve(&a, &b), Err(LinalgError::Singular));
    }

    #[test]
    fn zero_column_is_singular() {
        let a = Matrix::from_rows(2, 2, &[0.0_f64, 1.0, 0.0, 2.0]);
        let b = Vector::from_slice(&[1.0, 1.0]);
        assert_eq!(hh_solve(&a, &b), Err(LinalgError::Singular));
    }

    #[test]
    fn wide_matrix_rejected() {
        let a = Matrix::zeros(2, 3, 0.0_f64);
        let b = Vector::from_slice(&[1.0, 1.0]);
        assert_eq!(hh_solve(&a, &b), Err(LinalgError::BadLength));
    }

    #[test]
    fn rhs_length_checked() {
        let a = Matrix::eye(3, 0.0_f64);
        let b = Vector::from_slice(&[1.0, 2.0]);
        assert_eq!(hh_solve(&a, &b), Err(LinalgError::BadLength));
    }
}
