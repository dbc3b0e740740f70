//! Symmetric tridiagonal and cyclic tridiagonal solvers.
//!
//! Band storage only: the matrix is never materialized. `diag` holds the
//! `N` diagonal entries and `offdiag` the superdiagonal (`N - 1` entries,
//! or `N` for the cyclic case where `offdiag[N - 1]` is the wraparound
//! corner element).

use alloc::vec;

use crate::linalg::LinalgError;
use crate::matrix::Vector;
use crate::traits::FloatScalar;

/// Solve `T x = b` for a symmetric tridiagonal `T` given by its bands.
///
/// Cholesky-like `L D L^T` sweep in O(N). `offdiag` must have length
/// `diag.len() - 1`; a zero `D` entry reports singularity.
pub fn solve_symm_tridiag<T: FloatScalar>(
    diag: &[T],
    offdiag: &[T],
    b: &[T],
) -> Result<Vector<T>, LinalgError> {
    let n = diag.len();
    if n == 0 || offdiag.len() != n - 1 || b.len() != n {
        return Err(LinalgError::BadLength);
    }

    let mut gamma = vec![T::zero(); n - 1];
    let mut alpha = vec![T::zero(); n];
    let mut z = vec![T::zero(); n];

    alpha[0] = diag[0];
    if alpha[0] == T::zero() {
        return Err(LinalgError::Singular);
    }
    z[0] = b[0];
    for i in 1..n {
        gamma[i - 1] = offdiag[i - 1] / alpha[i - 1];
        alpha[i] = diag[i] - offdiag[i - 1] * gamma[i - 1];
        if alpha[i] == T::zero() {
            return Err(LinalgError::Singular);
        }
        z[i] = b[i] - gamma[i - 1] * z[i - 1];
    }

    let mut x = Vector::zeros(n, T::zero());
    x[n - 1] = z[n - 1] / alpha[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = z[i] / alpha[i] - gamma[i] * x[i + 1];
    }

    Ok(x)
}

/// Solve the cyclic variant, where `offdiag[N - 1]` couples the last row
/// to the first.
///
/// Sherman-Morrison: the corner terms are split off as a rank-1
/// correction to a plain tridiagonal system, solved twice with
/// [`solve_symm_tridiag`] and recombined. Requires `N >= 3` so the
/// corner entries do not overlap the inner band.
pub fn solve_symm_cyc_tridiag<T: FloatScalar>(
    diag: &[T],
    offdiag: &[T],
    b: &[T],
) -> Result<Vector<T>, LinalgError> {
    let n = diag.len();
    if n < 3 || offdiag.len() != n || b.len() != n {
        return Err(LinalgError::BadLength);
    }

    // A = T' + u v^T with u = (gamma, 0, ..., 0, f) and
    // v = (1, 0, ..., 0, f/gamma); T' absorbs the corner into its ends.
    let f = offdiag[n - 1];
    let gamma = -diag[0];
    if gamma == T::zero() {
        return Err(LinalgError::Singular);
    }

    let mut dd = vec![T::zero(); n];
    dd.copy_from_slice(diag);
    dd[0] = diag[0] - gamma;
    dd[n - 1] = diag[n - 1] - f * f / gamma;

    let mut u = vec![T::zero(); n];
    u[0] = gamma;
    u[n - 1] = f;

    let y = solve_symm_tridiag(&dd, &offdiag[..n - 1], b)?;
    let z = solve_symm_tridiag(&dd, &offdiag[..n - 1], &u)?;

    let fg = f / gamma;
    let denom = T::one() + z[0] + fg * z[n - 1];
    if denom == T::zero() {
        return Err(LinalgError::Singular);
    }
    let factor = (y[0] + fg * y[n - 1]) / denom;

    let mut x = Vector::zeros(n, T::zero());
    for i in 0..n {
        x[i] = y[i] - factor * z[i];
    }

    Ok(x)
}
