pub(crate) mod givens;
pub(crate) mod hh;
pub(crate) mod householder;
pub(crate) mod lu;
pub(crate) mod multiply;
pub(crate) mod qr;
pub(crate) mod qrpt;
pub(crate) mod tridiag;

pub use givens::{apply_givens_qr, apply_givens_vec, create_givens};
pub use hh::{hh_solve, hh_svx};
pub use householder::{householder_hm, householder_hv, householder_transform};
pub use lu::{
    lu_det, lu_in_place, lu_invert, lu_lndet, lu_refine, lu_sgndet, lu_solve, lu_svx, Lu,
};
pub use multiply::{matmult, matmult_mod, MatrixMod};
pub use qr::{
    qr_in_place, qr_qrsolve, qr_qtvec, qr_solve, qr_svx, qr_unpack, qr_update, r_solve, r_svx, Qr,
};
pub use qrpt::{
    qrpt_in_place, qrpt_qrsolve, qrpt_rsolve, qrpt_solve, qrpt_svx, qrpt_update, Qrpt,
};
pub use tridiag::{solve_symm_cyc_tridiag, solve_symm_tridiag};

use crate::matrix::vector::Vector;
use crate::matrix::Matrix;
use crate::traits::FloatScalar;

/// Errors from linear algebra operations.
///
/// Expected numerical failure is reported, never panicked: singularity and
/// extent mismatches are routine outcomes for callers feeding in arbitrary
/// systems.
///
/// ```
/// use factoris::Matrix;
/// use factoris::linalg::LinalgError;
///
/// let singular = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 2.0, 4.0]);
/// let lu = factoris::Lu::new(&singular).unwrap();
/// assert!(lu.is_singular());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinalgError {
    /// A zero pivot was encountered; the system has no unique solution.
    Singular,
    /// Operand extents do not agree.
    BadLength,
    /// A square matrix is required.
    NotSquare,
}

impl core::fmt::Display for LinalgError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LinalgError::Singular => write!(f, "matrix is singular"),
            LinalgError::BadLength => write!(f, "operand lengths do not match"),
            LinalgError::NotSquare => write!(f, "matrix is not square"),
        }
    }
}

/// Common decompose-and-solve interface shared by the factorization
/// families ([`Lu`], [`Qr`], [`Qrpt`]).
///
/// Each family keeps its own side data (permutation, signum, tau vector),
/// but once built they all answer the same two questions: solve into a
/// fresh vector, or solve in place.
///
/// ```
/// use factoris::{Matrix, Vector, Lu, Qr, Solver};
///
/// let a = Matrix::from_rows(2, 2, &[2.0_f64, 1.0, 5.0, 3.0]);
/// let b = Vector::from_slice(&[4.0, 11.0]);
///
/// let solvers: [&dyn Solver<f64>; 2] = [
///     &Lu::new(&a).unwrap(),
///     &Qr::new(&a).unwrap(),
/// ];
/// for s in solvers {
///     let x = s.solve(&b).unwrap();
///     assert!((x[0] - 1.0).abs() < 1e-12);
///     assert!((x[1] - 2.0).abs() < 1e-12);
/// }
/// ```
pub trait Solver<T> {
    /// Solve `A x = b`, returning a fresh solution vector.
    fn solve(&self, b: &Vector<T>) -> Result<Vector<T>, LinalgError>;

    /// Solve `A x = b` in place, overwriting `x` (the right-hand side on
    /// entry) with the solution.
    fn svx(&self, x: &mut Vector<T>) -> Result<(), LinalgError>;
}

impl<T: FloatScalar> Matrix<T> {
    /// Solve `self * x = b` with a one-off LU factorization.
    ///
    /// Convenience for a single right-hand side; build a [`Lu`] (or
    /// [`Qr`], [`Qrpt`]) explicitly to reuse the factorization.
    pub fn solve(&self, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        Lu::new(self)?.solve(b)
    }
}
