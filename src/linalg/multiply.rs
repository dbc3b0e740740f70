use crate::linalg::LinalgError;
use crate::traits::{MatrixMut, MatrixRef, Scalar};

/// Operand modifier for [`matmult_mod`].
///
/// `Transpose` swaps the index roles of an operand in the accumulation
/// loop; no transposed copy is ever materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatrixMod {
    /// Use the operand as-is.
    #[default]
    None,
    /// Use the transpose of the operand.
    Transpose,
}

impl MatrixMod {
    #[inline]
    fn dims<T>(self, m: &impl MatrixRef<T>) -> (usize, usize) {
        match self {
            MatrixMod::None => (m.nrows(), m.ncols()),
            MatrixMod::Transpose => (m.ncols(), m.nrows()),
        }
    }

    #[inline]
    fn at<T: Scalar>(self, m: &impl MatrixRef<T>, row: usize, col: usize) -> T {
        match self {
            MatrixMod::None => *m.get(row, col),
            MatrixMod::Transpose => *m.get(col, row),
        }
    }
}

/// Compute `C = A * B`.
///
/// All extents are validated before `c` is touched; on mismatch the output
/// is left unmodified and `Err(BadLength)` is returned.
///
/// ```
/// use factoris::Matrix;
/// use factoris::linalg::matmult;
///
/// let a = Matrix::from_rows(2, 2, &[10.0, 5.0, 1.0, 20.0]);
/// let b = Matrix::from_rows(2, 3, &[10.0, 5.0, 2.0, 1.0, 3.0, 2.0]);
/// let mut c = Matrix::zeros(2, 3, 0.0);
/// matmult(&a, &b, &mut c).unwrap();
/// assert_eq!(c[(0, 0)], 105.0);
/// assert_eq!(c[(1, 2)], 42.0);
/// ```
pub fn matmult<T: Scalar>(
    a: &impl MatrixRef<T>,
    b: &impl MatrixRef<T>,
    c: &mut impl MatrixMut<T>,
) -> Result<(), LinalgError> {
    matmult_mod(a, MatrixMod::None, b, MatrixMod::None, c)
}

/// Compute `C = op(A) * op(B)` where `op` is identity or transpose,
/// independently per operand.
///
/// The effective (post-transpose) inner dimensions must match, and `C`'s
/// extents must equal the effective outer dimensions. Transposition is
/// simulated by swapping index roles in the inner loop.
///
/// ```
/// use factoris::Matrix;
/// use factoris::linalg::{matmult_mod, MatrixMod};
///
/// let d = Matrix::from_rows(2, 3, &[10.0, 5.0, 1.0, 1.0, 20.0, 5.0]);
/// let e = Matrix::from_rows(2, 3, &[10.0, 5.0, 2.0, 1.0, 3.0, 2.0]);
/// // D^T (3x2) * E (2x3) -> 3x3
/// let mut c = Matrix::zeros(3, 3, 0.0);
/// matmult_mod(&d, MatrixMod::Transpose, &e, MatrixMod::None, &mut c).unwrap();
/// assert_eq!(c[(0, 0)], 101.0);
/// ```
pub fn matmult_mod<T: Scalar>(
    a: &impl MatrixRef<T>,
    mod_a: MatrixMod,
    b: &impl MatrixRef<T>,
    mod_b: MatrixMod,
    c: &mut impl MatrixMut<T>,
) -> Result<(), LinalgError> {
    let (am, an) = mod_a.dims(a);
    let (bm, bn) = mod_b.dims(b);

    if an != bm || c.nrows() != am || c.ncols() != bn {
        return Err(LinalgError::BadLength);
    }

    for i in 0..am {
        for j in 0..bn {
            let mut sum = T::zero();
            for k in 0..an {
                sum = sum + mod_a.at(a, i, k) * mod_b.at(b, k, j);
            }
            *c.get_mut(i, j) = sum;
        }
    }

    Ok(())
}
