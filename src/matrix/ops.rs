use core::ops::{Add, Mul, Neg, Sub};

use crate::linalg::multiply::matmult;
use crate::traits::Scalar;

use super::vector::Vector;
use super::Matrix;

// ── Element-wise addition ───────────────────────────────────────────

impl<T: Scalar> Add for &Matrix<T> {
    type Output = Matrix<T>;

    fn add(self, rhs: &Matrix<T>) -> Matrix<T> {
        assert_eq!(
            (self.nrows(), self.ncols()),
            (rhs.nrows(), rhs.ncols()),
            "dimension mismatch: {}x{} + {}x{}",
            self.nrows(),
            self.ncols(),
            rhs.nrows(),
            rhs.ncols(),
        );
        let data = self
            .as_slice()
            .iter()
            .zip(rhs.as_slice().iter())
            .map(|(&a, &b)| a + b)
            .collect();
        Matrix::from_vec(self.nrows(), self.ncols(), data)
    }
}

impl<T: Scalar> Add for Matrix<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        &self + &rhs
    }
}

// ── Element-wise subtraction ────────────────────────────────────────

impl<T: Scalar> Sub for &Matrix<T> {
    type Output = Matrix<T>;

    fn sub(self, rhs: &Matrix<T>) -> Matrix<T> {
        assert_eq!(
            (self.nrows(), self.ncols()),
            (rhs.nrows(), rhs.ncols()),
            "dimension mismatch: {}x{} - {}x{}",
            self.nrows(),
            self.ncols(),
            rhs.nrows(),
            rhs.ncols(),
        );
        let data = self
            .as_slice()
            .iter()
            .zip(rhs.as_slice().iter())
            .map(|(&a, &b)| a - b)
            .collect();
        Matrix::from_vec(self.nrows(), self.ncols(), data)
    }
}

impl<T: Scalar> Sub for Matrix<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        &self - &rhs
    }
}

// ── Negation ────────────────────────────────────────────────────────

impl<T: Scalar> Neg for &Matrix<T> {
    type Output = Matrix<T>;

    fn neg(self) -> Matrix<T> {
        let data = self.as_slice().iter().map(|&x| T::zero() - x).collect();
        Matrix::from_vec(self.nrows(), self.ncols(), data)
    }
}

impl<T: Scalar> Neg for Matrix<T> {
    type Output = Self;

    fn neg(self) -> Self {
        -&self
    }
}

// ── Matrix multiplication: (M×N) * (N×P) → (M×P) ──────────────────

impl<T: Scalar> Mul for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: &Matrix<T>) -> Matrix<T> {
        assert_eq!(
            self.ncols(),
            rhs.nrows(),
            "dimension mismatch: {}x{} * {}x{}",
            self.nrows(),
            self.ncols(),
            rhs.nrows(),
            rhs.ncols(),
        );
        let mut c = Matrix::zeros(self.nrows(), rhs.ncols(), T::zero());
        matmult(self, rhs, &mut c).unwrap();
        c
    }
}

impl<T: Scalar> Mul for Matrix<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        &self * &rhs
    }
}

// ── Scalar multiplication ───────────────────────────────────────────

impl<T: Scalar> Mul<T> for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: T) -> Matrix<T> {
        let data = self.as_slice().iter().map(|&x| x * rhs).collect();
        Matrix::from_vec(self.nrows(), self.ncols(), data)
    }
}

impl<T: Scalar> Mul<T> for Matrix<T> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        &self * rhs
    }
}

// ── Matrix-vector product ───────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// Matrix-vector product `A * x`.
    ///
    /// ```
    /// use factoris::{Matrix, Vector};
    /// let a = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// let x = Vector::from_slice(&[1.0, 1.0]);
    /// let y = a.matvec(&x);
    /// assert_eq!(y[0], 3.0);
    /// assert_eq!(y[1], 7.0);
    /// ```
    pub fn matvec(&self, x: &Vector<T>) -> Vector<T> {
        assert_eq!(
            self.ncols(),
            x.len(),
            "dimension mismatch: {}x{} * vector of length {}",
            self.nrows(),
            self.ncols(),
            x.len(),
        );
        let mut y = Vector::zeros(self.nrows(), T::zero());
        for j in 0..self.ncols() {
            let xj = x[j];
            for i in 0..self.nrows() {
                y[i] = y[i] + self[(i, j)] * xj;
            }
        }
        y
    }
}

// ── Vector arithmetic ───────────────────────────────────────────────

impl<T: Scalar> Add for &Vector<T> {
    type Output = Vector<T>;

    fn add(self, rhs: &Vector<T>) -> Vector<T> {
        Vector {
            inner: &self.inner + &rhs.inner,
        }
    }
}

impl<T: Scalar> Add for Vector<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        &self + &rhs
    }
}

impl<T: Scalar> Sub for &Vector<T> {
    type Output = Vector<T>;

    fn sub(self, rhs: &Vector<T>) -> Vector<T> {
        Vector {
            inner: &self.inner - &rhs.inner,
        }
    }
}

impl<T: Scalar> Sub for Vector<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        &self - &rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_sub() {
        let a = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let b = Matrix::from_rows(2, 2, &[5.0, 6.0, 7.0, 8.0]);
        let sum = &a + &b;
        assert_eq!(sum[(0, 0)], 6.0);
        assert_eq!(sum[(1, 1)], 12.0);
        let diff = sum - b;
        assert_eq!(diff, a);
    }

    #[test]
    fn neg() {
        let a = Matrix::from_rows(2, 2, &[1.0, -2.0, 3.0, -4.0]);
        let n = -&a;
        assert_eq!(n[(0, 0)], -1.0);
        assert_eq!(n[(0, 1)], 2.0);
    }

    #[test]
    fn matmul() {
        let a = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = Matrix::from_rows(3, 2, &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
        let c = &a * &b;
        assert_eq!(c.nrows(), 2);
        assert_eq!(c.ncols(), 2);
        assert_eq!(c[(0, 0)], 58.0);
        assert_eq!(c[(0, 1)], 64.0);
        assert_eq!(c[(1, 0)], 139.0);
        assert_eq!(c[(1, 1)], 154.0);
    }

    #[test]
    fn matmul_matches_kernel() {
        let a = Matrix::from_rows(3, 2, &[1.0_f64, -2.0, 0.5, 4.0, 3.0, 6.0]);
        let b = Matrix::from_rows(2, 4, &[2.0_f64, 0.0, -1.0, 5.0, 1.5, 7.0, 2.0, -3.0]);
        let via_op = &a * &b;
        let mut via_kernel = Matrix::zeros(3, 4, 0.0);
        matmult(&a, &b, &mut via_kernel).unwrap();
        assert_eq!(via_op, via_kernel);
    }

    #[test]
    #[should_panic(expected = "dimension mismatch")]
    fn matmul_mismatch() {
        let a = Matrix::zeros(2, 3, 0.0_f64);
        let b = Matrix::zeros(2, 2, 0.0_f64);
        let _ = &a * &b;
    }

    #[test]
    fn scalar_mul() {
        let a = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let s = &a * 2.0;
        assert_eq!(s[(1, 0)], 6.0);
    }

    #[test]
    fn matvec() {
        let a = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let x = Vector::from_slice(&[1.0, 0.0, -1.0]);
        let y = a.matvec(&x);
        assert_eq!(y[0], -2.0);
        assert_eq!(y[1], -2.0);
    }

    #[test]
    fn vector_add_sub() {
        let a = Vector::from_slice(&[1.0, 2.0]);
        let b = Vector::from_slice(&[3.0, 5.0]);
        let sum = &a + &b;
        assert_eq!(sum[1], 7.0);
        let diff = sum - a;
        assert_eq!(diff, b);
    }
}
