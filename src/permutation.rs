use alloc::vec::Vec;

use crate::traits::Scalar;

/// A permutation of `{0..n-1}`, stored as an index vector.
///
/// Built up incrementally by the pivoted factorizations: LU records row
/// interchanges, QRPT records column interchanges. Starts as the identity
/// and stays a bijection under [`swap`](Permutation::swap).
///
/// # Examples
///
/// ```
/// use factoris::Permutation;
///
/// let mut p = Permutation::identity(3);
/// p.swap(0, 2);
/// assert_eq!(p.get(0), 2);
/// assert_eq!(p.get(2), 0);
/// assert!(p.is_valid());
///
/// let mut v = [10.0, 20.0, 30.0];
/// p.apply(&mut v); // v[i] <- v[p[i]]
/// assert_eq!(v, [30.0, 20.0, 10.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    index: Vec<usize>,
}

impl Permutation {
    /// The identity permutation on `{0..n-1}`.
    pub fn identity(n: usize) -> Self {
        Self {
            index: (0..n).collect(),
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the permutation is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// The image of `i`.
    #[inline]
    pub fn get(&self, i: usize) -> usize {
        self.index[i]
    }

    /// Reset to the identity.
    pub fn reset(&mut self) {
        for (i, p) in self.index.iter_mut().enumerate() {
            *p = i;
        }
    }

    /// Exchange the images of `i` and `j`.
    #[inline]
    pub fn swap(&mut self, i: usize, j: usize) {
        self.index.swap(i, j);
    }

    /// View the index vector.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.index
    }

    /// Check that the index vector is a bijection on `{0..n-1}`.
    pub fn is_valid(&self) -> bool {
        let n = self.index.len();
        let mut seen = alloc::vec![false; n];
        for &p in &self.index {
            if p >= n || seen[p] {
                return false;
            }
            seen[p] = true;
        }
        true
    }

    /// Apply the permutation to `v` in place: `v[i] <- v[p[i]]`.
    ///
    /// Panics if `v.len() != self.len()`.
    pub fn apply<T: Scalar>(&self, v: &mut [T]) {
        assert_eq!(v.len(), self.len(), "permutation length mismatch");
        let tmp: Vec<T> = v.to_vec();
        for (i, &p) in self.index.iter().enumerate() {
            v[i] = tmp[p];
        }
    }

    /// Apply the inverse permutation to `v` in place: `v[p[i]] <- v[i]`.
    ///
    /// Panics if `v.len() != self.len()`.
    pub fn apply_inverse<T: Scalar>(&self, v: &mut [T]) {
        assert_eq!(v.len(), self.len(), "permutation length mismatch");
        let tmp: Vec<T> = v.to_vec();
        for (i, &p) in self.index.iter().enumerate() {
            v[p] = tmp[i];
        }
    }
}
