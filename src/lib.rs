//! # factoris
//!
//! Dense linear-algebra decompositions and solvers in pure Rust, no-std
//! compatible (requires `alloc`). Covers the classic direct-solve toolbox
//! for small-to-medium dense systems: LU with partial pivoting, Householder
//! QR, QR with column pivoting, a one-shot Householder solver, and O(n)
//! symmetric tridiagonal solvers.
//!
//! ## Quick start
//!
//! ```
//! use factoris::{Matrix, Vector};
//!
//! // Solve a linear system Ax = b
//! let a = Matrix::from_rows(3, 3, &[
//!     2.0_f64, 1.0, -1.0,
//!     -3.0, -1.0, 2.0,
//!     -2.0, 1.0, 2.0,
//! ]);
//! let b = Vector::from_slice(&[8.0, -11.0, -3.0]);
//! let x = a.solve(&b).unwrap(); // x = [2, 3, -1]
//! ```
//!
//! ## Modules
//!
//! - [`matrix`]: Heap-allocated `Matrix<T>` with runtime dimensions,
//!   column-major `Vec<T>` storage. Implements [`MatrixRef`] / [`MatrixMut`],
//!   so the linalg free functions work with any conforming container.
//!   [`Vector<T>`] is a single-index newtype over a 1 x N matrix.
//!
//! - [`permutation`]: [`Permutation`], a bijection on `{0..n-1}` built up
//!   by the pivoted factorizations, applied to vectors forwards or inverse.
//!
//! - [`linalg`]: The decomposition engine. Free functions operate in place
//!   on `&mut impl MatrixMut<T>` (destructive, like the classic interfaces);
//!   wrapper structs ([`Lu`], [`Qr`], [`Qrpt`]) copy first and offer a
//!   higher-level API plus the shared [`Solver`] trait. Also the baseline
//!   [`linalg::matmult`] / [`linalg::matmult_mod`] kernels, Householder and
//!   Givens primitives, the one-shot [`linalg::hh_solve`], and
//!   [`linalg::solve_symm_tridiag`] / [`linalg::solve_symm_cyc_tridiag`].
//!
//! - [`traits`]: Element and container traits:
//!   - [`Scalar`]: all matrix elements (`Copy + PartialEq + Debug + Zero + One + Num`)
//!   - [`FloatScalar`]: real floats (`Scalar + Float`), required by decompositions
//!   - [`MatrixRef`] / [`MatrixMut`]: generic read/write access for algorithms
//!
//! ## Error handling
//!
//! Expected numerical failure is a value, not a fault: every fallible
//! operation returns `Result<_, LinalgError>`. An exact-zero pivot surfaces
//! as [`LinalgError::Singular`]; mismatched extents as
//! [`LinalgError::BadLength`]; a non-square input where a square one is
//! required as [`LinalgError::NotSquare`]. Decompositions that can produce a
//! meaningful partial result (LU) complete their remaining work and flag the
//! singularity instead of aborting.
//!
//! ## Cargo features
//!
//! | Feature | Default  | Description |
//! |---------|----------|-------------|
//! | `std`   | yes      | Implies `alloc`. Hardware FPU via system libm |
//! | `alloc` | via std  | Heap-allocated `Matrix` / `Vector` storage |
//! | `libm`  | no       | Pure-Rust software float fallback |

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod linalg;
pub mod matrix;
pub mod permutation;
pub mod traits;

pub use linalg::{LinalgError, Lu, Qr, Qrpt, Solver};
pub use matrix::vector::Vector;
pub use matrix::Matrix;
pub use permutation::Permutation;
pub use traits::{FloatScalar, MatrixMut, MatrixRef, Scalar};
