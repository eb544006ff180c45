#![allow(non_snake_case)]
//! Definition of a standard-form linear program.
//!
//! Variables throughout this crate use the following naming convention:
//! ```text
//! min_x c'x
//! st    A x == b
//!         x >= 0
//! ```
//! with cost vector `c`, an `m × n` constraint matrix `A` (dense or
//! sparse) and right-hand side `b`. The matrix is assumed to have full
//! row rank `m <= n`; this is not checked, a rank-deficient matrix
//! surfaces as a numerical failure during factorization.

use crate::{error::SolverError, float::Float};
use ndarray::{Array1, Array2};
use sprs::CsMat;

/// The constraint matrix of a [`Problem`], either dense or in CSR form.
///
/// The sparse representation pays off in the normal-equations system
/// form when `m` is much smaller than `n`; the solver otherwise treats
/// both representations identically.
#[derive(Debug)]
pub enum ConstraintMatrix<F> {
    Dense(Array2<F>),
    Sparse(CsMat<F>),
}

impl<F: Float> ConstraintMatrix<F> {
    /// `(m, n)` dimensions.
    pub fn dims(&self) -> (usize, usize) {
        match self {
            ConstraintMatrix::Dense(A) => A.dim(),
            ConstraintMatrix::Sparse(A) => (A.rows(), A.cols()),
        }
    }

    /// `A v`, freshly allocated.
    pub fn mul_vec(&self, v: &Array1<F>) -> Array1<F> {
        match self {
            ConstraintMatrix::Dense(A) => A.dot(v),
            ConstraintMatrix::Sparse(A) => {
                let mut out = Array1::zeros(A.rows());
                for (i, row) in A.outer_iterator().enumerate() {
                    let mut acc = F::zero();
                    for (j, &a) in row.iter() {
                        acc = acc + a * v[j];
                    }
                    out[i] = acc;
                }
                out
            }
        }
    }

    /// `A' v`, freshly allocated.
    pub fn mul_transpose_vec(&self, v: &Array1<F>) -> Array1<F> {
        match self {
            ConstraintMatrix::Dense(A) => A.t().dot(v),
            ConstraintMatrix::Sparse(A) => {
                let mut out = Array1::zeros(A.cols());
                for (i, row) in A.outer_iterator().enumerate() {
                    for (j, &a) in row.iter() {
                        out[j] += a * v[i];
                    }
                }
                out
            }
        }
    }

    /// A dense copy of the matrix. The augmented system form assembles
    /// its KKT matrix densely regardless of the input representation.
    pub(crate) fn to_dense(&self) -> Array2<F> {
        match self {
            ConstraintMatrix::Dense(A) => A.clone(),
            ConstraintMatrix::Sparse(A) => {
                let mut out = Array2::zeros((A.rows(), A.cols()));
                for (i, row) in A.outer_iterator().enumerate() {
                    for (j, &a) in row.iter() {
                        out[(i, j)] = a;
                    }
                }
                out
            }
        }
    }
}

/// A standard-form linear program `min c'x st Ax == b, x >= 0`.
///
/// Construct one with [`Problem::dense`] or [`Problem::sparse`]; both
/// validate the input shapes and reject empty problems. The problem is
/// immutable once built and only read by the solver.
#[derive(Debug)]
pub struct Problem<F> {
    A: ConstraintMatrix<F>,
    b: Array1<F>,
    c: Array1<F>,
}

impl<F: Float> Problem<F> {
    /// Build a problem with a dense constraint matrix.
    ///
    /// Returns [`SolverError::IncompatibleDimensions`] if `c` has a
    /// different length than `A` has columns, `b` a different length
    /// than `A` has rows, or either dimension is zero.
    pub fn dense(c: &Array1<F>, A: &Array2<F>, b: &Array1<F>) -> Result<Problem<F>, SolverError> {
        Self::build(c, ConstraintMatrix::Dense(A.clone()), b)
    }

    /// Build a problem with a CSR constraint matrix.
    pub fn sparse(c: &Array1<F>, A: CsMat<F>, b: &Array1<F>) -> Result<Problem<F>, SolverError> {
        let A = if A.is_csr() { A } else { A.to_csr() };
        Self::build(c, ConstraintMatrix::Sparse(A), b)
    }

    fn build(
        c: &Array1<F>,
        A: ConstraintMatrix<F>,
        b: &Array1<F>,
    ) -> Result<Problem<F>, SolverError> {
        let (m, n) = A.dims();
        if m == 0 || n == 0 || c.len() != n || b.len() != m {
            return Err(SolverError::IncompatibleDimensions);
        }
        Ok(Problem {
            A,
            b: b.clone(),
            c: c.clone(),
        })
    }

    /// The constraint matrix.
    pub fn A(&self) -> &ConstraintMatrix<F> {
        &self.A
    }

    /// The right-hand side vector.
    pub fn b(&self) -> &Array1<F> {
        &self.b
    }

    /// The cost vector.
    pub fn c(&self) -> &Array1<F> {
        &self.c
    }

    /// `(m, n)` dimensions of the constraint matrix.
    pub fn dims(&self) -> (usize, usize) {
        self.A.dims()
    }

    /// The objective value `c'x` at a given point.
    pub fn objective(&self, x: &Array1<F>) -> F {
        self.c.dot(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use sprs::TriMat;

    #[test]
    fn rejects_misaligned_shapes() {
        let A = array![[1., 2.], [3., 4.]];
        let b = array![1., 2.];
        let c3 = array![1., 2., 3.];
        assert_eq!(
            Problem::dense(&c3, &A, &b).unwrap_err(),
            SolverError::IncompatibleDimensions
        );
        let b3 = array![1., 2., 3.];
        let c = array![1., 2.];
        assert_eq!(
            Problem::dense(&c, &A, &b3).unwrap_err(),
            SolverError::IncompatibleDimensions
        );
    }

    #[test]
    fn rejects_empty_problem() {
        let A = Array2::<f64>::zeros((0, 2));
        let b = Array1::zeros(0);
        let c = array![1., 2.];
        assert_eq!(
            Problem::dense(&c, &A, &b).unwrap_err(),
            SolverError::IncompatibleDimensions
        );
    }

    #[test]
    fn sparse_matvec_agrees_with_dense() {
        let A = array![[1., 0., 2.], [0., 3., 0.]];
        let mut tri = TriMat::new((2, 3));
        tri.add_triplet(0, 0, 1.);
        tri.add_triplet(0, 2, 2.);
        tri.add_triplet(1, 1, 3.);
        let sparse = ConstraintMatrix::Sparse(tri.to_csr());
        let dense = ConstraintMatrix::Dense(A);

        let v = array![1., 2., 3.];
        assert_abs_diff_eq!(sparse.mul_vec(&v), dense.mul_vec(&v), epsilon = 1e-12);
        let w = array![1., -1.];
        assert_abs_diff_eq!(
            sparse.mul_transpose_vec(&w),
            dense.mul_transpose_vec(&w),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(sparse.to_dense(), dense.to_dense(), epsilon = 1e-12);
    }
}
