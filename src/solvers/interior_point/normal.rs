//! The reduced normal-equations system.
//!
//! Eliminating `ds` and `dx` from the Newton conditions leaves the
//! `m × m` symmetric positive definite system
//! ```text
//! (A D A' + eps I) dy = -r_p - A D (r_d + rc / x),    D = diag(x / s)
//! ```
//! followed by the back-substitutions
//! ```text
//! dx = D (A'dy + r_d + rc / x)
//! ds = -r_d - A'dy
//! ```
//! The `eps` perturbation on the diagonal guards against the
//! near-singularity that `x/s` ratios approaching zero cause close to
//! the optimum. A dense constraint matrix goes through a dense Cholesky
//! factorization, a CSR one through a sparse LDL' with fill-reducing
//! ordering.

use linfa_linalg::cholesky::SolveCInplace;
use ndarray::{Array1, Array2, Axis};
use sprs::{CsMat, FillInReduction, SymmetryCheck, TriMat};
use sprs_ldl::Ldl;
use std::cmp::Ordering;

use crate::float::Float;
use crate::problem::{ConstraintMatrix, Problem};

use super::direction::Delta;
use super::iterate::Iterate;
use super::newton::NumericalBreakdown;
use super::residuals::Residuals;

pub(crate) fn solve<F: Float>(
    problem: &Problem<F>,
    point: &Iterate<F>,
    residuals: &Residuals<F>,
    rc: &Array1<F>,
    regularization: F,
) -> Result<Delta<F>, NumericalBreakdown> {
    let d = &point.x / &point.s;
    let w = &residuals.dual + &(rc / &point.x);
    let rhs = &residuals.primal.mapv(|e| -e) - &problem.A().mul_vec(&(&d * &w));

    let dy = match problem.A() {
        ConstraintMatrix::Dense(a) => dense_solve(a, &d, &rhs, regularization)?,
        ConstraintMatrix::Sparse(a) => sparse_solve(a, &d, &rhs, regularization)?,
    };

    let aty = problem.A().mul_transpose_vec(&dy);
    let dx = &d * &(&aty + &w);
    let ds = &residuals.dual.mapv(|e| -e) - &aty;
    Ok(Delta { dx, dy, ds })
}

fn dense_solve<F: Float>(
    a: &Array2<F>,
    d: &Array1<F>,
    rhs: &Array1<F>,
    regularization: F,
) -> Result<Array1<F>, NumericalBreakdown> {
    let mut m_mat = a.dot(&(&d.clone().insert_axis(Axis(1)) * &a.t()));
    for e in m_mat.diag_mut() {
        *e += regularization;
    }
    // solvec_into factorizes m_mat in place; handing it a
    // pre-computed Cholesky factor would factorize the factor.
    let b = rhs.view().insert_axis(Axis(1)).into_owned();
    let solved = m_mat.solvec_into(b).or(Err(NumericalBreakdown))?;
    Ok(solved.remove_axis(Axis(1)))
}

fn sparse_solve<F: Float>(
    a: &CsMat<F>,
    d: &Array1<F>,
    rhs: &Array1<F>,
    regularization: F,
) -> Result<Array1<F>, NumericalBreakdown> {
    let m_mat = assemble_sparse(a, d, regularization);
    let ldl = Ldl::new()
        .check_symmetry(SymmetryCheck::DontCheckSymmetry)
        .fill_in_reduction(FillInReduction::ReverseCuthillMcKee)
        .numeric(m_mat.view())
        .or(Err(NumericalBreakdown))?;
    let rhs_vec = rhs.to_vec();
    Ok(Array1::from(ldl.solve(rhs_vec.as_slice())))
}

/// `A D A' + eps I` from CSR rows: entry `(i, j)` is the `d`-weighted
/// dot product of rows `i` and `j`, computed by merging the sorted
/// index lists. Quadratic in `m`, which the normal-equations form
/// assumes is small.
fn assemble_sparse<F: Float>(a: &CsMat<F>, d: &Array1<F>, regularization: F) -> CsMat<F> {
    let m = a.rows();
    let rows: Vec<Vec<(usize, F)>> = a
        .outer_iterator()
        .map(|row| row.iter().map(|(j, &v)| (j, v)).collect())
        .collect();

    let mut triplets = TriMat::new((m, m));
    for i in 0..m {
        for j in 0..=i {
            let mut acc = F::zero();
            let (ri, rj) = (&rows[i], &rows[j]);
            let (mut p, mut q) = (0, 0);
            while p < ri.len() && q < rj.len() {
                match ri[p].0.cmp(&rj[q].0) {
                    Ordering::Less => p += 1,
                    Ordering::Greater => q += 1,
                    Ordering::Equal => {
                        acc += ri[p].1 * d[ri[p].0] * rj[q].1;
                        p += 1;
                        q += 1;
                    }
                }
            }
            if i == j {
                // The diagonal is always structurally present, so the
                // regularization reaches empty rows too.
                triplets.add_triplet(i, i, acc + regularization);
            } else if acc != F::zero() {
                triplets.add_triplet(i, j, acc);
                triplets.add_triplet(j, i, acc);
            }
        }
    }
    triplets.to_csc()
}
