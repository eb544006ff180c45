//! The full augmented KKT system, solved densely.
//!
//! With `X = diag(x)` and `S = diag(s)`, the Newton conditions for the
//! direction `(dx, dy, ds)` are
//! ```text
//! S dx      + X ds = sigma mu 1 - x ∘ s
//! A dx             = -(A x - b)
//!      A'dy +   ds = -(A'y + s - c)
//! ```
//! assembled here as one square `(2n+m)` matrix and solved by QR. An
//! optional iterative-refinement pass re-solves against the residual of
//! the assembled system a few times, which helps when the diagonal
//! blocks have widely different magnitudes near convergence.

use linfa_linalg::qr::{QRDecomp, QR};
use ndarray::{s, Array1, Array2, Axis, OwnedRepr};

use crate::float::Float;
use crate::problem::Problem;

use super::direction::Delta;
use super::iterate::Iterate;
use super::newton::NumericalBreakdown;
use super::residuals::{norm, Residuals};

/// Correction solves applied at most, per direction.
const MAX_REFINEMENTS: usize = 3;

pub(crate) fn solve<F: Float>(
    problem: &Problem<F>,
    point: &Iterate<F>,
    residuals: &Residuals<F>,
    rc: &Array1<F>,
    refine: bool,
    tol: F,
) -> Result<Delta<F>, NumericalBreakdown> {
    let (m, n) = problem.dims();
    let (kkt, rhs) = assemble(problem, point, residuals, rc);

    let factor = kkt.qr().or(Err(NumericalBreakdown))?;
    let mut solution = qr_solve(&factor, &rhs)?;
    if refine {
        refine_solution(&factor, &kkt, &rhs, &mut solution, tol)?;
    }

    Ok(Delta {
        dx: solution.slice(s![..n]).to_owned(),
        dy: solution.slice(s![n..n + m]).to_owned(),
        ds: solution.slice(s![n + m..]).to_owned(),
    })
}

fn assemble<F: Float>(
    problem: &Problem<F>,
    point: &Iterate<F>,
    residuals: &Residuals<F>,
    rc: &Array1<F>,
) -> (Array2<F>, Array1<F>) {
    let (m, n) = problem.dims();
    let a = problem.A().to_dense();
    let dim = 2 * n + m;
    let mut kkt = Array2::zeros((dim, dim));
    let mut rhs = Array1::zeros(dim);

    for i in 0..n {
        kkt[(i, i)] = point.s[i];
        kkt[(i, n + m + i)] = point.x[i];
        rhs[i] = rc[i];
    }
    for i in 0..m {
        for j in 0..n {
            kkt[(n + i, j)] = a[(i, j)];
        }
        rhs[n + i] = -residuals.primal[i];
    }
    for j in 0..n {
        for i in 0..m {
            kkt[(n + m + j, n + i)] = a[(i, j)];
        }
        kkt[(n + m + j, n + m + j)] = F::one();
        rhs[n + m + j] = -residuals.dual[j];
    }
    (kkt, rhs)
}

fn qr_solve<F: Float>(
    factor: &QRDecomp<F, OwnedRepr<F>>,
    rhs: &Array1<F>,
) -> Result<Array1<F>, NumericalBreakdown> {
    let b = rhs.view().insert_axis(Axis(1)).into_owned();
    let solved = factor.solve_into(b).or(Err(NumericalBreakdown))?;
    Ok(solved.remove_axis(Axis(1)))
}

/// At most [`MAX_REFINEMENTS`] correction solves against the residual
/// of the assembled system, reusing the factorization. Stops early once
/// the residual norm drops below `tol` or the candidate stops being
/// finite (a singular system is caught by the driver's direction
/// check, not here).
fn refine_solution<F: Float>(
    factor: &QRDecomp<F, OwnedRepr<F>>,
    kkt: &Array2<F>,
    rhs: &Array1<F>,
    solution: &mut Array1<F>,
    tol: F,
) -> Result<(), NumericalBreakdown> {
    for _ in 0..MAX_REFINEMENTS {
        if !solution.iter().all(|e| e.is_finite()) {
            return Ok(());
        }
        let residual = rhs - &kkt.dot(solution);
        if norm(&residual) < tol {
            return Ok(());
        }
        let correction = qr_solve(factor, &residual)?;
        *solution = &*solution + &correction;
    }
    Ok(())
}
