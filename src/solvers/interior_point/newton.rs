use crate::float::Float;
use crate::problem::Problem;

use super::augmented;
use super::direction::Delta;
use super::iterate::Iterate;
use super::normal;
use super::residuals::Residuals;

/// Which linear system the search direction is computed from.
///
/// Both forms solve the same perturbed KKT conditions; they trade
/// factorization cost against robustness.
///
/// * [`Augmented`](SystemForm::Augmented) assembles the full
///   `(2n+m) × (2n+m)` KKT matrix and solves it by dense QR. Direct but
///   `O((2n+m)^3)` per iteration, suited to small problems.
/// * [`NormalEquations`](SystemForm::NormalEquations) eliminates `dx`
///   and `ds` algebraically and factorizes the reduced `m × m` matrix
///   `A diag(x/s) A' + eps I` instead, by dense Cholesky for a dense
///   constraint matrix or sparse LDL' for a CSR one. Preferred when
///   `m` is much smaller than `n`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SystemForm {
    Augmented,
    NormalEquations,
}

/// Marker for a factorization that failed or produced garbage. The
/// driver translates it into the `NumericalFailure` terminal state.
pub(crate) struct NumericalBreakdown;

/// Solve the Newton system for the current iterate and centering
/// parameter `sigma`. The factorization is rebuilt from scratch; the
/// `x/s` ratios change every step, so nothing can be reused across
/// iterations.
#[allow(clippy::too_many_arguments)]
pub(crate) fn solve_direction<F: Float>(
    form: SystemForm,
    problem: &Problem<F>,
    point: &Iterate<F>,
    residuals: &Residuals<F>,
    sigma: F,
    regularization: F,
    refine: bool,
    tol: F,
) -> Result<Delta<F>, NumericalBreakdown> {
    // Centering right-hand side: sigma mu - x_i s_i.
    let rc = residuals
        .complementarity
        .mapv(|ci| sigma * residuals.mu - ci);
    match form {
        SystemForm::Augmented => augmented::solve(problem, point, residuals, &rc, refine, tol),
        SystemForm::NormalEquations => normal::solve(problem, point, residuals, &rc, regularization),
    }
}
