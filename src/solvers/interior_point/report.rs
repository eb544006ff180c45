use std::fmt::Display;

use ndarray::Array1;

use crate::float::Float;
use crate::problem::Problem;

use super::iterate::Iterate;
use super::residuals::Residuals;

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConvergenceState {
    /// All residual norms dropped below the tolerance.
    Optimal,
    /// The iteration budget ran out first. Not an error: the caller may
    /// retry with a larger budget or a looser tolerance.
    IterationLimitReached,
    /// A factorization failed or a computed quantity stopped being
    /// finite. The run aborts immediately; the report carries the last
    /// valid iterate for diagnosis.
    NumericalFailure,
}

impl Display for ConvergenceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvergenceState::Optimal => write!(f, "optimal"),
            ConvergenceState::IterationLimitReached => write!(f, "iteration limit reached"),
            ConvergenceState::NumericalFailure => write!(f, "numerical failure"),
        }
    }
}

/// Outcome of a solve: the terminal state, the final iterate and the
/// residual norms it achieved.
#[derive(Clone, Debug)]
pub struct SolveReport<F> {
    x: Array1<F>,
    y: Array1<F>,
    s: Array1<F>,
    state: ConvergenceState,
    iterations: usize,
    objective: F,
    primal_norm: F,
    dual_norm: F,
    complementarity_norm: F,
}

impl<F: Float> SolveReport<F> {
    pub(crate) fn new(
        problem: &Problem<F>,
        point: Iterate<F>,
        state: ConvergenceState,
        iterations: usize,
    ) -> SolveReport<F> {
        let residuals = Residuals::compute(problem, &point);
        SolveReport {
            objective: problem.objective(&point.x),
            primal_norm: residuals.primal_norm(),
            dual_norm: residuals.dual_norm(),
            complementarity_norm: residuals.complementarity_norm(),
            x: point.x,
            y: point.y,
            s: point.s,
            state,
            iterations,
        }
    }

    /// The primal solution vector.
    pub fn x(&self) -> &Array1<F> {
        &self.x
    }

    /// The dual multipliers for the equality constraints.
    pub fn y(&self) -> &Array1<F> {
        &self.y
    }

    /// The dual slack vector.
    pub fn s(&self) -> &Array1<F> {
        &self.s
    }

    pub fn state(&self) -> ConvergenceState {
        self.state
    }

    /// Iterations performed before the run terminated.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// The objective value `c'x` at the final iterate.
    pub fn objective(&self) -> F {
        self.objective
    }

    /// `‖Ax - b‖` at the final iterate.
    pub fn primal_norm(&self) -> F {
        self.primal_norm
    }

    /// `‖A'y + s - c‖` at the final iterate.
    pub fn dual_norm(&self) -> F {
        self.dual_norm
    }

    /// `‖x ∘ s‖` at the final iterate.
    pub fn complementarity_norm(&self) -> F {
        self.complementarity_norm
    }
}
