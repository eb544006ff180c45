//! Solvers for standard-form linear programs.
pub mod interior_point;

pub use interior_point::{ConvergenceState, InteriorPoint, SolveReport};

use crate::{error::SolverError, problem::Problem};

/// Trait any solver implements, to make experimentation with different
/// solvers easy.
pub trait Solver<F> {
    /// Solve a linear program. `Err` means the inputs or configuration
    /// were rejected before iterating; a run that terminates without
    /// reaching optimality still returns an `Ok` report carrying its
    /// terminal state.
    fn solve(&self, problem: &Problem<F>) -> Result<SolveReport<F>, SolverError>;
}
