use thiserror::Error;

/// Errors detected before the first iteration runs.
///
/// Anything that goes wrong *during* a run (a singular factorization, a
/// non-finite search direction) is not an error but a terminal
/// [`ConvergenceState`](crate::solvers::interior_point::ConvergenceState),
/// reported together with the last valid iterate.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SolverError {
    #[error("{0}")]
    InvalidParameter(&'static str),
    #[error("The dimensions of the cost vector, constraint matrix and right-hand side do not align, or the problem is empty.")]
    IncompatibleDimensions,
}
