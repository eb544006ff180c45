#[doc(no_inline)]
pub use crate::error::SolverError;
#[doc(no_inline)]
pub use crate::problem::{ConstraintMatrix, Problem};
#[doc(no_inline)]
pub use crate::solvers::interior_point::{
    solve_standard_form, ConvergenceState, InteriorPoint, SolveReport, StepRule, SystemForm,
};
#[doc(no_inline)]
pub use crate::solvers::Solver;
