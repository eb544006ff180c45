//! A pure-Rust primal-dual interior point solver for linear programs in
//! standard form.
//!
//! # Linear programs
//!
//! The solver consumes a numeric triple `(c, A, b)` describing
//!
//! ```text
//!    min_x c'x
//!    st    A x == b
//!            x >= 0
//! ```
//!
//! with an `m × n` constraint matrix `A` of full row rank, dense or
//! sparse, and follows the central path from the all-ones interior
//! start toward an optimal vertex. It returns the primal solution `x`,
//! the dual variables `(y, s)`, the terminal state and the residual
//! norms achieved; see [`SolveReport`](solvers::SolveReport).
//!
//! # Example
//! ```
//! use approx::assert_abs_diff_eq;
//! use ndarray::array;
//!
//! use lp_ipm::Problem;
//! use lp_ipm::solvers::{InteriorPoint, Solver};
//! use lp_ipm::solvers::interior_point::SystemForm;
//!
//! let c = array![-1., 4., -1.2];
//! let A = array![[2., 1., 0.], [0., 2., 1.], [1., 0., 2.]];
//! let b = array![1., 2., 3.];
//! let problem = Problem::dense(&c, &A, &b).unwrap();
//!
//! // These are the default values you can overwrite; omit any option
//! // for which the default is good enough.
//! let solver = InteriorPoint::custom()
//!     .system_form(SystemForm::NormalEquations)
//!     .tol(1e-8)
//!     .sigma(0.1)
//!     .max_iter(1000)
//!     .disp(false)
//!     .build()
//!     .unwrap();
//!
//! let report = solver.solve(&problem).unwrap();
//!
//! assert_abs_diff_eq!(*report.x(), array![1. / 3., 1. / 3., 4. / 3.], epsilon = 1e-6);
//! ```

pub mod error;
pub mod float;
pub mod prelude;
pub mod problem;
pub mod solvers;

pub use error::SolverError;
pub use problem::{ConstraintMatrix, Problem};
pub use solvers::interior_point::solve_standard_form;
