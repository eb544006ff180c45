//! A primal-dual interior point solver for standard-form linear
//! programs.
//!
//! The solver follows the central path: each iteration evaluates the
//! optimality residuals of the current strictly interior iterate,
//! solves a Newton system for a search direction biased toward the
//! path by the centering parameter `sigma`, picks step lengths that
//! keep `x` and `s` strictly positive, and advances. It terminates as
//! soon as all residual norms are below the tolerance, the iteration
//! budget runs out, or a factorization breaks down numerically.
//!
//! The Newton system can be solved in two interchangeable forms, see
//! [`SystemForm`]; the surrounding loop is identical for both.

mod augmented;
mod direction;
mod iterate;
mod newton;
mod normal;
mod report;
mod residuals;
mod step;

use ndarray::{Array1, Array2};

pub use newton::SystemForm;
pub use report::{ConvergenceState, SolveReport};
pub use step::StepRule;

use crate::error::SolverError;
use crate::float::Float;
use crate::problem::Problem;
use crate::solvers::Solver;

use iterate::Iterate;
use newton::NumericalBreakdown;
use residuals::Residuals;

/// Builder struct to customize the [`InteriorPoint`] solver.
///
/// Obtain one through [`InteriorPoint::custom`], override the settings
/// that matter, and call [`build`](InteriorPointBuilder::build) to
/// validate them.
pub struct InteriorPointBuilder<F> {
    tol: F,
    max_iter: usize,
    sigma: F,
    step_rule: StepRule<F>,
    system_form: SystemForm,
    regularization: F,
    refine: bool,
    disp: bool,
}

impl<F: Float> InteriorPointBuilder<F> {
    pub(crate) fn new() -> InteriorPointBuilder<F> {
        InteriorPointBuilder {
            tol: F::cast(1e-8),
            max_iter: 1000,
            sigma: F::cast(0.1),
            step_rule: StepRule::Adaptive,
            system_form: SystemForm::NormalEquations,
            regularization: F::cast(1e-8),
            refine: false,
            disp: false,
        }
    }

    /// Convergence tolerance. Optimization terminates successfully once
    /// the primal, dual and complementarity residual norms are all
    /// below this value. Must be a small positive number.
    pub fn tol(mut self, tol: F) -> Self {
        self.tol = tol;
        self
    }

    /// Maximum number of iterations before giving up on the problem.
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Centering parameter in `(0, 1)`. Small values chase the
    /// complementarity reduction aggressively; values near one stay
    /// close to the central path at the cost of more iterations.
    pub fn sigma(mut self, sigma: F) -> Self {
        self.sigma = sigma;
        self
    }

    /// How the step-length safety margin is chosen, see [`StepRule`].
    pub fn step_rule(mut self, step_rule: StepRule<F>) -> Self {
        self.step_rule = step_rule;
        self
    }

    /// Which linear system the search direction is computed from, see
    /// [`SystemForm`].
    pub fn system_form(mut self, system_form: SystemForm) -> Self {
        self.system_form = system_form;
        self
    }

    /// Diagonal perturbation added to the normal-equations matrix
    /// before factorization, guarding against near-singularity from
    /// `x/s` ratios approaching zero. The default `1e-8` suits
    /// well-scaled problems; scale it with your data if constraint
    /// rows differ by orders of magnitude.
    pub fn regularization(mut self, regularization: F) -> Self {
        self.regularization = regularization;
        self
    }

    /// Enable iterative refinement of the augmented-system solve: up to
    /// three correction solves against the residual of the assembled
    /// system. Has no effect on the normal-equations form.
    pub fn refine(mut self, refine: bool) -> Self {
        self.refine = refine;
        self
    }

    /// Print a per-iteration progress table to stdout.
    pub fn disp(mut self, disp: bool) -> Self {
        self.disp = disp;
        self
    }

    /// Validate the configuration and create the solver. Returns an
    /// `InvalidParameter` error if a setting is out of range.
    pub fn build(self) -> Result<InteriorPoint<F>, SolverError> {
        if !(self.tol > F::zero() && self.tol.is_finite()) {
            return Err(SolverError::InvalidParameter(
                "The tolerance must be a positive finite number.",
            ));
        }
        if self.max_iter == 0 {
            return Err(SolverError::InvalidParameter(
                "The iteration limit must be at least one.",
            ));
        }
        if !(self.sigma > F::zero() && self.sigma < F::one()) {
            return Err(SolverError::InvalidParameter(
                "Sigma must be between 0 and 1 (exclusive).",
            ));
        }
        if !(self.regularization >= F::zero() && self.regularization.is_finite()) {
            return Err(SolverError::InvalidParameter(
                "The regularization must be a nonnegative finite number.",
            ));
        }
        if let StepRule::Fixed(alpha0) = self.step_rule {
            if !(alpha0 > F::zero() && alpha0 < F::one()) {
                return Err(SolverError::InvalidParameter(
                    "A fixed step margin must be between 0 and 1 (exclusive).",
                ));
            }
        }
        Ok(InteriorPoint {
            tol: self.tol,
            max_iter: self.max_iter,
            sigma: self.sigma,
            step_rule: self.step_rule,
            system_form: self.system_form,
            regularization: self.regularization,
            refine: self.refine,
            disp: self.disp,
        })
    }
}

/// Interior point solver for standard-form linear programs.
///
/// [`default`](InteriorPoint::default) gives a solver with sensible
/// settings; [`custom`](InteriorPoint::custom) opens the builder.
#[derive(Debug, PartialEq)]
pub struct InteriorPoint<F> {
    tol: F,
    max_iter: usize,
    sigma: F,
    step_rule: StepRule<F>,
    system_form: SystemForm,
    regularization: F,
    refine: bool,
    disp: bool,
}

impl<F: Float> Default for InteriorPoint<F> {
    fn default() -> Self {
        InteriorPointBuilder::new()
            .build()
            .unwrap_or_else(|_| unreachable!("default settings are valid"))
    }
}

impl<F: Float> Solver<F> for InteriorPoint<F> {
    fn solve(&self, problem: &Problem<F>) -> Result<SolveReport<F>, SolverError> {
        // Shapes were validated when the problem was built; from here on
        // every termination produces a report.
        Ok(self.run(problem))
    }
}

impl<F: Float> InteriorPoint<F> {
    /// Customize a solver through the builder pattern.
    pub fn custom() -> InteriorPointBuilder<F> {
        InteriorPointBuilder::new()
    }

    fn run(&self, problem: &Problem<F>) -> SolveReport<F> {
        let mut point = Iterate::cold_start(problem);
        if self.disp {
            println!(
                "iter\talpha_p   \talpha_d   \trho_p     \trho_d     \tcomp      \tobj       "
            );
        }
        for iteration in 0..self.max_iter {
            let residuals = Residuals::compute(problem, &point);
            if !residuals.is_finite() {
                return SolveReport::new(
                    problem,
                    point,
                    ConvergenceState::NumericalFailure,
                    iteration,
                );
            }
            if residuals.within(self.tol) {
                return SolveReport::new(problem, point, ConvergenceState::Optimal, iteration);
            }

            let delta = match newton::solve_direction(
                self.system_form,
                problem,
                &point,
                &residuals,
                self.sigma,
                self.regularization,
                self.refine,
                self.tol,
            ) {
                Ok(delta) => delta,
                Err(NumericalBreakdown) => {
                    return SolveReport::new(
                        problem,
                        point,
                        ConvergenceState::NumericalFailure,
                        iteration,
                    )
                }
            };
            if !delta.is_finite() {
                return SolveReport::new(
                    problem,
                    point,
                    ConvergenceState::NumericalFailure,
                    iteration,
                );
            }

            let alpha = self.step_rule.step_lengths(&point, &delta);
            if !alpha.is_finite() {
                return SolveReport::new(
                    problem,
                    point,
                    ConvergenceState::NumericalFailure,
                    iteration,
                );
            }

            if self.disp {
                println!(
                    "{:>4}\t{:.8}\t{:.8}\t{:.8}\t{:.8}\t{:.8}\t{:8.3}",
                    iteration + 1,
                    alpha.primal,
                    alpha.dual,
                    residuals.primal_norm(),
                    residuals.dual_norm(),
                    residuals.complementarity_norm(),
                    problem.objective(&point.x),
                );
            }

            point.advance(&delta, &alpha);
        }
        SolveReport::new(
            problem,
            point,
            ConvergenceState::IterationLimitReached,
            self.max_iter,
        )
    }
}

/// Solve `min c'x st Ax == b, x >= 0` with a dense constraint matrix
/// and otherwise default settings.
///
/// Convenience wrapper over [`Problem::dense`] and the
/// [`InteriorPoint`] builder for callers that only want to tweak the
/// iteration budget, the tolerance and the centering parameter.
pub fn solve_standard_form<F: Float>(
    c: &Array1<F>,
    a: &Array2<F>,
    b: &Array1<F>,
    max_iter: usize,
    tol: F,
    sigma: F,
) -> Result<SolveReport<F>, SolverError> {
    let problem = Problem::dense(c, a, b)?;
    InteriorPoint::custom()
        .max_iter(max_iter)
        .tol(tol)
        .sigma(sigma)
        .build()?
        .solve(&problem)
}

#[allow(non_snake_case)]
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use sprs::TriMat;

    fn simplex_problem() -> Problem<f64> {
        // min -x1 - x2  st  x1 + x2 == 1, x >= 0; any feasible point is
        // optimal, the path converges to the analytic center.
        Problem::dense(&array![-1., -1.], &array![[1., 1.]], &array![1.]).unwrap()
    }

    fn square_problem() -> Problem<f64> {
        // Unique optimum [1/3, 1/3, 4/3].
        Problem::dense(
            &array![-1., 4., -1.2],
            &array![[2., 1., 0.], [0., 2., 1.], [1., 0., 2.]],
            &array![1., 2., 3.],
        )
        .unwrap()
    }

    fn inconsistent_problem() -> Problem<f64> {
        // Ax == b has no nonnegative solution; the iterates approach the
        // nonnegative least-squares point [0, 0, 23/15].
        Problem::dense(
            &array![1., 2., 3.],
            &array![[1., 2., 3.], [4., 5., 6.]],
            &array![7., 8.],
        )
        .unwrap()
    }

    #[test]
    fn default_builder_matches_custom() {
        let solver = InteriorPoint::<f64>::default();
        let custom = InteriorPoint::custom().build().unwrap();
        assert_eq!(solver, custom);
    }

    #[test]
    fn builder_rejects_out_of_range_settings() {
        assert!(matches!(
            InteriorPoint::<f64>::custom().tol(0.).build(),
            Err(SolverError::InvalidParameter(_))
        ));
        assert!(matches!(
            InteriorPoint::<f64>::custom().max_iter(0).build(),
            Err(SolverError::InvalidParameter(_))
        ));
        assert!(matches!(
            InteriorPoint::<f64>::custom().sigma(1.).build(),
            Err(SolverError::InvalidParameter(_))
        ));
        assert!(matches!(
            InteriorPoint::<f64>::custom().regularization(-1e-8).build(),
            Err(SolverError::InvalidParameter(_))
        ));
        assert!(matches!(
            InteriorPoint::<f64>::custom()
                .step_rule(StepRule::Fixed(1.))
                .build(),
            Err(SolverError::InvalidParameter(_))
        ));
    }

    #[test]
    fn simplex_converges_on_both_system_forms() {
        for form in [SystemForm::NormalEquations, SystemForm::Augmented] {
            let solver = InteriorPoint::custom().system_form(form).build().unwrap();
            let res = solver.solve(&simplex_problem()).unwrap();
            assert_eq!(res.state(), ConvergenceState::Optimal);
            assert_abs_diff_eq!(*res.x(), array![0.5, 0.5], epsilon = 1e-4);
            assert_abs_diff_eq!(res.x().sum(), 1.0, epsilon = 1e-6);
            assert_abs_diff_eq!(res.objective(), -1.0, epsilon = 1e-6);
            assert!(res.x().iter().all(|&e| e > 0.));
        }
    }

    #[test]
    fn square_system_converges_under_every_configuration() {
        for form in [SystemForm::NormalEquations, SystemForm::Augmented] {
            for rule in [StepRule::Adaptive, StepRule::Fixed(0.99995)] {
                let solver = InteriorPoint::custom()
                    .system_form(form)
                    .step_rule(rule)
                    .build()
                    .unwrap();
                let res = solver.solve(&square_problem()).unwrap();
                assert_eq!(res.state(), ConvergenceState::Optimal);
                assert_abs_diff_eq!(
                    *res.x(),
                    array![1. / 3., 1. / 3., 4. / 3.],
                    epsilon = 1e-6
                );
            }
        }
    }

    #[test]
    fn optimal_iterate_satisfies_both_feasibilities() {
        let solver = InteriorPoint::<f64>::default();
        let res = solver.solve(&square_problem()).unwrap();
        assert_eq!(res.state(), ConvergenceState::Optimal);
        assert!(res.primal_norm() < 1e-8);
        assert!(res.dual_norm() < 1e-8);
        assert!(res.complementarity_norm() < 1e-8);
    }

    #[test]
    fn refined_augmented_solve_converges() {
        let solver = InteriorPoint::custom()
            .system_form(SystemForm::Augmented)
            .refine(true)
            .build()
            .unwrap();
        let res = solver.solve(&square_problem()).unwrap();
        assert_eq!(res.state(), ConvergenceState::Optimal);
        assert_abs_diff_eq!(*res.x(), array![1. / 3., 1. / 3., 4. / 3.], epsilon = 1e-6);
    }

    #[test]
    fn inconsistent_constraints_stall_at_least_squares_point() {
        // The primal residual cannot vanish, so the run exhausts its
        // budget; by then the iterate has settled on the closest
        // nonnegative point.
        let solver = InteriorPoint::custom().max_iter(12).build().unwrap();
        let res = solver.solve(&inconsistent_problem()).unwrap();
        assert_eq!(res.state(), ConvergenceState::IterationLimitReached);
        assert_eq!(res.iterations(), 12);
        assert_abs_diff_eq!(*res.x(), array![0., 0., 23. / 15.], epsilon = 1e-3);
        assert_abs_diff_eq!(res.objective(), 4.6, epsilon = 1e-3);
    }

    #[test]
    fn zero_constraint_row_fails_fast_on_augmented_form() {
        let problem = Problem::dense(
            &array![1., 2., 3.],
            &array![[1., 2., 3.], [0., 0., 0.]],
            &array![7., 8.],
        )
        .unwrap();
        let solver = InteriorPoint::custom()
            .system_form(SystemForm::Augmented)
            .max_iter(100)
            .build()
            .unwrap();
        let res = solver.solve(&problem).unwrap();
        assert_eq!(res.state(), ConvergenceState::NumericalFailure);
    }

    #[test]
    fn zero_constraint_row_stalls_on_normal_equations() {
        // The regularized normal matrix stays factorizable despite the
        // rank-deficient row, so this form iterates until the budget
        // runs out instead of breaking down.
        let problem = Problem::dense(
            &array![1., 2., 3.],
            &array![[1., 2., 3.], [0., 0., 0.]],
            &array![7., 8.],
        )
        .unwrap();
        let solver = InteriorPoint::custom().max_iter(100).build().unwrap();
        let res = solver.solve(&problem).unwrap();
        assert_eq!(res.state(), ConvergenceState::IterationLimitReached);
        assert_eq!(res.iterations(), 100);
        assert!(res.x().iter().all(|&e: &f64| e.is_finite()));
    }

    #[test]
    fn exhausted_budget_still_returns_an_interior_iterate() {
        let solver = InteriorPoint::custom().max_iter(1).build().unwrap();
        let res = solver.solve(&inconsistent_problem()).unwrap();
        assert_eq!(res.state(), ConvergenceState::IterationLimitReached);
        assert_eq!(res.iterations(), 1);
        assert!(res.x().iter().all(|&e| e.is_finite() && e > 0.));
        assert!(res.s().iter().all(|&e| e.is_finite() && e > 0.));
    }

    #[test]
    fn complementarity_trends_downward() {
        let solver = InteriorPoint::custom().max_iter(5).build().unwrap();
        let res = solver.solve(&square_problem()).unwrap();
        // Started at ||1 ∘ 1|| = sqrt(3).
        assert!(res.complementarity_norm() < 3f64.sqrt());
    }

    #[test]
    fn sparse_problem_matches_dense_solution() {
        let mut tri = TriMat::new((3, 3));
        tri.add_triplet(0, 0, 2.);
        tri.add_triplet(0, 1, 1.);
        tri.add_triplet(1, 1, 2.);
        tri.add_triplet(1, 2, 1.);
        tri.add_triplet(2, 0, 1.);
        tri.add_triplet(2, 2, 2.);
        let problem =
            Problem::sparse(&array![-1., 4., -1.2], tri.to_csr(), &array![1., 2., 3.]).unwrap();

        let solver = InteriorPoint::<f64>::default();
        let res = solver.solve(&problem).unwrap();
        assert_eq!(res.state(), ConvergenceState::Optimal);
        assert_abs_diff_eq!(*res.x(), array![1. / 3., 1. / 3., 4. / 3.], epsilon = 1e-6);
    }

    #[test]
    fn sparse_inconsistent_constraints_behave_like_dense() {
        let mut tri = TriMat::new((2, 3));
        for (j, v) in [1., 2., 3.].iter().enumerate() {
            tri.add_triplet(0, j, *v);
        }
        for (j, v) in [4., 5., 6.].iter().enumerate() {
            tri.add_triplet(1, j, *v);
        }
        let problem =
            Problem::sparse(&array![1., 2., 3.], tri.to_csr(), &array![7., 8.]).unwrap();
        let solver = InteriorPoint::custom().max_iter(12).build().unwrap();
        let res = solver.solve(&problem).unwrap();
        assert_eq!(res.state(), ConvergenceState::IterationLimitReached);
        assert_abs_diff_eq!(*res.x(), array![0., 0., 23. / 15.], epsilon = 1e-3);
    }

    #[test]
    fn standard_form_entry_point() {
        let res = solve_standard_form(
            &array![-1., -1.],
            &array![[1., 1.]],
            &array![1.],
            1000,
            1e-8,
            0.1,
        )
        .unwrap();
        assert_eq!(res.state(), ConvergenceState::Optimal);
        assert_abs_diff_eq!(res.objective(), -1.0, epsilon = 1e-6);
        assert_eq!(res.y().len(), 1);
    }

    #[test]
    fn entry_point_rejects_bad_shapes() {
        let res = solve_standard_form(
            &array![-1., -1., -1.],
            &array![[1., 1.]],
            &array![1.],
            1000,
            1e-8,
            0.1,
        );
        assert_eq!(res.unwrap_err(), SolverError::IncompatibleDimensions);
    }
}
