use ndarray::Array1;

use crate::float::Float;
use crate::problem::Problem;

use super::iterate::Iterate;

/// The optimality residuals of an iterate, recomputed from scratch
/// every iteration.
///
/// With the sign conventions used throughout this crate:
/// ```text
/// primal           = A x - b
/// dual             = A'y + s - c
/// complementarity  = x ∘ s          (element-wise)
/// mu               = x's / n
/// ```
/// All three vanish at an exact optimum; the driver declares
/// convergence once all three norms drop below the tolerance.
pub(crate) struct Residuals<F> {
    pub(crate) primal: Array1<F>,
    pub(crate) dual: Array1<F>,
    pub(crate) complementarity: Array1<F>,
    pub(crate) mu: F,
}

impl<F: Float> Residuals<F> {
    pub(crate) fn compute(problem: &Problem<F>, point: &Iterate<F>) -> Residuals<F> {
        let primal = &problem.A().mul_vec(&point.x) - problem.b();
        let dual = &(&problem.A().mul_transpose_vec(&point.y) + &point.s) - problem.c();
        let complementarity = &point.x * &point.s;
        let mu = point.x.dot(&point.s) / F::cast(point.x.len());
        Residuals {
            primal,
            dual,
            complementarity,
            mu,
        }
    }

    pub(crate) fn primal_norm(&self) -> F {
        norm(&self.primal)
    }

    pub(crate) fn dual_norm(&self) -> F {
        norm(&self.dual)
    }

    pub(crate) fn complementarity_norm(&self) -> F {
        norm(&self.complementarity)
    }

    /// All residual norms below `tol` at once.
    pub(crate) fn within(&self, tol: F) -> bool {
        self.primal_norm() < tol && self.dual_norm() < tol && self.complementarity_norm() < tol
    }

    pub(crate) fn is_finite(&self) -> bool {
        let finite = |a: &Array1<F>| a.iter().all(|e| e.is_finite());
        finite(&self.primal) && finite(&self.dual) && finite(&self.complementarity)
    }
}

pub(crate) fn norm<F: Float>(a: &Array1<F>) -> F {
    a.dot(a).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn residuals_match_hand_computation() {
        let problem = Problem::dense(
            &array![1., 2.],
            &array![[1., 1.], [2., 0.]],
            &array![3., 4.],
        )
        .unwrap();
        let point = Iterate {
            x: array![2., 1.],
            y: array![1., -1.],
            s: array![0.5, 2.],
        };
        let res = Residuals::compute(&problem, &point);

        // A x - b = [3 - 3, 4 - 4]
        assert_abs_diff_eq!(res.primal, array![0., 0.], epsilon = 1e-12);
        // A'y + s - c = [1 - 2 + 0.5 - 1, 1 + 2 - 2]
        assert_abs_diff_eq!(res.dual, array![-1.5, 1.], epsilon = 1e-12);
        assert_abs_diff_eq!(res.complementarity, array![1., 2.], epsilon = 1e-12);
        assert_abs_diff_eq!(res.mu, 1.5, epsilon = 1e-12);
        assert!(res.is_finite());
        assert!(!res.within(1e-8));
    }

    #[test]
    fn detects_non_finite_entries() {
        let problem =
            Problem::dense(&array![1., 1.], &array![[1., 1.]], &array![1.]).unwrap();
        let point = Iterate {
            x: array![f64::NAN, 1.],
            y: array![0.],
            s: array![1., 1.],
        };
        assert!(!Residuals::compute(&problem, &point).is_finite());
    }
}
