use ndarray::Array1;

use crate::float::Float;
use crate::problem::Problem;

use super::direction::Delta;
use super::step::StepLengths;

/// The primal-dual iterate `(x, y, s)`.
///
/// The driver exclusively owns one of these for the duration of a run.
/// Invariant: `x > 0` and `s > 0` strictly at every accepted iterate;
/// the step-length controller guarantees no valid step violates it.
pub(crate) struct Iterate<F> {
    pub(crate) x: Array1<F>,
    pub(crate) y: Array1<F>,
    pub(crate) s: Array1<F>,
}

impl<F: Float> Iterate<F> {
    /// The conventional cold start `x = 1, y = 0, s = 1`, strictly
    /// interior regardless of the problem data.
    pub(crate) fn cold_start(problem: &Problem<F>) -> Iterate<F> {
        let (m, n) = problem.dims();
        Iterate {
            x: Array1::ones(n),
            y: Array1::zeros(m),
            s: Array1::ones(n),
        }
    }

    /// Apply the step `x += a_p dx, y += a_d dy, s += a_d ds`.
    pub(crate) fn advance(&mut self, delta: &Delta<F>, alpha: &StepLengths<F>) {
        self.x = &self.x + &(&delta.dx * alpha.primal);
        self.y = &self.y + &(&delta.dy * alpha.dual);
        self.s = &self.s + &(&delta.ds * alpha.dual);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn cold_start_is_strictly_interior() {
        let problem = Problem::dense(
            &array![1., 2., 3.],
            &array![[1., 2., 3.], [4., 5., 6.]],
            &array![7., 8.],
        )
        .unwrap();
        let point = Iterate::cold_start(&problem);
        assert_eq!(point.x, array![1., 1., 1.]);
        assert_eq!(point.y, array![0., 0.]);
        assert_eq!(point.s, array![1., 1., 1.]);
    }

    #[test]
    fn advance_applies_asymmetric_steps() {
        let problem =
            Problem::dense(&array![1., 1.], &array![[1., 1.]], &array![1.]).unwrap();
        let mut point = Iterate::cold_start(&problem);
        let delta = Delta {
            dx: array![1., -1.],
            dy: array![2.],
            ds: array![-0.5, 0.5],
        };
        point.advance(
            &delta,
            &StepLengths {
                primal: 0.5,
                dual: 0.25,
            },
        );
        assert_abs_diff_eq!(point.x, array![1.5, 0.5], epsilon = 1e-12);
        assert_abs_diff_eq!(point.y, array![0.5], epsilon = 1e-12);
        assert_abs_diff_eq!(point.s, array![0.875, 1.125], epsilon = 1e-12);
    }
}
