use ndarray::{Array1, Zip};

use crate::float::Float;

use super::direction::Delta;
use super::iterate::Iterate;

/// How the safety margin on the maximal feasible step is chosen.
///
/// The raw maximal steps keep `x` and `s` nonnegative; multiplying by a
/// margin strictly below one keeps them strictly interior, which the
/// next iteration's `x/s` ratios depend on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepRule<F> {
    /// A fixed multiplier, e.g. `0.99995`. The simpler fallback rule;
    /// aggressive but occasionally walks too close to the boundary.
    Fixed(F),
    /// Mehrotra-style margin selection: take a trial step with the
    /// aggressive margin and predict the complementarity it reaches.
    /// If the predicted reduction is below 1% of the current
    /// complementarity scaled by the step size, fall back to the
    /// conservative margin. The reference rule.
    Adaptive,
}

/// The accepted primal and dual step lengths, both in `(0, 1]`.
pub(crate) struct StepLengths<F> {
    pub(crate) primal: F,
    pub(crate) dual: F,
}

impl<F: Float> StepLengths<F> {
    pub(crate) fn is_finite(&self) -> bool {
        self.primal.is_finite() && self.dual.is_finite()
    }
}

impl<F: Float> StepRule<F> {
    pub(crate) fn step_lengths(&self, point: &Iterate<F>, delta: &Delta<F>) -> StepLengths<F> {
        let primal = max_feasible(&point.x, &delta.dx);
        let dual = max_feasible(&point.s, &delta.ds);
        let margin = match self {
            StepRule::Fixed(alpha0) => *alpha0,
            StepRule::Adaptive => adaptive_margin(point, delta, primal, dual),
        };
        StepLengths {
            primal: primal * margin,
            dual: dual * margin,
        }
    }
}

const AGGRESSIVE: f64 = 0.95;
const CONSERVATIVE: f64 = 0.9;
const MIN_REDUCTION: f64 = 0.01;

/// The largest `alpha <= 1` with `v + alpha dv >= 0`. One when no
/// component of `dv` is negative.
fn max_feasible<F: Float>(v: &Array1<F>, dv: &Array1<F>) -> F {
    Zip::from(dv).and(v).fold(F::one(), |acc, &d, &v| {
        if d < F::zero() {
            acc.min(v / -d)
        } else {
            acc
        }
    })
}

fn adaptive_margin<F: Float>(point: &Iterate<F>, delta: &Delta<F>, primal: F, dual: F) -> F {
    let aggressive = F::cast(AGGRESSIVE);
    let trial_x = &point.x + &(&delta.dx * (aggressive * primal));
    let trial_s = &point.s + &(&delta.ds * (aggressive * dual));
    let predicted = trial_x.dot(&trial_s);
    let current = point.x.dot(&point.s);
    if current - predicted < F::cast(MIN_REDUCTION) * current * primal.min(dual) {
        F::cast(CONSERVATIVE)
    } else {
        aggressive
    }
}
