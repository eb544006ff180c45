use ndarray::Array1;

use crate::float::Float;

/// A search direction `(dx, dy, ds)`, produced by one of the Newton
/// system solvers and consumed once by the step-length controller and
/// the driver.
pub(crate) struct Delta<F> {
    pub(crate) dx: Array1<F>,
    pub(crate) dy: Array1<F>,
    pub(crate) ds: Array1<F>,
}

impl<F: Float> Delta<F> {
    /// A direction containing NaN or infinity means the factorization
    /// broke down; the driver aborts the run when it sees one.
    pub(crate) fn is_finite(&self) -> bool {
        self.dx.iter().all(|e| e.is_finite())
            && self.dy.iter().all(|e| e.is_finite())
            && self.ds.iter().all(|e| e.is_finite())
    }
}
