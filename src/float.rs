use ndarray::NdFloat;
use num_traits::NumCast;
use std::ops::DivAssign;

/// Scalar type the solver is generic over.
///
/// `Default` and the by-reference `DivAssign` are required by the
/// sparse factorization backend.
pub trait Float: NdFloat + Default + for<'r> DivAssign<&'r Self> {
    fn cast<T: NumCast>(x: T) -> Self {
        NumCast::from(x).unwrap()
    }
}

impl Float for f64 {}
impl Float for f32 {}
