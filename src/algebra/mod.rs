//! Scalar and linear algebra primitives the Runge-Kutta engine is generic
//! over.

pub mod abstr;
pub mod linear;

/// Builds a column [`linear::Vector`] from a semicolon-separated list, e.g.
/// `vector![1.0; 2.0; 3.0]`.
#[macro_export]
macro_rules! vector {
    ($($x:expr);*) => {
        $crate::algebra::linear::Vector::new(vec![$($x),*])
    };
}
