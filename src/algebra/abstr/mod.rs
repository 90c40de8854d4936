//! Abstract scalar algebra
//!
//! Supplies the `Real` trait that the whole engine is generic over, in place
//! of hard-coding `f64` everywhere.

mod real;

pub use self::real::Real;
