use std::fmt::{Debug, Display};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Floating-point scalar bound shared by every public entry point of the
/// integrator.
///
/// Mirrors the teacher's `abstr::Scalar` trait: a closed set of the numeric
/// operations the engine actually calls, blanket-implemented for `f32`/`f64`
/// rather than pulled in from an external numeric crate.
pub trait Real:
    Sized
    + Copy
    + Clone
    + Debug
    + Display
    + PartialOrd
    + Sum
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
{
    fn zero() -> Self;
    fn one() -> Self;
    fn from_f64(v: f64) -> Self;
    fn to_f64(self) -> f64;
    fn abs(self) -> Self;
    fn sqrt(self) -> Self;
    fn powf(self, exp: Self) -> Self;
    fn powi(self, exp: i32) -> Self;
    fn min(self, other: Self) -> Self;
    fn max(self, other: Self) -> Self;
    fn is_finite(self) -> bool;
    fn is_nan(self) -> bool;
    fn epsilon() -> Self;
}

macro_rules! impl_real
{
    ($t:ty) =>
    {
        impl Real for $t
        {
            fn zero() -> Self
            {
                return 0.0;
            }

            fn one() -> Self
            {
                return 1.0;
            }

            fn from_f64(v: f64) -> Self
            {
                return v as $t;
            }

            fn to_f64(self: Self) -> f64
            {
                return self as f64;
            }

            fn abs(self: Self) -> Self
            {
                return <$t>::abs(self);
            }

            fn sqrt(self: Self) -> Self
            {
                return <$t>::sqrt(self);
            }

            fn powf(self: Self, exp: Self) -> Self
            {
                return <$t>::powf(self, exp);
            }

            fn powi(self: Self, exp: i32) -> Self
            {
                return <$t>::powi(self, exp);
            }

            fn min(self: Self, other: Self) -> Self
            {
                return <$t>::min(self, other);
            }

            fn max(self: Self, other: Self) -> Self
            {
                return <$t>::max(self, other);
            }

            fn is_finite(self: Self) -> bool
            {
                return <$t>::is_finite(self);
            }

            fn is_nan(self: Self) -> bool
            {
                return <$t>::is_nan(self);
            }

            fn epsilon() -> Self
            {
                return <$t>::EPSILON;
            }
        }
    };
}

impl_real!(f32);
impl_real!(f64);
