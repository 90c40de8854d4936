//! Root-finding
//!
//! The stage equations of implicit Runge-Kutta methods are nonlinear systems
//! `F(x) = 0` that have to be solved once per stage, once per step. This
//! module supplies the damped Newton iteration used for that (see
//! [`newton`]), generic over anything implementing [`Function`] and
//! [`Jacobian`].

mod newton;

pub use self::newton::{DampingOptions, Newton, NewtonError, NewtonOutcome};

use crate::algebra::abstr::Real;
use crate::algebra::linear::{Matrix, Vector};

/// A vector-valued function `F: R^n -> R^n` whose root the solver seeks.
pub trait Function<T: Real>
{
    fn eval(self: &Self, x: &Vector<T>) -> Vector<T>;
}

/// Supplies the Jacobian `dF/dx` of a [`Function`].
pub trait Jacobian<T: Real>: Function<T>
{
    fn jacobian(self: &Self, x: &Vector<T>) -> Matrix<T>;
}
