//! Runge-Kutta ODE/DAE integration core
//!
//! A generic engine over a Butcher-tableau-driven family of explicit (ERK),
//! diagonally implicit (DIRK), and fully implicit (IRK) methods, closed over
//! a user-supplied [`system::System`] description, with adaptive step-size
//! control, a substepping retry policy around step failures, and invariant-
//! manifold projection.

pub mod advance;
pub mod config;
pub mod controller;
pub mod driver;
pub mod error;
pub mod projector;
pub mod solution;
pub mod stage;
pub mod system;
pub mod tableau;

pub use self::config::Configuration;
pub use self::error::IntegratorError;
pub use self::solution::Solution;
pub use self::system::{Explicit, Kind, Linear, SemiExplicit, System};
pub use self::tableau::{RkType, Tableau};

use crate::algebra::abstr::Real;
use crate::algebra::linear::Vector;

/// Ties a `System`, a `Tableau`, and a `Configuration` together behind the
/// driver's two entry points.
pub struct Integrator<'a, T, S: ?Sized>
{
    sys: &'a S,
    tableau: &'a Tableau<T>,
    config: Configuration<T>,
}

impl<'a, T, S> Integrator<'a, T, S>
where
    T: Real,
    S: System<T> + ?Sized,
{
    pub fn new(sys: &'a S, tableau: &'a Tableau<T>, config: Configuration<T>) -> Self
    {
        return Integrator { sys, tableau, config };
    }

    pub fn config(self: &Self) -> &Configuration<T>
    {
        return &self.config;
    }

    pub fn config_mut(self: &mut Self) -> &mut Configuration<T>
    {
        return &mut self.config;
    }

    pub fn solve(self: &Self, t_mesh: &[T], x0: &Vector<T>, sol: &mut Solution<T>) -> Result<(), IntegratorError>
    {
        return self::driver::solve(self.sys, self.tableau, &self.config, t_mesh, x0, sol);
    }

    pub fn adaptive_solve(
        self: &Self,
        t_mesh: &[T],
        x0: &Vector<T>,
        sol: &mut Solution<T>,
    ) -> Result<(), IntegratorError>
    {
        return self::driver::adaptive_solve(self.sys, self.tableau, &self.config, t_mesh, x0, sol);
    }
}
