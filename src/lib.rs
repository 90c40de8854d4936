//! # rkdae
//!
//! A Runge-Kutta ODE/DAE integration core implemented entirely in Rust:
//! explicit, diagonally implicit and fully implicit Butcher-tableau methods,
//! closed over a user-supplied [`ode::System`] description, with adaptive
//! step-size control, substepping retry on step failure, and projection of
//! the numerical trajectory onto invariant manifolds.
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! rkdae = "0.1"
//! ```
//!
//! The pieces a caller assembles: a [`ode::Tableau`] (coefficients for a
//! named method), a [`ode::System`] implementation (or one of the
//! [`ode::Explicit`], [`ode::SemiExplicit`], [`ode::Linear`] adapters), and a
//! [`ode::Configuration`]. [`ode::Integrator`] ties the three together behind
//! [`ode::Integrator::solve`] and [`ode::Integrator::adaptive_solve`].

#[macro_use]
pub mod algebra;
pub mod ode;
pub mod optimization;
