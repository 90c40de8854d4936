use crate::algebra::abstr::Real;
use crate::algebra::linear::matrix::LuDecomposition;
use crate::algebra::linear::{Matrix, Vector};
use crate::ode::config::Configuration;
use crate::ode::error::IntegratorError;
use crate::ode::system::System;

/// Pulls `x_tilde` back onto the invariant manifold `h(x, t) = 0` by damped
/// Newton on the KKT conditions of
///
/// `min_x 1/2 ||x - x_tilde||^2  s.t.  h(x, t) = 0`.
///
/// Each iteration solves the saddle-point system
///
/// `[ I  Jh_x^T ] [dx]   [x_tilde - x_k]`
/// `[ Jh_x  0   ] [ l]  = [  -h(x_k)   ]`
pub fn project<T, S>(
    sys: &S,
    config: &Configuration<T>,
    x_tilde: &Vector<T>,
    t: T,
) -> Result<Vector<T>, IntegratorError>
where
    T: Real,
    S: System<T> + ?Sized,
{
    let m = sys.m();
    if m == 0
    {
        return Ok(x_tilde.clone());
    }
    let all_x: Vec<usize> = (0..sys.n()).collect();
    let all_h: Vec<usize> = (0..m).collect();
    return project_subset(sys, config, x_tilde, t, &all_x, &all_h);
}

/// Projection restricted to a subset of state components and a subset of
/// invariants, as the original's `project_ics` does for initial-condition
/// consistency. Always factors its own local LU for the KKT system — the
/// original reuses the main projector's cached LU here by mistake, which
/// this port does not carry forward.
pub fn project_subset<T, S>(
    sys: &S,
    config: &Configuration<T>,
    x_tilde: &Vector<T>,
    t: T,
    x_indices: &[usize],
    h_indices: &[usize],
) -> Result<Vector<T>, IntegratorError>
where
    T: Real,
    S: System<T> + ?Sized,
{
    let nx = x_indices.len();
    let nh = h_indices.len();
    if nh == 0
    {
        return Ok(x_tilde.clone());
    }

    let mut x_k = x_tilde.clone();

    for _iter in 0..config.max_projection_iterations
    {
        let h_full = sys.h(&x_k, t);
        let h_sub = h_full.select(h_indices);

        if h_sub.norm_inf() < config.projection_tol
        {
            return Ok(x_k);
        }

        let jh_x_full = sys.jh_x(&x_k, t);
        let mut jh_sub = Matrix::zero(nh, nx);
        for (row, &hi) in h_indices.iter().enumerate()
        {
            for (col, &xi) in x_indices.iter().enumerate()
            {
                *jh_sub.get_mut(row, col) = *jh_x_full.get(hi, xi);
            }
        }

        let identity = Matrix::<T>::identity(nx);
        let jh_sub_t = jh_sub.transpose();
        let zero_block = Matrix::zero(nh, nh);
        let kkt = Matrix::from_blocks(&identity, &jh_sub_t, &jh_sub, &zero_block);

        let diff = &x_tilde.select(x_indices) - &x_k.select(x_indices);
        let mut rhs = Vector::zero(nx + nh);
        for i in 0..nx
        {
            *rhs.get_mut(i) = *diff.get(i);
        }
        for i in 0..nh
        {
            *rhs.get_mut(nx + i) = -*h_sub.get(i);
        }

        let lu = LuDecomposition::decompose(&kkt);
        if lu.is_singular()
        {
            return Err(IntegratorError::SingularProjection);
        }
        let sol = lu.solve(&rhs);
        let dx_sub = Vector::new(sol.as_slice()[..nx].to_vec());

        if dx_sub.norm_inf() < config.projection_tol * config.projection_tol
        {
            return Err(IntegratorError::NonConvergent);
        }

        for (k, &xi) in x_indices.iter().enumerate()
        {
            *x_k.get_mut(xi) += *dx_sub.get(k);
        }
    }

    return Err(IntegratorError::NonConvergent);
}
