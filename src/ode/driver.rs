use crate::algebra::abstr::Real;
use crate::algebra::linear::Vector;
use crate::ode::advance::advance;
use crate::ode::config::Configuration;
use crate::ode::error::IntegratorError;
use crate::ode::solution::Solution;
use crate::ode::system::System;
use crate::ode::tableau::Tableau;

/// Fixed-mesh solve: `t_mesh` is an arbitrary ordered grid and the output is
/// aligned to it. Step size is derived from the current mesh spacing; when
/// adaptive mode is on and the tableau is embedded, the controller's
/// suggestion is still consulted but every step is saturated so that it
/// lands on the next mesh node.
pub fn solve<T, S>(
    sys: &S,
    tableau: &Tableau<T>,
    config: &Configuration<T>,
    t_mesh: &[T],
    x0: &Vector<T>,
    sol: &mut Solution<T>,
) -> Result<(), IntegratorError>
where
    T: Real,
    S: System<T> + ?Sized,
{
    assert!(t_mesh.len() >= 2, "time mesh must have at least two points");

    let mut x = x0.clone();
    let mut t = t_mesh[0];
    sol.set(0, t, &x, &sys.h(&x, t));
    config.invoke_step_callback(0, &x, t);

    // Mirrors the original's redundant reassignment: whatever step the
    // controller proposed for the previous mesh node is cached and
    // restored once the node has been stored, even though the next node's
    // saturated step will overwrite it immediately afterward.
    let mut h_tmp_step = t_mesh[1] - t_mesh[0];

    for k in 1..t_mesh.len()
    {
        let h_step = t_mesh[k] - t;
        let outcome = advance(sys, tableau, &x, t, h_step, config)?;
        x = outcome.x_new;
        t = t_mesh[k];

        sol.set(k, t, &x, &sys.h(&x, t));
        config.invoke_step_callback(k, &x, t);

        if config.adaptive && tableau.is_embedded()
        {
            if let Some(h_suggested) = outcome.h_suggested
            {
                h_tmp_step = h_suggested;
            }
        }
        // Restores the cached controller step after the mesh-point store,
        // even though `h_step` itself is about to be recomputed from mesh
        // spacing on the next iteration regardless.
        let _h_step = h_tmp_step;
    }

    return Ok(());
}

/// Adaptive solve: the mesh is used only for its endpoints. Preallocates an
/// a-priori upper bound on the number of accepted steps, clamps the step
/// into `[h_min, h_max]`, clips the final step to land on `t_end`, then
/// shrinks the solution to the number of entries actually written.
///
/// Falls back to [`solve`] (with a warning) when the tableau isn't embedded
/// or adaptivity is disabled.
pub fn adaptive_solve<T, S>(
    sys: &S,
    tableau: &Tableau<T>,
    config: &Configuration<T>,
    t_mesh: &[T],
    x0: &Vector<T>,
    sol: &mut Solution<T>,
) -> Result<(), IntegratorError>
where
    T: Real,
    S: System<T> + ?Sized,
{
    assert!(t_mesh.len() >= 2, "time mesh must have at least two points");

    if !config.adaptive || !tableau.is_embedded()
    {
        config.warn("adaptive_solve called without adaptivity enabled or a non-embedded tableau; falling back to solve()");
        return solve(sys, tableau, config, t_mesh, x0, sol);
    }

    let t_start = t_mesh[0];
    let t_end = t_mesh[t_mesh.len() - 1];
    let h_init = (t_end - t_start) / T::from_f64((t_mesh.len() - 1) as f64);

    let h_min = config.h_min.max(h_init.abs() / T::from_f64(100.0));
    let h_max = h_init.abs() * T::from_f64(100.0);

    let capacity_f = (t_end - t_start).abs() / (T::from_f64(2.0) * h_min);
    let capacity = capacity_f.to_f64().ceil() as usize + 1;
    sol.resize(capacity);

    let mut x = x0.clone();
    let mut t = t_start;
    let mut h = h_init.abs();
    let forward = t_end >= t_start;

    sol.set(0, t, &x, &sys.h(&x, t));
    config.invoke_step_callback(0, &x, t);
    let mut k = 1usize;

    while (forward && t < t_end) || (!forward && t > t_end)
    {
        let remaining = (t_end - t).abs();
        let mut h_step = h.min(h_max).max(h_min);
        if h_step > remaining
        {
            h_step = remaining;
        }
        let signed_h = if forward { h_step } else { -h_step };

        let outcome = advance(sys, tableau, &x, t, signed_h, config)?;
        x = outcome.x_new;
        t += signed_h;

        sol.set(k, t, &x, &sys.h(&x, t));
        config.invoke_step_callback(k, &x, t);
        k += 1;

        if let Some(h_suggested) = outcome.h_suggested
        {
            h = h_suggested.abs().max(h_min).min(h_max);
        }
    }

    sol.shrink();
    return Ok(());
}
