use crate::algebra::abstr::Real;
use crate::algebra::linear::Vector;
use crate::ode::config::Configuration;
use crate::ode::controller::estimate_step;
use crate::ode::error::IntegratorError;
use crate::ode::projector::project;
use crate::ode::stage::{compute_stages, StageOptions};
use crate::ode::system::System;
use crate::ode::tableau::Tableau;
use crate::optimization::DampingOptions;

/// Outcome of one `advance` call: the accepted state/step plus whether a
/// next-step suggestion from the embedded controller is available.
pub struct AdvanceOutcome<T>
{
    pub x_new: Vector<T>,
    pub h_new: T,
    pub h_suggested: Option<T>,
}

fn stage_options<T: Real>(config: &Configuration<T>) -> StageOptions<T>
{
    return StageOptions {
        reverse: config.reverse,
        newton_tolerance: config.abs_tol,
        max_newton_iterations: config.max_newton_iterations,
        damping: DampingOptions { relaxation_factor: T::from_f64(0.8), max_relaxations: config.max_relaxations },
    };
}

/// Runs one kernel call, folding stage matrices into the primary (and,
/// when embedded, secondary) state update.
fn try_step<T, S>(
    sys: &S,
    tableau: &Tableau<T>,
    x_k: &Vector<T>,
    t_k: T,
    h_k: T,
    config: &Configuration<T>,
) -> Result<(Vector<T>, Option<T>), IntegratorError>
where
    T: Real,
    S: System<T> + ?Sized,
{
    let k = compute_stages(sys, tableau, x_k, t_k, h_k, stage_options(config))?;
    let x_new = x_k + &(&k * &tableau.b);

    let suggested = if config.adaptive && tableau.is_embedded()
    {
        let b_hat = tableau.b_hat.as_ref().expect("is_embedded implies b_hat");
        let x_hat = x_k + &(&k * b_hat);
        let estimate = estimate_step(config, &x_new, &x_hat, h_k, tableau.controller_order());
        Some(estimate.h_next)
    }
    else
    {
        None
    };

    return Ok((x_new, suggested));
}

/// Step + substepping + projection wrapper, per `spec.md` §4.5/§4.8.
///
/// The substepping state machine is kept as explicit `(level, h)` state
/// rather than the single overloaded integer counter of the original, per
/// `spec.md` §9's direction to extract it cleanly: `level` is the number of
/// half-steps still owed at the current depth, doubling `h` (coarsening)
/// whenever an even number of half-steps at a depth have both completed.
pub fn advance<T, S>(
    sys: &S,
    tableau: &Tableau<T>,
    x_old: &Vector<T>,
    t_old: T,
    h_old: T,
    config: &Configuration<T>,
) -> Result<AdvanceOutcome<T>, IntegratorError>
where
    T: Real,
    S: System<T> + ?Sized,
{
    assert!(h_old > T::zero(), "advance requires a positive step");
    if !sys.in_domain(x_old, t_old)
    {
        return Err(IntegratorError::DomainViolation);
    }

    let (x_new, h_new, h_suggested) = match try_step(sys, tableau, x_old, t_old, h_old, config)
    {
        Ok((x_new, h_suggested)) => (x_new, h_old, h_suggested),
        Err(_) => substep(sys, tableau, x_old, t_old, h_old, config)?,
    };

    let x_projected = if config.projection && sys.m() > 0
    {
        project(sys, config, &x_new, t_old + h_old)?
    }
    else
    {
        x_new
    };

    return Ok(AdvanceOutcome { x_new: x_projected, h_new, h_suggested });
}

/// The retry state machine for a failed primary step.
fn substep<T, S>(
    sys: &S,
    tableau: &Tableau<T>,
    x_old: &Vector<T>,
    t_old: T,
    h_old: T,
    config: &Configuration<T>,
) -> Result<(Vector<T>, T, Option<T>), IntegratorError>
where
    T: Real,
    S: System<T> + ?Sized,
{
    config.warn("primary step failed; entering substepping");

    let mut level: i64 = 2;
    let mut h_tmp = h_old / T::from_f64(2.0);
    let mut x_tmp = x_old.clone();
    let mut t_tmp = t_old;
    let max_level = (config.max_substeps * config.max_substeps) as i64;

    loop
    {
        match try_step(sys, tableau, &x_tmp, t_tmp, h_tmp, config)
        {
            Ok((x_next, suggested)) =>
            {
                x_tmp = x_next;
                t_tmp += h_tmp;
                assert!(x_tmp.norm_inf().is_finite(), "substep produced a non-finite state");

                level -= 1;
                if level % 2 == 0
                {
                    h_tmp = h_tmp * T::from_f64(2.0);
                    config.warn("substepping coarsened: doubling h after an even number of half-steps");
                }
                if level == 0
                {
                    return Ok((x_tmp, h_tmp, suggested));
                }
            }
            Err(_) =>
            {
                level += 2;
                h_tmp = h_tmp / T::from_f64(2.0);
                if level >= max_level
                {
                    return Err(IntegratorError::SubstepExhausted);
                }
            }
        }
    }
}
