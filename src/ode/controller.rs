use crate::algebra::abstr::Real;
use crate::algebra::linear::Vector;
use crate::ode::config::Configuration;

/// Suggested next step from an embedded pair `(x, x_hat)`, per `spec.md`
/// §4.4. No accept/reject decision is made here; that lives in `advance`.
pub struct StepEstimate<T>
{
    pub truncation_error: T,
    pub h_next: T,
}

/// `desired = abs_tol + rel_tol * max(||x||_inf, ||x_hat||_inf)`
/// `truncation = ||x - x_hat||_inf`
/// `ratio = (desired / truncation) ^ (1 / max(p, p_hat))`
/// `h_next = h * clamp(safety * ratio, safety_min, safety_max)`
pub fn estimate_step<T>(config: &Configuration<T>, x: &Vector<T>, x_hat: &Vector<T>, h: T, controller_order: usize) -> StepEstimate<T>
where
    T: Real,
{
    let desired = config.abs_tol + config.rel_tol * x.norm_inf().max(x_hat.norm_inf());
    let diff = x - x_hat;
    let truncation = diff.norm_inf();

    let ratio = if truncation <= T::zero()
    {
        config.safety_max / config.safety_factor
    }
    else
    {
        (desired / truncation).powf(T::one() / T::from_f64(controller_order.max(1) as f64))
    };

    let factor = (config.safety_factor * ratio).max(config.safety_min).min(config.safety_max);
    return StepEstimate { truncation_error: truncation, h_next: h * factor };
}
