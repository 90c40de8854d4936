use crate::algebra::abstr::Real;
use std::cell::RefCell;
use std::fmt;

/// Sink for human-readable warnings emitted in verbose mode.
///
/// The teacher crate has no logging dependency and the rest of the pack's
/// numerical cores don't reach for one either, so this stays a trivial trait
/// object rather than a `log`/`tracing` facade.
pub trait WarningSink
{
    fn warn(self: &Self, message: &str);
}

/// Default sink: prints to stderr, prefixed so it's easy to grep out of test
/// output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrWarningSink;

impl WarningSink for StderrWarningSink
{
    fn warn(self: &Self, message: &str)
    {
        eprintln!("[ode] {}", message);
    }
}

/// Per-solve tunables; defaults match `spec.md` §3.
pub struct Configuration<T>
{
    pub abs_tol: T,
    pub rel_tol: T,
    pub safety_factor: T,
    pub safety_min: T,
    pub safety_max: T,
    pub h_min: T,
    pub max_substeps: usize,
    pub adaptive: bool,
    pub reverse: bool,
    pub projection: bool,
    pub projection_tol: T,
    pub max_projection_iterations: usize,
    pub max_newton_iterations: usize,
    pub max_relaxations: usize,
    pub verbose: bool,
    pub warning_sink: Box<dyn WarningSink>,
    /// Per-step callback, `(step_index, x, t)`; may read but must not mutate
    /// the integrator's internal state (`spec.md` §4.7). Held behind a
    /// `RefCell` so the driver can invoke it through the shared
    /// `&Configuration` it is handed, without requiring every call site to
    /// thread a `&mut Configuration` down through `solve`/`adaptive_solve`.
    pub step_callback: RefCell<Option<Box<dyn FnMut(usize, &crate::algebra::linear::Vector<T>, T)>>>,
}

impl<T> Configuration<T>
where
    T: Real,
{
    pub fn new() -> Configuration<T>
    {
        return Configuration {
            abs_tol: T::from_f64(1e-6),
            rel_tol: T::from_f64(1e-3),
            safety_factor: T::from_f64(0.9),
            safety_min: T::from_f64(0.1),
            safety_max: T::from_f64(10.0),
            h_min: T::from_f64(1e-12),
            max_substeps: 5,
            adaptive: false,
            reverse: false,
            projection: false,
            projection_tol: T::from_f64(1e-12),
            max_projection_iterations: 5,
            max_newton_iterations: 100,
            max_relaxations: 10,
            verbose: false,
            warning_sink: Box::new(StderrWarningSink),
            step_callback: RefCell::new(None),
        };
    }

    pub fn set_step_callback(
        self: &mut Self,
        callback: impl FnMut(usize, &crate::algebra::linear::Vector<T>, T) + 'static,
    )
    {
        self.step_callback = RefCell::new(Some(Box::new(callback)));
    }

    pub(crate) fn warn(self: &Self, message: &str)
    {
        if self.verbose
        {
            self.warning_sink.warn(message);
        }
    }

    pub(crate) fn invoke_step_callback(self: &Self, k: usize, x: &crate::algebra::linear::Vector<T>, t: T)
    {
        if let Some(callback) = self.step_callback.borrow_mut().as_mut()
        {
            callback(k, x, t);
        }
    }
}

impl<T> Default for Configuration<T>
where
    T: Real,
{
    fn default() -> Self
    {
        return Configuration::new();
    }
}

impl<T> fmt::Debug for Configuration<T>
where
    T: Real,
{
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        return f
            .debug_struct("Configuration")
            .field("abs_tol", &self.abs_tol)
            .field("rel_tol", &self.rel_tol)
            .field("safety_factor", &self.safety_factor)
            .field("safety_min", &self.safety_min)
            .field("safety_max", &self.safety_max)
            .field("h_min", &self.h_min)
            .field("max_substeps", &self.max_substeps)
            .field("adaptive", &self.adaptive)
            .field("reverse", &self.reverse)
            .field("projection", &self.projection)
            .field("projection_tol", &self.projection_tol)
            .field("max_projection_iterations", &self.max_projection_iterations)
            .field("max_newton_iterations", &self.max_newton_iterations)
            .field("max_relaxations", &self.max_relaxations)
            .field("verbose", &self.verbose)
            .finish();
    }
}
