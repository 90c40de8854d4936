use crate::algebra::abstr::Real;
use crate::algebra::linear::matrix::LuDecomposition;
use crate::algebra::linear::Vector;
use crate::optimization::Jacobian;
use std::fmt;

/// Why a Newton iteration gave up before reaching `tolerance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewtonError
{
    /// The iterate count hit `max_iterations` without the residual norm
    /// dropping below `tolerance`.
    NonConvergent,
    /// The Jacobian at some iterate was numerically singular.
    Singular,
    /// The damped variant exhausted `max_relaxations` step halvings without
    /// finding a relaxation factor that decreased the residual.
    RelaxationExhausted,
}

impl fmt::Display for NewtonError
{
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self
        {
            NewtonError::NonConvergent => write!(f, "Newton iteration did not converge"),
            NewtonError::Singular => write!(f, "Jacobian is numerically singular"),
            NewtonError::RelaxationExhausted => write!(f, "relaxation loop exhausted without progress"),
        }
    }
}

/// Successful outcome of a Newton solve.
#[derive(Debug, Clone)]
pub struct NewtonOutcome<T>
{
    pub root: Vector<T>,
    pub iterations: usize,
    pub fun_evaluations: usize,
    pub jac_evaluations: usize,
}

/// Bracketing parameters for the damped (affine-invariant) variant.
///
/// At each iterate, the relaxation factor `tau` starts at 1 and is shrunk by
/// `relaxation_factor` (`spec.md`'s `alpha ~ 0.8`) until the damped residual
/// either actually decreases or the step itself has shrunk enough relative
/// to the undamped one, or `max_relaxations` shrinks have been tried.
#[derive(Debug, Clone, Copy)]
pub struct DampingOptions<T>
{
    pub relaxation_factor: T,
    pub max_relaxations: usize,
}

impl<T> Default for DampingOptions<T>
where
    T: Real,
{
    fn default() -> Self
    {
        return DampingOptions { relaxation_factor: T::from_f64(0.8), max_relaxations: 10 };
    }
}

/// Damped Newton root-finder for `F(x) = 0`.
///
/// Mirrors the plain/damped pair of a classical Newton-Raphson: `solve`
/// takes the full step every time, `solve_damped` falls back to a
/// bracketing relaxation search on `tau` when the full step doesn't reduce
/// the residual, which is what keeps the stage equations of stiff Runge-Kutta
/// methods from diverging on a bad initial guess.
pub struct Newton<T>
{
    pub tolerance: T,
    pub max_iterations: usize,
    pub max_fun_evaluations: usize,
    pub max_jac_evaluations: usize,
}

impl<T> Newton<T>
where
    T: Real,
{
    pub fn new(tolerance: T, max_iterations: usize) -> Newton<T>
    {
        return Newton {
            tolerance,
            max_iterations,
            max_fun_evaluations: max_iterations + 1,
            max_jac_evaluations: max_iterations,
        };
    }

    /// Plain Newton iteration: `x_{k+1} = x_k + d_k` with `J(x_k) d_k = -F(x_k)`.
    ///
    /// Both convergence checks (`||F(x_k)|| < tol`, `||d_k|| < tol^2`) are
    /// evaluated before the update is applied, so a zero-step termination on
    /// the very first iteration is possible when `x0` is already a root.
    pub fn solve<F>(self: &Self, f: &F, x0: &Vector<T>) -> Result<NewtonOutcome<T>, NewtonError>
    where
        F: Jacobian<T>,
    {
        let mut x = x0.clone();
        let mut fun_evals = 0usize;
        let mut jac_evals = 0usize;
        let tol2 = self.tolerance * self.tolerance;

        let mut residual = f.eval(&x);
        fun_evals += 1;

        for k in 0..self.max_iterations
        {
            if residual.norm_inf() < self.tolerance
            {
                return Ok(NewtonOutcome { root: x, iterations: k, fun_evaluations: fun_evals, jac_evaluations: jac_evals });
            }

            let jac = f.jacobian(&x);
            jac_evals += 1;
            let lu = LuDecomposition::decompose(&jac);
            if lu.is_singular()
            {
                return Err(NewtonError::Singular);
            }

            let d = -lu.solve(&residual);
            if d.norm_inf() < tol2
            {
                return Ok(NewtonOutcome { root: x, iterations: k, fun_evaluations: fun_evals, jac_evaluations: jac_evals });
            }

            x = &x + &d;
            residual = f.eval(&x);
            fun_evals += 1;
        }

        if residual.norm_inf() < self.tolerance
        {
            return Ok(NewtonOutcome {
                root: x,
                iterations: self.max_iterations,
                fun_evaluations: fun_evals,
                jac_evaluations: jac_evals,
            });
        }
        return Err(NewtonError::NonConvergent);
    }

    /// Damped, affine-invariant Newton iteration.
    ///
    /// Identical to [`solve`](Self::solve) except that each Newton direction
    /// `d_k` is applied through a relaxation factor `tau` starting at 1: the
    /// bracketing loop accepts the first `tau` with `||F(x + tau*d)|| <
    /// ||F(x)||` or `||tau*d|| < (1 - tau/2) * ||d||`, otherwise shrinks
    /// `tau` by `damping.relaxation_factor` and retries, up to
    /// `damping.max_relaxations` times.
    pub fn solve_damped<F>(
        self: &Self,
        f: &F,
        x0: &Vector<T>,
        damping: DampingOptions<T>,
    ) -> Result<NewtonOutcome<T>, NewtonError>
    where
        F: Jacobian<T>,
    {
        let mut x = x0.clone();
        let mut fun_evals = 0usize;
        let mut jac_evals = 0usize;
        let tol2 = self.tolerance * self.tolerance;

        let mut residual = f.eval(&x);
        fun_evals += 1;

        for k in 0..self.max_iterations
        {
            let residual_norm = residual.norm_inf();
            if residual_norm < self.tolerance
            {
                return Ok(NewtonOutcome { root: x, iterations: k, fun_evaluations: fun_evals, jac_evaluations: jac_evals });
            }

            let jac = f.jacobian(&x);
            jac_evals += 1;
            let lu = LuDecomposition::decompose(&jac);
            if lu.is_singular()
            {
                return Err(NewtonError::Singular);
            }

            let d = -lu.solve(&residual);
            let d_norm = d.norm_inf();
            if d_norm < tol2
            {
                return Ok(NewtonOutcome { root: x, iterations: k, fun_evaluations: fun_evals, jac_evaluations: jac_evals });
            }

            let mut tau = T::one();
            let mut relaxations = 0usize;
            loop
            {
                let x_trial = &x + &(&d * tau);
                let residual_trial = f.eval(&x_trial);
                fun_evals += 1;

                let accept = residual_trial.norm_inf() < residual_norm
                    || (tau * d_norm) < (T::one() - tau / T::from_f64(2.0)) * d_norm;
                if accept
                {
                    x = x_trial;
                    residual = residual_trial;
                    break;
                }

                relaxations += 1;
                if relaxations > damping.max_relaxations
                {
                    return Err(NewtonError::RelaxationExhausted);
                }
                tau = tau * damping.relaxation_factor;
            }
        }

        if residual.norm_inf() < self.tolerance
        {
            return Ok(NewtonOutcome {
                root: x,
                iterations: self.max_iterations,
                fun_evaluations: fun_evals,
                jac_evaluations: jac_evals,
            });
        }
        return Err(NewtonError::NonConvergent);
    }
}
