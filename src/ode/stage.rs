use crate::algebra::abstr::Real;
use crate::algebra::linear::{Matrix, Vector};
use crate::ode::error::IntegratorError;
use crate::ode::system::System;
use crate::ode::tableau::{RkType, Tableau};
use crate::optimization::{DampingOptions, Function, Jacobian, Newton};

/// Evaluates a system's residual/Jacobian in either forward or reverse-time
/// mode, per `spec.md` §4.3 ("reverse-time mode swaps F for F_rev").
fn eval_f<T: Real, S: System<T> + ?Sized>(sys: &S, x: &Vector<T>, dx: &Vector<T>, t: T, reverse: bool) -> Vector<T>
{
    if reverse
    {
        return sys.f_rev(x, dx, t);
    }
    return sys.f_impl(x, dx, t);
}

fn eval_jf_x<T: Real, S: System<T> + ?Sized>(sys: &S, x: &Vector<T>, dx: &Vector<T>, t: T, reverse: bool) -> Matrix<T>
{
    if reverse
    {
        return sys.jf_x_rev(x, dx, t);
    }
    return sys.jf_x(x, dx, t);
}

fn eval_jf_dx<T: Real, S: System<T> + ?Sized>(sys: &S, x: &Vector<T>, dx: &Vector<T>, t: T, reverse: bool) -> Matrix<T>
{
    if reverse
    {
        return sys.jf_dx_rev(x, dx, t);
    }
    return sys.jf_dx(x, dx, t);
}

/// Settings threaded down from [`crate::ode::config::Configuration`] into a
/// single stage/step call.
#[derive(Debug, Clone, Copy)]
pub struct StageOptions<T>
{
    pub reverse: bool,
    pub newton_tolerance: T,
    pub max_newton_iterations: usize,
    pub damping: DampingOptions<T>,
}

/// One stage's residual as a function of its own unknown `K_i`, with the
/// preceding stages' contribution to `x_node` already folded in.
struct StageResidual<'a, T, S: ?Sized>
{
    sys: &'a S,
    x_known: Vector<T>,
    a_ii: T,
    h: T,
    t_node: T,
    reverse: bool,
}

impl<'a, T, S> Function<T> for StageResidual<'a, T, S>
where
    T: Real,
    S: System<T> + ?Sized,
{
    fn eval(self: &Self, k_i: &Vector<T>) -> Vector<T>
    {
        let x_node = &self.x_known + &(k_i * self.a_ii);
        let dx = k_i * (T::one() / self.h);
        return eval_f(self.sys, &x_node, &dx, self.t_node, self.reverse);
    }
}

impl<'a, T, S> Jacobian<T> for StageResidual<'a, T, S>
where
    T: Real,
    S: System<T> + ?Sized,
{
    fn jacobian(self: &Self, k_i: &Vector<T>) -> Matrix<T>
    {
        let x_node = &self.x_known + &(k_i * self.a_ii);
        let dx = k_i * (T::one() / self.h);
        let jf_x = eval_jf_x(self.sys, &x_node, &dx, self.t_node, self.reverse);
        let jf_dx = eval_jf_dx(self.sys, &x_node, &dx, self.t_node, self.reverse);
        return &(&jf_x * self.a_ii) + &(&jf_dx * (T::one() / self.h));
    }
}

/// The one block residual of an IRK step, unknown `K̃` flattened
/// column-major into a vector of length `n*s`.
struct BlockResidual<'a, T, S: ?Sized>
{
    sys: &'a S,
    tableau: &'a Tableau<T>,
    x_k: Vector<T>,
    h: T,
    t_k: T,
    reverse: bool,
    n: usize,
}

impl<'a, T, S> BlockResidual<'a, T, S>
where
    T: Real,
    S: System<T> + ?Sized,
{
    fn unflatten(self: &Self, k_flat: &Vector<T>) -> Matrix<T>
    {
        let s = self.tableau.stages;
        let mut k = Matrix::zero(self.n, s);
        for i in 0..s
        {
            for r in 0..self.n
            {
                *k.get_mut(r, i) = *k_flat.get(i * self.n + r);
            }
        }
        return k;
    }

    fn stage_node(self: &Self, k: &Matrix<T>, i: usize) -> (Vector<T>, Vector<T>, T)
    {
        let mut x_node = self.x_k.clone();
        for j in 0..self.tableau.stages
        {
            let a_ij = *self.tableau.a.get(i, j);
            if a_ij != T::zero()
            {
                x_node += &(&k.column(j) * a_ij);
            }
        }
        let dx_node = &k.column(i) * (T::one() / self.h);
        let t_node = self.t_k + self.h * *self.tableau.c.get(i);
        return (x_node, dx_node, t_node);
    }
}

impl<'a, T, S> Function<T> for BlockResidual<'a, T, S>
where
    T: Real,
    S: System<T> + ?Sized,
{
    fn eval(self: &Self, k_flat: &Vector<T>) -> Vector<T>
    {
        let s = self.tableau.stages;
        let k = self.unflatten(k_flat);
        let mut out = Vector::zero(self.n * s);
        for i in 0..s
        {
            let (x_node, dx_node, t_node) = self.stage_node(&k, i);
            let g_i = eval_f(self.sys, &x_node, &dx_node, t_node, self.reverse);
            for r in 0..self.n
            {
                *out.get_mut(i * self.n + r) = *g_i.get(r);
            }
        }
        return out;
    }
}

impl<'a, T, S> Jacobian<T> for BlockResidual<'a, T, S>
where
    T: Real,
    S: System<T> + ?Sized,
{
    fn jacobian(self: &Self, k_flat: &Vector<T>) -> Matrix<T>
    {
        let s = self.tableau.stages;
        let k = self.unflatten(k_flat);
        let mut block = Matrix::zero(self.n * s, self.n * s);
        for i in 0..s
        {
            let (x_node, dx_node, t_node) = self.stage_node(&k, i);
            let jf_x = eval_jf_x(self.sys, &x_node, &dx_node, t_node, self.reverse);
            let jf_dx = eval_jf_dx(self.sys, &x_node, &dx_node, t_node, self.reverse);
            for j in 0..s
            {
                let a_ij = *self.tableau.a.get(i, j);
                let delta = if i == j { T::one() / self.h } else { T::zero() };
                if a_ij == T::zero() && delta == T::zero()
                {
                    continue;
                }
                for r in 0..self.n
                {
                    for c in 0..self.n
                    {
                        let v = a_ij * *jf_x.get(r, c) + delta * *jf_dx.get(r, c);
                        *block.get_mut(i * self.n + r, j * self.n + c) = v;
                    }
                }
            }
        }
        return block;
    }
}

/// Computes the rescaled stage matrix `K̃` for one step, dispatching on the
/// tableau's structural type and the system's `Kind`.
pub fn compute_stages<T, S>(
    sys: &S,
    tableau: &Tableau<T>,
    x_k: &Vector<T>,
    t_k: T,
    h_k: T,
    opts: StageOptions<T>,
) -> Result<Matrix<T>, IntegratorError>
where
    T: Real,
    S: System<T> + ?Sized,
{
    let n = sys.n();
    let s = tableau.stages;

    let k = match tableau.rk_type
    {
        RkType::Erk if matches!(sys.kind(), crate::ode::system::Kind::Explicit) =>
        {
            erk_explicit(sys, tableau, x_k, t_k, h_k, opts)
        }
        RkType::Erk => erk_implicit(sys, tableau, x_k, t_k, h_k, opts),
        RkType::Dirk => dirk(sys, tableau, x_k, t_k, h_k, opts),
        RkType::Irk => irk(sys, tableau, x_k, t_k, h_k, opts),
    }?;

    debug_assert_eq!(k.dim(), (n, s));
    return Ok(k);
}

/// ERK over an explicit system: plain forward substitution, no Newton call.
fn erk_explicit<T, S>(
    sys: &S,
    tableau: &Tableau<T>,
    x_k: &Vector<T>,
    t_k: T,
    h_k: T,
    opts: StageOptions<T>,
) -> Result<Matrix<T>, IntegratorError>
where
    T: Real,
    S: System<T> + ?Sized,
{
    // F_rev(x,dx,t) = -F(x,-dx,-t) = dx + f(x,-t), so the reverse root is
    // dx = -f(x,-t).
    let explicit_eval = |x: &Vector<T>, t: T| -> Vector<T> {
        if opts.reverse
        {
            return -eval_f_explicit(sys, x, -t);
        }
        return eval_f_explicit(sys, x, t);
    };

    let n = sys.n();
    let s = tableau.stages;
    let mut k = Matrix::zero(n, s);

    for i in 0..s
    {
        let mut x_node = x_k.clone();
        for j in 0..i
        {
            let a_ij = *tableau.a.get(i, j);
            if a_ij != T::zero()
            {
                x_node += &(&k.column(j) * a_ij);
            }
        }
        let t_node = t_k + h_k * *tableau.c.get(i);
        let slope = explicit_eval(&x_node, t_node);
        if !slope.is_finite()
        {
            return Err(IntegratorError::NonFinite);
        }
        k.set_column(i, &(&slope * h_k));
    }

    return Ok(k);
}

/// Pulls the user-supplied `f` back out of an implicit residual for a
/// `Kind::Explicit` system: `F = dx - f(x,t)`, so `f(x,t) = dx - F(x,0,t)`
/// evaluated at `dx=0` gives `-F(x,0,t) = f(x,t)`.
fn eval_f_explicit<T, S>(sys: &S, x: &Vector<T>, t: T) -> Vector<T>
where
    T: Real,
    S: System<T> + ?Sized,
{
    return -sys.f_impl(x, &Vector::zero(sys.n()), t);
}

/// ERK over an implicit system: a per-stage Newton call, diagonal entry
/// always zero so `x_node` does not depend on the stage's own unknown.
fn erk_implicit<T, S>(
    sys: &S,
    tableau: &Tableau<T>,
    x_k: &Vector<T>,
    t_k: T,
    h_k: T,
    opts: StageOptions<T>,
) -> Result<Matrix<T>, IntegratorError>
where
    T: Real,
    S: System<T> + ?Sized,
{
    let n = sys.n();
    let s = tableau.stages;
    let mut k = Matrix::zero(n, s);
    let newton = Newton::new(opts.newton_tolerance, opts.max_newton_iterations);

    for i in 0..s
    {
        let mut x_known = x_k.clone();
        for j in 0..i
        {
            let a_ij = *tableau.a.get(i, j);
            if a_ij != T::zero()
            {
                x_known += &(&k.column(j) * a_ij);
            }
        }
        let t_node = t_k + h_k * *tableau.c.get(i);
        let residual = StageResidual { sys, x_known, a_ii: T::zero(), h: h_k, t_node, reverse: opts.reverse };

        let outcome = newton.solve_damped(&residual, &Vector::zero(n), opts.damping).map_err(stage_newton_error)?;
        k.set_column(i, &outcome.root);
    }

    return Ok(k);
}

/// DIRK: same per-stage Newton as `erk_implicit`, but the diagonal entry is
/// nonzero so `x_node` depends on the stage's own unknown `K_i`.
fn dirk<T, S>(
    sys: &S,
    tableau: &Tableau<T>,
    x_k: &Vector<T>,
    t_k: T,
    h_k: T,
    opts: StageOptions<T>,
) -> Result<Matrix<T>, IntegratorError>
where
    T: Real,
    S: System<T> + ?Sized,
{
    let n = sys.n();
    let s = tableau.stages;
    let mut k = Matrix::zero(n, s);
    let newton = Newton::new(opts.newton_tolerance, opts.max_newton_iterations);

    for i in 0..s
    {
        let mut x_known = x_k.clone();
        for j in 0..i
        {
            let a_ij = *tableau.a.get(i, j);
            if a_ij != T::zero()
            {
                x_known += &(&k.column(j) * a_ij);
            }
        }
        let a_ii = *tableau.a.get(i, i);
        let t_node = t_k + h_k * *tableau.c.get(i);
        let residual = StageResidual { sys, x_known, a_ii, h: h_k, t_node, reverse: opts.reverse };

        let outcome = newton.solve_damped(&residual, &Vector::zero(n), opts.damping).map_err(stage_newton_error)?;
        k.set_column(i, &outcome.root);
    }

    return Ok(k);
}

/// IRK: one block Newton solve over all `n*s` unknowns at once.
fn irk<T, S>(
    sys: &S,
    tableau: &Tableau<T>,
    x_k: &Vector<T>,
    t_k: T,
    h_k: T,
    opts: StageOptions<T>,
) -> Result<Matrix<T>, IntegratorError>
where
    T: Real,
    S: System<T> + ?Sized,
{
    let n = sys.n();
    let s = tableau.stages;
    let newton = Newton::new(opts.newton_tolerance, opts.max_newton_iterations);

    let block = BlockResidual { sys, tableau, x_k: x_k.clone(), h: h_k, t_k, reverse: opts.reverse, n };
    let outcome = newton.solve_damped(&block, &Vector::zero(n * s), opts.damping).map_err(stage_newton_error)?;

    return Ok(block.unflatten(&outcome.root));
}

fn stage_newton_error(err: crate::optimization::NewtonError) -> IntegratorError
{
    use crate::optimization::NewtonError;
    match err
    {
        NewtonError::Singular => IntegratorError::Singular,
        NewtonError::NonConvergent | NewtonError::RelaxationExhausted => IntegratorError::NonConvergent,
    }
}
