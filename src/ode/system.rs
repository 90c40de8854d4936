use crate::algebra::abstr::Real;
use crate::algebra::linear::matrix::LuDecomposition;
use crate::algebra::linear::{Matrix, Vector};

/// Which capability constructor produced a [`System`]'s implicit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind
{
    Implicit,
    Explicit,
    SemiExplicit,
    Linear,
}

/// Abstract ODE/DAE description.
///
/// Every stage kernel is written against this interface alone; `Explicit`,
/// `SemiExplicit` and `Linear` below are side constructors that derive the
/// implicit residual `F` and its Jacobians from a simpler user-supplied form,
/// so a caller never has to hand-derive `JF_x`/`JF_dx` for the common cases.
pub trait System<T: Real>
{
    fn n(self: &Self) -> usize;
    fn m(self: &Self) -> usize;
    fn kind(self: &Self) -> Kind;

    /// Implicit residual; must vanish on the exact trajectory.
    fn f_impl(self: &Self, x: &Vector<T>, dx: &Vector<T>, t: T) -> Vector<T>;
    fn jf_x(self: &Self, x: &Vector<T>, dx: &Vector<T>, t: T) -> Matrix<T>;
    fn jf_dx(self: &Self, x: &Vector<T>, dx: &Vector<T>, t: T) -> Matrix<T>;

    /// Algebraic invariants and their Jacobian; `m() == 0` is permitted, in
    /// which case both return empty vectors/matrices.
    fn h(self: &Self, x: &Vector<T>, t: T) -> Vector<T>;
    fn jh_x(self: &Self, x: &Vector<T>, t: T) -> Matrix<T>;

    fn in_domain(self: &Self, x: &Vector<T>, t: T) -> bool;

    /// Time-reversal view: `F_rev(x, dx, t) = -F(x, -dx, -t)`.
    fn f_rev(self: &Self, x: &Vector<T>, dx: &Vector<T>, t: T) -> Vector<T>
    {
        return -self.f_impl(x, &(-dx.clone()), -t);
    }

    fn jf_x_rev(self: &Self, x: &Vector<T>, dx: &Vector<T>, t: T) -> Matrix<T>
    {
        return &self.jf_x(x, &(-dx.clone()), -t) * (-T::one());
    }

    /// `d/d(dx) [-F(x,-dx,-t)] = -JF_dx(x,-dx,-t) * d(-dx)/d(dx) = JF_dx(x,-dx,-t)`.
    fn jf_dx_rev(self: &Self, x: &Vector<T>, dx: &Vector<T>, t: T) -> Matrix<T>
    {
        return self.jf_dx(x, &(-dx.clone()), -t);
    }
}

/// Derives the implicit form from `dx/dt = f(x, t)`: `F := dx - f`,
/// `JF_x := -Jf_x`, `JF_dx := I`.
pub struct Explicit<T, F, JF>
{
    n: usize,
    m: usize,
    f: F,
    jf_x: JF,
    h_fn: Option<Box<dyn Fn(&Vector<T>, T) -> Vector<T>>>,
    jh_x_fn: Option<Box<dyn Fn(&Vector<T>, T) -> Matrix<T>>>,
    domain: Box<dyn Fn(&Vector<T>, T) -> bool>,
}

impl<T, F, JF> Explicit<T, F, JF>
where
    T: Real,
    F: Fn(&Vector<T>, T) -> Vector<T>,
    JF: Fn(&Vector<T>, T) -> Matrix<T>,
{
    pub fn new(n: usize, f: F, jf_x: JF) -> Self
    {
        return Explicit { n, m: 0, f, jf_x, h_fn: None, jh_x_fn: None, domain: Box::new(|_, _| true) };
    }

    pub fn with_invariant(
        mut self: Self,
        h_fn: impl Fn(&Vector<T>, T) -> Vector<T> + 'static,
        jh_x_fn: impl Fn(&Vector<T>, T) -> Matrix<T> + 'static,
        m: usize,
    ) -> Self
    {
        self.m = m;
        self.h_fn = Some(Box::new(h_fn));
        self.jh_x_fn = Some(Box::new(jh_x_fn));
        return self;
    }

    pub fn with_domain(mut self: Self, domain: impl Fn(&Vector<T>, T) -> bool + 'static) -> Self
    {
        self.domain = Box::new(domain);
        return self;
    }

    pub fn f(self: &Self, x: &Vector<T>, t: T) -> Vector<T>
    {
        return (self.f)(x, t);
    }
}

impl<T, F, JF> System<T> for Explicit<T, F, JF>
where
    T: Real,
    F: Fn(&Vector<T>, T) -> Vector<T>,
    JF: Fn(&Vector<T>, T) -> Matrix<T>,
{
    fn n(self: &Self) -> usize
    {
        return self.n;
    }

    fn m(self: &Self) -> usize
    {
        return self.m;
    }

    fn kind(self: &Self) -> Kind
    {
        return Kind::Explicit;
    }

    fn f_impl(self: &Self, x: &Vector<T>, dx: &Vector<T>, t: T) -> Vector<T>
    {
        return dx - &(self.f)(x, t);
    }

    fn jf_x(self: &Self, x: &Vector<T>, _dx: &Vector<T>, t: T) -> Matrix<T>
    {
        return &(self.jf_x)(x, t) * (-T::one());
    }

    fn jf_dx(self: &Self, _x: &Vector<T>, _dx: &Vector<T>, _t: T) -> Matrix<T>
    {
        return Matrix::identity(self.n);
    }

    fn h(self: &Self, x: &Vector<T>, t: T) -> Vector<T>
    {
        match &self.h_fn
        {
            Some(f) => return f(x, t),
            None => return Vector::zero(0),
        }
    }

    fn jh_x(self: &Self, x: &Vector<T>, t: T) -> Matrix<T>
    {
        match &self.jh_x_fn
        {
            Some(f) => return f(x, t),
            None => return Matrix::zero(0, self.n),
        }
    }

    fn in_domain(self: &Self, x: &Vector<T>, t: T) -> bool
    {
        return (self.domain)(x, t);
    }
}

/// Derives the implicit form from a mass-matrix system `M(x,t) dx = r(x,t)`.
///
/// `f(x,t) = M^-1 r`, obtained by LU-solving `M` at each call rather than
/// inverting it; the implicit residual is `F = M dx - r`, so
/// `JF_x = (dM/dx . dx) - Jr_x`, where `dM/dx` is supplied as `tm_x`, a
/// rank-3 tensor represented as one matrix per state component (`tm_x(k)` is
/// `dM/dx_k`).
pub struct SemiExplicit<T, M, TMX, R, JRX>
{
    n: usize,
    m: usize,
    mass: M,
    tm_x: TMX,
    r: R,
    jr_x: JRX,
    domain: Box<dyn Fn(&Vector<T>, T) -> bool>,
}

impl<T, M, TMX, R, JRX> SemiExplicit<T, M, TMX, R, JRX>
where
    T: Real,
    M: Fn(&Vector<T>, T) -> Matrix<T>,
    TMX: Fn(&Vector<T>, T) -> Vec<Matrix<T>>,
    R: Fn(&Vector<T>, T) -> Vector<T>,
    JRX: Fn(&Vector<T>, T) -> Matrix<T>,
{
    pub fn new(n: usize, mass: M, tm_x: TMX, r: R, jr_x: JRX) -> Self
    {
        return SemiExplicit { n, m: 0, mass, tm_x, r, jr_x, domain: Box::new(|_, _| true) };
    }

    pub fn with_domain(mut self: Self, domain: impl Fn(&Vector<T>, T) -> bool + 'static) -> Self
    {
        self.domain = Box::new(domain);
        return self;
    }

    /// `f(x,t) = M(x,t)^-1 r(x,t)`.
    pub fn f(self: &Self, x: &Vector<T>, t: T) -> Result<Vector<T>, ()>
    {
        let mass = (self.mass)(x, t);
        let lu = LuDecomposition::decompose(&mass);
        if lu.is_singular()
        {
            return Err(());
        }
        return Ok(lu.solve(&(self.r)(x, t)));
    }
}

impl<T, M, TMX, R, JRX> System<T> for SemiExplicit<T, M, TMX, R, JRX>
where
    T: Real,
    M: Fn(&Vector<T>, T) -> Matrix<T>,
    TMX: Fn(&Vector<T>, T) -> Vec<Matrix<T>>,
    R: Fn(&Vector<T>, T) -> Vector<T>,
    JRX: Fn(&Vector<T>, T) -> Matrix<T>,
{
    fn n(self: &Self) -> usize
    {
        return self.n;
    }

    fn m(self: &Self) -> usize
    {
        return self.m;
    }

    fn kind(self: &Self) -> Kind
    {
        return Kind::SemiExplicit;
    }

    fn f_impl(self: &Self, x: &Vector<T>, dx: &Vector<T>, t: T) -> Vector<T>
    {
        let mass = (self.mass)(x, t);
        return &(&mass * dx) - &(self.r)(x, t);
    }

    fn jf_x(self: &Self, x: &Vector<T>, dx: &Vector<T>, t: T) -> Matrix<T>
    {
        // JF_x of the mass-matrix residual F = M dx - r, not Jf_x of f = M^-1 r.
        let dm_dx = (self.tm_x)(x, t);
        let jr_x = (self.jr_x)(x, t);
        let mut contraction = Matrix::zero(self.n, self.n);
        for (k, dm_dxk) in dm_dx.iter().enumerate()
        {
            let column = dm_dxk * dx;
            for i in 0..self.n
            {
                *contraction.get_mut(i, k) = *column.get(i);
            }
        }
        return &contraction - &jr_x;
    }

    fn jf_dx(self: &Self, x: &Vector<T>, _dx: &Vector<T>, t: T) -> Matrix<T>
    {
        return (self.mass)(x, t);
    }

    fn h(self: &Self, _x: &Vector<T>, _t: T) -> Vector<T>
    {
        return Vector::zero(self.m);
    }

    fn jh_x(self: &Self, _x: &Vector<T>, _t: T) -> Matrix<T>
    {
        return Matrix::zero(self.m, self.n);
    }

    fn in_domain(self: &Self, x: &Vector<T>, t: T) -> bool
    {
        return (self.domain)(x, t);
    }
}

/// Derives the implicit form from a linear time-varying system
/// `E(t) dx = A(t) x + b(t)`.
pub struct Linear<T, EF, AF, BF>
{
    n: usize,
    e: EF,
    a: AF,
    b: BF,
    domain: Box<dyn Fn(&Vector<T>, T) -> bool>,
}

impl<T, EF, AF, BF> Linear<T, EF, AF, BF>
where
    T: Real,
    EF: Fn(T) -> Matrix<T>,
    AF: Fn(T) -> Matrix<T>,
    BF: Fn(T) -> Vector<T>,
{
    pub fn new(n: usize, e: EF, a: AF, b: BF) -> Self
    {
        return Linear { n, e, a, b, domain: Box::new(|_, _| true) };
    }

    pub fn with_domain(mut self: Self, domain: impl Fn(&Vector<T>, T) -> bool + 'static) -> Self
    {
        self.domain = Box::new(domain);
        return self;
    }

    /// `f(x,t) = E(t)^-1 (A(t) x + b(t))`.
    pub fn f(self: &Self, x: &Vector<T>, t: T) -> Result<Vector<T>, ()>
    {
        let e = (self.e)(t);
        let lu = LuDecomposition::decompose(&e);
        if lu.is_singular()
        {
            return Err(());
        }
        let rhs = &(&(self.a)(t) * x) + &(self.b)(t);
        return Ok(lu.solve(&rhs));
    }
}

impl<T, EF, AF, BF> System<T> for Linear<T, EF, AF, BF>
where
    T: Real,
    EF: Fn(T) -> Matrix<T>,
    AF: Fn(T) -> Matrix<T>,
    BF: Fn(T) -> Vector<T>,
{
    fn n(self: &Self) -> usize
    {
        return self.n;
    }

    fn m(self: &Self) -> usize
    {
        return 0;
    }

    fn kind(self: &Self) -> Kind
    {
        return Kind::Linear;
    }

    fn f_impl(self: &Self, x: &Vector<T>, dx: &Vector<T>, t: T) -> Vector<T>
    {
        return &(&(self.e)(t) * dx) - &(&(&(self.a)(t) * x) + &(self.b)(t));
    }

    fn jf_x(self: &Self, _x: &Vector<T>, _dx: &Vector<T>, t: T) -> Matrix<T>
    {
        return &(self.a)(t) * (-T::one());
    }

    fn jf_dx(self: &Self, _x: &Vector<T>, _dx: &Vector<T>, t: T) -> Matrix<T>
    {
        return (self.e)(t);
    }

    fn h(self: &Self, _x: &Vector<T>, _t: T) -> Vector<T>
    {
        return Vector::zero(0);
    }

    fn jh_x(self: &Self, _x: &Vector<T>, _t: T) -> Matrix<T>
    {
        return Matrix::zero(0, self.n);
    }

    fn in_domain(self: &Self, x: &Vector<T>, t: T) -> bool
    {
        return (self.domain)(x, t);
    }
}
