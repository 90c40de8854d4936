use crate::algebra::abstr::Real;
use crate::algebra::linear::{Matrix, Vector};
#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// Structural family a [`Tableau`] belongs to.
///
/// Constrains the shape `check()` demands of `A`: strictly lower triangular
/// for `ERK` (an explicit stage never depends on itself or later stages),
/// lower triangular with a (possibly zero) diagonal for `DIRK`, unconstrained
/// for `IRK`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum RkType
{
    Erk,
    Dirk,
    Irk,
}

/// A Butcher tableau: coefficients `(A, b, c)`, optional embedded weights
/// `b_hat`, declared order(s), and the structural tag used at stage-kernel
/// dispatch.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Tableau<T>
{
    pub name: String,
    pub rk_type: RkType,
    pub stages: usize,
    pub order: usize,
    pub embedded_order: Option<usize>,
    pub a: Matrix<T>,
    pub b: Vector<T>,
    pub b_hat: Option<Vector<T>>,
    pub c: Vector<T>,
}

impl<T> Tableau<T>
where
    T: Real,
{
    pub fn is_embedded(self: &Self) -> bool
    {
        return self.b_hat.is_some();
    }

    /// The order used by the step controller: `max(order, embedded_order)`.
    pub fn controller_order(self: &Self) -> usize
    {
        match self.embedded_order
        {
            Some(p_hat) => return self.order.max(p_hat),
            None => return self.order,
        }
    }

    /// Full self-consistency check: structural shape, row-sum precheck,
    /// weight-sum, and the rooted-tree order conditions through order 6.
    ///
    /// `tau` is the tolerance applied throughout; `spec.md` calls for
    /// `eps^(2/3)`.
    pub fn check(self: &Self, tau: T) -> bool
    {
        let s = self.stages;
        if self.a.dim() != (s, s) || self.b.dim() != s || self.c.dim() != s
        {
            return false;
        }
        if let Some(b_hat) = &self.b_hat
        {
            if b_hat.dim() != s
            {
                return false;
            }
            if self.embedded_order.is_none()
            {
                return false;
            }
        }

        if !self.check_shape(tau)
        {
            return false;
        }
        if !self.check_row_sum(tau)
        {
            return false;
        }
        if !Self::check_weight_sum(&self.b, tau)
        {
            return false;
        }
        if let Some(b_hat) = &self.b_hat
        {
            if !Self::check_weight_sum(b_hat, tau)
            {
                return false;
            }
        }

        if !self.check_order(&self.b, self.order, tau)
        {
            return false;
        }
        if let (Some(b_hat), Some(p_hat)) = (&self.b_hat, self.embedded_order)
        {
            if !self.check_order(b_hat, p_hat, tau)
            {
                return false;
            }
        }

        return true;
    }

    fn check_shape(self: &Self, tau: T) -> bool
    {
        let s = self.stages;
        match self.rk_type
        {
            RkType::Erk =>
            {
                for i in 0..s
                {
                    for j in i..s
                    {
                        if self.a.get(i, j).abs() > tau
                        {
                            return false;
                        }
                    }
                }
                return true;
            }
            RkType::Dirk =>
            {
                for i in 0..s
                {
                    for j in (i + 1)..s
                    {
                        if self.a.get(i, j).abs() > tau
                        {
                            return false;
                        }
                    }
                }
                return true;
            }
            RkType::Irk => return true,
        }
    }

    fn check_row_sum(self: &Self, tau: T) -> bool
    {
        for i in 0..self.stages
        {
            let mut row_sum = T::zero();
            for j in 0..self.stages
            {
                row_sum += *self.a.get(i, j);
            }
            if (row_sum - *self.c.get(i)).abs() > tau
            {
                return false;
            }
        }
        return true;
    }

    fn check_weight_sum(weights: &Vector<T>, tau: T) -> bool
    {
        let sum: T = (0..weights.dim()).map(|i| *weights.get(i)).sum();
        return (sum - T::one()).abs() <= tau;
    }

    /// Rooted-tree order conditions through order 6 (Dormand-Prince's 1980
    /// formulation). Each condition is `sum_i b_i * phi(tree) = 1/gamma(tree)`
    /// for a tree of the relevant order; conditions of lower order are a
    /// prerequisite so the ladder checks them cumulatively up to `order`.
    fn check_order(self: &Self, b: &Vector<T>, order: usize, tau: T) -> bool
    {
        let s = self.stages;
        let a = &self.a;
        let c = &self.c;

        let sum_b = |f: &dyn Fn(usize) -> T| -> T { (0..s).map(|i| *b.get(i) * f(i)).sum() };
        let a_c = |i: usize| -> T { (0..s).map(|j| *a.get(i, j) * *c.get(j)).sum() };
        let a_c2 = |i: usize| -> T { (0..s).map(|j| *a.get(i, j) * c.get(j).powi(2)).sum() };
        let a_ac = |i: usize| -> T { (0..s).map(|j| *a.get(i, j) * a_c(j)).sum() };
        let a_c3 = |i: usize| -> T { (0..s).map(|j| *a.get(i, j) * c.get(j).powi(3)).sum() };
        let a_c_ac = |i: usize| -> T { (0..s).map(|j| *a.get(i, j) * *c.get(j) * a_c(j)).sum() };
        let a_aac = |i: usize| -> T { (0..s).map(|j| *a.get(i, j) * a_ac(j)).sum() };
        let a_ac2 = |i: usize| -> T { (0..s).map(|j| *a.get(i, j) * a_c2(j)).sum() };

        // order 1: sum b_i = 1 (already checked as weight-sum).
        if order < 2
        {
            return true;
        }

        // order 2: sum b_i c_i = 1/2.
        if (sum_b(&|i| *c.get(i)) - T::from_f64(0.5)).abs() > tau
        {
            return false;
        }
        if order < 3
        {
            return true;
        }

        // order 3: sum b_i c_i^2 = 1/3; sum b_i (Ac)_i = 1/6.
        if (sum_b(&|i| c.get(i).powi(2)) - T::from_f64(1.0 / 3.0)).abs() > tau
        {
            return false;
        }
        if (sum_b(&a_c) - T::from_f64(1.0 / 6.0)).abs() > tau
        {
            return false;
        }
        if order < 4
        {
            return true;
        }

        // order 4: four conditions, targets 1/4, 1/8, 1/12, 1/24.
        if (sum_b(&|i| c.get(i).powi(3)) - T::from_f64(0.25)).abs() > tau
        {
            return false;
        }
        if (sum_b(&|i| *c.get(i) * a_c(i)) - T::from_f64(1.0 / 8.0)).abs() > tau
        {
            return false;
        }
        if (sum_b(&a_c2) - T::from_f64(1.0 / 12.0)).abs() > tau
        {
            return false;
        }
        if (sum_b(&a_ac) - T::from_f64(1.0 / 24.0)).abs() > tau
        {
            return false;
        }
        if order < 5
        {
            return true;
        }

        // order 5: nine conditions (Butcher 1964 / Dormand-Prince 1980). The
        // two height-5 chain conditions pair as: Sum b(A^3 c) = 1/120 (the
        // depth-5 linear chain, density 5!) and Sum b(A^2 c^2) = 1/60 (the
        // chain topped by a 2-leaf branch, density 60).
        let targets5: [T; 9] = [
            T::from_f64(1.0 / 5.0),
            T::from_f64(1.0 / 10.0),
            T::from_f64(1.0 / 15.0),
            T::from_f64(1.0 / 20.0),
            T::from_f64(1.0 / 30.0),
            T::from_f64(1.0 / 20.0),
            T::from_f64(1.0 / 40.0),
            T::from_f64(1.0 / 120.0),
            T::from_f64(1.0 / 60.0),
        ];
        let values5: [T; 9] = [
            sum_b(&|i| c.get(i).powi(4)),
            sum_b(&|i| c.get(i).powi(2) * a_c(i)),
            sum_b(&|i| *c.get(i) * a_c2(i)),
            sum_b(&|i| a_c(i).powi(2)),
            sum_b(&|i| *c.get(i) * a_ac(i)),
            sum_b(&a_c3),
            sum_b(&a_c_ac),
            sum_b(&a_aac),
            sum_b(&a_ac2),
        ];
        for (v, target) in values5.iter().zip(targets5.iter())
        {
            if (*v - *target).abs() > tau
            {
                return false;
            }
        }
        if order < 6
        {
            return true;
        }

        // order 6: the full rooted-tree ladder (20 conditions; Butcher 1964).
        // Nine are single-child wraps of each of the nine order-5 trees above
        // (one more `A` applied to each); the remaining eleven are the
        // multi-child-at-root trees of six nodes, built directly from the
        // order-2..4 building blocks already in scope.
        let a_c4 = |i: usize| -> T { (0..s).map(|j| *a.get(i, j) * c.get(j).powi(4)).sum() };
        let a_c2_ac = |i: usize| -> T { (0..s).map(|j| *a.get(i, j) * c.get(j).powi(2) * a_c(j)).sum() };
        let a_c_ac2 = |i: usize| -> T { (0..s).map(|j| *a.get(i, j) * *c.get(j) * a_c2(j)).sum() };
        let a_ac_ac = |i: usize| -> T { (0..s).map(|j| *a.get(i, j) * a_c(j).powi(2)).sum() };
        let a_c_aac = |i: usize| -> T { (0..s).map(|j| *a.get(i, j) * *c.get(j) * a_ac(j)).sum() };
        let a_a_c3 = |i: usize| -> T { (0..s).map(|j| *a.get(i, j) * a_c3(j)).sum() };
        let a_a_c_ac = |i: usize| -> T { (0..s).map(|j| *a.get(i, j) * a_c_ac(j)).sum() };
        let a_a_ac2 = |i: usize| -> T { (0..s).map(|j| *a.get(i, j) * a_ac2(j)).sum() };
        let a_aaac = |i: usize| -> T { (0..s).map(|j| *a.get(i, j) * a_aac(j)).sum() };

        let targets6: [T; 20] = [
            T::from_f64(1.0 / 30.0),
            T::from_f64(1.0 / 60.0),
            T::from_f64(1.0 / 90.0),
            T::from_f64(1.0 / 120.0),
            T::from_f64(1.0 / 180.0),
            T::from_f64(1.0 / 120.0),
            T::from_f64(1.0 / 240.0),
            T::from_f64(1.0 / 360.0),
            T::from_f64(1.0 / 720.0),
            T::from_f64(1.0 / 144.0),
            T::from_f64(1.0 / 72.0),
            T::from_f64(1.0 / 48.0),
            T::from_f64(1.0 / 24.0),
            T::from_f64(1.0 / 72.0),
            T::from_f64(1.0 / 36.0),
            T::from_f64(1.0 / 36.0),
            T::from_f64(1.0 / 18.0),
            T::from_f64(1.0 / 24.0),
            T::from_f64(1.0 / 12.0),
            T::from_f64(1.0 / 6.0),
        ];
        let values6: [T; 20] = [
            sum_b(&a_c4),
            sum_b(&a_c2_ac),
            sum_b(&a_c_ac2),
            sum_b(&a_ac_ac),
            sum_b(&a_c_aac),
            sum_b(&a_a_c3),
            sum_b(&a_a_c_ac),
            sum_b(&a_a_ac2),
            sum_b(&a_aaac),
            sum_b(&|i| a_aac(i) * *c.get(i)),
            sum_b(&|i| a_ac2(i) * *c.get(i)),
            sum_b(&|i| a_c_ac(i) * *c.get(i)),
            sum_b(&|i| a_c3(i) * *c.get(i)),
            sum_b(&|i| a_ac(i) * a_c(i)),
            sum_b(&|i| a_ac(i) * c.get(i).powi(2)),
            sum_b(&|i| a_c(i) * a_c2(i)),
            sum_b(&|i| a_c2(i) * c.get(i).powi(2)),
            sum_b(&|i| a_c(i).powi(2) * *c.get(i)),
            sum_b(&|i| a_c(i) * c.get(i).powi(3)),
            sum_b(&|i| c.get(i).powi(5)),
        ];
        for (v, target) in values6.iter().zip(targets6.iter())
        {
            if (*v - *target).abs() > tau
            {
                return false;
            }
        }

        return true;
    }
}
