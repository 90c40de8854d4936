use crate::algebra::abstr::Real;
use std::ops::{Add, AddAssign, Index, IndexMut, Mul, Neg, Sub, SubAssign};

/// Dense column vector.
///
/// # Example
///
/// ```
/// use rkdae::algebra::linear::Vector;
///
/// let a: Vector<f64> = Vector::new(vec![1.0, 2.0, 3.0]);
/// assert_eq!(3, a.dim());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Vector<T>
{
    data: Vec<T>,
}

impl<T> Vector<T>
where
    T: Real,
{
    pub fn new(data: Vec<T>) -> Vector<T>
    {
        return Vector { data };
    }

    pub fn zero(n: usize) -> Vector<T>
    {
        return Vector { data: vec![T::zero(); n] };
    }

    pub fn dim(self: &Self) -> usize
    {
        return self.data.len();
    }

    pub fn get(self: &Self, i: usize) -> &T
    {
        return &self.data[i];
    }

    pub fn get_mut(self: &mut Self, i: usize) -> &mut T
    {
        return &mut self.data[i];
    }

    pub fn as_slice(self: &Self) -> &[T]
    {
        return &self.data;
    }

    pub fn dotp(self: &Self, other: &Vector<T>) -> T
    {
        assert_eq!(self.dim(), other.dim());
        return self.data.iter().zip(other.data.iter()).map(|(a, b)| *a * *b).sum();
    }

    /// Componentwise absolute value.
    pub fn abs(self: &Self) -> Vector<T>
    {
        return Vector { data: self.data.iter().map(|x| x.abs()).collect() };
    }

    /// Infinity norm `max_i |x_i|`.
    pub fn norm_inf(self: &Self) -> T
    {
        return self.data.iter().fold(T::zero(), |acc, x| acc.max(x.abs()));
    }

    /// Euclidean norm.
    pub fn norm2(self: &Self) -> T
    {
        return self.dotp(self).sqrt();
    }

    pub fn max_component(self: &Self) -> T
    {
        return self.data.iter().fold(self.data[0], |acc, x| acc.max(*x));
    }

    pub fn is_finite(self: &Self) -> bool
    {
        return self.data.iter().all(|x| x.is_finite());
    }

    pub fn apply<F: Fn(&T) -> T>(self: &Self, f: F) -> Vector<T>
    {
        return Vector { data: self.data.iter().map(|x| f(x)).collect() };
    }

    /// Builds a vector by gathering a subset of indices, preserving order.
    pub fn select(self: &Self, indices: &[usize]) -> Vector<T>
    {
        return Vector { data: indices.iter().map(|&i| self.data[i]).collect() };
    }

    /// Scatters `self` into `target` at the given indices (inverse of `select`).
    pub fn scatter_into(self: &Self, target: &mut Vector<T>, indices: &[usize])
    {
        for (k, &i) in indices.iter().enumerate()
        {
            target.data[i] = self.data[k];
        }
    }
}

impl<T> Index<usize> for Vector<T>
{
    type Output = T;

    fn index(self: &Self, index: usize) -> &Self::Output
    {
        return &self.data[index];
    }
}

impl<T> IndexMut<usize> for Vector<T>
{
    fn index_mut(self: &mut Self, index: usize) -> &mut Self::Output
    {
        return &mut self.data[index];
    }
}

impl<'a, 'b, T> Add<&'b Vector<T>> for &'a Vector<T>
where
    T: Real,
{
    type Output = Vector<T>;

    fn add(self: Self, rhs: &'b Vector<T>) -> Vector<T>
    {
        assert_eq!(self.dim(), rhs.dim());
        return Vector { data: self.data.iter().zip(rhs.data.iter()).map(|(a, b)| *a + *b).collect() };
    }
}

impl<T> Add<Vector<T>> for Vector<T>
where
    T: Real,
{
    type Output = Vector<T>;

    fn add(self: Self, rhs: Vector<T>) -> Vector<T>
    {
        return &self + &rhs;
    }
}

impl<'a, 'b, T> Sub<&'b Vector<T>> for &'a Vector<T>
where
    T: Real,
{
    type Output = Vector<T>;

    fn sub(self: Self, rhs: &'b Vector<T>) -> Vector<T>
    {
        assert_eq!(self.dim(), rhs.dim());
        return Vector { data: self.data.iter().zip(rhs.data.iter()).map(|(a, b)| *a - *b).collect() };
    }
}

impl<T> Sub<Vector<T>> for Vector<T>
where
    T: Real,
{
    type Output = Vector<T>;

    fn sub(self: Self, rhs: Vector<T>) -> Vector<T>
    {
        return &self - &rhs;
    }
}

impl<T> AddAssign<&Vector<T>> for Vector<T>
where
    T: Real,
{
    fn add_assign(self: &mut Self, rhs: &Vector<T>)
    {
        self.data.iter_mut().zip(rhs.data.iter()).for_each(|(a, b)| *a += *b);
    }
}

impl<T> SubAssign<&Vector<T>> for Vector<T>
where
    T: Real,
{
    fn sub_assign(self: &mut Self, rhs: &Vector<T>)
    {
        self.data.iter_mut().zip(rhs.data.iter()).for_each(|(a, b)| *a -= *b);
    }
}

impl<T> Neg for Vector<T>
where
    T: Real,
{
    type Output = Vector<T>;

    fn neg(self: Self) -> Vector<T>
    {
        return Vector { data: self.data.iter().map(|x| -*x).collect() };
    }
}

impl<'a, T> Mul<T> for &'a Vector<T>
where
    T: Real,
{
    type Output = Vector<T>;

    fn mul(self: Self, rhs: T) -> Vector<T>
    {
        return Vector { data: self.data.iter().map(|x| *x * rhs).collect() };
    }
}

impl<T> Mul<T> for Vector<T>
where
    T: Real,
{
    type Output = Vector<T>;

    fn mul(self: Self, rhs: T) -> Vector<T>
    {
        return &self * rhs;
    }
}
