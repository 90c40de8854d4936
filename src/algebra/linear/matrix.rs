use crate::algebra::abstr::Real;
use crate::algebra::linear::Vector;
use std::ops::{Add, Index, IndexMut, Mul, Sub};

/// Dense, column-major matrix.
///
/// # Example
///
/// ```
/// use rkdae::algebra::linear::Matrix;
///
/// let a: Matrix<f64> = Matrix::new(2, 2, vec![1.0, 0.0, 3.0, -7.0]);
/// assert_eq!((2, 2), a.dim());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T>
{
    m: usize,
    n: usize,
    data: Vec<T>,
}

impl<T> Matrix<T>
where
    T: Real,
{
    pub fn new(m: usize, n: usize, data: Vec<T>) -> Matrix<T>
    {
        assert_eq!(m * n, data.len());
        return Matrix { m, n, data };
    }

    pub fn zero(m: usize, n: usize) -> Matrix<T>
    {
        return Matrix { m, n, data: vec![T::zero(); m * n] };
    }

    pub fn identity(n: usize) -> Matrix<T>
    {
        let mut mat = Matrix::zero(n, n);
        for i in 0..n
        {
            *mat.get_mut(i, i) = T::one();
        }
        return mat;
    }

    pub fn dim(self: &Self) -> (usize, usize)
    {
        return (self.m, self.n);
    }

    pub fn nrow(self: &Self) -> usize
    {
        return self.m;
    }

    pub fn ncol(self: &Self) -> usize
    {
        return self.n;
    }

    pub fn get(self: &Self, i: usize, j: usize) -> &T
    {
        assert!(i < self.m && j < self.n);
        return &self.data[j * self.m + i];
    }

    pub fn get_mut(self: &mut Self, i: usize, j: usize) -> &mut T
    {
        assert!(i < self.m && j < self.n);
        return &mut self.data[j * self.m + i];
    }

    pub fn column(self: &Self, j: usize) -> Vector<T>
    {
        return Vector::new((0..self.m).map(|i| *self.get(i, j)).collect());
    }

    pub fn set_column(self: &mut Self, j: usize, v: &Vector<T>)
    {
        assert_eq!(self.m, v.dim());
        for i in 0..self.m
        {
            *self.get_mut(i, j) = *v.get(i);
        }
    }

    pub fn row(self: &Self, i: usize) -> Vector<T>
    {
        return Vector::new((0..self.n).map(|j| *self.get(i, j)).collect());
    }

    pub fn transpose(self: &Self) -> Matrix<T>
    {
        let mut out = Matrix::zero(self.n, self.m);
        for i in 0..self.m
        {
            for j in 0..self.n
            {
                *out.get_mut(j, i) = *self.get(i, j);
            }
        }
        return out;
    }

    /// Assembles a matrix from a 2x2 grid of blocks, used for the KKT
    /// saddle-point system of the projector.
    pub fn from_blocks(a11: &Matrix<T>, a12: &Matrix<T>, a21: &Matrix<T>, a22: &Matrix<T>) -> Matrix<T>
    {
        let n = a11.m;
        let m = a22.m;
        assert_eq!(a11.n, n);
        assert_eq!(a12.dim(), (n, m));
        assert_eq!(a21.dim(), (m, n));
        assert_eq!(a22.dim(), (m, m));

        let mut out = Matrix::zero(n + m, n + m);
        for i in 0..n
        {
            for j in 0..n
            {
                *out.get_mut(i, j) = *a11.get(i, j);
            }
            for j in 0..m
            {
                *out.get_mut(i, n + j) = *a12.get(i, j);
            }
        }
        for i in 0..m
        {
            for j in 0..n
            {
                *out.get_mut(n + i, j) = *a21.get(i, j);
            }
            for j in 0..m
            {
                *out.get_mut(n + i, n + j) = *a22.get(i, j);
            }
        }
        return out;
    }

    pub fn is_finite(self: &Self) -> bool
    {
        return self.data.iter().all(|x| x.is_finite());
    }
}

impl<T> Index<[usize; 2]> for Matrix<T>
{
    type Output = T;

    fn index(self: &Self, index: [usize; 2]) -> &Self::Output
    {
        return &self.data[index[1] * self.m + index[0]];
    }
}

impl<T> IndexMut<[usize; 2]> for Matrix<T>
{
    fn index_mut(self: &mut Self, index: [usize; 2]) -> &mut Self::Output
    {
        return &mut self.data[index[1] * self.m + index[0]];
    }
}

impl<'a, 'b, T> Add<&'b Matrix<T>> for &'a Matrix<T>
where
    T: Real,
{
    type Output = Matrix<T>;

    fn add(self: Self, rhs: &'b Matrix<T>) -> Matrix<T>
    {
        assert_eq!(self.dim(), rhs.dim());
        return Matrix { m: self.m, n: self.n, data: self.data.iter().zip(rhs.data.iter()).map(|(a, b)| *a + *b).collect() };
    }
}

impl<'a, 'b, T> Sub<&'b Matrix<T>> for &'a Matrix<T>
where
    T: Real,
{
    type Output = Matrix<T>;

    fn sub(self: Self, rhs: &'b Matrix<T>) -> Matrix<T>
    {
        assert_eq!(self.dim(), rhs.dim());
        return Matrix { m: self.m, n: self.n, data: self.data.iter().zip(rhs.data.iter()).map(|(a, b)| *a - *b).collect() };
    }
}

impl<'a, 'b, T> Mul<&'b Matrix<T>> for &'a Matrix<T>
where
    T: Real,
{
    type Output = Matrix<T>;

    /// Multiplies two matrices.
    ///
    /// # Example
    ///
    /// ```
    /// use rkdae::algebra::linear::Matrix;
    ///
    /// let a: Matrix<f64> = Matrix::new(2, 2, vec![1.0, 0.0, 3.0, -7.0]);
    /// let b: Matrix<f64> = Matrix::new(2, 2, vec![1.0, 0.0, 3.0, -7.0]);
    /// let c = &a * &b;
    /// assert_eq!(&1.0, c.get(0, 0));
    /// ```
    fn mul(self: Self, rhs: &'b Matrix<T>) -> Matrix<T>
    {
        assert_eq!(self.n, rhs.m);
        let mut out = Matrix::zero(self.m, rhs.n);
        for i in 0..self.m
        {
            for j in 0..rhs.n
            {
                let mut sum = T::zero();
                for k in 0..self.n
                {
                    sum += *self.get(i, k) * *rhs.get(k, j);
                }
                *out.get_mut(i, j) = sum;
            }
        }
        return out;
    }
}

impl<'a, 'b, T> Mul<&'b Vector<T>> for &'a Matrix<T>
where
    T: Real,
{
    type Output = Vector<T>;

    fn mul(self: Self, rhs: &'b Vector<T>) -> Vector<T>
    {
        assert_eq!(self.n, rhs.dim());
        let mut out = Vector::zero(self.m);
        for i in 0..self.m
        {
            let mut sum = T::zero();
            for k in 0..self.n
            {
                sum += *self.get(i, k) * *rhs.get(k);
            }
            *out.get_mut(i) = sum;
        }
        return out;
    }
}

impl<T> Mul<T> for &Matrix<T>
where
    T: Real,
{
    type Output = Matrix<T>;

    fn mul(self: Self, rhs: T) -> Matrix<T>
    {
        return Matrix { m: self.m, n: self.n, data: self.data.iter().map(|x| *x * rhs).collect() };
    }
}

/// Dense LU decomposition with full (row and column) pivoting.
///
/// `p * a * q = l * u`, with `l` unit lower triangular and `u` upper
/// triangular. Column pivoting on top of the usual partial pivoting lets
/// `rank()` report a numerically sound rank for the singular systems that
/// show up in the root-finder and the manifold projector.
#[derive(Debug, Clone)]
pub struct LuDecomposition<T>
{
    lu: Matrix<T>,
    row_perm: Vec<usize>,
    col_perm: Vec<usize>,
    rank: usize,
    n: usize,
}

impl<T> LuDecomposition<T>
where
    T: Real,
{
    /// Factors a square matrix. The matrix need not be nonsingular; the
    /// resulting `rank()` tells the caller how far the elimination got
    /// before every remaining pivot candidate fell below `threshold`.
    pub fn decompose(a: &Matrix<T>) -> LuDecomposition<T>
    {
        assert_eq!(a.m, a.n, "LU decomposition requires a square matrix");
        let n = a.m;
        let mut lu = a.clone();
        let mut row_perm: Vec<usize> = (0..n).collect();
        let mut col_perm: Vec<usize> = (0..n).collect();
        let threshold = T::from_f64(1e3) * T::epsilon();
        let mut rank = n;

        for k in 0..n
        {
            // Find the largest-magnitude entry in the trailing submatrix.
            let mut pivot_val = T::zero();
            let mut pivot_row = k;
            let mut pivot_col = k;
            for i in k..n
            {
                for j in k..n
                {
                    let v = lu.get(i, j).abs();
                    if v > pivot_val
                    {
                        pivot_val = v;
                        pivot_row = i;
                        pivot_col = j;
                    }
                }
            }

            if pivot_val <= threshold
            {
                rank = k;
                break;
            }

            if pivot_row != k
            {
                for j in 0..n
                {
                    let tmp = *lu.get(k, j);
                    *lu.get_mut(k, j) = *lu.get(pivot_row, j);
                    *lu.get_mut(pivot_row, j) = tmp;
                }
                row_perm.swap(k, pivot_row);
            }
            if pivot_col != k
            {
                for i in 0..n
                {
                    let tmp = *lu.get(i, k);
                    *lu.get_mut(i, k) = *lu.get(i, pivot_col);
                    *lu.get_mut(i, pivot_col) = tmp;
                }
                col_perm.swap(k, pivot_col);
            }

            let pivot = *lu.get(k, k);
            for i in (k + 1)..n
            {
                let factor = *lu.get(i, k) / pivot;
                *lu.get_mut(i, k) = factor;
                for j in (k + 1)..n
                {
                    let delta = factor * *lu.get(k, j);
                    let v = *lu.get(i, j) - delta;
                    *lu.get_mut(i, j) = v;
                }
            }
        }

        return LuDecomposition { lu, row_perm, col_perm, rank, n };
    }

    /// Rank estimated from the elimination, i.e. the number of pivots that
    /// cleared the singularity threshold.
    pub fn rank(self: &Self) -> usize
    {
        return self.rank;
    }

    pub fn is_singular(self: &Self) -> bool
    {
        return self.rank < self.n;
    }

    /// Solves `a x = b`. Only valid when `rank() == n`; callers are expected
    /// to check `is_singular()` first and report their own domain-specific
    /// singularity error otherwise.
    pub fn solve(self: &Self, b: &Vector<T>) -> Vector<T>
    {
        assert!(!self.is_singular(), "attempted to solve a singular system");
        assert_eq!(b.dim(), self.n);

        let n = self.n;
        let mut y = Vector::zero(n);
        for i in 0..n
        {
            let mut sum = *b.get(self.row_perm[i]);
            for j in 0..i
            {
                sum -= *self.lu.get(i, j) * *y.get(j);
            }
            *y.get_mut(i) = sum;
        }

        let mut z = Vector::zero(n);
        for i in (0..n).rev()
        {
            let mut sum = *y.get(i);
            for j in (i + 1)..n
            {
                sum -= *self.lu.get(i, j) * *z.get(j);
            }
            *z.get_mut(i) = sum / *self.lu.get(i, i);
        }

        let mut x = Vector::zero(n);
        for i in 0..n
        {
            *x.get_mut(self.col_perm[i]) = *z.get(i);
        }
        return x;
    }
}
