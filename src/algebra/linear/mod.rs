//! Dense linear algebra
//!
//! A small hand-rolled `Matrix`/`Vector` pair, grown from the teacher's
//! `algebra::linear` subtree and trimmed to the operations the Runge-Kutta
//! engine actually needs: arithmetic, norms, and a dense LU decomposition
//! with full pivoting (the spec's `LinearSolver` component).

pub mod matrix;
pub mod vector;

pub use self::matrix::Matrix;
pub use self::vector::Vector;
