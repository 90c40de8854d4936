use crate::common::compare_epsilon;
use rkdae::algebra::linear::Vector;

#[test]
fn add_owner() {
    let a: Vector<f64> = Vector::new(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    let b: Vector<f64> = Vector::new(vec![1.0, 4.0, -1.0, 0.0, -7.0]);
    let res_ref: Vector<f64> = Vector::new(vec![2.0, 6.0, 2.0, 4.0, -2.0]);

    let res: Vector<f64> = a + b;

    for i in 0..5 {
        assert!(compare_epsilon(*res.get(i), *res_ref.get(i), 1.0e-12));
    }
}

#[test]
fn add_borrow() {
    let a: Vector<f64> = Vector::new(vec![1.0, 2.0, 3.0]);
    let b: Vector<f64> = Vector::new(vec![1.0, 4.0, -1.0]);

    let res: Vector<f64> = &a + &b;

    assert!(compare_epsilon(*res.get(0), 2.0, 1.0e-12));
    assert!(compare_epsilon(*res.get(1), 6.0, 1.0e-12));
    assert!(compare_epsilon(*res.get(2), 2.0, 1.0e-12));
}

#[test]
fn add_assign() {
    let mut a: Vector<f64> = Vector::new(vec![1.0, -2.0, -3.0]);
    let b: Vector<f64> = Vector::new(vec![6.0, 3.0, 2.0]);

    a += &b;

    assert!(compare_epsilon(*a.get(0), 7.0, 1.0e-12));
    assert!(compare_epsilon(*a.get(1), 1.0, 1.0e-12));
    assert!(compare_epsilon(*a.get(2), -1.0, 1.0e-12));
}

#[test]
fn dotp() {
    let a: Vector<f64> = Vector::new(vec![1.0, 2.0, 3.0]);
    let b: Vector<f64> = Vector::new(vec![4.0, 5.0, 6.0]);

    assert!(compare_epsilon(a.dotp(&b), 32.0, 1.0e-12));
}

#[test]
fn norm_inf() {
    let a: Vector<f64> = Vector::new(vec![1.0, -7.0, 3.0]);
    assert!(compare_epsilon(a.norm_inf(), 7.0, 1.0e-12));
}

#[test]
fn select_and_scatter() {
    let a: Vector<f64> = Vector::new(vec![10.0, 20.0, 30.0, 40.0]);
    let selected = a.select(&[0, 2]);

    assert!(compare_epsilon(*selected.get(0), 10.0, 1.0e-12));
    assert!(compare_epsilon(*selected.get(1), 30.0, 1.0e-12));

    let mut target: Vector<f64> = Vector::zero(4);
    let delta: Vector<f64> = Vector::new(vec![1.0, 1.0]);
    delta.scatter_into(&mut target, &[0, 2]);

    assert!(compare_epsilon(*target.get(0), 1.0, 1.0e-12));
    assert!(compare_epsilon(*target.get(1), 0.0, 1.0e-12));
    assert!(compare_epsilon(*target.get(2), 1.0, 1.0e-12));
}
