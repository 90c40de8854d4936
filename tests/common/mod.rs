use rkdae::algebra::linear::{Matrix, Vector};
use rkdae::ode::{RkType, Tableau};

pub fn compare_epsilon(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() <= epsilon
}

/// Classical 4th-order explicit Runge-Kutta.
pub fn rk4_tableau() -> Tableau<f64> {
    Tableau {
        name: "RK4".to_string(),
        rk_type: RkType::Erk,
        stages: 4,
        order: 4,
        embedded_order: None,
        a: Matrix::new(
            4,
            4,
            vec![
                0.0, 0.5, 0.0, 0.0, //
                0.0, 0.0, 0.5, 0.0, //
                0.0, 0.0, 0.0, 1.0, //
                0.0, 0.0, 0.0, 0.0,
            ],
        ),
        b: Vector::new(vec![1.0 / 6.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 6.0]),
        b_hat: None,
        c: Vector::new(vec![0.0, 0.5, 0.5, 1.0]),
    }
}

/// Implicit (backward) Euler: a single-stage DIRK method, order 1.
pub fn implicit_euler_tableau() -> Tableau<f64> {
    Tableau {
        name: "ImplicitEuler".to_string(),
        rk_type: RkType::Dirk,
        stages: 1,
        order: 1,
        embedded_order: None,
        a: Matrix::new(1, 1, vec![1.0]),
        b: Vector::new(vec![1.0]),
        b_hat: None,
        c: Vector::new(vec![1.0]),
    }
}

/// 2-stage Gauss-Legendre collocation method, order 4, fully implicit and
/// symplectic (exact energy conservation up to Newton tolerance).
pub fn gauss_legendre4_tableau() -> Tableau<f64> {
    let sqrt3 = 3.0f64.sqrt();
    Tableau {
        name: "GaussLegendre4".to_string(),
        rk_type: RkType::Irk,
        stages: 2,
        order: 4,
        embedded_order: None,
        a: Matrix::new(
            2,
            2,
            vec![
                0.25,
                0.25 + sqrt3 / 6.0, //
                0.25 - sqrt3 / 6.0,
                0.25,
            ],
        ),
        b: Vector::new(vec![0.5, 0.5]),
        b_hat: None,
        c: Vector::new(vec![0.5 - sqrt3 / 6.0, 0.5 + sqrt3 / 6.0]),
    }
}

/// Bogacki-Shampine embedded 3(2) pair: a small embedded ERK tableau used to
/// exercise the step controller and adaptive driver without the bulk of a
/// higher-order embedded method.
pub fn bogacki_shampine_tableau() -> Tableau<f64> {
    Tableau {
        name: "BogackiShampine32".to_string(),
        rk_type: RkType::Erk,
        stages: 4,
        order: 3,
        embedded_order: Some(2),
        a: Matrix::new(
            4,
            4,
            vec![
                0.0, 0.5, 0.0, 2.0 / 9.0, //
                0.0, 0.0, 0.75, 1.0 / 3.0, //
                0.0, 0.0, 0.0, 4.0 / 9.0, //
                0.0, 0.0, 0.0, 0.0,
            ],
        ),
        b: Vector::new(vec![2.0 / 9.0, 1.0 / 3.0, 4.0 / 9.0, 0.0]),
        b_hat: Some(Vector::new(vec![7.0 / 24.0, 0.25, 1.0 / 3.0, 0.125])),
        c: Vector::new(vec![0.0, 0.5, 0.75, 1.0]),
    }
}

/// Fehlberg's 6-stage embedded 4(5) pair (RKF45): the primary weights are
/// 4th order, the embedded weights 5th, used here as-is-named rather than
/// "5(4)" since the propagated solution is the 4th-order one.
pub fn fehlberg45_tableau() -> Tableau<f64> {
    Tableau {
        name: "Fehlberg45".to_string(),
        rk_type: RkType::Erk,
        stages: 6,
        order: 4,
        embedded_order: Some(5),
        a: Matrix::new(
            6,
            6,
            vec![
                0.0, 1.0 / 4.0, 3.0 / 32.0, 1932.0 / 2197.0, 439.0 / 216.0, -8.0 / 27.0, //
                0.0, 0.0, 9.0 / 32.0, -7200.0 / 2197.0, -8.0, 2.0, //
                0.0, 0.0, 0.0, 7296.0 / 2197.0, 3680.0 / 513.0, -3544.0 / 2565.0, //
                0.0, 0.0, 0.0, 0.0, -845.0 / 4104.0, 1859.0 / 4104.0, //
                0.0, 0.0, 0.0, 0.0, 0.0, -11.0 / 40.0, //
                0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
            ],
        ),
        b: Vector::new(vec![25.0 / 216.0, 0.0, 1408.0 / 2565.0, 2197.0 / 4104.0, -1.0 / 5.0, 0.0]),
        b_hat: Some(Vector::new(vec![
            16.0 / 135.0,
            0.0,
            6656.0 / 12825.0,
            28561.0 / 56430.0,
            -9.0 / 50.0,
            2.0 / 55.0,
        ])),
        c: Vector::new(vec![0.0, 1.0 / 4.0, 3.0 / 8.0, 12.0 / 13.0, 1.0, 1.0 / 2.0]),
    }
}

/// 3-stage Gauss-Legendre collocation method, order 6, fully implicit and
/// symplectic; the smallest standard tableau that exercises the complete
/// order-6 rooted-tree condition ladder.
pub fn gauss_legendre6_tableau() -> Tableau<f64> {
    let sqrt15 = 15.0f64.sqrt();
    Tableau {
        name: "GaussLegendre6".to_string(),
        rk_type: RkType::Irk,
        stages: 3,
        order: 6,
        embedded_order: None,
        a: Matrix::new(
            3,
            3,
            vec![
                5.0 / 36.0,
                5.0 / 36.0 + sqrt15 / 24.0, //
                5.0 / 36.0 + sqrt15 / 30.0,
                2.0 / 9.0 - sqrt15 / 15.0,
                2.0 / 9.0, //
                2.0 / 9.0 + sqrt15 / 15.0,
                5.0 / 36.0 - sqrt15 / 30.0,
                5.0 / 36.0 - sqrt15 / 24.0, //
                5.0 / 36.0,
            ],
        ),
        b: Vector::new(vec![5.0 / 18.0, 4.0 / 9.0, 5.0 / 18.0]),
        b_hat: None,
        c: Vector::new(vec![0.5 - sqrt15 / 10.0, 0.5, 0.5 + sqrt15 / 10.0]),
    }
}
