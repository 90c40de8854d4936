//! End-to-end integration scenarios, one mesh/system/method per test rather
//! than unit-level kernel checks (those live in `stage.rs`/`advance.rs`).

use crate::common::{
    bogacki_shampine_tableau, compare_epsilon, fehlberg45_tableau, gauss_legendre4_tableau,
    implicit_euler_tableau, rk4_tableau,
};
use crate::ode::system::rotation_on_circle;
use rkdae::algebra::linear::{Matrix, Vector};
use rkdae::ode::advance::advance;
use rkdae::ode::{Configuration, Explicit, Integrator, RkType, Solution, Tableau};
use std::cell::RefCell;
use std::rc::Rc;

fn uniform_mesh(t0: f64, t1: f64, n_points: usize) -> Vec<f64> {
    (0..n_points).map(|i| t0 + (t1 - t0) * (i as f64) / ((n_points - 1) as f64)).collect()
}

/// Planar harmonic oscillator `x1' = x2, x2' = -x1`; exact solution is a
/// unit-speed rotation, energy `x1^2 + x2^2` is conserved exactly.
fn harmonic_oscillator(
) -> Explicit<f64, impl Fn(&Vector<f64>, f64) -> Vector<f64>, impl Fn(&Vector<f64>, f64) -> Matrix<f64>> {
    Explicit::new(
        2,
        |x: &Vector<f64>, _t: f64| Vector::new(vec![*x.get(1), -*x.get(0)]),
        |_x: &Vector<f64>, _t: f64| Matrix::new(2, 2, vec![0.0, -1.0, 1.0, 0.0]),
    )
}

/// Same dynamics as [`harmonic_oscillator`], with its energy attached as a
/// scalar invariant so the projector has something to pull back onto.
fn harmonic_oscillator_with_energy(
) -> Explicit<f64, impl Fn(&Vector<f64>, f64) -> Vector<f64>, impl Fn(&Vector<f64>, f64) -> Matrix<f64>> {
    harmonic_oscillator().with_invariant(
        |x: &Vector<f64>, _t: f64| Vector::new(vec![x.get(0).powi(2) + x.get(1).powi(2) - 1.0]),
        |x: &Vector<f64>, _t: f64| Matrix::new(1, 2, vec![2.0 * x.get(0), 2.0 * x.get(1)]),
        1,
    )
}

fn energy(x: &Vector<f64>) -> f64 {
    x.get(0).powi(2) + x.get(1).powi(2)
}

// --- P3: order-1 consistency with a constant field --------------------------
//
// With `f` constant (independent of x and t), every stage's slope equals
// `c` regardless of the tableau, so `x_new = x + h * c * sum(b_i) = x + h*c`
// exactly, for any consistent tableau (`sum(b_i) == 1`) regardless of its
// order.
#[test]
fn constant_field_integrates_exactly_regardless_of_tableau_order() {
    let sys = Explicit::new(
        1,
        |_x: &Vector<f64>, _t: f64| Vector::new(vec![3.0]),
        |_x: &Vector<f64>, _t: f64| Matrix::new(1, 1, vec![0.0]),
    );
    let config: Configuration<f64> = Configuration::new();
    let x0 = Vector::new(vec![2.0]);

    for tableau in [rk4_tableau(), implicit_euler_tableau(), gauss_legendre4_tableau()] {
        let outcome = advance(&sys, &tableau, &x0, 0.0, 0.1, &config).expect("step should succeed");
        assert!(compare_epsilon(*outcome.x_new.get(0), 2.3, 1.0e-10));
    }
}

// --- P4: an embedded pair with b == b_hat reports no truncation error -------
#[test]
fn embedded_pair_with_equal_weights_reports_zero_truncation_and_clamps_to_safety_max() {
    let mut tableau = bogacki_shampine_tableau();
    tableau.b_hat = Some(tableau.b.clone());

    let sys = Explicit::new(
        1,
        |x: &Vector<f64>, _t: f64| Vector::new(vec![-*x.get(0)]),
        |_x: &Vector<f64>, _t: f64| Matrix::new(1, 1, vec![-1.0]),
    );
    let mut config: Configuration<f64> = Configuration::new();
    config.adaptive = true;
    let x0 = Vector::new(vec![1.0]);
    let h = 0.1;

    let outcome = advance(&sys, &tableau, &x0, 0.0, h, &config).expect("step should succeed");

    let h_suggested = outcome.h_suggested.expect("embedded tableau should suggest a next step");
    assert!(compare_epsilon(h_suggested, h * config.safety_max, 1.0e-12));
}

// --- P7: advance is a pure function of its inputs ---------------------------
//
// Calling `advance` twice with identical arguments must produce identical
// output: neither the substepping retry state machine nor the embedded
// controller may leak state across calls.
#[test]
fn advance_is_idempotent_given_identical_inputs() {
    let sys = harmonic_oscillator();
    let tableau = rk4_tableau();
    let config: Configuration<f64> = Configuration::new();
    let x0 = Vector::new(vec![1.0, 0.0]);

    let first = advance(&sys, &tableau, &x0, 0.0, 0.05, &config).expect("first step should succeed");
    let second = advance(&sys, &tableau, &x0, 0.0, 0.05, &config).expect("second step should succeed");

    assert!(compare_epsilon(*first.x_new.get(0), *second.x_new.get(0), 0.0));
    assert!(compare_epsilon(*first.x_new.get(1), *second.x_new.get(1), 0.0));
}

// --- Scenario 1: RK4 on the unit rotation, order estimation by halving -----
#[test]
fn rk4_on_sin_cos_field_converges_at_fourth_order() {
    let sys = rotation_on_circle();
    let tableau = rk4_tableau();
    let config: Configuration<f64> = Configuration::new();
    let integrator = Integrator::new(&sys, &tableau, config);

    let exact = |t: f64| Vector::new(vec![t.cos(), t.sin()]);
    let t_end = 1.0;

    let error_at = |n_steps: usize| -> f64 {
        let mesh = uniform_mesh(0.0, t_end, n_steps + 1);
        let x0 = Vector::new(vec![1.0, 0.0]);
        let mut sol: Solution<f64> = Solution::new(2, 0);
        integrator.solve(&mesh, &x0, &mut sol).expect("solve should succeed");
        let got = sol.x_at(sol.size() - 1);
        let want = exact(t_end);
        ((*got.get(0) - *want.get(0)).powi(2) + (*got.get(1) - *want.get(1)).powi(2)).sqrt()
    };

    let e_coarse = error_at(20);
    let e_fine = error_at(40);

    // A 4th-order method halves its step and should cut global error by
    // roughly 2^4 = 16; allow generous slack either side of the asymptotic
    // ratio since 20 steps is not deep into the asymptotic regime.
    let ratio = e_coarse / e_fine;
    assert!(ratio > 8.0 && ratio < 32.0, "order-4 convergence ratio out of range: {}", ratio);
}

// --- Scenario 2: Gauss-Legendre4 conserves energy on the oscillator --------
#[test]
fn gauss_legendre4_conserves_energy_on_the_oscillator_over_many_periods() {
    let sys = harmonic_oscillator();
    let tableau = gauss_legendre4_tableau();
    let mut config: Configuration<f64> = Configuration::new();
    // Gauss-Legendre collocation is symplectic and conserves a linear
    // oscillator's energy exactly up to Newton's inner tolerance; tighten it
    // well below the `1e-8` bound checked below.
    config.abs_tol = 1.0e-12;
    let integrator = Integrator::new(&sys, &tableau, config);

    let x0 = Vector::new(vec![1.0, 0.0]);
    let e0 = energy(&x0);

    // ~8 periods at h = 0.1.
    let mesh = uniform_mesh(0.0, 50.0, 501);
    let mut sol: Solution<f64> = Solution::new(2, 0);
    integrator.solve(&mesh, &x0, &mut sol).expect("solve should succeed");

    for k in 0..sol.size() {
        let e_k = energy(&sol.x_at(k));
        assert!((e_k - e0).abs() < 1.0e-8, "energy drift too large at step {}: {}", k, e_k - e0);
    }
}

// --- Scenario 3: RK4 + projection keeps the oscillator on its energy shell -
#[test]
fn rk4_with_projection_stays_on_the_invariant_manifold() {
    let sys = harmonic_oscillator_with_energy();
    let tableau = rk4_tableau();
    let mut config: Configuration<f64> = Configuration::new();
    config.projection = true;
    let integrator = Integrator::new(&sys, &tableau, config);

    let x0 = Vector::new(vec![1.0, 0.0]);
    let mesh = uniform_mesh(0.0, 20.0, 201);
    let mut sol: Solution<f64> = Solution::new(2, 1);
    integrator.solve(&mesh, &x0, &mut sol).expect("solve should succeed");

    for k in 0..sol.size() {
        assert!(sol.h_at(k).get(0).abs() < 1.0e-8, "invariant drifted at step {}: {}", k, sol.h_at(k).get(0));
    }
}

// --- Scenario 4: implicit Euler dissipates energy monotonically -----------
#[test]
fn implicit_euler_dissipates_oscillator_energy_monotonically() {
    let sys = harmonic_oscillator();
    let tableau = implicit_euler_tableau();
    let mut config: Configuration<f64> = Configuration::new();
    // Tighten Newton's inner tolerance (driven off `abs_tol`) well below the
    // per-step energy contraction so the monotonicity check isn't swamped by
    // Newton residual noise.
    config.abs_tol = 1.0e-10;

    let energies: Rc<RefCell<Vec<f64>>> = Rc::new(RefCell::new(Vec::new()));
    let energies_cb = Rc::clone(&energies);
    config.set_step_callback(move |_k, x, _t| energies_cb.borrow_mut().push(energy(x)));

    let integrator = Integrator::new(&sys, &tableau, config);
    let x0 = Vector::new(vec![1.0, 0.0]);
    let mesh = uniform_mesh(0.0, 10.0, 201);
    let mut sol: Solution<f64> = Solution::new(2, 0);
    integrator.solve(&mesh, &x0, &mut sol).expect("solve should succeed");

    let energies = energies.borrow();
    assert_eq!(energies.len(), sol.size());
    for pair in energies.windows(2) {
        assert!(pair[1] <= pair[0] + 1.0e-8, "energy increased between consecutive steps: {} -> {}", pair[0], pair[1]);
    }
    assert!(*energies.last().unwrap() < *energies.first().unwrap());
}

// --- Scenario 5: Fehlberg 4(5) adaptive step over one period ----------------
#[test]
fn fehlberg45_adaptive_tracks_one_period_of_the_oscillator() {
    let sys = harmonic_oscillator();
    let tableau = fehlberg45_tableau();
    let mut config: Configuration<f64> = Configuration::new();
    config.adaptive = true;
    // Tighten below the default so the endpoint check has headroom over the
    // controller's own per-step tolerance rather than riding right against it.
    config.abs_tol = 1.0e-9;
    config.rel_tol = 1.0e-7;
    let integrator = Integrator::new(&sys, &tableau, config);

    let period = std::f64::consts::TAU;
    let mesh = uniform_mesh(0.0, period, 21);
    let x0 = Vector::new(vec![1.0, 0.0]);
    let mut sol: Solution<f64> = Solution::new(2, 0);
    integrator.adaptive_solve(&mesh, &x0, &mut sol).expect("adaptive solve should succeed");

    assert!(sol.size() >= 2);
    assert!(sol.size() <= sol.capacity());
    assert!(compare_epsilon(sol.t_at(sol.size() - 1), period, 1.0e-6));

    let got = sol.x_at(sol.size() - 1);
    assert!(compare_epsilon(*got.get(0), 1.0, 1.0e-4));
    assert!(compare_epsilon(*got.get(1), 0.0, 1.0e-4));
}

// --- Scenario 6: figure-eight three-body orbit, explicit RK4 ---------------
//
// Chenciner-Montgomery figure-eight choreography: three equal unit masses,
// `G = 1`, period `T ~= 6.32591398`. State is laid out as three position
// pairs followed by three velocity pairs.
fn figure_eight() -> Explicit<f64, impl Fn(&Vector<f64>, f64) -> Vector<f64>, impl Fn(&Vector<f64>, f64) -> Matrix<f64>> {
    Explicit::new(
        12,
        |x: &Vector<f64>, _t: f64| {
            let p = |b: usize| (*x.get(2 * b), *x.get(2 * b + 1));
            let positions = [p(0), p(1), p(2)];
            let mut acc = [(0.0f64, 0.0f64); 3];
            for i in 0..3 {
                for j in 0..3 {
                    if i == j {
                        continue;
                    }
                    let dx = positions[j].0 - positions[i].0;
                    let dy = positions[j].1 - positions[i].1;
                    let r2 = dx * dx + dy * dy;
                    let r3 = r2 * r2.sqrt();
                    acc[i].0 += dx / r3;
                    acc[i].1 += dy / r3;
                }
            }
            let mut out = vec![0.0; 12];
            for b in 0..3 {
                out[2 * b] = *x.get(6 + 2 * b);
                out[2 * b + 1] = *x.get(6 + 2 * b + 1);
                out[6 + 2 * b] = acc[b].0;
                out[6 + 2 * b + 1] = acc[b].1;
            }
            Vector::new(out)
        },
        // ERK on a `Kind::Explicit` system never consults `jf_x` (no Newton
        // solve is involved), so this Jacobian is never evaluated.
        |_x: &Vector<f64>, _t: f64| Matrix::zero(12, 12),
    )
}

#[test]
fn rk4_tracks_the_figure_eight_three_body_orbit_back_to_its_start() {
    let sys = figure_eight();
    let tableau = rk4_tableau();
    let config: Configuration<f64> = Configuration::new();
    let integrator = Integrator::new(&sys, &tableau, config);

    let x0 = Vector::new(vec![
        0.97000436, -0.24308753, // body 1 position
        -0.97000436, 0.24308753, // body 2 position
        0.0, 0.0, // body 3 position
        0.466203685, 0.43236573, // body 1 velocity
        0.466203685, 0.43236573, // body 2 velocity
        -0.93240737, -0.86473146, // body 3 velocity
    ]);

    let period = 6.3259139454;
    let mesh = uniform_mesh(0.0, period, 6001);
    let mut sol: Solution<f64> = Solution::new(12, 0);
    integrator.solve(&mesh, &x0, &mut sol).expect("solve should succeed");

    let got = sol.x_at(sol.size() - 1);
    for i in 0..12 {
        assert!((*got.get(i) - *x0.get(i)).abs() < 5.0e-2, "component {} drifted too far from periodicity: {} vs {}", i, got.get(i), x0.get(i));
    }
}

#[test]
fn tableau_self_check_accepts_every_fixture() {
    let fixtures: Vec<(&str, Tableau<f64>)> = vec![
        ("rk4", rk4_tableau()),
        ("implicit_euler", implicit_euler_tableau()),
        ("gauss_legendre4", gauss_legendre4_tableau()),
        ("bogacki_shampine", bogacki_shampine_tableau()),
        ("fehlberg45", fehlberg45_tableau()),
    ];
    for (name, tableau) in fixtures {
        assert!(tableau.check(1.0e-9), "tableau {} failed self-check", name);
        match tableau.rk_type {
            RkType::Erk => assert!(tableau.stages > 0),
            _ => {}
        }
    }
}
