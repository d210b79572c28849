use std::f64::consts::TAU;

use phaselock::core::phase::angular_distance;
use phaselock::sim::{DetectorParams, OscillatorId, OscillatorSet, Simulation, SimulationClock};
use rand::{Rng, SeedableRng};

fn sim_with(specs: &[(f64, f64)], coupling: f64, time_step: f64) -> Simulation {
    Simulation::new(
        OscillatorSet::new(specs.iter().copied()).unwrap(),
        SimulationClock::new(coupling, time_step).unwrap(),
        DetectorParams::default(),
    )
    .unwrap()
}

#[test]
fn phases_stay_in_range_for_random_networks() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let n = rng.random_range(1..8);
        let specs: Vec<(f64, f64)> = (0..n)
            .map(|_| (rng.random_range(-3.0..3.0), rng.random_range(-20.0..20.0)))
            .collect();
        let k = rng.random_range(0.0..2.0);
        let dt = rng.random_range(0.001..0.5);
        let mut sim = sim_with(&specs, k, dt);
        for _ in 0..200 {
            sim.tick().unwrap();
            for o in sim.oscillators().iter() {
                assert!(
                    (0.0..TAU).contains(&o.phase()),
                    "phase {} out of range",
                    o.phase()
                );
            }
        }
    }
}

#[test]
fn zero_coupling_advances_linearly() {
    let specs = [(1.0, 0.0), (0.5, 5.0), (0.25, 10.0)];
    let dt = 0.01;
    let ticks = 1234;
    let mut sim = sim_with(&specs, 0.0, dt);
    for _ in 0..ticks {
        sim.tick().unwrap();
    }
    for (i, &(freq, phase0)) in specs.iter().enumerate() {
        let expected = phase0 + freq * dt * ticks as f64;
        let got = sim.phase(OscillatorId(i as u32 + 1)).unwrap();
        assert!(
            angular_distance(got, expected) < 1e-9,
            "oscillator {}: got {got}, expected {expected}",
            i + 1
        );
    }
}

#[test]
fn single_oscillator_wraps_after_one_turn() {
    let mut sim = sim_with(&[(1.0, 0.0)], 0.0, 0.1);
    for _ in 0..62 {
        sim.tick().unwrap();
    }
    let p = sim.phase(OscillatorId(1)).unwrap();
    assert!(p.min(TAU - p) < 0.1, "phase {p}");

    sim.tick().unwrap();
    let p = sim.phase(OscillatorId(1)).unwrap();
    assert!(p < 0.1, "phase {p} did not wrap");
}

#[test]
fn equal_frequencies_converge() {
    let mut sim = sim_with(&[(1.0, 0.0), (1.0, 5.0), (1.0, 10.0)], 0.2, 0.01);
    for _ in 0..2000 {
        sim.tick().unwrap();
    }
    let phases = sim.oscillators().phases();
    for a in &phases {
        for b in &phases {
            assert!(angular_distance(*a, *b) < 0.01);
        }
    }
    assert!(sim.is_synchronized());
}

#[test]
fn reference_trio_phase_locks_under_strong_coupling() {
    let mut sim = Simulation::new(
        OscillatorSet::reference(),
        SimulationClock::new(1.0, 0.01).unwrap(),
        DetectorParams::default(),
    )
    .unwrap();
    for _ in 0..1000 {
        sim.tick().unwrap();
    }
    let before = sim.oscillators().phases();
    sim.tick().unwrap();
    let after = sim.oscillators().phases();
    let advances: Vec<f64> = before
        .iter()
        .zip(&after)
        .map(|(b, a)| (a - b).rem_euclid(TAU))
        .collect();
    for w in advances.windows(2) {
        assert!((w[0] - w[1]).abs() < 1e-6, "advances {advances:?}");
    }
}

#[test]
fn rejected_parameters_leave_the_run_unchanged() {
    let specs = [(1.0, 0.0), (0.5, 5.0)];
    let mut a = sim_with(&specs, 0.2, 0.01);
    let mut b = sim_with(&specs, 0.2, 0.01);
    assert!(b.set_coupling(-1.0).is_err());
    assert!(b.set_time_step(0.0).is_err());
    assert!(b.set_time_step(f64::NAN).is_err());
    for _ in 0..100 {
        a.tick().unwrap();
        b.tick().unwrap();
    }
    assert_eq!(a.oscillators().phases(), b.oscillators().phases());
    assert_eq!(b.clock().coupling(), 0.2);
    assert_eq!(b.clock().time_step(), 0.01);
}
