//! Coupled phase oscillators (Kuramoto model) with a rolling-window
//! synchronization detector.
//!
//! ```
//! use phaselock::sim::{DetectorParams, OscillatorId, OscillatorSet, Simulation, SimulationClock};
//!
//! let mut sim = Simulation::new(
//!     OscillatorSet::reference(),
//!     SimulationClock::new(1.0, 0.01).unwrap(),
//!     DetectorParams::default(),
//! )
//! .unwrap();
//! for _ in 0..1000 {
//!     sim.tick().unwrap();
//! }
//! assert!(sim.is_synchronized());
//! let phase = sim.phase(OscillatorId(1)).unwrap();
//! assert!((0.0..std::f64::consts::TAU).contains(&phase));
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod sim;
pub mod ui;
pub mod worker;
