//! Kuramoto coupling: `dθᵢ/dt = ωᵢ + K Σⱼ≠ᵢ sin(θⱼ − θᵢ)`.
//!
//! The sum is not normalized by N. `K = 0` leaves every oscillator rotating
//! uniformly at its natural frequency.

use super::error::SimResult;
use super::oscillator::{OscillatorId, OscillatorSet};
use crate::core::rk4::rk4_delta;

/// Phase velocity field over a frozen snapshot of every oscillator's phase.
#[derive(Clone, Copy, Debug)]
pub struct CouplingField<'a> {
    snapshot: &'a [f64],
    coupling: f64,
}

impl<'a> CouplingField<'a> {
    pub fn new(snapshot: &'a [f64], coupling: f64) -> Self {
        Self { snapshot, coupling }
    }

    /// Rate of oscillator `index` evaluated at trial phase `theta`.
    ///
    /// `theta` replaces the oscillator's own phase; the others come from the snapshot.
    pub fn rate(&self, index: usize, frequency: f64, theta: f64) -> f64 {
        let pull: f64 = self
            .snapshot
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != index)
            .map(|(_, &phase_j)| (phase_j - theta).sin())
            .sum();
        frequency + self.coupling * pull
    }
}

/// Instantaneous rate of `id` at trial phase `theta`, against the set's stored phases.
pub fn derivative(
    set: &OscillatorSet,
    id: OscillatorId,
    theta: f64,
    coupling: f64,
) -> SimResult<f64> {
    let frequency = set.frequency(id)?;
    let snapshot = set.phases();
    // Ids are dense and 1-based, and `frequency` already checked this one.
    let index = id.0 as usize - 1;
    let field = CouplingField::new(&snapshot, coupling);
    Ok(field.rate(index, frequency, theta))
}

/// One RK4 step for every oscillator, all reading the same pre-step phases.
///
/// Returns the new phases in id order, not yet wrapped or stored.
pub fn advance(set: &OscillatorSet, coupling: f64, dt: f64) -> Vec<f64> {
    let snapshot = set.phases();
    let field = CouplingField::new(&snapshot, coupling);
    set.frequencies()
        .enumerate()
        .map(|(i, frequency)| {
            let current = snapshot[i];
            current + rk4_delta(|theta| field.rate(i, frequency, theta), current, dt)
        })
        .collect()
}
