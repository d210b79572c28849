//! Oscillator state: natural frequency and wrapped phase per unit.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{SimError, SimResult};
use crate::core::phase::wrap_0_tau;

/// Stable 1-based oscillator identifier, unique within one simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OscillatorId(pub u32);

impl fmt::Display for OscillatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Oscillator {
    id: OscillatorId,
    frequency: f64,
    phase: f64,
}

impl Oscillator {
    #[inline]
    pub fn id(&self) -> OscillatorId {
        self.id
    }

    #[inline]
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Always in [0, 2π).
    #[inline]
    pub fn phase(&self) -> f64 {
        self.phase
    }
}

/// `(frequency, initial_phase)` of the three-oscillator model.
pub const REFERENCE_SPECS: [(f64, f64); 3] = [(1.0, 0.0), (0.5, 5.0), (0.25, 10.0)];

/// The full set of oscillators, ids assigned 1..=N in construction order.
#[derive(Clone, Debug, PartialEq)]
pub struct OscillatorSet {
    oscillators: Vec<Oscillator>,
}

impl OscillatorSet {
    /// Build from `(frequency, initial_phase)` pairs. Initial phases are wrapped.
    pub fn new<I>(specs: I) -> SimResult<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut oscillators = Vec::new();
        for (idx, (frequency, phase)) in specs.into_iter().enumerate() {
            if !frequency.is_finite() {
                return Err(SimError::invalid("frequency", frequency, "must be finite"));
            }
            if !phase.is_finite() {
                return Err(SimError::invalid("phase", phase, "must be finite"));
            }
            oscillators.push(Oscillator {
                id: OscillatorId(idx as u32 + 1),
                frequency,
                phase: wrap_0_tau(phase),
            });
        }
        if oscillators.is_empty() {
            return Err(SimError::EmptyOscillatorSet);
        }
        Ok(Self { oscillators })
    }

    /// The three-oscillator model: frequencies {1, 0.5, 0.25}, phases {0, 5, 10}.
    pub fn reference() -> Self {
        Self::new(REFERENCE_SPECS).expect("reference specs are finite and non-empty")
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.oscillators.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.oscillators.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Oscillator> {
        self.oscillators.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = OscillatorId> + '_ {
        self.oscillators.iter().map(|o| o.id)
    }

    fn index_of(&self, id: OscillatorId) -> SimResult<usize> {
        let idx = (id.0 as usize).wrapping_sub(1);
        if idx < self.oscillators.len() {
            Ok(idx)
        } else {
            Err(SimError::UnknownOscillator(id))
        }
    }

    pub fn get(&self, id: OscillatorId) -> SimResult<&Oscillator> {
        self.index_of(id).map(|idx| &self.oscillators[idx])
    }

    pub fn frequency(&self, id: OscillatorId) -> SimResult<f64> {
        self.get(id).map(Oscillator::frequency)
    }

    pub fn phase(&self, id: OscillatorId) -> SimResult<f64> {
        self.get(id).map(Oscillator::phase)
    }

    /// Store `value` wrapped into [0, 2π), however far outside it lies.
    pub fn set_phase(&mut self, id: OscillatorId, value: f64) -> SimResult<()> {
        if !value.is_finite() {
            return Err(SimError::invalid("phase", value, "must be finite"));
        }
        let idx = self.index_of(id)?;
        self.oscillators[idx].phase = wrap_0_tau(value);
        Ok(())
    }

    /// Phases in id order.
    pub fn phases(&self) -> Vec<f64> {
        self.oscillators.iter().map(|o| o.phase).collect()
    }

    pub(crate) fn frequencies(&self) -> impl Iterator<Item = f64> + '_ {
        self.oscillators.iter().map(|o| o.frequency)
    }

    /// Overwrite every phase at once. `phases` is in id order and already finite.
    pub(crate) fn commit_phases(&mut self, phases: &[f64]) {
        debug_assert_eq!(phases.len(), self.oscillators.len());
        for (osc, &phase) in self.oscillators.iter_mut().zip(phases) {
            osc.phase = wrap_0_tau(phase);
        }
    }
}
