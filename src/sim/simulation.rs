//! The simulation core as seen by a driver: parameters in, one tick at a
//! time, phases and synchronization status out.

use tracing::{error, info};

use super::clock::{SimulationClock, TickParams};
use super::coupling;
use super::detector::{DetectorParams, SyncDetector, SyncTransition};
use super::error::{SimError, SimResult};
use super::history::DistanceRecord;
use super::oscillator::{OscillatorId, OscillatorSet};

/// Outcome of one committed tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    pub params: TickParams,
    pub transition: Option<SyncTransition>,
}

pub struct Simulation {
    oscillators: OscillatorSet,
    clock: SimulationClock,
    detector: SyncDetector,
}

impl Simulation {
    pub fn new(
        oscillators: OscillatorSet,
        clock: SimulationClock,
        detector: DetectorParams,
    ) -> SimResult<Self> {
        Ok(Self {
            oscillators,
            clock,
            detector: SyncDetector::new(detector)?,
        })
    }

    /// Takes effect from the next tick.
    pub fn set_coupling(&mut self, k: f64) -> SimResult<()> {
        self.clock.set_coupling(k)
    }

    /// Takes effect from the next tick.
    pub fn set_time_step(&mut self, dt: f64) -> SimResult<()> {
        self.clock.set_time_step(dt)
    }

    /// Advance every oscillator by one step and re-evaluate synchronization.
    ///
    /// `K` and `dt` are read once. On `NumericDivergence` nothing is
    /// committed: phases, clock and detector keep their pre-tick state.
    pub fn tick(&mut self) -> SimResult<TickReport> {
        let pending = self.clock.peek();
        let next = coupling::advance(&self.oscillators, pending.coupling, pending.time_step);
        if let Some((id, &value)) = self
            .oscillators
            .ids()
            .zip(next.iter())
            .find(|(_, v)| !v.is_finite())
        {
            error!(
                %id,
                value,
                coupling = pending.coupling,
                time_step = pending.time_step,
                "phase diverged"
            );
            return Err(SimError::NumericDivergence { id, value });
        }

        let params = self.clock.tick();
        let mut transition = None;
        if params.changed {
            if self.detector.is_synchronized() {
                transition = Some(SyncTransition::Lost);
            }
            self.detector.invalidate();
            info!(
                coupling = params.coupling,
                time_step = params.time_step,
                "parameters changed, synchronization reset"
            );
        }

        self.oscillators.commit_phases(&next);

        if let Some(t) = self
            .detector
            .observe(&self.oscillators, params.elapsed, params.time_step)
        {
            transition = Some(t);
        }
        match transition {
            Some(SyncTransition::Synchronized { since }) => {
                info!(elapsed = params.elapsed, since, "synchronized");
            }
            Some(SyncTransition::Lost) => info!(elapsed = params.elapsed, "synchronization lost"),
            None => {}
        }

        Ok(TickReport { params, transition })
    }

    pub fn phase(&self, id: OscillatorId) -> SimResult<f64> {
        self.oscillators.phase(id)
    }

    pub fn oscillators(&self) -> &OscillatorSet {
        &self.oscillators
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn detector(&self) -> &SyncDetector {
        &self.detector
    }

    #[inline]
    pub fn is_synchronized(&self) -> bool {
        self.detector.is_synchronized()
    }

    #[inline]
    pub fn synchronization_time(&self) -> Option<f64> {
        self.detector.synchronization_time()
    }

    pub fn current_max_distance(&self) -> &DistanceRecord {
        self.detector.latest()
    }
}
