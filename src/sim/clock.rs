//! Simulation clock: coupling strength, time step and accumulated time.

use tracing::warn;

use super::error::{SimError, SimResult};

/// Parameters in force for one tick, taken as a single snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickParams {
    pub coupling: f64,
    pub time_step: f64,
    /// Accumulated time after this tick.
    pub elapsed: f64,
    /// `coupling` or `time_step` differs from the previous tick's snapshot.
    pub changed: bool,
}

#[derive(Clone, Debug)]
pub struct SimulationClock {
    coupling: f64,
    time_step: f64,
    elapsed: f64,
    ticks: u64,
    last: Option<(f64, f64)>,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self {
            coupling: 0.0,
            time_step: 0.1,
            elapsed: 0.0,
            ticks: 0,
            last: None,
        }
    }
}

impl SimulationClock {
    pub fn new(coupling: f64, time_step: f64) -> SimResult<Self> {
        let mut clock = Self::default();
        clock.set_coupling(coupling)?;
        clock.set_time_step(time_step)?;
        Ok(clock)
    }

    /// Takes effect from the next tick. Rejects negative or non-finite `k`.
    pub fn set_coupling(&mut self, k: f64) -> SimResult<()> {
        if !k.is_finite() || k < 0.0 {
            warn!(k, "rejected coupling strength");
            return Err(SimError::invalid("coupling", k, "must be finite and >= 0"));
        }
        self.coupling = k;
        Ok(())
    }

    /// Takes effect from the next tick. Rejects non-positive or non-finite `dt`.
    pub fn set_time_step(&mut self, dt: f64) -> SimResult<()> {
        if !dt.is_finite() || dt <= 0.0 {
            warn!(dt, "rejected time step");
            return Err(SimError::invalid("time_step", dt, "must be finite and > 0"));
        }
        self.time_step = dt;
        Ok(())
    }

    #[inline]
    pub fn coupling(&self) -> f64 {
        self.coupling
    }

    #[inline]
    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// What `tick` would return, without advancing.
    pub fn peek(&self) -> TickParams {
        let changed = self
            .last
            .is_some_and(|last| last != (self.coupling, self.time_step));
        TickParams {
            coupling: self.coupling,
            time_step: self.time_step,
            elapsed: self.elapsed + self.time_step,
            changed,
        }
    }

    /// Advance `elapsed` by `dt` and return the snapshot used for this tick.
    pub fn tick(&mut self) -> TickParams {
        let params = self.peek();
        self.elapsed = params.elapsed;
        self.ticks += 1;
        self.last = Some((params.coupling, params.time_step));
        params
    }
}
