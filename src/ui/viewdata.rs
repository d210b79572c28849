use crate::sim::{DistanceRecord, OscillatorId, Simulation};

#[derive(Clone, Debug)]
pub struct OscillatorView {
    pub id: OscillatorId,
    pub frequency: f64,
    pub phase: f64,
}

/// Fully committed post-tick state, copied out of the worker for drawing.
#[derive(Clone, Debug, Default)]
pub struct UiFrame {
    pub oscillators: Vec<OscillatorView>,
    pub record: Option<DistanceRecord>,
    /// Measured max distance per tick over the detector window, oldest first.
    /// Empty until the first tick after a start or a parameter change.
    pub history: Vec<f64>,
    pub radius: f64,
    pub ticks: u64,
    pub elapsed: f64,
    pub coupling: f64,
    pub time_step: f64,
    pub synchronized: bool,
    pub synchronization_time: Option<f64>,
    /// Set once the worker stopped on an error.
    pub error: Option<String>,
}

impl UiFrame {
    pub fn capture(sim: &Simulation) -> Self {
        let detector = sim.detector();
        Self {
            oscillators: sim
                .oscillators()
                .iter()
                .map(|o| OscillatorView {
                    id: o.id(),
                    frequency: o.frequency(),
                    phase: o.phase(),
                })
                .collect(),
            record: Some(detector.latest().clone()),
            history: detector.history().observed_distances(),
            radius: detector.params().radius,
            ticks: sim.clock().ticks(),
            elapsed: sim.clock().elapsed(),
            coupling: sim.clock().coupling(),
            time_step: sim.clock().time_step(),
            synchronized: sim.is_synchronized(),
            synchronization_time: sim.synchronization_time(),
            error: None,
        }
    }
}

/// Parameter change requested by the viewer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Control {
    SetCoupling(f64),
    SetTimeStep(f64),
}
