//! Batch runner without a viewer.

use serde::Serialize;
use tracing::info;

use super::error::SimResult;
use super::history::DistanceRecord;
use super::oscillator::OscillatorId;
use super::simulation::Simulation;

#[derive(Clone, Debug, Serialize)]
pub struct OscillatorReport {
    pub id: OscillatorId,
    pub frequency: f64,
    pub phase: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub elapsed: f64,
    pub coupling: f64,
    pub time_step: f64,
    pub oscillators: Vec<OscillatorReport>,
    pub max_distance: DistanceRecord,
    pub synchronized: bool,
    pub synchronization_time: Option<f64>,
    /// Number of times synchronization was gained or lost during the run.
    pub transitions: usize,
}

impl RunSummary {
    pub fn of(sim: &Simulation, transitions: usize) -> Self {
        Self {
            ticks: sim.clock().ticks(),
            elapsed: sim.clock().elapsed(),
            coupling: sim.clock().coupling(),
            time_step: sim.clock().time_step(),
            oscillators: sim
                .oscillators()
                .iter()
                .map(|o| OscillatorReport {
                    id: o.id(),
                    frequency: o.frequency(),
                    phase: o.phase(),
                })
                .collect(),
            max_distance: sim.current_max_distance().clone(),
            synchronized: sim.is_synchronized(),
            synchronization_time: sim.synchronization_time(),
            transitions,
        }
    }

    /// Plain-text rendering of the summary, one fact per line.
    pub fn to_text(&self) -> String {
        let mut out = format!(
            "t={:.3} after {} ticks (K={:.3}, dt={:.3})\n",
            self.elapsed, self.ticks, self.coupling, self.time_step
        );
        for o in &self.oscillators {
            out.push_str(&format!(
                "oscillator {} (freq = {}): phase {:.4}\n",
                o.id, o.frequency, o.phase
            ));
        }
        let r = &self.max_distance;
        if let Some((a, b)) = r.pair {
            out.push_str(&format!(
                "max distance {a} - {b} = {:.3}\n",
                r.max_distance
            ));
            for aux in &r.aux {
                out.push_str(&format!("{a} - {} = {:.3}\n", aux.other, aux.from_first));
                out.push_str(&format!("{b} - {} = {:.3}\n", aux.other, aux.from_second));
            }
        }
        match self.synchronization_time {
            Some(t) => out.push_str(&format!("synchronized at t=~{t:.3}\n")),
            None => out.push_str("not synchronized\n"),
        }
        out
    }
}

/// Run `ticks` ticks, stopping early at the first error.
pub fn run(sim: &mut Simulation, ticks: u64) -> SimResult<RunSummary> {
    info!(
        ticks,
        oscillators = sim.oscillators().len(),
        coupling = sim.clock().coupling(),
        time_step = sim.clock().time_step(),
        "headless run"
    );
    let mut transitions = 0;
    for _ in 0..ticks {
        if sim.tick()?.transition.is_some() {
            transitions += 1;
        }
    }
    let summary = RunSummary::of(sim, transitions);
    info!(
        elapsed = summary.elapsed,
        synchronized = summary.synchronized,
        "headless run finished"
    );
    Ok(summary)
}
