use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::sim::{DetectorParams, OscillatorSet, SimResult, Simulation, SimulationClock};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "SimulationConfig::default_coupling")]
    pub coupling: f64,
    #[serde(default = "SimulationConfig::default_time_step")]
    pub time_step: f64,
    #[serde(default = "SimulationConfig::default_tick_rate_hz")]
    pub tick_rate_hz: f64,
}

impl SimulationConfig {
    fn default_coupling() -> f64 {
        0.2
    }
    fn default_time_step() -> f64 {
        0.01
    }
    fn default_tick_rate_hz() -> f64 {
        60.0
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            coupling: Self::default_coupling(),
            time_step: Self::default_time_step(),
            tick_rate_hz: Self::default_tick_rate_hz(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    #[serde(default = "DetectorConfig::default_window")]
    pub window: usize,
    #[serde(default = "DetectorConfig::default_epsilon")]
    pub epsilon: f64,
    #[serde(default = "DetectorConfig::default_radius")]
    pub radius: f64,
}

impl DetectorConfig {
    fn default_window() -> usize {
        500
    }
    fn default_epsilon() -> f64 {
        0.001
    }
    fn default_radius() -> f64 {
        200.0
    }

    pub fn params(&self) -> DetectorParams {
        DetectorParams {
            window: self.window,
            epsilon: self.epsilon,
            radius: self.radius,
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window: Self::default_window(),
            epsilon: Self::default_epsilon(),
            radius: Self::default_radius(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OscillatorConfig {
    pub frequency: f64,
    #[serde(default)]
    pub phase: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default = "AppConfig::default_oscillators")]
    pub oscillators: Vec<OscillatorConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            detector: DetectorConfig::default(),
            oscillators: Self::default_oscillators(),
        }
    }
}

impl AppConfig {
    fn default_oscillators() -> Vec<OscillatorConfig> {
        OscillatorSet::reference()
            .iter()
            .map(|o| OscillatorConfig {
                frequency: o.frequency(),
                phase: o.phase(),
            })
            .collect()
    }

    /// Build a ready-to-tick simulation, rejecting any out-of-range value.
    pub fn build_simulation(&self) -> SimResult<Simulation> {
        let oscillators =
            OscillatorSet::new(self.oscillators.iter().map(|o| (o.frequency, o.phase)))?;
        let clock = SimulationClock::new(self.simulation.coupling, self.simulation.time_step)?;
        Simulation::new(oscillators, clock, self.detector.params())
    }

    fn round_f64(x: f64) -> f64 {
        (x * 1_000_000.0).round() / 1_000_000.0
    }

    fn rounded(mut self) -> Self {
        self.simulation.coupling = Self::round_f64(self.simulation.coupling);
        self.simulation.time_step = Self::round_f64(self.simulation.time_step);
        self.detector.epsilon = Self::round_f64(self.detector.epsilon);
        for o in &mut self.oscillators {
            o.phase = Self::round_f64(o.phase);
        }
        self
    }

    pub fn load_or_default(path: &str) -> Self {
        let path_obj = Path::new(path);
        if path_obj.exists() {
            match fs::read_to_string(path_obj) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(cfg) => return cfg,
                    Err(err) => {
                        warn!(%path, %err, "failed to parse config, using defaults");
                    }
                },
                Err(err) => {
                    warn!(%path, %err, "failed to read config, using defaults");
                }
            }
            return Self::default();
        }

        // File does not exist: write defaults, commented out, and return them.
        let default_cfg = Self::default();
        match toml::to_string_pretty(&default_cfg.clone().rounded()) {
            Ok(text) => {
                let mut commented = String::new();
                for line in text.lines() {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        commented.push('\n');
                    } else if trimmed.starts_with('[') && !trimmed.starts_with("[[") {
                        commented.push_str(line);
                        commented.push('\n');
                    } else {
                        // Array-of-table headers too: an empty `[[oscillators]]`
                        // entry would not parse.
                        commented.push_str("# ");
                        commented.push_str(line);
                        commented.push('\n');
                    }
                }
                if let Err(err) = fs::write(path_obj, commented) {
                    warn!(%path, %err, "failed to write default config");
                }
            }
            Err(err) => warn!(%err, "failed to serialize default config"),
        }
        default_cfg
    }
}
