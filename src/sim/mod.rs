pub mod clock;
pub mod coupling;
pub mod detector;
pub mod error;
pub mod headless;
pub mod history;
pub mod oscillator;
pub mod simulation;

pub use clock::{SimulationClock, TickParams};
pub use detector::{DetectorParams, SyncDetector, SyncState, SyncTransition};
pub use error::{SimError, SimResult};
pub use history::{AuxDistance, DistanceRecord};
pub use oscillator::{Oscillator, OscillatorId, OscillatorSet};
pub use simulation::{Simulation, TickReport};
