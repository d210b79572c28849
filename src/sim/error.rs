//! Error types for the simulation core.

use thiserror::Error;

use super::oscillator::OscillatorId;

/// Errors raised by the simulation core.
///
/// None of these carry user-facing text; the calling layer decides how to
/// surface them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A parameter was outside its accepted range. The previous value stays in force.
    #[error("invalid {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A tick produced a non-finite phase. The tick was not committed.
    #[error("numeric divergence: oscillator {id} reached phase {value}")]
    NumericDivergence { id: OscillatorId, value: f64 },

    #[error("unknown oscillator {0}")]
    UnknownOscillator(OscillatorId),

    #[error("a simulation needs at least one oscillator")]
    EmptyOscillatorSet,
}

impl SimError {
    pub fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;
