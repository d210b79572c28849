//! Rolling-window synchronization detector.
//!
//! Each tick the largest pairwise circular distance is appended to a window
//! of `W` records. The oscillators count as synchronized while no step in the
//! window grows by more than `epsilon`. The synchronization time is
//! back-dated by the window length: `elapsed - W * dt` at the first flat tick.

use serde::Serialize;
use tracing::debug;

use super::error::{SimError, SimResult};
use super::history::{AuxDistance, DistanceHistory, DistanceRecord, check_window};
use super::oscillator::{OscillatorId, OscillatorSet};
use crate::core::phase::circular_distance;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DetectorParams {
    /// Number of ticks in the window (`W`).
    pub window: usize,
    /// Largest per-tick growth of the max distance still read as flat.
    pub epsilon: f64,
    /// Radius the angular distances are scaled by (`R`).
    pub radius: f64,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            window: 500,
            epsilon: 0.001,
            radius: 200.0,
        }
    }
}

impl DetectorParams {
    pub fn validate(&self) -> SimResult<()> {
        check_window(self.window, self.epsilon)?;
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(SimError::invalid(
                "radius",
                self.radius,
                "must be finite and > 0",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum SyncState {
    Unsynchronized,
    Synchronized { since: f64 },
}

/// State change produced by one observation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SyncTransition {
    Synchronized { since: f64 },
    Lost,
}

/// Distance between two oscillators of `set`, scaled by `radius`.
pub fn distance(
    set: &OscillatorSet,
    a: OscillatorId,
    b: OscillatorId,
    radius: f64,
) -> SimResult<f64> {
    Ok(circular_distance(set.phase(a)?, set.phase(b)?, radius))
}

/// Largest pairwise distance of the current phases.
///
/// Pairs are visited as `(i, j)`, `i < j`, in ascending order; a later pair
/// only takes over when strictly farther apart, so ties keep the first pair.
pub fn measure(set: &OscillatorSet, radius: f64) -> DistanceRecord {
    let phases: Vec<(OscillatorId, f64)> = set.iter().map(|o| (o.id(), o.phase())).collect();

    let mut best: Option<(f64, usize, usize)> = None;
    for i in 0..phases.len() {
        for j in (i + 1)..phases.len() {
            let d = circular_distance(phases[i].1, phases[j].1, radius);
            match best {
                Some((max, _, _)) if !(d > max) => {}
                _ => best = Some((d, i, j)),
            }
        }
    }

    let Some((max_distance, i, j)) = best else {
        return DistanceRecord::unpaired(0.0);
    };

    let aux = phases
        .iter()
        .enumerate()
        .filter(|&(k, _)| k != i && k != j)
        .map(|(_, &(other, phase))| AuxDistance {
            other,
            from_first: circular_distance(phases[i].1, phase, radius),
            from_second: circular_distance(phases[j].1, phase, radius),
        })
        .collect();

    DistanceRecord {
        max_distance,
        pair: Some((phases[i].0, phases[j].0)),
        aux,
        placeholder: false,
    }
}

pub struct SyncDetector {
    params: DetectorParams,
    history: DistanceHistory,
    state: SyncState,
}

impl SyncDetector {
    pub fn new(params: DetectorParams) -> SimResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            history: DistanceHistory::new(params.window, params.epsilon)?,
            state: SyncState::Unsynchronized,
        })
    }

    /// Record this tick's distances and re-evaluate the window.
    ///
    /// `elapsed` is the accumulated time after the tick and `time_step` the
    /// step it was taken with.
    pub fn observe(
        &mut self,
        set: &OscillatorSet,
        elapsed: f64,
        time_step: f64,
    ) -> Option<SyncTransition> {
        self.history.push(measure(set, self.params.radius));

        match (self.history.is_flat(), self.state) {
            (true, SyncState::Unsynchronized) => {
                let since = elapsed - self.params.window as f64 * time_step;
                self.state = SyncState::Synchronized { since };
                debug!(elapsed, since, "window flat");
                Some(SyncTransition::Synchronized { since })
            }
            (false, SyncState::Synchronized { .. }) => {
                self.state = SyncState::Unsynchronized;
                debug!(elapsed, "window no longer flat");
                Some(SyncTransition::Lost)
            }
            _ => None,
        }
    }

    /// Drop the synchronized state and the window evidence behind it.
    pub fn invalidate(&mut self) {
        self.state = SyncState::Unsynchronized;
        self.history.reseed();
    }

    #[inline]
    pub fn state(&self) -> SyncState {
        self.state
    }

    #[inline]
    pub fn is_synchronized(&self) -> bool {
        matches!(self.state, SyncState::Synchronized { .. })
    }

    pub fn synchronization_time(&self) -> Option<f64> {
        match self.state {
            SyncState::Synchronized { since } => Some(since),
            SyncState::Unsynchronized => None,
        }
    }

    /// Most recent record; a seed record before the first observation.
    pub fn latest(&self) -> &DistanceRecord {
        self.history
            .latest()
            .expect("history always holds `window` records")
    }

    pub fn history(&self) -> &DistanceHistory {
        &self.history
    }

    pub fn params(&self) -> &DetectorParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn set_with_phases(phases: &[f64]) -> OscillatorSet {
        OscillatorSet::new(phases.iter().map(|&p| (1.0, p))).unwrap()
    }

    fn small(window: usize) -> SyncDetector {
        SyncDetector::new(DetectorParams {
            window,
            epsilon: 0.001,
            radius: 200.0,
        })
        .unwrap()
    }

    #[test]
    fn measure_finds_farthest_pair_and_the_other() {
        let set = set_with_phases(&[0.0, 0.1, PI]);
        let r = measure(&set, 200.0);
        assert_eq!(r.pair, Some((OscillatorId(1), OscillatorId(3))));
        assert!((r.max_distance - 200.0 * PI).abs() < 1e-9);
        assert_eq!(r.other(), Some(OscillatorId(2)));
        let aux = &r.aux[0];
        assert!((aux.from_first - 20.0).abs() < 1e-9);
        assert!((aux.from_second - 200.0 * (PI - 0.1)).abs() < 1e-9);
    }

    #[test]
    fn ties_keep_first_pair_in_enumeration_order() {
        // (1,2) and (1,3) tie: (1,2) comes first.
        let set = set_with_phases(&[0.5, 2.5, 2.5]);
        for _ in 0..3 {
            let r = measure(&set, 200.0);
            assert_eq!(r.pair, Some((OscillatorId(1), OscillatorId(2))));
        }

        // (1,3) and (2,3) tie above (1,2): (1,3) comes first.
        let set = set_with_phases(&[0.0, 0.0, PI]);
        assert_eq!(
            measure(&set, 1.0).pair,
            Some((OscillatorId(1), OscillatorId(3)))
        );
    }

    #[test]
    fn aux_lists_every_excluded_oscillator() {
        let set = set_with_phases(&[0.0, 1.0, 3.0, 2.0]);
        let r = measure(&set, 1.0);
        assert_eq!(r.pair, Some((OscillatorId(1), OscillatorId(3))));
        let others: Vec<_> = r.aux.iter().map(|a| a.other).collect();
        assert_eq!(others, vec![OscillatorId(2), OscillatorId(4)]);
        assert_eq!(r.other(), None);
    }

    #[test]
    fn single_oscillator_has_no_pair() {
        let set = set_with_phases(&[1.0]);
        let r = measure(&set, 200.0);
        assert_eq!(r.pair, None);
        assert_eq!(r.max_distance, 0.0);
    }

    #[test]
    fn synchronizes_once_window_is_flat_and_back_dates() {
        let set = set_with_phases(&[0.0, 1.0]);
        let mut det = small(4);
        let dt = 0.5;
        let mut elapsed = 0.0;
        for _ in 0..3 {
            elapsed += dt;
            assert_eq!(det.observe(&set, elapsed, dt), None);
            assert!(!det.is_synchronized());
            assert_eq!(det.synchronization_time(), None);
        }
        elapsed += dt;
        let t = det.observe(&set, elapsed, dt);
        assert_eq!(t, Some(SyncTransition::Synchronized { since: 0.0 }));
        assert_eq!(det.synchronization_time(), Some(0.0));

        // Stays put while flat.
        for _ in 0..5 {
            elapsed += dt;
            assert_eq!(det.observe(&set, elapsed, dt), None);
            assert_eq!(det.synchronization_time(), Some(0.0));
        }
    }

    #[test]
    fn growing_spread_loses_sync_and_clears_time() {
        let mut det = small(3);
        let near = set_with_phases(&[0.0, 0.5]);
        for i in 1..=3 {
            det.observe(&near, i as f64, 1.0);
        }
        assert!(det.is_synchronized());

        let far = set_with_phases(&[0.0, 1.5]);
        assert_eq!(det.observe(&far, 4.0, 1.0), Some(SyncTransition::Lost));
        assert!(!det.is_synchronized());
        assert_eq!(det.synchronization_time(), None);
    }

    #[test]
    fn invalidate_clears_state_and_evidence() {
        let set = set_with_phases(&[0.0, 0.5]);
        let mut det = small(3);
        for i in 1..=3 {
            det.observe(&set, i as f64, 1.0);
        }
        assert!(det.is_synchronized());

        det.invalidate();
        assert!(!det.is_synchronized());
        assert_eq!(det.synchronization_time(), None);
        assert_eq!(det.observe(&set, 4.0, 1.0), None);
        assert!(!det.is_synchronized());
    }

    #[test]
    fn latest_before_first_tick_is_a_seed() {
        let det = small(3);
        assert_eq!(det.latest().pair, None);
    }

    #[test]
    fn invalid_params_are_rejected() {
        for params in [
            DetectorParams {
                window: 1,
                ..Default::default()
            },
            DetectorParams {
                epsilon: -1.0,
                ..Default::default()
            },
            DetectorParams {
                epsilon: f64::NAN,
                ..Default::default()
            },
            DetectorParams {
                radius: 0.0,
                ..Default::default()
            },
        ] {
            assert!(SyncDetector::new(params).is_err(), "{params:?}");
        }
    }
}
