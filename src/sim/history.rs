//! Fixed-capacity window of per-tick distance records.

use ringbuf::HeapRb;
use ringbuf::traits::*;
use serde::Serialize;

use super::error::{SimError, SimResult};
use super::oscillator::OscillatorId;

/// Distances from the two ends of the maximal pair to one excluded oscillator.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AuxDistance {
    pub other: OscillatorId,
    pub from_first: f64,
    pub from_second: f64,
}

/// Maximal pairwise distance at one tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DistanceRecord {
    pub max_distance: f64,
    /// `None` for seed records and for single-oscillator sets.
    pub pair: Option<(OscillatorId, OscillatorId)>,
    /// One entry per oscillator outside the pair, in id order.
    pub aux: Vec<AuxDistance>,
    /// Seed record standing in for a tick that has not happened yet.
    #[serde(skip)]
    pub placeholder: bool,
}

impl DistanceRecord {
    /// A measured record with no pair, as produced for a single oscillator.
    pub fn unpaired(max_distance: f64) -> Self {
        Self {
            max_distance,
            pair: None,
            aux: Vec::new(),
            placeholder: false,
        }
    }

    pub fn seed(max_distance: f64) -> Self {
        Self {
            placeholder: true,
            ..Self::unpaired(max_distance)
        }
    }

    /// The single excluded oscillator of a three-oscillator set.
    pub fn other(&self) -> Option<OscillatorId> {
        match self.aux.as_slice() {
            [only] => Some(only.other),
            _ => None,
        }
    }
}

/// Ring buffer of exactly `window` records, oldest evicted on push.
///
/// Keeps a running count of rising steps (consecutive records whose
/// `max_distance` grows by more than `epsilon`) so flatness is O(1).
/// A step out of a seed record always counts as rising.
pub struct DistanceHistory {
    rb: HeapRb<DistanceRecord>,
    window: usize,
    epsilon: f64,
    rising: usize,
}

/// Shape checks shared by the history and the detector parameters.
pub(crate) fn check_window(window: usize, epsilon: f64) -> SimResult<()> {
    if window < 2 {
        return Err(SimError::invalid(
            "window",
            window as f64,
            "must hold at least 2 records",
        ));
    }
    if !epsilon.is_finite() || epsilon < 0.0 {
        return Err(SimError::invalid(
            "epsilon",
            epsilon,
            "must be finite and >= 0",
        ));
    }
    Ok(())
}

impl DistanceHistory {
    pub fn new(window: usize, epsilon: f64) -> SimResult<Self> {
        check_window(window, epsilon)?;
        let mut history = Self {
            rb: HeapRb::new(window),
            window,
            epsilon,
            rising: 0,
        };
        history.reseed();
        Ok(history)
    }

    /// Fill with strictly increasing seed records, each step larger than `epsilon`,
    /// so the window cannot read as flat until all of them are evicted.
    pub fn reseed(&mut self) {
        self.rb = HeapRb::new(self.window);
        let step = self.epsilon + 1.0;
        for k in 0..self.window {
            let _ = self.rb.try_push(DistanceRecord::seed(k as f64 * step));
        }
        self.rising = self.window - 1;
    }

    fn is_rising(&self, prev: &DistanceRecord, next: &DistanceRecord) -> bool {
        prev.placeholder || !(next.max_distance - prev.max_distance <= self.epsilon)
    }

    pub fn push(&mut self, record: DistanceRecord) {
        let evicted_step = {
            let mut iter = self.iter();
            match (iter.next(), iter.next()) {
                (Some(a), Some(b)) => self.is_rising(a, b),
                _ => false,
            }
        };
        let added_step = self
            .latest()
            .is_some_and(|last| self.is_rising(last, &record));
        if evicted_step {
            self.rising -= 1;
        }
        if added_step {
            self.rising += 1;
        }
        self.rb.push_overwrite(record);
    }

    /// Every consecutive step in the window grows by at most `epsilon`.
    #[inline]
    pub fn is_flat(&self) -> bool {
        self.rising == 0
    }

    #[inline]
    pub fn window(&self) -> usize {
        self.window
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &DistanceRecord> {
        let (head, tail) = self.rb.as_slices();
        head.iter().chain(tail.iter())
    }

    pub fn latest(&self) -> Option<&DistanceRecord> {
        let (head, tail) = self.rb.as_slices();
        tail.last().or(head.last())
    }

    /// Max distances of measured records only, oldest first.
    pub fn observed_distances(&self) -> Vec<f64> {
        self.iter()
            .filter(|r| !r.placeholder)
            .map(|r| r.max_distance)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_flat(h: &DistanceHistory, epsilon: f64) -> bool {
        let records: Vec<_> = h.iter().collect();
        records
            .windows(2)
            .all(|w| !w[0].placeholder && w[1].max_distance - w[0].max_distance <= epsilon)
    }

    #[test]
    fn seeded_window_is_full_and_not_flat() {
        let h = DistanceHistory::new(5, 0.001).unwrap();
        assert_eq!(h.iter().count(), 5);
        assert!(!h.is_flat());
        let d: Vec<f64> = h.iter().map(|r| r.max_distance).collect();
        assert!(d.windows(2).all(|w| w[1] - w[0] > 0.001));
    }

    #[test]
    fn push_evicts_oldest() {
        let mut h = DistanceHistory::new(3, 0.001).unwrap();
        for v in [10.0, 20.0, 30.0, 40.0] {
            h.push(DistanceRecord::unpaired(v));
        }
        assert_eq!(h.observed_distances(), vec![20.0, 30.0, 40.0]);
        assert_eq!(h.latest().unwrap().max_distance, 40.0);
    }

    #[test]
    fn becomes_flat_only_after_seeds_are_gone() {
        let mut h = DistanceHistory::new(4, 0.001).unwrap();
        for i in 0..3 {
            h.push(DistanceRecord::unpaired(50.0));
            assert!(!h.is_flat(), "flat after {} pushes", i + 1);
        }
        h.push(DistanceRecord::unpaired(50.0));
        assert!(h.is_flat());
    }

    #[test]
    fn drop_out_of_last_seed_is_not_flat() {
        let mut h = DistanceHistory::new(3, 0.001).unwrap();
        h.push(DistanceRecord::unpaired(0.0));
        h.push(DistanceRecord::unpaired(0.0));
        // [seed, 0, 0]: the only remaining seed still blocks.
        assert!(!h.is_flat());
        h.push(DistanceRecord::unpaired(0.0));
        assert!(h.is_flat());
    }

    #[test]
    fn decreasing_steps_count_as_flat() {
        let mut h = DistanceHistory::new(4, 0.001).unwrap();
        for v in [9.0, 7.0, 5.0, 5.0005] {
            h.push(DistanceRecord::unpaired(v));
        }
        assert!(h.is_flat());
        h.push(DistanceRecord::unpaired(5.1));
        assert!(!h.is_flat());
    }

    #[test]
    fn nan_step_is_never_flat() {
        let mut h = DistanceHistory::new(3, 0.001).unwrap();
        for v in [1.0, f64::NAN, 1.0] {
            h.push(DistanceRecord::unpaired(v));
        }
        assert!(!h.is_flat());
    }

    #[test]
    fn running_count_matches_full_scan() {
        let eps = 0.5;
        let mut h = DistanceHistory::new(6, eps).unwrap();
        let values = [
            3.0, 3.2, 2.0, 4.0, 4.1, 4.1, 3.0, 3.4, 3.6, 9.0, 1.0, 1.0, 1.2, 1.1, 1.0, 0.9,
        ];
        for v in values {
            h.push(DistanceRecord::unpaired(v));
            assert_eq!(h.is_flat(), naive_flat(&h, eps));
        }
    }

    #[test]
    fn reseed_restores_unflat_window() {
        let mut h = DistanceHistory::new(3, 0.001).unwrap();
        for _ in 0..3 {
            h.push(DistanceRecord::unpaired(1.0));
        }
        assert!(h.is_flat());
        h.reseed();
        assert!(!h.is_flat());
        assert_eq!(h.iter().count(), 3);
    }

    fn rejected(result: SimResult<DistanceHistory>) -> &'static str {
        match result {
            Err(SimError::InvalidParameter { name, .. }) => name,
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("accepted"),
        }
    }

    #[test]
    fn degenerate_shapes_are_rejected() {
        assert_eq!(rejected(DistanceHistory::new(0, 0.001)), "window");
        assert_eq!(rejected(DistanceHistory::new(1, 0.001)), "window");
        for epsilon in [-0.1, f64::NAN, f64::INFINITY] {
            assert_eq!(rejected(DistanceHistory::new(3, epsilon)), "epsilon");
        }
        let h = DistanceHistory::new(2, 0.0).unwrap();
        assert_eq!(h.window(), 2);
        assert!(!h.is_flat());
    }

    #[test]
    fn observed_distances_skip_seed_records() {
        let mut h = DistanceHistory::new(4, 0.001).unwrap();
        assert!(h.observed_distances().is_empty());
        h.push(DistanceRecord::unpaired(7.0));
        h.push(DistanceRecord::unpaired(8.0));
        assert_eq!(h.observed_distances(), vec![7.0, 8.0]);
        assert_eq!(h.iter().count(), 4);
        h.reseed();
        assert!(h.observed_distances().is_empty());
    }

    #[test]
    fn other_is_only_defined_for_a_single_excluded_oscillator() {
        let mut r = DistanceRecord::unpaired(1.0);
        assert_eq!(r.other(), None);
        r.aux.push(AuxDistance {
            other: OscillatorId(3),
            from_first: 1.0,
            from_second: 2.0,
        });
        assert_eq!(r.other(), Some(OscillatorId(3)));
    }
}
