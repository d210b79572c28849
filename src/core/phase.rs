use std::f64::consts::TAU;

/// Wrap into the half-open range [0, TAU).
#[inline]
pub fn wrap_0_tau(x: f64) -> f64 {
    let w = x.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if w >= TAU { 0.0 } else { w }
}

/// Shortest unsigned angle between two phases, in [0, PI].
#[inline]
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).abs().rem_euclid(TAU);
    d.min(TAU - d)
}

/// Arc length between two phases on a circle of the given radius.
#[inline]
pub fn circular_distance(a: f64, b: f64, radius: f64) -> f64 {
    radius * angular_distance(a, b)
}

/// Screen offset of a phase on a circle, x growing to the right and y downwards.
/// Phase 0 sits on the left of the circle.
#[inline]
pub fn circle_position(phase: f64, radius: f64) -> (f64, f64) {
    (-radius * phase.cos(), radius * phase.sin())
}
