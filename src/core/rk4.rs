//! Fixed-step classical Runge-Kutta for a scalar ODE `dy/dt = f(y)`.

/// Increment of one explicit RK4 step of size `dt` starting at `y`.
///
/// Stateless; identical inputs always give identical output.
#[inline]
pub fn rk4_delta<F>(deriv: F, y: f64, dt: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    let k1 = dt * deriv(y);
    let k2 = dt * deriv(y + k1 / 2.0);
    let k3 = dt * deriv(y + k2 / 2.0);
    let k4 = dt * deriv(y + k3);
    (k1 + 2.0 * k2 + 2.0 * k3 + k4) / 6.0
}

/// `y` advanced by one RK4 step.
#[inline]
pub fn rk4_step<F>(deriv: F, y: f64, dt: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    y + rk4_delta(deriv, y, dt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_rate_is_exact() {
        let y = rk4_step(|_| 2.5, 1.0, 0.1);
        assert!((y - 1.25).abs() < 1e-12, "y={y}");
    }

    #[test]
    fn exponential_decay_matches_closed_form() {
        // dy/dt = -y, y(0) = 1
        let dt = 0.01;
        let mut y = 1.0;
        for _ in 0..100 {
            y = rk4_step(|v| -v, y, dt);
        }
        let exact = (-1.0f64).exp();
        assert!((y - exact).abs() < 1e-9, "y={y} exact={exact}");
    }

    #[test]
    fn single_step_matches_hand_computed_stages() {
        // f(y) = y^2 at y = 1, dt = 0.1
        let dt = 0.1;
        let k1 = dt * 1.0;
        let k2 = dt * (1.0 + k1 / 2.0f64).powi(2);
        let k3 = dt * (1.0 + k2 / 2.0f64).powi(2);
        let k4 = dt * (1.0 + k3).powi(2);
        let expected = (k1 + 2.0 * k2 + 2.0 * k3 + k4) / 6.0;
        assert_eq!(rk4_delta(|v| v * v, 1.0, dt), expected);
    }

    #[test]
    fn zero_step_is_identity() {
        assert_eq!(rk4_step(|v| v.sin() + 3.0, 0.7, 0.0), 0.7);
    }
}
