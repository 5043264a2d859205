//! Timing curves for the zoom transition.
//!
//! Every animation in the transition runs for a fixed duration and is shaped
//! by a damped spring, parameterised the way UI toolkits expose springs:
//! a damping ratio and an initial velocity expressed in units of the total
//! travel per second.
//!
//! # Spring model
//!
//! On normalised time `u` in `[0, 1]` the spring solves
//!
//! ```text
//! x''(u) + 2ζω x'(u) + ω²x(u) = ω²,   x(0) = 0,   x'(0) = v
//! ```
//!
//! with `ω` chosen so the envelope `e^(-ζωu)` has decayed to 0.1% at `u = 1`.
//! The curve reports exactly `1.0` once `u` reaches the end, so a finished
//! animation always lands on its destination.
//!
//! ```
//! use tabzoom_transition::timing::SpringTiming;
//!
//! let timing = SpringTiming::new(700.0, 0.99, 9.0);
//! let curve = timing.curve();
//! assert_eq!(curve.evaluate(0.0), 0.0);
//! assert_eq!(curve.evaluate(1.0), 1.0);
//! ```

use serde::{Deserialize, Serialize};
use tabzoom_config::SpringConfig;

/// ln(1000): envelope decay reached at the end of the duration.
const SETTLE_DECAY: f32 = 6.907_755;

/// Damping ratios this close to 1.0 use the critically damped solution.
const CRITICAL_EPSILON: f32 = 1e-3;

/// Maps linear progress (0.0 to 1.0) to eased progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimingCurve {
    /// Linear interpolation (no easing).
    Linear,
    /// Damped spring. `velocity` is in units of total travel per unit of
    /// normalised time.
    Spring { damping_ratio: f32, velocity: f32 },
}

impl Default for TimingCurve {
    fn default() -> Self {
        Self::Linear
    }
}

impl TimingCurve {
    /// Evaluate the curve at the given progress.
    ///
    /// Input is clamped to `[0, 1]`. Spring output may briefly exceed 1.0.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t >= 1.0 {
            return 1.0;
        }

        match *self {
            Self::Linear => t,
            Self::Spring {
                damping_ratio,
                velocity,
            } => spring_position(damping_ratio, velocity, t),
        }
    }
}

/// Duration and spring parameters for one animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringTiming {
    pub duration_ms: f32,
    pub damping_ratio: f32,
    /// Initial velocity in units of total travel per second.
    pub initial_velocity: f32,
}

impl SpringTiming {
    pub const fn new(duration_ms: f32, damping_ratio: f32, initial_velocity: f32) -> Self {
        Self {
            duration_ms,
            damping_ratio,
            initial_velocity,
        }
    }

    /// Curve over normalised time for this timing.
    pub fn curve(&self) -> TimingCurve {
        let damping_ratio = if self.damping_ratio > 0.0 {
            self.damping_ratio
        } else {
            1.0
        };
        TimingCurve::Spring {
            damping_ratio,
            velocity: self.initial_velocity * self.duration_ms.max(0.0) / 1000.0,
        }
    }
}

impl From<SpringConfig> for SpringTiming {
    fn from(config: SpringConfig) -> Self {
        Self::new(
            config.duration_ms,
            config.damping_ratio,
            config.initial_velocity,
        )
    }
}

/// Position of a unit spring released from 0 with velocity `v`.
fn spring_position(zeta: f32, v: f32, u: f32) -> f32 {
    let omega = SETTLE_DECAY / zeta;
    let decay = (-zeta * omega * u).exp();

    let remaining = if zeta < 1.0 - CRITICAL_EPSILON {
        // Underdamped: oscillates around the target
        let omega_d = omega * (1.0 - zeta * zeta).sqrt();
        let b = (zeta * omega - v) / omega_d;
        decay * ((omega_d * u).cos() + b * (omega_d * u).sin())
    } else if zeta <= 1.0 + CRITICAL_EPSILON {
        // Critically damped: fastest approach without overshoot
        (-omega * u).exp() * (1.0 + (omega - v) * u)
    } else {
        // Overdamped: slow approach without overshoot
        let gamma = omega * (zeta * zeta - 1.0).sqrt();
        let b = (zeta * omega - v) / gamma;
        decay * ((gamma * u).cosh() + b * (gamma * u).sinh())
    };

    1.0 - remaining
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_linear() {
        let curve = TimingCurve::Linear;
        assert!(approx_eq(curve.evaluate(0.0), 0.0));
        assert!(approx_eq(curve.evaluate(0.25), 0.25));
        assert!(approx_eq(curve.evaluate(0.75), 0.75));
        assert!(approx_eq(curve.evaluate(1.0), 1.0));
    }

    #[test]
    fn test_spring_boundaries() {
        for timing in [
            SpringTiming::new(700.0, 0.99, 9.0),
            SpringTiming::new(250.0, 0.99, 6.0),
            SpringTiming::new(500.0, 0.99, 4.0),
            SpringTiming::new(300.0, 1.0, 0.0),
            SpringTiming::new(300.0, 1.05, 2.0),
            SpringTiming::new(300.0, 0.5, 0.0),
        ] {
            let curve = timing.curve();
            assert_eq!(curve.evaluate(0.0), 0.0, "{timing:?}");
            assert_eq!(curve.evaluate(1.0), 1.0, "{timing:?}");
            // Settled to within a few percent just before the end
            assert!((curve.evaluate(0.999) - 1.0).abs() < 0.05, "{timing:?}");
        }
    }

    #[test]
    fn test_heavily_damped_spring_progresses() {
        let curve = SpringTiming::new(700.0, 0.99, 9.0).curve();
        let quarter = curve.evaluate(0.25);
        let half = curve.evaluate(0.5);
        assert!(quarter > 0.5, "fast start expected, got {quarter}");
        assert!(half > quarter);
    }

    #[test]
    fn test_initial_velocity_speeds_up_start() {
        let slow = SpringTiming::new(500.0, 0.99, 0.0).curve();
        let fast = SpringTiming::new(500.0, 0.99, 8.0).curve();
        assert!(fast.evaluate(0.1) > slow.evaluate(0.1));
    }

    #[test]
    fn test_clamping() {
        let curve = SpringTiming::new(250.0, 0.99, 6.0).curve();
        assert!(approx_eq(curve.evaluate(-0.5), 0.0));
        assert!(approx_eq(curve.evaluate(1.5), 1.0));
    }

    #[test]
    fn test_velocity_normalised_by_duration() {
        let curve = SpringTiming::new(500.0, 0.99, 4.0).curve();
        assert_eq!(
            curve,
            TimingCurve::Spring {
                damping_ratio: 0.99,
                velocity: 2.0
            }
        );
    }

    #[test]
    fn test_from_config() {
        let timing = SpringTiming::from(SpringConfig::new(250.0, 0.99, 6.0));
        assert_eq!(timing, SpringTiming::new(250.0, 0.99, 6.0));
    }

    #[test]
    fn test_default() {
        assert_eq!(TimingCurve::default(), TimingCurve::Linear);
    }
}
