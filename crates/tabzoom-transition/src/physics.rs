//! Drag-to-geometry functions for the interactive dismiss.
//!
//! All functions are pure. `GestureConfig` supplies the constants; the
//! defaults reproduce the shipped feel:
//!
//! ```text
//! scale(c)        = 1 / (c + 1.414)² + 0.5          c = min(|Δ| / H, 1) × 10
//! displacement(d) = (1 − 0.5·d⁴) × H × d            d = min(|Δ| / H, 0.35)
//! ```

use tabzoom_config::{DismissDirection, GestureConfig};

use crate::geometry::Point;
use crate::types::Resolution;

/// Portion of the raw translation that drives the effect.
///
/// Only movement in the dismiss direction counts; the rest is clamped to 0.
/// The sign is preserved so callers can still tell the direction apart.
pub fn vertical_delta(translation_y: f32, direction: DismissDirection) -> f32 {
    match direction {
        DismissDirection::Up => translation_y.min(0.0),
        DismissDirection::Down => translation_y.max(0.0),
    }
}

/// Scale coefficient in `[0, drag_gain]` for a drag of `delta` points.
pub fn drag_coefficient(delta: f32, container_height: f32, config: &GestureConfig) -> f32 {
    if container_height <= 0.0 {
        return 0.0;
    }
    (delta.abs() / container_height).min(1.0) * config.drag_gain
}

/// Inverse-square ease-out: near 1.0 at rest, approaching `scale_floor`.
pub fn scale_for_coefficient(coefficient: f32, config: &GestureConfig) -> f32 {
    let x = coefficient + config.scale_offset;
    1.0 / (x * x) + config.scale_floor
}

pub fn scale_for_drag(delta: f32, container_height: f32, config: &GestureConfig) -> f32 {
    scale_for_coefficient(drag_coefficient(delta, container_height, config), config)
}

/// Lift in points for a drag fraction already capped at
/// `max_displacement_fraction`.
pub fn displacement_for_fraction(fraction: f32, container_height: f32) -> f32 {
    (1.0 - 0.5 * fraction.powi(4)) * container_height * fraction
}

pub fn displacement_for_drag(delta: f32, container_height: f32, config: &GestureConfig) -> f32 {
    if container_height <= 0.0 {
        return 0.0;
    }
    let fraction = (delta.abs() / container_height).min(config.max_displacement_fraction);
    displacement_for_fraction(fraction, container_height)
}

/// Decide how a released drag resolves.
///
/// Cancels when the finger was moving back toward the start, or when the
/// overlay has not travelled far enough.
pub fn resolve_release(velocity: Point, displacement: f32, config: &GestureConfig) -> Resolution {
    let moving_back = match config.dismiss_direction {
        DismissDirection::Up => velocity.y > 0.0,
        DismissDirection::Down => velocity.y < 0.0,
    };

    if moving_back || displacement < config.commit_displacement {
        Resolution::Cancel
    } else {
        Resolution::Commit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_scale_endpoints() {
        let config = GestureConfig::default();
        // 1 / 1.414² + 0.5
        assert!(approx_eq(scale_for_coefficient(0.0, &config), 1.000_15));
        assert!(approx_eq(scale_for_coefficient(10.0, &config), 0.507_68));
    }

    #[test]
    fn test_scale_strictly_decreasing() {
        let config = GestureConfig::default();
        let mut previous = scale_for_coefficient(0.0, &config);
        for step in 1..=100 {
            let current = scale_for_coefficient(step as f32 * 0.1, &config);
            assert!(current < previous, "scale not decreasing at step {step}");
            assert!(current > config.scale_floor);
            previous = current;
        }
    }

    #[test]
    fn test_drag_coefficient_is_capped() {
        let config = GestureConfig::default();
        assert_eq!(drag_coefficient(0.0, 800.0, &config), 0.0);
        assert!(approx_eq(drag_coefficient(-400.0, 800.0, &config), 5.0));
        assert_eq!(drag_coefficient(-5_000.0, 800.0, &config), 10.0);
        assert_eq!(drag_coefficient(-100.0, 0.0, &config), 0.0);
    }

    #[test]
    fn test_displacement_at_rest_is_zero() {
        assert_eq!(displacement_for_fraction(0.0, 800.0), 0.0);
        assert_eq!(displacement_for_drag(0.0, 800.0, &GestureConfig::default()), 0.0);
    }

    #[test]
    fn test_displacement_increasing_on_domain() {
        let mut previous = displacement_for_fraction(0.0, 800.0);
        for step in 1..=35 {
            let current = displacement_for_fraction(step as f32 * 0.01, 800.0);
            assert!(current >= 0.0);
            assert!(current > previous, "displacement not increasing at step {step}");
            previous = current;
        }
    }

    #[test]
    fn test_displacement_saturates_past_cap() {
        let config = GestureConfig::default();
        let at_cap = displacement_for_drag(-280.0, 800.0, &config);
        let beyond = displacement_for_drag(-700.0, 800.0, &config);
        assert_eq!(at_cap, beyond);
        assert!(approx_eq(at_cap, (1.0 - 0.5 * 0.35f32.powi(4)) * 800.0 * 0.35));
    }

    #[test]
    fn test_vertical_delta_sign_convention() {
        assert_eq!(vertical_delta(40.0, DismissDirection::Up), 0.0);
        assert_eq!(vertical_delta(-40.0, DismissDirection::Up), -40.0);
        assert_eq!(vertical_delta(40.0, DismissDirection::Down), 40.0);
        assert_eq!(vertical_delta(-40.0, DismissDirection::Down), 0.0);
    }

    #[test]
    fn test_release_decisions() {
        let config = GestureConfig::default();
        assert_eq!(
            resolve_release(Point::new(0.0, 5.0), 80.0, &config),
            Resolution::Cancel
        );
        assert_eq!(
            resolve_release(Point::new(0.0, -5.0), 30.0, &config),
            Resolution::Cancel
        );
        assert_eq!(
            resolve_release(Point::new(0.0, -5.0), 120.0, &config),
            Resolution::Commit
        );
    }

    #[test]
    fn test_release_decisions_mirror_for_downward_dismiss() {
        let config = GestureConfig {
            dismiss_direction: DismissDirection::Down,
            ..GestureConfig::default()
        };
        assert_eq!(
            resolve_release(Point::new(0.0, -5.0), 120.0, &config),
            Resolution::Cancel
        );
        assert_eq!(
            resolve_release(Point::new(0.0, 5.0), 120.0, &config),
            Resolution::Commit
        );
    }
}
