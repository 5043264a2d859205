//! Interpolation for the values the zoom overlay animates.
//!
//! Spring curves overshoot slightly, so `t` is not clamped: a factor above
//! 1.0 extrapolates past the destination the same way the spring does.

use crate::geometry::{Point, Rect, Size};

/// Trait for types that can be interpolated between two values.
pub trait Interpolate: Sized {
    /// Interpolate between self and another value.
    ///
    /// When t = 0.0, returns self.
    /// When t = 1.0, returns to.
    fn interpolate(&self, to: &Self, t: f32) -> Self;
}

#[inline]
fn lerp_f32(from: f32, to: f32, t: f32) -> f32 {
    from * (1.0 - t) + to * t
}

impl Interpolate for f32 {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        lerp_f32(*self, *to, t)
    }
}

impl Interpolate for Point {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Self {
            x: lerp_f32(self.x, to.x, t),
            y: lerp_f32(self.y, to.y, t),
        }
    }
}

impl Interpolate for Size {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Self {
            w: lerp_f32(self.w, to.w, t),
            h: lerp_f32(self.h, to.h, t),
        }
    }
}

impl Interpolate for Rect {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Self {
            x: lerp_f32(self.x, to.x, t),
            y: lerp_f32(self.y, to.y, t),
            w: lerp_f32(self.w, to.w, t),
            h: lerp_f32(self.h, to.h, t),
        }
    }
}
