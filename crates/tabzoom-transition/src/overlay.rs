//! The ephemeral transition view.
//!
//! While a transition runs, the host hides the real screen views as told by
//! `ViewState` and draws a single [`TransitionOverlay`] instead: a snapshot
//! clipped to `frame` with rounded corners, shifted vertically inside its
//! clip by `content_offset_y`.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::interpolate::Interpolate;
use crate::target::Snapshot;

/// Animatable part of the overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlayGeometry {
    pub frame: Rect,
    pub corner_radius: f32,
    /// Vertical offset of the snapshot inside the clipping frame.
    pub content_offset_y: f32,
}

impl OverlayGeometry {
    pub fn new(frame: Rect, corner_radius: f32, content_offset_y: f32) -> Self {
        Self {
            frame,
            corner_radius,
            content_offset_y,
        }
    }
}

impl Interpolate for OverlayGeometry {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Self {
            frame: self.frame.interpolate(&to.frame, t),
            corner_radius: self.corner_radius.interpolate(&to.corner_radius, t),
            content_offset_y: self.content_offset_y.interpolate(&to.content_offset_y, t),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransitionOverlay {
    pub snapshot: Option<Snapshot>,
    pub geometry: OverlayGeometry,
}

impl TransitionOverlay {
    pub fn new(snapshot: Option<Snapshot>, geometry: OverlayGeometry) -> Self {
        Self { snapshot, geometry }
    }

    pub fn frame(&self) -> Rect {
        self.geometry.frame
    }

    pub fn corner_radius(&self) -> f32 {
        self.geometry.corner_radius
    }

    pub fn content_offset_y(&self) -> f32 {
        self.geometry.content_offset_y
    }
}

/// Start and end geometry of one overlay animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayTrack {
    pub from: OverlayGeometry,
    pub to: OverlayGeometry,
}

impl OverlayTrack {
    pub fn new(from: OverlayGeometry, to: OverlayGeometry) -> Self {
        Self { from, to }
    }

    pub fn sample(&self, t: f32) -> OverlayGeometry {
        self.from.interpolate(&self.to, t)
    }
}
