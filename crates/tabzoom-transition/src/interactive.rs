//! Gesture-driven dismiss of the browser back into the tab grid.
//!
//! While the finger moves, the full-screen overlay shrinks along an
//! inverse-square curve and lifts toward its thumbnail; on release the
//! session either commits (settles into the grid cell) or cancels (springs
//! back to full screen). See [`crate::physics`] for the curves.

use tabzoom_config::{DismissDirection, GestureConfig, TransitionConfig};

use crate::error::{Result, TransitionError};
use crate::events::{EventQueue, TransitionEvent};
use crate::geometry::{Point, Rect, ScreenMetrics};
use crate::interpolate::Interpolate;
use crate::overlay::{OverlayGeometry, OverlayTrack, TransitionOverlay};
use crate::physics;
use crate::target::{Participants, ResolvedTargets};
use crate::timeline::Timeline;
use crate::timing::SpringTiming;
use crate::types::{
    Participant, Placement, Resolution, TransitionId, TransitionMode, TransitionOperation,
    ViewState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Ready,
    Tracking,
    Settling(Resolution),
    Done(Resolution),
}

/// Geometry computed for one drag sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragFrame {
    pub scale: f32,
    pub displacement: f32,
    /// Progress reported to the host, `1 - scale` clamped to `[0, 1]`.
    pub percent: f32,
    pub frame: Rect,
}

#[derive(Debug)]
struct Settle {
    timeline: Timeline,
    track: OverlayTrack,
    outgoing_alpha_from: f32,
    outgoing_alpha_to: f32,
}

/// Interaction driver for a drag-initiated pop.
#[derive(Debug)]
pub struct InteractiveTransition {
    id: TransitionId,
    participants: Participants,
    metrics: ScreenMetrics,
    transition: TransitionConfig,
    gesture: GestureConfig,
    stage: Stage,
    targets: Option<ResolvedTargets>,
    overlay: Option<TransitionOverlay>,
    last_geometry: OverlayGeometry,
    views: ViewState,
    last_frame: Option<DragFrame>,
    settle: Option<Settle>,
}

impl InteractiveTransition {
    pub fn new(
        participants: Participants,
        metrics: ScreenMetrics,
        transition: &TransitionConfig,
        gesture: &GestureConfig,
    ) -> Self {
        Self {
            id: TransitionId::new(),
            participants,
            metrics,
            transition: transition.clone(),
            gesture: gesture.clone(),
            stage: Stage::Ready,
            targets: None,
            overlay: None,
            last_geometry: OverlayGeometry::default(),
            views: ViewState::default(),
            last_frame: None,
            settle: None,
        }
    }

    pub fn id(&self) -> TransitionId {
        self.id
    }

    /// Interactive sessions are always pops.
    pub fn operation(&self) -> TransitionOperation {
        TransitionOperation::Backward
    }

    /// Hand the screens over to another driver before the session starts.
    pub(crate) fn into_participants(self) -> Participants {
        self.participants
    }

    /// Prepare both screens and install the full-screen overlay.
    pub fn start(&mut self, events: &mut EventQueue) {
        if self.stage != Stage::Ready {
            log::warn!("interactive transition {:?} already started", self.id);
            return;
        }

        self.participants.will_start();
        let targets = self.participants.resolve_targets(&self.metrics);

        let geometry =
            OverlayGeometry::new(targets.from.frame, self.transition.full_corner_radius, 0.0);
        self.overlay = Some(TransitionOverlay::new(targets.to.snapshot.clone(), geometry));
        self.last_geometry = geometry;
        self.views = ViewState {
            outgoing_alpha: 1.0,
            incoming_alpha: 1.0,
            incoming_placement: Placement::Below,
        };
        self.targets = Some(targets);
        self.stage = Stage::Tracking;

        log::debug!("interactive transition {:?} started", self.id);
        events.push(TransitionEvent::Started {
            transition_id: self.id,
            operation: TransitionOperation::Backward,
            mode: TransitionMode::Interactive,
        });
    }

    /// Apply one drag sample.
    pub fn update(&mut self, translation: Point, events: &mut EventQueue) -> Result<DragFrame> {
        if self.stage != Stage::Tracking {
            return Err(TransitionError::NoSession);
        }
        let Some(targets) = self.targets.as_ref() else {
            return Err(TransitionError::NoSession);
        };

        let drag = drag_frame(
            targets.from.frame,
            translation,
            self.metrics.screen_size.h,
            &self.gesture,
        );

        self.views.set_alpha(Participant::Outgoing, 0.0);
        self.last_geometry.frame = drag.frame;
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.geometry.frame = drag.frame;
        }
        self.last_frame = Some(drag);

        log::trace!(
            "interactive {:?} scale={:.3} displacement={:.1}",
            self.id,
            drag.scale,
            drag.displacement
        );
        events.push(TransitionEvent::InteractiveProgress {
            transition_id: self.id,
            percent: drag.percent,
        });
        Ok(drag)
    }

    /// Apply the final sample and decide between commit and cancel.
    ///
    /// The decision starts a settle animation; the session completes on a
    /// later `tick`.
    pub fn release(
        &mut self,
        translation: Point,
        velocity: Point,
        events: &mut EventQueue,
    ) -> Result<Resolution> {
        let drag = self.update(translation, events)?;
        let resolution = physics::resolve_release(velocity, drag.displacement, &self.gesture);
        let Some(targets) = self.targets.as_ref() else {
            return Err(TransitionError::NoSession);
        };

        let current = self.last_geometry;
        let (destination, timing, alpha_to) = match resolution {
            Resolution::Cancel => (
                OverlayGeometry::new(targets.from.frame, current.corner_radius, 0.0),
                SpringTiming::from(self.transition.interactive_cancel),
                1.0,
            ),
            Resolution::Commit => (
                OverlayGeometry::new(targets.to.frame, self.transition.small_corner_radius, 0.0),
                SpringTiming::from(self.transition.interactive_commit),
                0.0,
            ),
        };

        self.settle = Some(Settle {
            timeline: Timeline::new(timing),
            track: OverlayTrack::new(current, destination),
            outgoing_alpha_from: self.views.outgoing_alpha,
            outgoing_alpha_to: alpha_to,
        });
        self.stage = Stage::Settling(resolution);

        log::debug!(
            "interactive {:?} released: velocity={:?} displacement={:.1} -> {:?}",
            self.id,
            velocity,
            drag.displacement,
            resolution
        );
        Ok(resolution)
    }

    /// Advance the settle animation.
    ///
    /// Returns `true` while it is still running.
    pub fn tick(&mut self, delta_ms: f32, events: &mut EventQueue) -> bool {
        let Stage::Settling(resolution) = self.stage else {
            return false;
        };
        let Some(settle) = self.settle.as_mut() else {
            return false;
        };

        let running = settle.timeline.update(delta_ms);
        let t = settle.timeline.eased();
        let geometry = settle.track.sample(t);
        let alpha = settle
            .outgoing_alpha_from
            .interpolate(&settle.outgoing_alpha_to, t)
            .clamp(0.0, 1.0);

        self.last_geometry = geometry;
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.geometry = geometry;
        }
        self.views.set_alpha(Participant::Outgoing, alpha);

        if !running {
            self.finish(resolution, events);
        }
        running
    }

    fn finish(&mut self, resolution: Resolution, events: &mut EventQueue) {
        self.overlay = None;
        self.settle = None;
        self.stage = Stage::Done(resolution);

        events.push(match resolution {
            Resolution::Commit => TransitionEvent::InteractiveFinished {
                transition_id: self.id,
            },
            Resolution::Cancel => TransitionEvent::InteractiveCancelled {
                transition_id: self.id,
            },
        });
        events.push(TransitionEvent::Completed {
            transition_id: self.id,
            operation: TransitionOperation::Backward,
            did_complete: resolution.did_complete(),
        });
        self.participants.did_end();

        log::debug!("interactive transition {:?} ended: {:?}", self.id, resolution);
    }

    pub fn overlay(&self) -> Option<&TransitionOverlay> {
        self.overlay.as_ref()
    }

    pub fn last_geometry(&self) -> OverlayGeometry {
        self.last_geometry
    }

    pub fn last_drag_frame(&self) -> Option<DragFrame> {
        self.last_frame
    }

    pub fn view_state(&self) -> ViewState {
        self.views
    }

    pub fn is_tracking(&self) -> bool {
        self.stage == Stage::Tracking
    }

    pub fn is_settling(&self) -> bool {
        matches!(self.stage, Stage::Settling(_))
    }

    pub fn is_done(&self) -> bool {
        matches!(self.stage, Stage::Done(_))
    }

    /// Resolution once the drag has been released.
    pub fn resolution(&self) -> Option<Resolution> {
        match self.stage {
            Stage::Settling(r) | Stage::Done(r) => Some(r),
            Stage::Ready | Stage::Tracking => None,
        }
    }
}

/// Overlay geometry for a drag of `translation` away from `from`.
///
/// The overlay shrinks toward the bottom edge of `from` (top edge when
/// dismissing downward), follows the finger horizontally, and lifts by the
/// displacement curve.
pub fn drag_frame(
    from: Rect,
    translation: Point,
    container_height: f32,
    config: &GestureConfig,
) -> DragFrame {
    let delta = physics::vertical_delta(translation.y, config.dismiss_direction);
    let scale = physics::scale_for_drag(delta, container_height, config);
    let displacement = physics::displacement_for_drag(delta, container_height, config);
    let size = from.scaled_size(scale);

    let x = from.x + translation.x + (from.w - size.w) / 2.0;
    let y = match config.dismiss_direction {
        DismissDirection::Up => from.y - displacement + (from.h - size.h),
        DismissDirection::Down => from.y + displacement,
    };

    DragFrame {
        scale,
        displacement,
        percent: (1.0 - scale).clamp(0.0, 1.0),
        frame: Rect::new(x, y, size.w, size.h),
    }
}
