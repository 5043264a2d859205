//! Deterministic zoom transition for button-triggered navigation.
//!
//! Forward (grid → browser) grows the selected thumbnail into the full
//! screen; Backward shrinks the full screen back into its thumbnail. Both
//! run on a fixed-duration spring. The snapshot's status-bar area is
//! scrolled out of the clip while the overlay is thumbnail-sized and scrolled
//! back in as it reaches full width, so the thumbnail appears to "uncrop".

use tabzoom_config::TransitionConfig;

use crate::events::{EventQueue, TransitionEvent};
use crate::geometry::ScreenMetrics;
use crate::overlay::{OverlayGeometry, OverlayTrack, TransitionOverlay};
use crate::target::{Participants, ResolvedTargets, Snapshot};
use crate::timeline::Timeline;
use crate::timing::SpringTiming;
use crate::types::{
    Participant, Placement, TransitionId, TransitionMode, TransitionOperation, ViewState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Ready,
    Running,
    Completed,
}

/// Animator for one push or pop.
#[derive(Debug)]
pub struct AnimatedTransition {
    id: TransitionId,
    operation: TransitionOperation,
    participants: Participants,
    metrics: ScreenMetrics,
    config: TransitionConfig,
    timing: SpringTiming,
    stage: Stage,
    timeline: Option<Timeline>,
    track: Option<OverlayTrack>,
    overlay: Option<TransitionOverlay>,
    last_geometry: OverlayGeometry,
    views: ViewState,
    cancelled_upstream: bool,
}

impl AnimatedTransition {
    pub fn new(
        operation: TransitionOperation,
        participants: Participants,
        metrics: ScreenMetrics,
        config: &TransitionConfig,
    ) -> Self {
        let timing = match operation {
            TransitionOperation::Forward => SpringTiming::from(config.forward),
            TransitionOperation::Backward => SpringTiming::from(config.backward),
        };

        Self {
            id: TransitionId::new(),
            operation,
            participants,
            metrics,
            config: config.clone(),
            timing,
            stage: Stage::Ready,
            timeline: None,
            track: None,
            overlay: None,
            last_geometry: OverlayGeometry::default(),
            views: ViewState::default(),
            cancelled_upstream: false,
        }
    }

    pub fn id(&self) -> TransitionId {
        self.id
    }

    pub fn operation(&self) -> TransitionOperation {
        self.operation
    }

    /// Duration the host's navigation stack should budget for.
    pub fn duration_ms(&self) -> f32 {
        self.timing.duration_ms
    }

    pub fn timing(&self) -> SpringTiming {
        self.timing
    }

    /// Hand the screens over to another driver before the animation starts.
    pub(crate) fn into_parts(self) -> (TransitionOperation, Participants) {
        (self.operation, self.participants)
    }

    /// Prepare both screens and install the overlay at its source geometry.
    pub fn start(&mut self, events: &mut EventQueue) {
        if self.stage != Stage::Ready {
            log::warn!("transition {:?} already started", self.id);
            return;
        }

        self.participants.will_start();
        let targets = self.participants.resolve_targets(&self.metrics);
        let (snapshot, track, views) = self.plan(&targets);

        self.last_geometry = track.from;
        self.overlay = Some(TransitionOverlay::new(snapshot, track.from));
        self.track = Some(track);
        self.views = views;
        self.timeline = Some(Timeline::new(self.timing));
        self.stage = Stage::Running;

        log::debug!(
            "transition {:?} started: {:?} {:?} -> {:?} over {}ms",
            self.id,
            self.operation,
            track.from.frame,
            track.to.frame,
            self.timing.duration_ms
        );
        events.push(TransitionEvent::Started {
            transition_id: self.id,
            operation: self.operation,
            mode: TransitionMode::Animated,
        });
    }

    fn plan(&self, targets: &ResolvedTargets) -> (Option<Snapshot>, OverlayTrack, ViewState) {
        let small = self.config.small_corner_radius;
        let full = self.config.full_corner_radius;
        let from = targets.from.frame;
        let to = targets.to.frame;

        match self.operation {
            TransitionOperation::Forward => {
                let initial_offset = self.metrics.content_offset_for_width(from.w);
                let track = OverlayTrack::new(
                    OverlayGeometry::new(from, small, initial_offset),
                    OverlayGeometry::new(to, full, 0.0),
                );
                let views = ViewState {
                    outgoing_alpha: 1.0,
                    incoming_alpha: 0.0,
                    incoming_placement: Placement::Above,
                };
                (targets.from.snapshot.clone(), track, views)
            }
            TransitionOperation::Backward => {
                let final_offset = self.metrics.content_offset_for_width(to.w);
                let track = OverlayTrack::new(
                    OverlayGeometry::new(from, full, 0.0),
                    OverlayGeometry::new(to, small, -final_offset),
                );
                let views = ViewState {
                    outgoing_alpha: 0.0,
                    incoming_alpha: 1.0,
                    incoming_placement: Placement::Below,
                };
                (targets.to.snapshot.clone(), track, views)
            }
        }
    }

    /// Advance the animation by one frame.
    ///
    /// Returns `true` while the animation is still running.
    pub fn tick(&mut self, delta_ms: f32, events: &mut EventQueue) -> bool {
        if self.stage != Stage::Running {
            return false;
        }
        let (Some(timeline), Some(track)) = (self.timeline.as_mut(), self.track.as_ref()) else {
            return false;
        };

        let running = timeline.update(delta_ms);
        let geometry = track.sample(timeline.eased());
        self.last_geometry = geometry;
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.geometry = geometry;
        }
        log::trace!(
            "transition {:?} t={:.3} frame={:?} radius={:.1}",
            self.id,
            timeline.progress(),
            geometry.frame,
            geometry.corner_radius
        );

        if !running {
            self.complete(events);
        }
        running
    }

    /// Record that the host's navigation stack cancelled this transition.
    pub fn mark_cancelled(&mut self) {
        self.cancelled_upstream = true;
    }

    /// Tear down the overlay, report completion, then release both screens.
    ///
    /// Returns `false` when the transition had already completed or never
    /// started.
    pub fn complete(&mut self, events: &mut EventQueue) -> bool {
        if self.stage != Stage::Running {
            return false;
        }
        self.stage = Stage::Completed;

        self.views.set_alpha(Participant::Incoming, 1.0);
        self.overlay = None;
        let did_complete = !self.cancelled_upstream;
        events.push(TransitionEvent::Completed {
            transition_id: self.id,
            operation: self.operation,
            did_complete,
        });
        self.participants.did_end();

        log::debug!(
            "transition {:?} completed (did_complete: {did_complete})",
            self.id
        );
        true
    }

    pub fn overlay(&self) -> Option<&TransitionOverlay> {
        self.overlay.as_ref()
    }

    /// Geometry of the most recent frame, kept after the overlay is removed.
    pub fn last_geometry(&self) -> OverlayGeometry {
        self.last_geometry
    }

    pub fn view_state(&self) -> ViewState {
        self.views
    }

    pub fn is_running(&self) -> bool {
        self.stage == Stage::Running
    }

    pub fn is_completed(&self) -> bool {
        self.stage == Stage::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, Size};
    use crate::target::{TransitionProvider, TransitionTarget};

    struct Fixed(Rect);

    impl TransitionProvider for Fixed {
        fn target(&self) -> TransitionTarget {
            TransitionTarget::simple(None, self.0)
        }
    }

    fn animator(operation: TransitionOperation, from: Rect, to: Rect) -> AnimatedTransition {
        AnimatedTransition::new(
            operation,
            Participants::new(Box::new(Fixed(from)), Box::new(Fixed(to))),
            ScreenMetrics::new(Size::new(400.0, 800.0), 40.0),
            &TransitionConfig::default(),
        )
    }

    #[test]
    fn test_durations_follow_operation() {
        let cell = Rect::new(20.0, 100.0, 100.0, 200.0);
        let screen = Rect::new(0.0, 0.0, 400.0, 800.0);
        assert_eq!(
            animator(TransitionOperation::Forward, cell, screen).duration_ms(),
            700.0
        );
        assert_eq!(
            animator(TransitionOperation::Backward, screen, cell).duration_ms(),
            250.0
        );
    }

    #[test]
    fn test_backward_plan() {
        let cell = Rect::new(20.0, 100.0, 100.0, 200.0);
        let screen = Rect::new(0.0, 0.0, 400.0, 800.0);
        let mut events = EventQueue::new();
        let mut transition = animator(TransitionOperation::Backward, screen, cell);
        transition.start(&mut events);

        let overlay = transition.overlay().unwrap();
        assert_eq!(overlay.frame(), screen);
        assert_eq!(overlay.corner_radius(), 50.0);
        assert_eq!(overlay.content_offset_y(), 0.0);

        let views = transition.view_state();
        assert_eq!(views.outgoing_alpha, 0.0);
        assert_eq!(views.incoming_placement, Placement::Below);

        while transition.tick(16.0, &mut events) {}
        let last = transition.last_geometry();
        assert_eq!(last.frame, cell);
        assert_eq!(last.corner_radius, 16.0);
        // 40 * (100 / 400)
        assert_eq!(last.content_offset_y, -10.0);
    }

    #[test]
    fn test_tick_before_start_does_nothing() {
        let mut events = EventQueue::new();
        let mut transition = animator(
            TransitionOperation::Forward,
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(0.0, 0.0, 20.0, 20.0),
        );
        assert!(!transition.tick(16.0, &mut events));
        assert!(!transition.complete(&mut events));
        assert!(events.is_empty());
    }

    #[test]
    fn test_upstream_cancel_reported() {
        let mut events = EventQueue::new();
        let mut transition = animator(
            TransitionOperation::Forward,
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(0.0, 0.0, 20.0, 20.0),
        );
        transition.start(&mut events);
        transition.mark_cancelled();
        transition.tick(1_000.0, &mut events);

        let completed: Vec<_> = events.drain().filter(|e| e.is_completed()).collect();
        assert_eq!(
            completed,
            vec![TransitionEvent::Completed {
                transition_id: transition.id(),
                operation: TransitionOperation::Forward,
                did_complete: false,
            }]
        );
    }
}
