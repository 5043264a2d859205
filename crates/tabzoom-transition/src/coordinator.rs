//! Transition coordinator: the single entry point the host talks to.
//!
//! The `TransitionCoordinator` sits between the host's navigation stack and
//! the two engines. It:
//! - Builds an animator for every push/pop and, while a dismiss drag is in
//!   progress, swaps it for an interaction driver
//! - Owns the drag recognizer and the session phase
//! - Advances whichever engine runs on each frame tick
//! - Queues `TransitionEvent`s for the host to drain
//!
//! # Usage
//!
//! ```ignore
//! let mut coordinator = TransitionCoordinator::from_config(&TabzoomConfig::load());
//!
//! // Button-driven push
//! coordinator.start_transition(TransitionOperation::Forward, grid, browser)?;
//!
//! // Pointer input; a dismiss drag asks the host for a pop
//! coordinator.handle_pointer(event);
//! for event in coordinator.drain_events() {
//!     if event == TransitionEvent::PopRequested {
//!         // host: coordinator.start_transition(TransitionOperation::Backward, browser, grid)
//!     }
//! }
//!
//! // Each frame
//! coordinator.tick(16.67);
//! if let Some(overlay) = coordinator.overlay() {
//!     // draw overlay.snapshot clipped to overlay.frame()
//! }
//! ```

use tabzoom_config::{GestureConfig, TabzoomConfig, TransitionConfig};

use crate::animated::AnimatedTransition;
use crate::error::{Result, TransitionError};
use crate::events::{EventQueue, TransitionEvent};
use crate::geometry::{Point, ScreenMetrics, Size};
use crate::gesture::{DragRecognizer, DragSample, DragState, PointerEvent};
use crate::interactive::InteractiveTransition;
use crate::overlay::{OverlayGeometry, TransitionOverlay};
use crate::phase::{PhaseEffect, PhaseInput, TransitionPhase};
use crate::target::{BoxedProvider, Participants};
use crate::types::{
    Participant, Placement, TransitionId, TransitionMode, TransitionOperation, ViewState,
};

/// Driver handed back to the navigation stack for one transition.
#[derive(Debug)]
pub enum TransitionDriver {
    Animated(AnimatedTransition),
    Interactive(InteractiveTransition),
}

impl TransitionDriver {
    pub fn id(&self) -> TransitionId {
        match self {
            Self::Animated(a) => a.id(),
            Self::Interactive(i) => i.id(),
        }
    }

    pub fn operation(&self) -> TransitionOperation {
        match self {
            Self::Animated(a) => a.operation(),
            Self::Interactive(i) => i.operation(),
        }
    }

    pub fn mode(&self) -> TransitionMode {
        match self {
            Self::Animated(_) => TransitionMode::Animated,
            Self::Interactive(_) => TransitionMode::Interactive,
        }
    }

    fn overlay(&self) -> Option<&TransitionOverlay> {
        match self {
            Self::Animated(a) => a.overlay(),
            Self::Interactive(i) => i.overlay(),
        }
    }

    fn last_geometry(&self) -> OverlayGeometry {
        match self {
            Self::Animated(a) => a.last_geometry(),
            Self::Interactive(i) => i.last_geometry(),
        }
    }

    fn view_state(&self) -> ViewState {
        match self {
            Self::Animated(a) => a.view_state(),
            Self::Interactive(i) => i.view_state(),
        }
    }
}

/// Owner of the one transition session that may be in flight.
#[derive(Debug)]
pub struct TransitionCoordinator {
    transition_config: TransitionConfig,
    gesture_config: GestureConfig,
    metrics: ScreenMetrics,

    phase: TransitionPhase,

    /// Set when a dismiss drag begins, cleared when its session tears down.
    is_interactive: bool,

    recognizer: DragRecognizer,

    /// Latest drag translation, replayed once the interactive session starts.
    pending_translation: Option<Point>,

    session: Option<TransitionDriver>,

    /// Geometry and view state of the last frame, kept after teardown.
    last_geometry: Option<OverlayGeometry>,
    views: ViewState,

    event_queue: EventQueue,
}

impl TransitionCoordinator {
    pub fn new(config: &TabzoomConfig, metrics: ScreenMetrics) -> Self {
        Self {
            transition_config: config.transition.clone(),
            gesture_config: config.gesture.clone(),
            metrics,
            phase: TransitionPhase::Idle,
            is_interactive: false,
            recognizer: DragRecognizer::new(&config.gesture),
            pending_translation: None,
            session: None,
            last_geometry: None,
            views: ViewState::default(),
            event_queue: EventQueue::new(),
        }
    }

    /// Coordinator for the screen described in the `shell` section.
    pub fn from_config(config: &TabzoomConfig) -> Self {
        let metrics = ScreenMetrics::new(
            Size::new(config.shell.screen_width, config.shell.screen_height),
            config.shell.safe_area_top_inset,
        );
        Self::new(config, metrics)
    }

    pub fn metrics(&self) -> ScreenMetrics {
        self.metrics
    }

    /// Build the animator for a push or pop between two screens.
    pub fn provide_animator(
        &self,
        operation: TransitionOperation,
        from: BoxedProvider,
        to: BoxedProvider,
    ) -> AnimatedTransition {
        AnimatedTransition::new(
            operation,
            Participants::new(from, to),
            self.metrics,
            &self.transition_config,
        )
    }

    /// Swap the animator for an interaction driver while a dismiss drag is
    /// in progress; otherwise hand the animator back unchanged.
    pub fn provide_interaction_driver(&self, animator: AnimatedTransition) -> TransitionDriver {
        if self.is_interactive && animator.operation() == TransitionOperation::Backward {
            let (_, participants) = animator.into_parts();
            TransitionDriver::Interactive(self.interactive_driver(participants))
        } else {
            TransitionDriver::Animated(animator)
        }
    }

    fn interactive_driver(&self, participants: Participants) -> InteractiveTransition {
        InteractiveTransition::new(
            participants,
            self.metrics,
            &self.transition_config,
            &self.gesture_config,
        )
    }

    /// Install `driver` as the active session and start it.
    ///
    /// Refused with [`TransitionError::Busy`] while another session is in
    /// flight; the refused driver is dropped without touching its screens.
    pub fn begin(&mut self, driver: TransitionDriver) -> Result<TransitionMode> {
        let input = PhaseInput::Navigate(driver.operation());
        let step = self.phase.step(input).filter(|_| self.session.is_none());
        let Some(step) = step else {
            log::warn!(
                "refusing {:?} transition while {:?}",
                driver.operation(),
                self.phase
            );
            return Err(TransitionError::Busy { phase: self.phase });
        };

        let mut driver = self.reconcile(driver, step.effect);
        match &mut driver {
            TransitionDriver::Animated(animator) => animator.start(&mut self.event_queue),
            TransitionDriver::Interactive(interactive) => {
                interactive.start(&mut self.event_queue);
                if let Some(translation) = self.pending_translation {
                    if let Err(err) = interactive.update(translation, &mut self.event_queue) {
                        log::warn!("replaying drag failed: {err}");
                    }
                }
            }
        }

        let mode = driver.mode();
        log::debug!(
            "transition {:?} began: {:?} -> {:?} ({mode:?})",
            driver.id(),
            self.phase,
            step.next
        );
        self.phase = step.next;
        self.sync_frame(&driver);
        self.session = Some(driver);
        Ok(mode)
    }

    /// Make the driver agree with what the phase machine decided.
    fn reconcile(&self, driver: TransitionDriver, effect: PhaseEffect) -> TransitionDriver {
        match (effect, driver) {
            (PhaseEffect::StartInteractive, TransitionDriver::Animated(animator)) => {
                let (_, participants) = animator.into_parts();
                TransitionDriver::Interactive(self.interactive_driver(participants))
            }
            (PhaseEffect::StartAnimated(op), TransitionDriver::Interactive(interactive)) => {
                TransitionDriver::Animated(AnimatedTransition::new(
                    op,
                    interactive.into_participants(),
                    self.metrics,
                    &self.transition_config,
                ))
            }
            (_, driver) => driver,
        }
    }

    /// `provide_animator`, `provide_interaction_driver` and `begin` in one call.
    pub fn start_transition(
        &mut self,
        operation: TransitionOperation,
        from: BoxedProvider,
        to: BoxedProvider,
    ) -> Result<TransitionMode> {
        let animator = self.provide_animator(operation, from, to);
        let driver = self.provide_interaction_driver(animator);
        self.begin(driver)
    }

    /// Feed one raw pointer event through the drag recognizer.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        if let Some(sample) = self.recognizer.handle(event) {
            self.handle_drag(sample);
        }
    }

    /// Apply a recognised drag sample.
    pub fn handle_drag(&mut self, sample: DragSample) {
        match sample.state {
            DragState::Began => self.drag_began(sample.translation),
            DragState::Changed => self.drag_changed(sample.translation),
            DragState::Ended => self.drag_ended(sample.translation, sample.velocity),
        }
    }

    fn drag_began(&mut self, translation: Point) {
        let Some(step) = self.phase.step(PhaseInput::DragBegan) else {
            log::debug!("ignoring drag while {:?}", self.phase);
            return;
        };
        self.phase = step.next;
        self.is_interactive = true;
        self.pending_translation = Some(translation);
        log::debug!("dismiss drag began; requesting pop");
        self.event_queue.push(TransitionEvent::PopRequested);
    }

    fn drag_changed(&mut self, translation: Point) {
        if self.phase.step(PhaseInput::DragChanged).is_none() {
            return;
        }
        self.pending_translation = Some(translation);

        let Some(TransitionDriver::Interactive(interactive)) = self.session.as_mut() else {
            return;
        };
        if let Err(err) = interactive.update(translation, &mut self.event_queue) {
            log::warn!("drag update dropped: {err}");
        }
        self.sync_session_frame();
    }

    fn drag_ended(&mut self, translation: Point, velocity: Point) {
        if self.phase != TransitionPhase::InteractiveTracking {
            return;
        }

        let resolution = match self.session.as_mut() {
            Some(TransitionDriver::Interactive(interactive)) => {
                interactive.release(translation, velocity, &mut self.event_queue)
            }
            _ => Err(TransitionError::NoSession),
        };

        let input = match resolution {
            Ok(resolution) => PhaseInput::DragEnded(resolution),
            Err(err) => {
                log::warn!("drag ended without an interactive session: {err}");
                PhaseInput::DragAbandoned
            }
        };
        if let Some(step) = self.phase.step(input) {
            log::debug!("{:?} -> {:?}", self.phase, step.next);
            self.phase = step.next;
            if step.effect == PhaseEffect::Teardown {
                self.teardown();
            }
        }
        self.sync_session_frame();
    }

    /// Advance the active session by one frame.
    ///
    /// Returns `true` while an animation is still running.
    pub fn tick(&mut self, delta_ms: f32) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };

        let running = match session {
            TransitionDriver::Animated(animator) => animator.tick(delta_ms, &mut self.event_queue),
            // Tracking sessions move with the finger, not the clock
            TransitionDriver::Interactive(interactive) if interactive.is_tracking() => return false,
            TransitionDriver::Interactive(interactive) => {
                interactive.tick(delta_ms, &mut self.event_queue)
            }
        };
        self.sync_session_frame();

        if !running {
            if let Some(step) = self.phase.step(PhaseInput::SettleFinished) {
                log::debug!("{:?} -> {:?}", self.phase, step.next);
                self.phase = step.next;
                self.teardown();
            }
        }
        running
    }

    /// Record that the host's navigation stack cancelled the running
    /// animated transition. Its completion reports `did_complete: false`.
    pub fn mark_cancelled(&mut self) {
        if let Some(TransitionDriver::Animated(animator)) = self.session.as_mut() {
            animator.mark_cancelled();
        }
    }

    fn teardown(&mut self) {
        if let Some(session) = self.session.take() {
            log::debug!("transition {:?} torn down", session.id());
        }
        self.is_interactive = false;
        self.pending_translation = None;
    }

    fn sync_session_frame(&mut self) {
        if let Some(session) = self.session.as_ref() {
            self.last_geometry = Some(session.last_geometry());
            self.views = session.view_state();
        }
    }

    fn sync_frame(&mut self, driver: &TransitionDriver) {
        self.last_geometry = Some(driver.last_geometry());
        self.views = driver.view_state();
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn is_interactive(&self) -> bool {
        self.is_interactive
    }

    pub fn has_active_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn session_id(&self) -> Option<TransitionId> {
        self.session.as_ref().map(TransitionDriver::id)
    }

    /// The overlay to draw this frame, if a session shows one.
    pub fn overlay(&self) -> Option<&TransitionOverlay> {
        self.session.as_ref().and_then(TransitionDriver::overlay)
    }

    /// Overlay geometry of the most recent frame, kept after the session ends.
    pub fn last_overlay_geometry(&self) -> Option<OverlayGeometry> {
        self.last_geometry
    }

    pub fn view_alpha(&self, participant: Participant) -> f32 {
        self.views.alpha(participant)
    }

    pub fn incoming_placement(&self) -> Placement {
        self.views.incoming_placement
    }

    /// True while the host must keep producing frames.
    pub fn needs_redraw(&self) -> bool {
        self.session.is_some()
    }

    /// Drain all pending events.
    pub fn drain_events(&mut self) -> impl Iterator<Item = TransitionEvent> + '_ {
        self.event_queue.drain()
    }

    pub fn has_pending_events(&self) -> bool {
        !self.event_queue.is_empty()
    }

    pub fn pop_event(&mut self) -> Option<TransitionEvent> {
        self.event_queue.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::target::{TransitionProvider, TransitionTarget};

    const SCREEN: Rect = Rect::new(0.0, 0.0, 400.0, 800.0);
    const CELL: Rect = Rect::new(20.0, 100.0, 100.0, 200.0);

    struct Fixed(Rect);

    impl TransitionProvider for Fixed {
        fn target(&self) -> TransitionTarget {
            TransitionTarget::simple(None, self.0)
        }
    }

    fn coordinator() -> TransitionCoordinator {
        TransitionCoordinator::new(
            &TabzoomConfig::default(),
            ScreenMetrics::new(Size::new(400.0, 800.0), 40.0),
        )
    }

    fn pointer(kind: &str, y: f32, time_ms: f64) -> PointerEvent {
        let position = Point::new(200.0, y);
        match kind {
            "down" => PointerEvent::Down { position, time_ms },
            "move" => PointerEvent::Move { position, time_ms },
            _ => PointerEvent::Up { position, time_ms },
        }
    }

    fn run_to_idle(c: &mut TransitionCoordinator) {
        for _ in 0..200 {
            if !c.tick(16.0) {
                break;
            }
        }
    }

    #[test]
    fn test_animated_forward() {
        let mut c = coordinator();
        let mode = c
            .start_transition(
                TransitionOperation::Forward,
                Box::new(Fixed(CELL)),
                Box::new(Fixed(SCREEN)),
            )
            .unwrap();
        assert_eq!(mode, TransitionMode::Animated);
        assert_eq!(c.phase(), TransitionPhase::Animating(TransitionOperation::Forward));
        assert_eq!(c.overlay().unwrap().frame(), CELL);
        assert_eq!(c.view_alpha(Participant::Incoming), 0.0);

        run_to_idle(&mut c);
        assert!(c.phase().is_idle());
        assert!(c.overlay().is_none());
        assert_eq!(c.last_overlay_geometry().unwrap().frame, SCREEN);
        assert_eq!(c.view_alpha(Participant::Incoming), 1.0);
    }

    #[test]
    fn test_busy_refusal() {
        let mut c = coordinator();
        c.start_transition(
            TransitionOperation::Forward,
            Box::new(Fixed(CELL)),
            Box::new(Fixed(SCREEN)),
        )
        .unwrap();
        let err = c
            .start_transition(
                TransitionOperation::Backward,
                Box::new(Fixed(SCREEN)),
                Box::new(Fixed(CELL)),
            )
            .unwrap_err();
        assert_eq!(
            err,
            TransitionError::Busy {
                phase: TransitionPhase::Animating(TransitionOperation::Forward)
            }
        );
    }

    #[test]
    fn test_drag_requests_pop_then_runs_interactively() {
        let mut c = coordinator();
        c.handle_pointer(pointer("down", 700.0, 0.0));
        c.handle_pointer(pointer("move", 680.0, 16.0));

        assert!(c.is_interactive());
        assert_eq!(c.phase(), TransitionPhase::InteractiveTracking);
        assert_eq!(c.pop_event(), Some(TransitionEvent::PopRequested));

        let mode = c
            .start_transition(
                TransitionOperation::Backward,
                Box::new(Fixed(SCREEN)),
                Box::new(Fixed(CELL)),
            )
            .unwrap();
        assert_eq!(mode, TransitionMode::Interactive);
        assert_eq!(c.incoming_placement(), Placement::Below);
        assert!(c
            .start_transition(
                TransitionOperation::Backward,
                Box::new(Fixed(SCREEN)),
                Box::new(Fixed(CELL)),
            )
            .is_err());
        // Replayed translation already hid the outgoing view
        assert_eq!(c.view_alpha(Participant::Outgoing), 0.0);

        c.handle_pointer(pointer("move", 500.0, 32.0));
        c.handle_pointer(pointer("move", 400.0, 48.0));
        c.handle_pointer(pointer("up", 380.0, 64.0));
        assert_eq!(c.phase(), TransitionPhase::Committing);

        run_to_idle(&mut c);
        assert!(c.phase().is_idle());
        assert!(!c.is_interactive());
        assert_eq!(c.last_overlay_geometry().unwrap().frame, CELL);

        let events: Vec<_> = c.drain_events().collect();
        assert!(events
            .iter()
            .any(|e| matches!(e, TransitionEvent::InteractiveFinished { .. })));
        assert!(events.iter().any(|e| matches!(
            e,
            TransitionEvent::Completed {
                did_complete: true,
                ..
            }
        )));
    }

    #[test]
    fn test_interactive_cancel() {
        let mut c = coordinator();
        c.handle_pointer(pointer("down", 700.0, 0.0));
        c.handle_pointer(pointer("move", 680.0, 16.0));
        c.start_transition(
            TransitionOperation::Backward,
            Box::new(Fixed(SCREEN)),
            Box::new(Fixed(CELL)),
        )
        .unwrap();
        // Short drag, released slowly
        c.handle_pointer(pointer("move", 675.0, 200.0));
        c.handle_pointer(pointer("up", 675.0, 400.0));
        assert_eq!(c.phase(), TransitionPhase::Cancelling);

        // A second pop cannot start while the first settles
        let err = c.start_transition(
            TransitionOperation::Backward,
            Box::new(Fixed(SCREEN)),
            Box::new(Fixed(CELL)),
        );
        assert_eq!(
            err,
            Err(TransitionError::Busy {
                phase: TransitionPhase::Cancelling
            })
        );

        run_to_idle(&mut c);
        assert_eq!(c.last_overlay_geometry().unwrap().frame, SCREEN);
        assert_eq!(c.view_alpha(Participant::Outgoing), 1.0);
        assert!(c.drain_events().any(|e| matches!(
            e,
            TransitionEvent::InteractiveCancelled { .. }
        )));
    }

    #[test]
    fn test_drag_released_before_pop_is_abandoned() {
        let mut c = coordinator();
        c.handle_pointer(pointer("down", 700.0, 0.0));
        c.handle_pointer(pointer("move", 600.0, 16.0));
        c.handle_pointer(pointer("up", 600.0, 32.0));
        assert!(c.phase().is_idle());
        assert!(!c.is_interactive());
    }

    #[test]
    fn test_drag_ignored_during_animation() {
        let mut c = coordinator();
        c.start_transition(
            TransitionOperation::Forward,
            Box::new(Fixed(CELL)),
            Box::new(Fixed(SCREEN)),
        )
        .unwrap();
        c.drain_events().for_each(drop);

        c.handle_pointer(pointer("down", 700.0, 0.0));
        c.handle_pointer(pointer("move", 600.0, 16.0));
        assert!(!c.is_interactive());
        assert!(!c.has_pending_events());
    }

    #[test]
    fn test_animated_backward_while_not_dragging() {
        let mut c = coordinator();
        let animator = c.provide_animator(
            TransitionOperation::Backward,
            Box::new(Fixed(SCREEN)),
            Box::new(Fixed(CELL)),
        );
        let driver = c.provide_interaction_driver(animator);
        assert_eq!(driver.mode(), TransitionMode::Animated);
        assert_eq!(c.begin(driver), Ok(TransitionMode::Animated));
        run_to_idle(&mut c);
        assert_eq!(c.last_overlay_geometry().unwrap().corner_radius, 16.0);
    }
}
