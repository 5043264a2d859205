//! Session phase machine.
//!
//! ```text
//!   Idle ── Navigate(op) ──────────────▶ Animating(op) ── SettleFinished ──▶ Idle
//!   Idle ── DragBegan ─▶ InteractiveTracking
//!                          │  Navigate(Backward) / DragChanged (stay)
//!                          ├─ DragEnded(Commit) ─▶ Committing ─┐
//!                          ├─ DragEnded(Cancel) ─▶ Cancelling ─┴─ SettleFinished ─▶ Idle
//!                          └─ DragAbandoned ─────▶ Idle
//! ```
//!
//! Any other pairing is rejected and leaves the phase unchanged.

use serde::{Deserialize, Serialize};

use crate::types::{Resolution, TransitionOperation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "phase", content = "operation", rename_all = "snake_case")]
pub enum TransitionPhase {
    #[default]
    Idle,
    Animating(TransitionOperation),
    InteractiveTracking,
    Committing,
    Cancelling,
}

impl TransitionPhase {
    pub fn is_idle(self) -> bool {
        self == Self::Idle
    }

    /// True while the overlay settles after a released drag.
    pub fn is_settling(self) -> bool {
        matches!(self, Self::Committing | Self::Cancelling)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseInput {
    /// The host's navigation stack asked for a push or pop.
    Navigate(TransitionOperation),
    DragBegan,
    DragChanged,
    DragEnded(Resolution),
    /// The drag ended before an interactive session was installed.
    DragAbandoned,
    /// The running animation reached its last frame.
    SettleFinished,
}

/// What the coordinator must do to honour an accepted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEffect {
    StartAnimated(TransitionOperation),
    RequestPop,
    StartInteractive,
    UpdateInteractive,
    Settle(Resolution),
    Teardown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseStep {
    pub next: TransitionPhase,
    pub effect: PhaseEffect,
}

impl PhaseStep {
    const fn new(next: TransitionPhase, effect: PhaseEffect) -> Self {
        Self { next, effect }
    }
}

impl TransitionPhase {
    /// Transition function. `None` means the input is not valid here.
    pub fn step(self, input: PhaseInput) -> Option<PhaseStep> {
        use PhaseEffect as E;
        use PhaseInput as I;
        use TransitionPhase as P;

        let step = match (self, input) {
            (P::Idle, I::Navigate(op)) => PhaseStep::new(P::Animating(op), E::StartAnimated(op)),
            (P::Idle, I::DragBegan) => PhaseStep::new(P::InteractiveTracking, E::RequestPop),
            (P::InteractiveTracking, I::Navigate(TransitionOperation::Backward)) => {
                PhaseStep::new(P::InteractiveTracking, E::StartInteractive)
            }
            (P::InteractiveTracking, I::DragChanged) => {
                PhaseStep::new(P::InteractiveTracking, E::UpdateInteractive)
            }
            (P::InteractiveTracking, I::DragEnded(resolution)) => {
                let next = match resolution {
                    Resolution::Commit => P::Committing,
                    Resolution::Cancel => P::Cancelling,
                };
                PhaseStep::new(next, E::Settle(resolution))
            }
            (P::InteractiveTracking, I::DragAbandoned) => PhaseStep::new(P::Idle, E::Teardown),
            (P::Animating(_) | P::Committing | P::Cancelling, I::SettleFinished) => {
                PhaseStep::new(P::Idle, E::Teardown)
            }
            _ => return None,
        };
        Some(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_PHASES: [TransitionPhase; 6] = [
        TransitionPhase::Idle,
        TransitionPhase::Animating(TransitionOperation::Forward),
        TransitionPhase::Animating(TransitionOperation::Backward),
        TransitionPhase::InteractiveTracking,
        TransitionPhase::Committing,
        TransitionPhase::Cancelling,
    ];

    #[test]
    fn test_animated_round_trip() {
        let s = TransitionPhase::Idle
            .step(PhaseInput::Navigate(TransitionOperation::Forward))
            .unwrap();
        assert_eq!(s.next, TransitionPhase::Animating(TransitionOperation::Forward));
        assert_eq!(s.effect, PhaseEffect::StartAnimated(TransitionOperation::Forward));

        let s = s.next.step(PhaseInput::SettleFinished).unwrap();
        assert_eq!(s.next, TransitionPhase::Idle);
        assert_eq!(s.effect, PhaseEffect::Teardown);
    }

    #[test]
    fn test_interactive_path() {
        let s = TransitionPhase::Idle.step(PhaseInput::DragBegan).unwrap();
        assert_eq!(s.effect, PhaseEffect::RequestPop);

        let s = s.next.step(PhaseInput::Navigate(TransitionOperation::Backward)).unwrap();
        assert_eq!(s.next, TransitionPhase::InteractiveTracking);
        assert_eq!(s.effect, PhaseEffect::StartInteractive);

        let s = s.next.step(PhaseInput::DragChanged).unwrap();
        assert_eq!(s.effect, PhaseEffect::UpdateInteractive);

        let s = s.next.step(PhaseInput::DragEnded(Resolution::Cancel)).unwrap();
        assert_eq!(s.next, TransitionPhase::Cancelling);
        assert!(s.next.is_settling());

        let s = s.next.step(PhaseInput::SettleFinished).unwrap();
        assert!(s.next.is_idle());
    }

    #[test]
    fn test_nothing_starts_while_busy() {
        for phase in ALL_PHASES.into_iter().filter(|p| !p.is_idle()) {
            assert_eq!(phase.step(PhaseInput::DragBegan), None, "{phase:?}");
            assert_eq!(
                phase.step(PhaseInput::Navigate(TransitionOperation::Forward)),
                None,
                "{phase:?}"
            );
        }
    }

    #[test]
    fn test_idle_ignores_drag_and_settle_inputs() {
        for input in [
            PhaseInput::DragChanged,
            PhaseInput::DragEnded(Resolution::Commit),
            PhaseInput::DragAbandoned,
            PhaseInput::SettleFinished,
        ] {
            assert_eq!(TransitionPhase::Idle.step(input), None, "{input:?}");
        }
    }

    #[test]
    fn test_abandoned_drag_returns_to_idle() {
        let s = TransitionPhase::InteractiveTracking
            .step(PhaseInput::DragAbandoned)
            .unwrap();
        assert_eq!(s.next, TransitionPhase::Idle);
    }
}
