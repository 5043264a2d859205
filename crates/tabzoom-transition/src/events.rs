//! Transition lifecycle events.
//!
//! The engines never call back into the host. Everything the host's
//! navigation stack must react to is queued as a [`TransitionEvent`] and
//! drained after each `tick` or pointer event:
//!
//! ```ignore
//! coordinator.tick(16.67);
//! for event in coordinator.drain_events() {
//!     match event {
//!         TransitionEvent::PopRequested => nav.pop_with_transition(&mut coordinator),
//!         TransitionEvent::Completed { did_complete: false, .. } => nav.revert(),
//!         TransitionEvent::Completed { did_complete: true, .. } => nav.commit(),
//!         _ => {}
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::types::{TransitionId, TransitionMode, TransitionOperation};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransitionEvent {
    /// A drag began; the host should pop its top screen through the
    /// coordinator so the interactive session can attach.
    PopRequested,
    /// A session took over the screens.
    Started {
        transition_id: TransitionId,
        operation: TransitionOperation,
        mode: TransitionMode,
    },
    /// Interactive progress in `[0, 1]`, for any chrome the host interpolates.
    InteractiveProgress {
        transition_id: TransitionId,
        percent: f32,
    },
    /// The released drag committed and the overlay has settled.
    InteractiveFinished { transition_id: TransitionId },
    /// The released drag was cancelled and the overlay has settled back.
    InteractiveCancelled { transition_id: TransitionId },
    /// The session is over. `did_complete` is false when the navigation
    /// must be reverted.
    Completed {
        transition_id: TransitionId,
        operation: TransitionOperation,
        did_complete: bool,
    },
}

impl TransitionEvent {
    /// Session this event belongs to; `None` for `PopRequested`.
    pub fn transition_id(&self) -> Option<TransitionId> {
        match self {
            Self::PopRequested => None,
            Self::Started { transition_id, .. }
            | Self::InteractiveProgress { transition_id, .. }
            | Self::InteractiveFinished { transition_id }
            | Self::InteractiveCancelled { transition_id }
            | Self::Completed { transition_id, .. } => Some(*transition_id),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Queue for collecting transition events between host polls.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<TransitionEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: TransitionEvent) {
        self.events.push_back(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn pop(&mut self) -> Option<TransitionEvent> {
        self.events.pop_front()
    }

    /// Drain all events from the queue, returning an iterator.
    pub fn drain(&mut self) -> impl Iterator<Item = TransitionEvent> + '_ {
        self.events.drain(..)
    }

    pub fn peek(&self) -> Option<&TransitionEvent> {
        self.events.front()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Events belonging to one session.
    pub fn events_for(&self, transition_id: TransitionId) -> Vec<&TransitionEvent> {
        self.events
            .iter()
            .filter(|e| e.transition_id() == Some(transition_id))
            .collect()
    }
}
