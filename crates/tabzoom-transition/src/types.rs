//! Core transition types.
//!
//! - `TransitionId`: Unique identifier for one transition session
//! - `TransitionOperation`: Direction of navigation
//! - `TransitionMode`: Animated (button) or interactive (gesture)
//! - `Resolution`: How an interactive session ends
//! - `Participant` / `Placement`: The two real screen views and their stacking

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a transition session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransitionId(pub u64);

impl TransitionId {
    /// Generate a new unique transition ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for TransitionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Direction of navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionOperation {
    /// Grid → browser (push). Thumbnail grows to full screen.
    Forward,
    /// Browser → grid (pop). Full screen shrinks into its thumbnail.
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionMode {
    Animated,
    Interactive,
}

/// How a released interactive session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Proceed to the destination screen.
    Commit,
    /// Return to the source screen.
    Cancel,
}

impl Resolution {
    pub fn did_complete(self) -> bool {
        self == Self::Commit
    }
}

/// One of the two real screen views taking part in a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Participant {
    /// The screen being navigated away from.
    Outgoing,
    /// The screen being navigated to.
    Incoming,
}

/// Where the incoming view is stacked relative to the outgoing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Above,
    Below,
}

/// Alpha and stacking of the two real views, as the host should apply them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub outgoing_alpha: f32,
    pub incoming_alpha: f32,
    pub incoming_placement: Placement,
}

impl ViewState {
    pub fn alpha(&self, participant: Participant) -> f32 {
        match participant {
            Participant::Outgoing => self.outgoing_alpha,
            Participant::Incoming => self.incoming_alpha,
        }
    }

    pub fn set_alpha(&mut self, participant: Participant, alpha: f32) {
        match participant {
            Participant::Outgoing => self.outgoing_alpha = alpha,
            Participant::Incoming => self.incoming_alpha = alpha,
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            outgoing_alpha: 1.0,
            incoming_alpha: 1.0,
            incoming_placement: Placement::Above,
        }
    }
}
