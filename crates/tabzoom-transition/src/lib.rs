//! Zoom transition engine between a tab grid and a browser screen.
//!
//! Opening a tab grows its thumbnail into the full-screen page; closing it
//! shrinks the page back into the grid cell. The close can also be driven by
//! a swipe, which the overlay follows until release decides between commit
//! and cancel.
//!
//! # Architecture
//!
//! ```text
//! TransitionCoordinator
//!   ├── DragRecognizer     (pointer events → drag samples)
//!   ├── TransitionPhase    (session phase machine)
//!   └── TransitionDriver
//!         ├── AnimatedTransition    (fixed-duration spring)
//!         └── InteractiveTransition (drag physics + settle spring)
//!
//! TransitionProvider  (implemented by the host's screens)
//!   └── TransitionTarget { snapshot, frame }
//! ```
//!
//! Everything runs on the caller's thread. The host feeds pointer events and
//! frame ticks in, draws `overlay()` and applies the view alphas, and drains
//! `TransitionEvent`s to update its navigation stack.

pub mod animated;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod geometry;
pub mod gesture;
pub mod interactive;
pub mod interpolate;
pub mod overlay;
pub mod phase;
pub mod physics;
pub mod target;
pub mod timeline;
pub mod timing;
pub mod types;

pub use animated::AnimatedTransition;
pub use coordinator::{TransitionCoordinator, TransitionDriver};
pub use error::TransitionError;
pub use events::{EventQueue, TransitionEvent};
pub use geometry::{Point, Rect, ScreenMetrics, Size};
pub use gesture::{DragRecognizer, DragSample, DragState, PointerEvent};
pub use interactive::{DragFrame, InteractiveTransition};
pub use interpolate::Interpolate;
pub use overlay::{OverlayGeometry, OverlayTrack, TransitionOverlay};
pub use phase::{PhaseEffect, PhaseInput, PhaseStep, TransitionPhase};
pub use target::{
    BoxedProvider, Participants, ResolvedTargets, Snapshot, TransitionProvider, TransitionTarget,
};
pub use timeline::{Timeline, TimelineState};
pub use timing::{SpringTiming, TimingCurve};
pub use types::{
    Participant, Placement, Resolution, TransitionId, TransitionMode, TransitionOperation,
    ViewState,
};
