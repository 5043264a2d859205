//! What a screen contributes to a transition.
//!
//! Each screen implements [`TransitionProvider`]. The engines call
//! `transition_will_start` on both participants before reading any target,
//! and `transition_did_end` on both exactly once after the last frame,
//! whether the transition committed or was cancelled. [`Participants`]
//! enforces that pairing.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use image::RgbaImage;

use crate::geometry::{Rect, ScreenMetrics, Size};

/// Shared, immutable screen capture.
#[derive(Clone, PartialEq)]
pub struct Snapshot {
    image: Arc<RgbaImage>,
}

impl Snapshot {
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image: Arc::new(image),
        }
    }

    /// Single-colour capture, used for blank tabs.
    pub fn blank(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self::new(RgbaImage::from_pixel(width, height, image::Rgba(rgba)))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> Size {
        Size::new(self.width() as f32, self.height() as f32)
    }

    /// Copy with `inset` rows removed from both the top and the bottom edge.
    ///
    /// Returns an unchanged copy when the inset would leave nothing.
    pub fn trimmed(&self, inset: u32) -> Self {
        let height = self.height();
        if inset == 0 || inset.saturating_mul(2) >= height {
            return self.clone();
        }
        let cropped =
            image::imageops::crop_imm(self.image.as_ref(), 0, inset, self.width(), height - 2 * inset)
                .to_image();
        Self::new(cropped)
    }

    /// True when both handles share the same pixel buffer.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.image, &other.image)
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// "Where this screen visually lives" for the duration of one transition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionTarget {
    pub snapshot: Option<Snapshot>,
    pub frame: Rect,
}

impl TransitionTarget {
    pub fn simple(snapshot: Option<Snapshot>, frame: Rect) -> Self {
        Self { snapshot, frame }
    }

    /// Target for screens with nothing to animate.
    pub fn placeholder() -> Self {
        Self::default()
    }
}

/// Capability implemented by every screen taking part in a transition.
pub trait TransitionProvider {
    /// Called before any interpolation. Refresh cached snapshots here.
    fn transition_will_start(&mut self) {}

    /// Called exactly once after the transition fully completes.
    fn transition_did_end(&mut self) {}

    /// Current snapshot and frame. Must stay stable for one transition.
    fn target(&self) -> TransitionTarget;
}

impl<T: TransitionProvider + ?Sized> TransitionProvider for Box<T> {
    fn transition_will_start(&mut self) {
        (**self).transition_will_start();
    }

    fn transition_did_end(&mut self) {
        (**self).transition_did_end();
    }

    fn target(&self) -> TransitionTarget {
        (**self).target()
    }
}

/// Lets the host keep ownership of its screens while a session runs.
impl<T: TransitionProvider + ?Sized> TransitionProvider for Rc<RefCell<T>> {
    fn transition_will_start(&mut self) {
        self.borrow_mut().transition_will_start();
    }

    fn transition_did_end(&mut self) {
        self.borrow_mut().transition_did_end();
    }

    fn target(&self) -> TransitionTarget {
        self.borrow().target()
    }
}

pub type BoxedProvider = Box<dyn TransitionProvider>;

/// Targets read once at the start of a transition, frames sanitised.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTargets {
    pub from: TransitionTarget,
    pub to: TransitionTarget,
}

/// The outgoing and incoming providers of one transition.
pub struct Participants {
    outgoing: BoxedProvider,
    incoming: BoxedProvider,
    started: bool,
    ended: bool,
}

impl Participants {
    pub fn new(outgoing: BoxedProvider, incoming: BoxedProvider) -> Self {
        Self {
            outgoing,
            incoming,
            started: false,
            ended: false,
        }
    }

    /// Run `transition_will_start` on both participants, once.
    pub(crate) fn will_start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.outgoing.transition_will_start();
        self.incoming.transition_will_start();
    }

    /// Run `transition_did_end` on both participants. Returns false when it
    /// already ran or the transition never started.
    pub(crate) fn did_end(&mut self) -> bool {
        if !self.started || self.ended {
            return false;
        }
        self.ended = true;
        self.outgoing.transition_did_end();
        self.incoming.transition_did_end();
        true
    }

    /// Read both targets, substituting a placeholder frame for degenerate ones.
    pub(crate) fn resolve_targets(&self, metrics: &ScreenMetrics) -> ResolvedTargets {
        ResolvedTargets {
            from: sanitize(self.outgoing.target(), metrics, "outgoing"),
            to: sanitize(self.incoming.target(), metrics, "incoming"),
        }
    }

    pub fn has_started(&self) -> bool {
        self.started
    }

    pub fn has_ended(&self) -> bool {
        self.ended
    }
}

impl fmt::Debug for Participants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Participants")
            .field("started", &self.started)
            .field("ended", &self.ended)
            .finish_non_exhaustive()
    }
}

fn sanitize(mut target: TransitionTarget, metrics: &ScreenMetrics, role: &str) -> TransitionTarget {
    if target.frame.is_degenerate() {
        log::warn!(
            "{role} screen offered no usable frame ({:?}); using placeholder",
            target.frame
        );
        target.frame = metrics.placeholder_frame();
    }
    target
}
