//! Fixed-duration timeline advanced by frame ticks.

use crate::timing::{SpringTiming, TimingCurve};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineState {
    Running,
    Finished,
}

/// Runtime state of one spring-timed animation.
#[derive(Debug, Clone)]
pub struct Timeline {
    pub duration_ms: f32,
    pub elapsed_ms: f32,
    pub curve: TimingCurve,
    pub state: TimelineState,
}

impl Timeline {
    pub fn new(timing: SpringTiming) -> Self {
        Self {
            duration_ms: timing.duration_ms.max(0.0),
            elapsed_ms: 0.0,
            curve: timing.curve(),
            state: TimelineState::Running,
        }
    }

    /// Advance by `delta_ms`.
    ///
    /// Returns `true` while the timeline is still running.
    pub fn update(&mut self, delta_ms: f32) -> bool {
        if self.state == TimelineState::Finished {
            return false;
        }
        self.elapsed_ms += delta_ms.max(0.0);
        if self.elapsed_ms >= self.duration_ms {
            self.state = TimelineState::Finished;
            false
        } else {
            true
        }
    }

    /// Linear progress (0.0 to 1.0).
    pub fn progress(&self) -> f32 {
        if self.duration_ms > 0.0 {
            (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Curve-shaped progress; exactly 1.0 once finished.
    pub fn eased(&self) -> f32 {
        match self.state {
            TimelineState::Finished => 1.0,
            TimelineState::Running => self.curve.evaluate(self.progress()),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state == TimelineState::Finished
    }
}
