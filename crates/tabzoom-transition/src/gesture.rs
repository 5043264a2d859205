//! Pan recognition for the dismiss gesture.
//!
//! Turns raw pointer events into `Began`/`Changed`/`Ended` drag samples with
//! a translation relative to the press position and a release velocity in
//! points per second.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tabzoom_config::GestureConfig;

use crate::geometry::Point;

/// Raw pointer input. Timestamps are milliseconds on any monotonic clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    Down { position: Point, time_ms: f64 },
    Move { position: Point, time_ms: f64 },
    Up { position: Point, time_ms: f64 },
    /// The system took the pointer away (e.g. an incoming call).
    Cancel { time_ms: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragState {
    Began,
    Changed,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragSample {
    pub state: DragState,
    pub translation: Point,
    /// Points per second; zero except on `Ended`.
    pub velocity: Point,
}

#[derive(Debug, Clone, Copy)]
struct TimedPoint {
    position: Point,
    time_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecognizerState {
    Idle,
    Pressed,
    Dragging,
}

/// Single-pointer pan recognizer with touch slop and a windowed velocity
/// estimate.
#[derive(Debug, Clone)]
pub struct DragRecognizer {
    touch_slop: f32,
    velocity_window_ms: f64,
    max_velocity: f32,
    state: RecognizerState,
    origin: Point,
    history: VecDeque<TimedPoint>,
}

impl DragRecognizer {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            touch_slop: config.touch_slop.max(0.0),
            velocity_window_ms: f64::from(config.velocity_window_ms.max(1.0)),
            max_velocity: config.max_fling_velocity.abs(),
            state: RecognizerState::Idle,
            origin: Point::ZERO,
            history: VecDeque::new(),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.state == RecognizerState::Dragging
    }

    /// Forget any gesture in progress without reporting it.
    pub fn reset(&mut self) {
        self.state = RecognizerState::Idle;
        self.history.clear();
    }

    /// Feed one pointer event; returns a sample once the pointer has moved
    /// past the touch slop.
    pub fn handle(&mut self, event: PointerEvent) -> Option<DragSample> {
        match event {
            PointerEvent::Down { position, time_ms } => {
                if self.state != RecognizerState::Idle {
                    log::debug!("pointer down during an active gesture; restarting");
                }
                self.state = RecognizerState::Pressed;
                self.origin = position;
                self.history.clear();
                self.record(position, time_ms);
                None
            }
            PointerEvent::Move { position, time_ms } => match self.state {
                RecognizerState::Idle => None,
                RecognizerState::Pressed => {
                    self.record(position, time_ms);
                    let translation = position - self.origin;
                    if translation.x.hypot(translation.y) < self.touch_slop {
                        return None;
                    }
                    self.state = RecognizerState::Dragging;
                    Some(self.sample(DragState::Began, translation, Point::ZERO))
                }
                RecognizerState::Dragging => {
                    self.record(position, time_ms);
                    Some(self.sample(DragState::Changed, position - self.origin, Point::ZERO))
                }
            },
            PointerEvent::Up { position, time_ms } => {
                let was_dragging = self.state == RecognizerState::Dragging;
                self.record(position, time_ms);
                let velocity = self.velocity();
                self.reset();
                was_dragging.then(|| self.sample(DragState::Ended, position - self.origin, velocity))
            }
            PointerEvent::Cancel { .. } => {
                let was_dragging = self.state == RecognizerState::Dragging;
                let translation = self
                    .history
                    .back()
                    .map_or(Point::ZERO, |last| last.position - self.origin);
                self.reset();
                was_dragging.then(|| self.sample(DragState::Ended, translation, Point::ZERO))
            }
        }
    }

    fn sample(&self, state: DragState, translation: Point, velocity: Point) -> DragSample {
        DragSample {
            state,
            translation,
            velocity,
        }
    }

    fn record(&mut self, position: Point, time_ms: f64) {
        self.history.push_back(TimedPoint { position, time_ms });
        let cutoff = time_ms - self.velocity_window_ms;
        while self.history.len() > 2 && self.history.front().is_some_and(|p| p.time_ms < cutoff) {
            self.history.pop_front();
        }
    }

    /// Velocity across the recent window, clamped to the fling cap.
    fn velocity(&self) -> Point {
        let (Some(first), Some(last)) = (self.history.front(), self.history.back()) else {
            return Point::ZERO;
        };
        let dt_ms = last.time_ms - first.time_ms;
        if dt_ms <= 0.0 {
            return Point::ZERO;
        }
        let dt = (dt_ms / 1_000.0) as f32;
        let clamp = |v: f32| v.clamp(-self.max_velocity, self.max_velocity);
        Point::new(
            clamp((last.position.x - first.position.x) / dt),
            clamp((last.position.y - first.position.y) / dt),
        )
    }
}
