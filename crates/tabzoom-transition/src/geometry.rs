//! Plain geometry types shared by the transition engines.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub w: f32,
    pub h: f32,
}

impl Size {
    pub const fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }

    /// Height over width; 0 for a degenerate width.
    pub fn aspect_ratio(&self) -> f32 {
        if self.w > 0.0 { self.h / self.w } else { 0.0 }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.w, size.h)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.h
    }

    /// A rect with no area, or with NaN/infinite components, cannot anchor
    /// the overlay.
    pub fn is_degenerate(&self) -> bool {
        !(self.x.is_finite() && self.y.is_finite() && self.w.is_finite() && self.h.is_finite())
            || self.w <= 0.0
            || self.h <= 0.0
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Scale width and height by `scale` around the top-left corner.
    pub fn scaled_size(&self, scale: f32) -> Size {
        Size::new(self.w * scale, self.h * scale)
    }
}

/// Screen facts the engines need and the host knows.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenMetrics {
    pub screen_size: Size,
    /// Height of the status-bar area at the top of the screen.
    pub safe_area_top_inset: f32,
}

impl ScreenMetrics {
    pub const fn new(screen_size: Size, safe_area_top_inset: f32) -> Self {
        Self {
            screen_size,
            safe_area_top_inset,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.screen_size)
    }

    /// Zero-size rect at the centre of the screen, used when a screen offers
    /// no usable frame.
    pub fn placeholder_frame(&self) -> Rect {
        let c = self.bounds().center();
        Rect::new(c.x, c.y, 0.0, 0.0)
    }

    /// Vertical content offset that hides the status-bar area of a snapshot
    /// drawn `width` points wide.
    pub fn content_offset_for_width(&self, width: f32) -> f32 {
        if self.screen_size.w <= 0.0 {
            return 0.0;
        }
        self.safe_area_top_inset * (width / self.screen_size.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_rects() {
        assert!(Rect::default().is_degenerate());
        assert!(Rect::new(0.0, 0.0, 10.0, -1.0).is_degenerate());
        assert!(Rect::new(f32::NAN, 0.0, 10.0, 10.0).is_degenerate());
        assert!(!Rect::new(-5.0, -5.0, 10.0, 10.0).is_degenerate());
    }

    #[test]
    fn test_placeholder_is_screen_center() {
        let metrics = ScreenMetrics::new(Size::new(400.0, 800.0), 40.0);
        assert_eq!(metrics.placeholder_frame(), Rect::new(200.0, 400.0, 0.0, 0.0));
    }

    #[test]
    fn test_content_offset_scales_with_width() {
        let metrics = ScreenMetrics::new(Size::new(400.0, 800.0), 40.0);
        assert_eq!(metrics.content_offset_for_width(400.0), 40.0);
        assert_eq!(metrics.content_offset_for_width(100.0), 10.0);

        let broken = ScreenMetrics::new(Size::new(0.0, 800.0), 40.0);
        assert_eq!(broken.content_offset_for_width(100.0), 0.0);
    }
}
