//! Software compositor for driver frames.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use tabzoom_shell::{BrowserTab, PageRenderer, Shell, VisibleScreen};
use tabzoom_transition::{Size, Snapshot, TransitionOverlay};

const BACKGROUND: Rgba<u8> = Rgba([64, 64, 64, 255]);

/// Stand-in web view: every page is a set of horizontal bands tinted by the
/// tab's identity.
pub struct BandRenderer;

impl PageRenderer for BandRenderer {
    fn capture(&mut self, tab: &BrowserTab, size: Size) -> Option<Snapshot> {
        let (w, h) = (size.w.max(1.0) as u32, size.h.max(1.0) as u32);
        let hue = (tab.id().0 as u8).wrapping_mul(53);
        let image = RgbaImage::from_fn(w, h, |_, y| {
            if (y / 40) % 2 == 0 {
                Rgba([hue, 180, 255 - hue, 255])
            } else {
                Rgba([240, 240, 240, 255])
            }
        });
        Some(Snapshot::new(image))
    }
}

/// Draw what the host would show this frame.
pub fn compose(shell: &Shell) -> RgbaImage {
    let size = shell.screen_size();
    let mut canvas = RgbaImage::from_pixel(size.w as u32, size.h as u32, BACKGROUND);

    match shell.coordinator().overlay() {
        Some(overlay) => draw_overlay(&mut canvas, overlay),
        None if shell.visible_screen() == VisibleScreen::Browser => {
            if let Some(tab) = shell.tabs().borrow().last_selected_tab() {
                blit(&mut canvas, tab.snapshot(), 0, 0, size.w as u32, size.h as u32);
            }
        }
        None => draw_grid(&mut canvas, shell),
    }
    canvas
}

fn draw_grid(canvas: &mut RgbaImage, shell: &Shell) {
    let grid = shell.grid().borrow();
    let tabs = shell.tabs().borrow();
    for (index, tab) in tabs.tabs().iter().enumerate() {
        let frame = grid.layout().thumbnail_frame(index, grid.scroll_offset());
        if frame.is_degenerate() {
            continue;
        }
        blit(
            canvas,
            tab.snapshot(),
            frame.x.round() as i64,
            frame.y.round() as i64,
            frame.w.round() as u32,
            frame.h.round() as u32,
        );
    }
}

fn draw_overlay(canvas: &mut RgbaImage, overlay: &TransitionOverlay) {
    let frame = overlay.frame();
    let Some(snapshot) = overlay.snapshot.as_ref() else {
        return;
    };
    if frame.is_degenerate() {
        return;
    }
    // Snapshot keeps its aspect at the frame's width; the clip cuts the rest
    let scale = frame.w / snapshot.width().max(1) as f32;
    let scaled_h = (snapshot.height() as f32 * scale).round().max(1.0) as u32;
    let scaled = imageops::resize(
        snapshot.image(),
        frame.w.round().max(1.0) as u32,
        scaled_h,
        FilterType::Nearest,
    );

    let clip_top = frame.y.round() as i64;
    let clip_bottom = (frame.y + frame.h).round() as i64;
    let left = frame.x.round() as i64;
    let top = (frame.y - overlay.content_offset_y()).round() as i64;
    for (x, y, pixel) in scaled.enumerate_pixels() {
        let (cx, cy) = (left + x as i64, top + y as i64);
        if cy < clip_top || cy >= clip_bottom {
            continue;
        }
        put(canvas, cx, cy, *pixel);
    }
}

fn blit(canvas: &mut RgbaImage, snapshot: &Snapshot, x: i64, y: i64, w: u32, h: u32) {
    if w == 0 || h == 0 {
        return;
    }
    let scaled = imageops::resize(snapshot.image(), w, h, FilterType::Nearest);
    imageops::overlay(canvas, &scaled, x, y);
}

fn put(canvas: &mut RgbaImage, x: i64, y: i64, pixel: Rgba<u8>) {
    if x < 0 || y < 0 || x >= i64::from(canvas.width()) || y >= i64::from(canvas.height()) {
        return;
    }
    canvas.put_pixel(x as u32, y as u32, pixel);
}
