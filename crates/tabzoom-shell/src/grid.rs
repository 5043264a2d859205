//! Flow layout of the tab grid.

use tabzoom_config::ShellConfig;
use tabzoom_transition::{Rect, ScreenMetrics, Size};

/// Widest container still treated as a compact-width (phone) layout.
pub const COMPACT_WIDTH_MAX: f32 = 600.0;

/// Height of the title strip under each thumbnail.
pub const TITLE_BAR_HEIGHT: f32 = 28.0;

/// Cell geometry for a grid of tab thumbnails.
///
/// Cells flow left to right with `spacing` between them and as the left and
/// right content inset. Each cell keeps the screen's aspect ratio, shortened
/// by `height_ratio`, so thumbnails read as miniature pages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub container: Size,
    pub screen: Size,
    pub spacing: f32,
    pub height_ratio: f32,
    /// Top content inset, below the status bar.
    pub content_top: f32,
}

impl GridLayout {
    pub fn new(metrics: ScreenMetrics, shell: &ShellConfig) -> Self {
        Self {
            container: metrics.screen_size,
            screen: metrics.screen_size,
            spacing: shell.cell_spacing,
            height_ratio: shell.cell_height_ratio,
            content_top: metrics.safe_area_top_inset,
        }
    }

    /// Resize for a new container (rotation, split view). The screen aspect
    /// used for cell heights follows the container.
    pub fn with_container(mut self, container: Size) -> Self {
        self.container = container;
        self.screen = container;
        self
    }

    pub fn is_compact_portrait(&self) -> bool {
        self.container.w < self.container.h && self.container.w <= COMPACT_WIDTH_MAX
    }

    pub fn items_per_row(&self) -> usize {
        if self.is_compact_portrait() { 2 } else { 3 }
    }

    pub fn cell_size(&self) -> Size {
        let per_row = self.items_per_row() as f32;
        let total_spacing = (per_row - 1.0) * self.spacing + 2.0 * self.spacing;
        let width = ((self.container.w - total_spacing) / per_row).max(0.0);
        let aspect = if self.screen.w > 0.0 {
            self.screen.h / self.screen.w
        } else {
            0.0
        };
        Size::new(width, width * aspect * self.height_ratio)
    }

    /// Frame of cell `index` in container coordinates, scrolled by
    /// `scroll_offset`.
    pub fn cell_frame(&self, index: usize, scroll_offset: f32) -> Rect {
        let per_row = self.items_per_row();
        let (row, column) = (index / per_row, index % per_row);
        let size = self.cell_size();
        Rect::new(
            self.spacing + column as f32 * (size.w + self.spacing),
            self.content_top + row as f32 * (size.h + self.spacing) - scroll_offset,
            size.w,
            size.h,
        )
    }

    /// Frame of the thumbnail inside cell `index`: the transition target of
    /// the grid screen.
    pub fn thumbnail_frame(&self, index: usize, scroll_offset: f32) -> Rect {
        let cell = self.cell_frame(index, scroll_offset);
        Rect::new(cell.x, cell.y, cell.w, (cell.h - TITLE_BAR_HEIGHT).max(0.0))
    }

    /// Total scrollable height for `count` cells.
    pub fn content_height(&self, count: usize) -> f32 {
        if count == 0 {
            return self.content_top;
        }
        let rows = count.div_ceil(self.items_per_row());
        let size = self.cell_size();
        self.content_top + rows as f32 * size.h + (rows - 1) as f32 * self.spacing
    }
}
