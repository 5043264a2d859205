//! The two screens that take part in the zoom transition.
//!
//! Both share the [`TabsModel`] with the host through `Rc<RefCell<_>>`; the
//! coordinator borrows them only inside the transition hooks.

use std::cell::RefCell;
use std::rc::Rc;

use tabzoom_transition::{
    Rect, ScreenMetrics, Size, Snapshot, TransitionProvider, TransitionTarget,
};

use crate::grid::GridLayout;
use crate::tab::{BrowserTab, TabId};
use crate::tabs::TabsModel;

pub type SharedTabs = Rc<RefCell<TabsModel>>;

/// Host-side page renderer (the web view).
pub trait PageRenderer {
    /// Capture the page shown for `tab` at `size`. `None` when nothing has
    /// rendered yet.
    fn capture(&mut self, tab: &BrowserTab, size: Size) -> Option<Snapshot>;
}

impl<T: PageRenderer + ?Sized> PageRenderer for Rc<RefCell<T>> {
    fn capture(&mut self, tab: &BrowserTab, size: Size) -> Option<Snapshot> {
        self.borrow_mut().capture(tab, size)
    }
}

/// The grid of tab thumbnails.
#[derive(Debug)]
pub struct GridScreen {
    tabs: SharedTabs,
    layout: GridLayout,
    scroll_offset: f32,
}

impl GridScreen {
    pub fn new(tabs: SharedTabs, layout: GridLayout) -> Self {
        Self {
            tabs,
            layout,
            scroll_offset: 0.0,
        }
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn set_layout(&mut self, layout: GridLayout) {
        self.layout = layout;
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn scroll_to(&mut self, offset: f32) {
        let max = (self.layout.content_height(self.tabs.borrow().len())
            - self.layout.container.h)
            .max(0.0);
        self.scroll_offset = offset.clamp(0.0, max);
    }

    /// Scroll just enough for the thumbnail at `index` to be fully visible.
    pub fn reveal(&mut self, index: usize) {
        let frame = self.layout.thumbnail_frame(index, 0.0);
        let visible_h = self.layout.container.h;
        if frame.y - self.layout.content_top < self.scroll_offset {
            self.scroll_to(frame.y - self.layout.content_top);
        } else if frame.max_y() > self.scroll_offset + visible_h {
            self.scroll_to(frame.max_y() - visible_h);
        }
    }

    /// Index of the tab whose cell is under `(x, y)`.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<usize> {
        let count = self.tabs.borrow().len();
        (0..count).find(|&i| {
            let f = self.layout.cell_frame(i, self.scroll_offset);
            x >= f.x && x < f.x + f.w && y >= f.y && y < f.max_y()
        })
    }
}

impl TransitionProvider for GridScreen {
    /// Scroll the selected cell on-screen before its frame is read.
    fn transition_will_start(&mut self) {
        let selected = self.tabs.borrow().last_selected_index();
        if let Some(index) = selected {
            self.reveal(index);
            log::trace!("grid target: tab {index} at scroll {}", self.scroll_offset);
        }
    }

    fn target(&self) -> TransitionTarget {
        let tabs = self.tabs.borrow();
        match (tabs.last_selected_index(), tabs.last_selected_tab()) {
            (Some(index), Some(tab)) => TransitionTarget::simple(
                Some(tab.snapshot().clone()),
                self.layout.thumbnail_frame(index, self.scroll_offset),
            ),
            _ => TransitionTarget::placeholder(),
        }
    }
}

/// Full-screen page for one tab.
pub struct BrowserScreen {
    tabs: SharedTabs,
    tab_id: TabId,
    metrics: ScreenMetrics,
    renderer: Box<dyn PageRenderer>,
    capture: Option<Snapshot>,
}

impl BrowserScreen {
    pub fn new(
        tabs: SharedTabs,
        tab_id: TabId,
        metrics: ScreenMetrics,
        renderer: Box<dyn PageRenderer>,
    ) -> Self {
        Self {
            tabs,
            tab_id,
            metrics,
            renderer,
            capture: None,
        }
    }

    pub fn tab_id(&self) -> TabId {
        self.tab_id
    }

    pub fn bounds(&self) -> Rect {
        self.metrics.bounds()
    }

    /// Index of the tab `offset` pages away (`-1` previous, `1` next).
    pub fn neighbour(&self, offset: isize) -> Option<usize> {
        let tabs = self.tabs.borrow();
        let index = tabs.index_of(self.tab_id)?;
        let target = index.checked_add_signed(offset)?;
        (target < tabs.len()).then_some(target)
    }

    /// Page to the tab `offset` pages away and select it.
    ///
    /// Returns `false` at either end of the tab list.
    pub fn show_neighbour(&mut self, offset: isize) -> bool {
        let Some(index) = self.neighbour(offset) else {
            return false;
        };
        let selected = self.tabs.borrow_mut().select_tab(index);
        match selected {
            Ok(id) => {
                log::debug!("paged to tab {index}");
                self.tab_id = id;
                self.capture = None;
                true
            }
            Err(err) => {
                log::warn!("paging failed: {err}");
                false
            }
        }
    }

    fn capture_page(&mut self) -> Option<Snapshot> {
        let tabs = self.tabs.borrow();
        let tab = tabs.tab_by_id(self.tab_id)?;
        let capture = self.renderer.capture(tab, self.metrics.screen_size)?;
        // Drop the status-bar rows
        Some(capture.trimmed(self.metrics.safe_area_top_inset.max(0.0) as u32))
    }
}

impl std::fmt::Debug for BrowserScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserScreen")
            .field("tab_id", &self.tab_id)
            .field("metrics", &self.metrics)
            .field("capture", &self.capture)
            .finish_non_exhaustive()
    }
}

impl TransitionProvider for BrowserScreen {
    fn transition_will_start(&mut self) {
        self.capture = self.capture_page();
        if self.capture.is_none() {
            log::debug!("no page capture for {:?}; using tab snapshot", self.tab_id);
        }
    }

    fn transition_did_end(&mut self) {
        let Some(capture) = self.capture.take() else {
            return;
        };
        if let Err(err) = self.tabs.borrow_mut().update_snapshot(self.tab_id, capture) {
            log::warn!("could not store page capture: {err}");
        }
    }

    fn target(&self) -> TransitionTarget {
        let snapshot = self.capture.clone().or_else(|| {
            self.tabs
                .borrow()
                .tab_by_id(self.tab_id)
                .map(|t| t.snapshot().clone())
        });
        TransitionTarget::simple(snapshot, self.metrics.bounds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabzoom_config::ShellConfig;
    use url::Url;

    struct SolidRenderer;

    impl PageRenderer for SolidRenderer {
        fn capture(&mut self, _tab: &BrowserTab, size: Size) -> Option<Snapshot> {
            Some(Snapshot::blank(size.w as u32, size.h as u32, [10, 20, 30, 255]))
        }
    }

    fn metrics() -> ScreenMetrics {
        ScreenMetrics::new(Size::new(40.0, 80.0), 4.0)
    }

    fn phone_metrics() -> ScreenMetrics {
        ScreenMetrics::new(Size::new(400.0, 800.0), 40.0)
    }

    fn shared_tabs(count: usize) -> SharedTabs {
        let tabs = (0..count)
            .map(|i| BrowserTab::new(format!("Tab {i}"), Snapshot::blank(2, 2, [0, 0, 0, 255]), None))
            .collect();
        Rc::new(RefCell::new(TabsModel::new(
            tabs,
            Url::parse("https://en.wikipedia.org").unwrap(),
        )))
    }

    #[test]
    fn test_grid_target_is_selected_thumbnail() {
        let tabs = shared_tabs(3);
        tabs.borrow_mut().select_tab(2).unwrap();
        let layout = GridLayout::new(phone_metrics(), &ShellConfig::default());
        let grid = GridScreen::new(tabs.clone(), layout);

        let target = grid.target();
        assert_eq!(target.frame, layout.thumbnail_frame(2, 0.0));
        let expected = tabs.borrow().tab(2).unwrap().snapshot().clone();
        assert!(target.snapshot.unwrap().ptr_eq(&expected));
    }

    #[test]
    fn test_empty_grid_offers_placeholder() {
        let layout = GridLayout::new(phone_metrics(), &ShellConfig::default());
        let grid = GridScreen::new(shared_tabs(0), layout);
        assert_eq!(grid.target(), TransitionTarget::placeholder());
    }

    #[test]
    fn test_browser_capture_lifecycle() {
        let tabs = shared_tabs(1);
        let id = tabs.borrow().tab(0).unwrap().id();
        let mut browser = BrowserScreen::new(tabs.clone(), id, metrics(), Box::new(SolidRenderer));

        browser.transition_will_start();
        let target = browser.target();
        assert_eq!(target.frame, Rect::new(0.0, 0.0, 40.0, 80.0));
        let capture = target.snapshot.unwrap();
        // 80 rows less 4 at each edge
        assert_eq!((capture.width(), capture.height()), (40, 72));

        browser.transition_did_end();
        assert!(tabs.borrow().tab(0).unwrap().snapshot().ptr_eq(&capture));
    }

    #[test]
    fn test_neighbour_paging() {
        let tabs = shared_tabs(3);
        let middle = tabs.borrow().tab(1).unwrap().id();
        let mut browser = BrowserScreen::new(tabs.clone(), middle, metrics(), Box::new(SolidRenderer));

        assert_eq!(browser.neighbour(-1), Some(0));
        assert_eq!(browser.neighbour(1), Some(2));
        assert_eq!(browser.neighbour(2), None);
        assert_eq!(browser.neighbour(-2), None);

        assert!(browser.show_neighbour(1));
        assert_eq!(tabs.borrow().last_selected_index(), Some(2));
        assert!(!browser.show_neighbour(1));
    }

    #[test]
    fn test_hit_test_and_reveal() {
        let tabs = shared_tabs(12);
        let layout = GridLayout::new(phone_metrics(), &ShellConfig::default());
        let mut grid = GridScreen::new(tabs, layout);
        assert_eq!(grid.hit_test(20.0, 50.0), Some(0));
        assert_eq!(grid.hit_test(5.0, 50.0), None);

        grid.reveal(11);
        let frame = layout.thumbnail_frame(11, grid.scroll_offset());
        assert!(frame.max_y() <= 800.0 + 1e-3);
        assert!(grid.scroll_offset() > 0.0);
    }
}
