//! Host glue: the navigation stack of grid and browser.
//!
//! `Shell` plays the part of the navigation controller. It owns both screens,
//! answers the coordinator's pop requests and flips the visible screen when a
//! transition completes.

use std::cell::RefCell;
use std::rc::Rc;

use tabzoom_config::TabzoomConfig;
use tabzoom_transition::{
    PointerEvent, ScreenMetrics, Size, TransitionCoordinator, TransitionEvent, TransitionMode,
    TransitionOperation,
};

use crate::error::{Result, ShellError};
use crate::grid::GridLayout;
use crate::screens::{BrowserScreen, GridScreen, PageRenderer, SharedTabs};
use crate::tabs::TabsModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibleScreen {
    Grid,
    Browser,
}

pub struct Shell {
    tabs: SharedTabs,
    grid: Rc<RefCell<GridScreen>>,
    browser: Option<Rc<RefCell<BrowserScreen>>>,
    renderer: Rc<RefCell<dyn PageRenderer>>,
    coordinator: TransitionCoordinator,
    metrics: ScreenMetrics,
    visible: VisibleScreen,
    outbox: Vec<TransitionEvent>,
}

impl Shell {
    pub fn new<R: PageRenderer + 'static>(config: &TabzoomConfig, renderer: R) -> Result<Self> {
        let coordinator = TransitionCoordinator::from_config(config);
        let metrics = coordinator.metrics();
        let tabs = Rc::new(RefCell::new(TabsModel::from_config(&config.shell)?));
        let grid = GridScreen::new(tabs.clone(), GridLayout::new(metrics, &config.shell));

        Ok(Self {
            tabs,
            grid: Rc::new(RefCell::new(grid)),
            browser: None,
            renderer: Rc::new(RefCell::new(renderer)),
            coordinator,
            metrics,
            visible: VisibleScreen::Grid,
            outbox: Vec::new(),
        })
    }

    pub fn tabs(&self) -> &SharedTabs {
        &self.tabs
    }

    pub fn grid(&self) -> &Rc<RefCell<GridScreen>> {
        &self.grid
    }

    pub fn coordinator(&self) -> &TransitionCoordinator {
        &self.coordinator
    }

    pub fn visible_screen(&self) -> VisibleScreen {
        self.visible
    }

    pub fn screen_size(&self) -> Size {
        self.metrics.screen_size
    }

    /// Append a blank tab and select it.
    pub fn add_tab(&mut self) -> usize {
        let index = self.tabs.borrow_mut().add_and_select_tab();
        self.grid.borrow_mut().reveal(index);
        index
    }

    /// Zoom from the grid into tab `index`.
    ///
    /// The selection only changes when the transition starts.
    pub fn open_tab(&mut self, index: usize) -> Result<TransitionMode> {
        if self.visible != VisibleScreen::Grid {
            return Err(ShellError::BrowserAlreadyOpen);
        }
        let previous = self.tabs.borrow().selected_id();
        let id = self.tabs.borrow_mut().select_tab(index)?;
        let browser = Rc::new(RefCell::new(BrowserScreen::new(
            self.tabs.clone(),
            id,
            self.metrics,
            Box::new(self.renderer.clone()),
        )));

        let started = self.coordinator.start_transition(
            TransitionOperation::Forward,
            Box::new(self.grid.clone()),
            Box::new(browser.clone()),
        );
        match started {
            Ok(mode) => {
                self.browser = Some(browser);
                Ok(mode)
            }
            Err(err) => {
                self.tabs.borrow_mut().restore_selection(previous);
                Err(err.into())
            }
        }
    }

    /// Zoom from the browser back into the grid (the tab-switcher button).
    pub fn show_grid(&mut self) -> Result<TransitionMode> {
        self.pop()
    }

    fn pop(&mut self) -> Result<TransitionMode> {
        let browser = self.browser.clone().ok_or(ShellError::NoBrowser)?;
        Ok(self.coordinator.start_transition(
            TransitionOperation::Backward,
            Box::new(browser),
            Box::new(self.grid.clone()),
        )?)
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        self.coordinator.handle_pointer(event);
        self.pump();
    }

    /// Advance transitions by one frame. Returns `true` while animating.
    pub fn tick(&mut self, delta_ms: f32) -> bool {
        let running = self.coordinator.tick(delta_ms);
        self.pump();
        running
    }

    /// Events observed since the last call.
    pub fn take_events(&mut self) -> Vec<TransitionEvent> {
        std::mem::take(&mut self.outbox)
    }

    fn pump(&mut self) {
        // Answering a pop request queues further events
        while let Some(event) = self.coordinator.pop_event() {
            match event {
                TransitionEvent::PopRequested if self.visible == VisibleScreen::Browser => {
                    if let Err(err) = self.pop() {
                        log::warn!("interactive pop refused: {err}");
                    }
                }
                TransitionEvent::Completed {
                    operation,
                    did_complete,
                    ..
                } => self.finish(operation, did_complete),
                _ => {}
            }
            self.outbox.push(event);
        }
    }

    fn finish(&mut self, operation: TransitionOperation, did_complete: bool) {
        if !did_complete {
            log::debug!("{operation:?} cancelled; staying on {:?}", self.visible);
            return;
        }
        self.visible = match operation {
            TransitionOperation::Forward => VisibleScreen::Browser,
            TransitionOperation::Backward => {
                self.browser = None;
                VisibleScreen::Grid
            }
        };
        log::debug!("now showing {:?}", self.visible);
    }
}

impl std::fmt::Debug for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell")
            .field("visible", &self.visible)
            .field("phase", &self.coordinator.phase())
            .field("tabs", &self.tabs.borrow().len())
            .finish_non_exhaustive()
    }
}
