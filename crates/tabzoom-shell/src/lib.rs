//! Tab grid and browser screens for the zoom transition.
//!
//! This crate provides:
//! - **Tabs**: the open-tab list with selection and page updates
//! - **Grid layout**: thumbnail cell geometry
//! - **Screens**: `GridScreen` and `BrowserScreen`, the two transition
//!   participants
//! - **Shell**: a minimal navigation stack that drives the coordinator

pub mod error;
pub mod grid;
pub mod screens;
pub mod shell;
pub mod tab;
pub mod tabs;

pub use error::ShellError;
pub use grid::GridLayout;
pub use screens::{BrowserScreen, GridScreen, PageRenderer, SharedTabs};
pub use shell::{Shell, VisibleScreen};
pub use tab::{BrowserTab, TabId};
pub use tabs::TabsModel;
