use tabzoom_transition::TransitionError;
use thiserror::Error;

use crate::tab::TabId;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("tab index {index} out of range ({len} tabs)")]
    TabIndexOutOfRange { index: usize, len: usize },

    #[error("no tab with id {0:?}")]
    UnknownTab(TabId),

    #[error("invalid new-tab URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("no browser page is open")]
    NoBrowser,

    #[error("a browser page is already open")]
    BrowserAlreadyOpen,

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

pub type Result<T> = std::result::Result<T, ShellError>;
