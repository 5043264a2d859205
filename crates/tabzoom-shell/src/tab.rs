use std::sync::atomic::{AtomicU64, Ordering};

use tabzoom_transition::Snapshot;
use url::Url;

/// Unique identity of a tab, independent of its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(pub u64);

impl TabId {
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

/// One open page: its title, last capture and address.
///
/// Two tabs are equal only when they are the same tab; identical contents
/// do not make them equal.
#[derive(Debug, Clone)]
pub struct BrowserTab {
    id: TabId,
    title: String,
    snapshot: Snapshot,
    url: Option<Url>,
}

impl BrowserTab {
    pub fn new(title: impl Into<String>, snapshot: Snapshot, url: Option<Url>) -> Self {
        Self {
            id: TabId::new(),
            title: title.into(),
            snapshot,
            url,
        }
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub(crate) fn update(&mut self, title: String, snapshot: Snapshot, url: Url) {
        self.title = title;
        self.snapshot = snapshot;
        self.url = Some(url);
    }

    pub(crate) fn set_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
    }
}

impl PartialEq for BrowserTab {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for BrowserTab {}
