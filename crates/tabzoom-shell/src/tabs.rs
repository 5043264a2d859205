//! The list of open tabs behind the grid.

use tabzoom_config::ShellConfig;
use tabzoom_transition::Snapshot;
use url::Url;

use crate::error::{Result, ShellError};
use crate::tab::{BrowserTab, TabId};

pub const NEW_TAB_TITLE: &str = "New Tab";

const BLANK_TAB_COLOR: [u8; 4] = [255, 255, 255, 255];

#[derive(Debug, Clone)]
pub struct TabsModel {
    tabs: Vec<BrowserTab>,
    last_selected: Option<TabId>,
    new_tab_url: Url,
    blank_size: (u32, u32),
}

impl TabsModel {
    pub fn new(tabs: Vec<BrowserTab>, new_tab_url: Url) -> Self {
        Self {
            tabs,
            last_selected: None,
            new_tab_url,
            blank_size: (1, 1),
        }
    }

    /// Empty model whose new tabs open `shell.new_tab_url` with a blank
    /// capture the size of the configured screen.
    pub fn from_config(shell: &ShellConfig) -> Result<Self> {
        let url = Url::parse(&shell.new_tab_url)?;
        let mut model = Self::new(Vec::new(), url);
        model.blank_size = (
            shell.screen_width.max(1.0) as u32,
            shell.screen_height.max(1.0) as u32,
        );
        Ok(model)
    }

    pub fn tabs(&self) -> &[BrowserTab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// "Done" leaves the grid, so it needs a tab to go to.
    pub fn should_enable_done_button(&self) -> bool {
        !self.tabs.is_empty()
    }

    pub fn tab(&self, index: usize) -> Option<&BrowserTab> {
        self.tabs.get(index)
    }

    pub fn tab_by_id(&self, id: TabId) -> Option<&BrowserTab> {
        self.tabs.iter().find(|t| t.id() == id)
    }

    pub fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id() == id)
    }

    /// The tab the user last opened, or the first tab when none was.
    pub fn last_selected_tab(&self) -> Option<&BrowserTab> {
        self.last_selected
            .and_then(|id| self.tab_by_id(id))
            .or_else(|| self.tabs.first())
    }

    pub fn last_selected_index(&self) -> Option<usize> {
        self.last_selected_tab().and_then(|t| self.index_of(t.id()))
    }

    /// Append a blank tab and select it. Returns its index.
    pub fn add_and_select_tab(&mut self) -> usize {
        let (w, h) = self.blank_size;
        let tab = BrowserTab::new(
            NEW_TAB_TITLE,
            Snapshot::blank(w, h, BLANK_TAB_COLOR),
            Some(self.new_tab_url.clone()),
        );
        self.last_selected = Some(tab.id());
        self.tabs.push(tab);
        log::debug!("added tab {} ({} open)", self.tabs.len() - 1, self.tabs.len());
        self.tabs.len() - 1
    }

    /// Id of the explicitly selected tab, without the first-tab fallback.
    pub fn selected_id(&self) -> Option<TabId> {
        self.last_selected
    }

    /// Put back a selection taken from [`selected_id`](Self::selected_id).
    pub fn restore_selection(&mut self, id: Option<TabId>) {
        self.last_selected = id.filter(|id| self.tab_by_id(*id).is_some());
    }

    pub fn select_tab(&mut self, index: usize) -> Result<TabId> {
        let id = self.checked(index)?.id();
        self.last_selected = Some(id);
        Ok(id)
    }

    pub fn delete_tab(&mut self, index: usize) -> Result<BrowserTab> {
        self.checked(index)?;
        let tab = self.tabs.remove(index);
        if self.last_selected == Some(tab.id()) {
            self.last_selected = None;
        }
        log::debug!("deleted tab {index} ({} open)", self.tabs.len());
        Ok(tab)
    }

    /// Record what a page finished loading.
    ///
    /// Without a URL nothing changes; without a title the URL stands in.
    /// Returns whether the tab was updated.
    pub fn update_tab(
        &mut self,
        id: TabId,
        title: Option<String>,
        snapshot: Snapshot,
        url: Option<Url>,
    ) -> Result<bool> {
        let Some(url) = url else {
            return Ok(false);
        };
        let tab = self.tab_mut(id)?;
        let title = title.unwrap_or_else(|| url.as_str().to_owned());
        tab.update(title, snapshot, url);
        Ok(true)
    }

    /// Replace a tab's capture, keeping its title and address.
    pub fn update_snapshot(&mut self, id: TabId, snapshot: Snapshot) -> Result<()> {
        self.tab_mut(id)?.set_snapshot(snapshot);
        Ok(())
    }

    fn tab_mut(&mut self, id: TabId) -> Result<&mut BrowserTab> {
        self.tabs
            .iter_mut()
            .find(|t| t.id() == id)
            .ok_or(ShellError::UnknownTab(id))
    }

    fn checked(&self, index: usize) -> Result<&BrowserTab> {
        self.tabs.get(index).ok_or(ShellError::TabIndexOutOfRange {
            index,
            len: self.tabs.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab(title: &str) -> BrowserTab {
        BrowserTab::new(title, Snapshot::blank(1, 1, [0, 0, 0, 255]), None)
    }

    fn model(tabs: Vec<BrowserTab>) -> TabsModel {
        TabsModel::new(tabs, Url::parse("https://en.wikipedia.org").unwrap())
    }

    #[test]
    fn test_empty_model() {
        let m = model(vec![]);
        assert!(m.is_empty());
        assert!(!m.should_enable_done_button());
        assert!(m.last_selected_tab().is_none());
    }

    #[test]
    fn test_model_with_tabs() {
        let t = tab("Tab 1");
        let m = model(vec![t.clone()]);
        assert_eq!(m.len(), 1);
        assert!(m.should_enable_done_button());
        assert_eq!(m.tab(0), Some(&t));
        assert_eq!(m.tab(1), None);
    }

    #[test]
    fn test_last_selected_falls_back_to_first() {
        let t = tab("First Tab");
        let m = model(vec![t.clone(), tab("Second")]);
        assert_eq!(m.last_selected_tab(), Some(&t));
    }

    #[test]
    fn test_add_and_select_tab() {
        let mut m = model(vec![tab("Last Selected")]);
        let index = m.add_and_select_tab();
        assert_eq!(index, 1);
        assert_eq!(m.len(), 2);

        let selected = m.last_selected_tab().unwrap();
        assert_eq!(selected.title(), NEW_TAB_TITLE);
        assert_eq!(selected.url().map(Url::as_str), Some("https://en.wikipedia.org/"));
        assert_eq!(m.last_selected_index(), Some(1));
    }

    #[test]
    fn test_delete_tab() {
        let t1 = tab("Tab 1");
        let t2 = tab("Tab 2");
        let mut m = model(vec![t1.clone(), t2.clone()]);

        let removed = m.delete_tab(0).unwrap();
        assert_eq!(removed, t1);
        assert_eq!(m.tabs().first(), Some(&t2));

        m.delete_tab(0).unwrap();
        assert!(m.is_empty());
        assert!(matches!(
            m.delete_tab(0),
            Err(ShellError::TabIndexOutOfRange { index: 0, len: 0 })
        ));
    }

    #[test]
    fn test_deleting_selected_tab_clears_selection() {
        let mut m = model(vec![tab("A"), tab("B")]);
        m.select_tab(1).unwrap();
        m.delete_tab(1).unwrap();
        assert_eq!(m.last_selected_tab().map(BrowserTab::title), Some("A"));
    }

    #[test]
    fn test_restore_selection() {
        let mut m = model(vec![tab("A"), tab("B"), tab("C")]);
        let first = m.select_tab(0).unwrap();
        let previous = m.selected_id();
        m.select_tab(2).unwrap();

        m.restore_selection(previous);
        assert_eq!(m.selected_id(), Some(first));
        assert_eq!(m.last_selected_index(), Some(0));

        // A deleted tab cannot come back as the selection
        let deleted = m.tab(1).unwrap().id();
        m.delete_tab(1).unwrap();
        m.restore_selection(Some(deleted));
        assert_eq!(m.selected_id(), None);
    }

    #[test]
    fn test_update_tab() {
        let t = tab("Old");
        let id = t.id();
        let mut m = model(vec![t]);
        let capture = Snapshot::blank(2, 2, [1, 2, 3, 255]);

        // No URL: ignored
        assert!(!m.update_tab(id, Some("Ignored".into()), capture.clone(), None).unwrap());
        assert_eq!(m.tab(0).unwrap().title(), "Old");

        // No title: URL stands in
        let url = Url::parse("https://example.com/page").unwrap();
        assert!(m.update_tab(id, None, capture.clone(), Some(url.clone())).unwrap());
        let updated = m.tab(0).unwrap();
        assert_eq!(updated.title(), "https://example.com/page");
        assert_eq!(updated.url(), Some(&url));
        assert!(updated.snapshot().ptr_eq(&capture));
    }

    #[test]
    fn test_index_of() {
        let a = tab("A");
        let b = tab("B");
        let m = model(vec![a.clone(), b.clone()]);
        assert_eq!(m.index_of(b.id()), Some(1));
        assert_eq!(m.index_of(TabId::new()), None);
    }

    #[test]
    fn test_from_config_rejects_bad_url() {
        let shell = ShellConfig {
            new_tab_url: "not a url".into(),
            ..ShellConfig::default()
        };
        assert!(matches!(
            TabsModel::from_config(&shell),
            Err(ShellError::InvalidUrl(_))
        ));
    }
}
