//! Tab and hosted-content records
//!
//! A [`Tab`] is owned by the [`TabCollection`](crate::TabCollection) while
//! attached. Its pinned, group and split attributes are written only by the
//! collection so they always agree with the tab's position in the tree.

use serde::{Deserialize, Serialize};

use crate::types::{ContentsId, GroupId, SplitId, TabHandle};

/// URL of the blank page a fresh new tab shows.
pub const NEW_TAB_URL: &str = "about:newtab";

/// The content hosted inside a tab.
///
/// The model never looks inside content beyond these fields; navigation and
/// rendering belong to the embedder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabContents {
    /// Content identity
    pub id: ContentsId,
    /// Last committed URL (empty if nothing has committed yet)
    pub url: String,
    /// Page title
    pub title: String,
    /// Number of navigation entries in the content's history
    pub history_len: usize,
}

impl TabContents {
    /// Creates content showing `url` with a single history entry.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            id: ContentsId::new(),
            title: url.clone(),
            url,
            history_len: 1,
        }
    }

    /// Creates a blank new-tab page.
    #[must_use]
    pub fn new_tab_page() -> Self {
        Self::new(NEW_TAB_URL)
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the history length.
    #[must_use]
    pub const fn with_history_len(mut self, len: usize) -> Self {
        self.history_len = len;
        self
    }

    /// Returns true for an untouched new-tab page.
    #[must_use]
    pub fn is_fresh_new_tab_page(&self) -> bool {
        self.url == NEW_TAB_URL && self.history_len <= 1
    }
}

/// One entry of the tab strip.
#[derive(Debug, Clone)]
pub struct Tab {
    handle: TabHandle,
    contents: TabContents,
    pinned: bool,
    blocked: bool,
    opener: Option<TabHandle>,
    group: Option<GroupId>,
    split: Option<SplitId>,
    reset_opener_on_active_tab_change: bool,
}

impl Tab {
    /// Wraps `contents` in a new, unattached tab.
    #[must_use]
    pub fn new(contents: TabContents) -> Self {
        Self {
            handle: TabHandle::new(),
            contents,
            pinned: false,
            blocked: false,
            opener: None,
            group: None,
            split: None,
            reset_opener_on_active_tab_change: false,
        }
    }

    /// Stable handle of this tab.
    #[must_use]
    pub const fn handle(&self) -> TabHandle {
        self.handle
    }

    /// Hosted content.
    #[must_use]
    pub const fn contents(&self) -> &TabContents {
        &self.contents
    }

    /// Whether the tab is pinned.
    #[must_use]
    pub const fn pinned(&self) -> bool {
        self.pinned
    }

    /// Whether the tab is blocked by a modal dialog.
    #[must_use]
    pub const fn blocked(&self) -> bool {
        self.blocked
    }

    /// The tab that caused this one to open, if still known.
    #[must_use]
    pub const fn opener(&self) -> Option<TabHandle> {
        self.opener
    }

    /// Group membership.
    #[must_use]
    pub const fn group(&self) -> Option<GroupId> {
        self.group
    }

    /// Split membership.
    #[must_use]
    pub const fn split(&self) -> Option<SplitId> {
        self.split
    }

    /// Whether the opener should be dropped the next time the active tab changes.
    #[must_use]
    pub const fn reset_opener_on_active_tab_change(&self) -> bool {
        self.reset_opener_on_active_tab_change
    }

    pub(crate) fn replace_contents(&mut self, contents: TabContents) -> TabContents {
        std::mem::replace(&mut self.contents, contents)
    }

    pub(crate) const fn set_pinned(&mut self, pinned: bool) {
        self.pinned = pinned;
    }

    pub(crate) const fn set_blocked(&mut self, blocked: bool) {
        self.blocked = blocked;
    }

    pub(crate) const fn set_opener(&mut self, opener: Option<TabHandle>) {
        self.opener = opener;
    }

    pub(crate) const fn set_group(&mut self, group: Option<GroupId>) {
        self.group = group;
    }

    pub(crate) const fn set_split(&mut self, split: Option<SplitId>) {
        self.split = split;
    }

    pub(crate) const fn set_reset_opener_on_active_tab_change(&mut self, reset: bool) {
        self.reset_opener_on_active_tab_change = reset;
    }
}
