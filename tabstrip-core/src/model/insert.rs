//! Adding tabs

use std::ops::{BitOr, BitOrAssign};

use super::{Events, ModelState, TabStripModel};
use crate::observer::{InsertedTab, Notification, TabStripModelChange};
use crate::tab::{Tab, TabContents};
use crate::tracing::span_names;
use crate::trace_operation_debug;
use crate::types::GroupId;

use super::close::DetachedTab;

/// Flags controlling how a tab is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AddTypes(u8);

impl AddTypes {
    /// No flags.
    pub const NONE: Self = Self(0);
    /// Activate the new tab.
    pub const ACTIVE: Self = Self(1);
    /// Pin the new tab.
    pub const PINNED: Self = Self(1 << 1);
    /// Use the given index even for link transitions.
    pub const FORCE_INDEX: Self = Self(1 << 2);
    /// Make the active tab the new tab's opener.
    pub const INHERIT_OPENER: Self = Self(1 << 3);

    /// Returns true if every flag in `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Both sets of flags.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// These flags without `other`.
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl BitOr for AddTypes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for AddTypes {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

/// How a navigation or a new tab came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageTransition {
    /// The user followed a link.
    #[default]
    Link,
    /// The user typed a URL.
    Typed,
    /// The user picked a bookmark.
    AutoBookmark,
    /// The user picked a suggestion that was not a URL.
    Generated,
    /// A keyword search.
    Keyword,
    /// A top-level navigation started by the browser.
    AutoToplevel,
    /// A reload.
    Reload,
    /// Anything else.
    Other,
}

impl PageTransition {
    /// Whether navigating this way starts an unrelated task, so existing
    /// opener relationships should be forgotten.
    #[must_use]
    pub const fn resets_openers(self) -> bool {
        matches!(
            self,
            Self::Typed | Self::AutoBookmark | Self::Generated | Self::Keyword | Self::AutoToplevel
        )
    }
}

impl TabStripModel {
    /// Adds a tab the way a browser command would.
    ///
    /// Link transitions without [`AddTypes::FORCE_INDEX`] ignore `index` and
    /// place the tab next to its opener, inheriting the active tab's group.
    /// Other transitions use `index`, clamped to the end. Returns the index
    /// the tab ended up at.
    pub fn add_tab(
        &self,
        contents: TabContents,
        index: Option<usize>,
        transition: PageTransition,
        add_types: AddTypes,
        group: Option<GroupId>,
    ) -> usize {
        let _scope = self.guard.enter("add_tab");
        let _span = trace_operation_debug!(span_names::INSERT, transition = ?transition).entered();
        self.delegate.will_add_contents(&contents);
        let groups_enabled = self.supports_tab_groups();
        self.mutate(|state, events| {
            let count = state.len();
            let mut add_types = add_types;
            let mut group = group;
            let mut inherit = add_types.contains(AddTypes::INHERIT_OPENER);
            let mut index = if transition == PageTransition::Link
                && !add_types.contains(AddTypes::FORCE_INDEX)
            {
                inherit = true;
                if group.is_none() {
                    group = state.selection.active().and_then(|i| state.group_at(i));
                }
                state.determine_insertion_index(transition, add_types.contains(AddTypes::ACTIVE))
            } else {
                index.filter(|&i| i <= count).unwrap_or(count)
            };

            if !groups_enabled || add_types.contains(AddTypes::PINNED) {
                group = None;
            } else if group.is_none() && index > 0 && index < count {
                let left = state.group_at(index - 1);
                if left.is_some() && left == state.group_at(index) {
                    group = left;
                }
            }
            if let Some(id) = group
                && let Some(range) = state.collection.group_range(id)
            {
                index = index.clamp(range.start, range.end);
            }

            if transition == PageTransition::Typed && index == count {
                inherit = true;
            }
            if inherit {
                add_types |= AddTypes::INHERIT_OPENER;
            }

            let tab = Tab::new(contents);
            let handle = tab.handle();
            let index = state.insert_tab(tab, index, add_types, group, events);
            if inherit
                && transition == PageTransition::Typed
                && let Some(tab) = state.collection.tab_mut(handle)
            {
                tab.set_reset_opener_on_active_tab_change(true);
            }
            index
        })
    }

    /// Inserts a tab at `index` and returns where it landed.
    ///
    /// # Panics
    ///
    /// Panics if `index` is greater than [`count`](Self::count).
    pub fn insert_tab_at(
        &self,
        index: usize,
        contents: TabContents,
        add_types: AddTypes,
        group: Option<GroupId>,
    ) -> usize {
        let _scope = self.guard.enter("insert_tab_at");
        let _span = trace_operation_debug!(span_names::INSERT, index).entered();
        self.delegate.will_add_contents(&contents);
        let group = group.filter(|_| self.supports_tab_groups());
        self.mutate(|state, events| state.insert_tab(Tab::new(contents), index, add_types, group, events))
    }

    /// Re-attaches a tab detached from this or another strip, keeping its
    /// handle and state.
    ///
    /// # Panics
    ///
    /// Panics if `index` is greater than [`count`](Self::count).
    pub fn insert_detached_tab_at(
        &self,
        index: usize,
        detached: DetachedTab,
        add_types: AddTypes,
        group: Option<GroupId>,
    ) -> usize {
        let _scope = self.guard.enter("insert_detached_tab_at");
        let _span = trace_operation_debug!(span_names::INSERT, index).entered();
        let mut tab = detached.into_tab();
        self.delegate.will_add_contents(tab.contents());
        tab.set_opener(None);
        let group = group.filter(|_| self.supports_tab_groups());
        self.mutate(|state, events| state.insert_tab(tab, index, add_types, group, events))
    }

    /// Adds a tab at the end of the strip. Only a foreground tab takes the
    /// active tab as its opener.
    pub fn append_tab(&self, contents: TabContents, foreground: bool) -> usize {
        let add_types = if foreground {
            AddTypes::INHERIT_OPENER | AddTypes::ACTIVE
        } else {
            AddTypes::NONE
        };
        self.insert_tab_at(self.count(), contents, add_types, None)
    }

    /// Where [`add_tab`](Self::add_tab) would put a tab opened with
    /// `transition`.
    #[must_use]
    pub fn determine_insertion_index(&self, transition: PageTransition, foreground: bool) -> usize {
        self.read(|s| s.determine_insertion_index(transition, foreground))
    }
}

impl ModelState {
    pub(crate) fn determine_insertion_index(&self, transition: PageTransition, foreground: bool) -> usize {
        let count = self.len();
        if count == 0 {
            return 0;
        }
        if transition == PageTransition::Link
            && let Some(active) = self.selection.active()
        {
            if foreground {
                return active + 1;
            }
            let handle = self.checked_handle(active);
            return match self.index_of_last_tab_opened_by(handle, active) {
                None => active + 1,
                Some(last) => {
                    // Stay on the opener's side of a group boundary.
                    let active_group = self.group_at(active);
                    (active + 1..=last)
                        .find(|&i| self.group_at(i) != active_group)
                        .unwrap_or(last + 1)
                }
            };
        }
        count
    }

    /// Attaches `tab` and records the insert.
    pub(crate) fn insert_tab(
        &mut self,
        mut tab: Tab,
        index: usize,
        add_types: AddTypes,
        group: Option<GroupId>,
        events: &mut Events,
    ) -> usize {
        let count = self.len();
        assert!(index <= count, "insertion index {index} out of range (count {count})");
        let active = add_types.contains(AddTypes::ACTIVE) || count == 0;
        let pinned = add_types.contains(AddTypes::PINNED);
        let group = if pinned { None } else { group };

        if add_types.contains(AddTypes::INHERIT_OPENER)
            && let Some(opener) = self.active_handle()
        {
            if active {
                self.forget_all_openers();
            }
            tab.set_opener(Some(opener));
        }

        let handle = tab.handle();
        let contents = tab.contents().clone();
        events.notify_before(Notification::TabWillBeAdded);
        let index = self.collection.insert_at(tab, index, group, pinned);
        self.selection.increment_from(index);
        if active {
            self.selection.set_selected_index(index);
        }
        tracing::debug!(tab = %handle, index, pinned, active, "tab inserted");
        events.set_change(TabStripModelChange::Insert(vec![InsertedTab {
            handle,
            contents,
            index,
        }]));
        index
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::config::TabStripSettings;
    use crate::delegate::DefaultDelegate;

    fn model() -> TabStripModel {
        TabStripModel::with_settings(
            Rc::new(DefaultDelegate),
            TabStripSettings::default().with_validation(true),
        )
    }

    fn page(name: &str) -> TabContents {
        TabContents::new(format!("https://{name}.example"))
    }

    #[test]
    fn add_types_flags() {
        let flags = AddTypes::ACTIVE | AddTypes::PINNED;
        assert!(flags.contains(AddTypes::ACTIVE));
        assert!(flags.contains(AddTypes::PINNED));
        assert!(!flags.contains(AddTypes::FORCE_INDEX));
        assert!(flags.contains(AddTypes::NONE));
        assert_eq!(flags.difference(AddTypes::PINNED), AddTypes::ACTIVE);
    }

    #[test]
    fn transitions_that_reset_openers() {
        assert!(PageTransition::Typed.resets_openers());
        assert!(PageTransition::AutoToplevel.resets_openers());
        assert!(!PageTransition::Link.resets_openers());
        assert!(!PageTransition::Reload.resets_openers());
    }

    #[test]
    fn background_links_open_after_earlier_children() {
        let model = model();
        model.append_tab(page("opener"), true);
        model.append_tab(page("other"), false);
        let first = model.add_tab(page("a"), None, PageTransition::Link, AddTypes::NONE, None);
        let second = model.add_tab(page("b"), None, PageTransition::Link, AddTypes::NONE, None);
        assert_eq!(first, 1);
        assert_eq!(second, 2);
        let opener = model.handle_at(0);
        assert_eq!(model.tab_at(1).unwrap().opener(), opener);
        assert_eq!(model.tab_at(2).unwrap().opener(), opener);
    }

    #[test]
    fn foreground_link_opens_right_of_active() {
        let model = model();
        model.append_tab(page("a"), true);
        model.append_tab(page("b"), false);
        let index = model.add_tab(page("c"), None, PageTransition::Link, AddTypes::ACTIVE, None);
        assert_eq!(index, 1);
        assert_eq!(model.active_index(), Some(1));
    }

    #[test]
    fn out_of_range_index_clamps_to_end() {
        let model = model();
        model.append_tab(page("a"), true);
        let index = model.add_tab(page("b"), Some(42), PageTransition::Typed, AddTypes::NONE, None);
        assert_eq!(index, 1);
    }

    #[test]
    fn typed_tab_at_end_resets_opener_later() {
        let model = model();
        model.append_tab(page("a"), true);
        model.add_tab(page("b"), None, PageTransition::Typed, AddTypes::NONE, None);
        let tab = model.tab_at(1).unwrap();
        assert_eq!(tab.opener(), model.handle_at(0));
        assert!(tab.reset_opener_on_active_tab_change());
    }

    #[test]
    fn only_foreground_appends_inherit_the_opener() {
        let model = model();
        model.append_tab(page("a"), true);
        model.append_tab(page("b"), false);
        assert_eq!(model.opener_of_tab_at(1), None);
        assert_eq!(model.active_index(), Some(0));
        model.append_tab(page("c"), true);
        assert_eq!(model.opener_of_tab_at(2), model.handle_at(0));
        assert_eq!(model.active_index(), Some(2));
    }

    #[test]
    fn pinned_insert_lands_in_prefix() {
        let model = model();
        model.append_tab(page("a"), true);
        model.append_tab(page("b"), false);
        let index = model.insert_tab_at(2, page("p"), AddTypes::PINNED, None);
        assert_eq!(index, 0);
        assert_eq!(model.index_of_first_non_pinned_tab(), 1);
        assert_eq!(model.active_index(), Some(1));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn insert_past_end_panics() {
        let model = model();
        model.insert_tab_at(1, page("a"), AddTypes::NONE, None);
    }

    #[test]
    fn insertion_index_for_empty_strip_is_zero() {
        let model = model();
        assert_eq!(model.determine_insertion_index(PageTransition::Link, false), 0);
    }
}
