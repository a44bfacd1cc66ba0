//! Opener bookkeeping
//!
//! Openers only steer heuristics: where a background link opens and which
//! tab activates when the active one closes. They are dropped as soon as
//! the user appears to start an unrelated task.

use std::collections::HashSet;

use super::insert::PageTransition;
use super::{ModelState, TabStripModel};
use crate::observer::{SelectionChangeReason, TabStripSelectionChange};
use crate::tab::Tab;
use crate::tracing::span_names;
use crate::trace_operation_debug;
use crate::types::TabHandle;

impl TabStripModel {
    /// Records `opener` as the tab that opened the tab at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range, if `opener` is the tab itself or
    /// is not in this strip.
    pub fn set_opener_of_tab_at(&self, index: usize, opener: Option<TabHandle>) {
        let _scope = self.guard.enter("set_opener_of_tab_at");
        let _span = trace_operation_debug!(span_names::UPDATE, index).entered();
        self.mutate(|state, _| {
            let handle = state.checked_handle(index);
            if let Some(opener) = opener {
                assert_ne!(opener, handle, "a tab cannot be its own opener");
                assert!(
                    state.collection.tab(opener).is_some(),
                    "{opener} is not in this tab strip"
                );
            }
            if let Some(tab) = state.collection.tab_mut(handle) {
                tab.set_opener(opener);
            }
        });
    }

    /// Opener of the tab at `index`, if it is still in the strip.
    #[must_use]
    pub fn opener_of_tab_at(&self, index: usize) -> Option<TabHandle> {
        self.read(|s| s.opener_of_tab_at(index))
    }

    /// Clears every opener relationship.
    pub fn forget_all_openers(&self) {
        let _scope = self.guard.enter("forget_all_openers");
        self.mutate(|state, _| state.forget_all_openers());
    }

    /// Clears the opener of one tab.
    pub fn forget_opener(&self, handle: TabHandle) {
        let _scope = self.guard.enter("forget_opener");
        self.mutate(|state, _| state.forget_opener(handle));
    }

    /// Nearest tab opened by `opener`, searching right of `start` first and
    /// then leftwards.
    #[must_use]
    pub fn index_of_next_tab_opened_by(&self, opener: TabHandle, start: usize) -> Option<usize> {
        self.read(|s| s.index_of_next_tab_opened_by(opener, start))
    }

    /// Last index of the run right of `start` made of tabs opened by
    /// `opener` or, transitively, by those tabs. Pinned tabs are skipped.
    #[must_use]
    pub fn index_of_last_tab_opened_by(&self, opener: TabHandle, start: usize) -> Option<usize> {
        self.read(|s| s.index_of_last_tab_opened_by(opener, start))
    }

    /// Called when the tab `handle` starts a navigation.
    ///
    /// Typed, bookmark and similar navigations forget every opener, except
    /// the first one made from a fresh new-tab page at the end of the strip.
    pub fn tab_navigating(&self, handle: TabHandle, transition: PageTransition) {
        if !transition.resets_openers() {
            return;
        }
        let _scope = self.guard.enter("tab_navigating");
        self.mutate(|state, _| {
            if !state.is_new_tab_at_end(handle) {
                tracing::debug!(tab = %handle, ?transition, "navigation resets openers");
                state.forget_all_openers();
            }
        });
    }
}

impl ModelState {
    pub(crate) fn opener_of_tab_at(&self, index: usize) -> Option<TabHandle> {
        self.collection
            .tab_at(index)
            .and_then(Tab::opener)
            .filter(|opener| self.collection.tab(*opener).is_some())
    }

    pub(crate) fn forget_all_openers(&mut self) {
        for handle in self.collection.handles() {
            self.forget_opener(handle);
        }
    }

    pub(crate) fn forget_opener(&mut self, handle: TabHandle) {
        if let Some(tab) = self.collection.tab_mut(handle) {
            tab.set_opener(None);
        }
    }

    pub(crate) fn index_of_next_tab_opened_by(&self, opener: TabHandle, start: usize) -> Option<usize> {
        let count = self.len();
        let opened_by = |i: &usize| {
            self.collection
                .tab_at(*i)
                .is_some_and(|tab| tab.opener() == Some(opener))
        };
        (start + 1..count)
            .find(opened_by)
            .or_else(|| (0..start.min(count)).rev().find(opened_by))
    }

    pub(crate) fn index_of_last_tab_opened_by(&self, opener: TabHandle, start: usize) -> Option<usize> {
        let mut family = HashSet::from([opener]);
        let mut last = None;
        for (i, tab) in self.collection.iter().enumerate().skip(start + 1) {
            if !tab.opener().is_some_and(|o| family.contains(&o)) {
                if tab.pinned() {
                    continue;
                }
                break;
            }
            family.insert(tab.handle());
            last = Some(i);
        }
        last
    }

    /// Hands the opener of `handle` down to every tab `handle` opened.
    pub(crate) fn fix_openers(&mut self, handle: TabHandle) {
        let inherited = self.collection.tab(handle).and_then(Tab::opener);
        for other in self.collection.handles() {
            if let Some(tab) = self.collection.tab_mut(other)
                && tab.opener() == Some(handle)
            {
                tab.set_opener(inherited.filter(|h| *h != other));
            }
        }
    }

    fn is_new_tab_at_end(&self, handle: TabHandle) -> bool {
        let count = self.len();
        count > 0
            && self.collection.handle_at(count - 1) == Some(handle)
            && self
                .collection
                .tab(handle)
                .is_some_and(|tab| tab.contents().is_fresh_new_tab_page())
    }

    /// Resets openers after the active tab changed.
    ///
    /// A user switching tabs forgets every opener unless the switch runs
    /// between a tab and its opener, or between two tabs of one opener.
    pub(crate) fn on_active_tab_changed(&mut self, selection: &TabStripSelectionChange) {
        if !selection.active_tab_changed() || self.collection.is_empty() {
            return;
        }
        let old = selection.old_tab;
        let new = selection.new_tab;
        let mut old_opener = None;
        if let Some(old) = old
            && let Some(tab) = self.collection.tab(old)
        {
            old_opener = tab.opener();
            if tab.reset_opener_on_active_tab_change() {
                self.forget_opener(old);
            }
        }
        let new_opener = new.and_then(|h| self.collection.tab(h)).and_then(Tab::opener);

        if selection.reason == SelectionChangeReason::UserGesture
            && new_opener != old_opener
            && ((old.is_none() && new_opener.is_none()) || new_opener != old)
            && ((new.is_none() && old_opener.is_none()) || old_opener != new)
        {
            tracing::debug!("user switched to an unrelated tab, forgetting openers");
            self.forget_all_openers();
        }
    }
}
