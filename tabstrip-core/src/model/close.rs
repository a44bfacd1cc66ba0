//! Closing, detaching and replacing tabs

use std::ops::{BitOr, BitOrAssign};

use super::{Events, ModelState, TabStripModel};
use crate::config::LastTabClosePolicy;
use crate::observer::{
    CloseAllStoppedReason, Notification, RemovedTab, ReplacedTab, SelectionChangeReason,
    TabGroupChange, TabGroupChangeKind, TabRemovedReason, TabStripModelChange,
};
use crate::tab::{NEW_TAB_URL, Tab, TabContents};
use crate::tracing::span_names;
use crate::trace_operation_debug;
use crate::types::{GroupId, TabHandle};

/// Flags controlling how tabs close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CloseTypes(u8);

impl CloseTypes {
    /// No flags.
    pub const NONE: Self = Self(0);
    /// The close was started by the user.
    pub const USER_GESTURE: Self = Self(1);
    /// Ask the delegate to keep a history record.
    pub const CREATE_HISTORICAL_TAB: Self = Self(1 << 1);

    /// Returns true if every flag in `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for CloseTypes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for CloseTypes {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// A tab taken out of a strip, ready to be inserted elsewhere.
#[derive(Debug, Clone)]
pub struct DetachedTab {
    tab: Tab,
    index_before_any_removals: usize,
    index_at_time_of_removal: usize,
    reason: TabRemovedReason,
}

impl DetachedTab {
    /// Handle of the detached tab; it survives reinsertion.
    #[must_use]
    pub const fn handle(&self) -> TabHandle {
        self.tab.handle()
    }

    /// Its content.
    #[must_use]
    pub const fn contents(&self) -> &TabContents {
        self.tab.contents()
    }

    /// Whether it was pinned.
    #[must_use]
    pub const fn was_pinned(&self) -> bool {
        self.tab.pinned()
    }

    /// Index before any tab of its batch was removed.
    #[must_use]
    pub const fn index_before_any_removals(&self) -> usize {
        self.index_before_any_removals
    }

    /// Index at the moment it was removed.
    #[must_use]
    pub const fn index_at_time_of_removal(&self) -> usize {
        self.index_at_time_of_removal
    }

    /// Why it was removed.
    #[must_use]
    pub const fn reason(&self) -> TabRemovedReason {
        self.reason
    }

    pub(crate) fn into_tab(self) -> Tab {
        self.tab
    }
}

/// Tab scheduled for removal, with the history record made for it.
type Doomed = (TabHandle, Option<u64>);

impl TabStripModel {
    /// Closes the tab at `index`. Returns false if it stayed open.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn close_tab_at(&self, index: usize, close_types: CloseTypes) -> bool {
        let handle = self.read(|s| s.checked_handle(index));
        self.close_tabs(&[handle], close_types)
    }

    /// Closes every selected tab.
    pub fn close_selected_tabs(&self) -> bool {
        let handles = self.read(|s| {
            s.selection
                .selected_indices()
                .into_iter()
                .filter_map(|i| s.collection.handle_at(i))
                .collect::<Vec<_>>()
        });
        self.close_tabs(
            &handles,
            CloseTypes::CREATE_HISTORICAL_TAB | CloseTypes::USER_GESTURE,
        )
    }

    /// Closes every tab, right to left.
    pub fn close_all_tabs(&self) -> bool {
        let handles: Vec<TabHandle> = self.handles().into_iter().rev().collect();
        self.set_closing_all(true);
        let closed = self.close_tabs(&handles, CloseTypes::CREATE_HISTORICAL_TAB);
        self.set_closing_all(false);
        closed
    }

    /// Closes `handles`, skipping tabs that are gone.
    ///
    /// Tabs the delegate refuses to close produce a close-cancelled
    /// notification. Tabs whose unload listener starts stay open. All other
    /// tabs are removed in one batch. Returns true if every closable tab
    /// closed.
    pub fn close_tabs(&self, handles: &[TabHandle], close_types: CloseTypes) -> bool {
        let _span = trace_operation_debug!(span_names::CLOSE, count = handles.len()).entered();
        let mut closable = Vec::new();
        let mut refused = Vec::new();
        for &handle in handles {
            let Some(tab) = self.tab(handle) else {
                continue;
            };
            if self.delegate.is_tab_closable(handle, tab.contents()) {
                closable.push((handle, tab.contents().clone()));
            } else {
                tracing::debug!(tab = %handle, "close refused by policy");
                refused.push(Notification::CloseCancelled(handle));
            }
        }

        let keep_window_open = self.settings.last_tab_close == LastTabClosePolicy::KeepWindowOpen
            && !closable.is_empty()
            && closable.len() == self.count()
            && !self.read(|s| s.closing_all);
        if keep_window_open {
            tracing::debug!("adding a blank tab before closing the last ones");
            self.delegate.add_tab_at(self, NEW_TAB_URL, None, false, None);
        }

        let _scope = self.guard.enter("close_tabs");
        self.dispatch(&refused);
        if closable.is_empty() {
            return true;
        }

        let closing_all = closable.len() == self.count();
        if closing_all {
            tracing::info!(count = closable.len(), "closing all tabs");
            self.dispatch(&[Notification::WillCloseAllTabs]);
        }

        let mut closed_all = true;
        let mut doomed: Vec<Doomed> = Vec::with_capacity(closable.len());
        for (handle, contents) in closable {
            if self.delegate.run_unload_listener_before_closing(&contents) {
                tracing::debug!(tab = %handle, "unload listener keeps tab open");
                closed_all = false;
                continue;
            }
            let historical_id = if close_types.contains(CloseTypes::CREATE_HISTORICAL_TAB) {
                self.delegate.create_historical_record(&contents)
            } else {
                None
            };
            doomed.push((handle, historical_id));
        }

        if !doomed.is_empty() {
            self.remove_tabs(&doomed, TabRemovedReason::Deleted);
        }

        if closing_all {
            let reason = if closed_all {
                CloseAllStoppedReason::Completed
            } else {
                CloseAllStoppedReason::Canceled
            };
            tracing::info!(?reason, "close all stopped");
            self.dispatch(&[Notification::CloseAllStopped(reason)]);
        }
        closed_all
    }

    /// Closes every tab of `group`.
    pub fn close_all_tabs_in_group(&self, group: GroupId) -> bool {
        if !self.supports_tab_groups() {
            return false;
        }
        let Some(range) = self.group_range(group) else {
            return false;
        };
        let _span = trace_operation_debug!(span_names::GROUP, group = %group).entered();
        self.delegate.will_close_group(group);
        {
            let _scope = self.guard.enter("close_all_tabs_in_group");
            self.mutate(|state, events| {
                state.groups.set_closing(group, true);
                events.notify(Notification::GroupChanged(TabGroupChange {
                    group,
                    kind: TabGroupChangeKind::WillBeRemoved,
                }));
            });
        }

        let spans_strip = range.len() == self.count();
        let handles: Vec<TabHandle> = range.rev().filter_map(|i| self.handle_at(i)).collect();
        if spans_strip {
            self.set_closing_all(true);
        }
        let closed = self.close_tabs(&handles, CloseTypes::CREATE_HISTORICAL_TAB);
        if spans_strip {
            self.set_closing_all(false);
        }
        closed
    }

    /// Detaches the tab at `index` so it can be inserted into another strip.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn detach_tab_at_for_insertion(&self, index: usize) -> DetachedTab {
        let _span = trace_operation_debug!(span_names::CLOSE, index).entered();
        let handle = self.read(|s| s.checked_handle(index));
        let _scope = self.guard.enter("detach_tab_at_for_insertion");
        let mut detached = self.remove_tabs(&[(handle, None)], TabRemovedReason::InsertedIntoOtherTabStrip);
        match detached.pop() {
            Some(tab) => tab,
            None => panic!("{handle} was not detached"),
        }
    }

    /// Removes and destroys the tab at `index` without asking the delegate.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn detach_and_delete_tab_at(&self, index: usize) {
        let _span = trace_operation_debug!(span_names::CLOSE, index).entered();
        let handle = self.read(|s| s.checked_handle(index));
        let _scope = self.guard.enter("detach_and_delete_tab_at");
        self.remove_tabs(&[(handle, None)], TabRemovedReason::Deleted);
    }

    /// Swaps the content of the tab at `index`, returning the old content.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn replace_contents_at(&self, index: usize, contents: TabContents) -> TabContents {
        let _scope = self.guard.enter("replace_contents_at");
        let _span = trace_operation_debug!(span_names::UPDATE, index).entered();
        self.delegate.will_add_contents(&contents);
        self.mutate(|state, events| {
            let handle = state.checked_handle(index);
            state.fix_openers(handle);
            let Some(old_contents) = state
                .collection
                .tab_at_mut(index)
                .map(|tab| tab.replace_contents(contents.clone()))
            else {
                panic!("index {index} out of range");
            };
            if state.selection.active() == Some(index) {
                events.set_reason(SelectionChangeReason::Replaced);
            }
            events.set_change(TabStripModelChange::Replace(ReplacedTab {
                handle,
                old_contents: old_contents.clone(),
                new_contents: contents,
                index,
            }));
            old_contents
        })
    }

    fn set_closing_all(&self, closing_all: bool) {
        self.state.borrow_mut().closing_all = closing_all;
    }

    /// Warns observers, then removes `doomed` in one batch. The caller holds
    /// the guard.
    fn remove_tabs(&self, doomed: &[Doomed], reason: TabRemovedReason) -> Vec<DetachedTab> {
        let warnings = self.read(|s| {
            let mut removed: Vec<usize> = Vec::new();
            let mut warnings = Vec::with_capacity(doomed.len());
            for &(handle, _) in doomed {
                let Some(original) = s.collection.index_of(handle) else {
                    continue;
                };
                let shift = removed.iter().filter(|&&r| r < original).count();
                removed.push(original);
                warnings.push(Notification::TabWillBeRemoved(handle, original - shift));
            }
            warnings
        });
        self.dispatch(&warnings);
        self.mutate(|state, events| state.remove_tabs(doomed, reason, events))
    }
}

impl ModelState {
    /// Removes `doomed` in order and records one combined remove change.
    fn remove_tabs(
        &mut self,
        doomed: &[Doomed],
        reason: TabRemovedReason,
        events: &mut Events,
    ) -> Vec<DetachedTab> {
        let originals: Vec<Option<usize>> = doomed
            .iter()
            .map(|(handle, _)| self.collection.index_of(*handle))
            .collect();
        events.selected_tabs_were_removed = originals
            .iter()
            .flatten()
            .any(|&i| self.selection.is_selected(i));

        let mut records = Vec::with_capacity(doomed.len());
        let mut detached = Vec::with_capacity(doomed.len());
        for (&(handle, historical_id), original) in doomed.iter().zip(originals) {
            let (Some(original), Some(index)) = (original, self.collection.index_of(handle)) else {
                continue;
            };
            let tab = self.remove_tab_at(index);
            tracing::debug!(tab = %handle, index, ?reason, "tab removed");
            records.push(RemovedTab {
                handle,
                contents: tab.contents().clone(),
                index: original,
                index_at_time_of_removal: index,
                reason,
                historical_id,
            });
            detached.push(DetachedTab {
                tab,
                index_before_any_removals: original,
                index_at_time_of_removal: index,
                reason,
            });
        }
        records.sort_by(|a, b| b.index.cmp(&a.index));
        events.set_change(TabStripModelChange::Remove(records));
        if self.collection.is_empty() {
            events.notify(Notification::TabStripEmpty);
        }
        detached
    }

    /// Detaches one tab and repairs the selection.
    fn remove_tab_at(&mut self, index: usize) -> Tab {
        let handle = self.checked_handle(index);
        let next = self.determine_new_selected_index(index);
        self.fix_openers(handle);
        let old_active = self.selection.active();
        let Some(tab) = self.collection.remove_at(index) else {
            panic!("index {index} out of range");
        };
        if self.collection.is_empty() {
            self.selection.clear();
        } else {
            self.selection.decrement_from(index);
            if old_active == Some(index) {
                if let Some(first) = self.selection.first_selected() {
                    self.selection.set_active(Some(first));
                    self.selection.set_anchor(Some(first));
                } else if let Some(next) = next {
                    tracing::debug!(index = next, "activating replacement tab");
                    self.selection.set_selected_index(next);
                }
            }
        }
        tab
    }
}
