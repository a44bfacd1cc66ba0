//! Group commands
//!
//! Membership always changes by moving tabs: a tab joins a group by being
//! placed inside its range and leaves by being placed at one of its edges.
//! The group registry catches up in the model's reconcile step, which also
//! emits the created/contents/closed notifications.

use std::collections::BTreeMap;

use super::{Events, ModelState, TabStripModel};
use crate::group::TabGroupVisualData;
use crate::move_engine::{new_group_destination, partition_by_midpoint};
use crate::observer::{Notification, TabGroupChange, TabGroupChangeKind};
use crate::tracing::span_names;
use crate::trace_operation_debug;
use crate::types::GroupId;

impl TabStripModel {
    /// Puts the tabs at `indices` into a new group and returns its id.
    ///
    /// The tabs gather right of the first of them. Grouped tabs other than
    /// the active one are deselected.
    ///
    /// # Panics
    ///
    /// Panics if groups are disabled, `indices` is empty or any index is out
    /// of range.
    pub fn add_to_new_group(&self, indices: &[usize]) -> GroupId {
        let group = GroupId::new();
        self.add_to_new_group_with(indices, group, None);
        group
    }

    /// Like [`add_to_new_group`](Self::add_to_new_group) with a caller-chosen
    /// id and visual data. Without visual data the group gets the least-used
    /// colour.
    ///
    /// # Panics
    ///
    /// Also panics if `group` is already registered.
    pub fn add_to_new_group_with(
        &self,
        indices: &[usize],
        group: GroupId,
        visual: Option<TabGroupVisualData>,
    ) {
        assert!(self.supports_tab_groups(), "tab groups are disabled");
        let _scope = self.guard.enter("add_to_new_group");
        let _span = trace_operation_debug!(span_names::GROUP, group = %group, count = indices.len()).entered();
        self.mutate(|state, events| {
            state.add_to_new_group(indices, group, visual, events);
            events.notify(Notification::GroupAdded(group));
        });
        self.delegate.group_added(group);
    }

    /// Adds the tabs at `indices` to `group`.
    ///
    /// Tabs left of the group join at its start and tabs right of it at its
    /// end, or all of them at the end when `add_to_end` is set. Unknown
    /// groups are ignored.
    pub fn add_to_existing_group(&self, indices: &[usize], group: GroupId, add_to_end: bool) {
        assert!(self.supports_tab_groups(), "tab groups are disabled");
        let _scope = self.guard.enter("add_to_existing_group");
        let _span = trace_operation_debug!(span_names::GROUP, group = %group, count = indices.len()).entered();
        self.mutate(|state, events| state.add_to_existing_group(indices, group, add_to_end, events));
    }

    /// Restores tabs into `group`, creating the group if it does not exist
    /// yet. Used when rebuilding a strip from saved state, so no
    /// group-added notification is sent.
    pub fn add_to_group_for_restore(&self, indices: &[usize], group: GroupId) {
        assert!(self.supports_tab_groups(), "tab groups are disabled");
        let _scope = self.guard.enter("add_to_group_for_restore");
        let _span = trace_operation_debug!(span_names::GROUP, group = %group, restore = true).entered();
        self.mutate(|state, events| {
            if state.groups.contains(group) {
                state.add_to_existing_group(indices, group, false, events);
            } else {
                state.add_to_new_group(indices, group, None, events);
            }
        });
    }

    /// Takes the tabs at `indices` out of their groups.
    ///
    /// Tabs left of their group's midpoint leave by its left edge, the rest
    /// by its right edge. Ungrouped indices are ignored.
    pub fn remove_from_group(&self, indices: &[usize]) {
        let _scope = self.guard.enter("remove_from_group");
        let _span = trace_operation_debug!(span_names::GROUP, count = indices.len()).entered();
        self.mutate(|state, events| state.remove_from_group(indices, events));
    }

    /// Replaces the title, colour or collapsed state of `group`.
    ///
    /// Collapsing the group of the active tab activates the nearest tab
    /// that stays visible.
    pub fn change_group_visuals(&self, group: GroupId, visual: TabGroupVisualData) {
        let _scope = self.guard.enter("change_group_visuals");
        let _span = trace_operation_debug!(span_names::GROUP, group = %group).entered();
        self.mutate(|state, events| {
            let collapsing = visual.is_collapsed;
            let Some(old) = state.groups.set_visual_data(group, visual.clone()) else {
                tracing::warn!(group = %group, "visual change for unknown group ignored");
                return;
            };
            if collapsing
                && !old.is_collapsed
                && let Some(active) = state.selection.active()
                && state.group_at(active) == Some(group)
                && let Some(next) = state.next_expanded_active_tab(active, Some(group))
            {
                tracing::debug!(group = %group, index = next, "collapsing the active group");
                state.selection.set_selected_index(next);
            }
            events.notify(Notification::GroupChanged(TabGroupChange {
                group,
                kind: TabGroupChangeKind::VisualsChanged { old, new: visual },
            }));
        });
    }

    /// Asks the embedder to show the editor of `group`.
    pub fn open_group_editor(&self, group: GroupId) {
        if !self.read(|s| s.groups.contains(group)) {
            return;
        }
        self.dispatch(&[Notification::GroupChanged(TabGroupChange {
            group,
            kind: TabGroupChangeKind::EditorOpened,
        })]);
    }

    /// A confirmed close of `group` stopped before every tab closed; the
    /// surviving tabs leave the group.
    pub fn group_close_stopped(&self, group: GroupId) {
        self.delegate.group_close_stopped(group);
        let _scope = self.guard.enter("group_close_stopped");
        let _span = trace_operation_debug!(span_names::GROUP, group = %group).entered();
        self.mutate(|state, events| {
            state.groups.set_closing(group, false);
            if let Some(range) = state.collection.group_range(group) {
                let indices: Vec<usize> = range.collect();
                state.remove_from_group(&indices, events);
            }
        });
    }
}

impl ModelState {
    fn add_to_new_group(
        &mut self,
        indices: &[usize],
        group: GroupId,
        visual: Option<TabGroupVisualData>,
        events: &mut Events,
    ) {
        let indices = sorted(indices);
        assert!(!indices.is_empty(), "a group needs at least one tab");
        for &index in &indices {
            self.checked_handle(index);
        }
        self.groups.add_group(group, visual);

        let destination = new_group_destination(&self.collection.layout(), &indices);
        self.move_and_set_group(&indices, destination, Some(group), events);

        let active = self.selection.active();
        if let Some(range) = self.collection.group_range(group) {
            for index in range.filter(|i| Some(*i) != active) {
                self.selection.remove_index_from_selection(index);
            }
        }
    }

    fn add_to_existing_group(
        &mut self,
        indices: &[usize],
        group: GroupId,
        add_to_end: bool,
        events: &mut Events,
    ) {
        let Some(range) = self.collection.group_range(group) else {
            tracing::warn!(group = %group, "cannot add tabs to an unknown group");
            return;
        };
        let indices = sorted(indices);
        for &index in &indices {
            self.checked_handle(index);
        }
        let first = range.start;
        let last = range.end - 1;
        let left: Vec<usize> = indices.iter().copied().filter(|&i| i < first).collect();
        let right: Vec<usize> = indices.iter().copied().filter(|&i| i > last).collect();

        if add_to_end {
            let all: Vec<usize> = left.into_iter().chain(right).collect();
            self.move_and_set_group(&all, last + 1, Some(group), events);
        } else {
            // Gathering the left tabs at the group's start leaves its end in
            // place.
            self.move_and_set_group(&left, first, Some(group), events);
            self.move_and_set_group(&right, last + 1, Some(group), events);
        }
    }

    fn remove_from_group(&mut self, indices: &[usize], events: &mut Events) {
        let mut by_group: BTreeMap<GroupId, Vec<usize>> = BTreeMap::new();
        for index in sorted(indices) {
            self.checked_handle(index);
            if let Some(group) = self.group_at(index) {
                by_group.entry(group).or_default().push(index);
            }
        }
        // Tabs only move within their own group's range, so the indices of
        // the other groups stay valid.
        for (group, indices) in by_group {
            let Some(range) = self.collection.group_range(group) else {
                continue;
            };
            let (left, right) = partition_by_midpoint(&indices, range.start, range.end - 1);
            self.move_and_set_group(&left, range.start, None, events);
            self.move_and_set_group(&right, range.end, None, events);
        }
    }

    /// Gathers `indices` at `destination`, given in the order before the
    /// move, and assigns `group`. Pinned tabs among them are unpinned.
    pub(crate) fn move_and_set_group(
        &mut self,
        indices: &[usize],
        destination: usize,
        group: Option<GroupId>,
        events: &mut Events,
    ) {
        if indices.is_empty() {
            return;
        }
        let moving_right = indices.iter().filter(|&&i| i < destination).count();
        self.move_block(indices, destination - moving_right, group, false, false, events);
    }
}

fn sorted(indices: &[usize]) -> Vec<usize> {
    let mut indices = indices.to_vec();
    indices.sort_unstable();
    indices.dedup();
    indices
}
