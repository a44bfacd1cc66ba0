//! Selection commands

use std::ops::Range;

use super::{ModelState, TabStripModel};
use crate::observer::SelectionChangeReason;
use crate::selection::ListSelectionModel;
use crate::tab::Tab;
use crate::tracing::span_names;
use crate::trace_operation_debug;

impl TabStripModel {
    /// Makes the tab at `index` the only selected tab and activates it.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn activate_tab_at(&self, index: usize, user_gesture: bool) {
        let _scope = self.guard.enter("activate_tab_at");
        let _span = trace_operation_debug!(span_names::SELECT, index, user_gesture).entered();
        self.mutate(|state, events| {
            state.checked_handle(index);
            state.selection.set_selected_index(index);
            if user_gesture {
                events.set_reason(SelectionChangeReason::UserGesture);
            }
        });
    }

    /// Selects the range from the anchor to `index`, replacing the current
    /// selection, and activates `index`.
    pub fn extend_selection_to(&self, index: usize) {
        let _scope = self.guard.enter("extend_selection_to");
        let _span = trace_operation_debug!(span_names::SELECT, index).entered();
        self.mutate(|state, _| {
            state.checked_handle(index);
            state.selection.set_selection_from_anchor_to(index);
        });
    }

    /// Adds the range from the anchor to `index` and activates `index`.
    pub fn add_selection_from_anchor_to(&self, index: usize) {
        let _scope = self.guard.enter("add_selection_from_anchor_to");
        let _span = trace_operation_debug!(span_names::SELECT, index).entered();
        self.mutate(|state, _| {
            state.checked_handle(index);
            state.selection.add_selection_from_anchor_to(index);
        });
    }

    /// Flips whether the tab at `index` (with its split) is selected.
    ///
    /// Returns false, changing nothing, when that would leave the selection
    /// empty.
    pub fn toggle_selection_at(&self, index: usize) -> bool {
        let _scope = self.guard.enter("toggle_selection_at");
        let _span = trace_operation_debug!(span_names::SELECT, index).entered();
        self.mutate(|state, _| state.toggle_selection_at(index))
    }

    /// Replaces the selection wholesale.
    ///
    /// # Panics
    ///
    /// Panics if `selection` has no active index or names an index out of
    /// range.
    pub fn set_selection_from_model(&self, selection: ListSelectionModel) {
        let _scope = self.guard.enter("set_selection_from_model");
        let _span = trace_operation_debug!(span_names::SELECT, size = selection.size()).entered();
        self.mutate(|state, _| {
            let Some(active) = selection.active() else {
                panic!("a selection needs an active index");
            };
            state.checked_handle(active);
            if let Some(&last) = selection.selected_indices().last() {
                state.checked_handle(last);
            }
            state.selection = selection;
            state.selection.add_index_to_selection(active);
        });
    }

    /// Activates the next tab not hidden in a collapsed group, wrapping at
    /// the end.
    pub fn select_next_tab(&self, user_gesture: bool) {
        self.select_relative_tab(true, user_gesture);
    }

    /// Activates the previous tab not hidden in a collapsed group, wrapping
    /// at the start.
    pub fn select_previous_tab(&self, user_gesture: bool) {
        self.select_relative_tab(false, user_gesture);
    }

    /// Activates the last tab.
    pub fn select_last_tab(&self, user_gesture: bool) {
        let count = self.count();
        if count > 0 {
            self.activate_tab_at(count - 1, user_gesture);
        }
    }

    fn select_relative_tab(&self, forward: bool, user_gesture: bool) {
        let target = self.read(|s| s.relative_tab(forward));
        if let Some(index) = target {
            self.activate_tab_at(index, user_gesture);
        }
    }
}

impl ModelState {
    fn toggle_selection_at(&mut self, index: usize) -> bool {
        self.checked_handle(index);
        let range: Range<usize> = self
            .collection
            .tab_at(index)
            .and_then(Tab::split)
            .and_then(|split| self.collection.split_range(split))
            .unwrap_or(index..index + 1);
        let selection = &mut self.selection;
        if selection.is_selected(index) {
            if selection.size() <= range.len() {
                return false;
            }
            for i in range.clone() {
                selection.remove_index_from_selection(i);
            }
            selection.set_anchor(Some(index));
            if selection.active().is_none_or(|active| range.contains(&active)) {
                let first = selection.first_selected();
                selection.set_active(first);
            }
        } else {
            selection.add_index_to_selection(index);
            selection.set_anchor(Some(index));
            selection.set_active(Some(index));
        }
        true
    }

    /// The nearest tab after (or before) the active one, wrapping around,
    /// that is not in a collapsed group.
    fn relative_tab(&self, forward: bool) -> Option<usize> {
        let count = self.len();
        let active = self.selection.active()?;
        (1..count)
            .map(|step| {
                if forward {
                    (active + step) % count
                } else {
                    (active + count - step) % count
                }
            })
            .find(|&i| !self.is_tab_collapsed(i))
    }
}
