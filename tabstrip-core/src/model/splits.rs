//! Split commands

use super::{Events, ModelState, TabStripModel};
use crate::error::{TabStripError, TabStripResult};
use crate::observer::{Notification, SplitChange, SplitChangeKind};
use crate::split::{SplitLayout, SplitVisualData};
use crate::tracing::span_names;
use crate::trace_operation_debug;
use crate::types::{SplitId, TabHandle};

impl TabStripModel {
    /// Shows the tabs at `indices` side by side with the active tab.
    ///
    /// The other members gather around the active tab, those left of it on
    /// its left and the rest on its right, and take its group. Without
    /// `visual` the split uses the configured default ratio.
    ///
    /// # Errors
    ///
    /// Fails without changing anything if splits are disabled, an index is
    /// out of range, fewer than two tabs would take part, a member is pinned
    /// or already split, or `visual` carries an invalid ratio.
    pub fn add_to_new_split(
        &self,
        indices: &[usize],
        visual: Option<SplitVisualData>,
    ) -> TabStripResult<SplitId> {
        if !self.supports_splits() {
            return Err(TabStripError::SplitsUnsupported);
        }
        let visual = visual.unwrap_or(SplitVisualData {
            layout: SplitLayout::default(),
            ratio: self.settings.default_split_ratio,
        });
        visual.validate()?;
        let _scope = self.guard.enter("add_to_new_split");
        let _span = trace_operation_debug!(span_names::SPLIT, count = indices.len()).entered();
        self.mutate(|state, events| state.add_to_new_split(indices, visual, events))
    }

    /// Dissolves `split`; its tabs stay where they are.
    ///
    /// # Errors
    ///
    /// Returns [`TabStripError::SplitNotFound`] for an unknown split.
    pub fn remove_split(&self, split: SplitId) -> TabStripResult<()> {
        let _scope = self.guard.enter("remove_split");
        let _span = trace_operation_debug!(span_names::SPLIT, split = %split).entered();
        self.mutate(|state, _| {
            if !state.splits.contains(split) {
                return Err(TabStripError::SplitNotFound(split));
            }
            state.collection.dissolve_split(split);
            Ok(())
        })
    }

    /// Replaces the layout data of `split`.
    ///
    /// # Errors
    ///
    /// Fails for an unknown split or an out-of-range ratio.
    pub fn update_split_visuals(&self, split: SplitId, visual: SplitVisualData) -> TabStripResult<()> {
        let _scope = self.guard.enter("update_split_visuals");
        let _span = trace_operation_debug!(span_names::SPLIT, split = %split).entered();
        self.mutate(|state, events| {
            let old = state.splits.set_visual_data(split, visual)?;
            events.notify(Notification::SplitChanged(SplitChange {
                split,
                kind: SplitChangeKind::VisualsChanged { old, new: visual },
            }));
            Ok(())
        })
    }

    /// Focuses `handle` within `split` by activating it.
    ///
    /// # Errors
    ///
    /// Fails for an unknown split or a tab that is not one of its members.
    pub fn set_active_in_split(&self, split: SplitId, handle: TabHandle) -> TabStripResult<()> {
        let index = self.read(|s| {
            let data = s.splits.get(split).ok_or(TabStripError::SplitNotFound(split))?;
            if !data.members().contains(&handle) {
                return Err(TabStripError::TabNotFound(handle));
            }
            s.collection
                .index_of(handle)
                .ok_or(TabStripError::TabNotFound(handle))
        })?;
        self.activate_tab_at(index, false);
        Ok(())
    }
}

impl ModelState {
    fn add_to_new_split(
        &mut self,
        indices: &[usize],
        visual: SplitVisualData,
        events: &mut Events,
    ) -> TabStripResult<SplitId> {
        let count = self.len();
        if let Some(&index) = indices.iter().find(|&&i| i >= count) {
            return Err(TabStripError::IndexOutOfRange { index, count });
        }
        let active = self
            .selection
            .active()
            .ok_or(TabStripError::SplitTooSmall { count: 0 })?;
        let mut members: Vec<usize> = indices.iter().copied().chain([active]).collect();
        members.sort_unstable();
        members.dedup();
        if members.len() < 2 {
            return Err(TabStripError::SplitTooSmall {
                count: members.len(),
            });
        }
        for &index in &members {
            let handle = self.checked_handle(index);
            let Some(tab) = self.collection.tab(handle) else {
                return Err(TabStripError::TabNotFound(handle));
            };
            if tab.pinned() {
                return Err(TabStripError::PinnedTabInSplit);
            }
            if tab.split().is_some() {
                return Err(TabStripError::InvariantViolation(format!(
                    "{handle} already belongs to a split"
                )));
            }
        }

        let active_handle = self.checked_handle(active);
        let group = self.group_at(active);
        let left: Vec<usize> = members.iter().copied().filter(|&i| i < active).collect();
        let right: Vec<usize> = members.iter().copied().filter(|&i| i > active).collect();
        self.move_and_set_group(&left, active, group, events);
        // Only tabs left of the active one moved, so `right` is unchanged.
        let active = self
            .collection
            .index_of(active_handle)
            .ok_or(TabStripError::TabNotFound(active_handle))?;
        self.move_and_set_group(&right, active + 1, group, events);

        let start = active - left.len();
        let handles: Vec<TabHandle> = (start..start + members.len())
            .map(|i| self.checked_handle(i))
            .collect();
        let split = SplitId::new();
        self.collection.create_split(split, &handles)?;
        self.splits
            .add_split(split, visual, handles.clone(), Some(active_handle));
        tracing::debug!(split = %split, members = handles.len(), "split created");
        events.notify(Notification::SplitChanged(SplitChange {
            split,
            kind: SplitChangeKind::Added {
                tabs: handles.into_iter().zip(start..).collect(),
            },
        }));
        Ok(split)
    }
}
