//! Choosing the next active tab when the active one is removed

use super::ModelState;
use crate::types::GroupId;

/// Index a tab at `index` will have once the tab at `removing` is gone.
const fn index_after_closing(index: usize, removing: usize) -> usize {
    if removing < index { index - 1 } else { index }
}

impl ModelState {
    /// Index to activate after removing the tab at `removing`, in the
    /// coordinates after the removal.
    ///
    /// Returns `None` unless that tab is the only selected one, since
    /// otherwise the rest of the selection supplies the next active tab.
    pub(crate) fn determine_new_selected_index(&self, removing: usize) -> Option<usize> {
        if self.selection.active() != Some(removing) || self.selection.size() > 1 {
            return None;
        }
        let removed = self.checked_handle(removing);
        let count = self.len();
        let expanded = |i: usize| !self.is_tab_collapsed(i);

        if self.select_opener_on_close {
            if let Some(child) = self.index_of_next_tab_opened_by(removed, removing)
                && expanded(child)
            {
                tracing::debug!(index = child, "activating a tab opened by the closed one");
                return Some(index_after_closing(child, removing));
            }
            if let Some(opener) = self.opener_of_tab_at(removing) {
                if let Some(sibling) = self.index_of_next_tab_opened_by(opener, removing)
                    && expanded(sibling)
                {
                    tracing::debug!(index = sibling, "activating a sibling by opener");
                    return Some(index_after_closing(sibling, removing));
                }
                if let Some(index) = self.collection.index_of(opener)
                    && expanded(index)
                {
                    tracing::debug!(index, "activating the opener");
                    return Some(index_after_closing(index, removing));
                }
            }
        }

        if let Some(split) = self.collection.tab_at(removing).and_then(|tab| tab.split()) {
            let right = self.collection.tab_at(removing + 1).and_then(|tab| tab.split());
            if right == Some(split) {
                return Some(removing);
            }
            if removing > 0 {
                return Some(removing - 1);
            }
        }

        if let Some(group) = self.group_at(removing) {
            if self.group_at(removing + 1) == Some(group) {
                return Some(removing);
            }
            if removing > 0 && self.group_at(removing - 1) == Some(group) {
                return Some(removing - 1);
            }
        }

        if let Some(next) = self.next_expanded_active_tab(removing, None) {
            return Some(index_after_closing(next, removing));
        }

        if removing + 1 >= count {
            Some(removing.saturating_sub(1))
        } else {
            Some(removing)
        }
    }

    /// Nearest tab, right of `start` first and then leftwards, that is not
    /// hidden in a collapsed group. `collapsing` counts as collapsed.
    pub(crate) fn next_expanded_active_tab(
        &self,
        start: usize,
        collapsing: Option<GroupId>,
    ) -> Option<usize> {
        let visible = |i: &usize| match self.group_at(*i) {
            None => true,
            Some(group) => !self.groups.is_collapsed(group) && Some(group) != collapsing,
        };
        let count = self.len();
        (start + 1..count)
            .find(visible)
            .or_else(|| (0..start.min(count)).rev().find(visible))
    }
}
