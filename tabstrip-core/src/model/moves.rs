//! Moving and pinning tabs
//!
//! Every move goes through [`ModelState::move_block`]: the block is
//! decomposed into single-slot moves that are replayed on the selection and
//! reported to observers, then the collection applies the whole block in one
//! placement together with its new group and pinned state.

use std::ops::Range;

use super::{Events, ModelState, TabStripModel};
use crate::move_engine::{
    block_group, constrain_move_index, group_to_assign, incremental_moves, plan_selected_move,
};
use crate::observer::{
    MovedTab, Notification, TabChangeType, TabGroupChange, TabGroupChangeKind,
};
use crate::tracing::span_names;
use crate::trace_operation_debug;
use crate::types::{GroupId, TabHandle};

impl TabStripModel {
    /// Moves the tab at `index` to `to`, clamped to the tab's region, and
    /// returns where it landed. Landing inside a group joins it; leaving a
    /// group with other members drops the membership.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn move_tab_to(&self, index: usize, to: usize, select_after_move: bool) -> usize {
        let _scope = self.guard.enter("move_tab_to");
        let _span = trace_operation_debug!(span_names::MOVE, index, to).entered();
        self.mutate(|state, events| {
            state.checked_handle(index);
            let layout = state.collection.layout();
            let pinned = layout.is_pinned(index);
            let to = constrain_move_index(&layout, to, pinned);
            if index == to {
                return to;
            }
            let group = if pinned {
                None
            } else {
                block_group(&layout, &[index], to, group_to_assign(&layout, index, to))
            };
            state.move_block(&[index], to, group, pinned, select_after_move, events);
            to
        })
    }

    /// Like [`move_tab_to`](Self::move_tab_to) but asks for `group`
    /// explicitly. The request is dropped where honouring it would split a
    /// group in two.
    pub fn move_tab_to_group(
        &self,
        index: usize,
        to: usize,
        select_after_move: bool,
        group: Option<GroupId>,
    ) -> usize {
        let _scope = self.guard.enter("move_tab_to_group");
        let _span = trace_operation_debug!(span_names::MOVE, index, to).entered();
        self.mutate(|state, events| {
            state.checked_handle(index);
            let layout = state.collection.layout();
            let pinned = layout.is_pinned(index);
            let to = constrain_move_index(&layout, to, pinned);
            let group = if pinned {
                None
            } else {
                block_group(&layout, &[index], to, group)
            };
            if index == to && group == layout.group_at(index) {
                return to;
            }
            state.move_block(&[index], to, group, pinned, select_after_move, events);
            to
        })
    }

    /// Moves the selection so it starts at `index`.
    ///
    /// Selected pinned tabs and selected unpinned tabs move as two blocks,
    /// each clamped to its own region. The unpinned block takes `group`
    /// where that keeps groups contiguous.
    pub fn move_selected_tabs_to(&self, index: usize, group: Option<GroupId>) {
        let _scope = self.guard.enter("move_selected_tabs_to");
        let _span = trace_operation_debug!(span_names::MOVE, index).entered();
        self.mutate(|state, events| {
            let selected = state.selection.selected_indices();
            if selected.is_empty() {
                return;
            }
            let layout = state.collection.layout();
            let plan = plan_selected_move(&layout, &selected, index);
            if !plan.pinned.is_empty() {
                state.move_block(&plan.pinned, plan.pinned_destination, None, true, false, events);
            }
            if !plan.unpinned.is_empty() {
                // Pinned moves stay inside the prefix, so unpinned indices
                // are unchanged.
                let layout = state.collection.layout();
                let group = block_group(&layout, &plan.unpinned, plan.unpinned_destination, group);
                state.move_block(
                    &plan.unpinned,
                    plan.unpinned_destination,
                    group,
                    false,
                    false,
                    events,
                );
            }
        });
    }

    /// Moves the whole of `group` so it starts at `to`, in the order after
    /// the move. A target inside another group or split snaps to its nearer
    /// edge.
    pub fn move_group_to(&self, group: GroupId, to: usize) {
        let _scope = self.guard.enter("move_group_to");
        let _span = trace_operation_debug!(span_names::GROUP, group = %group, to).entered();
        self.mutate(|state, events| {
            let Some(range) = state.collection.group_range(group) else {
                return;
            };
            let layout = state.collection.layout();
            let to = constrain_move_index(&layout, to, false).min(state.len() - range.len());
            let before = state.collection.handles();
            let Some(start) = state.collection.move_group_to(group, to) else {
                return;
            };
            if start == range.start {
                return;
            }
            let indices: Vec<usize> = range.collect();
            let moves = state.replay_moves(before, &indices, start, false);
            events.push_moves(moves);
            events.notify(Notification::GroupChanged(TabGroupChange {
                group,
                kind: TabGroupChangeKind::Moved,
            }));
        });
    }

    /// Moves the active tab (with its split) one step right.
    pub fn move_tab_next(&self) {
        let _scope = self.guard.enter("move_tab_next");
        let _span = trace_operation_debug!(span_names::MOVE, direction = "next").entered();
        self.mutate(|state, events| state.move_tab_relative(true, events));
    }

    /// Moves the active tab (with its split) one step left.
    pub fn move_tab_previous(&self) {
        let _scope = self.guard.enter("move_tab_previous");
        let _span = trace_operation_debug!(span_names::MOVE, direction = "previous").entered();
        self.mutate(|state, events| state.move_tab_relative(false, events));
    }

    /// Tabs that would sit left and right of the unpinned selection after
    /// [`move_selected_tabs_to`](Self::move_selected_tabs_to) with
    /// `destination`.
    #[must_use]
    pub fn adjacent_tabs_after_selected_move(
        &self,
        destination: usize,
    ) -> (Option<TabHandle>, Option<TabHandle>) {
        self.read(|s| {
            let (left, right) = crate::move_engine::adjacent_tabs_after_selected_move(
                &s.collection.layout(),
                &s.selection.selected_indices(),
                destination,
            );
            (
                left.and_then(|i| s.collection.handle_at(i)),
                right.and_then(|i| s.collection.handle_at(i)),
            )
        })
    }

    /// Pins or unpins the tab at `index` and returns its new index.
    ///
    /// A pinned tab moves to the end of the pinned prefix and leaves its
    /// group and split; an unpinned one moves to the start of the rest.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn set_tab_pinned(&self, index: usize, pinned: bool) -> usize {
        let _scope = self.guard.enter("set_tab_pinned");
        let _span = trace_operation_debug!(span_names::PIN, index, pinned).entered();
        self.mutate(|state, events| {
            let handle = state.checked_handle(index);
            state.set_pinned(handle, pinned, events).unwrap_or(index)
        })
    }

    /// Pins or unpins several tabs in one mutation.
    pub fn set_tabs_pinned(&self, indices: &[usize], pinned: bool) {
        let _scope = self.guard.enter("set_tabs_pinned");
        let _span = trace_operation_debug!(span_names::PIN, count = indices.len(), pinned).entered();
        self.mutate(|state, events| {
            let mut indices = indices.to_vec();
            indices.sort_unstable();
            indices.dedup();
            // Unpinning from the right keeps the relative order.
            if !pinned {
                indices.reverse();
            }
            let handles: Vec<TabHandle> = indices.iter().map(|&i| state.checked_handle(i)).collect();
            for handle in handles {
                state.set_pinned(handle, pinned, events);
            }
        });
    }

    /// Sets whether the tab at `index` is blocked by a modal dialog.
    pub fn set_tab_blocked(&self, index: usize, blocked: bool) {
        let _scope = self.guard.enter("set_tab_blocked");
        self.mutate(|state, events| {
            let handle = state.checked_handle(index);
            if let Some(tab) = state.collection.tab_mut(handle)
                && tab.blocked() != blocked
            {
                tab.set_blocked(blocked);
                events.notify(Notification::BlockedStateChanged(handle, index));
            }
        });
    }

    /// Tells observers the tab at `index` changed in a way that does not
    /// touch the strip's structure.
    pub fn update_tab_state_at(&self, index: usize, change_type: TabChangeType) {
        let handle = self.read(|s| s.checked_handle(index));
        self.dispatch(&[Notification::TabChanged(handle, index, change_type)]);
    }

    /// Sets or clears the attention indicator of the tab at `index`.
    pub fn set_tab_needs_attention_at(&self, index: usize, attention: bool) {
        self.read(|s| s.checked_handle(index));
        self.dispatch(&[Notification::NeedsAttention(index, attention)]);
    }
}

impl ModelState {
    /// Moves the tabs at `indices` (ascending) so they occupy
    /// `destination..` in the final order, with `group` and `pinned` applied.
    ///
    /// The caller picks a `group` that keeps every group contiguous.
    pub(crate) fn move_block(
        &mut self,
        indices: &[usize],
        destination: usize,
        group: Option<GroupId>,
        pinned: bool,
        select_after_move: bool,
        events: &mut Events,
    ) {
        let before = self.collection.handles();
        let moves = self.replay_moves(before, indices, destination, select_after_move);
        self.collection.move_tabs(indices, destination, group, pinned);
        events.push_moves(moves);
    }

    /// Replays the single-slot moves of a block move on `order` and the
    /// selection, re-parenting the openers of every tab that moves.
    fn replay_moves(
        &mut self,
        mut order: Vec<TabHandle>,
        indices: &[usize],
        destination: usize,
        select_after_move: bool,
    ) -> Vec<MovedTab> {
        let mut moves = Vec::new();
        for (from, to) in incremental_moves(indices, destination) {
            if from == to {
                continue;
            }
            let handle = order.remove(from);
            order.insert(to, handle);
            self.fix_openers(handle);
            self.selection.move_range(from, to, 1);
            moves.push(MovedTab { handle, from, to });
        }
        if select_after_move && !self.selection.is_selected(destination) {
            self.selection.set_selected_index(destination);
        }
        moves
    }

    /// Pins or unpins `handle`. Returns the new index, or `None` if the
    /// tab already was in that state.
    fn set_pinned(&mut self, handle: TabHandle, pinned: bool, events: &mut Events) -> Option<usize> {
        let index = self.collection.index_of(handle)?;
        if self.collection.tab(handle)?.pinned() == pinned {
            return None;
        }
        let boundary = self.collection.index_of_first_non_pinned_tab();
        let destination = if pinned { boundary } else { boundary - 1 };
        self.move_block(&[index], destination, None, pinned, false, events);
        Some(destination)
    }

    /// One step of [`TabStripModel::move_tab_next`] or
    /// [`TabStripModel::move_tab_previous`].
    ///
    /// Reaching a group boundary first changes membership in place: a
    /// grouped tab leaves its group, an ungrouped one joins the neighbouring
    /// group unless that group is collapsed, which is hopped over whole.
    /// Foreign splits are hopped over too.
    fn move_tab_relative(&mut self, forward: bool, events: &mut Events) {
        let Some(active) = self.selection.active() else {
            return;
        };
        let layout = self.collection.layout();
        let pinned = layout.is_pinned(active);
        let own_split = layout.split_at(active);
        let unit: Range<usize> = own_split
            .and_then(|split| self.collection.split_range(split))
            .unwrap_or(active..active + 1);
        let region = if pinned {
            0..layout.pinned_count()
        } else {
            layout.pinned_count()..layout.len()
        };
        let neighbor = if forward {
            Some(unit.end)
        } else {
            unit.start.checked_sub(1)
        }
        .filter(|i| region.contains(i));

        let current_group = layout.group_at(active);
        let neighbor_group = neighbor.and_then(|i| layout.group_at(i));
        let indices: Vec<usize> = unit.clone().collect();

        let (destination, group) = if current_group == neighbor_group {
            let Some(neighbor) = neighbor else {
                return;
            };
            let step = layout
                .split_at(neighbor)
                .filter(|split| Some(*split) != own_split)
                .and_then(|split| self.collection.split_range(split))
                .map_or(1, |range| range.len());
            let destination = if forward {
                unit.start + step
            } else {
                unit.start - step
            };
            (destination, current_group)
        } else if current_group.is_some() {
            (unit.start, None)
        } else if let Some(target) = neighbor_group {
            if self.groups.is_collapsed(target) {
                let Some(range) = self.collection.group_range(target) else {
                    return;
                };
                let destination = if forward {
                    range.end - unit.len()
                } else {
                    range.start
                };
                (destination, None)
            } else {
                (unit.start, Some(target))
            }
        } else {
            return;
        };
        self.move_block(&indices, destination, group, pinned, false, events);
    }
}
