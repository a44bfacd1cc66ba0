//! Tab context menu commands
//!
//! A command acts on the context tab alone, or on the whole selection when
//! the context tab is selected. Commands that would take every tab out of a
//! group ask the delegate first (see [`TabStripModelDelegate::on_groups_destruction`]).
//!
//! [`TabStripModelDelegate::on_groups_destruction`]: crate::delegate::TabStripModelDelegate::on_groups_destruction

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{CloseTypes, TabStripModel};
use crate::delegate::{CloseProposal, DeferredAction, DeferredCommand};
use crate::tab::{NEW_TAB_URL, TabContents};
use crate::types::{GroupId, TabHandle};

/// Entries of the tab context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextMenuCommand {
    /// Open a new tab right of the context tab.
    NewTabToRight,
    /// Reload the tabs.
    Reload,
    /// Duplicate the tabs.
    Duplicate,
    /// Close the tabs.
    CloseTab,
    /// Close every other unpinned tab.
    CloseOtherTabs,
    /// Close the unpinned tabs to the right.
    CloseTabsToRight,
    /// Pin the tabs, or unpin them if all are pinned.
    TogglePinned,
    /// Group the tabs, or ungroup them if they already share a group.
    ToggleGrouped,
    /// Mute the tabs' sites, or unmute them if all are muted.
    ToggleSiteMuted,
    /// Save the tabs to the read-later list.
    AddToReadLater,
    /// Put the tabs into a new group.
    AddToNewGroup,
    /// Put the tabs into an existing group, chosen from a submenu.
    AddToExistingGroup,
    /// Take the tabs out of their groups.
    RemoveFromGroup,
    /// Move the tabs into a new window.
    MoveTabsToNewWindow,
    /// Show the context tab side by side with the active tab.
    AddToNewSplit,
    /// Navigate the context tab back.
    GoBack,
}

impl TabStripModel {
    /// Whether `command` can run for the tab at `index`.
    #[must_use]
    pub fn is_context_menu_command_enabled(&self, index: usize, command: ContextMenuCommand) -> bool {
        if !self.contains_index(index) {
            return false;
        }
        let indices = self.indices_for_command(index);
        match command {
            ContextMenuCommand::NewTabToRight
            | ContextMenuCommand::CloseTab
            | ContextMenuCommand::TogglePinned => true,
            ContextMenuCommand::Reload => self
                .contents_for(&indices)
                .iter()
                .any(|contents| self.delegate.can_reload(contents)),
            ContextMenuCommand::Duplicate => indices
                .iter()
                .any(|&i| self.delegate.can_duplicate_contents_at(self, i)),
            ContextMenuCommand::CloseOtherTabs | ContextMenuCommand::CloseTabsToRight => {
                !self.indices_closed_by_command(index, command).is_empty()
            }
            ContextMenuCommand::ToggleSiteMuted => self
                .contents_for(&indices)
                .iter()
                .any(|contents| !contents.url.is_empty()),
            ContextMenuCommand::AddToReadLater => self.delegate.supports_read_later(),
            ContextMenuCommand::ToggleGrouped
            | ContextMenuCommand::AddToNewGroup
            | ContextMenuCommand::AddToExistingGroup
            | ContextMenuCommand::RemoveFromGroup => self.supports_tab_groups(),
            ContextMenuCommand::MoveTabsToNewWindow => {
                indices.len() != self.count() && self.delegate.can_move_tabs_to_window(self, &indices)
            }
            ContextMenuCommand::AddToNewSplit => self.can_split_with_active(index),
            ContextMenuCommand::GoBack => self
                .contents_at(index)
                .is_some_and(|contents| self.delegate.can_go_back(&contents)),
        }
    }

    /// Runs `command` for the tab at `index`. Does nothing if the strip
    /// changed so that `index` no longer exists.
    pub fn execute_context_menu_command(&self, index: usize, command: ContextMenuCommand) {
        if !self.contains_index(index) {
            tracing::debug!(index, ?command, "context menu index went stale");
            return;
        }
        tracing::debug!(index, ?command, "context menu command");
        match command {
            ContextMenuCommand::NewTabToRight => {
                let group = self.group_for_tab(index);
                self.delegate
                    .add_tab_at(self, NEW_TAB_URL, Some(index + 1), true, group);
            }
            ContextMenuCommand::Reload => {
                for contents in self.contents_for(&self.indices_for_command(index)) {
                    if self.delegate.can_reload(&contents) {
                        self.delegate.reload_contents(&contents);
                    }
                }
            }
            ContextMenuCommand::Duplicate => {
                // Indices shift as copies are inserted.
                for handle in self.handles_for(&self.indices_for_command(index)) {
                    if let Some(i) = self.index_of(handle)
                        && self.delegate.can_duplicate_contents_at(self, i)
                    {
                        self.delegate.duplicate_contents_at(self, i);
                    }
                }
            }
            ContextMenuCommand::CloseTab => {
                self.execute_close_tabs_by_indices_command(&self.indices_for_command(index));
            }
            ContextMenuCommand::CloseOtherTabs | ContextMenuCommand::CloseTabsToRight => {
                self.execute_close_tabs_by_indices_command(
                    &self.indices_closed_by_command(index, command),
                );
            }
            ContextMenuCommand::TogglePinned => {
                let pin = self.will_context_menu_pin(index);
                self.run_confirmed(
                    &self.indices_for_command(index),
                    DeferredAction::SetPinned(pin),
                    None,
                );
            }
            ContextMenuCommand::ToggleGrouped => {
                if !self.supports_tab_groups() {
                    return;
                }
                let indices = self.indices_for_command(index);
                if self.will_context_menu_group(index) {
                    let group = self.add_to_new_group(&indices);
                    self.open_group_editor(group);
                } else {
                    self.run_confirmed(&indices, DeferredAction::RemoveFromGroup, None);
                }
            }
            ContextMenuCommand::ToggleSiteMuted => {
                let mute = self.will_context_menu_mute_sites(index);
                let contents = self.contents_for(&self.indices_for_command(index));
                self.delegate.set_sites_muted(&contents, mute);
            }
            ContextMenuCommand::AddToReadLater => {
                if self.delegate.supports_read_later() {
                    let contents = self.contents_for(&self.indices_for_command(index));
                    self.delegate.add_to_read_later(&contents);
                }
            }
            ContextMenuCommand::AddToNewGroup => {
                if self.supports_tab_groups() {
                    self.run_confirmed(
                        &self.indices_for_command(index),
                        DeferredAction::AddToNewGroup,
                        None,
                    );
                }
            }
            // The group comes from a submenu, see
            // `execute_add_to_existing_group_command`.
            ContextMenuCommand::AddToExistingGroup => {}
            ContextMenuCommand::RemoveFromGroup => {
                if self.supports_tab_groups() {
                    self.run_confirmed(
                        &self.indices_for_command(index),
                        DeferredAction::RemoveFromGroup,
                        None,
                    );
                }
            }
            ContextMenuCommand::MoveTabsToNewWindow => {
                self.run_confirmed(
                    &self.indices_for_command(index),
                    DeferredAction::MoveToNewWindow,
                    None,
                );
            }
            ContextMenuCommand::AddToNewSplit => {
                if let Err(err) = self.add_to_new_split(&[index], None) {
                    tracing::debug!(index, error = %err, "split command refused");
                }
            }
            ContextMenuCommand::GoBack => {
                if let Some(handle) = self.handle_at(index)
                    && self
                        .contents_at(index)
                        .is_some_and(|contents| self.delegate.can_go_back(&contents))
                {
                    self.delegate.go_back(self, handle);
                }
            }
        }
    }

    /// Adds the context tabs to `group`, the submenu half of
    /// [`ContextMenuCommand::AddToExistingGroup`].
    pub fn execute_add_to_existing_group_command(&self, index: usize, group: GroupId) {
        if !self.supports_tab_groups() || !self.contains_index(index) {
            return;
        }
        // Emptying the target group into itself destroys nothing.
        self.run_confirmed(
            &self.indices_for_command(index),
            DeferredAction::AddToExistingGroup(group),
            Some(group),
        );
    }

    /// Closes the tabs at `indices`, asking first if that empties a group.
    pub fn execute_close_tabs_by_indices_command(&self, indices: &[usize]) {
        let proposal = self.propose_close(indices);
        self.confirm_and_run(&proposal.groups_at_risk, proposal.command);
    }

    /// The tabs a command for `index` acts on: the selection if `index` is
    /// selected, else just `index`.
    #[must_use]
    pub fn indices_for_command(&self, index: usize) -> Vec<usize> {
        if self.is_tab_selected(index) {
            self.selected_indices()
        } else {
            vec![index]
        }
    }

    /// Indices, descending, closed by [`ContextMenuCommand::CloseOtherTabs`]
    /// or [`ContextMenuCommand::CloseTabsToRight`] at `index`. Pinned tabs
    /// survive, and so does the selection when `index` is part of it.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn indices_closed_by_command(&self, index: usize, command: ContextMenuCommand) -> Vec<usize> {
        assert!(self.contains_index(index), "index {index} out of range");
        let selected = self.is_tab_selected(index);
        let keep_through = match command {
            ContextMenuCommand::CloseTabsToRight if selected => {
                self.selected_indices().last().copied()
            }
            ContextMenuCommand::CloseTabsToRight => Some(index),
            ContextMenuCommand::CloseOtherTabs => None,
            _ => return Vec::new(),
        };
        let first = keep_through.map_or(0, |last| last + 1);
        (first..self.count())
            .rev()
            .filter(|&i| {
                i != index && !self.is_tab_pinned(i) && !(selected && self.is_tab_selected(i))
            })
            .collect()
    }

    /// True if [`ContextMenuCommand::TogglePinned`] at `index` pins, false if
    /// it unpins.
    #[must_use]
    pub fn will_context_menu_pin(&self, index: usize) -> bool {
        !self
            .indices_for_command(index)
            .iter()
            .all(|&i| self.is_tab_pinned(i))
    }

    /// True if [`ContextMenuCommand::ToggleGrouped`] at `index` groups, false
    /// if the tabs already share a group and it ungroups.
    #[must_use]
    pub fn will_context_menu_group(&self, index: usize) -> bool {
        if !self.supports_tab_groups() {
            return false;
        }
        let indices = self.indices_for_command(index);
        let Some(group) = indices.first().and_then(|&i| self.group_for_tab(i)) else {
            return true;
        };
        indices.iter().any(|&i| self.group_for_tab(i) != Some(group))
    }

    /// True if [`ContextMenuCommand::ToggleSiteMuted`] at `index` mutes.
    #[must_use]
    pub fn will_context_menu_mute_sites(&self, index: usize) -> bool {
        let contents = self.contents_for(&self.indices_for_command(index));
        !self.delegate.are_all_sites_muted(&contents)
    }

    /// Groups that would lose every tab if the tabs at `indices` left.
    #[must_use]
    pub fn groups_destroyed_by_removing(&self, indices: &[usize]) -> Vec<GroupId> {
        if !self.supports_tab_groups() {
            return Vec::new();
        }
        let mut indices = indices.to_vec();
        indices.sort_unstable();
        indices.dedup();
        let mut order = Vec::new();
        let mut leaving: HashMap<GroupId, usize> = HashMap::new();
        for group in indices.iter().filter_map(|&i| self.group_for_tab(i)) {
            let count = leaving.entry(group).or_insert(0);
            if *count == 0 {
                order.push(group);
            }
            *count += 1;
        }
        self.read(|s| {
            order
                .into_iter()
                .filter(|group| {
                    s.groups
                        .get(*group)
                        .is_some_and(|data| data.tab_count() == leaving[group])
                })
                .collect()
        })
    }

    /// Prepares closing the tabs at `indices` without running it.
    #[must_use]
    pub fn propose_close(&self, indices: &[usize]) -> CloseProposal {
        CloseProposal {
            groups_at_risk: self.groups_destroyed_by_removing(indices),
            command: DeferredCommand::new(
                self.handles_for(indices),
                DeferredAction::CloseTabs(CloseTypes::CREATE_HISTORICAL_TAB | CloseTypes::USER_GESTURE),
            ),
        }
    }

    /// Runs a command the delegate confirmed. Tabs that have gone away
    /// since the command was made are skipped.
    pub fn execute_deferred(&self, command: DeferredCommand) {
        let handles: Vec<TabHandle> = command
            .tabs()
            .iter()
            .copied()
            .filter(|handle| self.index_of(*handle).is_some())
            .collect();
        let mut indices: Vec<usize> = handles.iter().filter_map(|h| self.index_of(*h)).collect();
        indices.sort_unstable();
        tracing::debug!(action = ?command.action(), tabs = indices.len(), "running deferred command");
        match command.action() {
            DeferredAction::CloseGroup(group) => {
                self.close_all_tabs_in_group(group);
                return;
            }
            _ if indices.is_empty() => return,
            DeferredAction::CloseTabs(close_types) => {
                self.close_tabs(&handles, close_types);
            }
            DeferredAction::RemoveFromGroup => self.remove_from_group(&indices),
            DeferredAction::AddToNewGroup => {
                if self.supports_tab_groups() {
                    let group = self.add_to_new_group(&indices);
                    self.open_group_editor(group);
                }
            }
            DeferredAction::AddToExistingGroup(group) => {
                if self.supports_tab_groups() {
                    self.add_to_existing_group(&indices, group, false);
                }
            }
            DeferredAction::MoveToNewWindow => {
                self.delegate.move_tabs_to_new_window(self, &indices);
            }
            DeferredAction::SetPinned(pinned) => self.set_tabs_pinned(&indices, pinned),
        }
    }

    fn run_confirmed(&self, indices: &[usize], action: DeferredAction, exempt: Option<GroupId>) {
        let mut groups = self.groups_destroyed_by_removing(indices);
        if exempt.is_some() && groups.len() == 1 && groups.first().copied() == exempt {
            groups.clear();
        }
        let command = DeferredCommand::new(self.handles_for(indices), action);
        self.confirm_and_run(&groups, command);
    }

    fn confirm_and_run(&self, groups: &[GroupId], command: DeferredCommand) {
        if groups.is_empty() {
            self.execute_deferred(command);
            return;
        }
        match self.delegate.on_groups_destruction(groups, command) {
            Some(command) => self.execute_deferred(command),
            None => tracing::debug!(groups = groups.len(), "group destruction awaits confirmation"),
        }
    }

    fn can_split_with_active(&self, index: usize) -> bool {
        if !self.supports_splits() {
            return false;
        }
        let Some(active) = self.active_index() else {
            return false;
        };
        index != active
            && [index, active].iter().all(|&i| {
                self.tab_at(i)
                    .is_some_and(|tab| !tab.pinned() && tab.split().is_none())
            })
    }

    fn handles_for(&self, indices: &[usize]) -> Vec<TabHandle> {
        indices.iter().filter_map(|&i| self.handle_at(i)).collect()
    }

    fn contents_for(&self, indices: &[usize]) -> Vec<TabContents> {
        indices.iter().filter_map(|&i| self.contents_at(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::delegate::TabStripModelDelegate;
    use crate::model::test_util::{model_with, model_with_delegate, order, record};

    /// Delegate that holds group-destroying commands for a later decision.
    #[derive(Debug, Default)]
    struct Holding {
        held: RefCell<Vec<DeferredCommand>>,
        muted: RefCell<Vec<bool>>,
    }

    impl TabStripModelDelegate for Holding {
        fn on_groups_destruction(
            &self,
            _groups: &[GroupId],
            command: DeferredCommand,
        ) -> Option<DeferredCommand> {
            self.held.borrow_mut().push(command);
            None
        }

        fn set_sites_muted(&self, _contents: &[TabContents], mute: bool) {
            self.muted.borrow_mut().push(mute);
        }
    }

    fn holding(count: usize) -> (TabStripModel, Rc<Holding>) {
        let delegate = Rc::new(Holding::default());
        let model = model_with_delegate(count, delegate.clone());
        (model, delegate)
    }

    #[test]
    fn closed_by_command_skips_the_selection() {
        let model = model_with(5);
        model.activate_tab_at(1, false);
        assert_eq!(
            model.indices_closed_by_command(1, ContextMenuCommand::CloseTabsToRight),
            vec![4, 3, 2]
        );
        model.toggle_selection_at(3);
        assert_eq!(
            model.indices_closed_by_command(1, ContextMenuCommand::CloseTabsToRight),
            vec![4]
        );
        assert_eq!(
            model.indices_closed_by_command(1, ContextMenuCommand::CloseOtherTabs),
            vec![4, 2, 0]
        );
    }

    #[test]
    fn closed_by_command_skips_pinned_tabs() {
        let model = model_with(4);
        model.set_tab_pinned(3, true);
        assert_eq!(
            model.indices_closed_by_command(2, ContextMenuCommand::CloseOtherTabs),
            vec![3, 1]
        );
    }

    #[test]
    fn stale_index_does_nothing() {
        let model = model_with(2);
        let recorder = record(&model);
        assert!(!model.is_context_menu_command_enabled(5, ContextMenuCommand::CloseTab));
        model.execute_context_menu_command(5, ContextMenuCommand::CloseTab);
        assert_eq!(model.count(), 2);
        assert!(recorder.take().is_empty());
    }

    #[test]
    fn default_delegate_enables_conservatively() {
        let model = model_with(2);
        assert!(model.is_context_menu_command_enabled(0, ContextMenuCommand::NewTabToRight));
        assert!(model.is_context_menu_command_enabled(0, ContextMenuCommand::Duplicate));
        assert!(model.is_context_menu_command_enabled(1, ContextMenuCommand::AddToNewSplit));
        assert!(!model.is_context_menu_command_enabled(0, ContextMenuCommand::AddToNewSplit));
        assert!(!model.is_context_menu_command_enabled(0, ContextMenuCommand::MoveTabsToNewWindow));
        assert!(!model.is_context_menu_command_enabled(0, ContextMenuCommand::GoBack));
        assert!(!model.is_context_menu_command_enabled(0, ContextMenuCommand::AddToReadLater));
    }

    #[test]
    fn new_tab_opens_right_of_the_context_tab() {
        let model = model_with(3);
        model.execute_context_menu_command(0, ContextMenuCommand::NewTabToRight);
        assert_eq!(model.count(), 4);
        assert_eq!(model.contents_at(1).unwrap().url, NEW_TAB_URL);
        assert_eq!(model.active_index(), Some(1));
    }

    #[test]
    fn duplicate_copies_every_selected_tab() {
        let model = model_with(3);
        model.toggle_selection_at(2);
        model.execute_context_menu_command(2, ContextMenuCommand::Duplicate);
        assert_eq!(order(&model), vec![0, 0, 1, 2, 2]);
    }

    #[test]
    fn toggle_pinned_pins_then_unpins() {
        let model = model_with(3);
        assert!(model.will_context_menu_pin(2));
        model.execute_context_menu_command(2, ContextMenuCommand::TogglePinned);
        assert_eq!(order(&model), vec![2, 0, 1]);
        assert!(!model.will_context_menu_pin(0));
        model.execute_context_menu_command(0, ContextMenuCommand::TogglePinned);
        assert_eq!(model.index_of_first_non_pinned_tab(), 0);
    }

    #[test]
    fn toggle_grouped_groups_then_ungroups() {
        let model = model_with(3);
        let recorder = record(&model);
        model.execute_context_menu_command(1, ContextMenuCommand::ToggleGrouped);
        let group = model.group_for_tab(1).unwrap();
        assert!(recorder.take().contains(&"group:EditorOpened".to_string()));
        assert!(!model.will_context_menu_group(1));
        model.execute_context_menu_command(1, ContextMenuCommand::ToggleGrouped);
        assert!(model.group(group).is_none());
    }

    #[test]
    fn destroying_a_group_waits_for_the_delegate() {
        let (model, delegate) = holding(3);
        let group = model.add_to_new_group(&[0, 1]);
        model.activate_tab_at(0, false);
        model.toggle_selection_at(1);

        model.execute_context_menu_command(0, ContextMenuCommand::CloseTab);
        assert_eq!(model.count(), 3);

        let command = delegate.held.borrow_mut().pop().unwrap();
        assert_eq!(
            command.action(),
            DeferredAction::CloseTabs(CloseTypes::CREATE_HISTORICAL_TAB | CloseTypes::USER_GESTURE)
        );
        model.execute_deferred(command);
        assert_eq!(model.count(), 1);
        assert!(model.group(group).is_none());
    }

    #[test]
    fn deferred_command_skips_tabs_that_are_gone() {
        let (model, delegate) = holding(4);
        model.add_to_new_group(&[1, 2]);
        model.activate_tab_at(1, false);
        model.toggle_selection_at(2);
        model.execute_context_menu_command(1, ContextMenuCommand::RemoveFromGroup);
        let command = delegate.held.borrow_mut().pop().unwrap();

        model.close_tab_at(2, CloseTypes::NONE);
        model.execute_deferred(command);
        assert!(model.group_ids().is_empty());
        assert_eq!(model.count(), 3);
    }

    #[test]
    fn closing_part_of_a_group_needs_no_confirmation() {
        let (model, delegate) = holding(3);
        let group = model.add_to_new_group(&[0, 1]);
        let proposal = model.propose_close(&[1, 2]);
        assert!(proposal.groups_at_risk.is_empty());
        assert_eq!(model.propose_close(&[0, 1]).groups_at_risk, vec![group]);
        model.execute_close_tabs_by_indices_command(&[2]);
        assert_eq!(model.count(), 2);
        assert!(delegate.held.borrow().is_empty());
    }

    #[test]
    fn moving_a_group_into_another_is_confirmed() {
        let (model, delegate) = holding(4);
        let source = model.add_to_new_group(&[0]);
        let target = model.add_to_new_group(&[3]);
        model.execute_add_to_existing_group_command(0, target);
        assert_eq!(delegate.held.borrow().len(), 1);
        assert!(model.group(source).is_some());

        model.execute_add_to_existing_group_command(2, target);
        assert_eq!(model.group_range(target), Some(2..4));
    }

    #[test]
    fn mute_follows_the_delegate() {
        let (model, delegate) = holding(2);
        assert!(model.will_context_menu_mute_sites(0));
        model.execute_context_menu_command(0, ContextMenuCommand::ToggleSiteMuted);
        assert_eq!(*delegate.muted.borrow(), vec![true]);
    }

    #[test]
    fn split_command_pairs_with_the_active_tab() {
        let model = model_with(3);
        model.execute_context_menu_command(2, ContextMenuCommand::AddToNewSplit);
        assert_eq!(model.split_ids().len(), 1);
        assert_eq!(model.split_for_tab(0), model.split_for_tab(1));
        assert_eq!(order(&model), vec![0, 2, 1]);
    }
}
