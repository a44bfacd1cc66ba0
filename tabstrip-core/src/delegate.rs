//! The embedder side of the tab strip
//!
//! The model decides how tabs are ordered, selected and grouped. Everything
//! else (creating windows, keeping closed-tab history, running unload
//! listeners, deciding whether a tab may close) is asked of a
//! [`TabStripModelDelegate`].
//!
//! Destructive bulk operations use a two-phase protocol: the model wraps the
//! operation in a [`DeferredCommand`] and hands it to
//! [`TabStripModelDelegate::on_groups_destruction`]. The delegate either
//! returns it (proceed now) or keeps it and later passes it to
//! [`TabStripModel::execute_deferred`]. Dropping it cancels the operation.

use crate::model::{AddTypes, CloseTypes, PageTransition, TabStripModel};
use crate::tab::TabContents;
use crate::types::{GroupId, TabHandle};

/// Operation carried by a [`DeferredCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// Close the tabs.
    CloseTabs(CloseTypes),
    /// Take the tabs out of their groups.
    RemoveFromGroup,
    /// Put the tabs into a fresh group.
    AddToNewGroup,
    /// Put the tabs into an existing group.
    AddToExistingGroup(GroupId),
    /// Move the tabs to a new window.
    MoveToNewWindow,
    /// Pin or unpin the tabs.
    SetPinned(bool),
    /// Close every tab of the group.
    CloseGroup(GroupId),
}

/// An operation waiting for the delegate's confirmation.
///
/// Tabs are held by handle, so the command stays meaningful across
/// structural changes made while the decision is pending. Tabs that are gone
/// by the time the command runs are skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredCommand {
    tabs: Vec<TabHandle>,
    action: DeferredAction,
}

impl DeferredCommand {
    /// Creates a command acting on `tabs`.
    #[must_use]
    pub fn new(tabs: Vec<TabHandle>, action: DeferredAction) -> Self {
        Self { tabs, action }
    }

    /// Tabs the command acts on.
    #[must_use]
    pub fn tabs(&self) -> &[TabHandle] {
        &self.tabs
    }

    /// The operation.
    #[must_use]
    pub const fn action(&self) -> DeferredAction {
        self.action
    }
}

/// Result of [`TabStripModel::propose_close`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseProposal {
    /// Groups that would lose every tab
    pub groups_at_risk: Vec<GroupId>,
    /// The close, ready to run
    pub command: DeferredCommand,
}

/// Policy and side effects supplied by the embedder.
///
/// Every method has a conservative default. Methods receiving the model are
/// called outside the reentrancy guard and may mutate it; the others are
/// called while the guard is held and must not.
#[allow(unused_variables)]
pub trait TabStripModelDelegate {
    /// Content is about to be attached.
    fn will_add_contents(&self, contents: &TabContents) {}

    /// Records a closed tab in history. Returns the record id.
    fn create_historical_record(&self, contents: &TabContents) -> Option<u64> {
        None
    }

    /// Starts the content's unload listener if it has one. Returns true when
    /// the listener runs, in which case the tab stays open for now.
    fn run_unload_listener_before_closing(&self, contents: &TabContents) -> bool {
        false
    }

    /// Whether the tab may be closed at all.
    fn is_tab_closable(&self, handle: TabHandle, contents: &TabContents) -> bool {
        true
    }

    /// Asks whether `groups` may be destroyed by `command`.
    ///
    /// Returning the command runs it immediately. Returning `None` defers
    /// the decision; the delegate runs the command later through
    /// [`TabStripModel::execute_deferred`], or never.
    fn on_groups_destruction(
        &self,
        groups: &[GroupId],
        command: DeferredCommand,
    ) -> Option<DeferredCommand> {
        Some(command)
    }

    /// A group was created by a user command.
    fn group_added(&self, group: GroupId) {}

    /// Every tab of `group` is about to close.
    fn will_close_group(&self, group: GroupId) {}

    /// Closing `group` stopped before all of its tabs closed.
    fn group_close_stopped(&self, group: GroupId) {}

    /// Whether the content can be reloaded.
    fn can_reload(&self, contents: &TabContents) -> bool {
        true
    }

    /// Reloads the content.
    fn reload_contents(&self, contents: &TabContents) {}

    /// Whether the tab at `index` can be duplicated.
    fn can_duplicate_contents_at(&self, model: &TabStripModel, index: usize) -> bool {
        model.contains_index(index)
    }

    /// Duplicates the tab at `index` right next to it.
    fn duplicate_contents_at(&self, model: &TabStripModel, index: usize) {
        let Some(contents) = model.contents_at(index) else {
            return;
        };
        let copy = TabContents::new(contents.url)
            .with_title(contents.title)
            .with_history_len(contents.history_len);
        let group = model.group_for_tab(index);
        model.insert_tab_at(index + 1, copy, AddTypes::ACTIVE, group);
    }

    /// Whether the content can navigate back.
    fn can_go_back(&self, contents: &TabContents) -> bool {
        false
    }

    /// Navigates the content back.
    fn go_back(&self, model: &TabStripModel, handle: TabHandle) {}

    /// Opens `url` in a new tab at `index` (the end if `None`).
    fn add_tab_at(
        &self,
        model: &TabStripModel,
        url: &str,
        index: Option<usize>,
        foreground: bool,
        group: Option<GroupId>,
    ) {
        let add_types = if foreground {
            AddTypes::ACTIVE
        } else {
            AddTypes::NONE
        };
        model.add_tab(
            TabContents::new(url),
            index,
            PageTransition::Typed,
            add_types,
            group,
        );
    }

    /// Whether tabs can be moved to another window.
    fn can_move_tabs_to_window(&self, model: &TabStripModel, indices: &[usize]) -> bool {
        false
    }

    /// Moves the tabs at `indices` into a new window.
    fn move_tabs_to_new_window(&self, model: &TabStripModel, indices: &[usize]) {}

    /// Whether a read-later list exists.
    fn supports_read_later(&self) -> bool {
        false
    }

    /// Saves content to the read-later list.
    fn add_to_read_later(&self, contents: &[TabContents]) {}

    /// Whether every site hosting `contents` is muted.
    fn are_all_sites_muted(&self, contents: &[TabContents]) -> bool {
        false
    }

    /// Mutes or unmutes the sites hosting `contents`.
    fn set_sites_muted(&self, contents: &[TabContents], mute: bool) {}
}

/// Delegate that accepts every default.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDelegate;

impl TabStripModelDelegate for DefaultDelegate {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_delegate_proceeds_with_destruction() {
        let command = DeferredCommand::new(vec![TabHandle::new()], DeferredAction::RemoveFromGroup);
        let returned = DefaultDelegate.on_groups_destruction(&[GroupId::new()], command.clone());
        assert_eq!(returned, Some(command));
    }

    #[test]
    fn default_policies_are_conservative() {
        let contents = TabContents::new("https://example.com");
        assert!(DefaultDelegate.is_tab_closable(TabHandle::new(), &contents));
        assert!(!DefaultDelegate.run_unload_listener_before_closing(&contents));
        assert!(!DefaultDelegate.supports_read_later());
        assert!(!DefaultDelegate.can_go_back(&contents));
        assert_eq!(DefaultDelegate.create_historical_record(&contents), None);
    }
}
