//! The tab strip model
//!
//! [`TabStripModel`] owns the [`TabCollection`], the [`ListSelectionModel`]
//! and the group and split registries, and is the only thing that mutates
//! them. Every public mutation follows the same protocol:
//!
//! 1. enter the per-model reentrancy guard (a nested mutation panics);
//! 2. change the collection and replay the change on the selection;
//! 3. widen the selection to whole splits, reset openers if the active tab
//!    changed, and reconcile group and split bookkeeping with the tree;
//! 4. optionally validate every invariant;
//! 5. release the state and deliver the queued notifications.
//!
//! Observers therefore only ever see a consistent model, and each logical
//! operation produces at most one structural change event.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//!
//! use tabstrip_core::{AddTypes, DefaultDelegate, TabContents, TabStripModel};
//!
//! let model = TabStripModel::new(Rc::new(DefaultDelegate));
//! model.append_tab(TabContents::new("https://a.example"), true);
//! model.append_tab(TabContents::new("https://b.example"), false);
//! model.insert_tab_at(0, TabContents::new("https://pinned.example"), AddTypes::PINNED, None);
//!
//! assert_eq!(model.count(), 3);
//! assert_eq!(model.index_of_first_non_pinned_tab(), 1);
//! assert_eq!(model.active_index(), Some(1));
//! ```

mod close;
mod context_menu;
mod groups;
mod guard;
mod insert;
mod moves;
mod openers;
mod replacement;
mod select;
mod splits;
#[cfg(test)]
mod test_util;

use std::cell::RefCell;
use std::collections::HashMap;
use std::ops::Range;
use std::rc::Rc;

pub use close::{CloseTypes, DetachedTab};
pub use context_menu::ContextMenuCommand;
pub use insert::{AddTypes, PageTransition};

use self::guard::ReentrancyGuard;
use crate::collection::TabCollection;
use crate::config::TabStripSettings;
use crate::delegate::TabStripModelDelegate;
use crate::error::{TabStripError, TabStripResult};
use crate::group::{GroupRegistry, TabGroup};
use crate::observer::{
    MovedTab, Notification, SelectionChangeReason, SplitChange, SplitChangeKind,
    TabGroupChange, TabGroupChangeKind, TabStripModelChange, TabStripModelObserver,
    TabStripSelectionChange,
};
use crate::selection::ListSelectionModel;
use crate::split::{SplitData, SplitRegistry};
use crate::tab::{Tab, TabContents};
use crate::types::{GroupId, SplitId, TabHandle};

/// The tab strip of one window.
///
/// All methods take `&self`; state lives behind a `RefCell` so observers and
/// delegates can hold a shared reference and query the model while it
/// notifies them.
pub struct TabStripModel {
    state: RefCell<ModelState>,
    settings: TabStripSettings,
    delegate: Rc<dyn TabStripModelDelegate>,
    observers: RefCell<Vec<Rc<dyn TabStripModelObserver>>>,
    guard: ReentrancyGuard,
}

impl std::fmt::Debug for TabStripModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabStripModel")
            .field("count", &self.count())
            .field("active", &self.active_index())
            .field("observers", &self.observers.borrow().len())
            .finish_non_exhaustive()
    }
}

/// Everything a mutation touches.
#[derive(Debug, Clone)]
pub(crate) struct ModelState {
    pub(crate) collection: TabCollection,
    pub(crate) selection: ListSelectionModel,
    pub(crate) groups: GroupRegistry,
    pub(crate) splits: SplitRegistry,
    pub(crate) closing_all: bool,
    pub(crate) select_opener_on_close: bool,
}

/// State captured before a mutation, used to diff afterwards.
struct Snapshot {
    active: Option<TabHandle>,
    selection: ListSelectionModel,
    tabs: Vec<(TabHandle, bool, Option<GroupId>)>,
}

/// Notifications collected while a mutation runs.
#[derive(Debug, Default)]
pub(crate) struct Events {
    before: Vec<Notification>,
    change: Option<TabStripModelChange>,
    after: Vec<Notification>,
    reason: SelectionChangeReason,
    selected_tabs_were_removed: bool,
}

impl Events {
    /// Sets the structural change of this mutation.
    pub(crate) fn set_change(&mut self, change: TabStripModelChange) {
        debug_assert!(self.change.is_none(), "one structural change per mutation");
        self.change = Some(change);
    }

    /// Appends single-slot moves to the mutation's move change.
    pub(crate) fn push_moves(&mut self, moves: impl IntoIterator<Item = MovedTab>) {
        match &mut self.change {
            Some(TabStripModelChange::Move(existing)) => existing.extend(moves),
            None => self.change = Some(TabStripModelChange::Move(moves.into_iter().collect())),
            Some(other) => panic!("cannot combine moves with a {} change", other.kind()),
        }
    }

    /// Queues a notification ahead of the structural change.
    pub(crate) fn notify_before(&mut self, notification: Notification) {
        self.before.push(notification);
    }

    /// Queues a notification after the structural change and bookkeeping.
    pub(crate) fn notify(&mut self, notification: Notification) {
        self.after.push(notification);
    }

    pub(crate) const fn set_reason(&mut self, reason: SelectionChangeReason) {
        self.reason = reason;
    }
}

impl TabStripModel {
    /// Creates an empty model with default settings.
    #[must_use]
    pub fn new(delegate: Rc<dyn TabStripModelDelegate>) -> Self {
        Self::with_settings(delegate, TabStripSettings::default())
    }

    /// Creates an empty model.
    #[must_use]
    pub fn with_settings(delegate: Rc<dyn TabStripModelDelegate>, settings: TabStripSettings) -> Self {
        let state = ModelState {
            collection: TabCollection::new(),
            selection: ListSelectionModel::new(),
            groups: GroupRegistry::new(),
            splits: SplitRegistry::new(),
            closing_all: false,
            select_opener_on_close: settings.select_opener_on_close,
        };
        Self {
            state: RefCell::new(state),
            settings,
            delegate,
            observers: RefCell::new(Vec::new()),
            guard: ReentrancyGuard::default(),
        }
    }

    /// Settings this model was created with.
    #[must_use]
    pub const fn settings(&self) -> &TabStripSettings {
        &self.settings
    }

    /// Registers an observer.
    pub fn add_observer(&self, observer: Rc<dyn TabStripModelObserver>) {
        self.observers.borrow_mut().push(Rc::clone(&observer));
        observer.started_observing(self);
    }

    /// Unregisters an observer. Unknown observers are ignored.
    pub fn remove_observer(&self, observer: &Rc<dyn TabStripModelObserver>) {
        let removed = {
            let mut observers = self.observers.borrow_mut();
            let before = observers.len();
            observers.retain(|o| !Rc::ptr_eq(o, observer));
            observers.len() != before
        };
        if removed {
            observer.stopped_observing(self);
        }
    }

    // Queries

    /// Number of tabs.
    #[must_use]
    pub fn count(&self) -> usize {
        self.read(|s| s.collection.len())
    }

    /// Returns true if there are no tabs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Returns true if `index` addresses a tab.
    #[must_use]
    pub fn contains_index(&self, index: usize) -> bool {
        index < self.count()
    }

    /// Index of the active tab.
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.read(|s| s.selection.active())
    }

    /// Handle of the active tab.
    #[must_use]
    pub fn active_tab(&self) -> Option<TabHandle> {
        self.read(ModelState::active_handle)
    }

    /// Content of the active tab.
    #[must_use]
    pub fn active_contents(&self) -> Option<TabContents> {
        self.read(|s| {
            s.selection
                .active()
                .and_then(|i| s.collection.tab_at(i))
                .map(|tab| tab.contents().clone())
        })
    }

    /// Handle of the tab at `index`.
    #[must_use]
    pub fn handle_at(&self, index: usize) -> Option<TabHandle> {
        self.read(|s| s.collection.handle_at(index))
    }

    /// Current index of `handle`.
    #[must_use]
    pub fn index_of(&self, handle: TabHandle) -> Option<usize> {
        self.read(|s| s.collection.index_of(handle))
    }

    /// Copy of the tab at `index`.
    #[must_use]
    pub fn tab_at(&self, index: usize) -> Option<Tab> {
        self.read(|s| s.collection.tab_at(index).cloned())
    }

    /// Copy of the tab with `handle`.
    #[must_use]
    pub fn tab(&self, handle: TabHandle) -> Option<Tab> {
        self.read(|s| s.collection.tab(handle).cloned())
    }

    /// Content of the tab at `index`.
    #[must_use]
    pub fn contents_at(&self, index: usize) -> Option<TabContents> {
        self.read(|s| s.collection.tab_at(index).map(|tab| tab.contents().clone()))
    }

    /// Handles in strip order.
    #[must_use]
    pub fn handles(&self) -> Vec<TabHandle> {
        self.read(|s| s.collection.handles())
    }

    /// Copy of the whole tree, for inspection.
    #[must_use]
    pub fn snapshot(&self) -> TabCollection {
        self.read(|s| s.collection.clone())
    }

    /// Boundary between pinned and unpinned tabs.
    #[must_use]
    pub fn index_of_first_non_pinned_tab(&self) -> usize {
        self.read(|s| s.collection.index_of_first_non_pinned_tab())
    }

    /// Whether the tab at `index` is pinned.
    #[must_use]
    pub fn is_tab_pinned(&self, index: usize) -> bool {
        self.read(|s| s.collection.tab_at(index).is_some_and(Tab::pinned))
    }

    /// Whether the tab at `index` is blocked.
    #[must_use]
    pub fn is_tab_blocked(&self, index: usize) -> bool {
        self.read(|s| s.collection.tab_at(index).is_some_and(Tab::blocked))
    }

    /// Whether the tab at `index` is selected.
    #[must_use]
    pub fn is_tab_selected(&self, index: usize) -> bool {
        self.read(|s| s.selection.is_selected(index))
    }

    /// Whether the tab at `index` sits in a collapsed group.
    #[must_use]
    pub fn is_tab_collapsed(&self, index: usize) -> bool {
        self.read(|s| s.is_tab_collapsed(index))
    }

    /// Whether `group` is collapsed.
    #[must_use]
    pub fn is_group_collapsed(&self, group: GroupId) -> bool {
        self.read(|s| s.groups.is_collapsed(group))
    }

    /// Copy of the selection model.
    #[must_use]
    pub fn selection_model(&self) -> ListSelectionModel {
        self.read(|s| s.selection.clone())
    }

    /// Selected indices, ascending.
    #[must_use]
    pub fn selected_indices(&self) -> Vec<usize> {
        self.read(|s| s.selection.selected_indices())
    }

    /// Whether group operations are enabled.
    #[must_use]
    pub const fn supports_tab_groups(&self) -> bool {
        self.settings.tab_groups_enabled
    }

    /// Whether split operations are enabled.
    #[must_use]
    pub const fn supports_splits(&self) -> bool {
        self.settings.splits_enabled
    }

    /// Group of the tab at `index`.
    #[must_use]
    pub fn group_for_tab(&self, index: usize) -> Option<GroupId> {
        self.read(|s| s.group_at(index))
    }

    /// Copy of a registered group.
    #[must_use]
    pub fn group(&self, group: GroupId) -> Option<TabGroup> {
        self.read(|s| s.groups.get(group).cloned())
    }

    /// Registered groups, oldest first.
    #[must_use]
    pub fn group_ids(&self) -> Vec<GroupId> {
        self.read(|s| s.groups.list_group_ids())
    }

    /// Indices covered by `group`.
    #[must_use]
    pub fn group_range(&self, group: GroupId) -> Option<Range<usize>> {
        self.read(|s| s.collection.group_range(group))
    }

    /// The group `index` would join if a tab were inserted there: the group
    /// of both neighbours when they agree.
    #[must_use]
    pub fn surrounding_tab_group(&self, index: usize) -> Option<GroupId> {
        self.read(|s| {
            let left = index.checked_sub(1).and_then(|i| s.group_at(i));
            left.filter(|g| s.group_at(index) == Some(*g))
        })
    }

    /// Split of the tab at `index`.
    #[must_use]
    pub fn split_for_tab(&self, index: usize) -> Option<SplitId> {
        self.read(|s| s.collection.tab_at(index).and_then(Tab::split))
    }

    /// Copy of a registered split.
    #[must_use]
    pub fn split(&self, split: SplitId) -> Option<SplitData> {
        self.read(|s| s.splits.get(split).cloned())
    }

    /// Indices covered by `split`.
    #[must_use]
    pub fn split_range(&self, split: SplitId) -> Option<Range<usize>> {
        self.read(|s| s.collection.split_range(split))
    }

    /// Splits in strip order.
    #[must_use]
    pub fn split_ids(&self) -> Vec<SplitId> {
        self.read(|s| s.collection.split_ids())
    }

    /// Checks every structural and selection invariant.
    ///
    /// # Errors
    ///
    /// Returns [`TabStripError::InvariantViolation`] naming the first
    /// broken invariant.
    pub fn validate(&self) -> TabStripResult<()> {
        self.read(ModelState::validate)
    }

    // Mutation protocol

    fn read<R>(&self, f: impl FnOnce(&ModelState) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Runs one mutation and delivers its notifications. The caller holds
    /// the reentrancy guard.
    fn mutate<R>(&self, f: impl FnOnce(&mut ModelState, &mut Events) -> R) -> R {
        debug_assert!(self.guard.is_held(), "mutation outside the reentrancy guard");
        let (result, notifications) = {
            let mut state = self.state.borrow_mut();
            let snapshot = state.snapshot();
            let mut events = Events::default();
            let result = f(&mut state, &mut events);
            let notifications = state.finish(&snapshot, events);
            if self.settings.validate_after_mutation
                && let Err(err) = state.validate()
            {
                tracing::error!(error = %err, "tab strip invariant violated");
                panic!("{err}");
            }
            (result, notifications)
        };
        self.dispatch(&notifications);
        result
    }

    fn dispatch(&self, notifications: &[Notification]) {
        if notifications.is_empty() {
            return;
        }
        let observers = self.observers.borrow().clone();
        for notification in notifications {
            for observer in &observers {
                notification.deliver(observer.as_ref(), self);
            }
        }
    }
}

impl Drop for TabStripModel {
    fn drop(&mut self) {
        let _scope = self.guard.enter("drop");
        let observers = self.observers.borrow().clone();
        for observer in &observers {
            observer.model_destroyed(self);
        }
    }
}

impl ModelState {
    pub(crate) fn len(&self) -> usize {
        self.collection.len()
    }

    pub(crate) fn active_handle(&self) -> Option<TabHandle> {
        self.selection
            .active()
            .and_then(|index| self.collection.handle_at(index))
    }

    /// Handle at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub(crate) fn checked_handle(&self, index: usize) -> TabHandle {
        match self.collection.handle_at(index) {
            Some(handle) => handle,
            None => panic!("index {index} out of range (count {})", self.len()),
        }
    }

    pub(crate) fn group_at(&self, index: usize) -> Option<GroupId> {
        self.collection.tab_at(index).and_then(Tab::group)
    }

    pub(crate) fn is_tab_collapsed(&self, index: usize) -> bool {
        self.group_at(index)
            .is_some_and(|group| self.groups.is_collapsed(group))
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            active: self.active_handle(),
            selection: self.selection.clone(),
            tabs: self
                .collection
                .iter()
                .map(|tab| (tab.handle(), tab.pinned(), tab.group()))
                .collect(),
        }
    }

    /// Selects every member of a split any of whose members is selected.
    fn expand_selection_to_splits(&mut self) {
        for split in self.collection.split_ids() {
            let Some(range) = self.collection.split_range(split) else {
                continue;
            };
            if range.clone().any(|i| self.selection.is_selected(i)) {
                self.selection
                    .add_index_range_to_selection(range.start, range.end - 1);
            }
        }
    }

    /// Completes a mutation and returns the notifications to deliver.
    fn finish(&mut self, snapshot: &Snapshot, events: Events) -> Vec<Notification> {
        self.expand_selection_to_splits();
        let selection = TabStripSelectionChange {
            old_tab: snapshot.active,
            new_tab: self.active_handle(),
            old_model: snapshot.selection.clone(),
            new_model: self.selection.clone(),
            reason: events.reason,
            selected_tabs_were_removed: events.selected_tabs_were_removed,
        };
        self.on_active_tab_changed(&selection);
        if let Some(active) = selection.new_tab
            && let Some(split) = self.collection.tab(active).and_then(Tab::split)
        {
            self.splits.set_active_tab(split, active);
        }

        let mut out = events.before;
        let change = events
            .change
            .filter(|change| !matches!(change, TabStripModelChange::Move(moves) if moves.is_empty()));
        match change {
            Some(change) => out.push(Notification::Changed(change, selection)),
            None if selection.active_tab_changed() || selection.selection_changed() => {
                out.push(Notification::Changed(
                    TabStripModelChange::SelectionOnly,
                    selection,
                ));
            }
            None => {}
        }
        self.reconcile(snapshot, &mut out);
        out.extend(events.after);
        out
    }

    /// Brings the registries in line with the tree and queues the group,
    /// split and per-tab notifications that follow from the difference.
    fn reconcile(&mut self, snapshot: &Snapshot, out: &mut Vec<Notification>) {
        let before: HashMap<TabHandle, (bool, Option<GroupId>)> = snapshot
            .tabs
            .iter()
            .map(|&(handle, pinned, group)| (handle, (pinned, group)))
            .collect();
        let after: Vec<(TabHandle, bool, Option<GroupId>)> = self
            .collection
            .iter()
            .map(|tab| (tab.handle(), tab.pinned(), tab.group()))
            .collect();
        let after_groups: HashMap<TabHandle, Option<GroupId>> =
            after.iter().map(|&(handle, _, group)| (handle, group)).collect();

        let mut created = Vec::new();
        let mut closed = Vec::new();
        let mut touched = Vec::new();
        let mut per_tab = Vec::new();

        // Joins are counted before departures so a group whose members are
        // swapped in one step never looks empty.
        for (index, &(handle, pinned, group)) in after.iter().enumerate() {
            let previous = before.get(&handle).copied();
            let (was_pinned, old_group) = previous.unwrap_or((pinned, None));
            if group != old_group {
                if let Some(id) = group {
                    if !self.groups.contains(id) {
                        self.groups.add_group(id, None);
                    }
                    if self.groups.on_tab_added(id) {
                        created.push(id);
                    }
                    if !touched.contains(&id) {
                        touched.push(id);
                    }
                }
                per_tab.push(Notification::GroupedStateChanged {
                    handle,
                    index,
                    old: old_group,
                    new: group,
                });
            }
            if pinned != was_pinned {
                per_tab.push(Notification::PinnedStateChanged(handle, index));
            }
        }
        for &(handle, _, old_group) in &snapshot.tabs {
            let Some(old) = old_group else {
                continue;
            };
            if after_groups.get(&handle).copied().flatten() != Some(old) {
                if self.groups.on_tab_removed(old) {
                    closed.push(old);
                }
                if !touched.contains(&old) {
                    touched.push(old);
                }
            }
        }

        for &group in &created {
            out.push(Notification::GroupChanged(TabGroupChange {
                group,
                kind: TabGroupChangeKind::Created,
            }));
        }
        out.append(&mut per_tab);
        for &group in &touched {
            if !created.contains(&group) && !closed.contains(&group) {
                out.push(Notification::GroupChanged(TabGroupChange {
                    group,
                    kind: TabGroupChangeKind::ContentsChanged,
                }));
            }
        }
        for group in closed {
            self.groups.remove_group(group);
            out.push(Notification::GroupChanged(TabGroupChange {
                group,
                kind: TabGroupChangeKind::Closed,
            }));
        }

        let mut splits = self.splits.ids();
        splits.sort();
        for split in splits {
            let previous = self
                .splits
                .get(split)
                .map(|data| data.members().to_vec())
                .unwrap_or_default();
            match self.collection.split_members(split) {
                None => {
                    self.splits.remove_split(split);
                    out.push(Notification::SplitChanged(SplitChange {
                        split,
                        kind: SplitChangeKind::Removed { tabs: previous },
                    }));
                }
                Some(current) => {
                    if self.splits.set_members(split, current.clone()) {
                        out.push(Notification::SplitChanged(SplitChange {
                            split,
                            kind: SplitChangeKind::ContentsUpdated { previous, current },
                        }));
                    }
                }
            }
        }
    }

    fn validate(&self) -> TabStripResult<()> {
        let violation = |msg: String| Err(TabStripError::InvariantViolation(msg));
        self.collection.validate()?;

        let count = self.len();
        if count == 0 {
            if !self.selection.is_empty() || self.selection.active().is_some() {
                return violation("empty strip with a selection".to_string());
            }
            return Ok(());
        }
        let Some(active) = self.selection.active() else {
            return violation("no active tab".to_string());
        };
        if active >= count || !self.selection.is_selected(active) {
            return violation(format!("active index {active} is not a selected tab"));
        }
        if let Some(&last) = self.selection.selected_indices().last()
            && last >= count
        {
            return violation(format!("selected index {last} out of range"));
        }
        for split in self.collection.split_ids() {
            if !self.splits.contains(split) {
                return violation(format!("{split} is not registered"));
            }
            if let Some(range) = self.collection.split_range(split) {
                let selected = range.clone().filter(|&i| self.selection.is_selected(i)).count();
                if selected != 0 && selected != range.len() {
                    return violation(format!("{split} is partially selected"));
                }
            }
        }
        for group in self.collection.group_ids() {
            let members = self.collection.group_range(group).map_or(0, |r| r.len());
            match self.groups.get(group) {
                None => return violation(format!("{group} is not registered")),
                Some(data) if data.tab_count() != members => {
                    return violation(format!(
                        "{group} counts {} tabs but holds {members}",
                        data.tab_count()
                    ));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}
