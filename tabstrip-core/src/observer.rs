//! Change payloads and the observer contract
//!
//! Every guarded mutation of a [`TabStripModel`] publishes at most one
//! structural [`TabStripModelChange`] together with a
//! [`TabStripSelectionChange`] describing how the selection moved. Group,
//! split and per-tab state notifications follow in the same dispatch.
//! Observers run after the model state is final and may query the model,
//! but must not mutate it: a mutation from inside a callback trips the
//! reentrancy guard.

use crate::group::TabGroupVisualData;
use crate::model::TabStripModel;
use crate::selection::ListSelectionModel;
use crate::split::SplitVisualData;
use crate::tab::TabContents;
use crate::types::{GroupId, SplitId, TabHandle};

/// A tab that was inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertedTab {
    /// The new tab
    pub handle: TabHandle,
    /// Its content
    pub contents: TabContents,
    /// Final index
    pub index: usize,
}

/// Why a tab left the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabRemovedReason {
    /// The tab was closed and destroyed.
    Deleted,
    /// The tab was detached to be inserted into another strip.
    InsertedIntoOtherTabStrip,
}

/// A tab that was removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedTab {
    /// The removed tab
    pub handle: TabHandle,
    /// Its content
    pub contents: TabContents,
    /// Index before any tab of the batch was removed
    pub index: usize,
    /// Index at the moment this tab was removed
    pub index_at_time_of_removal: usize,
    /// Why the tab left
    pub reason: TabRemovedReason,
    /// Id of the history record the delegate created for it, if any
    pub historical_id: Option<u64>,
}

/// One single-slot move. Replaying the records of a change in order on a
/// copy of the strip reproduces the final order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovedTab {
    /// The moved tab
    pub handle: TabHandle,
    /// Index before this step
    pub from: usize,
    /// Index after this step
    pub to: usize,
}

/// Content swapped under a tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacedTab {
    /// The tab whose content changed
    pub handle: TabHandle,
    /// Previous content
    pub old_contents: TabContents,
    /// New content
    pub new_contents: TabContents,
    /// Index of the tab
    pub index: usize,
}

/// Structural change published by one mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabStripModelChange {
    /// Nothing structural changed; only the selection did.
    SelectionOnly,
    /// Tabs were inserted.
    Insert(Vec<InsertedTab>),
    /// Tabs were removed, listed by descending original index.
    Remove(Vec<RemovedTab>),
    /// Tabs were reordered.
    Move(Vec<MovedTab>),
    /// A tab's content was replaced.
    Replace(ReplacedTab),
}

impl TabStripModelChange {
    /// Short name of the change kind, for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SelectionOnly => "selection_only",
            Self::Insert(_) => "insert",
            Self::Remove(_) => "remove",
            Self::Move(_) => "move",
            Self::Replace(_) => "replace",
        }
    }
}

/// What caused a selection change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionChangeReason {
    /// Programmatic or structural.
    #[default]
    None,
    /// Direct user input.
    UserGesture,
    /// The active tab's content was replaced.
    Replaced,
}

/// Before/after view of the selection around one mutation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TabStripSelectionChange {
    /// Active tab before the mutation
    pub old_tab: Option<TabHandle>,
    /// Active tab after the mutation
    pub new_tab: Option<TabHandle>,
    /// Selection before the mutation
    pub old_model: ListSelectionModel,
    /// Selection after the mutation
    pub new_model: ListSelectionModel,
    /// Cause
    pub reason: SelectionChangeReason,
    /// Whether any removed tab was selected
    pub selected_tabs_were_removed: bool,
}

impl TabStripSelectionChange {
    /// Returns true if a different tab is active now, or the active tab's
    /// content was replaced.
    #[must_use]
    pub fn active_tab_changed(&self) -> bool {
        self.old_tab != self.new_tab || self.reason == SelectionChangeReason::Replaced
    }

    /// Returns true if the selection model differs.
    #[must_use]
    pub fn selection_changed(&self) -> bool {
        self.old_model != self.new_model
    }
}

/// Kind of a group notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabGroupChangeKind {
    /// The group got its first tab.
    Created,
    /// Tabs joined or left the group.
    ContentsChanged,
    /// Title, colour or collapsed state changed.
    VisualsChanged {
        /// Previous visual data
        old: TabGroupVisualData,
        /// Current visual data
        new: TabGroupVisualData,
    },
    /// The group moved as a whole.
    Moved,
    /// The group's last tab left.
    Closed,
    /// Every tab of the group is about to be closed.
    WillBeRemoved,
    /// The embedder should open the group editor.
    EditorOpened,
}

/// A group notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabGroupChange {
    /// Affected group
    pub group: GroupId,
    /// What happened
    pub kind: TabGroupChangeKind,
}

/// Kind of a split notification.
#[derive(Debug, Clone, PartialEq)]
pub enum SplitChangeKind {
    /// A split was created over these members and indices.
    Added {
        /// Members with their indices
        tabs: Vec<(TabHandle, usize)>,
    },
    /// A split was dissolved.
    Removed {
        /// Former members, left to right
        tabs: Vec<TabHandle>,
    },
    /// Layout data changed.
    VisualsChanged {
        /// Previous visual data
        old: SplitVisualData,
        /// Current visual data
        new: SplitVisualData,
    },
    /// Membership changed while the split survived.
    ContentsUpdated {
        /// Previous members
        previous: Vec<TabHandle>,
        /// Current members
        current: Vec<TabHandle>,
    },
}

/// A split notification.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitChange {
    /// Affected split
    pub split: SplitId,
    /// What happened
    pub kind: SplitChangeKind,
}

/// Which part of a tab's state changed, for [`TabStripModelObserver::tab_changed_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabChangeType {
    /// Only the loading state changed.
    LoadingOnly,
    /// Anything may have changed.
    All,
}

/// Outcome of closing every tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseAllStoppedReason {
    /// Every tab closed.
    Completed,
    /// Some tab stayed open (an unload listener is running).
    Canceled,
}

/// Receives notifications from a [`TabStripModel`].
///
/// All methods default to doing nothing. Callbacks run synchronously while
/// the model's reentrancy guard is held; calling a mutating method of the
/// model from inside one panics.
#[allow(unused_variables)]
pub trait TabStripModelObserver {
    /// The structural change of one mutation, with its selection diff.
    fn on_tab_strip_model_changed(
        &self,
        model: &TabStripModel,
        change: &TabStripModelChange,
        selection: &TabStripSelectionChange,
    ) {
    }

    /// A tab is about to be added.
    fn on_tab_will_be_added(&self, model: &TabStripModel) {}

    /// The tab at `index` is about to be removed.
    fn on_tab_will_be_removed(&self, model: &TabStripModel, handle: TabHandle, index: usize) {}

    /// A group changed.
    fn on_tab_group_changed(&self, model: &TabStripModel, change: &TabGroupChange) {}

    /// A group created through [`TabStripModel::add_to_new_group`] is complete.
    fn on_tab_group_added(&self, model: &TabStripModel, group: GroupId) {}

    /// A split changed.
    fn on_split_tab_changed(&self, model: &TabStripModel, change: &SplitChange) {}

    /// State of the tab at `index` changed.
    fn tab_changed_at(
        &self,
        model: &TabStripModel,
        handle: TabHandle,
        index: usize,
        change_type: TabChangeType,
    ) {
    }

    /// The tab was pinned or unpinned.
    fn tab_pinned_state_changed(&self, model: &TabStripModel, handle: TabHandle, index: usize) {}

    /// The tab was blocked or unblocked.
    fn tab_blocked_state_changed(&self, model: &TabStripModel, handle: TabHandle, index: usize) {}

    /// The tab's group membership changed.
    fn tab_grouped_state_changed(
        &self,
        model: &TabStripModel,
        old_group: Option<GroupId>,
        new_group: Option<GroupId>,
        handle: TabHandle,
        index: usize,
    ) {
    }

    /// The tab at `index` wants (or no longer wants) attention.
    fn set_tab_needs_attention_at(&self, model: &TabStripModel, index: usize, attention: bool) {}

    /// A close of this tab was refused by policy.
    fn tab_close_cancelled(&self, model: &TabStripModel, handle: TabHandle) {}

    /// Every tab is about to be closed.
    fn will_close_all_tabs(&self, model: &TabStripModel) {}

    /// A close-all finished or was interrupted.
    fn close_all_tabs_stopped(&self, model: &TabStripModel, reason: CloseAllStoppedReason) {}

    /// The last tab left the strip.
    fn tab_strip_empty(&self, model: &TabStripModel) {}

    /// The observer was registered.
    fn started_observing(&self, model: &TabStripModel) {}

    /// The observer was unregistered.
    fn stopped_observing(&self, model: &TabStripModel) {}

    /// The model is being dropped.
    fn model_destroyed(&self, model: &TabStripModel) {}
}

/// A notification queued during a mutation and delivered once the model
/// state is final.
#[derive(Debug, Clone)]
pub(crate) enum Notification {
    Changed(TabStripModelChange, TabStripSelectionChange),
    TabWillBeAdded,
    TabWillBeRemoved(TabHandle, usize),
    GroupChanged(TabGroupChange),
    GroupAdded(GroupId),
    SplitChanged(SplitChange),
    TabChanged(TabHandle, usize, TabChangeType),
    PinnedStateChanged(TabHandle, usize),
    BlockedStateChanged(TabHandle, usize),
    GroupedStateChanged {
        handle: TabHandle,
        index: usize,
        old: Option<GroupId>,
        new: Option<GroupId>,
    },
    NeedsAttention(usize, bool),
    CloseCancelled(TabHandle),
    WillCloseAllTabs,
    CloseAllStopped(CloseAllStoppedReason),
    TabStripEmpty,
}

impl Notification {
    pub(crate) fn deliver(&self, observer: &dyn TabStripModelObserver, model: &TabStripModel) {
        match self {
            Self::Changed(change, selection) => {
                observer.on_tab_strip_model_changed(model, change, selection);
            }
            Self::TabWillBeAdded => observer.on_tab_will_be_added(model),
            Self::TabWillBeRemoved(handle, index) => {
                observer.on_tab_will_be_removed(model, *handle, *index);
            }
            Self::GroupChanged(change) => observer.on_tab_group_changed(model, change),
            Self::GroupAdded(group) => observer.on_tab_group_added(model, *group),
            Self::SplitChanged(change) => observer.on_split_tab_changed(model, change),
            Self::TabChanged(handle, index, change_type) => {
                observer.tab_changed_at(model, *handle, *index, *change_type);
            }
            Self::PinnedStateChanged(handle, index) => {
                observer.tab_pinned_state_changed(model, *handle, *index);
            }
            Self::BlockedStateChanged(handle, index) => {
                observer.tab_blocked_state_changed(model, *handle, *index);
            }
            Self::GroupedStateChanged {
                handle,
                index,
                old,
                new,
            } => observer.tab_grouped_state_changed(model, *old, *new, *handle, *index),
            Self::NeedsAttention(index, attention) => {
                observer.set_tab_needs_attention_at(model, *index, *attention);
            }
            Self::CloseCancelled(handle) => observer.tab_close_cancelled(model, *handle),
            Self::WillCloseAllTabs => observer.will_close_all_tabs(model),
            Self::CloseAllStopped(reason) => observer.close_all_tabs_stopped(model, *reason),
            Self::TabStripEmpty => observer.tab_strip_empty(model),
        }
    }
}
