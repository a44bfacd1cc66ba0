//! Recording observer notifications and rendering the strip.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::Serialize;
use tabstrip_core::{
    CloseAllStoppedReason, GroupId, SplitChange, SplitChangeKind, SplitId, TabGroupChange,
    TabGroupChangeKind, TabHandle, TabStripModel, TabStripModelChange, TabStripModelObserver,
    TabStripSelectionChange,
};

/// Short, stable names (`g1`, `s1`) for groups and splits in order of first
/// sight.
#[derive(Debug, Default)]
pub struct Labels {
    groups: HashMap<GroupId, usize>,
    splits: HashMap<SplitId, usize>,
}

impl Labels {
    /// Label for `group`, assigning the next one if it is new.
    pub fn group(&mut self, group: GroupId) -> String {
        let next = self.groups.len() + 1;
        format!("g{}", self.groups.entry(group).or_insert(next))
    }

    /// Label for `split`, assigning the next one if it is new.
    pub fn split(&mut self, split: SplitId) -> String {
        let next = self.splits.len() + 1;
        format!("s{}", self.splits.entry(split).or_insert(next))
    }
}

/// Observer that turns notifications into one line each.
#[derive(Debug, Default)]
pub struct Transcript {
    events: RefCell<Vec<String>>,
    labels: RefCell<Labels>,
}

impl Transcript {
    /// Takes the lines recorded since the last call.
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// Shared labels, also used when rendering the strip.
    pub const fn labels(&self) -> &RefCell<Labels> {
        &self.labels
    }

    fn push(&self, line: String) {
        self.events.borrow_mut().push(line);
    }
}

fn url_of(model: &TabStripModel, handle: TabHandle) -> String {
    model
        .tab(handle)
        .map_or_else(|| "?".to_string(), |tab| tab.contents().url.clone())
}

impl TabStripModelObserver for Transcript {
    fn on_tab_strip_model_changed(
        &self,
        model: &TabStripModel,
        change: &TabStripModelChange,
        selection: &TabStripSelectionChange,
    ) {
        match change {
            TabStripModelChange::SelectionOnly => {}
            TabStripModelChange::Insert(tabs) => {
                for tab in tabs {
                    self.push(format!("insert {} at {}", tab.contents.url, tab.index));
                }
            }
            TabStripModelChange::Remove(tabs) => {
                for tab in tabs {
                    self.push(format!(
                        "remove {} at {} ({:?})",
                        tab.contents.url, tab.index, tab.reason
                    ));
                }
            }
            TabStripModelChange::Move(tabs) => {
                for tab in tabs {
                    self.push(format!(
                        "move {} {} -> {}",
                        url_of(model, tab.handle),
                        tab.from,
                        tab.to
                    ));
                }
            }
            TabStripModelChange::Replace(tab) => {
                self.push(format!(
                    "replace {} with {} at {}",
                    tab.old_contents.url, tab.new_contents.url, tab.index
                ));
            }
        }
        if selection.active_tab_changed() {
            let active = selection
                .new_tab
                .map_or_else(|| "none".to_string(), |handle| url_of(model, handle));
            self.push(format!("activate {active} ({:?})", selection.reason));
        }
        if selection.selection_changed() {
            self.push(format!("select {:?}", selection.new_model.selected_indices()));
        }
    }

    fn on_tab_group_changed(&self, _model: &TabStripModel, change: &TabGroupChange) {
        let label = self.labels.borrow_mut().group(change.group);
        let what = match &change.kind {
            TabGroupChangeKind::Created => "created".to_string(),
            TabGroupChangeKind::ContentsChanged => "contents changed".to_string(),
            TabGroupChangeKind::VisualsChanged { new, .. } => format!(
                "visuals {:?} {:?}{}",
                new.title,
                new.color,
                if new.is_collapsed { " collapsed" } else { "" }
            ),
            TabGroupChangeKind::Moved => "moved".to_string(),
            TabGroupChangeKind::Closed => "closed".to_string(),
            TabGroupChangeKind::WillBeRemoved => "will be removed".to_string(),
            TabGroupChangeKind::EditorOpened => "editor opened".to_string(),
        };
        self.push(format!("group {label} {what}"));
    }

    fn on_split_tab_changed(&self, model: &TabStripModel, change: &SplitChange) {
        let label = self.labels.borrow_mut().split(change.split);
        let what = match &change.kind {
            SplitChangeKind::Added { tabs } => {
                let indices: Vec<usize> = tabs.iter().map(|&(_, index)| index).collect();
                format!("added {indices:?}")
            }
            SplitChangeKind::Removed { tabs } => format!("removed ({} tabs)", tabs.len()),
            SplitChangeKind::VisualsChanged { new, .. } => {
                format!("visuals {:?} {}", new.layout, new.ratio)
            }
            SplitChangeKind::ContentsUpdated { current, .. } => {
                let urls: Vec<String> = current.iter().map(|&h| url_of(model, h)).collect();
                format!("now {}", urls.join(" "))
            }
        };
        self.push(format!("split {label} {what}"));
    }

    fn tab_pinned_state_changed(&self, model: &TabStripModel, handle: TabHandle, index: usize) {
        let state = if model.is_tab_pinned(index) { "pinned" } else { "unpinned" };
        self.push(format!("{state} {} at {index}", url_of(model, handle)));
    }

    fn tab_blocked_state_changed(&self, model: &TabStripModel, handle: TabHandle, index: usize) {
        let state = if model.is_tab_blocked(index) { "blocked" } else { "unblocked" };
        self.push(format!("{state} {} at {index}", url_of(model, handle)));
    }

    fn tab_grouped_state_changed(
        &self,
        model: &TabStripModel,
        old_group: Option<GroupId>,
        new_group: Option<GroupId>,
        handle: TabHandle,
        _index: usize,
    ) {
        let mut labels = self.labels.borrow_mut();
        let old = old_group.map_or_else(|| "-".to_string(), |g| labels.group(g));
        let new = new_group.map_or_else(|| "-".to_string(), |g| labels.group(g));
        drop(labels);
        self.push(format!("regroup {} {old} -> {new}", url_of(model, handle)));
    }

    fn tab_close_cancelled(&self, model: &TabStripModel, handle: TabHandle) {
        self.push(format!("close cancelled {}", url_of(model, handle)));
    }

    fn will_close_all_tabs(&self, _model: &TabStripModel) {
        self.push("closing all tabs".to_string());
    }

    fn close_all_tabs_stopped(&self, _model: &TabStripModel, reason: CloseAllStoppedReason) {
        self.push(format!("close all stopped ({reason:?})"));
    }

    fn tab_strip_empty(&self, _model: &TabStripModel) {
        self.push("strip empty".to_string());
    }
}

/// One tab as printed in JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabRow {
    /// Page URL
    pub url: String,
    /// Whether the tab is active
    pub active: bool,
    /// Whether the tab is selected
    pub selected: bool,
    /// Whether the tab is pinned
    pub pinned: bool,
    /// Whether the tab is blocked
    pub blocked: bool,
    /// Group label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Split label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split: Option<String>,
}

/// Describes every tab, left to right.
pub fn rows(model: &TabStripModel, labels: &mut Labels) -> Vec<TabRow> {
    let active = model.active_index();
    (0..model.count())
        .filter_map(|index| {
            let tab = model.tab_at(index)?;
            Some(TabRow {
                url: tab.contents().url.clone(),
                active: active == Some(index),
                selected: model.is_tab_selected(index),
                pinned: tab.pinned(),
                blocked: tab.blocked(),
                group: tab.group().map(|g| labels.group(g)),
                split: tab.split().map(|s| labels.split(s)),
            })
        })
        .collect()
}

/// Draws the strip on one line.
///
/// `*` marks the active tab, `+` other selected tabs and `^` pinned ones.
/// Groups print as `g1(...)`, collapsed groups as `g1[collapsed](...)` and
/// splits as `s1{...}`.
pub fn render(model: &TabStripModel, rows: &[TabRow]) -> String {
    if rows.is_empty() {
        return "(empty)".to_string();
    }
    let mut out = Vec::with_capacity(rows.len());
    let mut open_group: Option<&str> = None;
    let mut open_split: Option<&str> = None;
    for (index, row) in rows.iter().enumerate() {
        let group = row.group.as_deref();
        let split = row.split.as_deref();
        if open_split.is_some() && open_split != split {
            out.push("}".to_string());
            open_split = None;
        }
        if open_group.is_some() && open_group != group {
            out.push(")".to_string());
            open_group = None;
        }
        if let Some(label) = group.filter(|_| open_group.is_none()) {
            let collapsed = model
                .group_for_tab(index)
                .is_some_and(|g| model.is_group_collapsed(g));
            out.push(if collapsed {
                format!("{label}[collapsed](")
            } else {
                format!("{label}(")
            });
            open_group = group;
        }
        if let Some(label) = split.filter(|_| open_split.is_none()) {
            out.push(format!("{label}{{"));
            open_split = split;
        }
        let mark = if row.active {
            "*"
        } else if row.selected {
            "+"
        } else {
            ""
        };
        let pin = if row.pinned { "^" } else { "" };
        let blocked = if row.blocked { "!" } else { "" };
        out.push(format!("{pin}{mark}{}{blocked}", row.url));
    }
    if open_split.is_some() {
        out.push("}".to_string());
    }
    if open_group.is_some() {
        out.push(")".to_string());
    }
    out.join(" ")
}
