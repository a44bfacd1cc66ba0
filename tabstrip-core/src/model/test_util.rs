//! Helpers shared by the model's unit tests

use std::cell::RefCell;
use std::rc::Rc;

use super::TabStripModel;
use crate::config::TabStripSettings;
use crate::delegate::{DefaultDelegate, TabStripModelDelegate};
use crate::observer::{
    CloseAllStoppedReason, SplitChange, TabChangeType, TabGroupChange, TabStripModelChange,
    TabStripModelObserver, TabStripSelectionChange,
};
use crate::tab::TabContents;
use crate::types::{GroupId, TabHandle};

/// Observer that writes every notification down as a short string.
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    pub(crate) events: RefCell<Vec<String>>,
    pub(crate) changes: RefCell<Vec<(TabStripModelChange, TabStripSelectionChange)>>,
}

impl Recorder {
    pub(crate) fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    fn push(&self, event: String) {
        self.events.borrow_mut().push(event);
    }
}

impl TabStripModelObserver for Recorder {
    fn on_tab_strip_model_changed(
        &self,
        _model: &TabStripModel,
        change: &TabStripModelChange,
        selection: &TabStripSelectionChange,
    ) {
        let detail = match change {
            TabStripModelChange::Insert(tabs) => {
                format!("{:?}", tabs.iter().map(|t| t.index).collect::<Vec<_>>())
            }
            TabStripModelChange::Remove(tabs) => {
                format!("{:?}", tabs.iter().map(|t| t.index).collect::<Vec<_>>())
            }
            TabStripModelChange::Move(moves) => format!(
                "{:?}",
                moves.iter().map(|m| (m.from, m.to)).collect::<Vec<_>>()
            ),
            TabStripModelChange::Replace(tab) => format!("[{}]", tab.index),
            TabStripModelChange::SelectionOnly => String::new(),
        };
        self.push(format!("{}{detail}", change.kind()));
        self.changes
            .borrow_mut()
            .push((change.clone(), selection.clone()));
    }

    fn on_tab_will_be_removed(&self, _model: &TabStripModel, _handle: TabHandle, index: usize) {
        self.push(format!("will_remove:{index}"));
    }

    fn on_tab_group_changed(&self, _model: &TabStripModel, change: &TabGroupChange) {
        let kind = format!("{:?}", change.kind);
        let name = kind.split([' ', '{']).next().unwrap_or_default().to_string();
        self.push(format!("group:{name}"));
    }

    fn on_tab_group_added(&self, _model: &TabStripModel, _group: GroupId) {
        self.push("group_added".to_string());
    }

    fn on_split_tab_changed(&self, _model: &TabStripModel, change: &SplitChange) {
        let kind = format!("{:?}", change.kind);
        let name = kind.split([' ', '{']).next().unwrap_or_default().to_string();
        self.push(format!("split:{name}"));
    }

    fn tab_pinned_state_changed(&self, _model: &TabStripModel, _handle: TabHandle, index: usize) {
        self.push(format!("pinned:{index}"));
    }

    fn tab_changed_at(
        &self,
        _model: &TabStripModel,
        _handle: TabHandle,
        index: usize,
        _change_type: TabChangeType,
    ) {
        self.push(format!("changed:{index}"));
    }

    fn tab_blocked_state_changed(&self, _model: &TabStripModel, _handle: TabHandle, index: usize) {
        self.push(format!("blocked:{index}"));
    }

    fn set_tab_needs_attention_at(&self, _model: &TabStripModel, index: usize, attention: bool) {
        self.push(format!("attention:{index}:{attention}"));
    }

    fn tab_grouped_state_changed(
        &self,
        _model: &TabStripModel,
        _old: Option<GroupId>,
        new: Option<GroupId>,
        _handle: TabHandle,
        index: usize,
    ) {
        let state = if new.is_some() { "grouped" } else { "ungrouped" };
        self.push(format!("{state}:{index}"));
    }

    fn tab_close_cancelled(&self, _model: &TabStripModel, _handle: TabHandle) {
        self.push("close_cancelled".to_string());
    }

    fn will_close_all_tabs(&self, _model: &TabStripModel) {
        self.push("will_close_all".to_string());
    }

    fn close_all_tabs_stopped(&self, _model: &TabStripModel, reason: CloseAllStoppedReason) {
        self.push(format!("close_all_stopped:{reason:?}"));
    }

    fn tab_strip_empty(&self, _model: &TabStripModel) {
        self.push("empty".to_string());
    }
}

pub(crate) fn page(i: usize) -> TabContents {
    TabContents::new(format!("https://{i}.example"))
}

/// A validating model with `count` tabs, the first one active.
pub(crate) fn model_with(count: usize) -> TabStripModel {
    model_with_delegate(count, Rc::new(DefaultDelegate))
}

pub(crate) fn model_with_delegate(
    count: usize,
    delegate: Rc<dyn TabStripModelDelegate>,
) -> TabStripModel {
    let model = TabStripModel::with_settings(delegate, TabStripSettings::default().with_validation(true));
    for i in 0..count {
        model.append_tab(page(i), i == 0);
    }
    model
}

/// Attaches a fresh [`Recorder`].
pub(crate) fn record(model: &TabStripModel) -> Rc<Recorder> {
    let recorder = Rc::new(Recorder::default());
    model.add_observer(recorder.clone());
    recorder
}

/// URLs in strip order, as tab numbers.
pub(crate) fn order(model: &TabStripModel) -> Vec<usize> {
    (0..model.count())
        .filter_map(|i| model.contents_at(i))
        .filter_map(|c| {
            c.url
                .trim_start_matches("https://")
                .trim_end_matches(".example")
                .parse()
                .ok()
        })
        .collect()
}
