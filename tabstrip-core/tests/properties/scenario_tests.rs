//! End-to-end scenarios on small strips

use std::cell::RefCell;
use std::rc::Rc;

use tabstrip_core::{
    AddTypes, CloseAllStoppedReason, CloseTypes, DefaultDelegate, TabContents, TabGroupChange,
    TabGroupChangeKind, TabStripModel, TabStripModelChange, TabStripModelObserver,
    TabStripSelectionChange, TabStripSettings,
};

/// Builds `[A, B, C, ...]` without opener relationships, `A` active.
fn strip(names: &str) -> TabStripModel {
    let model = TabStripModel::with_settings(
        Rc::new(DefaultDelegate),
        TabStripSettings::default().with_validation(true),
    );
    for (i, name) in names.chars().enumerate() {
        let add_types = if i == 0 { AddTypes::ACTIVE } else { AddTypes::NONE };
        model.insert_tab_at(i, TabContents::new(name.to_string()), add_types, None);
    }
    model
}

fn names(model: &TabStripModel) -> String {
    (0..model.count())
        .filter_map(|i| model.contents_at(i))
        .map(|c| c.url)
        .collect()
}

#[derive(Debug, Default)]
struct Log {
    events: RefCell<Vec<String>>,
}

impl TabStripModelObserver for Log {
    fn on_tab_strip_model_changed(
        &self,
        _model: &TabStripModel,
        change: &TabStripModelChange,
        _selection: &TabStripSelectionChange,
    ) {
        if let TabStripModelChange::Remove(tabs) = change {
            let urls: Vec<String> = tabs.iter().map(|t| format!("{}{}", t.contents.url, t.index)).collect();
            self.events.borrow_mut().push(format!("remove {}", urls.join(" ")));
        }
    }

    fn on_tab_group_changed(&self, _model: &TabStripModel, change: &TabGroupChange) {
        if matches!(change.kind, TabGroupChangeKind::Closed) {
            self.events.borrow_mut().push("group closed".to_string());
        }
    }

    fn will_close_all_tabs(&self, _model: &TabStripModel) {
        self.events.borrow_mut().push("will close all".to_string());
    }

    fn close_all_tabs_stopped(&self, _model: &TabStripModel, reason: CloseAllStoppedReason) {
        self.events.borrow_mut().push(format!("stopped {reason:?}"));
    }

    fn tab_strip_empty(&self, _model: &TabStripModel) {
        self.events.borrow_mut().push("empty".to_string());
    }
}

/// Observer that tries to mutate the strip from inside a notification.
struct Meddler;

impl TabStripModelObserver for Meddler {
    fn on_tab_strip_model_changed(
        &self,
        model: &TabStripModel,
        _change: &TabStripModelChange,
        _selection: &TabStripSelectionChange,
    ) {
        model.close_tab_at(0, CloseTypes::NONE);
    }
}

#[test]
fn removing_the_active_tab_activates_its_right_neighbour() {
    let model = strip("ABC");
    model.activate_tab_at(1, false);
    model.close_tab_at(1, CloseTypes::NONE);
    assert_eq!(names(&model), "AC");
    assert_eq!(model.active_index(), Some(1));
    assert_eq!(model.active_contents().map(|c| c.url).as_deref(), Some("C"));
}

#[test]
fn pinning_moves_the_tab_into_the_prefix() {
    let model = strip("ABCD");
    assert_eq!(model.set_tab_pinned(2, true), 0);
    assert_eq!(names(&model), "CABD");
    assert_eq!(model.index_of_first_non_pinned_tab(), 1);
}

#[test]
fn grouping_scattered_tabs_makes_them_contiguous() {
    let model = strip("ABCD");
    let group = model.add_to_new_group(&[1, 3]);
    assert_eq!(names(&model), "ABDC");
    assert_eq!(model.group_range(group), Some(1..3));
    assert_eq!(model.group_for_tab(1), Some(group));
    assert_eq!(model.group_for_tab(2), Some(group));
}

#[test]
fn split_with_active_tab_selects_both() {
    let model = strip("ABC");
    model.activate_tab_at(2, false);
    let split = model.add_to_new_split(&[0], None).unwrap();
    let range = model.split_range(split).unwrap();
    assert_eq!(range.len(), 2);
    assert_eq!(names(&model), "BAC");
    assert!(range.clone().all(|i| model.is_tab_selected(i)));
    assert_eq!(model.active_contents().map(|c| c.url).as_deref(), Some("C"));
}

#[test]
fn closing_every_tab_of_a_full_group_batches_the_removal() {
    let model = strip("ABC");
    model.add_to_new_group(&[0, 1, 2]);
    let log = Rc::new(Log::default());
    model.add_observer(log.clone());

    assert!(model.close_all_tabs());

    assert_eq!(
        *log.events.borrow(),
        vec![
            "will close all",
            "remove C2 B1 A0",
            "group closed",
            "empty",
            "stopped Completed",
        ]
    );
    assert!(model.group_ids().is_empty());
}

#[test]
#[should_panic(expected = "re-entrant tab strip mutation")]
fn mutating_from_an_observer_panics() {
    let model = strip("AB");
    model.add_observer(Rc::new(Meddler));
    model.activate_tab_at(1, false);
}
