//! Observer registration and the shape of published changes

use std::cell::RefCell;
use std::rc::Rc;

use tabstrip_core::{
    AddTypes, DefaultDelegate, SelectionChangeReason, SplitChange, SplitChangeKind, TabContents,
    TabStripModel, TabStripModelChange, TabStripModelObserver, TabStripSelectionChange,
    TabStripSettings,
};

#[derive(Debug, Default)]
struct Journal {
    lifecycle: RefCell<Vec<&'static str>>,
    changes: RefCell<Vec<(TabStripModelChange, TabStripSelectionChange)>>,
    splits: RefCell<Vec<SplitChange>>,
}

impl TabStripModelObserver for Journal {
    fn on_tab_strip_model_changed(
        &self,
        _model: &TabStripModel,
        change: &TabStripModelChange,
        selection: &TabStripSelectionChange,
    ) {
        self.changes
            .borrow_mut()
            .push((change.clone(), selection.clone()));
    }

    fn on_split_tab_changed(&self, _model: &TabStripModel, change: &SplitChange) {
        self.splits.borrow_mut().push(change.clone());
    }

    fn started_observing(&self, _model: &TabStripModel) {
        self.lifecycle.borrow_mut().push("started");
    }

    fn stopped_observing(&self, _model: &TabStripModel) {
        self.lifecycle.borrow_mut().push("stopped");
    }

    fn model_destroyed(&self, _model: &TabStripModel) {
        self.lifecycle.borrow_mut().push("destroyed");
    }
}

fn model(count: usize) -> TabStripModel {
    let model = TabStripModel::with_settings(
        Rc::new(DefaultDelegate),
        TabStripSettings::default().with_validation(true),
    );
    for i in 0..count {
        let add_types = if i == 0 { AddTypes::ACTIVE } else { AddTypes::NONE };
        model.insert_tab_at(i, TabContents::new(format!("https://{i}.example")), add_types, None);
    }
    model
}

#[test]
fn observers_hear_about_their_own_lifecycle() {
    let journal = Rc::new(Journal::default());
    let as_observer: Rc<dyn TabStripModelObserver> = journal.clone();
    {
        let model = model(1);
        model.add_observer(as_observer.clone());
        model.remove_observer(&as_observer);
        model.remove_observer(&as_observer);
        model.add_observer(as_observer.clone());
    }
    assert_eq!(*journal.lifecycle.borrow(), vec!["started", "stopped", "started", "destroyed"]);
}

#[test]
fn removed_observers_stop_receiving_changes() {
    let journal = Rc::new(Journal::default());
    let as_observer: Rc<dyn TabStripModelObserver> = journal.clone();
    let model = model(2);
    model.add_observer(as_observer.clone());
    model.activate_tab_at(1, false);
    model.remove_observer(&as_observer);
    model.activate_tab_at(0, false);
    assert_eq!(journal.changes.borrow().len(), 1);
}

#[test]
fn replaying_moves_reproduces_the_new_order() {
    let model = model(5);
    let journal = Rc::new(Journal::default());
    model.add_observer(journal.clone());
    let before = model.handles();

    model.activate_tab_at(0, false);
    model.toggle_selection_at(2);
    model.move_selected_tabs_to(3, None);

    let changes = journal.changes.borrow();
    let Some((TabStripModelChange::Move(moves), _)) = changes.last() else {
        panic!("expected a move, got {changes:?}");
    };
    let mut replay = before;
    for moved in moves {
        assert_eq!(replay[moved.from], moved.handle);
        let handle = replay.remove(moved.from);
        replay.insert(moved.to, handle);
    }
    assert_eq!(replay, model.handles());
    assert_eq!(model.selected_indices(), vec![3, 4]);
}

#[test]
fn gestures_and_selection_diffs_are_reported() {
    let model = model(3);
    let journal = Rc::new(Journal::default());
    model.add_observer(journal.clone());
    let first = model.handle_at(0);
    let last = model.handle_at(2);

    model.activate_tab_at(2, true);

    let changes = journal.changes.borrow();
    let (change, selection) = &changes[0];
    assert_eq!(*change, TabStripModelChange::SelectionOnly);
    assert_eq!(selection.old_tab, first);
    assert_eq!(selection.new_tab, last);
    assert_eq!(selection.reason, SelectionChangeReason::UserGesture);
    assert!(selection.active_tab_changed());
    assert!(selection.selection_changed());
}

#[test]
fn split_lifecycle_is_published() {
    let model = model(3);
    let journal = Rc::new(Journal::default());
    model.add_observer(journal.clone());

    let split = model.add_to_new_split(&[1], None).unwrap();
    model.remove_split(split).unwrap();

    let splits = journal.splits.borrow();
    assert_eq!(splits.len(), 2);
    assert!(matches!(
        &splits[0].kind,
        SplitChangeKind::Added { tabs } if tabs.iter().map(|(_, i)| *i).collect::<Vec<_>>() == vec![0, 1]
    ));
    assert!(matches!(&splits[1].kind, SplitChangeKind::Removed { tabs } if tabs.len() == 2));
    assert!(splits.iter().all(|change| change.split == split));
}
