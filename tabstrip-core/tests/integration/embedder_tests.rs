//! Embedder-level flows: deferred confirmation, tabs moving between strips
//! and the link insertion policy.

use std::cell::RefCell;
use std::rc::Rc;

use tabstrip_core::{
    AddTypes, CloseTypes, ContextMenuCommand, DefaultDelegate, DeferredAction, DeferredCommand,
    GroupId, LastTabClosePolicy, PageTransition, TabContents, TabRemovedReason, TabStripModel,
    TabStripModelDelegate, TabStripSettings,
};

/// Delegate that parks every group-destroying command until the test
/// decides.
#[derive(Debug, Default)]
struct AskFirst {
    pending: RefCell<Vec<(Vec<GroupId>, DeferredCommand)>>,
}

impl TabStripModelDelegate for AskFirst {
    fn on_groups_destruction(
        &self,
        groups: &[GroupId],
        command: DeferredCommand,
    ) -> Option<DeferredCommand> {
        self.pending.borrow_mut().push((groups.to_vec(), command));
        None
    }
}

fn model_with(delegate: Rc<dyn TabStripModelDelegate>, urls: &[&str]) -> TabStripModel {
    let model = TabStripModel::with_settings(delegate, TabStripSettings::default().with_validation(true));
    for (i, url) in urls.iter().enumerate() {
        let add_types = if i == 0 { AddTypes::ACTIVE } else { AddTypes::NONE };
        model.insert_tab_at(i, TabContents::new(*url), add_types, None);
    }
    model
}

fn urls(model: &TabStripModel) -> Vec<String> {
    (0..model.count())
        .filter_map(|i| model.contents_at(i))
        .map(|c| c.url)
        .collect()
}

#[test]
fn confirmed_close_survives_structural_changes() {
    let delegate = Rc::new(AskFirst::default());
    let model = model_with(delegate.clone(), &["a", "b", "c"]);
    let group = model.add_to_new_group(&[1, 2]);
    model.activate_tab_at(1, false);
    model.toggle_selection_at(2);

    model.execute_context_menu_command(1, ContextMenuCommand::CloseTab);
    assert_eq!(model.count(), 3, "nothing closes before confirmation");

    // The strip changes while the dialog is up.
    model.insert_tab_at(0, TabContents::new("z"), AddTypes::NONE, None);
    model.move_tab_to(1, 3, false);

    let (groups, command) = delegate.pending.borrow_mut().pop().unwrap();
    assert_eq!(groups, vec![group]);
    model.execute_deferred(command);
    assert_eq!(urls(&model), vec!["z", "a"]);
    assert!(model.group(group).is_none());
}

#[test]
fn declined_command_changes_nothing() {
    let delegate = Rc::new(AskFirst::default());
    let model = model_with(delegate.clone(), &["a", "b"]);
    let group = model.add_to_new_group(&[0, 1]);
    model.toggle_selection_at(1);

    model.execute_context_menu_command(0, ContextMenuCommand::CloseTab);
    model.execute_context_menu_command(1, ContextMenuCommand::RemoveFromGroup);
    assert_eq!(delegate.pending.borrow().len(), 2);

    // Declining is dropping the command.
    delegate.pending.borrow_mut().clear();
    assert_eq!(model.count(), 2);
    assert_eq!(model.group_range(group), Some(0..2));

    let proposal = model.propose_close(&[0, 1]);
    assert_eq!(proposal.groups_at_risk, vec![group]);
    assert_eq!(proposal.command.tabs().len(), 2);
}

#[test]
fn deferred_group_close_closes_only_that_group() {
    let model = model_with(Rc::new(DefaultDelegate), &["a", "b", "c", "d"]);
    let left = model.add_to_new_group(&[0, 1]);
    let right = model.add_to_new_group(&[2, 3]);
    model.execute_deferred(DeferredCommand::new(Vec::new(), DeferredAction::CloseGroup(left)));
    assert_eq!(urls(&model), vec!["c", "d"]);
    assert!(model.group(left).is_none());
    assert_eq!(model.group_range(right), Some(0..2));
}

#[test]
fn tabs_keep_their_identity_across_strips() {
    let source = model_with(Rc::new(DefaultDelegate), &["a", "b"]);
    let target = model_with(Rc::new(DefaultDelegate), &["x"]);
    source.set_tab_pinned(1, true);

    let detached = source.detach_tab_at_for_insertion(0);
    assert_eq!(detached.contents().url, "b");
    assert!(detached.was_pinned());
    assert_eq!(detached.reason(), TabRemovedReason::InsertedIntoOtherTabStrip);
    let handle = detached.handle();

    let landed = target.insert_detached_tab_at(1, detached, AddTypes::ACTIVE, None);
    assert_eq!(target.handle_at(landed), Some(handle));
    assert_eq!(target.active_tab(), Some(handle));
    assert_eq!(source.index_of(handle), None);
    assert_eq!(urls(&source), vec!["a"]);
}

#[test]
fn background_links_queue_behind_earlier_ones() {
    let model = model_with(Rc::new(DefaultDelegate), &["a", "b", "c"]);
    let opener = model.active_tab();

    let first = model.add_tab(TabContents::new("l1"), None, PageTransition::Link, AddTypes::NONE, None);
    let second = model.add_tab(TabContents::new("l2"), None, PageTransition::Link, AddTypes::NONE, None);
    assert_eq!((first, second), (1, 2));
    assert_eq!(model.opener_of_tab_at(1), opener);
    assert_eq!(model.opener_of_tab_at(2), opener);

    let foreground = model.add_tab(TabContents::new("l3"), None, PageTransition::Link, AddTypes::ACTIVE, None);
    assert_eq!(foreground, 1);
    assert_eq!(model.active_index(), Some(1));
    assert_eq!(urls(&model), vec!["a", "l3", "l1", "l2", "b", "c"]);
}

#[test]
fn links_opened_inside_a_group_join_it() {
    let model = model_with(Rc::new(DefaultDelegate), &["a", "b"]);
    let group = model.add_to_new_group(&[0]);
    let index = model.add_tab(TabContents::new("child"), None, PageTransition::Link, AddTypes::NONE, None);
    assert_eq!(index, 1);
    assert_eq!(model.group_for_tab(1), Some(group));
}

#[test]
fn keep_window_open_leaves_a_new_tab_page() {
    let model = TabStripModel::with_settings(
        Rc::new(DefaultDelegate),
        TabStripSettings::default().with_last_tab_close(LastTabClosePolicy::KeepWindowOpen),
    );
    model.append_tab(TabContents::new("a"), true);
    model.close_tab_at(0, CloseTypes::USER_GESTURE);
    assert_eq!(model.count(), 1);
    assert!(model.active_contents().is_some_and(|c| c.is_fresh_new_tab_page()));
}

#[test]
fn disabled_groups_disable_group_commands() {
    let model = TabStripModel::with_settings(
        Rc::new(DefaultDelegate),
        TabStripSettings::default().with_tab_groups(false),
    );
    model.append_tab(TabContents::new("a"), true);
    for command in [
        ContextMenuCommand::ToggleGrouped,
        ContextMenuCommand::AddToNewGroup,
        ContextMenuCommand::RemoveFromGroup,
    ] {
        assert!(!model.is_context_menu_command_enabled(0, command));
    }
    assert!(model.groups_destroyed_by_removing(&[0]).is_empty());
}
