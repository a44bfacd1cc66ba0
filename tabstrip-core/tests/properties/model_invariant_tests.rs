//! Property tests driving `TabStripModel` with random command sequences
//!
//! After every command the strip must still satisfy: the active tab is
//! selected, groups and splits are contiguous, splits have two or more
//! members, pinned tabs form a prefix without groups or splits, and a
//! selected split member implies the whole split is selected.

use std::rc::Rc;

use proptest::prelude::*;
use tabstrip_core::{
    AddTypes, CloseTypes, DefaultDelegate, TabContents, TabStripModel, TabStripSettings,
};

// ========== Strategies ==========

#[derive(Debug, Clone)]
enum Command {
    Insert { at: usize, pinned: bool, active: bool },
    Close { at: usize },
    Move { at: usize, to: usize },
    Pin { at: usize, pinned: bool },
    Group { first: usize, second: usize },
    Ungroup { at: usize },
    Split { at: usize },
    Activate { at: usize },
    Toggle { at: usize },
    Extend { at: usize },
    MoveSelected { to: usize },
    Step { forward: bool },
}

fn arb_command() -> impl Strategy<Value = Command> {
    let at = 0_usize..64;
    prop_oneof![
        4 => (at.clone(), prop::bool::weighted(0.2), any::<bool>())
            .prop_map(|(at, pinned, active)| Command::Insert { at, pinned, active }),
        2 => at.clone().prop_map(|at| Command::Close { at }),
        2 => (at.clone(), at.clone()).prop_map(|(at, to)| Command::Move { at, to }),
        1 => (at.clone(), any::<bool>()).prop_map(|(at, pinned)| Command::Pin { at, pinned }),
        2 => (at.clone(), at.clone()).prop_map(|(first, second)| Command::Group { first, second }),
        1 => at.clone().prop_map(|at| Command::Ungroup { at }),
        1 => at.clone().prop_map(|at| Command::Split { at }),
        2 => at.clone().prop_map(|at| Command::Activate { at }),
        2 => at.clone().prop_map(|at| Command::Toggle { at }),
        1 => at.clone().prop_map(|at| Command::Extend { at }),
        1 => at.prop_map(|to| Command::MoveSelected { to }),
        1 => any::<bool>().prop_map(|forward| Command::Step { forward }),
    ]
}

fn new_model() -> TabStripModel {
    let model = TabStripModel::with_settings(
        Rc::new(DefaultDelegate),
        TabStripSettings::default().with_validation(true),
    );
    for i in 0..3 {
        model.append_tab(TabContents::new(format!("https://{i}.example")), i == 0);
    }
    model
}

fn run(model: &TabStripModel, command: &Command) {
    let count = model.count();
    if count == 0 {
        if let Command::Insert { .. } = command {
            model.append_tab(TabContents::new("https://fresh.example"), true);
        }
        return;
    }
    let wrap = |i: usize| i % count;
    match *command {
        Command::Insert { at, pinned, active } => {
            let mut add_types = AddTypes::NONE;
            if pinned {
                add_types |= AddTypes::PINNED;
            }
            if active {
                add_types |= AddTypes::ACTIVE;
            }
            model.insert_tab_at(at % (count + 1), TabContents::new("https://new.example"), add_types, None);
        }
        Command::Close { at } => {
            model.close_tab_at(wrap(at), CloseTypes::NONE);
        }
        Command::Move { at, to } => {
            model.move_tab_to(wrap(at), wrap(to), false);
        }
        Command::Pin { at, pinned } => {
            model.set_tab_pinned(wrap(at), pinned);
        }
        Command::Group { first, second } => {
            let mut indices = vec![wrap(first), wrap(second)];
            indices.sort_unstable();
            indices.dedup();
            model.add_to_new_group(&indices);
        }
        Command::Ungroup { at } => model.remove_from_group(&[wrap(at)]),
        Command::Split { at } => {
            let _ = model.add_to_new_split(&[wrap(at)], None);
        }
        Command::Activate { at } => model.activate_tab_at(wrap(at), true),
        Command::Toggle { at } => {
            model.toggle_selection_at(wrap(at));
        }
        Command::Extend { at } => model.extend_selection_to(wrap(at)),
        Command::MoveSelected { to } => model.move_selected_tabs_to(wrap(to), None),
        Command::Step { forward } => {
            if forward {
                model.move_tab_next();
            } else {
                model.move_tab_previous();
            }
        }
    }
}

fn check(model: &TabStripModel) -> Result<(), TestCaseError> {
    prop_assert!(model.validate().is_ok(), "{:?}", model.validate());
    let count = model.count();
    if count == 0 {
        prop_assert_eq!(model.active_index(), None);
        prop_assert!(model.selected_indices().is_empty());
        return Ok(());
    }

    let active = model.active_index();
    prop_assert!(active.is_some(), "non-empty strip without an active tab");
    prop_assert!(model.is_tab_selected(active.unwrap_or_default()));
    prop_assert!(model.selected_indices().iter().all(|&i| i < count));

    let first_unpinned = model.index_of_first_non_pinned_tab();
    for index in 0..count {
        let pinned = model.is_tab_pinned(index);
        prop_assert_eq!(pinned, index < first_unpinned);
        if pinned {
            prop_assert!(model.group_for_tab(index).is_none());
            prop_assert!(model.split_for_tab(index).is_none());
        }
    }

    for group in model.group_ids() {
        let range = model.group_range(group).unwrap();
        prop_assert!(!range.is_empty());
        prop_assert!(range.clone().all(|i| model.group_for_tab(i) == Some(group)));
        let members = (0..count).filter(|&i| model.group_for_tab(i) == Some(group)).count();
        prop_assert_eq!(members, range.len());
        prop_assert_eq!(model.group(group).map(|g| g.tab_count()), Some(range.len()));
    }

    for split in model.split_ids() {
        let range = model.split_range(split).unwrap();
        prop_assert!(range.len() >= 2);
        prop_assert!(range.clone().all(|i| model.split_for_tab(i) == Some(split)));
        let selected = range.clone().filter(|&i| model.is_tab_selected(i)).count();
        prop_assert!(selected == 0 || selected == range.len());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    /// Random command sequences never break the strip invariants.
    #[test]
    fn commands_preserve_invariants(commands in prop::collection::vec(arb_command(), 1..40)) {
        let model = new_model();
        check(&model)?;
        for command in &commands {
            run(&model, command);
            check(&model)?;
        }
    }

    /// Inserting a background tab and closing it again restores count and
    /// selection.
    #[test]
    fn background_insert_then_close_round_trips(at in 0_usize..8, active in 0_usize..3) {
        let model = new_model();
        model.activate_tab_at(active, false);
        let selection = model.selected_indices();
        let landed = model.insert_tab_at(at.min(3), TabContents::new("https://x.example"), AddTypes::NONE, None);
        model.close_tab_at(landed, CloseTypes::NONE);
        prop_assert_eq!(model.count(), 3);
        prop_assert_eq!(model.selected_indices(), selection);
        prop_assert_eq!(model.active_index(), Some(active));
    }

    /// Moving a tab to where it already is changes nothing.
    #[test]
    fn move_to_current_index_is_silent(at in 0_usize..3) {
        let model = new_model();
        let before = model.handles();
        let landed = model.move_tab_to(at, at, false);
        prop_assert_eq!(landed, at);
        prop_assert_eq!(model.handles(), before);
    }
}
