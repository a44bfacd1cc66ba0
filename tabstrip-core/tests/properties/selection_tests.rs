//! Property tests for `ListSelectionModel`

use proptest::prelude::*;
use tabstrip_core::ListSelectionModel;

// ========== Strategies ==========

/// A strip length, a selected subset of it and an active member of the subset.
fn arb_selection() -> impl Strategy<Value = (usize, Vec<usize>, usize)> {
    (2_usize..12).prop_flat_map(|len| {
        prop::collection::btree_set(0..len, 1..=len).prop_flat_map(move |set| {
            let selected: Vec<usize> = set.into_iter().collect();
            let count = selected.len();
            (Just(len), Just(selected), 0..count)
        })
    })
}

/// A block `(old, new, length)` that fits a strip of `len` items.
fn arb_block(len: usize) -> impl Strategy<Value = (usize, usize, usize)> {
    (1..=len).prop_flat_map(move |length| (0..=len - length, 0..=len - length, Just(length)))
}

fn build(selected: &[usize], active: usize) -> ListSelectionModel {
    let mut model = ListSelectionModel::new();
    for &index in selected {
        model.add_index_to_selection(index);
    }
    model.set_active(Some(active));
    model.set_anchor(Some(active));
    model
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Replaying a block move on the selection agrees with moving the items.
    #[test]
    fn move_range_follows_the_items(
        ((len, selected, active_pos), block) in arb_selection()
            .prop_flat_map(|(len, selected, active)| {
                (Just((len, selected, active)), arb_block(len))
            })
    ) {
        let (old, new, length) = block;
        let active = selected[active_pos];
        let mut model = build(&selected, active);

        let mut items: Vec<usize> = (0..len).collect();
        let moved: Vec<usize> = items.drain(old..old + length).collect();
        items.splice(new..new, moved);
        let position = |item: usize| items.iter().position(|&v| v == item).unwrap();

        model.move_range(old, new, length);

        let mut expected: Vec<usize> = selected.iter().map(|&i| position(i)).collect();
        expected.sort_unstable();
        prop_assert_eq!(model.selected_indices(), expected);
        prop_assert_eq!(model.active(), Some(position(active)));
        prop_assert_eq!(model.anchor(), Some(position(active)));
    }

    /// Inserting then removing an index restores the selection.
    #[test]
    fn increment_then_decrement_round_trips(
        (len, selected, active_pos) in arb_selection(),
        at in 0_usize..12,
    ) {
        let at = at.min(len);
        let active = selected[active_pos];
        let original = build(&selected, active);
        let mut model = original.clone();
        model.increment_from(at);
        prop_assert!(!model.is_selected(at));
        model.decrement_from(at);
        prop_assert_eq!(model, original);
    }

    /// Removing an index drops it and shifts the tail left.
    #[test]
    fn decrement_drops_the_removed_index(
        (len, selected, active_pos) in arb_selection(),
        at in 0_usize..12,
    ) {
        let at = at % len;
        let active = selected[active_pos];
        let mut model = build(&selected, active);
        model.decrement_from(at);

        let expected: Vec<usize> = selected
            .iter()
            .filter(|&&i| i != at)
            .map(|&i| if i > at { i - 1 } else { i })
            .collect();
        prop_assert_eq!(model.selected_indices(), expected);
        if active == at {
            prop_assert_eq!(model.active(), None);
        }
    }

    /// Anchor ranges cover exactly the span between anchor and target.
    #[test]
    fn anchor_range_is_inclusive(anchor in 0_usize..20, target in 0_usize..20) {
        let mut model = ListSelectionModel::new();
        model.set_selected_index(anchor);
        model.set_selection_from_anchor_to(target);
        let expected: Vec<usize> = (anchor.min(target)..=anchor.max(target)).collect();
        prop_assert_eq!(model.selected_indices(), expected);
        prop_assert_eq!(model.active(), Some(target));
        prop_assert_eq!(model.anchor(), Some(anchor));
    }
}

#[test]
fn add_from_anchor_keeps_earlier_picks() {
    let mut model = ListSelectionModel::new();
    model.set_selected_index(5);
    model.add_index_to_selection(0);
    model.add_selection_from_anchor_to(3);
    assert_eq!(model.selected_indices(), vec![0, 3, 4, 5]);
    assert_eq!(model.active(), Some(3));
}

#[test]
fn clear_forgets_everything() {
    let mut model = ListSelectionModel::new();
    model.add_index_range_to_selection(1, 4);
    model.set_active(Some(2));
    model.clear();
    assert!(model.is_empty());
    assert_eq!(model.active(), None);
    assert_eq!(model.first_selected(), None);
}
