//! Property tests for the move engine's index math

use proptest::prelude::*;
use tabstrip_core::GroupId;
use tabstrip_core::move_engine::{
    StripLayout, constrain_insertion_index, constrain_move_index, incremental_moves,
    partition_by_midpoint, plan_selected_move,
};

// ========== Strategies ==========

/// A strip length, a sorted set of moving indices and a legal block start.
fn arb_block_move() -> impl Strategy<Value = (usize, Vec<usize>, usize)> {
    (1_usize..15).prop_flat_map(|len| {
        prop::collection::btree_set(0..len, 1..=len).prop_flat_map(move |set| {
            let indices: Vec<usize> = set.into_iter().collect();
            let room = len - indices.len();
            (Just(len), Just(indices), 0..=room)
        })
    })
}

fn apply(items: &mut Vec<usize>, moves: &[(usize, usize)]) {
    for &(from, to) in moves {
        let item = items.remove(from);
        items.insert(to, item);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Applying the single moves leaves the block contiguous at the
    /// destination, in its original order, with the rest in theirs.
    #[test]
    fn incremental_moves_build_the_block((len, indices, destination) in arb_block_move()) {
        let mut items: Vec<usize> = (0..len).collect();
        apply(&mut items, &incremental_moves(&indices, destination));

        prop_assert_eq!(&items[destination..destination + indices.len()], indices.as_slice());
        let rest: Vec<usize> = items
            .iter()
            .copied()
            .filter(|i| indices.binary_search(i).is_err())
            .collect();
        let expected: Vec<usize> = (0..len).filter(|i| indices.binary_search(i).is_err()).collect();
        prop_assert_eq!(rest, expected);
    }

    /// Every single move lands its tab on its final index.
    #[test]
    fn incremental_moves_target_final_slots((_, indices, destination) in arb_block_move()) {
        let moves = incremental_moves(&indices, destination);
        prop_assert_eq!(moves.len(), indices.len());
        let mut targets: Vec<usize> = moves.iter().map(|&(_, to)| to).collect();
        targets.sort_unstable();
        let expected: Vec<usize> = (destination..destination + indices.len()).collect();
        prop_assert_eq!(targets, expected);
    }

    /// Constrained indices always fall in the tab's own region.
    #[test]
    fn constrained_indices_respect_the_pinned_boundary(
        len in 1_usize..20,
        pinned_ratio in 0.0_f64..1.0,
        index in 0_usize..40,
    ) {
        let pinned_count = ((len as f64) * pinned_ratio) as usize;
        let layout = StripLayout::from_groups(pinned_count, vec![None; len]);

        let insert_pinned = constrain_insertion_index(&layout, index, true);
        prop_assert!(insert_pinned <= pinned_count);
        let insert_unpinned = constrain_insertion_index(&layout, index, false);
        prop_assert!((pinned_count..=len).contains(&insert_unpinned));

        if pinned_count > 0 {
            prop_assert!(constrain_move_index(&layout, index, true) < pinned_count);
        }
        if pinned_count < len {
            let to = constrain_move_index(&layout, index, false);
            prop_assert!((pinned_count..len).contains(&to));
        }
    }

    /// The two halves of a midpoint split cover the input, left before right.
    #[test]
    fn midpoint_partition_is_ordered(
        first in 0_usize..10,
        span in 0_usize..10,
        picks in prop::collection::btree_set(0_usize..10, 0..10),
    ) {
        let last = first + span;
        let indices: Vec<usize> = picks.into_iter().filter(|&p| p <= span).map(|p| first + p).collect();
        let (left, right) = partition_by_midpoint(&indices, first, last);
        prop_assert_eq!(left.len() + right.len(), indices.len());
        if let (Some(l), Some(r)) = (left.last(), right.first()) {
            prop_assert!(l < r);
        }
    }

    /// A selected move keeps each half inside its region and fitting.
    #[test]
    fn selected_move_plans_fit((len, selected, _) in arb_block_move(), pinned in 0_usize..15, index in 0_usize..20) {
        let pinned_count = pinned.min(len);
        let layout = StripLayout::from_groups(pinned_count, vec![None; len]);
        let plan = plan_selected_move(&layout, &selected, index);
        if !plan.pinned.is_empty() {
            prop_assert!(plan.pinned_destination + plan.pinned.len() <= pinned_count);
        }
        if !plan.unpinned.is_empty() {
            prop_assert!(plan.unpinned_destination >= pinned_count);
            prop_assert!(plan.unpinned_destination + plan.unpinned.len() <= len);
        }
    }
}

#[test]
fn layout_reports_group_ranges() {
    let group = GroupId::new();
    let layout = StripLayout::from_groups(1, vec![None, None, Some(group), Some(group), None]);
    assert_eq!(layout.group_range(group), Some(2..4));
    assert_eq!(layout.group_tab_count(group), 2);
    assert!(layout.is_pinned(0));
    assert!(!layout.is_pinned(1));
}
