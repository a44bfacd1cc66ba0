//! Property tests for `TabCollection`

use proptest::prelude::*;
use tabstrip_core::{GroupId, Tab, TabCollection, TabContents};

// ========== Strategies ==========

#[derive(Debug, Clone)]
enum Step {
    Insert {
        at: usize,
        group: Option<usize>,
        pinned: bool,
    },
    Remove {
        at: usize,
    },
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => (any::<usize>(), prop::option::of(0_usize..3), prop::bool::weighted(0.2))
            .prop_map(|(at, group, pinned)| Step::Insert { at, group, pinned }),
        1 => any::<usize>().prop_map(|at| Step::Remove { at }),
    ]
}

fn check(collection: &TabCollection) -> Result<(), TestCaseError> {
    prop_assert!(collection.validate().is_ok(), "{:?}", collection.validate());
    let handles = collection.handles();
    prop_assert_eq!(handles.len(), collection.len());
    for (index, handle) in handles.iter().enumerate() {
        prop_assert_eq!(collection.index_of(*handle), Some(index));
        prop_assert_eq!(collection.handle_at(index), Some(*handle));
    }
    let first_unpinned = collection.index_of_first_non_pinned_tab();
    for (index, tab) in collection.iter().enumerate() {
        prop_assert_eq!(tab.pinned(), index < first_unpinned);
    }
    for group in collection.group_ids() {
        let range = collection.group_range(group).unwrap();
        let members = collection.iter().filter(|t| t.group() == Some(group)).count();
        prop_assert_eq!(range.len(), members);
        prop_assert!(range.start >= first_unpinned);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Arbitrary inserts and removals keep the tree consistent.
    #[test]
    fn random_edits_keep_invariants(steps in prop::collection::vec(arb_step(), 1..40)) {
        let groups = [GroupId::new(), GroupId::new(), GroupId::new()];
        let mut collection = TabCollection::new();
        for step in steps {
            match step {
                Step::Insert { at, group, pinned } => {
                    let at = at % (collection.len() + 1);
                    let tab = Tab::new(TabContents::new("https://example.test"));
                    let handle = tab.handle();
                    let landed = collection.insert_at(tab, at, group.map(|g| groups[g]), pinned);
                    prop_assert_eq!(collection.index_of(handle), Some(landed));
                    prop_assert_eq!(collection.tab(handle).unwrap().pinned(), pinned);
                }
                Step::Remove { at } => {
                    if collection.is_empty() {
                        continue;
                    }
                    let at = at % collection.len();
                    let before = collection.len();
                    let tab = collection.remove_at(at).unwrap();
                    prop_assert_eq!(collection.len(), before - 1);
                    prop_assert!(tab.group().is_none());
                    prop_assert!(collection.index_of(tab.handle()).is_none());
                }
            }
            check(&collection)?;
        }
    }

    /// Inserting an ungrouped tab and removing it again restores the order.
    #[test]
    fn insert_then_remove_round_trips(count in 0_usize..10, at in any::<usize>()) {
        let mut collection = TabCollection::new();
        for i in 0..count {
            collection.insert_at(Tab::new(TabContents::new(format!("https://{i}.test"))), i, None, false);
        }
        let before = collection.handles();
        let at = at % (count + 1);
        let landed = collection.insert_at(Tab::new(TabContents::new("x")), at, None, false);
        prop_assert_eq!(landed, at);
        collection.remove_at(landed);
        prop_assert_eq!(collection.handles(), before);
    }
}

#[test]
fn grouped_insert_joins_the_existing_range() {
    let group = GroupId::new();
    let mut collection = TabCollection::new();
    for i in 0..3 {
        collection.insert_at(Tab::new(TabContents::new(format!("{i}"))), i, None, false);
    }
    collection.insert_at(Tab::new(TabContents::new("g")), 1, Some(group), false);
    let landed = collection.insert_at(Tab::new(TabContents::new("h")), 4, Some(group), false);
    assert_eq!(landed, 2);
    assert_eq!(collection.group_range(group), Some(1..3));
    assert!(collection.validate().is_ok());
}
