//! Index math for inserts, moves, pinning and grouping
//!
//! Everything here is pure: functions read a [`StripLayout`] snapshot (the
//! pinned boundary plus each index's group and split) and return indices or
//! move plans. The model applies the plans to the collection and replays the
//! same plans on the selection, so both stay in lockstep.

use std::ops::Range;

use crate::types::{GroupId, SplitId};

/// Per-index group/split attribution plus the pinned boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StripLayout {
    pinned_count: usize,
    groups: Vec<Option<GroupId>>,
    splits: Vec<Option<SplitId>>,
}

impl StripLayout {
    /// Creates an empty layout whose first `pinned_count` entries are pinned.
    #[must_use]
    pub const fn new(pinned_count: usize) -> Self {
        Self {
            pinned_count,
            groups: Vec::new(),
            splits: Vec::new(),
        }
    }

    /// Builds a layout from per-index groups, with no splits.
    #[must_use]
    pub fn from_groups(pinned_count: usize, groups: Vec<Option<GroupId>>) -> Self {
        let splits = vec![None; groups.len()];
        Self {
            pinned_count,
            groups,
            splits,
        }
    }

    /// Appends one index.
    pub fn push(&mut self, group: Option<GroupId>, split: Option<SplitId>) {
        self.groups.push(group);
        self.splits.push(split);
    }

    /// Number of indices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if there are no indices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Index of the first unpinned tab.
    #[must_use]
    pub const fn pinned_count(&self) -> usize {
        self.pinned_count
    }

    /// Returns true if `index` lies in the pinned prefix.
    #[must_use]
    pub const fn is_pinned(&self, index: usize) -> bool {
        index < self.pinned_count
    }

    /// Group at `index`; `None` when ungrouped or out of range.
    #[must_use]
    pub fn group_at(&self, index: usize) -> Option<GroupId> {
        self.groups.get(index).copied().flatten()
    }

    /// Split at `index`; `None` when unsplit or out of range.
    #[must_use]
    pub fn split_at(&self, index: usize) -> Option<SplitId> {
        self.splits.get(index).copied().flatten()
    }

    /// Range spanned by `group`, from its first to its last member.
    #[must_use]
    pub fn group_range(&self, group: GroupId) -> Option<Range<usize>> {
        let first = self.groups.iter().position(|g| *g == Some(group))?;
        let last = self.groups.iter().rposition(|g| *g == Some(group))?;
        Some(first..last + 1)
    }

    /// Number of members of `group`.
    #[must_use]
    pub fn group_tab_count(&self, group: GroupId) -> usize {
        self.groups.iter().filter(|g| **g == Some(group)).count()
    }
}

/// Decomposes moving `indices` (ascending) into one contiguous block starting
/// at `destination` into single-slot `(from, to)` moves.
///
/// Each pair is expressed in the indices current at the time it is applied,
/// and each tab lands directly on its final index: tabs moving right go
/// first, rightmost first, then tabs moving left, leftmost first.
///
/// # Example
///
/// ```
/// use tabstrip_core::move_engine::incremental_moves;
///
/// // [a b c d e]: move b and e so they start at 2 -> [a c b e d]
/// assert_eq!(incremental_moves(&[1, 4], 2), vec![(1, 2), (4, 3)]);
/// ```
#[must_use]
pub fn incremental_moves(indices: &[usize], destination: usize) -> Vec<(usize, usize)> {
    let mut right = Vec::new();
    let mut left = Vec::new();
    let mut target = destination;
    for &source in indices {
        if source < target {
            right.push((source, target));
        } else {
            left.push((source, target));
        }
        target += 1;
    }
    right.reverse();
    right.extend(left);
    right
}

/// Clamps an insertion index into the region a tab with `pinned` may occupy.
#[must_use]
pub fn constrain_insertion_index(layout: &StripLayout, index: usize, pinned: bool) -> usize {
    if pinned {
        index.min(layout.pinned_count())
    } else {
        index.clamp(layout.pinned_count(), layout.len())
    }
}

/// Clamps a move target into the region an existing tab with `pinned` may
/// occupy.
#[must_use]
pub fn constrain_move_index(layout: &StripLayout, index: usize, pinned: bool) -> usize {
    if pinned {
        index.min(layout.pinned_count().saturating_sub(1))
    } else {
        index.clamp(
            layout.pinned_count(),
            layout.len().saturating_sub(1).max(layout.pinned_count()),
        )
    }
}

/// Group a tab should carry after a single move from `index` to `to`.
///
/// Landing between two tabs of one group joins that group. Leaving a group
/// with other members for a spot next to neither of its neighbours drops the
/// membership. Otherwise the tab keeps its group.
#[must_use]
pub fn group_to_assign(layout: &StripLayout, index: usize, to: usize) -> Option<GroupId> {
    let current = layout.group_at(index);
    let (left, right) = match to.cmp(&index) {
        std::cmp::Ordering::Greater => (layout.group_at(to), layout.group_at(to + 1)),
        std::cmp::Ordering::Less => (
            to.checked_sub(1).and_then(|i| layout.group_at(i)),
            layout.group_at(to),
        ),
        std::cmp::Ordering::Equal => (None, None),
    };
    if current != left && current != right {
        if left == right && left.is_some() {
            return left;
        }
        if current.is_some_and(|g| layout.group_tab_count(g) > 1) {
            return None;
        }
    }
    current
}

/// Where a new group built from `indices` starts: just right of the first
/// index, past pinned tabs and past the rest of the first tab's own group.
#[must_use]
pub fn new_group_destination(layout: &StripLayout, indices: &[usize]) -> usize {
    let Some(&first) = indices.first() else {
        return layout.len();
    };
    let first_group = layout.group_at(first);
    for candidate in first + 1..layout.len() {
        if layout.is_pinned(candidate) {
            continue;
        }
        let group = layout.group_at(candidate);
        if group.is_none() || group != first_group {
            return candidate;
        }
    }
    layout.len()
}

/// Splits `indices` of one group into those leaving by the left edge and
/// those leaving by the right edge of the range `first..=last`.
#[must_use]
pub fn partition_by_midpoint(
    indices: &[usize],
    first: usize,
    last: usize,
) -> (Vec<usize>, Vec<usize>) {
    let midpoint = first + (last - first + 1) / 2;
    indices.iter().partition(|&&index| index < midpoint)
}

/// The pinned and unpinned halves of a selected-tabs move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedMovePlan {
    /// Selected pinned indices, ascending
    pub pinned: Vec<usize>,
    /// First index of the pinned block after the move
    pub pinned_destination: usize,
    /// Selected unpinned indices, ascending
    pub unpinned: Vec<usize>,
    /// First index of the unpinned block after the move
    pub unpinned_destination: usize,
}

/// Plans moving the selection (ascending) so it starts at `index`, each
/// half clamped to its own region.
#[must_use]
pub fn plan_selected_move(layout: &StripLayout, selected: &[usize], index: usize) -> SelectedMovePlan {
    let pinned_count = layout.pinned_count();
    let (pinned, unpinned): (Vec<usize>, Vec<usize>) =
        selected.iter().partition(|&&i| i < pinned_count);
    let np = pinned.len();
    let nu = unpinned.len();

    let pinned_destination = if np == 0 {
        0
    } else {
        let last_pinned = (index + np - 1).clamp(np - 1, pinned_count - 1);
        last_pinned + 1 - np
    };
    let unpinned_destination = (index + np).clamp(pinned_count, layout.len() - nu);

    SelectedMovePlan {
        pinned,
        pinned_destination,
        unpinned,
        unpinned_destination,
    }
}

/// Tabs that will sit immediately left and right of the moved unpinned
/// selection once it lands at `destination`, given in current indices.
#[must_use]
pub fn adjacent_tabs_after_selected_move(
    layout: &StripLayout,
    selected: &[usize],
    destination: usize,
) -> (Option<usize>, Option<usize>) {
    let count = layout.len();
    let pinned_count = layout.pinned_count();
    let is_selected = |i: usize| selected.binary_search(&i).is_ok();
    let np = selected.iter().filter(|&&i| i < pinned_count).count();
    let nu = selected.len() - np;
    if nu == 0 {
        return (None, None);
    }

    let first_dst = (destination + np).clamp(pinned_count, count - nu);
    let mut left = None;
    if first_dst > pinned_count {
        let mut slot = pinned_count;
        for i in pinned_count..count {
            if !is_selected(i) {
                if slot + 1 == first_dst {
                    left = Some(i);
                    break;
                }
                slot += 1;
            }
        }
    } else {
        let last_pinned_selected = np > 0 && destination + np >= pinned_count;
        left = (0..pinned_count)
            .rev()
            .find(|&i| is_selected(i) == last_pinned_selected);
    }

    let last_dst = first_dst + nu - 1;
    let mut right = None;
    if last_dst + 1 < count {
        let mut slot = count - 1;
        for i in (pinned_count..count).rev() {
            if !is_selected(i) {
                if slot == last_dst + 1 {
                    right = Some(i);
                    break;
                }
                slot -= 1;
            }
        }
    }
    (left, right)
}

/// Group a contiguous block of unpinned tabs must carry when it lands at
/// `destination` after `moving` is taken out.
///
/// A block landing strictly inside a group joins it. A requested group that
/// still has other members is kept only if the block lands next to them;
/// otherwise the block is ungrouped.
#[must_use]
pub fn block_group(
    layout: &StripLayout,
    moving: &[usize],
    destination: usize,
    requested: Option<GroupId>,
) -> Option<GroupId> {
    let remaining: Vec<Option<GroupId>> = (0..layout.len())
        .filter(|i| moving.binary_search(i).is_err())
        .map(|i| layout.group_at(i))
        .collect();
    let left = destination
        .checked_sub(1)
        .and_then(|i| remaining.get(i).copied().flatten());
    let right = remaining.get(destination).copied().flatten();
    if left.is_some() && left == right {
        return left;
    }
    match requested {
        Some(group) if remaining.contains(&Some(group)) => {
            (left == Some(group) || right == Some(group)).then_some(group)
        }
        other => other,
    }
}
