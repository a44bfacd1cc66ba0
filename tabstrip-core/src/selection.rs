//! Selection model over the linear tab index space
//!
//! [`ListSelectionModel`] stores a sorted set of selected indices plus an
//! active index and an anchor index. It knows nothing about tabs: the owning
//! model keeps it in lockstep with the collection by replaying every
//! structural change (insert, remove, move) through the matching method here.

use std::collections::BTreeSet;

/// Selected indices plus the active and anchor positions.
///
/// # Example
///
/// ```
/// use tabstrip_core::ListSelectionModel;
///
/// let mut selection = ListSelectionModel::new();
/// selection.set_selected_index(2);
/// selection.add_selection_from_anchor_to(4);
/// assert_eq!(selection.selected_indices(), vec![2, 3, 4]);
///
/// // A tab inserted at 0 shifts everything right.
/// selection.increment_from(0);
/// assert_eq!(selection.selected_indices(), vec![3, 4, 5]);
/// assert_eq!(selection.active(), Some(5));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListSelectionModel {
    selected: BTreeSet<usize>,
    active: Option<usize>,
    anchor: Option<usize>,
}

impl ListSelectionModel {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The active index.
    #[must_use]
    pub const fn active(&self) -> Option<usize> {
        self.active
    }

    /// The anchor used by range-extension gestures.
    #[must_use]
    pub const fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    /// Sets the active index without touching the selected set.
    pub const fn set_active(&mut self, active: Option<usize>) {
        self.active = active;
    }

    /// Sets the anchor index.
    pub const fn set_anchor(&mut self, anchor: Option<usize>) {
        self.anchor = anchor;
    }

    /// Selected indices in ascending order.
    #[must_use]
    pub fn selected_indices(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }

    /// Number of selected indices.
    #[must_use]
    pub fn size(&self) -> usize {
        self.selected.len()
    }

    /// Returns true when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Returns true if `index` is selected.
    #[must_use]
    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// Lowest selected index.
    #[must_use]
    pub fn first_selected(&self) -> Option<usize> {
        self.selected.first().copied()
    }

    /// Selects only `index` and makes it active and anchor.
    pub fn set_selected_index(&mut self, index: usize) {
        self.selected.clear();
        self.selected.insert(index);
        self.active = Some(index);
        self.anchor = Some(index);
    }

    /// Adds `index` to the selection without moving active or anchor.
    pub fn add_index_to_selection(&mut self, index: usize) {
        self.selected.insert(index);
    }

    /// Adds every index in `[start, end]` to the selection.
    pub fn add_index_range_to_selection(&mut self, start: usize, end: usize) {
        self.selected.extend(start..=end);
    }

    /// Removes `index` from the selection without moving active or anchor.
    pub fn remove_index_from_selection(&mut self, index: usize) {
        self.selected.remove(&index);
    }

    /// Replaces the selection with the range between anchor and `index`.
    ///
    /// Without an anchor this degrades to [`Self::set_selected_index`].
    pub fn set_selection_from_anchor_to(&mut self, index: usize) {
        match self.anchor {
            None => self.set_selected_index(index),
            Some(anchor) => {
                self.selected.clear();
                self.selected.extend(anchor.min(index)..=anchor.max(index));
                self.active = Some(index);
            }
        }
    }

    /// Adds the range between anchor and `index` to the selection.
    pub fn add_selection_from_anchor_to(&mut self, index: usize) {
        match self.anchor {
            None => self.set_selected_index(index),
            Some(anchor) => {
                self.selected.extend(anchor.min(index)..=anchor.max(index));
                self.active = Some(index);
            }
        }
    }

    /// Shifts every stored index `>= index` right by one.
    pub fn increment_from(&mut self, index: usize) {
        self.increment_by(index, 1);
    }

    /// Shifts every stored index `>= index` right by `span`.
    pub fn increment_by(&mut self, index: usize, span: usize) {
        let bump = |value: usize| if value >= index { value + span } else { value };
        self.selected = self.selected.iter().map(|&v| bump(v)).collect();
        self.active = self.active.map(bump);
        self.anchor = self.anchor.map(bump);
    }

    /// Accounts for the removal of `index`.
    ///
    /// The removed index leaves the selection; active and anchor become
    /// `None` if they pointed at it. Higher indices shift left by one.
    pub fn decrement_from(&mut self, index: usize) {
        let shift = |value: usize| match value.cmp(&index) {
            std::cmp::Ordering::Less => Some(value),
            std::cmp::Ordering::Equal => None,
            std::cmp::Ordering::Greater => Some(value - 1),
        };
        self.selected = self.selected.iter().filter_map(|&v| shift(v)).collect();
        self.active = self.active.and_then(shift);
        self.anchor = self.anchor.and_then(shift);
    }

    /// Replays moving the `length` items at `old_index` so that they start
    /// at `new_index` (expressed in the coordinates after the move).
    pub fn move_range(&mut self, old_index: usize, new_index: usize, length: usize) {
        if old_index == new_index || length == 0 {
            return;
        }
        // A move to a higher index is the same as moving the items it jumps
        // over to a lower index.
        let (old_index, new_index, length) = if new_index > old_index {
            (old_index + length, old_index, new_index - old_index)
        } else {
            (old_index, new_index, length)
        };
        let distance = old_index - new_index;
        let remap = |value: usize| {
            if (old_index..old_index + length).contains(&value) {
                value - distance
            } else if (new_index..old_index).contains(&value) {
                value + length
            } else {
                value
            }
        };
        self.selected = self.selected.iter().map(|&v| remap(v)).collect();
        self.active = self.active.map(remap);
        self.anchor = self.anchor.map(remap);
    }

    /// Clears selection, active and anchor.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.active = None;
        self.anchor = None;
    }
}
