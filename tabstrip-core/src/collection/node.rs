//! Tree nodes of the unpinned part of the collection
//!
//! The unpinned region is a sequence of [`CollectionNode`]s. Groups hold tabs
//! and splits; splits hold tabs only. Positions are never stored, they are
//! recomputed by counting.

use crate::types::{GroupId, SplitId, TabHandle};

/// Tabs shown side by side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitNode {
    /// Split identity
    pub id: SplitId,
    /// Members, left to right
    pub tabs: Vec<TabHandle>,
}

/// A contiguous run of tabs and splits sharing a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupNode {
    /// Group identity
    pub id: GroupId,
    /// Members, left to right; never contains another group
    pub children: Vec<CollectionNode>,
}

/// One entry of the unpinned sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionNode {
    /// A standalone tab
    Tab(TabHandle),
    /// A split sub-collection
    Split(SplitNode),
    /// A group sub-collection
    Group(GroupNode),
}

impl CollectionNode {
    /// Number of tabs under this node.
    #[must_use]
    pub fn tab_count(&self) -> usize {
        match self {
            Self::Tab(_) => 1,
            Self::Split(split) => split.tabs.len(),
            Self::Group(group) => group.children.iter().map(Self::tab_count).sum(),
        }
    }

    /// Tab at `index` relative to the start of this node.
    #[must_use]
    pub fn tab_at(&self, index: usize) -> Option<TabHandle> {
        match self {
            Self::Tab(handle) => (index == 0).then_some(*handle),
            Self::Split(split) => split.tabs.get(index).copied(),
            Self::Group(group) => tab_at_in(&group.children, index),
        }
    }

    /// Position of `handle` relative to the start of this node.
    #[must_use]
    pub fn index_of(&self, handle: TabHandle) -> Option<usize> {
        match self {
            Self::Tab(own) => (*own == handle).then_some(0),
            Self::Split(split) => split.tabs.iter().position(|h| *h == handle),
            Self::Group(group) => index_of_in(&group.children, handle),
        }
    }

    /// Appends every tab under this node to `out`, in order.
    pub fn collect_handles(&self, out: &mut Vec<TabHandle>) {
        match self {
            Self::Tab(handle) => out.push(*handle),
            Self::Split(split) => out.extend(split.tabs.iter().copied()),
            Self::Group(group) => {
                for child in &group.children {
                    child.collect_handles(out);
                }
            }
        }
    }
}

/// Tab at `index` across a sequence of nodes.
pub(crate) fn tab_at_in(nodes: &[CollectionNode], mut index: usize) -> Option<TabHandle> {
    for node in nodes {
        let count = node.tab_count();
        if index < count {
            return node.tab_at(index);
        }
        index -= count;
    }
    None
}

/// Position of `handle` across a sequence of nodes.
pub(crate) fn index_of_in(nodes: &[CollectionNode], handle: TabHandle) -> Option<usize> {
    let mut start = 0;
    for node in nodes {
        if let Some(offset) = node.index_of(handle) {
            return Some(start + offset);
        }
        start += node.tab_count();
    }
    None
}
