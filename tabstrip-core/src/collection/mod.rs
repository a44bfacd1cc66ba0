//! The tab collection: an ordered forest with a pinned prefix
//!
//! [`TabCollection`] owns every attached [`Tab`] in an arena keyed by
//! [`TabHandle`], and keeps their order in a tree:
//!
//! - a flat list of pinned tabs, always first;
//! - a sequence of unpinned [`CollectionNode`]s (tabs, splits, groups).
//!
//! Group and split contiguity follow from the tree shape. The only places
//! that write a tab's pinned/group/split attributes are the placement
//! routines below, so attribute and position cannot disagree.

mod node;

use std::collections::{HashMap, HashSet};
use std::ops::Range;

pub use node::{CollectionNode, GroupNode, SplitNode};

use crate::error::{TabStripError, TabStripResult};
use crate::move_engine::StripLayout;
use crate::tab::Tab;
use crate::types::{GroupId, SplitId, TabHandle};

/// How a placement treats a position that falls inside a sub-collection
/// the tab does not belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    /// Move to the nearer boundary of the foreign sub-collection.
    Snap,
    /// Dissolve a foreign split; a foreign group is a caller bug.
    Strict,
}

/// Ordered forest of tabs.
///
/// # Example
///
/// ```
/// use tabstrip_core::{GroupId, Tab, TabCollection, TabContents};
///
/// let mut collection = TabCollection::new();
/// let group = GroupId::new();
/// collection.insert_at(Tab::new(TabContents::new("a")), 0, None, false);
/// collection.insert_at(Tab::new(TabContents::new("b")), 1, Some(group), false);
/// let pinned = collection.insert_at(Tab::new(TabContents::new("p")), 2, None, true);
///
/// // Pinned tabs are clamped into the prefix.
/// assert_eq!(pinned, 0);
/// assert_eq!(collection.index_of_first_non_pinned_tab(), 1);
/// assert_eq!(collection.group_range(group), Some(2..3));
/// assert!(collection.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TabCollection {
    tabs: HashMap<TabHandle, Tab>,
    pinned: Vec<TabHandle>,
    unpinned: Vec<CollectionNode>,
}

impl TabCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tabs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    /// Returns true if there are no tabs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Returns true if `index` addresses a tab.
    #[must_use]
    pub fn contains_index(&self, index: usize) -> bool {
        index < self.len()
    }

    /// Boundary between the pinned prefix and the rest.
    #[must_use]
    pub fn index_of_first_non_pinned_tab(&self) -> usize {
        self.pinned.len()
    }

    /// The unpinned tree, left to right.
    #[must_use]
    pub fn roots(&self) -> &[CollectionNode] {
        &self.unpinned
    }

    /// Handle of the tab at `index`.
    #[must_use]
    pub fn handle_at(&self, index: usize) -> Option<TabHandle> {
        match self.pinned.get(index) {
            Some(handle) => Some(*handle),
            None => node::tab_at_in(&self.unpinned, index.checked_sub(self.pinned.len())?),
        }
    }

    /// Tab at `index`.
    #[must_use]
    pub fn tab_at(&self, index: usize) -> Option<&Tab> {
        self.handle_at(index).and_then(|handle| self.tabs.get(&handle))
    }

    /// Tab with `handle`, if attached.
    #[must_use]
    pub fn tab(&self, handle: TabHandle) -> Option<&Tab> {
        self.tabs.get(&handle)
    }

    pub(crate) fn tab_mut(&mut self, handle: TabHandle) -> Option<&mut Tab> {
        self.tabs.get_mut(&handle)
    }

    pub(crate) fn tab_at_mut(&mut self, index: usize) -> Option<&mut Tab> {
        let handle = self.handle_at(index)?;
        self.tabs.get_mut(&handle)
    }

    /// Current index of `handle`.
    #[must_use]
    pub fn index_of(&self, handle: TabHandle) -> Option<usize> {
        if let Some(index) = self.pinned.iter().position(|h| *h == handle) {
            return Some(index);
        }
        node::index_of_in(&self.unpinned, handle).map(|index| index + self.pinned.len())
    }

    /// All handles in strip order.
    #[must_use]
    pub fn handles(&self) -> Vec<TabHandle> {
        let mut out = self.pinned.clone();
        for node in &self.unpinned {
            node.collect_handles(&mut out);
        }
        out
    }

    /// All tabs in strip order.
    pub fn iter(&self) -> impl Iterator<Item = &Tab> + '_ {
        self.handles()
            .into_iter()
            .filter_map(move |handle| self.tabs.get(&handle))
    }

    /// Index range covered by `group`.
    #[must_use]
    pub fn group_range(&self, group: GroupId) -> Option<Range<usize>> {
        let mut start = self.pinned.len();
        for node in &self.unpinned {
            let count = node.tab_count();
            if matches!(node, CollectionNode::Group(g) if g.id == group) {
                return Some(start..start + count);
            }
            start += count;
        }
        None
    }

    /// Index range covered by `split`.
    #[must_use]
    pub fn split_range(&self, split: SplitId) -> Option<Range<usize>> {
        let members = self.split_members(split)?;
        let first = self.index_of(*members.first()?)?;
        Some(first..first + members.len())
    }

    /// Members of `split`, left to right.
    #[must_use]
    pub fn split_members(&self, split: SplitId) -> Option<Vec<TabHandle>> {
        fn find(nodes: &[CollectionNode], split: SplitId) -> Option<Vec<TabHandle>> {
            nodes.iter().find_map(|node| match node {
                CollectionNode::Split(s) if s.id == split => Some(s.tabs.clone()),
                CollectionNode::Group(g) => find(&g.children, split),
                _ => None,
            })
        }
        find(&self.unpinned, split)
    }

    /// Groups present in the tree, left to right.
    #[must_use]
    pub fn group_ids(&self) -> Vec<GroupId> {
        self.unpinned
            .iter()
            .filter_map(|node| match node {
                CollectionNode::Group(g) => Some(g.id),
                _ => None,
            })
            .collect()
    }

    /// Splits present in the tree, left to right.
    #[must_use]
    pub fn split_ids(&self) -> Vec<SplitId> {
        self.iter().filter_map(Tab::split).fold(Vec::new(), |mut acc, id| {
            if acc.last() != Some(&id) {
                acc.push(id);
            }
            acc
        })
    }

    /// Per-index attributes used by the move engine.
    #[must_use]
    pub fn layout(&self) -> StripLayout {
        let mut layout = StripLayout::new(self.pinned.len());
        for tab in self.iter() {
            layout.push(tab.group(), tab.split());
        }
        layout
    }

    /// Inserts `tab` at `index`.
    ///
    /// The index is clamped into the pinned prefix or the unpinned region,
    /// then into `group`'s range if the group already has tabs. A position
    /// inside a foreign group or split snaps to its nearer edge. Pinned tabs
    /// never carry a group. Returns the index the tab ended up at.
    ///
    /// # Panics
    ///
    /// Panics if a tab with the same handle is already attached.
    pub fn insert_at(
        &mut self,
        tab: Tab,
        index: usize,
        group: Option<GroupId>,
        pinned: bool,
    ) -> usize {
        let handle = tab.handle();
        assert!(
            !self.tabs.contains_key(&handle),
            "{handle} is already in the collection"
        );
        self.tabs.insert(handle, tab);
        self.place(handle, index, group, pinned, Placement::Snap)
    }

    /// Detaches the tab at `index` and hands it back.
    ///
    /// Empty groups disappear and splits left with fewer than two members
    /// are dissolved. The returned tab carries no group or split.
    pub fn remove_at(&mut self, index: usize) -> Option<Tab> {
        let handle = self.handle_at(index)?;
        self.unlink(handle);
        let mut tab = self.tabs.remove(&handle)?;
        tab.set_group(None);
        tab.set_split(None);
        Some(tab)
    }

    /// Moves the tabs at `indices` so they sit contiguously from `destination`
    /// (an index in the final order), applying `group` and `pinned` to each.
    ///
    /// Splits whose members all move stay intact; a split the block lands in
    /// the middle of is dissolved. Landing strictly inside a different group
    /// is a caller bug.
    ///
    /// # Panics
    ///
    /// Panics on an out-of-range index or destination, or if the move would
    /// fracture a group.
    pub fn move_tabs(
        &mut self,
        indices: &[usize],
        destination: usize,
        group: Option<GroupId>,
        pinned: bool,
    ) {
        let handles: Vec<TabHandle> = indices.iter().map(|&i| self.checked_handle(i)).collect();
        let moving: HashSet<TabHandle> = handles.iter().copied().collect();
        let intact: Vec<(SplitId, Vec<TabHandle>)> = self
            .split_ids()
            .into_iter()
            .filter_map(|id| self.split_members(id).map(|members| (id, members)))
            .filter(|(_, members)| members.iter().all(|h| moving.contains(h)))
            .collect();

        for handle in &handles {
            self.unlink(*handle);
        }
        for (offset, handle) in handles.iter().enumerate() {
            self.place(*handle, destination + offset, group, pinned, Placement::Strict);
        }
        if !pinned {
            for (id, members) in intact {
                // Members were adjacent and moved as one block.
                let wrapped = wrap_split(&mut self.unpinned, id, &members, &mut self.tabs);
                debug_assert!(wrapped, "{id} lost contiguity while moving");
            }
        }
    }

    /// Moves the whole of `group` so its first tab lands at `to`.
    ///
    /// Returns the index the group actually starts at; a target inside
    /// another group or split snaps to its nearer edge.
    pub fn move_group_to(&mut self, group: GroupId, to: usize) -> Option<usize> {
        let position = self
            .unpinned
            .iter()
            .position(|node| matches!(node, CollectionNode::Group(g) if g.id == group))?;
        let node = self.unpinned.remove(position);
        let first = self.pinned.len();
        let local = to.saturating_sub(first);
        let (slot, at) = slot_for(&mut self.unpinned, local, Placement::Snap, &mut self.tabs);
        self.unpinned.insert(slot, node);
        Some(first + at)
    }

    /// Wraps `handles` into a new split.
    ///
    /// # Errors
    ///
    /// Fails if fewer than two tabs are given, if any of them is pinned,
    /// already split, or missing, or if they are not adjacent under one
    /// parent.
    pub fn create_split(&mut self, id: SplitId, handles: &[TabHandle]) -> TabStripResult<()> {
        if handles.len() < 2 {
            return Err(TabStripError::SplitTooSmall {
                count: handles.len(),
            });
        }
        for handle in handles {
            let tab = self
                .tabs
                .get(handle)
                .ok_or(TabStripError::TabNotFound(*handle))?;
            if tab.pinned() {
                return Err(TabStripError::PinnedTabInSplit);
            }
            if tab.split().is_some() {
                return Err(TabStripError::InvariantViolation(format!(
                    "{handle} already belongs to a split"
                )));
            }
        }
        if wrap_split(&mut self.unpinned, id, handles, &mut self.tabs) {
            Ok(())
        } else {
            Err(TabStripError::SplitNotContiguous)
        }
    }

    /// Replaces `split` by its member tabs. Returns the former members.
    pub fn dissolve_split(&mut self, split: SplitId) -> Vec<TabHandle> {
        fn dissolve_in(
            nodes: &mut Vec<CollectionNode>,
            split: SplitId,
            tabs: &mut HashMap<TabHandle, Tab>,
        ) -> Option<Vec<TabHandle>> {
            if let Some(i) = nodes
                .iter()
                .position(|node| matches!(node, CollectionNode::Split(s) if s.id == split))
            {
                return Some(dissolve_at(nodes, i, tabs));
            }
            nodes.iter_mut().find_map(|node| match node {
                CollectionNode::Group(g) => dissolve_in(&mut g.children, split, tabs),
                _ => None,
            })
        }
        dissolve_in(&mut self.unpinned, split, &mut self.tabs).unwrap_or_default()
    }

    /// Checks every structural invariant.
    ///
    /// # Errors
    ///
    /// Returns [`TabStripError::InvariantViolation`] describing the first
    /// broken invariant.
    pub fn validate(&self) -> TabStripResult<()> {
        let violation = |msg: String| Err(TabStripError::InvariantViolation(msg));
        let handles = self.handles();
        let unique: HashSet<TabHandle> = handles.iter().copied().collect();
        if unique.len() != handles.len() || handles.len() != self.tabs.len() {
            return violation("tree and arena disagree".to_string());
        }
        for handle in &self.pinned {
            let Some(tab) = self.tabs.get(handle) else {
                return violation(format!("{handle} missing from arena"));
            };
            if !tab.pinned() || tab.group().is_some() || tab.split().is_some() {
                return violation(format!("pinned {handle} carries group/split state"));
            }
        }
        let mut groups_seen = HashSet::new();
        let mut splits_seen = HashSet::new();
        for node in &self.unpinned {
            if let CollectionNode::Group(g) = node {
                if !groups_seen.insert(g.id) {
                    return violation(format!("{} appears twice", g.id));
                }
                if g.children.is_empty() {
                    return violation(format!("{} is empty", g.id));
                }
            }
            if let Err(msg) = self.check_node(node, None, &mut splits_seen) {
                return violation(msg);
            }
        }
        Ok(())
    }

    fn check_node(
        &self,
        node: &CollectionNode,
        group: Option<GroupId>,
        splits_seen: &mut HashSet<SplitId>,
    ) -> Result<(), String> {
        let expect = |handle: &TabHandle, split: Option<SplitId>| -> Result<(), String> {
            let tab = self
                .tabs
                .get(handle)
                .ok_or_else(|| format!("{handle} missing from arena"))?;
            if tab.pinned() {
                return Err(format!("{handle} is pinned outside the prefix"));
            }
            if tab.group() != group || tab.split() != split {
                return Err(format!("{handle} attributes disagree with its position"));
            }
            Ok(())
        };
        match node {
            CollectionNode::Tab(handle) => expect(handle, None),
            CollectionNode::Split(s) => {
                if !splits_seen.insert(s.id) {
                    return Err(format!("{} appears twice", s.id));
                }
                if s.tabs.len() < 2 {
                    return Err(format!("{} has fewer than 2 tabs", s.id));
                }
                s.tabs.iter().try_for_each(|h| expect(h, Some(s.id)))
            }
            CollectionNode::Group(g) => {
                if group.is_some() {
                    return Err(format!("{} is nested in another group", g.id));
                }
                g.children
                    .iter()
                    .try_for_each(|child| self.check_node(child, Some(g.id), splits_seen))
            }
        }
    }

    fn checked_handle(&self, index: usize) -> TabHandle {
        match self.handle_at(index) {
            Some(handle) => handle,
            None => panic!("index {index} out of range (count {})", self.len()),
        }
    }

    /// Takes `handle` out of the tree, leaving it in the arena.
    fn unlink(&mut self, handle: TabHandle) {
        if let Some(position) = self.pinned.iter().position(|h| *h == handle) {
            self.pinned.remove(position);
        } else {
            unlink_from(&mut self.unpinned, handle, &mut self.tabs);
        }
        if let Some(tab) = self.tabs.get_mut(&handle) {
            tab.set_split(None);
        }
    }

    /// Puts an arena tab back into the tree and returns its index.
    fn place(
        &mut self,
        handle: TabHandle,
        index: usize,
        group: Option<GroupId>,
        pinned: bool,
        placement: Placement,
    ) -> usize {
        let Self {
            tabs,
            pinned: prefix,
            unpinned,
        } = self;

        if pinned {
            let slot = match placement {
                Placement::Snap => index.min(prefix.len()),
                Placement::Strict => {
                    assert!(index <= prefix.len(), "pinned destination {index} out of range");
                    index
                }
            };
            prefix.insert(slot, handle);
            set_attributes(tabs, handle, true, None);
            return slot;
        }

        let first = prefix.len();
        let total: usize = unpinned.iter().map(CollectionNode::tab_count).sum();
        let local = match placement {
            Placement::Snap => index.clamp(first, first + total) - first,
            Placement::Strict => {
                assert!(
                    (first..=first + total).contains(&index),
                    "unpinned destination {index} out of range"
                );
                index - first
            }
        };

        let at = match group {
            Some(id) => match group_node_mut(unpinned, id) {
                Some((start, node)) => {
                    let count: usize = node.children.iter().map(CollectionNode::tab_count).sum();
                    let inner = match placement {
                        Placement::Snap => local.clamp(start, start + count) - start,
                        Placement::Strict => {
                            assert!(
                                (start..=start + count).contains(&local),
                                "destination {index} would fracture {id}"
                            );
                            local - start
                        }
                    };
                    let (slot, offset) = slot_for(&mut node.children, inner, placement, tabs);
                    node.children.insert(slot, CollectionNode::Tab(handle));
                    start + offset
                }
                None => {
                    let (slot, offset) = slot_for(unpinned, local, placement, tabs);
                    unpinned.insert(
                        slot,
                        CollectionNode::Group(GroupNode {
                            id,
                            children: vec![CollectionNode::Tab(handle)],
                        }),
                    );
                    offset
                }
            },
            None => {
                let (slot, offset) = slot_for(unpinned, local, placement, tabs);
                unpinned.insert(slot, CollectionNode::Tab(handle));
                offset
            }
        };
        set_attributes(tabs, handle, false, group);
        first + at
    }
}

fn set_attributes(
    tabs: &mut HashMap<TabHandle, Tab>,
    handle: TabHandle,
    pinned: bool,
    group: Option<GroupId>,
) {
    if let Some(tab) = tabs.get_mut(&handle) {
        tab.set_pinned(pinned);
        tab.set_group(group);
        tab.set_split(None);
    }
}

/// Finds the root group node for `id` together with its start position
/// relative to the unpinned region.
fn group_node_mut(
    nodes: &mut [CollectionNode],
    id: GroupId,
) -> Option<(usize, &mut GroupNode)> {
    let slot = nodes
        .iter()
        .position(|node| matches!(node, CollectionNode::Group(g) if g.id == id))?;
    let start = nodes[..slot].iter().map(CollectionNode::tab_count).sum();
    match &mut nodes[slot] {
        CollectionNode::Group(g) => Some((start, g)),
        _ => None,
    }
}

/// Chooses the slot in `nodes` for a tab landing at relative position `pos`.
///
/// Returns the slot and the position the tab will actually occupy.
fn slot_for(
    nodes: &mut Vec<CollectionNode>,
    pos: usize,
    placement: Placement,
    tabs: &mut HashMap<TabHandle, Tab>,
) -> (usize, usize) {
    let mut start = 0;
    let mut i = 0;
    while i < nodes.len() {
        if pos == start {
            return (i, start);
        }
        let count = nodes[i].tab_count();
        if pos < start + count {
            match placement {
                Placement::Snap => {
                    return if pos - start < start + count - pos {
                        (i, start)
                    } else {
                        (i + 1, start + count)
                    };
                }
                Placement::Strict => {
                    if let CollectionNode::Group(g) = &nodes[i] {
                        panic!("position {pos} would fracture {}", g.id);
                    }
                    dissolve_at(nodes, i, tabs);
                    // Node i is now a plain tab starting at `start`.
                    continue;
                }
            }
        }
        start += count;
        i += 1;
    }
    (nodes.len(), start)
}

/// Replaces the split node at `i` with its tabs. Returns the members.
fn dissolve_at(
    nodes: &mut Vec<CollectionNode>,
    i: usize,
    tabs: &mut HashMap<TabHandle, Tab>,
) -> Vec<TabHandle> {
    if !matches!(nodes.get(i), Some(CollectionNode::Split(_))) {
        return Vec::new();
    }
    let CollectionNode::Split(split) = nodes.remove(i) else {
        return Vec::new();
    };
    for handle in &split.tabs {
        if let Some(tab) = tabs.get_mut(handle) {
            tab.set_split(None);
        }
    }
    nodes.splice(i..i, split.tabs.iter().map(|h| CollectionNode::Tab(*h)));
    split.tabs
}

/// Removes `handle` from `nodes`, pruning what becomes empty or too small.
fn unlink_from(
    nodes: &mut Vec<CollectionNode>,
    handle: TabHandle,
    tabs: &mut HashMap<TabHandle, Tab>,
) -> bool {
    enum Hit {
        Tab,
        SplitShrunk(bool),
        GroupShrunk(bool),
    }

    for i in 0..nodes.len() {
        let hit = match &mut nodes[i] {
            CollectionNode::Tab(h) if *h == handle => Some(Hit::Tab),
            CollectionNode::Tab(_) => None,
            CollectionNode::Split(split) => split.tabs.iter().position(|h| *h == handle).map(|p| {
                split.tabs.remove(p);
                Hit::SplitShrunk(split.tabs.len() < 2)
            }),
            CollectionNode::Group(group) => unlink_from(&mut group.children, handle, tabs)
                .then(|| Hit::GroupShrunk(group.children.is_empty())),
        };
        match hit {
            None => continue,
            Some(Hit::Tab | Hit::GroupShrunk(true)) => {
                nodes.remove(i);
            }
            Some(Hit::SplitShrunk(true)) => {
                dissolve_at(nodes, i, tabs);
            }
            Some(Hit::SplitShrunk(false) | Hit::GroupShrunk(false)) => {}
        }
        return true;
    }
    false
}

/// Wraps the adjacent tab nodes `members` into a split node.
fn wrap_split(
    nodes: &mut Vec<CollectionNode>,
    id: SplitId,
    members: &[TabHandle],
    tabs: &mut HashMap<TabHandle, Tab>,
) -> bool {
    let Some(&first) = members.first() else {
        return false;
    };
    if let Some(start) = nodes
        .iter()
        .position(|node| matches!(node, CollectionNode::Tab(h) if *h == first))
    {
        let run_matches = members.iter().enumerate().all(|(offset, handle)| {
            matches!(nodes.get(start + offset), Some(CollectionNode::Tab(h)) if h == handle)
        });
        if !run_matches {
            return false;
        }
        nodes.splice(
            start..start + members.len(),
            std::iter::once(CollectionNode::Split(SplitNode {
                id,
                tabs: members.to_vec(),
            })),
        );
        for handle in members {
            if let Some(tab) = tabs.get_mut(handle) {
                tab.set_split(Some(id));
            }
        }
        return true;
    }
    nodes.iter_mut().any(|node| match node {
        CollectionNode::Group(g) => wrap_split(&mut g.children, id, members, tabs),
        _ => false,
    })
}
