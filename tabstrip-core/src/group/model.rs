//! Group side table
//!
//! The collection is the truth for which tabs belong to a group. The
//! [`GroupRegistry`] holds everything else: visual data, a member count kept
//! in step with the collection, and the closing flag.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::color::{ColorPool, TabGroupColorId};
use crate::types::GroupId;

/// Title, colour and collapsed state of a group.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TabGroupVisualData {
    /// Display title (may be empty)
    pub title: String,
    /// Palette colour
    pub color: TabGroupColorId,
    /// Whether the group is collapsed in the strip
    pub is_collapsed: bool,
}

impl TabGroupVisualData {
    /// Creates visual data with the given title and colour.
    #[must_use]
    pub fn new(title: impl Into<String>, color: TabGroupColorId) -> Self {
        Self {
            title: title.into(),
            color,
            is_collapsed: false,
        }
    }

    /// Sets the collapsed flag.
    #[must_use]
    pub const fn with_collapsed(mut self, collapsed: bool) -> Self {
        self.is_collapsed = collapsed;
        self
    }
}

/// A registered group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabGroup {
    id: GroupId,
    visual_data: TabGroupVisualData,
    tab_count: usize,
    closing: bool,
}

impl TabGroup {
    /// Group identity.
    #[must_use]
    pub const fn id(&self) -> GroupId {
        self.id
    }

    /// Current visual data.
    #[must_use]
    pub const fn visual_data(&self) -> &TabGroupVisualData {
        &self.visual_data
    }

    /// Number of member tabs.
    #[must_use]
    pub const fn tab_count(&self) -> usize {
        self.tab_count
    }

    /// Whether a confirmed bulk close is under way.
    #[must_use]
    pub const fn is_closing(&self) -> bool {
        self.closing
    }

    /// Shorthand for the collapsed flag.
    #[must_use]
    pub const fn is_collapsed(&self) -> bool {
        self.visual_data.is_collapsed
    }
}

/// Registry of live groups.
///
/// # Example
///
/// ```
/// use tabstrip_core::{GroupId, GroupRegistry};
///
/// let mut registry = GroupRegistry::new();
/// let id = GroupId::new();
/// registry.add_group(id, None);
///
/// assert!(registry.on_tab_added(id));   // 0 -> 1: created
/// assert!(!registry.on_tab_added(id));
/// assert!(!registry.on_tab_removed(id));
/// assert!(registry.on_tab_removed(id)); // 1 -> 0: closed
///
/// registry.remove_group(id);
/// assert!(!registry.contains(id));
/// ```
#[derive(Debug, Clone, Default)]
pub struct GroupRegistry {
    groups: HashMap<GroupId, TabGroup>,
    order: Vec<GroupId>,
    colors: ColorPool,
}

impl GroupRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `id` is registered.
    #[must_use]
    pub fn contains(&self, id: GroupId) -> bool {
        self.groups.contains_key(&id)
    }

    /// Looks up a group.
    #[must_use]
    pub fn get(&self, id: GroupId) -> Option<&TabGroup> {
        self.groups.get(&id)
    }

    /// Registered ids, oldest first.
    #[must_use]
    pub fn list_group_ids(&self) -> Vec<GroupId> {
        self.order.clone()
    }

    /// Number of registered groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no group is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Colour the next group without explicit visual data would get.
    #[must_use]
    pub fn next_color(&self) -> TabGroupColorId {
        self.colors.peek()
    }

    /// Registers `id` with zero members.
    ///
    /// Without visual data the group gets an empty title and the least-used
    /// colour.
    ///
    /// # Panics
    ///
    /// Panics if `id` is already registered.
    pub fn add_group(&mut self, id: GroupId, visual: Option<TabGroupVisualData>) -> &TabGroup {
        assert!(!self.groups.contains_key(&id), "{id} is already registered");
        let visual_data = match visual {
            Some(visual) => {
                self.colors.retain(visual.color);
                visual
            }
            None => TabGroupVisualData::new("", self.colors.allocate()),
        };
        tracing::debug!(group = %id, color = %visual_data.color, "group registered");
        self.order.push(id);
        self.groups.entry(id).or_insert(TabGroup {
            id,
            visual_data,
            tab_count: 0,
            closing: false,
        })
    }

    /// Unregisters an empty group.
    ///
    /// # Panics
    ///
    /// Panics if the group still has members.
    pub fn remove_group(&mut self, id: GroupId) -> Option<TabGroup> {
        let group = self.groups.remove(&id)?;
        assert_eq!(group.tab_count, 0, "{id} still has member tabs");
        self.order.retain(|g| *g != id);
        self.colors.release(group.visual_data.color);
        tracing::debug!(group = %id, "group unregistered");
        Some(group)
    }

    /// Counts one more member. Returns true when the group just became
    /// non-empty.
    pub fn on_tab_added(&mut self, id: GroupId) -> bool {
        self.groups.get_mut(&id).is_some_and(|group| {
            group.tab_count += 1;
            group.tab_count == 1
        })
    }

    /// Counts one member fewer. Returns true when the group just became
    /// empty.
    pub fn on_tab_removed(&mut self, id: GroupId) -> bool {
        self.groups.get_mut(&id).is_some_and(|group| {
            group.tab_count = group.tab_count.saturating_sub(1);
            group.tab_count == 0
        })
    }

    /// Replaces the visual data, returning the previous value.
    pub fn set_visual_data(
        &mut self,
        id: GroupId,
        visual: TabGroupVisualData,
    ) -> Option<TabGroupVisualData> {
        let group = self.groups.get_mut(&id)?;
        if group.visual_data.color != visual.color {
            self.colors.release(group.visual_data.color);
            self.colors.retain(visual.color);
        }
        Some(std::mem::replace(&mut group.visual_data, visual))
    }

    /// Sets the closing flag.
    pub fn set_closing(&mut self, id: GroupId, closing: bool) {
        if let Some(group) = self.groups.get_mut(&id) {
            group.closing = closing;
        }
    }

    /// Returns true while a confirmed close of `id` is in flight.
    #[must_use]
    pub fn is_closing(&self, id: GroupId) -> bool {
        self.groups.get(&id).is_some_and(TabGroup::is_closing)
    }

    /// Returns true if `id` is registered and collapsed.
    #[must_use]
    pub fn is_collapsed(&self, id: GroupId) -> bool {
        self.groups.get(&id).is_some_and(TabGroup::is_collapsed)
    }
}
