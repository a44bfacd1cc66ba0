//! Split side table

use std::collections::HashMap;

use super::types::SplitVisualData;
use crate::error::{TabStripError, TabStripResult};
use crate::types::{SplitId, TabHandle};

/// A registered split.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitData {
    id: SplitId,
    visual_data: SplitVisualData,
    members: Vec<TabHandle>,
    active: Option<TabHandle>,
}

impl SplitData {
    /// Split identity.
    #[must_use]
    pub const fn id(&self) -> SplitId {
        self.id
    }

    /// Layout data.
    #[must_use]
    pub const fn visual_data(&self) -> &SplitVisualData {
        &self.visual_data
    }

    /// Members as last reconciled with the collection.
    #[must_use]
    pub fn members(&self) -> &[TabHandle] {
        &self.members
    }

    /// The member focused within the split.
    #[must_use]
    pub const fn active_tab(&self) -> Option<TabHandle> {
        self.active
    }
}

/// Registry of live splits.
#[derive(Debug, Clone, Default)]
pub struct SplitRegistry {
    splits: HashMap<SplitId, SplitData>,
}

impl SplitRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `id` is registered.
    #[must_use]
    pub fn contains(&self, id: SplitId) -> bool {
        self.splits.contains_key(&id)
    }

    /// Looks up a split.
    #[must_use]
    pub fn get(&self, id: SplitId) -> Option<&SplitData> {
        self.splits.get(&id)
    }

    /// Registered ids in no particular order.
    #[must_use]
    pub fn ids(&self) -> Vec<SplitId> {
        self.splits.keys().copied().collect()
    }

    /// Number of registered splits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.splits.len()
    }

    /// Returns true if no split is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.splits.is_empty()
    }

    /// Registers a split over `members`, the first of which starts focused
    /// unless `active` names another member.
    ///
    /// # Panics
    ///
    /// Panics if `id` is already registered.
    pub fn add_split(
        &mut self,
        id: SplitId,
        visual_data: SplitVisualData,
        members: Vec<TabHandle>,
        active: Option<TabHandle>,
    ) -> &SplitData {
        assert!(!self.splits.contains_key(&id), "{id} is already registered");
        let active = active
            .filter(|handle| members.contains(handle))
            .or_else(|| members.first().copied());
        tracing::debug!(split = %id, members = members.len(), "split registered");
        self.splits.entry(id).or_insert(SplitData {
            id,
            visual_data,
            members,
            active,
        })
    }

    /// Unregisters a split.
    pub fn remove_split(&mut self, id: SplitId) -> Option<SplitData> {
        let removed = self.splits.remove(&id);
        if removed.is_some() {
            tracing::debug!(split = %id, "split unregistered");
        }
        removed
    }

    /// Replaces the visual data, returning the previous value.
    ///
    /// # Errors
    ///
    /// Fails for an unknown split or an out-of-range ratio.
    pub fn set_visual_data(
        &mut self,
        id: SplitId,
        visual_data: SplitVisualData,
    ) -> TabStripResult<SplitVisualData> {
        visual_data.validate()?;
        let split = self
            .splits
            .get_mut(&id)
            .ok_or(TabStripError::SplitNotFound(id))?;
        Ok(std::mem::replace(&mut split.visual_data, visual_data))
    }

    /// Stores the current member list. Returns true if it changed.
    pub fn set_members(&mut self, id: SplitId, members: Vec<TabHandle>) -> bool {
        let Some(split) = self.splits.get_mut(&id) else {
            return false;
        };
        if split.members == members {
            return false;
        }
        if split.active.is_none_or(|active| !members.contains(&active)) {
            split.active = members.first().copied();
        }
        split.members = members;
        true
    }

    /// Focuses `handle` within `id`. Non-members are ignored.
    pub fn set_active_tab(&mut self, id: SplitId, handle: TabHandle) {
        if let Some(split) = self.splits.get_mut(&id)
            && split.members.contains(&handle)
        {
            split.active = Some(handle);
        }
    }
}
