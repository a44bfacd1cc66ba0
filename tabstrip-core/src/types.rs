//! Core identifier types for the tab strip
//!
//! Every entity the model tracks is addressed by an opaque, copyable handle.
//! Indices are derived positions and change with every structural mutation;
//! handles stay stable for as long as the entity exists.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable handle for a tab.
///
/// A handle survives moves, pinning and grouping. Once the tab is deleted
/// or detached, lookups by handle simply return `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TabHandle(pub Uuid);

impl TabHandle {
    /// Creates a new random tab handle.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TabHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TabHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tab({})", self.0)
    }
}

/// Identifier of the content hosted inside a tab.
///
/// Content can be swapped out under a tab (see
/// [`TabStripModel::replace_contents_at`](crate::TabStripModel::replace_contents_at)),
/// so content and tab identities are tracked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentsId(pub Uuid);

impl ContentsId {
    /// Creates a new random contents ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContentsId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContentsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Contents({})", self.0)
    }
}

/// Unique identifier for a tab group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub Uuid);

impl GroupId {
    /// Creates a new random group ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a group ID from an existing UUID.
    ///
    /// Used when restoring groups whose identity was persisted elsewhere.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for GroupId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Group({})", self.0)
    }
}

/// Unique identifier for a split (tabs shown side by side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SplitId(pub Uuid);

impl SplitId {
    /// Creates a new random split ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SplitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SplitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Split({})", self.0)
    }
}
