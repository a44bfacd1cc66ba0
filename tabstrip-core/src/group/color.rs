//! Group colour palette and allocation
//!
//! New groups draw their colour from a [`ColorPool`], which hands out the
//! least-used palette entry so neighbouring groups stay visually distinct.
//! When every colour is in use the pool keeps going, reusing the colour with
//! the fewest groups.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Palette entry for a tab group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabGroupColorId {
    /// Grey
    #[default]
    Grey,
    /// Blue
    Blue,
    /// Red
    Red,
    /// Yellow
    Yellow,
    /// Green
    Green,
    /// Pink
    Pink,
    /// Purple
    Purple,
    /// Cyan
    Cyan,
    /// Orange
    Orange,
}

/// Allocation order of the palette.
pub const GROUP_COLORS: &[TabGroupColorId] = &[
    TabGroupColorId::Grey,
    TabGroupColorId::Blue,
    TabGroupColorId::Red,
    TabGroupColorId::Yellow,
    TabGroupColorId::Green,
    TabGroupColorId::Pink,
    TabGroupColorId::Purple,
    TabGroupColorId::Cyan,
    TabGroupColorId::Orange,
];

impl TabGroupColorId {
    /// RGB value used when rendering the colour.
    #[must_use]
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Grey => (0x5f, 0x63, 0x68),
            Self::Blue => (0x1a, 0x73, 0xe8),
            Self::Red => (0xd9, 0x30, 0x25),
            Self::Yellow => (0xf9, 0xab, 0x00),
            Self::Green => (0x18, 0x80, 0x38),
            Self::Pink => (0xd0, 0x18, 0x84),
            Self::Purple => (0xa1, 0x42, 0xf4),
            Self::Cyan => (0x00, 0x7b, 0x83),
            Self::Orange => (0xfa, 0x90, 0x3e),
        }
    }
}

impl fmt::Display for TabGroupColorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Grey => "grey",
            Self::Blue => "blue",
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Pink => "pink",
            Self::Purple => "purple",
            Self::Cyan => "cyan",
            Self::Orange => "orange",
        };
        write!(f, "{name}")
    }
}

/// Tracks how many groups use each palette colour.
///
/// # Example
///
/// ```
/// use tabstrip_core::{ColorPool, TabGroupColorId};
///
/// let mut pool = ColorPool::new();
/// assert_eq!(pool.allocate(), TabGroupColorId::Grey);
/// assert_eq!(pool.allocate(), TabGroupColorId::Blue);
///
/// pool.release(TabGroupColorId::Grey);
/// assert_eq!(pool.allocate(), TabGroupColorId::Grey);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ColorPool {
    usage: HashMap<TabGroupColorId, usize>,
}

impl ColorPool {
    /// Creates a pool with no colours in use.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The colour a new group should get, without claiming it.
    #[must_use]
    pub fn peek(&self) -> TabGroupColorId {
        GROUP_COLORS
            .iter()
            .copied()
            .min_by_key(|color| self.usage_of(*color))
            .unwrap_or_default()
    }

    /// Claims the least-used colour, earliest in palette order on ties.
    pub fn allocate(&mut self) -> TabGroupColorId {
        let color = self.peek();
        self.retain(color);
        color
    }

    /// Records one more group using `color`.
    pub fn retain(&mut self, color: TabGroupColorId) {
        *self.usage.entry(color).or_insert(0) += 1;
    }

    /// Returns one use of `color` to the pool. Unknown colours are ignored.
    pub fn release(&mut self, color: TabGroupColorId) {
        if let Some(count) = self.usage.get_mut(&color) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.usage.remove(&color);
            }
        }
    }

    /// Number of groups currently using `color`.
    #[must_use]
    pub fn usage_of(&self, color: TabGroupColorId) -> usize {
        self.usage.get(&color).copied().unwrap_or(0)
    }
}
