//! Split layout types
//!
//! A split shows two or more tabs side by side. Its visual data is the
//! orientation plus the share of space given to the first member.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{TabStripError, TabStripResult};

/// Default share of the first member.
pub const DEFAULT_SPLIT_RATIO: f64 = 0.5;

/// Minimum allowed ratio.
pub const MIN_SPLIT_RATIO: f64 = 0.0;

/// Maximum allowed ratio.
pub const MAX_SPLIT_RATIO: f64 = 1.0;

/// Orientation of a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitLayout {
    /// Members side by side, left to right.
    #[default]
    Vertical,
    /// Members stacked, top to bottom.
    Horizontal,
}

impl fmt::Display for SplitLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertical => write!(f, "Vertical"),
            Self::Horizontal => write!(f, "Horizontal"),
        }
    }
}

/// Layout data of a split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitVisualData {
    /// Orientation
    pub layout: SplitLayout,
    /// Share of the first member, in `[0.0, 1.0]`
    pub ratio: f64,
}

impl SplitVisualData {
    /// Creates visual data after checking the ratio.
    ///
    /// # Errors
    ///
    /// Returns [`TabStripError::InvalidSplitRatio`] if `ratio` lies outside
    /// `[0.0, 1.0]` or is not a number.
    pub fn new(layout: SplitLayout, ratio: f64) -> TabStripResult<Self> {
        let visual = Self { layout, ratio };
        visual.validate()?;
        Ok(visual)
    }

    /// Checks the ratio.
    ///
    /// # Errors
    ///
    /// Returns [`TabStripError::InvalidSplitRatio`] for an out-of-range ratio.
    pub fn validate(&self) -> TabStripResult<()> {
        if (MIN_SPLIT_RATIO..=MAX_SPLIT_RATIO).contains(&self.ratio) {
            Ok(())
        } else {
            Err(TabStripError::InvalidSplitRatio(self.ratio))
        }
    }
}

impl Default for SplitVisualData {
    fn default() -> Self {
        Self {
            layout: SplitLayout::default(),
            ratio: DEFAULT_SPLIT_RATIO,
        }
    }
}
