//! Splits: tabs shown side by side
//!
//! Split membership lives in the collection tree. This module holds the
//! layout data and the registry that tracks live splits, their last known
//! members and the member focused within each split.

mod registry;
mod types;

pub use registry::{SplitData, SplitRegistry};
pub use types::{
    DEFAULT_SPLIT_RATIO, MAX_SPLIT_RATIO, MIN_SPLIT_RATIO, SplitLayout, SplitVisualData,
};
