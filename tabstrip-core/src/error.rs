//! Error types for tab strip operations
//!
//! Only recoverable, caller-facing failures are modelled here. Contract
//! violations (bad indices passed to mutations, re-entrant mutation,
//! registering a group twice) panic instead.

use std::path::PathBuf;

use crate::types::{GroupId, SplitId, TabHandle};

/// Errors returned by fallible tab strip queries and commands.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TabStripError {
    /// The index does not address a tab.
    #[error("index {index} out of range (count {count})")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of tabs at the time of the request
        count: usize,
    },

    /// The group is not known to the registry.
    #[error("group not found: {0}")]
    GroupNotFound(GroupId),

    /// The split is not known to the registry.
    #[error("split not found: {0}")]
    SplitNotFound(SplitId),

    /// No tab with this handle is attached.
    #[error("tab not found: {0}")]
    TabNotFound(TabHandle),

    /// Tab groups are disabled for this strip.
    #[error("tab groups are not supported by this tab strip")]
    GroupsUnsupported,

    /// Splits are disabled for this strip.
    #[error("splits are not supported by this tab strip")]
    SplitsUnsupported,

    /// Split ratio outside `[0.0, 1.0]`.
    #[error("invalid split ratio: {0} (must be between 0.0 and 1.0)")]
    InvalidSplitRatio(f64),

    /// A split needs at least two tabs.
    #[error("a split needs at least 2 tabs, got {count}")]
    SplitTooSmall {
        /// Number of tabs that would form the split
        count: usize,
    },

    /// Pinned tabs cannot take part in a split.
    #[error("pinned tabs cannot be split")]
    PinnedTabInSplit,

    /// Split members must be adjacent and share a parent.
    #[error("split members are not contiguous")]
    SplitNotContiguous,

    /// A structural invariant does not hold.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

/// Result type for tab strip operations
pub type TabStripResult<T> = Result<T, TabStripError>;

/// Errors raised while loading or saving settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading or writing the settings file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File that was being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for the settings schema.
    #[error("Failed to parse settings: {0}")]
    Parse(String),

    /// Settings could not be serialized.
    #[error("Failed to serialize settings: {0}")]
    Serialize(String),

    /// A value is syntactically valid but out of range.
    #[error("Invalid setting: {0}")]
    Invalid(String),

    /// No configuration directory is available on this platform.
    #[error("Could not determine the configuration directory")]
    NoConfigDir,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
