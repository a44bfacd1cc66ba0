//! Tab strip behaviour settings

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::split::{DEFAULT_SPLIT_RATIO, MAX_SPLIT_RATIO, MIN_SPLIT_RATIO};

/// What happens when the last tab would close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LastTabClosePolicy {
    /// Let the strip become empty.
    #[default]
    CloseWindow,
    /// Ask the delegate for a blank tab before closing the others.
    KeepWindowOpen,
}

/// Settings that change how a [`TabStripModel`](crate::TabStripModel) behaves.
///
/// Missing keys take their default, so an empty file is valid.
///
/// # Example
///
/// ```
/// use tabstrip_core::{LastTabClosePolicy, TabStripSettings};
///
/// let settings: TabStripSettings = toml::from_str(
///     r#"
///     splits_enabled = false
///     last_tab_close = "keep_window_open"
///     "#,
/// )
/// .unwrap();
/// assert!(settings.tab_groups_enabled);
/// assert!(!settings.splits_enabled);
/// assert_eq!(settings.last_tab_close, LastTabClosePolicy::KeepWindowOpen);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabStripSettings {
    /// Whether tabs can be grouped
    pub tab_groups_enabled: bool,
    /// Whether tabs can be split
    pub splits_enabled: bool,
    /// Behaviour when the last tab closes
    pub last_tab_close: LastTabClosePolicy,
    /// Check every invariant after each mutation
    pub validate_after_mutation: bool,
    /// Prefer tabs related by opener when the active tab closes
    pub select_opener_on_close: bool,
    /// Ratio given to new splits
    pub default_split_ratio: f64,
}

impl Default for TabStripSettings {
    fn default() -> Self {
        Self {
            tab_groups_enabled: true,
            splits_enabled: true,
            last_tab_close: LastTabClosePolicy::default(),
            validate_after_mutation: cfg!(debug_assertions),
            select_opener_on_close: true,
            default_split_ratio: DEFAULT_SPLIT_RATIO,
        }
    }
}

impl TabStripSettings {
    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the split ratio lies outside
    /// `[0.0, 1.0]`.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(MIN_SPLIT_RATIO..=MAX_SPLIT_RATIO).contains(&self.default_split_ratio) {
            return Err(ConfigError::Invalid(format!(
                "default_split_ratio must be between {MIN_SPLIT_RATIO} and {MAX_SPLIT_RATIO}, got {}",
                self.default_split_ratio
            )));
        }
        Ok(())
    }

    /// Parses and validates settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_toml(text: &str) -> ConfigResult<Self> {
        let settings: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serializes the settings to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if serialization fails.
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Sets whether groups are enabled.
    #[must_use]
    pub const fn with_tab_groups(mut self, enabled: bool) -> Self {
        self.tab_groups_enabled = enabled;
        self
    }

    /// Sets whether splits are enabled.
    #[must_use]
    pub const fn with_splits(mut self, enabled: bool) -> Self {
        self.splits_enabled = enabled;
        self
    }

    /// Sets the last-tab policy.
    #[must_use]
    pub const fn with_last_tab_close(mut self, policy: LastTabClosePolicy) -> Self {
        self.last_tab_close = policy;
        self
    }

    /// Sets whether invariants are checked after each mutation.
    #[must_use]
    pub const fn with_validation(mut self, enabled: bool) -> Self {
        self.validate_after_mutation = enabled;
        self
    }

    /// Sets whether opener relationships steer selection on close.
    #[must_use]
    pub const fn with_select_opener_on_close(mut self, enabled: bool) -> Self {
        self.select_opener_on_close = enabled;
        self
    }
}
