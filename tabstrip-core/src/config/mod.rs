//! Configuration management
//!
//! This module provides [`TabStripSettings`] and the [`ConfigManager`] that
//! loads and saves them as TOML.

mod manager;
pub mod settings;

pub use manager::{ConfigManager, SETTINGS_FILE_NAME};
pub use settings::{LastTabClosePolicy, TabStripSettings};
