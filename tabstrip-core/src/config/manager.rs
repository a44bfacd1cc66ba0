//! Loading and saving settings files

use std::path::{Path, PathBuf};

use super::settings::TabStripSettings;
use crate::error::{ConfigError, ConfigResult};

/// Name of the settings file inside the config directory.
pub const SETTINGS_FILE_NAME: &str = "tabstrip.toml";

/// Reads and writes [`TabStripSettings`] under a config directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Uses the platform config directory (`~/.config/tabstrip` on Linux).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] if the platform has none.
    pub fn new() -> ConfigResult<Self> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::with_config_dir(base.join("tabstrip")))
    }

    /// Uses `config_dir` instead of the platform default.
    #[must_use]
    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// The directory settings live in.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Full path of the settings file.
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE_NAME)
    }

    /// Loads settings, returning defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed or
    /// validated.
    pub fn load_settings(&self) -> ConfigResult<TabStripSettings> {
        let path = self.settings_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(TabStripSettings::default());
        }
        Self::load_from(&path)
    }

    /// Loads settings from an explicit file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load_from(path: &Path) -> ConfigResult<TabStripSettings> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = TabStripSettings::from_toml(&text)?;
        tracing::debug!(path = %path.display(), "Settings loaded");
        Ok(settings)
    }

    /// Writes settings, creating the config directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid or cannot be written.
    pub fn save_settings(&self, settings: &TabStripSettings) -> ConfigResult<()> {
        settings.validate()?;
        std::fs::create_dir_all(&self.config_dir).map_err(|source| ConfigError::Io {
            path: self.config_dir.clone(),
            source,
        })?;
        let path = self.settings_path();
        let text = settings.to_toml()?;
        std::fs::write(&path, text).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), "Settings saved");
        Ok(())
    }
}
