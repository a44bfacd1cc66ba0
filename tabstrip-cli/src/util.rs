//! Shared utility functions used across command modules.

use std::io::Read;
use std::path::Path;

use tabstrip_core::tracing::{TracingConfig, init_tracing, span_names};
use tabstrip_core::{ConfigManager, TabStripSettings, trace_operation};

use crate::error::CliError;

/// Creates a `ConfigManager` using the optional custom config directory
/// from CLI args.
pub fn create_config_manager(config_path: Option<&Path>) -> Result<ConfigManager, CliError> {
    match config_path {
        Some(path) => Ok(ConfigManager::with_config_dir(path)),
        None => ConfigManager::new()
            .map_err(|e| CliError::Config(format!("Failed to initialize config: {e}"))),
    }
}

/// Loads the settings to run with: an explicit file wins over the config
/// directory.
pub fn load_settings(
    config_path: Option<&Path>,
    settings_file: Option<&Path>,
) -> Result<TabStripSettings, CliError> {
    let _span = trace_operation!(span_names::CONFIG_LOAD).entered();
    let settings = match settings_file {
        Some(file) => ConfigManager::load_from(file)?,
        None => create_config_manager(config_path)?.load_settings()?,
    };
    Ok(settings)
}

/// Reads a text file, or stdin when `path` is `-`.
pub fn read_input(path: &Path) -> Result<String, CliError> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    std::fs::read_to_string(path)
        .map_err(|e| CliError::Script(format!("Failed to read {}: {e}", path.display())))
}

/// Sends logs to stderr so stdout carries only command output.
pub fn init_logging(verbose: u8, quiet: bool) {
    let config = TracingConfig::for_cli(verbose, quiet);
    if let Err(e) = init_tracing(&config) {
        eprintln!("Warning: {e}");
    }
}
