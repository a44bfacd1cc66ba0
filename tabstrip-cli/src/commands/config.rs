//! Settings file commands.

use std::path::Path;

use tabstrip_core::{ConfigManager, TabStripSettings};

use crate::cli::ConfigCommands;
use crate::error::CliError;
use crate::util::{create_config_manager, load_settings};

/// Dispatch a settings subcommand
pub fn cmd_config(config_path: Option<&Path>, command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show => cmd_show(config_path),
        ConfigCommands::Path => {
            let manager = create_config_manager(config_path)?;
            println!("{}", manager.settings_path().display());
            Ok(())
        }
        ConfigCommands::Init { force } => cmd_init(config_path, force),
        ConfigCommands::Check { file } => cmd_check(config_path, file.as_deref()),
    }
}

fn cmd_show(config_path: Option<&Path>) -> Result<(), CliError> {
    let settings = load_settings(config_path, None)?;
    print!("{}", settings.to_toml()?);
    Ok(())
}

fn cmd_init(config_path: Option<&Path>, force: bool) -> Result<(), CliError> {
    let manager = create_config_manager(config_path)?;
    let path = manager.settings_path();
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    manager.save_settings(&TabStripSettings::default())?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn cmd_check(config_path: Option<&Path>, file: Option<&Path>) -> Result<(), CliError> {
    let path = match file {
        Some(file) => file.to_path_buf(),
        None => create_config_manager(config_path)?.settings_path(),
    };
    ConfigManager::load_from(&path)?;
    println!("{}: OK", path.display());
    Ok(())
}
