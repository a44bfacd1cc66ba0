//! Command handler modules for the CLI.

mod completions;
mod config;
mod replay;

use std::path::Path;

use crate::cli::Commands;
use crate::error::CliError;

/// Dispatch a CLI command to the appropriate handler.
pub fn dispatch(config_path: Option<&Path>, quiet: bool, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Replay {
            script,
            format,
            settings,
            summary,
        } => replay::cmd_replay(
            config_path,
            &replay::ReplayOptions {
                script: &script,
                format,
                settings: settings.as_deref(),
                summary,
                quiet,
            },
        ),
        Commands::Config(command) => config::cmd_config(config_path, command),
        Commands::Completions { shell } => completions::cmd_completions(shell),
    }
}
