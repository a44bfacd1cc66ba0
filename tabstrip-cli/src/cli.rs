//! CLI argument parsing types using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Replays scripted tab strip commands and prints what the strip does
#[derive(Parser)]
#[command(name = "tabstrip-cli")]
#[command(author, version, about = "Tab strip script replayer")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration directory
    #[arg(short, long, global = true, env = "TABSTRIP_CONFIG_DIR")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Replay a script against a fresh tab strip
    #[command(about = "Replay a JSON script of tab strip commands")]
    Replay {
        /// Script file, or `-` to read from stdin
        script: PathBuf,

        /// Output format for the replay transcript
        #[arg(short, long, default_value = "text", value_enum)]
        format: OutputFormat,

        /// Settings file to use instead of the one in the config directory
        #[arg(short, long)]
        settings: Option<PathBuf>,

        /// Print only the final strip
        #[arg(long)]
        summary: bool,
    },

    /// Settings file management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    #[command(about = "Generate shell completions for bash, zsh, fish, etc.")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Settings subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective settings as TOML
    Show,

    /// Print the path of the settings file
    Path,

    /// Write the default settings file
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },

    /// Check a settings file without using it
    Check {
        /// File to check (defaults to the one in the config directory)
        file: Option<PathBuf>,
    },
}

/// Output format for the replay transcript
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable strip diagram per step
    #[default]
    Text,
    /// One JSON object per step
    Json,
}
