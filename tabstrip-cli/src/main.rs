//! `tabstrip-cli` - replays scripted tab strip commands
//!
//! Reads a JSON script of tab strip operations, applies them to a fresh
//! strip and prints every notification together with the resulting strip.
//! Also manages the settings file the strip is configured from.

mod cli;
mod commands;
mod error;
mod script;
mod transcript;
mod util;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    util::init_logging(cli.verbose, cli.quiet);

    let result = commands::dispatch(config_path, cli.quiet, cli.command);

    if let Err(e) = result {
        tracing::error!(error = %e, "Command failed");
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(e.exit_code());
    }
}
