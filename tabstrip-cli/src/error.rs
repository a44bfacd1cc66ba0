//! CLI error types and exit codes.

use tabstrip_core::ConfigError;

/// Exit codes for CLI operations
pub mod exit_codes {
    /// General error - configuration, IO, or unreadable scripts
    pub const GENERAL_ERROR: i32 = 1;
    /// A script step could not be applied to the strip
    pub const STEP_FAILURE: i32 = 2;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The script could not be read or parsed
    #[error("Script error: {0}")]
    Script(String),

    /// A step referred to something the strip does not have
    #[error("Step {step} failed: {message}")]
    Step {
        /// One-based step number
        step: usize,
        /// What went wrong
        message: String,
    },

    /// Serializing output failed
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl CliError {
    /// Returns the appropriate exit code for this error type.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: General error (configuration, script, output, IO)
    /// - 2: A script step failed
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Step { .. } => exit_codes::STEP_FAILURE,
            Self::Config(_) | Self::Script(_) | Self::Output(_) | Self::Io(_) => {
                exit_codes::GENERAL_ERROR
            }
        }
    }
}
