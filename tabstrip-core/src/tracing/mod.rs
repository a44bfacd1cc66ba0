//! Tracing integration for structured logging
//!
//! The model logs its non-obvious decisions (vetoed closes, group and split
//! lifecycle, replacement selection) through `tracing` and wraps every public
//! mutation in a debug span named from [`span_names`]. The library never
//! installs a subscriber; binaries call [`init_tracing`] once at startup.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding a filter that overrides the configured level.
pub const LOG_ENV_VAR: &str = "TABSTRIP_LOG";

/// Crates whose events pass the level filter.
const TARGETS: &[&str] = &["tabstrip_core", "tabstrip_cli"];

static TRACING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Errors that can occur during tracing initialization
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TracingError {
    /// The filter could not be parsed or the subscriber not installed
    #[error("Failed to initialize tracing: {0}")]
    InitializationFailed(String),

    /// Not one of `error`, `warn`, `info`, `debug`, `trace`
    #[error("Unknown log level: {0}")]
    UnknownLevel(String),

    /// Tracing already initialized
    #[error("Tracing has already been initialized")]
    AlreadyInitialized,

    /// Failed to create log file
    #[error("Failed to create log file: {0}")]
    FileCreationFailed(String),
}

/// Result type for tracing operations
pub type TracingResult<T> = Result<T, TracingError>;

/// Tracing log level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum TracingLevel {
    /// Only errors
    Error,
    /// Errors and warnings
    Warn,
    /// Model decisions such as vetoed closes and dissolved groups
    #[default]
    Info,
    /// Every mutation span and replacement choice
    Debug,
    /// Everything
    Trace,
}

impl TracingLevel {
    /// Lower-case name, as accepted by `EnvFilter`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    /// Maps a `-v` count to a level: none gives warnings, each `-v` one
    /// step more. Quiet mode keeps errors only.
    #[must_use]
    pub const fn from_verbosity(verbose: u8, quiet: bool) -> Self {
        if quiet {
            return Self::Error;
        }
        match verbose {
            0 => Self::Warn,
            1 => Self::Info,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }
}

impl std::str::FromStr for TracingLevel {
    type Err = TracingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(TracingError::UnknownLevel(s.to_string())),
        }
    }
}

impl std::fmt::Display for TracingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output destination for tracing logs
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TracingOutput {
    /// Output to stdout
    Stdout,
    /// Output to stderr, leaving stdout to command output
    #[default]
    Stderr,
    /// Output to a file, truncated on start
    File {
        /// Path to the log file
        path: PathBuf,
    },
}

/// Configuration for tracing initialization
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TracingConfig {
    /// Level applied to the tab strip crates
    pub level: TracingLevel,
    /// Output destination
    pub output: TracingOutput,
    /// Whether to log span close events with their busy time
    pub include_timing: bool,
    /// Custom filter directives (override level and [`LOG_ENV_VAR`])
    pub filter: Option<String>,
}

impl TracingConfig {
    /// Creates a new tracing configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for a command-line run with `verbose` `-v` flags.
    #[must_use]
    pub fn for_cli(verbose: u8, quiet: bool) -> Self {
        Self::new().with_level(TracingLevel::from_verbosity(verbose, quiet))
    }

    /// Everything the model does, with how long each mutation took.
    #[must_use]
    pub fn diagnostics() -> Self {
        Self::new().with_level(TracingLevel::Trace).with_timing(true)
    }

    /// Sets the log level
    #[must_use]
    pub const fn with_level(mut self, level: TracingLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the output destination
    #[must_use]
    pub fn with_output(mut self, output: TracingOutput) -> Self {
        self.output = output;
        self
    }

    /// Sets whether to include timing information
    #[must_use]
    pub const fn with_timing(mut self, include: bool) -> Self {
        self.include_timing = include;
        self
    }

    /// Sets a custom filter string
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Filter directives for `level`, one per tab strip crate.
    #[must_use]
    pub fn level_directives(&self) -> String {
        TARGETS
            .iter()
            .map(|target| format!("{target}={}", self.level))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// The directives [`init_tracing`] installs: the explicit filter, else
    /// `env_filter` (the value of [`LOG_ENV_VAR`]), else the level.
    #[must_use]
    pub fn effective_directives(&self, env_filter: Option<String>) -> String {
        self.filter
            .clone()
            .or(env_filter.filter(|f| !f.trim().is_empty()))
            .unwrap_or_else(|| self.level_directives())
    }
}

/// Installs the global subscriber described by `config`.
///
/// # Errors
///
/// Returns an error if tracing was already initialized, the filter does not
/// parse, the log file cannot be created or another global subscriber is
/// installed.
pub fn init_tracing(config: &TracingConfig) -> TracingResult<()> {
    if TRACING_INITIALIZED.swap(true, Ordering::SeqCst) {
        return Err(TracingError::AlreadyInitialized);
    }

    let directives = config.effective_directives(std::env::var(LOG_ENV_VAR).ok());
    let filter = EnvFilter::try_new(&directives)
        .map_err(|e| TracingError::InitializationFailed(format!("{directives}: {e}")))?;

    let (writer, ansi) = match &config.output {
        TracingOutput::Stdout => (BoxMakeWriter::new(std::io::stdout), true),
        TracingOutput::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
        TracingOutput::File { path } => {
            let file = std::fs::File::create(path)
                .map_err(|e| TracingError::FileCreationFailed(format!("{}: {e}", path.display())))?;
            (BoxMakeWriter::new(file), false)
        }
    };
    let span_events = if config.include_timing {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_span_events(span_events)
                .with_ansi(ansi)
                .with_writer(writer),
        )
        .try_init()
        .map_err(|e| TracingError::InitializationFailed(e.to_string()))?;

    tracing::debug!(%directives, "Tracing initialized");
    Ok(())
}

/// Creates an info-level span for a named operation
///
/// # Examples
///
/// ```
/// use tabstrip_core::trace_operation;
/// use tabstrip_core::tracing::span_names;
///
/// let _span = trace_operation!(span_names::REPLAY, steps = 3).entered();
/// ```
#[macro_export]
macro_rules! trace_operation {
    ($name:expr) => {
        ::tracing::info_span!($name)
    };
    ($name:expr, $($field:tt)*) => {
        ::tracing::info_span!($name, $($field)*)
    };
}

/// Debug-level variant of [`trace_operation!`], opened around every public
/// mutation of the model.
#[macro_export]
macro_rules! trace_operation_debug {
    ($name:expr) => {
        ::tracing::debug_span!($name)
    };
    ($name:expr, $($field:tt)*) => {
        ::tracing::debug_span!($name, $($field)*)
    };
}

/// Span names used by the model and the CLI
pub mod span_names {
    /// Tab insertion
    pub const INSERT: &str = "tabstrip.insert";
    /// Tab close or detach
    pub const CLOSE: &str = "tabstrip.close";
    /// Tab or group move
    pub const MOVE: &str = "tabstrip.move";
    /// Group membership or visuals
    pub const GROUP: &str = "tabstrip.group";
    /// Split creation, removal or visuals
    pub const SPLIT: &str = "tabstrip.split";
    /// Selection change
    pub const SELECT: &str = "tabstrip.select";
    /// Pin or unpin
    pub const PIN: &str = "tabstrip.pin";
    /// Per-tab state update (blocked, replaced content, openers)
    pub const UPDATE: &str = "tabstrip.update";
    /// Settings load
    pub const CONFIG_LOAD: &str = "config.load";
    /// Script replay
    pub const REPLAY: &str = "replay.execute";
}
