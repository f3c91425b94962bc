//! Semantic error types for the engine-info crate.
//!
//! Conditions a caller might inspect or branch on are modelled as `thiserror`
//! enums. Opaque reporting (`eyre::Report`) is reserved for the binary
//! boundary.

use std::num::ParseIntError;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found at the expected path.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// The path where the configuration file was expected.
        path: PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("failed to parse configuration file: {message}")]
    ParseError {
        /// A description of the parse error.
        message: String,
    },

    /// A required configuration value is missing.
    #[error("missing required configuration: {field}")]
    MissingRequired {
        /// The name of the missing field.
        field: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The `OrthoConfig` library returned an error while merging layers.
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

/// Raw failures reported by the process execution capability.
///
/// These are surfaced verbatim by the engine queries unless they are
/// reclassified as a probe timeout.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The process could not be spawned or awaited.
    #[error("failed to execute `{command}`: {message}")]
    SpawnFailed {
        /// The rendered command line.
        command: String,
        /// A description of the I/O failure.
        message: String,
    },

    /// The process ran but exited unsuccessfully.
    #[error("`{command}` failed with {status}: {}", .output.trim())]
    Failed {
        /// The rendered command line.
        command: String,
        /// The exit status as reported by the platform.
        status: String,
        /// Captured combined output, empty when output was discarded.
        output: String,
    },

    /// The context deadline elapsed before the process finished.
    #[error("`{command}` was stopped: context deadline exceeded")]
    DeadlineExceeded {
        /// The rendered command line.
        command: String,
    },

    /// The context was cancelled before the process finished.
    #[error("`{command}` was stopped: context cancelled")]
    Cancelled {
        /// The rendered command line.
        command: String,
    },
}

impl CommandError {
    /// Returns whether this failure was caused by deadline expiry.
    #[must_use]
    pub const fn is_deadline_exceeded(&self) -> bool {
        matches!(self, Self::DeadlineExceeded { .. })
    }
}

/// Errors produced by the engine queries.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The bounded command context could not be derived.
    #[error("failed to prepare command context: {message}")]
    ContextSetup {
        /// A description of the setup failure.
        message: String,
    },

    /// An engine command did not finish within the probe deadline.
    #[error(
        "`{program} {}` failed to respond within {}s",
        .args.join(" "),
        .timeout.as_secs_f64()
    )]
    ProbeTimeout {
        /// The engine program that was invoked.
        program: String,
        /// The exact argument list that was attempted.
        args: Vec<String>,
        /// The time the command was granted: the probe timeout, or the
        /// shorter remainder of the caller's deadline.
        timeout: std::time::Duration,
    },

    /// The engine command failed for a reason other than the deadline.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// The context-name command succeeded without printing a name.
    #[error("no context returned from Docker")]
    NoContextName,

    /// The CPU-count output was not a base-10 integer.
    #[error("parsing docker cpu count: {source}")]
    CpuCountParse {
        /// The trimmed output that failed to parse.
        output: String,
        /// The underlying conversion error.
        source: ParseIntError,
    },

    /// Failed to create the tokio runtime used for blocking calls.
    #[error("failed to create async runtime: {message}")]
    RuntimeCreationFailed {
        /// A description of the runtime creation failure.
        message: String,
    },
}

/// Top-level error type for the engine-info crate.
///
/// At the binary boundary these errors are converted to `eyre::Report` for
/// human-readable reporting.
#[derive(Debug, Error)]
pub enum EngineInfoError {
    /// An error occurred during configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred while querying the engine.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl From<CommandError> for EngineInfoError {
    fn from(error: CommandError) -> Self {
        Self::Engine(EngineError::Command(error))
    }
}

/// A specialised `Result` type for engine-info operations.
pub type Result<T> = std::result::Result<T, EngineInfoError>;
