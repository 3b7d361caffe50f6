//! CLI error types.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use eventdesk_core::TracingError;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that stop the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error on the terminal streams.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tracing could not be set up.
    #[error(transparent)]
    Tracing(#[from] TracingError),

    /// The local clock is outside the supported calendar.
    #[error("today's date {0} is outside the supported range")]
    UnsupportedToday(NaiveDate),
}
