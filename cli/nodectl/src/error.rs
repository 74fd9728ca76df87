//! Error type for nodectl.

use thiserror::Error;

/// Everything a command can fail with. Printed to stderr by `main`.
#[derive(Debug, Error)]
pub enum CliError {
    /// The node call failed.
    #[error(transparent)]
    Client(#[from] client::Error),

    /// Reading or writing contexts failed.
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    /// Output could not be rendered.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Terminal I/O failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A lookup came back empty.
    #[error("{0}")]
    NotFound(String),

    /// The user declined a confirmation, or none could be asked for.
    #[error("{0}")]
    Aborted(String),
}

/// Result alias used by every command.
pub type CliResult<T> = Result<T, CliError>;
