//! Dicedr CLI: host error types.

use dicedr_engine::error::{RegistryError, RunError};
use thiserror::Error;

/// Startup and command errors for the CLI host.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable holds an unsupported value.
    #[error("configuration error: {0}")]
    Config(String),

    /// The method catalog could not be built.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// A controller operation was rejected.
    #[error(transparent)]
    Run(#[from] RunError),

    /// Terminal or file I/O failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON argument could not be parsed.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
