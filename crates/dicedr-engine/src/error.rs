//! Engine error types.

use dicedr_core::completion::Abandoned;
use dicedr_core::error::MethodError;
use thiserror::Error;

/// Rejected method registration. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Another method already uses this id.
    #[error("method with id \"{0}\" is already registered")]
    DuplicateMethod(String),

    /// The method does not satisfy the contract.
    #[error("invalid method: {0}")]
    InvalidMethod(String),

    /// A controller needs at least one method to fall back to.
    #[error("no methods registered")]
    Empty,
}

/// Why `execute` (or another controller operation) did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    /// No method is registered under this id.
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// The method's validation rejected its current state.
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    /// A previous run of the same method has not settled yet.
    #[error("method {0} is already running")]
    AlreadyRunning(String),

    /// The method dropped its completion without reporting an outcome.
    #[error(transparent)]
    Abandoned(#[from] Abandoned),

    /// The method could not start its run.
    #[error("method failed to start: {0}")]
    Method(#[from] MethodError),
}
