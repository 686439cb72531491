//! Error types shared by the collaborators and methods.

use thiserror::Error;

/// Misuse of the random source. Always a programming error in the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RandomError {
    /// A range or count violated the operation's preconditions.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Failure reported by a key-value storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The backing store could not be read or written.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The backing store refused the write because it is full.
    #[error("storage quota exceeded while writing {key}")]
    QuotaExceeded {
        /// The key that could not be written.
        key: String,
    },
}

/// A method's `run` failed before it could hand over its completion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MethodError {
    /// The random source rejected an argument.
    #[error(transparent)]
    Random(#[from] RandomError),

    /// The method state did not have the shape the method expects.
    #[error("malformed method state: {0}")]
    MalformedState(String),
}
