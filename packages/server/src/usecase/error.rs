//! UseCase layer error definitions.

use thiserror::Error;

use crate::domain::{GateRejection, RepositoryError, ValueObjectError};

/// Errors raised while joining a namespace
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// No handler is mounted on the requested namespace
    #[error("Invalid namespace")]
    InvalidNamespace(String),

    /// The connection gate refused the client
    #[error("{0}")]
    Rejected(GateRejection),

    #[error("Failed to allocate session id: {0}")]
    SessionId(ValueObjectError),

    #[error("Failed to register session: {0}")]
    Repository(RepositoryError),
}

/// Errors raised while routing an event or a disconnect to a session
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("No handler mounted on namespace {0}")]
    UnknownNamespace(String),
}
