//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// NamespacePath validation error
    #[error("NamespacePath cannot be empty")]
    NamespaceEmpty,

    /// NamespacePath must be absolute
    #[error("NamespacePath must start with '/' (got: {0})")]
    NamespaceNotAbsolute(String),

    /// NamespacePath contains the packet field separator
    #[error("NamespacePath cannot contain ',' (got: {0})")]
    NamespaceInvalidChar(String),

    /// EventName validation error
    #[error("EventName cannot be empty")]
    EventNameEmpty,

    /// SessionId validation error
    #[error("SessionId cannot be empty")]
    SessionIdEmpty,
}

/// Errors raised by session storage
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Session already registered: {0}")]
    DuplicateSession(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),
}
