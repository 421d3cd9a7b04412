//! Repository trait for session storage.
//!
//! The usecase layer depends on this trait; the concrete storage lives in
//! the infrastructure layer.

use async_trait::async_trait;

use super::{
    entity::Session,
    error::RepositoryError,
    value_object::{NamespacePath, SessionId},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Register an admitted session.
    async fn add_session(&self, session: Session) -> Result<(), RepositoryError>;

    /// Remove a session and return it.
    async fn remove_session(&self, id: &SessionId) -> Result<Session, RepositoryError>;

    /// Look up a session by id.
    async fn get_session(&self, id: &SessionId) -> Result<Session, RepositoryError>;

    /// Sessions currently joined to a namespace, oldest first.
    async fn list_sessions(&self, namespace: &NamespacePath) -> Vec<Session>;

    /// Total number of sessions across all namespaces.
    async fn count_sessions(&self) -> usize;
}
