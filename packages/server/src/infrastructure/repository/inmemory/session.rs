//! InMemory Session Repository 実装
//!
//! ドメイン層が定義する SessionRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{NamespacePath, RepositoryError, Session, SessionId, SessionRepository};

/// インメモリ Session Repository 実装
///
/// 接続中のセッションをセッション ID をキーとして保持します。
#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<Mutex<HashMap<SessionId, Session>>>,
}

impl InMemorySessionRepository {
    /// 新しい InMemorySessionRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn add_session(&self, session: Session) -> Result<(), RepositoryError> {
        let mut sessions = self.sessions.lock().await;
        if sessions.contains_key(&session.id) {
            return Err(RepositoryError::DuplicateSession(
                session.id.as_str().to_string(),
            ));
        }
        sessions.insert(session.id.clone(), session);
        Ok(())
    }

    async fn remove_session(&self, id: &SessionId) -> Result<Session, RepositoryError> {
        let mut sessions = self.sessions.lock().await;
        sessions
            .remove(id)
            .ok_or_else(|| RepositoryError::SessionNotFound(id.as_str().to_string()))
    }

    async fn get_session(&self, id: &SessionId) -> Result<Session, RepositoryError> {
        let sessions = self.sessions.lock().await;
        sessions
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::SessionNotFound(id.as_str().to_string()))
    }

    async fn list_sessions(&self, namespace: &NamespacePath) -> Vec<Session> {
        let sessions = self.sessions.lock().await;
        let mut joined: Vec<Session> = sessions
            .values()
            .filter(|session| &session.namespace == namespace)
            .cloned()
            .collect();
        joined.sort_by(|a, b| {
            a.connected_at
                .cmp(&b.connected_at)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        joined
    }

    async fn count_sessions(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
