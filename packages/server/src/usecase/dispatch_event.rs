//! UseCase: イベントのディスパッチ
//!
//! セッションが属する名前空間のハンドラにイベントを渡し、返信イベントを返します。

use std::sync::Arc;

use crate::domain::{InboundEvent, OutboundEvent, SessionId, SessionRepository};

use super::{error::DispatchError, namespace::NamespaceRegistry};

/// イベントディスパッチのユースケース
pub struct DispatchEventUseCase {
    repository: Arc<dyn SessionRepository>,
    namespaces: Arc<NamespaceRegistry>,
}

impl DispatchEventUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>, namespaces: Arc<NamespaceRegistry>) -> Self {
        Self {
            repository,
            namespaces,
        }
    }

    /// イベントをハンドラに渡す
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<OutboundEvent>)` - セッションに送り返すイベント（空の場合あり）
    /// * `Err(DispatchError)` - セッションまたはハンドラが見つからない
    pub async fn execute(
        &self,
        sid: &SessionId,
        event: InboundEvent,
    ) -> Result<Vec<OutboundEvent>, DispatchError> {
        let session = self.repository.get_session(sid).await?;
        let handler = self
            .namespaces
            .get(&session.namespace)
            .ok_or_else(|| DispatchError::UnknownNamespace(session.namespace.to_string()))?;

        tracing::debug!(
            sid = %session.id,
            namespace = %session.namespace,
            event = %event.name,
            args = event.args.len(),
            "dispatching event"
        );
        if let Some(ack_id) = event.ack_id {
            // Handlers never acknowledge
            tracing::debug!(sid = %session.id, ack_id, "acknowledgement requested but not sent");
        }

        Ok(handler.on_event(&session, &event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            EventName, Handshake, NamespacePath, RepositoryError, Session, Timestamp,
            repository::MockSessionRepository,
        },
        usecase::namespace::NamespaceRegistry,
    };
    use serde_json::json;

    fn session(namespace: &str) -> Session {
        let handshake = Handshake::new(
            NamespacePath::try_from(namespace).unwrap(),
            SessionId::new("engine".to_string()).unwrap(),
            None,
        );
        Session::new(
            SessionId::new("s1".to_string()).unwrap(),
            handshake,
            Timestamp::new(0),
        )
    }

    fn usecase_with(session: Session, registry: NamespaceRegistry) -> DispatchEventUseCase {
        let mut repository = MockSessionRepository::new();
        repository
            .expect_get_session()
            .returning(move |_| Ok(session.clone()));
        DispatchEventUseCase::new(Arc::new(repository), Arc::new(registry))
    }

    #[tokio::test]
    async fn test_dispatch_ping_on_default_namespace() {
        // テスト項目: デフォルト名前空間の ping が pong になる
        // given (前提条件):
        let usecase = usecase_with(session("/"), NamespaceRegistry::with_defaults());
        let sid = SessionId::new("s1".to_string()).unwrap();

        // when (操作):
        let replies = usecase
            .execute(&sid, InboundEvent::new(EventName::from_static("ping"), vec![]))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].name.as_str(), "pong");
    }

    #[tokio::test]
    async fn test_dispatch_routes_by_session_namespace() {
        // テスト項目: セッションの名前空間のハンドラにルーティングされる
        // given (前提条件):
        let usecase = usecase_with(session("/admin"), NamespaceRegistry::with_defaults());
        let sid = SessionId::new("s1".to_string()).unwrap();

        // when (操作):
        let mut event = InboundEvent::new(EventName::from_static("version"), vec![]);
        event.ack_id = Some(3);
        let replies = usecase.execute(&sid, event).await.unwrap();

        // then (期待する結果):
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].args, vec![json!({"version": "4.3"})]);
    }

    #[tokio::test]
    async fn test_dispatch_unknown_session_fails() {
        // テスト項目: 登録されていないセッションへのイベントはエラー
        // given (前提条件):
        let mut repository = MockSessionRepository::new();
        repository
            .expect_get_session()
            .returning(|id| Err(RepositoryError::SessionNotFound(id.as_str().to_string())));
        let usecase = DispatchEventUseCase::new(
            Arc::new(repository),
            Arc::new(NamespaceRegistry::with_defaults()),
        );
        let sid = SessionId::new("ghost".to_string()).unwrap();

        // when (操作):
        let result = usecase
            .execute(&sid, InboundEvent::new(EventName::from_static("ping"), vec![]))
            .await;

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            DispatchError::Repository(RepositoryError::SessionNotFound("ghost".to_string()))
        );
    }

    #[tokio::test]
    async fn test_dispatch_without_handler_fails() {
        // テスト項目: ハンドラが外された名前空間のセッションはエラー
        // given (前提条件):
        let usecase = usecase_with(session("/admin"), NamespaceRegistry::new());
        let sid = SessionId::new("s1".to_string()).unwrap();

        // when (操作):
        let result = usecase
            .execute(&sid, InboundEvent::new(EventName::from_static("version"), vec![]))
            .await;

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            DispatchError::UnknownNamespace("/admin".to_string())
        );
    }
}
