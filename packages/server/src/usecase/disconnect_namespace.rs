//! UseCase: 名前空間からの切断処理
//!
//! セッションをリポジトリから取り除き、ハンドラの切断フックを呼びます。
//! 取り除けたセッションに対してのみフックを呼ぶため、フックは 1 セッションにつき 1 回だけ実行されます。

use std::sync::Arc;

use crate::domain::{DisconnectReason, Session, SessionId, SessionRepository};

use super::{error::DispatchError, namespace::NamespaceRegistry};

/// 名前空間切断のユースケース
pub struct DisconnectNamespaceUseCase {
    repository: Arc<dyn SessionRepository>,
    namespaces: Arc<NamespaceRegistry>,
}

impl DisconnectNamespaceUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>, namespaces: Arc<NamespaceRegistry>) -> Self {
        Self {
            repository,
            namespaces,
        }
    }

    /// 切断を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Session)` - 切断されたセッション
    /// * `Err(DispatchError)` - セッションが既に存在しない
    pub async fn execute(
        &self,
        sid: &SessionId,
        reason: DisconnectReason,
    ) -> Result<Session, DispatchError> {
        let session = self.repository.remove_session(sid).await?;

        match self.namespaces.get(&session.namespace) {
            Some(handler) => handler.on_disconnect(&session, reason),
            None => tracing::warn!(
                sid = %session.id,
                namespace = %session.namespace,
                "no handler to notify of disconnect"
            ),
        }

        Ok(session)
    }
}
