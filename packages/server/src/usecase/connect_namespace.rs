//! UseCase: 名前空間への接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectNamespaceUseCase::execute() メソッド
//! - 名前空間の解決、接続ゲート、セッション登録、接続時イベントの生成
//!
//! ### どのような状況を想定しているか
//! - 正常系：登録済み名前空間への接続
//! - 異常系：未登録の名前空間、ゲートによる拒否、セッション登録失敗

use std::sync::Arc;

use kodama_shared::time::get_jst_timestamp;

use crate::domain::{
    Handshake, OutboundEvent, Session, SessionIdFactory, SessionRepository, Timestamp,
};

use super::{error::ConnectError, namespace::NamespaceRegistry};

/// An admitted session and the events its namespace emits on connect
#[derive(Debug)]
pub struct Admitted {
    pub session: Session,
    pub events: Vec<OutboundEvent>,
}

/// 名前空間接続のユースケース
pub struct ConnectNamespaceUseCase {
    repository: Arc<dyn SessionRepository>,
    namespaces: Arc<NamespaceRegistry>,
}

impl ConnectNamespaceUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>, namespaces: Arc<NamespaceRegistry>) -> Self {
        Self {
            repository,
            namespaces,
        }
    }

    /// 名前空間への接続を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Admitted)` - 接続成功（セッションと接続時に送るイベント）
    /// * `Err(ConnectError)` - 接続失敗
    pub async fn execute(&self, handshake: Handshake) -> Result<Admitted, ConnectError> {
        // 1. 名前空間の解決
        let handler = self
            .namespaces
            .get(&handshake.namespace)
            .ok_or_else(|| ConnectError::InvalidNamespace(handshake.namespace.to_string()))?;

        // 2. 接続ゲート
        handler
            .authorize(&handshake)
            .map_err(ConnectError::Rejected)?;

        // 3. セッション登録
        let sid = SessionIdFactory::generate().map_err(ConnectError::SessionId)?;
        let session = Session::new(sid, handshake, Timestamp::new(get_jst_timestamp()));
        self.repository
            .add_session(session.clone())
            .await
            .map_err(ConnectError::Repository)?;

        // 4. 接続時イベント
        let events = handler.on_connect(&session);
        Ok(Admitted { session, events })
    }
}
