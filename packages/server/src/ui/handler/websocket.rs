//! Engine.IO WebSocket endpoint.
//!
//! One task per connection reads frames, answers heartbeats and routes
//! Socket.IO packets to namespace sessions. A second task drains the
//! outbound queue into the socket.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    Json,
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade, rejection::WebSocketUpgradeRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitStream, StreamExt},
};
use serde_json::Value;
use tokio::{
    sync::mpsc,
    time::{Instant, interval_at, sleep, sleep_until, timeout},
};

use crate::{
    domain::{DisconnectReason, Handshake, InboundEvent, NamespacePath, SessionId, SessionIdFactory},
    infrastructure::{
        dto::{
            http::EngineErrorDto,
            websocket::{EngineQuery, OpenPayload},
        },
        protocol::{ENGINE_PROTOCOL_VERSION, EngineErrorCode, EnginePacket, SocketPacket},
    },
    ui::state::AppState,
    usecase::{
        ConnectError, ConnectNamespaceUseCase, DisconnectNamespaceUseCase, DispatchEventUseCase,
    },
};

const WEBSOCKET_TRANSPORT: &str = "websocket";

pub async fn engine_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EngineQuery>,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    if query.transport.as_deref() != Some(WEBSOCKET_TRANSPORT) {
        tracing::warn!("Unsupported transport: {:?}", query.transport);
        return engine_error(EngineErrorCode::TransportUnknown);
    }
    if let Some(sid) = &query.sid {
        // Sessions are never handed out over polling, so there is nothing to upgrade
        tracing::warn!("Unknown engine sid in handshake: '{}'", sid);
        return engine_error(EngineErrorCode::UnknownSid);
    }
    if query.eio.as_deref() != Some(ENGINE_PROTOCOL_VERSION) {
        tracing::warn!("Unsupported protocol version: {:?}", query.eio);
        return engine_error(EngineErrorCode::UnsupportedProtocolVersion);
    }

    let ws = match upgrade {
        Ok(ws) => ws,
        Err(rejection) => {
            tracing::warn!("WebSocket upgrade rejected: {}", rejection);
            return engine_error(EngineErrorCode::BadRequest);
        }
    };

    let engine_id = match SessionIdFactory::generate() {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Failed to allocate engine id: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    ws.max_message_size(state.engine.max_payload)
        .on_upgrade(move |socket| handle_socket(socket, state, engine_id))
}

fn engine_error(code: EngineErrorCode) -> Response {
    let body = EngineErrorDto {
        code: code.code(),
        message: code.message().to_string(),
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, engine_id: SessionId) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<EnginePacket>();

    let open = OpenPayload {
        sid: engine_id.as_str().to_string(),
        upgrades: Vec::new(),
        ping_interval: duration_ms(state.engine.ping_interval),
        ping_timeout: duration_ms(state.engine.ping_timeout),
        max_payload: state.engine.max_payload,
    };
    let open_json = match serde_json::to_string(&open) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to encode open packet: {}", e);
            return;
        }
    };
    if tx.send(EnginePacket::Open(open_json)).is_err() {
        return;
    }
    tracing::info!(engine_id = %engine_id, "Engine connection opened");

    // Drain queued packets into the socket; closes the socket once every sender is gone
    let mut send_task = tokio::spawn(async move {
        while let Some(packet) = rx.recv().await {
            if sender
                .send(Message::Text(packet.encode().into()))
                .await
                .is_err()
            {
                return;
            }
        }
        let _ = sender.close().await;
    });

    let flush_timeout = state.engine.ping_timeout;
    let mut connection = Connection::new(engine_id.clone(), state, tx);

    let (reason, send_finished) = tokio::select! {
        reason = connection.run(&mut receiver) => (reason, false),
        _ = &mut send_task => (DisconnectReason::TransportError, true),
    };

    connection.close(reason).await;
    drop(connection);

    if !send_finished && timeout(flush_timeout, &mut send_task).await.is_err() {
        send_task.abort();
    }

    tracing::info!(engine_id = %engine_id, %reason, "Engine connection closed");
}

fn duration_ms(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Per-connection state: the namespaces joined over this socket.
struct Connection {
    engine_id: SessionId,
    state: Arc<AppState>,
    tx: mpsc::UnboundedSender<EnginePacket>,
    sessions: BTreeMap<NamespacePath, SessionId>,
    joined_once: bool,
}

impl Connection {
    fn new(
        engine_id: SessionId,
        state: Arc<AppState>,
        tx: mpsc::UnboundedSender<EnginePacket>,
    ) -> Self {
        Self {
            engine_id,
            state,
            tx,
            sessions: BTreeMap::new(),
            joined_once: false,
        }
    }

    /// Read frames until the connection ends, and report why it ended.
    async fn run(&mut self, receiver: &mut SplitStream<WebSocket>) -> DisconnectReason {
        let engine = self.state.engine.clone();
        let mut heartbeat = interval_at(Instant::now() + engine.ping_interval, engine.ping_interval);
        let mut pong_deadline: Option<Instant> = None;
        let connect_deadline = sleep(engine.connect_timeout);
        tokio::pin!(connect_deadline);
        let mut shutdown = self.state.shutdown.clone();

        loop {
            tokio::select! {
                frame = receiver.next() => {
                    let message = match frame {
                        None => return DisconnectReason::TransportClose,
                        Some(Err(e)) => {
                            tracing::warn!(engine_id = %self.engine_id, "WebSocket error: {}", e);
                            return DisconnectReason::TransportError;
                        }
                        Some(Ok(message)) => message,
                    };

                    match message {
                        Message::Text(text) => {
                            if let Some(reason) = self.handle_text(text.as_str(), &mut pong_deadline).await {
                                return reason;
                            }
                        }
                        Message::Binary(_) => {
                            tracing::warn!(engine_id = %self.engine_id, "Binary frames are not supported, dropping");
                        }
                        Message::Close(_) => {
                            tracing::info!(engine_id = %self.engine_id, "Client requested close");
                            return DisconnectReason::TransportClose;
                        }
                        // WebSocket-level ping/pong is answered by the protocol layer
                        _ => {}
                    }
                }
                _ = heartbeat.tick() => {
                    if self.tx.send(EnginePacket::Ping(String::new())).is_err() {
                        return DisconnectReason::TransportError;
                    }
                    if pong_deadline.is_none() {
                        pong_deadline = Some(Instant::now() + engine.ping_timeout);
                    }
                }
                _ = sleep_until(pong_deadline.unwrap_or_else(Instant::now)), if pong_deadline.is_some() => {
                    tracing::info!(engine_id = %self.engine_id, "No pong within ping timeout");
                    return DisconnectReason::PingTimeout;
                }
                _ = &mut connect_deadline, if !self.joined_once => {
                    tracing::info!(engine_id = %self.engine_id, "No namespace joined within connect timeout");
                    return DisconnectReason::TransportClose;
                }
                _ = shutdown.changed() => {
                    return DisconnectReason::ServerShuttingDown;
                }
            }
        }
    }

    async fn handle_text(
        &mut self,
        text: &str,
        pong_deadline: &mut Option<Instant>,
    ) -> Option<DisconnectReason> {
        let packet = match EnginePacket::decode(text) {
            Ok(packet) => packet,
            Err(e) => {
                tracing::warn!(engine_id = %self.engine_id, "Undecodable engine packet: {}", e);
                return Some(DisconnectReason::ParseError);
            }
        };

        match packet {
            EnginePacket::Pong(_) => {
                *pong_deadline = None;
                None
            }
            EnginePacket::Ping(data) => {
                // Probe from a client checking the transport
                let _ = self.tx.send(EnginePacket::Pong(data));
                None
            }
            EnginePacket::Close => Some(DisconnectReason::TransportClose),
            EnginePacket::Message(payload) => match SocketPacket::decode(&payload) {
                Ok(packet) => {
                    self.handle_packet(packet).await;
                    None
                }
                Err(e) => {
                    tracing::warn!(engine_id = %self.engine_id, "Undecodable socket packet: {}", e);
                    Some(DisconnectReason::ParseError)
                }
            },
            EnginePacket::Open(_) | EnginePacket::Upgrade | EnginePacket::Noop => {
                tracing::debug!(engine_id = %self.engine_id, "Ignoring engine packet: {}", text);
                None
            }
        }
    }

    async fn handle_packet(&mut self, packet: SocketPacket) {
        match packet {
            SocketPacket::Connect { namespace, data } => self.join(namespace, data).await,
            SocketPacket::Disconnect { namespace } => {
                self.leave(&namespace, DisconnectReason::ClientNamespaceDisconnect)
                    .await
            }
            event @ SocketPacket::Event { .. } => {
                let namespace = event.namespace().clone();
                if let Some(inbound) = event.into_inbound_event() {
                    self.dispatch(namespace, inbound).await;
                }
            }
            SocketPacket::Ack {
                namespace, ack_id, ..
            } => {
                tracing::debug!(%namespace, ack_id, "Ignoring acknowledgement from client");
            }
            SocketPacket::ConnectError { namespace, message } => {
                tracing::warn!(%namespace, "Client sent CONNECT_ERROR: {}", message);
            }
        }
    }

    async fn join(&mut self, namespace: NamespacePath, auth: Option<Value>) {
        if self.sessions.contains_key(&namespace) {
            tracing::warn!(%namespace, "Namespace already joined on this connection, ignoring CONNECT");
            return;
        }

        let usecase = ConnectNamespaceUseCase::new(
            self.state.repository.clone(),
            self.state.namespaces.clone(),
        );
        let handshake = Handshake::new(namespace.clone(), self.engine_id.clone(), auth);

        match usecase.execute(handshake).await {
            Ok(admitted) => {
                self.joined_once = true;
                let sid = admitted.session.id;
                self.emit(SocketPacket::connect_ack(namespace.clone(), &sid));
                for event in admitted.events {
                    self.emit(SocketPacket::event(namespace.clone(), event));
                }
                self.sessions.insert(namespace, sid);
            }
            Err(e @ (ConnectError::InvalidNamespace(_) | ConnectError::Rejected(_))) => {
                tracing::info!(%namespace, "Connection refused: {}", e);
                self.emit(SocketPacket::ConnectError {
                    namespace,
                    message: e.to_string(),
                });
            }
            Err(e) => {
                tracing::error!(%namespace, "Failed to connect namespace: {}", e);
                self.emit(SocketPacket::ConnectError {
                    namespace,
                    message: "Internal server error".to_string(),
                });
            }
        }
    }

    async fn dispatch(&mut self, namespace: NamespacePath, event: InboundEvent) {
        let Some(sid) = self.sessions.get(&namespace).cloned() else {
            tracing::warn!(%namespace, event = %event.name, "Event for a namespace not joined, dropping");
            return;
        };

        let usecase = DispatchEventUseCase::new(
            self.state.repository.clone(),
            self.state.namespaces.clone(),
        );
        match usecase.execute(&sid, event).await {
            Ok(replies) => {
                for reply in replies {
                    self.emit(SocketPacket::event(namespace.clone(), reply));
                }
            }
            Err(e) => tracing::warn!(%namespace, sid = %sid, "Failed to dispatch event: {}", e),
        }
    }

    async fn leave(&mut self, namespace: &NamespacePath, reason: DisconnectReason) {
        let Some(sid) = self.sessions.get(namespace).cloned() else {
            tracing::debug!(%namespace, "DISCONNECT for a namespace not joined");
            return;
        };
        // Stays tracked until the session is gone so `close` can still end it
        self.disconnect(&sid, reason).await;
        self.sessions.remove(namespace);
    }

    async fn disconnect(&self, sid: &SessionId, reason: DisconnectReason) {
        let usecase = DisconnectNamespaceUseCase::new(
            self.state.repository.clone(),
            self.state.namespaces.clone(),
        );
        if let Err(e) = usecase.execute(sid, reason).await {
            tracing::warn!(sid = %sid, "Failed to disconnect session: {}", e);
        }
    }

    /// End every session still joined on this connection.
    async fn close(&mut self, reason: DisconnectReason) {
        let sessions = std::mem::take(&mut self.sessions);
        for (namespace, sid) in sessions {
            if reason == DisconnectReason::ServerShuttingDown {
                self.emit(SocketPacket::Disconnect { namespace });
            }
            self.disconnect(&sid, reason).await;
        }
    }

    fn emit(&self, packet: SocketPacket) {
        if self.tx.send(EnginePacket::Message(packet.encode())).is_err() {
            tracing::debug!(engine_id = %self.engine_id, "Outbound queue closed, dropping packet");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicBool, Ordering},
        time::Duration,
    };

    use async_trait::async_trait;
    use tokio::sync::watch;

    use super::*;
    use crate::{
        config::EngineConfig,
        domain::{RepositoryError, Session, SessionRepository},
        infrastructure::repository::InMemorySessionRepository,
        usecase::NamespaceRegistry,
    };

    /// In-memory storage whose `remove_session` can be made to hang.
    #[derive(Default)]
    struct StallingRepository {
        inner: InMemorySessionRepository,
        stall: AtomicBool,
    }

    #[async_trait]
    impl SessionRepository for StallingRepository {
        async fn add_session(&self, session: Session) -> Result<(), RepositoryError> {
            self.inner.add_session(session).await
        }

        async fn remove_session(&self, id: &SessionId) -> Result<Session, RepositoryError> {
            if self.stall.load(Ordering::SeqCst) {
                std::future::pending::<()>().await;
            }
            self.inner.remove_session(id).await
        }

        async fn get_session(&self, id: &SessionId) -> Result<Session, RepositoryError> {
            self.inner.get_session(id).await
        }

        async fn list_sessions(&self, namespace: &NamespacePath) -> Vec<Session> {
            self.inner.list_sessions(namespace).await
        }

        async fn count_sessions(&self) -> usize {
            self.inner.count_sessions().await
        }
    }

    #[tokio::test]
    async fn test_interrupted_leave_is_finished_by_close() {
        // テスト項目: 切断処理が途中で中断されてもセッションは追跡され、close で確実に削除される
        // given (前提条件):
        let repository = Arc::new(StallingRepository::default());
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let state = Arc::new(AppState {
            repository: repository.clone(),
            namespaces: Arc::new(NamespaceRegistry::with_defaults()),
            engine: EngineConfig::default(),
            shutdown: shutdown_rx,
        });
        let (tx, _rx) = mpsc::unbounded_channel();
        let engine_id = SessionId::new("engine".to_string()).unwrap();
        let mut connection = Connection::new(engine_id, state, tx);
        let root = NamespacePath::root();
        connection.join(root.clone(), None).await;
        assert_eq!(repository.count_sessions().await, 1);

        // when (操作): リポジトリの削除が終わらないうちに中断する
        repository.stall.store(true, Ordering::SeqCst);
        let interrupted = timeout(
            Duration::from_millis(50),
            connection.leave(&root, DisconnectReason::ClientNamespaceDisconnect),
        )
        .await;

        // then (期待する結果):
        assert!(interrupted.is_err());
        assert!(connection.sessions.contains_key(&root));

        repository.stall.store(false, Ordering::SeqCst);
        connection.close(DisconnectReason::TransportClose).await;
        assert!(connection.sessions.is_empty());
        assert_eq!(repository.count_sessions().await, 0);
    }
}
