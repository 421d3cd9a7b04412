//! Test fixtures: an in-process server on an ephemeral port and a minimal
//! Socket.IO client over tokio-tungstenite.

#![allow(dead_code)]

use std::{net::SocketAddr, time::Duration};

use futures_util::{SinkExt, StreamExt};
use kodama_server::EngineConfig;
use tokio::{
    net::{TcpListener, TcpStream},
    sync::oneshot,
    time::timeout,
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

const FRAME_TIMEOUT: Duration = Duration::from_secs(5);

/// Server running inside the test runtime; stops when dropped.
pub struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(EngineConfig::default()).await
    }

    pub async fn start_with(engine: EngineConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let (tx, rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let shutdown = async {
                let _ = rx.await;
            };
            if let Err(e) = kodama_server::serve(listener, engine, shutdown).await {
                eprintln!("test server error: {e}");
            }
        });

        Self {
            addr,
            shutdown: Some(tx),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/socket.io/?EIO=4&transport=websocket", self.addr)
    }

    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.stop();
    }
}

enum Frame {
    Text(String),
    Closed,
    /// Nothing arrived in time
    Silent,
}

/// Engine.IO/Socket.IO client speaking raw text frames.
pub struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    /// Parsed payload of the open packet
    pub open: serde_json::Value,
}

impl TestClient {
    /// Open the WebSocket and consume the Engine.IO open packet.
    pub async fn connect(url: &str) -> Self {
        let (stream, _) = connect_async(url).await.expect("Failed to connect");
        let mut client = Self {
            stream,
            open: serde_json::Value::Null,
        };
        let first = client.next_frame().await.expect("No open packet");
        assert!(first.starts_with('0'), "expected open packet, got {first}");
        client.open = serde_json::from_str(&first[1..]).expect("Open payload is not JSON");
        client
    }

    pub async fn send(&mut self, text: &str) {
        self.stream
            .send(Message::Text(text.to_string().into()))
            .await
            .expect("Failed to send frame");
    }

    /// Next text frame, or None when the server closed the socket or nothing
    /// arrived in time.
    pub async fn next_frame(&mut self) -> Option<String> {
        self.next_frame_within(FRAME_TIMEOUT).await
    }

    pub async fn next_frame_within(&mut self, wait: Duration) -> Option<String> {
        match self.read(wait).await {
            Frame::Text(text) => Some(text),
            Frame::Closed | Frame::Silent => None,
        }
    }

    async fn read(&mut self, wait: Duration) -> Frame {
        loop {
            match timeout(wait, self.stream.next()).await {
                Err(_) => return Frame::Silent,
                Ok(None) | Ok(Some(Err(_))) | Ok(Some(Ok(Message::Close(_)))) => {
                    return Frame::Closed;
                }
                Ok(Some(Ok(Message::Text(text)))) => return Frame::Text(text.as_str().to_string()),
                Ok(Some(Ok(_))) => continue,
            }
        }
    }

    /// Assert that the server ends the connection within `wait`, skipping
    /// any frames still queued before the close.
    pub async fn expect_closed(&mut self, wait: Duration) {
        let deadline = tokio::time::Instant::now() + wait;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            match self.read(remaining).await {
                Frame::Closed => return,
                Frame::Silent => panic!("connection still open after {wait:?}"),
                Frame::Text(_) => continue,
            }
        }
    }

    /// Next Socket.IO packet (the Engine.IO `4` prefix stripped), answering
    /// server heartbeats on the way.
    pub async fn next_packet(&mut self) -> String {
        loop {
            let frame = self.next_frame().await.expect("Connection ended");
            if frame == "2" {
                self.send("3").await;
                continue;
            }
            let packet = frame
                .strip_prefix('4')
                .unwrap_or_else(|| panic!("expected message packet, got {frame}"));
            return packet.to_string();
        }
    }

    /// Assert that no Socket.IO packet arrives within `wait` and the
    /// connection stays open.
    pub async fn expect_no_packet(&mut self, wait: Duration) {
        let deadline = tokio::time::Instant::now() + wait;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return;
            }
            match self.read(remaining).await {
                Frame::Silent => return,
                Frame::Closed => panic!("connection closed unexpectedly"),
                Frame::Text(frame) if frame == "2" => self.send("3").await,
                Frame::Text(frame) => panic!("unexpected frame: {frame}"),
            }
        }
    }

    /// Join a namespace and return the session id from the acknowledgement.
    pub async fn join(&mut self, namespace: &str) -> String {
        let prefix = if namespace == "/" {
            String::new()
        } else {
            format!("{namespace},")
        };
        self.send(&format!("40{prefix}")).await;

        let ack = self.next_packet().await;
        let body = ack
            .strip_prefix(&format!("0{prefix}"))
            .unwrap_or_else(|| panic!("expected CONNECT ack, got {ack}"));
        let body: serde_json::Value = serde_json::from_str(body).expect("ack body is not JSON");
        body["sid"].as_str().expect("ack without sid").to_string()
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}

/// Fast heartbeat settings for timing-sensitive tests.
pub fn fast_engine() -> EngineConfig {
    EngineConfig {
        ping_interval: Duration::from_millis(100),
        ping_timeout: Duration::from_millis(100),
        connect_timeout: Duration::from_millis(300),
        max_payload: 1_000_000,
    }
}
