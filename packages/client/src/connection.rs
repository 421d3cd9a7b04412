//! Connection to a Kodama server: handshake, namespace join and the
//! interactive event loop.

use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use kodama_server::{
    domain::NamespacePath,
    infrastructure::protocol::{EnginePacket, SocketPacket},
};
use serde_json::Value;
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use crate::{command::Command, error::ClientError};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

enum Input {
    Packet(Result<EnginePacket, ClientError>),
    Line(Option<String>),
}

const ENGINE_PATH: &str = "/socket.io/?EIO=4&transport=websocket";

/// Turn an `http(s)://` or `ws(s)://` base URL into the Engine.IO endpoint.
pub fn build_ws_url(base: &str) -> Result<String, ClientError> {
    let base = base.trim().trim_end_matches('/');
    let ws_base = if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if base.starts_with("ws://") || base.starts_with("wss://") {
        base.to_string()
    } else {
        return Err(ClientError::InvalidUrl(base.to_string()));
    };
    Ok(format!("{ws_base}{ENGINE_PATH}"))
}

/// Parse the `--auth` flag; only JSON objects are accepted.
pub fn parse_auth(raw: &str) -> Result<Value, ClientError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(other) => Err(ClientError::InvalidAuth(other.to_string())),
        Err(e) => Err(ClientError::InvalidAuth(e.to_string())),
    }
}

/// Human readable rendering of a packet received from the server.
pub fn describe_packet(packet: &SocketPacket) -> String {
    match packet {
        SocketPacket::Connect { namespace, .. } => format!("[{namespace}] connected"),
        SocketPacket::Disconnect { namespace } => {
            format!("[{namespace}] disconnected by server")
        }
        SocketPacket::Event {
            namespace,
            name,
            args,
            ..
        } => {
            if args.is_empty() {
                format!("[{namespace}] {name}")
            } else {
                let rendered: Vec<String> = args.iter().map(Value::to_string).collect();
                format!("[{namespace}] {name} {}", rendered.join(" "))
            }
        }
        SocketPacket::Ack {
            namespace, ack_id, ..
        } => format!("[{namespace}] ack #{ack_id}"),
        SocketPacket::ConnectError { namespace, message } => {
            format!("[{namespace}] connect error: {message}")
        }
    }
}

/// A WebSocket joined to one namespace.
pub struct Connection {
    sink: SplitSink<WsStream, Message>,
    stream: SplitStream<WsStream>,
    namespace: NamespacePath,
    /// Session id assigned by the namespace
    pub sid: String,
    /// Engine connection id from the open packet
    pub engine_sid: String,
}

impl Connection {
    /// Open the transport and join `namespace`.
    pub async fn connect(
        url: &str,
        namespace: NamespacePath,
        auth: Option<Value>,
    ) -> Result<Self, ClientError> {
        let (socket, _) = connect_async(url).await?;
        let (mut sink, mut stream) = socket.split();

        let open = match next_engine_packet(&mut stream).await? {
            EnginePacket::Open(payload) => payload,
            other => {
                return Err(ClientError::Handshake(format!(
                    "expected open packet, got {}",
                    other.encode()
                )));
            }
        };
        let open: Value =
            serde_json::from_str(&open).map_err(|e| ClientError::Handshake(e.to_string()))?;
        let engine_sid = open["sid"]
            .as_str()
            .ok_or_else(|| ClientError::Handshake("open packet without sid".to_string()))?
            .to_string();
        tracing::debug!("Engine connection opened: {}", open);

        let join = SocketPacket::Connect {
            namespace: namespace.clone(),
            data: auth,
        };
        send_packet(&mut sink, EnginePacket::Message(join.encode())).await?;

        loop {
            match next_engine_packet(&mut stream).await? {
                EnginePacket::Ping(data) => send_packet(&mut sink, EnginePacket::Pong(data)).await?,
                EnginePacket::Message(payload) => match SocketPacket::decode(&payload)? {
                    SocketPacket::Connect { namespace: nsp, data } if nsp == namespace => {
                        let sid = data
                            .as_ref()
                            .and_then(|d| d.get("sid"))
                            .and_then(Value::as_str)
                            .ok_or_else(|| {
                                ClientError::Handshake("CONNECT ack without sid".to_string())
                            })?
                            .to_string();
                        return Ok(Self {
                            sink,
                            stream,
                            namespace,
                            sid,
                            engine_sid,
                        });
                    }
                    SocketPacket::ConnectError { namespace: nsp, message } if nsp == namespace => {
                        return Err(ClientError::Refused {
                            namespace: nsp.to_string(),
                            message,
                        });
                    }
                    other => tracing::debug!("Ignoring packet before join: {:?}", other),
                },
                EnginePacket::Close => return Err(ClientError::Closed),
                _ => {}
            }
        }
    }

    pub fn namespace(&self) -> &NamespacePath {
        &self.namespace
    }

    /// Print server events and emit commands read from `lines` until either
    /// side ends the session.
    pub async fn run(mut self, mut lines: mpsc::UnboundedReceiver<String>) -> Result<(), ClientError> {
        loop {
            let input = tokio::select! {
                packet = next_engine_packet(&mut self.stream) => Input::Packet(packet),
                line = lines.recv() => Input::Line(line),
            };

            match input {
                Input::Packet(Ok(EnginePacket::Ping(data))) => {
                    send_packet(&mut self.sink, EnginePacket::Pong(data)).await?;
                }
                Input::Packet(Ok(EnginePacket::Message(payload))) => {
                    let packet = SocketPacket::decode(&payload)?;
                    println!("{}", describe_packet(&packet));
                    if matches!(&packet, SocketPacket::Disconnect { namespace } if namespace == &self.namespace)
                    {
                        return Ok(());
                    }
                }
                Input::Packet(Ok(EnginePacket::Close) | Err(ClientError::Closed)) => {
                    println!("connection closed by server");
                    return Ok(());
                }
                Input::Packet(Ok(_)) => {}
                Input::Packet(Err(e)) => return Err(e),
                Input::Line(None) => return self.close().await,
                Input::Line(Some(line)) => match Command::parse(&line) {
                    Ok(Command::Emit { name, args }) => {
                        let event = SocketPacket::Event {
                            namespace: self.namespace.clone(),
                            name,
                            args,
                            ack_id: None,
                        };
                        send_packet(&mut self.sink, EnginePacket::Message(event.encode())).await?;
                    }
                    Ok(Command::Leave) => {
                        let leave = SocketPacket::Disconnect {
                            namespace: self.namespace.clone(),
                        };
                        send_packet(&mut self.sink, EnginePacket::Message(leave.encode())).await?;
                        println!("[{}] left", self.namespace);
                        return self.close().await;
                    }
                    Ok(Command::Quit) => return self.close().await,
                    Ok(Command::Empty) => {}
                    Err(e) => eprintln!("invalid command: {e}"),
                },
            }
        }
    }

    async fn close(mut self) -> Result<(), ClientError> {
        send_packet(&mut self.sink, EnginePacket::Close).await?;
        self.sink.close().await?;
        Ok(())
    }
}

async fn next_engine_packet(stream: &mut SplitStream<WsStream>) -> Result<EnginePacket, ClientError> {
    while let Some(frame) = stream.next().await {
        match frame? {
            Message::Text(text) => return Ok(EnginePacket::decode(text.as_str())?),
            Message::Close(_) => return Err(ClientError::Closed),
            _ => continue,
        }
    }
    Err(ClientError::Closed)
}

async fn send_packet(
    sink: &mut SplitSink<WsStream, Message>,
    packet: EnginePacket,
) -> Result<(), ClientError> {
    sink.send(Message::Text(packet.encode().into())).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kodama_server::domain::EventName;
    use serde_json::json;

    #[test]
    fn test_build_ws_url_from_http() {
        // テスト項目: http の URL が Engine.IO の WebSocket エンドポイントに変換される
        // then (期待する結果):
        assert_eq!(
            build_ws_url("http://localhost:3000").unwrap(),
            "ws://localhost:3000/socket.io/?EIO=4&transport=websocket"
        );
        assert_eq!(
            build_ws_url("https://example.com/").unwrap(),
            "wss://example.com/socket.io/?EIO=4&transport=websocket"
        );
        assert_eq!(
            build_ws_url("ws://127.0.0.1:3000").unwrap(),
            "ws://127.0.0.1:3000/socket.io/?EIO=4&transport=websocket"
        );
    }

    #[test]
    fn test_build_ws_url_rejects_unknown_scheme() {
        // テスト項目: 未対応のスキームはエラー
        // then (期待する結果):
        assert!(matches!(
            build_ws_url("ftp://localhost"),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_parse_auth_requires_object() {
        // テスト項目: auth は JSON オブジェクトのみ受け付ける
        // then (期待する結果):
        assert_eq!(
            parse_auth(r#"{"token":"abc"}"#).unwrap(),
            json!({"token": "abc"})
        );
        assert!(matches!(parse_auth("[1]"), Err(ClientError::InvalidAuth(_))));
        assert!(matches!(parse_auth("{"), Err(ClientError::InvalidAuth(_))));
    }

    #[test]
    fn test_describe_event_packet() {
        // テスト項目: 受信イベントの表示形式
        // given (前提条件):
        let packet = SocketPacket::Event {
            namespace: NamespacePath::try_from("/admin").unwrap(),
            name: EventName::from_static("version"),
            args: vec![json!({"version": "4.3"})],
            ack_id: None,
        };

        // then (期待する結果):
        assert_eq!(
            describe_packet(&packet),
            r#"[/admin] version {"version":"4.3"}"#
        );
    }

    #[test]
    fn test_describe_event_without_args() {
        // テスト項目: 引数なしイベントはイベント名のみ表示
        // given (前提条件):
        let packet = SocketPacket::Event {
            namespace: NamespacePath::root(),
            name: EventName::from_static("pong"),
            args: vec![],
            ack_id: None,
        };

        // then (期待する結果):
        assert_eq!(describe_packet(&packet), "[/] pong");
    }
}
