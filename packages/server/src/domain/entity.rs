//! Core domain models for the event server.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use super::value_object::{EventName, NamespacePath, SessionId, Timestamp};

/// A client connected to one namespace.
///
/// One engine connection hosts at most one session per namespace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    /// Session identifier, unique per namespace connection
    pub id: SessionId,
    /// Namespace the session belongs to
    pub namespace: NamespacePath,
    /// Identifier of the underlying engine connection
    pub engine_id: SessionId,
    /// Credential object presented by the client at connect time
    pub auth: Value,
    /// Timestamp when the session was admitted
    pub connected_at: Timestamp,
}

impl Session {
    pub fn new(id: SessionId, handshake: Handshake, connected_at: Timestamp) -> Self {
        Self {
            id,
            namespace: handshake.namespace,
            engine_id: handshake.engine_id,
            auth: handshake.auth,
            connected_at,
        }
    }
}

/// Data presented by a client when it asks to join a namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct Handshake {
    pub namespace: NamespacePath,
    pub engine_id: SessionId,
    /// Auth object; an empty object when the client sent none
    pub auth: Value,
}

impl Handshake {
    pub fn new(namespace: NamespacePath, engine_id: SessionId, auth: Option<Value>) -> Self {
        Self {
            namespace,
            engine_id,
            auth: auth.unwrap_or_else(|| Value::Object(Default::default())),
        }
    }
}

/// An event received from a client.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    pub name: EventName,
    pub args: Vec<Value>,
    /// Acknowledgement id requested by the client, if any
    pub ack_id: Option<u64>,
}

impl InboundEvent {
    pub fn new(name: EventName, args: Vec<Value>) -> Self {
        Self {
            name,
            args,
            ack_id: None,
        }
    }
}

/// An event to be emitted to the session that triggered it.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEvent {
    pub name: EventName,
    pub args: Vec<Value>,
}

impl OutboundEvent {
    pub fn new(name: EventName) -> Self {
        Self {
            name,
            args: Vec::new(),
        }
    }

    /// Append one argument to the event payload.
    pub fn with_arg(mut self, arg: Value) -> Self {
        self.args.push(arg);
        self
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    /// The client left the namespace but kept the connection
    ClientNamespaceDisconnect,
    /// The client closed the connection
    TransportClose,
    /// The connection failed
    TransportError,
    /// The client stopped answering heartbeats
    PingTimeout,
    /// The client sent a packet that could not be decoded
    ParseError,
    /// The server is stopping
    ServerShuttingDown,
}

impl DisconnectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClientNamespaceDisconnect => "client namespace disconnect",
            Self::TransportClose => "transport close",
            Self::TransportError => "transport error",
            Self::PingTimeout => "ping timeout",
            Self::ParseError => "parse error",
            Self::ServerShuttingDown => "server shutting down",
        }
    }
}

impl fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
