//! Socket.IO v5 packets (text form).
//!
//! ```text
//! <type>[<namespace>,][<ack id>][<JSON data>]
//! ```
//!
//! The namespace is omitted for `/`. Binary packet types are rejected.

use serde_json::{Value, json};

use crate::domain::{EventName, InboundEvent, NamespacePath, OutboundEvent, SessionId};

use super::error::PacketError;

#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    /// Join request from a client (data is the auth object), or the
    /// server's acceptance (data carries the session id)
    Connect {
        namespace: NamespacePath,
        data: Option<Value>,
    },
    Disconnect {
        namespace: NamespacePath,
    },
    Event {
        namespace: NamespacePath,
        name: EventName,
        args: Vec<Value>,
        ack_id: Option<u64>,
    },
    Ack {
        namespace: NamespacePath,
        ack_id: u64,
        args: Vec<Value>,
    },
    ConnectError {
        namespace: NamespacePath,
        message: String,
    },
}

impl SocketPacket {
    /// Server acceptance of a namespace join.
    pub fn connect_ack(namespace: NamespacePath, sid: &SessionId) -> Self {
        Self::Connect {
            namespace,
            data: Some(json!({ "sid": sid.as_str() })),
        }
    }

    /// Emit of a handler-produced event.
    pub fn event(namespace: NamespacePath, event: OutboundEvent) -> Self {
        Self::Event {
            namespace,
            name: event.name,
            args: event.args,
            ack_id: None,
        }
    }

    pub fn namespace(&self) -> &NamespacePath {
        match self {
            Self::Connect { namespace, .. }
            | Self::Disconnect { namespace }
            | Self::Event { namespace, .. }
            | Self::Ack { namespace, .. }
            | Self::ConnectError { namespace, .. } => namespace,
        }
    }

    /// Convert an EVENT packet into the domain event it carries.
    pub fn into_inbound_event(self) -> Option<InboundEvent> {
        match self {
            Self::Event {
                name, args, ack_id, ..
            } => Some(InboundEvent { name, args, ack_id }),
            _ => None,
        }
    }

    pub fn decode(input: &str) -> Result<Self, PacketError> {
        let mut chars = input.chars();
        let kind = chars.next().ok_or(PacketError::Empty)?;
        match kind {
            '0'..='4' => {}
            '5' | '6' => return Err(PacketError::BinaryUnsupported),
            other => return Err(PacketError::UnknownType(other)),
        }
        let rest = chars.as_str();

        // Namespace runs up to the first ',' when present
        let (namespace, rest) = if rest.starts_with('/') {
            match rest.find(',') {
                Some(idx) => (&rest[..idx], &rest[idx + 1..]),
                None => (rest, ""),
            }
        } else {
            ("/", rest)
        };
        let namespace = NamespacePath::try_from(namespace).map_err(PacketError::InvalidNamespace)?;

        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let ack_id = if digits > 0 {
            Some(
                rest[..digits]
                    .parse::<u64>()
                    .map_err(|_| PacketError::InvalidAckId)?,
            )
        } else {
            None
        };

        let body = &rest[digits..];
        let data = if body.is_empty() {
            None
        } else {
            Some(
                serde_json::from_str::<Value>(body)
                    .map_err(|e| PacketError::InvalidJson(e.to_string()))?,
            )
        };

        match kind {
            '0' => match data {
                None | Some(Value::Object(_)) => Ok(Self::Connect { namespace, data }),
                Some(_) => Err(PacketError::InvalidPayload("CONNECT")),
            },
            '1' => Ok(Self::Disconnect { namespace }),
            '2' => {
                let Some(Value::Array(mut items)) = data else {
                    return Err(PacketError::InvalidPayload("EVENT"));
                };
                if items.is_empty() {
                    return Err(PacketError::InvalidPayload("EVENT"));
                }
                let name = match items.remove(0) {
                    Value::String(name) => {
                        EventName::new(name).map_err(PacketError::InvalidEventName)?
                    }
                    _ => return Err(PacketError::InvalidPayload("EVENT")),
                };
                Ok(Self::Event {
                    namespace,
                    name,
                    args: items,
                    ack_id,
                })
            }
            '3' => {
                let ack_id = ack_id.ok_or(PacketError::InvalidAckId)?;
                let args = match data {
                    Some(Value::Array(items)) => items,
                    None => Vec::new(),
                    Some(_) => return Err(PacketError::InvalidPayload("ACK")),
                };
                Ok(Self::Ack {
                    namespace,
                    ack_id,
                    args,
                })
            }
            _ => {
                let message = match data {
                    Some(Value::Object(map)) => map
                        .get("message")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    Some(Value::String(message)) => message,
                    _ => return Err(PacketError::InvalidPayload("CONNECT_ERROR")),
                };
                Ok(Self::ConnectError { namespace, message })
            }
        }
    }

    pub fn encode(&self) -> String {
        match self {
            Self::Connect { namespace, data } => {
                let mut out = header('0', namespace, None);
                if let Some(data) = data {
                    out.push_str(&data.to_string());
                }
                out
            }
            Self::Disconnect { namespace } => header('1', namespace, None),
            Self::Event {
                namespace,
                name,
                args,
                ack_id,
            } => {
                let mut items = Vec::with_capacity(args.len() + 1);
                items.push(Value::String(name.as_str().to_string()));
                items.extend(args.iter().cloned());
                let mut out = header('2', namespace, *ack_id);
                out.push_str(&Value::Array(items).to_string());
                out
            }
            Self::Ack {
                namespace,
                ack_id,
                args,
            } => {
                let mut out = header('3', namespace, Some(*ack_id));
                out.push_str(&Value::Array(args.clone()).to_string());
                out
            }
            Self::ConnectError { namespace, message } => {
                let mut out = header('4', namespace, None);
                out.push_str(&json!({ "message": message }).to_string());
                out
            }
        }
    }
}

fn header(kind: char, namespace: &NamespacePath, ack_id: Option<u64>) -> String {
    let mut out = String::from(kind);
    if !namespace.is_root() {
        out.push_str(namespace.as_str());
        out.push(',');
    }
    if let Some(id) = ack_id {
        out.push_str(&id.to_string());
    }
    out
}
