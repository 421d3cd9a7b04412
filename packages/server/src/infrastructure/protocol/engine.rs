//! Engine.IO v4 packets over the WebSocket transport.
//!
//! Each text frame carries exactly one packet: a type digit followed by an
//! optional string payload.

use super::error::PacketError;

/// Protocol revision accepted in the `EIO` query parameter.
pub const ENGINE_PROTOCOL_VERSION: &str = "4";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnginePacket {
    /// Handshake, payload is the JSON open document
    Open(String),
    Close,
    Ping(String),
    Pong(String),
    /// Carries one Socket.IO packet
    Message(String),
    Upgrade,
    Noop,
}

impl EnginePacket {
    pub fn decode(text: &str) -> Result<Self, PacketError> {
        let mut chars = text.chars();
        let kind = chars.next().ok_or(PacketError::Empty)?;
        let payload = chars.as_str().to_string();

        match kind {
            '0' => Ok(Self::Open(payload)),
            '1' => Ok(Self::Close),
            '2' => Ok(Self::Ping(payload)),
            '3' => Ok(Self::Pong(payload)),
            '4' => Ok(Self::Message(payload)),
            '5' => Ok(Self::Upgrade),
            '6' => Ok(Self::Noop),
            other => Err(PacketError::UnknownType(other)),
        }
    }

    pub fn encode(&self) -> String {
        match self {
            Self::Open(payload) => format!("0{payload}"),
            Self::Close => "1".to_string(),
            Self::Ping(payload) => format!("2{payload}"),
            Self::Pong(payload) => format!("3{payload}"),
            Self::Message(payload) => format!("4{payload}"),
            Self::Upgrade => "5".to_string(),
            Self::Noop => "6".to_string(),
        }
    }
}

/// Handshake error codes answered on the HTTP endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineErrorCode {
    TransportUnknown = 0,
    UnknownSid = 1,
    BadHandshakeMethod = 2,
    BadRequest = 3,
    Forbidden = 4,
    UnsupportedProtocolVersion = 5,
}

impl EngineErrorCode {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::TransportUnknown => "Transport unknown",
            Self::UnknownSid => "Session ID unknown",
            Self::BadHandshakeMethod => "Bad handshake method",
            Self::BadRequest => "Bad request",
            Self::Forbidden => "Forbidden",
            Self::UnsupportedProtocolVersion => "Unsupported protocol version",
        }
    }
}
