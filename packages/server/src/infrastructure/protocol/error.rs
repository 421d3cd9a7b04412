//! Protocol decode errors.

use thiserror::Error;

use crate::domain::ValueObjectError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PacketError {
    #[error("empty packet")]
    Empty,

    #[error("unknown packet type '{0}'")]
    UnknownType(char),

    #[error("binary packets are not supported")]
    BinaryUnsupported,

    #[error("invalid namespace: {0}")]
    InvalidNamespace(ValueObjectError),

    #[error("invalid acknowledgement id")]
    InvalidAckId,

    #[error("invalid JSON payload: {0}")]
    InvalidJson(String),

    #[error("invalid payload for {0} packet")]
    InvalidPayload(&'static str),

    #[error("invalid event name: {0}")]
    InvalidEventName(ValueObjectError),
}
