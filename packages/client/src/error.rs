//! Client error definitions.

use kodama_server::{domain::ValueObjectError, infrastructure::protocol::PacketError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid namespace: {0}")]
    InvalidNamespace(#[from] ValueObjectError),

    #[error("Auth must be a JSON object: {0}")]
    InvalidAuth(String),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Protocol error: {0}")]
    Protocol(#[from] PacketError),

    #[error("Handshake failed: {0}")]
    Handshake(String),

    #[error("Server refused namespace {namespace}: {message}")]
    Refused { namespace: String, message: String },

    #[error("Connection closed by server")]
    Closed,
}
