//! WebSocket handshake DTOs.

use serde::{Deserialize, Serialize};

/// Payload of the Engine.IO open packet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenPayload {
    pub sid: String,
    pub upgrades: Vec<String>,
    /// Milliseconds between server pings
    pub ping_interval: u64,
    /// Milliseconds the client has to answer a ping
    pub ping_timeout: u64,
    /// Largest accepted frame in bytes
    pub max_payload: usize,
}

/// Query string of the `/socket.io/` endpoint
#[derive(Debug, Default, Deserialize)]
pub struct EngineQuery {
    #[serde(rename = "EIO")]
    pub eio: Option<String>,
    pub transport: Option<String>,
    pub sid: Option<String>,
}
