//! HTTP API DTOs.

use serde::{Deserialize, Serialize};

/// Session entry in the namespace listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDetailDto {
    pub sid: String,
    /// RFC3339 timestamp in JST
    pub connected_at: String,
}

/// Namespace entry returned by `/api/namespaces`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceSummaryDto {
    pub namespace: String,
    pub sessions: Vec<SessionDetailDto>,
}

/// Handshake error body, `{"code":0,"message":"Transport unknown"}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineErrorDto {
    pub code: u8,
    pub message: String,
}
