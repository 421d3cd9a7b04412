//! Shared application state.

use std::sync::Arc;

use tokio::sync::watch;

use crate::{config::EngineConfig, domain::SessionRepository, usecase::NamespaceRegistry};

/// Shared application state
pub struct AppState {
    /// Repository（データアクセス層の抽象化）
    pub repository: Arc<dyn SessionRepository>,
    /// Mounted namespace handlers
    pub namespaces: Arc<NamespaceRegistry>,
    /// Transport timings and limits
    pub engine: EngineConfig,
    /// Flips to `true` when the server starts shutting down
    pub shutdown: watch::Receiver<bool>,
}
