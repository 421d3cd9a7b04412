//! Socket.IO compatible event server.
//!
//! Serves the Engine.IO v4 WebSocket transport with Socket.IO v5 packets on
//! top, and mounts two namespaces: `/` and `/admin`.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::{EngineConfig, ServerConfig};
pub use ui::{create_app, run as run_server, serve};
