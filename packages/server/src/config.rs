//! Server configuration.
//!
//! Every option has a default, so running the binary without flags listens
//! on `0.0.0.0:3000` with the standard Engine.IO timings.

use std::time::Duration;

use clap::Parser;

/// Command line options of `kodama-server`
#[derive(Debug, Clone, Parser)]
#[command(name = "kodama-server", version, about = "Socket.IO compatible event server")]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 3000)]
    pub port: u16,

    /// Interval between server heartbeats (ms)
    #[arg(long, default_value_t = 25_000, value_parser = clap::value_parser!(u64).range(1..))]
    pub ping_interval_ms: u64,

    /// Time a client has to answer a heartbeat (ms)
    #[arg(long, default_value_t = 20_000)]
    pub ping_timeout_ms: u64,

    /// Time a client has to join a namespace after the handshake (ms)
    #[arg(long, default_value_t = 45_000)]
    pub connect_timeout_ms: u64,

    /// Largest accepted WebSocket message (bytes)
    #[arg(long, default_value_t = 1_000_000)]
    pub max_payload: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::parse_from(["kodama-server"])
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            ping_interval: Duration::from_millis(self.ping_interval_ms),
            ping_timeout: Duration::from_millis(self.ping_timeout_ms),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            max_payload: self.max_payload,
        }
    }
}

/// Transport timings and limits applied to every connection
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub ping_interval: Duration,
    pub ping_timeout: Duration,
    pub connect_timeout: Duration,
    pub max_payload: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        ServerConfig::default().engine()
    }
}
