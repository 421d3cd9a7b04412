//! Socket.IO compatible event server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kodama-server -- --port 3000
//! ```

use clap::Parser;
use kodama_server::ServerConfig;
use kodama_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    // Run the server
    if let Err(e) = kodama_server::run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
