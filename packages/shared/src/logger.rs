//! Logger setup shared by the server and client binaries.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `default_level` is applied to the
/// Kodama crates and to the binary itself, and `info` to everything else.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(bin_name, default_level)));

    // Tests may install the subscriber more than once
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_ansi(true)
                .compact(),
        )
        .try_init();
}

fn default_directives(bin_name: &str, default_level: &str) -> String {
    let bin_target = bin_name.replace('-', "_");
    format!(
        "info,kodama_server={level},kodama_client={level},{bin}={level},tower_http=debug",
        level = default_level,
        bin = bin_target
    )
}
