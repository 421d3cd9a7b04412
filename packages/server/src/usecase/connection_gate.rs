//! Connection gate shared by the shipped namespaces.
//!
//! Logs the credential object a client presents and admits every client.
//! Nothing here authenticates.

use crate::domain::{GateRejection, Handshake};

/// Log the handshake credentials and admit the connection.
pub fn log_and_admit(handshake: &Handshake) -> Result<(), GateRejection> {
    tracing::info!(
        namespace = %handshake.namespace,
        engine_id = %handshake.engine_id,
        "auth object for {} namespace -> {}",
        handshake.namespace,
        handshake.auth
    );
    Ok(())
}
