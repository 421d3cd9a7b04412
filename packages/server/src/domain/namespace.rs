//! Namespace handler contract.
//!
//! A namespace reacts to the lifecycle of its sessions by returning the
//! events to emit back to the session. Handlers never touch the transport.

use thiserror::Error;

use super::{
    entity::{DisconnectReason, Handshake, InboundEvent, OutboundEvent, Session},
    value_object::NamespacePath,
};

/// Refusal returned by a connection gate.
///
/// The message is sent to the client in a CONNECT_ERROR packet.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct GateRejection {
    pub message: String,
}

impl GateRejection {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub trait NamespaceHandler: Send + Sync {
    /// Path this handler is mounted on.
    fn path(&self) -> NamespacePath;

    /// Decide whether a client may join. Runs before the session exists.
    fn authorize(&self, handshake: &Handshake) -> Result<(), GateRejection>;

    /// Events emitted right after the session has been admitted.
    fn on_connect(&self, session: &Session) -> Vec<OutboundEvent>;

    /// Events emitted in reply to an inbound event.
    fn on_event(&self, session: &Session, event: &InboundEvent) -> Vec<OutboundEvent>;

    /// Called exactly once when the session ends.
    fn on_disconnect(&self, session: &Session, reason: DisconnectReason);
}
