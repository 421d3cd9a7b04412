//! Handler for the `/admin` namespace.
//!
//! Despite the name nothing is restricted; the gate only logs credentials.

use serde_json::json;

use crate::{
    domain::{
        DisconnectReason, EventName, GateRejection, Handshake, InboundEvent, NamespaceHandler,
        NamespacePath, OutboundEvent, Session,
    },
    usecase::connection_gate,
};

pub const ADMIN_NAMESPACE: &str = "/admin";
pub const GREETING_EVENT: &str = "hi from server in /admin namespace";
pub const VERSION_EVENT: &str = "version";
pub const SERVER_VERSION: &str = "4.3";

pub struct AdminChannel;

impl NamespaceHandler for AdminChannel {
    fn path(&self) -> NamespacePath {
        NamespacePath::from_static(ADMIN_NAMESPACE)
    }

    fn authorize(&self, handshake: &Handshake) -> Result<(), GateRejection> {
        connection_gate::log_and_admit(handshake)
    }

    fn on_connect(&self, session: &Session) -> Vec<OutboundEvent> {
        tracing::info!(sid = %session.id, "connected to the /admin namespace");
        vec![OutboundEvent::new(EventName::from_static(GREETING_EVENT))]
    }

    fn on_event(&self, session: &Session, event: &InboundEvent) -> Vec<OutboundEvent> {
        match event.name.as_str() {
            VERSION_EVENT => vec![
                OutboundEvent::new(EventName::from_static(VERSION_EVENT))
                    .with_arg(json!({ "version": SERVER_VERSION })),
            ],
            other => {
                tracing::debug!(sid = %session.id, event = other, "ignoring unhandled event");
                Vec::new()
            }
        }
    }

    fn on_disconnect(&self, session: &Session, reason: DisconnectReason) {
        tracing::info!(sid = %session.id, %reason, "disconnected from /admin namespace");
    }
}
