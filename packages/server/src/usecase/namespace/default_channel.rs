//! Handler for the default namespace `/`.

use serde_json::json;

use crate::{
    domain::{
        DisconnectReason, EventName, GateRejection, Handshake, InboundEvent, NamespaceHandler,
        NamespacePath, OutboundEvent, Session,
    },
    usecase::connection_gate,
};

pub const GREETING_EVENT: &str = "hi from server";
pub const DATA_EVENT: &str = "let_me_give_you_some_data";
pub const PING_EVENT: &str = "ping";
pub const PONG_EVENT: &str = "pong";
pub const SEARCH_EVENT: &str = "search";

/// Greets new sessions with a canned payload and answers `ping`.
pub struct DefaultChannel;

impl NamespaceHandler for DefaultChannel {
    fn path(&self) -> NamespacePath {
        NamespacePath::root()
    }

    fn authorize(&self, handshake: &Handshake) -> Result<(), GateRejection> {
        connection_gate::log_and_admit(handshake)
    }

    fn on_connect(&self, session: &Session) -> Vec<OutboundEvent> {
        tracing::info!(sid = %session.id, "connected to the default namespace");

        vec![
            OutboundEvent::new(EventName::from_static(GREETING_EVENT)),
            OutboundEvent::new(EventName::from_static(DATA_EVENT))
                .with_arg(json!({ "name": "socket" }))
                .with_arg(json!("some random message here"))
                .with_arg(json!({ "family": ".io" })),
        ]
    }

    fn on_event(&self, session: &Session, event: &InboundEvent) -> Vec<OutboundEvent> {
        match event.name.as_str() {
            PING_EVENT => vec![OutboundEvent::new(EventName::from_static(PONG_EVENT))],
            SEARCH_EVENT => {
                // The query is neither validated nor echoed
                let query = event.args.first().cloned().unwrap_or_default();
                tracing::info!(sid = %session.id, "search -> {}", query);
                Vec::new()
            }
            other => {
                tracing::debug!(sid = %session.id, event = other, "ignoring unhandled event");
                Vec::new()
            }
        }
    }

    fn on_disconnect(&self, session: &Session, reason: DisconnectReason) {
        tracing::info!(sid = %session.id, %reason, "disconnected from default namespace");
    }
}
