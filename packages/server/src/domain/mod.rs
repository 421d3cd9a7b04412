//! Domain layer for the event server.
//!
//! This module contains the session model and the contracts that namespace
//! handlers and storage implement, independent of the wire protocol.

pub mod entity;
pub mod error;
pub mod factory;
pub mod namespace;
pub mod repository;
pub mod value_object;

pub use entity::{DisconnectReason, Handshake, InboundEvent, OutboundEvent, Session};
pub use error::{RepositoryError, ValueObjectError};
pub use factory::SessionIdFactory;
pub use namespace::{GateRejection, NamespaceHandler};
pub use repository::SessionRepository;
pub use value_object::{EventName, NamespacePath, SessionId, Timestamp};
