//! Wire protocol.
//!
//! Two layers share one WebSocket text frame:
//!
//! ```text
//! 4 2/admin,["version"]
//! │ └─ Socket.IO packet: type, namespace, ack id, JSON data
//! └─── Engine.IO packet type (4 = message)
//! ```

pub mod engine;
pub mod error;
pub mod socket;

pub use engine::{ENGINE_PROTOCOL_VERSION, EngineErrorCode, EnginePacket};
pub use error::PacketError;
pub use socket::SocketPacket;
