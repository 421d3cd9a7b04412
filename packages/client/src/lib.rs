//! Interactive CLI client for the Kodama event server.

pub mod command;
pub mod connection;
pub mod error;

pub use command::Command;
pub use connection::{Connection, build_ws_url};
pub use error::ClientError;
