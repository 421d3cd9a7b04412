//! HTTP and WebSocket surface of the server.

mod handler;
mod runner;
mod signal;
pub mod state;

pub use runner::{create_app, run, serve};
